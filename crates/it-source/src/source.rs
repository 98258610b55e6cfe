// L'index distant est récupéré via `curl` en subprocess (std::process::Command)
// plutôt qu'un client HTTP embarqué : un simple GET suffit.
// Prérequis : `curl` accessible dans PATH pour les sources `Url`.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Provenance des lignes d'index.
///
/// # Example
/// ```
/// use it_source::IndexSource;
/// use std::path::Path;
/// let src = IndexSource::resolve(Some(Path::new("-")), "https://example.org/index.txt");
/// assert_eq!(src, IndexSource::Stdin);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexSource {
    /// Fichier local.
    File(PathBuf),
    /// Entrée standard.
    Stdin,
    /// Téléchargement HTTP(S).
    Url(String),
}

impl IndexSource {
    /// A local input (`-` for stdin) takes priority over the URL.
    #[must_use]
    pub fn resolve(input: Option<&Path>, url: &str) -> Self {
        match input {
            Some(p) if p == Path::new("-") => Self::Stdin,
            Some(p) => Self::File(p.to_path_buf()),
            None => Self::Url(url.to_string()),
        }
    }

    /// Ouvre la source en lecture bufferisée.
    ///
    /// `Url` sources are downloaded in full before the reader is returned.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the download fails.
    pub fn open(&self) -> Result<Box<dyn BufRead>> {
        match self {
            Self::File(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            Self::Stdin => Ok(Box::new(std::io::stdin().lock())),
            Self::Url(url) => {
                let body = fetch(url)?;
                Ok(Box::new(Cursor::new(body)))
            }
        }
    }
}

impl fmt::Display for IndexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Télécharge `url` avec `curl -fsSL` et retourne le corps de la réponse.
///
/// # Errors
/// Retourne une erreur si `curl` est introuvable ou termine en échec
/// (HTTP >= 400, DNS, connexion refusée).
pub fn fetch(url: &str) -> Result<Vec<u8>> {
    log::info!("Téléchargement de {url}");
    let output = Command::new("curl")
        .args(["-fsSL", "--retry", "2", url])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("Impossible de lancer curl. Vérifiez que curl est installé et dans le PATH.")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("curl a échoué pour {url} ({}) : {}", output.status, stderr.trim());
    }
    log::debug!("{} octets reçus de {url}", output.stdout.len());
    Ok(output.stdout)
}
