use it_core::config::CompilerConfig;
use it_core::error::CoreError;
use it_core::tables::{CompiledTableSet, EncodeTable, Interval, RawPair};

use crate::ingest::MappingIngestor;
use crate::interval::{extract_intervals, sort_by_decreasing_length};

/// Compile des tables denses déjà remplies en tables creuses.
///
/// The decode table lists every non-hole `(index, codepoint)` of `forward`.
/// The reverse table is split with `extract_intervals`, the intervals are
/// sorted by decreasing length, and each becomes one `EncodeTable` whose
/// entries are `(j - low, reverse[j])` for the non-hole slots.
///
/// # Example
/// ```
/// use it_compile::compile;
/// let forward = vec![0x4E00, 0, 0x4E01];
/// let mut reverse = vec![0u16; 0x5000];
/// reverse[0x4E00] = 0x8140;
/// reverse[0x4E01] = 0x8142;
/// let set = compile("demo", &forward, &reverse, 1024);
/// assert_eq!(set.decode, vec![(0, 0x4E00), (2, 0x4E01)]);
/// assert_eq!(set.num_encode_tables(), 1);
/// assert_eq!(set.encode[0].entries, vec![(0, 0x8140), (1, 0x8142)]);
/// ```
#[must_use]
pub fn compile(name: &str, forward: &[u32], reverse: &[u16], separation: u32) -> CompiledTableSet {
    let decode = forward
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != 0)
        .map(|(i, &v)| (i as u32, v))
        .collect();

    let mut intervals = extract_intervals(reverse, separation);
    sort_by_decreasing_length(&mut intervals);

    let encode = intervals
        .iter()
        .map(|iv| encode_table(reverse, *iv))
        .collect();

    let set = CompiledTableSet {
        name: name.to_string(),
        decode_len: forward.len() as u32,
        decode,
        encode,
    };

    log::info!(
        "{} : {} entrées de décodage, {} tables d'encodage",
        set.name,
        set.decode.len(),
        set.num_encode_tables()
    );
    for line in set.summary() {
        log::info!("{line}");
    }
    set
}

/// Sous-table creuse d'un intervalle : seuls les slots non nuls sont listés.
fn encode_table(reverse: &[u16], iv: Interval) -> EncodeTable {
    let slots = &reverse[iv.low as usize..iv.high as usize];
    let entries = slots
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != 0)
        .map(|(offset, &v)| (offset as u32, v))
        .collect();
    EncodeTable {
        low: iv.low,
        high: iv.high,
        entries,
    }
}

/// Pipeline complet : ingestion de `pairs` puis compilation selon `config`.
///
/// Nothing is compiled unless every pair was ingested.
///
/// # Errors
/// Propagates the first parse, index-range or code-point-range error.
///
/// # Example
/// ```
/// use it_compile::compile_pairs;
/// use it_core::{CompilerConfig, RawPair};
/// let config = CompilerConfig::default();
/// let pairs = [RawPair::new(6543, 0x8005)].map(Ok);
/// let set = compile_pairs(&config, pairs).unwrap();
/// assert_eq!(set.encode(0x8005), Some(0xAACC));
/// ```
pub fn compile_pairs<I>(config: &CompilerConfig, pairs: I) -> Result<CompiledTableSet, CoreError>
where
    I: IntoIterator<Item = Result<RawPair, CoreError>>,
{
    let mut ingestor = MappingIngestor::new(config.layout.clone(), config.reverse_size);
    ingestor.ingest_all(pairs)?;
    let (forward, reverse) = ingestor.finish();
    Ok(compile(&config.layout.name, &forward, &reverse, config.separation))
}
