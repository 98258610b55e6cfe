use std::cmp::Reverse;

use it_core::tables::Interval;

/// Découpe la table inverse en intervalles `[low, high)`.
///
/// Single left-to-right scan. A non-hole entry at `i` extends the open
/// interval unless at least `separation` slots separate it from the end of
/// that interval, in which case the open interval is closed and a new one
/// starts at `i`. Gaps shorter than `separation` are folded into the
/// surrounding interval. Intervals come out in discovery (ascending) order.
///
/// An all-hole table yields no interval.
///
/// # Example
/// ```
/// use it_compile::extract_intervals;
/// use it_core::Interval;
/// let mut reverse = vec![0u16; 300];
/// reverse[0] = 0x8140;
/// reverse[1] = 0x8141;
/// reverse[200] = 0x8142;
/// assert_eq!(
///     extract_intervals(&reverse, 10),
///     vec![Interval { low: 0, high: 2 }, Interval { low: 200, high: 201 }],
/// );
/// ```
#[must_use]
pub fn extract_intervals(reverse: &[u16], separation: u32) -> Vec<Interval> {
    let mut intervals = Vec::new();
    let mut open: Option<Interval> = None;

    for (i, &v) in reverse.iter().enumerate() {
        if v == 0 {
            continue;
        }
        let i = i as u32;
        match open.as_mut() {
            None => open = Some(Interval { low: i, high: i + 1 }),
            Some(current) if i - current.high >= separation => {
                intervals.push(*current);
                *current = Interval { low: i, high: i + 1 };
            }
            Some(current) => current.high = i + 1,
        }
    }

    intervals.extend(open);
    intervals
}

/// Trie par longueur décroissante ; stable, les égalités gardent l'ordre de découverte.
///
/// The consumer tests tables as a chain of range checks, so the largest
/// tables come first.
pub fn sort_by_decreasing_length(intervals: &mut [Interval]) {
    intervals.sort_by_key(|iv| Reverse(iv.len()));
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic sparse reverse table.
    fn scattered(len: usize, seed: u64) -> Vec<u16> {
        let mut state = seed;
        let mut table = vec![0u16; len];
        for slot in &mut table {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            // ~3% density with occasional dense runs
            if state % 97 < 3 || (state >> 32) % 5000 < 40 {
                *slot = 0x8140 | (state & 0x3F) as u16;
            }
        }
        table
    }

    fn non_zero(reverse: &[u16]) -> Vec<u32> {
        reverse
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0)
            .map(|(i, _)| i as u32)
            .collect()
    }

    #[test]
    fn empty_table_has_no_interval() {
        assert!(extract_intervals(&[], 1024).is_empty());
        assert!(extract_intervals(&[0; 4096], 1024).is_empty());
    }

    #[test]
    fn single_entry() {
        let mut reverse = vec![0u16; 10];
        reverse[9] = 1;
        assert_eq!(extract_intervals(&reverse, 4), vec![Interval { low: 9, high: 10 }]);
    }

    #[test]
    fn gap_equal_to_separation_splits() {
        let mut reverse = vec![0u16; 20];
        reverse[0] = 1;
        // high = 1, next at 11 : gap 10 == separation.
        reverse[11] = 1;
        assert_eq!(extract_intervals(&reverse, 10).len(), 2);
        // One slot closer: merged.
        reverse[11] = 0;
        reverse[10] = 1;
        assert_eq!(
            extract_intervals(&reverse, 10),
            vec![Interval { low: 0, high: 11 }]
        );
    }

    #[test]
    fn separation_one_splits_on_any_hole() {
        let reverse = [1u16, 1, 0, 1, 0, 0, 1];
        assert_eq!(
            extract_intervals(&reverse, 1),
            vec![
                Interval { low: 0, high: 2 },
                Interval { low: 3, high: 4 },
                Interval { low: 6, high: 7 },
            ]
        );
    }

    #[test]
    fn coverage_gap_and_merge_properties() {
        for seed in [1u64, 7, 0xDEAD_BEEF, 42] {
            for separation in [1u32, 16, 256, 1024] {
                let reverse = scattered(20_000, seed);
                let intervals = extract_intervals(&reverse, separation);

                // Coverage: every entry in exactly one interval.
                for i in non_zero(&reverse) {
                    let hits = intervals.iter().filter(|iv| iv.contains(i)).count();
                    assert_eq!(hits, 1, "entry {i} covered {hits} times");
                }

                for iv in &intervals {
                    assert!(!iv.is_empty());
                    assert_ne!(reverse[iv.low as usize], 0, "interval must start on an entry");
                    assert_ne!(reverse[iv.high as usize - 1], 0, "interval must end on an entry");
                    // Merge: internal gaps stay below separation.
                    let inside = non_zero(&reverse[iv.low as usize..iv.high as usize]);
                    for w in inside.windows(2) {
                        assert!(w[1] - (w[0] + 1) < separation);
                    }
                }

                // Gap: consecutive intervals are at least `separation` apart.
                for w in intervals.windows(2) {
                    assert!(w[0].low < w[1].low);
                    assert!(w[1].low - w[0].high >= separation);
                }
            }
        }
    }

    #[test]
    fn sort_is_decreasing_and_stable() {
        let mut intervals = vec![
            Interval { low: 0, high: 2 },
            Interval { low: 10, high: 15 },
            Interval { low: 20, high: 22 },
            Interval { low: 30, high: 31 },
            Interval { low: 40, high: 45 },
        ];
        sort_by_decreasing_length(&mut intervals);
        assert_eq!(
            intervals,
            vec![
                Interval { low: 10, high: 15 },
                Interval { low: 40, high: 45 },
                Interval { low: 0, high: 2 },
                Interval { low: 20, high: 22 },
                Interval { low: 30, high: 31 },
            ]
        );
    }

    #[test]
    fn sorted_lengths_never_increase() {
        let reverse = scattered(50_000, 99);
        let mut intervals = extract_intervals(&reverse, 64);
        sort_by_decreasing_length(&mut intervals);
        assert!(intervals.windows(2).all(|w| w[0].len() >= w[1].len()));
    }
}
