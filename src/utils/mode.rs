//! Frequency helpers shared by the narrative synthesizers
//!
//! Both helpers are order-sensitive: ties and duplicates resolve to the
//! value encountered first, so output is reproducible for a given row order.

use ahash::AHashSet;
use rustc_hash::FxHashMap;

/// Most frequent value, ties broken by first appearance.
///
/// Returns `None` for an empty input.
pub fn most_frequent<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    // value → (count, first index)
    let mut counts: FxHashMap<&'a str, (usize, usize)> = FxHashMap::default();

    for (idx, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Distinct values in first-seen order
pub fn distinct_in_order<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: AHashSet<&'a str> = AHashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_frequent_picks_highest_count() {
        let values = ["Grey", "Brown", "Brown", "Red"];
        assert_eq!(most_frequent(values), Some("Brown"));
    }

    #[test]
    fn test_most_frequent_tie_uses_first_seen() {
        // Both appear twice; "Residual" is seen first
        let values = ["Residual", "Fill", "Fill", "Residual"];
        assert_eq!(most_frequent(values), Some("Residual"));

        let values = ["Fill", "Residual", "Residual", "Fill"];
        assert_eq!(most_frequent(values), Some("Fill"));
    }

    #[test]
    fn test_most_frequent_empty() {
        let values: [&str; 0] = [];
        assert_eq!(most_frequent(values), None);
    }

    #[test]
    fn test_distinct_in_order() {
        let values = ["brown", "grey", "brown", "orange", "grey"];
        assert_eq!(distinct_in_order(values), vec!["brown", "grey", "orange"]);
    }
}
