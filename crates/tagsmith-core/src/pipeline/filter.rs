//! Per-image tag filtering and cross-image merging.
//!
//! The tagger returns one string per image with tags joined by `", "` in the
//! model's ranking order. Filtering keeps that order; merging keeps the order
//! in which tags were first seen across images.

use std::collections::HashSet;

/// Separator between tags in a raw tagger string and in sidecar files.
pub const TAG_DELIMITER: &str = ", ";

/// Split a raw tagger string into its tags. Tags are not trimmed.
pub fn split_raw_tags(raw: &str) -> Vec<&str> {
    raw.split(TAG_DELIMITER).collect()
}

/// Build an image's final tag list: `additional` first, in the given order,
/// then every raw tag that is neither excluded nor already among `additional`.
pub fn filter_tags(raw: &str, additional: &[String], exclude: &HashSet<String>) -> Vec<String> {
    let mut tags = additional.to_vec();
    tags.extend(
        split_raw_tags(raw)
            .into_iter()
            .filter(|t| !exclude.contains(*t) && !additional.iter().any(|a| a == t))
            .map(str::to_string),
    );
    tags
}

/// Drop every repeated tag after its first occurrence, preserving order.
pub fn dedup_first_occurrence<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(tags.len());
    tags.iter()
        .map(AsRef::as_ref)
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> HashSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn list(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_split_uses_exact_delimiter() {
        assert_eq!(split_raw_tags("cat, dog"), vec!["cat", "dog"]);
        assert_eq!(split_raw_tags("cat,dog"), vec!["cat,dog"]);
        assert_eq!(split_raw_tags("cat,  dog"), vec!["cat", " dog"]);
    }

    #[test]
    fn test_filter_without_rules_keeps_raw_order() {
        let tags = filter_tags("cat, dog, tree", &[], &HashSet::new());
        assert_eq!(tags, list(&["cat", "dog", "tree"]));
    }

    #[test]
    fn test_filter_excludes() {
        let tags = filter_tags("cat, dog", &[], &set(&["dog"]));
        assert_eq!(tags, list(&["cat"]));
    }

    #[test]
    fn test_filter_prefixes_additional_without_duplicating() {
        let tags = filter_tags("quality:high, cat", &list(&["quality:high"]), &HashSet::new());
        assert_eq!(tags, list(&["quality:high", "cat"]));
    }

    #[test]
    fn test_filter_additional_wins_over_exclude() {
        let tags = filter_tags("solo, cat", &list(&["solo"]), &set(&["solo"]));
        assert_eq!(tags, list(&["solo", "cat"]));
    }

    #[test]
    fn test_filter_is_deterministic() {
        let additional = list(&["best", "quality"]);
        let exclude = set(&["tree", "sky"]);
        let raw = "sky, cat, quality, tree, dog";
        let first = filter_tags(raw, &additional, &exclude);
        let second = filter_tags(raw, &additional, &exclude);
        assert_eq!(first, second);
        assert_eq!(first, list(&["best", "quality", "cat", "dog"]));
    }

    #[test]
    fn test_filter_empty_raw_string() {
        // An empty tagger result splits into one empty tag, which is kept.
        assert_eq!(filter_tags("", &[], &HashSet::new()), list(&[""]));
    }

    #[test]
    fn test_dedup_first_occurrence() {
        let merged = dedup_first_occurrence(&["cat", "dog", "dog", "tree", "cat"]);
        assert_eq!(merged, list(&["cat", "dog", "tree"]));
    }

    #[test]
    fn test_dedup_has_no_repeats_and_keeps_order() {
        let input = list(&["b", "a", "b", "c", "a", "d", "c"]);
        let merged = dedup_first_occurrence(&input);
        let unique: HashSet<_> = merged.iter().collect();
        assert_eq!(unique.len(), merged.len());
        assert_eq!(merged, list(&["b", "a", "c", "d"]));
    }
}
