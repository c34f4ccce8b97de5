use regex::Regex;
use std::sync::LazyLock;

static NON_BCL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z\-_]+").expect("static pattern is valid"));

/// Rewrites a sample name so bcl2fastq accepts it: every run of characters
/// outside `[0-9A-Za-z_-]` becomes a single underscore.
pub fn bcl_scrub_name(name: &str) -> String {
    NON_BCL_CHARS.replace_all(name, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_names_pass_through() {
        assert_eq!(bcl_scrub_name("sample_1-A"), "sample_1-A");
    }

    #[test]
    fn runs_of_illegal_characters_collapse_to_one_underscore() {
        assert_eq!(bcl_scrub_name("sam.ple 1"), "sam_ple_1");
        assert_eq!(bcl_scrub_name("a..//b"), "a_b");
        assert_eq!(bcl_scrub_name("blank.41.H1"), "blank_41_H1");
    }
}
