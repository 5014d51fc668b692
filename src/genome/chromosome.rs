//! Chromosome naming rules

use once_cell::sync::Lazy;
use regex::Regex;

/// UCSC-style human chromosome names: chr1-chr22, chrX, chrY, chrM, chrMT
static CHROMOSOME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^chr([1-9]|1[0-9]|2[0-2]|X|Y|M|MT)$").unwrap());

/// Check whether a chromosome identifier follows the naming convention the
/// prediction service accepts
pub fn is_valid_chromosome(name: &str) -> bool {
    CHROMOSOME_PATTERN.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autosomes() {
        for n in 1..=22 {
            assert!(is_valid_chromosome(&format!("chr{}", n)), "chr{}", n);
        }
    }

    #[test]
    fn test_sex_and_mito() {
        assert!(is_valid_chromosome("chrX"));
        assert!(is_valid_chromosome("chrY"));
        assert!(is_valid_chromosome("chrM"));
        assert!(is_valid_chromosome("chrMT"));
    }

    #[test]
    fn test_rejects() {
        assert!(!is_valid_chromosome("chr0"));
        assert!(!is_valid_chromosome("chr23"));
        assert!(!is_valid_chromosome("chr01"));
        assert!(!is_valid_chromosome("22"));
        assert!(!is_valid_chromosome("chrx"));
        assert!(!is_valid_chromosome("Chr1"));
        assert!(!is_valid_chromosome("chr1_KI270706v1_random"));
        assert!(!is_valid_chromosome(""));
    }
}
