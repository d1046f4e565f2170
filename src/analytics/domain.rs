use regex::Regex;
use std::sync::LazyLock;

/// Legal-entity suffixes stripped from a company name, applied in order.
/// Each pattern is case-insensitive and removes its first occurrence only.
pub const ENTITY_SUFFIXES: &[&str] = &[
    r",? Inc\.?",
    r",? Corporation",
    r",? Corp\.?",
    r",? Ltd\.?",
    r",? PLC",
    r" Holdings",
    r" Group",
];

static SUFFIX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ENTITY_SUFFIXES
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).expect("entity suffix pattern compiles"))
        .collect()
});

const DEFAULT_TLD: &str = ".com";

/// Guesses a company's web domain from its long name, e.g. "Apple Inc." -> "apple.com".
///
/// The guess only seeds a logo lookup, so a wrong answer is acceptable.
pub fn guess_domain(long_name: Option<&str>) -> Option<String> {
    let name = long_name.filter(|n| !n.trim().is_empty())?;

    let stripped = SUFFIX_PATTERNS
        .iter()
        .fold(name.to_string(), |acc, re| re.replacen(&acc, 1, "").into_owned());

    let cleaned: String = stripped
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if cleaned.is_empty() {
        None
    } else {
        Some(format!("{}{}", cleaned, DEFAULT_TLD))
    }
}
