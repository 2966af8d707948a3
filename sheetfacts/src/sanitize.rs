//! Identifier sanitizing for sheet and column names.
//!
//! Host variable names may only contain letters, digits and underscores,
//! and must start with a letter.

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix for names that do not start with a letter.
pub const START_WITH_LETTER: &str = "Z_";

static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").unwrap());

/// Reduce `name` to a valid identifier.
///
/// Every character outside `[a-zA-Z0-9_]` is dropped. If what remains does
/// not start with a letter (including when nothing remains) it is prefixed
/// with [`START_WITH_LETTER`].
///
/// ```
/// use sheetfacts::sanitize;
///
/// assert_eq!(sanitize("Tenant-EPG"), "TenantEPG");
/// assert_eq!(sanitize("DHCP Relay"), "DHCPRelay");
/// assert_eq!(sanitize("2nd tab"), "Z_2ndtab");
/// assert_eq!(sanitize("--"), "Z_");
/// ```
pub fn sanitize(name: &str) -> String {
    let stripped = INVALID_CHARS.replace_all(name, "");

    match stripped.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => stripped.into_owned(),
        _ => format!("{}{}", START_WITH_LETTER, stripped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid(name: &str) -> bool {
        name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    #[test]
    fn test_strips_special_characters() {
        assert_eq!(sanitize("Tenant-EPG"), "TenantEPG");
        assert_eq!(sanitize("Bridge Domain (BD)"), "BridgeDomainBD");
        assert_eq!(sanitize("vlan_pool"), "vlan_pool");
    }

    #[test]
    fn test_prefixes_non_letter_start() {
        assert_eq!(sanitize("10.0.0.0/8"), "Z_100008");
        assert_eq!(sanitize("_private"), "Z__private");
        assert_eq!(sanitize("Société"), "Socit");
        assert_eq!(sanitize("été"), "Z_t");
    }

    #[test]
    fn test_empty_gets_prefix_only() {
        assert_eq!(sanitize(""), "Z_");
        assert_eq!(sanitize("   "), "Z_");
    }

    #[test]
    fn test_idempotent_and_valid() {
        let samples = [
            "", " ", "Tenant-EPG", "9lives", "_", "Z_", "ünïcode", "a b c", "DHCP Relay", "__x__",
            "Unnamed: 0", "€100",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {sample:?}");
            assert!(is_valid(&once), "invalid identifier {once:?} for {sample:?}");
        }
    }
}
