//! Naming conventions shared by the validator and the lookup index.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Source tag of units imported from the QUDT vocabulary.
pub const QUDT_SOURCE: &str = "qudt.org";

const QUDT_UNIT_BASE: &str = "https://qudt.org/vocab/unit/";

static EXTERNAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+:[a-z0-9_-]+$").expect("valid external id pattern"));

static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?(?::[0-9]{1,5})?(?:[/?#][^\s]*)?$")
        .expect("valid url pattern")
});

/// Lowercase `text`, replacing every character other than ASCII
/// alphanumerics, `-` and `_` with `_`.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// External id a unit named `name` of `quantity` must carry.
pub fn expected_external_id(quantity: &str, name: &str) -> String {
    format!("{}:{}", sanitize(quantity), sanitize(name))
}

pub fn is_well_formed_external_id(external_id: &str) -> bool {
    EXTERNAL_ID.is_match(external_id)
}

pub fn qudt_reference(name: &str) -> String {
    format!("{QUDT_UNIT_BASE}{name}")
}

/// Absolute `http` or `https` URL with a host.
pub fn is_http_url(text: &str) -> bool {
    HTTP_URL.is_match(text)
}

/// Canonical form used to compare aliases.
pub fn normalize_alias(alias: &str) -> String {
    alias.nfc().collect()
}

/// Normalized aliases of one unit with repeats removed, first occurrence kept.
pub fn dedup_aliases(aliases: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    aliases
        .iter()
        .map(|alias| normalize_alias(alias))
        .filter(|alias| seen.insert(alias.clone()))
        .collect()
}
