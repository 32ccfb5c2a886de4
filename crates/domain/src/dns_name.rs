//! Helpers for textual domain names.
//!
//! Names travel through the crate as fully-qualified strings ending in `.`;
//! the root zone is `"."`. Comparisons are ASCII case-insensitive.

pub const ROOT: &str = ".";

/// Appends the trailing dot if it is missing. Empty input is the root.
pub fn fqdn(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == ROOT {
        ROOT.to_string()
    } else if trimmed.ends_with('.') {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

/// Labels of a name, without the empty root label.
pub fn labels(name: &str) -> Vec<&str> {
    name.trim_end_matches('.')
        .split('.')
        .filter(|label| !label.is_empty())
        .collect()
}

pub fn names_equal(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}

/// Right-aligned label comparison: true when `zone`'s labels equal the
/// trailing labels of `name`. Every name is within the root zone.
pub fn is_within_zone(name: &str, zone: &str) -> bool {
    let name_labels = labels(name);
    let zone_labels = labels(zone);

    if zone_labels.len() > name_labels.len() {
        return false;
    }

    name_labels
        .iter()
        .rev()
        .zip(zone_labels.iter().rev())
        .all(|(n, z)| n.eq_ignore_ascii_case(z))
}

/// Letters, digits, dots and hyphens only.
pub fn is_valid_hostname(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}
