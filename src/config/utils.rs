use crate::utils::url_validation::normalize_server_url;

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no` and `on/off`.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated server list, normalizing each entry and dropping blanks.
///
/// Order is kept and duplicates are not removed.
pub(crate) fn parse_server_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(normalize_server_url)
        .filter(|s| !s.is_empty())
        .collect()
}
