//! Common helpers.
//!
//! Currently only the `.env` credential file parser. The file format is
//! deliberately minimal: one `KEY=VALUE` per line, values may themselves
//! contain `=`, surrounding whitespace is trimmed.

use std::collections::HashMap;

/// Parse `KEY=VALUE` lines into a map.
///
/// Lines without a `=`, with an empty key, or with an empty value are
/// skipped; `#`-prefixed lines are treated as comments.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    let mut env = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                env.insert(key.to_string(), value.to_string());
            }
        }
    }
    env
}
