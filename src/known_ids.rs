use feed_core::{FeedError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Load the identities the map service already has, from a JSON array of
/// ids (strings or numbers).
pub fn load_known_ids(path: &Path) -> Result<HashSet<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        FeedError::Config(format!("cannot read known ids from {}: {}", path.display(), e))
    })?;
    let value: Value = serde_json::from_str(&text)?;

    let Value::Array(items) = value else {
        return Err(FeedError::Config(format!(
            "{} must contain a JSON array of listing ids",
            path.display()
        )));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}
