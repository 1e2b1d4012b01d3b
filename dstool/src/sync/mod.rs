//! Figma variable reconciliation.
//!
//! One-shot batch synchronization between the local semantic token files and
//! the variables of one Figma file: [`push`] creates/updates remote
//! variables from the local trees, [`pull`] rebuilds the local trees from
//! the remote set. The remote snapshot is fetched once per run and never
//! re-checked; concurrent remote edits are not detected.
//!
//! Collection and mode lookup is by human-readable name: an exact
//! case-insensitive match wins, then a case-insensitive substring match.
//! Several substring candidates tying is an error rather than a silent
//! first-match pick.

use figma_vars::{VariableCollection, VariablesMeta};
use thiserror::Error;

/// Name fragment of the collection holding the semantic color variables.
pub const SEMANTIC_COLLECTION: &str = "semantic";

/// Pull direction: remote variables to local token files.
pub mod pull;

/// Push direction: local token files to remote variables.
pub mod push;

/// Errors produced while resolving collections and modes by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No collection name matches the query.
    #[error("no variable collection matching `{0}` in the Figma file")]
    CollectionNotFound(String),
    /// No mode name in the collection matches the query.
    #[error("no mode matching `{query}` in collection `{collection}`")]
    ModeNotFound { query: String, collection: String },
    /// Several names match the query equally well.
    #[error("`{query}` is ambiguous: matches {candidates:?}")]
    AmbiguousMatch {
        query: String,
        candidates: Vec<String>,
    },
}

enum NameMatch<T> {
    One(T),
    None,
    Ambiguous(Vec<String>),
}

/// Exact case-insensitive match first, then case-insensitive substring.
fn match_by_name<T>(candidates: Vec<(&str, T)>, query: &str) -> NameMatch<T> {
    let query_lower = query.to_lowercase();

    let mut exact: Vec<(&str, T)> = Vec::new();
    let mut partial: Vec<(&str, T)> = Vec::new();
    for (name, item) in candidates {
        if name.eq_ignore_ascii_case(query) {
            exact.push((name, item));
        } else if name.to_lowercase().contains(&query_lower) {
            partial.push((name, item));
        }
    }

    let pool = if exact.is_empty() { partial } else { exact };
    if pool.len() > 1 {
        let mut names: Vec<String> = pool.iter().map(|(name, _)| name.to_string()).collect();
        names.sort();
        return NameMatch::Ambiguous(names);
    }
    match pool.into_iter().next() {
        Some((_, item)) => NameMatch::One(item),
        None => NameMatch::None,
    }
}

/// Find the collection whose name matches the query.
pub fn find_collection<'a>(
    meta: &'a VariablesMeta,
    query: &str,
) -> Result<&'a VariableCollection, LookupError> {
    let mut candidates: Vec<(&str, &VariableCollection)> = meta
        .variable_collections
        .values()
        .map(|c| (c.name.as_str(), c))
        .collect();
    candidates.sort_by_key(|(name, _)| *name);

    match match_by_name(candidates, query) {
        NameMatch::One(collection) => Ok(collection),
        NameMatch::None => Err(LookupError::CollectionNotFound(query.to_string())),
        NameMatch::Ambiguous(candidates) => Err(LookupError::AmbiguousMatch {
            query: query.to_string(),
            candidates,
        }),
    }
}

/// Find the id of the mode whose name matches the query.
pub fn find_mode<'a>(
    collection: &'a VariableCollection,
    query: &str,
) -> Result<&'a str, LookupError> {
    let mut candidates: Vec<(&str, &str)> = collection
        .modes
        .iter()
        .map(|(id, name)| (name.as_str(), id.as_str()))
        .collect();
    candidates.sort_by_key(|(name, _)| *name);

    match match_by_name(candidates, query) {
        NameMatch::One(mode_id) => Ok(mode_id),
        NameMatch::None => Err(LookupError::ModeNotFound {
            query: query.to_string(),
            collection: collection.name.clone(),
        }),
        NameMatch::Ambiguous(candidates) => Err(LookupError::AmbiguousMatch {
            query: query.to_string(),
            candidates,
        }),
    }
}
