//! Token document model.
//!
//! A token document is a nested JSON mapping. Branches group tokens under a
//! path prefix; a leaf is any object carrying the `$type` discriminator.
//! That discriminator, not the presence of nested objects, decides how
//! flattening and merging recurse.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Reserved sigil marking metadata keys (`$type`, `$value`, `$extensions`).
///
/// Keys starting with this character are never token names and are skipped
/// during traversal.
pub const META_SIGIL: char = '$';

/// Key carrying the leaf type discriminator.
pub const TYPE_KEY: &str = "$type";

/// Insertion-ordered mapping used for token documents and branches.
pub type TokenTree = serde_json::Map<String, Value>;

/// Errors produced while interpreting a token document.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A leaf node could not be parsed as a token.
    #[error("malformed token at `{path}`: {source}")]
    Malformed {
        /// Joined path of the offending leaf.
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Value type discriminator carried by every leaf token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Color value, either a hex string or a structured component form.
    Color,
    /// Unitless numeric value (spacing, radius, font size, weight).
    Number,
    /// Plain string value (font family names).
    String,
}

/// A single named design value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Type discriminator.
    #[serde(rename = "$type")]
    pub kind: TokenType,
    /// Raw token value; interpretation is deferred to [`crate::resolve`].
    #[serde(rename = "$value")]
    pub value: Value,
    /// Tool-specific metadata (e.g. originating Figma variable id).
    #[serde(rename = "$extensions", default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<TokenTree>,
}

impl Token {
    /// Parse a leaf node into a token.
    ///
    /// Value/type consistency is not checked here; a token with an
    /// unresolvable value only fails once a resolver touches it.
    pub fn from_node(path: &str, node: &Value) -> Result<Self, TokenError> {
        serde_json::from_value(node.clone()).map_err(|source| TokenError::Malformed {
            path: path.to_string(),
            source,
        })
    }
}

/// Returns true iff the node is an object carrying the `$type` discriminator.
pub fn is_leaf(node: &Value) -> bool {
    node.as_object().is_some_and(|o| o.contains_key(TYPE_KEY))
}

/// Returns the node's fields when it is a branch (an object without `$type`).
pub fn as_branch(node: &Value) -> Option<&TokenTree> {
    node.as_object().filter(|o| !o.contains_key(TYPE_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaf_requires_type_discriminator() {
        assert!(is_leaf(&json!({ "$type": "color", "$value": "#FFFFFF" })));
        assert!(!is_leaf(&json!({ "500": { "$type": "color", "$value": "#FFFFFF" } })));
        assert!(!is_leaf(&json!("#FFFFFF")));
        assert!(!is_leaf(&json!(null)));
    }

    #[test]
    fn branch_excludes_leaves_and_scalars() {
        assert!(as_branch(&json!({ "a": 1 })).is_some());
        assert!(as_branch(&json!({ "$type": "number", "$value": 4 })).is_none());
        assert!(as_branch(&json!(42)).is_none());
    }

    #[test]
    fn token_round_trips_extensions() {
        let node = json!({
            "$type": "color",
            "$value": { "hex": "#102030" },
            "$extensions": { "com.figma.variableId": "VariableID:1:2" }
        });
        let token = Token::from_node("bg-default", &node).unwrap();
        assert_eq!(token.kind, TokenType::Color);
        assert!(token.extensions.is_some());
        assert_eq!(serde_json::to_value(&token).unwrap(), node);
    }

    #[test]
    fn unknown_type_is_malformed() {
        let node = json!({ "$type": "gradient", "$value": "x" });
        let err = Token::from_node("fancy", &node).unwrap_err();
        assert!(err.to_string().contains("`fancy`"));
    }
}
