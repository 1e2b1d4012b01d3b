//! Tree flattening and override merge.
//!
//! Both operations recurse on the leaf/branch distinction from
//! [`crate::token`] and skip metadata keys. Flattening is pure: identical
//! input always yields the identical entry order (depth-first, key insertion
//! order), which downstream emitters rely on for categorization.

use serde_json::Value;

use crate::token::{META_SIGIL, Token, TokenError, TokenTree, as_branch, is_leaf};

/// One flattened `(path, token)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    /// Branch keys from root to leaf joined with the flatten joiner.
    pub name: String,
    /// The leaf token.
    pub token: Token,
}

impl FlatEntry {
    /// First path segment, used to group entries by category.
    pub fn category(&self, joiner: char) -> &str {
        self.name.split(joiner).next().unwrap_or(&self.name)
    }
}

/// Flatten a token tree into an ordered list of `(path, token)` pairs.
///
/// The joiner differs per consumer ('-' for CSS/SCSS names, '/' for Figma
/// variable names) and is therefore a parameter, not a constant.
///
/// # Errors
///
/// Fails when a leaf node cannot be parsed as a token.
pub fn flatten(tree: &TokenTree, joiner: char) -> Result<Vec<FlatEntry>, TokenError> {
    let mut entries = Vec::new();
    walk(tree, "", joiner, &mut entries)?;
    Ok(entries)
}

fn walk(
    branch: &TokenTree,
    prefix: &str,
    joiner: char,
    entries: &mut Vec<FlatEntry>,
) -> Result<(), TokenError> {
    for (key, node) in branch {
        if key.starts_with(META_SIGIL) {
            continue;
        }

        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{joiner}{key}")
        };

        if is_leaf(node) {
            let token = Token::from_node(&path, node)?;
            entries.push(FlatEntry { name: path, token });
        } else if let Some(sub) = node.as_object() {
            walk(sub, &path, joiner, entries)?;
        } else {
            // scalar without a `$type` is not a token
            debug!("ignoring non-token value at `{path}`");
        }
    }
    Ok(())
}

/// Deep-merge an override document into a base tree.
///
/// Non-mutating: both inputs are left untouched and a new tree is returned.
/// Recursion happens only when both sides are branches; in every other case
/// the override value replaces the base value wholesale, so a leaf is never
/// field-wise merged and a branch may be replaced by a leaf (or vice versa).
/// Keys present only in the base survive unchanged; metadata keys in the
/// override are skipped.
pub fn merge(base: &TokenTree, overlay: &TokenTree) -> TokenTree {
    let mut merged = base.clone();
    for (key, node) in overlay {
        if key.starts_with(META_SIGIL) {
            continue;
        }

        let sub = match (merged.get(key).and_then(as_branch), as_branch(node)) {
            (Some(base_sub), Some(over_sub)) => merge(base_sub, over_sub),
            _ => {
                merged.insert(key.clone(), node.clone());
                continue;
            }
        };
        merged.insert(key.clone(), Value::Object(sub));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> TokenTree {
        value.as_object().expect("object literal").clone()
    }

    fn names(entries: &[FlatEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn sample() -> TokenTree {
        tree(json!({
            "bg": {
                "default": { "$type": "color", "$value": { "hex": "#FFFFFF" } },
                "muted": { "$type": "color", "$value": { "hex": "#F0F0F0" } }
            },
            "gap": { "sm": { "$type": "number", "$value": 8 } }
        }))
    }

    #[test]
    fn flatten_is_depth_first_in_insertion_order() {
        let entries = flatten(&sample(), '-').unwrap();
        assert_eq!(names(&entries), vec!["bg-default", "bg-muted", "gap-sm"]);
    }

    #[test]
    fn flatten_joiner_is_a_parameter() {
        let entries = flatten(&sample(), '/').unwrap();
        assert_eq!(names(&entries), vec!["bg/default", "bg/muted", "gap/sm"]);
        assert_eq!(entries[0].category('/'), "bg");
    }

    #[test]
    fn flatten_skips_metadata_keys() {
        let doc = tree(json!({
            "$extensions": { "com.figma.modeName": "semantic.light" },
            "color": { "$type": "color", "$value": "#FFFFFF" }
        }));
        let entries = flatten(&doc, '-').unwrap();
        assert_eq!(names(&entries), vec!["color"]);
    }

    #[test]
    fn flatten_ignores_scalars_without_discriminator() {
        let doc = tree(json!({ "comment": "not a token", "gap": { "sm": { "$type": "number", "$value": 4 } } }));
        let entries = flatten(&doc, '-').unwrap();
        assert_eq!(names(&entries), vec!["gap-sm"]);
    }

    #[test]
    fn flatten_reports_malformed_leaf_path() {
        let doc = tree(json!({ "bg": { "odd": { "$type": "gradient", "$value": 1 } } }));
        let err = flatten(&doc, '-').unwrap_err();
        assert!(err.to_string().contains("`bg-odd`"));
    }

    #[test]
    fn merge_with_empty_override_is_identity() {
        let base = sample();
        let merged = merge(&base, &TokenTree::new());
        assert_eq!(flatten(&merged, '-').unwrap(), flatten(&base, '-').unwrap());
    }

    #[test]
    fn merge_of_disjoint_trees_is_a_union() {
        let a = tree(json!({ "bg": { "default": { "$type": "color", "$value": "#111111" } } }));
        let b = tree(json!({ "fg": { "default": { "$type": "color", "$value": "#EEEEEE" } } }));
        let merged = merge(&a, &b);
        assert_eq!(names(&flatten(&merged, '-').unwrap()), vec!["bg-default", "fg-default"]);
    }

    #[test]
    fn merge_override_wins_at_the_leaf() {
        let base = sample();
        let overlay = tree(json!({
            "bg": { "default": { "$type": "color", "$value": { "hex": "#000000" } } }
        }));
        let merged = merge(&base, &overlay);
        let entries = flatten(&merged, '-').unwrap();
        assert_eq!(entries[0].token.value, json!({ "hex": "#000000" }));
        // sibling keys present only in the base survive
        assert_eq!(entries[1].name, "bg-muted");
    }

    #[test]
    fn merge_never_field_merges_two_leaves() {
        let base = tree(json!({
            "bg": { "$type": "color", "$value": { "hex": "#FFFFFF", "alpha": 0.5 } }
        }));
        let overlay = tree(json!({ "bg": { "$type": "color", "$value": { "hex": "#000000" } } }));
        let merged = merge(&base, &overlay);
        assert_eq!(merged["bg"], json!({ "$type": "color", "$value": { "hex": "#000000" } }));
    }

    #[test]
    fn merge_replaces_mismatched_shapes_wholesale() {
        // leaf over branch
        let base = sample();
        let overlay = tree(json!({ "bg": { "$type": "color", "$value": "#123456" } }));
        let merged = merge(&base, &overlay);
        assert!(is_leaf(&merged["bg"]));

        // branch over leaf
        let back = merge(&merged, &tree(json!({ "bg": { "deep": { "$type": "number", "$value": 1 } } })));
        assert!(as_branch(&back["bg"]).is_some());
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let base = sample();
        let overlay = tree(json!({ "bg": { "default": { "$type": "number", "$value": 1 } } }));
        let base_before = base.clone();
        let overlay_before = overlay.clone();
        let _ = merge(&base, &overlay);
        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn merge_skips_metadata_keys_in_override() {
        let base = sample();
        let overlay = tree(json!({ "$extensions": { "note": "ignored" } }));
        let merged = merge(&base, &overlay);
        assert!(!merged.contains_key("$extensions"));
    }
}
