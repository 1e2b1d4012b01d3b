//! Pull direction: remote variables to local token files.
//!
//! One `semantic.{mode}.tokens.json` document is rebuilt per mode from the
//! fetched snapshot. Only color variables of the semantic collection are
//! materialized; alias values whose `{r,g,b,a}` shape does not decode are
//! carried through verbatim so the reference survives a pull/push cycle.
//! Variables are processed in name order, making the output deterministic
//! regardless of snapshot map ordering.

use colored::Colorize;
use figma_vars::{Client, Color, Variable, VariableCollection, VariablesMeta};
use serde_json::{Value, json};
use tokenkit::TokenTree;
use tokenkit::resolve::Rgba;

use crate::ctx::AppContext;
use crate::sync::{self, SEMANTIC_COLLECTION};

const MODES: [&str; 2] = ["light", "dark"];

/// Run the pull command.
pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    println!("{}", "Pulling variables from Figma...".bold().purple());

    let creds = ctx.credentials()?;
    let client = Client::new(&creds.file_key, &creds.token);
    let remote = client.local_variables()?;
    let collection = sync::find_collection(&remote.meta, SEMANTIC_COLLECTION)?;
    println!("Found collection: {}", collection.name);

    for mode in MODES {
        let tree = from_remote(&remote.meta, collection, mode)?;
        let path = ctx
            .paths
            .alias_dir()
            .join(format!("semantic.{mode}.tokens.json"));
        let mut content = serde_json::to_string_pretty(&tree)?;
        content.push('\n');
        ctx.write_output(&path, &content)?;
    }

    println!(
        "{}",
        "\n✓ Pull complete! Run `dstool build` to regenerate CSS/SCSS.".green()
    );
    Ok(())
}

/// Rebuild the token document of one mode from the remote snapshot.
pub fn from_remote(
    meta: &VariablesMeta,
    collection: &VariableCollection,
    mode_label: &str,
) -> anyhow::Result<TokenTree> {
    let mode_id = sync::find_mode(collection, mode_label)?;

    let mut variables: Vec<&Variable> = meta
        .variables
        .values()
        .filter(|v| v.variable_collection_id == collection.id && v.resolved_type == "COLOR")
        .collect();
    variables.sort_by(|a, b| a.name.cmp(&b.name));

    let mut tree = TokenTree::new();
    for var in variables {
        let Some(raw) = var.values_by_mode.get(mode_id) else {
            debug!("variable `{}` has no value for mode `{mode_label}`", var.name);
            continue;
        };
        let value = token_value(raw);

        let token = json!({
            "$type": "color",
            "$value": value,
            "$extensions": {
                "com.figma.variableId": var.id,
                "com.figma.scopes": var.scopes,
                "com.figma.isOverride": true,
            },
        });

        let segments: Vec<&str> = var.name.split('/').collect();
        insert_at(&mut tree, &segments, token);
    }

    tree.insert(
        "$extensions".to_string(),
        json!({ "com.figma.modeName": format!("semantic.{mode_label}") }),
    );
    Ok(tree)
}

/// Convert one remote value to its token `$value` form.
///
/// A decodable color becomes the structured component object with a
/// precomputed hex; anything else (alias references in particular) is
/// passed through untouched.
fn token_value(raw: &Value) -> Value {
    match serde_json::from_value::<Color>(raw.clone()) {
        Ok(c) => {
            let hex = Rgba { r: c.r, g: c.g, b: c.b, a: c.a }.hex();
            json!({
                "colorSpace": "srgb",
                "components": [c.r, c.g, c.b],
                "alpha": c.a,
                "hex": hex,
            })
        }
        Err(_) => raw.clone(),
    }
}

/// Insert a token at the given path, growing branches on demand.
///
/// A non-branch node in the way is replaced by a fresh branch.
fn insert_at(tree: &mut TokenTree, segments: &[&str], token: Value) {
    match segments {
        [] => {}
        [leaf] => {
            tree.insert((*leaf).to_string(), token);
        }
        [head, rest @ ..] => {
            let node = tree
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(TokenTree::new()));
            if !node.is_object() {
                *node = Value::Object(TokenTree::new());
            }
            let branch = node.as_object_mut().unwrap();
            insert_at(branch, rest, token);
        }
    }
}
