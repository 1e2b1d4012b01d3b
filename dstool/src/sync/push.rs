//! Push direction: local token files to remote variables.
//!
//! The reconciler diffs the flattened local trees against the fetched
//! variable snapshot by exact name: a matching variable gains one value per
//! processed mode, an unmatched path becomes a single create. Creates are
//! keyed by path while the plan is assembled, so the light and dark passes
//! over the same new path coalesce into one create carrying both mode
//! values. Only color tokens are synced.

use std::collections::HashMap;

use anyhow::Context;
use colored::Colorize;
use figma_vars::{
    Client, Color, Variable, VariableCreate, VariableModeValue, VariablesPayload,
};
use tokenkit::{FlatEntry, TokenType, flatten, resolve};

use crate::ctx::AppContext;
use crate::sync::{self, SEMANTIC_COLLECTION};

const SEMANTIC_LIGHT: &str = "semantic.light.tokens.json";
const SEMANTIC_DARK: &str = "semantic.dark.tokens.json";

/// Flattened entries of one local tree, tagged with the resolved mode id.
pub struct ModeEntries {
    pub mode_id: String,
    pub entries: Vec<FlatEntry>,
}

/// Pending update of an existing remote variable, one value per mode.
#[derive(Debug)]
pub struct VariableUpdate {
    pub id: String,
    pub name: String,
    pub values_by_mode: Vec<(String, Color)>,
}

/// Pending creation of a new remote variable, keyed by path.
#[derive(Debug)]
pub struct PendingCreate {
    pub name: String,
    pub values_by_mode: Vec<(String, Color)>,
}

/// Create/update operation batches produced by the reconciler.
#[derive(Debug, Default)]
pub struct PushPlan {
    pub updates: Vec<VariableUpdate>,
    pub creates: Vec<PendingCreate>,
}

impl PushPlan {
    /// True when there is nothing to post.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.creates.is_empty()
    }

    /// Explode the plan into the API payload for the given collection.
    pub fn into_payload(self, collection_id: &str) -> VariablesPayload {
        let variables = self
            .creates
            .into_iter()
            .map(|create| VariableCreate {
                name: create.name,
                variable_collection_id: collection_id.to_string(),
                resolved_type: "COLOR".to_string(),
                values_by_mode: create.values_by_mode.into_iter().collect(),
            })
            .collect();

        let mut variable_mode_values = Vec::new();
        for update in self.updates {
            for (mode_id, value) in update.values_by_mode {
                variable_mode_values.push(VariableModeValue {
                    variable_id: update.id.clone(),
                    mode_id,
                    value,
                });
            }
        }

        VariablesPayload {
            variables,
            variable_mode_values,
        }
    }
}

/// Build the reconciliation plan for the given modes, in order.
///
/// `existing` maps full variable names to the remote variables of the
/// target collection. Name matching is exact string equality against the
/// '/'-joined token path.
pub fn plan(
    existing: &HashMap<&str, &Variable>,
    modes: &[ModeEntries],
) -> anyhow::Result<PushPlan> {
    let mut plan = PushPlan::default();

    for mode in modes {
        for entry in &mode.entries {
            if entry.token.kind != TokenType::Color {
                debug!("skipping non-color token `{}`", entry.name);
                continue;
            }
            let c = resolve::rgba(&entry.token)
                .with_context(|| format!("resolving `{}`", entry.name))?;
            let value = Color {
                r: c.r,
                g: c.g,
                b: c.b,
                a: c.a,
            };

            match existing.get(entry.name.as_str()) {
                Some(var) => match plan.updates.iter_mut().find(|u| u.id == var.id) {
                    Some(update) => update.values_by_mode.push((mode.mode_id.clone(), value)),
                    None => plan.updates.push(VariableUpdate {
                        id: var.id.clone(),
                        name: entry.name.clone(),
                        values_by_mode: vec![(mode.mode_id.clone(), value)],
                    }),
                },
                None => match plan.creates.iter_mut().find(|c| c.name == entry.name) {
                    Some(create) => create.values_by_mode.push((mode.mode_id.clone(), value)),
                    None => plan.creates.push(PendingCreate {
                        name: entry.name.clone(),
                        values_by_mode: vec![(mode.mode_id.clone(), value)],
                    }),
                },
            }
        }
    }

    Ok(plan)
}

/// Run the push command.
pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    println!("{}", "Pushing tokens to Figma...".bold().purple());

    let creds = ctx.credentials()?;
    let alias = ctx.paths.alias_dir();
    let light = ctx.read_required_tree(&alias.join(SEMANTIC_LIGHT))?;
    let dark = ctx.read_required_tree(&alias.join(SEMANTIC_DARK))?;
    let light_flat = flatten(&light, '/')?;
    let dark_flat = flatten(&dark, '/')?;

    println!("Fetching existing Figma variables...");
    let client = Client::new(&creds.file_key, &creds.token);
    let remote = client.local_variables()?;

    let collection = sync::find_collection(&remote.meta, SEMANTIC_COLLECTION)?;
    let light_mode = sync::find_mode(collection, "light")?;
    let dark_mode = sync::find_mode(collection, "dark")?;

    let existing: HashMap<&str, &Variable> = remote
        .meta
        .variables
        .values()
        .filter(|v| v.variable_collection_id == collection.id)
        .map(|v| (v.name.as_str(), v))
        .collect();

    let plan = plan(
        &existing,
        &[
            ModeEntries {
                mode_id: light_mode.to_string(),
                entries: light_flat,
            },
            ModeEntries {
                mode_id: dark_mode.to_string(),
                entries: dark_flat,
            },
        ],
    )?;

    if plan.is_empty() {
        println!("No changes to push.");
        return Ok(());
    }

    println!(
        "Pushing {} updates, {} new variables...",
        plan.updates.len(),
        plan.creates.len()
    );
    client.post_variables(&plan.into_payload(&collection.id))?;

    println!("{}", "\n✓ Push complete! Variables updated in Figma.".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokenkit::TokenTree;

    fn entries(doc: serde_json::Value) -> Vec<FlatEntry> {
        let tree: TokenTree = doc.as_object().expect("object literal").clone();
        flatten(&tree, '/').unwrap()
    }

    fn variable(id: &str, name: &str) -> Variable {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "variableCollectionId": "c1",
            "resolvedType": "COLOR",
        }))
        .unwrap()
    }

    fn color_doc(hex: &str) -> serde_json::Value {
        json!({ "bg": { "default": { "$type": "color", "$value": { "hex": hex } } } })
    }

    #[test]
    fn unmatched_entry_becomes_exactly_one_create() {
        let existing = HashMap::new();
        let plan = plan(
            &existing,
            &[ModeEntries {
                mode_id: "1:0".into(),
                entries: entries(color_doc("#FF0000")),
            }],
        )
        .unwrap();

        assert!(plan.updates.is_empty());
        assert_eq!(plan.creates.len(), 1);
        assert_eq!(plan.creates[0].name, "bg/default");
        assert_eq!(plan.creates[0].values_by_mode.len(), 1);
    }

    #[test]
    fn matched_entry_becomes_an_update() {
        let var = variable("VariableID:1:2", "bg/default");
        let existing = HashMap::from([("bg/default", &var)]);
        let plan = plan(
            &existing,
            &[ModeEntries {
                mode_id: "1:0".into(),
                entries: entries(color_doc("#FF0000")),
            }],
        )
        .unwrap();

        assert!(plan.creates.is_empty());
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].id, "VariableID:1:2");
    }

    #[test]
    fn two_mode_passes_accumulate_on_one_update() {
        let var = variable("VariableID:1:2", "bg/default");
        let existing = HashMap::from([("bg/default", &var)]);
        let plan = plan(
            &existing,
            &[
                ModeEntries {
                    mode_id: "1:0".into(),
                    entries: entries(color_doc("#FFFFFF")),
                },
                ModeEntries {
                    mode_id: "1:1".into(),
                    entries: entries(color_doc("#000000")),
                },
            ],
        )
        .unwrap();

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].values_by_mode.len(), 2);
    }

    #[test]
    fn new_path_seen_in_both_passes_coalesces_into_one_create() {
        let existing = HashMap::new();
        let plan = plan(
            &existing,
            &[
                ModeEntries {
                    mode_id: "1:0".into(),
                    entries: entries(color_doc("#FFFFFF")),
                },
                ModeEntries {
                    mode_id: "1:1".into(),
                    entries: entries(color_doc("#000000")),
                },
            ],
        )
        .unwrap();

        assert_eq!(plan.creates.len(), 1);
        let modes: Vec<&str> = plan.creates[0]
            .values_by_mode
            .iter()
            .map(|(m, _)| m.as_str())
            .collect();
        assert_eq!(modes, vec!["1:0", "1:1"]);
    }

    #[test]
    fn non_color_tokens_are_skipped() {
        let existing = HashMap::new();
        let plan = plan(
            &existing,
            &[ModeEntries {
                mode_id: "1:0".into(),
                entries: entries(json!({ "gap": { "sm": { "$type": "number", "$value": 8 } } })),
            }],
        )
        .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn unresolvable_color_aborts_the_plan() {
        let existing = HashMap::new();
        let err = plan(
            &existing,
            &[ModeEntries {
                mode_id: "1:0".into(),
                entries: entries(
                    json!({ "bg": { "odd": { "$type": "color", "$value": { "colorSpace": "srgb" } } } }),
                ),
            }],
        )
        .unwrap_err();
        assert!(err.to_string().contains("`bg/odd`"));
    }

    #[test]
    fn payload_explodes_updates_per_mode() {
        let white = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
        let black = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
        let plan = PushPlan {
            updates: vec![VariableUpdate {
                id: "VariableID:1:2".into(),
                name: "bg/default".into(),
                values_by_mode: vec![("1:0".into(), white), ("1:1".into(), black)],
            }],
            creates: vec![PendingCreate {
                name: "bg/accent".into(),
                values_by_mode: vec![("1:0".into(), white)],
            }],
        };

        let payload = plan.into_payload("c1");
        assert_eq!(payload.variable_mode_values.len(), 2);
        assert_eq!(payload.variables.len(), 1);
        assert_eq!(payload.variables[0].variable_collection_id, "c1");
        assert_eq!(payload.variables[0].resolved_type, "COLOR");
    }
}
