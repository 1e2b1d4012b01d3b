//! CSS/SCSS generation pipeline.
//!
//! `dstool build` reads the base- and alias-tier token files, deep-merges an
//! optional project override document into the light/dark UI trees, and
//! renders `tokens.css` (custom properties, one scope per mode) plus
//! `_tokens.scss` (flat variables grouped per source file) into the dist
//! directory. A missing token file means that section is simply skipped;
//! an explicitly requested override file that is absent aborts the run.

use std::path::Path;

use colored::Colorize;
use tokenkit::emit::{self, CssScope, ScssSection, ValueStyle};
use tokenkit::token::as_branch;
use tokenkit::{FlatEntry, TokenTree, flatten, merge};

use crate::ctx::AppContext;

const BASE_COLORS: &str = "colors.tokens.json";
const BASE_SCALE: &str = "scale.tokens.json";
const BASE_TYPOGRAPHY: &str = "typography.tokens.json";
const BASE_RADIUS: &str = "radius.tokens.json";
const ALIAS_TYPOGRAPHY: &str = "typography.tokens.json";
const ALIAS_SPACING: &str = "spacing.tokens.json";
const ALIAS_RADIUS: &str = "radius.tokens.json";
const UI_LIGHT: &str = "ui.light.tokens.json";
const UI_DARK: &str = "ui.dark.tokens.json";

const CSS_FILE: &str = "tokens.css";
const SCSS_FILE: &str = "_tokens.scss";

/// Joiner used for CSS/SCSS variable names.
const JOINER: char = '-';

impl AppContext {
    /// Run the build pipeline.
    pub fn build(&self, project_overrides: Option<&Path>) -> anyhow::Result<()> {
        println!("{}", "Building tokens from JSON files...".bold().purple());

        let alias = self.paths.alias_dir();
        let light = self
            .read_optional_tree(&alias.join(UI_LIGHT))?
            .unwrap_or_default();
        let dark = self
            .read_optional_tree(&alias.join(UI_DARK))?
            .unwrap_or_default();

        let overrides = match project_overrides {
            Some(path) => {
                let tree = self.read_optional_tree(path)?.ok_or_else(|| {
                    anyhow!("project overrides not found: {}", path.display())
                })?;
                println!(
                    "{}",
                    format!("✓ Loaded project overrides from: {}", path.display()).green()
                );
                Some(tree)
            }
            None => None,
        };

        let final_light = match &overrides {
            Some(o) => merge(&light, o),
            None => light,
        };
        let final_dark = match &overrides {
            Some(o) => merge(&dark, o),
            None => dark,
        };

        let light_flat = flatten(&final_light, JOINER)?;
        let dark_flat = flatten(&final_dark, JOINER)?;
        let light_count = light_flat.len();
        let dark_count = dark_flat.len();

        let css = emit::render_css(
            &[
                CssScope {
                    selector: ":root".into(),
                    label: Some("Light mode (default)".into()),
                    entries: light_flat,
                },
                CssScope {
                    selector: "[data-theme=\"dark\"]".into(),
                    label: None,
                    entries: dark_flat,
                },
            ],
            JOINER,
        )?;
        self.write_output(&self.paths.dist_dir().join(CSS_FILE), &css)?;

        let scss = emit::render_scss(&self.scss_sections(&final_light, &final_dark)?)?;
        self.write_output(&self.paths.dist_dir().join(SCSS_FILE), &scss)?;

        println!("\n  UI tokens: {light_count} (light) / {dark_count} (dark)");
        Ok(())
    }

    /// Assemble the SCSS sections in source-file order, skipping absent
    /// files and subtrees.
    fn scss_sections(
        &self,
        light: &TokenTree,
        dark: &TokenTree,
    ) -> anyhow::Result<Vec<ScssSection>> {
        let base = self.paths.base_dir();
        let alias = self.paths.alias_dir();

        let mut sections = vec![ScssSection::banner("===== BASE TOKENS =====")];

        if let Some(colors) = self.read_optional_tree(&base.join(BASE_COLORS))? {
            sections.push(section(None, "color-", ValueStyle::Resolved, flatten(&colors, JOINER)?));
        }
        if let Some(scale) = self.read_optional_tree(&base.join(BASE_SCALE))? {
            sections.push(section(
                Some("Scale"),
                "spacing-",
                ValueStyle::Resolved,
                flatten(&scale, JOINER)?,
            ));
        }
        if let Some(typography) = self.read_optional_tree(&base.join(BASE_TYPOGRAPHY))? {
            if let Some(family) = subtree(&typography, "Family") {
                sections.push(section(
                    Some("Typography"),
                    "font-family-",
                    ValueStyle::Quoted,
                    flatten(family, JOINER)?,
                ));
            }
            if let Some(weights) = subtree(&typography, "Weights") {
                let entries = flatten(weights, JOINER)?
                    .into_iter()
                    .map(|mut e| {
                        e.name = e.name.to_lowercase();
                        e
                    })
                    .collect();
                sections.push(section(None, "font-weight-", ValueStyle::Raw, entries));
            }
        }
        if let Some(radius) = self.read_optional_tree(&base.join(BASE_RADIUS))? {
            sections.push(section(
                Some("Radius"),
                "radius-",
                ValueStyle::Resolved,
                flatten(&radius, JOINER)?,
            ));
        }

        sections.push(ScssSection::banner("===== ALIAS TOKENS ====="));

        if let Some(typography) = self.read_optional_tree(&alias.join(ALIAS_TYPOGRAPHY))? {
            if let Some(family) = subtree(&typography, "font-family") {
                sections.push(section(
                    Some("Typography Alias"),
                    "alias-font-",
                    ValueStyle::Quoted,
                    flatten(family, JOINER)?,
                ));
            }
            if let Some(sizes) = subtree(&typography, "font-size") {
                sections.push(section(None, "font-size-", ValueStyle::Resolved, flatten(sizes, JOINER)?));
            }
        }
        if let Some(spacing) = self.read_optional_tree(&alias.join(ALIAS_SPACING))? {
            if let Some(gap) = subtree(&spacing, "gap") {
                sections.push(section(
                    Some("Spacing Alias"),
                    "gap-",
                    ValueStyle::Resolved,
                    flatten(gap, JOINER)?,
                ));
            }
            if let Some(padding) = subtree(&spacing, "padding") {
                sections.push(section(None, "padding-", ValueStyle::Resolved, flatten(padding, JOINER)?));
            }
        }
        if let Some(radius) = self.read_optional_tree(&alias.join(ALIAS_RADIUS))? {
            if let Some(container) = subtree(&radius, "container") {
                sections.push(section(
                    Some("Radius Alias"),
                    "radius-",
                    ValueStyle::Resolved,
                    flatten(container, JOINER)?,
                ));
            }
        }

        sections.push(ScssSection::banner("===== UI COLORS ====="));
        sections.push(section(
            Some("Light Mode"),
            "alias-light-",
            ValueStyle::Resolved,
            flatten(light, JOINER)?,
        ));
        sections.push(section(
            Some("Dark Mode"),
            "alias-dark-",
            ValueStyle::Resolved,
            flatten(dark, JOINER)?,
        ));

        Ok(sections)
    }
}

fn section(
    heading: Option<&str>,
    prefix: &str,
    style: ValueStyle,
    entries: Vec<FlatEntry>,
) -> ScssSection {
    ScssSection {
        heading: heading.map(str::to_string),
        prefix: prefix.to_string(),
        style,
        entries,
    }
}

fn subtree<'a>(tree: &'a TokenTree, key: &str) -> Option<&'a TokenTree> {
    tree.get(key).and_then(as_branch)
}
