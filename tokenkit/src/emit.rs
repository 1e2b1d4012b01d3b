//! CSS and SCSS output rendering.
//!
//! Both emitters are pure functions of (flattened entries, categorization):
//! they return the complete output fragment as a `String` and perform no
//! I/O, so every stage can be unit-tested independently and the caller
//! concatenates or writes the result in one whole-file replace.

use thiserror::Error;

use crate::resolve::{self, ResolveError};
use crate::tree::FlatEntry;

/// Errors produced while rendering an output file.
#[derive(Debug, Error)]
pub enum EmitError {
    /// A token value failed to resolve; the message names the entry.
    #[error("token `{name}`: {source}")]
    Resolve {
        name: String,
        #[source]
        source: ResolveError,
    },
}

/// One CSS rule scope, e.g. `:root` for the default mode or an
/// attribute-selector block for an alternate mode.
#[derive(Debug, Clone)]
pub struct CssScope {
    /// Rule selector.
    pub selector: String,
    /// Optional comment rendered at the top of the block.
    pub label: Option<String>,
    /// Flattened entries declared inside the scope.
    pub entries: Vec<FlatEntry>,
}

/// How an SCSS section renders its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStyle {
    /// Full resolution, numbers carrying the `px` suffix.
    Resolved,
    /// Unitless literal (font weights).
    Raw,
    /// Unitless literal wrapped in double quotes (font families).
    Quoted,
}

/// One group of SCSS variable declarations sharing a namespace prefix.
#[derive(Debug, Clone)]
pub struct ScssSection {
    /// Optional `// heading` comment preceding the declarations.
    pub heading: Option<String>,
    /// Namespace prefix inserted between `$` and the entry name.
    pub prefix: String,
    /// Value rendering style.
    pub style: ValueStyle,
    /// Flattened entries declared in the section.
    pub entries: Vec<FlatEntry>,
}

impl ScssSection {
    /// Heading-only separator section (tier banners).
    pub fn banner(heading: &str) -> Self {
        Self {
            heading: Some(heading.to_string()),
            prefix: String::new(),
            style: ValueStyle::Resolved,
            entries: Vec::new(),
        }
    }
}

/// CSS custom-property name for a flattened entry name.
pub fn css_variable(name: &str) -> String {
    format!("--{}", name.replace('/', "-"))
}

/// SCSS variable name for a prefixed flattened entry name.
pub fn scss_variable(prefix: &str, name: &str) -> String {
    format!("${prefix}{}", name.replace('/', "-"))
}

/// Group entries by their first path segment, preserving first-seen order.
pub fn categorize(entries: &[FlatEntry], joiner: char) -> Vec<(&str, Vec<&FlatEntry>)> {
    let mut groups: Vec<(&str, Vec<&FlatEntry>)> = Vec::new();
    for entry in entries {
        let category = entry.category(joiner);
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(entry),
            None => groups.push((category, vec![entry])),
        }
    }
    groups
}

/// Render the CSS custom-property file: one rule block per mode scope, one
/// declaration per entry in category order with a comment header per
/// category.
pub fn render_css(scopes: &[CssScope], joiner: char) -> Result<String, EmitError> {
    let mut lines = vec![
        "/* Auto-generated from token files - DO NOT EDIT */".to_string(),
        "/* Run `dstool build` to regenerate */".to_string(),
        String::new(),
    ];

    for (i, scope) in scopes.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{} {{", scope.selector));
        if let Some(label) = &scope.label {
            lines.push(format!("  /* {label} */"));
        }
        for (category, entries) in categorize(&scope.entries, joiner) {
            lines.push(format!("  /* {category} */"));
            for entry in entries {
                let value = resolve_entry(entry, ValueStyle::Resolved)?;
                lines.push(format!("  {}: {};", css_variable(&entry.name), value));
            }
        }
        lines.push("}".to_string());
    }

    Ok(lines.join("\n") + "\n")
}

/// Render the SCSS variable file: a flat sequence of declarations grouped
/// into sections, each with its own heading comment and namespace prefix.
pub fn render_scss(sections: &[ScssSection]) -> Result<String, EmitError> {
    let mut lines = vec![
        "// Auto-generated from token files - DO NOT EDIT".to_string(),
        "// Run `dstool build` to regenerate".to_string(),
    ];

    for section in sections {
        if let Some(heading) = &section.heading {
            lines.push(String::new());
            lines.push(format!("// {heading}"));
        }
        for entry in &section.entries {
            let value = resolve_entry(entry, section.style)?;
            lines.push(format!(
                "{}: {};",
                scss_variable(&section.prefix, &entry.name),
                value
            ));
        }
    }

    Ok(lines.join("\n") + "\n")
}

fn resolve_entry(entry: &FlatEntry, style: ValueStyle) -> Result<String, EmitError> {
    let resolved = match style {
        ValueStyle::Resolved => resolve::css_value(&entry.token),
        ValueStyle::Raw => resolve::raw_value(&entry.token),
        ValueStyle::Quoted => resolve::raw_value(&entry.token).map(|v| format!("\"{v}\"")),
    };
    resolved.map_err(|source| EmitError::Resolve {
        name: entry.name.clone(),
        source,
    })
}
