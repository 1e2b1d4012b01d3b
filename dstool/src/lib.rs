//! # dstool
//!
//! The design-token pipeline CLI. `dstool` reads hierarchical token JSON
//! documents, merges project overrides, and emits CSS custom-property and
//! SCSS variable files for the website build; a companion pair of commands
//! synchronizes the semantic color tokens with Figma variables.
//!
//! ## Commands
//!
//! - `dstool build` — generate `tokens/dist/tokens.css` and
//!   `tokens/dist/_tokens.scss` from the local token files, optionally
//!   merging a project override document.
//! - `dstool push` — create/update Figma variables from the local semantic
//!   token files (one-shot batch reconciliation, no watching).
//! - `dstool pull` — fetch Figma variables into the local semantic token
//!   files.
//!
//! ## Modules
//!
//! - [`build`] - CSS/SCSS generation pipeline
//! - [`ctx`] - Application context, paths and token file I/O
//! - [`sync`] - Figma variable reconciliation (push/pull)
//! - [`utils`] - Env-file parsing helpers

/// CSS/SCSS generation pipeline.
pub mod build;

/// Application context, paths and token file I/O.
pub mod ctx;

/// Figma variable reconciliation.
pub mod sync;

/// Common helpers.
pub mod utils;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
