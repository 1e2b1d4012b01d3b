//! # tokenkit
//!
//! Core library of the design-token pipeline: the token tree model plus the
//! pure transformations every consumer (CSS/SCSS build, Figma sync) shares.
//!
//! Token documents are nested JSON mappings. A node is a *leaf* exactly when
//! it carries the `$type` discriminator; every other object is a *branch*
//! grouping tokens under a path prefix. Keys starting with `$` are metadata
//! and are never treated as token names.
//!
//! ## Features
//!
//! - Leaf/branch token document model with metadata-key handling
//! - Depth-first flattening into ordered `(path, token)` lists
//! - Non-mutating deep merge for project override documents
//! - Typed value resolution: color (hex or component form), number, string
//! - Pure CSS custom-property and SCSS variable emitters
//!
//! ## Modules
//!
//! - [`token`] - Token document model and the leaf/branch predicate
//! - [`tree`] - Flattening and override merge
//! - [`resolve`] - Typed value resolution to target-format literals
//! - [`emit`] - CSS and SCSS output rendering

#[macro_use]
extern crate log;

/// CSS custom-property and SCSS variable emitters.
pub mod emit;

/// Typed token value resolution.
pub mod resolve;

/// Token document model.
pub mod token;

/// Tree flattening and override merge.
pub mod tree;

pub use token::{META_SIGIL, Token, TokenError, TokenTree, TokenType, is_leaf};
pub use tree::{FlatEntry, flatten, merge};
