//! Application context, paths and token file I/O.
//!
//! [`AppContext`] holds the token directory layout and provides the file
//! plumbing every command shares. Token documents are read fresh at the
//! start of each run; nothing is cached across runs. Output files are
//! written in one whole-file replace.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use tokenkit::TokenTree;

use crate::utils;

/// Figma API credentials loaded from `tokens/.env`.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Personal access token.
    pub token: String,
    /// Key of the Figma file holding the variable collections.
    pub file_key: String,
}

/// Token directory layout rooted at `--tokens-dir`.
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Root directory holding `base/`, `alias/` and `dist/`.
    pub tokens: PathBuf,
}

impl PathConfig {
    /// Directory of base-tier token files.
    pub fn base_dir(&self) -> PathBuf {
        self.tokens.join("base")
    }

    /// Directory of alias-tier token files.
    pub fn alias_dir(&self) -> PathBuf {
        self.tokens.join("alias")
    }

    /// Output directory for the generated CSS/SCSS files.
    pub fn dist_dir(&self) -> PathBuf {
        self.tokens.join("dist")
    }

    /// Credential file path.
    pub fn env_file(&self) -> PathBuf {
        self.tokens.join(".env")
    }
}

/// The main application context shared by all commands.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Token directory layout.
    pub paths: PathConfig,
}

impl AppContext {
    /// Create a context rooted at the given token directory.
    pub fn new(tokens_dir: PathBuf) -> Self {
        Self {
            paths: PathConfig { tokens: tokens_dir },
        }
    }

    /// Read a token document, treating a missing file as "no tokens of this
    /// kind".
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn read_optional_tree(&self, path: &Path) -> anyhow::Result<Option<TokenTree>> {
        if !path.exists() {
            debug!("token file not found, skipping: {}", path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let tree: TokenTree = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(tree))
    }

    /// Read a token document that must exist.
    pub fn read_required_tree(&self, path: &Path) -> anyhow::Result<TokenTree> {
        self.read_optional_tree(path)?
            .ok_or_else(|| anyhow!("token file not found: {}", path.display()))
    }

    /// Write a generated file, creating parent directories on demand.
    pub fn write_output(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        println!("{}", format!("✓ Generated: {}", path.display()).green());
        Ok(())
    }

    /// Load Figma credentials from the token directory's `.env` file.
    ///
    /// # Errors
    ///
    /// A missing env file or missing key is fatal for sync commands.
    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        let path = self.paths.env_file();
        let content = fs::read_to_string(&path).map_err(|_| {
            anyhow!(
                "{} not found\nCreate it with FIGMA_TOKEN and FIGMA_FILE_KEY",
                path.display()
            )
        })?;
        let env = utils::parse_env_file(&content);
        let fetch = |key: &str| {
            env.get(key).cloned().ok_or_else(|| {
                anyhow!("{key} must be set in {}", path.display())
            })
        };
        Ok(Credentials {
            token: fetch("FIGMA_TOKEN")?,
            file_key: fetch("FIGMA_FILE_KEY")?,
        })
    }
}
