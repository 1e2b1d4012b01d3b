//! # figma-vars
//!
//! Wire types and a minimal blocking client for the Figma variables REST API.
//!
//! The crate covers exactly the two endpoints the token pipeline needs:
//!
//! - `GET /v1/files/:file_key/variables/local` — fetch the variable and
//!   collection set as a read-only snapshot;
//! - `POST /v1/files/:file_key/variables` — submit a batch of variable
//!   creations and per-mode value updates.
//!
//! Each call is a single request/response with no retry; a non-success
//! response surfaces as [`ApiError::Status`] carrying status and body, which
//! callers treat as fatal for the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use figma_vars::Client;
//!
//! let client = Client::new("FILE_KEY", "figd_...");
//! let snapshot = client.local_variables().unwrap();
//! for collection in snapshot.meta.variable_collections.values() {
//!     println!("{} ({} modes)", collection.name, collection.modes.len());
//! }
//! ```

#[macro_use]
extern crate log;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ureq::Agent;

const API_BASE: &str = "https://api.figma.com/v1";
const AUTH_HEADER: &str = "X-Figma-Token";

/// Errors returned by the variables API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("figma api returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Transport-level failure (DNS, TLS, timeout, malformed body).
    #[error(transparent)]
    Transport(#[from] ureq::Error),
}

/// Response of `GET /v1/files/:file_key/variables/local`.
#[derive(Debug, Clone, Deserialize)]
pub struct VariablesResponse {
    pub meta: VariablesMeta,
}

/// Variable and collection set keyed by id.
#[derive(Debug, Clone, Deserialize)]
pub struct VariablesMeta {
    pub variables: HashMap<String, Variable>,
    #[serde(rename = "variableCollections")]
    pub variable_collections: HashMap<String, VariableCollection>,
}

/// One remote variable.
///
/// `values_by_mode` holds raw JSON values: colors arrive as `{r,g,b,a}`
/// objects, aliases as `{type: "VARIABLE_ALIAS", id}` references.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    pub variable_collection_id: String,
    /// Resolved value type, e.g. `COLOR`, `FLOAT`, `STRING`, `BOOLEAN`.
    pub resolved_type: String,
    #[serde(default)]
    pub values_by_mode: HashMap<String, Value>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// A grouping of variables sharing a set of modes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    pub id: String,
    pub name: String,
    /// Mode id to human-readable mode name.
    #[serde(default)]
    pub modes: HashMap<String, String>,
    #[serde(default)]
    pub default_mode_id: Option<String>,
}

/// Color value on the wire, each channel in `0..1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

/// A variable creation carried in the POST payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCreate {
    pub name: String,
    pub variable_collection_id: String,
    pub resolved_type: String,
    pub values_by_mode: BTreeMap<String, Color>,
}

/// One per-mode value update for an existing variable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableModeValue {
    pub variable_id: String,
    pub mode_id: String,
    pub value: Color,
}

/// Body of `POST /v1/files/:file_key/variables`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VariablesPayload {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableCreate>,
    #[serde(rename = "variableModeValues", skip_serializing_if = "Vec::is_empty")]
    pub variable_mode_values: Vec<VariableModeValue>,
}

impl VariablesPayload {
    /// True when the payload would change nothing remotely.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.variable_mode_values.is_empty()
    }
}

/// Blocking client for the variables endpoints of one Figma file.
pub struct Client {
    agent: Agent,
    file_key: String,
    token: String,
}

impl Client {
    /// Create a client for the given file key and personal access token.
    pub fn new(file_key: impl Into<String>, token: impl Into<String>) -> Self {
        // status handling is done manually so error messages can carry
        // the response body
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        Self {
            agent: config.new_agent(),
            file_key: file_key.into(),
            token: token.into(),
        }
    }

    /// Fetch the local variable set of the file.
    pub fn local_variables(&self) -> Result<VariablesResponse, ApiError> {
        let url = format!("{API_BASE}/files/{}/variables/local", self.file_key);
        debug!("GET {url}");
        let mut response = self
            .agent
            .get(&url)
            .header(AUTH_HEADER, &self.token)
            .call()?;
        Self::check(&mut response)?;
        Ok(response.body_mut().read_json::<VariablesResponse>()?)
    }

    /// Submit a create/update batch. The success body is opaque and dropped.
    pub fn post_variables(&self, payload: &VariablesPayload) -> Result<(), ApiError> {
        let url = format!("{API_BASE}/files/{}/variables", self.file_key);
        debug!("POST {url}");
        let mut response = self
            .agent
            .post(&url)
            .header(AUTH_HEADER, &self.token)
            .send_json(payload)?;
        Self::check(&mut response)?;
        Ok(())
    }

    fn check(response: &mut ureq::http::Response<ureq::Body>) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
