//! Configuration file parsing.
//!
//! Defines the on-disk structure of the configuration with serde. JSON is the
//! primary format; files with a `.toml` extension are parsed as TOML into the
//! same structure.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure as written in the file.
///
/// Everything is optional at this stage; [`super::ValidatedConfig`] decides
/// what is required.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL every endpoint path is appended to
    pub root: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,

    /// Cookies placed in the jar at startup
    #[serde(default)]
    pub jar: Vec<CookieEntry>,

    /// Endpoints, executed in declaration order
    #[serde(default)]
    pub endpoints: Vec<EndpointEntry>,

    /// Directory receiving one exported body per endpoint
    pub save_response_dir: Option<String>,
}

/// One endpoint as written in the file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EndpointEntry {
    /// Task name, used in logs and export file names
    #[serde(default)]
    pub name: String,

    /// Path appended verbatim to the root URL
    #[serde(default)]
    pub path: String,

    /// HTTP method
    #[serde(default)]
    pub method: String,

    /// Endpoint headers, overriding the global ones
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,

    /// Cookies attached to this request only
    #[serde(default)]
    pub cookies: Vec<CookieEntry>,

    /// Cookies added to the shared jar before this request
    #[serde(default)]
    pub jar: Vec<CookieEntry>,

    /// Request body; `null` and absent both mean "no body"
    #[serde(default)]
    pub body: Option<serde_json::Value>,

    /// Accepted status codes; absent or empty accepts anything
    pub accept_status: Option<Vec<u16>>,

    /// Explicit export path for this response
    pub save_response: Option<String>,

    /// JSON Schema location the response body must satisfy
    pub schema: Option<String>,
}

/// A `{ key, value }` header pair.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderEntry {
    /// Header name
    #[serde(default)]
    pub key: String,
    /// Header value
    #[serde(default)]
    pub value: String,
}

/// A `{ name, value }` cookie pair.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CookieEntry {
    /// Cookie name
    #[serde(default)]
    pub name: String,
    /// Cookie value
    #[serde(default)]
    pub value: String,
}

impl ConfigFile {
    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::parse_toml(&content)
        } else {
            Self::parse_json(&content)
        }
    }

    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or has unknown fields.
    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or has unknown fields.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a sample configuration file.
#[must_use]
pub fn default_config_template() -> String {
    r#"{
  "root": "https://api.example.com",
  "headers": [
    { "key": "Accept", "value": "application/json" }
  ],
  "jar": [],
  "saveResponseDir": "responses",
  "endpoints": [
    {
      "name": "health",
      "path": "/health",
      "method": "GET",
      "acceptStatus": [200]
    },
    {
      "name": "create-item",
      "path": "/items",
      "method": "POST",
      "headers": [
        { "key": "X-Request-Source", "value": "visor" }
      ],
      "cookies": [
        { "name": "session", "value": "replace-me" }
      ],
      "body": { "name": "example" },
      "acceptStatus": [200, 201],
      "saveResponse": "responses/items/created.json"
    }
  ]
}
"#
    .to_string()
}
