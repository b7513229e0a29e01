//! Validated configuration.
//!
//! This module contains the final, validated configuration that is used
//! by the runner. All validation is performed during construction, so the
//! execution path never re-checks required fields or the root URL.

use std::fmt;
use std::path::{Path, PathBuf};

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;

use super::ConfigError;
use super::defaults;
use super::file::{ConfigFile, CookieEntry, EndpointEntry, HeaderEntry};

/// A named cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
}

impl Cookie {
    /// Creates a cookie from a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Renders the cookie as a `name=value` pair.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// One validated endpoint definition.
///
/// Immutable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Task name, used for logging and export file names.
    /// Not required to be unique.
    pub name: String,

    /// Path appended verbatim to the root URL
    pub path: String,

    /// HTTP method (one of [`defaults::METHODS`])
    pub method: Method,

    /// Endpoint headers, applied over the global headers
    pub headers: HeaderMap,

    /// Cookies attached to this request only
    pub cookies: Vec<Cookie>,

    /// Cookies merged into the shared jar before this request
    pub jar: Vec<Cookie>,

    /// Request body, `None` when absent
    pub body: Option<serde_json::Value>,

    /// Accepted status codes; empty accepts any status
    pub accept_status: Vec<u16>,

    /// Explicit export path for the response body
    pub save_response: Option<PathBuf>,

    /// JSON Schema location the response body must satisfy
    pub schema: Option<String>,
}

impl Endpoint {
    /// Creates an endpoint with no headers, cookies, body or checks.
    #[must_use]
    pub fn new(name: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method,
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            jar: Vec::new(),
            body: None,
            accept_status: Vec::new(),
            save_response: None,
            schema: None,
        }
    }
}

/// Fully validated configuration ready for use by the runner.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Root URL exactly as written; endpoint URLs are `root + path`
    pub root: String,

    /// Parsed root URL, used to scope the cookie jar
    pub root_url: Url,

    /// Headers sent with every request
    pub headers: HeaderMap,

    /// Cookies placed in the jar at startup
    pub jar: Vec<Cookie>,

    /// Endpoints in execution order (never empty)
    pub endpoints: Vec<Endpoint>,

    /// Directory receiving exported bodies for endpoints without their own path
    pub save_response_dir: Option<PathBuf>,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let save_dir = self
            .save_response_dir
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string());

        write!(
            f,
            "Config {{ root: {}, endpoints: {}, headers: {}, jar: {}, save_response_dir: {} }}",
            self.root,
            self.endpoints.len(),
            self.headers.len(),
            self.jar.len(),
            save_dir,
        )
    }
}

impl ValidatedConfig {
    /// Validates a parsed configuration file.
    ///
    /// Field checks run first; the root URL is checked last so that a
    /// malformed root is reported separately from missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `root` is missing or empty
    /// - there are no endpoints
    /// - an endpoint lacks a name or path, or uses an unsupported method
    /// - a header or cookie has an empty or invalid name/value
    /// - `root` is not an absolute URL with a scheme and host
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let root = file
            .root
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ConfigError::missing("root"))?;

        if file.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        let headers = build_headers(&file.headers, "headers")?;
        let jar = build_cookies(&file.jar, "jar")?;

        let endpoints = file
            .endpoints
            .into_iter()
            .enumerate()
            .map(|(index, entry)| build_endpoint(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let root_url = parse_root(&root)?;

        Ok(Self {
            root,
            root_url,
            headers,
            jar,
            endpoints,
            save_response_dir: file
                .save_response_dir
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Loads and validates configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file(ConfigFile::load(path)?)
    }
}

/// Writes the sample configuration to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::file::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn build_endpoint(index: usize, entry: EndpointEntry) -> Result<Endpoint, ConfigError> {
    let location = format!("endpoints[{index}]");

    if entry.name.is_empty() {
        return Err(ConfigError::missing(format!("{location}.name")));
    }
    if entry.path.is_empty() {
        return Err(ConfigError::missing(format!("{location}.path")));
    }

    let method = parse_method(&entry.name, &entry.method)?;
    let headers = build_headers(&entry.headers, &format!("{location}.headers"))?;
    let cookies = build_cookies(&entry.cookies, &format!("{location}.cookies"))?;
    let jar = build_cookies(&entry.jar, &format!("{location}.jar"))?;

    Ok(Endpoint {
        name: entry.name,
        path: entry.path,
        method,
        headers,
        cookies,
        jar,
        body: entry.body,
        accept_status: entry.accept_status.unwrap_or_default(),
        save_response: entry
            .save_response
            .filter(|p| !p.is_empty())
            .map(PathBuf::from),
        schema: entry.schema.filter(|s| !s.is_empty()),
    })
}

fn parse_method(endpoint: &str, method: &str) -> Result<Method, ConfigError> {
    if !defaults::METHODS.contains(&method) {
        return Err(ConfigError::InvalidMethod {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        });
    }

    method
        .parse::<Method>()
        .map_err(|_| ConfigError::InvalidMethod {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        })
}

fn build_headers(entries: &[HeaderEntry], location: &str) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    for (index, entry) in entries.iter().enumerate() {
        if entry.key.is_empty() {
            return Err(ConfigError::missing(format!("{location}[{index}].key")));
        }
        if entry.value.is_empty() {
            return Err(ConfigError::missing(format!("{location}[{index}].value")));
        }

        let name = parse_header_name(&entry.key)?;
        let value = parse_header_value(&entry.key, &entry.value)?;
        headers.insert(name, value);
    }

    Ok(headers)
}

fn build_cookies(entries: &[CookieEntry], location: &str) -> Result<Vec<Cookie>, ConfigError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            if entry.name.is_empty() {
                return Err(ConfigError::missing(format!("{location}[{index}].name")));
            }
            if entry.value.is_empty() {
                return Err(ConfigError::missing(format!("{location}[{index}].value")));
            }
            check_cookie(entry, &format!("{location}[{index}]"))?;
            Ok(Cookie::new(entry.name.clone(), entry.value.clone()))
        })
        .collect()
}

/// Rejects names that are not HTTP tokens and values carrying `"`, `;`,
/// `\` or non-printable characters.
fn check_cookie(entry: &CookieEntry, location: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidCookie {
        location: location.to_string(),
        reason,
    };

    if let Some(c) = entry.name.chars().find(|c| !is_token_char(*c)) {
        return Err(invalid(format!("name contains {c:?}")));
    }
    if let Some(c) = entry.value.chars().find(|c| !is_value_char(*c)) {
        return Err(invalid(format!("value contains {c:?}")));
    }
    Ok(())
}

const fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic()
        && !matches!(
            c,
            '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?'
                | '=' | '{' | '}'
        )
}

const fn is_value_char(c: char) -> bool {
    (c.is_ascii_graphic() || c == ' ') && !matches!(c, '"' | ';' | '\\')
}

fn parse_root(root: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidRoot {
        url: root.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(root).map_err(|e| invalid(&e.to_string()))?;

    if url.scheme().is_empty() {
        return Err(invalid("invalid scheme"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("invalid absolute host"));
    }

    Ok(url)
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
