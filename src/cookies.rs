//! Cookie store shared across endpoint executions.
//!
//! Two kinds of cookies exist:
//! - **Jar cookies** live in a [`ScopedJar`] keyed to the root host. They
//!   are cumulative: once set (by config, by an endpoint's `jar` list, or
//!   by a `Set-Cookie` response) they are sent on every later request to
//!   that host.
//! - **Request cookies** are attached to a single outbound request and
//!   never enter the jar.
//!
//! Cookies from the config are stored without a `Domain` attribute, which
//! makes them host-only. Cookies from responses may carry one, but a
//! `Domain` naming a public suffix (`co.uk`, `github.io`) is refused, so
//! nothing set by the root host reaches unrelated hosts under that suffix.

use std::sync::{Arc, LazyLock};

use http::HeaderValue;
use http::header::COOKIE;
use publicsuffix::{List, Psl};
use reqwest::cookie::{CookieStore as _, Jar};
use url::Url;

use crate::config::Cookie;
use crate::transport::HttpRequest;

#[cfg(test)]
#[path = "cookies_tests.rs"]
mod tests;

static PUBLIC_SUFFIXES: LazyLock<List> = LazyLock::new(|| {
    List::from_bytes(include_bytes!("../data/public_suffix_list.dat")).unwrap_or_else(|e| {
        tracing::warn!("Public suffix list unusable, treating every TLD as a suffix: {e}");
        List::new()
    })
});

/// Returns true if `domain` is itself a public suffix.
fn is_public_suffix(domain: &str) -> bool {
    PUBLIC_SUFFIXES
        .suffix(domain.as_bytes())
        .is_some_and(|suffix| suffix.as_bytes() == domain.as_bytes())
}

/// Extracts the effective `Domain` attribute of a `Set-Cookie` line.
///
/// The last occurrence wins; a leading dot is ignored.
fn domain_attribute(set_cookie: &str) -> Option<String> {
    set_cookie
        .split(';')
        .skip(1)
        .filter_map(|attribute| {
            let (key, value) = attribute.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("domain")
                .then(|| value.trim().trim_start_matches('.').to_ascii_lowercase())
        })
        .last()
        .filter(|domain| !domain.is_empty())
}

/// Cookie jar that refuses cookies scoped to a public suffix.
///
/// Everything else, including host and path matching and expiry, is left
/// to the wrapped [`reqwest::cookie::Jar`].
#[derive(Debug, Default)]
pub struct ScopedJar {
    inner: Jar,
}

impl ScopedJar {
    fn accepts(header: &HeaderValue, url: &Url) -> bool {
        let Some(domain) = header.to_str().ok().and_then(domain_attribute) else {
            return true;
        };

        if is_public_suffix(&domain) {
            tracing::debug!(%url, %domain, "Refusing cookie scoped to a public suffix");
            return false;
        }
        true
    }
}

impl reqwest::cookie::CookieStore for ScopedJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let mut accepted = cookie_headers.filter(|header| Self::accepts(header, url));
        self.inner.set_cookies(&mut accepted, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.inner.cookies(url)
    }
}

/// Persistent cookie jar keyed to the root URL.
///
/// Cloning is cheap and every clone shares the same jar, which is how the
/// transport sees cookies set here and vice versa.
#[derive(Debug, Clone)]
pub struct CookieStore {
    jar: Arc<ScopedJar>,
    root: Url,
}

impl CookieStore {
    /// Creates an empty store scoped to `root`.
    #[must_use]
    pub fn new(root: Url) -> Self {
        Self {
            jar: Arc::new(ScopedJar::default()),
            root,
        }
    }

    /// Returns the shared jar, for use as the HTTP client's cookie provider.
    #[must_use]
    pub fn jar(&self) -> Arc<ScopedJar> {
        Arc::clone(&self.jar)
    }

    /// Merges cookies into the jar as host-only cookies, overwriting
    /// existing ones by name.
    pub fn set_jar_cookies(&self, cookies: &[Cookie]) {
        for cookie in cookies {
            self.jar.inner.add_cookie_str(&render_pair(cookie), &self.root);
        }
    }

    /// Returns the `Cookie` header value the jar would send to `url`.
    #[must_use]
    pub fn jar_header(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Attaches cookies to one request without touching the jar.
    ///
    /// The resulting `Cookie` header holds, in order, any `Cookie` header
    /// already on the request, the jar cookies for the request URL, and
    /// `cookies`. Once a request carries an explicit `Cookie` header the
    /// transport no longer adds jar cookies on its own, so they are folded
    /// in here.
    pub fn attach_request_cookies(&self, request: &mut HttpRequest, cookies: &[Cookie]) {
        let existing = request
            .headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if cookies.is_empty() && existing.is_none() {
            return;
        }

        let parts: Vec<String> = existing
            .into_iter()
            .chain(self.jar_header(&request.url))
            .chain(cookies.iter().map(render_pair))
            .collect();

        match HeaderValue::from_str(&parts.join("; ")) {
            Ok(value) => {
                request.headers.insert(COOKIE, value);
            }
            Err(e) => tracing::warn!("Dropping request cookies: {e}"),
        }
    }
}

/// Renders `name=value` with nothing that could end the pair early.
///
/// `;` would start attributes (`Domain`, `Path`) when the pair is parsed as
/// a `Set-Cookie` line, and control characters cannot appear in a header.
fn render_pair(cookie: &Cookie) -> String {
    cookie
        .pair()
        .chars()
        .filter(|c| *c != ';' && !c.is_control())
        .collect()
}
