//! Username extraction from profile URLs
//!
//! Profile links in platform exports come in a handful of shapes:
//!
//! - `https://www.instagram.com/name` (with or without a trailing slash)
//! - `https://instagram.com/name`
//! - `https://www.instagram.com/_u/name` (canonical profile id marker)
//! - `https://l.instagram.com/?u=<encoded url>` (redirect wrapper)
//!
//! Extraction never fails. Anything that cannot be resolved yields the empty
//! username, which callers filter out.

use crate::models::Username;
use crate::normalize::normalize;
use serde_json::Value;
use tracing::debug;
use url::{form_urlencoded, Url};

/// Host of the platform's outbound redirect wrapper.
pub const REDIRECT_HOST: &str = "l.instagram.com";

/// Query parameter carrying the wrapped destination URL.
pub const REDIRECT_PARAM: &str = "u";

/// Path marker that always precedes a username with nothing after it.
pub const PROFILE_ID_MARKER: &str = "/_u/";

/// Extract the normalized username from a profile URL.
pub fn extract_username(url: &str) -> Username {
    let url = url.trim();
    if url.is_empty() {
        return Username::empty();
    }

    let resolved = resolve_redirect(url);
    let working = resolved.as_deref().unwrap_or(url).trim_end_matches('/');

    if let Some(idx) = working.rfind(PROFILE_ID_MARKER) {
        return normalize(&working[idx + PROFILE_ID_MARKER.len()..]);
    }

    if has_empty_path(working) {
        return Username::empty();
    }

    let last = working.rsplit('/').next().unwrap_or_default();
    normalize(last)
}

/// Extract from an untyped JSON value; anything but a string yields the empty username.
pub fn extract_username_value(url: &Value) -> Username {
    match url {
        Value::String(s) => extract_username(s),
        _ => Username::empty(),
    }
}

/// Unwrap a redirect-wrapper URL into its destination.
///
/// The query is read leniently: everything after the first `?` up to any
/// `#`, so wrappers without a scheme still resolve. Returns `None` when there
/// is no non-blank destination, in which case the caller keeps the original
/// URL.
fn resolve_redirect(url: &str) -> Option<String> {
    if !url.contains(REDIRECT_HOST) || !url.contains("u=") {
        return None;
    }

    let query = url
        .split_once('?')
        .map(|(_, rest)| rest.split('#').next().unwrap_or_default())?;

    let destination = form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
        .find(|value| !value.trim().is_empty());

    if destination.is_none() {
        debug!("Redirect wrapper has no destination, keeping it as-is");
    }
    destination
}

/// True for absolute URLs such as `https://www.instagram.com` that carry no
/// path segment to take a username from.
fn has_empty_path(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed
            .path_segments()
            .map_or(true, |mut segments| segments.all(str::is_empty)),
        _ => false,
    }
}
