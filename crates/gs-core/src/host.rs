//! Host normalization
//!
//! Turns a bare host, a `host:port` pair or a full URL into the canonical
//! lowercase host the matcher compares against. Rule values go through the
//! same cleanup so both sides of every comparison agree.

use std::borrow::Cow;

use url::Url;

/// Error type for host normalization. Always local to one input line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("empty")]
    Empty,
    #[error("empty host after normalization")]
    EmptyHost,
    #[error("invalid host: {0:?}")]
    InvalidHost(String),
}

// =============================================================================
// Host Normalization
// =============================================================================

/// Normalize one input line to a canonical host.
pub fn normalize_host(input: &str) -> Result<String, NormalizeError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(NormalizeError::Empty);
    }

    if s.contains("://") {
        if let Some(host) = url_host(s) {
            return clean_host(&host);
        }
    } else if s.contains(['/', '?']) {
        // Path or query without a scheme
        if let Some(host) = url_host(&format!("http://{s}")) {
            return clean_host(&host);
        }
    }

    if let Some(host) = split_host_port(s) {
        return clean_host(host);
    }

    clean_host(s)
}

/// Host component of a URL without port or IPv6 brackets.
///
/// `Url` only validates the input; the host is cut from the authority as
/// written, since `host_str` rewrites IDNs, numeric IPv4 and percent-escapes
/// and would disagree with the bare-host path.
fn url_host(s: &str) -> Option<String> {
    let url = Url::parse(s).ok()?;
    if url.host_str().map_or(true, str::is_empty) {
        return None;
    }

    let authority = raw_authority(s)?;
    let host = split_host_port(authority).unwrap_or(authority);
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

/// Text between `://` and the first `/`, `?` or `#`, without `userinfo@`.
fn raw_authority(s: &str) -> Option<&str> {
    let start = s.find("://")? + 3;
    let rest = &s[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    Some(match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    })
}

/// Split `host:port` or `[v6]:port`. Returns `None` when there is no port
/// separator or the host part is ambiguous (bare IPv6).
pub fn split_host_port(s: &str) -> Option<&str> {
    if let Some(rest) = s.strip_prefix('[') {
        let close = rest.find(']')?;
        let after = &rest[close + 1..];
        if !after.starts_with(':') || after[1..].contains([':', '[', ']']) {
            return None;
        }
        let host = &rest[..close];
        if host.contains(['[', ']']) {
            return None;
        }
        return Some(host);
    }

    let colon = s.rfind(':')?;
    let host = &s[..colon];
    if host.contains([':', '[', ']']) || s[colon + 1..].contains([']', '[']) {
        return None;
    }
    Some(host)
}

fn clean_host(host: &str) -> Result<String, NormalizeError> {
    let lowered = host.trim().to_lowercase();
    let host = lowered.strip_suffix('.').unwrap_or(&lowered);
    if host.is_empty() {
        return Err(NormalizeError::EmptyHost);
    }
    if host.chars().any(char::is_whitespace) {
        return Err(NormalizeError::InvalidHost(host.to_string()));
    }
    Ok(host.to_string())
}

// =============================================================================
// Rule Values
// =============================================================================

/// Normalize a rule value the way hosts are normalized: trimmed, one trailing
/// dot removed, lowercased. Applies to regex sources too. Borrows when the
/// value is already in canonical form.
pub fn normalize_rule_value(value: &str) -> Cow<'_, str> {
    let trimmed = value.trim();
    let stripped = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if needs_lowercase(stripped) {
        Cow::Owned(stripped.to_lowercase())
    } else {
        Cow::Borrowed(stripped)
    }
}

fn needs_lowercase(s: &str) -> bool {
    if s.is_ascii() {
        return s.bytes().any(|b| b.is_ascii_uppercase());
    }
    s.chars().any(|c| {
        let mut lower = c.to_lowercase();
        !(lower.next() == Some(c) && lower.next().is_none())
    })
}
