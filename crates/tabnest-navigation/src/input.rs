//! Address input normalization
//!
//! Input that already names a scheme is kept verbatim. Anything else is
//! treated as a host (optionally with port, path, query) and gets the
//! default scheme prepended:
//!
//! - `example.com` → `https://example.com`
//! - `localhost:8080/x` → `https://localhost:8080/x`
//! - `::1` → `https://[::1]`

use std::net::IpAddr;

use url::Url;

pub const DEFAULT_SCHEME: &str = "https";

/// Schemes written without `//` that must not be mistaken for `host:port`.
const OPAQUE_SCHEMES: &[&str] = &[
    "about:",
    "data:",
    "file:",
    "blob:",
    "view-source:",
    "javascript:",
    "mailto:",
];

/// Normalize address-bar input into a location.
///
/// Returns `None` for blank input and for input that does not form a valid
/// URL (e.g. a host containing spaces). Callers treat both as a no-op.
pub fn normalize_location(input: &str, default_scheme: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let location = if has_explicit_scheme(input) {
        input.to_string()
    } else {
        let (host, rest) = split_host_and_rest(input);
        if is_bare_ipv6(host) {
            format!("{}://[{}]{}", default_scheme, host, rest)
        } else {
            format!("{}://{}{}", default_scheme, host, rest)
        }
    };

    Url::parse(&location).ok().map(|_| location)
}

fn has_explicit_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    if OPAQUE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return true;
    }

    match input.find("://") {
        Some(idx) if idx > 0 => {
            let scheme = &input[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// A host that parses as an IPv6 address but is not yet bracketed.
fn is_bare_ipv6(host: &str) -> bool {
    !host.starts_with('[') && matches!(host.parse::<IpAddr>(), Ok(IpAddr::V6(_)))
}

fn split_host_and_rest(input: &str) -> (&str, &str) {
    let mut cut = input.len();
    for ch in ['/', '?', '#'] {
        if let Some(idx) = input.find(ch) {
            if idx < cut {
                cut = idx;
            }
        }
    }

    input.split_at(cut)
}
