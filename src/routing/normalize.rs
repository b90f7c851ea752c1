//! Request key normalization.
//!
//! # Responsibilities
//! - Turn a raw path or URL into the canonical request key used for matching
//! - Keep only path + query; scheme, host and fragment are discarded
//! - Signal unusable input with an empty key
//!
//! # Design Decisions
//! - Paths and queries are kept verbatim: no slash collapsing, no decoding,
//!   no dot-segment removal, for plain paths and absolute URLs alike
//! - `scheme://` inputs lose their authority; `scheme:` inputs lose the scheme
//! - The URL parser only decides validity of `scheme://` inputs
//! - Never fails: a URL that does not parse contributes an empty path

use url::Url;

/// Normalize `raw` into a canonical request key.
///
/// The result is either empty (the input is unusable and should be discarded)
/// or starts with `/`. Normalizing a key a second time returns it unchanged.
///
/// ```
/// use redirect_mapper::routing::normalize;
///
/// assert_eq!(normalize("old-page"), "/old-page");
/// assert_eq!(normalize("https://example.com/a?b=1"), "/a?b=1");
/// assert_eq!(normalize("   "), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let (path, query) = split_path_and_query(raw).unwrap_or(("", ""));

    let mut key = String::with_capacity(path.len() + query.len() + 2);
    if !path.starts_with('/') {
        key.push('/');
    }
    key.push_str(path);
    if !query.is_empty() {
        key.push('?');
        key.push_str(query);
    }
    key
}

/// Extract the path and raw query components of `raw`.
///
/// Returns `None` when an absolute URL cannot be parsed.
fn split_path_and_query(raw: &str) -> Option<(&str, &str)> {
    let rest = match strip_scheme(raw) {
        Some(rest) => match rest.strip_prefix("//") {
            Some(authority_and_path) => {
                Url::parse(raw).ok()?;
                let end = authority_and_path
                    .find(['/', '?', '#'])
                    .unwrap_or(authority_and_path.len());
                &authority_and_path[end..]
            }
            None => rest,
        },
        None => raw,
    };

    let without_fragment = rest.split_once('#').map_or(rest, |(head, _)| head);
    Some(without_fragment.split_once('?').unwrap_or((without_fragment, "")))
}

/// The part of `raw` after a leading `scheme:`, if there is one.
///
/// `host:port` shaped input (digits only after the colon) is not a scheme.
fn strip_scheme(raw: &str) -> Option<&str> {
    let (scheme, rest) = raw.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    };
    let port_like = !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit());
    (valid && !port_like).then_some(rest)
}
