//! Redirect destination cleanup.
//!
//! # Responsibilities
//! - Strip characters that have no business in a `Location` header
//! - Percent-encode spaces and non-ASCII text
//! - Reject destinations whose scheme is not on the allow-list
//!
//! # Design Decisions
//! - Output is the cleaned input, never a re-serialized URL, so a second pass
//!   returns the same string
//! - Relative destinations (`/path`, `?query`, `#anchor`) are accepted as-is
//! - Bare hosts such as `example.com/new` are assumed to be `http://`

use url::Url;

/// Schemes a destination may use.
const ALLOWED_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "gopher", "nntp", "feed", "telnet",
    "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

/// Clean a raw destination URL. An empty result means the destination is
/// unusable.
pub fn sanitize_destination(raw: &str) -> String {
    let raw = raw.trim();

    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == ' ' {
            cleaned.push_str("%20");
        } else if !c.is_ascii() {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                cleaned.push_str(&format!("%{byte:02X}"));
            }
        } else if is_url_safe(c) {
            cleaned.push(c);
        }
    }

    if cleaned.is_empty() {
        return cleaned;
    }

    if !cleaned.contains(':')
        && !cleaned.starts_with(['/', '#', '?'])
        && !is_php_script(&cleaned)
    {
        cleaned.insert_str(0, "http://");
    }

    if let Some(scheme) = scheme_of(&cleaned) {
        let scheme = scheme.to_ascii_lowercase();
        if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
            return String::new();
        }
        if (scheme == "http" || scheme == "https") && !has_host(&cleaned) {
            return String::new();
        }
    }

    cleaned
}

fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '~' | '+' | '_' | '.' | '?' | '#' | '=' | '!' | '&' | ';' | ',' | '/' | ':'
                | '%' | '@' | '$' | '|' | '*' | '\'' | '(' | ')' | '[' | ']'
        )
}

/// True for a relative `name.php` target such as `index.php?x=1`.
fn is_php_script(url: &str) -> bool {
    let name_len = url
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(url.len());
    name_len > 0
        && url[name_len..]
            .get(..4)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".php"))
}

/// The text before the first `:`, if the colon comes before any path, query
/// or fragment delimiter.
fn scheme_of(url: &str) -> Option<&str> {
    let end = url.find([':', '/', '?', '#'])?;
    if url[end..].starts_with(':') {
        Some(&url[..end])
    } else {
        None
    }
}

fn has_host(url: &str) -> bool {
    Url::parse(url)
        .map(|u| u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}
