//! Removes credentials and browser noise from a curl command before it is documented

use once_cell::sync::Lazy;
use regex::Regex;

/// Headers that never belong in generated documentation, matched case-insensitively
pub const DENIED_HEADERS: &[&str] = &[
    "authorization",
    "accept",
    "accept-encoding",
    "accept-language",
    "sec-fetch-dest",
    "sec-fetch-mode",
    "sec-fetch-site",
    "user-agent",
    "priority",
    "referer",
    "origin",
    "cookie",
    "connection",
    "cache-control",
    "pragma",
];

static DENIED_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    let names = DENIED_HEADERS
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    // The preceding boundary is captured so a quote closing the previous
    // word survives the replacement.
    Regex::new(&format!(
        r#"(^|[\s'"])(?:-H\s*|--header(?:\s+|=))(?:'(?i:{names})\s*:[^']*'|"(?i:{names})\s*:(?:[^"\\]|\\.)*"|(?i:{names}):\S*)"#
    ))
    .expect("denied header regex is valid")
});

static CONTINUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\r?\n").expect("continuation regex is valid"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));
static HEADER_FLAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+-H\s+").expect("header flag regex is valid"));

/// Strip denied headers and normalize whitespace.
///
/// Line continuations are joined before headers are matched so that a header
/// split across lines is removed on the first pass; this keeps the function
/// idempotent.
///
/// # Examples
/// ```
/// use curl2openapi::curl::sanitize;
///
/// let cleaned = sanitize("curl 'https://x.io' \\\n  -H 'Authorization: Bearer t' -H 'X-Id: 1'");
/// assert_eq!(cleaned, "curl 'https://x.io' -H 'X-Id: 1'");
/// ```
pub fn sanitize(command: &str) -> String {
    let joined = CONTINUATION_RE.replace_all(command, " ");
    // Adjacent matches share their boundary character, so repeat until stable
    let mut stripped = joined.into_owned();
    loop {
        let next = DENIED_HEADER_RE.replace_all(&stripped, "${1} ");
        if next == stripped {
            break;
        }
        stripped = next.into_owned();
    }
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    let normalized = HEADER_FLAG_RE.replace_all(&collapsed, " -H ");
    normalized.trim().to_string()
}
