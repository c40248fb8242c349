//! Curl command line parser
//!
//! Turns the text of a curl invocation into a [`ParsedRequest`]. The command is
//! split into words with a small regex lexer that understands single quotes,
//! double quotes (with `\"` and `\\` escapes), ANSI-C `$'...'` quoting and
//! backslash-newline continuations. Nothing else of the shell grammar is
//! modelled: unbalanced quotes, variable expansion and command substitution are
//! handled on a best-effort basis only.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::types::{
    APPLICATION_JSON, FORM_URLENCODED, MULTIPART_FORM_DATA, ParsedRequest, RequestData, TEXT_PLAIN,
};
use crate::generation::GenerationError;

/// One shell word, possibly built from several adjacent quoted segments
static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:\$'(?:[^'\\]|\\.)*'|'[^']*'|"(?:[^"\\]|\\.)*"|[^\s'"])+"#)
        .expect("word regex is valid")
});

/// The quoted or bare segments a word is made of
static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\$'((?:[^'\\]|\\.)*)'|'([^']*)'|"((?:[^"\\]|\\.)*)"|([^\s'"]+)"#)
        .expect("segment regex is valid")
});

static CONTINUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\r?\n").expect("continuation regex is valid"));

/// Flags whose next word is their argument and must not be taken for the URL
const VALUE_FLAGS: &[&str] = &[
    "-A",
    "--user-agent",
    "-b",
    "--cookie",
    "-c",
    "--cookie-jar",
    "--cacert",
    "--cert",
    "--connect-timeout",
    "-e",
    "--referer",
    "-E",
    "--interface",
    "-K",
    "--config",
    "--key",
    "--limit-rate",
    "-m",
    "--max-time",
    "--max-redirs",
    "-o",
    "--output",
    "--proto",
    "-r",
    "--range",
    "--resolve",
    "--retry",
    "-T",
    "--upload-file",
    "-u",
    "--user",
    "-w",
    "--write-out",
    "-x",
    "--proxy",
];

/// Body flag categories, in increasing precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFlag {
    Raw,
    UrlEncoded,
    Form,
}

impl BodyFlag {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "-F" | "--form" | "--form-string" => Some(BodyFlag::Form),
            "-d" | "--data" | "--data-ascii" | "--data-urlencode" => Some(BodyFlag::UrlEncoded),
            "--data-raw" | "--data-binary" => Some(BodyFlag::Raw),
            _ => None,
        }
    }
}

/// Everything collected from one pass over the words of a command
#[derive(Debug, Default)]
struct RawCommand {
    method: Option<String>,
    explicit_url: Option<String>,
    positional_url: Option<String>,
    headers: IndexMap<String, String>,
    form_fields: Vec<String>,
    data_chunks: Vec<String>,
    raw_chunks: Vec<String>,
}

impl RawCommand {
    fn push_body(&mut self, kind: BodyFlag, value: String) {
        match kind {
            BodyFlag::Form => self.form_fields.push(value),
            BodyFlag::UrlEncoded => self.data_chunks.push(value),
            BodyFlag::Raw => self.raw_chunks.push(value),
        }
    }

    fn push_header(&mut self, raw: &str) {
        let Some((name, value)) = raw.split_once(':') else {
            debug!(header = %raw, "Ignoring header without a name/value separator");
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.headers
            .insert(name.to_string(), value.trim_start().to_string());
    }

    fn has_body(&self) -> bool {
        !(self.form_fields.is_empty() && self.data_chunks.is_empty() && self.raw_chunks.is_empty())
    }
}

/// Parser for curl command lines
#[derive(Debug, Default, Clone, Copy)]
pub struct CurlParser;

impl CurlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a curl command into a structured request
    pub fn parse(&self, command: &str) -> Result<ParsedRequest, GenerationError> {
        let words = split_words(command);
        let start = words
            .iter()
            .position(|w| w == "curl" || w.ends_with("/curl"))
            .ok_or_else(|| {
                GenerationError::malformed_input("command does not look like a curl invocation")
            })?;

        let raw = collect(&words[start + 1..]);
        let url_token = raw
            .explicit_url
            .clone()
            .or_else(|| raw.positional_url.clone())
            .ok_or_else(|| GenerationError::malformed_input("no URL found in curl command"))?;

        let mut request = ParsedRequest {
            headers: raw.headers.clone(),
            ..Default::default()
        };

        match url::Url::parse(&url_token) {
            Ok(parsed) => {
                request.url = format!("{}{}", parsed.origin().ascii_serialization(), parsed.path());
                request.query_params = parsed
                    .query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect();
            }
            Err(e) => {
                debug!(url = %url_token, error = %e, "URL is not absolute, keeping it verbatim");
                request.url = url_token;
            }
        }

        request.content_type = request
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.clone());

        apply_body(&raw, &mut request);

        request.method = match &raw.method {
            Some(method) => method.to_uppercase(),
            None if raw.has_body() => "POST".to_string(),
            None => "GET".to_string(),
        };

        debug!(
            method = %request.method,
            url = %request.url,
            content_type = ?request.content_type,
            "Parsed curl command"
        );
        Ok(request)
    }
}

/// Split command text into dequoted shell words
fn split_words(command: &str) -> Vec<String> {
    let joined = CONTINUATION_RE.replace_all(command, " ");
    WORD_RE
        .find_iter(&joined)
        .map(|word| {
            SEGMENT_RE
                .captures_iter(word.as_str())
                .map(|caps| {
                    if let Some(ansi) = caps.get(1) {
                        unescape(ansi.as_str(), true)
                    } else if let Some(single) = caps.get(2) {
                        single.as_str().to_string()
                    } else if let Some(double) = caps.get(3) {
                        unescape(double.as_str(), false)
                    } else {
                        caps.get(4).map(|m| m.as_str()).unwrap_or_default().to_string()
                    }
                })
                .collect::<String>()
        })
        .collect()
}

/// Resolve backslash escapes. Double quotes only escape `"`, `\`, `$` and backtick;
/// ANSI-C strings additionally understand the usual control characters.
fn unescape(input: &str, ansi_c: bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(c @ ('"' | '\\' | '$' | '`')) => out.push(c),
            Some('\'') if ansi_c => out.push('\''),
            Some('n') if ansi_c => out.push('\n'),
            Some('t') if ansi_c => out.push('\t'),
            Some('r') if ansi_c => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Walk the words following `curl` and sort them into flags and arguments
fn collect(words: &[String]) -> RawCommand {
    let mut raw = RawCommand::default();
    let mut iter = words.iter();

    while let Some(word) = iter.next() {
        if !word.starts_with('-') || word == "-" {
            if raw.positional_url.is_none() {
                raw.positional_url = Some(word.clone());
            }
            continue;
        }

        // `--flag=value` and `-Xvalue` spellings carry their argument inline
        let (flag, inline) = split_inline(word);
        let mut value = || inline.clone().or_else(|| iter.next().cloned());

        match flag {
            "-X" | "--request" => {
                if let Some(method) = value() {
                    raw.method = Some(method);
                }
            }
            "-H" | "--header" => {
                if let Some(header) = value() {
                    raw.push_header(&header);
                }
            }
            "--url" => {
                if let Some(url) = value() {
                    raw.explicit_url.get_or_insert(url);
                }
            }
            _ => {
                if let Some(kind) = BodyFlag::from_flag(flag) {
                    if let Some(body) = value() {
                        raw.push_body(kind, body);
                    }
                } else if VALUE_FLAGS.contains(&flag) {
                    value();
                }
            }
        }
    }

    raw
}

fn split_inline(word: &str) -> (&str, Option<String>) {
    if let Some(long) = word.strip_prefix("--") {
        return match long.split_once('=') {
            Some((name, value)) => (&word[..name.len() + 2], Some(value.to_string())),
            None => (word, None),
        };
    }
    for short in ["-X", "-H", "-d", "-F"] {
        if let Some(rest) = word.strip_prefix(short) {
            if !rest.is_empty() {
                return (short, Some(rest.to_string()));
            }
        }
    }
    (word, None)
}

/// Decide `data` and `contentType` from the highest-precedence body flags present
fn apply_body(raw: &RawCommand, request: &mut ParsedRequest) {
    if !raw.form_fields.is_empty() {
        let fields = raw
            .form_fields
            .iter()
            .map(|field| match field.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (field.clone(), String::new()),
            })
            .collect();
        request.content_type = Some(MULTIPART_FORM_DATA.to_string());
        request.data = Some(RequestData::Form(fields));
        return;
    }

    if !raw.data_chunks.is_empty() {
        let body = raw.data_chunks.join("&");
        if declares(request.content_type.as_deref(), "json") {
            if let Ok(json) = serde_json::from_str::<JsonValue>(&body) {
                request.data = Some(RequestData::Json(json));
                return;
            }
        }
        request
            .content_type
            .get_or_insert_with(|| FORM_URLENCODED.to_string());
        request.data = Some(RequestData::Form(parse_urlencoded(&body)));
        return;
    }

    if !raw.raw_chunks.is_empty() {
        let body = raw.raw_chunks.join("&");
        if declares(request.content_type.as_deref(), FORM_URLENCODED) {
            request.data = Some(RequestData::Form(parse_urlencoded(&body)));
            return;
        }
        match serde_json::from_str::<JsonValue>(&body) {
            Ok(json) => {
                request.data = Some(RequestData::Json(json));
                request.content_type = Some(APPLICATION_JSON.to_string());
            }
            Err(e) => {
                debug!(error = %e, "Raw body is not JSON, keeping it as text");
                request.data = Some(RequestData::Text(body));
                request.content_type = Some(TEXT_PLAIN.to_string());
            }
        }
    }
}

fn declares(content_type: Option<&str>, needle: &str) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains(needle))
}

/// Parse `k=v&k2=v2`, percent-decoding keys and values
pub fn parse_urlencoded(body: &str) -> IndexMap<String, String> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}
