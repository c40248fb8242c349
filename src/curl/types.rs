//! Request model captured from a curl invocation

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// MIME type forced by `-F`/`--form`
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
/// Default MIME type for `-d`/`--data` bodies
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
/// MIME type of a raw body that parsed as JSON
pub const APPLICATION_JSON: &str = "application/json";
/// MIME type of a raw body that did not parse as JSON
pub const TEXT_PLAIN: &str = "text/plain";

/// Body payload carried by the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestData {
    /// Form fields, from `-F` or a url-encoded body
    Form(IndexMap<String, String>),
    /// A body that parsed as JSON
    Json(JsonValue),
    /// A raw body that could not be interpreted
    Text(String),
}

impl RequestData {
    /// True when the payload carries nothing worth documenting
    pub fn is_empty(&self) -> bool {
        match self {
            RequestData::Form(fields) => fields.is_empty(),
            RequestData::Json(JsonValue::Null) => true,
            RequestData::Json(JsonValue::Object(map)) => map.is_empty(),
            RequestData::Json(JsonValue::Array(items)) => items.is_empty(),
            RequestData::Json(JsonValue::String(text)) => text.is_empty(),
            RequestData::Json(_) => false,
            RequestData::Text(text) => text.is_empty(),
        }
    }

    /// JSON view of the payload, used as input to schema inference
    pub fn to_json(&self) -> JsonValue {
        match self {
            RequestData::Form(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
                    .collect(),
            ),
            RequestData::Json(value) => value.clone(),
            RequestData::Text(text) => JsonValue::String(text.clone()),
        }
    }
}

/// Structured request produced by [`crate::curl::CurlParser`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRequest {
    /// Upper-cased HTTP verb
    pub method: String,
    /// Origin plus path, query string removed
    pub url: String,
    /// Headers in encounter order, names as captured
    pub headers: IndexMap<String, String>,
    /// Decoded query parameters
    pub query_params: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RequestData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Default for ParsedRequest {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            headers: IndexMap::new(),
            query_params: IndexMap::new(),
            data: None,
            content_type: None,
        }
    }
}

impl ParsedRequest {
    /// Decoded path component of the captured URL
    pub fn path(&self) -> String {
        match url::Url::parse(&self.url) {
            // Url escapes `{` and `}`; decode so brace placeholders survive
            Ok(parsed) => percent_decode_str(parsed.path())
                .decode_utf8_lossy()
                .into_owned(),
            Err(_) => {
                // Not an absolute URL: strip anything that looks like scheme://host
                let without_scheme = self
                    .url
                    .split_once("://")
                    .map(|(_, rest)| rest)
                    .unwrap_or(&self.url);
                let path = if self.url.contains("://") {
                    without_scheme
                        .find('/')
                        .map(|idx| &without_scheme[idx..])
                        .unwrap_or("/")
                } else {
                    without_scheme
                };
                let path = path.split(['?', '#']).next().unwrap_or_default();
                if path.starts_with('/') {
                    path.to_string()
                } else {
                    format!("/{path}")
                }
            }
        }
    }
}
