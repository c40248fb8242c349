//! Path templates, operation ids and parameter lists

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

use super::types::{Parameter, ParameterLocation, ScalarType, Schema};
use crate::curl::ParsedRequest;

static BRACE_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}/]+)\}").expect("brace param regex is valid"));
static COLON_PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|/):([A-Za-z_][A-Za-z0-9_]*)").expect("colon param regex is valid")
});

/// Normalize a user supplied path template to brace style.
///
/// Accepts `{id}` and `:id` placeholders, and a full URL whose origin is dropped.
///
/// # Examples
/// ```
/// use curl2openapi::generation::parameters::normalize_path_template;
///
/// assert_eq!(normalize_path_template("/users/:id/posts/{postId}"), "/users/{id}/posts/{postId}");
/// assert_eq!(normalize_path_template("https://x.io/a/:b?c=1"), "/a/{b}");
/// ```
pub fn normalize_path_template(template: &str) -> String {
    let path = match url::Url::parse(template) {
        Ok(parsed) if parsed.has_host() => {
            // Url percent-encodes braces in the path, so cut the raw text instead
            let after_scheme = template.split_once("://").map_or(template, |(_, r)| r);
            after_scheme
                .find('/')
                .map_or("/", |idx| &after_scheme[idx..])
        }
        _ => template,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    COLON_PARAM_RE.replace_all(&path, "$1{$2}").into_owned()
}

/// Names of `{param}` placeholders in template order, without duplicates
pub fn path_parameter_names(path: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in BRACE_PARAM_RE.captures_iter(path) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Derive an operation id from method and path.
///
/// # Examples
/// ```
/// use curl2openapi::generation::parameters::generate_operation_id;
///
/// assert_eq!(generate_operation_id("POST", "/users"), "post_users");
/// assert_eq!(generate_operation_id("get", "/users/{id}/posts"), "get_users_id_posts");
/// ```
pub fn generate_operation_id(method: &str, path: &str) -> String {
    let segments = path
        .split('/')
        .map(|segment| segment.replace(['{', '}'], ""))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();
    format!("{}_{}", method.to_lowercase(), segments.join("_"))
        .trim_matches('_')
        .to_string()
}

/// Query parameters that are not also path parameters
pub fn filter_query_params(
    request: &ParsedRequest,
    path_params: &[String],
) -> IndexMap<String, String> {
    request
        .query_params
        .iter()
        .filter(|(key, _)| !path_params.contains(key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// A query value as documented: JSON arrays and objects are unpacked, anything
/// else stays the raw string
pub fn refine_query_value(raw: &str) -> JsonValue {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(parsed @ (JsonValue::Array(_) | JsonValue::Object(_))) => parsed,
        _ => JsonValue::String(raw.to_string()),
    }
}

fn query_schema(value: &JsonValue) -> Schema {
    match value {
        JsonValue::Array(items) => {
            let item = match items.first() {
                Some(JsonValue::Object(_) | JsonValue::Array(_)) | None => Schema::empty_object(),
                Some(JsonValue::Null) => Schema::nullable_string(),
                Some(scalar) => Schema::Scalar {
                    kind: ScalarType::of(scalar),
                    example: None,
                    nullable: false,
                },
            };
            Schema::Array {
                items: Box::new(item),
            }
        }
        JsonValue::Object(_) => Schema::empty_object(),
        _ => Schema::string(),
    }
}

/// Build the parameter list: path, then query, then header parameters.
///
/// Path parameters come from `url_template` when given, otherwise from brace
/// placeholders already present in `path`.
pub fn generate_parameters(
    request: &ParsedRequest,
    path: &str,
    url_template: Option<&str>,
) -> Vec<Parameter> {
    let template = url_template
        .map(normalize_path_template)
        .unwrap_or_else(|| path.to_string());
    let path_params = path_parameter_names(&template);

    let mut parameters: Vec<Parameter> = path_params
        .iter()
        .map(|name| Parameter {
            name: name.clone(),
            location: ParameterLocation::Path,
            required: true,
            schema: Schema::string(),
            example: None,
        })
        .collect();

    parameters.extend(
        filter_query_params(request, &path_params)
            .into_iter()
            .map(|(name, raw)| {
                let example = refine_query_value(&raw);
                Parameter {
                    name,
                    location: ParameterLocation::Query,
                    required: false,
                    schema: query_schema(&example),
                    example: Some(example),
                }
            }),
    );

    parameters.extend(request.headers.iter().map(|(name, value)| Parameter {
        name: name.clone(),
        location: ParameterLocation::Header,
        required: false,
        schema: Schema::string(),
        example: Some(JsonValue::String(value.clone())),
    }));

    parameters
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request_with(query: &[(&str, &str)], headers: &[(&str, &str)]) -> ParsedRequest {
        ParsedRequest {
            url: "https://x.io/users/42".to_string(),
            query_params: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_operation_id_is_deterministic_and_distinguishes_param_names() {
        assert_eq!(generate_operation_id("GET", "/"), "get");
        assert_eq!(generate_operation_id("GET", "/users/{id}"), "get_users_id");
        assert_eq!(generate_operation_id("GET", "/users/{userId}"), "get_users_userId");
        assert_eq!(generate_operation_id("delete", "//a//b/"), "delete_a_b");
    }

    #[test]
    fn test_normalize_path_template_variants() {
        assert_eq!(normalize_path_template("users/:id"), "/users/{id}");
        assert_eq!(normalize_path_template(":tenant/items"), "/{tenant}/items");
        assert_eq!(normalize_path_template("/v1/items:batch"), "/v1/items:batch");
        assert_eq!(normalize_path_template("https://x.io"), "/");
        assert_eq!(normalize_path_template("https://x.io/u/{id}"), "/u/{id}");
    }

    #[test]
    fn test_parameter_order_path_query_header() {
        let request = request_with(&[("verbose", "true"), ("id", "42")], &[("X-Tenant", "acme")]);
        let params = generate_parameters(&request, "/users/42", Some("/users/:id"));

        let summary: Vec<_> = params
            .iter()
            .map(|p| (p.name.as_str(), p.location, p.required))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id", ParameterLocation::Path, true),
                ("verbose", ParameterLocation::Query, false),
                ("X-Tenant", ParameterLocation::Header, false),
            ]
        );
        assert_eq!(params[2].example, Some(json!("acme")));
    }

    #[test]
    fn test_path_params_from_path_without_template() {
        let request = request_with(&[], &[]);
        let params = generate_parameters(&request, "/orgs/{org}/repos/{repo}", None);
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["org", "repo"]);
    }

    #[test]
    fn test_json_query_values_are_refined() {
        let request = request_with(
            &[("ids", "[1,2,3]"), ("filter", "{\"a\":1}"), ("n", "5"), ("s", "[oops")],
            &[],
        );
        let params = generate_parameters(&request, "/users", None);
        let as_json: Vec<_> = params
            .iter()
            .map(|p| serde_json::to_value(p).unwrap())
            .collect();

        assert_eq!(
            as_json[0],
            json!({
                "name": "ids",
                "in": "query",
                "required": false,
                "schema": { "type": "array", "items": { "type": "integer" } },
                "example": [1, 2, 3]
            })
        );
        assert_eq!(as_json[1]["schema"], json!({ "type": "object" }));
        assert_eq!(as_json[1]["example"], json!({ "a": 1 }));
        assert_eq!(as_json[2]["schema"], json!({ "type": "string" }));
        assert_eq!(as_json[2]["example"], json!("5"));
        assert_eq!(as_json[3]["example"], json!("[oops"));
    }
}
