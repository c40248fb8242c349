//! Assembles a single-operation OpenAPI document from a captured request

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use super::errors::GenerationError;
use super::parameters::{
    filter_query_params, generate_operation_id, generate_parameters, normalize_path_template,
    path_parameter_names, refine_query_value,
};
use super::schema::infer_schema;
use super::types::{
    Document, MediaType, OpenApiOptions, Operation, PathItem, RequestBody, Response, Schema,
    SchemaRegistry,
};
use super::utils::capitalize;
use crate::curl::parser::parse_urlencoded;
use crate::curl::{APPLICATION_JSON, FORM_URLENCODED, ParsedRequest, RequestData};

/// Generates OpenAPI documents for captured requests
#[derive(Debug, Clone, Default)]
pub struct DocumentGenerator {
    options: OpenApiOptions,
}

impl DocumentGenerator {
    pub fn new(options: OpenApiOptions) -> Self {
        Self { options }
    }

    /// Build the document for `request`, documenting `response` as its `200` body
    pub fn generate(
        &self,
        request: &ParsedRequest,
        response: &JsonValue,
    ) -> Result<Document, GenerationError> {
        let (path, operation_id) = self.resolve_operation(request);
        let method = request.method.to_lowercase();
        let prefix = capitalize(&operation_id);
        debug!(%path, %method, %operation_id, "Resolved operation");

        let mut registry = SchemaRegistry::new();

        let response_name = format!("{prefix}Response");
        let response_schema = infer_schema(response, &response_name, &mut registry);

        let request_name = format!("{prefix}Request");
        let request_schema = request_body_value(request)
            .map(|body| infer_schema(&body, &request_name, &mut registry));

        let path_params = path_parameter_names(&path);
        let query: serde_json::Map<String, JsonValue> = filter_query_params(request, &path_params)
            .iter()
            .map(|(k, v)| (k.clone(), refine_query_value(v)))
            .collect();
        let query_name = format!("{prefix}Query");
        let query_schema = (!query.is_empty())
            .then(|| infer_schema(&JsonValue::Object(query), &query_name, &mut registry));

        let request_body = request_schema.as_ref().map(|_| RequestBody {
            required: true,
            content: single_media_type(
                &media_type_of(request.content_type.as_deref()),
                &request_name,
            ),
        });

        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: "Successful response".to_string(),
                content: single_media_type(APPLICATION_JSON, &response_name),
            },
        );

        let operation = Operation {
            operation_id: operation_id.clone(),
            summary: self.summary(&request.method, &path),
            tags: self.options.tags.iter().map(|tag| capitalize(tag)).collect(),
            parameters: generate_parameters(
                request,
                &path,
                self.options.url_template.as_deref(),
            ),
            request_body,
            responses,
        };

        let mut schemas: IndexMap<String, JsonValue> = IndexMap::new();
        schemas.insert(response_name, serde_json::to_value(&response_schema)?);
        if let Some(schema) = &request_schema {
            schemas.insert(request_name, serde_json::to_value(schema)?);
        }
        if let Some(schema) = &query_schema {
            schemas.insert(query_name, serde_json::to_value(schema)?);
        }
        for (name, schema) in registry.into_inner() {
            schemas.insert(name, serde_json::to_value(&schema)?);
        }

        let mut path_item = PathItem::new();
        path_item.insert(method, serde_json::to_value(&operation)?);

        let mut document = Document::default();
        document.paths.insert(path.clone(), path_item);
        document.components.schemas = schemas;

        info!(
            %path,
            %operation_id,
            schemas = document.components.schemas.len(),
            "Generated OpenAPI document"
        );
        Ok(document)
    }

    /// Document path key and operationId `request` will be documented under
    pub fn resolve_operation(&self, request: &ParsedRequest) -> (String, String) {
        let path = match &self.options.url_template {
            Some(template) => normalize_path_template(template),
            None => request.path(),
        };
        let operation_id = self
            .options
            .operation_name
            .clone()
            .unwrap_or_else(|| generate_operation_id(&request.method, &path));
        (path, operation_id)
    }

    fn summary(&self, method: &str, path: &str) -> String {
        if let Some(summary) = &self.options.summary {
            return summary.clone();
        }
        match &self.options.operation_name {
            Some(name) => capitalize(name),
            None => format!("{} {}", method.to_uppercase(), path),
        }
    }
}

/// The request body as a JSON value, or `None` when there is nothing to document.
/// Raw string bodies sent as url-encoded forms are unpacked into fields first.
fn request_body_value(request: &ParsedRequest) -> Option<JsonValue> {
    let data = request.data.as_ref().filter(|data| !data.is_empty())?;
    let sent_as_form = request
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains(FORM_URLENCODED));

    match data {
        RequestData::Text(body) if sent_as_form => {
            Some(RequestData::Form(parse_urlencoded(body)).to_json())
        }
        RequestData::Json(JsonValue::String(body)) if sent_as_form => {
            Some(RequestData::Form(parse_urlencoded(body)).to_json())
        }
        other => Some(other.to_json()),
    }
}

/// Media type key for a content type header value, parameters dropped
fn media_type_of(content_type: Option<&str>) -> String {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or(APPLICATION_JSON)
        .to_string()
}

fn single_media_type(media_type: &str, schema_name: &str) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert(
        media_type.to_string(),
        MediaType {
            schema: Schema::reference(schema_name),
        },
    );
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curl::CurlParser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn generate(command: &str, response: JsonValue, options: OpenApiOptions) -> Document {
        let request = CurlParser::new().parse(command).unwrap();
        DocumentGenerator::new(options)
            .generate(&request, &response)
            .unwrap()
    }

    #[test]
    fn test_post_users_scenario() {
        let doc = generate(
            "curl -X POST 'https://api.example.com/users' -H 'Content-Type: application/json' -d '{\"name\":\"John\"}'",
            json!({ "id": 1, "name": "John" }),
            OpenApiOptions::default(),
        );

        let operation = &doc.paths["/users"]["post"];
        assert_eq!(operation["operationId"], "post_users");
        assert_eq!(operation["summary"], "POST /users");
        assert_eq!(
            operation["requestBody"],
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Post_usersRequest" }
                    }
                }
            })
        );
        assert_eq!(
            operation["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Post_usersResponse"
        );

        let schemas = &doc.components.schemas;
        assert_eq!(
            schemas["Post_usersRequest"],
            json!({
                "type": "object",
                "properties": { "name": { "type": "string", "example": "John" } }
            })
        );
        assert_eq!(schemas["Post_usersResponse"]["properties"]["id"]["type"], "integer");
        assert_eq!(schemas["Post_usersResponse"]["properties"]["name"]["type"], "string");
        assert!(!schemas.contains_key("Post_usersQuery"));
    }

    #[test]
    fn test_get_has_no_request_schema_or_body() {
        let doc = generate("curl https://x.io/items", json!([]), OpenApiOptions::default());
        let keys: Vec<_> = doc.components.schemas.keys().cloned().collect();
        assert_eq!(keys, vec!["Get_itemsResponse"]);
        assert!(doc.paths["/items"]["get"].get("requestBody").is_none());
        assert!(doc.paths["/items"]["get"].get("parameters").is_none());
    }

    #[test]
    fn test_options_drive_names_template_and_tags() {
        let options = OpenApiOptions {
            operation_name: Some("getUser".into()),
            url_template: Some("/users/:id".into()),
            tags: vec!["users".into(), "Admin".into()],
            ..Default::default()
        };
        let doc = generate(
            "curl 'https://x.io/users/7?expand=[\"roles\"]&id=7'",
            json!({ "id": 7, "roles": [{ "name": "admin" }] }),
            options,
        );

        let operation = &doc.paths["/users/{id}"]["get"];
        assert_eq!(operation["operationId"], "getUser");
        assert_eq!(operation["summary"], "GetUser");
        assert_eq!(operation["tags"], json!(["Users", "Admin"]));

        let params = operation["parameters"].as_array().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0]["in"], "path");
        assert_eq!(params[1]["name"], "expand");
        assert_eq!(params[1]["example"], json!(["roles"]));

        let names: Vec<_> = doc.components.schemas.keys().cloned().collect();
        assert_eq!(
            names,
            vec![
                "GetUserResponse",
                "GetUserQuery",
                "GetUserResponseRolesItem",
                "GetUserQueryExpandItem",
            ]
        );
    }

    #[test]
    fn test_explicit_summary_wins() {
        let options = OpenApiOptions {
            operation_name: Some("listThings".into()),
            summary: Some("List all things".into()),
            ..Default::default()
        };
        let doc = generate("curl https://x.io/things", json!({}), options);
        assert_eq!(doc.paths["/things"]["get"]["summary"], "List all things");
    }

    #[test]
    fn test_form_body_uses_request_media_type() {
        let doc = generate(
            "curl https://x.io/upload -F 'name=John' -F 'age=30'",
            json!({ "ok": true }),
            OpenApiOptions::default(),
        );
        let body = &doc.paths["/upload"]["post"]["requestBody"]["content"];
        assert!(body.get("multipart/form-data").is_some());
        assert_eq!(
            doc.components.schemas["Post_uploadRequest"]["properties"]["age"],
            json!({ "type": "string", "example": "30" })
        );
    }

    #[test]
    fn test_content_type_parameters_are_dropped_from_media_type() {
        assert_eq!(media_type_of(Some("application/json; charset=utf-8")), "application/json");
        assert_eq!(media_type_of(Some("  ")), APPLICATION_JSON);
        assert_eq!(media_type_of(None), APPLICATION_JSON);
    }

    #[test]
    fn test_text_body_sent_as_form_is_unpacked() {
        let request = ParsedRequest {
            method: "POST".into(),
            url: "https://x.io/f".into(),
            data: Some(RequestData::Text("a=1&b=two".into())),
            content_type: Some("application/x-www-form-urlencoded".into()),
            ..Default::default()
        };
        assert_eq!(request_body_value(&request), Some(json!({ "a": "1", "b": "two" })));
    }

    #[test]
    fn test_schema_names_are_unique_across_trees() {
        let doc = generate(
            "curl 'https://x.io/a?q=[{\"x\":1}]' --data-raw '{\"q\":[{\"x\":\"s\"}]}'",
            json!({ "q": [{ "x": true }] }),
            OpenApiOptions::default(),
        );
        let names: Vec<_> = doc.components.schemas.keys().collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
        assert!(doc.components.schemas.contains_key("Post_aResponseQItem"));
        assert!(doc.components.schemas.contains_key("Post_aRequestQItem"));
        assert!(doc.components.schemas.contains_key("Post_aQueryQItem"));
    }
}
