//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::filter::FacetField;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, PageRequest, PageResult, PicklistValue, RecordEdit, Todo, TodoChanges};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_query_page(&self, request: &PageRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos/query", request)
    }

    pub fn build_write_batch(&self, edits: &[RecordEdit]) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos/batch", edits)
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos", input)
    }

    pub fn build_get_todo(&self, id: Uuid) -> HttpRequest {
        self.empty_request(HttpMethod::Get, &format!("/todos/{id}"))
    }

    pub fn build_update_todo(&self, id: Uuid, changes: &TodoChanges) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/todos/{id}"), changes)
    }

    pub fn build_picklist(&self, field: FacetField) -> HttpRequest {
        self.empty_request(HttpMethod::Get, &format!("/picklists/{}", field.as_str()))
    }

    pub fn parse_query_page(&self, response: HttpResponse) -> Result<PageResult, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_write_batch(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_picklist(&self, response: HttpResponse) -> Result<Vec<PicklistValue>, ApiError> {
        parse_json(response, 200)
    }

    fn empty_request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B>(&self, method: HttpMethod, path: &str, body: &B) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterState, SortBy};

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_query_page_posts_filters_and_cursor() {
        let request = PageRequest {
            filters: FilterState {
                search_key: "milk".to_string(),
                sort_by: SortBy::TitleAsc,
                ..FilterState::default()
            },
            page_number: 2,
            page_size: 10,
        };
        let req = client().build_query_page(&request).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/todos/query");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["filters"]["search_key"], "milk");
        assert_eq!(body["filters"]["sort_by"], "title_asc");
        assert_eq!(body["page_number"], 2);
        assert_eq!(body["page_size"], 10);
    }

    #[test]
    fn build_write_batch_sends_array_of_edits() {
        let edits = vec![RecordEdit::new(
            Uuid::nil(),
            TodoChanges {
                title: Some("Renamed".to_string()),
                ..TodoChanges::default()
            },
        )];
        let req = client().build_write_batch(&edits).unwrap();
        assert_eq!(req.path, "http://localhost:3000/todos/batch");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body[0]["title"], "Renamed");
        assert!(body[0].get("completed").is_none());
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/todos/00000000-0000-0000-0000-000000000000"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_picklist_uses_field_name() {
        let req = client().build_picklist(FacetField::Type);
        assert_eq!(req.path, "http://localhost:3000/picklists/type");
        assert!(req.headers.is_empty());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_picklist(FacetField::Priority);
        assert_eq!(req.path, "http://localhost:3000/picklists/priority");
    }

    #[test]
    fn parse_query_page_success() {
        let body = r#"{"records":[{"id":"00000000-0000-0000-0000-000000000001","title":"Test",
            "type":"Work","priority":"High","due_date":"2024-03-05T15:04:00Z",
            "description":"","completed":false}],"total_item_count":11}"#;
        let page = client().parse_query_page(response(200, body)).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total_item_count, 11);
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let err = client().parse_create_todo(response(500, "internal error")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_update_todo_not_found() {
        let err = client().parse_update_todo(response(404, "")).unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }

    #[test]
    fn parse_picklist_bad_json() {
        let err = client().parse_picklist(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
