//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::collections::BTreeSet;

use todo_core::types::edited_ids;
use todo_core::{
    ApiError, FacetField, HttpMethod, HttpRequest, HttpResponse, PageRequest, PageResult, PicklistValue, RecordEdit,
    TodoClient,
};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(sim: &serde_json::Value) -> HttpResponse {
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Check method, path, headers and (if present) body of a built request.
fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: unexpected body"),
    }
}

fn error_kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::NotFound => "NotFound",
        ApiError::HttpError { .. } => "HttpError",
        ApiError::DeserializationError(_) => "DeserializationError",
        ApiError::SerializationError(_) => "SerializationError",
    }
}

/// Run the `errors` section of a vector file through `parse`.
fn check_errors<T: std::fmt::Debug>(vectors: &serde_json::Value, parse: impl Fn(HttpResponse) -> Result<T, ApiError>) {
    for case in vectors["errors"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let err = parse(simulated(case)).unwrap_err();
        assert_eq!(error_kind(&err), case["expected_error"].as_str().unwrap(), "{name}: error kind");
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: PageRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_query_page(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let page = c.parse_query_page(simulated(&case["simulated_response"])).unwrap();
        let expected: PageResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(page, expected, "{name}: parsed result");
    }

    check_errors(&vectors, |response| c.parse_query_page(response));
}

// ---------------------------------------------------------------------------
// Batch write
// ---------------------------------------------------------------------------

#[test]
fn write_batch_test_vectors() {
    let raw = include_str!("../../test-vectors/write_batch.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let edits: Vec<RecordEdit> = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_write_batch(&edits).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let written = c.parse_write_batch(simulated(&case["simulated_response"])).unwrap();
        let written_ids: BTreeSet<Uuid> = written.iter().map(|todo| todo.id).collect();
        let expected: BTreeSet<Uuid> = serde_json::from_value(case["expected_ids"].clone()).unwrap();
        assert_eq!(written_ids, expected, "{name}: written ids");
        assert_eq!(edited_ids(&edits), expected, "{name}: edited ids");
    }

    check_errors(&vectors, |response| c.parse_write_batch(response));
}

// ---------------------------------------------------------------------------
// Picklists
// ---------------------------------------------------------------------------

#[test]
fn picklist_test_vectors() {
    let raw = include_str!("../../test-vectors/picklist.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let field: FacetField = serde_json::from_value(case["field"].clone()).unwrap();

        let req = c.build_picklist(field);
        assert_request(name, &req, &case["expected_request"]);

        let values = c.parse_picklist(simulated(&case["simulated_response"])).unwrap();
        let expected: Vec<PicklistValue> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(values, expected, "{name}: parsed result");
    }
}
