//! LanceDB server adapter against a stub search endpoint.

use serde_json::json;

use crate::common::*;
use vdbbench::prelude::*;

fn search_endpoint() -> StubServer {
    StubServer::start(|req| match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/search") => (200, json!([{ "id": 3 }, { "id": 1 }]).to_string()),
        _ => (404, "{}".to_string()),
    })
}

fn run(command: &str, pairs: &[(&str, &str)]) -> Result<RunSummary> {
    match dispatcher().dispatch(command, &quick(pairs), &LifecycleDriver::new())? {
        Outcome::Completed(summary) => Ok(summary),
        Outcome::DryRun(_) => panic!("expected a completed run"),
    }
}

#[test]
fn ivfpq_search_forwards_probe_count_only() {
    let server = search_endpoint();
    let summary = run(
        "LanceDBServerIVFPQ",
        &[
            ("uri", server.url().as_str()),
            ("nprobes", "20"),
            ("num_partitions", "256"),
            ("search_concurrent", "false"),
        ],
    )
    .unwrap();

    assert_eq!(summary.serial_search.as_ref().unwrap().queries, 3);
    let searches = server.matching("POST", "/search");
    assert_eq!(searches.len(), 3);

    let body = searches[0].json();
    assert_eq!(body["nprobes"], 20);
    assert_eq!(body["k"], 5);
    assert_eq!(body["query"].as_array().unwrap().len(), 768);
    assert!(body.get("num_partitions").is_none());
    assert!(body.get("ef").is_none());
}

#[test]
fn hnsw_search_forwards_breadth() {
    let server = search_endpoint();
    run(
        "LanceDBServerHNSW",
        &[
            ("uri", server.url().as_str()),
            ("m", "16"),
            ("ef", "64"),
            ("search_concurrent", "false"),
        ],
    )
    .unwrap();

    let body = server.matching("POST", "/search")[0].json();
    assert_eq!(body["ef"], 64);
    assert!(body.get("nprobes").is_none());
    assert!(body.get("m").is_none());
}

#[test]
fn token_travels_as_header_only() {
    let server = search_endpoint();
    run(
        "LanceDBServerIVFPQ",
        &[
            ("uri", server.url().as_str()),
            ("token", "sk-lance-secret"),
            ("nprobes", "8"),
            ("search_concurrent", "false"),
        ],
    )
    .unwrap();

    let search = &server.matching("POST", "/search")[0];
    assert_eq!(search.header("x-api-key"), Some("sk-lance-secret"));
    assert!(!search.body.contains("sk-lance-secret"));
}

#[test]
fn unset_probe_count_fails_before_any_request() {
    let server = search_endpoint();
    let err = run(
        "LanceDBServerIVFPQ",
        &[("uri", server.url().as_str()), ("nprobes", "0")],
    )
    .unwrap_err();

    assert!(err.is_config());
    assert!(err.to_string().contains("search parameters must be provided"));
    assert!(server.requests().is_empty());
}

#[test]
fn load_is_skipped_not_failed() {
    let server = search_endpoint();
    let summary = run(
        "LanceDBServerIVFPQ",
        &[
            ("uri", server.url().as_str()),
            ("nprobes", "20"),
            ("search_serial", "false"),
        ],
    )
    .unwrap();

    assert!(summary.load.is_none());
    assert!(summary.was_skipped(Stage::Load));
    assert_eq!(summary.concurrent_search.len(), 1);
    assert!(summary.concurrent_search[0].queries > 0);
    assert!(server.matching("PUT", "/").is_empty());
}

#[test]
fn autoindex_has_no_search_parameter() {
    let server = search_endpoint();
    let err = run("LanceDBServerAutoIndex", &[("uri", server.url().as_str())]).unwrap_err();
    assert!(err.is_config());

    // Resolving without a search stage is fine
    let task = dispatcher()
        .resolve(
            "LanceDBServerAutoIndex",
            &quick(&[
                ("uri", server.url().as_str()),
                ("search_serial", "false"),
                ("search_concurrent", "false"),
            ]),
        )
        .unwrap();
    assert_eq!(task.index_type, IndexType::AutoIndex);
    assert!(server.requests().is_empty());
}

#[test]
fn server_errors_are_counted_per_query() {
    let server = StubServer::start(|_| (500, json!({ "detail": "boom" }).to_string()));
    let summary = run(
        "LanceDBServerIVFPQ",
        &[
            ("uri", server.url().as_str()),
            ("token", "sk-lance-secret"),
            ("nprobes", "20"),
            ("search_concurrent", "false"),
        ],
    )
    .unwrap();

    let serial = summary.serial_search.as_ref().unwrap();
    assert_eq!(serial.queries, 0);
    assert_eq!(serial.failed, 3);
    assert!(serial.errors[0].contains("500"));
    assert!(serial.errors.iter().all(|e| !e.contains("sk-lance-secret")));
}

#[test]
fn unreachable_endpoint_is_reported_not_hidden() {
    let summary = run(
        "LanceDBServerIVFPQ",
        &[
            ("uri", "http://127.0.0.1:1"),
            ("nprobes", "20"),
            ("search_concurrent", "false"),
        ],
    )
    .unwrap();

    let serial = summary.serial_search.as_ref().unwrap();
    assert_eq!(serial.failed, 3);
    assert!(!serial.errors.is_empty());
}
