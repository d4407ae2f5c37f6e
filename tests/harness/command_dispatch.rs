//! Command Dispatch Tests
//!
//! Every registered command resolves through the same dispatcher, and every
//! failure a bad invocation can produce is caught before a backend is
//! contacted.

use std::collections::BTreeSet;

use crate::common::*;
use vdbbench::prelude::*;

// ============================================================================
// Registry
// ============================================================================

#[test]
fn every_backend_is_registered() {
    let dispatcher = dispatcher();
    let names: BTreeSet<_> = dispatcher.commands().iter().map(|c| c.name()).collect();
    for name in [
        "LanceDBServer",
        "LanceDBServerAutoIndex",
        "LanceDBServerIVFPQ",
        "LanceDBServerHNSW",
        "QdrantLocal",
    ] {
        assert!(names.contains(name), "{} missing", name);
    }
    for db in Db::ALL {
        assert!(dispatcher.commands().iter().any(|c| c.db() == db));
    }
}

#[test]
fn option_sets_compose_without_collisions() {
    for command in dispatcher().commands() {
        let names: BTreeSet<_> = command.params().iter().map(|p| p.name).collect();
        assert_eq!(names.len(), command.params().len(), "{}", command.name());
    }
}

#[test]
fn index_options_belong_to_their_command() {
    let dispatcher = dispatcher();
    let ivfpq = dispatcher.command("LanceDBServerIVFPQ").unwrap();
    let hnsw = dispatcher.command("LanceDBServerHNSW").unwrap();
    let plain = dispatcher.command("LanceDBServer").unwrap();

    assert!(ivfpq.params().get("nbits").is_some());
    assert!(ivfpq.params().get("ef").is_none());
    assert!(hnsw.params().get("ef").is_some());
    assert!(hnsw.params().get("nprobes").is_none());
    assert!(plain.params().get("nprobes").is_none());
    assert!(plain.params().get("uri").unwrap().required);
}

// ============================================================================
// Dry runs
// ============================================================================

fn dry_run(command: &str, pairs: &[(&str, &str)]) -> TaskConfig {
    let mut values = raw(pairs);
    values.insert("dry_run".into(), "true".into());
    match dispatcher()
        .dispatch(command, &values, &LifecycleDriver::new())
        .unwrap()
    {
        Outcome::DryRun(task) => task,
        Outcome::Completed(_) => panic!("dry run reached the driver"),
    }
}

#[test]
fn dry_run_renders_index_config() {
    let task = dry_run(
        "LanceDBServerIVFPQ",
        &[
            ("uri", "http://127.0.0.1:1"),
            ("num_partitions", "256"),
            ("nbits", "4"),
            ("nprobes", "20"),
            ("db_label", "lance-ivfpq-4bit"),
        ],
    );
    assert_eq!(task.db, Db::LanceDbServer);
    assert_eq!(task.db_label, "lance-ivfpq-4bit");
    assert_eq!(task.db_case_config["index"], "IVF_PQ");
    assert_eq!(task.db_case_config["num_partitions"], 256);
    assert_eq!(task.db_case_config["nbits"], 4);
}

#[test]
fn dry_run_applies_common_defaults() {
    let task = dry_run("QdrantLocal", &[("url", "http://127.0.0.1:1")]);
    assert_eq!(task.db_label, "QdrantLocal");
    assert_eq!(task.common.case_type, CaseType::Performance768D1M);
    assert_eq!(task.common.num_concurrency, vec![1, 5, 10]);
    assert_eq!(task.common.k, 100);
    assert_eq!(task.index_type, IndexType::Hnsw);
    assert_eq!(task.dim(), 768);
}

// ============================================================================
// Eager failures
// ============================================================================

fn exit_code(command: &str, pairs: &[(&str, &str)]) -> i32 {
    dispatcher()
        .dispatch(command, &raw(pairs), &LifecycleDriver::new())
        .unwrap_err()
        .exit_code()
}

#[test]
fn configuration_errors_exit_2() {
    let uri = ("uri", "http://127.0.0.1:1");
    assert_eq!(exit_code("LanceDBServerIVFPQ", &[uri, ("nbits", "6")]), 2);
    assert_eq!(exit_code("LanceDBServerIVFPQ", &[uri, ("nprobes", "x")]), 2);
    assert_eq!(exit_code("LanceDBServerIVFPQ", &[uri]), 2);
    assert_eq!(exit_code("LanceDBServerHNSW", &[uri, ("nprobes", "5")]), 2);
    assert_eq!(exit_code("LanceDBServer", &[]), 2);
    assert_eq!(exit_code("QdrantLocal", &[("url", "x"), ("grpc_port", "70000")]), 2);
    assert_eq!(exit_code("QdrantLocal", &[("url", "x"), ("case_type", "Nope")]), 2);
    assert_eq!(exit_code("Weaviate", &[]), 2);
}

#[test]
fn error_names_the_offending_option() {
    let err = dispatcher()
        .resolve(
            "LanceDBServerIVFPQ",
            &raw(&[("uri", "http://127.0.0.1:1"), ("nbits", "6")]),
        )
        .unwrap_err();
    assert!(err.to_string().contains("--nbits"), "{}", err);

    let err = dispatcher()
        .resolve("LanceDBServer", &RawParams::new())
        .unwrap_err();
    assert!(err.to_string().contains("--uri"), "{}", err);
}

#[test]
fn capability_errors_exit_3() {
    assert_eq!(
        exit_code(
            "LanceDBServerHNSW",
            &[
                ("uri", "http://127.0.0.1:1"),
                ("ef", "64"),
                ("case_type", "Performance1536D500K1P"),
            ],
        ),
        3
    );
}

#[test]
fn qdrant_without_graph_needs_no_search_parameter() {
    let task = dispatcher()
        .resolve(
            "QdrantLocal",
            &raw(&[("url", "http://127.0.0.1:1"), ("m", "0"), ("ef_construct", "0")]),
        )
        .unwrap();
    assert_eq!(task.db_case_config["m"], 0);
}
