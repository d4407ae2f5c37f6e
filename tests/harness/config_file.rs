//! Config file precedence and validation.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::common::*;
use vdbbench::prelude::*;

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

const BENCH: &str = r#"
[common]
case-type = "Performance1536D500K"
num_concurrency = [1, 4, 16]
k = 10

[LanceDBServerIVFPQ]
uri = "http://lance:8000"
token = "sk-from-file"
nprobes = 32
k = 20

[QdrantLocal]
url = "http://qdrant:6333"
on_disk = true
"#;

#[test]
fn command_line_overrides_command_table_overrides_common() {
    let dispatcher = dispatcher();
    let file = write_config(BENCH);
    let config = dispatcher.load_config(file.path().to_str().unwrap()).unwrap();

    let cli = raw(&[("nprobes", "64")]);
    let task = dispatcher
        .resolve("LanceDBServerIVFPQ", &config.merge("LanceDBServerIVFPQ", &cli))
        .unwrap();
    assert_eq!(task.db_case_config["nprobes"], 64);
    assert_eq!(task.common.k, 20);
    assert_eq!(task.common.case_type, CaseType::Performance1536D500K);
    assert_eq!(task.common.num_concurrency, vec![1, 4, 16]);
    assert_eq!(task.dim(), 1536);

    let task = dispatcher
        .resolve("QdrantLocal", &config.merge("QdrantLocal", &RawParams::new()))
        .unwrap();
    assert_eq!(task.common.k, 10);
    assert_eq!(task.db_case_config["on_disk"], true);
}

#[test]
fn secrets_from_file_stay_masked() {
    let dispatcher = dispatcher();
    let file = write_config(BENCH);
    let config = dispatcher.load_config(file.path().to_str().unwrap()).unwrap();
    let task = dispatcher
        .resolve(
            "LanceDBServerIVFPQ",
            &config.merge("LanceDBServerIVFPQ", &RawParams::new()),
        )
        .unwrap();

    assert!(!serde_json::to_string(&task).unwrap().contains("sk-from-file"));
    assert!(!format!("{:?}", task).contains("sk-from-file"));
}

#[test]
fn backend_option_in_common_is_rejected() {
    let file = write_config("[common]\nnprobes = 10\n");
    let err = dispatcher()
        .load_config(file.path().to_str().unwrap())
        .unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("--nprobes"));
}

#[test]
fn option_foreign_to_the_command_is_rejected_at_resolution() {
    let dispatcher = dispatcher();
    let file = write_config("[QdrantLocal]\nurl = \"http://q:6333\"\nnbits = 8\n");
    let config = dispatcher.load_config(file.path().to_str().unwrap()).unwrap();
    let err = dispatcher
        .resolve("QdrantLocal", &config.merge("QdrantLocal", &RawParams::new()))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::UnknownOption { ref option }) if option == "--nbits"
    ));
}

#[test]
fn unknown_table_and_missing_file() {
    let dispatcher = dispatcher();
    let file = write_config("[Pinecone]\napi_key = \"x\"\n");
    let err = dispatcher
        .load_config(file.path().to_str().unwrap())
        .unwrap_err();
    assert_eq!(err.exit_code(), 2);

    let err = dispatcher.load_config("/nonexistent/bench.toml").unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
