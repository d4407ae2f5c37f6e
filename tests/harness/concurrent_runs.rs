//! Runs sharing declarations but not state.

use serde_json::json;
use std::thread;

use crate::common::*;
use vdbbench::prelude::*;

fn endpoint() -> StubServer {
    StubServer::start(|_| (200, json!([{ "id": 1 }]).to_string()))
}

#[test]
fn parallel_runs_keep_their_own_configs() {
    let servers = [endpoint(), endpoint()];
    let dispatcher = dispatcher();
    let tasks: Vec<TaskConfig> = servers
        .iter()
        .zip(["10", "90"])
        .map(|(server, nprobes)| {
            dispatcher
                .resolve(
                    "LanceDBServerIVFPQ",
                    &quick(&[
                        ("uri", server.url().as_str()),
                        ("nprobes", nprobes),
                        ("search_concurrent", "false"),
                    ]),
                )
                .unwrap()
        })
        .collect();
    assert_ne!(tasks[0].run_id, tasks[1].run_id);

    thread::scope(|scope| {
        for task in &tasks {
            scope.spawn(move || LifecycleDriver::new().run(task).unwrap());
        }
    });

    for (server, nprobes) in servers.iter().zip([10, 90]) {
        let searches = server.matching("POST", "/search");
        assert_eq!(searches.len(), 3);
        assert!(searches.iter().all(|r| r.json()["nprobes"] == nprobes));
    }
    assert_eq!(tasks[0].db_config["uri"], servers[0].url());
    assert_eq!(tasks[1].db_config["uri"], servers[1].url());
}

#[test]
fn concurrent_workers_each_connect() {
    let server = endpoint();
    let summary = match dispatcher()
        .dispatch(
            "LanceDBServerHNSW",
            &quick(&[
                ("uri", server.url().as_str()),
                ("ef", "32"),
                ("search_serial", "false"),
                ("num_concurrency", "1,4"),
            ]),
            &LifecycleDriver::new(),
        )
        .unwrap()
    {
        Outcome::Completed(summary) => summary,
        Outcome::DryRun(_) => panic!("expected a completed run"),
    };

    let levels: Vec<_> = summary
        .concurrent_search
        .iter()
        .map(|c| (c.concurrency, c.failed))
        .collect();
    assert_eq!(levels, vec![(1, 0), (4, 0)]);
    assert!(summary.concurrent_search.iter().all(|c| c.qps > 0.0));

    let searches = server.matching("POST", "/search");
    let total: usize = summary.concurrent_search.iter().map(|c| c.queries).sum();
    assert_eq!(searches.len(), total);
    assert!(searches.iter().all(|r| r.json()["ef"] == 32));
}
