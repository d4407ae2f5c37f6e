//! Output formatting: human-readable and JSON.

use serde_json::json;
use std::fmt::Write;

use vdbbench_executor::{Dispatcher, Error, Outcome, RunSummary};

/// Output mode selected by `--json`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a dispatch outcome.
pub fn format_outcome(outcome: &Outcome, mode: OutputMode) -> String {
    match (mode, outcome) {
        (OutputMode::Json, _) => serde_json::to_string_pretty(outcome).unwrap_or_default(),
        (OutputMode::Human, Outcome::DryRun(task)) => {
            serde_json::to_string_pretty(task).unwrap_or_default()
        }
        (OutputMode::Human, Outcome::Completed(summary)) => format_summary(summary),
    }
}

fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "run {}: {} ({}, {})",
        summary.run_id, summary.db_label, summary.index_type, summary.case_type
    );

    if let Some(load) = &summary.load {
        let _ = write!(
            out,
            "load: {} inserted, {} failed in {:.2}s",
            load.inserted, load.failed, load.insert_secs
        );
        if let Some(secs) = load.optimize_secs {
            let _ = write!(out, ", optimize {:.2}s", secs);
        }
        out.push('\n');
    }

    if let Some(search) = &summary.serial_search {
        let _ = writeln!(
            out,
            "serial search: {} queries, {} failed, mean {:.2} ms, p99 {:.2} ms",
            search.queries, search.failed, search.mean_latency_ms, search.p99_latency_ms
        );
    }

    for level in &summary.concurrent_search {
        let _ = writeln!(
            out,
            "concurrency {}: {} queries, {} failed, {:.1} qps, p99 {:.2} ms",
            level.concurrency, level.queries, level.failed, level.qps, level.p99_latency_ms
        );
    }

    for skipped in &summary.skipped {
        let _ = writeln!(
            out,
            "skipped {:?}: {} not supported",
            skipped.stage, skipped.operation
        );
    }
    out.trim_end().to_string()
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({
            "error": {
                "code": err.code(),
                "message": err.to_string(),
                "exit_code": err.exit_code(),
            }
        })
        .to_string(),
        OutputMode::Human => format!("(error) {}", err),
    }
}

/// Format the command table.
pub fn format_list(dispatcher: &Dispatcher, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let commands: Vec<_> = dispatcher
                .commands()
                .iter()
                .map(|spec| {
                    json!({
                        "name": spec.name(),
                        "db": spec.db(),
                        "about": spec.about(),
                        "options": spec.params().iter().map(|p| json!({
                            "name": p.long_flag(),
                            "group": spec.params().group_of(p.name),
                            "kind": p.kind.name(),
                            "default": p.default,
                            "required": p.required,
                            "help": p.help,
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect();
            serde_json::to_string_pretty(&commands).unwrap_or_default()
        }
        OutputMode::Human => {
            let mut out = String::new();
            for spec in dispatcher.commands() {
                let _ = writeln!(out, "{}  {}", spec.name(), spec.about());
                for param in spec.params().iter() {
                    let default = match (param.required, param.default) {
                        (true, _) => "required".to_string(),
                        (false, Some(default)) => default.to_string(),
                        (false, None) => "-".to_string(),
                    };
                    let _ = writeln!(
                        out,
                        "    {:<24} {:<8} {:<12} {}",
                        param.long_flag(),
                        param.kind.name(),
                        default,
                        param.help
                    );
                }
            }
            out.trim_end().to_string()
        }
    }
}
