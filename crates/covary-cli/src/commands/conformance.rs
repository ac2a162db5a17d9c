use crate::support::{print_json, yes_no};
use covary_kernel::{ConformanceConfig, run_conformance};
use std::path::Path;

pub fn run(config: Option<String>, json_output: bool) {
    let config = ConformanceConfig::resolve(config.as_deref().map(Path::new)).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    tracing::debug!(?config, "resolved conformance configuration");
    let report = run_conformance(&config).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if json_output {
        match serde_json::to_value(&report) {
            Ok(payload) => print_json(&payload),
            Err(e) => {
                eprintln!("error: failed to render report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("covary conformance --profile {}", report.profile);
        println!(
            "  Array length: {} (target index {})",
            config.array_length, config.target_index
        );
        println!("  Invocations: {}", config.invocation_count);
        println!("  Executed: {}", report.executed);
        println!("  Skipped (not applicable): {}", report.skipped);
        println!("  Accepted: {}", yes_no(report.is_accepted()));
        for failure in &report.failures {
            println!("    - [{}] {} {}", failure.class, failure.witness_id, failure.message);
        }
    }

    if !report.is_accepted() {
        std::process::exit(1);
    }
}
