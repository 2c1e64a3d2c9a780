// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! `fullload`: runs one synthetic load test and reports resource usage.

mod args;
mod interactive;
mod logging;
mod presets;
mod report;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use fullload_control::{Orchestrator, OrchestratorConfig};
use fullload_core::RunError;
use fullload_infra::HostDescription;
use fullload_workloads::{WorkloadOptions, WorkloadRegistry};

use crate::args::Cli;
use crate::interactive::RunLimits;
use crate::presets::PresetBook;
use crate::report::{ReportContext, WorkDir};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut book = PresetBook::builtin();
    if let Some(path) = &cli.presets {
        book.merge_file(path)?;
    }
    if cli.list_configs {
        presets::print_presets(&book);
        return Ok(ExitCode::SUCCESS);
    }

    let work_dir = WorkDir::new(&cli.work_dir);
    work_dir.ensure()?;
    let log_file = logging::init(cli.log_level, &work_dir.logs())?;
    log::info!("Program started, logging to {}", log_file.display());

    let host = HostDescription::detect();
    log::info!(
        "System: {} {}, CPU: {} ({}, {} logical), RAM: {:.1} GiB",
        host.os_name,
        host.os_version,
        host.cpu_brand,
        host.processor_family.key(),
        host.logical_cpus,
        host.total_memory_gib()
    );

    let selection = if cli.interactive {
        let stdin = io::stdin();
        let selection = interactive::select(stdin.lock(), io::stdout(), &RunLimits::default())
            .context("Interactive selection failed")?;
        Some(selection)
    } else {
        None
    };

    let resolved = match args::resolve(&cli, &book, selection) {
        Ok(resolved) => resolved,
        Err(err) => return Ok(report_failure(&err)),
    };
    let config = resolved.config;

    let options = WorkloadOptions {
        seed: cli.seed,
        scratch_dir: cli.scratch_dir.clone(),
        ..WorkloadOptions::default()
    };
    let registry = WorkloadRegistry::with_builtin(book.complexity_table(), &options);
    let orchestrator = Orchestrator::with_sysinfo(registry, OrchestratorConfig::default());

    let interrupt = orchestrator.interrupt_handle();
    ctrlc::set_handler(move || {
        interrupt.interrupt();
    })
    .context("Failed to install the Ctrl+C handler")?;

    let result = match orchestrator.run_test(&config) {
        Ok(result) => result,
        Err(err) => return Ok(report_failure(&err)),
    };

    report::print_summary(&result);
    let ctx = ReportContext {
        host: &host,
        config: &config,
        preset: resolved.preset.as_deref(),
        log_file: &log_file,
        generated_at: Local::now(),
    };
    let text_path = report::write_text(&work_dir.output(), &result, &ctx)?;
    println!("\nResults saved to: {}", text_path.display());
    if cli.json {
        let json_path = report::write_json(&text_path, &result, &ctx)?;
        println!("JSON results saved to: {}", json_path.display());
    }

    log::info!("Program finished");
    Ok(ExitCode::SUCCESS)
}

/// Logs a run error, prints whatever counters survived, and picks the exit code.
fn report_failure(err: &RunError) -> ExitCode {
    log::error!("{err}");
    eprintln!("Error: {err}");
    if let Some(counters) = err.counters().filter(|c| !c.is_empty()) {
        eprintln!("Partial counters:");
        for (name, value) in counters.iter() {
            eprintln!("  {name}: {value}");
        }
    }
    ExitCode::FAILURE
}
