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


//! Human-readable and JSON reports for a finished run.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use fullload_core::{RunMode, TestRunConfig, TestRunResult, WorkloadKind};
use fullload_infra::HostDescription;

/// The `LOGS/` and `OUTPUT/` layout under the work directory.
#[derive(Debug, Clone)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join("LOGS")
    }

    pub fn output(&self) -> PathBuf {
        self.root.join("OUTPUT")
    }

    /// Creates both subdirectories.
    pub fn ensure(&self) -> Result<()> {
        for dir in [self.logs(), self.output()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory '{}'", dir.display()))?;
        }
        Ok(())
    }
}

/// `fullload_{test_type}_{YYYY-mm-dd_HH-MM-SS}.txt`.
pub fn report_file_name(workload: WorkloadKind, at: &DateTime<Local>) -> String {
    format!(
        "fullload_{}_{}.txt",
        workload.key(),
        at.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Everything besides the result that goes into a report.
#[derive(Debug)]
pub struct ReportContext<'a> {
    pub host: &'a HostDescription,
    pub config: &'a TestRunConfig,
    pub preset: Option<&'a str>,
    pub log_file: &'a Path,
    pub generated_at: DateTime<Local>,
}

const RULE: usize = 60;
const SECTION_RULE: usize = 30;

/// Renders the text report.
pub fn render_text(result: &TestRunResult, ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();
    let timestamp = ctx.generated_at.format("%Y-%m-%d %H:%M:%S");
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, result, ctx, &timestamp.to_string());
    out
}

fn write_report(
    out: &mut String,
    result: &TestRunResult,
    ctx: &ReportContext<'_>,
    timestamp: &str,
) -> std::fmt::Result {
    let host = ctx.host;
    let config = ctx.config;

    writeln!(out, "{}", "=".repeat(RULE))?;
    writeln!(out, "SYSTEM PERFORMANCE TEST RESULTS")?;
    writeln!(out, "{}", "=".repeat(RULE))?;
    writeln!(out, "Date and time: {timestamp}")?;
    writeln!(out)?;

    writeln!(out, "SYSTEM INFORMATION:")?;
    writeln!(out, "{}", "-".repeat(SECTION_RULE))?;
    writeln!(out, "Operating system: {}", host.os_name)?;
    writeln!(out, "OS version: {}", host.os_version)?;
    writeln!(out, "Processor: {}", host.cpu_brand)?;
    writeln!(out, "Architecture: {}", host.architecture)?;
    writeln!(out, "Processor type: {}", host.processor_family.key())?;
    writeln!(out, "Logical CPUs: {}", host.logical_cpus)?;
    writeln!(out, "Total memory: {:.1} GiB", host.total_memory_gib())?;
    writeln!(out)?;

    writeln!(out, "TEST CONFIGURATION:")?;
    writeln!(out, "{}", "-".repeat(SECTION_RULE))?;
    if let Some(preset) = ctx.preset {
        writeln!(out, "Preset: {preset}")?;
    }
    writeln!(out, "Test type: {}", config.workload)?;
    writeln!(out, "Load type: {}", config.load_profile)?;
    writeln!(out, "Complexity: {}", config.complexity)?;
    writeln!(out, "Mode: {}", config.mode)?;
    match config.mode {
        RunMode::Timed => writeln!(
            out,
            "Planned duration: {:.1} seconds",
            config.duration.as_secs_f64()
        )?,
        RunMode::Performance => writeln!(out, "Planned duration: until the workload completes")?,
    }
    writeln!(out)?;

    writeln!(out, "TEST RESULTS:")?;
    writeln!(out, "{}", "-".repeat(SECTION_RULE))?;
    writeln!(
        out,
        "Actual duration: {:.2} seconds",
        result.actual_duration.as_secs_f64()
    )?;
    writeln!(out, "Outcome: {}", outcome_label(result))?;
    writeln!(out, "Samples: {}", result.sample_count)?;
    writeln!(out)?;

    writeln!(out, "CPU LOAD:")?;
    writeln!(out, "  Average: {:.1}%", result.cpu_avg)?;
    writeln!(out, "  Peak: {:.1}%", result.cpu_peak)?;
    writeln!(out)?;

    writeln!(out, "MEMORY USAGE:")?;
    writeln!(out, "  Average: {:.1}%", result.mem_avg)?;
    writeln!(out, "  Peak: {:.1}%", result.mem_peak)?;
    writeln!(out)?;

    if result.cpu_temp_avg.is_some() || result.gpu_temp_avg.is_some() {
        writeln!(out, "TEMPERATURE:")?;
        if let Some(t) = result.cpu_temp_avg {
            writeln!(out, "  Average CPU temperature: {t:.1}°C")?;
        }
        if let Some(t) = result.gpu_temp_avg {
            writeln!(out, "  Average GPU temperature: {t:.1}°C")?;
        }
        writeln!(out)?;
    }

    if !result.counters.is_empty() {
        writeln!(out, "WORKLOAD COUNTERS:")?;
        for (name, value) in result.counters.iter() {
            writeln!(out, "  {name}: {value}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "ADDITIONAL INFORMATION:")?;
    writeln!(out, "{}", "-".repeat(SECTION_RULE))?;
    writeln!(out, "Log file: {}", ctx.log_file.display())?;
    writeln!(out, "Report created: {timestamp}")?;
    writeln!(out)?;
    write!(out, "{}", "=".repeat(RULE))
}

fn outcome_label(result: &TestRunResult) -> &'static str {
    if result.is_interrupted() {
        "interrupted by user"
    } else {
        "completed"
    }
}

/// Writes the text report under `output_dir` and returns its path.
pub fn write_text(output_dir: &Path, result: &TestRunResult, ctx: &ReportContext<'_>) -> Result<PathBuf> {
    let path = output_dir.join(report_file_name(result.workload, &ctx.generated_at));
    fs::write(&path, render_text(result, ctx))
        .with_context(|| format!("Failed to write report '{}'", path.display()))?;
    log::info!("Results saved to {}", path.display());
    Ok(path)
}

/// Writes the JSON form of the report next to `text_path`.
pub fn write_json(text_path: &Path, result: &TestRunResult, ctx: &ReportContext<'_>) -> Result<PathBuf> {
    let path = text_path.with_extension("json");
    let document = serde_json::json!({
        "generated_at": ctx.generated_at.to_rfc3339(),
        "preset": ctx.preset,
        "host": {
            "os_name": ctx.host.os_name,
            "os_version": ctx.host.os_version,
            "cpu_brand": ctx.host.cpu_brand,
            "architecture": ctx.host.architecture,
            "processor_type": ctx.host.processor_family.key(),
            "logical_cpus": ctx.host.logical_cpus,
            "total_memory_bytes": ctx.host.total_memory_bytes,
        },
        "result": result,
    });
    let text = serde_json::to_string_pretty(&document).context("Failed to serialize result")?;
    fs::write(&path, text)
        .with_context(|| format!("Failed to write JSON report '{}'", path.display()))?;
    log::info!("JSON results saved to {}", path.display());
    Ok(path)
}

/// Prints the short summary shown at the end of a run.
pub fn print_summary(result: &TestRunResult) {
    println!("\n{}", "=".repeat(50));
    println!("TEST RESULTS");
    println!("{}", "=".repeat(50));
    println!(
        "Duration:       {:.2} seconds",
        result.actual_duration.as_secs_f64()
    );
    println!("Outcome:        {}", outcome_label(result));
    println!("CPU average:    {:.1}%", result.cpu_avg);
    println!("CPU peak:       {:.1}%", result.cpu_peak);
    println!("RAM average:    {:.1}%", result.mem_avg);
    println!("RAM peak:       {:.1}%", result.mem_peak);
    if let Some(t) = result.cpu_temp_avg {
        println!("CPU temp avg:   {t:.1}°C");
    }
    if let Some(t) = result.gpu_temp_avg {
        println!("GPU temp avg:   {t:.1}°C");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fullload_core::{
        keys, ComplexityTier, LoadProfile, RunOutcome, WorkloadCounters,
    };
    use fullload_infra::ProcessorFamily;
    use std::time::Duration;

    fn host() -> HostDescription {
        HostDescription {
            os_name: "Linux".into(),
            os_version: "6.1".into(),
            cpu_brand: "Test CPU".into(),
            architecture: "x86_64".into(),
            processor_family: ProcessorFamily::X86,
            logical_cpus: 8,
            total_memory_bytes: 16 * 1024 * 1024 * 1024,
        }
    }

    fn result(cpu_temp: Option<f64>) -> TestRunResult {
        let mut counters = WorkloadCounters::new();
        counters.add(keys::HASHES_CALCULATED, 1234);
        TestRunResult {
            workload: WorkloadKind::NonceSearch,
            mode: RunMode::Timed,
            complexity: ComplexityTier::Medium,
            load_profile: LoadProfile::Cpu,
            actual_duration: Duration::from_millis(30_250),
            cpu_avg: 87.25,
            cpu_peak: 99.0,
            mem_avg: 41.0,
            mem_peak: 43.5,
            cpu_temp_avg: cpu_temp,
            gpu_temp_avg: None,
            sample_count: 61,
            counters,
            outcome: RunOutcome::Completed,
        }
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap()
    }

    #[test]
    fn report_file_name_embeds_kind_and_time() {
        assert_eq!(
            report_file_name(WorkloadKind::NonceSearch, &generated_at()),
            "fullload_bitcoin_mining_2025-03-07_14-05-09.txt"
        );
    }

    #[test]
    fn text_report_lists_stats_and_counters() {
        let host = host();
        let config = TestRunConfig::timed(WorkloadKind::NonceSearch, Duration::from_secs(30));
        let ctx = ReportContext {
            host: &host,
            config: &config,
            preset: Some("mining"),
            log_file: Path::new("WORK/LOGS/fullload_INFO_2025-03-07.log"),
            generated_at: generated_at(),
        };
        let text = render_text(&result(Some(61.5)), &ctx);

        assert!(text.contains("Preset: mining"));
        assert!(text.contains("Actual duration: 30.25 seconds"));
        assert!(text.contains("  Average: 87.2%") || text.contains("  Average: 87.3%"));
        assert!(text.contains("Average CPU temperature: 61.5°C"));
        assert!(!text.contains("GPU temperature"));
        assert!(text.contains("hashes_calculated: 1234"));
        assert!(text.contains("Outcome: completed"));
    }

    #[test]
    fn temperature_section_is_omitted_without_sensors() {
        let host = host();
        let config = TestRunConfig::performance(WorkloadKind::NonceSearch);
        let ctx = ReportContext {
            host: &host,
            config: &config,
            preset: None,
            log_file: Path::new("log"),
            generated_at: generated_at(),
        };
        let text = render_text(&result(None), &ctx);
        assert!(!text.contains("TEMPERATURE"));
        assert!(text.contains("until the workload completes"));
    }

    #[test]
    fn reports_are_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let work = WorkDir::new(dir.path());
        work.ensure().unwrap();

        let host = host();
        let config = TestRunConfig::timed(WorkloadKind::NonceSearch, Duration::from_secs(30));
        let ctx = ReportContext {
            host: &host,
            config: &config,
            preset: None,
            log_file: Path::new("log"),
            generated_at: generated_at(),
        };
        let result = result(None);
        let text_path = write_text(&work.output(), &result, &ctx).unwrap();
        let json_path = write_json(&text_path, &result, &ctx).unwrap();

        assert!(text_path.starts_with(work.output()));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json["result"]["workload"], "bitcoin_mining");
        assert_eq!(json["result"]["actual_duration_secs"], 30.25);
        assert_eq!(json["result"]["counters"]["hashes_calculated"], 1234);
        assert!(json["result"]["cpu_temp_avg"].is_null());
    }
}
