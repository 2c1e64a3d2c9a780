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


//! Command-line arguments and how they resolve into a run configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use fullload_core::{
    ComplexityTier, LoadProfile, RunError, RunMode, RunResult, TestRunConfig, WorkloadKind,
};

use crate::interactive::Selection;
use crate::presets::PresetBook;

/// Duration used when neither a preset, a flag nor the prompt sets one.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(
    name = "fullload",
    version,
    about = "System performance test: synthetic CPU, memory and disk load with resource monitoring",
    after_help = "Examples:\n  fullload --config mining\n  fullload --interactive\n  fullload --test-type bitcoin_mining --duration 45"
)]
pub struct Cli {
    /// Name of a preset configuration (see --list-configs)
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Choose the test parameters through prompts
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Workload to run, e.g. bitcoin_mining
    #[arg(short = 't', long)]
    pub test_type: Option<String>,

    /// Load profile: CPU, GPU, BOTH or NEURAL
    #[arg(short = 'l', long)]
    pub load_type: Option<String>,

    /// Complexity tier: easy, medium or hard
    #[arg(short = 'x', long)]
    pub complexity: Option<String>,

    /// Test duration in seconds (timed mode)
    #[arg(short = 'd', long)]
    pub duration: Option<f64>,

    /// Termination policy: timed or performance
    #[arg(short = 'm', long)]
    pub mode: Option<String>,

    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// List the available preset configurations and exit
    #[arg(long)]
    pub list_configs: bool,

    /// TOML file with additional presets and complexity overrides
    #[arg(long, value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// Directory holding LOGS/ and OUTPUT/
    #[arg(long, value_name = "DIR", default_value = "WORK")]
    pub work_dir: PathBuf,

    /// Also write the result as JSON next to the text report
    #[arg(long)]
    pub json: bool,

    /// Seed for the pseudo-random workload inputs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for disk workload scratch files
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "INFO")]
    Info,
    #[value(name = "DEBUG")]
    Debug,
}

impl LogLevel {
    pub fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// The configuration of the run about to start, with the preset it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub config: TestRunConfig,
    pub preset: Option<String>,
}

/// Builds the run configuration.
///
/// Interactive answers win over the named preset, which wins over individual
/// flags, which win over the defaults.
pub fn resolve(
    cli: &Cli,
    book: &PresetBook,
    selection: Option<Selection>,
) -> RunResult<ResolvedRun> {
    let mut workload = WorkloadKind::NonceSearch;
    let mut load_profile = LoadProfile::default();
    let mut complexity = ComplexityTier::default();
    let mut duration = DEFAULT_DURATION;
    let mut mode = RunMode::default();

    if let Some(key) = &cli.test_type {
        workload = key.parse()?;
    }
    if let Some(key) = &cli.load_type {
        load_profile = key.parse()?;
    }
    if let Some(key) = &cli.complexity {
        complexity = key.parse()?;
    }
    if let Some(secs) = cli.duration {
        duration = Duration::try_from_secs_f64(secs)
            .map_err(|_| RunError::configuration(format!("Invalid duration: {secs}")))?;
    }
    if let Some(key) = &cli.mode {
        mode = key.parse()?;
    }

    let mut preset_name = None;
    if let Some(name) = &cli.config {
        let preset = book.get(name)?;
        log::info!("Selected configuration: {}", name);
        workload = preset.test_type;
        load_profile = preset.load_type;
        complexity = preset.complexity;
        duration = preset.duration;
        if let Some(preset_mode) = preset.mode {
            mode = preset_mode;
        }
        preset_name = Some(name.to_lowercase());
    }

    if let Some(selection) = selection {
        workload = selection.test_type;
        load_profile = selection.load_type;
        complexity = selection.complexity;
        duration = selection.duration;
        mode = RunMode::Timed;
    }

    let config = TestRunConfig {
        workload,
        complexity,
        duration,
        mode,
        load_profile,
    };
    Ok(ResolvedRun {
        config,
        preset: preset_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("fullload").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_flags() {
        let run = resolve(&cli(&[]), &PresetBook::builtin(), None).unwrap();
        assert_eq!(run.config.workload, WorkloadKind::NonceSearch);
        assert_eq!(run.config.complexity, ComplexityTier::Medium);
        assert_eq!(run.config.duration, DEFAULT_DURATION);
        assert_eq!(run.config.mode, RunMode::Timed);
        assert_eq!(run.preset, None);
    }

    #[test]
    fn flags_are_parsed() {
        let args = cli(&[
            "-t", "prime_numbers", "-x", "hard", "-d", "12.5", "--mode", "performance",
            "--log-level", "debug",
        ]);
        assert_eq!(args.log_level, LogLevel::Debug);
        let run = resolve(&args, &PresetBook::builtin(), None).unwrap();
        assert_eq!(run.config.workload, WorkloadKind::PrimeNumbers);
        assert_eq!(run.config.complexity, ComplexityTier::Hard);
        assert_eq!(run.config.duration, Duration::from_millis(12_500));
        assert_eq!(run.config.mode, RunMode::Performance);
    }

    #[test]
    fn preset_overrides_flags() {
        let args = cli(&["--config", "mining", "--test-type", "basic", "--duration", "5"]);
        let run = resolve(&args, &PresetBook::builtin(), None).unwrap();
        assert_eq!(run.config.workload, WorkloadKind::NonceSearch);
        assert_eq!(run.config.duration, Duration::from_secs(30));
        assert_eq!(run.preset.as_deref(), Some("mining"));
    }

    #[test]
    fn interactive_answers_override_preset() {
        let selection = Selection {
            test_type: WorkloadKind::DiskIo,
            load_type: LoadProfile::Both,
            complexity: ComplexityTier::Easy,
            duration: Duration::from_secs(15),
        };
        let args = cli(&["--config", "quick"]);
        let run = resolve(&args, &PresetBook::builtin(), Some(selection)).unwrap();
        assert_eq!(run.config.workload, WorkloadKind::DiskIo);
        assert_eq!(run.config.load_profile, LoadProfile::Both);
        assert_eq!(run.config.duration, Duration::from_secs(15));
    }

    #[test]
    fn unknown_keys_are_configuration_errors() {
        for args in [
            &["--test-type", "quantum"][..],
            &["--complexity", "extreme"][..],
            &["--config", "nope"][..],
            &["--duration=-3"][..],
        ] {
            let err = resolve(&cli(args), &PresetBook::builtin(), None).unwrap_err();
            assert!(matches!(err, RunError::Configuration(_)), "{args:?}");
        }
    }
}
