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


//! Named test presets and complexity overrides.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use fullload_core::{
    ComplexityTier, LoadProfile, RunError, RunMode, RunResult, TierSizes, WorkloadKind,
};
use fullload_workloads::ComplexityTable;
use serde::Deserialize;

/// A named, fully typed test configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub test_type: WorkloadKind,
    pub load_type: LoadProfile,
    pub complexity: ComplexityTier,
    pub duration: Duration,
    /// Overrides the termination policy when set.
    pub mode: Option<RunMode>,
    pub description: Option<String>,
}

impl Preset {
    const fn builtin(
        test_type: WorkloadKind,
        load_type: LoadProfile,
        complexity: ComplexityTier,
        secs: u64,
    ) -> Self {
        Self {
            test_type,
            load_type,
            complexity,
            duration: Duration::from_secs(secs),
            mode: None,
            description: None,
        }
    }

    /// The preset's own description, or the workload's.
    pub fn describe(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or_else(|| self.test_type.description())
    }
}

/// A preset as written in a TOML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresetEntry {
    test_type: String,
    #[serde(default = "default_load_type")]
    load_type: String,
    #[serde(default = "default_complexity")]
    complexity: String,
    #[serde(default = "default_duration")]
    duration: f64,
    mode: Option<String>,
    description: Option<String>,
}

fn default_load_type() -> String {
    LoadProfile::default().key().to_owned()
}

fn default_complexity() -> String {
    ComplexityTier::default().key().to_owned()
}

fn default_duration() -> f64 {
    crate::args::DEFAULT_DURATION.as_secs_f64()
}

impl PresetEntry {
    fn into_preset(self, name: &str) -> RunResult<Preset> {
        let duration = Duration::try_from_secs_f64(self.duration).map_err(|_| {
            RunError::configuration(format!(
                "Preset '{name}': invalid duration {}",
                self.duration
            ))
        })?;
        Ok(Preset {
            test_type: self.test_type.parse()?,
            load_type: self.load_type.parse()?,
            complexity: self.complexity.parse()?,
            duration,
            mode: self.mode.as_deref().map(str::parse::<RunMode>).transpose()?,
            description: self.description,
        })
    }
}

/// Layout of a `--presets` TOML file.
///
/// ```toml
/// [presets.soak]
/// test_type = "full_load"
/// load_type = "BOTH"
/// complexity = "hard"
/// duration = 60
///
/// [complexity.matrix_operations]
/// easy = 50
/// medium = 200
/// hard = 400
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresetFile {
    #[serde(default)]
    presets: BTreeMap<String, PresetEntry>,
    #[serde(default)]
    complexity: BTreeMap<String, TierSizes>,
}

/// Every known preset plus the complexity table they run with.
#[derive(Debug, Clone)]
pub struct PresetBook {
    presets: BTreeMap<String, Preset>,
    complexity: ComplexityTable,
}

impl PresetBook {
    /// The built-in presets and complexity sizes.
    pub fn builtin() -> Self {
        use ComplexityTier::{Easy, Medium};
        use LoadProfile::{Both, Cpu, Neural};
        use WorkloadKind::*;

        let presets = [
            ("quick", Preset::builtin(Basic, Cpu, Easy, 10)),
            ("crypto", Preset::builtin(HashCalculation, Cpu, Medium, 20)),
            ("mining", Preset::builtin(NonceSearch, Cpu, Medium, 30)),
            ("math", Preset::builtin(MatrixOperations, Cpu, Medium, 25)),
            ("prime", Preset::builtin(PrimeNumbers, Cpu, Easy, 15)),
            ("neural", Preset::builtin(NeuralSimulation, Neural, Easy, 12)),
            ("stress", Preset::builtin(Transcendental, Cpu, Medium, 20)),
            ("disk", Preset::builtin(DiskIo, Cpu, Easy, 15)),
            ("full", Preset::builtin(Composite, Both, Medium, 30)),
        ]
        .into_iter()
        .map(|(name, preset)| (name.to_owned(), preset))
        .collect();

        Self {
            presets,
            complexity: ComplexityTable::default(),
        }
    }

    /// Looks up a preset by case-insensitive name.
    pub fn get(&self, name: &str) -> RunResult<&Preset> {
        self.presets.get(&name.to_lowercase()).ok_or_else(|| {
            RunError::configuration(format!(
                "Unknown configuration: '{name}' (available: {})",
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Preset names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Preset)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The complexity table after any overrides.
    pub fn complexity_table(&self) -> &ComplexityTable {
        &self.complexity
    }

    /// Merges presets and complexity overrides from TOML text. Entries with
    /// an existing name replace the existing preset.
    pub fn merge_toml(&mut self, text: &str) -> Result<()> {
        let file: PresetFile = toml::from_str(text).context("Failed to parse presets TOML")?;
        for (name, entry) in file.presets {
            let preset = entry
                .into_preset(&name)
                .with_context(|| format!("Invalid preset '{name}'"))?;
            log::debug!("Loaded preset '{}': {:?}", name, preset);
            self.presets.insert(name.to_lowercase(), preset);
        }
        for (key, sizes) in file.complexity {
            let kind: WorkloadKind = key
                .parse()
                .with_context(|| format!("Invalid complexity override '{key}'"))?;
            self.complexity.set(kind, sizes);
        }
        Ok(())
    }

    /// Merges a `--presets` file.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read presets file at '{}'", path.display()))?;
        self.merge_toml(&text)
            .with_context(|| format!("Failed to load presets from '{}'", path.display()))
    }
}

/// Prints every preset for `--list-configs`.
pub fn print_presets(book: &PresetBook) {
    println!("\n{}", "=".repeat(60));
    println!("AVAILABLE TEST CONFIGURATIONS");
    println!("{}", "=".repeat(60));
    for (name, preset) in book.iter() {
        println!("\n{}", name.to_uppercase());
        println!("   Test type:   {}", preset.test_type);
        println!("   Load type:   {}", preset.load_type);
        println!("   Complexity:  {}", preset.complexity);
        println!("   Duration:    {} seconds", preset.duration.as_secs_f64());
        if let Some(mode) = preset.mode {
            println!("   Mode:        {}", mode);
        }
        println!("   Description: {}", preset.describe());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_presets_match_known_table() {
        let book = PresetBook::builtin();
        let mining = book.get("MINING").unwrap();
        assert_eq!(mining.test_type, WorkloadKind::NonceSearch);
        assert_eq!(mining.duration, Duration::from_secs(30));

        let neural = book.get("neural").unwrap();
        assert_eq!(neural.load_type, LoadProfile::Neural);
        assert_eq!(book.names().count(), 9);
    }

    #[test]
    fn toml_adds_presets_and_overrides_complexity() {
        let mut book = PresetBook::builtin();
        book.merge_toml(
            r#"
            [presets.soak]
            test_type = "full_load"
            load_type = "BOTH"
            complexity = "hard"
            duration = 45
            mode = "performance"

            [presets.quick]
            test_type = "prime_numbers"

            [complexity.matrix_operations]
            easy = 10
            medium = 20
            hard = 30
            "#,
        )
        .unwrap();

        let soak = book.get("soak").unwrap();
        assert_eq!(soak.test_type, WorkloadKind::Composite);
        assert_eq!(soak.mode, Some(RunMode::Performance));
        assert_eq!(soak.duration, Duration::from_secs(45));

        let quick = book.get("quick").unwrap();
        assert_eq!(quick.test_type, WorkloadKind::PrimeNumbers);
        assert_eq!(quick.complexity, ComplexityTier::Medium);

        assert_eq!(
            book.complexity_table()
                .size(WorkloadKind::MatrixOperations, ComplexityTier::Hard),
            30
        );
    }

    #[test]
    fn invalid_toml_entries_are_rejected() {
        let mut book = PresetBook::builtin();
        assert!(book
            .merge_toml("[presets.bad]\ntest_type = \"warp_drive\"\n")
            .is_err());
        assert!(book
            .merge_toml("[complexity.nope]\neasy = 1\nmedium = 2\nhard = 3\n")
            .is_err());
        assert!(book.get("bad").is_err());
    }

    #[test]
    fn reads_presets_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.toml");
        fs::write(&path, "[presets.tiny]\ntest_type = \"basic\"\nduration = 10\n").unwrap();

        let mut book = PresetBook::builtin();
        book.merge_file(&path).unwrap();
        assert_eq!(book.get("tiny").unwrap().test_type, WorkloadKind::Basic);
    }
}
