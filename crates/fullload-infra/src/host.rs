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

//! Static description of the host, gathered once for logs and reports.

use sysinfo::System;

/// Broad processor family of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorFamily {
    /// Intel/AMD x86_64.
    X86,
    /// Apple Silicon M-series, or another ARM design.
    M,
}

impl ProcessorFamily {
    fn detect(architecture: &str, cpu_brand: &str) -> Self {
        let arch = architecture.to_lowercase();
        if arch.contains("arm") || arch.contains("aarch64") || cpu_brand.to_lowercase().contains("apple") {
            ProcessorFamily::M
        } else {
            ProcessorFamily::X86
        }
    }

    /// Returns the short key of this family.
    pub fn key(&self) -> &'static str {
        match self {
            ProcessorFamily::X86 => "X86",
            ProcessorFamily::M => "M",
        }
    }
}

/// OS and hardware identification of the host.
#[derive(Debug, Clone)]
pub struct HostDescription {
    pub os_name: String,
    pub os_version: String,
    pub cpu_brand: String,
    pub architecture: String,
    pub processor_family: ProcessorFamily,
    pub logical_cpus: usize,
    pub total_memory_bytes: u64,
}

impl HostDescription {
    /// Queries the host. Fields the platform cannot report fall back to
    /// `"unknown"`.
    pub fn detect() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        system.refresh_memory();

        let cpu_brand = system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_owned())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "unknown".to_owned());
        let architecture = std::env::consts::ARCH.to_owned();

        Self {
            os_name: System::name().unwrap_or_else(|| "unknown".to_owned()),
            os_version: System::os_version().unwrap_or_else(|| "unknown".to_owned()),
            processor_family: ProcessorFamily::detect(&architecture, &cpu_brand),
            logical_cpus: system.cpus().len(),
            total_memory_bytes: system.total_memory(),
            cpu_brand,
            architecture,
        }
    }

    /// Total system memory in gibibytes.
    pub fn total_memory_gib(&self) -> f64 {
        self.total_memory_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_detection() {
        assert_eq!(ProcessorFamily::detect("x86_64", "AMD Ryzen 9"), ProcessorFamily::X86);
        assert_eq!(ProcessorFamily::detect("aarch64", "Apple M2"), ProcessorFamily::M);
        assert_eq!(ProcessorFamily::detect("arm64", "unknown"), ProcessorFamily::M);
    }

    #[test]
    fn detect_fills_every_field() {
        let host = HostDescription::detect();
        assert!(!host.os_name.is_empty());
        assert!(!host.architecture.is_empty());
        assert!(!host.cpu_brand.is_empty());
    }
}
