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


//! Prompt-driven selection of the test parameters.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use fullload_core::{ComplexityTier, LoadProfile, WorkloadKind};

/// Bounds on the duration an operator may enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    pub min: Duration,
    pub max: Duration,
    pub default: Duration,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(10),
            max: Duration::from_secs(60),
            default: Duration::from_secs(30),
        }
    }
}

impl RunLimits {
    pub fn contains(&self, duration: Duration) -> bool {
        (self.min..=self.max).contains(&duration)
    }
}

/// The parameters chosen at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub test_type: WorkloadKind,
    pub load_type: LoadProfile,
    pub complexity: ComplexityTier,
    pub duration: Duration,
}

/// Asks for each parameter in turn, re-prompting until the answer is valid.
///
/// An empty duration answer takes the default. Running out of input is an
/// [`io::ErrorKind::UnexpectedEof`] error.
pub fn select<R: BufRead, W: Write>(input: R, output: W, limits: &RunLimits) -> io::Result<Selection> {
    let mut prompt = Prompt { input, output };
    writeln!(prompt.output, "\n{}", "=".repeat(50))?;
    writeln!(prompt.output, "INTERACTIVE TEST CONFIGURATION")?;
    writeln!(prompt.output, "{}", "=".repeat(50))?;

    let tests: Vec<_> = WorkloadKind::ALL
        .iter()
        .map(|k| (*k, k.description()))
        .collect();
    let test_type = prompt.choose("Available test types", "test type", &tests)?;

    let loads: Vec<_> = LoadProfile::ALL
        .iter()
        .map(|l| (*l, l.description()))
        .collect();
    let load_type = prompt.choose("Available load types", "load type", &loads)?;

    let tiers: Vec<_> = ComplexityTier::ALL.iter().map(|t| (*t, "")).collect();
    let complexity = prompt.choose("Available complexity levels", "complexity", &tiers)?;

    let duration = prompt.duration(limits)?;

    let selection = Selection {
        test_type,
        load_type,
        complexity,
        duration,
    };
    writeln!(prompt.output, "\nSelected configuration:")?;
    writeln!(prompt.output, "   Test type:  {}", selection.test_type)?;
    writeln!(prompt.output, "   Load type:  {}", selection.load_type)?;
    writeln!(prompt.output, "   Complexity: {}", selection.complexity)?;
    writeln!(prompt.output, "   Duration:   {} seconds", selection.duration.as_secs())?;
    Ok(selection)
}

struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_owned())
    }

    fn choose<T: Copy + Display>(
        &mut self,
        title: &str,
        what: &str,
        options: &[(T, &str)],
    ) -> io::Result<T> {
        writeln!(self.output, "\n{}:", title)?;
        for (i, (value, description)) in options.iter().enumerate() {
            if description.is_empty() {
                writeln!(self.output, "   {}. {}", i + 1, value)?;
            } else {
                writeln!(self.output, "   {}. {} - {}", i + 1, value, description)?;
            }
        }
        loop {
            write!(self.output, "\nChoose {} (1-{}): ", what, options.len())?;
            self.output.flush()?;
            match self.read_line()?.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(options[n - 1].0),
                Ok(_) => writeln!(self.output, "Invalid choice. Try again.")?,
                Err(_) => writeln!(self.output, "Enter a number.")?,
            }
        }
    }

    fn duration(&mut self, limits: &RunLimits) -> io::Result<Duration> {
        loop {
            write!(
                self.output,
                "\nEnter the test duration in seconds ({}-{}, default {}): ",
                limits.min.as_secs(),
                limits.max.as_secs(),
                limits.default.as_secs()
            )?;
            self.output.flush()?;
            let answer = self.read_line()?;
            if answer.is_empty() {
                return Ok(limits.default);
            }
            match answer.parse::<u64>() {
                Ok(secs) if limits.contains(Duration::from_secs(secs)) => {
                    return Ok(Duration::from_secs(secs))
                }
                Ok(_) => writeln!(
                    self.output,
                    "Duration must be between {} and {} seconds.",
                    limits.min.as_secs(),
                    limits.max.as_secs()
                )?,
                Err(_) => writeln!(self.output, "Enter a number.")?,
            }
        }
    }
}
