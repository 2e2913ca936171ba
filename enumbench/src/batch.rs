//! Batch generation: every test case crossed with every selected library.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::config::{TestCaseConfig, UsageMode};
use crate::emit::emit;
use crate::error::{Error, Result};
use crate::output::{Naming, OutputDir, WriteOutcome};
use crate::profile::{LibraryProfile, profile_for, profiles};

/// The literal suite used when no batch file is given.
pub fn builtin_suite() -> Vec<TestCaseConfig> {
    vec![
        TestCaseConfig::new(10, 16, "small_enums"),
        TestCaseConfig::new(50, 15, "big_enums"),
        TestCaseConfig::new(10, 64, "wide_range")
            .with_step(4)
            .with_range(-512, 512),
        TestCaseConfig::new(20, 15, "plain_enums").scoped(false),
        TestCaseConfig::new(10, 32, "sentinel_enums")
            .with_range(-1, 32)
            .with_sentinels(true),
        TestCaseConfig::new(20, 15, "runtime_calls").with_usage(UsageMode::Runtime),
    ]
}

/// Read a JSON array of test cases.
pub fn load_batch_file(path: &Path) -> Result<Vec<TestCaseConfig>> {
    let content = fs_err::read_to_string(path).map_err(|e| Error::io(path, e))?;
    facet_json::from_str::<Vec<TestCaseConfig>>(&content).map_err(|e| Error::Batch {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// One (test case, library) pair that could not be produced.
#[derive(Debug)]
pub struct Failure {
    /// The test case's `base_filename`
    pub case: String,
    /// The library identifier as requested
    pub library: String,
    /// What went wrong
    pub error: Error,
}

/// One (test case, library) pair that was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Library identifier
    pub library: &'static str,
    /// Output filename
    pub file_name: String,
    /// Number of enums in the file
    pub enum_count: i64,
    /// What happened on disk
    pub outcome: WriteOutcome,
}

/// Summary of a run.
#[derive(Debug, Default)]
pub struct Report {
    /// Pairs that produced a file (or were found up to date)
    pub generated: Vec<Generated>,
    /// Pairs that failed
    pub failures: Vec<Failure>,
    /// True when an I/O failure stopped the run before every pair was tried
    pub halted: bool,
}

impl Report {
    /// Pairs whose file is missing or outdated, in check mode.
    pub fn stale(&self) -> impl Iterator<Item = &Generated> {
        self.generated
            .iter()
            .filter(|g| g.outcome == WriteOutcome::Stale)
    }

    /// True when every pair succeeded and nothing is stale.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.stale().next().is_none()
    }
}

/// Drives generation for a list of test cases and libraries.
#[derive(Debug, Clone)]
pub struct Runner {
    out: OutputDir,
    naming: Naming,
    keep_going: bool,
    usage: Option<UsageMode>,
    quiet: bool,
}

impl Runner {
    /// Write into `out`, one file per library per test case.
    pub fn new(out: OutputDir) -> Self {
        Self {
            out,
            naming: Naming::PerLibrary,
            keep_going: false,
            usage: None,
            quiet: false,
        }
    }

    /// Use a fixed filename prefix instead of the library identifier.
    pub fn with_naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    /// Continue with remaining pairs after an I/O failure.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Force one usage mode for every test case.
    pub fn with_usage(mut self, usage: Option<UsageMode>) -> Self {
        self.usage = usage;
        self
    }

    /// Suppress the per-file confirmation lines on stdout.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Generate every (test case, library) pair, in order.
    ///
    /// An empty `libraries` selects every registered profile. Configuration
    /// and lookup errors only skip their own pair; an I/O error stops the run
    /// unless `keep_going` is set.
    pub fn run(&self, configs: &[TestCaseConfig], libraries: &[String]) -> Result<Report> {
        let selected: Vec<String> = if libraries.is_empty() {
            profiles().iter().map(|p| p.identifier.to_string()).collect()
        } else {
            libraries.to_vec()
        };

        if let Naming::Legacy { prefix } = &self.naming
            && selected.len() != 1
        {
            return Err(Error::invalid(
                prefix,
                format!(
                    "a filename prefix needs exactly one library, got {}",
                    selected.len()
                ),
            ));
        }

        let mut report = Report::default();
        'pairs: for config in configs {
            let config = match self.usage {
                Some(usage) => config.clone().with_usage(usage),
                None => config.clone(),
            };
            for library in &selected {
                match self.generate_one(&config, library) {
                    Ok(generated) => report.generated.push(generated),
                    Err(error) => {
                        let halt = error.is_io() && !self.keep_going;
                        tracing::warn!(
                            case = %config.base_filename,
                            library = %library,
                            "{error}"
                        );
                        report.failures.push(Failure {
                            case: config.base_filename.clone(),
                            library: library.clone(),
                            error,
                        });
                        if halt {
                            report.halted = true;
                            break 'pairs;
                        }
                    }
                }
            }
        }

        tracing::info!(
            generated = report.generated.len(),
            failed = report.failures.len(),
            "generation finished"
        );
        Ok(report)
    }

    fn generate_one(&self, config: &TestCaseConfig, library: &str) -> Result<Generated> {
        let profile: &'static LibraryProfile = profile_for(library)?;
        let source = emit(config, profile)?;
        let file_name = self.naming.file_name(profile, config);
        let outcome = self.out.write(&file_name, &source)?;

        if !self.quiet {
            self.confirm(profile, &file_name, config.enum_count, outcome);
        }

        Ok(Generated {
            library: profile.identifier,
            file_name,
            enum_count: config.enum_count,
            outcome,
        })
    }

    fn confirm(
        &self,
        profile: &LibraryProfile,
        file_name: &str,
        enum_count: i64,
        outcome: WriteOutcome,
    ) {
        let path = self.out.path_for(file_name);
        let status = match outcome {
            WriteOutcome::Written => "generated".green().to_string(),
            WriteOutcome::Unchanged => "unchanged".dimmed().to_string(),
            WriteOutcome::Stale => "out of date".yellow().to_string(),
        };
        println!(
            "{} {} {} ({} enums)",
            status,
            profile.identifier.blue(),
            path.display(),
            enum_count
        );
    }
}
