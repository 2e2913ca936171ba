#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod batch;
pub mod config;
pub mod emit;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod output;
pub mod profile;

pub use batch::{Report, Runner, builtin_suite, load_batch_file};
pub use config::{Layout, TestCaseConfig, UsageMode};
pub use emit::{GeneratedEnum, emit, generated_enums};
pub use error::{Error, Result};
pub use interactive::Prompter;
pub use output::{Naming, OutputDir, WriteOutcome};
pub use profile::{CallShape, LibraryProfile, RangeMacros, profile_for, profiles};
