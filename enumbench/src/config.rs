//! Test case configuration: the shape of one synthetic workload.

use facet::Facet;

use crate::error::{Error, Result};

/// How the generated enumerators are exercised.
#[derive(Facet, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[facet(rename_all = "snake_case")]
#[repr(u8)]
pub enum UsageMode {
    /// One `static_assert` per enumerator, comparing the reflected name
    #[default]
    StaticAssert,
    /// One runtime lookup per enum type, routed through a volatile sink
    Runtime,
}

fn default_min_range() -> i64 {
    -256
}

fn default_max_range() -> i64 {
    256
}

fn default_step() -> i64 {
    1
}

fn default_scoped() -> bool {
    true
}

/// One workload shape, paired with every selected library.
///
/// Counts are signed so that nonsense coming from a prompt or a batch file
/// survives until [`TestCaseConfig::validate`] can reject it by name.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct TestCaseConfig {
    /// Number of enum types
    pub enum_count: i64,
    /// Enumerators per enum type
    pub value_count: i64,
    /// Stem of the output filename
    pub base_filename: String,
    /// Declared lower bound of the reflectable range
    #[facet(default = default_min_range())]
    pub min_range: i64,
    /// Declared upper bound of the reflectable range
    #[facet(default = default_max_range())]
    pub max_range: i64,
    /// `enum class` when true, plain `enum` otherwise
    #[facet(default = default_scoped())]
    pub is_scoped: bool,
    /// Distance between consecutive enumerator values
    #[facet(default = default_step())]
    pub step: i64,
    /// Append `first`/`last` enumerators bound to the range
    #[facet(default = false)]
    pub sentinels: bool,
    /// How the enumerators are used
    #[facet(default = UsageMode::StaticAssert)]
    pub usage: UsageMode,
}

/// A configuration that passed validation, in the units the emitter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Number of enum types
    pub enum_count: usize,
    /// Enumerators per type, sentinels excluded
    pub value_count: usize,
    /// Stride between enumerator values
    pub step: i32,
}

impl TestCaseConfig {
    /// A scoped, step-1, static-assert workload with the default range.
    pub fn new(enum_count: i64, value_count: i64, base_filename: impl Into<String>) -> Self {
        Self {
            enum_count,
            value_count,
            base_filename: base_filename.into(),
            min_range: default_min_range(),
            max_range: default_max_range(),
            is_scoped: default_scoped(),
            step: default_step(),
            sentinels: false,
            usage: UsageMode::default(),
        }
    }

    /// Set the declared range.
    pub fn with_range(mut self, min_range: i64, max_range: i64) -> Self {
        self.min_range = min_range;
        self.max_range = max_range;
        self
    }

    /// Emit `enum class` (true) or plain `enum` (false).
    pub fn scoped(mut self, is_scoped: bool) -> Self {
        self.is_scoped = is_scoped;
        self
    }

    /// Set the stride between enumerator values.
    pub fn with_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Toggle the `first`/`last` sentinel enumerators.
    pub fn with_sentinels(mut self, sentinels: bool) -> Self {
        self.sentinels = sentinels;
        self
    }

    /// Select how enumerators are exercised.
    pub fn with_usage(mut self, usage: UsageMode) -> Self {
        self.usage = usage;
        self
    }

    /// Check every constraint the emitter relies on.
    ///
    /// Enumerator values outside `[min_range, max_range]` are accepted: such a
    /// file is a deliberate out-of-range stress case.
    pub fn validate(&self) -> Result<Layout> {
        let invalid = |reason: String| Error::invalid(&self.base_filename, reason);

        check_filename_fragment(&self.base_filename)
            .map_err(|reason| invalid(format!("base_filename {reason}")))?;

        if self.enum_count <= 0 {
            return Err(invalid(format!(
                "enum_count must be positive, got {}",
                self.enum_count
            )));
        }
        if self.value_count <= 0 {
            return Err(invalid(format!(
                "value_count must be positive, got {}",
                self.value_count
            )));
        }
        if self.step <= 0 {
            return Err(invalid(format!("step must be positive, got {}", self.step)));
        }
        let step = i32::try_from(self.step)
            .map_err(|_| invalid(format!("step {} does not fit in int", self.step)))?;
        if self.min_range > self.max_range {
            return Err(invalid(format!(
                "min_range {} is greater than max_range {}",
                self.min_range, self.max_range
            )));
        }

        let largest = (self.value_count - 1)
            .checked_mul(self.step)
            .filter(|v| *v <= i64::from(i32::MAX))
            .ok_or_else(|| {
                invalid(format!(
                    "enumerator values up to ({} - 1) * {} do not fit in int",
                    self.value_count, self.step
                ))
            })?;

        if self.sentinels {
            for bound in [self.min_range, self.max_range] {
                if i32::try_from(bound).is_err() {
                    return Err(invalid(format!("sentinel value {bound} does not fit in int")));
                }
            }
            if !self.is_scoped && self.enum_count > 1 {
                return Err(invalid(
                    "sentinel enumerators of plain enums collide when more than one enum is generated"
                        .to_string(),
                ));
            }
        }

        if largest > self.max_range || self.min_range > 0 {
            tracing::debug!(
                case = %self.base_filename,
                largest,
                min_range = self.min_range,
                max_range = self.max_range,
                "enumerator values fall outside the declared range"
            );
        }

        Ok(Layout {
            enum_count: to_usize(self.enum_count),
            value_count: to_usize(self.value_count),
            step,
        })
    }
}

fn to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Reject strings that would escape the output directory or name nothing.
pub(crate) fn check_filename_fragment(fragment: &str) -> std::result::Result<(), String> {
    if fragment.is_empty() {
        return Err("must not be empty".to_string());
    }
    if fragment == "." || fragment == ".." {
        return Err(format!("must not be `{fragment}`"));
    }
    if let Some(c) = fragment.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(format!("must not contain {c:?}"));
    }
    Ok(())
}
