//! Source emitter: turns a test case and a library profile into C++ text.
//!
//! The output is assembled in a fixed order. Range macros must precede the
//! include because library headers read them at include time, and an adapter
//! must precede its first use.

use crate::config::{Layout, TestCaseConfig, UsageMode};
use crate::error::Result;
use crate::profile::LibraryProfile;

/// Name of the sentinel bound to `min_range`
pub const FIRST_SENTINEL: &str = "first";
/// Name of the sentinel bound to `max_range`
pub const LAST_SENTINEL: &str = "last";

/// One enum type as it will appear in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEnum {
    /// Type name, `A_{index}`
    pub name: String,
    /// `enum class` vs `enum`
    pub scoped: bool,
    /// Ordered `(name, value)` pairs, sentinels last
    pub enumerators: Vec<(String, i64)>,
}

impl GeneratedEnum {
    fn new(index: usize, config: &TestCaseConfig, layout: &Layout) -> Self {
        let name = type_name(index);
        let mut enumerators: Vec<(String, i64)> = (0..layout.value_count)
            .map(|j| (enumerator_name(index, j), j as i64 * i64::from(layout.step)))
            .collect();
        if config.sentinels {
            enumerators.push((FIRST_SENTINEL.to_string(), config.min_range));
            enumerators.push((LAST_SENTINEL.to_string(), config.max_range));
        }
        Self {
            name,
            scoped: config.is_scoped,
            enumerators,
        }
    }

    /// The C++ declaration, terminated by `};` and a newline.
    pub fn declaration(&self) -> String {
        let mut out = String::new();
        let keyword = if self.scoped { "enum class" } else { "enum" };
        out.push_str(&format!("{keyword} {} : int {{\n", self.name));
        let body = self
            .enumerators
            .iter()
            .map(|(name, value)| format!("  {name} = {value}"))
            .collect::<Vec<_>>()
            .join(",\n");
        out.push_str(&body);
        out.push_str("\n};\n");
        out
    }

    /// Qualified reference to an enumerator, `A_i::A_i_j`.
    pub fn qualified(&self, enumerator: &str) -> String {
        format!("{}::{enumerator}", self.name)
    }

    /// The generated (non-sentinel) enumerators.
    pub fn values(&self, layout: &Layout) -> &[(String, i64)] {
        &self.enumerators[..layout.value_count]
    }
}

/// Type name of the `index`-th enum.
pub fn type_name(index: usize) -> String {
    format!("A_{index}")
}

/// Name of enumerator `value` of enum `index`; also its expected reflected name.
pub fn enumerator_name(index: usize, value: usize) -> String {
    format!("A_{index}_{value}")
}

/// Build every enum type described by a validated configuration.
pub fn generated_enums(config: &TestCaseConfig, layout: &Layout) -> Vec<GeneratedEnum> {
    (0..layout.enum_count)
        .map(|i| GeneratedEnum::new(i, config, layout))
        .collect()
}

/// Produce the complete source file for one (test case, library) pair.
pub fn emit(config: &TestCaseConfig, profile: &LibraryProfile) -> Result<String> {
    let layout = config.validate()?;
    let enums = generated_enums(config, &layout);

    let mut output = String::new();
    output.push_str(&format!(
        "// Generated by enumbench for {}: {} enums x {} values, step {}, range [{}, {}]\n",
        profile.identifier,
        layout.enum_count,
        layout.value_count,
        layout.step,
        config.min_range,
        config.max_range
    ));

    if let Some(macros) = &profile.range_macros {
        output.push_str(&format!(
            "#define {} {}\n",
            macros.min,
            macro_literal(config.min_range)
        ));
        output.push_str(&format!(
            "#define {} {}\n",
            macros.max,
            macro_literal(config.max_range)
        ));
        output.push('\n');
    }

    output.push_str(&format!("#include <{}>\n\n", profile.include_path));

    if let Some(adapter) = profile.call_shape.adapter() {
        output.push_str(adapter);
        if !adapter.ends_with('\n') {
            output.push('\n');
        }
        output.push('\n');
    }

    for generated in &enums {
        output.push_str(&generated.declaration());
        output.push('\n');
    }

    match config.usage {
        UsageMode::StaticAssert => emit_static_asserts(&mut output, &enums, &layout, profile),
        UsageMode::Runtime => emit_runtime_calls(&mut output, &enums, &layout, profile),
    }

    tracing::debug!(
        library = profile.identifier,
        case = %config.base_filename,
        bytes = output.len(),
        "emitted source"
    );
    Ok(output)
}

fn emit_static_asserts(
    output: &mut String,
    enums: &[GeneratedEnum],
    layout: &Layout,
    profile: &LibraryProfile,
) {
    for generated in enums {
        for (name, _) in generated.values(layout) {
            let call = profile.call_shape.call(&generated.qualified(name));
            output.push_str(&format!("static_assert({call} == \"{name}\");\n"));
        }
    }
}

/// Each type gets a volatile global holding its last enumerator, so the
/// compiler cannot fold the lookup; every result is stored through a volatile
/// pointer so the call cannot be dropped as dead code.
fn emit_runtime_calls(
    output: &mut String,
    enums: &[GeneratedEnum],
    layout: &Layout,
    profile: &LibraryProfile,
) {
    for (i, generated) in enums.iter().enumerate() {
        let Some((last, _)) = generated.values(layout).last() else {
            continue;
        };
        output.push_str(&format!(
            "volatile {} value_{i} = {};\n",
            generated.name,
            generated.qualified(last)
        ));
    }
    output.push('\n');

    output.push_str("int main() {\n");
    output.push_str("  const char* volatile sink = nullptr;\n");
    for (i, generated) in enums.iter().enumerate() {
        let call = profile
            .call_shape
            .call(&format!("static_cast<{}>(value_{i})", generated.name));
        output.push_str(&format!("  sink = {call}.data();\n"));
    }
    output.push_str("  (void)sink;\n");
    output.push_str("  return 0;\n");
    output.push_str("}\n");
}

/// Negative bounds are parenthesized so the macro expands safely anywhere.
fn macro_literal(value: i64) -> String {
    if value < 0 {
        format!("({value})")
    } else {
        value.to_string()
    }
}
