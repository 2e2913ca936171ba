//! Static registry of the enum-reflection libraries we generate workloads for.
//!
//! A profile records how a library is included, how an enum value is turned
//! into its name, and which macros (if any) configure the range the library
//! scans. Profiles are plain `'static` data and never change at runtime.

use crate::error::{Error, Result};

/// How a library's name lookup is spelled at a use site.
///
/// The emitted accessor expression is always `function(value)`. Libraries
/// whose native API is not a free function taking the value get a small
/// generated wrapper that gives them that shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// The library already exposes `function(value) -> string_view`
    Direct {
        /// Fully qualified free function
        function: &'static str,
    },
    /// The library needs a wrapper, emitted once after the include
    AdapterWrapped {
        /// Source of the wrapper, emitted verbatim
        adapter: &'static str,
        /// Name of the function the wrapper defines
        function: &'static str,
    },
}

impl CallShape {
    /// The function applied to an enum value at every use site.
    pub fn function(&self) -> &'static str {
        match self {
            CallShape::Direct { function } | CallShape::AdapterWrapped { function, .. } => {
                *function
            }
        }
    }

    /// Wrapper source to inject before any use, if this shape needs one.
    pub fn adapter(&self) -> Option<&'static str> {
        match self {
            CallShape::Direct { .. } => None,
            CallShape::AdapterWrapped { adapter, .. } => Some(*adapter),
        }
    }

    /// Spell out a name lookup for `value`.
    pub fn call(&self, value: &str) -> String {
        format!("{}({value})", self.function())
    }
}

/// The pair of macros a library reads at include time to learn its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMacros {
    /// Lower bound macro
    pub min: &'static str,
    /// Upper bound macro
    pub max: &'static str,
}

/// Everything the emitter needs to know about one library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryProfile {
    /// Unique name, used as the output filename prefix
    pub identifier: &'static str,
    /// Header passed to `#include <...>`
    pub include_path: &'static str,
    /// Use-site spelling of the name lookup
    pub call_shape: CallShape,
    /// `None` when the library infers its range structurally
    pub range_macros: Option<RangeMacros>,
}

const CONJURE_ENUM_ADAPTER: &str = "\
template <typename E>
constexpr std::string_view conjure_enum_name(E value) noexcept {
  return FIX8::conjure_enum<E>::enum_to_string(value);
}
";

static PROFILES: &[LibraryProfile] = &[
    LibraryProfile {
        identifier: "enchantum",
        include_path: "enchantum/enchantum.hpp",
        call_shape: CallShape::Direct {
            function: "enchantum::to_string",
        },
        range_macros: Some(RangeMacros {
            min: "ENCHANTUM_MIN_RANGE",
            max: "ENCHANTUM_MAX_RANGE",
        }),
    },
    LibraryProfile {
        identifier: "magic_enum",
        include_path: "magic_enum/magic_enum.hpp",
        call_shape: CallShape::Direct {
            function: "magic_enum::enum_name",
        },
        range_macros: Some(RangeMacros {
            min: "MAGIC_ENUM_RANGE_MIN",
            max: "MAGIC_ENUM_RANGE_MAX",
        }),
    },
    LibraryProfile {
        identifier: "simple_enum",
        include_path: "simple_enum/simple_enum.hpp",
        call_shape: CallShape::Direct {
            function: "simple_enum::enum_name",
        },
        range_macros: None,
    },
    LibraryProfile {
        identifier: "conjure_enum",
        include_path: "fix8/conjure_enum.hpp",
        call_shape: CallShape::AdapterWrapped {
            adapter: CONJURE_ENUM_ADAPTER,
            function: "conjure_enum_name",
        },
        range_macros: Some(RangeMacros {
            min: "FIX8_CONJURE_ENUM_MIN_VALUE",
            max: "FIX8_CONJURE_ENUM_MAX_VALUE",
        }),
    },
];

/// All registered profiles, in registration order.
pub fn profiles() -> &'static [LibraryProfile] {
    PROFILES
}

/// Look up a profile by identifier.
pub fn profile_for(identifier: &str) -> Result<&'static LibraryProfile> {
    PROFILES
        .iter()
        .find(|p| p.identifier == identifier)
        .ok_or_else(|| Error::UnknownLibrary {
            name: identifier.to_string(),
            suggestion: closest_identifier(identifier),
            known: PROFILES.iter().map(|p| p.identifier).collect(),
        })
}

fn closest_identifier(unknown: &str) -> Option<&'static str> {
    const SIMILARITY_THRESHOLD: f64 = 0.8;

    let mut best_match: Option<(&'static str, f64)> = None;
    for known in PROFILES.iter().map(|p| p.identifier) {
        let similarity = strsim::jaro_winkler(unknown, known);
        if similarity >= SIMILARITY_THRESHOLD
            && best_match.is_none_or(|(_, best)| similarity > best)
        {
            best_match = Some((known, similarity));
        }
    }
    best_match.map(|(known, _)| known)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for p in profiles() {
            assert!(seen.insert(p.identifier), "duplicate {}", p.identifier);
        }
    }

    #[test]
    fn lookup_finds_every_registered_profile() {
        for p in profiles() {
            assert_eq!(profile_for(p.identifier).unwrap(), p);
        }
    }

    #[test]
    fn unknown_library_suggests_close_match() {
        let err = profile_for("magic-enum").unwrap_err();
        match err {
            Error::UnknownLibrary {
                name,
                suggestion,
                known,
            } => {
                assert_eq!(name, "magic-enum");
                assert_eq!(suggestion, Some("magic_enum"));
                assert_eq!(known.len(), profiles().len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_library_without_close_match() {
        let err = profile_for("boost_describe").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownLibrary {
                suggestion: None,
                ..
            }
        ));
    }

    #[test]
    fn adapter_shape_exposes_wrapper() {
        let conjure = profile_for("conjure_enum").unwrap();
        let adapter = conjure.call_shape.adapter().unwrap();
        assert!(adapter.contains("constexpr std::string_view conjure_enum_name(E value)"));
        assert_eq!(conjure.call_shape.call("A_0::A_0_1"), "conjure_enum_name(A_0::A_0_1)");

        let enchantum = profile_for("enchantum").unwrap();
        assert_eq!(enchantum.call_shape.adapter(), None);
        assert_eq!(enchantum.call_shape.call("v"), "enchantum::to_string(v)");
    }
}
