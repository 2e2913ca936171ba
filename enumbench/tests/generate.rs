//! Whole runs: test cases crossed with libraries, written into a scratch directory.

use std::path::Path;

use enumbench::{
    Error, Naming, OutputDir, Prompter, Runner, TestCaseConfig, UsageMode, WriteOutcome,
    load_batch_file, profiles,
};

mod common;

fn runner(dir: &Path) -> Runner {
    Runner::new(OutputDir::new(dir)).quiet(true)
}

fn libs(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn every_library_gets_its_own_file() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();

    let configs = [
        TestCaseConfig::new(3, 4, "small"),
        TestCaseConfig::new(2, 8, "wide").with_step(3),
    ];
    let report = runner(dir.path()).run(&configs, &[]).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.generated.len(), configs.len() * profiles().len());
    insta::assert_snapshot!(files_in(dir.path()).join("\n"), @r"
    conjure_enum_small.cpp
    conjure_enum_wide.cpp
    enchantum_small.cpp
    enchantum_wide.cpp
    magic_enum_small.cpp
    magic_enum_wide.cpp
    simple_enum_small.cpp
    simple_enum_wide.cpp
    ");

    let magic = std::fs::read_to_string(dir.path().join("magic_enum_small.cpp")).unwrap();
    assert!(magic.contains("#include <magic_enum/magic_enum.hpp>"));
    assert_eq!(common::count(&magic, "static_assert("), 12);
}

#[test]
fn generated_pairs_follow_case_then_library_order() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();

    let configs = [
        TestCaseConfig::new(1, 1, "one"),
        TestCaseConfig::new(1, 1, "two"),
    ];
    let report = runner(dir.path())
        .run(&configs, &libs(&["simple_enum", "enchantum"]))
        .unwrap();
    let order: Vec<&str> = report.generated.iter().map(|g| g.file_name.as_str()).collect();
    assert_eq!(
        order,
        [
            "simple_enum_one.cpp",
            "enchantum_one.cpp",
            "simple_enum_two.cpp",
            "enchantum_two.cpp"
        ]
    );
}

#[test]
fn unknown_library_only_fails_its_own_pairs() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();

    let configs = [
        TestCaseConfig::new(2, 2, "a"),
        TestCaseConfig::new(2, 2, "b"),
    ];
    let report = runner(dir.path())
        .run(&configs, &libs(&["magic_enum", "boost_describe"]))
        .unwrap();

    assert!(!report.halted);
    assert!(!report.is_clean());
    assert_eq!(files_in(dir.path()), ["magic_enum_a.cpp", "magic_enum_b.cpp"]);
    assert_eq!(report.failures.len(), 2);
    for failure in &report.failures {
        assert_eq!(failure.library, "boost_describe");
        assert!(matches!(failure.error, Error::UnknownLibrary { .. }));
    }
}

#[test]
fn invalid_case_is_skipped_without_touching_disk() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();

    let configs = [
        TestCaseConfig::new(2, 0, "empty"),
        TestCaseConfig::new(1, 2, "fine"),
    ];
    let report = runner(dir.path())
        .run(&configs, &libs(&["enchantum"]))
        .unwrap();

    assert_eq!(files_in(dir.path()), ["enchantum_fine.cpp"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].case, "empty");
    assert!(matches!(
        report.failures[0].error,
        Error::InvalidConfiguration { .. }
    ));
}

#[test]
fn io_failure_halts_unless_keep_going() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let configs = [
        TestCaseConfig::new(1, 1, "a"),
        TestCaseConfig::new(1, 1, "b"),
    ];
    let libraries = libs(&["enchantum", "magic_enum"]);

    let report = runner(&missing).run(&configs, &libraries).unwrap();
    assert!(report.halted);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].error.is_io());

    let report = runner(&missing)
        .keep_going(true)
        .run(&configs, &libraries)
        .unwrap();
    assert!(!report.halted);
    assert_eq!(report.failures.len(), 4);
    assert!(report.generated.is_empty());
}

#[test]
fn check_mode_reports_stale_files_and_leaves_them_alone() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();
    let configs = [TestCaseConfig::new(2, 3, "checked")];
    let libraries = libs(&["enchantum", "simple_enum"]);

    runner(dir.path()).run(&configs, &libraries).unwrap();

    let checker = Runner::new(OutputDir::new(dir.path()).check_only(true)).quiet(true);
    let report = checker.run(&configs, &libraries).unwrap();
    assert!(report.is_clean());
    assert!(
        report
            .generated
            .iter()
            .all(|g| g.outcome == WriteOutcome::Unchanged)
    );

    let edited = dir.path().join("simple_enum_checked.cpp");
    std::fs::write(&edited, "// hand edited\n").unwrap();
    let report = checker.run(&configs, &libraries).unwrap();
    assert!(!report.is_clean());
    let stale: Vec<&str> = report.stale().map(|g| g.file_name.as_str()).collect();
    assert_eq!(stale, ["simple_enum_checked.cpp"]);
    assert_eq!(std::fs::read_to_string(&edited).unwrap(), "// hand edited\n");
}

#[test]
fn usage_override_applies_to_every_case() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();

    runner(dir.path())
        .with_usage(Some(UsageMode::Runtime))
        .run(&[TestCaseConfig::new(3, 2, "forced")], &libs(&["enchantum"]))
        .unwrap();

    let source = std::fs::read_to_string(dir.path().join("enchantum_forced.cpp")).unwrap();
    assert!(source.contains("int main() {"));
    assert_eq!(common::count(&source, "static_assert("), 0);
}

#[test]
fn legacy_prefix_names_single_library_output() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();

    let report = runner(dir.path())
        .with_naming(Naming::legacy("fast").unwrap())
        .run(&[TestCaseConfig::new(1, 3, "big_enums")], &libs(&["conjure_enum"]))
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(files_in(dir.path()), ["fast_big_enums.cpp"]);
    let source = std::fs::read_to_string(dir.path().join("fast_big_enums.cpp")).unwrap();
    assert!(source.contains("conjure_enum_name(A_0::A_0_2)"));
}

#[test]
fn batch_file_fills_in_defaults() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cases.json");
    std::fs::write(
        &path,
        r#"[
            {"enum_count": 3, "value_count": 4, "base_filename": "from_json"},
            {
                "enum_count": 1,
                "value_count": 2,
                "base_filename": "plain",
                "is_scoped": false,
                "step": 2,
                "min_range": -8,
                "max_range": 8,
                "usage": "runtime"
            }
        ]"#,
    )
    .unwrap();

    let configs = load_batch_file(&path).unwrap();
    assert_eq!(
        configs,
        [
            TestCaseConfig::new(3, 4, "from_json"),
            TestCaseConfig::new(1, 2, "plain")
                .scoped(false)
                .with_step(2)
                .with_range(-8, 8)
                .with_usage(UsageMode::Runtime),
        ]
    );
}

#[test]
fn malformed_batch_file_is_a_batch_error() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cases.json");
    std::fs::write(&path, "[{\"enum_count\": \"many\"}]").unwrap();

    let err = load_batch_file(&path).unwrap_err();
    assert!(matches!(err, Error::Batch { .. }), "{err:?}");

    let err = load_batch_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn interactive_answers_drive_a_run() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();

    let mut prompts = Vec::new();
    let config = Prompter::new("4\n6\n3\nasked\n-16\n16\n\n".as_bytes(), &mut prompts)
        .ask_test_case()
        .unwrap();
    assert_eq!(config, TestCaseConfig::new(2, 3, "asked").with_range(-16, 16));

    runner(dir.path())
        .run(&[config], &libs(&["magic_enum"]))
        .unwrap();
    let source = std::fs::read_to_string(dir.path().join("magic_enum_asked.cpp")).unwrap();
    assert!(source.contains("#define MAGIC_ENUM_RANGE_MIN (-16)"));
    assert!(source.contains("enum class A_1 : int {"));
    assert!(!source.contains("A_2"));
}
