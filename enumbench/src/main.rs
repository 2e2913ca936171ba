//! enumbench: generate C++ enum workloads for enum-reflection benchmarks.

use std::path::PathBuf;

use enumbench::{
    Error, Naming, OutputDir, Prompter, Runner, UsageMode, builtin_suite, load_batch_file,
    profiles,
};
use facet::Facet;
use facet_args as args;
use miette::Report;
use owo_colors::OwoColorize as _;

/// Generate synthetic C++ enum workloads for enum-reflection benchmarks.
#[derive(Facet, Debug)]
struct Args {
    /// Library to generate for; repeat for several (default: all registered)
    #[facet(args::named, args::short = 'l', default)]
    library: Vec<String>,

    /// Name files `{prefix}_{base_filename}.cpp` (needs exactly one library)
    #[facet(args::named, default)]
    prefix: Option<String>,

    /// Directory to write into (default: current directory)
    #[facet(args::named, args::short = 'o', default)]
    out_dir: Option<String>,

    /// Emit runtime lookups instead of static assertions
    #[facet(args::named)]
    runtime: bool,

    /// Report outdated files instead of writing them
    #[facet(args::named)]
    check: bool,

    /// Keep generating after a file could not be written
    #[facet(args::named, args::short = 'k')]
    keep_going: bool,

    /// Enable debug logging
    #[facet(args::named, args::short = 'v')]
    verbose: bool,

    #[facet(args::subcommand)]
    command: Command,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum Command {
    /// Ask for one test case on the terminal
    Interactive,
    /// Generate a JSON list of test cases, or the built-in suite
    Batch {
        #[facet(args::positional, default)]
        file: Option<String>,
    },
    /// Show the registered libraries
    List,
}

/// What the command line asked for.
#[derive(Debug)]
enum Invocation {
    Run(Args),
    Help(String),
    Invalid(String),
}

/// Parse arguments, separating a help request from a real parse failure.
fn parse_invocation(argv: &[&str]) -> Invocation {
    match args::from_slice::<Args>(argv) {
        Ok(args) => Invocation::Run(args),
        Err(e) if e.is_help_request() => {
            Invocation::Help(e.help_text().unwrap_or_default().to_string())
        }
        Err(e) => Invocation::Invalid(e.to_string()),
    }
}

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    let args = match parse_invocation(&argv) {
        Invocation::Run(args) => args,
        Invocation::Help(text) => {
            println!("{text}");
            return;
        }
        Invocation::Invalid(message) => {
            eprintln!("{} {message}", "error:".red());
            std::process::exit(2);
        }
    };

    enumbench::logging::init(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{:?}", Report::new(e));
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when some pair failed or, in check mode, is outdated.
fn run(args: Args) -> Result<bool, Error> {
    let configs = match &args.command {
        Command::List => {
            list_profiles();
            return Ok(true);
        }
        Command::Interactive => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            vec![Prompter::new(stdin.lock(), stdout.lock()).ask_test_case()?]
        }
        Command::Batch { file: Some(file) } => load_batch_file(&PathBuf::from(file))?,
        Command::Batch { file: None } => builtin_suite(),
    };

    let naming = match &args.prefix {
        Some(prefix) => Naming::legacy(prefix.as_str())?,
        None => Naming::PerLibrary,
    };
    let out_dir = args.out_dir.as_deref().unwrap_or(".");
    let runner = Runner::new(OutputDir::new(out_dir).check_only(args.check))
        .with_naming(naming)
        .with_usage(args.runtime.then_some(UsageMode::Runtime))
        .keep_going(args.keep_going);

    let report = runner.run(&configs, &args.library)?;
    let clean = report.is_clean();
    let stale = report.stale().count();

    if report.halted {
        eprintln!(
            "{}",
            "stopped after an I/O error (use --keep-going to continue past it)".yellow()
        );
    }
    for failure in report.failures {
        eprintln!(
            "{} {} / {}: {:?}",
            "failed".red(),
            failure.case,
            failure.library,
            Report::new(failure.error)
        );
    }
    if stale > 0 {
        eprintln!(
            "{} {stale} generated file(s) are out of date; run without --check to update them",
            "⚠️".yellow()
        );
    }

    Ok(clean)
}

fn list_profiles() {
    for profile in profiles() {
        let range = match &profile.range_macros {
            Some(macros) => format!("{} / {}", macros.min, macros.max),
            None => "first/last sentinels".to_string(),
        };
        let shape = match profile.call_shape.adapter() {
            Some(_) => "adapter",
            None => "direct",
        };
        let identifier = format!("{:<14}", profile.identifier);
        println!(
            "{} <{}> {} ({shape}), range: {range}",
            identifier.blue(),
            profile.include_path,
            profile.call_shape.function(),
        );
    }
}
