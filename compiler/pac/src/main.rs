//! `pa`: power-assert for a JavaScript test subset.

use std::path::{Path, PathBuf};

use pac::commands::{
    format_file_results, format_test_summary, run_file, run_tests, write_instrumented,
};
use pac::{init_tracing, ColorMode, CommandError, TestRunnerConfig};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let code = match args[1].as_str() {
        "instrument" => instrument(&args[2..]),
        "run" => run(&args[2..]),
        "test" => test(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        "version" | "--version" | "-V" => {
            println!("pa {}", env!("CARGO_PKG_VERSION"));
            0
        }
        command => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            1
        }
    };
    std::process::exit(code);
}

fn report(err: &CommandError, color: ColorMode) -> i32 {
    eprintln!("{}", err.render(color.enabled()));
    1
}

fn instrument(args: &[String]) -> i32 {
    let mut file = None;
    let mut out = None;
    for arg in args {
        if let Some(path) = arg.strip_prefix("--out=") {
            out = Some(PathBuf::from(path));
        } else if !arg.starts_with('-') && file.is_none() {
            file = Some(arg.as_str());
        } else {
            eprintln!("error: unexpected argument '{arg}'");
            return 1;
        }
    }

    let Some(file) = file else {
        eprintln!("Usage: pa instrument <file> [--out=<path>]");
        return 1;
    };

    match write_instrumented(Path::new(file), out.as_deref()) {
        Ok(()) => 0,
        Err(err) => report(&err, ColorMode::Auto),
    }
}

fn run(args: &[String]) -> i32 {
    let mut file = None;
    let mut color = ColorMode::Auto;
    for arg in args {
        if let Some(value) = arg.strip_prefix("--color=") {
            let Some(mode) = ColorMode::parse(value) else {
                eprintln!("error: invalid color mode '{value}' (expected auto, always or never)");
                return 1;
            };
            color = mode;
        } else if !arg.starts_with('-') && file.is_none() {
            file = Some(arg.as_str());
        }
    }

    let Some(file) = file else {
        eprintln!("Usage: pa run <file> [--color=<mode>]");
        return 1;
    };

    match run_file(Path::new(file), color) {
        Ok(summary) => {
            print!("{}", format_file_results(&summary, true, color.enabled()));
            i32::from(summary.has_failures())
        }
        Err(err) => report(&err, color),
    }
}

fn test(args: &[String]) -> i32 {
    // Path is optional; flags can come before or after it.
    let mut path: Option<String> = None;
    let mut config = TestRunnerConfig::default();

    for arg in args {
        if let Some(filter) = arg.strip_prefix("--filter=") {
            config.filter = Some(filter.to_string());
        } else if arg == "--verbose" || arg == "-v" {
            config.verbose = true;
        } else if arg == "--no-parallel" {
            config.parallel = false;
        } else if let Some(value) = arg.strip_prefix("--color=") {
            let Some(mode) = ColorMode::parse(value) else {
                eprintln!("error: invalid color mode '{value}' (expected auto, always or never)");
                return 1;
            };
            config.color = mode;
        } else if !arg.starts_with('-') && path.is_none() {
            path = Some(arg.clone());
        }
    }

    let path = path.unwrap_or_else(|| ".".to_string());
    match run_tests(Path::new(&path), &config) {
        Ok(summary) => {
            print!(
                "{}",
                format_test_summary(&summary, config.verbose, config.color.enabled())
            );
            summary.exit_code()
        }
        Err(err) => report(&err, config.color),
    }
}

fn print_usage() {
    println!("pa: power-assert diagrams for JavaScript tests");
    println!();
    println!("Usage: pa <command> [options]");
    println!();
    println!("Commands:");
    println!("  instrument <file>    Print the file with its assertions instrumented");
    println!("  run <file>           Evaluate a file and run the tests it registers");
    println!("  test [path]          Discover and run test files (default: current directory)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Instrument options:");
    println!("  --out=<path>         Write to a file instead of stdout");
    println!();
    println!("Run and test options:");
    println!("  --filter=<pattern>   Only run tests whose name contains pattern");
    println!("  --verbose, -v        List passing tests and console output");
    println!("  --no-parallel        Run files sequentially");
    println!("  --color=<mode>       auto (default), always, never");
    println!();
    println!("Test files are named *.test.js, *_test.js, *.test.mjs or *_test.mjs.");
    println!();
    println!("Examples:");
    println!("  pa instrument math.test.js");
    println!("  pa run math.test.js");
    println!("  pa test tests/ --filter=parser");
}
