//! Hoist CLI
//!
//! Runs scripts with `var`/`let`/`const` scoping, hoisting and the temporal
//! dead zone enforced.

use hoistc::commands::{check_file, explain_error, lex_file, parse_file, parse_file_args, run_file};
use hoistc::init_tracing;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" | "check" | "lex" | "parse" => {
            let file_args = match parse_file_args(&args[2..]) {
                Ok(file_args) => file_args,
                Err(message) => {
                    eprintln!("error: {message}");
                    std::process::exit(1);
                }
            };
            let Some(path) = file_args.path.as_deref() else {
                eprintln!("error: missing file path");
                eprintln!("Usage: hoist {command} <file.js>");
                std::process::exit(1);
            };
            match command.as_str() {
                "run" => run_file(path, file_args.options, file_args.color),
                "check" => check_file(path, file_args.color),
                "lex" => lex_file(path),
                _ => parse_file(path),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("hoist {}", env!("CARGO_PKG_VERSION"));
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: hoist explain <ERROR_CODE>");
                eprintln!("Example: hoist explain E6001");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        _ => {
            // `hoist script.js` is shorthand for `hoist run script.js`
            let is_script = std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("js"));
            if is_script {
                match parse_file_args(&args[1..]) {
                    Ok(file_args) => run_file(command, file_args.options, file_args.color),
                    Err(message) => {
                        eprintln!("error: {message}");
                        std::process::exit(1);
                    }
                }
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("hoist - run scripts with lexical scoping checks");
    println!();
    println!("Usage: hoist <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.js>        Evaluate a script");
    println!("  check <file.js>      Report syntax errors without running");
    println!("  lex <file.js>        Tokenize and display tokens");
    println!("  parse <file.js>      Parse and display top-level statements");
    println!("  explain <code>       Explain an error code (e.g., E6001)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --max-call-depth=<n> Nested calls allowed before a stack overflow error");
    println!("  --seed=<n>           Seed for Math.random");
    println!("  --no-color           Plain diagnostics");
    println!();
    println!("Environment:");
    println!("  RUST_LOG=<filter>    Trace the pipeline, e.g. RUST_LOG=hoist_eval=trace");
    println!();
    println!("Examples:");
    println!("  hoist run scope.js");
    println!("  hoist scope.js --seed=42");
    println!("  hoist explain E6002");
}
