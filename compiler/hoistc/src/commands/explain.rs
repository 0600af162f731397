//! The `explain` command: display documentation for error codes.

use hoist_diagnostic::{ErrorCode, ErrorDocs};

/// Print the documentation for `code_str`, e.g. `E6001`.
pub fn explain_error(code_str: &str) {
    let Some(code) = ErrorCode::parse(code_str) else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E0001 (lexer), E1001 (parser), E6001 (runtime)");
        std::process::exit(1);
    };

    if let Some(doc) = ErrorDocs::get(code) {
        println!("{doc}");
    } else {
        eprintln!("No documentation available for {code_str}");
        std::process::exit(1);
    }
}
