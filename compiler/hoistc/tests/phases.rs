//! Whole scripts through lexer, parser and interpreter.

use hoist_diagnostic::emitter::render_plain;
use hoist_eval::buffer_handler;
use hoistc::{check_source, run_source, ErrorCode, RunOptions};
use pretty_assertions::assert_eq;

/// Run `source`, returning printed output and diagnostic codes.
fn run(source: &str) -> (String, Vec<ErrorCode>) {
    run_with(source, RunOptions::default())
}

fn run_with(source: &str, options: RunOptions) -> (String, Vec<ErrorCode>) {
    let handler = buffer_handler();
    let diagnostics = run_source(source, options, handler.clone());
    let codes = diagnostics.iter().map(|d| d.code).collect();
    (handler.get_output(), codes)
}

fn run_ok(source: &str) -> String {
    let (output, codes) = run(source);
    assert!(codes.is_empty(), "unexpected errors {codes:?}, output:\n{output}");
    output
}

#[test]
fn scoping_walkthrough() {
    let output = run_ok(
        r"
        function demo() {
            console.log(early);
            if (true) {
                var early = 'hoisted';
                let inner = 'block';
                console.log(inner);
            }
            console.log(early);
            return typeof inner;
        }
        console.log(demo());
        ",
    );
    assert_eq!(output, "undefined\nblock\nhoisted\nundefined\n");
}

#[test]
fn block_const_read_outside_block() {
    let (output, codes) = run(
        "
        {
            const y = 3.14;
            console.log(y);
        }
        console.log(y);
        ",
    );
    assert_eq!(output, "3.14\n");
    assert_eq!(codes, vec![ErrorCode::E6001]);
}

#[test]
fn dead_zone_and_const_errors_have_codes() {
    assert_eq!(run("x; let x = 1;").1, vec![ErrorCode::E6002]);
    assert_eq!(run("const c = 1; c = 2;").1, vec![ErrorCode::E6002]);
    assert_eq!(run("let d = 1; let d = 2;").1, vec![ErrorCode::E6003]);
    assert_eq!(run("var f; f();").1, vec![ErrorCode::E6004]);
    assert_eq!(run("null.x;").1, vec![ErrorCode::E6005]);
    assert_eq!(run("[].reduce((a, b) => a);").1, vec![ErrorCode::E6006]);
}

#[test]
fn closures_and_loops() {
    let output = run_ok(
        "
        function makeCounter() {
            let n = 0;
            return () => ++n;
        }
        const first = makeCounter();
        const second = makeCounter();
        first();
        first();
        console.log(first(), second());

        const callbacks = [];
        for (let i = 0; i < 3; i++) callbacks.push(() => i * 10);
        console.log(callbacks.map(cb => cb()).join(' '));
        ",
    );
    assert_eq!(output, "3 1\n0 10 20\n");
}

#[test]
fn data_processing_script() {
    let output = run_ok(
        "
        const people = [
            { name: 'Ada', age: 36 },
            { name: 'Grace', age: 45 },
            { name: 'Linus', age: 21 }
        ];
        const adults = people.filter(p => p.age >= 30).map(p => p.name);
        const total = people.reduce((sum, p) => sum + p.age, 0);
        people.sort((a, b) => a.age - b.age);
        console.log(adults, total);
        console.log(people.map(p => `${p.name}:${p.age}`).join(', '));
        console.log(people[0]);
        ",
    );
    assert_eq!(
        output,
        "[ 'Ada', 'Grace' ] 102\nLinus:21, Ada:36, Grace:45\n{ name: 'Linus', age: 21 }\n"
    );
}

#[test]
fn output_before_runtime_error_is_kept() {
    let (output, codes) = run("console.log('start');\nundefinedFunction();\nconsole.log('never');");
    assert_eq!(output, "start\n");
    assert_eq!(codes, vec![ErrorCode::E6001]);
}

#[test]
fn call_depth_limit_is_configurable() {
    let source = "function down(n) { return n === 0 ? 0 : down(n - 1); } console.log(down(40));";
    let (output, codes) = run_with(
        source,
        RunOptions {
            max_call_depth: 20,
            ..RunOptions::default()
        },
    );
    assert_eq!(output, "");
    assert_eq!(codes, vec![ErrorCode::E6007]);
    assert_eq!(run_ok(source), "0\n");
}

#[test]
fn random_is_deterministic_per_seed() {
    let source = "console.log(Math.random(), Math.random());";
    let options = RunOptions {
        seed: 99,
        ..RunOptions::default()
    };
    let (first, _) = run_with(source, options);
    let (second, _) = run_with(source, options);
    assert_eq!(first, second);
}

#[test]
fn syntax_errors_stop_before_running() {
    let (output, codes) = run("console.log('ran');\nlet = 5;");
    assert_eq!(output, "");
    assert!(!codes.is_empty());
    assert!(codes.iter().all(|c| c.as_str().starts_with("E1")), "{codes:?}");
}

#[test]
fn check_reports_lexer_and_parser_errors() {
    assert!(check_source("let ok = 1;\nconsole.log(ok);").is_empty());

    let diagnostics = check_source("let s = 'unterminated");
    assert!(diagnostics.iter().any(|d| d.code.as_str().starts_with("E0")));

    // Scope errors only surface when the script runs.
    assert!(check_source("console.log(missing);").is_empty());
}

#[test]
fn runtime_diagnostic_renders_against_source() {
    let source = "let total = 0;\ntotal = totl + 1;\n";
    let diagnostics = run_source(source, RunOptions::default(), buffer_handler());
    assert_eq!(diagnostics.len(), 1);

    let rendered = render_plain(&diagnostics[0], "typo.js", source);
    assert!(rendered.contains("E6001"), "{rendered}");
    assert!(rendered.contains("totl is not defined"), "{rendered}");
    assert!(rendered.contains("typo.js"), "{rendered}");
}
