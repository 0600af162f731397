use super::*;
use pretty_assertions::assert_eq;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_defaults() {
    let parsed = parse_file_args(&args(&["script.js"])).unwrap();
    assert_eq!(parsed.path.as_deref(), Some("script.js"));
    assert_eq!(parsed.options, RunOptions::default());
    assert_eq!(parsed.color, ColorMode::Auto);
}

#[test]
fn test_flags_in_any_position() {
    let parsed =
        parse_file_args(&args(&["--seed=7", "main.js", "--max-call-depth=64", "--no-color"]))
            .unwrap();
    assert_eq!(parsed.path.as_deref(), Some("main.js"));
    assert_eq!(parsed.options.seed, 7);
    assert_eq!(parsed.options.max_call_depth, 64);
    assert_eq!(parsed.color, ColorMode::Never);
}

#[test]
fn test_bad_arguments() {
    assert_eq!(
        parse_file_args(&args(&["--max-call-depth=lots"])),
        Err("invalid --max-call-depth value 'lots'".to_string())
    );
    assert_eq!(
        parse_file_args(&args(&["--fast"])),
        Err("unknown option '--fast'".to_string())
    );
    assert_eq!(
        parse_file_args(&args(&["a.js", "b.js"])),
        Err("unexpected argument 'b.js'".to_string())
    );
}

#[test]
fn test_missing_path_is_not_an_error_here() {
    let parsed = parse_file_args(&[]).unwrap();
    assert_eq!(parsed.path, None);
}
