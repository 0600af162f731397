use super::*;

#[test]
fn buffer_println_appends_newline() {
    let handler = buffer_handler();
    handler.println("hello");
    handler.println("world");
    assert_eq!(handler.get_output(), "hello\nworld\n");
}

#[test]
fn buffer_handlers_are_independent() {
    let first = buffer_handler();
    let second = buffer_handler();
    first.println("a");
    assert_eq!(second.get_output(), "");
}

#[test]
fn stdout_captures_nothing() {
    let handler = stdout_handler();
    assert_eq!(handler.get_output(), "");
}

#[test]
fn silent_discards_output() {
    let handler = silent_handler();
    handler.println("hello");
    assert_eq!(handler.get_output(), "");
}
