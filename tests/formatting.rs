//! Tests for Python literal formatting and identifier derivation.
use tgflow::codegen::formatting::{
    escape_for_python, format_text_for_python, get_parse_mode, python_string, to_python_boolean,
    unescape_python,
};
use tgflow::codegen::identifiers::{
    CALLBACK_DATA_LIMIT, anchor_id, callback_data_for, internal_callback_data,
    is_internal_callback, is_valid_menu_command, python_name, safe_identifier,
};
use tgflow::prelude::FormatMode;

#[test]
fn test_escaping() {
    assert_eq!(escape_for_python(r#"say "hi""#), r#"say \"hi\""#);
    assert_eq!(escape_for_python("a\\b"), "a\\\\b");
    assert_eq!(escape_for_python("line\nbreak\ttab"), "line\\nbreak\\ttab");
    assert_eq!(python_string("plain"), "\"plain\"");
}

#[test]
fn test_text_literals() {
    assert_eq!(format_text_for_python("Hello"), "\"Hello\"");
    assert_eq!(format_text_for_python("Hi\nWelcome"), "\"\"\"Hi\nWelcome\"\"\"");
    // a quote next to the closing delimiter must not end the literal early
    assert_eq!(
        format_text_for_python("Say\n\"hi\""),
        "\"\"\"Say\n\"hi\\\"\"\"\""
    );
}

#[test]
fn test_unescape_inverts_escaping() {
    let samples = ["plain", "quote \" here", "back\\slash", "tab\tand\nnewline", "привет 👋"];
    for sample in samples {
        assert_eq!(unescape_python(&escape_for_python(sample)), sample);
    }
    assert_eq!(unescape_python("keep \\x as is"), "keep \\x as is");
}

#[test]
fn test_booleans() {
    assert_eq!(to_python_boolean(true), "True");
    assert_eq!(to_python_boolean(false), "False");
}

#[test]
fn test_parse_modes() {
    assert_eq!(get_parse_mode(FormatMode::Html), ", parse_mode=ParseMode.HTML");
    assert_eq!(get_parse_mode(FormatMode::Markdown), ", parse_mode=ParseMode.MARKDOWN");
    assert_eq!(get_parse_mode(FormatMode::None), "");
}

#[test]
fn test_identifiers() {
    assert_eq!(safe_identifier("/mute_user"), "mute_user");
    assert_eq!(safe_identifier("node-1.a"), "node_1_a");
    assert_eq!(python_name("42", "node"), "node_42");
    assert_eq!(python_name("", "node"), "node");
    assert_eq!(anchor_id("user@bot-x"), "user@bot_x");
}

#[test]
fn test_menu_command_names() {
    assert!(is_valid_menu_command("help"));
    assert!(is_valid_menu_command("set_2"));
    assert!(!is_valid_menu_command("Help"));
    assert!(!is_valid_menu_command(""));
    assert!(!is_valid_menu_command(&"a".repeat(33)));
}

#[test]
fn test_callback_data_limits() {
    assert_eq!(callback_data_for("m1"), "m1");
    assert_eq!(callback_data_for(""), "noop");

    let first = callback_data_for(&format!("{}_one", "x".repeat(80)));
    let second = callback_data_for(&format!("{}_two", "x".repeat(80)));
    assert_eq!(first.len(), CALLBACK_DATA_LIMIT);
    assert_ne!(first, second);
    assert_eq!(first, callback_data_for(&format!("{}_one", "x".repeat(80))));

    let cyrillic = "экран".repeat(20);
    let data = callback_data_for(&cyrillic);
    assert!(data.len() <= CALLBACK_DATA_LIMIT);
    assert!(data.starts_with("экран"));
}

#[test]
fn test_node_callbacks_avoid_internal_keys() {
    assert_eq!(callback_data_for("noop"), "node:noop");
    assert_eq!(callback_data_for("cmd_help"), "node:cmd_help");
    assert_eq!(callback_data_for("ms_a_0"), "node:ms_a_0");
    assert_eq!(callback_data_for("done_a"), "node:done_a");
    assert_eq!(callback_data_for("node:x"), "node:node:x");
    assert_eq!(callback_data_for("commands"), "commands");
    assert_eq!(internal_callback_data("cmd_help"), "cmd_help");

    let long = format!("cmd_{}", "x".repeat(80));
    let data = callback_data_for(&long);
    assert!(data.len() <= CALLBACK_DATA_LIMIT);
    assert!(!is_internal_callback(&data));
    assert!(is_internal_callback(&internal_callback_data(&long)));
}
