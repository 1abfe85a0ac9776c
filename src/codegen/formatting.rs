//! Python literal formatting.
//!
//! Every emitter goes through these helpers; none hand-rolls escaping. The
//! parser uses [`unescape_python`] to invert them.

use crate::definition::FormatMode;

/// Escapes text for embedding inside a double-quoted Python string literal.
pub fn escape_for_python(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// A complete double-quoted Python string literal.
pub fn python_string(text: &str) -> String {
    format!("\"{}\"", escape_for_python(text))
}

/// Formats message text as a Python literal.
///
/// Multi-line text becomes a triple-quoted block with its line breaks kept
/// verbatim; single-line text becomes an ordinary double-quoted literal.
pub fn format_text_for_python(text: &str) -> String {
    if !text.contains('\n') {
        return python_string(text);
    }

    let mut out = String::with_capacity(text.len() + 6);
    out.push_str("\"\"\"");
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            // A quote touching another quote (or the closing delimiter) could
            // form `"""` and end the literal early.
            '"' if matches!(chars.peek(), None | Some('"')) => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out.push_str("\"\"\"");
    out
}

/// Python boolean token. Never `true`/`false`.
pub fn to_python_boolean(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// The `parse_mode` keyword argument (with its leading comma) for a send call.
pub fn get_parse_mode(format_mode: FormatMode) -> &'static str {
    match format_mode {
        FormatMode::Html => ", parse_mode=ParseMode.HTML",
        FormatMode::Markdown => ", parse_mode=ParseMode.MARKDOWN",
        FormatMode::None => "",
    }
}

/// Reverses the escapes produced by this module in a single pass.
///
/// Unknown escape sequences are kept as written.
pub fn unescape_python(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Line-oriented buffer for emitted Python source.
#[derive(Debug, Default)]
pub struct PyWriter {
    buf: String,
}

impl PyWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one statement at the given indentation level (four spaces each).
    ///
    /// Continuation lines of a multi-line literal are left untouched.
    pub fn line(&mut self, indent: usize, text: impl AsRef<str>) {
        for _ in 0..indent {
            self.buf.push_str("    ");
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends an already formatted fragment.
    pub fn raw(&mut self, fragment: &str) {
        self.buf.push_str(fragment);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
