//! Placeholder → external-secrets template rewriting
//!
//! Two passes turn a Secret value into an external-secrets template:
//!
//! 1. [`rewrite`] scans the value once and replaces every `<name>` with
//!    `{{ .name }}`, collecting the names on the way. `<% ENV %>` spans are
//!    copied verbatim, including when they sit inside a reference
//!    (`<<% ENV %>_PASSWORD>`).
//! 2. [`quote_expressions`] wraps each whitespace-delimited word holding a
//!    `{{ ... }}` in double quotes so the rendered value stays a YAML string.
//!
//! | Secret value                  | Template                              |
//! |-------------------------------|---------------------------------------|
//! | `<MYSQL_PASSWD>`              | `"{{ .MYSQL_PASSWD }}"`               |
//! | `user = < USER >`             | `user = "{{ .USER }}"`                |
//! | `sn0rt-<A>-<B> <C>`           | `"sn0rt-{{ .A }}-{{ .B }}" "{{ .C }}"` |
//! | `<% ENV %>-<A>`               | `"<% ENV %>-{{ .A }}"`                |

use crate::error::{ConvertError, Result};

const EXPR_OPEN: &str = "{{ .";
const EXPR_CLOSE: &str = " }}";

/// Output of [`rewrite`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The value with every reference replaced by a template expression
    pub text: String,
    /// Trimmed reference names in order of appearance, duplicates included
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InBracket,
    /// Inside `<% ... %>`; remembers whether it was opened inside a reference
    InEnvBracket { nested: bool },
}

/// Rewrite every `<name>` in `input` into `{{ .name }}`.
///
/// Whitespace inside the brackets is trimmed. A `<` inside an open
/// reference, or a reference left open at the end, is a syntax error. A
/// stray `>` outside any reference is kept as text.
pub fn rewrite(input: &str) -> Result<Rewritten> {
    let mut text = String::with_capacity(input.len() + 8);
    let mut buffer = String::new();
    let mut references = Vec::new();
    let mut state = State::Normal;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '<' if chars.peek() == Some(&'%') => {
                    chars.next();
                    text.push_str("<%");
                    state = State::InEnvBracket { nested: false };
                }
                '<' => {
                    text.push_str(EXPR_OPEN);
                    state = State::InBracket;
                }
                _ => text.push(c),
            },
            State::InBracket => match c {
                '<' if chars.peek() == Some(&'%') => {
                    chars.next();
                    buffer.push_str("<%");
                    state = State::InEnvBracket { nested: true };
                }
                '<' => {
                    return Err(ConvertError::NestedOrUnclosedBracket {
                        input: input.to_string(),
                    });
                }
                '>' => {
                    let name = buffer.trim();
                    text.push_str(name);
                    text.push_str(EXPR_CLOSE);
                    references.push(name.to_string());
                    buffer.clear();
                    state = State::Normal;
                }
                _ => buffer.push(c),
            },
            State::InEnvBracket { nested } => {
                let sink = if nested { &mut buffer } else { &mut text };
                sink.push(c);
                if c == '%' && chars.peek() == Some(&'>') {
                    chars.next();
                    sink.push('>');
                    state = if nested {
                        State::InBracket
                    } else {
                        State::Normal
                    };
                }
            }
        }
    }

    match state {
        State::Normal => Ok(Rewritten { text, references }),
        State::InBracket => Err(ConvertError::UnclosedBracket {
            input: input.to_string(),
        }),
        State::InEnvBracket { .. } => Err(ConvertError::UnterminatedEnvPlaceholder {
            input: input.to_string(),
        }),
    }
}

/// Returns true if `input` holds a `<name>` reference.
///
/// Malformed input counts as a reference; the syntax error surfaces when
/// the value is rewritten.
pub fn has_reference(input: &str) -> bool {
    rewrite(input)
        .map(|r| !r.references.is_empty())
        .unwrap_or(true)
}

/// Quote template expressions line by line.
///
/// Each line is split on whitespace, except inside `{{ ... }}` and
/// `<% ... %>` spans. Words containing both `{{` and `}}` are wrapped in
/// double quotes unless they already are. Whitespace is preserved as is.
pub fn quote_expressions(input: &str) -> String {
    input
        .split('\n')
        .map(quote_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 4);
    let mut word = String::new();
    let mut in_expr = false;
    let mut in_env = false;

    for c in line.chars() {
        let prev = word.chars().last();

        match (c, prev) {
            ('{', Some('{')) if !in_env => in_expr = true,
            ('}', Some('}')) if in_expr => in_expr = false,
            ('%', Some('<')) if !in_expr => in_env = true,
            ('>', Some('%')) if in_env => in_env = false,
            _ => {}
        }

        if c.is_whitespace() && !in_expr && !in_env {
            flush_word(&mut out, &mut word);
            out.push(c);
        } else {
            word.push(c);
        }
    }

    flush_word(&mut out, &mut word);
    out
}

fn flush_word(out: &mut String, word: &mut String) {
    if word.is_empty() {
        return;
    }

    let already_quoted = word.len() >= 2 && word.starts_with('"') && word.ends_with('"');
    if word.contains("{{") && word.contains("}}") && !already_quoted {
        out.push('"');
        out.push_str(word);
        out.push('"');
    } else {
        out.push_str(word);
    }
    word.clear();
}
