//! Multi-document YAML handling
//!
//! Input streams are split on `---` lines after comments are stripped;
//! only Secret documents are decoded. Output documents are rendered one by
//! one, each prefixed with `---`.

use crate::error::Result;
use crate::external_secret::ExternalSecret;
use crate::secret::InputSecret;

const DOCUMENT_SEPARATOR: &str = "---";

/// Drop comment lines and trailing comments.
///
/// A line whose first non-blank character is `#` disappears entirely; on
/// other lines everything from the first `#` outside a quoted scalar on is
/// cut.
pub fn strip_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(truncate_comment)
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    let mut chars = line.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match (quote, c) {
            (None, '#') => return &line[..index],
            (None, '\'' | '"') if opens_scalar(prev) => quote = Some(c),
            (Some('"'), '\\') => {
                chars.next();
            }
            (Some('\''), '\'') if matches!(chars.peek(), Some((_, '\''))) => {
                chars.next();
            }
            (Some(open), c) if c == open => quote = None,
            _ => {}
        }
        prev = Some(c);
    }

    line
}

/// Quotes only start a scalar at the beginning of a token
fn opens_scalar(prev: Option<char>) -> bool {
    prev.is_none_or(|p| p.is_whitespace() || matches!(p, ':' | '[' | '{' | ',' | '-'))
}

/// Split a comment-free stream on lines that are exactly `---`
pub fn split_documents(input: &str) -> Vec<String> {
    let mut documents = vec![String::new()];

    for line in input.split('\n') {
        if line.trim_end_matches('\r') == DOCUMENT_SEPARATOR {
            documents.push(String::new());
            continue;
        }
        if let Some(current) = documents.last_mut() {
            current.push_str(line);
            current.push('\n');
        }
    }

    documents
}

/// Whether a document declares `kind: Secret`
pub fn is_secret_document(document: &str) -> bool {
    document.lines().any(|line| line.trim() == "kind: Secret")
}

/// Decode every Secret document of a YAML stream, in order
pub fn parse_secrets(input: &str) -> Result<Vec<InputSecret>> {
    let stripped = strip_comments(input);
    let documents = split_documents(&stripped);

    let mut secrets = Vec::new();
    for (index, document) in documents.iter().enumerate() {
        if !is_secret_document(document) {
            tracing::debug!(document = index, "skipping non-Secret document");
            continue;
        }
        secrets.push(serde_yaml::from_str(document)?);
    }

    Ok(secrets)
}

/// Render one ExternalSecret as a `---`-prefixed YAML document
pub fn render(external_secret: &ExternalSecret) -> Result<String> {
    let mut yaml = serde_yaml::to_string(external_secret)?;

    // `"{{ .x }}"` template values are emitted as `'"{{ .x }}"'`; turn them
    // back into double-quoted scalars
    for value in external_secret.spec.target.template.data.values() {
        if is_quoted_expression(value) {
            yaml = yaml.replace(&format!("'{value}'"), value);
        }
    }

    Ok(format!("{DOCUMENT_SEPARATOR}\n{yaml}"))
}

/// A single-line `"..."` value whose inner text needs no YAML escaping
fn is_quoted_expression(value: &str) -> bool {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return false;
    };

    (inner.contains("{{") || inner.starts_with('<'))
        && !inner.contains(['"', '\'', '\\', '\n', '\r'])
}
