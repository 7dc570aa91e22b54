use std::path::Path;

use crate::core::errors::{Result, ResolveError};
use crate::core::models::env_file::{EnvEntry, EnvFile, Line};
use crate::core::traits::parser::EnvParser;

/// Parses `.env` files.
///
/// Supports:
/// - `KEY=value` entries, optionally prefixed with `export`
/// - Single-quoted values (taken literally)
/// - Double-quoted values with `\n`, `\t`, `\r`, `\"`, `\\` and `\$` escapes
/// - Inline comments after unquoted or quoted values (` # ...`)
/// - Comment lines (`# ...`) and blank lines
pub struct DotenvParser;

impl DotenvParser {
    /// Parse a single line into a `Line` variant.
    fn parse_line(raw: &str, line_number: usize, source: &Path) -> Result<Line> {
        let fail = |detail: String| ResolveError::ParseError {
            file: source.to_path_buf(),
            detail: format!("line {line_number}: {detail}"),
        };

        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Ok(Line::Blank);
        }

        if trimmed.starts_with('#') {
            return Ok(Line::Comment);
        }

        let body = strip_export(trimmed);

        let Some(eq_pos) = body.find('=') else {
            return Err(fail(format!("expected KEY=value, got: {trimmed}")));
        };

        let key = body[..eq_pos].trim();
        if key.is_empty() {
            return Err(fail("empty key".into()));
        }
        if !is_valid_key(key) {
            return Err(fail(format!("invalid key '{key}'")));
        }

        let value = parse_value(body[eq_pos + 1..].trim_start()).map_err(fail)?;

        Ok(Line::Entry(EnvEntry {
            key: key.to_string(),
            value,
            line_number,
        }))
    }
}

/// Drop a leading `export ` keyword, if any.
fn strip_export(line: &str) -> &str {
    match line.strip_prefix("export") {
        Some(rest) if rest.starts_with([' ', '\t']) => rest.trim_start(),
        _ => line,
    }
}

/// Keys look like shell identifiers; dots are tolerated.
fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Parse everything after the `=`.
fn parse_value(raw: &str) -> std::result::Result<String, String> {
    if let Some(rest) = raw.strip_prefix('\'') {
        let Some(end) = rest.find('\'') else {
            return Err("unterminated single-quoted value".into());
        };
        check_trailing(&rest[end + 1..])?;
        return Ok(rest[..end].to_string());
    }

    if let Some(rest) = raw.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = rest.char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                '"' => {
                    check_trailing(&rest[idx + 1..])?;
                    return Ok(value);
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, e @ ('"' | '\\' | '$'))) => value.push(e),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                _ => value.push(c),
            }
        }
        return Err("unterminated double-quoted value".into());
    }

    Ok(strip_inline_comment(raw).trim_end().to_string())
}

/// Only whitespace or a comment may follow a closing quote.
fn check_trailing(rest: &str) -> std::result::Result<(), String> {
    let rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with('#') {
        Ok(())
    } else {
        Err(format!("unexpected characters after closing quote: {rest}"))
    }
}

/// Cut an unquoted value at the first `#` preceded by whitespace.
fn strip_inline_comment(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            return &raw[..i];
        }
    }
    raw
}

impl EnvParser for DotenvParser {
    fn parse(&self, content: &str, source: &Path) -> Result<EnvFile> {
        let mut lines = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            lines.push(DotenvParser::parse_line(raw, idx + 1, source)?);
        }

        Ok(EnvFile { lines })
    }
}
