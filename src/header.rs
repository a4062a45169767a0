// VarDecl 0x1c2 <line:4:1, col:8> col:8 used _MainColor 'float4':'vector<float, 4>'
//
// The name is the second word after the closing `>` of the source range and
// the declared type is the first quoted string after the name.

use crate::ir::{Node, FUNCTION_DECL, VAR_DECL};
use log::debug;
use thiserror::Error;

const VAR_QUALIFIERS: &[&str] = &[" invalid", " used"];
const FUNCTION_QUALIFIERS: &[&str] = &[" implicit", " used"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("no '>' closing the source range")]
    MissingAngle,
    #[error("no space-delimited name after the source range")]
    MissingName,
    #[error("no quoted type after the name")]
    MissingTypeQuote,
}

fn strip_qualifiers(header: &str, qualifiers: &[&str]) -> String {
    qualifiers
        .iter()
        .fold(header.to_string(), |s, q| s.replacen(q, "", 1))
}

/// Byte offset after skipping `n` characters from `from`, clamped to the end.
fn skip_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| from + i)
}

/// Returns the name and the byte offset just past it.
fn read_name(text: &str) -> Result<(&str, usize), HeaderError> {
    let angle = text.find('>').ok_or(HeaderError::MissingAngle)?;
    let after = skip_chars(text, angle, 2);
    let space = text[after..].find(' ').ok_or(HeaderError::MissingName)?;
    let start = after + space + 1;
    let len = text[start..].find(' ').ok_or(HeaderError::MissingName)?;
    if len == 0 {
        return Err(HeaderError::MissingName);
    }
    Ok((&text[start..start + len], start + len))
}

fn read_type(text: &str, name_end: usize) -> Result<String, HeaderError> {
    let start = skip_chars(text, name_end, 2);
    let quote = text[start..].find('\'').ok_or(HeaderError::MissingTypeQuote)?;
    let full = &text[start..start + quote];
    Ok(full.split(' ').last().unwrap_or_default().to_string())
}

pub fn parse_variable(header: &str) -> Result<(String, String), HeaderError> {
    let text = strip_qualifiers(header, VAR_QUALIFIERS);
    let (name, end) = read_name(&text)?;
    let declared_type = read_type(&text, end)?;
    Ok((name.to_string(), declared_type))
}

pub fn parse_function(header: &str) -> Result<String, HeaderError> {
    let text = strip_qualifiers(header, FUNCTION_QUALIFIERS);
    let (name, _) = read_name(&text)?;
    Ok(name.to_string())
}

/// Fills `kind`, `name` and `declared_type` from `node.header`.
pub fn annotate(node: &mut Node) {
    node.kind = node
        .header
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_string();

    if node.kind == VAR_DECL {
        match parse_variable(&node.header) {
            Ok((name, declared_type)) => {
                node.name = name;
                node.declared_type = declared_type;
            }
            Err(e) => debug!("unreadable variable header {:?}: {}", node.header, e),
        }
    } else if node.kind == FUNCTION_DECL {
        match parse_function(&node.header) {
            Ok(name) => node.name = name,
            Err(e) => debug!("unreadable function header {:?}: {}", node.header, e),
        }
    }
}
