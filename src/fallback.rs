use crate::ir::Declaration;
use regex::Regex;
use std::sync::LazyLock;

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Reads `type name` straight off a source line, ignoring any initializer and
/// trailing comment. Returns `None` when fewer than two words remain.
pub fn extract_declaration(line: &str) -> Option<Declaration> {
    let mut text = match line.find("//") {
        Some(i) => line[..i].to_string(),
        None => line.to_string(),
    };
    if let Some(i) = text.find('=') {
        text = format!("{};", &text[..i]);
    }
    let text = text.trim().replace(';', "");

    let mut words = RE_WORD.find_iter(&text).map(|m| m.as_str()).collect::<Vec<_>>();
    words.reverse();
    match words.as_slice() {
        [name, declared_type, ..] => Some(Declaration {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, declared_type: &str) -> Option<Declaration> {
        Some(Declaration {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
        })
    }

    #[test]
    fn test_initializer_and_comment() {
        assert_eq!(extract_declaration("half _Rough = 0.5; // comment"), decl("_Rough", "half"));
    }

    #[test]
    fn test_plain_declaration() {
        assert_eq!(extract_declaration("    float4 _MainColor;"), decl("_MainColor", "float4"));
    }

    #[test]
    fn test_qualifiers_before_type() {
        assert_eq!(extract_declaration("uniform sampler2D _MainTex;"), decl("_MainTex", "sampler2D"));
    }

    #[test]
    fn test_comment_only() {
        assert_eq!(extract_declaration("// float _Hidden;"), None);
    }

    #[test]
    fn test_single_word() {
        assert_eq!(extract_declaration("  return;"), None);
        assert_eq!(extract_declaration(""), None);
    }
}
