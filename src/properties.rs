use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static RE_PROPERTY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\W*Properties\W*\{").unwrap());
static RE_EMPTY_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\s*\}").unwrap());
static RE_SHADER_SUBSHADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)shader.*subshader").unwrap());
static RE_SHADER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)shader\W*".*"\W*\{"#).unwrap());

const PROPERTIES_KEYWORD: &str = "Properties";

/// Lines the final position is moved up by. Anchors are 1-based, positions
/// 0-based; see DESIGN.md. With `{` on the line after `Properties` this lands
/// on the brace line (keyword line + 1, 0-based). Flipping the same-line
/// check would put it at keyword line - 1, above the block.
const INSERT_LINE_ADJUST: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyKind {
    Integer,
    Float,
    Texture2D,
    Texture2DArray,
    Texture3D,
    Cube,
    CubeArray,
    Vector,
}

impl PropertyKind {
    pub fn label(self) -> &'static str {
        match self {
            PropertyKind::Integer => "Integer",
            PropertyKind::Float => "Float",
            PropertyKind::Texture2D => "2D",
            PropertyKind::Texture2DArray => "2DArray",
            PropertyKind::Texture3D => "3D",
            PropertyKind::Cube => "Cube",
            PropertyKind::CubeArray => "CubeArray",
            PropertyKind::Vector => "Vector",
        }
    }
}

// First match wins; `sampler2D` appears twice on purpose.
const TYPE_TABLE: &[(&[&str], PropertyKind, &str)] = &[
    (&["int", "uint"], PropertyKind::Integer, "1"),
    (&["float", "double"], PropertyKind::Float, "1"),
    (&["sampler", "sampler2D", "Texture2D"], PropertyKind::Texture2D, r#""white" {}"#),
    (&["Texture2DArray"], PropertyKind::Texture2DArray, r#""" {}"#),
    (&["sampler2D", "Texture3D"], PropertyKind::Texture3D, r#""" {}"#),
    (&["samplerCUBE", "TextureCube"], PropertyKind::Cube, r#""" {}"#),
    (&["TextureCubeArray"], PropertyKind::CubeArray, r#""" {}"#),
    (&["float2", "float3", "float4"], PropertyKind::Vector, "(1,1,1,1)"),
];

/// Property kind and default literal for an HLSL type. Only the bare `half`
/// and `fixed` tokens are treated as `float`.
pub fn map_property_type(declared_type: &str) -> Option<(PropertyKind, &'static str)> {
    let normalized = match declared_type {
        "half" | "fixed" => "float",
        other => other,
    };
    TYPE_TABLE
        .iter()
        .find(|(names, _, _)| names.contains(&normalized))
        .map(|(_, kind, default)| (*kind, *default))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockState {
    Existing,
    Missing,
}

/// `name("label", kind) = default`, each part a numbered tab stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub name: String,
    pub label: String,
    pub kind: String,
    pub default: String,
}

fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '$' | '}' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl Snippet {
    pub fn for_declaration(name: &str, declared_type: &str) -> Self {
        let (kind, default) = match map_property_type(declared_type) {
            Some((kind, default)) => (kind.label(), default),
            None => (" ", " "),
        };
        Snippet {
            name: name.to_string(),
            label: name.to_string(),
            kind: kind.to_string(),
            default: default.to_string(),
        }
    }

    /// Snippet syntax with `${n:value}` fields, preceded by a newline.
    pub fn text(&self) -> String {
        format!(
            "\n${{1:{}}}(\"${{2:{}}}\", ${{3:{}}}) = ${{4:{}}}",
            escape_field(&self.name),
            escape_field(&self.label),
            escape_field(&self.kind),
            escape_field(&self.default)
        )
    }

    /// The same line with the fields filled in.
    pub fn plain(&self) -> String {
        format!(
            "\n{}(\"{}\", {}) = {}",
            self.name, self.label, self.kind, self.default
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEdit {
    pub name: String,
    pub declared_type: String,
    pub block: BlockState,
    /// 1-based line the property belongs on, before the final adjustment.
    pub anchor_line: usize,
    pub position: Position,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Insert(PropertyEdit),
    AlreadyDeclared,
}

/// 1-based line number of a byte offset.
fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Body of the existing block, from its `{` to the first `}` that does not
/// close an empty `{}` pair.
fn property_block(text: &str) -> Option<String> {
    let working = RE_EMPTY_BLOCK.replace_all(text, "");
    let m = RE_PROPERTY_BLOCK.find(&working)?;
    let open = m.end() - 1;
    let close = working[m.end()..]
        .find('}')
        .map_or(working.len(), |i| m.end() + i);
    Some(working[open..close].to_string())
}

pub fn is_property_declared(name: &str, block: &str) -> bool {
    Regex::new(&format!(r"(?i)\b{}\s*\(", regex::escape(name)))
        .map(|re| re.is_match(block))
        .unwrap_or(false)
}

fn existing_block_anchor(text: &str, block: regex::Match<'_>) -> usize {
    let keyword_at = block.start()
        + block
            .as_str()
            .find(PROPERTIES_KEYWORD)
            .unwrap_or_default();
    let brace_at = block.end() - 1;
    let mut line = line_of(text, keyword_at) + 1;
    if text[keyword_at..brace_at].contains('\n') {
        line += 1;
    }
    line
}

fn missing_block_anchor(text: &str) -> usize {
    let offset = RE_SHADER_SUBSHADER
        .find(text)
        .or_else(|| RE_SHADER_HEADER.find(text))
        .map_or(0, |m| m.start());
    line_of(text, offset)
}

/// Works out where `name` goes in the `Properties` block of `text`.
pub fn plan(name: &str, declared_type: &str, text: &str) -> Plan {
    let (block, anchor_line) = match RE_PROPERTY_BLOCK.find(text) {
        Some(m) => {
            if property_block(text).is_some_and(|b| is_property_declared(name, &b)) {
                return Plan::AlreadyDeclared;
            }
            (BlockState::Existing, existing_block_anchor(text, m))
        }
        None => (BlockState::Missing, missing_block_anchor(text)),
    };

    let snippet = Snippet::for_declaration(name, declared_type);
    let position = Position {
        line: anchor_line.saturating_sub(INSERT_LINE_ADJUST),
        character: snippet.text().chars().count(),
    };

    Plan::Insert(PropertyEdit {
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        block,
        anchor_line,
        position,
        snippet,
    })
}

/// Inserts the plain property line at the edit position. The column is
/// clamped to the end of the target line.
pub fn apply(text: &str, edit: &PropertyEdit) -> String {
    let mut offset = 0;
    let mut lines = text.split('\n').peekable();
    let mut line_no = 0;
    while let Some(line) = lines.next() {
        let body = line.strip_suffix('\r').unwrap_or(line);
        if line_no == edit.position.line || lines.peek().is_none() {
            let column = body
                .char_indices()
                .nth(edit.position.character)
                .map_or(body.len(), |(i, _)| i);
            offset += column;
            break;
        }
        offset += line.len() + 1;
        line_no += 1;
    }

    let mut out = String::with_capacity(text.len() + 64);
    out.push_str(&text[..offset]);
    out.push_str(&edit.snippet.plain());
    out.push_str(&text[offset..]);
    out
}
