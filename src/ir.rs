use serde::Serialize;

pub const VAR_DECL: &str = "VarDecl";
pub const FUNCTION_DECL: &str = "FunctionDecl";
pub const NUM_THREADS_ATTR: &str = "HLSLNumThreadsAttr";
pub const INVALID_SLOC: &str = "invalid sloc";

/// One tokenized dump line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    pub depth: usize,
    pub payload: String,
}

impl DumpLine {
    pub fn new(depth: usize, payload: impl Into<String>) -> Self {
        DumpLine {
            depth,
            payload: payload.into(),
        }
    }
}

/// One entry of the dump tree. `name` and `declared_type` are empty when the
/// header could not be read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    pub kind: String,
    pub header: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub declared_type: String,
    #[serde(skip)]
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Pre-order traversal, the node itself first.
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub declared_type: String,
}
