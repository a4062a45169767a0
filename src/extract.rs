use crate::ir::{Node, FUNCTION_DECL, INVALID_SLOC, NUM_THREADS_ATTR, VAR_DECL};

#[derive(Debug, Default)]
pub struct Declarations<'a> {
    pub variables: Vec<&'a Node>,
    pub kernels: Vec<&'a Node>,
}

impl Declarations<'_> {
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|n| n.name.clone()).collect()
    }

    pub fn kernel_names(&self) -> Vec<String> {
        self.kernels.iter().map(|n| n.name.clone()).collect()
    }
}

pub fn is_variable(node: &Node) -> bool {
    node.is_kind(VAR_DECL)
}

/// A function carrying a `[numthreads]` attribute, declared in real source.
pub fn is_kernel(node: &Node) -> bool {
    node.is_kind(FUNCTION_DECL)
        && !node.header.contains(INVALID_SLOC)
        && node.children.iter().any(|c| c.is_kind(NUM_THREADS_ATTR))
}

/// Top-level variables and kernels, in dump order. Nodes whose name could not
/// be read are left out.
pub fn extract_all(root: &Node) -> Declarations<'_> {
    let named = || root.children.iter().filter(|n| !n.name.is_empty());
    Declarations {
        variables: named().filter(|n| is_variable(n)).collect(),
        kernels: named().filter(|n| is_kernel(n)).collect(),
    }
}
