use crate::extract::is_variable;
use crate::ir::Node;
use indexmap::IndexSet;
use log::debug;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Match<'a> {
    Selected(&'a Node),
    /// Several candidates and none shares a token with the line.
    Ambiguous,
    NoCandidates,
}

/// Distinct whitespace-delimited tokens of a source line, first-seen order.
pub fn line_tokens(line: &str) -> IndexSet<&str> {
    line.split_whitespace().collect()
}

pub fn score(node: &Node, tokens: &IndexSet<&str>) -> usize {
    tokens.iter().filter(|t| node.header.contains(**t)).count()
}

/// Top-level variable declarations whose source range starts on `line`
/// (1-based). Matches `<line:N:` and the `<path:N:` form DXC prints for the
/// first location of a file.
pub fn candidates_on_line(root: &Node, line: usize) -> Vec<&Node> {
    let Ok(re) = Regex::new(&format!(r"<[^<>,]*:{}:\d", line)) else {
        return Vec::new();
    };
    root.children
        .iter()
        .filter(|n| is_variable(n) && !n.name.is_empty() && re.is_match(&n.header))
        .collect()
}

/// Highest score wins; the earliest candidate wins ties.
pub fn select<'a>(candidates: &[&'a Node], tokens: &IndexSet<&str>) -> Match<'a> {
    let mut best: Option<(&'a Node, usize)> = None;
    for &node in candidates {
        let s = score(node, tokens);
        debug!("candidate {:?} scored {}", node.name, s);
        if best.is_none_or(|(_, top)| s > top) {
            best = Some((node, s));
        }
    }
    match best {
        None => Match::NoCandidates,
        Some((_, 0)) if candidates.len() > 1 => Match::Ambiguous,
        Some((node, _)) => Match::Selected(node),
    }
}
