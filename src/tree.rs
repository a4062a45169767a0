use crate::header;
use crate::ir::{DumpLine, Node};
use crate::tokenize::tokenize;

fn open_node(line: &DumpLine) -> Node {
    let mut node = Node {
        header: line.payload.clone(),
        depth: line.depth,
        ..Node::default()
    };
    header::annotate(&mut node);
    node
}

/// Pops the innermost open node into its parent.
fn close_top(stack: &mut Vec<Node>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(done);
        }
    }
}

/// Builds one node from `lines`; the first line is the node's own header and
/// its depth is the baseline.
///
/// Siblings are recognised only by returning to the depth of the first child
/// of the open group. Lines at or above the baseline, and lines shallower than
/// the open group's first child, are not part of any subtree and are dropped.
pub fn build(lines: &[DumpLine]) -> Node {
    let Some((first, rest)) = lines.split_first() else {
        return Node::default();
    };

    // Depths along the stack are strictly increasing.
    let mut stack: Vec<Node> = vec![open_node(first)];

    for line in rest {
        let mut level = 0;
        if line.depth <= stack[0].depth {
            continue;
        }
        loop {
            match stack.get(level + 1).map(|n| n.depth) {
                None => {
                    stack.push(open_node(line));
                    break;
                }
                Some(mark) if line.depth == mark => {
                    while stack.len() > level + 1 {
                        close_top(&mut stack);
                    }
                    stack.push(open_node(line));
                    break;
                }
                Some(mark) if line.depth > mark => level += 1,
                Some(_) => break,
            }
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.pop().unwrap_or_default()
}

/// Tokenizes and builds a whole dump.
pub fn parse_dump(text: &str) -> Node {
    build(&tokenize(text))
}
