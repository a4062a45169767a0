use crate::ir::DumpLine;
use regex::Regex;
use std::sync::LazyLock;

static RE_MARKER_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[|\-` ]*").unwrap());

/// Splits a dump into `(depth, payload)` pairs, one per input line.
///
/// Depth counts the two-character tree-drawing units (`| `, `|-`, `` `- ``)
/// in front of the payload. Units are ASCII, so byte and char offsets agree.
pub fn tokenize(text: &str) -> Vec<DumpLine> {
    text.split('\n')
        .map(|l| {
            let line = l.strip_suffix('\r').unwrap_or(l);
            let run = RE_MARKER_RUN.find(line).map_or(0, |m| m.end());
            let depth = run / 2;
            DumpLine::new(depth, &line[depth * 2..])
        })
        .collect()
}
