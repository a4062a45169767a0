use crate::codegen;
use crate::compiler::{CompileRequest, DumpSource};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fallback;
use crate::ir::Declaration;
use crate::matcher::{self, Match};
use crate::properties::{self, Plan, PropertyEdit};
use crate::tree::parse_dump;
use log::{debug, info, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const REGION_OPEN: &[&str] = &["CGPROGRAM", "HLSLPROGRAM"];
const REGION_CLOSE: &[&str] = &["ENDCG", "ENDHLSL"];

/// The document being edited, as the host sees it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub path: Option<PathBuf>,
    pub text: String,
    pub workspace: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Via {
    Compiler,
    PlainText,
}

/// Why nothing was done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    NoDocument,
    NoPath,
    LineOutOfRange(usize),
    /// The line does not look like `type name`.
    NotADeclaration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Inserted { edit: PropertyEdit, via: Via },
    AlreadyDeclared { name: String },
    Skipped(Skip),
}

#[derive(Debug, Clone)]
pub struct References {
    pub class_name: String,
    pub path: PathBuf,
    pub text: String,
    pub variables: Vec<String>,
    pub kernels: Vec<String>,
}

/// Compiles `file` with the kernel profile and renders its C# reference class.
/// Nothing is written; `References::path` is where the class belongs.
pub fn generate_references(
    file: &Path,
    workspace: Option<&Path>,
    source: &dyn DumpSource,
    config: &Config,
) -> Result<References> {
    let relative = workspace
        .and_then(|w| file.strip_prefix(w).ok())
        .unwrap_or(file);
    let request = CompileRequest {
        file: relative,
        profile: &config.kernel_profile,
        working_dir: workspace,
        includes: config.include_dirs.clone(),
    };
    let dump = source.dump(&request)?;
    let (variables, kernels) = crate::declarations(&dump);
    info!(
        "{}: {} variable(s), {} kernel(s)",
        file.display(),
        variables.len(),
        kernels.len()
    );

    let class_name = codegen::class_name_for(relative);
    let text = codegen::render_references(&class_name, &variables, &kernels);
    Ok(References {
        class_name,
        path: codegen::references_path_for(file),
        text,
        variables,
        kernels,
    })
}

/// The shader program around a line, and that line's 1-based number inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRegion<'a> {
    pub body: &'a str,
    pub line: usize,
}

/// Cuts out the `CGPROGRAM`/`HLSLPROGRAM` body enclosing line `index`. The
/// body starts on the line after the opening keyword. Without markers the
/// whole text is the body.
pub fn program_region(text: &str, index: usize) -> Option<ProgramRegion<'_>> {
    let line_start = if index == 0 {
        0
    } else {
        text.match_indices('\n').nth(index - 1)?.0 + 1
    };
    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);

    let before = &text[..line_start];
    let body_start = REGION_OPEN
        .iter()
        .filter_map(|kw| before.rfind(kw).map(|i| i + kw.len()))
        .max()
        .map_or(0, |after| {
            before[after..]
                .find('\n')
                .map_or(line_start, |i| after + i + 1)
        });
    let body_end = REGION_CLOSE
        .iter()
        .filter_map(|kw| text[line_end..].find(kw))
        .min()
        .map_or(text.len(), |i| line_end + i);

    Some(ProgramRegion {
        body: &text[body_start..body_end],
        line: text[body_start..line_start].matches('\n').count() + 1,
    })
}

fn resolve_with_compiler(
    doc: &Document,
    index: usize,
    line: &str,
    source: &dyn DumpSource,
    config: &Config,
) -> Result<Option<Declaration>> {
    let Some(region) = program_region(&doc.text, index) else {
        return Ok(None);
    };

    let scratch = &config.scratch_file;
    fs::write(scratch, region.body).map_err(|source| Error::ScratchFile {
        path: scratch.clone(),
        source,
    })?;

    let mut includes = config.include_dirs.clone();
    if config.include_workspace {
        if let Some(ws) = &doc.workspace {
            includes.push(ws.clone());
        }
    }
    let request = CompileRequest {
        file: scratch,
        profile: &config.property_profile,
        working_dir: None,
        includes,
    };
    let dump = source.dump(&request);
    if let Err(e) = fs::remove_file(scratch) {
        debug!("cannot remove {}: {}", scratch.display(), e);
    }

    let root = parse_dump(&dump?);
    let candidates = matcher::candidates_on_line(&root, region.line);
    let tokens = matcher::line_tokens(line);
    match matcher::select(&candidates, &tokens) {
        Match::Selected(node) => Ok(Some(Declaration {
            name: node.name.clone(),
            declared_type: node.declared_type.clone(),
        })),
        other => {
            debug!(
                "no confident match on program line {} ({} candidate(s)): {:?}",
                region.line,
                candidates.len(),
                other
            );
            Ok(None)
        }
    }
}

/// Registers the variable declared on line `index` (0-based) of `doc` as a
/// shader property.
///
/// The compiler dump is tried first; when it gives no confident answer the
/// declaration is read from the line text.
pub fn add_to_properties(
    doc: Option<&Document>,
    index: usize,
    source: &dyn DumpSource,
    config: &Config,
) -> Outcome {
    let Some(doc) = doc else {
        return Outcome::Skipped(Skip::NoDocument);
    };
    if doc.path.is_none() {
        return Outcome::Skipped(Skip::NoPath);
    }
    let Some(line) = doc.text.split('\n').nth(index) else {
        return Outcome::Skipped(Skip::LineOutOfRange(index));
    };
    let line = line.strip_suffix('\r').unwrap_or(line);

    let from_compiler = match resolve_with_compiler(doc, index, line, source, config) {
        Ok(found) => found,
        Err(e) => {
            warn!("{}", e);
            None
        }
    };
    let resolved = from_compiler.map(|d| (d, Via::Compiler)).or_else(|| {
        fallback::extract_declaration(line).map(|d| (d, Via::PlainText))
    });
    let Some((decl, via)) = resolved else {
        return Outcome::Skipped(Skip::NotADeclaration);
    };
    info!(
        "line {}: {} {} ({:?})",
        index + 1,
        decl.declared_type,
        decl.name,
        via
    );

    match properties::plan(&decl.name, &decl.declared_type, &doc.text) {
        Plan::Insert(edit) => Outcome::Inserted { edit, via },
        Plan::AlreadyDeclared => Outcome::AlreadyDeclared { name: decl.name },
    }
}
