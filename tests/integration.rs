use shaderprops::commands::{self, Document, Outcome, Via};
use shaderprops::compiler::{CompileRequest, SavedDump};
use shaderprops::config::Config;
use shaderprops::properties;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    let path = fixture(name);
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    // Normalize line endings for cross-platform comparison
    text.replace("\r\n", "\n")
}

fn scratch_config(name: &str) -> Config {
    Config {
        scratch_file: std::env::temp_dir().join(format!("shaderprops-it-{}.hlsl", name)),
        ..Config::default()
    }
}

fn lit_document(text: String) -> Document {
    Document {
        path: Some(fixture("Lit.shader")),
        text,
        workspace: Some(fixture("")),
    }
}

fn no_compiler(_req: &CompileRequest<'_>) -> shaderprops::Result<String> {
    Ok(String::new())
}

fn inserted(outcome: Outcome) -> (properties::PropertyEdit, Via) {
    match outcome {
        Outcome::Inserted { edit, via } => (edit, via),
        other => panic!("expected an insertion, got {:?}", other),
    }
}

#[test]
fn test_blur_references_parity() {
    let source = SavedDump {
        path: fixture("Blur.ast"),
    };
    let refs = commands::generate_references(
        &fixture("Blur.compute"),
        Some(&fixture("")),
        &source,
        &Config::default(),
    )
    .unwrap();
    assert_eq!(refs.class_name, "Blur");
    assert_eq!(refs.path, fixture("Blur.cs"));
    assert_eq!(refs.variables, vec!["Result", "_Source", "_Radius", "_Sigma"]);
    assert_eq!(refs.kernels, vec!["Horizontal", "Vertical"]);
    assert_eq!(refs.text, read_fixture("Blur.cs"));
}

#[test]
fn test_blur_tree_shape() {
    let root = shaderprops::parse_dump(&read_fixture("Blur.ast"));
    assert_eq!(root.kind, "TranslationUnitDecl");
    let kinds: Vec<&str> = root.children.iter().map(|n| n.kind.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "CXXRecordDecl",
            "TypedefDecl",
            "VarDecl",
            "VarDecl",
            "VarDecl",
            "VarDecl",
            "FunctionDecl",
            "FunctionDecl",
            "FunctionDecl",
            "FunctionDecl",
        ]
    );
    let radius = &root.children[4];
    assert_eq!(radius.name, "_Radius");
    assert_eq!(radius.declared_type, "int");
}

#[test]
fn test_lit_tint_via_compiler_then_declared() {
    let source = SavedDump {
        path: fixture("Lit.ast"),
    };
    let config = scratch_config("tint");
    let doc = lit_document(read_fixture("Lit.shader"));

    let (edit, via) = inserted(commands::add_to_properties(Some(&doc), 17, &source, &config));
    assert_eq!(via, Via::Compiler);
    assert_eq!(edit.name, "_Tint");
    assert_eq!(edit.declared_type, "float4");
    assert_eq!(edit.snippet.text(), "\n${1:_Tint}(\"${2:_Tint}\", ${3:Vector}) = ${4:(1,1,1,1)}");

    let updated = properties::apply(&doc.text, &edit);
    let lines: Vec<&str> = updated.lines().collect();
    assert_eq!(lines[3], "    {");
    assert_eq!(lines[4], "_Tint(\"_Tint\", Vector) = (1,1,1,1)");
    assert_eq!(lines[5], "        _MainTex (\"Texture\", 2D) = \"white\" {}");

    // the declaration moved down one line; read it from the text this time
    let doc = lit_document(updated);
    assert_eq!(
        commands::add_to_properties(Some(&doc), 18, &no_compiler, &config),
        Outcome::AlreadyDeclared {
            name: "_Tint".to_string()
        }
    );
}

#[test]
fn test_lit_gloss_half_maps_to_float() {
    let source = SavedDump {
        path: fixture("Lit.ast"),
    };
    let config = scratch_config("gloss");
    let doc = lit_document(read_fixture("Lit.shader"));
    let (edit, via) = inserted(commands::add_to_properties(Some(&doc), 18, &source, &config));
    assert_eq!(via, Via::Compiler);
    assert_eq!(edit.name, "_Gloss");
    assert_eq!(edit.declared_type, "half");
    assert_eq!(edit.snippet.kind, "Float");
    assert_eq!(edit.snippet.default, "1");
}

#[test]
fn test_lit_main_tex_already_declared() {
    let source = SavedDump {
        path: fixture("Lit.ast"),
    };
    let config = scratch_config("maintex");
    let doc = lit_document(read_fixture("Lit.shader"));
    assert_eq!(
        commands::add_to_properties(Some(&doc), 16, &source, &config),
        Outcome::AlreadyDeclared {
            name: "_MainTex".to_string()
        }
    );
}

#[test]
fn test_lit_plain_text_when_compiler_silent() {
    let config = scratch_config("silent");
    let doc = lit_document(read_fixture("Lit.shader"));
    let (edit, via) = inserted(commands::add_to_properties(Some(&doc), 18, &no_compiler, &config));
    assert_eq!(via, Via::PlainText);
    assert_eq!(edit.name, "_Gloss");
    assert_eq!(edit.declared_type, "half");
}
