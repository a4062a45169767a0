use std::path::{Path, PathBuf};

const NAMESPACE: &str = "ComputeShaderReferences";

/// C# class exposing shader property ids and kernel indices.
///
/// Fields are resolved with `Shader.PropertyToID` and properties with
/// `ComputeShader.FindKernel` when `Setup` runs.
pub fn render_references(class_name: &str, variables: &[String], kernels: &[String]) -> String {
    let fields = variables
        .iter()
        .map(|v| format!("\t\tpublic static int {};", v))
        .collect::<Vec<_>>()
        .join("\n");
    let properties = kernels
        .iter()
        .map(|k| format!("\t\tpublic static int {} {{ get; set; }}", k))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut out = Vec::new();
    out.push("using UnityEngine;".to_string());
    out.push(String::new());
    out.push(format!("namespace {}", NAMESPACE));
    out.push("{".to_string());
    out.push(format!("\tpublic static class {}", class_name));
    out.push("\t{".to_string());
    out.push(fields);
    out.push(String::new());
    out.push(properties);
    out.push(String::new());
    out.push("\t\tpublic static void Setup(ComputeShader cs)".to_string());
    out.push("\t\t{".to_string());
    out.push(format!("\t\t\tforeach (var info in typeof({}).GetFields())", class_name));
    out.push("\t\t\t{".to_string());
    out.push("\t\t\t\tvar index = Shader.PropertyToID(info.Name);".to_string());
    out.push("\t\t\t\tinfo.SetValue(null, index);".to_string());
    out.push("\t\t\t}".to_string());
    out.push(format!("\t\t\tforeach (var info in typeof({}).GetProperties())", class_name));
    out.push("\t\t\t{".to_string());
    out.push("\t\t\t\ttry".to_string());
    out.push("\t\t\t\t{".to_string());
    out.push("\t\t\t\t\tvar index = cs.FindKernel(info.Name);".to_string());
    out.push("\t\t\t\t\tinfo.SetValue(null, index);".to_string());
    out.push("\t\t\t\t}".to_string());
    out.push("\t\t\t\tcatch".to_string());
    out.push("\t\t\t\t{".to_string());
    out.push("\t\t\t\t\tcontinue;".to_string());
    out.push("\t\t\t\t}".to_string());
    out.push("\t\t\t}".to_string());
    out.push("\t\t}".to_string());
    out.push("\t}".to_string());
    out.push("}".to_string());
    out.join("\n")
}

/// File name up to its first `.`: `Blur.compute` → `Blur`.
pub fn class_name_for(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}

/// Sibling `.cs` path next to the shader source.
pub fn references_path_for(path: &Path) -> PathBuf {
    path.with_extension("cs")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_render_members() {
        let cs = render_references("Blur", &s(&["_Source", "_Radius"]), &s(&["Horizontal", "Vertical"]));
        assert!(cs.contains("namespace ComputeShaderReferences"));
        assert!(cs.contains("\tpublic static class Blur\n"));
        assert!(cs.contains("\t\tpublic static int _Source;\n\t\tpublic static int _Radius;\n"));
        assert!(cs.contains(
            "\t\tpublic static int Horizontal { get; set; }\n\n\t\tpublic static int Vertical { get; set; }"
        ));
        assert!(cs.contains("typeof(Blur).GetFields()"));
        assert!(cs.contains("typeof(Blur).GetProperties()"));
        assert!(cs.ends_with("\t}\n}"));
    }

    #[test]
    fn test_render_empty() {
        let cs = render_references("Empty", &[], &[]);
        assert!(cs.contains("\t{\n\n\n\n\t\tpublic static void Setup"));
    }

    #[test]
    fn test_class_name() {
        assert_eq!(class_name_for(Path::new("Assets/Shaders/Blur.compute")), "Blur");
        assert_eq!(class_name_for(Path::new("Noise.gen.compute")), "Noise");
    }

    #[test]
    fn test_references_path() {
        assert_eq!(
            references_path_for(Path::new("Assets/Blur.compute")),
            PathBuf::from("Assets/Blur.cs")
        );
    }
}
