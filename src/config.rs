use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATHS: &[&str] = &["shaderprops.config.json", "config/shaderprops.config.json"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// DXC executable.
    #[serde(default = "default_compiler")]
    pub compiler: PathBuf,

    #[serde(default = "default_shader_model")]
    pub shader_model: String,

    /// Profile used when extracting variables and kernels.
    #[serde(default = "default_kernel_profile")]
    pub kernel_profile: String,

    /// Profile used when compiling a program region for property lookup.
    #[serde(default = "default_property_profile")]
    pub property_profile: String,

    /// Single fixed slot the isolated program region is written to.
    #[serde(default = "default_scratch_file")]
    pub scratch_file: PathBuf,

    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    /// Pass the workspace root as an include directory.
    #[serde(default = "default_include_workspace")]
    pub include_workspace: bool,
}

fn default_compiler() -> PathBuf {
    PathBuf::from("dxc")
}
fn default_shader_model() -> String {
    "6_0".to_string()
}
fn default_kernel_profile() -> String {
    "cs".to_string()
}
fn default_property_profile() -> String {
    "ps".to_string()
}
fn default_scratch_file() -> PathBuf {
    std::env::temp_dir().join("shaderprops-temp.hlsl")
}
fn default_include_workspace() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            compiler: default_compiler(),
            shader_model: default_shader_model(),
            kernel_profile: default_kernel_profile(),
            property_profile: default_property_profile(),
            scratch_file: default_scratch_file(),
            include_dirs: Vec::new(),
            include_workspace: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// First of [`DEFAULT_CONFIG_PATHS`] that exists, or the defaults.
    pub fn discover() -> Result<Config> {
        for p in DEFAULT_CONFIG_PATHS {
            let path = Path::new(p);
            if path.is_file() {
                return Config::load(path);
            }
        }
        Ok(Config::default())
    }
}

/// `-T` argument, e.g. `cs_6_0`.
pub fn target_profile(profile: &str, shader_model: &str) -> String {
    format!("{}_{}", profile, shader_model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.compiler, PathBuf::from("dxc"));
        assert_eq!(config.shader_model, "6_0");
        assert_eq!(config.kernel_profile, "cs");
        assert_eq!(config.property_profile, "ps");
        assert!(config.scratch_file.ends_with("shaderprops-temp.hlsl"));
        assert!(config.include_dirs.is_empty());
        assert!(config.include_workspace);
    }

    #[test]
    fn test_deserialize_full_config() {
        let json = r#"{
            "compiler": "tools/dxcompiler/dxc.exe",
            "shader_model": "6_5",
            "kernel_profile": "cs",
            "property_profile": "ps",
            "scratch_file": "build/temp.hlsl",
            "include_dirs": ["Packages", "Assets/Shaders"],
            "include_workspace": false
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.compiler, PathBuf::from("tools/dxcompiler/dxc.exe"));
        assert_eq!(target_profile("cs", &config.shader_model), "cs_6_5");
        assert_eq!(config.scratch_file, PathBuf::from("build/temp.hlsl"));
        assert_eq!(
            config.include_dirs,
            vec![PathBuf::from("Packages"), PathBuf::from("Assets/Shaders")]
        );
        assert!(!config.include_workspace);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: Config = serde_json::from_str(r#"{"shader_model": "6_2"}"#).unwrap();
        assert_eq!(target_profile("ps", &config.shader_model), "ps_6_2");
        assert_eq!(config.compiler, PathBuf::from("dxc"));
        assert!(config.include_workspace);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
