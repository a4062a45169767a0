use crate::config::{target_profile, Config};
use crate::error::{Error, Result};
use log::{debug, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub file: &'a Path,
    pub profile: &'a str,
    pub working_dir: Option<&'a Path>,
    pub includes: Vec<PathBuf>,
}

pub trait DumpSource {
    fn dump(&self, request: &CompileRequest<'_>) -> Result<String>;
}

impl<F> DumpSource for F
where
    F: Fn(&CompileRequest<'_>) -> Result<String>,
{
    fn dump(&self, request: &CompileRequest<'_>) -> Result<String> {
        self(request)
    }
}

/// Runs `dxc -ast-dump`. Stdout is returned even when the compiler exits with
/// an error.
#[derive(Debug, Clone)]
pub struct Dxc {
    program: PathBuf,
    shader_model: String,
}

impl Dxc {
    pub fn new(program: impl Into<PathBuf>, shader_model: impl Into<String>) -> Self {
        Dxc {
            program: program.into(),
            shader_model: shader_model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Dxc::new(&config.compiler, &config.shader_model)
    }

    pub fn args(&self, request: &CompileRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-T".into(),
            target_profile(request.profile, &self.shader_model).into(),
        ];
        for dir in &request.includes {
            args.push("-I".into());
            args.push(dir.into());
        }
        args.push("-ast-dump".into());
        args.push(request.file.into());
        args
    }
}

impl DumpSource for Dxc {
    fn dump(&self, request: &CompileRequest<'_>) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(request));
        if let Some(dir) = request.working_dir {
            cmd.current_dir(dir);
        }
        debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|source| Error::CompilerSpawn {
            program: self.program.clone(),
            source,
        })?;
        if !output.status.success() {
            warn!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A dump captured earlier, read from disk regardless of the request.
#[derive(Debug, Clone)]
pub struct SavedDump {
    pub path: PathBuf,
}

impl DumpSource for SavedDump {
    fn dump(&self, _request: &CompileRequest<'_>) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))
    }
}
