use clap::{Parser, Subcommand};
use shaderprops::commands::{self, Document, Outcome, Skip};
use shaderprops::compiler::{CompileRequest, DumpSource, Dxc, SavedDump};
use shaderprops::config::Config;
use shaderprops::properties;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "shaderprops", about = "HLSL dump tooling for Unity shaders")]
struct Cli {
    /// Config file path (default: shaderprops.config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the AST dump from this file instead of running the compiler
    #[arg(long, global = true)]
    dump: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the C# reference class next to a compute shader
    Refs {
        file: PathBuf,

        /// Workspace root the compiler runs in (default: current directory)
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Print the class instead of writing the .cs file
        #[arg(long)]
        stdout: bool,
    },

    /// Register the variable declared on a line as a shader property
    AddProperty {
        file: PathBuf,

        /// 1-based line number of the declaration
        #[arg(short, long)]
        line: usize,

        /// Workspace root passed as an include directory
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Insert the property into the file instead of printing the edit
        #[arg(long)]
        write: bool,
    },

    /// Print the dump tree of a shader
    Dump {
        file: PathBuf,

        /// Compiler profile (default: the kernel profile from config)
        #[arg(long)]
        profile: Option<String>,

        /// Emit JSON instead of an indented outline
        #[arg(long)]
        json: bool,
    },
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn dump_source(cli_dump: &Option<PathBuf>, config: &Config) -> Box<dyn DumpSource> {
    match cli_dump {
        Some(path) => Box::new(SavedDump { path: path.clone() }),
        None => Box::new(Dxc::from_config(config)),
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| die(&format!("cannot read current directory: {}", e)))
}

fn print_outline(root: &shaderprops::ir::Node) {
    for node in root.walk() {
        let indent = node.depth.saturating_sub(root.depth);
        let mut line = format!("{}{}", "  ".repeat(indent), node.kind);
        if !node.name.is_empty() {
            line.push_str(&format!(" {}", node.name));
        }
        if !node.declared_type.is_empty() {
            line.push_str(&format!(" : {}", node.declared_type));
        }
        println!("{}", line);
    }
}

fn refs(file: &Path, workspace: Option<PathBuf>, stdout: bool, source: &dyn DumpSource, config: &Config) {
    let workspace = workspace.unwrap_or_else(current_dir);
    let file = if file.is_absolute() {
        file.to_path_buf()
    } else {
        workspace.join(file)
    };
    let refs = commands::generate_references(&file, Some(&workspace), source, config)
        .unwrap_or_else(|e| die(&e.to_string()));

    if stdout {
        println!("{}", refs.text);
        return;
    }
    fs::write(&refs.path, &refs.text)
        .unwrap_or_else(|e| die(&format!("cannot write {}: {}", refs.path.display(), e)));
    eprintln!(
        "wrote {} ({} variable(s), {} kernel(s))",
        refs.path.display(),
        refs.variables.len(),
        refs.kernels.len()
    );
}

fn add_property(
    file: &Path,
    line: usize,
    workspace: Option<PathBuf>,
    write: bool,
    source: &dyn DumpSource,
    config: &Config,
) {
    let text = fs::read_to_string(file)
        .unwrap_or_else(|e| die(&format!("cannot read {}: {}", file.display(), e)));
    let doc = Document {
        path: Some(file.to_path_buf()),
        text,
        workspace: Some(workspace.unwrap_or_else(current_dir)),
    };
    let index = line.checked_sub(1).unwrap_or_else(|| die("line numbers start at 1"));

    match commands::add_to_properties(Some(&doc), index, source, config) {
        Outcome::Inserted { edit, via } => {
            if write {
                let out = properties::apply(&doc.text, &edit);
                fs::write(file, out)
                    .unwrap_or_else(|e| die(&format!("cannot write {}: {}", file.display(), e)));
                eprintln!("added {} to {} ({:?})", edit.name, file.display(), via);
            } else {
                let json = serde_json::json!({
                    "via": via,
                    "edit": edit,
                    "snippet": edit.snippet.text(),
                });
                match serde_json::to_string_pretty(&json) {
                    Ok(s) => println!("{}", s),
                    Err(e) => die(&e.to_string()),
                }
            }
        }
        Outcome::AlreadyDeclared { name } => {
            eprintln!("{} is already declared in Properties", name);
        }
        Outcome::Skipped(Skip::NotADeclaration) => {
            eprintln!("line {} does not declare a variable", line);
        }
        Outcome::Skipped(skip) => die(&format!("nothing to do: {:?}", skip)),
    }
}

fn dump(file: &Path, profile: Option<String>, json: bool, source: &dyn DumpSource, config: &Config) {
    let profile = profile.unwrap_or_else(|| config.kernel_profile.clone());
    let request = CompileRequest {
        file,
        profile: &profile,
        working_dir: None,
        includes: config.include_dirs.clone(),
    };
    let text = source.dump(&request).unwrap_or_else(|e| die(&e.to_string()));
    let root = shaderprops::parse_dump(&text);
    if json {
        match serde_json::to_string_pretty(&root) {
            Ok(s) => println!("{}", s),
            Err(e) => die(&e.to_string()),
        }
    } else {
        print_outline(&root);
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load(path),
        None => Config::discover(),
    }
    .unwrap_or_else(|e| die(&e.to_string()));
    let source = dump_source(&cli.dump, &config);

    match cli.command {
        Command::Refs {
            file,
            workspace,
            stdout,
        } => refs(&file, workspace, stdout, source.as_ref(), &config),
        Command::AddProperty {
            file,
            line,
            workspace,
            write,
        } => add_property(&file, line, workspace, write, source.as_ref(), &config),
        Command::Dump { file, profile, json } => {
            dump(&file, profile, json, source.as_ref(), &config)
        }
    }
}
