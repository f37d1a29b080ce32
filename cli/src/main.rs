use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use brine_idl::schema_to_json;
use brine_idl_compiler::error::IdlError;
use brine_idl_compiler::{compile_schema, generator_for, Language};

#[derive(Parser)]
#[command(name = "bidl")]
#[command(about = "Generate Rust, Go, C#, Dart or TypeScript from IDL schemas", long_about = None)]
struct Cli {
    /// Log every pipeline step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate source code for one target language
    Generate {
        /// Input `.idl` schema file
        #[arg(short, long)]
        input: PathBuf,

        /// Output source file, replaced if it exists
        #[arg(short, long)]
        output: PathBuf,

        /// Target language: rust, go, csharp, dart or ts
        #[arg(short, long)]
        lang: Language,
    },

    /// Print the verified schema AST as JSON
    Ast {
        /// Input `.idl` schema file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), IdlError> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Commands::Generate { input, output, lang } => generate(input, output, *lang),

        Commands::Ast { input } => {
            let text = fs::read_to_string(input)?;
            println!("{}", schema_to_json(&text)?);
            Ok(())
        }
    }
}

fn generate(input: &Path, output: &Path, lang: Language) -> Result<(), IdlError> {
    let text = fs::read_to_string(input)?;
    log::debug!("read {} bytes from {}", text.len(), input.display());

    let grammar = compile_schema(&text)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    generator_for(lang).generate(output, &grammar)?;

    log::debug!("generated {} from {}", output.display(), input.display());
    Ok(())
}
