use crate::generator::{generator_for, RenderContext};
use crate::spec::load_document;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line interface for the SDK generator.
#[derive(Parser)]
#[command(name = "sdkgen")]
#[command(about = "Generate typed API clients from an OpenAPI specification", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a client SDK from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Target platform to emit code for
        #[arg(short, long, default_value = "typescript")]
        language: String,

        /// Output directory for the generated client
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite files in a non-empty output directory
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// List the resources and operations a spec would produce
    Resources {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
}

fn ensure_writable(output: &Path, force: bool) -> anyhow::Result<()> {
    if force || !output.exists() {
        return Ok(());
    }
    let mut entries = std::fs::read_dir(output)
        .with_context(|| format!("reading output directory {}", output.display()))?;
    if entries.next().is_some() {
        anyhow::bail!(
            "output directory {} is not empty (use --force to overwrite)",
            output.display()
        );
    }
    Ok(())
}

/// Execute the CLI command provided by the user.
///
/// # Errors
///
/// Returns an error if the spec cannot be loaded or compiled, the requested
/// platform is unknown, or writing the generated files fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate {
            spec,
            language,
            output,
            force,
        } => {
            // Resolve the platform before touching the filesystem so an
            // unknown language never creates or clobbers an output dir.
            let generator = generator_for(language)?;
            let document = load_document(spec)?;
            ensure_writable(output, *force)?;
            let mut ctx = RenderContext::new(output.clone())?;
            generator.generate(&mut ctx, &document)?;
            Ok(())
        }
        Commands::Resources { spec } => {
            let document = load_document(spec)?;
            for resource in &document.resources {
                println!("{} ({} operations)", resource.name, resource.operations.len());
                for op in &resource.operations {
                    println!("  {} {} {}", op.method, op.path, op.id);
                }
            }
            Ok(())
        }
    }
}
