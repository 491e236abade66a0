//! raml-resolve: resolve `!include` tags in a RAML specification.

mod output;
mod report;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use raml_include::IncludeResolver;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use output::OutputFormat;

/// Resolve the includes of a RAML specification into a single document
#[derive(Parser, Debug)]
#[command(name = "raml-resolve")]
#[command(version, about = "Resolve !include tags in RAML specifications", long_about = None)]
struct Args {
    /// RAML or YAML file to resolve
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Directory relative includes are resolved against (defaults to the
    /// directory of FILE)
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Output format of the resolved document
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the resolved document to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print errors as JSON
    #[arg(long)]
    json_errors: bool,

    /// Print the files that were included, one per line
    #[arg(long)]
    list_includes: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raml_resolve=info,raml_include=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve the input and print the result.
///
/// A failed resolution is reported as a diagnostic and yields a failure exit
/// code; other errors are returned.
fn run(args: &Args) -> Result<ExitCode> {
    let (base_dir, name) = root_location(&args.input, args.base_dir.as_deref())?;
    debug!(base_dir = %base_dir.display(), input = %name.display(), "resolving");

    let resolver = IncludeResolver::new(base_dir);
    let tree = match resolver.resolve_file(&name) {
        Ok(tree) => tree,
        Err(error) => {
            report::display_diagnostic(&error.to_diagnostic(), args.json_errors);
            return Ok(ExitCode::FAILURE);
        }
    };
    for warning in tree.warnings() {
        report::display_diagnostic(&warning.to_diagnostic(), args.json_errors);
    }

    let document = output::render(&tree, args.format)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(output = %path.display(), includes = tree.includes().len(), "wrote resolved document");
        }
        None if !args.list_includes => print!("{}", document),
        None => {}
    }

    if args.list_includes {
        print!("{}", output::render_includes(&tree));
    }

    Ok(ExitCode::SUCCESS)
}

/// Split the input into the base directory and the name resolved against it.
///
/// Without `--base-dir` the input's own directory is the base. With it, the
/// input is made absolute so it still names the file the user meant.
fn root_location(input: &Path, base_dir: Option<&Path>) -> Result<(PathBuf, PathBuf)> {
    if let Some(base_dir) = base_dir {
        let input = std::path::absolute(input)
            .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
        return Ok((base_dir.to_path_buf(), input));
    }

    let name = input
        .file_name()
        .ok_or_else(|| anyhow!("Input is not a file: {}", input.display()))?;
    let parent = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    Ok((parent.to_path_buf(), PathBuf::from(name)))
}
