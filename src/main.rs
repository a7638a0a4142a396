//! Command-line front end for iconset-forge.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use iconset_forge::{
    GenerationOptions, GenerationOverrides, IconsetAssembler, Iconutil, supported_formats,
};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "iconset-forge")]
#[command(about = "Convert an image into a macOS .icns with rounded, padded renditions")]
struct Cli {
    /// Source image (png, jpg, svg, ...)
    input: Option<PathBuf>,

    /// Name of the packaged .icns file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the staging .iconset directory
    #[arg(long)]
    iconset: Option<PathBuf>,

    /// Directory receiving the iconset, the .icns and the plain images
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Transparent margin per side, in percent of the canvas (0 to <50)
    #[arg(short, long)]
    padding: Option<f64>,

    /// Name of the directory for unprefixed image copies
    #[arg(long)]
    plain_dir: Option<PathBuf>,

    /// Resolve relative paths against this directory
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// JSON file with option overrides (command-line flags win)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the accepted input formats and exit
    #[arg(long)]
    list_formats: bool,

    /// Stop after staging the iconset, without running iconutil
    #[arg(long)]
    no_package: bool,

    /// Log every rendered size
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> GenerationOverrides {
        GenerationOverrides {
            input: self.input.clone(),
            output: self.output.clone(),
            iconset_dir: self.iconset.clone(),
            output_dir: self.output_dir.clone(),
            padding_percent: self.padding,
            working_dir: self.cwd.clone(),
            plain_dir: self.plain_dir.clone(),
            formats: None,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: &Cli) -> iconset_forge::Result<()> {
    let mut overrides = cli.overrides();
    if let Some(config) = &cli.config {
        overrides = overrides.or(GenerationOverrides::from_file(config)?);
    }

    let assembler = IconsetAssembler::new(GenerationOptions::from_overrides(overrides));
    debug!(
        input = %assembler.options().resolved_input().display(),
        padding = assembler.options().padding_percent,
        sizes = assembler.sizes().len(),
        "options resolved"
    );

    if cli.no_package {
        let staged = assembler.stage()?;
        info!(staging = %staged.dir.display(), files = staged.files.len(), "iconset staged");
        return Ok(());
    }

    let report = assembler.generate(&Iconutil::new())?;
    println!("{}", report.output_path.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if cli.list_formats {
        for format in supported_formats() {
            println!("{format}");
        }
        return;
    }

    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
