use std::path::{Path, PathBuf};

use clap::Parser;

use crate::convert::ConvertOptions;

/// Fully resolved converter configuration (constructed from CLI args).
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: ConvertOptions,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            options: ConvertOptions::default(),
            dry_run: false,
            verbose: false,
        }
    }
}

/// Output path used when none is given: `output_<stem>.ms3d` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("output_{stem}.ms3d"))
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "act2ms3d",
    about = "Skinned actor body to MilkShape 3D (.ms3d) converter",
    version
)]
pub struct CliArgs {
    /// Input actor body (JSON dump)
    pub input: PathBuf,

    /// Output .ms3d file (default: output_<input stem>.ms3d next to the input)
    pub output: Option<PathBuf>,

    /// Extension used for material texture file names
    #[arg(long, default_value = "bmp")]
    pub texture_ext: String,

    /// Convert and report stats without writing a file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl From<CliArgs> for ConvertConfig {
    fn from(args: CliArgs) -> Self {
        let output = args
            .output
            .unwrap_or_else(|| default_output_path(&args.input));

        ConvertConfig {
            input: args.input,
            output,
            options: ConvertOptions {
                texture_extension: args.texture_ext,
            },
            dry_run: args.dry_run,
            verbose: args.verbose,
        }
    }
}
