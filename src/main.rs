use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use act2ms3d::config::{CliArgs, ConvertConfig};
use act2ms3d::pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Init tracing
    let filter = if args.verbose {
        EnvFilter::new("act2ms3d=debug")
    } else {
        EnvFilter::new("act2ms3d=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config: ConvertConfig = args.into();

    match Pipeline::run(&config) {
        Ok(result) => {
            match result.output {
                Some(path) => println!(
                    "Conversion complete: {} ({} bytes in {:.2}s)",
                    path.display(),
                    result.bytes_written,
                    result.duration.as_secs_f64()
                ),
                None => println!("Dry run complete: nothing written"),
            }
            Ok(())
        }
        Err(e) => {
            error!(%e, "Conversion failed");
            Err(anyhow::anyhow!(e)).context("act2ms3d conversion failed")
        }
    }
}
