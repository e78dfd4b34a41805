use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::ConvertConfig;
use crate::convert::convert_body;
use crate::error::Result;
use crate::ms3d::{self, Ms3dModel};
use crate::source::{self, Body};

/// Summary of a completed conversion.
#[derive(Debug)]
pub struct ConversionResult {
    /// Written file, or `None` on a dry run.
    pub output: Option<PathBuf>,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub group_count: usize,
    pub material_count: usize,
    pub joint_count: usize,
    pub bytes_written: usize,
    pub duration: Duration,
}

/// Pipeline orchestrator -- load, validate, convert, write.
pub struct Pipeline;

impl Pipeline {
    /// Run the full conversion.
    pub fn run(config: &ConvertConfig) -> Result<ConversionResult> {
        let start = Instant::now();

        info!(input = %config.input.display(), "Starting conversion");

        info!("Stage 1/4: Load");
        let body = source::load_body(&config.input)?;

        info!("Stage 2/4: Validate");
        source::validate_body(&body)?;

        info!("Stage 3/4: Convert");
        let model = convert_body(&body, &config.options)?;

        if config.dry_run {
            info!("--dry-run: skipping write");
            print_dry_run_summary(&body, &model);
            return Ok(Self::summarize(&model, None, 0, start));
        }

        info!("Stage 4/4: Write");
        let bytes_written = ms3d::write_ms3d_file(&config.output, &model)?;

        let result = Self::summarize(&model, Some(config.output.clone()), bytes_written, start);
        info!(
            output = %config.output.display(),
            bytes = bytes_written,
            elapsed = ?result.duration,
            "Conversion complete"
        );
        Ok(result)
    }

    fn summarize(
        model: &Ms3dModel,
        output: Option<PathBuf>,
        bytes_written: usize,
        start: Instant,
    ) -> ConversionResult {
        ConversionResult {
            output,
            vertex_count: model.vertices.len(),
            triangle_count: model.triangles.len(),
            group_count: model.groups.len(),
            material_count: model.materials.len(),
            joint_count: model.joints.len(),
            bytes_written,
            duration: start.elapsed(),
        }
    }
}

/// Print source and target stats for a dry run.
fn print_dry_run_summary(body: &Body, model: &Ms3dModel) {
    println!("=== Dry Run Summary ===");
    println!("  Bones:     {}", body.bones.len());
    println!("  Vertices:  {}", model.vertices.len());
    println!("  Normals:   {}", body.skin_normals.len());
    println!("  Triangles: {}", model.triangles.len());
    println!("  Groups:    {}", model.groups.len());
    println!("  Materials: {}", model.materials.len());
    println!("  Joints:    {}", model.joints.len());
    println!("  Size:      {} bytes", model.encoded_len());
}
