use std::fs;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Act2Ms3dError, Result};
use crate::source::Body;

/// Load an actor body from a JSON dump.
///
/// Any failure to obtain the body (missing file, unreadable file, malformed
/// JSON) is reported as an input error; nothing is written in that case.
pub fn load_body(path: &Path) -> Result<Body> {
    if !path.exists() {
        return Err(Act2Ms3dError::Input(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let file = fs::File::open(path).map_err(|e| {
        Act2Ms3dError::Input(format!("Failed to open {}: {e}", path.display()))
    })?;

    let body: Body = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        Act2Ms3dError::Input(format!("Failed to parse body {}: {e}", path.display()))
    })?;

    debug!(
        bones = body.bones.len(),
        vertices = body.skin_vertices.len(),
        normals = body.skin_normals.len(),
        faces = body.faces.len(),
        "Parsed body"
    );
    info!(path = %path.display(), "Loaded actor body");

    Ok(body)
}
