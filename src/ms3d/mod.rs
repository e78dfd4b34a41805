//! In-memory MilkShape 3D model, laid out as the 1.8.x `.ms3d` file stores it.
//!
//! Field widths here are the on-disk widths: `u16` vertex and triangle
//! indices, signed 8-bit bone and material references (`-1` = none).

pub mod writer;

pub use writer::{to_bytes, write_ms3d, write_ms3d_file};

/// File identifier, first 10 bytes of every `.ms3d`.
pub const MAGIC: &[u8; 10] = b"MS3D000000";
/// Format version written after the identifier.
pub const VERSION: i32 = 4;

/// Width of name fields (groups, materials, joints).
pub const NAME_LEN: usize = 32;
/// Width of texture and alpha map file name fields.
pub const FILENAME_LEN: usize = 128;

pub const HEADER_SIZE: usize = 14;
pub const VERTEX_SIZE: usize = 15;
pub const TRIANGLE_SIZE: usize = 70;
pub const MATERIAL_SIZE: usize = 361;
pub const ANIM_CONTROLS_SIZE: usize = 12;
pub const JOINT_SIZE: usize = 93;

// Record flags. The converter never sets them; listed for readers of the files.
pub const FLAG_SELECTED: u8 = 1;
pub const FLAG_HIDDEN: u8 = 2;
pub const FLAG_SELECTED2: u8 = 4;
pub const FLAG_DIRTY: u8 = 8;

/// Material mode value the exporter always writes.
pub const DEFAULT_MATERIAL_MODE: i8 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub flags: u8,
    pub position: [f32; 3],
    /// Owning bone, or `-1`.
    pub bone_id: i8,
    pub reference_count: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub flags: u16,
    pub vertex_indices: [u16; 3],
    pub vertex_normals: [[f32; 3]; 3],
    pub s: [f32; 3],
    pub t: [f32; 3],
    /// 1..=32.
    pub smoothing_group: u8,
    /// Always 0; material assignment goes through [`Group`].
    pub group_index: u8,
}

/// Named run of triangles sharing one material.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub flags: u8,
    pub name: String,
    pub triangle_indices: Vec<u16>,
    /// Material index, or `-1` for none.
    pub material_index: i8,
}

impl Group {
    pub fn new(name: impl Into<String>, material_index: i8) -> Self {
        Self {
            flags: 0,
            name: name.into(),
            triangle_indices: Vec::new(),
            material_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emissive: [f32; 4],
    /// 0.0..=128.0.
    pub shininess: f32,
    /// 0.0..=1.0, 1.0 is fully opaque.
    pub transparency: f32,
    pub mode: i8,
    pub texture: String,
    pub alphamap: String,
}

impl Material {
    /// Material carrying only a name: white ambient and diffuse, black
    /// specular and emissive, no shininess, fully opaque, and a texture
    /// file named `<name>.<texture_ext>`.
    pub fn with_defaults(name: &str, texture_ext: &str) -> Self {
        Self {
            name: name.to_string(),
            ambient: [1.0, 1.0, 1.0, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            emissive: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
            transparency: 1.0,
            mode: DEFAULT_MATERIAL_MODE,
            texture: format!("{name}.{texture_ext}"),
            alphamap: String::new(),
        }
    }
}

/// Editor animation state stored between materials and joints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimControls {
    pub animation_fps: f32,
    pub current_time: f32,
    pub total_frames: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub flags: u8,
    pub name: String,
    /// Empty for a root joint.
    pub parent_name: String,
    /// Local Euler angles `[roll, pitch, yaw]` in radians.
    pub rotation: [f32; 3],
    pub position: [f32; 3],
    pub num_key_frames_rot: u16,
    pub num_key_frames_trans: u16,
}

/// Complete MilkShape model, ready for [`write_ms3d`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ms3dModel {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub groups: Vec<Group>,
    pub materials: Vec<Material>,
    pub anim_controls: AnimControls,
    pub joints: Vec<Joint>,
}

impl Ms3dModel {
    /// Exact size of the encoded file.
    pub fn encoded_len(&self) -> usize {
        let groups: usize = self
            .groups
            .iter()
            .map(|g| 1 + NAME_LEN + 2 + 2 * g.triangle_indices.len() + 1)
            .sum();

        HEADER_SIZE
            + 2
            + self.vertices.len() * VERTEX_SIZE
            + 2
            + self.triangles.len() * TRIANGLE_SIZE
            + 2
            + groups
            + 2
            + self.materials.len() * MATERIAL_SIZE
            + ANIM_CONTROLS_SIZE
            + 2
            + self.joints.len() * JOINT_SIZE
    }
}
