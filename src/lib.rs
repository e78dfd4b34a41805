pub mod config;
pub mod convert;
pub mod error;
pub mod ms3d;
pub mod pipeline;
pub mod source;

pub use config::ConvertConfig;
pub use convert::{ConvertOptions, convert_body};
pub use pipeline::Pipeline;
