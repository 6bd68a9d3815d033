//! Baked scene file formats
//!
//! Plain sequential little-endian layouts with no magic bytes; the file
//! extension decides which decoder applies. Extensions and version tags
//! live in `scenebake_shared::EXPORT_FORMAT`.

pub mod animation;
pub mod mesh;
mod serialization;

pub use animation::*;
pub use mesh::*;
pub use serialization::BinaryFormat;
