//! Common types for baked scene assets
//!
//! This crate holds everything both the exporter and a loader need to agree
//! on: the binary stream primitives, the `.mesh` and `.anim` layouts, and
//! the vertex attribute slot allocation.

pub mod error;
pub mod formats;
pub mod layout;
pub mod stream;

pub use error::{FormatError, Result};
pub use formats::*;
pub use layout::{
    AttributeRecord, ElementType, MAX_ATTRIBUTE_SLOTS, NumElements, Semantic, VertexAttribute,
    compress_layout, compress_semantic,
};
pub use scenebake_shared::EXPORT_FORMAT;
