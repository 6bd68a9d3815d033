//! Shared types for the scenebake asset pipeline.
//!
//! Used by `bake-common` (file formats) and `bake-export` (conversion tool).

pub mod export_format;
pub mod fs;

pub use export_format::{EXPORT_FORMAT, ExportFormat, SOURCE_EXTENSIONS};
pub use fs::{MAX_ASSET_BYTES, MAX_MANIFEST_BYTES, read_file_with_limit, relative_asset_path};
