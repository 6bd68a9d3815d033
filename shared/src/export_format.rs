//! Output format definition for baked scenes.
//!
//! This module defines the `ExportFormat` struct which serves as the single source of truth
//! for all output-related constants (file extensions, mesh format version, bake rate).
//!
//! # Example
//!
//! ```
//! use scenebake_shared::EXPORT_FORMAT;
//!
//! assert_eq!(EXPORT_FORMAT.scene_ext, "scene");
//! assert_eq!(EXPORT_FORMAT.mesh_version, "1");
//! ```

/// Output format definition for one conversion run.
///
/// Each conversion produces three sibling files named after the source file.
#[derive(Debug, Clone, Copy)]
pub struct ExportFormat {
    /// Scene graph document extension without dot (e.g., "scene")
    pub scene_ext: &'static str,

    /// Binary animation extension (e.g., "anim")
    pub animation_ext: &'static str,

    /// Binary merged-mesh extension (e.g., "mesh")
    pub mesh_ext: &'static str,

    /// Version tag written at the start of every mesh file
    pub mesh_version: &'static str,

    /// Version tag written into every scene document
    pub scene_version: &'static str,

    /// Rate at which animation takes are baked, in samples per second
    pub bake_fps: f64,
}

impl ExportFormat {
    /// Create a new output format definition.
    pub const fn new(
        scene_ext: &'static str,
        animation_ext: &'static str,
        mesh_ext: &'static str,
        mesh_version: &'static str,
        scene_version: &'static str,
        bake_fps: f64,
    ) -> Self {
        Self {
            scene_ext,
            animation_ext,
            mesh_ext,
            mesh_version,
            scene_version,
            bake_fps,
        }
    }
}

/// The output format produced by `bake-export`.
///
/// - Extensions: `.scene`, `.anim`, `.mesh`
/// - Mesh format version: `"1"`
/// - Animation bake rate: 60 samples per second
pub const EXPORT_FORMAT: ExportFormat = ExportFormat::new("scene", "anim", "mesh", "1", "1", 60.0);

/// Extensions of source files the exporter knows how to import.
pub const SOURCE_EXTENSIONS: &[&str] = &["gltf", "glb"];
