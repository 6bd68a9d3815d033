//! bake-export library
//!
//! Converts a source scene into three engine files: a `.scene` hierarchy
//! document, a `.anim` file of baked channels and a `.mesh` file holding
//! every sub-mesh with one shared material table.
//!
//! The pipeline is importer-agnostic: anything implementing
//! [`import::SceneImporter`] can feed it; [`import::GltfImporter`] is the
//! built-in backend.

pub mod animation;
pub mod convert;
pub mod error;
pub mod hierarchy;
pub mod import;
pub mod inspect;
pub mod manifest;
pub mod merge;
pub mod mesh;
pub mod scene;
pub mod settings;

pub use convert::{
    ConversionSummary, ConvertedScene, OutputPaths, convert, convert_gltf, convert_to_memory,
};
pub use error::{ExportError, ReferenceKind, Result};
pub use hierarchy::{IndexRemap, MeshRange, ModelBinding, SceneGraph, TransformNode, build_scene};
pub use import::{BAKE_FPS, GltfImporter, ImportedScene, SceneImporter, extract};
pub use merge::{MergedMeshes, MergedSubMesh, merge_meshes, mesh_ranges};
pub use settings::{ExportSettings, FrontAxis, Handedness, ImportSettings, Unit, UpAxis};

// Re-export format constants from shared
pub use scenebake_shared::EXPORT_FORMAT;
