//! Scene extraction
//!
//! An importer turns a source file into three flat collections: nodes in
//! breadth-first order with parent indices, animation takes keyed by those
//! same breadth-first indices, and one mesh group per authored mesh object.
//! Nothing here knows about the output numbering; that is the job of
//! [`crate::hierarchy`].

pub mod axis;
pub mod gltf;

use std::fmt;
use std::path::Path;

use bake_common::{ChannelId, VertexAttribute};
use scenebake_shared::EXPORT_FORMAT;
use serde::Serialize;

use crate::error::{ExportError, Result};
use crate::settings::ImportSettings;

pub use self::gltf::{GltfImporter, GltfScene};

/// Samples per second used for every baked channel
pub const BAKE_FPS: f64 = EXPORT_FORMAT.bake_fps;

/// Status reported by an importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Ok,
    Warning,
    ManagerCreateFailed,
    SceneCreateFailed,
    SceneImportFailed,
    InvalidArgument,
    TriangulationFailed,
}

impl ErrorCode {
    /// Whether extraction may proceed with this status
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Ok | Self::Warning)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::ManagerCreateFailed => "manager creation failed",
            Self::SceneCreateFailed => "scene creation failed",
            Self::SceneImportFailed => "scene import failed",
            Self::InvalidArgument => "invalid argument",
            Self::TriangulationFailed => "triangulation failed",
        })
    }
}

/// Importer status plus a human readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ImportReport {
    pub fn ok() -> Self {
        Self {
            code: ErrorCode::Ok,
            message: String::new(),
        }
    }

    pub fn failed(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Downgrade to a warning, appending to any earlier warning text.
    pub fn warn(&mut self, message: impl AsRef<str>) {
        if self.code == ErrorCode::Ok {
            self.code = ErrorCode::Warning;
        }
        if !self.message.is_empty() {
            self.message.push_str("; ");
        }
        self.message.push_str(message.as_ref());
    }
}

impl From<ImportReport> for ExportError {
    fn from(report: ImportReport) -> Self {
        ExportError::Import {
            code: report.code,
            message: report.message,
        }
    }
}

/// Euler rotation order, stored as a packed axis sequence.
///
/// Each axis takes two bits (X=0, Y=1, Z=2); the first applied axis sits in
/// the high bits, so XYZ packs to `0b00_01_10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum RotateOrder {
    #[default]
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl RotateOrder {
    pub fn axes(self) -> [u8; 3] {
        match self {
            Self::Xyz => [0, 1, 2],
            Self::Xzy => [0, 2, 1],
            Self::Yxz => [1, 0, 2],
            Self::Yzx => [1, 2, 0],
            Self::Zxy => [2, 0, 1],
            Self::Zyx => [2, 1, 0],
        }
    }

    pub fn code(self) -> u8 {
        let [a, b, c] = self.axes();
        (a << 4) | (b << 2) | c
    }
}

impl From<RotateOrder> for u8 {
    fn from(order: RotateOrder) -> u8 {
        order.code()
    }
}

/// One node as produced by an importer, in breadth-first order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub name: String,
    pub translate: [f64; 3],
    /// Euler angles in degrees
    pub rotate: [f64; 3],
    pub scale: [f64; 3],
    pub rotate_order: RotateOrder,
    /// Breadth-first index of the parent, or -1 for a root
    pub parent: i32,
    /// Index into the extracted mesh groups, or -1
    pub mesh_group: i32,
}

impl RawNode {
    pub fn new(name: impl Into<String>, parent: i32) -> Self {
        Self {
            name: name.into(),
            translate: [0.0; 3],
            rotate: [0.0; 3],
            scale: [1.0; 3],
            rotate_order: RotateOrder::Xyz,
            parent,
            mesh_group: -1,
        }
    }

    pub fn with_mesh_group(mut self, group: i32) -> Self {
        self.mesh_group = group;
        self
    }
}

/// One scalar channel sampled at [`BAKE_FPS`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationChannel {
    /// Breadth-first index of the animated node
    pub node: u32,
    pub channel: ChannelId,
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationTake {
    pub name: String,
    pub channels: Vec<AnimationChannel>,
}

/// A material-homogeneous piece of a mesh group.
#[derive(Debug, Clone, PartialEq)]
pub struct SubMesh {
    /// Index into the owning group's `material_names`
    pub material: u32,
    pub vertex_data: Vec<u8>,
    /// Empty for non-indexed geometry
    pub index_data: Vec<u8>,
}

/// One authored mesh object, split by material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGroup {
    pub name: String,
    pub material_names: Vec<String>,
    pub layout: Vec<VertexAttribute>,
    pub primitive_type: u32,
    pub index_element_size: u8,
    pub sub_meshes: Vec<SubMesh>,
    /// Breadth-first node indices referenced by the skin indices
    pub joints: Vec<u32>,
}

/// Opens source files. Each successful import yields an independent
/// context, so separate conversions never share importer state.
pub trait SceneImporter {
    type Scene: ImportedScene;

    fn import_scene(
        &self,
        path: &Path,
        settings: &ImportSettings,
    ) -> std::result::Result<Self::Scene, ImportReport>;
}

/// A live importer context. Dropping it releases everything it owns.
pub trait ImportedScene {
    /// Status of the import; `Ok` or `Warning` for a usable context
    fn report(&self) -> &ImportReport;

    fn extract_nodes(&self) -> std::result::Result<Vec<RawNode>, ImportReport>;

    fn extract_takes(&self, bake_fps: f64) -> std::result::Result<Vec<AnimationTake>, ImportReport>;

    fn extract_mesh_groups(&self) -> std::result::Result<Vec<MeshGroup>, ImportReport>;
}

/// The three flat collections read from one source file.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub nodes: Vec<RawNode>,
    pub takes: Vec<AnimationTake>,
    pub mesh_groups: Vec<MeshGroup>,
}

/// Import `path` and pull out nodes, takes and mesh groups.
///
/// The importer context is released before this returns, on success and
/// on every error path.
pub fn extract<I: SceneImporter>(
    importer: &I,
    path: &Path,
    settings: &ImportSettings,
) -> Result<Extraction> {
    let scene = importer.import_scene(path, settings)?;

    let report = scene.report();
    match report.code {
        ErrorCode::Ok => {}
        ErrorCode::Warning => {
            tracing::warn!("Importer warning for {:?}: {}", path, report.message);
        }
        _ => return Err(report.clone().into()),
    }

    let nodes = scene.extract_nodes()?;
    let takes = scene.extract_takes(BAKE_FPS)?;
    let mesh_groups = scene.extract_mesh_groups()?;
    drop(scene);

    tracing::debug!(
        "Extracted {} nodes, {} takes, {} mesh groups from {:?}",
        nodes.len(),
        takes.len(),
        mesh_groups.len(),
        path
    );

    Ok(Extraction {
        nodes,
        takes,
        mesh_groups,
    })
}
