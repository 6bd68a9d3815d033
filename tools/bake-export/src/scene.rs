//! Scene document encoder (.scene)

use scenebake_shared::EXPORT_FORMAT;
use serde::Serialize;

use crate::error::Result;
use crate::hierarchy::{SceneGraph, TransformNode};

#[derive(Serialize)]
struct SceneDocument<'a> {
    version: &'a str,
    roots: &'a [TransformNode],
}

/// Pretty-printed JSON; nodes nest depth-first, bindings are
/// `[meshPath, subMeshIndex]` pairs.
pub fn encode_scene(graph: &SceneGraph) -> Result<String> {
    let document = SceneDocument {
        version: EXPORT_FORMAT.scene_version,
        roots: &graph.roots,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
