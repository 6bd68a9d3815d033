//! Summaries of baked files (`bake-export inspect`)

use std::path::Path;

use anyhow::{Context, Result};
use bake_common::{AnimationFile, BinaryFormat, MeshFile};
use scenebake_shared::{EXPORT_FORMAT, MAX_ASSET_BYTES, read_file_with_limit};

/// Decode a `.mesh`, `.anim` or `.scene` file and log what it contains.
pub fn inspect_file(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    let bytes = read_file_with_limit(path, MAX_ASSET_BYTES)?;

    match ext.as_str() {
        e if e == EXPORT_FORMAT.mesh_ext => {
            let mesh = MeshFile::decode(&bytes)
                .with_context(|| format!("Failed to decode mesh file: {:?}", path))?;
            log_mesh(path, &mesh);
        }
        e if e == EXPORT_FORMAT.animation_ext => {
            let anim = AnimationFile::decode(&bytes)
                .with_context(|| format!("Failed to decode animation file: {:?}", path))?;
            log_animation(path, &anim);
        }
        e if e == EXPORT_FORMAT.scene_ext => {
            let scene: serde_json::Value = serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse scene file: {:?}", path))?;
            let roots = scene["roots"].as_array().map(Vec::as_slice).unwrap_or_default();
            let (nodes, bindings) = count_scene(roots);
            tracing::info!(
                "Scene {:?}: {} roots, {} nodes, {} model bindings",
                path,
                roots.len(),
                nodes,
                bindings
            );
        }
        _ => anyhow::bail!(
            "Unsupported file: {:?} (use .{}, .{} or .{})",
            path,
            EXPORT_FORMAT.scene_ext,
            EXPORT_FORMAT.animation_ext,
            EXPORT_FORMAT.mesh_ext
        ),
    }
    Ok(())
}

fn log_mesh(path: &Path, mesh: &MeshFile) {
    tracing::info!(
        "Mesh {:?}: version {}, {} materials, {} sub-meshes",
        path,
        mesh.version,
        mesh.materials.len(),
        mesh.sub_meshes.len()
    );
    for (i, material) in mesh.materials.iter().enumerate() {
        tracing::info!("  material [{}] '{}'", i, material);
    }
    for (i, sub) in mesh.sub_meshes.iter().enumerate() {
        let slots: Vec<String> = sub
            .attributes
            .iter()
            .map(|a| format!("{}:{}", a.slot, a.num_elements.count()))
            .collect();
        tracing::info!(
            "  [{}] '{}': material {}, {} vertices, {} indices, {} joints, slots [{}]",
            i,
            sub.name,
            sub.material_id,
            sub.vertex_count(),
            sub.index_count(),
            sub.joints.len(),
            slots.join(" ")
        );
    }
}

fn log_animation(path: &Path, anim: &AnimationFile) {
    tracing::info!("Animation {:?}: {} takes", path, anim.takes.len());
    for (i, take) in anim.takes.iter().enumerate() {
        tracing::info!(
            "  [{}] {} channels, {} frames ({:.2}s)",
            i,
            take.channels.len(),
            take.frame_count(),
            take.frame_count() as f64 / EXPORT_FORMAT.bake_fps
        );
    }
}

fn count_scene(nodes: &[serde_json::Value]) -> (usize, usize) {
    nodes.iter().fold((0, 0), |(count, bindings), node| {
        let children = node["children"].as_array().map(Vec::as_slice).unwrap_or_default();
        let (child_count, child_bindings) = count_scene(children);
        let own = node["models"].as_array().map(Vec::len).unwrap_or(0);
        (count + 1 + child_count, bindings + own + child_bindings)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_scene() {
        let roots = json!([
            { "name": "a", "children": [
                { "name": "b", "children": [], "models": [["x.mesh", 0], ["x.mesh", 1]] }
            ]},
            { "name": "c", "children": [] }
        ]);
        assert_eq!(count_scene(roots.as_array().unwrap()), (3, 2));
    }

    #[test]
    fn test_inspect_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        assert!(inspect_file(&path).is_err());
    }

    #[test]
    fn test_inspect_reports_corrupt_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mesh");
        std::fs::write(&path, [1u8, 0, 0]).unwrap();
        let err = inspect_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to decode mesh file"));
    }
}
