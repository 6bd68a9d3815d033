//! Conversion pipeline
//!
//! extract -> rebuild hierarchy -> merge meshes -> encode. All three
//! outputs are encoded in memory before anything touches the disk, so a
//! failing scene never leaves partial files behind.

use std::path::{Path, PathBuf};

use scenebake_shared::{EXPORT_FORMAT, relative_asset_path};

use crate::animation::encode_takes;
use crate::error::{ExportError, Result};
use crate::hierarchy::build_scene;
use crate::import::{GltfImporter, SceneImporter, extract};
use crate::merge::{merge_meshes, mesh_ranges};
use crate::mesh::encode_meshes;
use crate::scene::encode_scene;
use crate::settings::ExportSettings;

/// Output files for one source, named after its stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub scene: PathBuf,
    pub animation: PathBuf,
    pub mesh: PathBuf,
}

impl OutputPaths {
    pub fn for_input(input: &Path) -> Self {
        Self {
            scene: input.with_extension(EXPORT_FORMAT.scene_ext),
            animation: input.with_extension(EXPORT_FORMAT.animation_ext),
            mesh: input.with_extension(EXPORT_FORMAT.mesh_ext),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionSummary {
    pub nodes: usize,
    pub takes: usize,
    pub channels: usize,
    pub materials: usize,
    pub sub_meshes: usize,
}

/// Encoded outputs of one conversion, not yet written.
#[derive(Debug, Clone)]
pub struct ConvertedScene {
    pub scene: String,
    pub animation: Vec<u8>,
    pub mesh: Vec<u8>,
    pub summary: ConversionSummary,
}

/// Run the whole pipeline without writing anything.
pub fn convert_to_memory<I: SceneImporter>(
    importer: &I,
    input: &Path,
    settings: &ExportSettings,
) -> Result<ConvertedScene> {
    let paths = OutputPaths::for_input(input);
    let mesh_path = relative_asset_path(&paths.mesh, &settings.app_root).map_err(|e| {
        ExportError::Io {
            path: paths.mesh.clone(),
            source: std::io::Error::other(format!("{e:#}")),
        }
    })?;

    let extraction = extract(importer, input, &settings.import)?;

    let ranges = mesh_ranges(&extraction.mesh_groups);
    let (graph, remap) = build_scene(extraction.nodes, &ranges, &mesh_path)?;
    let scene = encode_scene(&graph)?;

    let animation = encode_takes(&extraction.takes, &remap)?;

    let merged = merge_meshes(extraction.mesh_groups, &remap)?;
    let mesh = encode_meshes(&merged)?;

    let summary = ConversionSummary {
        nodes: remap.len(),
        takes: extraction.takes.len(),
        channels: extraction.takes.iter().map(|t| t.channels.len()).sum(),
        materials: merged.materials.len(),
        sub_meshes: merged.sub_meshes.len(),
    };

    Ok(ConvertedScene {
        scene,
        animation,
        mesh,
        summary,
    })
}

/// Convert `input` and write `.scene`, `.anim` and `.mesh` next to it.
pub fn convert<I: SceneImporter>(
    importer: &I,
    input: &Path,
    settings: &ExportSettings,
) -> Result<ConversionSummary> {
    let converted = convert_to_memory(importer, input, settings)?;
    let paths = OutputPaths::for_input(input);

    write_all(&[
        (paths.scene.as_path(), converted.scene.as_bytes()),
        (paths.animation.as_path(), converted.animation.as_slice()),
        (paths.mesh.as_path(), converted.mesh.as_slice()),
    ])?;

    let summary = converted.summary;
    tracing::info!(
        "Converted {:?}: {} nodes, {} takes ({} channels), {} sub-meshes, {} materials",
        input,
        summary.nodes,
        summary.takes,
        summary.channels,
        summary.sub_meshes,
        summary.materials
    );
    Ok(summary)
}

/// Convert a glTF/GLB file with the built-in importer.
pub fn convert_gltf(input: &Path, settings: &ExportSettings) -> Result<ConversionSummary> {
    convert(&GltfImporter, input, settings)
}

/// Write every file or none.
fn write_all(files: &[(&Path, &[u8])]) -> Result<()> {
    write_all_with(files, |path, bytes| std::fs::write(path, bytes))
}

/// On failure, every file this run touched is removed, including the one
/// whose write failed: it may already be created and partly written.
fn write_all_with<F>(files: &[(&Path, &[u8])], mut write: F) -> Result<()>
where
    F: FnMut(&Path, &[u8]) -> std::io::Result<()>,
{
    for (written, (path, bytes)) in files.iter().enumerate() {
        if let Err(source) = write(path, bytes) {
            for (touched, _) in &files[..=written] {
                remove_output(touched);
            }
            return Err(ExportError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
        tracing::debug!("Wrote {:?} ({} bytes)", path, bytes.len());
    }
    Ok(())
}

fn remove_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove partial output {:?}: {}", path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::tests::FixtureImporter;
    use crate::import::{
        AnimationChannel, AnimationTake, ErrorCode, Extraction, ImportReport, MeshGroup, RawNode,
        SubMesh,
    };
    use crate::settings::ImportSettings;
    use bake_common::{
        AnimationFile, BinaryFormat, ChannelId, ElementType, MeshFile, NumElements, Semantic,
        VertexAttribute, primitive,
    };

    fn skinned_group(name: &str, material: &str, joints: Vec<u32>) -> MeshGroup {
        MeshGroup {
            name: name.into(),
            material_names: vec![material.into()],
            layout: vec![VertexAttribute::new(
                Semantic::POSITION,
                NumElements::Vec3,
                ElementType::Float,
            )],
            primitive_type: primitive::TRIANGLES,
            index_element_size: 4,
            sub_meshes: vec![SubMesh {
                material: 0,
                vertex_data: vec![0; 36],
                index_data: [0u32, 1, 2].iter().flat_map(|i| i.to_le_bytes()).collect(),
            }],
            joints,
        }
    }

    /// BFS [root, hips, prop, spine(parent hips)] with two skinned groups.
    fn character() -> Extraction {
        Extraction {
            nodes: vec![
                RawNode::new("root", -1),
                RawNode::new("hips", 0).with_mesh_group(0),
                RawNode::new("prop", 0).with_mesh_group(1),
                RawNode::new("spine", 1),
            ],
            takes: vec![AnimationTake {
                name: "idle".into(),
                channels: vec![AnimationChannel {
                    node: 3,
                    channel: ChannelId::TranslateY,
                    samples: vec![0.0, 0.1],
                }],
            }],
            mesh_groups: vec![
                skinned_group("body", "Skin", vec![1, 3]),
                skinned_group("arm", "Skin", vec![3]),
            ],
        }
    }

    fn settings(root: &Path) -> ExportSettings {
        ExportSettings::new(ImportSettings::default(), root)
    }

    #[test]
    fn test_outputs_agree_on_numbering() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("models").join("hero.gltf");
        let importer = FixtureImporter::new(character());

        let converted = convert_to_memory(&importer, &input, &settings(dir.path())).unwrap();

        let scene: serde_json::Value = serde_json::from_str(&converted.scene).unwrap();
        let hips = &scene["roots"][0]["children"][0];
        assert_eq!(hips["name"], "hips");
        assert_eq!(hips["children"][0]["name"], "spine");
        assert_eq!(hips["models"][0][0], "models/hero.mesh");
        assert_eq!(scene["roots"][0]["children"][1]["models"][0][1], 1);

        let anim = AnimationFile::decode(&converted.animation).unwrap();
        assert_eq!(anim.takes[0].channels[0].node, 2);

        let mesh = MeshFile::decode(&converted.mesh).unwrap();
        assert_eq!(mesh.materials, ["Skin"]);
        assert_eq!(mesh.sub_meshes[0].joints, [1, 2]);
        assert_eq!(mesh.sub_meshes[1].joints, [2]);

        assert_eq!(
            converted.summary,
            ConversionSummary {
                nodes: 4,
                takes: 1,
                channels: 1,
                materials: 1,
                sub_meshes: 2
            }
        );
    }

    #[test]
    fn test_convert_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("hero.gltf");
        let importer = FixtureImporter::new(character());

        convert(&importer, &input, &settings(dir.path())).unwrap();

        let paths = OutputPaths::for_input(&input);
        assert!(paths.scene.exists());
        assert!(paths.animation.exists());
        assert!(paths.mesh.exists());
        assert_eq!(importer.live.get(), 0);
    }

    #[test]
    fn test_failed_import_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("hero.gltf");
        let mut importer = FixtureImporter::new(character());
        importer.report = ImportReport::failed(ErrorCode::SceneImportFailed, "corrupt");

        assert!(convert(&importer, &input, &settings(dir.path())).is_err());
        let paths = OutputPaths::for_input(&input);
        assert!(!paths.scene.exists());
        assert!(!paths.animation.exists());
        assert!(!paths.mesh.exists());
    }

    #[test]
    fn test_budget_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("hero.gltf");
        let mut extraction = character();
        extraction.mesh_groups[1].layout.extend(
            (0..3).map(|set| {
                VertexAttribute::new(Semantic::uv(set).unwrap(), NumElements::Vec2, ElementType::Float)
            }),
        );
        let importer = FixtureImporter::new(extraction);

        let err = convert(&importer, &input, &settings(dir.path())).unwrap_err();
        assert!(matches!(err, ExportError::AttributeBudget { .. }));
        assert!(!OutputPaths::for_input(&input).scene.exists());
    }

    #[test]
    fn test_partial_write_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.scene");
        let blocked = dir.path().join("missing").join("b.anim");

        let err = write_all(&[
            (first.as_path(), b"{}".as_slice()),
            (blocked.as_path(), b"\0".as_slice()),
        ]).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(!first.exists());
    }

    #[test]
    fn test_truncated_write_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::for_input(&dir.path().join("hero.gltf"));
        let mesh = vec![7u8; 64];

        // The mesh file is created and half written before the disk fills up.
        let err = write_all_with(
            &[
                (paths.scene.as_path(), b"{}".as_slice()),
                (paths.animation.as_path(), b"\0\0\0\0".as_slice()),
                (paths.mesh.as_path(), mesh.as_slice()),
            ],
            |path, bytes| {
                if path == paths.mesh.as_path() {
                    std::fs::write(path, &bytes[..bytes.len() / 2])?;
                    return Err(std::io::Error::other("no space left on device"));
                }
                std::fs::write(path, bytes)
            },
        )
        .unwrap_err();

        match err {
            ExportError::Io { path, .. } => assert_eq!(path, paths.mesh),
            other => panic!("Expected io error, got {other}"),
        }
        assert!(!paths.scene.exists());
        assert!(!paths.animation.exists());
        assert!(!paths.mesh.exists());
    }
}
