//! Merged mesh encoder (.mesh)

use bake_common::{BinaryFormat, FormatError, MeshFile, SubMeshRecord, compress_layout};

use crate::error::{ExportError, Result};
use crate::merge::MergedMeshes;

/// Compress every layout into hardware slots and build the file model.
///
/// A layout that does not fit the slot budget fails the whole file; no
/// attribute is ever dropped.
pub fn to_mesh_file(merged: &MergedMeshes) -> Result<MeshFile> {
    let sub_meshes = merged
        .sub_meshes
        .iter()
        .map(|sub_mesh| {
            let attributes = compress_layout(&sub_mesh.layout).map_err(|e| match e {
                FormatError::AttributeBudget { semantic } => ExportError::AttributeBudget {
                    mesh: sub_mesh.name.clone(),
                    semantic,
                },
                other => other.into(),
            })?;
            Ok(SubMeshRecord {
                name: sub_mesh.name.clone(),
                material_id: sub_mesh.material,
                attributes,
                primitive_type: sub_mesh.primitive_type,
                index_element_size: sub_mesh.index_element_size,
                vertex_data: sub_mesh.vertex_data.clone(),
                index_data: sub_mesh.index_data.clone(),
                joints: sub_mesh.joints.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MeshFile::new(merged.materials.clone(), sub_meshes))
}

pub fn encode_meshes(merged: &MergedMeshes) -> Result<Vec<u8>> {
    Ok(to_mesh_file(merged)?.encode()?)
}
