//! Mesh consolidation
//!
//! All mesh groups of a scene end up in one mesh file. Materials are
//! deduplicated by name into a single table and skin joints are rewritten
//! into depth-first node numbering. Sub-mesh order is group order, then
//! order within the group, which is what [`mesh_ranges`] assumes.

use bake_common::VertexAttribute;
use hashbrown::HashMap;

use crate::error::{ExportError, ReferenceKind, Result};
use crate::hierarchy::{IndexRemap, MeshRange};
use crate::import::MeshGroup;

/// A sub-mesh after consolidation, ready for the mesh encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSubMesh {
    /// Group name followed by the sub-mesh's index in its group
    pub name: String,
    /// Index into [`MergedMeshes::materials`]
    pub material: u32,
    pub layout: Vec<VertexAttribute>,
    pub primitive_type: u32,
    pub index_element_size: u8,
    pub vertex_data: Vec<u8>,
    pub index_data: Vec<u8>,
    /// Depth-first node indices
    pub joints: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedMeshes {
    /// Unique material names in first-seen order
    pub materials: Vec<String>,
    pub sub_meshes: Vec<MergedSubMesh>,
}

/// Ordered, name-unique material table.
#[derive(Debug, Default)]
struct MaterialTable {
    names: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl MaterialTable {
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&index) = self.lookup.get(name) {
            return index;
        }
        let index = self.names.len() as u32;
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), index);
        index
    }
}

/// Where each group's sub-meshes land in the merged list.
///
/// Only group sizes are needed, so this can be computed before merging.
pub fn mesh_ranges(groups: &[MeshGroup]) -> Vec<MeshRange> {
    let mut offset = 0;
    groups
        .iter()
        .map(|group| {
            let count = group.sub_meshes.len() as u32;
            let range = MeshRange { offset, count };
            offset += count;
            range
        })
        .collect()
}

pub fn merge_meshes(groups: Vec<MeshGroup>, remap: &IndexRemap) -> Result<MergedMeshes> {
    let mut materials = MaterialTable::default();
    let mut sub_meshes = Vec::new();

    for group in groups {
        let global: Vec<u32> = group
            .material_names
            .iter()
            .map(|name| materials.intern(name))
            .collect();

        let joints = group
            .joints
            .iter()
            .map(|&joint| remap.resolve(joint, ReferenceKind::Joint))
            .collect::<Result<Vec<u32>>>()?;

        for (index, sub_mesh) in group.sub_meshes.into_iter().enumerate() {
            let material = global
                .get(sub_mesh.material as usize)
                .copied()
                .ok_or_else(|| ExportError::consistency(ReferenceKind::Material, sub_mesh.material))?;

            sub_meshes.push(MergedSubMesh {
                name: format!("{}{}", group.name, index),
                material,
                layout: group.layout.clone(),
                primitive_type: group.primitive_type,
                index_element_size: group.index_element_size,
                vertex_data: sub_mesh.vertex_data,
                index_data: sub_mesh.index_data,
                joints: joints.clone(),
            });
        }
    }

    tracing::debug!(
        "Merged {} sub-meshes sharing {} materials",
        sub_meshes.len(),
        materials.names.len()
    );

    Ok(MergedMeshes {
        materials: materials.names,
        sub_meshes,
    })
}
