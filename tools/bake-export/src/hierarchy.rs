//! Hierarchy reconstruction
//!
//! Importers hand over nodes breadth-first with parent indices, while the
//! scene file is written depth-first. [`build_scene`] builds the owned tree
//! and the one table that translates between the two numberings.
//!
//! ```text
//! breadth-first   A(-1)  B(0)  C(0)  D(1)
//! depth-first     A      B     D     C
//! remap           0->0   1->1  2->3  3->2
//! ```

use serde::ser::{SerializeTuple, Serializer};
use serde::Serialize;

use crate::error::{ExportError, ReferenceKind, Result};
use crate::import::{RawNode, RotateOrder};

/// Contiguous run of merged sub-meshes owned by one mesh group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshRange {
    pub offset: u32,
    pub count: u32,
}

/// One sub-mesh of the merged mesh file drawn by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBinding {
    /// Mesh file path relative to the application root
    pub mesh_path: String,
    pub sub_mesh: u32,
}

impl Serialize for ModelBinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.mesh_path)?;
        pair.serialize_element(&self.sub_mesh)?;
        pair.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformNode {
    pub name: String,
    /// Homogeneous, w = 1
    pub translate: [f64; 4],
    pub rotate: [f64; 4],
    pub scale: [f64; 4],
    pub rotate_order: RotateOrder,
    pub children: Vec<TransformNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ModelBinding>,
}

impl TransformNode {
    fn from_raw(node: RawNode, models: Vec<ModelBinding>) -> Self {
        let [tx, ty, tz] = node.translate;
        let [rx, ry, rz] = node.rotate;
        let [sx, sy, sz] = node.scale;
        Self {
            name: node.name,
            translate: [tx, ty, tz, 1.0],
            rotate: [rx, ry, rz, 1.0],
            scale: [sx, sy, sz, 1.0],
            rotate_order: node.rotate_order,
            children: Vec::new(),
            models,
        }
    }
}

/// Breadth-first (importer) index -> depth-first (output) index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexRemap {
    table: Vec<u32>,
}

impl IndexRemap {
    pub fn get(&self, original: usize) -> Option<u32> {
        self.table.get(original).copied()
    }

    /// Remap an index, reporting `kind` if it does not resolve.
    pub fn resolve(&self, original: u32, kind: ReferenceKind) -> Result<u32> {
        self.get(original as usize)
            .ok_or_else(|| ExportError::consistency(kind, original))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.table
    }
}

/// The owned output hierarchy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneGraph {
    pub roots: Vec<TransformNode>,
}

impl SceneGraph {
    /// Every node, parents before children, first child first.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.depth_first().count()
    }
}

pub struct DepthFirst<'a> {
    stack: Vec<&'a TransformNode>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a TransformNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Build the output tree from breadth-first nodes.
///
/// A node's `mesh_group` selects its entry in `ranges`, and each sub-mesh in
/// that range becomes a binding to `mesh_path`. A group is owned by at most
/// one node, `-1` means no mesh, and every parent must precede its children.
pub fn build_scene(
    nodes: Vec<RawNode>,
    ranges: &[MeshRange],
    mesh_path: &str,
) -> Result<(SceneGraph, IndexRemap)> {
    let count = nodes.len();
    let mut roots = Vec::new();
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut arena: Vec<Option<TransformNode>> = Vec::with_capacity(count);
    let mut claimed = vec![false; ranges.len()];

    for (index, node) in nodes.into_iter().enumerate() {
        match usize::try_from(node.parent) {
            Ok(parent) if parent < index => children_of[parent].push(index),
            Err(_) if node.parent == -1 => roots.push(index),
            _ => {
                return Err(ExportError::Hierarchy {
                    node: index,
                    parent: node.parent,
                });
            }
        }

        let models = if node.mesh_group == -1 {
            Vec::new()
        } else {
            let group = usize::try_from(node.mesh_group)
                .ok()
                .filter(|&group| group < ranges.len() && !claimed[group])
                .ok_or_else(|| ExportError::consistency(ReferenceKind::Mesh, node.mesh_group))?;
            claimed[group] = true;
            let range = ranges[group];
            (range.offset..range.offset + range.count)
                .map(|sub_mesh| ModelBinding {
                    mesh_path: mesh_path.to_string(),
                    sub_mesh,
                })
                .collect()
        };
        arena.push(Some(TransformNode::from_raw(node, models)));
    }

    let mut preorder = Vec::with_capacity(count);
    let mut remap = vec![0u32; count];
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(index) = stack.pop() {
        remap[index] = preorder.len() as u32;
        preorder.push(index);
        stack.extend(children_of[index].iter().rev());
    }

    // Children follow their parent in preorder, so walking it backwards
    // finishes every subtree before its parent claims it.
    for &index in preorder.iter().rev() {
        let children: Vec<TransformNode> = children_of[index]
            .iter()
            .filter_map(|&child| arena[child].take())
            .collect();
        if let Some(node) = arena[index].as_mut() {
            node.children = children;
        }
    }

    let roots = roots.iter().filter_map(|&root| arena[root].take()).collect();
    tracing::debug!("Rebuilt hierarchy of {} nodes", count);

    Ok((SceneGraph { roots }, IndexRemap { table: remap }))
}
