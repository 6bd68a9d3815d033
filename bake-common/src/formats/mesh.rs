//! Baked mesh file (.mesh)
//!
//! One file holds every sub-mesh of a scene, merged across mesh groups.
//! Vertex and index data are stored exactly as they will be uploaded.
//!
//! # Layout
//! ```text
//! string  version ("1")
//! u32     material count, then each material name as a string
//! u32     sub-mesh count
//! per sub-mesh:
//!   string  name
//!   u32     material id (index into the material table)
//!   u8      attribute count
//!   per attribute: u8 slot, u8 element count, u32 element type
//!   u32     primitive type
//!   u32     vertex data length in bytes
//!   u32     index data length in bytes
//!   u8      index element width (only when index data length > 0)
//!   [u8]    vertex data
//!   [u8]    index data
//!   u32     joint count, then each joint node index as u32
//! ```

use std::io::Write;

use scenebake_shared::EXPORT_FORMAT;

use crate::error::{FormatError, Result};
use crate::formats::BinaryFormat;
use crate::layout::{AttributeRecord, ElementType, NumElements};
use crate::stream::{BinaryReader, BinaryWriter};

/// OpenGL primitive modes used by the exporter
pub mod primitive {
    pub const POINTS: u32 = 0x0000;
    pub const LINES: u32 = 0x0001;
    pub const TRIANGLES: u32 = 0x0004;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubMeshRecord {
    pub name: String,
    pub material_id: u32,
    pub attributes: Vec<AttributeRecord>,
    pub primitive_type: u32,
    /// Bytes per index; meaningless when `index_data` is empty
    pub index_element_size: u8,
    pub vertex_data: Vec<u8>,
    pub index_data: Vec<u8>,
    pub joints: Vec<u32>,
}

impl SubMeshRecord {
    /// Number of indices, or 0 for non-indexed geometry
    pub fn index_count(&self) -> usize {
        match self.index_element_size {
            0 => 0,
            size => self.index_data.len() / size as usize,
        }
    }

    /// Bytes per interleaved vertex
    pub fn vertex_stride(&self) -> usize {
        self.attributes.iter().map(AttributeRecord::size_in_bytes).sum()
    }

    pub fn vertex_count(&self) -> usize {
        match self.vertex_stride() {
            0 => 0,
            stride => self.vertex_data.len() / stride,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshFile {
    pub version: String,
    pub materials: Vec<String>,
    pub sub_meshes: Vec<SubMeshRecord>,
}

impl MeshFile {
    pub fn new(materials: Vec<String>, sub_meshes: Vec<SubMeshRecord>) -> Self {
        Self {
            version: EXPORT_FORMAT.mesh_version.to_string(),
            materials,
            sub_meshes,
        }
    }
}

impl BinaryFormat for MeshFile {
    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.string(&self.version)?;

        writer.len_u32(self.materials.len())?;
        for material in &self.materials {
            writer.string(material)?;
        }

        writer.len_u32(self.sub_meshes.len())?;
        for sub_mesh in &self.sub_meshes {
            writer.string(&sub_mesh.name)?;
            writer.u32(sub_mesh.material_id)?;

            writer.len_u8(sub_mesh.attributes.len())?;
            for attribute in &sub_mesh.attributes {
                writer.u8(attribute.slot)?;
                writer.u8(attribute.num_elements as u8)?;
                writer.u32(attribute.element_type as u32)?;
            }

            writer.u32(sub_mesh.primitive_type)?;
            writer.len_u32(sub_mesh.vertex_data.len())?;
            writer.len_u32(sub_mesh.index_data.len())?;
            if !sub_mesh.index_data.is_empty() {
                writer.u8(sub_mesh.index_element_size)?;
            }
            writer.bytes(&sub_mesh.vertex_data)?;
            writer.bytes(&sub_mesh.index_data)?;
            writer.u32_array(&sub_mesh.joints)?;
        }
        Ok(())
    }

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let version = reader.string()?;
        if version != EXPORT_FORMAT.mesh_version {
            return Err(FormatError::UnsupportedVersion(version));
        }

        let material_count = reader.u32()?;
        let mut materials = Vec::new();
        for _ in 0..material_count {
            materials.push(reader.string()?);
        }

        let sub_mesh_count = reader.u32()?;
        let mut sub_meshes = Vec::new();
        for _ in 0..sub_mesh_count {
            let name = reader.string()?;
            let material_id = reader.u32()?;

            let attribute_count = reader.u8()?;
            let mut attributes = Vec::with_capacity(attribute_count as usize);
            for _ in 0..attribute_count {
                let slot = reader.u8()?;
                let num_elements = NumElements::from_u8(reader.u8()?)?;
                let element_type = ElementType::from_u32(reader.u32()?)?;
                attributes.push(AttributeRecord {
                    slot,
                    num_elements,
                    element_type,
                });
            }

            let primitive_type = reader.u32()?;
            let vertex_len = reader.u32()? as usize;
            let index_len = reader.u32()? as usize;
            let index_element_size = if index_len > 0 { reader.u8()? } else { 0 };
            let vertex_data = reader.bytes(vertex_len)?.to_vec();
            let index_data = reader.bytes(index_len)?.to_vec();
            let joints = reader.u32_array()?;

            sub_meshes.push(SubMeshRecord {
                name,
                material_id,
                attributes,
                primitive_type,
                index_element_size,
                vertex_data,
                index_data,
                joints,
            });
        }

        Ok(Self {
            version,
            materials,
            sub_meshes,
        })
    }
}
