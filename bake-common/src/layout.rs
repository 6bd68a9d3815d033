//! Vertex attribute layouts and hardware slot compression
//!
//! Importers describe interleaved vertex data with a wide semantic space:
//! every category (normal, tangent, bitangent, UV) reserves
//! [`Semantic::STRIDE`] consecutive indices, and colours run on from
//! [`Semantic::COLOR`]. Runtimes bind attributes to a small number of
//! hardware slots (typically `GL_MAX_VERTEX_ATTRIBS` = 16), so every layout
//! is compacted through a fixed table before it is written.
//!
//! # Slot allocation
//! ```text
//! slot  0      position
//! slots 1-4    skin indices 0/1, skin weights 0/1
//! slots 5-6    normal 0-1
//! slots 7-8    tangent 0-1
//! slots 9-10   bitangent 0-1
//! slots 11-12  uv 0-1
//! slots 13-15  color 0-2
//! ```

use crate::error::{FormatError, Result};

/// Number of hardware attribute slots a layout may occupy.
pub const MAX_ATTRIBUTE_SLOTS: usize = 16;

/// Raw (pre-compression) semantic index of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Semantic(pub u8);

impl Semantic {
    /// Indices reserved per repeatable category
    pub const STRIDE: u8 = 8;

    pub const POSITION: Semantic = Semantic(0);
    pub const SKIN_INDICES_0: Semantic = Semantic(1);
    pub const SKIN_INDICES_1: Semantic = Semantic(2);
    pub const SKIN_WEIGHTS_0: Semantic = Semantic(3);
    pub const SKIN_WEIGHTS_1: Semantic = Semantic(4);
    pub const NORMAL: Semantic = Semantic(5);
    pub const TANGENT: Semantic = Semantic(Self::NORMAL.0 + Self::STRIDE);
    pub const BITANGENT: Semantic = Semantic(Self::TANGENT.0 + Self::STRIDE);
    pub const UV: Semantic = Semantic(Self::BITANGENT.0 + Self::STRIDE);
    /// Colour sets are open-ended; extra data can be carried as colour.
    pub const COLOR: Semantic = Semantic(Self::UV.0 + Self::STRIDE);

    pub fn normal(set: u8) -> Option<Self> {
        Self::strided(Self::NORMAL, set)
    }

    pub fn tangent(set: u8) -> Option<Self> {
        Self::strided(Self::TANGENT, set)
    }

    pub fn bitangent(set: u8) -> Option<Self> {
        Self::strided(Self::BITANGENT, set)
    }

    pub fn uv(set: u8) -> Option<Self> {
        Self::strided(Self::UV, set)
    }

    pub fn color(set: u8) -> Option<Self> {
        Self::COLOR.0.checked_add(set).map(Semantic)
    }

    fn strided(base: Semantic, set: u8) -> Option<Self> {
        (set < Self::STRIDE).then_some(Semantic(base.0 + set))
    }
}

/// Components per attribute (float, vec2, vec3, vec4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NumElements {
    Vec1 = 1,
    Vec2 = 2,
    Vec3 = 3,
    Vec4 = 4,
}

impl NumElements {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Vec1),
            2 => Ok(Self::Vec2),
            3 => Ok(Self::Vec3),
            4 => Ok(Self::Vec4),
            other => Err(FormatError::InvalidElementCount(other)),
        }
    }

    pub fn count(self) -> usize {
        self as usize
    }
}

/// Component type. Values match the OpenGL enums so they can feed
/// `glVertexAttribPointer` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ElementType {
    UInt32 = 0x1405,
    Float = 0x1406,
}

impl ElementType {
    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            0x1405 => Ok(Self::UInt32),
            0x1406 => Ok(Self::Float),
            other => Err(FormatError::UnknownElementType(other)),
        }
    }

    pub fn size_in_bytes(self) -> usize {
        4
    }
}

/// One attribute in an interleaved vertex, before slot compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub semantic: Semantic,
    pub num_elements: NumElements,
    pub element_type: ElementType,
}

impl VertexAttribute {
    pub const fn new(semantic: Semantic, num_elements: NumElements, element_type: ElementType) -> Self {
        Self {
            semantic,
            num_elements,
            element_type,
        }
    }
}

/// One attribute as stored in a mesh file: the compressed hardware slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRecord {
    pub slot: u8,
    pub num_elements: NumElements,
    pub element_type: ElementType,
}

impl AttributeRecord {
    pub fn size_in_bytes(&self) -> usize {
        self.num_elements.count() * self.element_type.size_in_bytes()
    }
}

// Raw semantic index -> hardware slot. `None` means the category is full.
#[rustfmt::skip]
const SEMANTIC_SLOTS: [Option<u8>; 40] = [
    Some(0), Some(1), Some(2), Some(3), Some(4),
    Some(5), Some(6), None, None, None, None, None, None, // normal
    Some(7), Some(8), None, None, None, None, None, None, // tangent
    Some(9), Some(10), None, None, None, None, None, None, // bitangent
    Some(11), Some(12), None, None, None, None, None, None, // uv
    Some(13), Some(14), Some(15), // color
];

/// Map a raw semantic onto its hardware slot, or `None` if the budget for
/// its category is exhausted.
pub fn compress_semantic(semantic: Semantic) -> Option<u8> {
    SEMANTIC_SLOTS.get(semantic.0 as usize).copied().flatten()
}

/// Compress a whole layout, failing on the first attribute without a slot.
///
/// Attributes are never dropped silently: a mesh that needs more slots than
/// the budget allows cannot be encoded.
pub fn compress_layout(layout: &[VertexAttribute]) -> Result<Vec<AttributeRecord>> {
    layout
        .iter()
        .map(|attribute| {
            let slot = compress_semantic(attribute.semantic).ok_or(FormatError::AttributeBudget {
                semantic: attribute.semantic.0,
            })?;
            Ok(AttributeRecord {
                slot,
                num_elements: attribute.num_elements,
                element_type: attribute.element_type,
            })
        })
        .collect()
}
