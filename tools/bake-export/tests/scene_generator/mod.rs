//! Programmatic glTF generation for integration tests.
//!
//! Scenes are described with `serde_json`, checked as typed `gltf_json`
//! documents, and packed either as a single GLB or as a `.gltf` document
//! next to an external `.bin` buffer.

#![allow(dead_code)]

mod buffer;
mod container;
mod scenes;

pub use buffer::BufferBuilder;
pub use container::{assemble_glb, typed_root, write_gltf};
pub use scenes::{CHARACTER_FRAMES, character, endless_take, terrain};

/// A glTF document plus its packed binary buffer.
pub struct GeneratedScene {
    pub root: gltf_json::Root,
    pub buffer: Vec<u8>,
}

impl GeneratedScene {
    pub fn new(root: serde_json::Value, buffer: Vec<u8>) -> Self {
        Self {
            root: typed_root(root),
            buffer,
        }
    }

    /// Write as `<dir>/<stem>.glb` and return the path.
    pub fn write_glb(&self, dir: &std::path::Path, stem: &str) -> std::path::PathBuf {
        let path = dir.join(format!("{stem}.glb"));
        std::fs::write(&path, assemble_glb(&self.root, &self.buffer)).expect("Failed to write GLB");
        path
    }

    /// Write as `<dir>/<stem>.gltf` plus `<dir>/<stem>.bin` and return the `.gltf` path.
    pub fn write_gltf(&self, dir: &std::path::Path, stem: &str) -> std::path::PathBuf {
        write_gltf(&self.root, &self.buffer, dir, stem)
    }
}
