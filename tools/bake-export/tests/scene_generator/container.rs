//! GLB and .gltf/.bin output

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use gltf_json as json;
use json::validation::Validate;

/// Parse a hand-written document into typed glTF and reject anything the
/// importer would refuse, so a broken fixture fails here and not mid-test.
pub fn typed_root(value: serde_json::Value) -> json::Root {
    let root: json::Root = serde_json::from_value(value).expect("Fixture is not a glTF document");
    let mut problems = Vec::new();
    root.validate(&root, json::Path::new, &mut |path, error| {
        problems.push(format!("{}: {}", path(), error));
    });
    assert!(problems.is_empty(), "Invalid fixture document: {problems:?}");
    root
}

/// Pack the document and its buffer as a single GLB.
pub fn assemble_glb(root: &json::Root, buffer_data: &[u8]) -> Vec<u8> {
    let json = root.to_vec().expect("Failed to serialize JSON");
    let glb = gltf::Glb {
        header: gltf::binary::Header {
            magic: *b"glTF",
            version: 2,
            // Computed by the writer
            length: 0,
        },
        json: Cow::Owned(json),
        bin: Some(Cow::Borrowed(buffer_data)),
    };
    glb.to_vec().expect("Failed to pack GLB")
}

/// Write `<stem>.gltf` referencing an external `<stem>.bin`.
pub fn write_gltf(root: &json::Root, buffer_data: &[u8], dir: &Path, stem: &str) -> PathBuf {
    let bin_name = format!("{stem}.bin");
    std::fs::write(dir.join(&bin_name), buffer_data).expect("Failed to write buffer");

    let mut root = root.clone();
    let buffer = root.buffers.first_mut().expect("Document has no buffer");
    buffer.uri = Some(bin_name);

    let path = dir.join(format!("{stem}.gltf"));
    let text = root.to_string_pretty().expect("Failed to serialize JSON");
    std::fs::write(&path, text).expect("Failed to write glTF");
    path
}
