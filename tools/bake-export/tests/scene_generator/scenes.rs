//! Test scenes

use serde_json::json;

use super::{BufferBuilder, GeneratedScene};

/// Frames baked from the 0.5 s test animation at 60 fps
pub const CHARACTER_FRAMES: usize = 30;

/// A small skinned character.
///
/// ```text
/// glTF node   name    parent  content
/// 0           root    -       -
/// 1           hips    0       skinned mesh "body" (Skin + Cloth), skin joints [hips, spine]
/// 2           prop    0       mesh "sword" (Skin, non-indexed), rotates 90° about Y
/// 3           spine   1       translates from (0, 1, 0) to (0, 2, 0)
/// ```
///
/// Breadth-first order is root, hips, prop, spine; depth-first order is
/// root, hips, spine, prop.
pub fn character() -> GeneratedScene {
    let mut buffers = BufferBuilder::new();

    let normals = [[0.0, 0.0, 1.0]; 3];
    let uvs = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

    // body, primitive 0: split between hips and spine
    let skin_positions = buffers.positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let skin_normals = buffers.vec3(&normals);
    let skin_uvs = buffers.vec2(&uvs);
    let skin_joints = buffers.joints(&[[0, 1, 0, 0]; 3]);
    let skin_weights = buffers.vec4(&[[0.75, 0.25, 0.0, 0.0]; 3]);
    let skin_indices = buffers.indices(&[0, 1, 2]);

    // body, primitive 1: fully bound to spine
    let cloth_positions = buffers.positions(&[[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 2.0, 0.0]]);
    let cloth_normals = buffers.vec3(&normals);
    let cloth_uvs = buffers.vec2(&uvs);
    let cloth_joints = buffers.joints(&[[1, 0, 0, 0]; 3]);
    let cloth_weights = buffers.vec4(&[[1.0, 0.0, 0.0, 0.0]; 3]);
    let cloth_indices = buffers.indices(&[0, 1, 2]);

    // sword
    let sword_positions = buffers.positions(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]);
    let sword_normals = buffers.vec3(&[[1.0, 0.0, 0.0]; 3]);

    // wave animation
    let (s, c) = std::f32::consts::FRAC_PI_4.sin_cos();
    let times = buffers.times(&[0.0, 0.5]);
    let spine_keys = buffers.keys3(&[[0.0, 1.0, 0.0], [0.0, 2.0, 0.0]]);
    let prop_keys = buffers.keys4(&[[0.0, 0.0, 0.0, 1.0], [0.0, s, 0.0, c]]);

    let root = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "root", "children": [1, 2] },
            { "name": "hips", "children": [3], "mesh": 0, "skin": 0 },
            { "name": "prop", "mesh": 1, "translation": [1.0, 0.0, 0.0] },
            { "name": "spine", "translation": [0.0, 1.0, 0.0] }
        ],
        "materials": [{ "name": "Skin" }, { "name": "Cloth" }],
        "meshes": [
            {
                "name": "body",
                "primitives": [
                    {
                        "attributes": {
                            "POSITION": skin_positions,
                            "NORMAL": skin_normals,
                            "TEXCOORD_0": skin_uvs,
                            "JOINTS_0": skin_joints,
                            "WEIGHTS_0": skin_weights
                        },
                        "indices": skin_indices,
                        "material": 0
                    },
                    {
                        "attributes": {
                            "POSITION": cloth_positions,
                            "NORMAL": cloth_normals,
                            "TEXCOORD_0": cloth_uvs,
                            "JOINTS_0": cloth_joints,
                            "WEIGHTS_0": cloth_weights
                        },
                        "indices": cloth_indices,
                        "material": 1
                    }
                ]
            },
            {
                "name": "sword",
                "primitives": [
                    {
                        "attributes": { "POSITION": sword_positions, "NORMAL": sword_normals },
                        "material": 0
                    }
                ]
            }
        ],
        "skins": [{ "joints": [1, 3] }],
        "animations": [{
            "name": "wave",
            "samplers": [
                { "input": times, "output": spine_keys, "interpolation": "LINEAR" },
                { "input": times, "output": prop_keys, "interpolation": "LINEAR" }
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 3, "path": "translation" } },
                { "sampler": 1, "target": { "node": 2, "path": "rotation" } }
            ]
        }]
    });

    let (root, buffer) = buffers.finish(root);
    GeneratedScene::new(root, buffer)
}

/// One mesh "terrain" carrying three UV sets, one more than the slot budget.
pub fn terrain() -> GeneratedScene {
    let mut buffers = BufferBuilder::new();
    let uvs = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

    let positions = buffers.positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
    let uv0 = buffers.vec2(&uvs);
    let uv1 = buffers.vec2(&uvs);
    let uv2 = buffers.vec2(&uvs);

    let root = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "ground", "mesh": 0 }],
        "meshes": [{
            "name": "terrain",
            "primitives": [{
                "attributes": {
                    "POSITION": positions,
                    "TEXCOORD_0": uv0,
                    "TEXCOORD_1": uv1,
                    "TEXCOORD_2": uv2
                }
            }]
        }]
    });

    let (root, buffer) = buffers.finish(root);
    GeneratedScene::new(root, buffer)
}

/// A single animated node whose only key sits far beyond any bakeable length.
pub fn endless_take() -> GeneratedScene {
    let mut buffers = BufferBuilder::new();
    let times = buffers.times(&[0.0, 1.0e20]);
    let keys = buffers.keys3(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);

    let root = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "drifter" }],
        "animations": [{
            "name": "forever",
            "samplers": [{ "input": times, "output": keys, "interpolation": "LINEAR" }],
            "channels": [{ "sampler": 0, "target": { "node": 0, "path": "translation" } }]
        }]
    });

    let (root, buffer) = buffers.finish(root);
    GeneratedScene::new(root, buffer)
}
