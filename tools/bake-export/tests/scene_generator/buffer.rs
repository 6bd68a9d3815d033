//! Binary buffer packing with accessor creation

use serde_json::{Value, json};

const FLOAT: u32 = 5126;
const UNSIGNED_BYTE: u32 = 5121;
const UNSIGNED_SHORT: u32 = 5123;

const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Packs attribute data into one buffer, one view per accessor.
#[derive(Default)]
pub struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        bytes: &[u8],
        component_type: u32,
        count: usize,
        kind: &str,
        target: Option<u32>,
    ) -> usize {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }

        let mut view = json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
        });
        if let Some(target) = target {
            view["target"] = json!(target);
        }
        self.views.push(view);

        self.accessors.push(json!({
            "bufferView": self.views.len() - 1,
            "componentType": component_type,
            "count": count,
            "type": kind,
        }));
        self.accessors.len() - 1
    }

    fn set_bounds(&mut self, accessor: usize, min: Vec<f32>, max: Vec<f32>) {
        self.accessors[accessor]["min"] = json!(min);
        self.accessors[accessor]["max"] = json!(max);
    }

    /// POSITION data; bounds are filled in as glTF requires.
    pub fn positions(&mut self, values: &[[f32; 3]]) -> usize {
        let accessor = self.vec3(values);
        let mut min = vec![f32::MAX; 3];
        let mut max = vec![f32::MIN; 3];
        for value in values {
            for axis in 0..3 {
                min[axis] = min[axis].min(value[axis]);
                max[axis] = max[axis].max(value[axis]);
            }
        }
        self.set_bounds(accessor, min, max);
        accessor
    }

    pub fn vec2(&mut self, values: &[[f32; 2]]) -> usize {
        self.push(bytemuck::cast_slice(values), FLOAT, values.len(), "VEC2", Some(ARRAY_BUFFER))
    }

    pub fn vec3(&mut self, values: &[[f32; 3]]) -> usize {
        self.push(bytemuck::cast_slice(values), FLOAT, values.len(), "VEC3", Some(ARRAY_BUFFER))
    }

    pub fn vec4(&mut self, values: &[[f32; 4]]) -> usize {
        self.push(bytemuck::cast_slice(values), FLOAT, values.len(), "VEC4", Some(ARRAY_BUFFER))
    }

    pub fn joints(&mut self, values: &[[u8; 4]]) -> usize {
        self.push(
            bytemuck::cast_slice(values),
            UNSIGNED_BYTE,
            values.len(),
            "VEC4",
            Some(ARRAY_BUFFER),
        )
    }

    pub fn indices(&mut self, values: &[u16]) -> usize {
        self.push(
            bytemuck::cast_slice(values),
            UNSIGNED_SHORT,
            values.len(),
            "SCALAR",
            Some(ELEMENT_ARRAY_BUFFER),
        )
    }

    /// Animation sampler input times.
    pub fn times(&mut self, values: &[f32]) -> usize {
        let accessor = self.push(bytemuck::cast_slice(values), FLOAT, values.len(), "SCALAR", None);
        let min = values.iter().copied().fold(f32::MAX, f32::min);
        let max = values.iter().copied().fold(f32::MIN, f32::max);
        self.set_bounds(accessor, vec![min], vec![max]);
        accessor
    }

    /// Animation sampler outputs (not a vertex buffer, so no target).
    pub fn keys3(&mut self, values: &[[f32; 3]]) -> usize {
        self.push(bytemuck::cast_slice(values), FLOAT, values.len(), "VEC3", None)
    }

    pub fn keys4(&mut self, values: &[[f32; 4]]) -> usize {
        self.push(bytemuck::cast_slice(values), FLOAT, values.len(), "VEC4", None)
    }

    /// Attach views, accessors and the buffer entry to `root`.
    pub fn finish(self, mut root: Value) -> (Value, Vec<u8>) {
        root["bufferViews"] = Value::Array(self.views);
        root["accessors"] = Value::Array(self.accessors);
        root["buffers"] = json!([{ "byteLength": self.data.len() }]);
        (root, self.data)
    }
}
