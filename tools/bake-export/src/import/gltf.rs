//! glTF 2.0 importer (.gltf / .glb)

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use bake_common::{ChannelId, ElementType, NumElements, Semantic, VertexAttribute};
use gltf::animation::util::ReadOutputs;
use gltf::animation::{Interpolation, Property};
use gltf::mesh::Mode;
use glam::{Quat, Vec3};
use hashbrown::HashMap;
use scenebake_shared::{MAX_ASSET_BYTES, SOURCE_EXTENSIONS, read_file_with_limit};

use super::axis::AxisConversion;
use super::{
    AnimationChannel, AnimationTake, ErrorCode, ImportReport, ImportedScene, MeshGroup, RawNode,
    RotateOrder, SceneImporter, SubMesh,
};
use crate::settings::ImportSettings;

/// UV sets the importer will read per primitive
const MAX_UV_SETS: u32 = 8;
/// Skin influences kept per vertex (two vec4 slots)
const MAX_INFLUENCES: usize = 8;
const INDEX_ELEMENT_SIZE: u8 = 4;

type ImportResult<T> = std::result::Result<T, ImportReport>;

/// Importer backed by the `gltf` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfImporter;

impl SceneImporter for GltfImporter {
    type Scene = GltfScene;

    fn import_scene(&self, path: &Path, settings: &ImportSettings) -> ImportResult<GltfScene> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        if !SOURCE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportReport::failed(
                ErrorCode::InvalidArgument,
                format!("unsupported source format {:?} (use .gltf or .glb)", path),
            ));
        }

        let bytes = read_file_with_limit(path, MAX_ASSET_BYTES).map_err(|e| {
            ImportReport::failed(ErrorCode::SceneCreateFailed, format!("{e:#}"))
        })?;
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(&bytes).map_err(|e| {
            ImportReport::failed(
                ErrorCode::SceneImportFailed,
                format!("failed to parse glTF {:?}: {e}", path),
            )
        })?;
        let buffers = gltf::import_buffers(&document, path.parent(), blob).map_err(|e| {
            ImportReport::failed(
                ErrorCode::SceneImportFailed,
                format!("failed to load buffers for {:?}: {e}", path),
            )
        })?;

        Ok(GltfScene::new(
            path.to_path_buf(),
            document,
            buffers,
            AxisConversion::new(settings),
        ))
    }
}

/// A parsed glTF document plus the breadth-first node order.
pub struct GltfScene {
    path: PathBuf,
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
    conversion: AxisConversion,
    report: ImportReport,
    /// glTF node index per breadth-first position
    order: Vec<usize>,
    parents: Vec<i32>,
    /// glTF node index -> breadth-first position
    flat_index: HashMap<usize, u32>,
}

impl GltfScene {
    fn new(
        path: PathBuf,
        document: gltf::Document,
        buffers: Vec<gltf::buffer::Data>,
        conversion: AxisConversion,
    ) -> Self {
        let mut scene = Self {
            path,
            document,
            buffers,
            conversion,
            report: ImportReport::ok(),
            order: Vec::new(),
            parents: Vec::new(),
            flat_index: HashMap::new(),
        };
        scene.walk_breadth_first();
        scene.collect_warnings();
        scene
    }

    fn walk_breadth_first(&mut self) {
        let roots: Vec<usize> = match self
            .document
            .default_scene()
            .or_else(|| self.document.scenes().next())
        {
            Some(scene) => scene.nodes().map(|n| n.index()).collect(),
            None => {
                let mut is_child = vec![false; self.document.nodes().count()];
                for node in self.document.nodes() {
                    for child in node.children() {
                        is_child[child.index()] = true;
                    }
                }
                (0..is_child.len()).filter(|&i| !is_child[i]).collect()
            }
        };

        let nodes: Vec<gltf::Node<'_>> = self.document.nodes().collect();
        let mut queue: VecDeque<(usize, i32)> = roots.into_iter().map(|i| (i, -1)).collect();
        while let Some((index, parent)) = queue.pop_front() {
            if self.flat_index.contains_key(&index) {
                continue;
            }
            let flat = self.order.len() as u32;
            self.flat_index.insert(index, flat);
            self.order.push(index);
            self.parents.push(parent);
            for child in nodes[index].children() {
                queue.push_back((child.index(), flat as i32));
            }
        }
    }

    fn collect_warnings(&mut self) {
        let mut warnings = Vec::new();

        for mesh in self.document.meshes() {
            let name = mesh.name().unwrap_or("unnamed");
            let mut first_mode = None;
            for primitive in mesh.primitives() {
                if primitive.morph_targets().next().is_some() {
                    warnings.push(format!("mesh '{name}' has morph targets, which are ignored"));
                }
                let extra_uvs = primitive.attributes().any(|(semantic, _)| {
                    matches!(semantic, gltf::Semantic::TexCoords(set) if set >= MAX_UV_SETS)
                });
                if extra_uvs {
                    warnings.push(format!(
                        "mesh '{name}' has more than {MAX_UV_SETS} UV sets, extra sets are ignored"
                    ));
                }
                let mode = list_mode(primitive.mode());
                match first_mode {
                    None => first_mode = Some(mode),
                    Some(first) if first != mode => warnings.push(format!(
                        "mesh '{name}' primitive {} uses {:?} after {:?} and is skipped",
                        primitive.index(),
                        mode,
                        first
                    )),
                    Some(_) => {}
                }
            }
        }

        for animation in self.document.animations() {
            let morphs = animation
                .channels()
                .any(|c| c.target().property() == Property::MorphTargetWeights);
            if morphs {
                warnings.push(format!(
                    "animation '{}' drives morph target weights, which are ignored",
                    animation.name().unwrap_or("unnamed")
                ));
            }
        }

        warnings.dedup();
        for warning in warnings {
            self.report.warn(warning);
        }
    }

    fn node_at(&self, flat: usize) -> Option<gltf::Node<'_>> {
        self.document.nodes().nth(*self.order.get(flat)?)
    }

    fn build_group(
        &self,
        node: &gltf::Node<'_>,
        mesh: &gltf::Mesh<'_>,
    ) -> ImportResult<MeshGroup> {
        let name = mesh
            .name()
            .or(node.name())
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        let joints = match node.skin() {
            Some(skin) => skin
                .joints()
                .map(|joint| {
                    self.flat_index.get(&joint.index()).copied().ok_or_else(|| {
                        ImportReport::failed(
                            ErrorCode::SceneImportFailed,
                            format!(
                                "skin joint node {} of mesh '{name}' is not part of the scene",
                                joint.index()
                            ),
                        )
                    })
                })
                .collect::<ImportResult<Vec<u32>>>()?,
            None => Vec::new(),
        };

        let mut primitives = mesh.primitives();
        let Some(first) = primitives.next() else {
            return Err(ImportReport::failed(
                ErrorCode::SceneImportFailed,
                format!("mesh '{name}' has no primitives"),
            ));
        };
        let mode = list_mode(first.mode());
        let primitives: Vec<gltf::Primitive<'_>> = std::iter::once(first)
            .chain(primitives)
            .filter(|p| list_mode(p.mode()) == mode)
            .collect();

        let layout = GroupLayout::scan(&primitives, !joints.is_empty());

        let mut material_names: Vec<String> = Vec::new();
        let mut by_material: HashMap<String, usize> = HashMap::new();
        let mut builders: Vec<SubMeshBuilder> = Vec::new();

        for primitive in &primitives {
            let material = material_name(&primitive.material());
            let slot = match by_material.get(&material) {
                Some(&slot) => slot,
                None => {
                    let slot = builders.len();
                    by_material.insert(material.clone(), slot);
                    material_names.push(material);
                    builders.push(SubMeshBuilder::new(slot as u32));
                    slot
                }
            };
            let data = self.read_primitive(primitive, &layout, &name)?;
            builders[slot].append(&data, &layout, mode, &self.conversion);
        }

        Ok(MeshGroup {
            name,
            material_names,
            layout: layout.attributes(),
            primitive_type: mode.as_gl_enum(),
            index_element_size: INDEX_ELEMENT_SIZE,
            sub_meshes: builders.into_iter().map(SubMeshBuilder::finish).collect(),
            joints,
        })
    }

    fn read_primitive(
        &self,
        primitive: &gltf::Primitive<'_>,
        layout: &GroupLayout,
        mesh_name: &str,
    ) -> ImportResult<PrimitiveData> {
        let reader = primitive.reader(|buffer| self.buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| {
                ImportReport::failed(
                    ErrorCode::SceneImportFailed,
                    format!("mesh '{mesh_name}' primitive {} has no positions", primitive.index()),
                )
            })?
            .collect();

        let normals = reader.read_normals().map(|iter| iter.collect());
        let tangents = reader.read_tangents().map(|iter| iter.collect());
        let uvs = (0..layout.uv_sets)
            .map(|set| reader.read_tex_coords(set).map(|iter| iter.into_f32().collect()))
            .collect();
        let colors = (0..layout.color_sets)
            .map(|set| reader.read_colors(set).map(|iter| iter.into_rgba_f32().collect()))
            .collect();

        let influences = if layout.skinned {
            let mut per_vertex = vec![Vec::with_capacity(MAX_INFLUENCES); positions.len()];
            for set in 0..2 {
                let (Some(joints), Some(weights)) = (reader.read_joints(set), reader.read_weights(set))
                else {
                    continue;
                };
                for ((influences, joints), weights) in
                    per_vertex.iter_mut().zip(joints.into_u16()).zip(weights.into_f32())
                {
                    influences.extend(joints.iter().map(|&j| j as u32).zip(weights));
                }
            }
            Some(per_vertex.into_iter().map(sort_influences).collect())
        } else {
            None
        };

        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        Ok(PrimitiveData {
            indices: to_list(primitive.mode(), &indices),
            positions,
            normals,
            tangents,
            uvs,
            colors,
            influences,
        })
    }

    fn sample_animation(
        &self,
        animation: &gltf::Animation<'_>,
        fps: f64,
    ) -> ImportResult<Option<AnimationTake>> {
        let name = animation
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("take_{}", animation.index()));

        let mut tracks: HashMap<(u32, TrackKind), Track> = HashMap::new();
        for channel in animation.channels() {
            let target = channel.target();
            let Some(&node) = self.flat_index.get(&target.node().index()) else {
                continue;
            };
            let reader = channel.reader(|buffer| self.buffers.get(buffer.index()).map(|d| d.0.as_slice()));
            let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            let (kind, values) = match outputs {
                ReadOutputs::Translations(iter) => (TrackKind::Translate, Keys::Vec3(iter.collect())),
                ReadOutputs::Rotations(iter) => (TrackKind::Rotate, Keys::Quat(iter.into_f32().collect())),
                ReadOutputs::Scales(iter) => (TrackKind::Scale, Keys::Vec3(iter.collect())),
                ReadOutputs::MorphTargetWeights(_) => continue,
            };
            let interpolation = channel.sampler().interpolation();
            let values = match interpolation {
                Interpolation::CubicSpline => values.spline_values(),
                _ => values,
            };
            if times.is_empty() || values.len() != times.len() {
                tracing::warn!(
                    "Skipping animation '{}' channel with {} keys and {} values",
                    name,
                    times.len(),
                    values.len()
                );
                continue;
            }
            tracks.insert(
                (node, kind),
                Track {
                    times,
                    values,
                    step: interpolation == Interpolation::Step,
                },
            );
        }

        let start = tracks.values().filter_map(|t| t.times.first()).copied().reduce(f32::min);
        let stop = tracks.values().filter_map(|t| t.times.last()).copied().reduce(f32::max);
        let (Some(start), Some(stop)) = (start, stop) else {
            return Ok(None);
        };
        if stop < start {
            return Ok(None);
        }
        let start = f64::from(start);
        let frames = frame_count(start, f64::from(stop), fps).ok_or_else(|| {
            ImportReport::failed(
                ErrorCode::SceneImportFailed,
                format!(
                    "animation '{name}' spans {start}s to {stop}s, more than {} frames at {fps} fps",
                    u32::MAX
                ),
            )
        })?;
        if frames == 0 {
            return Ok(None);
        }

        let mut channels = Vec::new();
        for node in 0..self.order.len() as u32 {
            for kind in [TrackKind::Translate, TrackKind::Rotate, TrackKind::Scale] {
                let Some(track) = tracks.get(&(node, kind)) else {
                    continue;
                };
                let mut samples = [
                    Vec::with_capacity(frames),
                    Vec::with_capacity(frames),
                    Vec::with_capacity(frames),
                ];
                for frame in 0..frames {
                    let time = (start + frame as f64 / fps) as f32;
                    let value = match (kind, track.sample(time)) {
                        (TrackKind::Translate, Sample::Vec3(v)) => self.conversion.translation(v),
                        (TrackKind::Scale, Sample::Vec3(v)) => self.conversion.scale(v),
                        (_, Sample::Quat(q)) => self.conversion.rotation(q),
                        (TrackKind::Rotate, Sample::Vec3(_)) => continue,
                    };
                    for (axis, component) in samples.iter_mut().zip(value) {
                        axis.push(component);
                    }
                }
                for (channel, samples) in kind.channels().into_iter().zip(samples) {
                    channels.push(AnimationChannel {
                        node,
                        channel,
                        samples,
                    });
                }
            }
        }

        Ok(Some(AnimationTake { name, channels }))
    }
}

impl Drop for GltfScene {
    fn drop(&mut self) {
        tracing::debug!("Released glTF scene {:?}", self.path);
    }
}

impl ImportedScene for GltfScene {
    fn report(&self) -> &ImportReport {
        &self.report
    }

    fn extract_nodes(&self) -> ImportResult<Vec<RawNode>> {
        let mut mesh_groups = 0;
        let mut nodes = Vec::with_capacity(self.order.len());
        for (flat, &parent) in self.parents.iter().enumerate() {
            let Some(node) = self.node_at(flat) else {
                continue;
            };
            let (translate, rotate, scale) = node.transform().decomposed();
            let mesh_group = if node.mesh().is_some() {
                mesh_groups += 1;
                mesh_groups - 1
            } else {
                -1
            };
            nodes.push(RawNode {
                name: node
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("node_{}", node.index())),
                translate: self.conversion.translation(translate),
                rotate: self.conversion.rotation(rotate),
                scale: self.conversion.scale(scale),
                rotate_order: RotateOrder::Xyz,
                parent,
                mesh_group,
            });
        }
        Ok(nodes)
    }

    fn extract_takes(&self, bake_fps: f64) -> ImportResult<Vec<AnimationTake>> {
        let mut takes = Vec::new();
        for animation in self.document.animations() {
            match self.sample_animation(&animation, bake_fps)? {
                Some(take) => takes.push(take),
                None => tracing::debug!(
                    "Skipping animation {} of {:?}: no frames",
                    animation.index(),
                    self.path
                ),
            }
        }
        Ok(takes)
    }

    fn extract_mesh_groups(&self) -> ImportResult<Vec<MeshGroup>> {
        let mut groups = Vec::new();
        for flat in 0..self.order.len() {
            let Some(node) = self.node_at(flat) else {
                continue;
            };
            if let Some(mesh) = node.mesh() {
                groups.push(self.build_group(&node, &mesh)?);
            }
        }
        Ok(groups)
    }
}

fn material_name(material: &gltf::Material<'_>) -> String {
    match (material.index(), material.name()) {
        (_, Some(name)) => name.to_string(),
        (Some(index), None) => format!("material_{index}"),
        (None, None) => "default".to_string(),
    }
}

/// Frames needed to cover `start..=stop`, or `None` when the count does not
/// fit the u32 sample count of a channel.
fn frame_count(start: f64, stop: f64, fps: f64) -> Option<usize> {
    let frames = ((stop - start) * fps).ceil();
    if !frames.is_finite() || frames < 0.0 || frames > f64::from(u32::MAX) {
        return None;
    }
    usize::try_from(frames as u32).ok()
}

/// Mode after strips, fans and loops are expanded to lists.
fn list_mode(mode: Mode) -> Mode {
    match mode {
        Mode::Triangles | Mode::TriangleStrip | Mode::TriangleFan => Mode::Triangles,
        Mode::Lines | Mode::LineStrip | Mode::LineLoop => Mode::Lines,
        Mode::Points => Mode::Points,
    }
}

fn to_list(mode: Mode, indices: &[u32]) -> Vec<u32> {
    let n = indices.len();
    match mode {
        Mode::Triangles | Mode::Lines | Mode::Points => indices.to_vec(),
        Mode::TriangleStrip => (0..n.saturating_sub(2))
            .flat_map(|i| {
                if i % 2 == 0 {
                    [indices[i], indices[i + 1], indices[i + 2]]
                } else {
                    [indices[i + 1], indices[i], indices[i + 2]]
                }
            })
            .collect(),
        Mode::TriangleFan => (1..n.saturating_sub(1))
            .flat_map(|i| [indices[0], indices[i], indices[i + 1]])
            .collect(),
        Mode::LineStrip => indices.windows(2).flatten().copied().collect(),
        Mode::LineLoop => {
            let mut lines: Vec<u32> = indices.windows(2).flatten().copied().collect();
            if n > 2 {
                lines.extend([indices[n - 1], indices[0]]);
            }
            lines
        }
    }
}

/// Strongest influences first, zero weights dropped, padded to eight.
fn sort_influences(mut influences: Vec<(u32, f32)>) -> [(u32, f32); MAX_INFLUENCES] {
    influences.retain(|&(_, weight)| weight > 0.0);
    influences.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut out = [(0, 0.0); MAX_INFLUENCES];
    for (slot, influence) in out.iter_mut().zip(influences) {
        *slot = influence;
    }
    out
}

/// Attribute union over every primitive of a group.
struct GroupLayout {
    skinned: bool,
    normals: bool,
    tangents: bool,
    uv_sets: u32,
    color_sets: u32,
}

impl GroupLayout {
    fn scan(primitives: &[gltf::Primitive<'_>], has_skin: bool) -> Self {
        let mut layout = Self {
            skinned: false,
            normals: false,
            tangents: false,
            uv_sets: 0,
            color_sets: 0,
        };
        for primitive in primitives {
            for (semantic, _) in primitive.attributes() {
                match semantic {
                    gltf::Semantic::Normals => layout.normals = true,
                    gltf::Semantic::Tangents => layout.tangents = true,
                    gltf::Semantic::TexCoords(set) if set < MAX_UV_SETS => {
                        layout.uv_sets = layout.uv_sets.max(set + 1)
                    }
                    gltf::Semantic::Colors(set) => layout.color_sets = layout.color_sets.max(set + 1),
                    gltf::Semantic::Joints(_) if has_skin => layout.skinned = true,
                    _ => {}
                }
            }
        }
        layout
    }

    fn bitangents(&self) -> bool {
        self.normals && self.tangents
    }

    fn attributes(&self) -> Vec<VertexAttribute> {
        let float = |semantic, n| VertexAttribute::new(semantic, n, ElementType::Float);
        let mut layout = vec![float(Semantic::POSITION, NumElements::Vec3)];
        if self.skinned {
            for semantic in [Semantic::SKIN_INDICES_0, Semantic::SKIN_INDICES_1] {
                layout.push(VertexAttribute::new(semantic, NumElements::Vec4, ElementType::UInt32));
            }
            for semantic in [Semantic::SKIN_WEIGHTS_0, Semantic::SKIN_WEIGHTS_1] {
                layout.push(float(semantic, NumElements::Vec4));
            }
        }
        if self.normals {
            layout.push(float(Semantic::NORMAL, NumElements::Vec3));
        }
        if self.tangents {
            layout.push(float(Semantic::TANGENT, NumElements::Vec3));
        }
        if self.bitangents() {
            layout.push(float(Semantic::BITANGENT, NumElements::Vec3));
        }
        layout.extend(
            (0..self.uv_sets)
                .filter_map(|set| Semantic::uv(set as u8))
                .map(|semantic| float(semantic, NumElements::Vec2)),
        );
        layout.extend(
            (0..self.color_sets)
                .filter_map(|set| u8::try_from(set).ok().and_then(Semantic::color))
                .map(|semantic| float(semantic, NumElements::Vec4)),
        );
        layout
    }
}

struct PrimitiveData {
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    tangents: Option<Vec<[f32; 4]>>,
    uvs: Vec<Option<Vec<[f32; 2]>>>,
    colors: Vec<Option<Vec<[f32; 4]>>>,
    influences: Option<Vec<[(u32, f32); MAX_INFLUENCES]>>,
    /// Already expanded to list topology
    indices: Vec<u32>,
}

fn attribute<T: Copy + Default>(values: &Option<Vec<T>>, vertex: usize) -> T {
    values
        .as_ref()
        .and_then(|v| v.get(vertex))
        .copied()
        .unwrap_or_default()
}

/// Accumulates every primitive of one material into a single sub-mesh.
struct SubMeshBuilder {
    material: u32,
    vertex_count: u32,
    vertex_data: Vec<u8>,
    indices: Vec<u32>,
}

impl SubMeshBuilder {
    fn new(material: u32) -> Self {
        Self {
            material,
            vertex_count: 0,
            vertex_data: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn append(
        &mut self,
        data: &PrimitiveData,
        layout: &GroupLayout,
        mode: Mode,
        conversion: &AxisConversion,
    ) {
        let bytes = &mut self.vertex_data;
        for vertex in 0..data.positions.len() {
            let position = conversion.position(data.positions[vertex]);
            bytes.extend_from_slice(bytemuck::cast_slice(&position));

            if layout.skinned {
                let influences = data
                    .influences
                    .as_ref()
                    .and_then(|all| all.get(vertex))
                    .copied()
                    .unwrap_or([(0, 0.0); MAX_INFLUENCES]);
                let joints: [u32; MAX_INFLUENCES] = influences.map(|(joint, _)| joint);
                let weights: [f32; MAX_INFLUENCES] = influences.map(|(_, weight)| weight);
                bytes.extend_from_slice(bytemuck::cast_slice(&joints));
                bytes.extend_from_slice(bytemuck::cast_slice(&weights));
            }

            let normal: [f32; 3] = attribute(&data.normals, vertex);
            let tangent: [f32; 4] = attribute(&data.tangents, vertex);
            if layout.normals {
                bytes.extend_from_slice(bytemuck::cast_slice(&conversion.direction(normal)));
            }
            if layout.tangents {
                let xyz = [tangent[0], tangent[1], tangent[2]];
                bytes.extend_from_slice(bytemuck::cast_slice(&conversion.direction(xyz)));
            }
            if layout.bitangents() {
                let bitangent = Vec3::from(normal).cross(Vec3::from([tangent[0], tangent[1], tangent[2]]))
                    * tangent[3];
                bytes.extend_from_slice(bytemuck::cast_slice(
                    &conversion.direction(bitangent.to_array()),
                ));
            }

            for uvs in &data.uvs {
                let uv: [f32; 2] = attribute(uvs, vertex);
                bytes.extend_from_slice(bytemuck::cast_slice(&uv));
            }
            for colors in &data.colors {
                let color: [f32; 4] = attribute(colors, vertex);
                bytes.extend_from_slice(bytemuck::cast_slice(&color));
            }
        }

        let base = self.vertex_count;
        let flip = mode == Mode::Triangles && conversion.flips_winding();
        if flip {
            for triangle in data.indices.chunks_exact(3) {
                self.indices
                    .extend([triangle[0] + base, triangle[2] + base, triangle[1] + base]);
            }
        } else {
            self.indices.extend(data.indices.iter().map(|&i| i + base));
        }
        self.vertex_count += data.positions.len() as u32;
    }

    fn finish(self) -> SubMesh {
        SubMesh {
            material: self.material,
            vertex_data: self.vertex_data,
            index_data: bytemuck::cast_slice(&self.indices).to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TrackKind {
    Translate,
    Rotate,
    Scale,
}

impl TrackKind {
    fn channels(self) -> [ChannelId; 3] {
        match self {
            Self::Translate => ChannelId::TRANSLATE,
            Self::Rotate => ChannelId::ROTATE,
            Self::Scale => ChannelId::SCALE,
        }
    }
}

enum Keys {
    Vec3(Vec<[f32; 3]>),
    Quat(Vec<[f32; 4]>),
}

impl Keys {
    fn len(&self) -> usize {
        match self {
            Self::Vec3(v) => v.len(),
            Self::Quat(v) => v.len(),
        }
    }

    /// Cubic spline outputs are (in-tangent, value, out-tangent) triples.
    fn spline_values(self) -> Self {
        fn middle<T: Copy>(values: Vec<T>) -> Vec<T> {
            values.chunks_exact(3).map(|c| c[1]).collect()
        }
        match self {
            Self::Vec3(v) => Self::Vec3(middle(v)),
            Self::Quat(v) => Self::Quat(middle(v)),
        }
    }
}

enum Sample {
    Vec3([f32; 3]),
    Quat([f32; 4]),
}

struct Track {
    times: Vec<f32>,
    values: Keys,
    step: bool,
}

impl Track {
    fn sample(&self, time: f32) -> Sample {
        let last = self.times.len() - 1;
        let next = self.times.partition_point(|&t| t <= time);
        let (a, b, factor) = if next == 0 {
            (0, 0, 0.0)
        } else if next > last {
            (last, last, 0.0)
        } else {
            let (t0, t1) = (self.times[next - 1], self.times[next]);
            let factor = if t1 > t0 { (time - t0) / (t1 - t0) } else { 0.0 };
            (next - 1, next, if self.step { 0.0 } else { factor })
        };

        match &self.values {
            Keys::Vec3(v) => Sample::Vec3(Vec3::from(v[a]).lerp(Vec3::from(v[b]), factor).to_array()),
            Keys::Quat(v) => Sample::Quat(
                Quat::from_array(v[a])
                    .normalize()
                    .slerp(Quat::from_array(v[b]).normalize(), factor)
                    .to_array(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_and_fan_triangulation() {
        assert_eq!(to_list(Mode::TriangleStrip, &[0, 1, 2, 3]), vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(to_list(Mode::TriangleFan, &[0, 1, 2, 3]), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(to_list(Mode::LineLoop, &[0, 1, 2]), vec![0, 1, 1, 2, 2, 0]);
        assert!(to_list(Mode::TriangleStrip, &[0, 1]).is_empty());
    }

    #[test]
    fn test_influences_sorted_and_padded() {
        let sorted = sort_influences(vec![(4, 0.25), (7, 0.0), (2, 0.75)]);
        assert_eq!(sorted[0], (2, 0.75));
        assert_eq!(sorted[1], (4, 0.25));
        assert_eq!(sorted[2], (0, 0.0));
    }

    #[test]
    fn test_frame_count_bounds() {
        assert_eq!(frame_count(0.0, 0.5, 60.0), Some(30));
        assert_eq!(frame_count(1.0, 1.0, 60.0), Some(0));
        assert_eq!(frame_count(0.0, 1.0e20, 60.0), None);
        assert_eq!(frame_count(0.0, f64::INFINITY, 60.0), None);
    }

    #[test]
    fn test_track_sampling() {
        let track = Track {
            times: vec![0.0, 1.0],
            values: Keys::Vec3(vec![[0.0, 0.0, 0.0], [2.0, 4.0, 6.0]]),
            step: false,
        };
        let Sample::Vec3(mid) = track.sample(0.5) else {
            panic!("expected vec3");
        };
        assert_eq!(mid, [1.0, 2.0, 3.0]);
        let Sample::Vec3(after) = track.sample(3.0) else {
            panic!("expected vec3");
        };
        assert_eq!(after, [2.0, 4.0, 6.0]);

        let step = Track { step: true, ..track };
        let Sample::Vec3(held) = step.sample(0.9) else {
            panic!("expected vec3");
        };
        assert_eq!(held, [0.0, 0.0, 0.0]);
    }
}
