//! Manifest parsing and batch conversion
//!
//! Parses bake.toml and converts every listed scene:
//!
//! ```toml
//! [output]
//! app-root = "game"
//!
//! [defaults]
//! up-axis = "z"
//! unit = "cm"
//!
//! [[scenes]]
//! path = "models/hero.gltf"
//!
//! [[scenes]]
//! path = "models/level.glb"
//! handedness = "right"
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hashbrown::HashSet;
use scenebake_shared::{MAX_MANIFEST_BYTES, SOURCE_EXTENSIONS, read_file_with_limit};
use serde::Deserialize;

use crate::convert::{ConversionSummary, OutputPaths, convert_gltf};
use crate::settings::{ExportSettings, FrontAxis, Handedness, ImportSettings, Unit, UpAxis};

/// Root manifest structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub defaults: ImportSettings,
    #[serde(default)]
    pub scenes: Vec<SceneEntry>,
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Defaults to the manifest's directory
    #[serde(default)]
    pub app_root: Option<PathBuf>,
}

/// One source scene plus optional per-scene overrides.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SceneEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub up_axis: Option<UpAxis>,
    #[serde(default)]
    pub front_axis: Option<FrontAxis>,
    #[serde(default)]
    pub handedness: Option<Handedness>,
    #[serde(default)]
    pub unit: Option<Unit>,
}

impl SceneEntry {
    pub fn settings(&self, defaults: &ImportSettings) -> ImportSettings {
        ImportSettings {
            up_axis: self.up_axis.unwrap_or(defaults.up_axis),
            front_axis: self.front_axis.unwrap_or(defaults.front_axis),
            handedness: self.handedness.unwrap_or(defaults.handedness),
            unit: self.unit.unwrap_or(defaults.unit),
        }
    }
}

impl Manifest {
    pub fn from_toml(content: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(content)?;
        manifest.base_dir = base_dir.into();
        Ok(manifest)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn app_root(&self) -> PathBuf {
        match &self.output.app_root {
            Some(root) => self.resolve(root),
            None => self.base_dir.clone(),
        }
    }

    pub fn export_settings(&self, entry: &SceneEntry, app_root: &Path) -> ExportSettings {
        ExportSettings::new(entry.settings(&self.defaults), app_root)
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let bytes = read_file_with_limit(path, MAX_MANIFEST_BYTES)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let content = String::from_utf8(bytes)
        .with_context(|| format!("Manifest is not valid UTF-8: {:?}", path))?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Manifest::from_toml(&content, base_dir)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.scenes.is_empty() {
        tracing::warn!("Manifest lists no scenes");
    }

    let mut outputs = HashSet::new();
    for entry in &manifest.scenes {
        let source = manifest.resolve(&entry.path);
        if !source.exists() {
            anyhow::bail!("Scene source not found: {:?}", source);
        }

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        if !SOURCE_EXTENSIONS.contains(&ext.as_str()) {
            anyhow::bail!("Unsupported scene format: {:?} (use .gltf or .glb)", source);
        }

        let scene_out = OutputPaths::for_input(&source).scene;
        if !outputs.insert(scene_out.clone()) {
            anyhow::bail!(
                "Scene {:?} writes to {:?}, which another entry already produces",
                source,
                scene_out
            );
        }
    }
    Ok(())
}

/// Convert every scene in the manifest, stopping at the first failure.
pub fn build_all(
    manifest: &Manifest,
    app_root_override: Option<&Path>,
) -> Result<Vec<ConversionSummary>> {
    validate(manifest)?;

    let app_root = app_root_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest.app_root());

    let mut summaries = Vec::with_capacity(manifest.scenes.len());
    for entry in &manifest.scenes {
        let source = manifest.resolve(&entry.path);
        tracing::info!("Converting scene: {:?}", source);
        let settings = manifest.export_settings(entry, &app_root);
        let summary = convert_gltf(&source, &settings)
            .with_context(|| format!("Failed to convert scene {:?}", source))?;
        summaries.push(summary);
    }
    Ok(summaries)
}
