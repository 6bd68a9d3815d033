//! Import and export options
//!
//! The same enums back the CLI flags, the batch manifest and the library
//! API, so they derive both `clap::ValueEnum` and `serde::Deserialize`.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;

/// World up axis of the converted scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UpAxis {
    X,
    #[default]
    Y,
    Z,
}

impl UpAxis {
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Which remaining axis becomes the front axis once the up axis is chosen.
///
/// Parity-even picks the first of the two remaining axes in X, Y, Z order,
/// parity-odd the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FrontAxis {
    #[default]
    ParityEven,
    ParityOdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    Left,
    Right,
}

/// Linear unit of the converted scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Mm,
    Dm,
    Cm,
    #[default]
    M,
    Km,
    Inch,
    Foot,
    Mile,
    Yard,
}

impl Unit {
    /// Length of one unit in meters
    pub fn meters(self) -> f64 {
        match self {
            Self::Mm => 0.001,
            Self::Dm => 0.1,
            Self::Cm => 0.01,
            Self::M => 1.0,
            Self::Km => 1000.0,
            Self::Inch => 0.0254,
            Self::Foot => 0.3048,
            Self::Mile => 1609.344,
            Self::Yard => 0.9144,
        }
    }

    /// Factor converting a length in meters into this unit
    pub fn per_meter(self) -> f64 {
        1.0 / self.meters()
    }
}

/// Target coordinate system handed to the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ImportSettings {
    pub up_axis: UpAxis,
    pub front_axis: FrontAxis,
    pub handedness: Handedness,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub import: ImportSettings,
    /// Directory that `.scene` model paths are made relative to
    pub app_root: PathBuf,
}

impl ExportSettings {
    pub fn new(import: ImportSettings, app_root: impl Into<PathBuf>) -> Self {
        Self {
            import,
            app_root: app_root.into(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            import: ImportSettings::default(),
            app_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
