//! bake-export - scene bake tool
//!
//! Converts a glTF/GLB scene into a `.scene` hierarchy document, a `.anim`
//! file of baked channels and a `.mesh` file of merged sub-meshes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use modules from library
use bake_export::settings::{FrontAxis, Handedness, ImportSettings, Unit, UpAxis};
use bake_export::{ExportSettings, convert_gltf, inspect, manifest};

#[derive(Parser)]
#[command(name = "bake-export")]
#[command(about = "Scene bake tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one scene, writing .scene, .anim and .mesh next to it
    Convert {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Up axis of the converted scene
        #[arg(long, value_enum, default_value_t)]
        up_axis: UpAxis,

        /// Front axis parity relative to the up axis
        #[arg(long, value_enum, default_value_t)]
        front_axis: FrontAxis,

        #[arg(long, value_enum, default_value_t)]
        handedness: Handedness,

        /// Linear unit of the converted scene
        #[arg(long, value_enum, default_value_t)]
        unit: Unit,

        /// Directory model paths are made relative to (default: current directory)
        #[arg(long)]
        app_root: Option<PathBuf>,
    },

    /// Convert every scene listed in a manifest file
    Build {
        /// Path to bake.toml manifest
        #[arg(default_value = "bake.toml")]
        manifest: PathBuf,

        /// Application root (overrides manifest)
        #[arg(long)]
        app_root: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to bake.toml manifest
        #[arg(default_value = "bake.toml")]
        manifest: PathBuf,
    },

    /// Print a summary of a baked .scene, .anim or .mesh file
    Inspect {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Convert {
            input,
            up_axis,
            front_axis,
            handedness,
            unit,
            app_root,
        } => {
            let import = ImportSettings {
                up_axis,
                front_axis,
                handedness,
                unit,
            };
            let settings = match app_root {
                Some(root) => ExportSettings::new(import, root),
                None => ExportSettings {
                    import,
                    ..ExportSettings::default()
                },
            };
            tracing::info!("Converting {:?}", input);
            convert_gltf(&input, &settings)
                .with_context(|| format!("Failed to convert {:?}", input))?;
            tracing::info!("Done!");
        }

        Commands::Build { manifest, app_root } => {
            tracing::info!("Building scenes from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let summaries = manifest::build_all(&config, app_root.as_deref())?;
            tracing::info!("Build complete! {} scenes converted", summaries.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Inspect { file } => {
            inspect::inspect_file(&file)?;
        }
    }

    Ok(())
}
