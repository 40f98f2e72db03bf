// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use webcam_gallery::config::FilterType;
use webcam_gallery::errors::AppResult;

mod cli;

#[derive(Parser)]
#[command(name = "webcam-gallery")]
#[command(about = "Webcam capture and gallery")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Capture a photo and save it to the gallery
    Capture {
        /// Image name; auto-generated from the timestamp when omitted
        #[arg(short, long)]
        name: Option<String>,

        /// Camera device path (from 'webcam-gallery list')
        #[arg(short, long)]
        device: Option<String>,

        /// Capture width in pixels
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Capture height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Apply the grayscale filter
        #[arg(short, long)]
        grayscale: bool,

        /// JPEG quality in percent (10-100, steps of 10)
        #[arg(short, long)]
        quality: Option<u32>,
    },

    /// Browse, export, or delete saved images
    #[command(subcommand)]
    Gallery(GalleryCommands),

    /// Show or change capture settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand)]
enum GalleryCommands {
    /// List saved images, most recent first
    List {
        /// Only show the N most recent images
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Export a saved image by id or name
    Export {
        /// Record id or image name
        target: String,

        /// Output directory (default: downloads directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a saved image by id
    Delete {
        /// Record id
        id: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the current settings
    Show,

    /// Update one or more settings
    Set {
        /// Camera device path
        #[arg(short, long)]
        device: Option<String>,

        /// Capture width in pixels
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Capture height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Capture filter (none, grayscale)
        #[arg(short, long)]
        filter: Option<FilterType>,

        /// JPEG quality in percent (10-100, steps of 10)
        #[arg(short, long)]
        quality: Option<u32>,
    },
}

fn main() -> AppResult<()> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=webcam_gallery=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => cli::list_cameras(),
        Commands::Capture {
            name,
            device,
            width,
            height,
            grayscale,
            quality,
        } => cli::capture_photo(name, device, width, height, grayscale, quality),
        Commands::Gallery(GalleryCommands::List { recent }) => cli::gallery_list(recent),
        Commands::Gallery(GalleryCommands::Export { target, output }) => {
            cli::gallery_export(target, output)
        }
        Commands::Gallery(GalleryCommands::Delete { id }) => cli::gallery_delete(id),
        Commands::Settings(SettingsCommands::Show) => cli::settings_show(),
        Commands::Settings(SettingsCommands::Set {
            device,
            width,
            height,
            filter,
            quality,
        }) => cli::settings_set(device, width, height, filter, quality),
    }
}
