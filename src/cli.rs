// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! Thin presentation layer over the core components: every handler wires up
//! the registry, pipeline, and gallery store, runs one flow, and prints the
//! result. No handler owns state or persistence logic of its own.

use std::path::PathBuf;
use webcam_gallery::backends::camera::DeviceRegistry;
use webcam_gallery::config::{CaptureSettings, FilterType, Resolution, SettingsUpdate};
use webcam_gallery::constants::{default_export_dir, default_gallery_path, default_settings_path};
use webcam_gallery::errors::{AppError, AppResult, CameraError};
use webcam_gallery::export;
use webcam_gallery::gallery::GalleryStore;
use webcam_gallery::pipelines::photo::{CaptureOutcome, CapturePipeline};

/// List all available cameras
pub fn list_cameras() -> AppResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let mut registry = DeviceRegistry::new(CaptureSettings::load(&default_settings_path()));
    rt.block_on(registry.refresh())?;

    if registry.devices().is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    let selected = registry.settings().selected_device_id.clone();
    println!("Available cameras:");
    for (index, device) in registry.devices().iter().enumerate() {
        let marker = if selected.as_deref() == Some(device.device_id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "  [{}]{} {} ({})",
            index, marker, device.label, device.device_id
        );
    }

    Ok(())
}

/// Capture a photo and save it to the gallery
pub fn capture_photo(
    name: Option<String>,
    device: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    grayscale: bool,
    quality: Option<u32>,
) -> AppResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let mut registry = DeviceRegistry::new(CaptureSettings::load(&default_settings_path()));

    // One-shot overrides; these are not written back to the settings file
    let mut update = SettingsUpdate {
        selected_device_id: device,
        quality_percent: quality,
        ..Default::default()
    };
    if let (Some(width), Some(height)) = (width, height) {
        update.resolution = Some(Resolution::new(width, height));
    }
    if grayscale {
        update.filter = Some(FilterType::Grayscale);
    }
    registry.update_settings(update);

    rt.block_on(registry.refresh())?;

    let Some(camera) = registry.selected_device() else {
        return Err(CameraError::NoCameraFound.into());
    };
    println!("Using camera: {}", camera.label);

    let mut store = GalleryStore::load(default_gallery_path());
    let mut pipeline = CapturePipeline::new();

    rt.block_on(pipeline.start_stream(registry.settings()))?;
    println!("Capturing...");

    let outcome = rt.block_on(pipeline.capture(
        name.as_deref().unwrap_or(""),
        registry.settings(),
        &mut store,
    ));
    pipeline.stop_stream();

    match outcome? {
        CaptureOutcome::Saved { name, .. } => {
            println!("Saved image '{}'", name);
            Ok(())
        }
        CaptureOutcome::NameConflict => {
            pipeline.discard();
            Err(AppError::from("An image with this name already exists"))
        }
    }
}

/// List saved images, most recent first
pub fn gallery_list(recent: Option<usize>) -> AppResult<()> {
    let store = GalleryStore::load(default_gallery_path());

    let images = match recent {
        Some(n) => store.recent(n),
        None => store.images(),
    };

    if images.is_empty() {
        println!("No images saved.");
        return Ok(());
    }

    for image in images {
        println!("  {}  {}  {}", image.id, image.timestamp, image.name);
    }

    Ok(())
}

/// Export a saved image to a directory as a file
pub fn gallery_export(target: String, output: Option<PathBuf>) -> AppResult<()> {
    let store = GalleryStore::load(default_gallery_path());

    let record = store
        .get(&target)
        .or_else(|| store.find_by_name(&target))
        .ok_or_else(|| AppError::Other(format!("No image matching '{}'", target)))?;

    let dir = output.unwrap_or_else(default_export_dir);
    let path = export::export_image(record, &dir)?;
    println!("Exported: {}", path.display());

    Ok(())
}

/// Delete a saved image by id
pub fn gallery_delete(id: String) -> AppResult<()> {
    let mut store = GalleryStore::load(default_gallery_path());

    let Some(record) = store.get(&id) else {
        return Err(AppError::Other(format!("No image with id '{}'", id)));
    };

    println!("Deleting '{}'", record.name);
    store.remove(&id);

    Ok(())
}

/// Print the persisted capture settings
pub fn settings_show() -> AppResult<()> {
    print_settings(&CaptureSettings::load(&default_settings_path()));
    Ok(())
}

/// Update and persist capture settings
pub fn settings_set(
    device: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    filter: Option<FilterType>,
    quality: Option<u32>,
) -> AppResult<()> {
    let path = default_settings_path();
    let mut settings = CaptureSettings::load(&path);

    let mut update = SettingsUpdate {
        selected_device_id: device,
        filter,
        quality_percent: quality,
        ..Default::default()
    };
    if let (Some(width), Some(height)) = (width, height) {
        update.resolution = Some(Resolution::new(width, height));
    }

    settings.apply(update);
    settings.save(&path)?;

    print_settings(&settings);
    Ok(())
}

fn print_settings(settings: &CaptureSettings) {
    println!("Resolution: {}", settings.resolution);
    println!("Filter:     {}", settings.filter);
    println!("Quality:    {}%", settings.quality_percent);
    println!(
        "Camera:     {}",
        settings.selected_device_id.as_deref().unwrap_or("(auto)")
    );
}
