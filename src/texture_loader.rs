use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use raylib::prelude::*;
use exif::{Reader, Tag, Value, In};
use crate::error::{Error, Result};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

// --- Helper: Load and Sort Image Paths ---
// An empty directory is not an error: the crossfade simply has nothing to show.
pub fn load_sorted_image_paths(dir_path: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir_path).map_err(|source| Error::ReadDir {
        path: dir_path.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::ReadDir {
            path: dir_path.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Shuffles the image order once, reproducibly when a seed is given.
pub fn shuffle_paths(paths: &mut [PathBuf], seed: Option<u64>) {
    match seed {
        Some(seed) => paths.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => paths.shuffle(&mut rand::rng()),
    }
}

/// Quarter turns needed to show an image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Half,
    Clockwise,
    CounterClockwise,
}

// 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW; flips are ignored
pub fn rotation_for(orientation: u16) -> Rotation {
    match orientation {
        3 => Rotation::Half,
        6 => Rotation::Clockwise,
        8 => Rotation::CounterClockwise,
        _ => Rotation::None,
    }
}

/// EXIF orientation of a JPEG, 1 (upright) when absent or unreadable.
pub fn exif_orientation(image_path: &Path, file_bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY) {
            Some(field) => match &field.value {
                Value::Short(values) if !values.is_empty() => values[0],
                _ => 1,
            },
            None => 1,
        },
        Err(e) => {
            tracing::warn!(path = %image_path.display(), error = %e, "could not read EXIF data");
            1
        }
    }
}

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path).map_err(|source| Error::ReadFile {
        path: image_path.to_path_buf(),
        source,
    })?;

    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    // Only JPEG carries EXIF reliably
    let orientation = if extension == "jpg" || extension == "jpeg" {
        exif_orientation(image_path, &file_bytes)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&format!(".{}", extension), &file_bytes)
        .map_err(|e| Error::Decode {
            path: image_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let rotation = rotation_for(orientation);
    match rotation {
        Rotation::Half => {
            image.rotate_cw();
            image.rotate_cw();
        }
        Rotation::Clockwise => image.rotate_cw(),
        Rotation::CounterClockwise => image.rotate_ccw(),
        Rotation::None => {}
    }
    if rotation != Rotation::None {
        tracing::debug!(path = %image_path.display(), orientation, ?rotation, "applied EXIF rotation");
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| Error::Texture {
            path: image_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(texture)
}
