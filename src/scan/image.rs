use anyhow::{Context, Result};
use image::imageops::FilterType;
use kmeans_colors::get_kmeans_hamerly;
use palette::{IntoColor, Lab, Srgb};

use crate::color::Color;
use crate::pipeline::aggregate::{ColorSample, SampleSource};

/// A color cluster extracted from an image with its pixel share.
#[derive(Debug, Clone)]
pub struct ExtractedColor {
    pub color: Color,
    pub weight: f32,
}

const MAX_DIM: u32 = 256;
const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const SEED: u64 = 42;

/// Total sample weight one image contributes, split across its clusters.
pub const IMAGE_WEIGHT: f32 = 10.0;

/// Decode an in-memory image, resize to fit within 256x256 (preserving aspect
/// ratio), and convert all pixels to CIELAB space.
pub fn load_pixels(bytes: &[u8]) -> Result<Vec<Lab>> {
    let img = image::load_from_memory(bytes).context(
        "unsupported or corrupt image. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
    )?;

    let img = if img.width() > MAX_DIM || img.height() > MAX_DIM {
        img.resize(MAX_DIM, MAX_DIM, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb_img = img.to_rgb8();

    let pixels: Vec<Lab> = rgb_img
        .pixels()
        .map(|p| {
            let srgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
            srgb.into_color()
        })
        .collect();

    Ok(pixels)
}

/// Run K-means on LAB pixels to extract dominant colors.
///
/// Returns colors sorted by weight (descending), weights summing to 1.
/// Uses Hamerly's algorithm with K-means++ initialization and a fixed seed.
pub fn extract_colors(pixels: &[Lab], k: usize) -> Vec<ExtractedColor> {
    let k = k.min(pixels.len());
    if k == 0 {
        return Vec::new();
    }

    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, SEED);
    let total = pixels.len() as f32;

    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut colors: Vec<ExtractedColor> = result
        .centroids
        .iter()
        .enumerate()
        .filter(|(i, _)| counts[*i] > 0)
        .map(|(i, lab)| ExtractedColor {
            color: Color::from_lab(*lab),
            weight: counts[i] as f32 / total,
        })
        .collect();

    colors.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.color.cmp(&b.color))
    });
    colors
}

/// Decode an image and turn its clusters into samples: the largest cluster is
/// `ImageDominant`, the rest `ImageSecondary`.
pub fn scan_image(bytes: &[u8], k: usize) -> Result<Vec<ColorSample>> {
    let pixels = load_pixels(bytes)?;
    let samples = extract_colors(&pixels, k)
        .into_iter()
        .enumerate()
        .map(|(i, extracted)| {
            let source = if i == 0 {
                SampleSource::ImageDominant
            } else {
                SampleSource::ImageSecondary
            };
            ColorSample::new(extracted.color, extracted.weight * IMAGE_WEIGHT, source)
        })
        .collect();
    Ok(samples)
}
