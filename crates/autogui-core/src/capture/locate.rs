//! Finding a needle image on a captured screen
//!
//! Two search strategies exist. Exact search compares RGB values pixel by
//! pixel and returns the first hit in row-major order. Confidence search
//! (cargo feature `image-matching`) runs normalised cross-correlation over
//! grayscale images and accepts the best location when its score reaches the
//! requested confidence.

use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::{
    capture::ImageBuffer,
    error::{AutomationError, AutomationResult},
    model::{Point, Region},
};

/// Loads the image to search for
///
/// # Errors
///
/// Returns [`AutomationError::ImageLoadFailed`] if the file cannot be read or
/// decoded, or if it has no pixels.
pub fn load_needle(path: &Path) -> AutomationResult<ImageBuffer> {
    let failed = |reason: String| AutomationError::ImageLoadFailed {
        path: path.display().to_string(),
        reason,
    };

    let image = image::open(path).map_err(|e| failed(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(failed("image has no pixels".to_string()));
    }
    Ok(ImageBuffer::new(image))
}

/// Validates a confidence threshold
pub fn check_confidence(confidence: f64) -> AutomationResult<f64> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(AutomationError::invalid_parameter(
            "confidence",
            format!("must be between 0.0 and 1.0, got {}", confidence),
        ));
    }
    Ok(confidence)
}

/// Searches `haystack` for `needle`
///
/// `origin` is the screen position of the haystack's top-left pixel; the
/// returned region is in absolute screen coordinates. With `confidence` set
/// the fuzzy matcher is used, otherwise the search is exact.
pub fn locate(
    haystack: &ImageBuffer,
    needle: &ImageBuffer,
    origin: Point,
    confidence: Option<f64>,
) -> Option<Region> {
    let (nw, nh) = needle.dimensions();
    let (hw, hh) = haystack.dimensions();
    if nw == 0 || nh == 0 || nw > hw || nh > hh {
        return None;
    }

    let found = match confidence {
        #[cfg(feature = "image-matching")]
        Some(threshold) => locate_fuzzy(haystack, needle, threshold),
        #[cfg(not(feature = "image-matching"))]
        Some(_) => locate_exact(&haystack.to_rgba8(), &needle.to_rgba8()),
        None => locate_exact(&haystack.to_rgba8(), &needle.to_rgba8()),
    };

    found.map(|(x, y)| {
        let region = Region::new(origin.x + x as i32, origin.y + y as i32, nw, nh);
        debug!("Needle {}x{} found at {:?}", nw, nh, region);
        region
    })
}

fn locate_exact(haystack: &RgbaImage, needle: &RgbaImage) -> Option<(u32, u32)> {
    let (hw, hh) = haystack.dimensions();
    let (nw, nh) = needle.dimensions();

    let same = |a: &image::Rgba<u8>, b: &image::Rgba<u8>| a.0[..3] == b.0[..3];
    let first = needle.get_pixel(0, 0);

    for y in 0..=(hh - nh) {
        for x in 0..=(hw - nw) {
            if !same(haystack.get_pixel(x, y), first) {
                continue;
            }
            let hit = (0..nh).all(|ny| {
                (0..nw).all(|nx| same(haystack.get_pixel(x + nx, y + ny), needle.get_pixel(nx, ny)))
            });
            if hit {
                return Some((x, y));
            }
        }
    }
    None
}

#[cfg(feature = "image-matching")]
fn locate_fuzzy(haystack: &ImageBuffer, needle: &ImageBuffer, threshold: f64) -> Option<(u32, u32)> {
    use imageproc::template_matching::{MatchTemplateMethod, find_extremes, match_template};

    let scores = match_template(
        &haystack.inner().to_luma8(),
        &needle.inner().to_luma8(),
        MatchTemplateMethod::CrossCorrelationNormalized,
    );
    let extremes = find_extremes(&scores);
    debug!(
        "Best match score {:.4} at {:?} (threshold {:.2})",
        extremes.max_value, extremes.max_value_location, threshold
    );

    (f64::from(extremes.max_value) >= threshold).then_some(extremes.max_value_location)
}
