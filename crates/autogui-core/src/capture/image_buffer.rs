//! Image buffer wrapper for captured screens
//!
//! [`ImageBuffer`] holds one capture of the primary screen and offers what the
//! screen tools need from it: cropping to a region and reading pixels.
//!
//! # Examples
//!
//! ```
//! use autogui_core::{capture::ImageBuffer, model::Region};
//!
//! let screen = ImageBuffer::from_test_pattern(1920, 1080);
//!
//! let area = screen.crop(Region::new(100, 100, 800, 400)).unwrap();
//! assert_eq!((area.width(), area.height()), (800, 400));
//! ```

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::{
    color::Rgb,
    error::{AutomationError, AutomationResult},
    model::{Point, Region},
};

/// A captured screen or needle image
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    inner: DynamicImage,
}

impl ImageBuffer {
    pub fn new(image: DynamicImage) -> Self {
        Self { inner: image }
    }

    /// Creates a buffer from raw RGBA pixels as returned by screen capture
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self::new(DynamicImage::ImageRgba8(image))
    }

    /// Copies out `region`, which must lie entirely within the image; otherwise
    /// [`AutomationError::InvalidRegion`] is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use autogui_core::{capture::ImageBuffer, model::Region};
    ///
    /// let screen = ImageBuffer::from_test_pattern(100, 100);
    /// assert!(screen.crop(Region::new(90, 90, 20, 20)).is_err());
    /// assert!(screen.crop(Region::new(-1, 0, 10, 10)).is_err());
    /// ```
    pub fn crop(&self, region: Region) -> AutomationResult<Self> {
        let (screen_w, screen_h) = self.dimensions();

        if region.left < 0 || region.top < 0 {
            return Err(AutomationError::InvalidRegion {
                reason: format!(
                    "region origin ({}, {}) is outside the screen ({}x{})",
                    region.left, region.top, screen_w, screen_h
                ),
            });
        }

        let (x, y) = (region.left as u32, region.top as u32);
        let fits_x = x.checked_add(region.width).is_some_and(|r| r <= screen_w);
        let fits_y = y.checked_add(region.height).is_some_and(|b| b <= screen_h);
        if !fits_x || !fits_y {
            return Err(AutomationError::InvalidRegion {
                reason: format!(
                    "region {}x{} at ({}, {}) extends beyond the screen ({}x{})",
                    region.width, region.height, x, y, screen_w, screen_h
                ),
            });
        }

        Ok(Self::new(self.inner.crop_imm(x, y, region.width, region.height)))
    }

    /// Reads the colour of one pixel, or `None` when outside the image
    pub fn pixel(&self, at: Point) -> Option<Rgb> {
        let (w, h) = self.dimensions();
        if at.x < 0 || at.y < 0 || at.x as u32 >= w || at.y as u32 >= h {
            return None;
        }
        Some(Rgb::from(self.inner.get_pixel(at.x as u32, at.y as u32)))
    }

    /// `(width, height)` in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    pub fn to_rgba8(&self) -> RgbaImage {
        self.inner.to_rgba8()
    }

    /// Synthetic desktop used by the mock backend
    ///
    /// Blue at the top fading to cyan at the bottom: the green channel grows
    /// with `y`, red stays 0 and blue stays 255.
    ///
    /// ```
    /// use autogui_core::{capture::ImageBuffer, color::Rgb, model::Point};
    ///
    /// let screen = ImageBuffer::from_test_pattern(1920, 1080);
    /// assert_eq!(screen.pixel(Point::new(5, 0)), Some(Rgb::new(0, 0, 255)));
    /// ```
    pub fn from_test_pattern(width: u32, height: u32) -> Self {
        let rows = u64::from(height.max(1));
        Self::from_rgba(RgbaImage::from_fn(width, height, |_, y| {
            let green = (u64::from(y) * 255 / rows) as u8;
            Rgba([0, green, 255, 255])
        }))
    }

    /// Creates an image filled with a single colour
    pub fn solid(width: u32, height: u32, color: Rgb) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(
            width,
            height,
            Rgba([color.r, color.g, color.b, 255]),
        ))
    }

    /// Copies `patch` onto this image with its top-left corner at `at`
    ///
    /// Pixels falling outside the image are dropped.
    pub fn paste(&mut self, patch: &ImageBuffer, at: Point) {
        image::imageops::overlay(&mut self.inner, &patch.inner, at.x as i64, at.y as i64);
    }

    pub fn inner(&self) -> &DynamicImage {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_accessors_agree() {
        let screen = ImageBuffer::from_test_pattern(640, 480);
        assert_eq!(screen.dimensions(), (screen.width(), screen.height()));
        assert_eq!(screen.width(), 640);
    }

    #[test]
    fn test_crop_inner_region() {
        let screen = ImageBuffer::from_test_pattern(200, 100);
        let area = screen.crop(Region::new(50, 20, 100, 60)).unwrap();
        assert_eq!((area.width(), area.height()), (100, 60));
    }

    #[test]
    fn test_crop_full_image() {
        let img = ImageBuffer::from_test_pattern(200, 100);
        let cropped = img.crop(Region::new(0, 0, 200, 100)).unwrap();
        assert_eq!(cropped.dimensions(), (200, 100));
    }

    #[test]
    fn test_crop_past_the_edge() {
        let img = ImageBuffer::from_test_pattern(200, 100);

        let err = img.crop(Region::new(150, 0, 100, 10)).unwrap_err();
        assert!(matches!(err, AutomationError::InvalidRegion { .. }));
        assert!(err.to_string().contains("extends beyond"));

        assert!(img.crop(Region::new(0, 0, u32::MAX, 1)).is_err());
    }

    #[test]
    fn test_crop_keeps_pixels() {
        let mut img = ImageBuffer::solid(20, 20, Rgb::new(0, 0, 0));
        img.paste(&ImageBuffer::solid(1, 1, Rgb::new(9, 8, 7)), Point::new(5, 6));

        let cropped = img.crop(Region::new(5, 6, 2, 2)).unwrap();
        assert_eq!(cropped.pixel(Point::new(0, 0)), Some(Rgb::new(9, 8, 7)));
        assert_eq!(cropped.pixel(Point::new(1, 1)), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn test_pixel_bounds() {
        let img = ImageBuffer::solid(10, 10, Rgb::new(1, 2, 3));
        assert_eq!(img.pixel(Point::new(9, 9)), Some(Rgb::new(1, 2, 3)));
        assert_eq!(img.pixel(Point::new(10, 0)), None);
        assert_eq!(img.pixel(Point::new(-1, 0)), None);
    }

    #[test]
    fn test_test_pattern_gradient() {
        let img = ImageBuffer::from_test_pattern(4, 100);
        let top = img.pixel(Point::new(0, 0)).unwrap();
        let bottom = img.pixel(Point::new(0, 99)).unwrap();
        assert_eq!(top, Rgb::new(0, 0, 255));
        assert!(bottom.g > 240);
    }

    #[test]
    fn test_paste_clips_outside_pixels() {
        let mut img = ImageBuffer::solid(4, 4, Rgb::new(0, 0, 0));
        img.paste(&ImageBuffer::solid(4, 4, Rgb::new(255, 255, 255)), Point::new(2, 2));
        assert_eq!(img.pixel(Point::new(3, 3)), Some(Rgb::new(255, 255, 255)));
        assert_eq!(img.pixel(Point::new(1, 1)), Some(Rgb::new(0, 0, 0)));
    }
}
