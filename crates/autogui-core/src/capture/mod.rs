//! Screen image handling
//!
//! Captured screens are held in an [`ImageBuffer`]; [`locate`] searches them
//! for a needle image.

pub mod image_buffer;
pub mod locate;

pub use image_buffer::ImageBuffer;
