//! Screen-corner abort

use crate::{
    error::{AutomationError, AutomationResult},
    model::{Point, ScreenSize},
};

/// Fails when `position` is one of the four corners of `screen`
///
/// ```
/// use autogui_core::{
///     automation::failsafe::check_corners,
///     model::{Point, ScreenSize},
/// };
///
/// let screen = ScreenSize::new(800, 600);
/// assert!(check_corners(Point::new(0, 0), screen).is_err());
/// assert!(check_corners(Point::new(799, 599), screen).is_err());
/// assert!(check_corners(Point::new(1, 0), screen).is_ok());
/// ```
pub fn check_corners(position: Point, screen: ScreenSize) -> AutomationResult<()> {
    if screen.corners().contains(&position) {
        return Err(AutomationError::FailSafeTriggered { position });
    }
    Ok(())
}
