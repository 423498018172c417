//! Automation backends
//!
//! A backend is assembled from the capability traits in [`traits`] into an
//! [`AutomationBackend`]. [`MockBackend`] serves tests; [`DesktopBackend`]
//! (cargo feature `desktop`) drives the real session.

pub mod composite;
#[cfg(feature = "desktop")]
pub mod desktop;
pub mod mock;
pub mod traits;

pub use composite::AutomationBackend;
#[cfg(feature = "desktop")]
pub use desktop::DesktopBackend;
pub use mock::{InputEvent, MockBackend, MockFault, ShownDialog};
pub use traits::{DialogPresenter, KeyboardDevice, PointerDevice, ScreenSource, WindowEnumerator};
