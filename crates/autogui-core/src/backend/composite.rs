//! Composite backend holding one trait object per capability
//!
//! The [`Automator`](crate::automation::Automator) talks to the desktop only
//! through this facade. Each capability is a separate trait object, so a
//! backend can be assembled from independent implementations.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use autogui_core::backend::{AutomationBackend, MockBackend};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = AutomationBackend::from_mock(Arc::new(MockBackend::new()));
//! let size = backend.screen.screen_size().await.unwrap();
//! assert_eq!((size.width, size.height), (1920, 1080));
//! # }
//! ```

use std::sync::Arc;

use super::{DialogPresenter, KeyboardDevice, MockBackend, PointerDevice, ScreenSource, WindowEnumerator};

/// Composite backend holding capability trait objects.
pub struct AutomationBackend {
    /// Mouse access.
    pub pointer: Arc<dyn PointerDevice>,

    /// Keyboard access.
    pub keyboard: Arc<dyn KeyboardDevice>,

    /// Primary display capture.
    pub screen: Arc<dyn ScreenSource>,

    /// Window enumeration.
    pub windows: Arc<dyn WindowEnumerator>,

    /// Modal dialogs.
    pub dialogs: Arc<dyn DialogPresenter>,

    /// Backend name for diagnostics.
    pub name: &'static str,
}

impl AutomationBackend {
    pub fn new(
        pointer: Arc<dyn PointerDevice>,
        keyboard: Arc<dyn KeyboardDevice>,
        screen: Arc<dyn ScreenSource>,
        windows: Arc<dyn WindowEnumerator>,
        dialogs: Arc<dyn DialogPresenter>,
        name: &'static str,
    ) -> Self {
        Self {
            pointer,
            keyboard,
            screen,
            windows,
            dialogs,
            name,
        }
    }

    /// Creates a composite where every capability is served by the mock.
    pub fn from_mock(backend: Arc<MockBackend>) -> Self {
        Self::new(
            backend.clone() as Arc<dyn PointerDevice>,
            backend.clone() as Arc<dyn KeyboardDevice>,
            backend.clone() as Arc<dyn ScreenSource>,
            backend.clone() as Arc<dyn WindowEnumerator>,
            backend as Arc<dyn DialogPresenter>,
            "mock",
        )
    }

    /// Creates a composite where every capability is served by the desktop
    /// backend.
    #[cfg(feature = "desktop")]
    pub fn from_desktop(backend: Arc<super::DesktopBackend>) -> Self {
        Self::new(
            backend.clone() as Arc<dyn PointerDevice>,
            backend.clone() as Arc<dyn KeyboardDevice>,
            backend.clone() as Arc<dyn ScreenSource>,
            backend.clone() as Arc<dyn WindowEnumerator>,
            backend as Arc<dyn DialogPresenter>,
            "desktop",
        )
    }
}

impl std::fmt::Debug for AutomationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationBackend")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
