//! Drawer geometry and drag-to-resize.
//!
//! The console lives in a drawer anchored to the bottom of the viewport.
//! Dragging its top edge sets the height to the distance between the
//! pointer and the bottom of the viewport.

/// Height the drawer opens with, in pixels.
pub const DEFAULT_DRAWER_HEIGHT: u32 = 500;
/// Heights at or below this are rejected.
pub const MIN_DRAWER_HEIGHT: u32 = 50;
/// Heights at or above this are rejected.
pub const MAX_DRAWER_HEIGHT: u32 = 800;

/// Current drawer height and the exclusive bounds it must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerGeometry {
    height: u32,
    min_height: u32,
    max_height: u32,
}

impl DrawerGeometry {
    /// Create a geometry with custom bounds.
    ///
    /// The initial height is clamped into `[min_height, max_height]`.
    pub fn new(height: u32, min_height: u32, max_height: u32) -> Self {
        let (min_height, max_height) = if min_height <= max_height {
            (min_height, max_height)
        } else {
            (max_height, min_height)
        };
        Self {
            height: height.clamp(min_height, max_height),
            min_height,
            max_height,
        }
    }

    /// Current height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Lower bound (exclusive).
    pub fn min_height(&self) -> u32 {
        self.min_height
    }

    /// Upper bound (exclusive).
    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Apply a pointer position during a drag.
    ///
    /// `pointer_y` is measured from the top of a viewport that is
    /// `viewport_height` tall. The new height is accepted only when it lies
    /// strictly between the bounds. Returns true if the height changed.
    pub fn resize_from_pointer(&mut self, viewport_height: u32, pointer_y: i32) -> bool {
        let candidate = i64::from(viewport_height) - i64::from(pointer_y);
        if candidate <= i64::from(self.min_height) || candidate >= i64::from(self.max_height) {
            return false;
        }
        // In range, so it fits in u32.
        let candidate = candidate as u32;
        if candidate == self.height {
            return false;
        }
        self.height = candidate;
        true
    }
}

impl Default for DrawerGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_DRAWER_HEIGHT, MIN_DRAWER_HEIGHT, MAX_DRAWER_HEIGHT)
    }
}

/// Tracks whether the drag handle is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    active: bool,
}

impl DragState {
    /// Mouse went down on the handle.
    pub fn begin(&mut self) {
        self.active = true;
    }

    /// Mouse was released.
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Whether pointer moves should resize the drawer.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
