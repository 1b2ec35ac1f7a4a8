//! Screen-to-world unprojection for click-to-place spawning.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::guard::{is_valid, DEFAULT_SEED};

/// Distance along the pick ray at which new trajectories are placed.
pub const PICK_DISTANCE: f32 = 20.0;

const MIN_RAY_LENGTH: f32 = 1e-6;

/// Pixel rectangle the scene is drawn into. Origin is bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Full-window viewport.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Window coordinates (origin bottom-left) to normalized device x/y.
    fn to_ndc(self, window: Vec2) -> Vec2 {
        Vec2::new(
            (window.x - self.x) / self.width * 2.0 - 1.0,
            (window.y - self.y) / self.height * 2.0 - 1.0,
        )
    }
}

/// Map a window position and depth in [0, 1] back to world space.
///
/// Returns `None` when the homogeneous result is degenerate.
pub fn unproject_depth(window: Vec2, depth: f32, inv_view_proj: Mat4, viewport: Viewport) -> Option<Vec3> {
    let ndc = viewport.to_ndc(window);
    let p = inv_view_proj * Vec4::new(ndc.x, ndc.y, depth, 1.0);
    if p.w == 0.0 || !p.is_finite() {
        return None;
    }
    let p = p.truncate() / p.w;
    p.is_finite().then_some(p)
}

/// Convert a screen position (origin top-left, y down) to a world point
/// [`PICK_DISTANCE`] along the view ray.
///
/// Any degenerate step falls back to [`DEFAULT_SEED`], as does a result that
/// fails the guard for `max_radius`.
pub fn unproject(
    screen: Vec2,
    view: Mat4,
    projection: Mat4,
    viewport: Viewport,
    max_radius: f32,
) -> Vec3 {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return DEFAULT_SEED;
    }

    let window = Vec2::new(screen.x, viewport.height - screen.y);
    let inv_view_proj = (projection * view).inverse();

    let (Some(near), Some(far)) = (
        unproject_depth(window, 0.0, inv_view_proj, viewport),
        unproject_depth(window, 1.0, inv_view_proj, viewport),
    ) else {
        return DEFAULT_SEED;
    };

    let ray = far - near;
    let length = ray.length();
    if !length.is_finite() || length < MIN_RAY_LENGTH {
        return DEFAULT_SEED;
    }

    let point = near + ray / length * PICK_DISTANCE;
    if is_valid(point, max_radius) {
        point
    } else {
        DEFAULT_SEED
    }
}
