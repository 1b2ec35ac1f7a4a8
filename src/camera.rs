//! Camera models: free orbit/pan/zoom and velocity-following.
//!
//! Exactly one model is active at a time. [`CameraState`] carries only the
//! state of the active model; input and per-frame updates dispatch on it once
//! instead of checking a mode flag throughout.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// World up direction used by the follow camera.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Below this speed the follow camera has no usable heading.
const MIN_FOLLOW_SPEED: f32 = 1e-6;
/// Below this length `direction x WORLD_UP` is treated as degenerate.
const MIN_RIGHT_LENGTH: f32 = 1e-4;

/// Tunables shared by both camera models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Free-mode distance and follow distance after a reset.
    pub default_distance: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Distance change per wheel notch.
    pub zoom_step: f32,
    /// Degrees per pixel of rotate-drag.
    pub rotate_sensitivity: f32,
    /// World units per pixel of pan-drag.
    pub pan_sensitivity: f32,
    /// Fraction of the remaining gap the follow camera closes each frame, in (0, 1].
    pub follow_smoothing: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_distance: 50.0,
            min_zoom: 5.0,
            max_zoom: 300.0,
            zoom_step: 5.0,
            rotate_sensitivity: 0.5,
            pan_sensitivity: 0.1,
            follow_smoothing: 0.1,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    /// Never panics: an inverted range resolves to `max_zoom`, and NaN
    /// bounds are ignored.
    fn clamp_zoom(&self, distance: f32) -> f32 {
        distance.max(self.min_zoom).min(self.max_zoom)
    }

    /// Perspective projection with a [0, 1] depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// User-driven orbit camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeCamera {
    pub distance: f32,
    /// Accumulated rotation about the X axis, in degrees.
    pub rotation_x: f32,
    /// Accumulated rotation about the Y axis, in degrees.
    pub rotation_y: f32,
    pub pan_offset: Vec2,
}

impl FreeCamera {
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            rotation_x: 0.0,
            rotation_y: 0.0,
            pan_offset: Vec2::ZERO,
        }
    }

    /// Positive `notches` move the camera closer.
    pub fn zoom(&mut self, notches: f32, config: &CameraConfig) {
        self.distance = config.clamp_zoom(self.distance - notches * config.zoom_step);
    }

    /// Horizontal drag spins about Y, vertical drag about X.
    pub fn rotate(&mut self, drag: Vec2, config: &CameraConfig) {
        self.rotation_y += drag.x * config.rotate_sensitivity;
        self.rotation_x += drag.y * config.rotate_sensitivity;
    }

    /// Screen y grows downward, so vertical pan is inverted.
    pub fn pan(&mut self, drag: Vec2, config: &CameraConfig) {
        self.pan_offset.x += drag.x * config.pan_sensitivity;
        self.pan_offset.y -= drag.y * config.pan_sensitivity;
    }

    /// Translate by `(pan.x, pan.y, -distance)`, then rotate about X, then Y.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.pan_offset.extend(-self.distance))
            * Mat4::from_rotation_x(self.rotation_x.to_radians())
            * Mat4::from_rotation_y(self.rotation_y.to_radians())
    }

    /// World-space eye position, forward direction and up direction.
    pub fn frame(&self) -> (Vec3, Vec3, Vec3) {
        let inv = self.view_matrix().inverse();
        let eye = inv.transform_point3(Vec3::ZERO);
        let forward = inv.transform_vector3(Vec3::NEG_Z).normalize_or_zero();
        let up = inv.transform_vector3(Vec3::Y).normalize_or_zero();
        (eye, forward, up)
    }
}

/// Smoothed camera trailing the newest trajectory's heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub camera_position: Vec3,
    pub target_position: Vec3,
    /// Always unit length.
    pub up_vector: Vec3,
    pub follow_distance: f32,
    /// Set on entry; the first update after entry does not move the eye.
    settling: bool,
}

impl FollowCamera {
    /// Snapshot a follow camera behind `head`, offset along +Z.
    pub fn behind(head: Vec3, follow_distance: f32) -> Self {
        Self {
            camera_position: head + Vec3::Z * follow_distance,
            target_position: head,
            up_vector: WORLD_UP,
            follow_distance,
            settling: true,
        }
    }

    /// Take over the free camera's exact view. Used when there is no
    /// trajectory to follow yet.
    pub fn from_free(free: &FreeCamera, follow_distance: f32) -> Self {
        let (eye, forward, up) = free.frame();
        let forward = if forward == Vec3::ZERO { Vec3::NEG_Z } else { forward };
        let up = if up == Vec3::ZERO { WORLD_UP } else { up };
        Self {
            camera_position: eye,
            target_position: eye + forward * follow_distance,
            up_vector: up,
            follow_distance,
            settling: true,
        }
    }

    /// Positive `notches` move the camera closer.
    pub fn zoom(&mut self, notches: f32, config: &CameraConfig) {
        self.follow_distance = config.clamp_zoom(self.follow_distance - notches * config.zoom_step);
    }

    /// Track the segment `previous -> latest`.
    ///
    /// Returns `false` and leaves the camera untouched when there is no
    /// usable heading (missing points, or the head barely moved).
    pub fn update(&mut self, segment: Option<(Vec3, Vec3)>, smoothing: f32) -> bool {
        let Some((previous, latest)) = segment else {
            return false;
        };
        let velocity = latest - previous;
        let speed = velocity.length();
        if !speed.is_finite() || speed < MIN_FOLLOW_SPEED {
            return false;
        }
        let direction = velocity / speed;

        if self.settling {
            self.settling = false;
        } else {
            let desired = latest - direction * self.follow_distance;
            self.camera_position += (desired - self.camera_position) * smoothing;
        }

        let right = direction.cross(WORLD_UP);
        if right.length() >= MIN_RIGHT_LENGTH {
            let up = right.normalize().cross(direction).normalize();
            if up.is_finite() {
                self.up_vector = up;
            }
        }

        self.target_position = latest;
        true
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera_position, self.target_position, self.up_vector)
    }
}

/// The active camera model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraState {
    Free(FreeCamera),
    /// `resume` is the free camera restored when follow mode is left.
    Follow { follow: FollowCamera, resume: FreeCamera },
}

/// Short label for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Free,
    Follow,
}

impl CameraMode {
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Free => "Free",
            CameraMode::Follow => "Follow",
        }
    }
}

/// View description handed to the render layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewTransform {
    Free {
        distance: f32,
        rotation_x: f32,
        rotation_y: f32,
        pan_offset: Vec2,
    },
    LookAt {
        eye: Vec3,
        target: Vec3,
        up: Vec3,
    },
}

impl ViewTransform {
    pub fn matrix(&self) -> Mat4 {
        match *self {
            ViewTransform::Free {
                distance,
                rotation_x,
                rotation_y,
                pan_offset,
            } => FreeCamera {
                distance,
                rotation_x,
                rotation_y,
                pan_offset,
            }
            .view_matrix(),
            ViewTransform::LookAt { eye, target, up } => Mat4::look_at_rh(eye, target, up),
        }
    }
}

/// Camera state plus its configuration.
#[derive(Debug, Clone)]
pub struct Camera {
    state: CameraState,
    config: CameraConfig,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            state: CameraState::Free(FreeCamera::new(config.clamp_zoom(config.default_distance))),
            config,
        }
    }

    #[inline]
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn mode(&self) -> CameraMode {
        match self.state {
            CameraState::Free(_) => CameraMode::Free,
            CameraState::Follow { .. } => CameraMode::Follow,
        }
    }

    #[inline]
    pub fn is_follow(&self) -> bool {
        self.mode() == CameraMode::Follow
    }

    /// Wheel input: free distance or follow distance depending on the mode.
    pub fn zoom(&mut self, notches: f32) {
        match &mut self.state {
            CameraState::Free(free) => free.zoom(notches, &self.config),
            CameraState::Follow { follow, .. } => follow.zoom(notches, &self.config),
        }
    }

    /// Rotate-drag. Returns `false` when the active model ignores it.
    pub fn rotate(&mut self, drag: Vec2) -> bool {
        match &mut self.state {
            CameraState::Free(free) => {
                free.rotate(drag, &self.config);
                true
            }
            CameraState::Follow { .. } => false,
        }
    }

    /// Pan-drag. Returns `false` when the active model ignores it.
    pub fn pan(&mut self, drag: Vec2) -> bool {
        match &mut self.state {
            CameraState::Free(free) => {
                free.pan(drag, &self.config);
                true
            }
            CameraState::Follow { .. } => false,
        }
    }

    /// Switch models.
    ///
    /// Entering follow mode snaps behind `head` when there is one; otherwise
    /// it keeps the current eye position and view direction.
    pub fn toggle_follow(&mut self, head: Option<Vec3>) {
        self.state = match self.state {
            CameraState::Free(free) => {
                let distance = free.distance;
                let follow = match head {
                    Some(head) => FollowCamera::behind(head, distance),
                    None => FollowCamera::from_free(&free, distance),
                };
                CameraState::Follow { follow, resume: free }
            }
            CameraState::Follow { resume, .. } => CameraState::Free(resume),
        };
    }

    /// Restore default framing for the active model.
    pub fn reset(&mut self) {
        let distance = self.config.clamp_zoom(self.config.default_distance);
        match &mut self.state {
            CameraState::Free(free) => *free = FreeCamera::new(distance),
            CameraState::Follow { follow, resume } => {
                follow.follow_distance = distance;
                *resume = FreeCamera::new(distance);
            }
        }
    }

    /// Per-frame update. Only the follow model reacts; `segment` is the
    /// `(previous, latest)` pair of the most recently spawned trajectory.
    pub fn update(&mut self, segment: Option<(Vec3, Vec3)>) -> bool {
        match &mut self.state {
            CameraState::Free(_) => false,
            CameraState::Follow { follow, .. } => {
                follow.update(segment, self.config.follow_smoothing)
            }
        }
    }

    pub fn view_transform(&self) -> ViewTransform {
        match self.state {
            CameraState::Free(free) => ViewTransform::Free {
                distance: free.distance,
                rotation_x: free.rotation_x,
                rotation_y: free.rotation_y,
                pan_offset: free.pan_offset,
            },
            CameraState::Follow { follow, .. } => ViewTransform::LookAt {
                eye: follow.camera_position,
                target: follow.target_position,
                up: follow.up_vector,
            },
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        match &self.state {
            CameraState::Free(free) => free.view_matrix(),
            CameraState::Follow { follow, .. } => follow.view_matrix(),
        }
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        self.config.projection_matrix(aspect)
    }

    /// World-space eye position of the active model.
    pub fn eye(&self) -> Vec3 {
        match &self.state {
            CameraState::Free(free) => free.frame().0,
            CameraState::Follow { follow, .. } => follow.camera_position,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_free_defaults() {
        let cam = Camera::default();
        assert_eq!(cam.mode(), CameraMode::Free);
        assert!(approx(cam.eye(), Vec3::new(0.0, 0.0, 50.0)));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let config = CameraConfig::default();
        let mut free = FreeCamera::new(50.0);
        for _ in 0..100 {
            free.zoom(1.0, &config);
        }
        assert_eq!(free.distance, config.min_zoom);
        for _ in 0..100 {
            free.zoom(-1.0, &config);
        }
        assert_eq!(free.distance, config.max_zoom);
    }

    #[test]
    fn test_inverted_zoom_range_does_not_panic() {
        let config = CameraConfig {
            min_zoom: 400.0,
            max_zoom: 300.0,
            ..CameraConfig::default()
        };
        let mut cam = Camera::new(config);
        cam.zoom(1.0);
        cam.reset();
        assert!(cam.view_matrix().is_finite());

        let config = CameraConfig {
            min_zoom: f32::NAN,
            ..CameraConfig::default()
        };
        let cam = Camera::new(config);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn test_rotation_accumulates_in_degrees() {
        let config = CameraConfig::default();
        let mut free = FreeCamera::new(50.0);
        free.rotate(Vec2::new(10.0, 4.0), &config);
        free.rotate(Vec2::new(10.0, 4.0), &config);
        assert_eq!(free.rotation_y, 10.0);
        assert_eq!(free.rotation_x, 4.0);
    }

    #[test]
    fn test_pan_inverts_vertical() {
        let config = CameraConfig::default();
        let mut free = FreeCamera::new(50.0);
        free.pan(Vec2::new(10.0, 10.0), &config);
        assert!((free.pan_offset.x - 1.0).abs() < 1e-6);
        assert!((free.pan_offset.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_free_view_applies_translation_then_rotations() {
        let mut free = FreeCamera::new(10.0);
        free.rotation_y = 90.0;
        // Rotating the world +X by 90 degrees about Y lands on -Z,
        // then the translation pushes it 10 further away.
        let p = free.view_matrix().transform_point3(Vec3::X);
        assert!(approx(p, Vec3::new(0.0, 0.0, -11.0)));
    }

    #[test]
    fn test_follow_entry_snapshots_behind_head() {
        let mut cam = Camera::default();
        cam.toggle_follow(Some(Vec3::new(1.0, 2.0, 3.0)));
        match cam.state() {
            CameraState::Follow { follow, .. } => {
                assert!(approx(follow.camera_position, Vec3::new(1.0, 2.0, 53.0)));
                assert_eq!(follow.target_position, Vec3::new(1.0, 2.0, 3.0));
            }
            other => panic!("expected follow, got {other:?}"),
        }
    }

    #[test]
    fn test_follow_first_update_does_not_move_eye() {
        let mut follow = FollowCamera::behind(Vec3::ZERO, 20.0);
        let before = follow.camera_position;
        assert!(follow.update(Some((Vec3::ZERO, Vec3::X)), 0.1));
        assert_eq!(follow.camera_position, before);
        assert_eq!(follow.target_position, Vec3::X);

        assert!(follow.update(Some((Vec3::X, Vec3::X * 2.0)), 0.1));
        assert_ne!(follow.camera_position, before);
    }

    #[test]
    fn test_follow_smoothing_converges_to_desired() {
        let mut follow = FollowCamera::behind(Vec3::ZERO, 10.0);
        let segment = Some((Vec3::ZERO, Vec3::X));
        for _ in 0..300 {
            follow.update(segment, 0.1);
        }
        // Behind the head along -direction
        assert!(approx(follow.camera_position, Vec3::new(-9.0, 0.0, 0.0)));
        assert!(approx(follow.up_vector, Vec3::Y));
    }

    #[test]
    fn test_follow_ignores_stationary_head() {
        let mut follow = FollowCamera::behind(Vec3::ONE, 10.0);
        let before = follow;
        assert!(!follow.update(Some((Vec3::ONE, Vec3::ONE)), 0.1));
        assert!(!follow.update(None, 0.1));
        assert_eq!(follow, before);
    }

    #[test]
    fn test_up_vector_stays_unit_when_heading_parallel_to_world_up() {
        let mut follow = FollowCamera::behind(Vec3::ZERO, 10.0);
        follow.update(Some((Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0))), 0.1);
        let up_before = follow.up_vector;

        // Straight up: right vector degenerates, previous up is kept
        follow.update(Some((Vec3::ZERO, Vec3::Y)), 0.1);
        assert!(follow.up_vector.is_finite());
        assert!((follow.up_vector.length() - 1.0).abs() < 1e-4);
        assert_eq!(follow.up_vector, up_before);

        follow.update(Some((Vec3::ZERO, Vec3::NEG_Y)), 0.1);
        assert!((follow.up_vector.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_toggle_without_head_keeps_eye() {
        let mut cam = Camera::default();
        cam.rotate(Vec2::new(40.0, 20.0));
        cam.pan(Vec2::new(5.0, -3.0));
        let eye = cam.eye();
        let view = cam.view_matrix();

        cam.toggle_follow(None);
        assert!(cam.is_follow());
        assert!(approx(cam.eye(), eye));
        // Same picture as before the switch
        let p = Vec3::new(3.0, -1.0, 2.0);
        assert!(approx(cam.view_matrix().transform_point3(p), view.transform_point3(p)));
    }

    #[test]
    fn test_leaving_follow_restores_free_camera() {
        let mut cam = Camera::default();
        cam.rotate(Vec2::new(10.0, 0.0));
        let before = *cam.state();
        cam.toggle_follow(Some(Vec3::ONE));
        cam.zoom(1.0);
        cam.toggle_follow(None);
        assert_eq!(*cam.state(), before);
    }

    #[test]
    fn test_follow_mode_routes_wheel_to_follow_distance() {
        let mut cam = Camera::default();
        cam.toggle_follow(Some(Vec3::ZERO));
        cam.zoom(2.0);
        match cam.state() {
            CameraState::Follow { follow, resume } => {
                assert_eq!(follow.follow_distance, 40.0);
                assert_eq!(resume.distance, 50.0);
            }
            other => panic!("expected follow, got {other:?}"),
        }
        assert!(!cam.rotate(Vec2::ONE));
        assert!(!cam.pan(Vec2::ONE));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut cam = Camera::default();
        cam.zoom(3.0);
        cam.rotate(Vec2::new(7.0, 7.0));
        cam.pan(Vec2::new(7.0, 7.0));
        cam.reset();
        assert_eq!(*cam.state(), CameraState::Free(FreeCamera::new(50.0)));
    }

    #[test]
    fn test_view_transform_matches_view_matrix() {
        let mut cam = Camera::default();
        cam.rotate(Vec2::new(12.0, -8.0));
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(approx(
            cam.view_transform().matrix().transform_point3(p),
            cam.view_matrix().transform_point3(p)
        ));

        cam.toggle_follow(Some(Vec3::ONE));
        assert!(matches!(cam.view_transform(), ViewTransform::LookAt { .. }));
        assert!(approx(
            cam.view_transform().matrix().transform_point3(p),
            cam.view_matrix().transform_point3(p)
        ));
    }
}
