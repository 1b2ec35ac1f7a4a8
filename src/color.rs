//! Speed-to-color mapping for trajectory history.

use glam::Vec3;

/// Color of the first history entry of every freshly spawned trajectory.
pub const SPAWN_COLOR: Vec3 = Vec3::ONE;

const SATURATION: f32 = 1.0;
const VALUE: f32 = 0.8;

/// Color for a step with the given velocity.
///
/// The hue cycles with period `color_scale` over the raw step speed, so the
/// cycling rate depends on `dt`.
pub fn speed_color(velocity: Vec3, color_scale: f32) -> Vec3 {
    let speed = velocity.length();
    let hue = speed.rem_euclid(color_scale) / color_scale;
    hsv_to_rgb(hue, SATURATION, VALUE)
}

/// Convert HSV (all components in 0..=1) to RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}
