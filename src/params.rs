//! Attractor coefficients and integration settings.

use serde::{Deserialize, Serialize};

/// Coefficients and step settings shared by every trajectory.
///
/// The value is `Copy` and is handed to each trajectory update by
/// reference. Edits build a new value and replace the old one wholesale,
/// so a tick never observes a half-edited parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractorParameters {
    /// Coupling between x and y (sigma in the classic Lorenz system).
    pub a: f32,
    /// Drive term (rho in the classic Lorenz system).
    pub b: f32,
    /// Damping of z (beta in the classic Lorenz system).
    pub c: f32,
    /// Integration step. Must be positive.
    pub dt: f32,
    /// Points farther than this from the origin are treated as diverged.
    pub max_radius: f32,
    /// Period of the speed-to-hue cycle.
    pub color_scale: f32,
}

impl AttractorParameters {
    /// The classic Lorenz system: a=10, b=28, c=8/3, dt=0.01.
    pub const LORENZ: Self = Self {
        a: 10.0,
        b: 28.0,
        c: 8.0 / 3.0,
        dt: 0.01,
        max_radius: 1000.0,
        color_scale: 10.0,
    };

    /// Copy with `a` replaced.
    #[must_use]
    pub fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Copy with `b` replaced.
    #[must_use]
    pub fn with_b(self, b: f32) -> Self {
        Self { b, ..self }
    }

    /// Check the invariants the integrator relies on.
    pub fn is_well_formed(&self) -> bool {
        [self.a, self.b, self.c].iter().all(|v| v.is_finite())
            && self.dt.is_finite()
            && self.dt > 0.0
            && self.max_radius.is_finite()
            && self.max_radius > 0.0
            && self.color_scale.is_finite()
            && self.color_scale > 0.0
    }
}

impl Default for AttractorParameters {
    fn default() -> Self {
        Self::LORENZ
    }
}
