//! Lorenz-family vector field and the guarded Euler step.
//!
//! The attractor is defined by three coupled equations:
//!   dx/dt = a(y - x)
//!   dy/dt = x(b - z) - y
//!   dz/dt = xy - cz
//!
//! [`advance`] never fails. A step that would produce a non-finite or
//! out-of-bounds state is rejected and the trajectory stays frozen for the
//! frame; the reason comes back in [`StepOutcome`].

use glam::Vec3;

use crate::color::speed_color;
use crate::guard::is_valid;
use crate::params::AttractorParameters;
use crate::trajectory::Trajectory;

/// Upper bound on the magnitude of the derivative vector.
pub const MAX_STEP: f32 = 100.0;

/// Keeps the rescale denominator away from zero.
const RESCALE_EPSILON: f32 = 1e-6;

/// Why a step was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The trajectory's current position already fails the guard.
    InvalidPosition,
    /// The candidate position is non-finite or outside `max_radius`.
    InvalidCandidate,
    /// The step displacement is non-finite or larger than `max_radius`.
    InvalidVelocity,
}

/// Result of advancing one trajectory by one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The candidate was appended and is now the current position.
    Accepted {
        position: Vec3,
        speed: f32,
    },
    /// Nothing was mutated.
    Rejected(Rejection),
}

impl StepOutcome {
    /// Whether the step was applied.
    pub fn is_accepted(&self) -> bool {
        matches!(self, StepOutcome::Accepted { .. })
    }
}

/// Evaluate the vector field at `p`.
///
/// A non-finite raw derivative collapses to zero. The result is then scaled
/// uniformly so its length never exceeds [`MAX_STEP`].
pub fn derivative(p: Vec3, params: &AttractorParameters) -> Vec3 {
    let AttractorParameters { a, b, c, .. } = *params;

    let raw = Vec3::new(a * (p.y - p.x), p.x * (b - p.z) - p.y, p.x * p.y - c * p.z);
    let d = if raw.is_finite() { raw } else { Vec3::ZERO };

    let scale = (MAX_STEP / (d.length() + RESCALE_EPSILON)).min(1.0);
    d * scale
}

/// Advance `trajectory` by one explicit Euler step.
pub fn advance(trajectory: &mut Trajectory, params: &AttractorParameters) -> StepOutcome {
    let current = trajectory.current_position();
    if !is_valid(current, params.max_radius) {
        return StepOutcome::Rejected(Rejection::InvalidPosition);
    }

    let candidate = current + derivative(current, params) * params.dt;
    if !is_valid(candidate, params.max_radius) {
        return StepOutcome::Rejected(Rejection::InvalidCandidate);
    }

    let velocity = candidate - current;
    let speed = velocity.length();
    if !speed.is_finite() || speed > params.max_radius {
        return StepOutcome::Rejected(Rejection::InvalidVelocity);
    }

    trajectory.push(candidate, speed_color(velocity, params.color_scale));
    StepOutcome::Accepted {
        position: candidate,
        speed,
    }
}
