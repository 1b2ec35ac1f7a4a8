//! Simulation state and the per-frame tick.
//!
//! One tick applies the frame's input commands, advances every trajectory
//! by one step, updates the follow camera from the newest trajectory and
//! publishes head positions. Nothing in a tick can fail: invalid numeric
//! results freeze the affected trajectory, degenerate geometry leaves the
//! camera as it was, and commands that do not apply to the active camera
//! mode are ignored.

use glam::{Mat4, Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::attractor::{advance, StepOutcome};
use crate::camera::{Camera, CameraMode, ViewTransform};
use crate::config::ViewerConfig;
use crate::error::ConfigError;
use crate::input::Command;
use crate::params::AttractorParameters;
use crate::picking::{unproject, Viewport};
use crate::snapshot::{self, HeadSnapshot, SnapshotPublisher, SnapshotReader};
use crate::trajectory::Trajectory;

/// Trajectories and the parameters they are integrated with.
#[derive(Debug, Clone)]
pub struct SimulationState {
    params: AttractorParameters,
    /// Spawn order; the last entry is the most recently spawned.
    trajectories: Vec<Trajectory>,
    max_points: usize,
}

impl SimulationState {
    pub fn new(params: AttractorParameters, max_points: usize) -> Self {
        Self {
            params,
            trajectories: Vec::new(),
            max_points: max_points.max(1),
        }
    }

    #[inline]
    pub fn params(&self) -> &AttractorParameters {
        &self.params
    }

    #[inline]
    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    #[inline]
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// The most recently spawned trajectory.
    pub fn newest(&self) -> Option<&Trajectory> {
        self.trajectories.last()
    }

    pub fn push(&mut self, trajectory: Trajectory) {
        self.trajectories.push(trajectory);
    }

    pub fn clear(&mut self) {
        self.trajectories.clear();
    }

    /// Advance every trajectory once. Returns `(accepted, rejected)`.
    pub fn advance_all(&mut self) -> (usize, usize) {
        let params = self.params;
        let mut accepted = 0;
        for (index, trajectory) in self.trajectories.iter_mut().enumerate() {
            match advance(trajectory, &params) {
                StepOutcome::Accepted { .. } => accepted += 1,
                StepOutcome::Rejected(reason) => {
                    trace!(index, ?reason, "step rejected, trajectory frozen");
                }
            }
        }
        (accepted, self.trajectories.len() - accepted)
    }

    /// Current position of every trajectory, in spawn order.
    pub fn heads(&self) -> Vec<Vec3> {
        self.trajectories.iter().map(Trajectory::current_position).collect()
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Trajectories whose step was accepted.
    pub accepted: usize,
    /// Trajectories frozen this tick.
    pub rejected: usize,
    /// Whether the follow camera moved.
    pub camera_updated: bool,
    /// A quit command arrived; the caller should stop after this tick.
    pub quit: bool,
}

/// Interactive simulation: state, camera, input handling and pacing-free
/// tick logic.
#[derive(Debug)]
pub struct Simulation {
    state: SimulationState,
    camera: Camera,
    viewport: Viewport,
    rng: SmallRng,
    initial_seed: Vec3,
    param_step: f32,
    paused: bool,
    tick: u64,
    publisher: Option<SnapshotPublisher>,
}

impl Simulation {
    /// Validate `config`, then build the simulation.
    pub fn try_new(config: &ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Build a simulation from `config` with one trajectory at the initial seed.
    ///
    /// Does not validate; out-of-range camera or parameter values degrade
    /// rather than panic. Use [`Simulation::try_new`] to reject them up front.
    pub fn new(config: &ViewerConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut sim = Self {
            state: SimulationState::new(config.params, config.max_points),
            camera: Camera::new(config.camera),
            viewport: Viewport::from_size(config.width, config.height),
            rng,
            initial_seed: config.initial_seed,
            param_step: config.param_step,
            paused: false,
            tick: 0,
            publisher: None,
        };
        sim.spawn(sim.initial_seed);
        sim
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    pub fn params(&self) -> &AttractorParameters {
        self.state.params()
    }

    #[inline]
    pub fn trajectories(&self) -> &[Trajectory] {
        self.state.trajectories()
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Number of completed ticks.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Replace the attractor parameters wholesale.
    pub fn set_params(&mut self, params: AttractorParameters) {
        info!(a = params.a, b = params.b, c = params.c, dt = params.dt, "parameters changed");
        self.state.params = params;
    }

    /// Subscribe to per-tick head snapshots. A new subscription replaces the
    /// previous publisher; earlier readers stop receiving updates.
    pub fn subscribe(&mut self) -> SnapshotReader {
        let (publisher, reader) = snapshot::channel();
        publisher.publish(self.snapshot());
        self.publisher = Some(publisher);
        reader
    }

    /// Heads of all trajectories as of the last completed tick.
    pub fn snapshot(&self) -> HeadSnapshot {
        HeadSnapshot {
            tick: self.tick,
            heads: self.state.heads(),
        }
    }

    /// Spawn a trajectory near `seed`.
    pub fn spawn(&mut self, seed: Vec3) {
        let trajectory = Trajectory::spawn(
            seed,
            self.state.params.max_radius,
            self.state.max_points,
            &mut self.rng,
        );
        debug!(
            start = ?trajectory.current_position(),
            count = self.state.trajectories.len() + 1,
            "spawned trajectory"
        );
        self.state.push(trajectory);
    }

    /// Spawn at the world point under a screen position. Only allowed in
    /// free camera mode; returns whether a trajectory was spawned.
    pub fn spawn_at_screen(&mut self, screen: Vec2) -> bool {
        if self.camera.is_follow() {
            debug!("click ignored in follow mode");
            return false;
        }
        let seed = unproject(
            screen,
            self.camera.view_matrix(),
            self.projection_matrix(),
            self.viewport,
            self.state.params.max_radius,
        );
        self.spawn(seed);
        true
    }

    /// Remove all trajectories and start over with one at the initial seed.
    pub fn clear(&mut self) {
        info!(removed = self.state.trajectories.len(), "clearing trajectories");
        self.state.clear();
        self.spawn(self.initial_seed);
    }

    /// Apply one input command. Returns `true` for quit.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return true,
            Command::Zoom(notches) => self.camera.zoom(notches),
            Command::Click { position, shift } => {
                // Shift + click starts a rotate-drag instead of spawning
                if !shift {
                    self.spawn_at_screen(position);
                }
            }
            Command::Rotate(drag) => {
                self.camera.rotate(drag);
            }
            Command::Pan(drag) => {
                self.camera.pan(drag);
            }
            Command::ResetView => {
                debug!(mode = self.camera.mode().label(), "view reset");
                self.camera.reset();
            }
            Command::ClearTrajectories => self.clear(),
            Command::IncreaseA => self.set_params(self.params().with_a(self.params().a + self.param_step)),
            Command::DecreaseA => self.set_params(self.params().with_a(self.params().a - self.param_step)),
            Command::IncreaseB => self.set_params(self.params().with_b(self.params().b + self.param_step)),
            Command::DecreaseB => self.set_params(self.params().with_b(self.params().b - self.param_step)),
            Command::ToggleFollow => {
                let head = self.state.newest().map(Trajectory::current_position);
                self.camera.toggle_follow(head);
                info!(mode = self.camera.mode().label(), "camera mode switched");
            }
            Command::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "pause toggled");
            }
        }
        false
    }

    /// Advance the world by one frame without any input.
    pub fn step(&mut self) -> TickReport {
        let (accepted, rejected) = if self.paused {
            (0, 0)
        } else {
            self.state.advance_all()
        };

        let segment = self.state.newest().and_then(Trajectory::last_two);
        let camera_updated = self.camera.update(segment);

        self.tick += 1;
        if let Some(publisher) = &self.publisher {
            publisher.publish(self.snapshot());
        }

        TickReport {
            accepted,
            rejected,
            camera_updated,
            quit: false,
        }
    }

    /// Apply this frame's commands, then step. A quit command still lets the
    /// tick complete.
    pub fn tick<I>(&mut self, commands: I) -> TickReport
    where
        I: IntoIterator<Item = Command>,
    {
        let mut quit = false;
        for command in commands {
            quit |= self.apply(command);
        }
        TickReport {
            quit,
            ..self.step()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.camera.projection_matrix(self.viewport.aspect())
    }

    /// Combined projection * view for the current frame.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn view_transform(&self) -> ViewTransform {
        self.camera.view_transform()
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera.mode()
    }

    /// One-line summary of parameters and camera mode for display.
    pub fn status_line(&self) -> String {
        let p = self.params();
        format!(
            "a: {:.1} b: {:.1} c: {:.2} dt: {:.3} | {} camera | {} trajectories{}",
            p.a,
            p.b,
            p.c,
            p.dt,
            self.camera.mode().label(),
            self.trajectories().len(),
            if self.paused { " | paused" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ViewerConfig {
        ViewerConfig {
            rng_seed: Some(42),
            max_points: 100,
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn test_starts_with_one_trajectory() {
        let sim = Simulation::new(&config());
        assert_eq!(sim.trajectories().len(), 1);
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.camera_mode(), CameraMode::Free);
    }

    #[test]
    fn test_try_new_rejects_inverted_zoom_range() {
        let mut bad = config();
        bad.camera.min_zoom = 400.0;
        assert!(matches!(Simulation::try_new(&bad), Err(ConfigError::Invalid(_))));

        // Unvalidated construction still succeeds
        let sim = Simulation::new(&bad);
        assert!(sim.view_matrix().is_finite());
        assert!(Simulation::try_new(&config()).is_ok());
    }

    #[test]
    fn test_step_advances_every_trajectory() {
        let mut sim = Simulation::new(&config());
        sim.spawn(Vec3::new(1.0, 1.0, 1.0));
        let report = sim.step();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 0);
        assert!(sim.trajectories().iter().all(|t| t.len() == 2));
    }

    #[test]
    fn test_parameter_commands_replace_values() {
        let mut sim = Simulation::new(&config());
        sim.apply(Command::IncreaseA);
        sim.apply(Command::IncreaseA);
        sim.apply(Command::DecreaseB);
        assert_eq!(sim.params().a, 12.0);
        assert_eq!(sim.params().b, 27.0);
        sim.apply(Command::DecreaseA);
        sim.apply(Command::IncreaseB);
        assert_eq!(sim.params().a, 11.0);
        assert_eq!(sim.params().b, 28.0);
    }

    #[test]
    fn test_clear_respawns_single_trajectory() {
        let mut sim = Simulation::new(&config());
        sim.spawn(Vec3::ONE);
        sim.spawn(Vec3::ONE);
        sim.apply(Command::ClearTrajectories);
        assert_eq!(sim.trajectories().len(), 1);
    }

    #[test]
    fn test_plain_click_spawns_in_free_mode_only() {
        let mut sim = Simulation::new(&config());
        sim.apply(Command::Click {
            position: Vec2::new(600.0, 400.0),
            shift: false,
        });
        assert_eq!(sim.trajectories().len(), 2);

        sim.apply(Command::Click {
            position: Vec2::new(600.0, 400.0),
            shift: true,
        });
        assert_eq!(sim.trajectories().len(), 2);

        sim.apply(Command::ToggleFollow);
        assert!(!sim.spawn_at_screen(Vec2::new(600.0, 400.0)));
        assert_eq!(sim.trajectories().len(), 2);
    }

    #[test]
    fn test_pause_freezes_integration() {
        let mut sim = Simulation::new(&config());
        sim.apply(Command::TogglePause);
        let report = sim.step();
        assert_eq!(report.accepted, 0);
        assert_eq!(sim.trajectories()[0].len(), 1);
        assert!(sim.status_line().contains("paused"));
    }

    #[test]
    fn test_quit_completes_tick() {
        let mut sim = Simulation::new(&config());
        let report = sim.tick([Command::Quit]);
        assert!(report.quit);
        assert_eq!(report.accepted, 1);
        assert_eq!(sim.tick_count(), 1);
    }

    #[test]
    fn test_follow_camera_tracks_newest_trajectory() {
        let mut sim = Simulation::new(&config());
        sim.tick([Command::ToggleFollow]);
        // First update after entry settles without moving the eye
        let report = sim.step();
        assert!(report.camera_updated);
        let head = sim.trajectories()[0].current_position();
        match sim.view_transform() {
            ViewTransform::LookAt { target, .. } => assert_eq!(target, head),
            other => panic!("expected look-at, got {other:?}"),
        }
    }

    #[test]
    fn test_subscribers_see_each_tick() {
        let mut sim = Simulation::new(&config());
        let reader = sim.subscribe();
        assert_eq!(reader.latest().tick, 0);
        sim.step();
        sim.step();
        let snap = reader.latest();
        assert_eq!(snap.tick, 2);
        assert_eq!(snap.heads, sim.state().heads());
    }

    #[test]
    fn test_status_line_mentions_parameters_and_mode() {
        let sim = Simulation::new(&config());
        let line = sim.status_line();
        assert!(line.contains("a: 10.0"));
        assert!(line.contains("b: 28.0"));
        assert!(line.contains("Free"));
    }
}
