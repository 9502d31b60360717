//! Per-frame session update
//!
//! One call per displayed frame: camera, timers, at most one physics step,
//! deferred removals, then win/loss resolution.

use glam::Vec2;

use super::contact::apply_contact;
use super::state::{GamePhase, LevelSession, Outcome, Poof, slingshot_anchor};
use crate::clamp_pull;
use crate::consts::*;
use crate::physics::BodySpec;

/// Player input sampled for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Manual pan this frame (pixels, negative = left)
    pub pan: f32,
    /// Pointer position, world pixels
    pub cursor: Option<Vec2>,
}

impl LevelSession {
    /// Advance the session by one frame at wall-clock `now_ms`
    pub fn update(&mut self, now_ms: f64, input: FrameInput) -> Option<Outcome> {
        let elapsed = self.last_frame_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_frame_ms = Some(now_ms);
        self.poofs.retain(|p| now_ms - p.started_ms < POOF_MS);

        if input.pan != 0.0 {
            self.camera.pan_by(input.pan);
            if self.auto_check_at.take().is_some() {
                log::debug!("Timed check cancelled by manual pan");
            }
        }
        if let (Some(_), Some(cursor)) = (self.drag, input.cursor) {
            self.drag = Some(cursor);
        }

        if self.paused {
            return None;
        }
        self.clock_ms += elapsed;

        if self.auto_check_at.is_some_and(|at| self.clock_ms >= at) {
            self.auto_check_at = None;
            self.camera.animate_return();
        }
        if input.pan == 0.0 {
            let bird_x = self.flying_bird_position().map(|p| p.x);
            self.camera.update(bird_x);
        }

        self.step_physics(now_ms);
        self.resolve()
    }

    fn step_physics(&mut self, now_ms: f64) {
        let pigs = &mut self.pigs;
        let pending = &mut self.pending_removal;
        self.world.step(SIM_DT, &mut |contact| {
            apply_contact(pigs, contact, pending);
        });

        for handle in std::mem::take(&mut self.pending_removal) {
            if let Some(pose) = self.world.pose(handle) {
                self.poofs.push(Poof {
                    position: pose.position,
                    started_ms: now_ms,
                });
            }
            self.world.remove_body(handle);
        }
    }

    fn resolve(&mut self) -> Option<Outcome> {
        if self.drag.is_some()
            || matches!(self.phase, GamePhase::Won | GamePhase::Lost)
            || !self.has_stabilized()
        {
            return None;
        }

        let fired = self.birds[self.current].fired;
        if self.alive_pigs().next().is_none() {
            self.phase = GamePhase::Won;
            let first_bird = self.current == 0;
            log::info!("Level won (first bird: {})", first_bird);
            Some(Outcome::Won { first_bird })
        } else if fired && self.current + 1 == self.birds.len() {
            self.phase = GamePhase::Lost;
            log::info!("Level lost");
            Some(Outcome::Lost)
        } else {
            if fired {
                self.load_bird(self.current + 1);
                self.phase = GamePhase::Aiming;
                self.camera.animate_return();
            }
            None
        }
    }

    /// Start dragging if `world` is on the loaded bird
    pub fn pointer_down(&mut self, world: Vec2) -> bool {
        if self.paused || self.phase != GamePhase::Aiming || self.loaded_bird().is_none() {
            return false;
        }
        if world.distance(slingshot_anchor()) > BIRD_RADIUS {
            return false;
        }
        self.drag = Some(world);
        true
    }

    /// Release the drag, launching the loaded bird
    pub fn pointer_up(&mut self, world: Vec2) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.launch(world);
        true
    }

    /// Pull vector of the current drag, clamped
    pub fn pull(&self) -> Option<Vec2> {
        self.drag
            .map(|cursor| clamp_pull(slingshot_anchor() - cursor, MAX_PULL))
    }

    fn launch(&mut self, cursor: Vec2) {
        let velocity = clamp_pull(slingshot_anchor() - cursor, MAX_PULL) * LAUNCH_POWER;
        let bird = &mut self.birds[self.current];
        if let Some(handle) = bird.handle.take() {
            self.world.remove_body(handle);
        }
        let spec = BodySpec::dynamic_circle(slingshot_anchor(), BIRD_RADIUS)
            .density(self.bird_density)
            .restitution(BIRD_RESTITUTION)
            .damping(BIRD_LINEAR_DAMPING, BIRD_ANGULAR_DAMPING)
            .velocity(velocity);
        bird.handle = Some(self.world.add_body(&spec));
        bird.fired = true;
        self.phase = GamePhase::Flying;
        self.camera.follow();
        log::debug!("Bird {} launched at {:?}", self.current, velocity);
    }

    /// Skip ahead without waiting for the world to settle: glide the camera
    /// back and load the next bird. Does nothing once the last bird is in
    /// the air, and never replaces a bird still in the slingshot. Returns
    /// whether a new bird was loaded.
    pub fn next_bird(&mut self) -> bool {
        if self.paused || matches!(self.phase, GamePhase::Won | GamePhase::Lost) {
            return false;
        }
        let last = self.current + 1 == self.birds.len();
        let fired = self.birds[self.current].fired;
        if last && fired {
            return false;
        }
        self.camera.animate_return();
        if last || !fired {
            return false;
        }
        self.load_bird(self.current + 1);
        self.phase = GamePhase::Aiming;
        log::debug!("Skipped to bird {}", self.current);
        true
    }

    /// Toggle pause. Cancels any drag in progress.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Level, LevelData, LevelDescriptor, Point};
    use crate::physics::testing::KinematicWorld;
    use crate::sim::{Intro, PigState, SessionOptions};

    /// 3 birds, one pig hovering level with the slingshot
    fn level(pig: Vec2) -> Level {
        Level {
            desc: LevelDescriptor::custom(1),
            data: LevelData {
                start: 0.0,
                birds: 3,
                pigs: vec![Point { x: pig.x, y: pig.y }],
                blocks: Vec::new(),
            },
        }
    }

    fn session_with(pig: Vec2, intro: Intro) -> LevelSession {
        LevelSession::new(
            level(pig),
            Box::new(KinematicWorld::new()),
            SessionOptions {
                intro,
                ..Default::default()
            },
        )
    }

    fn session() -> LevelSession {
        session_with(Vec2::new(400.0, SLINGSHOT_Y), Intro::Return { from: 0.0 })
    }

    /// Frames at 60 Hz
    fn run(session: &mut LevelSession, frames: u32, t: &mut f64) -> Option<Outcome> {
        let mut outcome = None;
        for _ in 0..frames {
            *t += 1000.0 / 60.0;
            if let Some(o) = session.update(*t, FrameInput::default()) {
                assert!(outcome.is_none(), "outcome reported twice");
                outcome = Some(o);
            }
        }
        outcome
    }

    fn fire(session: &mut LevelSession, cursor: Vec2) {
        assert!(session.pointer_down(slingshot_anchor()));
        assert!(session.pointer_up(cursor));
    }

    #[test]
    fn test_direct_hit_wins_with_first_bird() {
        let mut s = session();
        let mut t = 0.0;
        assert_eq!(s.phase, GamePhase::Aiming);
        assert_eq!(s.queued_birds(), 2);

        fire(&mut s, slingshot_anchor() - Vec2::new(MAX_PULL, 0.0));
        assert_eq!(s.phase, GamePhase::Flying);

        let outcome = run(&mut s, 120, &mut t);
        assert_eq!(outcome, Some(Outcome::Won { first_bird: true }));
        assert_eq!(s.phase, GamePhase::Won);
        assert_eq!(s.alive_pigs().count(), 0);
    }

    #[test]
    fn test_three_misses_lose() {
        let mut s = session_with(Vec2::new(1500.0, 30.0), Intro::Return { from: 0.0 });
        let mut t = 0.0;
        // Straight up, nowhere near the pig
        let up = slingshot_anchor() - Vec2::new(0.0, MAX_PULL);

        for bird in 0..2 {
            fire(&mut s, up);
            assert_eq!(run(&mut s, 120, &mut t), None);
            assert_eq!(s.current, bird + 1);
            assert_eq!(s.phase, GamePhase::Aiming);
        }
        fire(&mut s, up);
        assert_eq!(run(&mut s, 120, &mut t), Some(Outcome::Lost));
        assert_eq!(s.phase, GamePhase::Lost);
        assert_eq!(s.alive_pigs().count(), 1);
    }

    #[test]
    fn test_miss_then_hit_is_not_first_bird() {
        let mut s = session();
        let mut t = 0.0;
        fire(&mut s, slingshot_anchor() - Vec2::new(0.0, MAX_PULL));
        run(&mut s, 120, &mut t);
        assert_eq!(s.current, 1);

        fire(&mut s, slingshot_anchor() - Vec2::new(MAX_PULL, 0.0));
        assert_eq!(
            run(&mut s, 120, &mut t),
            Some(Outcome::Won { first_bird: false })
        );
    }

    #[test]
    fn test_soft_hit_squishes() {
        let mut s = session();
        let mut t = 0.0;
        // A weaker shot arrives with squish-level speed
        fire(&mut s, slingshot_anchor() - Vec2::new(120.0, 0.0));
        run(&mut s, 120, &mut t);
        assert_eq!(s.pigs[0].state, PigState::Squished);
        assert_eq!(s.phase, GamePhase::Aiming);
        assert_eq!(s.current, 1);
    }

    #[test]
    fn test_has_stabilized_ignores_loaded_bird() {
        let mut s = session();
        assert!(s.has_stabilized());

        fire(&mut s, slingshot_anchor() - Vec2::new(0.0, MAX_PULL));
        assert!(!s.has_stabilized());

        let mut t = 0.0;
        run(&mut s, 120, &mut t);
        assert!(s.has_stabilized());
    }

    #[test]
    fn test_pause_blocks_aiming_and_stepping() {
        let mut s = session();
        s.toggle_pause();
        assert!(!s.pointer_down(slingshot_anchor()));

        let mut t = 0.0;
        run(&mut s, 10, &mut t);
        // Nothing stepped: the bird is still waiting
        assert_eq!(s.phase, GamePhase::Aiming);

        s.toggle_pause();
        assert!(s.pointer_down(slingshot_anchor()));
    }

    #[test]
    fn test_pointer_down_off_bird_is_ignored() {
        let mut s = session();
        assert!(!s.pointer_down(slingshot_anchor() + Vec2::new(BIRD_RADIUS + 1.0, 0.0)));
        assert!(!s.pointer_up(slingshot_anchor()));
        assert_eq!(s.phase, GamePhase::Aiming);
    }

    #[test]
    fn test_drag_follows_cursor_and_clamps() {
        let mut s = session();
        assert!(s.pointer_down(slingshot_anchor()));
        s.update(
            0.0,
            FrameInput {
                cursor: Some(slingshot_anchor() + Vec2::new(100.0, -1000.0)),
                ..Default::default()
            },
        );
        let pull = s.pull().unwrap();
        // Backwards component dropped, length clamped
        assert_eq!(pull.x, 0.0);
        assert!((pull.length() - MAX_PULL).abs() < 1e-3);
        // No resolution while dragging
        assert_eq!(s.phase, GamePhase::Aiming);
    }

    #[test]
    fn test_timed_check_returns_camera_after_delay() {
        let mut s = session_with(Vec2::new(1500.0, 30.0), Intro::TimedCheck);
        let start = s.camera.pan();
        assert!(start > 0.0);

        let mut t = 0.0;
        run(&mut s, 60, &mut t);
        assert_eq!(s.camera.pan(), start);

        // Pausing freezes the timer
        s.toggle_pause();
        run(&mut s, 120, &mut t);
        s.toggle_pause();
        run(&mut s, 30, &mut t);
        assert_eq!(s.camera.pan(), start);

        run(&mut s, 120, &mut t);
        assert!(s.camera.pan() < start);
    }

    #[test]
    fn test_manual_pan_cancels_timed_check() {
        let mut s = session_with(Vec2::new(1500.0, 30.0), Intro::TimedCheck);
        s.update(
            0.0,
            FrameInput {
                pan: -PAN_SPEED,
                ..Default::default()
            },
        );
        let panned = s.camera.pan();

        let mut t = 0.0;
        run(&mut s, 600, &mut t);
        assert_eq!(s.camera.pan(), panned);
    }

    #[test]
    fn test_retry_intro_returns_immediately() {
        let mut s = session_with(Vec2::new(1500.0, 30.0), Intro::Return { from: 500.0 });
        assert!(s.camera.is_animating());
        let mut t = 0.0;
        run(&mut s, RETURN_ANIMATION_STEPS as u32, &mut t);
        assert_eq!(s.camera.pan(), 0.0);
    }

    #[test]
    fn test_next_bird_skips_settling() {
        let mut s = session_with(Vec2::new(1500.0, 30.0), Intro::Return { from: 0.0 });
        let mut t = 0.0;

        // A bird already in the slingshot stays put
        assert!(!s.next_bird());
        assert_eq!(s.current, 0);

        fire(&mut s, slingshot_anchor() - Vec2::new(MAX_PULL, 0.0));
        run(&mut s, 5, &mut t);
        assert!(!s.has_stabilized());
        s.camera.set_pan(300.0);

        assert!(s.next_bird());
        assert_eq!(s.current, 1);
        assert_eq!(s.phase, GamePhase::Aiming);
        assert!(s.camera.is_animating());
        assert!(s.pointer_down(slingshot_anchor()));
        s.drag = None;

        // Twice in a row does not skip the bird just loaded
        assert!(!s.next_bird());
        assert_eq!(s.current, 1);
    }

    #[test]
    fn test_next_bird_ignored_once_last_bird_flies() {
        let mut s = session_with(Vec2::new(1500.0, 30.0), Intro::Return { from: 0.0 });
        let mut t = 0.0;
        let up = slingshot_anchor() - Vec2::new(0.0, MAX_PULL);
        for _ in 0..2 {
            fire(&mut s, up);
            assert!(s.next_bird());
        }
        assert_eq!(s.current, 2);
        fire(&mut s, up);
        assert!(!s.next_bird());
        assert_eq!(s.current, 2);
        assert_eq!(s.phase, GamePhase::Flying);
        assert_eq!(run(&mut s, 120, &mut t), Some(Outcome::Lost));
    }

    #[test]
    fn test_killed_pig_leaves_world_after_step() {
        let mut s = session();
        let pig = s.pigs[0].handle;
        let mut t = 0.0;
        fire(&mut s, slingshot_anchor() - Vec2::new(MAX_PULL, 0.0));
        run(&mut s, 30, &mut t);
        assert!(s.world().pose(pig).is_none());
        assert!(s.world().is_resting(pig));
        assert_eq!(s.poofs.len(), 1);

        // The poof fades
        run(&mut s, 60, &mut t);
        assert!(s.poofs.is_empty());
    }
}
