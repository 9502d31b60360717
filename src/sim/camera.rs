//! Horizontal camera pan
//!
//! Three sources move the camera, strongest first: manual arrow-key pan,
//! the return-to-slingshot animation, and following a flying bird. The pan
//! always stays within `[0, WORLD_WIDTH - viewport width]`.

use glam::Vec2;

use crate::consts::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pan: f32,
    viewport: Vec2,
    follow_limit: f32,
    /// Pixels per frame while returning to the slingshot
    return_step: Option<f32>,
    following: bool,
}

impl Camera {
    pub fn new(viewport: Vec2, follow_limit: f32) -> Self {
        Self {
            pan: 0.0,
            viewport,
            follow_limit,
            return_step: None,
            following: false,
        }
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn max_pan(&self) -> f32 {
        (WORLD_WIDTH - self.viewport.x).max(0.0)
    }

    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(0.0, self.max_pan());
    }

    pub fn is_animating(&self) -> bool {
        self.return_step.is_some()
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Manual pan by `dx` pixels. Cancels follow and any return animation.
    pub fn pan_by(&mut self, dx: f32) {
        self.following = false;
        self.return_step = None;
        self.set_pan(self.pan + dx);
    }

    /// Start gliding back to the slingshot. No-op while already gliding or
    /// already there.
    pub fn animate_return(&mut self) {
        if self.is_animating() || self.pan <= 0.0 {
            return;
        }
        self.following = false;
        self.return_step =
            Some((self.pan / RETURN_ANIMATION_STEPS).max(MIN_ANIMATION_STEP));
    }

    /// Track a flying bird until the next manual pan or return animation
    pub fn follow(&mut self) {
        self.following = true;
    }

    /// Advance animation or follow by one frame
    pub fn update(&mut self, bird_x: Option<f32>) {
        if let Some(step) = self.return_step {
            self.set_pan(self.pan - step);
            if self.pan <= 0.0 {
                self.return_step = None;
            }
        } else if let (true, Some(x)) = (self.following, bird_x) {
            let target = (x - self.viewport.x / 2.0).min(self.follow_limit);
            if target > self.pan {
                self.set_pan(target);
            }
        }
    }

    /// Screen pixel (y down) to world pixel (y up)
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x + self.pan,
            self.viewport.y - GROUND_THICKNESS - screen.y,
        )
    }

    /// World pixel (y up) to screen pixel (y down)
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            world.x - self.pan,
            self.viewport.y - GROUND_THICKNESS - world.y,
        )
    }
}
