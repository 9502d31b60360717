//! Rigid-body physics capability
//!
//! The game talks to the engine only through [`PhysicsWorld`]. Coordinates
//! are world pixels with y pointing up; the adapter converts to engine units.
//!
//! Contacts are reported from inside [`PhysicsWorld::step`] through a
//! callback that cannot reach the world (it is mutably borrowed by the step),
//! so removals must be queued and applied after `step` returns.

pub mod rapier;

#[cfg(test)]
pub(crate) mod testing;

use glam::Vec2;

pub use rapier::RapierWorld;

/// Pixels per meter
pub const PIXELS_PER_METER: f32 = 100.0;
/// Gravity in m/s²
pub const GRAVITY: f32 = -9.81;
/// Bodies slower than this (m/s) count as resting
pub const REST_LINEAR_EPSILON: f32 = 0.05;
/// Bodies spinning slower than this (rad/s) count as resting
pub const REST_ANGULAR_EPSILON: f32 = 0.05;
/// Consecutive calm steps before a moving body counts as resting
pub const REST_STEPS: u32 = 15;
/// Contacts weaker than this (N·s) are not reported
pub const CONTACT_REPORT_MIN_IMPULSE: f32 = 0.5;

/// Opaque handle to a body owned by a [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Collision shape (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { w: f32, h: f32 },
    Circle { r: f32 },
}

/// Everything needed to create a body. Shape and density are fixed for the
/// lifetime of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub shape: Shape,
    pub fixed: bool,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Center, world pixels
    pub position: Vec2,
    /// Initial velocity, pixels/s
    pub velocity: Vec2,
}

impl BodySpec {
    fn new(shape: Shape, fixed: bool, position: Vec2) -> Self {
        Self {
            shape,
            fixed,
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn fixed_box(position: Vec2, w: f32, h: f32) -> Self {
        Self::new(Shape::Box { w, h }, true, position)
    }

    pub fn dynamic_box(position: Vec2, w: f32, h: f32) -> Self {
        Self::new(Shape::Box { w, h }, false, position)
    }

    pub fn fixed_circle(position: Vec2, r: f32) -> Self {
        Self::new(Shape::Circle { r }, true, position)
    }

    pub fn dynamic_circle(position: Vec2, r: f32) -> Self {
        Self::new(Shape::Circle { r }, false, position)
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Position and rotation of a body (world pixels, radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

/// A contact reported during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Total normal impulse over the step (N·s)
    pub normal_impulse: f32,
}

/// The physics capability the game consumes
pub trait PhysicsWorld {
    fn add_body(&mut self, spec: &BodySpec) -> BodyHandle;

    /// Removing an unknown or already removed handle is a no-op
    fn remove_body(&mut self, handle: BodyHandle);

    /// Advance exactly `dt` seconds, reporting contacts above
    /// [`CONTACT_REPORT_MIN_IMPULSE`]
    fn step(&mut self, dt: f32, on_contact: &mut dyn FnMut(Contact));

    /// Both linear and angular speed (and the actual displacement) have
    /// stayed below the rest epsilons for [`REST_STEPS`] steps, or the
    /// engine put the body to sleep. Removed handles count as resting.
    fn is_resting(&self, handle: BodyHandle) -> bool;

    /// Current pose, `None` once removed
    fn pose(&self, handle: BodyHandle) -> Option<Pose>;
}

/// Builds a fresh, empty world
pub type PhysicsFactory = Box<dyn Fn() -> Box<dyn PhysicsWorld>>;

/// Factory for the default engine
pub fn rapier_factory() -> PhysicsFactory {
    Box::new(|| Box::new(RapierWorld::new()))
}
