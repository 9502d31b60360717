//! Level simulation
//!
//! Everything that happens inside one level attempt: aiming, launching,
//! contact damage, settling, win/loss and the camera. No rendering or
//! platform dependencies; physics is reached only through
//! [`PhysicsWorld`](crate::physics::PhysicsWorld).

pub mod camera;
pub mod contact;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use contact::{Impact, Pig, PigState};
pub use state::{
    Bird, BlockBody, GamePhase, Intro, LevelSession, Outcome, Poof, SessionOptions,
    slingshot_anchor,
};
pub use tick::FrameInput;
