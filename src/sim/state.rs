//! Level session state and world construction
//!
//! A session owns one physics world populated from one level. It lives from
//! the moment a level is shown until it is replaced (next level, retry).

use glam::Vec2;

use super::camera::Camera;
use super::contact::{Pig, PigState};
use crate::consts::*;
use crate::level::{BlockType, Level};
use crate::physics::{BodyHandle, BodySpec, PhysicsWorld};

/// Current phase of a level attempt. "Settling" is not a phase; it is
/// checked every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// A bird sits in the slingshot
    Aiming,
    /// The current bird has been fired
    Flying,
    Won,
    Lost,
}

/// Reported once, on the frame the attempt is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `first_bird`: won with bird #0
    Won { first_bird: bool },
    Lost,
}

/// One of the level's birds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bird {
    /// `None` while queued beside the slingshot
    pub handle: Option<BodyHandle>,
    pub fired: bool,
}

/// A block body and how to draw it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBody {
    pub handle: BodyHandle,
    pub kind: BlockType,
    pub size: Vec2,
}

/// Smoke left where a pig died
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poof {
    pub position: Vec2,
    pub started_ms: f64,
}

/// How the camera opens a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intro {
    /// Start looking at the pigs, glide back after
    /// [`AUTO_CHECK_DELAY_MS`] of unpaused time
    TimedCheck,
    /// Start at `from` and glide back immediately (retry)
    Return { from: f32 },
}

/// Knobs fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub viewport: Vec2,
    pub bird_density: f32,
    pub intro: Intro,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            bird_density: BIRD_DENSITY,
            intro: Intro::TimedCheck,
        }
    }
}

/// Where the loaded bird sits
pub fn slingshot_anchor() -> Vec2 {
    Vec2::new(SLINGSHOT_X, SLINGSHOT_Y)
}

/// One attempt at one level
pub struct LevelSession {
    pub level: Level,
    pub(super) world: Box<dyn PhysicsWorld>,
    pub birds: Vec<Bird>,
    /// Index of the bird in (or last fired from) the slingshot
    pub current: usize,
    pub pigs: Vec<Pig>,
    pub blocks: Vec<BlockBody>,
    pub phase: GamePhase,
    pub paused: bool,
    /// Cursor in world pixels while the loaded bird is being dragged
    pub drag: Option<Vec2>,
    pub camera: Camera,
    pub poofs: Vec<Poof>,
    pub(super) bird_density: f32,
    pub(super) pending_removal: Vec<BodyHandle>,
    /// Unpaused milliseconds since the session started
    pub(super) clock_ms: f64,
    pub(super) last_frame_ms: Option<f64>,
    pub(super) auto_check_at: Option<f64>,
}

impl LevelSession {
    /// Populate `world` from `level` and load bird #0
    pub fn new(level: Level, mut world: Box<dyn PhysicsWorld>, options: SessionOptions) -> Self {
        add_world_bounds(world.as_mut());

        let data = &level.data;
        let pigs = data
            .pigs
            .iter()
            .map(|p| {
                let home = data.to_world(p.x, p.y);
                let spec = BodySpec::dynamic_circle(home, PIG_RADIUS)
                    .density(PIG_DENSITY)
                    .damping(0.0, PIG_ANGULAR_DAMPING);
                Pig {
                    handle: world.add_body(&spec),
                    state: PigState::Healthy,
                    home,
                }
            })
            .collect();
        let blocks = data
            .blocks
            .iter()
            .map(|b| {
                let spec = BodySpec::dynamic_box(data.to_world(b.x, b.y), b.w, b.h)
                    .density(b.kind.density())
                    .friction(BLOCK_FRICTION);
                BlockBody {
                    handle: world.add_body(&spec),
                    kind: b.kind,
                    size: Vec2::new(b.w, b.h),
                }
            })
            .collect();

        let mut camera = Camera::new(options.viewport, data.follow_limit(options.viewport.x));
        let auto_check_at = match options.intro {
            Intro::TimedCheck => {
                camera.set_pan(data.follow_limit(options.viewport.x));
                Some(AUTO_CHECK_DELAY_MS)
            }
            Intro::Return { from } => {
                camera.set_pan(from);
                camera.animate_return();
                None
            }
        };

        log::info!(
            "Level {:?} {} loaded: {} birds, {} pigs, {} blocks",
            level.desc.kind,
            level.desc.number,
            data.birds,
            data.pigs.len(),
            data.blocks.len()
        );

        let mut session = Self {
            birds: vec![Bird::default(); data.birds.max(MIN_BIRDS) as usize],
            current: 0,
            pigs,
            blocks,
            phase: GamePhase::Aiming,
            paused: false,
            drag: None,
            camera,
            poofs: Vec::new(),
            bird_density: options.bird_density,
            pending_removal: Vec::new(),
            clock_ms: 0.0,
            last_frame_ms: None,
            auto_check_at,
            world,
            level,
        };
        session.load_bird(0);
        session
    }

    /// Put bird `index` in the slingshot as a static body
    pub(super) fn load_bird(&mut self, index: usize) {
        let spec = BodySpec::fixed_circle(slingshot_anchor(), BIRD_RADIUS);
        self.birds[index].handle = Some(self.world.add_body(&spec));
        self.current = index;
    }

    pub fn world(&self) -> &dyn PhysicsWorld {
        self.world.as_ref()
    }

    pub fn alive_pigs(&self) -> impl Iterator<Item = &Pig> {
        self.pigs.iter().filter(|p| p.is_alive())
    }

    /// Birds not yet loaded into the slingshot
    pub fn queued_birds(&self) -> usize {
        self.birds.len() - self.current - 1
    }

    /// Bird in the slingshot, if it hasn't been fired yet
    pub fn loaded_bird(&self) -> Option<&Bird> {
        self.birds.get(self.current).filter(|b| !b.fired)
    }

    /// World position of the current bird once fired
    pub fn flying_bird_position(&self) -> Option<Vec2> {
        let bird = self.birds.get(self.current).filter(|b| b.fired)?;
        self.world.pose(bird.handle?).map(|p| p.position)
    }

    /// Every fired bird, every block and every live pig is at rest.
    /// Birds still in the slingshot or the queue don't count.
    pub fn has_stabilized(&self) -> bool {
        let birds = self
            .birds
            .iter()
            .filter(|b| b.fired)
            .filter_map(|b| b.handle);
        let blocks = self.blocks.iter().map(|b| b.handle);
        let pigs = self.alive_pigs().map(|p| p.handle);
        birds
            .chain(blocks)
            .chain(pigs)
            .all(|h| self.world.is_resting(h))
    }
}

/// Ground, side walls and ceiling. Everything that moves ends up at rest
/// somewhere inside them.
fn add_world_bounds(world: &mut dyn PhysicsWorld) {
    const WALL: f32 = 20.0;
    let half = WALL / 2.0;
    let bounds = [
        BodySpec::fixed_box(
            Vec2::new(WORLD_WIDTH / 2.0, -GROUND_THICKNESS / 2.0),
            WORLD_WIDTH + 2.0 * WALL,
            GROUND_THICKNESS,
        )
        .friction(GROUND_FRICTION),
        BodySpec::fixed_box(Vec2::new(-half, WORLD_HEIGHT / 2.0), WALL, WORLD_HEIGHT),
        BodySpec::fixed_box(
            Vec2::new(WORLD_WIDTH + half, WORLD_HEIGHT / 2.0),
            WALL,
            WORLD_HEIGHT,
        ),
        BodySpec::fixed_box(
            Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT + half),
            WORLD_WIDTH + 2.0 * WALL,
            WALL,
        ),
    ];
    for spec in &bounds {
        world.add_body(spec);
    }
}
