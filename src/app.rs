//! Application context and top-level driver
//!
//! [`AppContext`] is everything layers share (levels, settings, input
//! state, clock). It is built once at boot and lives as long as the app.
//! [`App`] ties it to the navigation stack and the router.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::consts::*;
use crate::draw::DrawList;
use crate::input::{InputEvent, KeyState};
use crate::level::LevelStore;
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::physics::{PhysicsFactory, PhysicsWorld, rapier_factory};
use crate::router::{RouteSink, Router, route_app};
use crate::screens;
use crate::settings::Settings;
use crate::view::{LayerFactory, LayerKind, Navigator};

/// Shared application state
pub struct AppContext {
    pub levels: LevelStore,
    pub settings: Settings,
    pub keys: KeyState,
    /// Last known pointer position, canvas pixels
    pub pointer: Vec2,
    /// Wall clock of the current frame
    pub now_ms: f64,
    pub viewport: Vec2,
    physics: PhysicsFactory,
}

impl AppContext {
    pub fn new(storage: Box<dyn KeyValueStore>, physics: PhysicsFactory) -> Self {
        let settings = Settings::load(storage.as_ref());
        Self {
            levels: LevelStore::new(storage),
            settings,
            keys: KeyState::default(),
            pointer: Vec2::ZERO,
            now_ms: 0.0,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            physics,
        }
    }

    /// Volatile storage, rapier physics
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), rapier_factory())
    }

    /// A fresh, empty physics world
    pub fn new_world(&self) -> Box<dyn PhysicsWorld> {
        (self.physics)()
    }

    pub fn save_settings(&mut self) {
        self.settings.save(self.levels.storage());
    }

    /// Whether the max-density toggle can be used
    pub fn max_density_allowed(&self) -> bool {
        self.levels.all_levels_starred()
    }

    /// Density of launched birds
    pub fn bird_density(&self) -> f32 {
        if self
            .settings
            .effective_max_density(self.max_density_allowed())
        {
            BIRD_MAX_DENSITY
        } else {
            BIRD_DENSITY
        }
    }
}

/// The running game
pub struct App {
    ctx: AppContext,
    nav: Navigator,
    router: Rc<RefCell<Router>>,
}

impl App {
    /// Rebuild the stack for `route` and schedule layer preloading
    pub fn boot(ctx: AppContext, route: &str, sink: Box<dyn RouteSink>) -> Self {
        Self::with_layers(ctx, route, sink, Box::new(screens::build_layer))
    }

    pub fn with_layers(
        mut ctx: AppContext,
        route: &str,
        sink: Box<dyn RouteSink>,
        layers: LayerFactory,
    ) -> Self {
        let mut nav = Navigator::new(layers);
        let router = Rc::new(RefCell::new(Router::new(sink)));
        route_app(&mut nav, &mut ctx, router.clone(), route);
        nav.schedule_preload(&LayerKind::ALL, ctx.now_ms);
        Self { ctx, nav, router }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    /// The current route
    pub fn route(&self) -> String {
        self.router.borrow().route().to_string()
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.ctx.pointer = pos;
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        self.ctx.keys.apply(&event);
        if let InputEvent::PointerDown(pos) | InputEvent::PointerUp(pos) = event {
            self.ctx.pointer = pos;
        }
        self.nav.dispatch(&mut self.ctx, &event);
    }

    /// Update and draw one displayed frame
    pub fn frame(&mut self, now_ms: f64) -> DrawList {
        self.ctx.now_ms = now_ms;
        self.nav.update(&mut self.ctx);
        let mut out = DrawList::new();
        self.nav.draw(&self.ctx, &mut out);
        out
    }
}
