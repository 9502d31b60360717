//! Screens, layers and the navigation stack
//!
//! A screen is a navigable destination made of an ordered list of layers
//! (bottom to top). Layers are singletons: one instance per [`LayerKind`],
//! shared by every screen that composes it. The [`Navigator`] owns the stack
//! of frames and the layer registry, and dispatches draw/update/input to the
//! active frame.
//!
//! Handlers never touch the stack directly. They queue [`NavRequest`]s on
//! their [`Cx`], which the navigator applies as soon as the handler returns.

pub mod registry;
pub mod stack;

pub use registry::{LayerFactory, LayerRegistry};
pub use stack::{Frame, Navigator, RouteAction};

use crate::app::AppContext;
use crate::draw::DrawList;
use crate::input::{InputEvent, Propagation};
use crate::level::{LevelDescriptor, LevelKind};

/// Screen type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    MainMenu,
    LevelSelect,
    LevelEditor,
    Game,
}

impl ScreenKind {
    /// Layers a fresh frame of this screen starts with, bottom to top
    pub fn composition(self) -> &'static [LayerKind] {
        match self {
            ScreenKind::MainMenu => &[LayerKind::Title, LayerKind::MainMenu],
            ScreenKind::LevelSelect => &[
                LayerKind::Title,
                LayerKind::LevelSelect,
                LayerKind::BackButton,
            ],
            ScreenKind::LevelEditor => &[LayerKind::LevelEditor, LayerKind::BackButton],
            ScreenKind::Game => &[LayerKind::Game, LayerKind::BackButton],
        }
    }

    /// The layer that receives `on_show` and can never be removed
    pub fn main_layer(self) -> LayerKind {
        match self {
            ScreenKind::MainMenu => LayerKind::MainMenu,
            ScreenKind::LevelSelect => LayerKind::LevelSelect,
            ScreenKind::LevelEditor => LayerKind::LevelEditor,
            ScreenKind::Game => LayerKind::Game,
        }
    }
}

/// Layer type tags (one singleton instance each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Title,
    MainMenu,
    Instructions,
    LevelSelect,
    LevelEditor,
    OpenDialog,
    Game,
    BackButton,
}

impl LayerKind {
    pub const ALL: [LayerKind; 8] = [
        LayerKind::Title,
        LayerKind::MainMenu,
        LayerKind::Instructions,
        LayerKind::LevelSelect,
        LayerKind::LevelEditor,
        LayerKind::OpenDialog,
        LayerKind::Game,
        LayerKind::BackButton,
    ];
}

/// Where to navigate, with whatever the screen needs to show it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    MainMenu,
    LevelSelect,
    /// Custom level number
    LevelEditor(u32),
    Game(LevelDescriptor),
}

impl Destination {
    pub fn screen(&self) -> ScreenKind {
        match self {
            Destination::MainMenu => ScreenKind::MainMenu,
            Destination::LevelSelect => ScreenKind::LevelSelect,
            Destination::LevelEditor(_) => ScreenKind::LevelEditor,
            Destination::Game(_) => ScreenKind::Game,
        }
    }

    /// Route label for a frame showing this destination
    pub fn label(&self) -> String {
        match self {
            Destination::MainMenu => String::new(),
            Destination::LevelSelect => "levels".to_string(),
            Destination::LevelEditor(n) => format!("edit/{}", n),
            Destination::Game(desc) => match desc.kind {
                LevelKind::Standard => desc.number.to_string(),
                LevelKind::Custom => format!("custom-{}", desc.number),
            },
        }
    }
}

/// Position for [`Cx::insert_layer`], relative to a layer already in the
/// active frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Before(LayerKind),
    After(LayerKind),
}

/// Queued stack mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRequest {
    Push(Destination),
    Pop,
    ResetTop(Destination),
    InsertLayer(LayerKind, Anchor),
    RemoveLayer(LayerKind),
}

/// What a layer handler gets to work with
pub struct Cx<'a> {
    pub ctx: &'a mut AppContext,
    requests: &'a mut Vec<NavRequest>,
}

impl<'a> Cx<'a> {
    pub fn new(ctx: &'a mut AppContext, requests: &'a mut Vec<NavRequest>) -> Self {
        Self { ctx, requests }
    }

    pub fn push(&mut self, dest: Destination) {
        self.requests.push(NavRequest::Push(dest));
    }

    pub fn pop(&mut self) {
        self.requests.push(NavRequest::Pop);
    }

    /// Re-show the active screen with a new destination
    pub fn reset_top(&mut self, dest: Destination) {
        self.requests.push(NavRequest::ResetTop(dest));
    }

    pub fn insert_layer(&mut self, kind: LayerKind, anchor: Anchor) {
        self.requests.push(NavRequest::InsertLayer(kind, anchor));
    }

    pub fn remove_layer(&mut self, kind: LayerKind) {
        self.requests.push(NavRequest::RemoveLayer(kind));
    }
}

/// A drawable, input-handling unit
pub trait Layer {
    fn draw(&self, ctx: &AppContext, out: &mut DrawList);

    /// Once per frame, before drawing
    fn update(&mut self, _cx: &mut Cx) {}

    fn handle_event(&mut self, _event: &InputEvent, _cx: &mut Cx) -> Propagation {
        Propagation::Continue
    }

    /// Called on a screen's main layer when it is pushed or reset
    fn on_show(&mut self, _dest: &Destination, _cx: &mut Cx) {}
}
