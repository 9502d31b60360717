//! The navigation stack

use super::{
    Anchor, Cx, Destination, LayerFactory, LayerKind, LayerRegistry, NavRequest, ScreenKind,
};
use crate::app::AppContext;
use crate::consts::PRELOAD_DELAY_MS;
use crate::draw::DrawList;
use crate::input::{InputEvent, Propagation};

/// Stack change, as told to observers (the router)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    Push(String),
    Replace(String),
    Pop,
}

/// One entry on the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub screen: ScreenKind,
    /// Bottom to top
    pub layers: Vec<LayerKind>,
    pub label: String,
    /// Unique per push
    id: u64,
}

type Observer = Box<dyn FnMut(&RouteAction)>;

struct Preload {
    kinds: Vec<LayerKind>,
    due_ms: f64,
}

pub struct Navigator {
    stack: Vec<Frame>,
    registry: LayerRegistry,
    observers: Vec<Observer>,
    preload: Option<Preload>,
    next_id: u64,
}

impl Navigator {
    pub fn new(factory: LayerFactory) -> Self {
        Self {
            stack: Vec::new(),
            registry: LayerRegistry::new(factory),
            observers: Vec::new(),
            preload: None,
            next_id: 1,
        }
    }

    /// Be told about every push, pop and reset
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn notify(&mut self, action: RouteAction) {
        for observer in &mut self.observers {
            observer(&action);
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.stack
    }

    fn top(&self) -> &Frame {
        match self.stack.last() {
            Some(frame) => frame,
            None => panic!("navigation stack is empty"),
        }
    }

    fn top_mut(&mut self) -> &mut Frame {
        match self.stack.last_mut() {
            Some(frame) => frame,
            None => panic!("navigation stack is empty"),
        }
    }

    /// Screen of the active frame
    pub fn top_screen(&self) -> ScreenKind {
        self.top().screen
    }

    /// Layers of the active frame, bottom to top
    pub fn active_layers(&self) -> &[LayerKind] {
        &self.top().layers
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// Push a frame for `dest` and show it
    pub fn push(&mut self, ctx: &mut AppContext, dest: Destination) {
        let screen = dest.screen();
        let layers = screen.composition().to_vec();
        for &kind in &layers {
            self.registry.ensure(kind);
        }
        let label = dest.label();
        log::info!("Push {:?} {:?}", screen, label);
        self.stack.push(Frame {
            screen,
            layers,
            label: label.clone(),
            id: self.next_id,
        });
        self.next_id += 1;
        self.notify(RouteAction::Push(label));
        self.show(ctx, &dest);
    }

    /// Drop the active frame. The frame below resumes exactly as it was
    /// left; nothing is re-shown.
    pub fn pop(&mut self) {
        assert!(self.stack.len() > 1, "cannot pop root");
        if let Some(frame) = self.stack.pop() {
            log::info!("Pop {:?}", frame.screen);
        }
        self.notify(RouteAction::Pop);
    }

    /// Re-show the active screen with `dest`, keeping the depth
    pub fn reset_top(&mut self, ctx: &mut AppContext, dest: Destination) {
        let screen = self.top_screen();
        assert!(
            dest.screen() == screen,
            "cannot reset {:?} with {:?}",
            screen,
            dest
        );
        let label = dest.label();
        log::info!("Reset {:?} {:?}", screen, label);
        self.top_mut().label = label.clone();
        self.notify(RouteAction::Replace(label));
        self.show(ctx, &dest);
    }

    fn show(&mut self, ctx: &mut AppContext, dest: &Destination) {
        let mut requests = Vec::new();
        self.registry
            .get_mut(dest.screen().main_layer())
            .on_show(dest, &mut Cx::new(ctx, &mut requests));
        self.apply(ctx, requests);
    }

    /// Insert `kind` into the active frame next to an existing layer
    pub fn insert_layer(&mut self, kind: LayerKind, anchor: Anchor) {
        self.registry.ensure(kind);
        let layers = &mut self.top_mut().layers;
        assert!(
            !layers.contains(&kind),
            "layer {:?} is already in the active frame",
            kind
        );
        let (target, offset) = match anchor {
            Anchor::Before(target) => (target, 0),
            Anchor::After(target) => (target, 1),
        };
        let Some(index) = layers.iter().position(|&l| l == target) else {
            panic!("layer {:?} not in the active frame", target);
        };
        layers.insert(index + offset, kind);
    }

    /// Remove a non-main layer from the active frame
    pub fn remove_layer(&mut self, kind: LayerKind) {
        let frame = self.top_mut();
        assert!(frame.layers.len() > 1, "must leave at least one layer");
        assert!(
            kind != frame.screen.main_layer(),
            "cannot remove the main layer of {:?}",
            frame.screen
        );
        let Some(index) = frame.layers.iter().position(|&l| l == kind) else {
            panic!("layer {:?} not in the active frame", kind);
        };
        frame.layers.remove(index);
    }

    /// Apply queued requests in order. Requests queued while applying one
    /// (by `on_show`) are applied before the next.
    pub fn apply(&mut self, ctx: &mut AppContext, requests: Vec<NavRequest>) {
        for request in requests {
            match request {
                NavRequest::Push(dest) => self.push(ctx, dest),
                NavRequest::Pop => self.pop(),
                NavRequest::ResetTop(dest) => self.reset_top(ctx, dest),
                NavRequest::InsertLayer(kind, anchor) => self.insert_layer(kind, anchor),
                NavRequest::RemoveLayer(kind) => self.remove_layer(kind),
            }
        }
    }

    /// Send `event` to the active frame, top layer first.
    ///
    /// Works from a snapshot of the layer list: layers inserted by a handler
    /// wait for the next event, layers removed by a handler are skipped, and
    /// dispatch ends if the active frame changes.
    pub fn dispatch(&mut self, ctx: &mut AppContext, event: &InputEvent) {
        let frame_id = self.top().id;
        let snapshot = self.top().layers.clone();
        for kind in snapshot.into_iter().rev() {
            if self.top().id != frame_id {
                break;
            }
            if !self.top().layers.contains(&kind) {
                continue;
            }
            let mut requests = Vec::new();
            let result = self
                .registry
                .get_mut(kind)
                .handle_event(event, &mut Cx::new(ctx, &mut requests));
            self.apply(ctx, requests);
            if result == Propagation::Stop {
                break;
            }
        }
    }

    /// Per-frame update of the active frame, bottom to top
    pub fn update(&mut self, ctx: &mut AppContext) {
        self.poll_preload(ctx.now_ms);

        let frame_id = self.top().id;
        let snapshot = self.top().layers.clone();
        for kind in snapshot {
            if self.top().id != frame_id {
                break;
            }
            if !self.top().layers.contains(&kind) {
                continue;
            }
            let mut requests = Vec::new();
            self.registry
                .get_mut(kind)
                .update(&mut Cx::new(ctx, &mut requests));
            self.apply(ctx, requests);
        }
    }

    /// Draw the active frame, bottom to top
    pub fn draw(&self, ctx: &AppContext, out: &mut DrawList) {
        for &kind in &self.top().layers {
            if let Some(layer) = self.registry.get(kind) {
                layer.draw(ctx, out);
            }
        }
    }

    /// Build `kinds` after [`PRELOAD_DELAY_MS`], polled from [`update`](Self::update)
    pub fn schedule_preload(&mut self, kinds: &[LayerKind], now_ms: f64) {
        self.preload = Some(Preload {
            kinds: kinds.to_vec(),
            due_ms: now_ms + PRELOAD_DELAY_MS,
        });
    }

    pub fn poll_preload(&mut self, now_ms: f64) {
        if self.preload.as_ref().is_some_and(|p| now_ms >= p.due_ms) {
            if let Some(preload) = self.preload.take() {
                self.preload_now(&preload.kinds);
            }
        }
    }

    /// Build any of `kinds` not built yet
    pub fn preload_now(&mut self, kinds: &[LayerKind]) {
        let before = self.registry.built();
        for &kind in kinds {
            self.registry.ensure(kind);
        }
        log::info!("Preloaded {} layers", self.registry.built() - before);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::app::AppContext;
    use crate::level::LevelDescriptor;
    use crate::view::Layer;

    /// What probes do when poked
    #[derive(Default)]
    struct Script {
        log: Vec<String>,
        stop: Vec<LayerKind>,
        /// Requests a layer queues on its next event
        on_event: HashMap<LayerKind, Vec<NavRequest>>,
        on_show: HashMap<LayerKind, Vec<NavRequest>>,
    }

    type Shared = Rc<RefCell<Script>>;

    struct Probe {
        kind: LayerKind,
        script: Shared,
    }

    impl Layer for Probe {
        fn draw(&self, _ctx: &AppContext, _out: &mut DrawList) {
            self.script
                .borrow_mut()
                .log
                .push(format!("draw {:?}", self.kind));
        }

        fn handle_event(&mut self, _event: &InputEvent, cx: &mut Cx) -> Propagation {
            let mut script = self.script.borrow_mut();
            script.log.push(format!("event {:?}", self.kind));
            for r in script.on_event.remove(&self.kind).unwrap_or_default() {
                match r {
                    NavRequest::Push(d) => cx.push(d),
                    NavRequest::Pop => cx.pop(),
                    NavRequest::ResetTop(d) => cx.reset_top(d),
                    NavRequest::InsertLayer(k, a) => cx.insert_layer(k, a),
                    NavRequest::RemoveLayer(k) => cx.remove_layer(k),
                }
            }
            if script.stop.contains(&self.kind) {
                Propagation::Stop
            } else {
                Propagation::Continue
            }
        }

        fn on_show(&mut self, dest: &Destination, cx: &mut Cx) {
            let mut script = self.script.borrow_mut();
            script.log.push(format!("show {}", dest.label()));
            for r in script.on_show.remove(&self.kind).unwrap_or_default() {
                if let NavRequest::InsertLayer(k, a) = r {
                    cx.insert_layer(k, a);
                }
            }
        }
    }

    fn setup() -> (Navigator, AppContext, Shared) {
        let script: Shared = Rc::default();
        let probes = script.clone();
        let nav = Navigator::new(Box::new(move |kind| {
            Box::new(Probe {
                kind,
                script: probes.clone(),
            })
        }));
        (nav, AppContext::in_memory(), script)
    }

    fn take_log(script: &Shared) -> Vec<String> {
        std::mem::take(&mut script.borrow_mut().log)
    }

    fn click() -> InputEvent {
        InputEvent::PointerDown(Vec2::ZERO)
    }

    #[test]
    fn test_layers_are_shared_singletons() {
        let (mut nav, mut ctx, _) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        assert_eq!(nav.registry().built(), 2);

        // Title is reused, not rebuilt
        nav.push(&mut ctx, Destination::LevelSelect);
        assert_eq!(nav.registry().built(), 4);
        nav.push(&mut ctx, Destination::Game(LevelDescriptor::standard(1)));
        assert_eq!(nav.registry().built(), 5);
        assert_eq!(
            nav.active_layers(),
            &[LayerKind::Game, LayerKind::BackButton]
        );
    }

    #[test]
    #[should_panic(expected = "cannot pop root")]
    fn test_pop_root_panics() {
        let (mut nav, mut ctx, _) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.pop();
    }

    #[test]
    fn test_pop_does_not_reshow() {
        let (mut nav, mut ctx, script) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.push(&mut ctx, Destination::LevelSelect);
        assert_eq!(take_log(&script), vec!["show ", "show levels"]);

        nav.pop();
        nav.draw(&ctx, &mut DrawList::new());
        assert_eq!(take_log(&script), vec!["draw Title", "draw MainMenu"]);
        assert_eq!(nav.top_screen(), ScreenKind::MainMenu);
    }

    #[test]
    fn test_events_go_top_down_and_stop() {
        let (mut nav, mut ctx, script) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.push(&mut ctx, Destination::LevelSelect);
        take_log(&script);

        nav.dispatch(&mut ctx, &click());
        assert_eq!(
            take_log(&script),
            vec!["event BackButton", "event LevelSelect", "event Title"]
        );

        script.borrow_mut().stop.push(LayerKind::LevelSelect);
        nav.dispatch(&mut ctx, &click());
        assert_eq!(
            take_log(&script),
            vec!["event BackButton", "event LevelSelect"]
        );
    }

    #[test]
    fn test_dispatch_never_crosses_frames() {
        let (mut nav, mut ctx, script) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.push(&mut ctx, Destination::LevelSelect);
        script
            .borrow_mut()
            .on_event
            .insert(LayerKind::BackButton, vec![NavRequest::Pop]);
        take_log(&script);

        nav.dispatch(&mut ctx, &click());
        assert_eq!(take_log(&script), vec!["event BackButton"]);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_dispatch_uses_snapshot() {
        let (mut nav, mut ctx, script) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.push(&mut ctx, Destination::LevelSelect);
        script.borrow_mut().on_event.insert(
            LayerKind::BackButton,
            vec![
                NavRequest::InsertLayer(LayerKind::Instructions, Anchor::After(LayerKind::BackButton)),
                NavRequest::RemoveLayer(LayerKind::Title),
            ],
        );
        take_log(&script);

        // Inserted layer waits, removed layer is skipped
        nav.dispatch(&mut ctx, &click());
        assert_eq!(
            take_log(&script),
            vec!["event BackButton", "event LevelSelect"]
        );

        nav.dispatch(&mut ctx, &click());
        assert_eq!(
            take_log(&script),
            vec!["event Instructions", "event BackButton", "event LevelSelect"]
        );
    }

    #[test]
    fn test_insert_before_and_after() {
        let (mut nav, mut ctx, _) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.insert_layer(LayerKind::Instructions, Anchor::After(LayerKind::MainMenu));
        nav.insert_layer(LayerKind::OpenDialog, Anchor::Before(LayerKind::MainMenu));
        assert_eq!(
            nav.active_layers(),
            &[
                LayerKind::Title,
                LayerKind::OpenDialog,
                LayerKind::MainMenu,
                LayerKind::Instructions
            ]
        );
        nav.remove_layer(LayerKind::OpenDialog);
        assert_eq!(nav.active_layers().len(), 3);
    }

    #[test]
    #[should_panic(expected = "cannot remove the main layer")]
    fn test_remove_main_layer_panics() {
        let (mut nav, mut ctx, _) = setup();
        nav.push(&mut ctx, Destination::LevelSelect);
        nav.remove_layer(LayerKind::LevelSelect);
    }

    #[test]
    #[should_panic(expected = "not in the active frame")]
    fn test_insert_with_missing_anchor_panics() {
        let (mut nav, mut ctx, _) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.insert_layer(LayerKind::Instructions, Anchor::After(LayerKind::Game));
    }

    #[test]
    #[should_panic(expected = "already in the active frame")]
    fn test_insert_duplicate_panics() {
        let (mut nav, mut ctx, _) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.insert_layer(LayerKind::Title, Anchor::After(LayerKind::MainMenu));
    }

    #[test]
    fn test_observers_see_every_change() {
        let (mut nav, mut ctx, script) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        nav.subscribe(Box::new(move |a| sink.borrow_mut().push(a.clone())));

        nav.push(&mut ctx, Destination::MainMenu);
        nav.push(&mut ctx, Destination::LevelEditor(1));
        nav.reset_top(&mut ctx, Destination::LevelEditor(3));
        nav.pop();

        assert_eq!(
            *seen.borrow(),
            vec![
                RouteAction::Push(String::new()),
                RouteAction::Push("edit/1".to_string()),
                RouteAction::Replace("edit/3".to_string()),
                RouteAction::Pop,
            ]
        );
        assert_eq!(
            take_log(&script),
            vec!["show ", "show edit/1", "show edit/3"]
        );
    }

    #[test]
    #[should_panic(expected = "cannot reset")]
    fn test_reset_with_other_screen_panics() {
        let (mut nav, mut ctx, _) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.reset_top(&mut ctx, Destination::LevelSelect);
    }

    #[test]
    fn test_on_show_requests_are_applied() {
        let (mut nav, mut ctx, script) = setup();
        script.borrow_mut().on_show.insert(
            LayerKind::MainMenu,
            vec![NavRequest::InsertLayer(
                LayerKind::Instructions,
                Anchor::After(LayerKind::MainMenu),
            )],
        );
        nav.push(&mut ctx, Destination::MainMenu);
        assert_eq!(nav.active_layers().last(), Some(&LayerKind::Instructions));
    }

    #[test]
    fn test_preload_is_deferred_and_idempotent() {
        let (mut nav, mut ctx, _) = setup();
        nav.push(&mut ctx, Destination::MainMenu);
        nav.schedule_preload(&LayerKind::ALL, 0.0);

        ctx.now_ms = PRELOAD_DELAY_MS - 1.0;
        nav.update(&mut ctx);
        assert_eq!(nav.registry().built(), 2);

        ctx.now_ms = PRELOAD_DELAY_MS;
        nav.update(&mut ctx);
        assert_eq!(nav.registry().built(), LayerKind::ALL.len());

        // Eager and lazy paths share instances
        nav.preload_now(&LayerKind::ALL);
        nav.push(&mut ctx, Destination::LevelSelect);
        assert_eq!(nav.registry().built(), LayerKind::ALL.len());
    }
}
