//! Route fragment <-> navigation stack
//!
//! Grammar (the externally visible route is the active frame's label):
//!
//! | route        | stack                              |
//! |--------------|------------------------------------|
//! | `""`         | main menu                          |
//! | `levels`     | main menu, level select            |
//! | `edit/<n>`   | main menu, editor on custom `n`    |
//! | `custom-<n>` | main menu, game on custom `n`      |
//! | `<n>`        | main menu, game on standard `n`    |
//!
//! Anything else, including out-of-range or non-canonical numbers, is the
//! main menu alone.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::AppContext;
use crate::level::{LevelDescriptor, LevelStore};
use crate::view::{Destination, Navigator, RouteAction};

/// Where the current route is published
pub trait RouteSink {
    fn publish(&mut self, route: &str);
}

/// Keeps the last published route (native builds, tests)
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub route: Rc<RefCell<String>>,
}

impl RouteSink for MemorySink {
    fn publish(&mut self, route: &str) {
        *self.route.borrow_mut() = route.to_string();
    }
}

/// Strict decimal: no sign, no leading zeros
fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

/// Destinations to push, in order, to rebuild `route`
pub fn parse_route(route: &str, levels: &LevelStore) -> Vec<Destination> {
    let route = route.trim_start_matches('#');
    let target = if route.is_empty() {
        None
    } else if route == "levels" {
        Some(Destination::LevelSelect)
    } else if let Some(n) = route.strip_prefix("edit/") {
        parse_number(n)
            .map(LevelDescriptor::custom)
            .filter(|d| levels.exists(*d))
            .map(|d| Destination::LevelEditor(d.number))
    } else if let Some(n) = route.strip_prefix("custom-") {
        parse_number(n)
            .map(LevelDescriptor::custom)
            .filter(|d| levels.exists(*d))
            .map(Destination::Game)
    } else {
        parse_number(route)
            .map(LevelDescriptor::standard)
            .filter(|d| levels.exists(*d))
            .map(Destination::Game)
    };
    if target.is_none() && !route.is_empty() {
        log::warn!("Unknown route {:?}, starting at the main menu", route);
    }

    let mut stack = vec![Destination::MainMenu];
    stack.extend(target);
    stack
}

/// Mirrors the stack's labels and publishes the route on every change
pub struct Router {
    labels: Vec<String>,
    sink: Box<dyn RouteSink>,
}

impl Router {
    pub fn new(sink: Box<dyn RouteSink>) -> Self {
        Self {
            labels: Vec::new(),
            sink,
        }
    }

    /// The current route
    pub fn route(&self) -> &str {
        self.labels.last().map_or("", |l| l.as_str())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn observe(&mut self, action: &RouteAction) {
        match action {
            RouteAction::Push(label) => self.labels.push(label.clone()),
            RouteAction::Replace(label) => match self.labels.last_mut() {
                Some(last) => *last = label.clone(),
                None => panic!("replace on an empty route"),
            },
            RouteAction::Pop => {
                self.labels.pop();
            }
        }
        let route = self.route().to_string();
        self.sink.publish(&route);
    }
}

/// Hook `router` up to `nav` and rebuild the stack described by `route`.
///
/// Panics if the rebuilt stack doesn't describe `route` again.
pub fn route_app(
    nav: &mut Navigator,
    ctx: &mut AppContext,
    router: Rc<RefCell<Router>>,
    route: &str,
) {
    let observer = router.clone();
    nav.subscribe(Box::new(move |action| observer.borrow_mut().observe(action)));

    let route = route.trim_start_matches('#');
    let stack = parse_route(route, &ctx.levels);
    let parsed = stack.len() > 1 || route.is_empty();
    for dest in stack {
        nav.push(ctx, dest);
    }

    let rebuilt = router.borrow().route().to_string();
    if parsed {
        assert_eq!(rebuilt, route, "route reconstruction mismatch");
    }
    log::info!("Routed to {:?} (depth {})", rebuilt, nav.depth());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::view::{LayerKind, ScreenKind};
    use proptest::prelude::*;

    fn levels() -> LevelStore {
        LevelStore::new(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_parse_route() {
        let levels = levels();
        assert_eq!(parse_route("", &levels), vec![Destination::MainMenu]);
        assert_eq!(
            parse_route("levels", &levels),
            vec![Destination::MainMenu, Destination::LevelSelect]
        );
        assert_eq!(
            parse_route("#3", &levels),
            vec![
                Destination::MainMenu,
                Destination::Game(LevelDescriptor::standard(3))
            ]
        );
        assert_eq!(
            parse_route("custom-1", &levels),
            vec![
                Destination::MainMenu,
                Destination::Game(LevelDescriptor::custom(1))
            ]
        );
    }

    #[test]
    fn test_bad_routes_fall_back_to_root() {
        let levels = levels();
        for route in ["0", "03", "99", "edit/0", "edit/99", "custom-", "edit/x", "+2", "levels/3", "hello"] {
            assert_eq!(
                parse_route(route, &levels),
                vec![Destination::MainMenu],
                "{:?}",
                route
            );
        }
    }

    #[test]
    fn test_router_tracks_labels() {
        let sink = MemorySink::default();
        let published = sink.route.clone();
        let mut router = Router::new(Box::new(sink));

        router.observe(&RouteAction::Push(String::new()));
        router.observe(&RouteAction::Push("edit/1".to_string()));
        assert_eq!(*published.borrow(), "edit/1");

        router.observe(&RouteAction::Replace("edit/2".to_string()));
        assert_eq!(router.labels(), &["", "edit/2"]);
        assert_eq!(*published.borrow(), "edit/2");

        router.observe(&RouteAction::Pop);
        assert_eq!(router.route(), "");
        assert_eq!(*published.borrow(), "");
    }

    fn boot(route: &str) -> (Navigator, AppContext, Rc<RefCell<Router>>) {
        let mut ctx = AppContext::in_memory();
        let mut nav = Navigator::new(Box::new(crate::screens::build_layer));
        let router = Rc::new(RefCell::new(Router::new(Box::new(MemorySink::default()))));
        route_app(&mut nav, &mut ctx, router.clone(), route);
        (nav, ctx, router)
    }

    #[test]
    fn test_edit_route_rebuilds_editor_stack() {
        let (nav, _ctx, router) = boot("edit/2");
        let screens: Vec<ScreenKind> = nav.frames().iter().map(|f| f.screen).collect();
        assert_eq!(screens, vec![ScreenKind::MainMenu, ScreenKind::LevelEditor]);
        assert_eq!(nav.frames()[1].label, "edit/2");
        assert_eq!(router.borrow().route(), "edit/2");
        assert_eq!(
            nav.active_layers(),
            &[LayerKind::LevelEditor, LayerKind::BackButton]
        );
    }

    #[test]
    fn test_unknown_route_boots_to_menu() {
        let (nav, _ctx, router) = boot("levels/3");
        assert_eq!(nav.depth(), 1);
        assert_eq!(router.borrow().route(), "");
    }

    fn valid_route() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("levels".to_string()),
            (1u32..=3).prop_map(|n| format!("edit/{}", n)),
            (1u32..=3).prop_map(|n| format!("custom-{}", n)),
            (1u32..=8).prop_map(|n| n.to_string()),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_route_round_trips(route in valid_route()) {
            let (_nav, _ctx, router) = boot(&route);
            let rebuilt = router.borrow().route().to_string();
            prop_assert_eq!(rebuilt.as_str(), route.as_str());
        }

        #[test]
        fn prop_any_string_boots(route in "\\PC{0,12}") {
            let (nav, _ctx, _router) = boot(&route);
            prop_assert!(nav.depth() >= 1 && nav.depth() <= 2);
        }
    }
}
