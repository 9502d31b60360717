//! Slingshot entry point
//!
//! The browser build mounts on `#canvas` and drives the app from
//! `requestAnimationFrame`. The native build runs headless: it boots the
//! requested route, simulates a few seconds, and logs where it ended up.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use slingshot::consts::*;
    use slingshot::input::{InputEvent, Key};
    use slingshot::persistence::LocalStore;
    use slingshot::physics::rapier_factory;
    use slingshot::platform::{self, HashSink};
    use slingshot::{App, AppContext};

    struct Game {
        app: App,
        canvas: HtmlCanvasElement,
        g: CanvasRenderingContext2d,
    }

    impl Game {
        /// Canvas pixels from a mouse event, accounting for CSS scaling
        fn canvas_pos(&self, event: &MouseEvent) -> Vec2 {
            let scale_x = VIEWPORT_WIDTH / self.canvas.client_width().max(1) as f32;
            let scale_y = VIEWPORT_HEIGHT / self.canvas.client_height().max(1) as f32;
            Vec2::new(
                event.offset_x() as f32 * scale_x,
                event.offset_y() as f32 * scale_y,
            )
        }

        fn frame(&mut self, now_ms: f64) {
            let list = self.app.frame(now_ms);
            if let Err(e) = platform::paint(&self.g, &list) {
                log::error!("Paint failed: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        log::info!("Slingshot starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(VIEWPORT_WIDTH as u32);
        canvas.set_height(VIEWPORT_HEIGHT as u32);
        let g = platform::context_2d(&canvas)?;

        let mut ctx = AppContext::new(Box::new(LocalStore::new()), rapier_factory());
        ctx.now_ms = platform::now_ms();
        let route = platform::initial_route();
        let app = App::boot(ctx, &route, Box::new(HashSink));
        log::info!("Booted at route '{}'", app.route());

        let game = Rc::new(RefCell::new(Game { app, canvas, g }));
        setup_input_handlers(game.clone())?;
        request_animation_frame(game);

        log::info!("Slingshot running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let canvas = game.borrow().canvas.clone();

        // Mouse down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.canvas_pos(&event);
                g.app.handle_event(InputEvent::PointerDown(pos));
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse up anywhere, so a drag released off the canvas still launches
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.canvas_pos(&event);
                g.app.handle_event(InputEvent::PointerUp(pos));
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.canvas_pos(&event);
                g.app.pointer_moved(pos);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keys
        for (name, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                event.prevent_default();
                if down && event.repeat() {
                    return;
                }
                let input = if down {
                    InputEvent::KeyDown(key)
                } else {
                    InputEvent::KeyUp(key)
                };
                game.borrow_mut().app.handle_event(input);
            });
            window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use slingshot::persistence::{FileStore, KeyValueStore, MemoryStore};
    use slingshot::physics::rapier_factory;
    use slingshot::router::MemorySink;
    use slingshot::{App, AppContext, consts::SIM_DT};

    env_logger::init();
    log::info!("Slingshot (native) starting...");

    let route = std::env::args().nth(1).unwrap_or_default();
    let storage: Box<dyn KeyValueStore> = match std::env::var("SLINGSHOT_SAVE") {
        Ok(path) => match FileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("Cannot open save file '{}': {}, progress will not be kept", path, e);
                Box::new(MemoryStore::new())
            }
        },
        Err(_) => Box::new(MemoryStore::new()),
    };

    let mut app = App::boot(
        AppContext::new(storage, rapier_factory()),
        &route,
        Box::new(MemorySink::default()),
    );
    log::info!("Booted at route '{}'", app.route());

    let frame_ms = f64::from(SIM_DT) * 1000.0;
    let mut commands = 0;
    for frame in 0..300 {
        commands = app.frame(frame as f64 * frame_ms).len();
    }
    let screens: Vec<_> = app
        .navigator()
        .frames()
        .iter()
        .map(|f| format!("{:?}", f.screen))
        .collect();
    log::info!(
        "After 5s: route '{}', stack [{}], {} draw commands",
        app.route(),
        screens.join(", "),
        commands
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
