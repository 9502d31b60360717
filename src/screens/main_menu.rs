//! Root menu and the instructions modal

use glam::Vec2;

use super::{BUTTON, TEXT};
use crate::app::AppContext;
use crate::draw::DrawList;
use crate::input::{InputEvent, Propagation};
use crate::ui::Button;
use crate::view::{Anchor, Cx, Destination, Layer, LayerKind};

const BUTTON_SIZE: Vec2 = Vec2::new(240.0, 56.0);

pub struct MainMenuLayer {
    play: Button,
    levels: Button,
    instructions: Button,
    editor: Button,
}

impl MainMenuLayer {
    pub fn new() -> Self {
        let at = |row: f32| Vec2::new(280.0, 170.0 + row * 80.0);
        Self {
            play: Button::rect("Play", at(0.0), BUTTON_SIZE),
            levels: Button::rect("Levels", at(1.0), BUTTON_SIZE),
            instructions: Button::rect("Instructions", at(2.0), BUTTON_SIZE),
            editor: Button::rect("Level editor", at(3.0), BUTTON_SIZE),
        }
    }
}

impl Default for MainMenuLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for MainMenuLayer {
    fn draw(&self, _ctx: &AppContext, out: &mut DrawList) {
        for button in [&self.play, &self.levels, &self.instructions, &self.editor] {
            button.draw(out, BUTTON);
        }
    }

    fn handle_event(&mut self, event: &InputEvent, cx: &mut Cx) -> Propagation {
        let InputEvent::PointerDown(pos) = *event else {
            return Propagation::Continue;
        };
        if self.play.hit(pos) {
            let level = cx.ctx.levels.default_standard_level();
            cx.push(Destination::Game(level));
        } else if self.levels.hit(pos) {
            cx.push(Destination::LevelSelect);
        } else if self.instructions.hit(pos) {
            cx.insert_layer(LayerKind::Instructions, Anchor::After(LayerKind::MainMenu));
        } else if self.editor.hit(pos) {
            let level = cx.ctx.levels.default_custom_level();
            cx.push(Destination::LevelEditor(level.number));
        } else {
            return Propagation::Continue;
        }
        Propagation::Stop
    }
}

/// How to play. Any click dismisses it; nothing underneath sees input
/// while it is up.
pub struct InstructionsLayer;

const INSTRUCTIONS: [&str; 5] = [
    "Drag the bird back and release to launch it.",
    "Knock out every pig to win. Use the first bird for a star.",
    "Arrow keys pan the camera (Shift: faster, Alt: slower).",
    "Space skips to the next bird.",
    "P pauses, R retries.",
];

impl Layer for InstructionsLayer {
    fn draw(&self, ctx: &AppContext, out: &mut DrawList) {
        out.overlay("#000000", 0.7);
        for (i, line) in INSTRUCTIONS.iter().enumerate() {
            out.text(
                Vec2::new(ctx.viewport.x / 2.0, 200.0 + i as f32 * 50.0),
                *line,
                24.0,
                TEXT,
            );
        }
    }

    fn handle_event(&mut self, event: &InputEvent, cx: &mut Cx) -> Propagation {
        if let InputEvent::PointerDown(_) = event {
            cx.remove_layer(LayerKind::Instructions);
        }
        Propagation::Stop
    }
}
