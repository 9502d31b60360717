//! Top-left back arrow on every non-root screen

use glam::Vec2;

use super::BUTTON;
use crate::app::AppContext;
use crate::draw::DrawList;
use crate::input::{InputEvent, Propagation};
use crate::ui::Button;
use crate::view::{Cx, Layer};

pub struct BackButtonLayer {
    button: Button,
}

impl BackButtonLayer {
    pub fn new() -> Self {
        Self {
            button: Button::circle("<", Vec2::new(40.0, 40.0), 25.0),
        }
    }
}

impl Default for BackButtonLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for BackButtonLayer {
    fn draw(&self, _ctx: &AppContext, out: &mut DrawList) {
        self.button.draw(out, BUTTON);
    }

    fn handle_event(&mut self, event: &InputEvent, cx: &mut Cx) -> Propagation {
        match event {
            InputEvent::PointerDown(pos) if self.button.hit(*pos) => {
                cx.pop();
                Propagation::Stop
            }
            _ => Propagation::Continue,
        }
    }
}
