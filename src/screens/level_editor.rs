//! Custom level editor
//!
//! Only the level-level controls live here: which slot is open, the bird
//! count, panning, and handing the level to the game for a test run.

use glam::Vec2;

use super::{BUTTON, MENU_BG, TEXT};
use crate::app::AppContext;
use crate::consts::*;
use crate::draw::DrawList;
use crate::input::{InputEvent, Propagation};
use crate::level::{Level, LevelDescriptor};
use crate::sim::{Camera, slingshot_anchor};
use crate::ui::Button;
use crate::view::{Anchor, Cx, Destination, Layer, LayerKind};

pub struct LevelEditorLayer {
    level: Option<Level>,
    camera: Camera,
    open: Button,
    test: Button,
    fewer: Button,
    more: Button,
}

fn editor_camera(viewport: Vec2) -> Camera {
    Camera::new(viewport, 0.0)
}

impl LevelEditorLayer {
    pub fn new() -> Self {
        let size = Vec2::new(100.0, 40.0);
        let small = Vec2::new(40.0, 40.0);
        Self {
            level: None,
            camera: editor_camera(Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)),
            open: Button::rect("Open", Vec2::new(90.0, 20.0), size),
            test: Button::rect("Test", Vec2::new(200.0, 20.0), size),
            fewer: Button::rect("-", Vec2::new(330.0, 20.0), small),
            more: Button::rect("+", Vec2::new(490.0, 20.0), small),
        }
    }

    /// The level being edited
    pub fn level(&self) -> &Level {
        match &self.level {
            Some(level) => level,
            None => panic!("no level loaded in the editor"),
        }
    }

    /// Change the bird count within bounds, saving on change
    fn change_birds(&mut self, delta: i32, ctx: &mut AppContext) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let birds = (level.data.birds as i32 + delta).clamp(MIN_BIRDS as i32, MAX_BIRDS as i32) as u32;
        if birds != level.data.birds {
            level.data.birds = birds;
            ctx.levels.save_level(level);
        }
    }
}

impl Default for LevelEditorLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for LevelEditorLayer {
    fn on_show(&mut self, dest: &Destination, cx: &mut Cx) {
        let Destination::LevelEditor(number) = *dest else {
            return;
        };
        let desc = LevelDescriptor::custom(number);
        if self.level.as_ref().is_some_and(|l| l.desc == desc) {
            return;
        }
        if let Some(current) = self.level.take() {
            cx.ctx.levels.save_level(&current);
        }
        self.level = Some(cx.ctx.levels.load_level(desc));
        self.camera = editor_camera(cx.ctx.viewport);
        log::info!("Editing custom level {}", number);
    }

    fn update(&mut self, cx: &mut Cx) {
        let pan = cx.ctx.keys.pan(cx.ctx.settings.pan_speed);
        if pan != 0.0 {
            self.camera.pan_by(pan);
        }
    }

    fn draw(&self, ctx: &AppContext, out: &mut DrawList) {
        out.rect(Vec2::ZERO, ctx.viewport, MENU_BG);
        let ground = self.camera.to_screen(Vec2::ZERO).y;
        out.rect(
            Vec2::new(0.0, ground),
            Vec2::new(ctx.viewport.x, GROUND_THICKNESS),
            "#4E8A2E",
        );
        out.sprite(
            "slingshot",
            self.camera.to_screen(slingshot_anchor()),
            Vec2::new(40.0, 100.0),
            0.0,
        );

        if let Some(level) = &self.level {
            let data = &level.data;
            for block in &data.blocks {
                let center = self.camera.to_screen(data.to_world(block.x, block.y));
                let size = Vec2::new(block.w, block.h);
                out.rect(center - size / 2.0, size, block.kind.color());
            }
            for pig in &data.pigs {
                let center = self.camera.to_screen(data.to_world(pig.x, pig.y));
                out.sprite("pig", center, Vec2::splat(PIG_RADIUS * 2.0), 0.0);
            }
            out.text(
                Vec2::new(410.0, 40.0),
                format!("Birds: {}", data.birds),
                20.0,
                TEXT,
            );
            out.text(
                Vec2::new(ctx.viewport.x - 110.0, 40.0),
                format!("Custom {}", level.desc.number),
                20.0,
                TEXT,
            );
        }

        for button in [&self.open, &self.test, &self.fewer, &self.more] {
            button.draw(out, BUTTON);
        }
    }

    fn handle_event(&mut self, event: &InputEvent, cx: &mut Cx) -> Propagation {
        let InputEvent::PointerDown(pos) = *event else {
            return Propagation::Continue;
        };
        if self.open.hit(pos) {
            cx.insert_layer(LayerKind::OpenDialog, Anchor::After(LayerKind::BackButton));
        } else if self.test.hit(pos) {
            let level = self.level();
            cx.ctx.levels.save_level(level);
            cx.push(Destination::Game(level.desc));
        } else if self.fewer.hit(pos) {
            self.change_birds(-1, cx.ctx);
        } else if self.more.hit(pos) {
            self.change_birds(1, cx.ctx);
        } else {
            return Propagation::Continue;
        }
        Propagation::Stop
    }
}

/// Modal list of custom slots
pub struct OpenDialogLayer;

fn slot_button(number: u32) -> Button {
    Button::rect(
        format!("Custom {}", number),
        Vec2::new(300.0, 140.0 + number as f32 * 70.0),
        Vec2::new(200.0, 50.0),
    )
}

fn cancel_button() -> Button {
    Button::rect("Cancel", Vec2::new(300.0, 500.0), Vec2::new(200.0, 50.0))
}

impl Layer for OpenDialogLayer {
    fn draw(&self, ctx: &AppContext, out: &mut DrawList) {
        out.overlay("#000000", 0.6);
        out.text(Vec2::new(ctx.viewport.x / 2.0, 150.0), "Open level", 28.0, TEXT);
        for n in 1..=ctx.levels.custom_count() {
            slot_button(n).draw(out, BUTTON);
        }
        cancel_button().draw(out, BUTTON);
    }

    fn handle_event(&mut self, event: &InputEvent, cx: &mut Cx) -> Propagation {
        if let InputEvent::PointerDown(pos) = *event {
            let slot = (1..=cx.ctx.levels.custom_count()).find(|&n| slot_button(n).hit(pos));
            if let Some(n) = slot {
                cx.remove_layer(LayerKind::OpenDialog);
                cx.reset_top(Destination::LevelEditor(n));
            } else if cancel_button().hit(pos) {
                cx.remove_layer(LayerKind::OpenDialog);
            }
        }
        Propagation::Stop
    }
}
