//! Game title, drawn beneath the menus

use glam::Vec2;

use super::{MENU_BG, TEXT};
use crate::app::AppContext;
use crate::draw::DrawList;
use crate::view::Layer;

pub struct TitleLayer;

impl Layer for TitleLayer {
    fn draw(&self, ctx: &AppContext, out: &mut DrawList) {
        out.rect(Vec2::ZERO, ctx.viewport, MENU_BG);
        out.text(Vec2::new(ctx.viewport.x / 2.0, 90.0), "Slingshot", 64.0, TEXT);
    }
}
