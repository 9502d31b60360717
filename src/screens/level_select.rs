//! Level grid plus the max-density toggle

use glam::Vec2;

use super::{BUTTON, TEXT};
use crate::app::AppContext;
use crate::draw::DrawList;
use crate::input::{InputEvent, Propagation};
use crate::level::{LevelDescriptor, LevelKind, LevelStatus};
use crate::ui::Button;
use crate::view::{Cx, Destination, Layer};

const PER_ROW: u32 = 4;
const CELL: Vec2 = Vec2::new(120.0, 80.0);
const BUTTON_SIZE: Vec2 = Vec2::new(96.0, 60.0);

pub struct LevelSelectLayer;

fn level_button(desc: LevelDescriptor, status: Option<LevelStatus>) -> Button {
    let (top, label) = match desc.kind {
        LevelKind::Standard => (170.0, desc.number.to_string()),
        LevelKind::Custom => (400.0, format!("C{}", desc.number)),
    };
    let i = desc.number - 1;
    let min = Vec2::new(
        170.0 + (i % PER_ROW) as f32 * CELL.x,
        top + (i / PER_ROW) as f32 * CELL.y,
    );
    let label = match status {
        Some(LevelStatus::Starred) => format!("{} *", label),
        _ => label,
    };
    Button::rect(label, min, BUTTON_SIZE).enabled(status != Some(LevelStatus::Locked))
}

fn max_density_button(ctx: &AppContext) -> Button {
    let label = if ctx.settings.max_density {
        "[x] Max density"
    } else {
        "[ ] Max density"
    };
    Button::rect(label, Vec2::new(280.0, 520.0), Vec2::new(240.0, 48.0))
        .enabled(ctx.max_density_allowed())
}

fn buttons(ctx: &AppContext) -> impl Iterator<Item = (LevelDescriptor, Button)> + '_ {
    let standard = (1..=ctx.levels.standard_count()).map(|n| {
        let desc = LevelDescriptor::standard(n);
        (desc, level_button(desc, Some(ctx.levels.level_status(desc))))
    });
    let custom = (1..=ctx.levels.custom_count()).map(|n| {
        let desc = LevelDescriptor::custom(n);
        (desc, level_button(desc, None))
    });
    standard.chain(custom)
}

impl Layer for LevelSelectLayer {
    fn draw(&self, ctx: &AppContext, out: &mut DrawList) {
        out.text(Vec2::new(ctx.viewport.x / 2.0, 150.0), "Levels", 28.0, TEXT);
        out.text(Vec2::new(ctx.viewport.x / 2.0, 385.0), "Custom", 28.0, TEXT);
        for (_, button) in buttons(ctx) {
            button.draw(out, BUTTON);
        }
        max_density_button(ctx).draw(out, BUTTON);
    }

    fn handle_event(&mut self, event: &InputEvent, cx: &mut Cx) -> Propagation {
        let InputEvent::PointerDown(pos) = *event else {
            return Propagation::Continue;
        };
        if max_density_button(cx.ctx).hit(pos) {
            cx.ctx.settings.max_density = !cx.ctx.settings.max_density;
            cx.ctx.save_settings();
            return Propagation::Stop;
        }
        // Locked levels are disabled buttons and never hit
        let target = buttons(cx.ctx).find(|(_, b)| b.hit(pos)).map(|(d, _)| d);
        match target {
            Some(desc) => {
                cx.push(Destination::Game(desc));
                Propagation::Stop
            }
            None => Propagation::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::NavRequest;

    fn click(layer: &mut LevelSelectLayer, ctx: &mut AppContext, pos: Vec2) -> Vec<NavRequest> {
        let mut requests = Vec::new();
        layer.handle_event(&InputEvent::PointerDown(pos), &mut Cx::new(ctx, &mut requests));
        requests
    }

    fn center(desc: LevelDescriptor) -> Vec2 {
        level_button(desc, None).hitbox.center()
    }

    #[test]
    fn test_locked_levels_ignore_clicks() {
        let mut ctx = AppContext::in_memory();
        let mut layer = LevelSelectLayer;

        assert!(click(&mut layer, &mut ctx, center(LevelDescriptor::standard(2))).is_empty());
        assert_eq!(
            click(&mut layer, &mut ctx, center(LevelDescriptor::standard(1))),
            vec![NavRequest::Push(Destination::Game(LevelDescriptor::standard(1)))]
        );

        ctx.levels.set_level_won(LevelDescriptor::standard(1), false);
        assert_eq!(
            click(&mut layer, &mut ctx, center(LevelDescriptor::standard(2))),
            vec![NavRequest::Push(Destination::Game(LevelDescriptor::standard(2)))]
        );
    }

    #[test]
    fn test_custom_levels_are_always_open() {
        let mut ctx = AppContext::in_memory();
        assert_eq!(
            click(&mut LevelSelectLayer, &mut ctx, center(LevelDescriptor::custom(3))),
            vec![NavRequest::Push(Destination::Game(LevelDescriptor::custom(3)))]
        );
    }

    #[test]
    fn test_max_density_needs_all_stars() {
        let mut ctx = AppContext::in_memory();
        let toggle = max_density_button(&ctx).hitbox.center();

        click(&mut LevelSelectLayer, &mut ctx, toggle);
        assert!(!ctx.settings.max_density);

        for n in 1..=ctx.levels.standard_count() {
            ctx.levels.set_level_won(LevelDescriptor::standard(n), true);
        }
        click(&mut LevelSelectLayer, &mut ctx, toggle);
        assert!(ctx.settings.max_density);
        assert_eq!(ctx.bird_density(), crate::consts::BIRD_MAX_DENSITY);
    }
}
