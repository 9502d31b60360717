//! Draw commands
//!
//! Layers don't paint; they append positioned commands to a [`DrawList`]
//! that the platform replays onto a canvas. Coordinates are canvas pixels,
//! y down.

use glam::Vec2;

/// CSS colour string
pub type Color = &'static str;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Named image centered at `center`
    Sprite {
        name: &'static str,
        center: Vec2,
        size: Vec2,
        angle: f32,
    },
    Rect {
        min: Vec2,
        size: Vec2,
        color: Color,
        /// Rotation about the center (radians)
        angle: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
    /// Full-canvas wash
    Overlay { color: Color, alpha: f32 },
}

/// Commands for one frame, in paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn sprite(&mut self, name: &'static str, center: Vec2, size: Vec2, angle: f32) {
        self.push(DrawCmd::Sprite {
            name,
            center,
            size,
            angle,
        });
    }

    pub fn rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.push(DrawCmd::Rect {
            min,
            size,
            color,
            angle: 0.0,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.push(DrawCmd::Line {
            from,
            to,
            width,
            color,
        });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, size: f32, color: Color) {
        self.push(DrawCmd::Text {
            pos,
            text: text.into(),
            size,
            color,
        });
    }

    pub fn overlay(&mut self, color: Color, alpha: f32) {
        self.push(DrawCmd::Overlay { color, alpha });
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter()
    }

    /// Every text string, in paint order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
