//! Clickable buttons

use glam::Vec2;

use crate::draw::{Color, DrawList};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hitbox {
    Rect { min: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

impl Hitbox {
    pub fn contains(&self, p: Vec2) -> bool {
        match *self {
            Hitbox::Rect { min, size } => {
                let max = min + size;
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            }
            Hitbox::Circle { center, radius } => p.distance_squared(center) <= radius * radius,
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Hitbox::Rect { min, size } => min + size / 2.0,
            Hitbox::Circle { center, .. } => center,
        }
    }
}

/// A labelled hit area. Disabled buttons draw greyed out and never hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub hitbox: Hitbox,
    pub enabled: bool,
}

impl Button {
    pub fn rect(label: impl Into<String>, min: Vec2, size: Vec2) -> Self {
        Self {
            label: label.into(),
            hitbox: Hitbox::Rect { min, size },
            enabled: true,
        }
    }

    pub fn circle(label: impl Into<String>, center: Vec2, radius: f32) -> Self {
        Self {
            label: label.into(),
            hitbox: Hitbox::Circle { center, radius },
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn hit(&self, p: Vec2) -> bool {
        self.enabled && self.hitbox.contains(p)
    }

    pub fn draw(&self, out: &mut DrawList, color: Color) {
        let color = if self.enabled { color } else { "#888888" };
        match self.hitbox {
            Hitbox::Rect { min, size } => out.rect(min, size, color),
            Hitbox::Circle { center, radius } => out.circle(center, radius, color),
        }
        out.text(self.hitbox.center(), self.label.clone(), 20.0, "#FFFFFF");
    }
}
