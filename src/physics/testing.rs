//! Deterministic stand-in engine for gameplay tests
//!
//! No gravity. Moving bodies coast with a fixed per-step drag and stop dead
//! on their first overlap with another body, reporting an impulse of
//! reduced-mass × closing speed. Good enough to aim a bird at a pig.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{
    BodyHandle, BodySpec, CONTACT_REPORT_MIN_IMPULSE, Contact, PIXELS_PER_METER, PhysicsWorld,
    Pose, REST_LINEAR_EPSILON, Shape,
};

/// Velocity multiplier per step
const DRAG: f32 = 0.95;

#[derive(Debug, Clone)]
struct KinematicBody {
    spec: BodySpec,
    position: Vec2,
    velocity: Vec2,
}

impl KinematicBody {
    /// kg, from density × area in m²
    fn mass(&self) -> f32 {
        let area = match self.spec.shape {
            Shape::Box { w, h } => w * h,
            Shape::Circle { r } => std::f32::consts::PI * r * r,
        } / (PIXELS_PER_METER * PIXELS_PER_METER);
        self.spec.density * area
    }

    fn half_extents(&self) -> Vec2 {
        match self.spec.shape {
            Shape::Box { w, h } => Vec2::new(w, h) / 2.0,
            Shape::Circle { r } => Vec2::splat(r),
        }
    }

    fn overlaps(&self, other: &KinematicBody) -> bool {
        match (self.spec.shape, other.spec.shape) {
            (Shape::Circle { r: ra }, Shape::Circle { r: rb }) => {
                self.position.distance(other.position) < ra + rb
            }
            _ => {
                let d = (self.position - other.position).abs();
                let reach = self.half_extents() + other.half_extents();
                d.x < reach.x && d.y < reach.y
            }
        }
    }
}

/// See module docs
#[derive(Debug, Default)]
pub(crate) struct KinematicWorld {
    bodies: BTreeMap<BodyHandle, KinematicBody>,
    next_id: u64,
}

impl KinematicWorld {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhysicsWorld for KinematicWorld {
    fn add_body(&mut self, spec: &BodySpec) -> BodyHandle {
        self.next_id += 1;
        let handle = BodyHandle(self.next_id);
        self.bodies.insert(
            handle,
            KinematicBody {
                spec: spec.clone(),
                position: spec.position,
                velocity: if spec.fixed { Vec2::ZERO } else { spec.velocity },
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle);
    }

    fn step(&mut self, dt: f32, on_contact: &mut dyn FnMut(Contact)) {
        for body in self.bodies.values_mut() {
            body.position += body.velocity * dt;
            body.velocity *= DRAG;
            if body.velocity.length() / PIXELS_PER_METER < REST_LINEAR_EPSILON {
                body.velocity = Vec2::ZERO;
            }
        }

        let handles: Vec<BodyHandle> = self.bodies.keys().copied().collect();
        for (i, &ha) in handles.iter().enumerate() {
            for &hb in &handles[i + 1..] {
                let (a, b) = (&self.bodies[&ha], &self.bodies[&hb]);
                if a.velocity == b.velocity || !a.overlaps(b) {
                    continue;
                }
                let closing = (a.velocity - b.velocity).length() / PIXELS_PER_METER;
                let mass = match (a.spec.fixed, b.spec.fixed) {
                    (true, _) => b.mass(),
                    (_, true) => a.mass(),
                    _ => a.mass() * b.mass() / (a.mass() + b.mass()),
                };
                let normal_impulse = mass * closing;
                for h in [ha, hb] {
                    if let Some(body) = self.bodies.get_mut(&h) {
                        body.velocity = Vec2::ZERO;
                    }
                }
                if normal_impulse > CONTACT_REPORT_MIN_IMPULSE {
                    on_contact(Contact {
                        a: ha,
                        b: hb,
                        normal_impulse,
                    });
                }
            }
        }
    }

    fn is_resting(&self, handle: BodyHandle) -> bool {
        self.bodies
            .get(&handle)
            .is_none_or(|b| b.velocity == Vec2::ZERO)
    }

    fn pose(&self, handle: BodyHandle) -> Option<Pose> {
        self.bodies.get(&handle).map(|b| Pose {
            position: b.position,
            angle: 0.0,
        })
    }
}
