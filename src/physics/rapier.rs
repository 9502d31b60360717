//! [`PhysicsWorld`] backed by rapier2d

use std::collections::HashMap;

use glam::Vec2;
use rapier2d::prelude::{
    CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector,
};

use super::{
    BodyHandle, BodySpec, CONTACT_REPORT_MIN_IMPULSE, Contact, GRAVITY, PIXELS_PER_METER,
    PhysicsWorld, Pose, REST_ANGULAR_EPSILON, REST_LINEAR_EPSILON, REST_STEPS, Shape,
};

/// Per-body rest tracking: where it was after the last step and how many
/// steps in a row it has been calm
#[derive(Debug, Clone, Copy)]
struct Calm {
    last: Vector<Real>,
    steps: u32,
}

#[inline]
fn to_meters(v: Vec2) -> Vector<Real> {
    Vector::new(v.x / PIXELS_PER_METER, v.y / PIXELS_PER_METER)
}

#[inline]
fn to_pixels(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x * PIXELS_PER_METER, v.y * PIXELS_PER_METER)
}

/// A rapier world plus the handle bookkeeping
pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    handles: HashMap<BodyHandle, RigidBodyHandle>,
    calm: HashMap<BodyHandle, Calm>,
    next_id: u64,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            gravity: Vector::new(0.0, GRAVITY),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            handles: HashMap::new(),
            calm: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of live bodies
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    fn body_of(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        self.colliders
            .get(collider)
            .map(|c| BodyHandle(c.user_data as u64))
    }

    /// Count calm steps. Position correction after an impact moves a body
    /// without showing up in its velocity, so displacement is checked too.
    fn track_rest(&mut self, dt: f32) {
        for (handle, rb) in &self.handles {
            let Some(body) = self.bodies.get(*rb) else {
                continue;
            };
            let pos = *body.translation();
            let entry = self.calm.entry(*handle).or_insert(Calm {
                last: pos,
                steps: 0,
            });
            let moved = (pos - entry.last).norm() / dt;
            let calm = body.linvel().norm() < REST_LINEAR_EPSILON
                && body.angvel().abs() < REST_ANGULAR_EPSILON
                && moved < REST_LINEAR_EPSILON;
            entry.steps = if calm { entry.steps.saturating_add(1) } else { 0 };
            entry.last = pos;
        }
    }
}

impl PhysicsWorld for RapierWorld {
    fn add_body(&mut self, spec: &BodySpec) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;

        let builder = if spec.fixed {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic().ccd_enabled(true)
        };
        let body = builder
            .translation(to_meters(spec.position))
            .linvel(to_meters(spec.velocity))
            .linear_damping(spec.linear_damping)
            .angular_damping(spec.angular_damping)
            .build();

        let collider = match spec.shape {
            Shape::Box { w, h } => ColliderBuilder::cuboid(
                w / 2.0 / PIXELS_PER_METER,
                h / 2.0 / PIXELS_PER_METER,
            ),
            Shape::Circle { r } => ColliderBuilder::ball(r / PIXELS_PER_METER),
        }
        .density(spec.density)
        .friction(spec.friction)
        .restitution(spec.restitution)
        .user_data(handle.0 as u128)
        .build();

        let rb = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, rb, &mut self.bodies);
        self.handles.insert(handle, rb);
        self.calm.insert(
            handle,
            Calm {
                last: to_meters(spec.position),
                steps: if spec.fixed { REST_STEPS } else { 0 },
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.calm.remove(&handle);
        if let Some(rb) = self.handles.remove(&handle) {
            self.bodies.remove(
                rb,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    fn step(&mut self, dt: f32, on_contact: &mut dyn FnMut(Contact)) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
        self.track_rest(dt);

        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let normal_impulse: f32 = pair
                .manifolds
                .iter()
                .flat_map(|m| m.points.iter())
                .map(|p| p.data.impulse)
                .sum();
            if normal_impulse <= CONTACT_REPORT_MIN_IMPULSE {
                continue;
            }
            if let (Some(a), Some(b)) = (self.body_of(pair.collider1), self.body_of(pair.collider2))
            {
                on_contact(Contact {
                    a,
                    b,
                    normal_impulse,
                });
            }
        }
    }

    fn is_resting(&self, handle: BodyHandle) -> bool {
        let Some(body) = self.handles.get(&handle).and_then(|rb| self.bodies.get(*rb)) else {
            return true;
        };
        body.is_sleeping() || self.calm.get(&handle).is_some_and(|c| c.steps >= REST_STEPS)
    }

    fn pose(&self, handle: BodyHandle) -> Option<Pose> {
        let body = self.bodies.get(*self.handles.get(&handle)?)?;
        Some(Pose {
            position: to_pixels(body.translation()),
            angle: body.rotation().angle(),
        })
    }
}
