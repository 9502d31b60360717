//! Turning reported contacts into pig damage

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{KILL_IMPULSE, SQUISH_IMPULSE};
use crate::physics::{BodyHandle, Contact};

/// Visual/gameplay state of a pig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PigState {
    #[default]
    Healthy,
    Squished,
    Dead,
}

/// How hard something was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Harmless,
    Squish,
    Kill,
}

impl Impact {
    pub fn classify(normal_impulse: f32) -> Self {
        if normal_impulse > KILL_IMPULSE {
            Impact::Kill
        } else if normal_impulse > SQUISH_IMPULSE {
            Impact::Squish
        } else {
            Impact::Harmless
        }
    }
}

/// A pig body in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pig {
    pub handle: BodyHandle,
    pub state: PigState,
    /// Spawn position, world pixels
    pub home: Vec2,
}

impl Pig {
    pub fn is_alive(&self) -> bool {
        self.state != PigState::Dead
    }
}

/// Apply one contact to the pigs it touches.
///
/// Each side is judged on its own, so a pig-on-pig hit can kill both. Dead
/// pigs are ignored; killed pigs are queued in `pending` for removal once the
/// step is over. Returns the number of pigs killed.
pub fn apply_contact(pigs: &mut [Pig], contact: Contact, pending: &mut Vec<BodyHandle>) -> usize {
    let impact = Impact::classify(contact.normal_impulse);
    if impact == Impact::Harmless {
        return 0;
    }

    let mut killed = 0;
    for side in [contact.a, contact.b] {
        let Some(pig) = pigs.iter_mut().find(|p| p.handle == side && p.is_alive()) else {
            continue;
        };
        match impact {
            Impact::Kill => {
                log::debug!(
                    "Pig {:?} killed (impulse {:.2})",
                    pig.handle,
                    contact.normal_impulse
                );
                pig.state = PigState::Dead;
                pending.push(pig.handle);
                killed += 1;
            }
            Impact::Squish => pig.state = PigState::Squished,
            Impact::Harmless => {}
        }
    }
    killed
}
