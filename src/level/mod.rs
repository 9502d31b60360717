//! Level geometry and per-level progress
//!
//! Standard levels ship with the game and are read-only. Custom levels start
//! from bundled defaults and are saved per slot. Progress is two persisted
//! facts (`won`, `starred`); a level's status is derived from them.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, load_json, save_json};

mod bundled;

/// Which family a level belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Standard,
    Custom,
}

/// Identifies a level (numbers are 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub kind: LevelKind,
    pub number: u32,
}

impl LevelDescriptor {
    pub fn standard(number: u32) -> Self {
        Self {
            kind: LevelKind::Standard,
            number,
        }
    }

    pub fn custom(number: u32) -> Self {
        Self {
            kind: LevelKind::Custom,
            number,
        }
    }
}

/// Block material. Only affects density and fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Wood,
    Steel,
    Lead,
}

impl BlockType {
    pub fn density(&self) -> f32 {
        match self {
            BlockType::Wood => WOOD_DENSITY,
            BlockType::Steel => STEEL_DENSITY,
            BlockType::Lead => LEAD_DENSITY,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            BlockType::Wood => "#A68500",
            BlockType::Steel => "#BFBFBF",
            BlockType::Lead => "#454545",
        }
    }

    /// Next material in the editor's cycle
    pub fn cycle(&self) -> Self {
        match self {
            BlockType::Wood => BlockType::Steel,
            BlockType::Steel => BlockType::Lead,
            BlockType::Lead => BlockType::Wood,
        }
    }
}

/// A rectangular block, centered at (x, y) relative to the level start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Center of a pig relative to the level start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Geometry of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// World x that all object x-coordinates are relative to
    pub start: f32,
    /// Number of birds provided
    pub birds: u32,
    pub pigs: Vec<Point>,
    pub blocks: Vec<Block>,
}

impl LevelData {
    /// World position of a level-relative point
    pub fn to_world(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(self.start + x, y)
    }

    /// Rightmost world x covered by any object
    pub fn right_extent(&self) -> f32 {
        let pigs = self.pigs.iter().map(|p| p.x + PIG_RADIUS);
        let blocks = self.blocks.iter().map(|b| b.x + b.w / 2.0);
        self.start + pigs.chain(blocks).fold(0.0, f32::max)
    }

    /// Pan beyond which the camera stops following a flying bird
    pub fn follow_limit(&self, viewport_width: f32) -> f32 {
        let max_pan = (WORLD_WIDTH - viewport_width).max(0.0);
        (self.right_extent() + FOLLOW_MARGIN - viewport_width).clamp(0.0, max_pan)
    }
}

/// A level together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub desc: LevelDescriptor,
    pub data: LevelData,
}

/// Derived status of a standard level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Locked,
    Open,
    Starred,
}

/// Persisted progress facts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Highest standard level number ever won (0 = none)
    pub highest_won: u32,
    /// Standard levels beaten with the first bird
    pub starred: BTreeSet<u32>,
}

impl Progress {
    /// Status of standard level `number`
    pub fn status(&self, number: u32) -> LevelStatus {
        if self.starred.contains(&number) {
            LevelStatus::Starred
        } else if number <= self.highest_won + 1 {
            LevelStatus::Open
        } else {
            LevelStatus::Locked
        }
    }

    /// Record a win; never downgrades
    pub fn record_win(&mut self, number: u32, starred: bool) {
        self.highest_won = self.highest_won.max(number);
        if starred {
            self.starred.insert(number);
        }
    }
}

/// Storage keys
const WON_KEY: &str = "won";
const STARRED_KEY: &str = "starred";

fn custom_key(number: u32) -> String {
    format!("custom_{}", number)
}

/// Loads and saves levels, tracks progress
pub struct LevelStore {
    storage: Box<dyn KeyValueStore>,
    standard: Vec<LevelData>,
    custom_defaults: Vec<LevelData>,
    progress: Progress,
}

impl LevelStore {
    /// Open the store, reading progress from `storage`
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        let highest_won = load_json::<u32>(storage.as_ref(), WON_KEY).unwrap_or(0);
        let starred = load_json::<Vec<u32>>(storage.as_ref(), STARRED_KEY)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let progress = Progress {
            highest_won,
            starred,
        };
        log::info!(
            "Progress: {} won, {} starred",
            progress.highest_won,
            progress.starred.len()
        );
        Self {
            storage,
            standard: bundled::standard_levels(),
            custom_defaults: bundled::custom_levels(),
            progress,
        }
    }

    pub fn standard_count(&self) -> u32 {
        self.standard.len() as u32
    }

    pub fn custom_count(&self) -> u32 {
        self.custom_defaults.len() as u32
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Underlying storage (shared with settings)
    pub fn storage(&mut self) -> &mut dyn KeyValueStore {
        self.storage.as_mut()
    }

    /// Whether `desc` names an existing level
    pub fn exists(&self, desc: LevelDescriptor) -> bool {
        let count = match desc.kind {
            LevelKind::Standard => self.standard_count(),
            LevelKind::Custom => self.custom_count(),
        };
        (1..=count).contains(&desc.number)
    }

    /// Load a level. The returned data is an independent copy.
    pub fn load_level(&self, desc: LevelDescriptor) -> Level {
        assert!(self.exists(desc), "no such level: {:?}", desc);
        let idx = (desc.number - 1) as usize;
        let data = match desc.kind {
            LevelKind::Standard => self.standard[idx].clone(),
            LevelKind::Custom => load_json(self.storage.as_ref(), &custom_key(desc.number))
                .unwrap_or_else(|| self.custom_defaults[idx].clone()),
        };
        Level { desc, data }
    }

    /// Persist a custom level
    pub fn save_level(&mut self, level: &Level) {
        assert!(
            level.desc.kind == LevelKind::Custom,
            "can only save custom levels"
        );
        save_json(
            self.storage.as_mut(),
            &custom_key(level.desc.number),
            &level.data,
        );
        log::info!("Saved custom level {}", level.desc.number);
    }

    /// Status of a standard level
    pub fn level_status(&self, desc: LevelDescriptor) -> LevelStatus {
        assert!(
            desc.kind == LevelKind::Standard,
            "only standard levels have a status"
        );
        self.progress.status(desc.number)
    }

    /// Mark a standard level as won, returning the next standard level
    pub fn set_level_won(
        &mut self,
        desc: LevelDescriptor,
        starred: bool,
    ) -> Option<LevelDescriptor> {
        assert!(
            desc.kind == LevelKind::Standard,
            "only standard levels have a status"
        );
        self.progress.record_win(desc.number, starred);
        save_json(self.storage.as_mut(), WON_KEY, &self.progress.highest_won);
        if starred {
            let starred: Vec<u32> = self.progress.starred.iter().copied().collect();
            save_json(self.storage.as_mut(), STARRED_KEY, &starred);
        }
        log::info!("Level {} won (starred: {})", desc.number, starred);
        (desc.number < self.standard_count()).then(|| LevelDescriptor::standard(desc.number + 1))
    }

    /// True iff every standard level is starred
    pub fn all_levels_starred(&self) -> bool {
        (1..=self.standard_count()).all(|n| self.progress.starred.contains(&n))
    }

    /// Standard level the "play" button starts
    pub fn default_standard_level(&self) -> LevelDescriptor {
        LevelDescriptor::standard(self.progress.highest_won % self.standard_count() + 1)
    }

    /// Custom level the editor opens first
    pub fn default_custom_level(&self) -> LevelDescriptor {
        LevelDescriptor::custom(1)
    }
}
