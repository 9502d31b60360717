//! Singleton layer cache
//!
//! One instance per [`LayerKind`], built on first use (or by preload) and
//! kept for the life of the app. Lazy and eager construction go through the
//! same map lookup, so a kind is only ever built once.

use std::collections::HashMap;

use super::{Layer, LayerKind};

/// Builds the layer for a kind
pub type LayerFactory = Box<dyn Fn(LayerKind) -> Box<dyn Layer>>;

pub struct LayerRegistry {
    layers: HashMap<LayerKind, Box<dyn Layer>>,
    factory: LayerFactory,
    built: usize,
}

impl LayerRegistry {
    pub fn new(factory: LayerFactory) -> Self {
        Self {
            layers: HashMap::new(),
            factory,
            built: 0,
        }
    }

    /// Build `kind` unless it already exists
    pub fn ensure(&mut self, kind: LayerKind) {
        if !self.layers.contains_key(&kind) {
            log::debug!("Constructing layer {:?}", kind);
            self.layers.insert(kind, (self.factory)(kind));
            self.built += 1;
        }
    }

    pub fn get(&self, kind: LayerKind) -> Option<&dyn Layer> {
        self.layers.get(&kind).map(|l| l.as_ref())
    }

    /// The instance for `kind`, built if needed
    pub fn get_mut(&mut self, kind: LayerKind) -> &mut dyn Layer {
        self.ensure(kind);
        match self.layers.get_mut(&kind) {
            Some(layer) => layer.as_mut(),
            None => unreachable!("layer {:?} was just built", kind),
        }
    }

    pub fn contains(&self, kind: LayerKind) -> bool {
        self.layers.contains_key(&kind)
    }

    /// How many layers have been constructed so far
    pub fn built(&self) -> usize {
        self.built
    }
}
