//! Objects container
//!
//! One picture: a numeric realization of every resolved object of a
//! configuration, keyed by object id. Containers never look at each other.

use super::analytic::GeometricObject;
use super::constructor::construct;
use super::layout::sample_layout;
use crate::ir::{ConstructedConfigurationObject, LooseObjectsHolder, ObjectId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Outcome of adding an object to a picture, or to the whole holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The object is new and has been stored
    Fresh,
    /// The object coincides with an already stored one
    DuplicateOf(ObjectId),
    /// The object cannot be realized
    Unconstructible,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Fresh => write!(f, "fresh"),
            Verdict::DuplicateOf(id) => write!(f, "duplicate of {}", id),
            Verdict::Unconstructible => write!(f, "unconstructible"),
        }
    }
}

/// A single picture
#[derive(Debug, Clone)]
pub struct ObjectsContainer {
    seed: u64,
    tolerance: f64,
    objects: FxHashMap<ObjectId, GeometricObject>,
    /// Insertion order, for deterministic duplicate lookup
    order: Vec<ObjectId>,
}

impl ObjectsContainer {
    /// Empty picture
    pub fn empty(tolerance: f64, seed: u64) -> Self {
        Self {
            seed,
            tolerance,
            objects: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Picture with the loose objects of `holder` sampled under its layout
    pub fn new(holder: &LooseObjectsHolder, tolerance: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = sample_layout(holder.layout(), &mut rng);

        let mut container = Self::empty(tolerance, seed);
        for (object, value) in holder.loose_objects().iter().zip(values) {
            container.insert(object.id(), value);
        }

        trace!(seed, objects = container.len(), "sampled picture");
        container
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn get(&self, id: ObjectId) -> Option<&GeometricObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Stored ids in insertion order
    pub fn ids(&self) -> &[ObjectId] {
        &self.order
    }

    /// First stored object numerically equal to `value`
    pub fn find_equal(&self, value: &GeometricObject) -> Option<ObjectId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.objects[id].approx_eq(value, self.tolerance))
    }

    /// Store `value` under `id` unless an equal object is already stored.
    ///
    /// # Panics
    /// If `id` is already present.
    pub fn add(&mut self, id: ObjectId, value: GeometricObject) -> Verdict {
        if self.contains(id) {
            panic!("object {} is already in the picture", id);
        }

        match self.find_equal(&value) {
            Some(existing) => Verdict::DuplicateOf(existing),
            None => {
                self.insert(id, value);
                Verdict::Fresh
            }
        }
    }

    /// Construct `object` in this picture and add it
    pub fn try_add_constructed(&mut self, object: &ConstructedConfigurationObject) -> Verdict {
        match construct(object, self) {
            Some(value) => self.add(object.id(), value),
            None => Verdict::Unconstructible,
        }
    }

    /// Evict `id`; returns whether it was present
    pub fn remove(&mut self, id: ObjectId) -> bool {
        if self.objects.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|stored| *stored != id);
        true
    }

    fn insert(&mut self, id: ObjectId, value: GeometricObject) {
        self.objects.insert(id, value);
        self.order.push(id);
    }
}
