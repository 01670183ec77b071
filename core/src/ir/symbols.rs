//! Identifiers and type tags for configuration objects
//!
//! Every configuration object receives a process-wide unique [`ObjectId`] when
//! it is created. Ids are never reused, so they double as handles into the
//! id-keyed maps kept by pictures and holders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(0);

/// Newtype wrapper for configuration object identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Allocate a fresh identifier
    ///
    /// # Panics
    /// If the id space is exhausted, since a reused id would alias two objects.
    pub(crate) fn next() -> Self {
        let id = NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed);
        if id == u64::MAX {
            panic!("object id space exhausted");
        }
        ObjectId(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of geometric object a configuration object stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigurationObjectType {
    Point,
    Line,
    Circle,
}

impl fmt::Display for ConfigurationObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigurationObjectType::Point => "point",
            ConfigurationObjectType::Line => "line",
            ConfigurationObjectType::Circle => "circle",
        };
        f.write_str(name)
    }
}
