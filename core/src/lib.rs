//! GeoGen Core
//!
//! Symbolic-numeric equivalence engine for generated geometric configurations

pub mod ir; // Symbolic object graph (objects, constructions, configurations)
pub mod registry; // Process-wide construction catalog
pub mod geometry; // Numeric pictures and the multi-picture holder
pub mod theorems; // Theorem object model

pub use ir::*;
pub use registry::ConstructionRegistry;
pub use geometry::{
    GeometricObject, GeometryError, GeometryHolder, GeometryResult, HolderSettings, ObjectsContainer, Verdict,
};
pub use theorems::{Theorem, TheoremError, TheoremObject, TheoremResult, TheoremType};
