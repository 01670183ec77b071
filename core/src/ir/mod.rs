//! Symbolic object graph
//!
//! This module provides the immutable symbolic description of configurations:
//! - **symbols**: object identifiers and type tags
//! - **construction**: constructions, signatures and parameters
//! - **arguments**: argument trees with order-insensitive sets
//! - **objects**: loose and constructed configuration objects
//! - **configuration**: loose objects under a layout plus constructed objects
//! - **mapping**: bijections of loose objects for symmetry checks
//!
//! # Example
//!
//! ```rust
//! use geogen_core::ir::*;
//! use geogen_core::registry::ConstructionRegistry;
//!
//! let registry = ConstructionRegistry::global();
//! let holder = LooseObjectsHolder::with_layout(LooseObjectsLayout::ThreePoints);
//! let [a, b, c] = [0, 1, 2].map(|i| holder.loose_objects()[i].clone());
//!
//! let circumcenter = registry.predefined(PredefinedConstructionType::Circumcenter);
//! let o1 = ConfigurationObject::constructed(circumcenter.clone(), &[a.clone(), b.clone(), c.clone()]).unwrap();
//! let o2 = ConfigurationObject::constructed(circumcenter, &[b, a, c]).unwrap();
//!
//! // The three points form a set, so their order is irrelevant
//! assert_eq!(o1, o2);
//! ```

mod arguments;
mod configuration;
mod construction;
mod mapping;
mod objects;
mod symbols;

// Re-export all public items for convenient access
pub use arguments::{Arguments, ConstructionArgument};
pub use configuration::{
    Configuration, ConfigurationError, ConfigurationResult, LooseObjectsHolder, LooseObjectsLayout,
};
pub use construction::{
    ComposedConstruction, Construction, ConstructionError, ConstructionParameter,
    ConstructionResult, PredefinedConstruction, PredefinedConstructionType, Signature,
};
pub use mapping::LooseObjectBijection;
pub use objects::{ConfigurationObject, ConstructedConfigurationObject, LooseConfigurationObject};
pub use symbols::{ConfigurationObjectType, ObjectId};
