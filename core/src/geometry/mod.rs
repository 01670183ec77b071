//! Geometry module - numeric realization of configurations
//!
//! - **analytic**: points, lines, circles with tolerance-based equality
//! - **layout**: sampling loose objects under a layout
//! - **constructions**: formulas of the predefined constructions
//! - **constructor**: evaluation of constructed objects in one picture
//! - **container**: one picture
//! - **holder**: K pictures voting on every new object

pub mod analytic;
pub mod constructions;
pub mod constructor;
pub mod container;
pub mod holder;
pub mod layout;
pub mod seeds;

pub use analytic::{Circle, GeometricObject, Line, Point};
pub use constructor::{construct, realize};
pub use container::{ObjectsContainer, Verdict};
pub use holder::{GeometryError, GeometryHolder, GeometryResult, HolderSettings};
