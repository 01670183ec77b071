//! Argument trees of constructed objects
//!
//! Leaves are configuration objects. Internal nodes are either the ordered
//! top-level list ([`Arguments`]) or unordered sets ([`ConstructionArgument::Set`]),
//! mirroring the parameter list of the construction's signature.

use super::objects::ConfigurationObject;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One node of an argument tree
#[derive(Debug, Clone)]
pub enum ConstructionArgument {
    /// A single configuration object
    Object(Arc<ConfigurationObject>),

    /// A group of arguments whose order does not matter.
    ///
    /// The elements are kept in input order so that flattening reproduces
    /// the original input list.
    Set(Vec<ConstructionArgument>),
}

impl ConstructionArgument {
    /// Append the leaves of this node to `out`, depth first, in stored order
    fn flatten_into(&self, out: &mut Vec<Arc<ConfigurationObject>>) {
        match self {
            ConstructionArgument::Object(object) => out.push(Arc::clone(object)),
            ConstructionArgument::Set(elements) => {
                for element in elements {
                    element.flatten_into(out);
                }
            }
        }
    }

    /// Rebuild this node with every leaf substituted by `map`
    fn remap_with<F>(&self, map: &mut F) -> Option<ConstructionArgument>
    where
        F: FnMut(&Arc<ConfigurationObject>) -> Option<Arc<ConfigurationObject>>,
    {
        match self {
            ConstructionArgument::Object(object) => map(object).map(ConstructionArgument::Object),
            ConstructionArgument::Set(elements) => elements
                .iter()
                .map(|element| element.remap_with(map))
                .collect::<Option<Vec<_>>>()
                .map(ConstructionArgument::Set),
        }
    }

    fn element_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for ConstructionArgument {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstructionArgument::Object(a), ConstructionArgument::Object(b)) => a == b,
            (ConstructionArgument::Set(a), ConstructionArgument::Set(b)) => sets_equal(a, b),
            _ => false,
        }
    }
}

impl Eq for ConstructionArgument {}

impl Hash for ConstructionArgument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ConstructionArgument::Object(object) => {
                0u8.hash(state);
                object.hash(state);
            }
            ConstructionArgument::Set(elements) => {
                // Commutative combination keeps the hash independent of order
                1u8.hash(state);
                elements.len().hash(state);
                let combined = elements
                    .iter()
                    .fold(0u64, |acc, element| acc.wrapping_add(element.element_hash()));
                combined.hash(state);
            }
        }
    }
}

/// Multiset equality of two element lists
fn sets_equal(a: &[ConstructionArgument], b: &[ConstructionArgument]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut used = vec![false; b.len()];
    a.iter().all(|element| {
        let found = b
            .iter()
            .enumerate()
            .find(|(index, candidate)| !used[*index] && *candidate == element);

        match found {
            Some((index, _)) => {
                used[index] = true;
                true
            }
            None => false,
        }
    })
}

impl fmt::Display for ConstructionArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionArgument::Object(object) => write!(f, "{}", object.id()),
            ConstructionArgument::Set(elements) => {
                write!(f, "{{")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Ordered list of top-level arguments, one per signature parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arguments {
    arguments: Vec<ConstructionArgument>,
}

impl Arguments {
    /// Wrap already matched arguments.
    ///
    /// Use [`Signature::match_inputs`](super::construction::Signature::match_inputs)
    /// to build arguments from a flat input list.
    pub fn new(arguments: Vec<ConstructionArgument>) -> Self {
        Self { arguments }
    }

    /// Top-level arguments
    pub fn iter(&self) -> impl Iterator<Item = &ConstructionArgument> {
        self.arguments.iter()
    }

    /// Number of top-level arguments
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Check if there are no arguments
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Leaves in the order they were originally supplied
    pub fn flatten(&self) -> Vec<Arc<ConfigurationObject>> {
        let mut out = Vec::new();
        for argument in &self.arguments {
            argument.flatten_into(&mut out);
        }
        out
    }

    /// Rebuild the tree with each leaf replaced by `map(leaf)`.
    ///
    /// Returns `None` as soon as `map` has no image for some leaf.
    pub fn remap_with<F>(&self, mut map: F) -> Option<Arguments>
    where
        F: FnMut(&Arc<ConfigurationObject>) -> Option<Arc<ConfigurationObject>>,
    {
        self.arguments
            .iter()
            .map(|argument| argument.remap_with(&mut map))
            .collect::<Option<Vec<_>>>()
            .map(Arguments::new)
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, argument) in self.arguments.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", argument)?;
        }
        Ok(())
    }
}
