//! Bijections between loose objects
//!
//! Used to test whether a configuration or a theorem is invariant under a
//! symmetry of its loose objects, e.g. swapping two vertices of a triangle.

use super::configuration::{ConfigurationError, ConfigurationResult};
use super::objects::ConfigurationObject;
use super::symbols::ObjectId;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A bijective mapping of loose objects onto loose objects of the same type
#[derive(Debug, Clone, Default)]
pub struct LooseObjectBijection {
    /// Source id -> (source, image)
    pairs: FxHashMap<ObjectId, (Arc<ConfigurationObject>, Arc<ConfigurationObject>)>,
}

impl LooseObjectBijection {
    /// Build a bijection from (source, image) pairs.
    ///
    /// Every object must be loose, each pair must agree on type, and no
    /// image may be used twice.
    pub fn new<I>(pairs: I) -> ConfigurationResult<Self>
    where
        I: IntoIterator<Item = (Arc<ConfigurationObject>, Arc<ConfigurationObject>)>,
    {
        let mut map = FxHashMap::default();
        let mut images: FxHashMap<ObjectId, ObjectId> = FxHashMap::default();

        for (source, image) in pairs {
            for object in [&source, &image] {
                if !object.is_loose() {
                    return Err(ConfigurationError::NotLoose(object.id()));
                }
            }

            if source.object_type() != image.object_type() {
                return Err(ConfigurationError::InvalidBijection(format!(
                    "{} is a {} but its image {} is a {}",
                    source.id(),
                    source.object_type(),
                    image.id(),
                    image.object_type()
                )));
            }

            if let Some(previous) = images.insert(image.id(), source.id()) {
                return Err(ConfigurationError::InvalidBijection(format!(
                    "{} is the image of both {} and {}",
                    image.id(),
                    previous,
                    source.id()
                )));
            }

            if map.insert(source.id(), (source.clone(), image)).is_some() {
                return Err(ConfigurationError::InvalidBijection(format!(
                    "{} is mapped twice",
                    source.id()
                )));
            }
        }

        Ok(Self { pairs: map })
    }

    /// Image of a loose object, if it is covered by this bijection
    pub fn image(&self, id: ObjectId) -> Option<&Arc<ConfigurationObject>> {
        self.pairs.get(&id).map(|(_, image)| image)
    }

    /// The bijection mapping every image back to its source
    pub fn inverse(&self) -> Self {
        let pairs = self
            .pairs
            .values()
            .map(|(source, image)| (image.id(), (image.clone(), source.clone())))
            .collect();

        Self { pairs }
    }

    /// Check if every source maps to itself
    pub fn is_identity(&self) -> bool {
        self.pairs.values().all(|(source, image)| source.id() == image.id())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Remap an object by substituting its loose leaves.
    ///
    /// Returns `None` if some loose leaf is not covered.
    pub fn remap(&self, object: &Arc<ConfigurationObject>) -> Option<Arc<ConfigurationObject>> {
        object.remap_with(&|leaf: &Arc<ConfigurationObject>| self.image(leaf.id()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ConfigurationObjectType;

    #[test]
    fn test_inverse() {
        let a = ConfigurationObject::loose(ConfigurationObjectType::Point);
        let b = ConfigurationObject::loose(ConfigurationObjectType::Point);
        let c = ConfigurationObject::loose(ConfigurationObjectType::Point);

        // a -> b -> c -> a
        let cycle = LooseObjectBijection::new(vec![
            (a.clone(), b.clone()),
            (b.clone(), c.clone()),
            (c.clone(), a.clone()),
        ])
        .unwrap();
        let inverse = cycle.inverse();

        assert_eq!(inverse.image(b.id()).map(|o| o.id()), Some(a.id()));
        assert_eq!(inverse.image(a.id()).map(|o| o.id()), Some(c.id()));
        assert!(!cycle.is_identity());
    }

    #[test]
    fn test_rejects_type_change() {
        let p = ConfigurationObject::loose(ConfigurationObjectType::Point);
        let l = ConfigurationObject::loose(ConfigurationObjectType::Line);

        let err = LooseObjectBijection::new(vec![(p, l)]).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBijection(_)));
    }

    #[test]
    fn test_rejects_non_injective() {
        let a = ConfigurationObject::loose(ConfigurationObjectType::Point);
        let b = ConfigurationObject::loose(ConfigurationObjectType::Point);

        let err = LooseObjectBijection::new(vec![(a.clone(), b.clone()), (b.clone(), b)]).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBijection(_)));
    }

    #[test]
    fn test_remap_uncovered_leaf() {
        let a = ConfigurationObject::loose(ConfigurationObjectType::Point);
        let b = ConfigurationObject::loose(ConfigurationObjectType::Point);

        let bijection = LooseObjectBijection::new(vec![(a.clone(), a.clone())]).unwrap();

        assert!(bijection.remap(&a).is_some());
        assert!(bijection.remap(&b).is_none());
    }
}
