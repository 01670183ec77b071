//! Configuration objects: loose and constructed
//!
//! Objects are immutable and shared through `Arc`. Equality is structural:
//! loose objects are equal only to themselves, constructed objects are equal
//! when their constructions and argument trees are equal, unless the
//! construction is random.

use super::arguments::Arguments;
use super::construction::{Construction, ConstructionResult};
use super::symbols::{ConfigurationObjectType, ObjectId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A free object with no derivation
#[derive(Debug, Clone)]
pub struct LooseConfigurationObject {
    id: ObjectId,
    object_type: ConfigurationObjectType,
}

/// An object derived by applying a construction to arguments
#[derive(Debug, Clone)]
pub struct ConstructedConfigurationObject {
    id: ObjectId,
    construction: Arc<Construction>,
    arguments: Arguments,
}

impl ConstructedConfigurationObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn construction(&self) -> &Arc<Construction> {
        &self.construction
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn object_type(&self) -> ConfigurationObjectType {
        self.construction.output_type()
    }
}

/// A node of the symbolic object graph
#[derive(Debug, Clone)]
pub enum ConfigurationObject {
    Loose(LooseConfigurationObject),
    Constructed(ConstructedConfigurationObject),
}

impl ConfigurationObject {
    /// Create a new loose object with a fresh id
    pub fn loose(object_type: ConfigurationObjectType) -> Arc<Self> {
        Arc::new(ConfigurationObject::Loose(LooseConfigurationObject {
            id: ObjectId::next(),
            object_type,
        }))
    }

    /// Apply `construction` to a flat input list.
    ///
    /// Fails with `SignatureMismatch` if the inputs do not fit the signature.
    pub fn constructed(
        construction: Arc<Construction>,
        inputs: &[Arc<ConfigurationObject>],
    ) -> ConstructionResult<Arc<Self>> {
        let arguments = construction
            .signature()
            .match_inputs(construction.name(), inputs)?;

        Ok(Self::from_arguments(construction, arguments))
    }

    /// Wrap already matched arguments with a fresh id
    pub(crate) fn from_arguments(construction: Arc<Construction>, arguments: Arguments) -> Arc<Self> {
        Arc::new(ConfigurationObject::Constructed(ConstructedConfigurationObject {
            id: ObjectId::next(),
            construction,
            arguments,
        }))
    }

    pub fn id(&self) -> ObjectId {
        match self {
            ConfigurationObject::Loose(loose) => loose.id,
            ConfigurationObject::Constructed(constructed) => constructed.id,
        }
    }

    pub fn object_type(&self) -> ConfigurationObjectType {
        match self {
            ConfigurationObject::Loose(loose) => loose.object_type,
            ConfigurationObject::Constructed(constructed) => constructed.object_type(),
        }
    }

    pub fn is_loose(&self) -> bool {
        matches!(self, ConfigurationObject::Loose(_))
    }

    pub fn as_constructed(&self) -> Option<&ConstructedConfigurationObject> {
        match self {
            ConfigurationObject::Loose(_) => None,
            ConfigurationObject::Constructed(constructed) => Some(constructed),
        }
    }

    /// True if this object or anything it depends on is random
    pub fn is_random(&self) -> bool {
        match self {
            ConfigurationObject::Loose(_) => false,
            ConfigurationObject::Constructed(constructed) => {
                constructed.construction.is_random()
                    || constructed.arguments.flatten().iter().any(|a| a.is_random())
            }
        }
    }

    /// Rebuild this object with every loose leaf substituted by `map_loose`.
    ///
    /// Loose objects map to their image directly; constructed objects are
    /// rebuilt recursively over the same construction with a fresh id.
    /// Returns `None` if some loose leaf has no image.
    pub fn remap_with<F>(self: &Arc<Self>, map_loose: &F) -> Option<Arc<Self>>
    where
        F: Fn(&Arc<ConfigurationObject>) -> Option<Arc<ConfigurationObject>>,
    {
        match self.as_ref() {
            ConfigurationObject::Loose(_) => map_loose(self),
            ConfigurationObject::Constructed(constructed) => {
                let arguments = constructed
                    .arguments
                    .remap_with(|leaf| leaf.remap_with(map_loose))?;

                Some(Self::from_arguments(
                    Arc::clone(&constructed.construction),
                    arguments,
                ))
            }
        }
    }
}

impl PartialEq for ConfigurationObject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConfigurationObject::Loose(a), ConfigurationObject::Loose(b)) => a.id == b.id,
            (ConfigurationObject::Constructed(a), ConfigurationObject::Constructed(b)) => {
                if a.id == b.id {
                    return true;
                }
                // Random outputs are not determined by the arguments
                if a.construction.is_random() || b.construction.is_random() {
                    return false;
                }
                a.construction == b.construction && a.arguments == b.arguments
            }
            _ => false,
        }
    }
}

impl Eq for ConfigurationObject {}

impl Hash for ConfigurationObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ConfigurationObject::Loose(loose) => {
                0u8.hash(state);
                loose.id.hash(state);
            }
            ConfigurationObject::Constructed(constructed) if constructed.construction.is_random() => {
                1u8.hash(state);
                constructed.id.hash(state);
            }
            ConfigurationObject::Constructed(constructed) => {
                2u8.hash(state);
                constructed.construction.hash(state);
                constructed.arguments.hash(state);
            }
        }
    }
}

impl fmt::Display for ConfigurationObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationObject::Loose(loose) => write!(f, "{} {}", loose.object_type, loose.id),
            ConfigurationObject::Constructed(constructed) => write!(
                f,
                "{} = {}({})",
                constructed.id, constructed.construction, constructed.arguments
            ),
        }
    }
}
