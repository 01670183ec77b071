//! Configurations: loose objects under a layout plus constructed objects
//!
//! Constructed objects are kept in dependency order: every argument of the
//! i-th constructed object is a loose object or one of the objects before it.

use super::mapping::LooseObjectBijection;
use super::objects::ConfigurationObject;
use super::symbols::{ConfigurationObjectType, ObjectId};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised when assembling configurations and bijections
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Loose objects do not fit layout {layout:?}: {reason}")]
    LayoutMismatch {
        layout: LooseObjectsLayout,
        reason: String,
    },

    #[error("Object {0} is not a loose object")]
    NotLoose(ObjectId),

    #[error("Object {0} is not a constructed object")]
    NotConstructed(ObjectId),

    #[error("Object {object} uses {argument} before it is defined")]
    ForwardReference { object: ObjectId, argument: ObjectId },

    #[error("Object {0} appears twice in the configuration")]
    DuplicateObject(ObjectId),

    #[error("Invalid bijection: {0}")]
    InvalidBijection(String),
}

/// Result type for configuration operations
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// Constraint on how loose objects are sampled numerically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LooseObjectsLayout {
    TwoPoints,
    ThreePoints,
    FourPoints,
    FourConcyclicPoints,
    /// Triangle with pairwise different sides and all angles acute
    ScaleneAcuteTriangle,
    /// Triangle with the right angle at the first point
    RightTriangle,
    LineAndPoint,
    LineAndTwoPoints,
}

impl LooseObjectsLayout {
    /// Types of the loose objects this layout expects, in order
    pub fn object_types(&self) -> Vec<ConfigurationObjectType> {
        use ConfigurationObjectType::*;

        match self {
            LooseObjectsLayout::TwoPoints => vec![Point, Point],
            LooseObjectsLayout::ThreePoints
            | LooseObjectsLayout::ScaleneAcuteTriangle
            | LooseObjectsLayout::RightTriangle => vec![Point, Point, Point],
            LooseObjectsLayout::FourPoints | LooseObjectsLayout::FourConcyclicPoints => {
                vec![Point, Point, Point, Point]
            }
            LooseObjectsLayout::LineAndPoint => vec![Line, Point],
            LooseObjectsLayout::LineAndTwoPoints => vec![Line, Point, Point],
        }
    }
}

/// The loose objects of a configuration together with their layout
#[derive(Debug, Clone)]
pub struct LooseObjectsHolder {
    loose_objects: Vec<Arc<ConfigurationObject>>,
    layout: LooseObjectsLayout,
}

impl LooseObjectsHolder {
    pub fn new(
        loose_objects: Vec<Arc<ConfigurationObject>>,
        layout: LooseObjectsLayout,
    ) -> ConfigurationResult<Self> {
        let mut seen = FxHashSet::default();
        for object in &loose_objects {
            if !object.is_loose() {
                return Err(ConfigurationError::NotLoose(object.id()));
            }
            if !seen.insert(object.id()) {
                return Err(ConfigurationError::DuplicateObject(object.id()));
            }
        }

        let types: Vec<_> = loose_objects.iter().map(|o| o.object_type()).collect();
        if types != layout.object_types() {
            return Err(ConfigurationError::LayoutMismatch {
                layout,
                reason: format!("expected {:?}, got {:?}", layout.object_types(), types),
            });
        }

        Ok(Self {
            loose_objects,
            layout,
        })
    }

    /// Create fresh loose objects matching `layout`
    pub fn with_layout(layout: LooseObjectsLayout) -> Self {
        let loose_objects = layout
            .object_types()
            .into_iter()
            .map(ConfigurationObject::loose)
            .collect();

        Self {
            loose_objects,
            layout,
        }
    }

    pub fn loose_objects(&self) -> &[Arc<ConfigurationObject>] {
        &self.loose_objects
    }

    pub fn layout(&self) -> LooseObjectsLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.loose_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loose_objects.is_empty()
    }
}

/// A symbolic configuration
#[derive(Debug, Clone)]
pub struct Configuration {
    loose_objects_holder: LooseObjectsHolder,
    constructed_objects: Vec<Arc<ConfigurationObject>>,
}

impl Configuration {
    /// Assemble a configuration, checking dependency order
    pub fn new(
        loose_objects_holder: LooseObjectsHolder,
        constructed_objects: Vec<Arc<ConfigurationObject>>,
    ) -> ConfigurationResult<Self> {
        let mut known: FxHashSet<ObjectId> = loose_objects_holder
            .loose_objects()
            .iter()
            .map(|o| o.id())
            .collect();

        for object in &constructed_objects {
            Self::check_can_follow(&known, object)?;
            known.insert(object.id());
        }

        Ok(Self {
            loose_objects_holder,
            constructed_objects,
        })
    }

    /// A configuration with no constructed objects
    pub fn from_loose_objects(loose_objects_holder: LooseObjectsHolder) -> Self {
        Self {
            loose_objects_holder,
            constructed_objects: Vec::new(),
        }
    }

    fn check_can_follow(
        known: &FxHashSet<ObjectId>,
        object: &Arc<ConfigurationObject>,
    ) -> ConfigurationResult<()> {
        let constructed = object
            .as_constructed()
            .ok_or(ConfigurationError::NotConstructed(object.id()))?;

        if known.contains(&object.id()) {
            return Err(ConfigurationError::DuplicateObject(object.id()));
        }

        for argument in constructed.arguments().flatten() {
            if !known.contains(&argument.id()) {
                return Err(ConfigurationError::ForwardReference {
                    object: object.id(),
                    argument: argument.id(),
                });
            }
        }

        Ok(())
    }

    /// A new configuration extended by one constructed object
    pub fn derive(&self, object: Arc<ConfigurationObject>) -> ConfigurationResult<Configuration> {
        let known: FxHashSet<ObjectId> = self.all_objects().map(|o| o.id()).collect();
        Self::check_can_follow(&known, &object)?;

        let mut constructed_objects = self.constructed_objects.clone();
        constructed_objects.push(object);

        Ok(Self {
            loose_objects_holder: self.loose_objects_holder.clone(),
            constructed_objects,
        })
    }

    pub fn loose_objects_holder(&self) -> &LooseObjectsHolder {
        &self.loose_objects_holder
    }

    pub fn loose_objects(&self) -> &[Arc<ConfigurationObject>] {
        self.loose_objects_holder.loose_objects()
    }

    pub fn constructed_objects(&self) -> &[Arc<ConfigurationObject>] {
        &self.constructed_objects
    }

    pub fn last_constructed_object(&self) -> Option<&Arc<ConfigurationObject>> {
        self.constructed_objects.last()
    }

    /// Loose objects followed by constructed objects
    pub fn all_objects(&self) -> impl Iterator<Item = &Arc<ConfigurationObject>> {
        self.loose_objects().iter().chain(self.constructed_objects.iter())
    }

    pub fn objects_of_type(
        &self,
        object_type: ConfigurationObjectType,
    ) -> impl Iterator<Item = &Arc<ConfigurationObject>> {
        self.all_objects().filter(move |o| o.object_type() == object_type)
    }

    /// The object of this configuration structurally equal to `object`
    pub fn find_equal(&self, object: &ConfigurationObject) -> Option<&Arc<ConfigurationObject>> {
        self.all_objects().find(|candidate| candidate.as_ref() == object)
    }

    pub fn contains(&self, object: &ConfigurationObject) -> bool {
        self.find_equal(object).is_some()
    }

    /// Apply a bijection of the loose objects to the whole configuration.
    ///
    /// The bijection must cover every loose object. Remapped constructed
    /// objects reference each other, so the result is again a valid
    /// configuration over the image loose objects.
    pub fn remap(&self, bijection: &LooseObjectBijection) -> Option<Configuration> {
        let mut images: FxHashMap<ObjectId, Arc<ConfigurationObject>> = FxHashMap::default();

        let mut loose_objects = Vec::with_capacity(self.loose_objects_holder.len());
        for loose in self.loose_objects() {
            let image = bijection.image(loose.id())?.clone();
            images.insert(loose.id(), image.clone());
            loose_objects.push(image);
        }

        let mut constructed_objects = Vec::with_capacity(self.constructed_objects.len());
        for object in &self.constructed_objects {
            let constructed = object.as_constructed()?;
            let arguments = constructed
                .arguments()
                .remap_with(|leaf| images.get(&leaf.id()).cloned())?;

            let image =
                ConfigurationObject::from_arguments(constructed.construction().clone(), arguments);
            images.insert(object.id(), image.clone());
            constructed_objects.push(image);
        }

        let loose_objects_holder =
            LooseObjectsHolder::new(loose_objects, self.loose_objects_holder.layout).ok()?;

        Configuration::new(loose_objects_holder, constructed_objects).ok()
    }

    /// Check if the bijection maps this configuration onto itself.
    ///
    /// The loose objects must map onto themselves as a set, and the set of
    /// constructed objects must be preserved structurally.
    pub fn is_symmetric_under(&self, bijection: &LooseObjectBijection) -> bool {
        let Some(remapped) = self.remap(bijection) else {
            return false;
        };

        let original_loose: FxHashSet<ObjectId> = self.loose_objects().iter().map(|o| o.id()).collect();
        let remapped_loose: FxHashSet<ObjectId> = remapped.loose_objects().iter().map(|o| o.id()).collect();
        if original_loose != remapped_loose {
            return false;
        }

        let original: FxHashSet<&ConfigurationObject> =
            self.constructed_objects.iter().map(|o| o.as_ref()).collect();

        remapped.constructed_objects.len() == self.constructed_objects.len()
            && remapped
                .constructed_objects
                .iter()
                .all(|o| original.contains(o.as_ref()))
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}:", self.loose_objects_holder.layout)?;
        for loose in self.loose_objects() {
            writeln!(f, "  {}", loose)?;
        }
        for constructed in &self.constructed_objects {
            writeln!(f, "  {}", constructed)?;
        }
        Ok(())
    }
}
