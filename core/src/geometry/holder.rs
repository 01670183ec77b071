//! Geometry holder
//!
//! Keeps K independent pictures of one configuration and decides, for each
//! newly registered object, whether it is new, coincides with an already
//! resolved object, or cannot be constructed. A decision is only taken when
//! every picture agrees; a split vote means the numeric realization cannot be
//! trusted and is reported as an error.

use super::container::{ObjectsContainer, Verdict};
use super::seeds::picture_seed;
use crate::ir::{Configuration, ConfigurationError, ConfigurationObject, LooseObjectsHolder, ObjectId};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by the geometry holder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Object {object} cannot be constructed in picture {picture}")]
    UnconstructibleConfiguration { object: ObjectId, picture: usize },

    #[error("Pictures disagree on object {object}: {verdicts:?}")]
    InconsistentContainers { object: ObjectId, verdicts: Vec<Verdict> },

    #[error("Object {object} coincides with {existing} in every picture")]
    DuplicateInConfiguration { object: ObjectId, existing: ObjectId },

    #[error("Geometry holder is not initialized")]
    NotInitialized,

    #[error("Invalid holder settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Result type for geometry holder operations
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Holder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolderSettings {
    /// Number of independent pictures (K)
    pub number_of_pictures: usize,
    /// Absolute tolerance of numeric equality
    pub tolerance: f64,
    /// Picture rebuilds allowed after an inconsistency (0 = always fatal)
    pub max_reconstruction_attempts: usize,
    /// Master seed; drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Default for HolderSettings {
    fn default() -> Self {
        Self {
            number_of_pictures: 5,
            tolerance: 1e-6,
            max_reconstruction_attempts: 0,
            seed: None,
        }
    }
}

impl HolderSettings {
    fn validate(&self) -> GeometryResult<()> {
        if self.number_of_pictures == 0 {
            return Err(GeometryError::InvalidSettings(
                "number_of_pictures must be positive".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(GeometryError::InvalidSettings(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Pictures plus the objects they realize
#[derive(Debug, Clone, Default)]
struct Pictures {
    containers: Vec<ObjectsContainer>,
    /// Resolved constructed objects, in registration order
    resolved: Vec<Arc<ConfigurationObject>>,
    /// Structural index of `resolved`
    index: FxHashMap<Arc<ConfigurationObject>, ObjectId>,
}

impl Pictures {
    /// Add `object` to every picture and return the unanimous verdict.
    ///
    /// Nothing stays behind unless the verdict is `Fresh`.
    fn add(&mut self, object: &Arc<ConfigurationObject>) -> GeometryResult<Verdict> {
        let Some(constructed) = object.as_constructed() else {
            return Err(ConfigurationError::NotConstructed(object.id()).into());
        };

        let verdicts: Vec<Verdict> = self
            .containers
            .iter_mut()
            .map(|container| container.try_add_constructed(constructed))
            .collect();

        match unanimous(&verdicts) {
            Some(Verdict::Fresh) => {
                self.resolved.push(Arc::clone(object));
                self.index.insert(Arc::clone(object), object.id());
                Ok(Verdict::Fresh)
            }
            Some(verdict) => Ok(verdict),
            None => {
                for (container, verdict) in self.containers.iter_mut().zip(&verdicts) {
                    if *verdict == Verdict::Fresh {
                        container.remove(object.id());
                    }
                }
                Err(GeometryError::InconsistentContainers {
                    object: object.id(),
                    verdicts,
                })
            }
        }
    }

    /// Add the objects of a configuration; every one must be fresh
    fn populate(containers: Vec<ObjectsContainer>, objects: &[Arc<ConfigurationObject>]) -> GeometryResult<Self> {
        let mut pictures = Pictures {
            containers,
            ..Default::default()
        };

        for object in objects {
            match pictures.add(object)? {
                Verdict::Fresh => {}
                Verdict::DuplicateOf(existing) => {
                    return Err(GeometryError::DuplicateInConfiguration {
                        object: object.id(),
                        existing,
                    });
                }
                Verdict::Unconstructible => {
                    return Err(GeometryError::UnconstructibleConfiguration {
                        object: object.id(),
                        picture: 0,
                    });
                }
            }
        }

        Ok(pictures)
    }
}

/// The shared verdict, `None` on any disagreement
fn unanimous(verdicts: &[Verdict]) -> Option<Verdict> {
    let (first, rest) = verdicts.split_first()?;
    rest.iter().all(|verdict| verdict == first).then_some(*first)
}

/// Multi-picture duplicate detector for one search branch
#[derive(Debug, Clone)]
pub struct GeometryHolder {
    settings: HolderSettings,
    master_seed: u64,
    /// Number of picture rebuilds so far
    generation: u64,
    loose_objects: Option<LooseObjectsHolder>,
    pictures: Pictures,
}

impl GeometryHolder {
    pub fn new(settings: HolderSettings) -> GeometryResult<Self> {
        settings.validate()?;
        let master_seed = settings.seed.unwrap_or_else(rand::random);

        Ok(Self {
            settings,
            master_seed,
            generation: 0,
            loose_objects: None,
            pictures: Pictures::default(),
        })
    }

    pub fn settings(&self) -> &HolderSettings {
        &self.settings
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn is_initialized(&self) -> bool {
        self.loose_objects.is_some()
    }

    /// Read-only access to the pictures
    pub fn containers(&self) -> &[ObjectsContainer] {
        &self.pictures.containers
    }

    /// Resolved constructed objects, in registration order
    pub fn resolved_objects(&self) -> &[Arc<ConfigurationObject>] {
        &self.pictures.resolved
    }

    pub fn is_resolved(&self, id: ObjectId) -> bool {
        self.pictures.resolved.iter().any(|object| object.id() == id)
    }

    fn sample_pictures(&self, loose_objects: &LooseObjectsHolder) -> Vec<ObjectsContainer> {
        (0..self.settings.number_of_pictures)
            .map(|index| {
                let seed = picture_seed(self.master_seed, self.generation, index);
                ObjectsContainer::new(loose_objects, self.settings.tolerance, seed)
            })
            .collect()
    }

    /// Build K pictures of `configuration`.
    ///
    /// Every constructed object must be constructible and distinct from the
    /// objects before it in every picture.
    pub fn initialize(&mut self, configuration: &Configuration) -> GeometryResult<()> {
        self.initialize_sampled(configuration, Self::sample_pictures)
    }

    /// `initialize` with pictures drawn by `sample`, retrying on inconsistency
    fn initialize_sampled<F>(&mut self, configuration: &Configuration, sample: F) -> GeometryResult<()>
    where
        F: Fn(&Self, &LooseObjectsHolder) -> Vec<ObjectsContainer>,
    {
        self.loose_objects = None;
        self.pictures = Pictures::default();

        let loose_objects = configuration.loose_objects_holder();
        let mut attempt = 0;

        loop {
            let containers = sample(&*self, loose_objects);
            match self.initialize_with_pictures(configuration, containers) {
                Err(err @ GeometryError::InconsistentContainers { .. })
                    if attempt < self.settings.max_reconstruction_attempts =>
                {
                    attempt += 1;
                    self.generation += 1;
                    warn!(%err, attempt, "inconsistent pictures during initialization, resampling");
                }
                result => return result,
            }
        }
    }

    /// Initialize from pictures that already realize the loose objects
    pub fn initialize_with_pictures(
        &mut self,
        configuration: &Configuration,
        containers: Vec<ObjectsContainer>,
    ) -> GeometryResult<()> {
        if containers.is_empty() {
            return Err(GeometryError::InvalidSettings("no pictures supplied".to_string()));
        }

        let pictures = Pictures::populate(containers, configuration.constructed_objects())
            .map_err(locate_unconstructible)?;

        info!(
            pictures = pictures.containers.len(),
            loose = configuration.loose_objects().len(),
            constructed = pictures.resolved.len(),
            "geometry holder initialized"
        );

        self.loose_objects = Some(configuration.loose_objects_holder().clone());
        self.pictures = pictures;
        Ok(())
    }

    /// Decide whether `object` is new.
    ///
    /// Every argument of `object` must be a loose or resolved object.
    /// Registering an already resolved object again is a no-op reported as
    /// `Fresh`, so the caller keeps it.
    pub fn register(&mut self, object: &Arc<ConfigurationObject>) -> GeometryResult<Verdict> {
        if !self.is_initialized() {
            return Err(GeometryError::NotInitialized);
        }
        if object.is_loose() {
            return Err(ConfigurationError::NotConstructed(object.id()).into());
        }

        if let Some(&existing) = self.pictures.index.get(object) {
            if existing == object.id() {
                debug!(object = %existing, "already resolved");
                return Ok(Verdict::Fresh);
            }
            debug!(object = %object.id(), %existing, "structural duplicate");
            return Ok(Verdict::DuplicateOf(existing));
        }

        let mut attempt = 0;
        loop {
            match self.pictures.add(object) {
                Err(err @ GeometryError::InconsistentContainers { .. })
                    if attempt < self.settings.max_reconstruction_attempts =>
                {
                    attempt += 1;
                    warn!(%err, attempt, "inconsistent pictures, reconstructing");
                    if let Err(err) = self.reconstruct() {
                        warn!(%err, attempt, "reconstruction failed");
                    }
                }
                Ok(verdict) => {
                    debug!(object = %object.id(), %verdict, "registered");
                    return Ok(verdict);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Resample every picture and re-add the resolved objects.
    ///
    /// On failure the current pictures are kept.
    fn reconstruct(&mut self) -> GeometryResult<()> {
        let Some(loose_objects) = self.loose_objects.clone() else {
            return Err(GeometryError::NotInitialized);
        };

        self.generation += 1;
        let containers = self.sample_pictures(&loose_objects);
        let resolved = self.pictures.resolved.clone();

        self.pictures = Pictures::populate(containers, &resolved)?;
        info!(generation = self.generation, objects = resolved.len(), "pictures reconstructed");
        Ok(())
    }

    /// Forget resolved objects together with every resolved object built on
    /// them; loose and unknown ids are ignored.
    ///
    /// Returns the removed ids in registration order.
    pub fn remove(&mut self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let requested: FxHashSet<ObjectId> = ids.iter().copied().collect();
        let mut removed: FxHashSet<ObjectId> = FxHashSet::default();
        let mut evicted = Vec::new();

        // Dependents are registered after their arguments
        for object in std::mem::take(&mut self.pictures.resolved) {
            let depends_on_removed = object.as_constructed().is_some_and(|constructed| {
                constructed
                    .arguments()
                    .flatten()
                    .iter()
                    .any(|argument| removed.contains(&argument.id()))
            });

            if requested.contains(&object.id()) || depends_on_removed {
                removed.insert(object.id());
                evicted.push(object);
            } else {
                self.pictures.resolved.push(object);
            }
        }

        for object in &evicted {
            self.pictures.index.remove(object);
            for container in &mut self.pictures.containers {
                container.remove(object.id());
            }
            debug!(object = %object.id(), "removed");
        }

        evicted.iter().map(|object| object.id()).collect()
    }
}

/// Report mixed constructibility during initialization as unconstructible
fn locate_unconstructible(err: GeometryError) -> GeometryError {
    match err {
        GeometryError::InconsistentContainers { object, verdicts } => {
            match verdicts.iter().position(|verdict| *verdict == Verdict::Unconstructible) {
                Some(picture) => GeometryError::UnconstructibleConfiguration { object, picture },
                None => GeometryError::InconsistentContainers { object, verdicts },
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analytic::{GeometricObject, Point};
    use crate::ir::{LooseObjectsLayout, PredefinedConstructionType};
    use crate::registry::ConstructionRegistry;

    fn settings(seed: u64) -> HolderSettings {
        HolderSettings {
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn construct(
        construction_type: PredefinedConstructionType,
        inputs: &[Arc<ConfigurationObject>],
    ) -> Arc<ConfigurationObject> {
        let construction = ConstructionRegistry::global().predefined(construction_type);
        ConfigurationObject::constructed(construction, inputs).unwrap()
    }

    /// Picture where the midpoint of the first two points is the third point
    fn collinear_picture(loose_objects: &LooseObjectsHolder) -> ObjectsContainer {
        let mut picture = ObjectsContainer::empty(1e-6, 99);
        let coordinates = [(0.0, 0.0), (2.0, 0.0), (1.0, 0.0)];
        for (object, (x, y)) in loose_objects.loose_objects().iter().zip(coordinates) {
            picture.add(object.id(), GeometricObject::Point(Point::new(x, y)));
        }
        picture
    }

    fn midpoint_configuration() -> (Configuration, Arc<ConfigurationObject>) {
        let holder_objects = LooseObjectsHolder::with_layout(LooseObjectsLayout::ThreePoints);
        let loose = holder_objects.loose_objects().to_vec();
        let midpoint = construct(PredefinedConstructionType::Midpoint, &loose[..2]);
        let configuration = Configuration::new(holder_objects, vec![midpoint.clone()]).unwrap();
        (configuration, midpoint)
    }

    /// First generation has one collinear picture, later ones are regular
    fn collinear_first(holder: &GeometryHolder, loose_objects: &LooseObjectsHolder) -> Vec<ObjectsContainer> {
        let mut pictures = holder.sample_pictures(loose_objects);
        if holder.generation == 0 {
            pictures[0] = collinear_picture(loose_objects);
        }
        pictures
    }

    fn triangle() -> (Configuration, Vec<Arc<ConfigurationObject>>) {
        let holder = LooseObjectsHolder::with_layout(LooseObjectsLayout::ScaleneAcuteTriangle);
        let loose = holder.loose_objects().to_vec();
        (Configuration::from_loose_objects(holder), loose)
    }

    #[test]
    fn test_default_settings() {
        let settings = HolderSettings::default();

        assert_eq!(settings.number_of_pictures, 5);
        assert_eq!(settings.max_reconstruction_attempts, 0);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_settings_from_partial_json() {
        let settings: HolderSettings = serde_json::from_str(r#"{"number_of_pictures": 3}"#).unwrap();

        assert_eq!(settings.number_of_pictures, 3);
        assert_eq!(settings.tolerance, 1e-6);
    }

    #[test]
    fn test_invalid_settings() {
        let zero = HolderSettings {
            number_of_pictures: 0,
            ..Default::default()
        };
        assert!(matches!(GeometryHolder::new(zero), Err(GeometryError::InvalidSettings(_))));
    }

    #[test]
    fn test_register_before_initialize() {
        let (_, loose) = triangle();
        let midpoint = construct(PredefinedConstructionType::Midpoint, &loose[..2]);
        let mut holder = GeometryHolder::new(settings(1)).unwrap();

        assert_eq!(holder.register(&midpoint), Err(GeometryError::NotInitialized));
    }

    #[test]
    fn test_register_fresh_then_numeric_duplicate() {
        let (configuration, loose) = triangle();
        let mut holder = GeometryHolder::new(settings(2)).unwrap();
        holder.initialize(&configuration).unwrap();

        let ab = construct(PredefinedConstructionType::LineFromPoints, &loose[..2]);
        assert_eq!(holder.register(&ab).unwrap(), Verdict::Fresh);

        // Structurally different, numerically the same line
        let through_a = construct(PredefinedConstructionType::ParallelLine, &[loose[0].clone(), ab.clone()]);
        assert_eq!(holder.register(&through_a).unwrap(), Verdict::DuplicateOf(ab.id()));
        assert!(!holder.is_resolved(through_a.id()));
        for container in holder.containers() {
            assert!(!container.contains(through_a.id()));
        }
    }

    #[test]
    fn test_structural_fast_path() {
        let (configuration, loose) = triangle();
        let mut holder = GeometryHolder::new(settings(3)).unwrap();
        holder.initialize(&configuration).unwrap();

        let m1 = construct(PredefinedConstructionType::Midpoint, &[loose[0].clone(), loose[1].clone()]);
        let m2 = construct(PredefinedConstructionType::Midpoint, &[loose[1].clone(), loose[0].clone()]);

        assert_eq!(holder.register(&m1).unwrap(), Verdict::Fresh);
        assert_eq!(holder.register(&m2).unwrap(), Verdict::DuplicateOf(m1.id()));
    }

    #[test]
    fn test_unanimous_unconstructible() {
        let holder_objects = LooseObjectsHolder::with_layout(LooseObjectsLayout::LineAndPoint);
        let (line, point) = (
            holder_objects.loose_objects()[0].clone(),
            holder_objects.loose_objects()[1].clone(),
        );
        let configuration = Configuration::from_loose_objects(holder_objects);
        let mut holder = GeometryHolder::new(settings(4)).unwrap();
        holder.initialize(&configuration).unwrap();

        let parallel = construct(PredefinedConstructionType::ParallelLine, &[point, line.clone()]);
        assert_eq!(holder.register(&parallel).unwrap(), Verdict::Fresh);

        let intersection = construct(PredefinedConstructionType::IntersectionOfLines, &[line, parallel]);
        assert_eq!(holder.register(&intersection).unwrap(), Verdict::Unconstructible);
        assert!(!holder.is_resolved(intersection.id()));
    }

    #[test]
    fn test_initialize_rejects_duplicate() {
        let holder_objects = LooseObjectsHolder::with_layout(LooseObjectsLayout::ThreePoints);
        let loose = holder_objects.loose_objects().to_vec();
        let ab = construct(PredefinedConstructionType::LineFromPoints, &loose[..2]);
        let parallel = construct(PredefinedConstructionType::ParallelLine, &[loose[1].clone(), ab.clone()]);
        let configuration = Configuration::new(holder_objects, vec![ab.clone(), parallel.clone()]).unwrap();

        let mut holder = GeometryHolder::new(settings(5)).unwrap();
        let err = holder.initialize(&configuration).unwrap_err();

        assert_eq!(
            err,
            GeometryError::DuplicateInConfiguration {
                object: parallel.id(),
                existing: ab.id(),
            }
        );
        assert!(!holder.is_initialized());
    }

    #[test]
    fn test_initialize_registers_constructed_objects() {
        let holder_objects = LooseObjectsHolder::with_layout(LooseObjectsLayout::ThreePoints);
        let loose = holder_objects.loose_objects().to_vec();
        let circumcircle = construct(PredefinedConstructionType::Circumcircle, &loose);
        let center = construct(PredefinedConstructionType::CenterOfCircle, &[circumcircle.clone()]);
        let configuration = Configuration::new(holder_objects, vec![circumcircle, center.clone()]).unwrap();

        let mut holder = GeometryHolder::new(settings(6)).unwrap();
        holder.initialize(&configuration).unwrap();

        assert_eq!(holder.resolved_objects().len(), 2);
        assert!(holder.is_resolved(center.id()));
        assert_eq!(holder.containers().len(), 5);
        for container in holder.containers() {
            assert_eq!(container.len(), 5);
        }

        let circumcenter = construct(PredefinedConstructionType::Circumcenter, &loose);
        assert_eq!(holder.register(&circumcenter).unwrap(), Verdict::DuplicateOf(center.id()));
    }

    #[test]
    fn test_reregistering_resolved_object_is_a_no_op() {
        let (configuration, loose) = triangle();
        let mut holder = GeometryHolder::new(settings(9)).unwrap();
        holder.initialize(&configuration).unwrap();
        let midpoint = construct(PredefinedConstructionType::Midpoint, &loose[..2]);

        assert_eq!(holder.register(&midpoint).unwrap(), Verdict::Fresh);
        assert_eq!(holder.register(&midpoint).unwrap(), Verdict::Fresh);
        assert_eq!(holder.resolved_objects().len(), 1);
        for container in holder.containers() {
            assert!(container.contains(midpoint.id()));
        }
    }

    #[test]
    fn test_initialize_resamples_after_inconsistency() {
        let (configuration, midpoint) = midpoint_configuration();
        let mut holder = GeometryHolder::new(HolderSettings {
            max_reconstruction_attempts: 1,
            ..settings(10)
        })
        .unwrap();

        holder.initialize_sampled(&configuration, collinear_first).unwrap();

        assert!(holder.is_initialized());
        assert_eq!(holder.generation, 1);
        assert!(holder.is_resolved(midpoint.id()));
        for container in holder.containers() {
            assert!(container.contains(midpoint.id()));
        }
    }

    #[test]
    fn test_initialize_without_attempts_reports_inconsistency() {
        let (configuration, midpoint) = midpoint_configuration();
        let mut holder = GeometryHolder::new(settings(11)).unwrap();

        let err = holder.initialize_sampled(&configuration, collinear_first).unwrap_err();

        assert!(matches!(
            err,
            GeometryError::InconsistentContainers { object, .. } if object == midpoint.id()
        ));
        assert!(!holder.is_initialized());
    }

    #[test]
    fn test_remove_cascades_to_dependents() {
        let (configuration, loose) = triangle();
        let mut holder = GeometryHolder::new(settings(12)).unwrap();
        holder.initialize(&configuration).unwrap();

        let ab = construct(PredefinedConstructionType::LineFromPoints, &loose[..2]);
        let altitude = construct(PredefinedConstructionType::PerpendicularLine, &[loose[2].clone(), ab.clone()]);
        let foot = construct(PredefinedConstructionType::IntersectionOfLines, &[ab.clone(), altitude.clone()]);
        let midpoint = construct(PredefinedConstructionType::Midpoint, &[loose[0].clone(), loose[2].clone()]);
        for object in [&ab, &altitude, &foot, &midpoint] {
            assert_eq!(holder.register(object).unwrap(), Verdict::Fresh);
        }

        let removed = holder.remove(&[ab.id()]);

        assert_eq!(removed, vec![ab.id(), altitude.id(), foot.id()]);
        assert_eq!(holder.resolved_objects().len(), 1);
        assert!(holder.is_resolved(midpoint.id()));
        for container in holder.containers() {
            assert!(!container.contains(foot.id()));
        }

        // Rebuilt pictures only need the remaining objects
        holder.reconstruct().unwrap();
        for container in holder.containers() {
            assert!(container.contains(midpoint.id()));
            assert!(!container.contains(ab.id()));
        }
    }

    #[test]
    fn test_remove_ignores_loose_and_unknown_ids() {
        let (configuration, loose) = triangle();
        let mut holder = GeometryHolder::new(settings(7)).unwrap();
        holder.initialize(&configuration).unwrap();

        assert!(holder.remove(&[loose[0].id(), ObjectId(u64::MAX)]).is_empty());

        for container in holder.containers() {
            assert!(container.contains(loose[0].id()));
        }
    }

    #[test]
    fn test_same_seed_same_pictures() {
        let (configuration, _) = triangle();
        let mut h1 = GeometryHolder::new(settings(8)).unwrap();
        let mut h2 = GeometryHolder::new(settings(8)).unwrap();
        h1.initialize(&configuration).unwrap();
        h2.initialize(&configuration).unwrap();

        for (c1, c2) in h1.containers().iter().zip(h2.containers()) {
            for id in c1.ids() {
                assert_eq!(c1.get(*id), c2.get(*id));
            }
        }
    }

    #[test]
    fn test_unanimous() {
        assert_eq!(unanimous(&[Verdict::Fresh, Verdict::Fresh]), Some(Verdict::Fresh));
        assert_eq!(unanimous(&[Verdict::Fresh, Verdict::Unconstructible]), None);
        assert_eq!(unanimous(&[]), None);
    }

    #[test]
    fn test_holder_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<GeometryHolder>();
    }
}
