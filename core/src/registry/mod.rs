//! Construction registry
//!
//! Process-wide, read-only catalog of predefined and composed constructions.
//! Built once on first use; lookups never mutate it.

pub mod composed;

use crate::ir::{
    Construction, ConstructionError, ConstructionResult, PredefinedConstruction,
    PredefinedConstructionType,
};
use rustc_hash::FxHashMap;
use std::sync::{Arc, OnceLock};

/// Catalog of every known construction
#[derive(Debug)]
pub struct ConstructionRegistry {
    predefined: FxHashMap<PredefinedConstructionType, Arc<Construction>>,
    composed: FxHashMap<String, Arc<Construction>>,
}

impl ConstructionRegistry {
    /// The process-wide registry
    pub fn global() -> &'static ConstructionRegistry {
        static REGISTRY: OnceLock<ConstructionRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ConstructionRegistry::build)
    }

    fn build() -> Self {
        let predefined: FxHashMap<_, _> = PredefinedConstructionType::ALL
            .iter()
            .map(|&construction_type| {
                let construction =
                    Construction::Predefined(PredefinedConstruction::new(construction_type));
                (construction_type, Arc::new(construction))
            })
            .collect();

        let composed = composed::all_composed(|construction_type| {
            Arc::clone(&predefined[&construction_type])
        })
        .unwrap_or_else(|err| panic!("built-in composed construction is malformed: {}", err))
        .into_iter()
        .map(|construction| {
            let construction = Construction::Composed(construction);
            (construction.name().to_string(), Arc::new(construction))
        })
        .collect();

        Self {
            predefined,
            composed,
        }
    }

    /// A predefined construction by type
    pub fn predefined(&self, construction_type: PredefinedConstructionType) -> Arc<Construction> {
        // Every type is inserted in `build`
        Arc::clone(&self.predefined[&construction_type])
    }

    /// A composed construction by name
    pub fn composed(&self, name: &str) -> ConstructionResult<Arc<Construction>> {
        self.composed
            .get(name)
            .cloned()
            .ok_or_else(|| ConstructionError::UnknownConstruction(name.to_string()))
    }

    /// Any construction by name, predefined names first
    pub fn by_name(&self, name: &str) -> ConstructionResult<Arc<Construction>> {
        match PredefinedConstructionType::from_name(name) {
            Some(construction_type) => Ok(self.predefined(construction_type)),
            None => self.composed(name),
        }
    }

    /// Names of all composed constructions, sorted
    pub fn composed_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.composed.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Every registered construction
    pub fn all(&self) -> impl Iterator<Item = &Arc<Construction>> {
        self.predefined.values().chain(self.composed.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_predefined_by_name() {
        let registry = ConstructionRegistry::global();
        let midpoint = registry.by_name("Midpoint").unwrap();

        assert_eq!(midpoint.name(), "Midpoint");
        assert_eq!(midpoint, registry.predefined(PredefinedConstructionType::Midpoint));
    }

    #[test]
    fn test_lookup_composed_by_name() {
        let registry = ConstructionRegistry::global();
        let incenter = registry.by_name("Incenter").unwrap();

        assert!(matches!(incenter.as_ref(), Construction::Composed(_)));
        assert_eq!(incenter.signature().arity(), 3);
    }

    #[test]
    fn test_unknown_construction() {
        let registry = ConstructionRegistry::global();
        let err = registry.by_name("SquareTheCircle").unwrap_err();

        assert_eq!(err, ConstructionError::UnknownConstruction("SquareTheCircle".to_string()));
    }

    #[test]
    fn test_global_is_shared() {
        let r1 = ConstructionRegistry::global() as *const _;
        let r2 = ConstructionRegistry::global() as *const _;

        assert_eq!(r1, r2);
    }

    #[test]
    fn test_all_counts_everything() {
        let registry = ConstructionRegistry::global();
        let expected = PredefinedConstructionType::ALL.len() + registry.composed_names().len();

        assert_eq!(registry.all().count(), expected);
    }
}
