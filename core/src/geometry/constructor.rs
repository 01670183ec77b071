//! Object constructor
//!
//! Evaluates a constructed object in one picture. Composed constructions run
//! their template step by step over the supplied inputs.

use super::analytic::GeometricObject;
use super::constructions::realize_predefined;
use super::container::ObjectsContainer;
use super::seeds::object_rng;
use crate::ir::{ConstructedConfigurationObject, Construction, ObjectId};
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;

/// Realize `construction` over flattened `inputs`, `None` if degenerate
pub fn realize(
    construction: &Construction,
    inputs: &[GeometricObject],
    rng: &mut StdRng,
    tolerance: f64,
) -> Option<GeometricObject> {
    match construction {
        Construction::Predefined(predefined) => {
            realize_predefined(predefined.construction_type(), inputs, rng, tolerance)
        }
        Construction::Composed(composed) => {
            let mut values: FxHashMap<ObjectId, GeometricObject> = composed
                .inputs()
                .iter()
                .zip(inputs)
                .map(|(input, value)| (input.id(), *value))
                .collect();

            for step in composed.steps() {
                let Some(step) = step.as_constructed() else {
                    panic!("template step {} of {} is not constructed", step.id(), composed.name());
                };

                let arguments: Vec<GeometricObject> = step
                    .arguments()
                    .flatten()
                    .iter()
                    .map(|argument| template_value(&values, argument.id()))
                    .collect();

                let value = realize(step.construction(), &arguments, rng, tolerance)?;
                values.insert(step.id(), value);
            }

            Some(template_value(&values, composed.output().id()))
        }
    }
}

fn template_value(values: &FxHashMap<ObjectId, GeometricObject>, id: ObjectId) -> GeometricObject {
    match values.get(&id) {
        Some(value) => *value,
        None => panic!("template object {} evaluated before it was defined", id),
    }
}

/// Realize `object` in `container`, `None` if it is unconstructible there.
///
/// Every argument must already be realized in the container.
pub fn construct(object: &ConstructedConfigurationObject, container: &ObjectsContainer) -> Option<GeometricObject> {
    let inputs: Vec<GeometricObject> = object
        .arguments()
        .flatten()
        .iter()
        .map(|argument| match container.get(argument.id()) {
            Some(value) => *value,
            None => panic!(
                "argument {} of {} is not realized in the picture",
                argument.id(),
                object.id()
            ),
        })
        .collect();

    let mut rng = object_rng(container.seed(), object.id());
    realize(object.construction(), &inputs, &mut rng, container.tolerance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analytic::Point;
    use crate::ir::{ConfigurationObject, LooseObjectsHolder, LooseObjectsLayout, PredefinedConstructionType};
    use crate::registry::ConstructionRegistry;
    use rand::SeedableRng;

    fn p(x: f64, y: f64) -> GeometricObject {
        GeometricObject::Point(Point::new(x, y))
    }

    #[test]
    fn test_composed_centroid() {
        let centroid = ConstructionRegistry::global().composed("Centroid").unwrap();
        let value = realize(
            &centroid,
            &[p(0.0, 0.0), p(6.0, 0.0), p(0.0, 3.0)],
            &mut StdRng::seed_from_u64(0),
            1e-9,
        )
        .unwrap();

        assert!(value.as_point().unwrap().approx_eq(&Point::new(2.0, 1.0), 1e-9));
    }

    #[test]
    fn test_composed_reflection_in_line() {
        let registry = ConstructionRegistry::global();
        let reflection = registry.composed("ReflectionInLine").unwrap();
        let x_axis = realize_predefined(
            PredefinedConstructionType::LineFromPoints,
            &[p(0.0, 0.0), p(1.0, 0.0)],
            &mut StdRng::seed_from_u64(0),
            1e-9,
        )
        .unwrap();

        let image = realize(&reflection, &[p(2.0, 3.0), x_axis], &mut StdRng::seed_from_u64(0), 1e-9).unwrap();
        assert!(image.as_point().unwrap().approx_eq(&Point::new(2.0, -3.0), 1e-9));
    }

    #[test]
    fn test_composed_degenerate_step() {
        let incenter = ConstructionRegistry::global().composed("Incenter").unwrap();
        let value = realize(
            &incenter,
            &[p(0.0, 0.0), p(0.0, 0.0), p(1.0, 1.0)],
            &mut StdRng::seed_from_u64(0),
            1e-9,
        );

        assert!(value.is_none());
    }

    #[test]
    fn test_construct_in_container() {
        let holder = LooseObjectsHolder::with_layout(LooseObjectsLayout::ThreePoints);
        let container = ObjectsContainer::new(&holder, 1e-6, 3);
        let midpoint = ConfigurationObject::constructed(
            ConstructionRegistry::global().predefined(PredefinedConstructionType::Midpoint),
            &holder.loose_objects()[..2],
        )
        .unwrap();

        let value = construct(midpoint.as_constructed().unwrap(), &container).unwrap();
        let a = container.get(holder.loose_objects()[0].id()).unwrap().as_point().unwrap();
        let b = container.get(holder.loose_objects()[1].id()).unwrap().as_point().unwrap();

        assert!(value.as_point().unwrap().approx_eq(&a.midpoint(b), 1e-12));
    }

    #[test]
    #[should_panic(expected = "is not realized")]
    fn test_unrealized_argument_panics() {
        let holder = LooseObjectsHolder::with_layout(LooseObjectsLayout::TwoPoints);
        let container = ObjectsContainer::new(&holder, 1e-6, 3);
        let stranger = ConfigurationObject::loose(crate::ir::ConfigurationObjectType::Point);
        let midpoint = ConfigurationObject::constructed(
            ConstructionRegistry::global().predefined(PredefinedConstructionType::Midpoint),
            &[holder.loose_objects()[0].clone(), stranger],
        )
        .unwrap();

        construct(midpoint.as_constructed().unwrap(), &container);
    }
}
