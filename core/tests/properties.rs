//! Property tests for structural equality and remapping

use geogen_core::*;
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

fn hash_of(object: &ConfigurationObject) -> u64 {
    let mut hasher = DefaultHasher::new();
    object.hash(&mut hasher);
    hasher.finish()
}

fn predefined(
    construction_type: PredefinedConstructionType,
    inputs: &[Arc<ConfigurationObject>],
) -> Arc<ConfigurationObject> {
    let construction = ConstructionRegistry::global().predefined(construction_type);
    ConfigurationObject::constructed(construction, inputs).unwrap()
}

/// A configuration exercising sets, ordered parameters and nesting
fn sample_configuration() -> Configuration {
    let loose = LooseObjectsHolder::with_layout(LooseObjectsLayout::FourPoints);
    let p = loose.loose_objects().to_vec();

    let midpoint = predefined(PredefinedConstructionType::Midpoint, &[p[0].clone(), p[1].clone()]);
    let line = predefined(PredefinedConstructionType::LineFromPoints, &[midpoint.clone(), p[2].clone()]);
    let circle = predefined(
        PredefinedConstructionType::Circumcircle,
        &[p[1].clone(), p[2].clone(), p[3].clone()],
    );
    let perpendicular = predefined(PredefinedConstructionType::PerpendicularLine, &[p[3].clone(), line.clone()]);
    let reflection = predefined(PredefinedConstructionType::PointReflection, &[p[0].clone(), midpoint.clone()]);
    let bisector = predefined(
        PredefinedConstructionType::InternalAngleBisector,
        &[p[2].clone(), p[0].clone(), p[3].clone()],
    );

    Configuration::new(
        loose,
        vec![midpoint, line, circle, perpendicular, reflection, bisector],
    )
    .unwrap()
}

proptest! {
    #[test]
    fn prop_set_order_is_irrelevant(order in Just(vec![0usize, 1, 2]).prop_shuffle()) {
        let loose = LooseObjectsHolder::with_layout(LooseObjectsLayout::ThreePoints);
        let p = loose.loose_objects();
        let shuffled: Vec<_> = order.iter().map(|&i| p[i].clone()).collect();

        let original = predefined(PredefinedConstructionType::Circumcircle, p);
        let permuted = predefined(PredefinedConstructionType::Circumcircle, &shuffled);

        prop_assert_eq!(&original, &permuted);
        prop_assert_eq!(hash_of(&original), hash_of(&permuted));
    }

    #[test]
    fn prop_ordered_parameters_matter(swap in any::<bool>()) {
        let loose = LooseObjectsHolder::with_layout(LooseObjectsLayout::TwoPoints);
        let p = loose.loose_objects();
        let (first, second) = if swap { (&p[1], &p[0]) } else { (&p[0], &p[1]) };

        let reflection = predefined(PredefinedConstructionType::PointReflection, &[first.clone(), second.clone()]);
        let reversed = predefined(PredefinedConstructionType::PointReflection, &[second.clone(), first.clone()]);

        prop_assert_ne!(&reflection, &reversed);
    }

    #[test]
    fn prop_remap_round_trip(order in Just(vec![0usize, 1, 2, 3]).prop_shuffle()) {
        let configuration = sample_configuration();
        let loose = configuration.loose_objects();
        let bijection = LooseObjectBijection::new(
            order.iter().enumerate().map(|(i, &j)| (loose[i].clone(), loose[j].clone())),
        )
        .unwrap();

        let image = configuration.remap(&bijection).unwrap();
        let back = image.remap(&bijection.inverse()).unwrap();

        prop_assert_eq!(back.constructed_objects().len(), configuration.constructed_objects().len());
        for (original, returned) in configuration.constructed_objects().iter().zip(back.constructed_objects()) {
            prop_assert_eq!(original, returned);
            prop_assert_eq!(hash_of(original), hash_of(returned));
        }

        // The identity part of the bijection fixes objects built only from fixed points
        for object in configuration.constructed_objects() {
            let fixed = object
                .as_constructed()
                .unwrap()
                .arguments()
                .flatten()
                .iter()
                .all(|leaf| leaf.is_loose() && bijection.image(leaf.id()).map(|o| o.id()) == Some(leaf.id()));
            if fixed {
                prop_assert_eq!(&bijection.remap(object).unwrap(), object);
            }
        }
    }
}

#[test]
fn test_midpoint_configuration_is_symmetric() {
    let loose = LooseObjectsHolder::with_layout(LooseObjectsLayout::TwoPoints);
    let p = loose.loose_objects().to_vec();
    let midpoint = predefined(PredefinedConstructionType::Midpoint, &p);
    let configuration = Configuration::new(loose, vec![midpoint]).unwrap();

    let swap = LooseObjectBijection::new(vec![(p[0].clone(), p[1].clone()), (p[1].clone(), p[0].clone())]).unwrap();
    assert!(configuration.is_symmetric_under(&swap));
}

#[test]
fn test_random_objects_are_never_equal() {
    let loose = LooseObjectsHolder::with_layout(LooseObjectsLayout::TwoPoints);
    let p = loose.loose_objects().to_vec();
    let circle = predefined(PredefinedConstructionType::CircleWithCenterThroughPoint, &p);

    let r1 = predefined(PredefinedConstructionType::RandomPointOnCircle, &[circle.clone()]);
    let r2 = predefined(PredefinedConstructionType::RandomPointOnCircle, &[circle]);

    assert_ne!(r1, r2);
    assert_eq!(r1, r1.clone());
}
