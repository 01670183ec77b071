//! Built-in composed constructions
//!
//! Each definition is a template over fresh loose inputs. The inputs are listed
//! in the flattened order of the signature.

use crate::ir::{
    ComposedConstruction, ConfigurationObject, ConfigurationObjectType, Construction,
    ConstructionParameter, ConstructionResult, PredefinedConstructionType, Signature,
};
use std::sync::Arc;

use ConfigurationObjectType::{Line, Point};
use PredefinedConstructionType as P;

/// Build every built-in composed construction
pub fn all_composed<F>(predefined: F) -> ConstructionResult<Vec<ComposedConstruction>>
where
    F: Fn(PredefinedConstructionType) -> Arc<Construction>,
{
    Ok(vec![
        perpendicular_bisector(&predefined)?,
        incenter(&predefined)?,
        orthocenter(&predefined)?,
        centroid(&predefined)?,
        reflection_in_line(&predefined)?,
        random_point_on_perpendicular_bisector(&predefined)?,
    ])
}

fn points(count: usize) -> Vec<Arc<ConfigurationObject>> {
    (0..count).map(|_| ConfigurationObject::loose(Point)).collect()
}

fn two_points() -> Signature {
    Signature::new(vec![ConstructionParameter::set(ConstructionParameter::Object(Point), 2)])
}

fn three_points() -> Signature {
    Signature::new(vec![ConstructionParameter::set(ConstructionParameter::Object(Point), 3)])
}

/// Line through the midpoint of AB perpendicular to AB
fn perpendicular_bisector<F>(predefined: &F) -> ConstructionResult<ComposedConstruction>
where
    F: Fn(PredefinedConstructionType) -> Arc<Construction>,
{
    let inputs = points(2);
    let (a, b) = (&inputs[0], &inputs[1]);

    let midpoint = ConfigurationObject::constructed(predefined(P::Midpoint), &[a.clone(), b.clone()])?;
    let line = ConfigurationObject::constructed(predefined(P::LineFromPoints), &[a.clone(), b.clone()])?;
    let bisector =
        ConfigurationObject::constructed(predefined(P::PerpendicularLine), &[midpoint.clone(), line.clone()])?;

    ComposedConstruction::new(
        "PerpendicularBisector",
        two_points(),
        inputs.clone(),
        vec![midpoint, line, bisector],
    )
}

/// Intersection of the internal angle bisectors at A and B
fn incenter<F>(predefined: &F) -> ConstructionResult<ComposedConstruction>
where
    F: Fn(PredefinedConstructionType) -> Arc<Construction>,
{
    let inputs = points(3);
    let (a, b, c) = (&inputs[0], &inputs[1], &inputs[2]);

    let bisector_a = ConfigurationObject::constructed(
        predefined(P::InternalAngleBisector),
        &[a.clone(), b.clone(), c.clone()],
    )?;
    let bisector_b = ConfigurationObject::constructed(
        predefined(P::InternalAngleBisector),
        &[b.clone(), a.clone(), c.clone()],
    )?;
    let incenter = ConfigurationObject::constructed(
        predefined(P::IntersectionOfLines),
        &[bisector_a.clone(), bisector_b.clone()],
    )?;

    ComposedConstruction::new(
        "Incenter",
        three_points(),
        inputs.clone(),
        vec![bisector_a, bisector_b, incenter],
    )
}

/// Intersection of the altitudes from A and B
fn orthocenter<F>(predefined: &F) -> ConstructionResult<ComposedConstruction>
where
    F: Fn(PredefinedConstructionType) -> Arc<Construction>,
{
    let inputs = points(3);
    let (a, b, c) = (&inputs[0], &inputs[1], &inputs[2]);

    let bc = ConfigurationObject::constructed(predefined(P::LineFromPoints), &[b.clone(), c.clone()])?;
    let ac = ConfigurationObject::constructed(predefined(P::LineFromPoints), &[a.clone(), c.clone()])?;
    let altitude_a = ConfigurationObject::constructed(predefined(P::PerpendicularLine), &[a.clone(), bc.clone()])?;
    let altitude_b = ConfigurationObject::constructed(predefined(P::PerpendicularLine), &[b.clone(), ac.clone()])?;
    let orthocenter = ConfigurationObject::constructed(
        predefined(P::IntersectionOfLines),
        &[altitude_a.clone(), altitude_b.clone()],
    )?;

    ComposedConstruction::new(
        "Orthocenter",
        three_points(),
        inputs.clone(),
        vec![bc, ac, altitude_a, altitude_b, orthocenter],
    )
}

/// Intersection of the medians from A and B
fn centroid<F>(predefined: &F) -> ConstructionResult<ComposedConstruction>
where
    F: Fn(PredefinedConstructionType) -> Arc<Construction>,
{
    let inputs = points(3);
    let (a, b, c) = (&inputs[0], &inputs[1], &inputs[2]);

    let mid_bc = ConfigurationObject::constructed(predefined(P::Midpoint), &[b.clone(), c.clone()])?;
    let mid_ac = ConfigurationObject::constructed(predefined(P::Midpoint), &[a.clone(), c.clone()])?;
    let median_a = ConfigurationObject::constructed(predefined(P::LineFromPoints), &[a.clone(), mid_bc.clone()])?;
    let median_b = ConfigurationObject::constructed(predefined(P::LineFromPoints), &[b.clone(), mid_ac.clone()])?;
    let centroid = ConfigurationObject::constructed(
        predefined(P::IntersectionOfLines),
        &[median_a.clone(), median_b.clone()],
    )?;

    ComposedConstruction::new(
        "Centroid",
        three_points(),
        inputs.clone(),
        vec![mid_bc, mid_ac, median_a, median_b, centroid],
    )
}

/// Mirror image of P in the line l
fn reflection_in_line<F>(predefined: &F) -> ConstructionResult<ComposedConstruction>
where
    F: Fn(PredefinedConstructionType) -> Arc<Construction>,
{
    let point = ConfigurationObject::loose(Point);
    let line = ConfigurationObject::loose(Line);

    let foot = ConfigurationObject::constructed(
        predefined(P::PerpendicularProjection),
        &[point.clone(), line.clone()],
    )?;
    let reflection =
        ConfigurationObject::constructed(predefined(P::PointReflection), &[point.clone(), foot.clone()])?;

    ComposedConstruction::new(
        "ReflectionInLine",
        Signature::new(vec![
            ConstructionParameter::Object(Point),
            ConstructionParameter::Object(Line),
        ]),
        vec![point, line],
        vec![foot, reflection],
    )
}

/// A random point equidistant from A and B
fn random_point_on_perpendicular_bisector<F>(predefined: &F) -> ConstructionResult<ComposedConstruction>
where
    F: Fn(PredefinedConstructionType) -> Arc<Construction>,
{
    let inputs = points(2);
    let (a, b) = (&inputs[0], &inputs[1]);

    let midpoint = ConfigurationObject::constructed(predefined(P::Midpoint), &[a.clone(), b.clone()])?;
    let line = ConfigurationObject::constructed(predefined(P::LineFromPoints), &[a.clone(), b.clone()])?;
    let bisector =
        ConfigurationObject::constructed(predefined(P::PerpendicularLine), &[midpoint.clone(), line.clone()])?;
    let random = ConfigurationObject::constructed(predefined(P::RandomPointOnLine), &[bisector.clone()])?;

    ComposedConstruction::new(
        "RandomPointOnPerpendicularBisector",
        two_points(),
        inputs.clone(),
        vec![midpoint, line, bisector, random],
    )
}
