//! Numeric realization of predefined constructions
//!
//! Pure operations on analytic objects. Inputs come in the flattened order of
//! the construction's signature and have already been type-checked by the
//! symbolic layer, so a type mismatch here is a bug.

use super::analytic::{Circle, GeometricObject, Line, Point};
use crate::ir::PredefinedConstructionType;
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::PI;

/// Parameter range of a random point on a line, measured from the foot of the
/// perpendicular from the origin
const RANDOM_LINE_SPAN: f64 = 5.0;

fn point(inputs: &[GeometricObject], index: usize) -> &Point {
    match inputs.get(index).and_then(GeometricObject::as_point) {
        Some(point) => point,
        None => panic!("input {} is not a point: {:?}", index, inputs.get(index)),
    }
}

fn line(inputs: &[GeometricObject], index: usize) -> &Line {
    match inputs.get(index).and_then(GeometricObject::as_line) {
        Some(line) => line,
        None => panic!("input {} is not a line: {:?}", index, inputs.get(index)),
    }
}

fn circle(inputs: &[GeometricObject], index: usize) -> &Circle {
    match inputs.get(index).and_then(GeometricObject::as_circle) {
        Some(circle) => circle,
        None => panic!("input {} is not a circle: {:?}", index, inputs.get(index)),
    }
}

/// Realize a predefined construction, `None` when it is degenerate in this picture
pub fn realize_predefined(
    construction_type: PredefinedConstructionType,
    inputs: &[GeometricObject],
    rng: &mut StdRng,
    tolerance: f64,
) -> Option<GeometricObject> {
    use PredefinedConstructionType as T;

    let object = match construction_type {
        T::CenterOfCircle => GeometricObject::Point(circle(inputs, 0).center),

        T::Circumcircle => GeometricObject::Circle(Circle::from_three_points(
            point(inputs, 0),
            point(inputs, 1),
            point(inputs, 2),
            tolerance,
        )?),

        T::Circumcenter => GeometricObject::Point(
            Circle::from_three_points(point(inputs, 0), point(inputs, 1), point(inputs, 2), tolerance)?
                .center,
        ),

        T::CircleWithCenterThroughPoint => GeometricObject::Circle(Circle::with_center_through(
            point(inputs, 0),
            point(inputs, 1),
            tolerance,
        )?),

        T::IntersectionOfLines => {
            GeometricObject::Point(line(inputs, 0).intersection(line(inputs, 1), tolerance)?)
        }

        T::InternalAngleBisector => GeometricObject::Line(internal_angle_bisector(
            point(inputs, 0),
            point(inputs, 1),
            point(inputs, 2),
            tolerance,
        )?),

        T::LineFromPoints => {
            GeometricObject::Line(Line::from_points(point(inputs, 0), point(inputs, 1), tolerance)?)
        }

        T::Midpoint => {
            let (a, b) = (point(inputs, 0), point(inputs, 1));
            if a.distance(b) <= tolerance {
                return None;
            }
            GeometricObject::Point(a.midpoint(b))
        }

        T::ParallelLine => GeometricObject::Line(line(inputs, 1).parallel_through(point(inputs, 0))),

        T::PerpendicularLine => {
            GeometricObject::Line(line(inputs, 1).perpendicular_through(point(inputs, 0)))
        }

        T::PerpendicularProjection => GeometricObject::Point(line(inputs, 1).projection(point(inputs, 0))),

        T::PointReflection => {
            let (p, center) = (point(inputs, 0), point(inputs, 1));
            if p.distance(center) <= tolerance {
                return None;
            }
            GeometricObject::Point(center.scale(2.0).sub(p))
        }

        T::SecondIntersectionOfCircleAndLine => GeometricObject::Point(second_intersection(
            point(inputs, 0),
            line(inputs, 1),
            circle(inputs, 2),
            tolerance,
        )?),

        T::RandomPointOnLine => {
            let line = line(inputs, 0);
            let origin_foot = line.projection(&Point::new(0.0, 0.0));
            let t = rng.gen_range(-RANDOM_LINE_SPAN..RANDOM_LINE_SPAN);
            GeometricObject::Point(origin_foot.add(&line.direction().scale(t)))
        }

        T::RandomPointOnCircle => {
            let angle = rng.gen_range(0.0..2.0 * PI);
            GeometricObject::Point(circle(inputs, 0).point_at(angle))
        }
    };

    Some(object)
}

/// Bisector of angle BAC through the vertex A
fn internal_angle_bisector(vertex: &Point, b: &Point, c: &Point, tolerance: f64) -> Option<Line> {
    let u = b.sub(vertex).normalized(tolerance)?;
    let v = c.sub(vertex).normalized(tolerance)?;

    // B, A, C on a line with A between them: the bisector is the perpendicular at A
    let direction = u.add(&v).normalized(tolerance).unwrap_or_else(|| u.perpendicular());
    Line::through(vertex, &direction, tolerance)
}

/// The intersection of `line` and `circle` other than `point`
fn second_intersection(point: &Point, line: &Line, circle: &Circle, tolerance: f64) -> Option<Point> {
    if !line.contains(point, tolerance) || !circle.contains(point, tolerance) {
        return None;
    }

    let intersections = circle.intersections_with_line(line, tolerance);
    let mut others = intersections
        .into_iter()
        .filter(|candidate| !candidate.approx_eq(point, tolerance));

    // A tangent line leaves no second point
    others.next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    fn p(x: f64, y: f64) -> GeometricObject {
        GeometricObject::Point(Point::new(x, y))
    }

    fn realize(t: PredefinedConstructionType, inputs: &[GeometricObject]) -> Option<GeometricObject> {
        realize_predefined(t, inputs, &mut StdRng::seed_from_u64(0), EPS)
    }

    fn as_point(object: Option<GeometricObject>) -> Point {
        *object.unwrap().as_point().unwrap()
    }

    #[test]
    fn test_midpoint() {
        let m = as_point(realize(PredefinedConstructionType::Midpoint, &[p(0.0, 0.0), p(4.0, 2.0)]));
        assert!(m.approx_eq(&Point::new(2.0, 1.0), EPS));
    }

    #[test]
    fn test_midpoint_of_equal_points_is_degenerate() {
        assert!(realize(PredefinedConstructionType::Midpoint, &[p(1.0, 1.0), p(1.0, 1.0)]).is_none());
    }

    #[test]
    fn test_circumcenter_is_symmetric_in_inputs() {
        let a = p(0.0, 0.0);
        let b = p(4.0, 0.0);
        let c = p(1.0, 3.0);

        let o1 = as_point(realize(PredefinedConstructionType::Circumcenter, &[a, b, c]));
        let o2 = as_point(realize(PredefinedConstructionType::Circumcenter, &[c, a, b]));

        assert!(o1.approx_eq(&o2, 1e-9));
        assert!((o1.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_internal_angle_bisector() {
        let bisector = realize(
            PredefinedConstructionType::InternalAngleBisector,
            &[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)],
        )
        .unwrap();
        let line = bisector.as_line().unwrap();

        assert!(line.contains(&Point::new(3.0, 3.0), 1e-9));
        assert!(!line.contains(&Point::new(3.0, -3.0), 1e-9));
    }

    #[test]
    fn test_straight_angle_bisector_is_perpendicular() {
        let bisector = realize(
            PredefinedConstructionType::InternalAngleBisector,
            &[p(0.0, 0.0), p(-1.0, 0.0), p(2.0, 0.0)],
        )
        .unwrap();

        assert!(bisector.as_line().unwrap().contains(&Point::new(0.0, 5.0), 1e-9));
    }

    #[test]
    fn test_point_reflection() {
        let image = as_point(realize(PredefinedConstructionType::PointReflection, &[p(1.0, 2.0), p(3.0, 3.0)]));
        assert!(image.approx_eq(&Point::new(5.0, 4.0), EPS));
    }

    #[test]
    fn test_second_intersection() {
        let circle = GeometricObject::Circle(Circle {
            center: Point::new(0.0, 0.0),
            radius: 1.0,
        });
        let line = GeometricObject::Line(
            Line::from_points(&Point::new(-1.0, 0.0), &Point::new(1.0, 0.0), EPS).unwrap(),
        );

        let other = as_point(realize(
            PredefinedConstructionType::SecondIntersectionOfCircleAndLine,
            &[p(-1.0, 0.0), line, circle],
        ));
        assert!(other.approx_eq(&Point::new(1.0, 0.0), 1e-9));
    }

    #[test]
    fn test_second_intersection_of_tangent_is_degenerate() {
        let circle = GeometricObject::Circle(Circle {
            center: Point::new(0.0, 0.0),
            radius: 1.0,
        });
        let tangent = GeometricObject::Line(
            Line::from_points(&Point::new(-1.0, 1.0), &Point::new(1.0, 1.0), EPS).unwrap(),
        );

        assert!(realize(
            PredefinedConstructionType::SecondIntersectionOfCircleAndLine,
            &[p(0.0, 1.0), tangent, circle],
        )
        .is_none());
    }

    #[test]
    fn test_random_point_lies_on_its_object() {
        let line = Line::from_points(&Point::new(0.0, 1.0), &Point::new(3.0, 2.0), EPS).unwrap();
        let circle = Circle {
            center: Point::new(1.0, 1.0),
            radius: 2.0,
        };
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..20 {
            let on_line = realize_predefined(
                PredefinedConstructionType::RandomPointOnLine,
                &[GeometricObject::Line(line)],
                &mut rng,
                EPS,
            )
            .unwrap();
            let on_circle = realize_predefined(
                PredefinedConstructionType::RandomPointOnCircle,
                &[GeometricObject::Circle(circle)],
                &mut rng,
                EPS,
            )
            .unwrap();

            assert!(line.contains(on_line.as_point().unwrap(), 1e-9));
            assert!(circle.contains(on_circle.as_point().unwrap(), 1e-9));
        }
    }

    #[test]
    #[should_panic(expected = "is not a line")]
    fn test_type_mismatch_panics() {
        realize(PredefinedConstructionType::ParallelLine, &[p(0.0, 0.0), p(1.0, 1.0)]);
    }
}
