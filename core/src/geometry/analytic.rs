//! Analytic geometry primitives
//!
//! Points, lines and circles in the plane with tolerance-based equality.

use crate::ir::ConfigurationObjectType;
use serde::{Deserialize, Serialize};

/// 2D point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Dot product with another point (as vectors from origin)
    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product z-component (for 2D)
    pub fn cross_z(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Rotate by 90 degrees counterclockwise
    pub fn perpendicular(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Unit vector in the same direction, `None` for the zero vector
    pub fn normalized(&self, tolerance: f64) -> Option<Point> {
        let norm = self.norm();
        if norm <= tolerance {
            return None;
        }
        Some(self.scale(1.0 / norm))
    }

    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

/// Twice the signed area of triangle p1 p2 p3
pub fn signed_area2(p1: &Point, p2: &Point, p3: &Point) -> f64 {
    p2.sub(p1).cross_z(&p3.sub(p1))
}

/// Line `a·x + b·y + c = 0` with `a² + b² = 1`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// Line through a point with the given direction
    pub fn through(point: &Point, direction: &Point, tolerance: f64) -> Option<Line> {
        let normal = direction.perpendicular().normalized(tolerance)?;
        Some(Line {
            a: normal.x,
            b: normal.y,
            c: -normal.dot(point),
        })
    }

    /// Line through two distinct points
    pub fn from_points(p: &Point, q: &Point, tolerance: f64) -> Option<Line> {
        Line::through(p, &q.sub(p), tolerance)
    }

    /// Unit normal vector
    pub fn normal(&self) -> Point {
        Point::new(self.a, self.b)
    }

    /// Unit direction vector
    pub fn direction(&self) -> Point {
        Point::new(-self.b, self.a)
    }

    /// Signed distance from a point
    pub fn signed_distance(&self, point: &Point) -> f64 {
        self.a * point.x + self.b * point.y + self.c
    }

    pub fn contains(&self, point: &Point, tolerance: f64) -> bool {
        self.signed_distance(point).abs() <= tolerance
    }

    /// Foot of the perpendicular from a point
    pub fn projection(&self, point: &Point) -> Point {
        point.sub(&self.normal().scale(self.signed_distance(point)))
    }

    /// Parallel line through a point
    pub fn parallel_through(&self, point: &Point) -> Line {
        Line {
            a: self.a,
            b: self.b,
            c: -self.normal().dot(point),
        }
    }

    /// Perpendicular line through a point
    pub fn perpendicular_through(&self, point: &Point) -> Line {
        let normal = self.direction();
        Line {
            a: normal.x,
            b: normal.y,
            c: -normal.dot(point),
        }
    }

    pub fn is_parallel_to(&self, other: &Line, tolerance: f64) -> bool {
        self.normal().cross_z(&other.normal()).abs() <= tolerance
    }

    /// Intersection point, `None` for parallel lines
    pub fn intersection(&self, other: &Line, tolerance: f64) -> Option<Point> {
        let determinant = self.a * other.b - self.b * other.a;
        if determinant.abs() <= tolerance {
            return None;
        }
        let x = (self.b * other.c - other.b * self.c) / determinant;
        let y = (other.a * self.c - self.a * other.c) / determinant;
        Some(Point::new(x, y))
    }

    /// Equality up to the sign of the normal
    pub fn approx_eq(&self, other: &Line, tolerance: f64) -> bool {
        if !self.is_parallel_to(other, tolerance) {
            return false;
        }
        let sign = self.normal().dot(&other.normal()).signum();
        (self.c - sign * other.c).abs() <= tolerance
    }
}

/// Circle given by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// Circle with the given center through a point, `None` for zero radius
    pub fn with_center_through(center: &Point, point: &Point, tolerance: f64) -> Option<Circle> {
        let radius = center.distance(point);
        if radius <= tolerance {
            return None;
        }
        Some(Circle {
            center: *center,
            radius,
        })
    }

    /// Circle through three points, `None` if they are collinear
    pub fn from_three_points(p1: &Point, p2: &Point, p3: &Point, tolerance: f64) -> Option<Circle> {
        let d = 2.0 * signed_area2(p1, p2, p3);
        if d.abs() <= tolerance {
            return None;
        }

        let s1 = p1.dot(p1);
        let s2 = p2.dot(p2);
        let s3 = p3.dot(p3);

        let x = (s1 * (p2.y - p3.y) + s2 * (p3.y - p1.y) + s3 * (p1.y - p2.y)) / d;
        let y = (s1 * (p3.x - p2.x) + s2 * (p1.x - p3.x) + s3 * (p2.x - p1.x)) / d;
        let center = Point::new(x, y);

        Circle::with_center_through(&center, p1, tolerance)
    }

    pub fn contains(&self, point: &Point, tolerance: f64) -> bool {
        (self.center.distance(point) - self.radius).abs() <= tolerance
    }

    /// Point at the given angle (radians) on the circle
    pub fn point_at(&self, angle: f64) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Intersections with a line: none, one (tangent) or two points
    pub fn intersections_with_line(&self, line: &Line, tolerance: f64) -> Vec<Point> {
        let distance = line.signed_distance(&self.center);
        let foot = line.projection(&self.center);
        let squared = self.radius * self.radius - distance * distance;

        if squared < -tolerance {
            return Vec::new();
        }
        if squared.abs() <= tolerance {
            return vec![foot];
        }

        let half_chord = squared.sqrt();
        let offset = line.direction().scale(half_chord);
        vec![foot.add(&offset), foot.sub(&offset)]
    }

    pub fn approx_eq(&self, other: &Circle, tolerance: f64) -> bool {
        self.center.approx_eq(&other.center, tolerance)
            && (self.radius - other.radius).abs() <= tolerance
    }
}

/// Numeric realization of a configuration object in one picture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeometricObject {
    Point(Point),
    Line(Line),
    Circle(Circle),
}

impl GeometricObject {
    pub fn object_type(&self) -> ConfigurationObjectType {
        match self {
            GeometricObject::Point(_) => ConfigurationObjectType::Point,
            GeometricObject::Line(_) => ConfigurationObjectType::Line,
            GeometricObject::Circle(_) => ConfigurationObjectType::Circle,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            GeometricObject::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            GeometricObject::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            GeometricObject::Circle(circle) => Some(circle),
            _ => None,
        }
    }

    /// Numeric equality within `tolerance`; objects of different types differ
    pub fn approx_eq(&self, other: &GeometricObject, tolerance: f64) -> bool {
        match (self, other) {
            (GeometricObject::Point(a), GeometricObject::Point(b)) => a.approx_eq(b, tolerance),
            (GeometricObject::Line(a), GeometricObject::Line(b)) => a.approx_eq(b, tolerance),
            (GeometricObject::Circle(a), GeometricObject::Circle(b)) => a.approx_eq(b, tolerance),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);

        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_line_from_points() {
        let line = Line::from_points(&Point::new(0.0, 0.0), &Point::new(2.0, 2.0), EPS).unwrap();

        assert!(line.contains(&Point::new(1.0, 1.0), EPS));
        assert!(!line.contains(&Point::new(1.0, 0.0), EPS));
        assert!((line.a * line.a + line.b * line.b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_from_equal_points() {
        let p = Point::new(1.0, 1.0);
        assert!(Line::from_points(&p, &p, EPS).is_none());
    }

    #[test]
    fn test_line_equality_ignores_orientation() {
        let p = Point::new(1.0, 2.0);
        let q = Point::new(-3.0, 5.0);

        let l1 = Line::from_points(&p, &q, EPS).unwrap();
        let l2 = Line::from_points(&q, &p, EPS).unwrap();

        assert!(l1.approx_eq(&l2, 1e-9));
        assert!(!l1.approx_eq(&l1.parallel_through(&Point::new(0.0, 0.0)), 1e-9));
    }

    #[test]
    fn test_intersection() {
        let horizontal = Line::from_points(&Point::new(0.0, 1.0), &Point::new(1.0, 1.0), EPS).unwrap();
        let vertical = Line::from_points(&Point::new(2.0, 0.0), &Point::new(2.0, 1.0), EPS).unwrap();

        let x = horizontal.intersection(&vertical, EPS).unwrap();
        assert!(x.approx_eq(&Point::new(2.0, 1.0), 1e-9));

        let parallel = horizontal.parallel_through(&Point::new(0.0, 3.0));
        assert!(horizontal.intersection(&parallel, EPS).is_none());
    }

    #[test]
    fn test_projection_and_perpendicular() {
        let line = Line::from_points(&Point::new(0.0, 0.0), &Point::new(1.0, 0.0), EPS).unwrap();
        let p = Point::new(3.0, 4.0);

        assert!(line.projection(&p).approx_eq(&Point::new(3.0, 0.0), 1e-9));

        let perpendicular = line.perpendicular_through(&p);
        assert!(perpendicular.contains(&Point::new(3.0, -10.0), 1e-9));
    }

    #[test]
    fn test_circumcircle() {
        let circle = Circle::from_three_points(
            &Point::new(1.0, 0.0),
            &Point::new(0.0, 1.0),
            &Point::new(-1.0, 0.0),
            EPS,
        )
        .unwrap();

        assert!(circle.center.approx_eq(&Point::new(0.0, 0.0), 1e-9));
        assert!((circle.radius - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_circumcircle_of_collinear_points() {
        let circle = Circle::from_three_points(
            &Point::new(0.0, 0.0),
            &Point::new(1.0, 1.0),
            &Point::new(2.0, 2.0),
            EPS,
        );

        assert!(circle.is_none());
    }

    #[test]
    fn test_circle_line_intersections() {
        let circle = Circle {
            center: Point::new(0.0, 0.0),
            radius: 1.0,
        };
        let secant = Line::from_points(&Point::new(-2.0, 0.0), &Point::new(2.0, 0.0), EPS).unwrap();
        let tangent = Line::from_points(&Point::new(-2.0, 1.0), &Point::new(2.0, 1.0), EPS).unwrap();
        let outside = Line::from_points(&Point::new(-2.0, 3.0), &Point::new(2.0, 3.0), EPS).unwrap();

        assert_eq!(circle.intersections_with_line(&secant, EPS).len(), 2);
        assert_eq!(circle.intersections_with_line(&tangent, EPS).len(), 1);
        assert!(circle.intersections_with_line(&outside, EPS).is_empty());
    }

    #[test]
    fn test_geometric_object_type_mismatch() {
        let point = GeometricObject::Point(Point::new(0.0, 0.0));
        let circle = GeometricObject::Circle(Circle {
            center: Point::new(0.0, 0.0),
            radius: 1.0,
        });

        assert!(!point.approx_eq(&circle, 1.0));
        assert_eq!(circle.object_type(), ConfigurationObjectType::Circle);
    }
}
