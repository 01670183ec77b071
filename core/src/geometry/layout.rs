//! Sampling loose objects under a layout
//!
//! Rejection sampling in a fixed box. Every layout keeps its objects well
//! separated so that later constructions do not start from a near-degenerate
//! picture.

use super::analytic::{signed_area2, Circle, GeometricObject, Line, Point};
use crate::ir::LooseObjectsLayout;
use rand::Rng;
use std::f64::consts::PI;

/// Half-width of the sampling box
const RANGE: f64 = 10.0;

/// Minimal distance between sampled points
const MIN_DISTANCE: f64 = 1.0;

/// Minimal doubled area of a sampled triangle
const MIN_AREA2: f64 = 4.0;

/// Minimal angle of a sampled triangle, and minimal difference between angles
const MIN_ANGLE: f64 = 10.0 * PI / 180.0;

/// Maximal angle of an acute triangle
const MAX_ACUTE_ANGLE: f64 = 85.0 * PI / 180.0;

/// Sample the loose objects of `layout`, in the layout's order
pub fn sample_layout<R: Rng + ?Sized>(layout: LooseObjectsLayout, rng: &mut R) -> Vec<GeometricObject> {
    let points = |ps: Vec<Point>| -> Vec<GeometricObject> {
        ps.into_iter().map(GeometricObject::Point).collect()
    };

    match layout {
        LooseObjectsLayout::TwoPoints => points(two_points(rng).to_vec()),
        LooseObjectsLayout::ThreePoints => points(triangle(rng).to_vec()),
        LooseObjectsLayout::FourPoints => points(four_points(rng)),
        LooseObjectsLayout::FourConcyclicPoints => points(four_concyclic_points(rng)),
        LooseObjectsLayout::ScaleneAcuteTriangle => points(scalene_acute_triangle(rng).to_vec()),
        LooseObjectsLayout::RightTriangle => points(right_triangle(rng).to_vec()),
        LooseObjectsLayout::LineAndPoint => {
            let (line, [point]) = line_and_points::<R, 1>(rng);
            vec![GeometricObject::Line(line), GeometricObject::Point(point)]
        }
        LooseObjectsLayout::LineAndTwoPoints => {
            let (line, [p, q]) = line_and_points::<R, 2>(rng);
            vec![
                GeometricObject::Line(line),
                GeometricObject::Point(p),
                GeometricObject::Point(q),
            ]
        }
    }
}

fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Point {
    Point::new(rng.gen_range(-RANGE..RANGE), rng.gen_range(-RANGE..RANGE))
}

fn two_points<R: Rng + ?Sized>(rng: &mut R) -> [Point; 2] {
    loop {
        let (p, q) = (random_point(rng), random_point(rng));
        if p.distance(&q) >= MIN_DISTANCE {
            return [p, q];
        }
    }
}

fn is_good_triangle(p: &Point, q: &Point, r: &Point) -> bool {
    signed_area2(p, q, r).abs() >= MIN_AREA2
        && p.distance(q) >= MIN_DISTANCE
        && q.distance(r) >= MIN_DISTANCE
        && r.distance(p) >= MIN_DISTANCE
}

fn triangle<R: Rng + ?Sized>(rng: &mut R) -> [Point; 3] {
    loop {
        let [p, q] = two_points(rng);
        let r = random_point(rng);
        if is_good_triangle(&p, &q, &r) {
            return [p, q, r];
        }
    }
}

/// Interior angles at the first, second and third vertex
fn angles(p: &Point, q: &Point, r: &Point) -> [f64; 3] {
    let angle = |vertex: &Point, a: &Point, b: &Point| {
        let u = a.sub(vertex);
        let v = b.sub(vertex);
        (u.dot(&v) / (u.norm() * v.norm())).clamp(-1.0, 1.0).acos()
    };
    [angle(p, q, r), angle(q, p, r), angle(r, p, q)]
}

fn scalene_acute_triangle<R: Rng + ?Sized>(rng: &mut R) -> [Point; 3] {
    loop {
        let [p, q, r] = triangle(rng);
        let [alpha, beta, gamma] = angles(&p, &q, &r);

        let acute = [alpha, beta, gamma]
            .iter()
            .all(|&angle| angle >= MIN_ANGLE && angle <= MAX_ACUTE_ANGLE);
        let scalene = (alpha - beta).abs() >= MIN_ANGLE
            && (beta - gamma).abs() >= MIN_ANGLE
            && (gamma - alpha).abs() >= MIN_ANGLE;

        if acute && scalene {
            return [p, q, r];
        }
    }
}

fn right_triangle<R: Rng + ?Sized>(rng: &mut R) -> [Point; 3] {
    loop {
        let [a, b] = two_points(rng);
        let leg = b.sub(&a).perpendicular();
        let t = rng.gen_range(0.3..1.5) * if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let c = a.add(&leg.scale(t));

        if is_good_triangle(&a, &b, &c) {
            return [a, b, c];
        }
    }
}

fn four_points<R: Rng + ?Sized>(rng: &mut R) -> Vec<Point> {
    loop {
        let [p, q, r] = triangle(rng);
        let s = random_point(rng);
        let candidates = [p, q, r, s];

        let no_three_collinear = (0..4).all(|skip| {
            let rest: Vec<&Point> = candidates
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, point)| point)
                .collect();
            is_good_triangle(rest[0], rest[1], rest[2])
        });

        if no_three_collinear {
            return candidates.to_vec();
        }
    }
}

fn four_concyclic_points<R: Rng + ?Sized>(rng: &mut R) -> Vec<Point> {
    let circle = Circle {
        center: Point::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
        radius: rng.gen_range(3.0..8.0),
    };

    loop {
        let mut angles: Vec<f64> = (0..4).map(|_| rng.gen_range(0.0..2.0 * PI)).collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let separated = angles.windows(2).all(|w| w[1] - w[0] >= MIN_ANGLE * 2.0)
            && angles[0] + 2.0 * PI - angles[3] >= MIN_ANGLE * 2.0;

        if separated {
            return angles.iter().map(|&angle| circle.point_at(angle)).collect();
        }
    }
}

fn line_and_points<R: Rng + ?Sized, const N: usize>(rng: &mut R) -> (Line, [Point; N]) {
    loop {
        let [p, q] = two_points(rng);
        let Some(line) = Line::from_points(&p, &q, f64::EPSILON) else {
            continue;
        };

        let points: [Point; N] = std::array::from_fn(|_| random_point(rng));

        let off_line = points
            .iter()
            .all(|point| line.signed_distance(point).abs() >= MIN_DISTANCE);
        let separated = points
            .iter()
            .enumerate()
            .all(|(i, a)| points[i + 1..].iter().all(|b| a.distance(b) >= MIN_DISTANCE));

        if off_line && separated {
            return (line, points);
        }
    }
}
