//! Theorem objects
//!
//! The things a theorem talks about. A line or circle may be given explicitly
//! as a configuration object, implicitly by points lying on it, or both; two
//! descriptions are equivalent when they must denote the same object.

use super::{TheoremError, TheoremResult};
use crate::ir::{ConfigurationObject, ConfigurationObjectType, LooseObjectBijection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A line or circle, given by an explicit object and/or points on it
#[derive(Debug, Clone)]
pub struct ObjectWithPoints {
    object: Option<Arc<ConfigurationObject>>,
    points: Vec<Arc<ConfigurationObject>>,
}

impl ObjectWithPoints {
    fn new(
        object_type: ConfigurationObjectType,
        object: Option<Arc<ConfigurationObject>>,
        points: Vec<Arc<ConfigurationObject>>,
    ) -> TheoremResult<Self> {
        if let Some(object) = &object {
            expect_type(object, object_type)?;
        }

        let mut unique: Vec<Arc<ConfigurationObject>> = Vec::with_capacity(points.len());
        for point in points {
            expect_type(&point, ConfigurationObjectType::Point)?;
            if !unique.contains(&point) {
                unique.push(point);
            }
        }

        let needed = needed_points(object_type);
        if object.is_none() && unique.len() < needed {
            return Err(TheoremError::NotEnoughPoints {
                object_type,
                needed,
                found: unique.len(),
            });
        }

        Ok(Self {
            object,
            points: unique,
        })
    }

    pub fn object(&self) -> Option<&Arc<ConfigurationObject>> {
        self.object.as_ref()
    }

    pub fn points(&self) -> &[Arc<ConfigurationObject>] {
        &self.points
    }

    fn common_points(&self, other: &ObjectWithPoints) -> usize {
        self.points
            .iter()
            .filter(|&point| other.points.contains(point))
            .count()
    }

    fn is_equivalent_to(&self, other: &ObjectWithPoints, needed: usize) -> bool {
        if let (Some(a), Some(b)) = (&self.object, &other.object) {
            if a == b {
                return true;
            }
        }
        self.common_points(other) >= needed
    }

    fn remap(&self, needed: usize, bijection: &LooseObjectBijection) -> Option<Self> {
        let object = self.object.as_ref().and_then(|object| bijection.remap(object));
        let points: Vec<_> = self.points.iter().filter_map(|point| bijection.remap(point)).collect();

        if object.is_none() && points.len() < needed {
            return None;
        }
        Some(Self { object, points })
    }
}

fn needed_points(object_type: ConfigurationObjectType) -> usize {
    match object_type {
        ConfigurationObjectType::Circle => 3,
        _ => 2,
    }
}

fn expect_type(object: &ConfigurationObject, expected: ConfigurationObjectType) -> TheoremResult<()> {
    if object.object_type() != expected {
        return Err(TheoremError::WrongObjectType {
            object: object.id(),
            expected,
            found: object.object_type(),
        });
    }
    Ok(())
}

/// What a pair of theorem objects stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairKind {
    /// Two points
    LineSegment,
    /// Two lines
    Angle,
}

/// An unordered pair of theorem objects
#[derive(Debug, Clone)]
pub struct PairTheoremObject {
    kind: PairKind,
    first: Box<TheoremObject>,
    second: Box<TheoremObject>,
}

impl PairTheoremObject {
    pub fn kind(&self) -> PairKind {
        self.kind
    }

    pub fn objects(&self) -> (&TheoremObject, &TheoremObject) {
        (&self.first, &self.second)
    }
}

/// Object a theorem is stated about
#[derive(Debug, Clone)]
pub enum TheoremObject {
    Point(Arc<ConfigurationObject>),
    Line(ObjectWithPoints),
    Circle(ObjectWithPoints),
    Pair(PairTheoremObject),
}

impl TheoremObject {
    pub fn point(point: Arc<ConfigurationObject>) -> TheoremResult<Self> {
        expect_type(&point, ConfigurationObjectType::Point)?;
        Ok(TheoremObject::Point(point))
    }

    /// Line given by an explicit object, points on it, or both
    pub fn line(object: Option<Arc<ConfigurationObject>>, points: Vec<Arc<ConfigurationObject>>) -> TheoremResult<Self> {
        ObjectWithPoints::new(ConfigurationObjectType::Line, object, points).map(TheoremObject::Line)
    }

    /// Circle given by an explicit object, points on it, or both
    pub fn circle(object: Option<Arc<ConfigurationObject>>, points: Vec<Arc<ConfigurationObject>>) -> TheoremResult<Self> {
        ObjectWithPoints::new(ConfigurationObjectType::Circle, object, points).map(TheoremObject::Circle)
    }

    pub fn line_from_points(a: Arc<ConfigurationObject>, b: Arc<ConfigurationObject>) -> TheoremResult<Self> {
        Self::line(None, vec![a, b])
    }

    pub fn circle_from_points(
        a: Arc<ConfigurationObject>,
        b: Arc<ConfigurationObject>,
        c: Arc<ConfigurationObject>,
    ) -> TheoremResult<Self> {
        Self::circle(None, vec![a, b, c])
    }

    /// Segment between two points
    pub fn segment(a: Arc<ConfigurationObject>, b: Arc<ConfigurationObject>) -> TheoremResult<Self> {
        Ok(Self::pair(PairKind::LineSegment, Self::point(a)?, Self::point(b)?))
    }

    /// Angle between two lines
    pub fn angle(first: TheoremObject, second: TheoremObject) -> TheoremResult<Self> {
        for line in [&first, &second] {
            if !matches!(line, TheoremObject::Line(_)) {
                return Err(TheoremError::WrongTheoremObject {
                    expected: "line",
                    found: line.kind_name(),
                });
            }
        }
        Ok(Self::pair(PairKind::Angle, first, second))
    }

    fn pair(kind: PairKind, first: TheoremObject, second: TheoremObject) -> Self {
        TheoremObject::Pair(PairTheoremObject {
            kind,
            first: Box::new(first),
            second: Box::new(second),
        })
    }

    /// Points needed to pin down a line or circle; 0 for other variants
    pub fn number_of_needed_points(&self) -> usize {
        match self {
            TheoremObject::Line(_) => needed_points(ConfigurationObjectType::Line),
            TheoremObject::Circle(_) => needed_points(ConfigurationObjectType::Circle),
            TheoremObject::Point(_) | TheoremObject::Pair(_) => 0,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            TheoremObject::Point(_) => "point",
            TheoremObject::Line(_) => "line",
            TheoremObject::Circle(_) => "circle",
            TheoremObject::Pair(pair) => match pair.kind {
                PairKind::LineSegment => "line segment",
                PairKind::Angle => "angle",
            },
        }
    }

    /// Whether both descriptions must denote the same object
    pub fn is_equivalent_to(&self, other: &TheoremObject) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        match (self, other) {
            (TheoremObject::Point(a), TheoremObject::Point(b)) => a == b,
            (TheoremObject::Line(a), TheoremObject::Line(b))
            | (TheoremObject::Circle(a), TheoremObject::Circle(b)) => {
                a.is_equivalent_to(b, self.number_of_needed_points())
            }
            (TheoremObject::Pair(a), TheoremObject::Pair(b)) => {
                a.kind == b.kind
                    && ((a.first.is_equivalent_to(&b.first) && a.second.is_equivalent_to(&b.second))
                        || (a.first.is_equivalent_to(&b.second) && a.second.is_equivalent_to(&b.first)))
            }
            _ => false,
        }
    }

    /// Image under `bijection`.
    ///
    /// `None` when the image is not expressible: a point without an image, or
    /// a line or circle left without its object and with too few points.
    pub fn remap_object_and_points(&self, bijection: &LooseObjectBijection) -> Option<TheoremObject> {
        match self {
            TheoremObject::Point(point) => bijection.remap(point).map(TheoremObject::Point),
            TheoremObject::Line(line) => line
                .remap(self.number_of_needed_points(), bijection)
                .map(TheoremObject::Line),
            TheoremObject::Circle(circle) => circle
                .remap(self.number_of_needed_points(), bijection)
                .map(TheoremObject::Circle),
            TheoremObject::Pair(pair) => Some(Self::pair(
                pair.kind,
                pair.first.remap_object_and_points(bijection)?,
                pair.second.remap_object_and_points(bijection)?,
            )),
        }
    }
}

impl fmt::Display for TheoremObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TheoremObject::Point(point) => write!(f, "{}", point.id()),
            TheoremObject::Line(inner) | TheoremObject::Circle(inner) => {
                let points: Vec<String> = inner.points.iter().map(|p| p.id().to_string()).collect();
                match &inner.object {
                    Some(object) => write!(f, "{}[{}]", object.id(), points.join(", ")),
                    None => write!(f, "[{}]", points.join(", ")),
                }
            }
            TheoremObject::Pair(pair) => write!(f, "({}, {})", pair.first, pair.second),
        }
    }
}
