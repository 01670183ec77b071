//! Theorems over configuration objects

use super::object::{PairKind, TheoremObject};
use super::{TheoremError, TheoremResult};
use crate::ir::LooseObjectBijection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of statement a theorem makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TheoremType {
    /// Three points on one line
    CollinearPoints,
    /// Four points on one circle
    ConcyclicPoints,
    /// Three lines through one point
    ConcurrentLines,
    ParallelLines,
    PerpendicularLines,
    EqualLineSegments,
    TangentCircles,
    LineTangentToCircle,
    /// A point on a line or circle
    Incidence,
    EqualAngles,
}

impl TheoremType {
    pub const ALL: [TheoremType; 10] = [
        TheoremType::CollinearPoints,
        TheoremType::ConcyclicPoints,
        TheoremType::ConcurrentLines,
        TheoremType::ParallelLines,
        TheoremType::PerpendicularLines,
        TheoremType::EqualLineSegments,
        TheoremType::TangentCircles,
        TheoremType::LineTangentToCircle,
        TheoremType::Incidence,
        TheoremType::EqualAngles,
    ];

    /// Number of objects a theorem of this type is stated about
    pub fn number_of_objects(&self) -> usize {
        match self {
            TheoremType::CollinearPoints | TheoremType::ConcurrentLines => 3,
            TheoremType::ConcyclicPoints => 4,
            _ => 2,
        }
    }

    /// Whether `object` may appear at `position`
    fn accepts(&self, position: usize, object: &TheoremObject) -> bool {
        use TheoremObject as O;

        match (self, object) {
            (TheoremType::CollinearPoints | TheoremType::ConcyclicPoints, O::Point(_)) => true,
            (
                TheoremType::ConcurrentLines | TheoremType::ParallelLines | TheoremType::PerpendicularLines,
                O::Line(_),
            ) => true,
            (TheoremType::TangentCircles, O::Circle(_)) => true,
            (TheoremType::LineTangentToCircle, O::Line(_)) => position == 0,
            (TheoremType::LineTangentToCircle, O::Circle(_)) => position == 1,
            (TheoremType::Incidence, O::Point(_)) => position == 0,
            (TheoremType::Incidence, O::Line(_) | O::Circle(_)) => position == 1,
            (TheoremType::EqualLineSegments, O::Pair(pair)) => pair.kind() == PairKind::LineSegment,
            (TheoremType::EqualAngles, O::Pair(pair)) => pair.kind() == PairKind::Angle,
            _ => false,
        }
    }
}

impl fmt::Display for TheoremType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A statement about theorem objects.
///
/// Objects are unordered except for the typed positions of
/// `LineTangentToCircle` and `Incidence`.
#[derive(Debug, Clone)]
pub struct Theorem {
    theorem_type: TheoremType,
    objects: Vec<TheoremObject>,
}

impl Theorem {
    pub fn new(theorem_type: TheoremType, objects: Vec<TheoremObject>) -> TheoremResult<Self> {
        if objects.len() != theorem_type.number_of_objects() {
            return Err(TheoremError::InvalidObjects {
                theorem_type,
                reason: format!(
                    "expected {} objects, got {}",
                    theorem_type.number_of_objects(),
                    objects.len()
                ),
            });
        }

        if let Some((position, object)) = objects
            .iter()
            .enumerate()
            .find(|(position, object)| !theorem_type.accepts(*position, object))
        {
            return Err(TheoremError::InvalidObjects {
                theorem_type,
                reason: format!("{} is not allowed at position {}", object.kind_name(), position),
            });
        }

        Ok(Self {
            theorem_type,
            objects,
        })
    }

    pub fn theorem_type(&self) -> TheoremType {
        self.theorem_type
    }

    pub fn objects(&self) -> &[TheoremObject] {
        &self.objects
    }

    /// Same type and the objects match one to one, in any order
    pub fn is_equivalent_to(&self, other: &Theorem) -> bool {
        if self.theorem_type != other.theorem_type || self.objects.len() != other.objects.len() {
            return false;
        }

        let mut used = vec![false; other.objects.len()];
        match_objects(&self.objects, &other.objects, &mut used)
    }

    /// Image under `bijection`, `None` if some object has no image
    pub fn remap(&self, bijection: &LooseObjectBijection) -> Option<Theorem> {
        let objects = self
            .objects
            .iter()
            .map(|object| object.remap_object_and_points(bijection))
            .collect::<Option<Vec<_>>>()?;

        Some(Theorem {
            theorem_type: self.theorem_type,
            objects,
        })
    }
}

/// Backtracking search for a perfect matching under equivalence
fn match_objects(left: &[TheoremObject], right: &[TheoremObject], used: &mut [bool]) -> bool {
    let Some((first, rest)) = left.split_first() else {
        return true;
    };

    for (index, candidate) in right.iter().enumerate() {
        if used[index] || !first.is_equivalent_to(candidate) {
            continue;
        }

        used[index] = true;
        if match_objects(rest, right, used) {
            return true;
        }
        used[index] = false;
    }

    false
}

impl fmt::Display for Theorem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let objects: Vec<String> = self.objects.iter().map(|o| o.to_string()).collect();
        write!(f, "{}: {}", self.theorem_type, objects.join(", "))
    }
}
