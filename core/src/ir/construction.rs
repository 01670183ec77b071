//! Constructions and their signatures
//!
//! A construction derives one new object from existing ones. Predefined
//! constructions come from a closed set with a fixed numeric formula; composed
//! constructions chain other constructions through a small template.

use super::arguments::{Arguments, ConstructionArgument};
use super::objects::ConfigurationObject;
use super::symbols::{ConfigurationObjectType, ObjectId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building constructions or constructed objects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Signature mismatch for {construction}: {reason}")]
    SignatureMismatch { construction: String, reason: String },

    #[error("Unknown construction: {0}")]
    UnknownConstruction(String),

    #[error("Invalid composed construction {name}: {reason}")]
    InvalidComposedConstruction { name: String, reason: String },
}

/// Result type for construction operations
pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// The closed set of constructions with a built-in numeric formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PredefinedConstructionType {
    CenterOfCircle,
    Circumcircle,
    Circumcenter,
    CircleWithCenterThroughPoint,
    IntersectionOfLines,
    InternalAngleBisector,
    LineFromPoints,
    Midpoint,
    ParallelLine,
    PerpendicularLine,
    PerpendicularProjection,
    PointReflection,
    SecondIntersectionOfCircleAndLine,
    RandomPointOnLine,
    RandomPointOnCircle,
}

impl PredefinedConstructionType {
    /// Every predefined construction type
    pub const ALL: [PredefinedConstructionType; 15] = [
        PredefinedConstructionType::CenterOfCircle,
        PredefinedConstructionType::Circumcircle,
        PredefinedConstructionType::Circumcenter,
        PredefinedConstructionType::CircleWithCenterThroughPoint,
        PredefinedConstructionType::IntersectionOfLines,
        PredefinedConstructionType::InternalAngleBisector,
        PredefinedConstructionType::LineFromPoints,
        PredefinedConstructionType::Midpoint,
        PredefinedConstructionType::ParallelLine,
        PredefinedConstructionType::PerpendicularLine,
        PredefinedConstructionType::PerpendicularProjection,
        PredefinedConstructionType::PointReflection,
        PredefinedConstructionType::SecondIntersectionOfCircleAndLine,
        PredefinedConstructionType::RandomPointOnLine,
        PredefinedConstructionType::RandomPointOnCircle,
    ];

    /// Registry name of this construction
    pub fn name(&self) -> &'static str {
        match self {
            PredefinedConstructionType::CenterOfCircle => "CenterOfCircle",
            PredefinedConstructionType::Circumcircle => "Circumcircle",
            PredefinedConstructionType::Circumcenter => "Circumcenter",
            PredefinedConstructionType::CircleWithCenterThroughPoint => {
                "CircleWithCenterThroughPoint"
            }
            PredefinedConstructionType::IntersectionOfLines => "IntersectionOfLines",
            PredefinedConstructionType::InternalAngleBisector => "InternalAngleBisector",
            PredefinedConstructionType::LineFromPoints => "LineFromPoints",
            PredefinedConstructionType::Midpoint => "Midpoint",
            PredefinedConstructionType::ParallelLine => "ParallelLine",
            PredefinedConstructionType::PerpendicularLine => "PerpendicularLine",
            PredefinedConstructionType::PerpendicularProjection => "PerpendicularProjection",
            PredefinedConstructionType::PointReflection => "PointReflection",
            PredefinedConstructionType::SecondIntersectionOfCircleAndLine => {
                "SecondIntersectionOfCircleAndLine"
            }
            PredefinedConstructionType::RandomPointOnLine => "RandomPointOnLine",
            PredefinedConstructionType::RandomPointOnCircle => "RandomPointOnCircle",
        }
    }

    /// Look up a predefined type by its registry name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Random constructions cannot be reproduced from their arguments alone
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            PredefinedConstructionType::RandomPointOnLine
                | PredefinedConstructionType::RandomPointOnCircle
        )
    }

    /// Type of the constructed object
    pub fn output_type(&self) -> ConfigurationObjectType {
        use ConfigurationObjectType::*;

        match self {
            PredefinedConstructionType::Circumcircle
            | PredefinedConstructionType::CircleWithCenterThroughPoint => Circle,
            PredefinedConstructionType::InternalAngleBisector
            | PredefinedConstructionType::LineFromPoints
            | PredefinedConstructionType::ParallelLine
            | PredefinedConstructionType::PerpendicularLine => Line,
            PredefinedConstructionType::CenterOfCircle
            | PredefinedConstructionType::Circumcenter
            | PredefinedConstructionType::IntersectionOfLines
            | PredefinedConstructionType::Midpoint
            | PredefinedConstructionType::PerpendicularProjection
            | PredefinedConstructionType::PointReflection
            | PredefinedConstructionType::SecondIntersectionOfCircleAndLine
            | PredefinedConstructionType::RandomPointOnLine
            | PredefinedConstructionType::RandomPointOnCircle => Point,
        }
    }

    /// Parameter list of this construction
    pub fn signature(&self) -> Signature {
        use ConfigurationObjectType::*;
        use ConstructionParameter as P;

        let parameters = match self {
            PredefinedConstructionType::CenterOfCircle => vec![P::Object(Circle)],
            PredefinedConstructionType::Circumcircle | PredefinedConstructionType::Circumcenter => {
                vec![P::set(P::Object(Point), 3)]
            }
            PredefinedConstructionType::CircleWithCenterThroughPoint => {
                vec![P::Object(Point), P::Object(Point)]
            }
            PredefinedConstructionType::IntersectionOfLines => vec![P::set(P::Object(Line), 2)],
            PredefinedConstructionType::InternalAngleBisector => {
                vec![P::Object(Point), P::set(P::Object(Point), 2)]
            }
            PredefinedConstructionType::LineFromPoints | PredefinedConstructionType::Midpoint => {
                vec![P::set(P::Object(Point), 2)]
            }
            PredefinedConstructionType::ParallelLine
            | PredefinedConstructionType::PerpendicularLine
            | PredefinedConstructionType::PerpendicularProjection => {
                vec![P::Object(Point), P::Object(Line)]
            }
            PredefinedConstructionType::PointReflection => vec![P::Object(Point), P::Object(Point)],
            PredefinedConstructionType::SecondIntersectionOfCircleAndLine => {
                vec![P::Object(Point), P::Object(Line), P::Object(Circle)]
            }
            PredefinedConstructionType::RandomPointOnLine => vec![P::Object(Line)],
            PredefinedConstructionType::RandomPointOnCircle => vec![P::Object(Circle)],
        };

        Signature::new(parameters)
    }
}

impl fmt::Display for PredefinedConstructionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstructionParameter {
    /// A single object of the given type
    Object(ConfigurationObjectType),

    /// `count` arguments matching `parameter`, order irrelevant
    Set {
        parameter: Box<ConstructionParameter>,
        count: usize,
    },
}

impl ConstructionParameter {
    /// Shorthand for a set parameter
    pub fn set(parameter: ConstructionParameter, count: usize) -> Self {
        ConstructionParameter::Set {
            parameter: Box::new(parameter),
            count,
        }
    }

    /// Number of flat input objects this parameter consumes
    pub fn arity(&self) -> usize {
        match self {
            ConstructionParameter::Object(_) => 1,
            ConstructionParameter::Set { parameter, count } => parameter.arity() * count,
        }
    }

    fn flattened_types_into(&self, out: &mut Vec<ConfigurationObjectType>) {
        match self {
            ConstructionParameter::Object(object_type) => out.push(*object_type),
            ConstructionParameter::Set { parameter, count } => {
                for _ in 0..*count {
                    parameter.flattened_types_into(out);
                }
            }
        }
    }

    /// Consume inputs from `inputs` starting at `*cursor`
    fn match_inputs(
        &self,
        inputs: &[Arc<ConfigurationObject>],
        cursor: &mut usize,
    ) -> Result<ConstructionArgument, String> {
        match self {
            ConstructionParameter::Object(expected) => {
                let object = inputs
                    .get(*cursor)
                    .ok_or_else(|| format!("expected {} inputs, got {}", *cursor + 1, inputs.len()))?;

                if object.object_type() != *expected {
                    return Err(format!(
                        "input {} is a {}, expected a {}",
                        *cursor,
                        object.object_type(),
                        expected
                    ));
                }

                *cursor += 1;
                Ok(ConstructionArgument::Object(Arc::clone(object)))
            }
            ConstructionParameter::Set { parameter, count } => {
                let mut elements: Vec<ConstructionArgument> = Vec::with_capacity(*count);

                for _ in 0..*count {
                    let element = parameter.match_inputs(inputs, cursor)?;
                    if elements.contains(&element) {
                        return Err(format!("set contains the argument {} twice", element));
                    }
                    elements.push(element);
                }

                Ok(ConstructionArgument::Set(elements))
            }
        }
    }
}

/// Ordered parameter list of a construction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    parameters: Vec<ConstructionParameter>,
}

impl Signature {
    pub fn new(parameters: Vec<ConstructionParameter>) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &[ConstructionParameter] {
        &self.parameters
    }

    /// Total number of flat inputs
    pub fn arity(&self) -> usize {
        self.parameters.iter().map(ConstructionParameter::arity).sum()
    }

    /// Expected type of each flat input, in order
    pub fn flattened_types(&self) -> Vec<ConfigurationObjectType> {
        let mut out = Vec::with_capacity(self.arity());
        for parameter in &self.parameters {
            parameter.flattened_types_into(&mut out);
        }
        out
    }

    /// Match a flat input list against this signature.
    ///
    /// `construction` is only used for error messages.
    pub fn match_inputs(
        &self,
        construction: &str,
        inputs: &[Arc<ConfigurationObject>],
    ) -> ConstructionResult<Arguments> {
        let mismatch = |reason: String| ConstructionError::SignatureMismatch {
            construction: construction.to_string(),
            reason,
        };

        if inputs.len() != self.arity() {
            return Err(mismatch(format!(
                "expected {} inputs, got {}",
                self.arity(),
                inputs.len()
            )));
        }

        let mut cursor = 0;
        let arguments = self
            .parameters
            .iter()
            .map(|parameter| parameter.match_inputs(inputs, &mut cursor))
            .collect::<Result<Vec<_>, _>>()
            .map_err(mismatch)?;

        Ok(Arguments::new(arguments))
    }
}

/// A construction with a built-in formula
#[derive(Debug, Clone)]
pub struct PredefinedConstruction {
    construction_type: PredefinedConstructionType,
    signature: Signature,
}

impl PredefinedConstruction {
    pub fn new(construction_type: PredefinedConstructionType) -> Self {
        Self {
            construction_type,
            signature: construction_type.signature(),
        }
    }

    pub fn construction_type(&self) -> PredefinedConstructionType {
        self.construction_type
    }
}

/// A construction defined by chaining other constructions.
///
/// The template's inputs are loose objects standing for the flattened
/// signature; its steps are constructed objects over those inputs, in
/// dependency order. The last step is the output.
#[derive(Debug, Clone)]
pub struct ComposedConstruction {
    name: String,
    signature: Signature,
    inputs: Vec<Arc<ConfigurationObject>>,
    steps: Vec<Arc<ConfigurationObject>>,
    is_random: bool,
}

impl ComposedConstruction {
    pub fn new(
        name: impl Into<String>,
        signature: Signature,
        inputs: Vec<Arc<ConfigurationObject>>,
        steps: Vec<Arc<ConfigurationObject>>,
    ) -> ConstructionResult<Self> {
        let name = name.into();
        let invalid = |reason: String| ConstructionError::InvalidComposedConstruction {
            name: name.clone(),
            reason,
        };

        let input_types: Vec<_> = inputs.iter().map(|input| input.object_type()).collect();
        if input_types != signature.flattened_types() {
            return Err(invalid(format!(
                "template inputs {:?} do not match signature {:?}",
                input_types,
                signature.flattened_types()
            )));
        }

        let mut known: FxHashSet<ObjectId> = FxHashSet::default();
        for input in &inputs {
            if !input.is_loose() {
                return Err(invalid(format!("template input {} is not loose", input.id())));
            }
            known.insert(input.id());
        }

        if steps.is_empty() {
            return Err(invalid("template has no steps".to_string()));
        }

        let mut is_random = false;
        for step in &steps {
            let constructed = step
                .as_constructed()
                .ok_or_else(|| invalid(format!("template step {} is not constructed", step.id())))?;

            if let Some(missing) = constructed
                .arguments()
                .flatten()
                .iter()
                .find(|argument| !known.contains(&argument.id()))
            {
                return Err(invalid(format!(
                    "template step {} uses {} before it is defined",
                    step.id(),
                    missing.id()
                )));
            }

            is_random |= constructed.construction().is_random();
            known.insert(step.id());
        }

        Ok(Self {
            name,
            signature,
            inputs,
            steps,
            is_random,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[Arc<ConfigurationObject>] {
        &self.inputs
    }

    pub fn steps(&self) -> &[Arc<ConfigurationObject>] {
        &self.steps
    }

    /// Template object produced by this construction
    pub fn output(&self) -> &Arc<ConfigurationObject> {
        // Non-empty by construction in `new`
        &self.steps[self.steps.len() - 1]
    }
}

/// A construction, predefined or composed
#[derive(Debug, Clone)]
pub enum Construction {
    Predefined(PredefinedConstruction),
    Composed(ComposedConstruction),
}

impl Construction {
    /// Unique registry name
    pub fn name(&self) -> &str {
        match self {
            Construction::Predefined(p) => p.construction_type.name(),
            Construction::Composed(c) => c.name(),
        }
    }

    pub fn signature(&self) -> &Signature {
        match self {
            Construction::Predefined(p) => &p.signature,
            Construction::Composed(c) => &c.signature,
        }
    }

    pub fn output_type(&self) -> ConfigurationObjectType {
        match self {
            Construction::Predefined(p) => p.construction_type.output_type(),
            Construction::Composed(c) => c.output().object_type(),
        }
    }

    /// Composed constructions are random if any step is random
    pub fn is_random(&self) -> bool {
        match self {
            Construction::Predefined(p) => p.construction_type.is_random(),
            Construction::Composed(c) => c.is_random,
        }
    }
}

// Names are unique within the registry, so they identify constructions
impl PartialEq for Construction {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Construction {}

impl Hash for Construction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Display for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
