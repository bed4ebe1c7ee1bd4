// Allowed value shapes for template parameters

use serde::{Deserialize, Serialize};

use super::ast::{Modifier, Operator};

/// The category of values that may be substituted for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// A single primitive value
    Scalar,
    /// A list of primitives or a map of string keys to primitives
    Composite,
    /// Either of the above
    Any,
}

impl Shape {
    /// Resolve the shape of one variable.
    ///
    /// Operators only change how a value is serialized, so they never narrow
    /// the shape. The explode modifier is the only thing that does.
    pub fn classify(_operator: Operator, modifier: Modifier) -> Shape {
        match modifier {
            Modifier::Explode => Shape::Composite,
            Modifier::Prefix(_) | Modifier::None => Shape::Any,
        }
    }

    pub fn accepts_single(self) -> bool {
        matches!(self, Shape::Scalar | Shape::Any)
    }

    pub fn accepts_composite(self) -> bool {
        matches!(self, Shape::Composite | Shape::Any)
    }

    /// Shape accepted by both `self` and `other`, or None when they share no values
    pub fn intersect(self, other: Shape) -> Option<Shape> {
        match (self, other) {
            (Shape::Any, shape) | (shape, Shape::Any) => Some(shape),
            (a, b) if a == b => Some(a),
            _ => None,
        }
    }
}
