// Abstract Syntax Tree types for URI templates

use serde::{Deserialize, Serialize};

/// Represents a parsed template as a list of parts
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub parts: Vec<TemplatePart>,
}

impl Template {
    pub fn new(parts: Vec<TemplatePart>) -> Self {
        Self { parts }
    }

    /// Get all expansion blocks in this template, in document order
    pub fn expressions(&self) -> Vec<&Expression> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                TemplatePart::Expression(expr) => Some(expr),
                _ => None,
            })
            .collect()
    }

    /// Get every variable spec across all expansion blocks, in document order
    pub fn varspecs(&self) -> impl Iterator<Item = &VarSpec> {
        self.expressions()
            .into_iter()
            .flat_map(|expr| expr.varspecs.iter())
    }
}

/// A template consists of literal text and `{...}` expansion blocks
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Literal(String),
    Expression(Expression),
}

/// One `{...}` block: an operator followed by a comma-separated variable list
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub operator: Operator,
    pub varspecs: Vec<VarSpec>,
}

impl Expression {
    pub fn new(operator: Operator, varspecs: Vec<VarSpec>) -> Self {
        Self { operator, varspecs }
    }
}

/// Expansion operators. `Simple` is the absence of an operator character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    PathSegment,
    PathParameter,
    FormQuery,
    FormContinuation,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::PathSegment),
            ';' => Some(Operator::PathParameter),
            '?' => Some(Operator::FormQuery),
            '&' => Some(Operator::FormContinuation),
            _ => None,
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            Operator::Simple => None,
            Operator::Reserved => Some('+'),
            Operator::Fragment => Some('#'),
            Operator::Label => Some('.'),
            Operator::PathSegment => Some('/'),
            Operator::PathParameter => Some(';'),
            Operator::FormQuery => Some('?'),
            Operator::FormContinuation => Some('&'),
        }
    }
}

/// Per-variable modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    None,
    /// `:N`, truncate the expanded string to N characters
    Prefix(usize),
    /// `*`, expand each list item or map entry separately
    Explode,
}

/// A single variable reference inside an expansion block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    pub name: String,
    pub modifier: Modifier,
}

impl VarSpec {
    pub fn new(name: impl Into<String>, modifier: Modifier) -> Self {
        Self {
            name: name.into(),
            modifier,
        }
    }
}
