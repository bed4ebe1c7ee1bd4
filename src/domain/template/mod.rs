// Template module for RFC 6570 URI templates
//
// This module locates expansion blocks in a template, reads their operators
// and variable modifiers, and infers which value shapes each variable accepts.

mod ast;
mod parser;
mod params;
mod shape;

pub use ast::{Expression, Modifier, Operator, Template, TemplatePart, VarSpec};
pub use parser::{
    parse_expression, parse_varspecs, split_operator, Segment, Segments, TemplateParser,
};
pub use params::{MergePolicy, ParameterMap, UriParams};
pub use shape::Shape;
