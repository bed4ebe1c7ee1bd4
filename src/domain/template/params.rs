// Parameter maps: the merged contract of a whole template

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::ast::{Expression, Template};
use super::parser::{parse_expression, Segments};
use super::shape::Shape;

/// How to resolve a parameter name that appears more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// The most recently seen occurrence decides the shape
    #[default]
    LastWins,
    /// The narrowest shape satisfying every occurrence wins
    Restrictive,
}

/// Mapping from parameter name to allowed shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap {
    params: BTreeMap<String, Shape>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Infer the parameter map straight from template text
    pub fn from_str_with(template: &str, policy: MergePolicy) -> Self {
        Segments::new(template)
            .expansions()
            .map(|block| Self::from_expression(&parse_expression(block), policy))
            .fold(Self::new(), |mut merged, block| {
                merged.merge(block, policy);
                merged
            })
    }

    pub fn from_template(template: &Template, policy: MergePolicy) -> Self {
        let mut merged = Self::new();
        for expr in template.expressions() {
            merged.merge(Self::from_expression(expr, policy), policy);
        }
        merged
    }

    /// Parameters contributed by a single expansion block
    pub fn from_expression(expr: &Expression, policy: MergePolicy) -> Self {
        let mut map = Self::new();
        for varspec in &expr.varspecs {
            let shape = Shape::classify(expr.operator, varspec.modifier);
            map.insert(&varspec.name, shape, policy);
        }
        map
    }

    /// Merge a later block's parameters into this map
    pub fn merge(&mut self, other: ParameterMap, policy: MergePolicy) {
        for (name, shape) in other.params {
            self.insert(&name, shape, policy);
        }
    }

    pub fn insert(&mut self, name: &str, shape: Shape, policy: MergePolicy) {
        let resolved = match (self.params.get(name), policy) {
            (None, _) | (Some(_), MergePolicy::LastWins) => shape,
            (Some(&existing), MergePolicy::Restrictive) => match existing.intersect(shape) {
                Some(narrowed) => narrowed,
                None => {
                    warn!(
                        "parameter '{}' is used as both {:?} and {:?}; keeping {:?}",
                        name, existing, shape, shape
                    );
                    shape
                }
            },
        };

        if let Some(previous) = self.params.insert(name.to_string(), resolved) {
            if previous != resolved {
                debug!("parameter '{}' reshaped from {:?} to {:?}", name, previous, resolved);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Shape> {
        self.params.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Shape)> {
        self.params.iter().map(|(name, shape)| (name.as_str(), *shape))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Shape)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (N, Shape)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(name, shape)| (name.into(), shape)).collect(),
        }
    }
}

/// The parameter contract of a template
///
/// A template whose text is only known at runtime has an open contract:
/// every name is allowed and values are unconstrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriParams {
    Typed(ParameterMap),
    Open,
}

impl UriParams {
    pub fn infer(template: &str) -> Self {
        Self::infer_with(template, MergePolicy::default())
    }

    pub fn infer_with(template: &str, policy: MergePolicy) -> Self {
        UriParams::Typed(ParameterMap::from_str_with(template, policy))
    }

    pub fn open() -> Self {
        UriParams::Open
    }

    pub fn from_known(template: Option<&str>) -> Self {
        match template {
            Some(template) => Self::infer(template),
            None => Self::open(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, UriParams::Open)
    }

    pub fn allows(&self, name: &str) -> bool {
        match self {
            UriParams::Typed(map) => map.contains(name),
            UriParams::Open => true,
        }
    }

    /// Shape required for `name`; None when the name is unknown or the contract is open
    pub fn shape_of(&self, name: &str) -> Option<Shape> {
        match self {
            UriParams::Typed(map) => map.get(name),
            UriParams::Open => None,
        }
    }

    pub fn params(&self) -> Option<&ParameterMap> {
        match self {
            UriParams::Typed(map) => Some(map),
            UriParams::Open => None,
        }
    }
}

impl From<ParameterMap> for UriParams {
    fn from(map: ParameterMap) -> Self {
        UriParams::Typed(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::TemplateParser;

    fn infer(template: &str) -> ParameterMap {
        ParameterMap::from_str_with(template, MergePolicy::LastWins)
    }

    #[test]
    fn test_basic_route() {
        let map = infer("/api/my-route/{id}/whatever{?foo,bar}");
        let expected: ParameterMap =
            [("id", Shape::Any), ("foo", Shape::Any), ("bar", Shape::Any)].into_iter().collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_modifiers() {
        let map = infer("/api/my-route/{/path*}{?foo:8}");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("path"), Some(Shape::Composite));
        assert_eq!(map.get("foo"), Some(Shape::Any));
    }

    #[test]
    fn test_last_wins_across_blocks() {
        let map = infer("{x*}{x}");
        assert_eq!(map.get("x"), Some(Shape::Any));

        let map = infer("{x}{x*}");
        assert_eq!(map.get("x"), Some(Shape::Composite));
    }

    #[test]
    fn test_last_wins_within_block() {
        assert_eq!(infer("{x*,x}").get("x"), Some(Shape::Any));
        assert_eq!(infer("{x,x*}").get("x"), Some(Shape::Composite));
    }

    #[test]
    fn test_restrictive_within_block() {
        let map = ParameterMap::from_str_with("{x*,x}", MergePolicy::Restrictive);
        assert_eq!(map.get("x"), Some(Shape::Composite));

        let map = ParameterMap::from_str_with("{?x,x*}", MergePolicy::Restrictive);
        assert_eq!(map.get("x"), Some(Shape::Composite));
    }

    #[test]
    fn test_restrictive_keeps_composite() {
        let map = ParameterMap::from_str_with("{x*}{x}", MergePolicy::Restrictive);
        assert_eq!(map.get("x"), Some(Shape::Composite));

        let map = ParameterMap::from_str_with("{x}{?x*}", MergePolicy::Restrictive);
        assert_eq!(map.get("x"), Some(Shape::Composite));
    }

    #[test]
    fn test_restrictive_disjoint_keeps_later() {
        let mut map = ParameterMap::new();
        map.insert("x", Shape::Scalar, MergePolicy::Restrictive);
        map.insert("x", Shape::Composite, MergePolicy::Restrictive);
        assert_eq!(map.get("x"), Some(Shape::Composite));
    }

    #[test]
    fn test_from_template_matches_from_str() {
        let text = "/api/{.dot}{+plus}{/slash*}{;semi:3}{?q,page}{&more*}{#frag}";
        let parsed = TemplateParser::parse(text);
        assert_eq!(
            ParameterMap::from_template(&parsed, MergePolicy::LastWins),
            infer(text)
        );
    }

    #[test]
    fn test_no_expansions() {
        assert!(infer("/static/path").is_empty());
        assert!(infer("/api/whatever{}").is_empty());
        assert!(infer("/broken/{id").is_empty());
    }

    #[test]
    fn test_open_contract() {
        let params = UriParams::from_known(None);
        assert!(params.is_open());
        assert!(params.allows("anything"));
        assert_eq!(params.shape_of("anything"), None);
        assert!(params.params().is_none());
    }

    #[test]
    fn test_typed_contract() {
        let params = UriParams::from_known(Some("{a}{/b*}"));
        assert!(!params.is_open());
        assert!(params.allows("a"));
        assert!(!params.allows("c"));
        assert_eq!(params.shape_of("b"), Some(Shape::Composite));
        assert_eq!(params.shape_of("c"), None);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let json = serde_json::to_value(infer("{a}{/b*}")).unwrap();
        assert_eq!(json, serde_json::json!({ "a": "any", "b": "composite" }));
    }

    #[test]
    fn test_merge_policy_names() {
        let policy: MergePolicy = serde_yaml::from_str("restrictive").unwrap();
        assert_eq!(policy, MergePolicy::Restrictive);
        let policy: MergePolicy = serde_yaml::from_str("last-wins").unwrap();
        assert_eq!(policy, MergePolicy::LastWins);
    }
}
