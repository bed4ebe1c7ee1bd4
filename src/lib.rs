// uri-params: infer the parameter contract of RFC 6570 URI templates
//
// A template such as "/users/{id}{?fields*}" names the variables "id" and
// "fields". Plain variables accept a single value, a list or a map; exploded
// variables ("fields*") accept only lists and maps.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod validation;

pub use domain::template::{MergePolicy, ParameterMap, Shape, TemplateParser, UriParams};
pub use error::ValueError;
pub use validation::{validate_params, validate_value, Mode};

/// Infer the parameter map of a template using the default merge policy
pub fn uri_params(template: &str) -> ParameterMap {
    ParameterMap::from_str_with(template, MergePolicy::default())
}
