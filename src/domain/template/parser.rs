// Template parser using recursive descent
//
// Parsing is total: any input string produces a Template. Text that cannot be
// read as an expansion block is kept as literal text.

use tracing::{debug, warn};

use super::ast::{Expression, Modifier, Operator, Template, TemplatePart, VarSpec};

/// A slice of the template: either literal text or the inner text of a `{...}` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Expansion(&'a str),
}

/// Lazily walks a template left to right, yielding literal and expansion segments
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    pub fn new(template: &'a str) -> Self {
        Self { rest: template }
    }

    /// Only the expansion blocks, literal text dropped
    pub fn expansions(self) -> impl Iterator<Item = &'a str> {
        self.filter_map(|segment| match segment {
            Segment::Expansion(block) => Some(block),
            Segment::Literal(_) => None,
        })
    }

    fn take_literal(&mut self, len: usize) -> Segment<'a> {
        let (literal, rest) = self.rest.split_at(len);
        self.rest = rest;
        Segment::Literal(literal)
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        let open = match self.rest.find('{') {
            Some(open) => open,
            None => return Some(self.take_literal(self.rest.len())),
        };

        // Flush literal text before the brace first
        if open > 0 {
            return Some(self.take_literal(open));
        }

        // self.rest starts with '{'; the block runs to the first '}'
        match self.rest[1..].find('}') {
            Some(close) => {
                let block = &self.rest[1..close + 1];
                self.rest = &self.rest[close + 2..];
                Some(Segment::Expansion(block))
            }
            None => {
                warn!("unterminated expansion {:?} treated as literal", self.rest);
                Some(self.take_literal(self.rest.len()))
            }
        }
    }
}

pub struct TemplateParser;

impl TemplateParser {
    pub fn parse(template: &str) -> Template {
        let parts = Segments::new(template)
            .map(|segment| match segment {
                Segment::Literal(text) => TemplatePart::Literal(text.to_string()),
                Segment::Expansion(block) => TemplatePart::Expression(parse_expression(block)),
            })
            .collect();

        Template::new(parts)
    }
}

/// Parse the inner text of one `{...}` block
pub fn parse_expression(block: &str) -> Expression {
    let (operator, list) = split_operator(block);
    Expression::new(operator, parse_varspecs(list))
}

/// Strip a single leading operator character, if there is one
pub fn split_operator(block: &str) -> (Operator, &str) {
    let mut chars = block.chars();
    match chars.next().and_then(Operator::from_char) {
        Some(operator) => (operator, chars.as_str()),
        None => (Operator::Simple, block),
    }
}

/// Split a comma-separated variable list into variable specs
///
/// Tokens that leave an empty name once the modifier is removed are skipped,
/// so an empty list yields no variables.
pub fn parse_varspecs(list: &str) -> Vec<VarSpec> {
    list.split(',').filter_map(parse_varspec).collect()
}

fn parse_varspec(token: &str) -> Option<VarSpec> {
    let (name, modifier) = if let Some((name, digits)) = token
        .rsplit_once(':')
        .filter(|(_, digits)| is_digits(digits))
    {
        // Lengths past usize are meaningless; saturate instead of failing
        let max_len = digits.parse().unwrap_or(usize::MAX);
        (name, Modifier::Prefix(max_len))
    } else if let Some(name) = token.strip_suffix('*') {
        (name, Modifier::Explode)
    } else {
        (token, Modifier::None)
    };

    if name.is_empty() {
        debug!("skipping variable token {:?} with empty name", token);
        return None;
    }

    Some(VarSpec::new(name, modifier))
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
