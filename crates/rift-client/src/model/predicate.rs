//! Predicates: the match conditions attached to a stub.
//!
//! A predicate is a single operator applied to a payload. Comparison
//! operators carry a protocol-specific request, logical operators carry
//! nested predicates, and `inject` carries a code string that the server
//! evaluates. The request type is a parameter so that the same tree can hold
//! undecoded leaves while the imposter protocol is still unknown.

use super::payload::RequestPayload;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub(crate) const OP_AND: &str = "and";
pub(crate) const OP_OR: &str = "or";
pub(crate) const OP_NOT: &str = "not";
pub(crate) const OP_INJECT: &str = "inject";
pub(crate) const OP_EXISTS: &str = "exists";

/// Comparison operators that test a request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equals,
    DeepEquals,
    Contains,
    StartsWith,
    EndsWith,
    Matches,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Equals,
        Comparison::DeepEquals,
        Comparison::Contains,
        Comparison::StartsWith,
        Comparison::EndsWith,
        Comparison::Matches,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Equals => "equals",
            Comparison::DeepEquals => "deepEquals",
            Comparison::Contains => "contains",
            Comparison::StartsWith => "startsWith",
            Comparison::EndsWith => "endsWith",
            Comparison::Matches => "matches",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Comparison::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::UnsupportedOperator(s.to_string()))
    }
}

/// Narrows a comparison to the value found at a JSONPath in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonPath {
    pub selector: String,
}

/// Narrows a comparison to the value found at an XPath in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XPath {
    pub selector: String,
    /// Namespace prefixes used by the selector.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub ns: HashMap<String, String>,
}

/// The operator of a predicate together with its operator-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<R = RequestPayload> {
    Compare { operator: Comparison, request: R },
    /// Field name to expected presence, e.g. `{"query": {"q": true}}`.
    Exists(Map<String, Value>),
    And(Vec<Predicate<R>>),
    Or(Vec<Predicate<R>>),
    Not(Box<Predicate<R>>),
    /// JavaScript evaluated by the server. Opaque to the client.
    Inject(String),
}

impl<R> Operation<R> {
    /// Wire name of the operator.
    pub fn operator(&self) -> &'static str {
        match self {
            Operation::Compare { operator, .. } => operator.as_str(),
            Operation::Exists(_) => OP_EXISTS,
            Operation::And(_) => OP_AND,
            Operation::Or(_) => OP_OR,
            Operation::Not(_) => OP_NOT,
            Operation::Inject(_) => OP_INJECT,
        }
    }
}

/// A match condition on a stub, possibly composed of nested predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate<R = RequestPayload> {
    pub operation: Operation<R>,
    pub case_sensitive: bool,
    /// Regex removed from the request values before comparing.
    pub except: Option<String>,
    pub json_path: Option<JsonPath>,
    pub xpath: Option<XPath>,
}

impl<R> Predicate<R> {
    pub fn new(operation: Operation<R>) -> Self {
        Self {
            operation,
            case_sensitive: false,
            except: None,
            json_path: None,
            xpath: None,
        }
    }

    pub fn compare(operator: Comparison, request: impl Into<R>) -> Self {
        Self::new(Operation::Compare {
            operator,
            request: request.into(),
        })
    }

    pub fn equals(request: impl Into<R>) -> Self {
        Self::compare(Comparison::Equals, request)
    }

    pub fn deep_equals(request: impl Into<R>) -> Self {
        Self::compare(Comparison::DeepEquals, request)
    }

    pub fn contains(request: impl Into<R>) -> Self {
        Self::compare(Comparison::Contains, request)
    }

    pub fn starts_with(request: impl Into<R>) -> Self {
        Self::compare(Comparison::StartsWith, request)
    }

    pub fn ends_with(request: impl Into<R>) -> Self {
        Self::compare(Comparison::EndsWith, request)
    }

    pub fn matches(request: impl Into<R>) -> Self {
        Self::compare(Comparison::Matches, request)
    }

    pub fn exists(fields: Map<String, Value>) -> Self {
        Self::new(Operation::Exists(fields))
    }

    pub fn and(predicates: Vec<Predicate<R>>) -> Self {
        Self::new(Operation::And(predicates))
    }

    pub fn or(predicates: Vec<Predicate<R>>) -> Self {
        Self::new(Operation::Or(predicates))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate<R>) -> Self {
        Self::new(Operation::Not(Box::new(predicate)))
    }

    pub fn inject(script: impl Into<String>) -> Self {
        Self::new(Operation::Inject(script.into()))
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_except(mut self, pattern: impl Into<String>) -> Self {
        self.except = Some(pattern.into());
        self
    }

    pub fn with_json_path(mut self, selector: impl Into<String>) -> Self {
        self.json_path = Some(JsonPath {
            selector: selector.into(),
        });
        self
    }

    pub fn with_xpath(mut self, xpath: XPath) -> Self {
        self.xpath = Some(xpath);
        self
    }

    pub fn operator(&self) -> &'static str {
        self.operation.operator()
    }

    /// Rebuild the tree with every request leaf converted by `f`, recursing
    /// through `and`/`or`/`not`. Stops at the first failing leaf.
    pub(crate) fn try_map<S, F>(self, f: &mut F) -> Result<Predicate<S>>
    where
        F: FnMut(R) -> Result<S>,
    {
        let operation = match self.operation {
            Operation::Compare { operator, request } => Operation::Compare {
                operator,
                request: f(request)?,
            },
            Operation::Exists(fields) => Operation::Exists(fields),
            Operation::And(children) => Operation::And(try_map_all(children, f)?),
            Operation::Or(children) => Operation::Or(try_map_all(children, f)?),
            Operation::Not(child) => Operation::Not(Box::new(child.try_map(f)?)),
            Operation::Inject(script) => Operation::Inject(script),
        };
        Ok(Predicate {
            operation,
            case_sensitive: self.case_sensitive,
            except: self.except,
            json_path: self.json_path,
            xpath: self.xpath,
        })
    }
}

pub(crate) fn try_map_all<R, S, F>(predicates: Vec<Predicate<R>>, f: &mut F) -> Result<Vec<Predicate<S>>>
where
    F: FnMut(R) -> Result<S>,
{
    let mut mapped = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        mapped.push(predicate.try_map(f)?);
    }
    Ok(mapped)
}
