//! Pattern pieces, segment parsers and bound captures.
//!
//! # Responsibilities
//! - Describe one element of a path pattern (static, dynamic, wildcard)
//! - Parse a single path segment into a typed capture
//! - Hold the ordered captures bound by one pattern
//!
//! # Design Decisions
//! - A segment that fails to parse is an ordinary `None`, never an error
//! - Custom parsers are plain functions, no registry trait objects to implement

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A value bound by a dynamic or wildcard piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Capture {
    Text(String),
    Int(i64),
    #[serde(rename = "uint")]
    UInt(u64),
    Uuid(Uuid),
    Bool(bool),
    /// All segments swallowed by a wildcard, possibly none.
    Segments(Vec<String>),
}

impl Capture {
    /// Render the capture back into path segments.
    pub fn to_segments(&self) -> Vec<String> {
        match self {
            Capture::Text(s) => vec![s.clone()],
            Capture::Int(n) => vec![n.to_string()],
            Capture::UInt(n) => vec![n.to_string()],
            Capture::Uuid(id) => vec![id.to_string()],
            Capture::Bool(b) => vec![b.to_string()],
            Capture::Segments(segments) => segments.clone(),
        }
    }

    /// Whether this capture can fill a single-segment dynamic piece.
    pub fn is_single(&self) -> bool {
        !matches!(self, Capture::Segments(_))
    }
}

/// Externally supplied segment parser, e.g. for enum-like segments.
#[derive(Clone)]
pub struct CustomParser {
    name: String,
    parse: Arc<dyn Fn(&str) -> Option<Capture> + Send + Sync>,
}

impl CustomParser {
    pub fn new<F>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> Option<Capture> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parse: Arc::new(parse),
        }
    }

    /// Parser accepting exactly one of the given words, captured as text.
    pub fn one_of<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        Self::new(name, move |segment| {
            words
                .iter()
                .any(|w| w == segment)
                .then(|| Capture::Text(segment.to_string()))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse(&self, segment: &str) -> Option<Capture> {
        (self.parse)(segment)
    }
}

impl fmt::Debug for CustomParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomParser").field(&self.name).finish()
    }
}

/// The type a dynamic piece parses its segment into.
#[derive(Debug, Clone)]
pub enum ParamType {
    Text,
    Int,
    UInt,
    Uuid,
    Bool,
    Custom(CustomParser),
}

impl ParamType {
    /// Resolve a built-in type name as written in pattern syntax.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" | "str" | "string" => Some(ParamType::Text),
            "int" | "i64" => Some(ParamType::Int),
            "uint" | "u64" => Some(ParamType::UInt),
            "uuid" => Some(ParamType::Uuid),
            "bool" => Some(ParamType::Bool),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ParamType::Text => "text",
            ParamType::Int => "int",
            ParamType::UInt => "uint",
            ParamType::Uuid => "uuid",
            ParamType::Bool => "bool",
            ParamType::Custom(parser) => parser.name(),
        }
    }

    /// Parse one segment. `None` fails the whole pattern.
    pub fn parse(&self, segment: &str) -> Option<Capture> {
        match self {
            ParamType::Text => Some(Capture::Text(segment.to_string())),
            ParamType::Int => segment.parse().ok().map(Capture::Int),
            ParamType::UInt => segment.parse().ok().map(Capture::UInt),
            ParamType::Uuid => Uuid::parse_str(segment).ok().map(Capture::Uuid),
            ParamType::Bool => match segment {
                "true" => Some(Capture::Bool(true)),
                "false" => Some(Capture::Bool(false)),
                _ => None,
            },
            ParamType::Custom(parser) => parser.parse(segment),
        }
    }
}

/// One element of a path pattern.
#[derive(Debug, Clone)]
pub enum Piece {
    /// Matches exactly one segment equal to the text.
    Static(String),
    /// Matches one segment that parses as `ty`.
    Dynamic { name: String, ty: ParamType },
    /// Matches every remaining segment. Only valid as the last piece.
    Wildcard { name: String },
}

impl Piece {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Piece::Wildcard { .. })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::Static(text) => f.write_str(text),
            Piece::Dynamic { name, ty: ParamType::Text } => write!(f, "{{{}}}", name),
            Piece::Dynamic { name, ty } => write!(f, "{{{}:{}}}", name, ty.name()),
            Piece::Wildcard { name } => write!(f, "{{*{}}}", name),
        }
    }
}

/// The ordered captures bound by a single pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(Vec<Capture>);

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, capture: Capture) {
        self.0.push(capture);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Capture> {
        self.0.get(index)
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        match self.get(index)? {
            Capture::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn int(&self, index: usize) -> Option<i64> {
        match self.get(index)? {
            Capture::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn uint(&self, index: usize) -> Option<u64> {
        match self.get(index)? {
            Capture::UInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn uuid(&self, index: usize) -> Option<Uuid> {
        match self.get(index)? {
            Capture::Uuid(id) => Some(*id),
            _ => None,
        }
    }

    pub fn flag(&self, index: usize) -> Option<bool> {
        match self.get(index)? {
            Capture::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn segments(&self, index: usize) -> Option<&[String]> {
        match self.get(index)? {
            Capture::Segments(segments) => Some(segments),
            _ => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Capture> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Capture> {
        self.0
    }
}

impl From<Vec<Capture>> for Captures {
    fn from(captures: Vec<Capture>) -> Self {
        Self(captures)
    }
}

impl IntoIterator for Captures {
    type Item = Capture;
    type IntoIter = std::vec::IntoIter<Capture>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
