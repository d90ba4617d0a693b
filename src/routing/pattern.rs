//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Parse textual patterns (`/users/{id:int}`, `/static/{*path}`)
//! - Match a pattern against a segment slice, binding captures
//! - Render captures back into segments
//!
//! # Design Decisions
//! - Matching is a single left-to-right pass, no backtracking
//! - A prefix match hands the unconsumed segments back to the caller
//! - No regex: every piece is an equality test or a typed parse

use std::fmt;

use thiserror::Error;

use crate::routing::piece::{Capture, Captures, CustomParser, ParamType, Piece};

/// Errors in textual pattern syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unclosed or stray brace in segment `{0}`")]
    Brace(String),

    #[error("invalid parameter name `{0}`")]
    InvalidName(String),

    #[error("unknown parameter type `{ty}` for `{name}`")]
    UnknownType { name: String, ty: String },

    #[error("parameter `{0}` appears more than once")]
    DuplicateParam(String),

    #[error("wildcard `{0}` must be the last piece")]
    WildcardNotLast(String),
}

/// An ordered list of pieces.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    pieces: Vec<Piece>,
}

/// Result of a successful prefix match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'s> {
    pub bound: Captures,
    pub rest: &'s [String],
}

impl Pattern {
    /// Build a pattern from raw pieces. Wildcard placement is checked when the
    /// pattern is placed into a route tree.
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    /// The empty pattern, matching `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a pattern using only the built-in parameter types.
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        Self::parse_with(input, &[])
    }

    /// Parse a pattern, resolving unknown type names against `custom`.
    pub fn parse_with(input: &str, custom: &[CustomParser]) -> Result<Self, PatternError> {
        let mut pieces = Vec::new();
        let mut names: Vec<&str> = Vec::new();

        for segment in input.split('/').filter(|s| !s.is_empty()) {
            let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
                if segment.contains(['{', '}']) {
                    return Err(PatternError::Brace(segment.to_string()));
                }
                pieces.push(Piece::Static(segment.to_string()));
                continue;
            };

            if let Some(last) = pieces.last() {
                if let Piece::Wildcard { name } = last {
                    return Err(PatternError::WildcardNotLast(name.clone()));
                }
            }

            let (name, piece) = match inner.strip_prefix('*') {
                Some(name) => (name, Piece::Wildcard { name: name.to_string() }),
                None => {
                    let (name, ty) = match inner.split_once(':') {
                        Some((name, ty_name)) => (name, resolve_type(name, ty_name, custom)?),
                        None => (inner, ParamType::Text),
                    };
                    (name, Piece::Dynamic { name: name.to_string(), ty })
                }
            };

            if !is_valid_name(name) {
                return Err(PatternError::InvalidName(name.to_string()));
            }
            if names.contains(&name) {
                return Err(PatternError::DuplicateParam(name.to_string()));
            }
            names.push(name);
            pieces.push(piece);
        }

        // A static segment after a wildcard is caught here.
        if let Some(pos) = pieces.iter().position(Piece::is_wildcard) {
            if pos + 1 != pieces.len() {
                if let Piece::Wildcard { name } = &pieces[pos] {
                    return Err(PatternError::WildcardNotLast(name.clone()));
                }
            }
        }

        Ok(Self { pieces })
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Whether a wildcard appears anywhere other than the final position.
    pub fn has_misplaced_wildcard(&self) -> bool {
        self.pieces
            .iter()
            .rev()
            .skip(1)
            .any(Piece::is_wildcard)
    }

    pub fn has_wildcard(&self) -> bool {
        self.pieces.iter().any(Piece::is_wildcard)
    }

    /// Match the pattern against the front of `segments`.
    ///
    /// Leftover segments are returned as `rest`. A wildcard consumes
    /// everything, so `rest` is then empty.
    pub fn match_prefix<'s>(&self, segments: &'s [String]) -> Option<PatternMatch<'s>> {
        let mut bound = Captures::new();
        let mut rest = segments;

        for piece in &self.pieces {
            match piece {
                Piece::Static(text) => {
                    let (head, tail) = rest.split_first()?;
                    if head != text {
                        return None;
                    }
                    rest = tail;
                }
                Piece::Dynamic { ty, .. } => {
                    let (head, tail) = rest.split_first()?;
                    bound.push(ty.parse(head)?);
                    rest = tail;
                }
                Piece::Wildcard { .. } => {
                    bound.push(Capture::Segments(rest.to_vec()));
                    rest = &[];
                    break;
                }
            }
        }

        Some(PatternMatch { bound, rest })
    }

    /// Match the pattern against all of `segments`.
    pub fn match_exact(&self, segments: &[String]) -> Option<Captures> {
        self.match_prefix(segments)
            .filter(|m| m.rest.is_empty())
            .map(|m| m.bound)
    }

    /// Fill the pattern with captures, yielding the path segments.
    ///
    /// Fails when the captures do not line up with the dynamic pieces or
    /// would not parse back into the same values. Empty segments never
    /// survive path splitting, so they are refused as well.
    pub fn render(&self, captures: &[Capture]) -> Option<Vec<String>> {
        let mut segments = Vec::with_capacity(self.pieces.len());
        let mut captures = captures.iter();

        for piece in &self.pieces {
            match piece {
                Piece::Static(text) => segments.push(text.clone()),
                Piece::Dynamic { ty, .. } => {
                    let capture = captures.next().filter(|c| c.is_single())?;
                    let segment = capture.to_segments().pop()?;
                    if segment.is_empty() || ty.parse(&segment).as_ref() != Some(capture) {
                        return None;
                    }
                    segments.push(segment);
                }
                Piece::Wildcard { .. } => match captures.next()? {
                    Capture::Segments(rest) if !rest.iter().any(String::is_empty) => {
                        segments.extend(rest.iter().cloned())
                    }
                    _ => return None,
                },
            }
        }

        captures.next().is_none().then_some(segments)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pieces.is_empty() {
            return f.write_str("/");
        }
        for piece in &self.pieces {
            write!(f, "/{}", piece)?;
        }
        Ok(())
    }
}

fn resolve_type(name: &str, ty: &str, custom: &[CustomParser]) -> Result<ParamType, PatternError> {
    ParamType::from_name(ty)
        .or_else(|| {
            custom
                .iter()
                .find(|p| p.name() == ty)
                .cloned()
                .map(ParamType::Custom)
        })
        .ok_or_else(|| PatternError::UnknownType {
            name: name.to_string(),
            ty: ty.to_string(),
        })
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
