//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path or absolute URL, method)
//!     → request.rs (split + decode into PathRequest)
//!     → dispatch.rs (walk siblings in declaration order)
//!     → pattern.rs (match pieces against segments, bind captures)
//!     → subsite.rs (hand the rest to a mounted sub-site)
//!     → Return: route value, method rejection, or NotFound
//!
//! Tree construction (at startup):
//!     Leaf / Parent / Mount nodes
//!     → tree.rs (validate names and wildcard placement)
//!     → Freeze as immutable RouteTree
//! ```
//!
//! # Design Decisions
//! - Trees are built once, immutable at runtime, shared without locks
//! - No regex in the hot path (equality tests and typed parses only)
//! - Deterministic: same input always yields the same outcome
//! - First match wins (declaration order, no priorities)

pub mod dispatch;
pub mod pattern;
pub mod piece;
pub mod request;
pub mod subsite;
pub mod tree;

pub use dispatch::Dispatch;
pub use pattern::{Pattern, PatternError, PatternMatch};
pub use piece::{Capture, Captures, CustomParser, ParamType, Piece};
pub use request::{split_path, PathRequest};
pub use subsite::{subsite_fn, Subsite, SubsiteFn};
pub use tree::{Leaf, Mount, Parent, RouteNode, RouteTree, TreeError};
