//! Rendering route values back into paths.

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::Pattern;
use crate::site::value::RouteValue;

/// Patterns of one tree level, keyed by resource name.
#[derive(Debug, Default)]
pub(crate) struct RenderTable {
    entries: HashMap<String, RenderEntry>,
}

#[derive(Debug)]
struct RenderEntry {
    pattern: Pattern,
    below: Below,
}

#[derive(Debug)]
enum Below {
    Leaf,
    Tree(RenderTable),
    Subsite(Arc<RenderTable>),
}

impl RenderTable {
    pub(crate) fn leaf(&mut self, name: &str, pattern: Pattern) {
        self.insert(name, pattern, Below::Leaf);
    }

    pub(crate) fn parent(&mut self, name: &str, prefix: Pattern, children: RenderTable) {
        self.insert(name, prefix, Below::Tree(children));
    }

    pub(crate) fn mount(&mut self, name: &str, prefix: Pattern, subsite: Arc<RenderTable>) {
        self.insert(name, prefix, Below::Subsite(subsite));
    }

    fn insert(&mut self, name: &str, pattern: Pattern, below: Below) {
        self.entries.insert(name.to_string(), RenderEntry { pattern, below });
    }

    /// Append the segments for `value`. `None` when the value does not fit.
    pub(crate) fn render(&self, value: &RouteValue, out: &mut Vec<String>) -> Option<()> {
        let entry = self.entries.get(value.name())?;
        out.extend(entry.pattern.render(value.captures())?);

        match (value, &entry.below) {
            (RouteValue::Resource { .. }, Below::Leaf) => Some(()),
            (RouteValue::Nested { child, .. }, Below::Tree(table)) => table.render(child, out),
            (RouteValue::Subsite { route, .. }, Below::Subsite(table)) => table.render(route, out),
            _ => None,
        }
    }
}

/// Join segments into an absolute, percent-encoded path.
pub(crate) fn join_segments(segments: &[String]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments
        .iter()
        .map(|s| format!("/{}", urlencoding::encode(s)))
        .collect()
}
