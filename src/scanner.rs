//! Resilient structure scanning
//!
//! Export schemas have wrapped the profile link in different container
//! shapes over time (`string_list_data[0].href` in one version, other nesting
//! in others). Instead of following a fixed path, the scanner walks the whole
//! JSON tree and picks up every string field keyed `"href"`, wherever it sits.
//!
//! Traversal is depth-first in document order. Depth is bounded by the limit
//! given to [`HrefScanner::new`]; containers nested deeper than the limit are
//! skipped rather than recursed into.

use serde_json::Value;
use std::ops::ControlFlow;
use tracing::debug;

/// Key whose string values are treated as profile URLs.
pub const HREF_KEY: &str = "href";

/// Default nesting limit, matching serde_json's own parser recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Depth-bounded visitor over untyped JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrefScanner {
    max_depth: usize,
}

impl Default for HrefScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl HrefScanner {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// First non-blank `href` string found depth-first, if any.
    pub fn find_first<'a>(&self, value: &'a Value) -> Option<&'a str> {
        let mut found = None;
        let _ = self.visit(value, 0, &mut |href| {
            found = Some(href);
            ControlFlow::Break(())
        });
        found
    }

    /// Every non-blank `href` string, in first-visited order.
    pub fn collect_all<'a>(&self, value: &'a Value) -> Vec<&'a str> {
        let mut hrefs = Vec::new();
        let _ = self.visit(value, 0, &mut |href| {
            hrefs.push(href);
            ControlFlow::Continue(())
        });
        hrefs
    }

    fn visit<'a, F>(&self, value: &'a Value, depth: usize, on_href: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&'a str) -> ControlFlow<()>,
    {
        match value {
            Value::Object(map) => {
                if self.too_deep(depth) {
                    return ControlFlow::Continue(());
                }
                for (key, child) in map {
                    if key == HREF_KEY {
                        // whitespace-only values count as absent, same as empty ones
                        if let Value::String(href) = child {
                            if !href.trim().is_empty() {
                                on_href(href.as_str())?;
                            }
                        }
                    }
                    if child.is_object() || child.is_array() {
                        self.visit(child, depth + 1, on_href)?;
                    }
                }
            }
            Value::Array(items) => {
                if self.too_deep(depth) {
                    return ControlFlow::Continue(());
                }
                for item in items {
                    self.visit(item, depth + 1, on_href)?;
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn too_deep(&self, depth: usize) -> bool {
        if depth >= self.max_depth {
            debug!(depth, max_depth = self.max_depth, "Skipping subtree beyond scan depth limit");
            return true;
        }
        false
    }
}

/// First `href` string anywhere in `value`, using the default depth limit.
pub fn find_first_href(value: &Value) -> Option<&str> {
    HrefScanner::default().find_first(value)
}

/// All `href` strings anywhere in `value`, using the default depth limit.
pub fn collect_all_hrefs(value: &Value) -> Vec<&str> {
    HrefScanner::default().collect_all(value)
}
