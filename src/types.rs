// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for gentle-panic.
//!
//! The crate operates on a normalized [`ErrorDescriptor`] produced by the
//! host environment. Stack walking, AST inspection, and package-membership
//! lookups all happen on the other side of this boundary: whatever a handler
//! needs beyond the kind tag and message arrives pre-computed in
//! `attributes` or `candidates`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One normalized stack frame, outermost first in [`ErrorDescriptor::frames`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

/// One entry of a suggestion pool, tagged with caller-supplied capability
/// strings ("callable", "module", "private", ...). The suggestion engine
/// treats tags as opaque partition labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
        }
    }

    pub fn tagged(name: impl Into<String>, tags: &[&str]) -> Self {
        Self {
            name: name.into(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    /// Whether this candidate belongs to the partition described by
    /// `context` (it must carry every requested tag). An empty context
    /// matches everything.
    pub fn in_partition(&self, context: &[String]) -> bool {
        context.iter().all(|tag| self.tags.iter().any(|t| t == tag))
    }
}

/// A normalized error descriptor, owned entirely by the host environment.
/// The core never mutates one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Discriminated kind tag ("ImportError", "NameError", "SyntaxError",
    /// "StopIteration", ...). Open set; unrecognized kinds land on the base
    /// catch-all handler.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Kind-specific payload: offending identifier, syntax fault location,
    /// generator name and return value, library-membership flags, the
    /// capability context for suggestions.
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
    /// Call stack at the point of the error, outermost first.
    #[serde(default)]
    pub frames: Vec<Frame>,
    /// Suggestion pool for did-you-mean handlers.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl ErrorDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: None,
            attributes: HashMap::new(),
            frames: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// String attribute, if present and actually a string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attributes.get(key).and_then(|v| v.as_u64())
    }

    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attributes.get(key).and_then(|v| v.as_bool())
    }

    /// Attribute rendered for display inside a localized template.
    pub fn attr_display(&self, key: &str) -> Option<String> {
        self.attributes.get(key).map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// The capability context a handler should restrict suggestion pools
    /// to, decided by whoever built the descriptor. Absent or malformed
    /// means "no restriction".
    pub fn capability_context(&self) -> Vec<String> {
        self.attributes
            .get("capabilities")
            .and_then(|v| v.as_array())
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
