// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error handler trait and the priority-ordered registry.
//!
//! Handlers are consulted from highest priority downward; the first one
//! claiming an error wins, ties going to whichever registered first. The
//! base catch-all sits at priority 0.0, so dispatch always lands somewhere.
//!
//! Rendering is fenced: a handler that panics mid-render costs us its
//! enriched output, never the diagnostic itself.

pub mod defaults;

use crate::i18n::{ConfigTable, LocalizationStore};
use crate::types::ErrorDescriptor;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A diagnostic renderer for some family of error kinds.
///
/// `render` returns a fresh iterator of output lines; implementations must
/// be restartable, with every call observing the descriptor anew.
pub trait Handler: Send + Sync {
    /// Stable name, used in degradation notices.
    fn name(&self) -> &'static str;

    /// Dispatch priority. Built-ins claim [1.0, 1.1]; third parties pick
    /// (0, 1) to yield to built-ins or 2.0 and up to preempt them.
    fn priority(&self) -> f64;

    /// Whether this handler claims `err`.
    fn can_handle(&self, err: &ErrorDescriptor) -> bool;

    /// Lines to print after the stack frames.
    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a>;

    /// Translation keys this handler brings along, merged into the store
    /// at registration time.
    fn translation_keys(&self) -> ConfigTable {
        ConfigTable::default()
    }
}

/// Registry of handlers in registration order.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in handler set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for handler in defaults::builtin_handlers() {
            registry.register(handler);
        }
        registry
    }

    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    pub fn handlers(&self) -> &[Arc<dyn Handler>] {
        &self.handlers
    }

    /// The highest-priority handler claiming `err`; ties resolve to the
    /// earliest registration.
    pub fn select(&self, err: &ErrorDescriptor) -> Option<&Arc<dyn Handler>> {
        let mut best: Option<&Arc<dyn Handler>> = None;
        for handler in &self.handlers {
            if !handler.can_handle(err) {
                continue;
            }
            match best {
                Some(current) if handler.priority() <= current.priority() => {}
                _ => best = Some(handler),
            }
        }
        best
    }

    /// Dispatch `err` and collect the winning handler's output.
    ///
    /// A panic inside `render` downgrades to the plain one-line summary
    /// plus a localized notice naming the failed handler.
    pub fn classify_and_render(
        &self,
        err: &ErrorDescriptor,
        loc: &LocalizationStore,
    ) -> Vec<String> {
        let Some(handler) = self.select(err) else {
            return vec![defaults::plain_summary(err, loc)];
        };

        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.render(err, loc).collect::<Vec<String>>()
        }));

        match rendered {
            Ok(lines) if !lines.is_empty() => lines,
            Ok(_) => vec![defaults::plain_summary(err, loc)],
            Err(_) => {
                eprintln!("warning: handler '{}' panicked while rendering", handler.name());
                vec![
                    loc.translate_with("handler.failed", &[("handler", handler.name())]),
                    defaults::plain_summary(err, loc),
                ]
            }
        }
    }
}
