// SPDX-License-Identifier: PMPL-1.0-or-later

//! gentle-panic: localized, pluggable rendering of runtime error reports.
//!
//! The host environment normalizes whatever went wrong into an
//! [`ErrorDescriptor`]; a priority-ordered registry of [`Handler`]s picks
//! the most specific renderer for it; every string the renderer emits comes
//! from a hierarchical translation store, so whole reports can be swapped
//! into another language with a config file.

pub mod distance;
pub mod handlers;
pub mod i18n;
pub mod report;
pub mod suggest;
pub mod types;

pub use handlers::{Handler, HandlerRegistry};
pub use i18n::{ConfigTable, LocalizationStore};
pub use report::Reporter;
pub use types::{Candidate, ErrorDescriptor, Frame};
