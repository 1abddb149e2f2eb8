// SPDX-License-Identifier: PMPL-1.0-or-later

//! Localization: built-in catalog plus the hierarchical store.

pub mod catalog;
pub mod store;

pub use store::{ConfigTable, LocalizationStore, DEFAULT_LANG, INHERIT_SENTINEL, MAX_EXTEND_DEPTH};
