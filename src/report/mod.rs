// SPDX-License-Identifier: PMPL-1.0-or-later

//! The reporter ties the localization store and the handler registry into
//! one front door: feed it a descriptor, get localized output lines back.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::handlers::{Handler, HandlerRegistry};
use crate::i18n::{ConfigTable, LocalizationStore};
use crate::types::{ErrorDescriptor, Frame};

pub struct Reporter {
    loc: LocalizationStore,
    registry: HandlerRegistry,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// A reporter with the built-in catalog and handler set, every
    /// handler's translation keys already merged.
    pub fn new() -> Self {
        let mut loc = LocalizationStore::with_builtins();
        let registry = HandlerRegistry::with_defaults();
        for handler in registry.handlers() {
            loc.merge(handler.translation_keys())
                .expect("built-in handler keys are acyclic");
        }
        Self { loc, registry }
    }

    /// Register a handler and absorb its translation keys. Rejecting a
    /// handler whose keys would corrupt the language graph leaves both the
    /// registry and the store untouched.
    pub fn register(&mut self, handler: Arc<dyn Handler>) -> Result<()> {
        self.loc
            .merge(handler.translation_keys())
            .with_context(|| format!("registering handler '{}'", handler.name()))?;
        self.registry.register(handler);
        Ok(())
    }

    /// Merge a translation table parsed from `source`. JSON is tried
    /// first, then YAML.
    pub fn load_config(&mut self, source: &str) -> Result<()> {
        let table: ConfigTable = match serde_json::from_str(source) {
            Ok(table) => table,
            Err(_) => serde_yaml::from_str(source).context("config is neither JSON nor YAML")?,
        };
        self.loc.merge(table)
    }

    /// Merge a translation table from disk, picking the parser by file
    /// extension (`.json` means JSON, anything else YAML).
    pub fn load_config_file(&mut self, path: &Path) -> Result<()> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let table: ConfigTable = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&source)
                .with_context(|| format!("parsing {} as JSON", path.display()))?
        } else {
            serde_yaml::from_str(&source)
                .with_context(|| format!("parsing {} as YAML", path.display()))?
        };
        self.loc.merge(table)
    }

    pub fn set_language(&mut self, lang: &str) {
        self.loc.set_language(lang);
    }

    pub fn language(&self) -> &str {
        self.loc.language()
    }

    pub fn localization(&self) -> &LocalizationStore {
        &self.loc
    }

    /// The interactive prompt pair, localized.
    pub fn prompts(&self) -> (String, String) {
        (
            self.loc.translate("config.prompt1"),
            self.loc.translate("config.prompt2"),
        )
    }

    /// Traceback header and frame lines, empty when no frames were
    /// captured.
    pub fn context_lines(&self, err: &ErrorDescriptor) -> Vec<String> {
        let mut lines = Vec::new();
        if !err.frames.is_empty() {
            lines.push(self.loc.translate("traceback.header"));
            for frame in &err.frames {
                lines.extend(self.frame_lines(frame));
            }
        }
        lines
    }

    /// The winning handler's lines for `err`.
    pub fn diagnosis_lines(&self, err: &ErrorDescriptor) -> Vec<String> {
        self.registry.classify_and_render(err, &self.loc)
    }

    /// Full localized output for `err`: traceback header, frames, then the
    /// winning handler's lines.
    pub fn format_lines(&self, err: &ErrorDescriptor) -> Vec<String> {
        let mut lines = self.context_lines(err);
        lines.extend(self.diagnosis_lines(err));
        lines
    }

    /// [`format_lines`](Self::format_lines), joined with newlines.
    pub fn format(&self, err: &ErrorDescriptor) -> String {
        self.format_lines(err).join("\n")
    }

    fn frame_lines(&self, frame: &Frame) -> Vec<String> {
        let lineno = frame.line.to_string();
        let location = match frame.function.as_deref() {
            Some(name) => self.loc.translate_with(
                "frame.location.with_name",
                &[("file", &frame.file), ("lineno", &lineno), ("name", name)],
            ),
            None => self.loc.translate_with(
                "frame.location.without_name",
                &[("file", &frame.file), ("lineno", &lineno)],
            ),
        };

        let mut lines = vec![location];
        if let Some(source) = frame.source_line.as_deref() {
            lines.push(
                self.loc
                    .translate_with("frame.location.linetext", &[("line", source.trim_end())]),
            );
        }
        lines
    }
}
