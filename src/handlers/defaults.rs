// SPDX-License-Identifier: PMPL-1.0-or-later

//! Built-in handlers.
//!
//! Priorities: the base catch-all sits at 0.0, kind-specific refinements at
//! 1.0 with the suggestion-bearing ones at 1.1, and the PyYAML hint at 4.0
//! so it preempts the generic import refinement.
//!
//! Every handler here renders the final `Kind: message` line itself and
//! appends its hints after it; stack frames are the reporter's business.

use crate::i18n::{ConfigTable, LocalizationStore};
use crate::suggest::{suggest, suggest_all};
use crate::types::ErrorDescriptor;
use std::sync::Arc;

use super::Handler;

/// All built-in handlers in registration order.
pub fn builtin_handlers() -> Vec<Arc<dyn Handler>> {
    vec![
        Arc::new(BaseHandler),
        Arc::new(SyntaxErrorHandler),
        Arc::new(StopIterationHandler),
        Arc::new(StopAsyncIterationHandler),
        Arc::new(OverflowErrorHandler),
        Arc::new(ImportErrorHandler),
        Arc::new(NameAttributeErrorHandler),
        Arc::new(PyyamlImportErrorHandler),
    ]
}

/// The one-line `Kind: message` summary every rendering degrades to.
pub fn plain_summary(err: &ErrorDescriptor, loc: &LocalizationStore) -> String {
    match err.message.as_deref() {
        Some(message) if !message.is_empty() => {
            loc.translate_with("exc.final", &[("kind", &err.kind), ("message", message)])
        }
        _ => loc.translate_with("exc.final.nomsg", &[("kind", &err.kind)]),
    }
}

fn keys(langs: &[(&str, &[(&str, &str)])]) -> ConfigTable {
    let mut table = ConfigTable::default();
    for (lang, entries) in langs {
        let map = table.translate_keys.entry((*lang).to_string()).or_default();
        for (key, value) in *entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
    }
    table
}

/// Shared did-you-mean vocabulary for the suggestion-bearing handlers.
fn suggestion_keys() -> &'static [(&'static str, &'static [(&'static str, &'static str)])] {
    &[
        (
            "default",
            &[
                ("native.suggest.didyoumean", "Did you mean '{suggestion}'?"),
                ("native.suggest.ambiguous", "Did you mean one of: {names}?"),
            ],
        ),
        (
            "zh_hans",
            &[
                ("native.suggest.didyoumean", "你是不是想用 '{suggestion}'?"),
                ("native.suggest.ambiguous", "你是不是想用其中之一: {names}?"),
            ],
        ),
    ]
}

/// The offending identifier. `wrong_name` is the contract key; `name` is
/// accepted as a legacy alias.
fn wrong_name(err: &ErrorDescriptor) -> Option<&str> {
    err.attr_str("wrong_name").or_else(|| err.attr_str("name"))
}

/// Hint line for a misspelled name, if the candidate pool offers one.
/// Unique best match names it; a tie lists the tied names instead.
fn suggestion_line(err: &ErrorDescriptor, loc: &LocalizationStore) -> Option<String> {
    let wrong = wrong_name(err)?;
    let context = err.capability_context();
    if let Some(hit) = suggest(wrong, &err.candidates, &context) {
        return Some(loc.translate_with("native.suggest.didyoumean", &[("suggestion", &hit)]));
    }
    let tied = suggest_all(wrong, &err.candidates, &context);
    if tied.len() > 1 {
        return Some(loc.translate_with("native.suggest.ambiguous", &[("names", &tied.join(", "))]));
    }
    None
}

/// Catch-all. Claims everything at the lowest possible priority.
pub struct BaseHandler;

impl Handler for BaseHandler {
    fn name(&self) -> &'static str {
        "base"
    }

    fn priority(&self) -> f64 {
        0.0
    }

    fn can_handle(&self, _err: &ErrorDescriptor) -> bool {
        true
    }

    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(std::iter::once(plain_summary(err, loc)))
    }
}

/// Syntax faults carry their own location in attributes (`filename`,
/// `lineno`, `offset`, `end_offset`, `text`) since no frame reaches the
/// faulty line. Offsets are 1-based columns.
pub struct SyntaxErrorHandler;

impl Handler for SyntaxErrorHandler {
    fn name(&self) -> &'static str {
        "syntax"
    }

    fn priority(&self) -> f64 {
        1.0
    }

    fn can_handle(&self, err: &ErrorDescriptor) -> bool {
        matches!(err.kind.as_str(), "SyntaxError" | "IndentationError" | "TabError")
    }

    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let mut lines = Vec::new();

        if let (Some(file), Some(lineno)) = (err.attr_str("filename"), err.attr_u64("lineno")) {
            lines.push(loc.translate_with(
                "frame.location.without_name",
                &[("file", file), ("lineno", &lineno.to_string())],
            ));
        }
        if let Some(text) = err.attr_str("text") {
            let trimmed = text.trim_end();
            lines.push(loc.translate_with("frame.location.linetext", &[("line", trimmed)]));
            if let Some(offset) = err.attr_u64("offset") {
                let start = offset.saturating_sub(1) as usize;
                let end = err
                    .attr_u64("end_offset")
                    .map(|e| e.saturating_sub(1) as usize)
                    .unwrap_or(start + 1)
                    .max(start + 1)
                    .min(trimmed.chars().count().max(start + 1));
                // linetext indents by four; the underline must line up.
                lines.push(loc.anchors(4 + start, 0, 0, end - start, end - start));
            }
        }

        lines.push(plain_summary(err, loc));
        Box::new(lines.into_iter())
    }
}

/// Exhausted generators, with the return value when one was captured.
pub struct StopIterationHandler;

impl Handler for StopIterationHandler {
    fn name(&self) -> &'static str {
        "stop-iteration"
    }

    fn priority(&self) -> f64 {
        1.0
    }

    fn can_handle(&self, err: &ErrorDescriptor) -> bool {
        err.kind == "StopIteration"
    }

    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let mut lines = vec![plain_summary(err, loc)];
        if let Some(name) = err.attr_str("generator") {
            lines.push(loc.translate_with("native.stopiteration.generator", &[("name", name)]));
        }
        if let Some(value) = err.attr_display("return_value") {
            lines.push(loc.translate_with("native.stopiteration.returned", &[("value", &value)]));
        }
        Box::new(lines.into_iter())
    }

    fn translation_keys(&self) -> ConfigTable {
        keys(&[
            (
                "default",
                &[
                    (
                        "native.stopiteration.generator",
                        "The generator '{name}' has no more values.",
                    ),
                    ("native.stopiteration.returned", "It returned {value}."),
                ],
            ),
            (
                "zh_hans",
                &[
                    ("native.stopiteration.generator", "生成器 '{name}' 没有更多的值了。"),
                    ("native.stopiteration.returned", "它返回了 {value}。"),
                ],
            ),
        ])
    }
}

pub struct StopAsyncIterationHandler;

impl Handler for StopAsyncIterationHandler {
    fn name(&self) -> &'static str {
        "stop-async-iteration"
    }

    fn priority(&self) -> f64 {
        1.0
    }

    fn can_handle(&self, err: &ErrorDescriptor) -> bool {
        err.kind == "StopAsyncIteration"
    }

    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let mut lines = vec![plain_summary(err, loc)];
        if let Some(name) = err.attr_str("generator") {
            lines.push(
                loc.translate_with("native.stopasynciteration.generator", &[("name", name)]),
            );
        }
        Box::new(lines.into_iter())
    }

    fn translation_keys(&self) -> ConfigTable {
        keys(&[
            (
                "default",
                &[(
                    "native.stopasynciteration.generator",
                    "The async generator '{name}' has no more values.",
                )],
            ),
            (
                "zh_hans",
                &[(
                    "native.stopasynciteration.generator",
                    "异步生成器 '{name}' 没有更多的值了。",
                )],
            ),
        ])
    }
}

/// Translates the C library's terse "math range error" into something a
/// person can act on. Other overflow messages pass through untouched.
pub struct OverflowErrorHandler;

impl Handler for OverflowErrorHandler {
    fn name(&self) -> &'static str {
        "overflow"
    }

    fn priority(&self) -> f64 {
        1.0
    }

    fn can_handle(&self, err: &ErrorDescriptor) -> bool {
        err.kind == "OverflowError"
    }

    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let mut lines = vec![plain_summary(err, loc)];
        if err.message.as_deref() == Some("math range error") {
            lines.push(loc.translate("native.overflow.range"));
        }
        Box::new(lines.into_iter())
    }

    fn translation_keys(&self) -> ConfigTable {
        keys(&[
            (
                "default",
                &[(
                    "native.overflow.range",
                    "The result is too large for the machine to represent.",
                )],
            ),
            (
                "zh_hans",
                &[("native.overflow.range", "计算结果太大, 机器无法表示。")],
            ),
        ])
    }
}

/// Failed imports, with a did-you-mean over the known-module pool.
pub struct ImportErrorHandler;

impl Handler for ImportErrorHandler {
    fn name(&self) -> &'static str {
        "import"
    }

    fn priority(&self) -> f64 {
        1.1
    }

    fn can_handle(&self, err: &ErrorDescriptor) -> bool {
        matches!(err.kind.as_str(), "ImportError" | "ModuleNotFoundError")
    }

    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let mut lines = vec![plain_summary(err, loc)];
        lines.extend(suggestion_line(err, loc));
        Box::new(lines.into_iter())
    }

    fn translation_keys(&self) -> ConfigTable {
        keys(suggestion_keys())
    }
}

/// Misspelled names and attributes. Beyond the did-you-mean, a name that
/// matches an importable library (the host sets `is_library`) gets a
/// forgot-to-import hint.
pub struct NameAttributeErrorHandler;

impl Handler for NameAttributeErrorHandler {
    fn name(&self) -> &'static str {
        "name-attribute"
    }

    fn priority(&self) -> f64 {
        1.1
    }

    fn can_handle(&self, err: &ErrorDescriptor) -> bool {
        matches!(err.kind.as_str(), "NameError" | "AttributeError")
    }

    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let mut lines = vec![plain_summary(err, loc)];
        let hint = suggestion_line(err, loc);
        let suggested = hint.is_some();
        lines.extend(hint);
        // A library name gets the import hint even alongside a typo
        // suggestion, with "or ..." wording in that case.
        if err.kind == "NameError" && err.attr_bool("is_library").unwrap_or(false) {
            if let Some(name) = wrong_name(err) {
                let key = if suggested {
                    "native.name.or_forgetimport"
                } else {
                    "native.name.forgetimport"
                };
                lines.push(loc.translate_with(key, &[("name", name)]));
            }
        }
        Box::new(lines.into_iter())
    }

    fn translation_keys(&self) -> ConfigTable {
        let mut table = keys(suggestion_keys());
        let more = keys(&[
            (
                "default",
                &[
                    ("native.name.forgetimport", "Did you forget to import '{name}'?"),
                    (
                        "native.name.or_forgetimport",
                        "Or did you forget to import '{name}'?",
                    ),
                ],
            ),
            (
                "zh_hans",
                &[
                    ("native.name.forgetimport", "你是否忘记了导入 '{name}'?"),
                    ("native.name.or_forgetimport", "或者你是否忘记了导入 '{name}'?"),
                ],
            ),
        ]);
        for (lang, entries) in more.translate_keys {
            table.translate_keys.entry(lang).or_default().extend(entries);
        }
        table
    }
}

/// The `import pyyaml` stumble: the package installs as `pyyaml` but the
/// module it provides is named `yaml`. High priority so it outranks the
/// generic import handler.
pub struct PyyamlImportErrorHandler;

impl Handler for PyyamlImportErrorHandler {
    fn name(&self) -> &'static str {
        "pyyaml-import"
    }

    fn priority(&self) -> f64 {
        4.0
    }

    fn can_handle(&self, err: &ErrorDescriptor) -> bool {
        matches!(err.kind.as_str(), "ImportError" | "ModuleNotFoundError")
            && wrong_name(err) == Some("pyyaml")
    }

    fn render<'a>(
        &self,
        err: &'a ErrorDescriptor,
        loc: &'a LocalizationStore,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(
            vec![
                plain_summary(err, loc),
                loc.translate("exthandler.pyyaml.hint"),
                loc.translate("exthandler.pyyaml.install"),
            ]
            .into_iter(),
        )
    }

    fn translation_keys(&self) -> ConfigTable {
        keys(&[
            (
                "default",
                &[
                    (
                        "exthandler.pyyaml.hint",
                        "You may have installed the 'pyyaml' package, but you should \
                         import 'yaml' instead of 'pyyaml'.",
                    ),
                    (
                        "exthandler.pyyaml.install",
                        "Install it with pip install pyyaml, then write: import yaml",
                    ),
                ],
            ),
            (
                "zh_hans",
                &[
                    (
                        "exthandler.pyyaml.hint",
                        "你可能已经安装了 pyyaml 包, 但导入时应该使用 'yaml' 而不是 'pyyaml'。",
                    ),
                    (
                        "exthandler.pyyaml.install",
                        "使用 pip install pyyaml 安装, 然后在代码中写: import yaml",
                    ),
                ],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candidate;
    use serde_json::json;

    fn store_with_handler_keys() -> LocalizationStore {
        let mut loc = LocalizationStore::with_builtins();
        for handler in builtin_handlers() {
            loc.merge(handler.translation_keys()).unwrap();
        }
        loc
    }

    #[test]
    fn base_renders_the_plain_summary() {
        let loc = LocalizationStore::with_builtins();
        let err = ErrorDescriptor::new("ValueError").with_message("bad literal");
        let lines: Vec<String> = BaseHandler.render(&err, &loc).collect();
        assert_eq!(lines, vec!["ValueError: bad literal"]);
    }

    #[test]
    fn base_omits_the_colon_without_a_message() {
        let loc = LocalizationStore::with_builtins();
        let err = ErrorDescriptor::new("KeyboardInterrupt");
        let lines: Vec<String> = BaseHandler.render(&err, &loc).collect();
        assert_eq!(lines, vec!["KeyboardInterrupt"]);
    }

    #[test]
    fn syntax_handler_underlines_the_fault() {
        let loc = LocalizationStore::with_builtins();
        let err = ErrorDescriptor::new("SyntaxError")
            .with_message("invalid syntax")
            .with_attr("filename", "bad.py")
            .with_attr("lineno", 3)
            .with_attr("text", "if x =  1:\n")
            .with_attr("offset", 6)
            .with_attr("end_offset", 7);
        let lines: Vec<String> = SyntaxErrorHandler.render(&err, &loc).collect();
        assert_eq!(
            lines,
            vec![
                "  File \"bad.py\", line 3".to_string(),
                "    if x =  1:".to_string(),
                "         ^".to_string(),
                "SyntaxError: invalid syntax".to_string(),
            ]
        );
    }

    #[test]
    fn name_error_gets_a_suggestion() {
        let loc = store_with_handler_keys();
        let err = ErrorDescriptor::new("NameError")
            .with_message("name 'conter' is not defined")
            .with_attr("wrong_name", "conter")
            .with_candidates(vec![Candidate::new("counter"), Candidate::new("total")]);
        let lines: Vec<String> = NameAttributeErrorHandler.render(&err, &loc).collect();
        assert_eq!(lines[1], "Did you mean 'counter'?");
    }

    #[test]
    fn legacy_name_attribute_still_yields_a_suggestion() {
        let loc = store_with_handler_keys();
        let err = ErrorDescriptor::new("NameError")
            .with_message("name 'conter' is not defined")
            .with_attr("name", "conter")
            .with_candidates(vec![Candidate::new("counter")]);
        let lines: Vec<String> = NameAttributeErrorHandler.render(&err, &loc).collect();
        assert_eq!(lines[1], "Did you mean 'counter'?");
    }

    #[test]
    fn library_name_without_close_match_hints_at_import() {
        let loc = store_with_handler_keys();
        let err = ErrorDescriptor::new("NameError")
            .with_message("name 'math' is not defined")
            .with_attr("wrong_name", "math")
            .with_attr("is_library", true);
        let lines: Vec<String> = NameAttributeErrorHandler.render(&err, &loc).collect();
        assert_eq!(lines[1], "Did you forget to import 'math'?");
    }

    #[test]
    fn library_name_with_close_match_gets_both_hints() {
        let loc = store_with_handler_keys();
        let err = ErrorDescriptor::new("NameError")
            .with_message("name 'maths' is not defined")
            .with_attr("wrong_name", "maths")
            .with_attr("is_library", true)
            .with_candidates(vec![Candidate::new("math")]);
        let lines: Vec<String> = NameAttributeErrorHandler.render(&err, &loc).collect();
        assert_eq!(
            lines,
            vec![
                "NameError: name 'maths' is not defined".to_string(),
                "Did you mean 'math'?".to_string(),
                "Or did you forget to import 'maths'?".to_string(),
            ]
        );
    }

    #[test]
    fn capability_context_narrows_attribute_suggestions() {
        let loc = store_with_handler_keys();
        let err = ErrorDescriptor::new("AttributeError")
            .with_message("module 'math' has no attribute 'sqr'")
            .with_attr("wrong_name", "sqr")
            .with_attr("capabilities", json!(["callable"]))
            .with_candidates(vec![
                Candidate::tagged("sqrt", &["callable"]),
                Candidate::tagged("sqr2", &["constant"]),
            ]);
        let lines: Vec<String> = NameAttributeErrorHandler.render(&err, &loc).collect();
        assert_eq!(lines[1], "Did you mean 'sqrt'?");
    }

    #[test]
    fn stop_iteration_reports_the_return_value() {
        let loc = store_with_handler_keys();
        let err = ErrorDescriptor::new("StopIteration")
            .with_attr("generator", "countdown")
            .with_attr("return_value", 42);
        let lines: Vec<String> = StopIterationHandler.render(&err, &loc).collect();
        assert_eq!(
            lines,
            vec![
                "StopIteration".to_string(),
                "The generator 'countdown' has no more values.".to_string(),
                "It returned 42.".to_string(),
            ]
        );
    }

    #[test]
    fn overflow_translates_math_range_error() {
        let loc = store_with_handler_keys();
        let err = ErrorDescriptor::new("OverflowError").with_message("math range error");
        let lines: Vec<String> = OverflowErrorHandler.render(&err, &loc).collect();
        assert_eq!(lines[1], "The result is too large for the machine to represent.");
    }

    #[test]
    fn pyyaml_hint_outranks_generic_import() {
        use crate::handlers::HandlerRegistry;
        let registry = HandlerRegistry::with_defaults();
        let err = ErrorDescriptor::new("ModuleNotFoundError")
            .with_message("No module named 'pyyaml'")
            .with_attr("wrong_name", "pyyaml");
        assert_eq!(registry.select(&err).unwrap().name(), "pyyaml-import");
    }

    #[test]
    fn pyyaml_handler_advises_importing_yaml() {
        let loc = store_with_handler_keys();
        let err = ErrorDescriptor::new("ModuleNotFoundError")
            .with_message("No module named 'pyyaml'")
            .with_attr("wrong_name", "pyyaml");
        let lines: Vec<String> = PyyamlImportErrorHandler.render(&err, &loc).collect();
        assert!(
            lines[1].contains("import 'yaml' instead of 'pyyaml'"),
            "hint should redirect to the yaml module, got: {}",
            lines[1]
        );
        assert!(lines[2].contains("pip install pyyaml"));
    }
}
