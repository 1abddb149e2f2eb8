// SPDX-License-Identifier: PMPL-1.0-or-later

//! Built-in translation catalog.
//!
//! The root language `"default"` carries every key the core renderer needs;
//! other built-in languages extend it and override what they translate.
//! Handlers contribute their own `native.*` / `exthandler.*` keys at
//! registration time, so this file only holds the frame/prompt/anchor
//! vocabulary.
//!
//! ## Adding a built-in language
//!
//! 1. Add a `const XX: &[(&str, &str)]` table below, including an
//!    `("extend", <parent>)` pair unless the parent is `"default"`
//! 2. Add it to the language list in [`builtin_table`]
//!
//! A value of `"@inherit"` defers the key to the parent language even when
//! the child lists it.

use crate::i18n::store::{ConfigTable, DEFAULT_LANG, EXTEND_KEY, INHERIT_SENTINEL};

/// Root language. Every key must resolve here; a key missing from this
/// table is missing system-wide.
const DEFAULT: &[(&str, &str)] = &[
    ("traceback.header", "Traceback (most recent call last):"),
    (
        "frame.location.with_name",
        "  File \"{file}\", line {lineno}, in {name}",
    ),
    ("frame.location.without_name", "  File \"{file}\", line {lineno}"),
    ("frame.location.linetext", "    {line}"),
    ("exc.final", "{kind}: {message}"),
    ("exc.final.nomsg", "{kind}"),
    ("config.prompt1", ">>> "),
    ("config.prompt2", "... "),
    ("config.anchor.primary", "~"),
    ("config.anchor.secondary", "^"),
    ("config.anchor.suffix", ""),
    (
        "handler.failed",
        "(diagnostic handler '{handler}' failed; showing the plain summary)",
    ),
];

/// American English: everything reads fine from the root already.
const EN_US: &[(&str, &str)] = &[];

const ZH_HANS: &[(&str, &str)] = &[
    ("traceback.header", "回溯 (最近的调用在最后):"),
    (
        "frame.location.with_name",
        "  文件 \"{file}\", 第 {lineno} 行, 位于 {name}",
    ),
    ("frame.location.without_name", "  文件 \"{file}\", 第 {lineno} 行"),
    (
        "handler.failed",
        "(诊断处理器 '{handler}' 出错, 改用基础摘要)",
    ),
    // Prompts deliberately defer to the parent.
    ("config.prompt1", INHERIT_SENTINEL),
    ("config.prompt2", INHERIT_SENTINEL),
];

/// The built-in catalog as a mergeable table. Languages other than the
/// root implicitly extend `"default"` unless they carry an `"extend"` pair.
pub fn builtin_table() -> ConfigTable {
    let mut table = ConfigTable::default();
    for (lang, entries) in [(DEFAULT_LANG, DEFAULT), ("en_us", EN_US), ("zh_hans", ZH_HANS)] {
        let keys = table.translate_keys.entry(lang.to_string()).or_default();
        for (key, value) in entries {
            debug_assert_ne!(*key, EXTEND_KEY);
            keys.insert((*key).to_string(), (*value).to_string());
        }
    }
    table.default_lang = Some(DEFAULT_LANG.to_string());
    table
}
