// SPDX-License-Identifier: PMPL-1.0-or-later

//! Hierarchical localization store.
//!
//! Languages form an inheritance tree rooted at `"default"`: a lookup that
//! misses in the active language walks parent links until it finds a value
//! or runs out of ancestors. Configuration tables merge key-by-key, so a
//! translation pack may override three strings and inherit the rest.
//!
//! Merging is atomic. A table that would introduce an inheritance cycle is
//! rejected whole and the store keeps its previous state.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root of the inheritance tree. Always present, never extends anything.
pub const DEFAULT_LANG: &str = "default";

/// Reserved key inside a language table naming its parent.
pub const EXTEND_KEY: &str = "extend";

/// Value marking a key as explicitly deferred to the parent language.
pub const INHERIT_SENTINEL: &str = "@inherit";

/// Hard ceiling on parent-chain hops during a single resolve. The chain is
/// acyclic after merge validation, so hitting this means a pathologically
/// deep pack rather than a loop.
pub const MAX_EXTEND_DEPTH: usize = 10;

/// Wire format of a translation config, deserialized from JSON or YAML.
///
/// ```yaml
/// default_lang: pt_br
/// translate_keys:
///   pt_br:
///     extend: default
///     traceback.header: "Rastreamento (chamada mais recente por último):"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigTable {
    #[serde(default)]
    pub translate_keys: HashMap<String, HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_lang: Option<String>,
}

/// One resolved translation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Text(String),
    /// Defer to the parent even though the key is listed here.
    Inherit,
}

#[derive(Debug, Clone, Default)]
struct LanguageNode {
    /// Parent language; `None` only for the root.
    extends: Option<String>,
    entries: HashMap<String, Entry>,
}

/// The merged, validated translation state plus the active language.
#[derive(Debug, Clone)]
pub struct LocalizationStore {
    languages: HashMap<String, LanguageNode>,
    active: String,
}

impl Default for LocalizationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalizationStore {
    /// An empty store: just the root language with no entries.
    pub fn new() -> Self {
        let mut languages = HashMap::new();
        languages.insert(DEFAULT_LANG.to_string(), LanguageNode::default());
        Self {
            languages,
            active: DEFAULT_LANG.to_string(),
        }
    }

    /// A store seeded with the built-in catalog.
    pub fn with_builtins() -> Self {
        let mut store = Self::new();
        store
            .merge(super::catalog::builtin_table())
            .expect("built-in catalog is acyclic");
        store
    }

    pub fn language(&self) -> &str {
        &self.active
    }

    /// Switch the active language. Unknown languages fall back to the root
    /// with a warning rather than failing: a missing translation pack
    /// should never stop error reporting.
    pub fn set_language(&mut self, lang: &str) {
        if self.languages.contains_key(lang) {
            self.active = lang.to_string();
        } else {
            eprintln!("warning: unknown language '{lang}', falling back to '{DEFAULT_LANG}'");
            self.active = DEFAULT_LANG.to_string();
        }
    }

    /// Merge a configuration table into the store, last write winning
    /// key-by-key. The whole table is validated against a scratch copy
    /// first; on a cycle nothing is applied.
    pub fn merge(&mut self, table: ConfigTable) -> Result<()> {
        let mut staged = self.languages.clone();

        for (lang, keys) in &table.translate_keys {
            let node = staged.entry(lang.clone()).or_default();
            for (key, value) in keys {
                if key == EXTEND_KEY {
                    if lang != DEFAULT_LANG {
                        node.extends = Some(value.clone());
                    }
                    continue;
                }
                let entry = if value == INHERIT_SENTINEL {
                    Entry::Inherit
                } else {
                    Entry::Text(value.clone())
                };
                node.entries.insert(key.clone(), entry);
            }
            if lang != DEFAULT_LANG && node.extends.is_none() {
                node.extends = Some(DEFAULT_LANG.to_string());
            }
        }

        // Parents named but never defined get rewritten to the root so the
        // chain stays walkable.
        let known: Vec<String> = staged.keys().cloned().collect();
        for lang in &known {
            let Some(parent) = staged[lang].extends.clone() else {
                continue;
            };
            if !staged.contains_key(&parent) {
                eprintln!(
                    "warning: language '{lang}' extends unknown language '{parent}', \
                     falling back to '{DEFAULT_LANG}'"
                );
                staged.get_mut(lang).unwrap().extends = Some(DEFAULT_LANG.to_string());
            }
        }

        validate_acyclic(&staged)?;
        self.languages = staged;

        if let Some(lang) = table.default_lang {
            self.set_language(&lang);
        }
        Ok(())
    }

    /// Look up `key` starting from the active language, walking parent
    /// links past misses and explicit inherit markers.
    ///
    /// Missing keys resolve to a visible placeholder instead of an error;
    /// a broken translation must not suppress the diagnostic it decorates.
    pub fn resolve(&self, key: &str) -> String {
        let mut lang = self.active.as_str();
        for _ in 0..=MAX_EXTEND_DEPTH {
            let Some(node) = self.languages.get(lang) else {
                eprintln!("warning: unknown language '{lang}' while resolving '{key}'");
                lang = DEFAULT_LANG;
                continue;
            };
            match node.entries.get(key) {
                Some(Entry::Text(text)) => return text.clone(),
                Some(Entry::Inherit) | None => {}
            }
            match &node.extends {
                Some(parent) => lang = parent,
                None => {
                    eprintln!("warning: unknown translate key '{key}'");
                    return format!("<unknown translate key: {key}>");
                }
            }
        }
        eprintln!("warning: exceeded max extend depth resolving '{key}'");
        format!("<exceeded max extend depth for key: {key}>")
    }

    /// Resolve `key` and substitute `{name}` placeholders from `args`.
    /// Placeholders with no matching argument pass through verbatim.
    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.resolve(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    /// Resolve `key` with no placeholder substitution.
    pub fn translate(&self, key: &str) -> String {
        self.resolve(key)
    }

    /// Build an anchor underline: `indent` spaces, then the primary glyph
    /// under `[left_start, left_end)`, the secondary glyph under
    /// `[left_end, right_start)`, the primary again under
    /// `[right_start, right_end)`, then the configured suffix.
    ///
    /// `anchors(2, 0, 0, 3, 3)` with the default glyphs is `"  ^^^"` and
    /// `anchors(0, 0, 2, 4, 6)` is `"~~^^~~"`.
    pub fn anchors(
        &self,
        indent: usize,
        left_start: usize,
        left_end: usize,
        right_start: usize,
        right_end: usize,
    ) -> String {
        let primary = self.resolve("config.anchor.primary");
        let secondary = self.resolve("config.anchor.secondary");
        let suffix = self.resolve("config.anchor.suffix");

        let mut out = " ".repeat(indent);
        for _ in left_start..left_end {
            out.push_str(&primary);
        }
        for _ in left_end..right_start {
            out.push_str(&secondary);
        }
        for _ in right_start..right_end {
            out.push_str(&primary);
        }
        out.push_str(&suffix);
        out
    }
}

/// Kahn's algorithm over the parent links. Every language must reach the
/// root; any leftover node sits on a cycle.
fn validate_acyclic(languages: &HashMap<String, LanguageNode>) -> Result<()> {
    // child count per language
    let mut fanin: HashMap<&str, usize> = languages.keys().map(|k| (k.as_str(), 0)).collect();
    for node in languages.values() {
        if let Some(parent) = &node.extends {
            *fanin.get_mut(parent.as_str()).expect("parents were rewritten to known languages") +=
                1;
        }
    }

    let mut leaves: Vec<&str> = fanin
        .iter()
        .filter(|(_, n)| **n == 0)
        .map(|(k, _)| *k)
        .collect();
    let mut visited = 0usize;
    while let Some(lang) = leaves.pop() {
        visited += 1;
        if let Some(parent) = &languages[lang].extends {
            let n = fanin.get_mut(parent.as_str()).unwrap();
            *n -= 1;
            if *n == 0 {
                leaves.push(parent);
            }
        }
    }

    if visited != languages.len() {
        let mut cyclic: Vec<&str> = fanin
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(k, _)| *k)
            .collect();
        cyclic.sort_unstable();
        bail!("inheritance cycle among languages: {}", cyclic.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(langs: &[(&str, &[(&str, &str)])]) -> ConfigTable {
        let mut t = ConfigTable::default();
        for (lang, keys) in langs {
            let map = t.translate_keys.entry((*lang).to_string()).or_default();
            for (k, v) in *keys {
                map.insert((*k).to_string(), (*v).to_string());
            }
        }
        t
    }

    #[test]
    fn lookup_walks_the_parent_chain() {
        let mut store = LocalizationStore::new();
        store
            .merge(table(&[
                ("default", &[("greet", "hello"), ("bye", "goodbye")]),
                ("pirate", &[("greet", "ahoy")]),
            ]))
            .unwrap();
        store.set_language("pirate");
        assert_eq!(store.resolve("greet"), "ahoy");
        assert_eq!(store.resolve("bye"), "goodbye");
    }

    #[test]
    fn inherit_sentinel_defers_to_parent() {
        let mut store = LocalizationStore::new();
        store
            .merge(table(&[
                ("default", &[("greet", "hello")]),
                ("loud", &[("greet", "HELLO")]),
                ("calm", &[("extend", "loud"), ("greet", "@inherit")]),
            ]))
            .unwrap();
        store.set_language("calm");
        assert_eq!(store.resolve("greet"), "HELLO");
    }

    #[test]
    fn missing_key_yields_placeholder() {
        let store = LocalizationStore::new();
        assert_eq!(store.resolve("nope"), "<unknown translate key: nope>");
    }

    #[test]
    fn cycle_is_rejected_and_nothing_is_applied() {
        let mut store = LocalizationStore::new();
        store
            .merge(table(&[("default", &[("greet", "hello")])]))
            .unwrap();

        let bad = table(&[
            ("a", &[("extend", "b"), ("greet", "a-side")]),
            ("b", &[("extend", "a")]),
        ]);
        assert!(store.merge(bad).is_err());

        // Prior state intact, bad languages absent.
        assert_eq!(store.resolve("greet"), "hello");
        store.set_language("a");
        assert_eq!(store.language(), DEFAULT_LANG);
    }

    #[test]
    fn dangling_extends_falls_back_to_root() {
        let mut store = LocalizationStore::new();
        store
            .merge(table(&[
                ("default", &[("greet", "hello")]),
                ("orphan", &[("extend", "nowhere")]),
            ]))
            .unwrap();
        store.set_language("orphan");
        assert_eq!(store.resolve("greet"), "hello");
    }

    #[test]
    fn later_merges_win_key_by_key() {
        let mut store = LocalizationStore::new();
        store
            .merge(table(&[("default", &[("a", "one"), ("b", "two")])]))
            .unwrap();
        store
            .merge(table(&[("default", &[("b", "TWO")])]))
            .unwrap();
        assert_eq!(store.resolve("a"), "one");
        assert_eq!(store.resolve("b"), "TWO");
    }

    #[test]
    fn deep_chains_hit_the_depth_ceiling() {
        let mut store = LocalizationStore::new();
        let mut t = ConfigTable::default();
        t.translate_keys
            .entry("default".to_string())
            .or_default()
            .insert("greet".to_string(), "hello".to_string());
        for i in 0..15 {
            let lang = format!("l{i}");
            let parent = if i == 0 { "default".to_string() } else { format!("l{}", i - 1) };
            t.translate_keys
                .entry(lang)
                .or_default()
                .insert(EXTEND_KEY.to_string(), parent);
        }
        store.merge(t).unwrap();
        store.set_language("l14");
        assert!(store.resolve("greet").starts_with("<exceeded max extend depth"));
    }

    #[test]
    fn placeholders_substitute_by_name() {
        let mut store = LocalizationStore::new();
        store
            .merge(table(&[(
                "default",
                &[("line", "File \"{file}\", line {lineno}")],
            )]))
            .unwrap();
        assert_eq!(
            store.translate_with("line", &[("file", "main.py"), ("lineno", "3")]),
            "File \"main.py\", line 3"
        );
        // unmatched placeholders survive
        assert_eq!(
            store.translate_with("line", &[("file", "x")]),
            "File \"x\", line {lineno}"
        );
    }

    #[test]
    fn anchor_segments_compose() {
        let store = LocalizationStore::with_builtins();
        assert_eq!(store.anchors(2, 0, 0, 0, 3), "  ~~~");
        assert_eq!(store.anchors(0, 0, 2, 4, 6), "~~^^~~");
    }

    #[test]
    fn default_lang_in_table_switches_active_language() {
        let mut store = LocalizationStore::new();
        let mut t = table(&[("pirate", &[("greet", "ahoy")])]);
        t.default_lang = Some("pirate".to_string());
        store.merge(t).unwrap();
        assert_eq!(store.language(), "pirate");
    }
}
