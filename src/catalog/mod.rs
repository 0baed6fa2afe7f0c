//! Signature rule catalog.
//!
//! A catalog is an ordered list of [`Rule`]s, each binding one primary
//! signature to one decode program. Order is priority. The built-in
//! catalog is static data; [`Catalog`] adds a precompiled searcher per
//! rule so repeated scans do not rebuild shift tables.

mod builtin;

use once_cell::sync::Lazy;

use crate::decode::{emitted_labels, Step};
use crate::search::Finder;

pub use builtin::RULES;

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Rule<'a> {
    /// Short family name used in diagnostics.
    pub name: &'a str,
    pub signature: &'a [u8],
    pub program: &'a [Step<'a>],
}

impl<'a> Rule<'a> {
    /// Every label this rule can print.
    pub fn labels(&self) -> Vec<&'a str> {
        let mut out = Vec::new();
        emitted_labels(self.program, &mut out);
        out
    }
}

/// A rule together with its compiled signature searcher.
#[derive(Debug, Clone)]
pub struct CompiledRule<'a> {
    pub rule: &'a Rule<'a>,
    pub finder: Finder<'a>,
}

#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    rules: Vec<CompiledRule<'a>>,
}

static BUILTIN: Lazy<Catalog<'static>> = Lazy::new(|| Catalog::new(RULES));

impl<'a> Catalog<'a> {
    pub fn new(rules: &'a [Rule<'a>]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|rule| CompiledRule {
                    rule,
                    finder: Finder::new(rule.signature),
                })
                .collect(),
        }
    }

    /// The shared built-in catalog, compiled on first use.
    pub fn builtin() -> &'static Catalog<'static> {
        &BUILTIN
    }

    /// Rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule<'a>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All labels the catalog can print, in priority order.
    pub fn labels(&self) -> Vec<&'a str> {
        let mut out = Vec::new();
        for compiled in &self.rules {
            emitted_labels(compiled.rule.program, &mut out);
        }
        out
    }
}

/// Encode ASCII text as UTF-16LE bytes at compile time.
///
/// `N` must be exactly twice the text length.
pub const fn utf16le<const N: usize>(text: &str) -> [u8; N] {
    let src = text.as_bytes();
    assert!(src.len() * 2 == N, "output length must be twice the text length");
    let mut out = [0u8; N];
    let mut i = 0;
    while i < src.len() {
        assert!(src[i].is_ascii(), "only ASCII text is supported");
        out[i * 2] = src[i];
        i += 1;
    }
    out
}
