// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers for declared symbols and their uniform printed names.
//!
//! There are three kinds of names: symbols declared in the input script
//! (sorts, functions, bound variables, ...), numeric identifiers assigned to
//! them, and the uniform names `x1`, `x2`, ... used for printing. Identifiers
//! do not resolve shadowing: a symbol bound twice keeps a single identifier.

use crate::prng::Prng;
use std::collections::HashMap;

/// Numeric surrogate of a declared symbol. `0` stands for "not registered".
pub type NameId = usize;

/// `|foo|` and `foo` denote the same SMT2 symbol.
pub fn unquote(symbol: &str) -> &str {
    if symbol.len() > 1 && symbol.starts_with('|') && symbol.ends_with('|') {
        &symbol[1..symbol.len() - 1]
    } else {
        symbol
    }
}

/// The uniform name printed in place of an identifier.
pub fn uniform_name(id: NameId) -> String {
    format!("x{}", id)
}

/// Append-only bijection between unquoted symbols and identifiers `1, 2, ...`
/// assigned in order of first declaration.
#[derive(Clone, Debug)]
pub struct SymbolRegistry {
    ids: HashMap<String, NameId>,
    next_id: NameId,
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            next_id: 1,
        }
    }
}

impl SymbolRegistry {
    /// Register `symbol` if needed and return its identifier.
    pub fn declare(&mut self, symbol: &str) -> NameId {
        let symbol = unquote(symbol);
        if let Some(id) = self.ids.get(symbol) {
            return *id;
        }
        let id = self.next_id;
        self.ids.insert(symbol.to_string(), id);
        self.next_id += 1;
        id
    }

    /// Identifier of `symbol`, or 0 if it was never declared.
    pub fn lookup(&self, symbol: &str) -> NameId {
        self.ids.get(unquote(symbol)).cloned().unwrap_or(0)
    }

    /// The identifier that the next new symbol will receive.
    pub fn next_id(&self) -> NameId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Random permutation of identifiers, extended incrementally so that
/// mappings assigned by earlier print passes never change.
#[derive(Clone, Debug, Default)]
pub struct Permutation {
    // Index 0 is present to simplify indexing but never permuted.
    targets: Vec<NameId>,
}

impl Permutation {
    /// Permute the identifiers introduced since the last call, i.e. the range
    /// `[len, next_id)`.
    pub fn extend(&mut self, next_id: NameId, rng: &mut Prng) {
        let old_len = self.targets.len();
        if old_len >= next_id {
            return;
        }
        self.targets.extend(old_len..next_id);
        let start = std::cmp::max(old_len, 1);
        for i in start..next_id - 1 {
            let j = i + rng.next_rand_int(next_id - i);
            self.targets.swap(i, j);
        }
    }

    /// The permuted target of `id`, if `id` is covered by the table.
    pub fn get(&self, id: NameId) -> Option<NameId> {
        self.targets.get(id).cloned()
    }

    /// Number of entries, including the unused index 0.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[test]
fn test_registry_unquotes_and_is_idempotent() {
    let mut names = SymbolRegistry::default();
    assert_eq!(names.declare("x"), 1);
    assert_eq!(names.declare("|y z|"), 2);
    assert_eq!(names.declare("|x|"), 1);
    assert_eq!(names.declare("y z"), 2);
    assert_eq!(names.lookup("|y z|"), 2);
    assert_eq!(names.lookup("w"), 0);
    assert_eq!(names.lookup("|"), 0);
    assert_eq!(names.next_id(), 3);
    assert_eq!(names.len(), 2);
}

#[test]
fn test_unquote() {
    assert_eq!(unquote("|a|"), "a");
    assert_eq!(unquote("||"), "");
    assert_eq!(unquote("|"), "|");
    assert_eq!(unquote("a|"), "a|");
}

#[test]
fn test_permutation_freezes_earlier_entries() {
    let mut rng = Prng::new(11);
    let mut permutation = Permutation::default();
    permutation.extend(6, &mut rng);
    assert_eq!(permutation.get(0), Some(0));
    let first: Vec<_> = (1..6).map(|i| permutation.get(i).unwrap()).collect();
    let mut sorted = first.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2, 3, 4, 5]);

    permutation.extend(6, &mut rng);
    assert_eq!(permutation.len(), 6);

    permutation.extend(10, &mut rng);
    let again: Vec<_> = (1..6).map(|i| permutation.get(i).unwrap()).collect();
    assert_eq!(first, again);
    let mut added: Vec<_> = (6..10).map(|i| permutation.get(i).unwrap()).collect();
    added.sort_unstable();
    assert_eq!(added, vec![6, 7, 8, 9]);
    assert_eq!(permutation.get(10), None);
}
