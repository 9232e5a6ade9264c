// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reordering passes over the command buffer.

use crate::{
    error::{ScrambleError, ScrambleResult},
    names::{NameId, SymbolRegistry},
    syntax::{Node, ASSERT, EQUALS},
};
use std::ops::Range;

/// Kinds of commands whose consecutive occurrences may be shuffled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunKind {
    DeclareFun,
    DeclareConst,
    DeclareSort,
    Assert,
}

impl RunKind {
    pub fn classify(command: &Node) -> Option<Self> {
        match command.symbol.as_str() {
            "declare-fun" => Some(RunKind::DeclareFun),
            "declare-const" => Some(RunKind::DeclareConst),
            "declare-sort" => Some(RunKind::DeclareSort),
            ASSERT => Some(RunKind::Assert),
            _ => None,
        }
    }
}

/// A maximal run `start..end` of consecutive commands of the same kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run<K> {
    pub kind: K,
    pub start: usize,
    pub end: usize,
}

impl<K> Run<K> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Single left-to-right scan returning the maximal runs of classified
/// commands, in buffer order.
pub fn find_runs<K, F>(commands: &[Node], classify: F) -> Vec<Run<K>>
where
    K: PartialEq + Copy,
    F: Fn(&Node) -> Option<K>,
{
    let mut runs: Vec<Run<K>> = Vec::new();
    for (i, command) in commands.iter().enumerate() {
        let kind = match classify(command) {
            Some(kind) => kind,
            None => continue,
        };
        match runs.last_mut() {
            Some(run) if run.end == i && run.kind == kind => run.end = i + 1,
            _ => runs.push(Run {
                kind,
                start: i,
                end: i + 1,
            }),
        }
    }
    runs
}

pub fn is_assertion(command: &Node) -> bool {
    command.is(ASSERT)
}

/// Declarations and definitions of any kind (`declare-fun`, `define-sort`,
/// `declare-datatypes`, ...).
pub fn is_declaration(command: &Node) -> bool {
    command.symbol.contains("declare") || command.symbol.contains("define")
}

/// Locate the unique run of commands satisfying `predicate`. Passes that
/// rely on this do not support several disjoint runs.
pub fn single_run<F>(
    commands: &[Node],
    predicate: F,
    error: fn() -> ScrambleError,
) -> ScrambleResult<Option<Range<usize>>>
where
    F: Fn(&Node) -> bool,
{
    let runs = find_runs(commands, |c| if predicate(c) { Some(()) } else { None });
    match runs.as_slice() {
        [] => Ok(None),
        [run] => Ok(Some(run.start..run.end)),
        _ => Err(error()),
    }
}

/// Stable reordering of `items[range]` by ascending rank, `ranks[i]` being
/// the rank of `items[range.start + i]`.
pub fn reorder_by_ranks<T>(items: &mut Vec<T>, range: Range<usize>, ranks: &[f32]) {
    debug_assert_eq!(ranks.len(), range.len());
    let start = range.start;
    let mut window: Vec<(f32, T)> = ranks.iter().cloned().zip(items.drain(range)).collect();
    window.sort_by(|a, b| a.0.total_cmp(&b.0));
    items.splice(start..start, window.into_iter().map(|(_, item)| item));
}

fn is_name_reference(node: &Node) -> bool {
    node.is_name && !node.symbol.is_empty() && node.symbol != EQUALS
}

/// Number the names referenced by `node` in order of first appearance:
/// names among the direct children first, then recursively. The head of an
/// aggregation node is not descended into.
pub fn assign_first_occurrence(node: &Node, registry: &mut SymbolRegistry) {
    for child in &node.children {
        if is_name_reference(child) {
            registry.declare(&child.symbol);
        }
    }
    for (i, child) in node.children.iter().enumerate() {
        if i > 0 || !node.symbol.is_empty() {
            assign_first_occurrence(child, registry);
        }
    }
}

/// The first name referenced by `node`, searched in the same order as
/// `assign_first_occurrence`.
pub fn first_name(node: &Node) -> Option<&Node> {
    if let Some(child) = node.children.iter().find(|c| is_name_reference(c)) {
        return Some(child);
    }
    node.children
        .iter()
        .enumerate()
        .filter(|(i, _)| *i > 0 || !node.symbol.is_empty())
        .find_map(|(_, child)| first_name(child))
}

/// Tag each command of `commands[range]` with the identifier of its first
/// referenced name (0 if none) and stably sort the range by tag.
pub fn sort_declarations(commands: &mut Vec<Node>, range: Range<usize>, registry: &SymbolRegistry) {
    let start = range.start;
    let mut window: Vec<(NameId, Node)> = commands
        .drain(range)
        .map(|command| {
            let tag = first_name(&command).map_or(0, |n| registry.lookup(&n.symbol));
            (tag, command)
        })
        .collect();
    window.sort_by_key(|(tag, _)| *tag);
    commands.splice(start..start, window.into_iter().map(|(_, command)| command));
}

#[cfg(test)]
fn command(symbol: &str, names: &[&str]) -> Node {
    Node::command(symbol, names.iter().map(|n| Node::name(*n)).collect())
}

#[test]
fn test_find_runs() {
    let commands = vec![
        command("declare-fun", &["a"]),
        command("declare-fun", &["b"]),
        command("declare-const", &["c"]),
        command("assert", &["a"]),
        command("check-sat", &[]),
        command("assert", &["b"]),
        command("assert", &["c"]),
    ];
    let runs = find_runs(&commands, RunKind::classify);
    assert_eq!(
        runs,
        vec![
            Run {
                kind: RunKind::DeclareFun,
                start: 0,
                end: 2
            },
            Run {
                kind: RunKind::DeclareConst,
                start: 2,
                end: 3
            },
            Run {
                kind: RunKind::Assert,
                start: 3,
                end: 4
            },
            Run {
                kind: RunKind::Assert,
                start: 5,
                end: 7
            },
        ]
    );
    assert!(matches!(
        single_run(&commands, is_assertion, || ScrambleError::MultipleAssertionRuns),
        Err(ScrambleError::MultipleAssertionRuns)
    ));
    assert_eq!(
        single_run(&commands, is_declaration, || ScrambleError::MultipleDeclarationRuns)
            .unwrap(),
        Some(0..3)
    );
    let split = vec![
        command("declare-const", &["a"]),
        command("push", &[]),
        command("define-fun", &["b"]),
        command("assert", &["a"]),
    ];
    assert!(matches!(
        single_run(&split, is_declaration, || ScrambleError::MultipleDeclarationRuns),
        Err(ScrambleError::MultipleDeclarationRuns)
    ));
    assert_eq!(
        single_run(&split, is_assertion, || ScrambleError::MultipleAssertionRuns).unwrap(),
        Some(3..4)
    );
    assert_eq!(
        single_run(&commands[4..5], is_assertion, || ScrambleError::MultipleAssertionRuns)
            .unwrap(),
        None
    );
}

#[test]
fn test_reorder_by_ranks() {
    let mut items = vec!['x', 'a', 'b', 'c', 'y'];
    reorder_by_ranks(&mut items, 1..4, &[0.5, 0.1, 0.5]);
    assert_eq!(items, vec!['x', 'b', 'a', 'c', 'y']);

    let mut items = vec!['a', 'b'];
    reorder_by_ranks(&mut items, 0..2, &[0.9, 0.1]);
    assert_eq!(items, vec!['b', 'a']);
}

#[test]
fn test_reorder_by_ranks_with_nan() {
    let ranks: Vec<f32> = ["0.5", "NaN", "0.1", "0.3", "NaN"]
        .iter()
        .map(|r| r.parse().unwrap())
        .collect();
    let mut items = vec!['a', 'b', 'c', 'd', 'e'];
    reorder_by_ranks(&mut items, 0..5, &ranks);
    assert_eq!(items, vec!['c', 'd', 'a', 'b', 'e']);
}

#[test]
fn test_first_occurrence_numbering() {
    // (assert (= (f y) x)) then (assert (g x))
    let first = Node::command(
        ASSERT,
        vec![Node::application(
            "=",
            vec![
                Node::application("f", vec![Node::name("y")]),
                Node::name("x"),
            ],
        )],
    );
    let second = Node::command(
        ASSERT,
        vec![Node::application("g", vec![Node::name("x")])],
    );
    let mut registry = SymbolRegistry::default();
    assign_first_occurrence(&first, &mut registry);
    assign_first_occurrence(&second, &mut registry);
    assert_eq!(registry.lookup("="), 0);
    assert_eq!(registry.lookup("f"), 1);
    assert_eq!(registry.lookup("x"), 2);
    assert_eq!(registry.lookup("y"), 3);
    assert_eq!(registry.lookup("g"), 4);
    assert_eq!(first_name(&first).map(|n| n.symbol.as_str()), Some("f"));
    assert_eq!(first_name(&second).map(|n| n.symbol.as_str()), Some("g"));
}

#[test]
fn test_first_occurrence_skips_aggregation_heads() {
    // ((_ extract 3 0) v): the indexed head is not numbered.
    let node = Node::command(
        ASSERT,
        vec![Node::list(vec![
            Node::command("_", vec![Node::name("extract"), Node::leaf("3")]),
            Node::name("v"),
        ])],
    );
    let mut registry = SymbolRegistry::default();
    assign_first_occurrence(&node, &mut registry);
    assert_eq!(registry.lookup("v"), 1);
    assert_eq!(registry.lookup("extract"), 0);
}

#[test]
fn test_sort_declarations() {
    let mut registry = SymbolRegistry::default();
    registry.declare("b");
    registry.declare("a");
    let mut commands = vec![
        command("set-logic", &[]),
        command("declare-fun", &["a"]),
        command("declare-fun", &["unused"]),
        command("declare-fun", &["b"]),
        command("assert", &["b"]),
    ];
    sort_declarations(&mut commands, 1..4, &registry);
    let order: Vec<_> = commands
        .iter()
        .map(|c| c.children.first().map_or("", |n| n.symbol.as_str()))
        .collect();
    assert_eq!(order, vec!["", "unused", "b", "a", "b"]);
}
