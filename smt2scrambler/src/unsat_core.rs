// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filtering of named assertions against an unsat core.

use crate::{
    buffer::CommandBuffer,
    error::{ScrambleError, ScrambleResult},
    names::unquote,
    syntax::{Node, ANNOTATION, ASSERT, NAMED},
};
use std::{collections::BTreeSet, collections::VecDeque, io::Write, path::Path};

/// The names of the assertions to keep, as printed by a solver in response
/// to `(get-unsat-core)`, e.g. `unsat (a1 |a 2| a3)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnsatCore {
    names: BTreeSet<String>,
}

impl UnsatCore {
    /// Parse the solver answer. Return `None` if the text does not start
    /// with `unsat` followed by a parenthesized list of names.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start().strip_prefix("unsat")?;
        let text = text.trim_start().strip_prefix('(')?;
        let mut names = BTreeSet::new();
        for word in text.split_whitespace() {
            if let Some(name) = word.strip_suffix(')') {
                if !name.is_empty() {
                    names.insert(unquote(name).to_string());
                }
                return Some(Self { names });
            }
            names.insert(unquote(word).to_string());
        }
        None
    }

    pub fn read(path: &Path) -> ScrambleResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).ok_or_else(|| ScrambleError::MalformedCore(path.display().to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(unquote(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Echo the parsed names, sorted, as an SMT2 comment line.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, ";; parsed {} names:", self.names.len())?;
        for name in &self.names {
            write!(out, " {}", name)?;
        }
        writeln!(out)
    }
}

/// Breadth-first search for a `:named` attribute. Only the body of an
/// annotation is searched further, not the values of its attributes.
pub fn find_named_annotation(node: &Node) -> Option<&str> {
    let mut queue = VecDeque::new();
    queue.push_back(node);
    while let Some(current) = queue.pop_front() {
        if current.is(ANNOTATION) {
            let named = current.children.iter().skip(1).find_map(|attribute| {
                match attribute.children.first() {
                    Some(value) if attribute.is(NAMED) => Some(value.symbol.as_str()),
                    _ => None,
                }
            });
            if named.is_some() {
                return named;
            }
            if let Some(body) = current.children.first() {
                queue.push_back(body);
            }
        } else {
            queue.extend(current.children.iter());
        }
    }
    None
}

/// Drop the named assertions whose name is not in `core`. Unnamed
/// assertions and other commands are kept in place. Return the number of
/// dropped assertions.
pub fn filter_named(commands: &mut CommandBuffer, core: &UnsatCore) -> usize {
    let before = commands.len();
    commands.retain(|command| {
        !command.is(ASSERT)
            || match find_named_annotation(command) {
                Some(name) => core.contains(name),
                None => true,
            }
    });
    let dropped = before - commands.len();
    if dropped > 0 {
        tracing::info!("Dropped {} named assertions outside of the unsat core", dropped);
    }
    dropped
}

#[cfg(test)]
fn named_assertion(name: &str) -> Node {
    Node::command(
        ASSERT,
        vec![Node::command(
            ANNOTATION,
            vec![
                Node::name("p"),
                Node::attribute(NAMED, Some(Node::name(name))),
            ],
        )],
    )
}

#[test]
fn test_parse_core() {
    let core = UnsatCore::parse("unsat\n(a1 |a 2|\n  a3)\n").unwrap();
    assert_eq!(core.names().collect::<Vec<_>>(), vec!["a 2", "a1", "a3"]);
    assert!(core.contains("|a1|"));
    assert!(core.contains("a 2"));

    let core = UnsatCore::parse("unsat ( x )").unwrap();
    assert_eq!(core.len(), 1);
    assert!(UnsatCore::parse("unsat ()").unwrap().is_empty());

    assert_eq!(UnsatCore::parse("sat (a1)"), None);
    assert_eq!(UnsatCore::parse("unsat a1"), None);
    assert_eq!(UnsatCore::parse("unsat (a1 a2"), None);
}

#[test]
fn test_write_summary() {
    let core = UnsatCore::parse("unsat (b a)").unwrap();
    let mut out = Vec::new();
    core.write_summary(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), ";; parsed 2 names: a b\n");
}

#[test]
fn test_find_named_annotation() {
    assert_eq!(find_named_annotation(&named_assertion("a1")), Some("a1"));
    assert_eq!(
        find_named_annotation(&Node::command(ASSERT, vec![Node::name("p")])),
        None
    );
    // The nearest annotation wins.
    let nested = Node::command(
        ASSERT,
        vec![Node::application(
            "and",
            vec![
                Node::application(
                    "not",
                    vec![named_assertion("deep").children.remove(0)],
                ),
                named_assertion("shallow").children.remove(0),
            ],
        )],
    );
    assert_eq!(find_named_annotation(&nested), Some("shallow"));
}

#[test]
fn test_filter_named() {
    let mut buffer = CommandBuffer::default();
    buffer.push(Node::command("set-logic", vec![Node::leaf("QF_UF")]));
    buffer.push(named_assertion("a1"));
    buffer.push(Node::command(ASSERT, vec![Node::name("q")]));
    buffer.push(named_assertion("a2"));
    buffer.push(named_assertion("|a3|"));
    buffer.push(Node::command("check-sat", Vec::new()));
    let core = UnsatCore::parse("unsat (a2 a3)").unwrap();
    assert_eq!(filter_named(&mut buffer, &core), 1);
    let kept: Vec<_> = buffer
        .iter()
        .map(|c| find_named_annotation(c).unwrap_or(&c.symbol).to_string())
        .collect();
    assert_eq!(kept, vec!["set-logic", "assert", "a2", "|a3|", "check-sat"]);
    // Idempotent.
    assert_eq!(filter_named(&mut buffer, &core), 0);
}
