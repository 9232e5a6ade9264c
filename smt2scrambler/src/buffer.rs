// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::syntax::Node;

/// Ordered sequence of the top-level commands read since the last flush.
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<Node>,
}

impl CommandBuffer {
    pub fn push(&mut self, command: Node) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.commands.iter()
    }

    pub fn last(&self) -> Option<&Node> {
        self.commands.last()
    }

    /// Whether the last buffered command is `symbol`.
    pub fn ends_with(&self, symbol: &str) -> bool {
        self.last().map_or(false, |c| c.is(symbol))
    }

    /// Number of buffered commands named `symbol`.
    pub fn count(&self, symbol: &str) -> usize {
        self.commands.iter().filter(|c| c.is(symbol)).count()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.commands
    }

    /// Mutable access for the reordering passes.
    pub fn as_mut_vec(&mut self) -> &mut Vec<Node> {
        &mut self.commands
    }

    /// Remove all commands, in order. The buffer is empty afterwards.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Node> {
        self.commands.drain(..)
    }

    /// Keep only the commands satisfying `f`, preserving their order.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Node) -> bool,
    {
        self.commands.retain(f)
    }
}

#[test]
fn test_command_buffer() {
    let mut buffer = CommandBuffer::default();
    assert!(buffer.is_empty());
    assert!(!buffer.ends_with("check-sat"));
    buffer.push(Node::command("assert", vec![Node::name("p")]));
    buffer.push(Node::command("assert", vec![Node::name("q")]));
    buffer.push(Node::command("check-sat", Vec::new()));
    assert!(buffer.ends_with("check-sat"));
    assert_eq!(buffer.count("assert"), 2);

    buffer.retain(|c| c.children.first().map_or(true, |n| !n.is("p")));
    assert_eq!(buffer.len(), 2);

    let drained: Vec<_> = buffer.drain().map(|c| c.symbol).collect();
    assert_eq!(drained, vec!["assert", "check-sat"]);
    assert!(buffer.is_empty());
}
