// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::operators::Operator;

/// A generic n-ary tree representing one command or one subterm.
///
/// Children are owned by their parent, so a command tree is dropped as a
/// whole once it has been printed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    /// Head symbol. Empty for pure aggregation nodes such as `(a b c)`.
    pub symbol: String,
    /// Whether `symbol` refers to an identifier subject to renaming.
    pub is_name: bool,
    /// Whether the node is printed between parentheses.
    pub needs_parens: bool,
    pub children: Vec<Node>,
}

pub const ASSERT: &str = "assert";
pub const CHECK_SAT: &str = "check-sat";
pub const ANNOTATION: &str = "!";
pub const QUALIFIED: &str = "as";
pub const INDEXED: &str = "_";
pub const EQUALS: &str = "=";
pub const NAMED: &str = ":named";
pub const PATTERN: &str = ":pattern";

impl Node {
    /// A parenthesized node headed by a reserved word or command name.
    pub fn command<S: Into<String>>(symbol: S, children: Vec<Node>) -> Self {
        Self {
            symbol: symbol.into(),
            is_name: false,
            needs_parens: true,
            children,
        }
    }

    /// An atom printed verbatim: keyword, literal, logic name, etc.
    pub fn leaf<S: Into<String>>(symbol: S) -> Self {
        Self {
            symbol: symbol.into(),
            is_name: false,
            needs_parens: false,
            children: Vec::new(),
        }
    }

    /// An atomic reference to a (possibly) declared identifier.
    pub fn name<S: Into<String>>(symbol: S) -> Self {
        let symbol = symbol.into();
        debug_assert!(!symbol.is_empty());
        Self {
            symbol,
            is_name: true,
            needs_parens: false,
            children: Vec::new(),
        }
    }

    /// A parenthesized node headed by an identifier, e.g. `(f a b)`,
    /// a binding `(x t)` or a constructor declaration `(cons (hd Int))`.
    pub fn application<S: Into<String>>(symbol: S, children: Vec<Node>) -> Self {
        let symbol = symbol.into();
        debug_assert!(!symbol.is_empty());
        Self {
            symbol,
            is_name: true,
            needs_parens: true,
            children,
        }
    }

    /// A parenthesized aggregation node without head symbol.
    pub fn list(children: Vec<Node>) -> Self {
        Self {
            symbol: String::new(),
            is_name: false,
            needs_parens: true,
            children,
        }
    }

    /// An attribute `:keyword value` inside an annotation.
    pub fn attribute<S: Into<String>>(keyword: S, value: Option<Node>) -> Self {
        Self {
            symbol: keyword.into(),
            is_name: false,
            needs_parens: false,
            children: value.into_iter().collect(),
        }
    }

    pub fn is(&self, symbol: &str) -> bool {
        self.symbol == symbol
    }

    /// Index of the first operand when the node applies an operator to
    /// arguments, or `None` for any other kind of node.
    pub fn operand_offset(&self) -> Option<usize> {
        if !self.needs_parens {
            return None;
        }
        if self.is_name && !self.children.is_empty() {
            return Some(0);
        }
        match self.children.first() {
            Some(head)
                if self.symbol.is_empty()
                    && (head.is(QUALIFIED) || head.is(INDEXED))
                    && self.children.len() > 1 =>
            {
                Some(1)
            }
            _ => None,
        }
    }

    /// The operator symbol of the node, looking through a `(as f S)`
    /// qualification, either on the node itself or on its head.
    pub fn operator_symbol(&self) -> &str {
        let node = match self.children.first() {
            Some(head) if self.symbol.is_empty() && head.is(QUALIFIED) => head,
            _ => self,
        };
        if node.is(QUALIFIED) {
            if let Some(identifier) = node.children.first() {
                return &identifier.symbol;
            }
        }
        &node.symbol
    }

    /// The interned operator of the node, if it is one of the known ones.
    pub fn operator(&self) -> Option<Operator> {
        Operator::intern(self.operator_symbol())
    }

    /// Replace the operator symbol, keeping any `as` qualification in place.
    pub fn replace_operator(&mut self, operator: Node) {
        let through_head =
            self.symbol.is_empty() && self.children.first().map_or(false, |h| h.is(QUALIFIED));
        let node = if through_head {
            &mut self.children[0]
        } else {
            self
        };
        if node.is(QUALIFIED) {
            if let Some(identifier) = node.children.first_mut() {
                identifier.symbol = operator.symbol;
                return;
            }
        }
        node.symbol = operator.symbol;
    }

}

#[cfg(test)]
fn qualified_less_than() -> Node {
    // ((as < Bool) a b)
    Node::list(vec![
        Node::command(QUALIFIED, vec![Node::name("<"), Node::name("Bool")]),
        Node::name("a"),
        Node::name("b"),
    ])
}

#[test]
fn test_operator_resolution() {
    let node = Node::application("bvult", vec![Node::name("a"), Node::name("b")]);
    assert_eq!(node.operator(), Some(Operator::BvUlt));
    assert_eq!(node.operand_offset(), Some(0));

    let node = qualified_less_than();
    assert_eq!(node.operator_symbol(), "<");
    assert_eq!(node.operator(), Some(Operator::Lt));
    assert_eq!(node.operand_offset(), Some(1));

    let node = Node::application("f", vec![Node::name("a")]);
    assert_eq!(node.operator(), None);
    assert_eq!(Node::name("x").operand_offset(), None);
    assert_eq!(Node::list(vec![Node::name("x")]).operand_offset(), None);
}

#[test]
fn test_replace_operator() {
    let mut node = qualified_less_than();
    node.replace_operator(Node::leaf(">"));
    assert_eq!(node.operator_symbol(), ">");
    assert_eq!(node.children[0].symbol, QUALIFIED);

    let mut node = Node::application("<=", vec![Node::name("a"), Node::name("b")]);
    node.replace_operator(Node::leaf(">="));
    assert_eq!(node.symbol, ">=");
    assert!(node.is_name);
}
