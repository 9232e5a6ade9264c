// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialization of command trees.
//!
//! A `Printer` consumes each command it prints. Renaming, annotation
//! stripping and the auxiliary commands following `check-sat` are applied on
//! the fly.

use crate::{
    error::ScrambleResult,
    names::{uniform_name, Permutation, SymbolRegistry},
    operators::OperandScrambler,
    syntax::{Node, ANNOTATION, ASSERT, CHECK_SAT, PATTERN},
};
use std::{io::Write, str::FromStr};

/// Which `(! t ...)` annotations are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationMode {
    All,
    /// Only annotations consisting of a single `:pattern` attribute.
    Pattern,
    None,
}

impl Default for AnnotationMode {
    fn default() -> Self {
        AnnotationMode::All
    }
}

impl FromStr for AnnotationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" | "all" => Ok(AnnotationMode::All),
            "pattern" => Ok(AnnotationMode::Pattern),
            "false" | "none" => Ok(AnnotationMode::None),
            _ => Err(format!(
                "invalid annotation mode '{}' (expected true, pattern or false)",
                s
            )),
        }
    }
}

impl AnnotationMode {
    /// Whether the annotation node `node` is printed as is.
    pub fn keeps(self, node: &Node) -> bool {
        match self {
            AnnotationMode::All => true,
            AnnotationMode::None => false,
            AnnotationMode::Pattern => node.children.len() == 2 && node.children[1].is(PATTERN),
        }
    }
}

/// How name references are printed.
#[derive(Clone, Copy, Debug)]
pub enum Renaming<'a> {
    /// Literal symbols.
    Identity,
    /// Uniform names of the permuted declaration-order identifiers.
    Permuted {
        registry: &'a SymbolRegistry,
        permutation: &'a Permutation,
    },
    /// Uniform names of the first-occurrence identifiers, unpermuted.
    FirstOccurrence { registry: &'a SymbolRegistry },
}

impl Renaming<'_> {
    /// The printed name of `symbol`, or `None` if it is printed literally.
    pub fn rename(&self, symbol: &str) -> Option<String> {
        match self {
            Renaming::Identity => None,
            Renaming::Permuted {
                registry,
                permutation,
            } => match registry.lookup(symbol) {
                0 => None,
                id => permutation.get(id).map(uniform_name),
            },
            Renaming::FirstOccurrence { registry } => match registry.lookup(symbol) {
                0 => None,
                id => Some(uniform_name(id)),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PrinterConfig {
    pub annotations: AnnotationMode,
    /// Label every assertion and request an unsat core after `check-sat`.
    pub gen_unsat_core: bool,
    /// Request a model after `check-sat`.
    pub gen_model: bool,
    /// Request a proof after `check-sat`.
    pub gen_proof: bool,
}

pub struct Printer<'a, W> {
    out: W,
    config: PrinterConfig,
    renaming: Renaming<'a>,
    annotation_count: &'a mut u64,
    operands: Option<OperandScrambler<'a>>,
}

impl<'a, W> Printer<'a, W>
where
    W: Write,
{
    /// `annotation_count` is the number of the next synthetic assertion
    /// label. It is shared by all the printers of a run.
    pub fn new(
        out: W,
        config: PrinterConfig,
        renaming: Renaming<'a>,
        annotation_count: &'a mut u64,
    ) -> Self {
        Self {
            out,
            config,
            renaming,
            annotation_count,
            operands: None,
        }
    }

    /// Rewrite operands randomly before printing each node.
    pub fn with_operands(mut self, operands: OperandScrambler<'a>) -> Self {
        self.operands = Some(operands);
        self
    }

    /// Print a command followed by a newline.
    pub fn print_command(&mut self, mut command: Node) -> ScrambleResult<()> {
        self.print_node(&mut command)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn next_label(&mut self) -> String {
        let label = format!("smtcomp{}", self.annotation_count);
        *self.annotation_count += 1;
        label
    }

    fn print_node(&mut self, node: &mut Node) -> ScrambleResult<()> {
        if node.is(ANNOTATION) && !self.config.annotations.keeps(node) {
            if let Some(body) = node.children.first_mut() {
                return self.print_node(body);
            }
        }
        if let Some(operands) = &mut self.operands {
            operands.rewrite(node)?;
        }
        if node.needs_parens {
            write!(self.out, "(")?;
        }
        if !node.symbol.is_empty() {
            let renamed = if node.is_name {
                self.renaming.rename(&node.symbol)
            } else {
                None
            };
            match renamed {
                Some(name) => write!(self.out, "{}", name)?,
                None => write!(self.out, "{}", node.symbol)?,
            }
        }
        let label = if self.config.gen_unsat_core && node.is(ASSERT) {
            write!(self.out, " (!")?;
            Some(self.next_label())
        } else {
            None
        };
        let has_symbol = !node.symbol.is_empty();
        for (i, child) in node.children.iter_mut().enumerate() {
            if i > 0 || has_symbol {
                write!(self.out, " ")?;
            }
            self.print_node(child)?;
        }
        if let Some(label) = label {
            write!(self.out, " :named {})", label)?;
        }
        if node.needs_parens {
            write!(self.out, ")")?;
        }
        if node.is(CHECK_SAT) {
            if self.config.gen_unsat_core {
                write!(self.out, "\n(get-unsat-core)")?;
            }
            if self.config.gen_model {
                write!(self.out, "\n(get-model)")?;
            }
            if self.config.gen_proof {
                write!(self.out, "\n(get-proof)")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
fn print_all(config: PrinterConfig, renaming: Renaming<'_>, commands: Vec<Node>) -> String {
    let mut out = Vec::new();
    let mut count = 1;
    {
        let mut printer = Printer::new(&mut out, config, renaming, &mut count);
        for command in commands {
            printer.print_command(command).unwrap();
        }
    }
    String::from_utf8(out).unwrap()
}

#[cfg(test)]
fn annotated_assertion() -> Node {
    // (assert (! (forall ((x Int)) (p x)) :pattern ((p x))))
    let body = Node::command(
        "forall",
        vec![
            Node::list(vec![Node::application("x", vec![Node::name("Int")])]),
            Node::application("p", vec![Node::name("x")]),
        ],
    );
    let pattern = Node::attribute(
        PATTERN,
        Some(Node::list(vec![Node::application(
            "p",
            vec![Node::name("x")],
        )])),
    );
    Node::command(ASSERT, vec![Node::command(ANNOTATION, vec![body, pattern])])
}

#[test]
fn test_print_literal() {
    let commands = vec![
        Node::command("set-logic", vec![Node::leaf("QF_LIA")]),
        Node::command(
            "declare-fun",
            vec![Node::name("x"), Node::list(Vec::new()), Node::name("Int")],
        ),
        Node::command(
            ASSERT,
            vec![Node::application(">", vec![Node::name("x"), Node::leaf("0")])],
        ),
        Node::command(CHECK_SAT, Vec::new()),
    ];
    assert_eq!(
        print_all(PrinterConfig::default(), Renaming::Identity, commands),
        "(set-logic QF_LIA)\n(declare-fun x () Int)\n(assert (> x 0))\n(check-sat)\n"
    );
}

#[test]
fn test_annotation_modes() {
    let config = |annotations| PrinterConfig {
        annotations,
        ..PrinterConfig::default()
    };
    assert_eq!(
        print_all(
            config(AnnotationMode::All),
            Renaming::Identity,
            vec![annotated_assertion()]
        ),
        "(assert (! (forall ((x Int)) (p x)) :pattern ((p x))))\n"
    );
    assert_eq!(
        print_all(
            config(AnnotationMode::Pattern),
            Renaming::Identity,
            vec![annotated_assertion()]
        ),
        "(assert (! (forall ((x Int)) (p x)) :pattern ((p x))))\n"
    );
    assert_eq!(
        print_all(
            config(AnnotationMode::None),
            Renaming::Identity,
            vec![annotated_assertion()]
        ),
        "(assert (forall ((x Int)) (p x)))\n"
    );

    let named = Node::command(
        ASSERT,
        vec![Node::command(
            ANNOTATION,
            vec![
                Node::name("p"),
                Node::attribute(":named", Some(Node::name("a1"))),
            ],
        )],
    );
    assert_eq!(
        print_all(
            config(AnnotationMode::Pattern),
            Renaming::Identity,
            vec![named]
        ),
        "(assert p)\n"
    );
}

#[test]
fn test_unsat_core_labels_and_requests() {
    let config = PrinterConfig {
        gen_unsat_core: true,
        gen_model: true,
        gen_proof: true,
        ..PrinterConfig::default()
    };
    let commands = vec![
        Node::command(ASSERT, vec![Node::name("p")]),
        Node::command(ASSERT, vec![Node::name("q")]),
        Node::command(CHECK_SAT, Vec::new()),
    ];
    assert_eq!(
        print_all(config, Renaming::Identity, commands),
        "(assert (! p :named smtcomp1))\n\
         (assert (! q :named smtcomp2))\n\
         (check-sat)\n(get-unsat-core)\n(get-model)\n(get-proof)\n"
    );
}

#[test]
fn test_renaming() {
    use crate::prng::Prng;

    let mut registry = SymbolRegistry::default();
    registry.declare("x");
    registry.declare("|y|");
    let mut permutation = Permutation::default();
    // The single draw of seed 1 keeps the identity.
    permutation.extend(registry.next_id(), &mut Prng::new(1));
    let assertion = || {
        Node::command(
            ASSERT,
            vec![Node::application(
                "=",
                vec![Node::name("x"), Node::name("y"), Node::name("z")],
            )],
        )
    };
    assert_eq!(
        print_all(
            PrinterConfig::default(),
            Renaming::Permuted {
                registry: &registry,
                permutation: &permutation,
            },
            vec![assertion()]
        ),
        "(assert (= x1 x2 z))\n"
    );

    let mut first = SymbolRegistry::default();
    first.declare("y");
    first.declare("x");
    assert_eq!(
        print_all(
            PrinterConfig::default(),
            Renaming::FirstOccurrence { registry: &first },
            vec![assertion()]
        ),
        "(assert (= x2 x1 z))\n"
    );
}

#[test]
fn test_annotation_mode_from_str() {
    assert_eq!("true".parse::<AnnotationMode>(), Ok(AnnotationMode::All));
    assert_eq!("pattern".parse::<AnnotationMode>(), Ok(AnnotationMode::Pattern));
    assert_eq!("false".parse::<AnnotationMode>(), Ok(AnnotationMode::None));
    assert!("maybe".parse::<AnnotationMode>().is_err());
}
