// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The scrambling context and the print passes.

use structopt::StructOpt;

use crate::{
    buffer::CommandBuffer,
    error::{RawResult, ScrambleError, ScrambleResult},
    lexer::Lexer,
    logic::Logic,
    names::{Permutation, SymbolRegistry},
    operators::{self, OperandScrambler},
    parser::{Parser, ParserConfig, ScriptVisitor},
    passes::{self, RunKind},
    printer::{AnnotationMode, Printer, PrinterConfig, Renaming},
    prng::Prng,
    syntax::{Node, ASSERT, CHECK_SAT},
    unsat_core::{self, UnsatCore},
};
use std::{
    io::{BufRead, Write},
    ops::Range,
    path::{Path, PathBuf},
};

// https://github.com/TeXitoi/structopt/issues/333
#[cfg_attr(not(doc), allow(missing_docs))]
#[cfg_attr(doc, doc = "Configuration of the scrambling passes and of the output.")]
#[derive(Debug, Default, Clone, StructOpt)]
pub struct ScramblerConfig {
    /// Seed of the random generator. 0 disables scrambling. Defaults to the current time.
    #[structopt(long)]
    pub seed: Option<u64>,

    /// Which term annotations to print: true, pattern or false.
    #[structopt(long, default_value = "true")]
    pub term_annot: AnnotationMode,

    /// Answer of a solver to (get-unsat-core). Named assertions outside of the core are dropped.
    #[structopt(long, parse(from_os_str))]
    pub core: Option<PathBuf>,

    /// Ranks of the assertions, one per line. Assertions are sorted by rank and names are
    /// assigned by order of first occurrence.
    #[structopt(long, parse(from_os_str))]
    pub ranks: Option<PathBuf>,

    /// Do not disable :print-success.
    #[structopt(long)]
    pub incremental: bool,

    /// Name every assertion and request an unsat core after each check-sat.
    #[structopt(long)]
    pub gen_unsat_core: bool,

    /// Request a model after each check-sat.
    #[structopt(long)]
    pub gen_model_val: bool,

    /// Request a proof after each check-sat.
    #[structopt(long)]
    pub gen_proof: bool,

    /// Only count the assertions of the input.
    #[structopt(long)]
    pub count_asserts: bool,
}

fn current_time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1)
}

/// State shared by all the passes of a run.
#[derive(Debug)]
pub struct Scrambler {
    config: ScramblerConfig,
    scramble: bool,
    rng: Prng,
    logic: Logic,
    /// Identifiers in order of declaration.
    names: SymbolRegistry,
    /// Identifiers in order of first occurrence in the ranked assertions.
    first_occurrence: SymbolRegistry,
    permutation: Permutation,
    commands: CommandBuffer,
    annotation_count: u64,
}

impl Scrambler {
    pub fn new(config: ScramblerConfig) -> Self {
        let seed = config.seed.unwrap_or_else(current_time_seed);
        Self {
            config,
            scramble: seed != 0,
            rng: Prng::new(seed),
            logic: Logic::default(),
            names: SymbolRegistry::default(),
            first_occurrence: SymbolRegistry::default(),
            permutation: Permutation::default(),
            commands: CommandBuffer::default(),
            annotation_count: 1,
        }
    }

    pub fn is_scrambling(&self) -> bool {
        self.scramble
    }

    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    /// Options printed before the first command.
    pub fn write_prologue<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if !self.config.incremental && !self.config.count_asserts {
            writeln!(out, "(set-option :print-success false)")?;
        }
        if self.config.gen_unsat_core {
            writeln!(out, "(set-option :produce-unsat-cores true)")?;
        }
        if self.config.gen_model_val {
            writeln!(out, "(set-option :produce-models true)")?;
        }
        if self.config.gen_proof {
            writeln!(out, "(set-option :produce-proofs true)")?;
        }
        Ok(())
    }

    fn printer_config(&self) -> PrinterConfig {
        PrinterConfig {
            annotations: self.config.term_annot,
            gen_unsat_core: self.config.gen_unsat_core,
            gen_model: self.config.gen_model_val,
            gen_proof: self.config.gen_proof,
        }
    }

    /// Shuffle the buffered commands in `range`, unless scrambling is disabled.
    pub fn shuffle_range(&mut self, range: Range<usize>) {
        if self.scramble {
            self.rng.shuffle(&mut self.commands.as_mut_vec()[range]);
        }
    }

    /// Shuffle every run of consecutive declarations of the same kind and
    /// every run of consecutive assertions.
    pub fn shuffle_runs(&mut self) {
        for run in passes::find_runs(self.commands.as_slice(), RunKind::classify) {
            if run.len() > 1 {
                self.shuffle_range(run.start..run.end);
            }
        }
    }

    /// Permute the identifiers declared since the last print pass.
    pub fn extend_permutation(&mut self) {
        if self.scramble {
            self.permutation.extend(self.names.next_id(), &mut self.rng);
        }
    }

    pub fn classify_commutative(&self, node: &Node) -> ScrambleResult<Option<usize>> {
        operators::classify_commutative(node, &self.logic)
    }

    pub fn flip_antisymmetric(&mut self, node: &Node) -> ScrambleResult<Option<Node>> {
        operators::flip_antisymmetric(node, self.scramble, &mut self.rng, &self.logic)
    }

    /// Drop the named assertions that are not in `core`.
    pub fn filter_named(&mut self, core: &UnsatCore) -> usize {
        unsat_core::filter_named(&mut self.commands, core)
    }

    fn print_commands<W: Write>(&mut self, out: &mut W, ranked: bool) -> ScrambleResult<()> {
        tracing::debug!(
            "Printing {} commands (logic: {})",
            self.commands.len(),
            self.logic.name().unwrap_or("unset")
        );
        let config = self.printer_config();
        let renaming = match (self.scramble, ranked) {
            (false, _) => Renaming::Identity,
            (true, false) => Renaming::Permuted {
                registry: &self.names,
                permutation: &self.permutation,
            },
            (true, true) => Renaming::FirstOccurrence {
                registry: &self.first_occurrence,
            },
        };
        let mut printer = Printer::new(out, config, renaming, &mut self.annotation_count);
        if self.scramble {
            printer = printer.with_operands(OperandScrambler {
                rng: &mut self.rng,
                logic: &self.logic,
            });
        }
        for command in self.commands.drain() {
            printer.print_command(command)?;
        }
        Ok(())
    }

    /// Shuffle, rename with the permuted declaration-order identifiers, and
    /// print all buffered commands.
    pub fn print_scrambled<W: Write>(&mut self, out: &mut W) -> ScrambleResult<()> {
        if self.is_scrambling() {
            self.shuffle_runs();
            self.extend_permutation();
        }
        self.print_commands(out, false)
    }

    /// Sort the assertions by rank, sort the declarations by first
    /// occurrence in the sorted assertions, rename accordingly, and print
    /// all buffered commands.
    pub fn print_ranked<W: Write>(&mut self, out: &mut W) -> ScrambleResult<()> {
        let assertions = passes::single_run(self.commands.as_slice(), passes::is_assertion, || {
            ScrambleError::MultipleAssertionRuns
        })?;
        if let Some(range) = assertions {
            let ranks = match &self.config.ranks {
                Some(path) => read_ranks(path, range.len()),
                None => vec![0.0; range.len()],
            };
            if range.len() > 1 {
                passes::reorder_by_ranks(self.commands.as_mut_vec(), range, &ranks);
            }
        }

        for command in self.commands.iter().filter(|c| c.is(ASSERT)) {
            passes::assign_first_occurrence(command, &mut self.first_occurrence);
        }

        let declarations =
            passes::single_run(self.commands.as_slice(), passes::is_declaration, || {
                ScrambleError::MultipleDeclarationRuns
            })?;
        if let Some(range) = declarations {
            if range.len() > 1 {
                passes::sort_declarations(
                    self.commands.as_mut_vec(),
                    range,
                    &self.first_occurrence,
                );
            }
        }
        self.print_commands(out, true)
    }

    /// Run the print pass selected by the configuration.
    pub fn print<W: Write>(&mut self, out: &mut W) -> ScrambleResult<()> {
        if self.config.ranks.is_some() {
            self.print_ranked(out)
        } else {
            self.print_scrambled(out)
        }
    }

    /// Filter the buffered commands against `core` (if any) and print the
    /// remaining ones.
    pub fn flush<W: Write>(&mut self, core: Option<&UnsatCore>, out: &mut W) -> ScrambleResult<()> {
        if let Some(core) = core {
            self.filter_named(core);
        }
        if self.commands.is_empty() {
            return Ok(());
        }
        self.print(out)
    }
}

impl ScriptVisitor for Scrambler {
    fn declare_name(&mut self, symbol: &str) {
        self.names.declare(symbol);
    }

    fn set_logic(&mut self, logic: &str) -> RawResult<()> {
        self.logic.set(logic)
    }

    fn add_command(&mut self, command: Node) -> RawResult<()> {
        self.commands.push(command);
        Ok(())
    }
}

/// Read `count` ranks from `path`. On failure, warn and return neutral
/// ranks so that the assertions keep their order.
pub fn read_ranks(path: &Path, count: usize) -> Vec<f32> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Cannot read ranks file {}: {}", path.display(), e);
            return vec![0.0; count];
        }
    };
    let ranks = text
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<Vec<f32>, _>>();
    match ranks {
        Ok(ranks) if ranks.len() == count => {
            tracing::info!("Using {} ranks from {}", count, path.display());
            ranks
        }
        Ok(ranks) => {
            tracing::warn!(
                "Expected {} ranks in {}, found {}",
                count,
                path.display(),
                ranks.len()
            );
            vec![0.0; count]
        }
        Err(e) => {
            tracing::warn!("Invalid rank in {}: {}", path.display(), e);
            vec![0.0; count]
        }
    }
}

fn load_core<W: Write>(config: &ScramblerConfig, out: &mut W) -> ScrambleResult<Option<UnsatCore>> {
    match &config.core {
        Some(path) => {
            let core = UnsatCore::read(path)?;
            core.write_summary(out)?;
            Ok(Some(core))
        }
        None => Ok(None),
    }
}

/// Scramble the SMT2 script `input` into `output`. Commands are printed
/// after each `check-sat` and at the end of the input.
pub fn scramble_stream<R, W>(
    config: ScramblerConfig,
    parser_config: ParserConfig,
    path_name: Option<String>,
    input: R,
    output: &mut W,
) -> ScrambleResult<()>
where
    R: BufRead,
    W: Write,
{
    let core = load_core(&config, output)?;
    let scrambler = Scrambler::new(config);
    scrambler.write_prologue(output)?;
    let mut parser = Parser::new(parser_config, Lexer::new(path_name, input), scrambler);
    while parser.parse_command()? {
        if parser.state().commands().ends_with(CHECK_SAT) {
            parser.state_mut().flush(core.as_ref(), output)?;
        }
    }
    parser.state_mut().flush(core.as_ref(), output)?;
    output.flush()?;
    Ok(())
}

/// Read the whole script and return its number of assertions. Only the
/// prologue is printed.
pub fn count_assertions<R, W>(
    config: ScramblerConfig,
    parser_config: ParserConfig,
    path_name: Option<String>,
    input: R,
    output: &mut W,
) -> ScrambleResult<usize>
where
    R: BufRead,
    W: Write,
{
    load_core(&config, output)?;
    let scrambler = Scrambler::new(config);
    scrambler.write_prologue(output)?;
    let mut parser = Parser::new(parser_config, Lexer::new(path_name, input), scrambler);
    parser.parse()?;
    output.flush()?;
    Ok(parser.state().commands().count(ASSERT))
}

#[cfg(test)]
fn unscrambled() -> ScramblerConfig {
    ScramblerConfig {
        seed: Some(0),
        ..ScramblerConfig::default()
    }
}

#[cfg(test)]
fn run(config: ScramblerConfig, input: &str) -> String {
    let mut out = Vec::new();
    scramble_stream(config, ParserConfig::default(), None, input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_prologue() {
    let mut config = ScramblerConfig {
        gen_unsat_core: true,
        gen_model_val: true,
        gen_proof: true,
        ..unscrambled()
    };
    let mut out = Vec::new();
    Scrambler::new(config.clone()).write_prologue(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "(set-option :print-success false)\n\
         (set-option :produce-unsat-cores true)\n\
         (set-option :produce-models true)\n\
         (set-option :produce-proofs true)\n"
    );
    config.incremental = true;
    config.gen_model_val = false;
    let mut out = Vec::new();
    Scrambler::new(config).write_prologue(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "(set-option :produce-unsat-cores true)\n(set-option :produce-proofs true)\n"
    );
}

#[test]
fn test_flush_at_check_sat() {
    let config = ScramblerConfig {
        incremental: true,
        gen_unsat_core: true,
        ..unscrambled()
    };
    let output = run(
        config,
        "(set-logic QF_UF)(declare-const p Bool)(push 1)(assert p)(check-sat)(pop 1)(assert (not p))(check-sat)",
    );
    assert_eq!(
        output,
        "(set-option :produce-unsat-cores true)\n\
         (set-logic QF_UF)\n\
         (declare-const p Bool)\n\
         (push 1)\n\
         (assert (! p :named smtcomp1))\n\
         (check-sat)\n(get-unsat-core)\n\
         (pop 1)\n\
         (assert (! (not p) :named smtcomp2))\n\
         (check-sat)\n(get-unsat-core)\n"
    );
}

#[test]
fn test_shuffle_range_is_noop_without_scrambling() {
    let mut scrambler = Scrambler::new(unscrambled());
    for name in &["a", "b", "c"] {
        scrambler
            .add_command(Node::command(ASSERT, vec![Node::name(*name)]))
            .unwrap();
    }
    scrambler.shuffle_runs();
    scrambler.extend_permutation();
    let order: Vec<_> = scrambler
        .commands()
        .iter()
        .map(|c| c.children[0].symbol.as_str())
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    assert!(!scrambler.is_scrambling());
}

#[test]
fn test_permutation_survives_print_passes() {
    let mut scrambler = Scrambler::new(ScramblerConfig {
        seed: Some(12345),
        ..ScramblerConfig::default()
    });
    scrambler.set_logic("QF_UF").unwrap();
    let declare = |scrambler: &mut Scrambler, name: &str| {
        scrambler.declare_name(name);
        scrambler
            .add_command(Node::command(
                "declare-const",
                vec![Node::name(name), Node::name("Bool")],
            ))
            .unwrap();
    };
    declare(&mut scrambler, "a");
    declare(&mut scrambler, "b");
    let mut out = Vec::new();
    scrambler.print_scrambled(&mut out).unwrap();
    assert!(scrambler.commands().is_empty());
    let first: Vec<_> = (1..3).map(|i| scrambler.permutation.get(i)).collect();

    declare(&mut scrambler, "c");
    scrambler.print_scrambled(&mut out).unwrap();
    let again: Vec<_> = (1..3).map(|i| scrambler.permutation.get(i)).collect();
    assert_eq!(first, again);
    assert_eq!(scrambler.permutation.len(), 4);

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.lines().count(), 3);
    assert!(output.lines().all(|l| l.starts_with("(declare-const x") && l.ends_with(" Bool)")));
}

#[test]
fn test_flip_requires_scrambling() {
    let mut scrambler = Scrambler::new(unscrambled());
    scrambler.set_logic("QF_LIA").unwrap();
    let node = Node::application("<", vec![Node::name("x"), Node::name("y")]);
    for _ in 0..10 {
        assert_eq!(scrambler.flip_antisymmetric(&node).unwrap(), None);
    }
    assert_eq!(scrambler.classify_commutative(&node).unwrap(), None);
    let add = Node::application("+", vec![Node::name("x"), Node::name("y")]);
    assert_eq!(scrambler.classify_commutative(&add).unwrap(), Some(0));
}

#[test]
fn test_ranked_requires_single_assertion_run() {
    let mut scrambler = Scrambler::new(unscrambled());
    for symbol in &[ASSERT, "push", ASSERT] {
        scrambler
            .add_command(Node::command(*symbol, vec![Node::name("p")]))
            .unwrap();
    }
    let mut out = Vec::new();
    assert!(matches!(
        scrambler.print_ranked(&mut out),
        Err(ScrambleError::MultipleAssertionRuns)
    ));
}

#[test]
fn test_count_assertions() {
    let config = ScramblerConfig {
        count_asserts: true,
        ..unscrambled()
    };
    let mut out = Vec::new();
    let count = count_assertions(
        config,
        ParserConfig::default(),
        None,
        "(set-logic QF_UF)(declare-const p Bool)(assert p)(check-sat)(assert (not p))(check-sat)"
            .as_bytes(),
        &mut out,
    )
    .unwrap();
    assert_eq!(count, 2);
    assert!(out.is_empty());
}
