// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

//! This crate provides a deterministic scrambler for SMT-LIB 2 benchmarks.
//!
//! Scrambling shuffles runs of declarations and assertions, renames declared
//! symbols to uniform names `x1`, `x2`, ..., and rewrites operands of
//! commutative and antisymmetric operators. All random choices are drawn
//! from a seeded generator, so the output only depends on the seed and the
//! input. A seed of 0 disables scrambling:
//!
//! ```
//! # fn main() -> smt2scrambler::error::ScrambleResult<()> {
//! use smt2scrambler::{scramble_stream, ParserConfig, ScramblerConfig};
//!
//! let config = ScramblerConfig {
//!     seed: Some(0),
//!     ..ScramblerConfig::default()
//! };
//! let input = b"(set-logic QF_LIA)(declare-fun x () Int)(assert (> x 0))(check-sat)";
//! let mut output = Vec::new();
//! scramble_stream(config, ParserConfig::default(), None, &input[..], &mut output)?;
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "(set-option :print-success false)\n\
//!      (set-logic QF_LIA)\n\
//!      (declare-fun x () Int)\n\
//!      (assert (> x 0))\n\
//!      (check-sat)\n"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Alternatively, assertions may be sorted by externally computed ranks
//! (`--ranks`), in which case symbols are numbered by order of first
//! occurrence in the sorted assertions.

#![forbid(unsafe_code)]

/// Buffer of the commands read since the last print pass.
pub mod buffer;
/// Error management.
pub mod error;
/// Tokenization of SMT2 scripts.
pub mod lexer;
/// Theories enabled by the logic of a script.
pub mod logic;
/// Symbol registries and permutation of identifiers.
pub mod names;
/// Commutative and antisymmetric operators.
pub mod operators;
/// Parsing of SMT2 scripts into command trees.
pub mod parser;
/// Reordering passes.
pub mod passes;
/// Serialization of command trees.
pub mod printer;
/// Pseudo-random generator.
pub mod prng;
/// Main scrambling module.
pub mod scrambler;
/// Command trees.
pub mod syntax;
/// Unsat-core filtering.
pub mod unsat_core;

pub use error::{Error, Result, ScrambleError, ScrambleResult};
pub use parser::{Parser, ParserConfig, ScriptVisitor};
pub use scrambler::{count_assertions, scramble_stream, Scrambler, ScramblerConfig};
pub use syntax::Node;
pub use unsat_core::UnsatCore;
