// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logic-conditioned tables of commutative and antisymmetric operators.

use crate::{
    error::ScrambleResult,
    logic::{Logic, LogicFlags},
    prng::Prng,
    syntax::Node,
};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// The operators that the scrambler knows how to rewrite. Any other symbol
/// is left alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum Operator {
    // Core
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "xor")]
    Xor,
    #[strum(serialize = "distinct")]
    Distinct,
    #[strum(serialize = "=")]
    Eq,
    // Arithmetic
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    // Bit-vectors
    #[strum(serialize = "bvand")]
    BvAnd,
    #[strum(serialize = "bvor")]
    BvOr,
    #[strum(serialize = "bvxor")]
    BvXor,
    #[strum(serialize = "bvnand")]
    BvNand,
    #[strum(serialize = "bvnor")]
    BvNor,
    #[strum(serialize = "bvcomp")]
    BvComp,
    #[strum(serialize = "bvadd")]
    BvAdd,
    #[strum(serialize = "bvmul")]
    BvMul,
    #[strum(serialize = "bvslt")]
    BvSlt,
    #[strum(serialize = "bvsle")]
    BvSle,
    #[strum(serialize = "bvsgt")]
    BvSgt,
    #[strum(serialize = "bvsge")]
    BvSge,
    #[strum(serialize = "bvult")]
    BvUlt,
    #[strum(serialize = "bvule")]
    BvUle,
    #[strum(serialize = "bvugt")]
    BvUgt,
    #[strum(serialize = "bvuge")]
    BvUge,
    // Floating point
    #[strum(serialize = "fp.eq")]
    FpEq,
    #[strum(serialize = "fp.add")]
    FpAdd,
    #[strum(serialize = "fp.mul")]
    FpMul,
    #[strum(serialize = "fp.lt")]
    FpLt,
    #[strum(serialize = "fp.leq")]
    FpLeq,
    #[strum(serialize = "fp.gt")]
    FpGt,
    #[strum(serialize = "fp.geq")]
    FpGeq,
}

impl Operator {
    /// Intern a raw symbol. Unknown symbols yield `None`.
    pub fn intern(symbol: &str) -> Option<Self> {
        symbol.parse().ok()
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether the operator is commutative whatever the logic.
    pub fn is_core_connective(self) -> bool {
        use Operator::*;
        matches!(self, And | Or | Xor | Distinct)
    }

    /// Whether the operator is an ordering comparison, i.e. may have a mirror.
    pub fn is_comparison(self) -> bool {
        use Operator::*;
        matches!(
            self,
            Lt | Le
                | Gt
                | Ge
                | BvSlt
                | BvSle
                | BvSgt
                | BvSge
                | BvUlt
                | BvUle
                | BvUgt
                | BvUge
                | FpLt
                | FpLeq
                | FpGt
                | FpGeq
        )
    }

    /// Index of the first operand from which the operator is commutative
    /// under the given theories.
    pub fn commutative_from(self, flags: LogicFlags) -> Option<usize> {
        use Operator::*;
        match self {
            _ if self.is_core_connective() => Some(0),
            Eq if !flags.difference => Some(0),
            Add | Mul if flags.arithmetic => Some(0),
            BvAnd | BvOr | BvXor | BvNand | BvNor | BvComp | BvAdd | BvMul
                if flags.bit_vectors =>
            {
                Some(0)
            }
            FpEq if flags.floating_point => Some(0),
            // Skip the rounding mode.
            FpAdd | FpMul if flags.floating_point => Some(1),
            _ => None,
        }
    }

    /// The operator `op'` such that `(op a b)` is equivalent to `(op' b a)`.
    pub fn mirror(self, flags: LogicFlags) -> Option<Self> {
        use Operator::*;
        let mirrored = match self {
            Lt if flags.arithmetic => Gt,
            Gt if flags.arithmetic => Lt,
            Le if flags.arithmetic => Ge,
            Ge if flags.arithmetic => Le,
            BvSlt if flags.bit_vectors => BvSgt,
            BvSle if flags.bit_vectors => BvSge,
            BvUlt if flags.bit_vectors => BvUgt,
            BvUle if flags.bit_vectors => BvUge,
            BvSgt if flags.bit_vectors => BvSlt,
            BvSge if flags.bit_vectors => BvSle,
            BvUgt if flags.bit_vectors => BvUlt,
            BvUge if flags.bit_vectors => BvUle,
            FpLeq if flags.floating_point => FpGeq,
            FpLt if flags.floating_point => FpGt,
            FpGeq if flags.floating_point => FpLeq,
            FpGt if flags.floating_point => FpLt,
            _ => return None,
        };
        Some(mirrored)
    }
}

/// Return the operand index from which the operands of `node` may be
/// reordered, or `None` if the operator is not commutative.
pub fn classify_commutative(node: &Node, logic: &Logic) -> ScrambleResult<Option<usize>> {
    let op = match node.operator() {
        Some(op) => op,
        None => return Ok(None),
    };
    if op.is_core_connective() {
        return Ok(Some(0));
    }
    Ok(op.commutative_from(logic.flags()?))
}

/// Draw a coin and, on success, return a zero-child node with the mirrored
/// operator of `node`. The caller must swap the two operands. The logic is
/// only required for comparisons.
pub fn flip_antisymmetric(
    node: &Node,
    scramble: bool,
    rng: &mut Prng,
    logic: &Logic,
) -> ScrambleResult<Option<Node>> {
    if !scramble || rng.next_rand_int(2) == 0 {
        return Ok(None);
    }
    let op = match node.operator() {
        Some(op) if op.is_comparison() => op,
        _ => return Ok(None),
    };
    Ok(op.mirror(logic.flags()?).map(|op| Node::leaf(op.as_str())))
}

/// Random operand rewriting of applications, performed while printing.
pub struct OperandScrambler<'a> {
    pub rng: &'a mut Prng,
    pub logic: &'a Logic,
}

impl OperandScrambler<'_> {
    /// Shuffle the commutative operands of `node`, then possibly flip a
    /// binary antisymmetric operator and swap its operands.
    pub fn rewrite(&mut self, node: &mut Node) -> ScrambleResult<()> {
        let offset = match node.operand_offset() {
            Some(offset) => offset,
            None => return Ok(()),
        };
        if let Some(from) = classify_commutative(node, self.logic)? {
            let start = offset + from;
            if start < node.children.len() {
                self.rng.shuffle(&mut node.children[start..]);
            }
        }
        if node.children.len() == offset + 2 {
            if let Some(mirrored) = flip_antisymmetric(node, true, self.rng, self.logic)? {
                node.replace_operator(mirrored);
                node.children.swap(offset, offset + 1);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
fn logic(name: &str) -> Logic {
    let mut logic = Logic::default();
    logic.set(name).unwrap();
    logic
}

#[test]
fn test_intern() {
    assert_eq!(Operator::intern("bvsge"), Some(Operator::BvSge));
    assert_eq!(Operator::intern("fp.leq"), Some(Operator::FpLeq));
    assert_eq!(Operator::intern("foo"), None);
    for op in <Operator as strum::IntoEnumIterator>::iter() {
        assert_eq!(Operator::intern(op.as_str()), Some(op));
    }
}

#[test]
fn test_mirror_is_an_involution() {
    let flags = LogicFlags {
        difference: false,
        arithmetic: true,
        bit_vectors: true,
        floating_point: true,
    };
    for op in <Operator as strum::IntoEnumIterator>::iter() {
        if let Some(mirrored) = op.mirror(flags) {
            assert_ne!(mirrored, op);
            assert_eq!(mirrored.mirror(flags), Some(op));
        }
        assert_eq!(op.mirror(flags).is_some(), op.is_comparison());
    }
}

#[test]
fn test_flip_without_logic() {
    let and = Node::application("and", vec![Node::name("p"), Node::name("q")]);
    let lt = Node::application("<", vec![Node::name("x"), Node::name("y")]);
    // Seed 7 draws 0, 0, 1: the third coin succeeds.
    let mut rng = Prng::new(7);
    rng.next_rand_int(2);
    rng.next_rand_int(2);
    let mut again = rng.clone();
    assert_eq!(
        flip_antisymmetric(&and, true, &mut rng, &Logic::default()).unwrap(),
        None
    );
    assert!(flip_antisymmetric(&lt, true, &mut again, &Logic::default()).is_err());
}

#[test]
fn test_commutativity_depends_on_logic() {
    let eq = Node::application("=", vec![Node::name("a"), Node::name("b")]);
    assert_eq!(classify_commutative(&eq, &logic("QF_LIA")).unwrap(), Some(0));
    assert_eq!(classify_commutative(&eq, &logic("QF_IDL")).unwrap(), None);

    let add = Node::application("+", vec![Node::name("a"), Node::name("b")]);
    assert_eq!(classify_commutative(&add, &logic("QF_LRA")).unwrap(), Some(0));
    assert_eq!(classify_commutative(&add, &logic("QF_BV")).unwrap(), None);

    let fp_add = Node::application(
        "fp.add",
        vec![Node::name("RNE"), Node::name("a"), Node::name("b")],
    );
    assert_eq!(classify_commutative(&fp_add, &logic("QF_FP")).unwrap(), Some(1));

    let and = Node::application("and", vec![Node::name("p"), Node::name("q")]);
    assert_eq!(classify_commutative(&and, &logic("QF_UF")).unwrap(), Some(0));
    assert_eq!(classify_commutative(&and, &Logic::default()).unwrap(), Some(0));
    let distinct = Node::application("distinct", vec![Node::name("a"), Node::name("b")]);
    assert_eq!(classify_commutative(&distinct, &Logic::default()).unwrap(), Some(0));
    assert!(classify_commutative(&eq, &Logic::default()).is_err());
    let f = Node::application("f", vec![Node::name("a"), Node::name("b")]);
    assert_eq!(classify_commutative(&f, &Logic::default()).unwrap(), None);
}

#[test]
fn test_flip_antisymmetric() {
    let node = Node::application("bvult", vec![Node::name("a"), Node::name("b")]);
    let bv = logic("QF_BV");
    assert_eq!(
        flip_antisymmetric(&node, false, &mut Prng::new(7), &bv).unwrap(),
        None
    );
    // Seed 7 draws 0, 0, 1: the third coin succeeds.
    let mut rng = Prng::new(7);
    assert_eq!(flip_antisymmetric(&node, true, &mut rng, &bv).unwrap(), None);
    assert_eq!(flip_antisymmetric(&node, true, &mut rng, &bv).unwrap(), None);
    assert_eq!(
        flip_antisymmetric(&node, true, &mut rng, &bv).unwrap(),
        Some(Node::leaf("bvugt"))
    );
    // No mirror outside of the bit-vector logics.
    assert_eq!(
        flip_antisymmetric(&node, true, &mut rng, &logic("QF_LIA")).unwrap(),
        None
    );
}

#[test]
fn test_operand_scrambler_preserves_operands() {
    let lia = logic("QF_LIA");
    for seed in 1..20 {
        let mut rng = Prng::new(seed);
        let mut scrambler = OperandScrambler {
            rng: &mut rng,
            logic: &lia,
        };
        let mut node = Node::application("<", vec![Node::name("a"), Node::name("b")]);
        scrambler.rewrite(&mut node).unwrap();
        match node.symbol.as_str() {
            "<" => assert_eq!(node.children[0].symbol, "a"),
            ">" => assert_eq!(node.children[0].symbol, "b"),
            s => panic!("unexpected operator {}", s),
        }

        let mut node = Node::application(
            "+",
            vec![Node::name("a"), Node::name("b"), Node::name("c")],
        );
        scrambler.rewrite(&mut node).unwrap();
        let mut operands: Vec<_> = node.children.iter().map(|c| c.symbol.clone()).collect();
        operands.sort();
        assert_eq!(operands, vec!["a", "b", "c"]);
        assert_eq!(node.symbol, "+");
    }
}
