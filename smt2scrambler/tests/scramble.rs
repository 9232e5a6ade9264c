// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

use smt2scrambler::{
    count_assertions, printer::AnnotationMode, scramble_stream, ParserConfig, ScrambleError,
    ScrambleResult, ScramblerConfig,
};
use std::{collections::BTreeSet, path::PathBuf};

fn try_scramble(config: ScramblerConfig, input: &str) -> ScrambleResult<String> {
    let mut output = Vec::new();
    scramble_stream(
        config,
        ParserConfig::default(),
        Some("test.smt2".to_string()),
        input.as_bytes(),
        &mut output,
    )?;
    Ok(String::from_utf8(output).unwrap())
}

fn scramble(config: ScramblerConfig, input: &str) -> String {
    try_scramble(config, input).unwrap()
}

/// Configuration without prologue.
fn seeded(seed: u64) -> ScramblerConfig {
    ScramblerConfig {
        seed: Some(seed),
        incremental: true,
        ..ScramblerConfig::default()
    }
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path =
        std::env::temp_dir().join(format!("smt2scrambler-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

const LIA_SCRIPT: &str = r#"
(set-info :status unsat)
(set-logic QF_LIA)
(declare-fun f () Int)
(declare-fun g () Int)
(declare-fun x () Int)
(declare-fun y () Int)
(declare-fun a () Int)
(declare-fun b () Int)
(assert (= x y))
(assert (> a b))
(assert (and (<= (+ f g 1) x) (distinct a b f)))
(check-sat)
(exit)
"#;

#[test]
fn test_scrambling_disabled_preserves_input() {
    let output = scramble(
        ScramblerConfig {
            seed: Some(0),
            ..ScramblerConfig::default()
        },
        LIA_SCRIPT,
    );
    let expected = std::iter::once("(set-option :print-success false)")
        .chain(LIA_SCRIPT.trim().lines())
        .map(|l| format!("{}\n", l))
        .collect::<String>();
    assert_eq!(output, expected);
}

#[test]
fn test_same_seed_same_output() {
    for seed in &[1, 7, 2024, 123_456_789] {
        let first = scramble(seeded(*seed), LIA_SCRIPT);
        let second = scramble(seeded(*seed), LIA_SCRIPT);
        assert_eq!(first, second);
        assert!(!first.contains("(declare-fun f "));
    }
}

#[test]
fn test_assertion_runs_are_shuffled() {
    let input = "(set-logic QF_UF)(assert true)(assert false)";
    // The first draw of seed 1 is even, the first draw of seed 42 is odd.
    assert_eq!(
        scramble(seeded(1), input),
        "(set-logic QF_UF)\n(assert false)\n(assert true)\n"
    );
    assert_eq!(
        scramble(seeded(42), input),
        "(set-logic QF_UF)\n(assert true)\n(assert false)\n"
    );
}

#[test]
fn test_two_declarations() {
    let input = "(set-logic QF_UF)(declare-fun f () Bool)(declare-fun g () Bool)";
    for seed in 1..10 {
        let output = scramble(seeded(seed), input);
        assert_eq!(output, scramble(seeded(seed), input));
        let lines: BTreeSet<_> = output.lines().skip(1).collect();
        let expected: BTreeSet<_> = vec!["(declare-fun x1 () Bool)", "(declare-fun x2 () Bool)"]
            .into_iter()
            .collect();
        assert_eq!(lines, expected);
    }
}

#[test]
fn test_renaming_is_bijective() {
    let mut input = String::from("(set-logic QF_LIA)\n");
    for i in 0..10 {
        input.push_str(&format!("(declare-const v{} Int)\n", i));
    }
    input.push_str("(assert (< v0 v1 v2 v3 v4 v5 v6 v7 v8 v9))\n(check-sat)\n");

    for seed in &[3, 99, 5000] {
        let output = scramble(seeded(*seed), &input);
        let names: Vec<_> = output
            .lines()
            .filter_map(|l| l.strip_prefix("(declare-const "))
            .map(|l| l.trim_end_matches(" Int)").to_string())
            .collect();
        assert_eq!(names.len(), 10);
        let distinct: BTreeSet<_> = names.iter().cloned().collect();
        let expected: BTreeSet<_> = (1..=10).map(|i| format!("x{}", i)).collect();
        assert_eq!(distinct, expected);
        assert!(!output.contains('v'));
    }
}

#[test]
fn test_antisymmetric_operators_are_flipped() {
    let input = "(set-logic QF_LIA)(declare-const x Int)(declare-const y Int)(assert (< x y))";
    let flipped = (1..30)
        .filter(|seed| scramble(seeded(*seed), input).contains("(assert (> "))
        .count();
    assert!(flipped > 0 && flipped < 29);
    // Without an arithmetic logic, `<` is left alone.
    let input = "(set-logic QF_UF)(declare-const x Int)(declare-const y Int)(assert (< x y))";
    for seed in 1..10 {
        assert!(scramble(seeded(seed), input).contains("(assert (< "));
    }
}

#[test]
fn test_ranks_reorder_assertions() {
    let ranks = temp_file("ranks-reorder", "0.9\n0.1\n");
    let input = "(set-logic QF_UF)(declare-const A Bool)(declare-const B Bool)(assert A)(assert B)(check-sat)";
    let config = ScramblerConfig {
        ranks: Some(ranks.clone()),
        ..seeded(0)
    };
    assert_eq!(
        scramble(config, input),
        "(set-logic QF_UF)\n\
         (declare-const B Bool)\n\
         (declare-const A Bool)\n\
         (assert B)\n\
         (assert A)\n\
         (check-sat)\n"
    );

    // Names follow the first occurrences in the sorted assertions.
    let config = ScramblerConfig {
        ranks: Some(ranks.clone()),
        ..seeded(5)
    };
    assert_eq!(
        scramble(config, input),
        "(set-logic QF_UF)\n\
         (declare-const x1 Bool)\n\
         (declare-const x2 Bool)\n\
         (assert x1)\n\
         (assert x2)\n\
         (check-sat)\n"
    );
    std::fs::remove_file(ranks).unwrap();
}

#[test]
fn test_invalid_ranks_keep_order() {
    let input = "(set-logic QF_UF)(declare-const A Bool)(declare-const B Bool)(assert A)(assert B)";
    let expected = "(set-logic QF_UF)\n(declare-const A Bool)\n(declare-const B Bool)\n(assert A)\n(assert B)\n";

    let missing = std::env::temp_dir().join("smt2scrambler-no-such-ranks-file");
    let config = ScramblerConfig {
        ranks: Some(missing),
        ..seeded(0)
    };
    assert_eq!(scramble(config, input), expected);

    let ranks = temp_file("ranks-short", "0.9\n");
    let config = ScramblerConfig {
        ranks: Some(ranks.clone()),
        ..seeded(0)
    };
    assert_eq!(scramble(config, input), expected);
    std::fs::remove_file(ranks).unwrap();
}

#[test]
fn test_ranks_require_a_single_assertion_run() {
    let ranks = temp_file("ranks-runs", "0.5\n0.5\n");
    let config = ScramblerConfig {
        ranks: Some(ranks.clone()),
        ..seeded(0)
    };
    let result = try_scramble(
        config,
        "(set-logic QF_UF)(declare-const p Bool)(assert p)(push 1)(assert (not p))",
    );
    assert!(matches!(result, Err(ScrambleError::MultipleAssertionRuns)));
    std::fs::remove_file(ranks).unwrap();
}

#[test]
fn test_ranks_require_a_single_declaration_run() {
    let ranks = temp_file("ranks-declarations", "0.5\n0.5\n");
    let config = ScramblerConfig {
        ranks: Some(ranks.clone()),
        ..seeded(0)
    };
    let result = try_scramble(
        config,
        "(set-logic QF_UF)(declare-const a Bool)(push 1)(declare-const b Bool)(assert a)(assert b)",
    );
    assert!(matches!(result, Err(ScrambleError::MultipleDeclarationRuns)));
    std::fs::remove_file(ranks).unwrap();
}

#[test]
fn test_connectives_without_logic() {
    let input = "(declare-const p Bool)(declare-const q Bool)(assert (and p q))(assert (distinct p q))(check-sat)";
    for seed in 1..20 {
        let output = scramble(seeded(seed), input);
        assert!(output.contains("(assert (and x"));
        assert!(output.contains("(assert (distinct x"));
    }
    // Comparisons depend on the logic.
    let input = "(declare-const x Int)(declare-const y Int)(assert (< x y))";
    let failures = (1..20)
        .filter(|seed| matches!(try_scramble(seeded(*seed), input), Err(ScrambleError::LogicNotSet)))
        .count();
    assert!(failures > 0);
}

#[test]
fn test_core_filtering() {
    let core = temp_file("core", "unsat\n(a3 a1)\n");
    let config = ScramblerConfig {
        core: Some(core.clone()),
        ..seeded(0)
    };
    let output = scramble(
        config,
        r#"
(set-logic QF_UF)
(declare-const p Bool)
(assert (! p :named a1))
(assert (! (not p) :named a2))
(assert (or p (not p)))
(assert (! (and p p) :named |a3|))
(check-sat)
"#,
    );
    assert_eq!(
        output,
        ";; parsed 2 names: a1 a3\n\
         (set-logic QF_UF)\n\
         (declare-const p Bool)\n\
         (assert (! p :named a1))\n\
         (assert (or p (not p)))\n\
         (assert (! (and p p) :named |a3|))\n\
         (check-sat)\n"
    );
    std::fs::remove_file(core).unwrap();
}

#[test]
fn test_malformed_core_is_fatal() {
    let core = temp_file("bad-core", "sat\n");
    let config = ScramblerConfig {
        core: Some(core.clone()),
        ..seeded(0)
    };
    let result = try_scramble(config, "(set-logic QF_UF)(check-sat)");
    assert!(matches!(result, Err(ScrambleError::MalformedCore(_))));
    std::fs::remove_file(core).unwrap();
}

#[test]
fn test_stripped_annotations_stay_stripped() {
    let config = || ScramblerConfig {
        term_annot: AnnotationMode::None,
        ..seeded(0)
    };
    let input = "(set-logic UF)(declare-fun p (Int) Bool)\
                 (assert (! (forall ((x Int)) (! (p x) :pattern ((p x)))) :named q))";
    let once = scramble(config(), input);
    assert_eq!(
        once,
        "(set-logic UF)\n(declare-fun p (Int) Bool)\n(assert (forall ((x Int)) (p x)))\n"
    );
    assert_eq!(scramble(config(), &once), once);
}

#[test]
fn test_unsat_core_requests() {
    let config = ScramblerConfig {
        gen_unsat_core: true,
        ..seeded(0)
    };
    let output = scramble(
        config,
        "(set-logic QF_UF)(declare-const p Bool)(assert p)(check-sat)(assert (not p))(check-sat)",
    );
    assert_eq!(
        output,
        "(set-option :produce-unsat-cores true)\n\
         (set-logic QF_UF)\n\
         (declare-const p Bool)\n\
         (assert (! p :named smtcomp1))\n\
         (check-sat)\n\
         (get-unsat-core)\n\
         (assert (! (not p) :named smtcomp2))\n\
         (check-sat)\n\
         (get-unsat-core)\n"
    );
}

#[test]
fn test_reader_errors_are_positioned() {
    let result = try_scramble(seeded(0), "(set-logic QF_UF)\n(assert (and p q)\n");
    match result {
        Err(ScrambleError::Input(e)) => {
            assert!(e.to_string().starts_with("test.smt2:"));
        }
        _ => panic!("expected an input error"),
    }
}

#[test]
fn test_count_assertions() {
    let mut output = Vec::new();
    let count = count_assertions(
        seeded(0),
        ParserConfig::default(),
        None,
        LIA_SCRIPT.as_bytes(),
        &mut output,
    )
    .unwrap();
    assert_eq!(count, 3);
}
