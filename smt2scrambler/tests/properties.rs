// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

use proptest::prelude::*;
use smt2scrambler::{
    names::Permutation, passes::reorder_by_ranks, prng::Prng, scramble_stream, ParserConfig,
    ScramblerConfig,
};

const SCRIPT: &str = r#"
(set-logic QF_ABV)
(declare-fun m () (Array (_ BitVec 4) (_ BitVec 4)))
(declare-fun a () (_ BitVec 4))
(declare-fun b () (_ BitVec 4))
(declare-fun c () (_ BitVec 4))
(assert (bvult (bvadd a b c) (select m a)))
(assert (= ((_ extract 1 0) a) ((_ extract 1 0) b)))
(assert (bvsge (bvand a c) (bvxor b c)))
(check-sat)
"#;

fn scramble(seed: u64) -> String {
    let config = ScramblerConfig {
        seed: Some(seed),
        ..ScramblerConfig::default()
    };
    let mut output = Vec::new();
    scramble_stream(
        config,
        ParserConfig::default(),
        None,
        SCRIPT.as_bytes(),
        &mut output,
    )
    .unwrap();
    String::from_utf8(output).unwrap()
}

proptest! {
    #[test]
    fn shuffle_preserves_elements(
        seed in any::<u64>(),
        items in prop::collection::vec(any::<u8>(), 0..50),
    ) {
        let mut shuffled = items.clone();
        Prng::new(seed).shuffle(&mut shuffled);
        let mut sorted = items;
        sorted.sort_unstable();
        shuffled.sort_unstable();
        prop_assert_eq!(sorted, shuffled);
    }

    #[test]
    fn permutation_is_bijective_and_frozen(
        seed in any::<u64>(),
        steps in prop::collection::vec(0usize..20, 1..6),
    ) {
        let mut rng = Prng::new(seed);
        let mut permutation = Permutation::default();
        let mut next_id = 1;
        let mut previous: Vec<usize> = Vec::new();
        for step in steps {
            next_id += step;
            permutation.extend(next_id, &mut rng);
            prop_assert_eq!(permutation.get(0), Some(0));
            let targets: Vec<_> = (1..next_id).map(|i| permutation.get(i).unwrap()).collect();
            prop_assert_eq!(&targets[..previous.len()], &previous[..]);
            let mut sorted = targets.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (1..next_id).collect::<Vec<_>>());
            previous = targets;
        }
    }

    #[test]
    fn rank_reorder_sorts_indices(ranks in prop::collection::vec(-20i32..20, 0..40)) {
        let ranks: Vec<f32> = ranks.into_iter().map(|r| r as f32 / 4.0).collect();
        let n = ranks.len();
        let mut items: Vec<usize> = (0..n).collect();
        reorder_by_ranks(&mut items, 0..n, &ranks);
        let mut expected: Vec<usize> = (0..n).collect();
        expected.sort_by(|i, j| ranks[*i].partial_cmp(&ranks[*j]).unwrap());
        prop_assert_eq!(items, expected);
    }

    #[test]
    fn scrambling_is_deterministic(seed in 1u64..1_000_000) {
        let output = scramble(seed);
        prop_assert_eq!(&output, &scramble(seed));
        prop_assert_eq!(output.lines().count(), SCRIPT.trim().lines().count() + 1);
        prop_assert!(output.lines().filter(|l| l.starts_with("(assert ")).count() == 3);
    }
}
