use bagforge_core::cost::{exchange_benefit, relocation_benefit, total_cost};
use bagforge_core::optimizer::local_search::COST_TOLERANCE;
use bagforge_core::optimizer::{certify, LocalSearch, Move};
use bagforge_core::SimilarityMatrix;
use proptest::prelude::*;

mod common;
use common::{random_matrix, random_start};

// --- STRATEGIES ---

prop_compose! {
    fn arb_problem()(n in 2usize..14)(
        n in Just(n),
        k in 1..=n,
        matrix_seed in any::<u64>(),
        start_seed in any::<u64>()
    ) -> (usize, usize, u64, u64) {
        (n, k, matrix_seed, start_seed)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_descent_is_monotone_and_certified(
        (n, k, matrix_seed, start_seed) in arb_problem()
    ) {
        let m = random_matrix(n, matrix_seed);
        let mut p = random_start(n, k, start_seed);
        let before = total_cost(&p, &m);

        let stats = LocalSearch::new(&m).descend(&mut p).unwrap();

        prop_assert!(stats.final_cost <= before);
        prop_assert_eq!(stats.initial_cost, before);
        prop_assert_eq!(stats.final_cost, total_cost(&p, &m));
        prop_assert_eq!(stats.iterations, stats.relocations + stats.exchanges);
        prop_assert_eq!(p.num_bags(), k);
        prop_assert!(p.check(n).is_ok());
        prop_assert!(certify(&p, &m));
    }

    #[test]
    fn test_every_step_matches_its_benefit(
        (n, k, matrix_seed, start_seed) in arb_problem()
    ) {
        let m = random_matrix(n, matrix_seed);
        let mut p = random_start(n, k, start_seed);
        let search = LocalSearch::new(&m);

        let mut steps = 0;
        while let Some(mv) = search.best_move(&p) {
            let before = total_cost(&p, &m);
            match mv {
                Move::Relocate { from, to, pos, .. } => {
                    p.relocate(from, to, pos);
                }
                Move::Exchange { i, j, pos_i, pos_j, .. } => {
                    p.exchange(i, j, pos_i, pos_j);
                }
            }
            let after = total_cost(&p, &m);

            prop_assert!(mv.benefit() > COST_TOLERANCE);
            prop_assert!(after < before, "cost did not drop {} -> {}", before, after);
            prop_assert!((mv.benefit() - (before - after)).abs() < 1e-9);
            prop_assert!(p.check(n).is_ok());

            steps += 1;
            prop_assert!(steps < 10_000, "descent did not terminate");
        }
    }

    #[test]
    fn test_converged_benefits_are_non_positive(
        (n, k, matrix_seed, start_seed) in arb_problem()
    ) {
        let m = random_matrix(n, matrix_seed);
        let mut p = random_start(n, k, start_seed);
        LocalSearch::new(&m).descend(&mut p).unwrap();

        for i in 0..k {
            for j in 0..k {
                if i == j {
                    continue;
                }
                for b in relocation_benefit(p.bag(i), p.bag(j), &m) {
                    prop_assert!(b <= COST_TOLERANCE);
                }
                if i < j {
                    let ex = exchange_benefit(p.bag(i), p.bag(j), &m);
                    prop_assert!(ex.values.iter().all(|&v| v <= COST_TOLERANCE));
                }
            }
        }
    }

    #[test]
    fn test_condensed_round_trip(
        values in proptest::collection::vec(-100.0..100.0f64, 0..80),
        n in 1usize..14
    ) {
        let needed = n * (n - 1) / 2;
        match SimilarityMatrix::from_condensed(&values, n) {
            Ok(m) => {
                prop_assert!(values.len() >= needed);
                prop_assert_eq!(&m.condensed()[..], &values[..needed]);
                for i in 0..n {
                    prop_assert_eq!(m.get(i, i), 0.0);
                    for j in 0..n {
                        prop_assert_eq!(m.get(i, j), m.get(j, i));
                    }
                }
            }
            Err(_) => prop_assert!(values.len() < needed),
        }
    }
}
