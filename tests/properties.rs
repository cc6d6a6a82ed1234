use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use route_optimizer::heuristics::{
    order_crossover_segment, GAConfig, GeneticAlgorithm, HillClimbing,
};
use route_optimizer::route::total_distance;
use route_optimizer::{Error, InvalidInputError, Point, Route};

fn locations(max_len: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 2..max_len)
        .prop_map(|coords| coords.into_iter().map(Point::from).collect())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn distance_ignores_rotation_and_direction(points in locations(12), k in 0usize..12) {
        let route = Route::new(points);
        let d = route.total_distance();

        prop_assert!(d >= 0.0);
        prop_assert!(close(route.rotated(k).total_distance(), d));
        prop_assert!(close(route.reversed().total_distance(), d));
    }

    #[test]
    fn crossover_child_is_permutation(
        points in locations(12),
        seed in any::<u64>(),
        a in 0usize..64,
        b in 0usize..64,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let parent1 = Route::random(&points, &mut rng);
        let parent2 = Route::random(&points, &mut rng);

        let n = points.len();
        let (start, end) = (a % (n + 1), b % (n + 1));
        let (start, end) = (start.min(end), start.max(end));

        let child = order_crossover_segment(&parent1, &parent2, start, end);
        prop_assert!(child.is_permutation_of(&points));
        prop_assert_eq!(&child.points()[start..end], &parent1.points()[start..end]);
    }

    #[test]
    fn hill_climbing_returns_permutation(points in locations(10), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let solution = HillClimbing::with_params(100, None).optimize(&points, &mut rng).unwrap();

        prop_assert!(solution.route.is_permutation_of(&points));
        prop_assert!(solution.distance <= solution.initial_distance);
        prop_assert!(close(solution.distance, total_distance(solution.route.points())));
    }

    #[test]
    fn genetic_returns_permutation_and_improves(points in locations(10), seed in any::<u64>()) {
        let ga = GeneticAlgorithm::new(GAConfig {
            population_size: 8,
            generations: 10,
            mutation_rate: 0.3,
            seed: None,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let solution = ga.optimize(&points, &mut rng).unwrap();

        prop_assert!(solution.route.is_permutation_of(&points));
        prop_assert!(solution.history.windows(2).all(|w| w[0].0 < w[1].0 && w[1].1 < w[0].1));
        prop_assert_eq!(solution.history.last().map(|h| h.1), Some(solution.distance));
        prop_assert!(solution.distance <= solution.initial_distance);
    }
}

#[test]
fn unit_square_is_solved_by_both_algorithms() {
    let square: Vec<Point> = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]
        .into_iter()
        .map(Point::from)
        .collect();

    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let hc = HillClimbing::with_params(1000, None).optimize(&square, &mut rng).unwrap();
        assert!((hc.distance - 4.0).abs() < 1e-9);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let ga = GeneticAlgorithm::new(GAConfig { population_size: 20, generations: 20, ..Default::default() })
            .optimize(&square, &mut rng)
            .unwrap();
        assert!((ga.distance - 4.0).abs() < 1e-9);
    }
}

#[test]
fn empty_input_is_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let hc = HillClimbing::new().optimize(&[], &mut rng);
    assert!(matches!(hc, Err(Error::InvalidInput(InvalidInputError::TooFewLocations { distinct: 0 }))));

    let ga = GeneticAlgorithm::new(GAConfig::default()).optimize(&[], &mut rng);
    assert!(matches!(ga, Err(Error::InvalidInput(InvalidInputError::TooFewLocations { distinct: 0 }))));
}
