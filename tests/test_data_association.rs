use gnnmatch_rs::{AssocConfig, DataAssociation, GnnSolver, ObjectView};
use nalgebra::DMatrix;
use std::collections::HashMap;
use std::f64::consts::PI;

const VEHICLE: usize = 0;
const PEDESTRIAN: usize = 1;

/// Two-class setup: vehicles match vehicles within 4 m, pedestrians match
/// pedestrians within 2 m, cross-class matches are forbidden.
fn two_label_config() -> AssocConfig {
    AssocConfig::new(
        vec![true, false, false, true],
        vec![4.0, 0.0, 0.0, 2.0],
        vec![1.0, 0.0, 0.0, 0.05],
        vec![30.0, 0.0, 0.0, 2.0],
        vec![PI, 0.0, 0.0, PI],
        vec![0.0, 0.0, 0.0, 0.0],
    )
    .unwrap()
}

fn vehicle(x: f64, y: f64, yaw: f64) -> ObjectView {
    ObjectView::with_rect_footprint(x, y, yaw, VEHICLE, 4.5, 2.0)
}

fn pedestrian(x: f64, y: f64) -> ObjectView {
    ObjectView::with_rect_footprint(x, y, 0.0, PEDESTRIAN, 0.6, 0.6)
}

#[test]
fn test_full_cycle_matches_each_tracker_to_its_measurement() {
    let engine = DataAssociation::new(two_label_config());

    let trackers = vec![
        vehicle(0.0, 0.0, 0.0),
        vehicle(10.0, 0.0, 0.0),
        pedestrian(5.0, 5.0),
    ];
    let measurements = vec![
        vehicle(0.5, 0.0, 0.05),
        vehicle(10.4, 0.0, 0.0),
        pedestrian(5.2, 5.0),
        vehicle(30.0, 0.0, 0.0), // clutter, far from everything
    ];

    let score = engine.calc_score_matrix(&measurements, &trackers).unwrap();
    assert_eq!(score.nrows(), 3);
    assert_eq!(score.ncols(), 4);

    let (direct, reverse) = engine.assign(&score);
    assert_eq!(direct.len(), 3);
    assert_eq!(direct.get(&0), Some(&0));
    assert_eq!(direct.get(&1), Some(&1));
    assert_eq!(direct.get(&2), Some(&2));
    assert_eq!(reverse.get(&3), None);
}

#[test]
fn test_cross_class_pair_never_matches() {
    let engine = DataAssociation::new(two_label_config());

    // A pedestrian measurement right on top of a vehicle tracker.
    let trackers = vec![vehicle(0.0, 0.0, 0.0)];
    let measurements = vec![pedestrian(0.5, 0.0)];

    let score = engine.calc_score_matrix(&measurements, &trackers).unwrap();
    assert_eq!(score[(0, 0)], 0.0);

    let (direct, reverse) = engine.assign(&score);
    assert!(direct.is_empty());
    assert!(reverse.is_empty());
}

#[test]
fn test_contested_measurement_goes_to_the_closer_tracker() {
    let engine = DataAssociation::new(two_label_config());

    // Both trackers are within range of measurement 0, but a one-to-one
    // matching that keeps both trackers matched has the higher total score.
    let trackers = vec![vehicle(0.0, 0.0, 0.0), vehicle(3.0, 0.0, 0.0)];
    let measurements = vec![vehicle(1.0, 0.0, 0.0), vehicle(3.5, 0.0, 0.0)];

    let score = engine.calc_score_matrix(&measurements, &trackers).unwrap();
    let (direct, reverse) = engine.assign(&score);

    assert_eq!(direct.get(&0), Some(&0));
    assert_eq!(direct.get(&1), Some(&1));
    assert_eq!(reverse.len(), 2);
}

#[test]
fn test_threshold_drops_weak_pairs_from_both_maps() {
    let engine = DataAssociation::new(two_label_config().with_score_threshold(0.3));

    let score = DMatrix::from_row_slice(2, 3, &[0.9, 0.0, 0.2, 0.0, 0.8, 0.0]);
    let (direct, reverse) = engine.assign(&score);

    let expected: HashMap<usize, usize> = [(0, 0), (1, 1)].into_iter().collect();
    assert_eq!(direct, expected);
    assert_eq!(reverse, expected);
}

#[test]
fn test_returned_pairs_always_meet_the_threshold() {
    let engine = DataAssociation::new(two_label_config().with_score_threshold(0.3));

    let score = DMatrix::from_row_slice(
        3,
        3,
        &[0.9, 0.25, 0.0, 0.1, 0.05, 0.6, 0.29, 0.0, 0.0],
    );
    let (direct, reverse) = engine.assign(&score);

    for (&t, &m) in &direct {
        assert!(score[(t, m)] >= 0.3);
        assert_eq!(reverse.get(&m), Some(&t));
    }
    assert_eq!(direct.len(), reverse.len());
}

/// Deliberately suboptimal row-greedy solver, used to show the solver seam.
#[derive(Debug)]
struct RowGreedy;

impl GnnSolver for RowGreedy {
    fn maximize_linear_assignment(
        &self,
        score: &DMatrix<f64>,
    ) -> (HashMap<usize, usize>, HashMap<usize, usize>) {
        let mut direct = HashMap::new();
        let mut reverse = HashMap::new();
        for t in 0..score.nrows() {
            let mut best: Option<(usize, f64)> = None;
            for m in 0..score.ncols() {
                if reverse.contains_key(&m) || score[(t, m)] <= 0.0 {
                    continue;
                }
                if best.map_or(true, |(_, s)| score[(t, m)] > s) {
                    best = Some((m, score[(t, m)]));
                }
            }
            if let Some((m, _)) = best {
                direct.insert(t, m);
                reverse.insert(m, t);
            }
        }
        (direct, reverse)
    }
}

#[test]
fn test_solver_strategy_is_swappable() {
    let score = DMatrix::from_row_slice(2, 2, &[0.5, 0.4, 0.4, 0.0]);

    let greedy = DataAssociation::with_solver(two_label_config(), Box::new(RowGreedy));
    let (direct, _) = greedy.assign(&score);
    assert_eq!(direct.get(&0), Some(&0));
    assert_eq!(direct.get(&1), None);

    let optimal = DataAssociation::new(two_label_config());
    let (direct, _) = optimal.assign(&score);
    assert_eq!(direct.get(&0), Some(&1));
    assert_eq!(direct.get(&1), Some(&0));
}
