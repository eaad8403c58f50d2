//! Admissibility gates and pairwise scoring.
//!
//! Every (tracker, measurement) pair runs through a fixed cascade of gates:
//! class, distance, area, angle, Mahalanobis and 2D overlap. The first
//! failing gate short-circuits to score 0; a pair that passes them all is
//! scored by how close the two positions are relative to the class pair's
//! distance budget.

use crate::config::AssocConfig;
use crate::object::ObjectView;
use nalgebra::{Matrix2, Vector2};
use std::f64::consts::{FRAC_PI_2, PI};

/// Two-degree-of-freedom Mahalanobis distance at the 99% confidence level.
pub const MAHALANOBIS_GATE_99: f64 = 3.035;

/// Union-area floor for the overlap gate; below this the IoU ratio is
/// numerically unstable and the gate reports 0.
pub const MIN_UNION_IOU_AREA: f64 = 1e-2;

/// Normalize an angle into [-pi, pi).
pub fn normalize_radian(rad: f64) -> f64 {
    let value = rad % (2.0 * PI);
    if (-PI..PI).contains(&value) {
        value
    } else {
        value - (2.0 * PI).copysign(value)
    }
}

/// Absolute heading difference after folding the measurement yaw into the
/// tracker's reference branch.
///
/// With `distinguish_front_or_back` the measurement yaw is shifted by whole
/// turns until it lies within pi of the tracker yaw; without it, front and
/// back are treated as equivalent, so half turns are used against a pi/2
/// range and a heading of pi collapses onto a heading of 0.
pub fn formed_yaw_angle(
    measurement_yaw: f64,
    tracker_yaw: f64,
    distinguish_front_or_back: bool,
) -> f64 {
    let measurement_yaw = normalize_radian(measurement_yaw);
    let tracker_yaw = normalize_radian(tracker_yaw);
    let (angle_range, angle_step) = if distinguish_front_or_back {
        (PI, 2.0 * PI)
    } else {
        (FRAC_PI_2, PI)
    };

    let mut fixed_yaw = measurement_yaw;
    while angle_range <= tracker_yaw - fixed_yaw {
        fixed_yaw = fixed_yaw + angle_step;
    }
    while angle_range <= fixed_yaw - tracker_yaw {
        fixed_yaw = fixed_yaw - angle_step;
    }
    (fixed_yaw - tracker_yaw).abs()
}

/// Covariance-normalized distance between two positions, or `None` when the
/// covariance is singular or not positive definite (the pair is then treated
/// as a data-quality failure and excluded).
pub fn mahalanobis_distance(
    measurement: &Vector2<f64>,
    tracker: &Vector2<f64>,
    covariance: &Matrix2<f64>,
) -> Option<f64> {
    let inverse = covariance.try_inverse()?;
    let diff = measurement - tracker;
    let squared = (diff.transpose() * inverse * diff)[(0, 0)];
    if squared < 0.0 {
        return None;
    }
    Some(squared.sqrt())
}

/// Run the gate cascade for one pair and return its compatibility score.
///
/// 0 means inadmissible (some gate failed) or admissible but below the
/// configured score threshold; otherwise the score is
/// `(max_dist - dist) / max_dist` in (0, 1]. Labels must already be within
/// the configured class range.
pub fn pair_score(
    tracker: &ObjectView,
    measurement: &ObjectView,
    config: &AssocConfig,
) -> f64 {
    if !config.can_assign(tracker.label, measurement.label) {
        return 0.0;
    }

    let max_dist = config.max_dist(tracker.label, measurement.label);
    let dist = (measurement.position - tracker.position).norm();

    // distance gate
    if max_dist <= 0.0 || max_dist < dist {
        return 0.0;
    }

    // area gate
    let area = measurement.area();
    if area < config.min_area(tracker.label, measurement.label)
        || config.max_area(tracker.label, measurement.label) < area
    {
        return 0.0;
    }

    // angle gate, disabled when the budget spans a half turn or more
    let max_rad = config.max_rad(tracker.label, measurement.label);
    if max_rad.abs() < PI {
        let angle = formed_yaw_angle(measurement.yaw, tracker.yaw, false);
        if max_rad.abs() < angle {
            return 0.0;
        }
    }

    // mahalanobis gate
    match mahalanobis_distance(
        &measurement.position,
        &tracker.position,
        &tracker.position_covariance,
    ) {
        Some(d) if d < MAHALANOBIS_GATE_99 => {}
        _ => return 0.0,
    }

    // 2d overlap gate
    let iou = measurement
        .footprint
        .iou(&tracker.footprint, MIN_UNION_IOU_AREA);
    if iou < config.min_iou(tracker.label, measurement.label) {
        return 0.0;
    }

    let score = (max_dist - dist.min(max_dist)) / max_dist;
    if score < config.score_threshold() {
        0.0
    } else {
        score
    }
}
