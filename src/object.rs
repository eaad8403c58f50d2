use crate::polygon::Polygon;
use nalgebra::{Matrix2, Vector2};

/*------------------------------------------------------------------------------
ObjectView struct
------------------------------------------------------------------------------*/

/// What the association engine needs to know about one entity, whether it is
/// a tracked object propagated to the measurement stamp or a fresh
/// measurement: planar pose, positional uncertainty, dominant class label and
/// the 2D footprint.
#[derive(Debug, Clone)]
pub struct ObjectView {
    pub position: Vector2<f64>,
    pub position_covariance: Matrix2<f64>,
    pub yaw: f64,
    pub label: usize,
    pub footprint: Polygon<f64>,
}

impl ObjectView {
    pub fn new(
        position: Vector2<f64>,
        position_covariance: Matrix2<f64>,
        yaw: f64,
        label: usize,
        footprint: Polygon<f64>,
    ) -> Self {
        Self {
            position,
            position_covariance,
            yaw,
            label,
            footprint,
        }
    }

    /// View with an oriented rectangular footprint centered on the position
    /// and an identity position covariance.
    pub fn with_rect_footprint(
        x: f64,
        y: f64,
        yaw: f64,
        label: usize,
        length: f64,
        width: f64,
    ) -> Self {
        Self {
            position: Vector2::new(x, y),
            position_covariance: Matrix2::identity(),
            yaw,
            label,
            footprint: Polygon::rectangle(x, y, yaw, length, width),
        }
    }

    pub fn area(&self) -> f64 {
        self.footprint.area()
    }
}
