//! Progress ring geometry.
//!
//! Maps active elapsed time to an angle on the ring, a lap count and whether
//! the current lap draws or erases the trail. The dot moves at a fixed
//! angular speed, so laps are independent of the countdown length and keep
//! alternating for as long as time advances.
//!
//! ```text
//! angle      = -90 + elapsed_s * deg_per_second
//! lap        = floor((angle + 90) / 360)
//! normalized = ((angle + 90) mod 360) - 90        in [-90, 270)
//! cycle      = (normalized + 90) / 360            in [0, 1)
//! erasing    = lap is odd
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::RingConfig;

/// Angle of the top of the ring, where every countdown starts.
pub const START_ANGLE_DEG: f64 = -90.0;

/// One point on the progress ring, derived from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSample {
    pub elapsed_ms: u64,
    /// 0.0 .. 1.0 of the configured countdown.
    pub fraction_of_total: f64,
    /// Unbounded; grows while the timer runs.
    pub angle_deg: f64,
    pub lap_index: u64,
    /// In `[-90, 270)`.
    pub normalized_angle_deg: f64,
    /// 0.0 .. 1.0 within the current lap.
    pub cycle_progress: f64,
    pub is_erasing_lap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressGeometry {
    deg_per_second: f64,
}

impl ProgressGeometry {
    pub fn new(deg_per_second: f64) -> Self {
        Self { deg_per_second }
    }

    pub fn deg_per_second(&self) -> f64 {
        self.deg_per_second
    }

    /// Time for the dot to travel once around the ring. Saturates at
    /// `Duration::MAX` for speeds too slow to represent.
    pub fn lap_duration(&self) -> Duration {
        Duration::try_from_secs_f64(360.0 / self.deg_per_second).unwrap_or(Duration::MAX)
    }

    pub fn sample(&self, elapsed: Duration, total: Duration) -> ProgressSample {
        let swept = elapsed.as_secs_f64() * self.deg_per_second;
        let angle_deg = START_ANGLE_DEG + swept;
        let lap_index = (swept / 360.0).floor().max(0.0) as u64;
        let within_lap = swept.rem_euclid(360.0);
        let normalized_angle_deg = within_lap + START_ANGLE_DEG;
        let cycle_progress = within_lap / 360.0;

        let fraction_of_total = if total.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
        };

        ProgressSample {
            elapsed_ms: elapsed.as_millis() as u64,
            fraction_of_total,
            angle_deg,
            lap_index,
            normalized_angle_deg,
            cycle_progress,
            is_erasing_lap: lap_index % 2 == 1,
        }
    }
}

/// Stroke dash parameters for the trail circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeDash {
    /// Visible dash length followed by the gap length.
    pub array: [f64; 2],
    pub offset: f64,
}

/// Pixel geometry of the ring the adapter draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    center: f64,
    radius: f64,
}

impl RingGeometry {
    pub fn new(ring: &RingConfig) -> Self {
        Self {
            center: ring.size / 2.0,
            radius: (ring.inner_size - ring.stroke_width) / 2.0,
        }
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn circumference(&self) -> f64 {
        self.radius * 2.0 * std::f64::consts::PI
    }

    /// Cartesian position of the progress dot.
    pub fn dot_position(&self, sample: &ProgressSample) -> (f64, f64) {
        let angle_rad = sample.normalized_angle_deg.to_radians();
        (
            self.center + self.radius * angle_rad.cos(),
            self.center + self.radius * angle_rad.sin(),
        )
    }

    /// A draw lap grows the dash from nothing; an erase lap shows the full
    /// trail and pushes it away with the offset.
    pub fn stroke_dash(&self, sample: &ProgressSample) -> StrokeDash {
        let circumference = self.circumference();
        if sample.is_erasing_lap {
            StrokeDash {
                array: [circumference, circumference],
                offset: circumference * sample.cycle_progress,
            }
        } else {
            StrokeDash {
                array: [circumference * sample.cycle_progress, circumference],
                offset: 0.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn at(ms: u64) -> ProgressSample {
        ProgressGeometry::new(18.0).sample(Duration::from_millis(ms), Duration::from_secs(60))
    }

    #[test]
    fn starts_at_top_with_empty_trail() {
        let s = at(0);
        assert_eq!(s.angle_deg, -90.0);
        assert_eq!(s.normalized_angle_deg, -90.0);
        assert_eq!(s.lap_index, 0);
        assert!(!s.is_erasing_lap);
        assert_eq!(s.cycle_progress, 0.0);

        let ring = RingGeometry::new(&RingConfig::default());
        let (x, y) = ring.dot_position(&s);
        assert!((x - 122.0).abs() < EPS);
        assert!((y - 12.0).abs() < EPS);
        assert_eq!(ring.stroke_dash(&s).array[0], 0.0);
    }

    #[test]
    fn one_lap_every_twenty_seconds() {
        let g = ProgressGeometry::new(18.0);
        assert_eq!(g.lap_duration(), Duration::from_secs(20));

        let s = at(20_000);
        assert_eq!(s.normalized_angle_deg, -90.0);
        assert_eq!(s.lap_index, 1);
        assert!(s.is_erasing_lap);

        let s = at(40_000);
        assert_eq!(s.lap_index, 2);
        assert!(!s.is_erasing_lap);
    }

    #[test]
    fn lap_duration_saturates_for_unrepresentable_speeds() {
        assert_eq!(ProgressGeometry::new(1e-300).lap_duration(), Duration::MAX);
        assert_eq!(ProgressGeometry::new(0.0).lap_duration(), Duration::MAX);
        assert_eq!(
            ProgressGeometry::new(crate::config::MAX_DEG_PER_SECOND).lap_duration(),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn fastest_allowed_speed_keeps_angles_in_range() {
        let g = ProgressGeometry::new(crate::config::MAX_DEG_PER_SECOND);
        let s = g.sample(Duration::from_millis(2_345), Duration::from_secs(60));
        assert!(s.normalized_angle_deg >= -90.0 && s.normalized_angle_deg < 270.0);
        assert!(s.angle_deg.is_finite());
        assert_eq!(s.lap_index, 234);
    }

    #[test]
    fn quarter_lap_points_right() {
        let s = at(5_000);
        assert!((s.normalized_angle_deg - 0.0).abs() < EPS);
        assert!((s.cycle_progress - 0.25).abs() < EPS);

        let ring = RingGeometry::new(&RingConfig::default());
        let (x, y) = ring.dot_position(&s);
        assert!((x - 232.0).abs() < EPS);
        assert!((y - 122.0).abs() < EPS);
    }

    #[test]
    fn normalized_angle_stays_in_range_past_many_laps() {
        let s = at(95_000);
        assert!(s.normalized_angle_deg >= -90.0 && s.normalized_angle_deg < 270.0);
        assert_eq!(s.lap_index, 4);
        assert!((s.angle_deg - 1620.0).abs() < EPS);
    }

    #[test]
    fn fraction_of_total_is_clamped() {
        let g = ProgressGeometry::new(18.0);
        let total = Duration::from_secs(5);
        assert_eq!(g.sample(Duration::from_secs(5), total).fraction_of_total, 1.0);
        assert_eq!(g.sample(Duration::from_secs(9), total).fraction_of_total, 1.0);
        assert!((g.sample(Duration::from_millis(1250), total).fraction_of_total - 0.25).abs() < EPS);
    }

    #[test]
    fn default_ring_dimensions() {
        let ring = RingGeometry::new(&RingConfig::default());
        assert_eq!(ring.radius(), 110.0);
        assert_eq!(ring.center(), 122.0);
        assert!((ring.circumference() - 220.0 * std::f64::consts::PI).abs() < EPS);
    }

    #[test]
    fn draw_lap_grows_dash_and_erase_lap_shifts_offset() {
        let ring = RingGeometry::new(&RingConfig::default());
        let c = ring.circumference();

        let draw = ring.stroke_dash(&at(10_000));
        assert!((draw.array[0] - c * 0.5).abs() < EPS);
        assert_eq!(draw.array[1], c);
        assert_eq!(draw.offset, 0.0);

        let erase = ring.stroke_dash(&at(30_000));
        assert_eq!(erase.array, [c, c]);
        assert!((erase.offset - c * 0.5).abs() < EPS);
    }
}
