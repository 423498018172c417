//! Straight-line paths for timed mouse moves

use std::time::Duration;

use crate::model::Point;

/// Moves shorter than this happen in a single step
pub const MINIMUM_DURATION: Duration = Duration::from_millis(100);

/// Shortest sleep between two steps of a path
pub const MINIMUM_SLEEP: Duration = Duration::from_millis(50);

/// A timed move: `steps` evenly spaced points followed by the target
///
/// Points are computed on demand so a long path costs no memory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    start: Point,
    end:   Point,
    steps: u64,
    /// Sleep after each point except the last
    pub step: Duration,
}

impl Tween {
    /// Plans a linear path from `start` to `end` lasting about `duration`
    ///
    /// One step per pixel along the longer axis, unless that would sleep
    /// less than [`MINIMUM_SLEEP`] per step, in which case the step count is
    /// reduced to `duration / MINIMUM_SLEEP`.
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use autogui_core::{automation::tween::Tween, model::Point};
    ///
    /// let instant = Tween::plan(Point::new(0, 0), Point::new(100, 0), Duration::ZERO);
    /// assert_eq!(instant.points().collect::<Vec<_>>(), vec![Point::new(100, 0)]);
    ///
    /// let timed = Tween::plan(Point::new(0, 0), Point::new(100, 0), Duration::from_secs(1));
    /// assert_eq!(timed.point_count(), 21);
    /// assert_eq!(timed.points().last(), Some(Point::new(100, 0)));
    /// ```
    pub fn plan(start: Point, end: Point, duration: Duration) -> Self {
        let dx = i64::from(end.x) - i64::from(start.x);
        let dy = i64::from(end.y) - i64::from(start.y);
        let distance = dx.unsigned_abs().max(dy.unsigned_abs());

        if duration < MINIMUM_DURATION || distance == 0 {
            return Self::instant(start, end);
        }

        let mut steps = distance;
        let mut step = duration.div_f64(steps as f64);
        if step < MINIMUM_SLEEP {
            steps = (duration.as_secs_f64() / MINIMUM_SLEEP.as_secs_f64()).floor() as u64;
            if steps == 0 {
                return Self::instant(start, end);
            }
            step = duration.div_f64(steps as f64);
        }

        Self {
            start,
            end,
            steps,
            step,
        }
    }

    fn instant(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            steps: 0,
            step: Duration::ZERO,
        }
    }

    /// Number of points visited, the target included
    pub fn point_count(&self) -> u64 {
        self.steps.saturating_add(1)
    }

    /// The `n`th point of the path; `n >= steps` is the target
    pub fn point(&self, n: u64) -> Point {
        if n >= self.steps {
            return self.end;
        }
        let lerp = |from: i32, to: i32| {
            let delta = i64::from(to) - i64::from(from);
            let offset = (delta as f64 * n as f64 / self.steps as f64).round() as i64;
            (i64::from(from) + offset) as i32
        };
        Point::new(lerp(self.start.x, self.end.x), lerp(self.start.y, self.end.y))
    }

    /// Points to visit in order; the last one is always the target
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..=self.steps).map(move |n| self.point(n))
    }

    /// Total time spent sleeping between points
    pub fn total_sleep(&self) -> Duration {
        self.step.saturating_mul(u32::try_from(self.steps).unwrap_or(u32::MAX))
    }
}
