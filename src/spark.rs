//! Click-spark cursor feedback.
//!
//! Every click spawns a burst of short line sparks fanned around the
//! click point. Each spark travels outward along its angle with an eased
//! distance while its segment shrinks, and disappears after a fixed
//! duration. The component produces plain line segments; the GPU layer
//! draws them as a line list on top of everything else.

use glam::Vec2;

/// Easing applied to a spark's outward travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Configuration for a [`ClickSpark`].
#[derive(Debug, Clone)]
pub struct SparkConfig {
    /// Spark color as a hex string. Default: `"#FFFFFF"`.
    pub color: String,
    /// Length of each spark segment at spawn, in pixels. Default: 10.0.
    pub spark_size: f32,
    /// Distance a spark travels over its lifetime, in pixels.
    /// Default: 15.0.
    pub spark_radius: f32,
    /// Sparks per burst. Default: 8.
    pub spark_count: u32,
    /// Spark lifetime in seconds. Default: 0.4.
    pub duration: f32,
    /// Travel easing. Default: ease-out.
    pub easing: Easing,
    /// Extra multiplier on travel distance. Default: 1.0.
    pub extra_scale: f32,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            color: "#FFFFFF".to_string(),
            spark_size: 10.0,
            spark_radius: 15.0,
            spark_count: 8,
            duration: 0.4,
            easing: Easing::EaseOut,
            extra_scale: 1.0,
        }
    }
}

/// One live spark.
#[derive(Debug, Clone, Copy)]
struct Spark {
    origin: Vec2,
    angle: f32,
    spawned_at: f32,
}

/// A line segment to draw, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkSegment {
    pub from: Vec2,
    pub to: Vec2,
}

/// Spawns and ages click sparks.
#[derive(Debug)]
pub struct ClickSpark {
    config: SparkConfig,
    active: Vec<Spark>,
}

impl ClickSpark {
    pub fn new(config: SparkConfig) -> Self {
        Self {
            config,
            active: Vec::new(),
        }
    }

    /// Spawn one burst of sparks at a click position.
    pub fn spawn_burst(&mut self, position: Vec2, now: f32) {
        let count = self.config.spark_count;
        self.active.extend((0..count).map(|i| Spark {
            origin: position,
            angle: std::f32::consts::TAU * i as f32 / count as f32,
            spawned_at: now,
        }));
    }

    /// Drop expired sparks. Call once per frame before reading segments.
    pub fn update(&mut self, now: f32) {
        let duration = self.config.duration;
        self.active
            .retain(|spark| now - spark.spawned_at < duration);
    }

    /// Current line segments for all live sparks.
    pub fn segments(&self, now: f32) -> Vec<SparkSegment> {
        self.active
            .iter()
            .filter_map(|spark| self.segment_for(spark, now))
            .collect()
    }

    /// Number of live sparks.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// The configured spark color.
    pub fn color(&self) -> &str {
        &self.config.color
    }

    fn segment_for(&self, spark: &Spark, now: f32) -> Option<SparkSegment> {
        let elapsed = now - spark.spawned_at;
        if elapsed < 0.0 || elapsed >= self.config.duration {
            return None;
        }

        let progress = elapsed / self.config.duration;
        let eased = self.config.easing.apply(progress);

        let distance = eased * self.config.spark_radius * self.config.extra_scale;
        let length = self.config.spark_size * (1.0 - eased);

        let direction = Vec2::new(spark.angle.cos(), spark.angle.sin());
        Some(SparkSegment {
            from: spark.origin + direction * distance,
            to: spark.origin + direction * (distance + length),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_spawns_configured_count() {
        let mut sparks = ClickSpark::new(SparkConfig::default());
        sparks.spawn_burst(Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(sparks.active_count(), 8);
        assert_eq!(sparks.segments(0.0).len(), 8);

        sparks.spawn_burst(Vec2::new(200.0, 50.0), 0.1);
        assert_eq!(sparks.active_count(), 16);
    }

    #[test]
    fn test_sparks_expire_after_duration() {
        let mut sparks = ClickSpark::new(SparkConfig::default());
        sparks.spawn_burst(Vec2::ZERO, 1.0);

        sparks.update(1.39);
        assert_eq!(sparks.active_count(), 8);

        sparks.update(1.45);
        assert_eq!(sparks.active_count(), 0);
        assert!(sparks.segments(1.45).is_empty());
    }

    #[test]
    fn test_burst_fans_uniformly() {
        let mut sparks = ClickSpark::new(SparkConfig {
            spark_count: 4,
            easing: Easing::Linear,
            ..SparkConfig::default()
        });
        let origin = Vec2::new(50.0, 50.0);
        sparks.spawn_burst(origin, 0.0);

        // Halfway through, spark i points along angle i * TAU / 4
        let segments = sparks.segments(0.2);
        assert_eq!(segments.len(), 4);
        for (i, segment) in segments.iter().enumerate() {
            let angle = std::f32::consts::TAU * i as f32 / 4.0;
            let direction = Vec2::new(angle.cos(), angle.sin());
            let actual = (segment.from - origin).normalize();
            assert!((actual - direction).length() < 1e-4);
        }
    }

    #[test]
    fn test_segment_travels_out_and_shrinks() {
        let config = SparkConfig {
            spark_count: 1,
            easing: Easing::Linear,
            ..SparkConfig::default()
        };
        let radius = config.spark_radius;
        let size = config.spark_size;

        let mut sparks = ClickSpark::new(config);
        sparks.spawn_burst(Vec2::ZERO, 0.0);

        // At spawn: still at the origin, full length
        let s0 = sparks.segments(0.0)[0];
        assert!((s0.from - Vec2::ZERO).length() < 1e-5);
        assert!(((s0.to - s0.from).length() - size).abs() < 1e-4);

        // Halfway: travelled half the radius, half the length
        let s1 = sparks.segments(0.2)[0];
        assert!(((s1.from - Vec2::ZERO).length() - radius * 0.5).abs() < 1e-4);
        assert!(((s1.to - s1.from).length() - size * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
        // Ease-out front-loads the travel
        assert!(Easing::EaseOut.apply(0.3) > 0.3);
        assert!(Easing::EaseIn.apply(0.3) < 0.3);
    }
}
