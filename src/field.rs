//! Pointer-reactive particle field.
//!
//! N particles drift at randomized base positions; when the (smoothed)
//! pointer target comes within the magnet radius of a particle, the
//! particle is deflected onto an orbiting ring around the target instead
//! of being pulled into it. With no pointer input for a while, the target
//! follows a deterministic Lissajous curve so the field keeps moving on
//! its own.
//!
//! The field owns its particles for its whole lifetime and rewrites one
//! shared instance buffer per frame; nothing else persists between frames.
//!
//! # Example
//!
//! ```ignore
//! let mut field = ParticleField::new(FieldConfig::default(), 16.0 / 9.0, &mut rand::thread_rng());
//!
//! // Per frame:
//! field.update(tick, &input);
//! queue.write_buffer(&instance_buffer, 0, field.instance_bytes());
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use rand::Rng;

use crate::color;
use crate::scheduler::{FrameInput, FrameTick};

/// Half-extent of the spawn volume's Y axis; X scales by aspect ratio.
const SPAWN_EXTENT: f32 = 30.0;
/// Half-extent of the pointer target range's Y axis.
const TARGET_EXTENT: f32 = 30.0;
/// Half-extent of the spawn volume's Z axis.
const DEPTH_EXTENT: f32 = 15.0;
/// Camera distance used for depth projection of the target.
const PROJECTION_DEPTH: f32 = 50.0;
/// Distance from the ring over which particle scale falls off.
const RING_FALLOFF: f32 = 15.0;

/// Configuration for a [`ParticleField`].
///
/// Immutable once the field is constructed.
#[derive(Clone, Debug)]
pub struct FieldConfig {
    /// Number of particles. Fixed for the field's lifetime. Default: 400.
    pub count: u32,

    /// Radius around the target within which particles deflect onto the
    /// ring. Default: 20.0.
    pub magnet_radius: f32,

    /// Base radius of the orbit ring. Default: 10.0.
    pub ring_radius: f32,

    /// Angular speed of the ring's radial wave. Default: 0.4.
    pub wave_speed: f32,

    /// Amplitude of the ring's radial wave. Default: 1.0.
    pub wave_amplitude: f32,

    /// Base render scale of each particle. Default: 2.0.
    pub particle_size: f32,

    /// Exponential smoothing factor applied to both the pointer target
    /// and per-particle motion, in (0, 1]. Default: 0.05.
    pub lerp_speed: f32,

    /// Particle color as a hex string. Invalid input falls back to the
    /// default color. Default: `"#FF9FFC"`.
    pub color: String,

    /// Follow the idle auto-animation curve when the pointer goes quiet.
    /// Default: true.
    pub auto_animate: bool,

    /// Strength of the per-particle pulse variation. Default: 1.0.
    pub particle_variance: f32,

    /// Multiplier on each particle's resting depth. Default: 1.0.
    pub depth_factor: f32,

    /// Speed of the scale pulse. Default: 3.0.
    pub pulse_speed: f32,

    /// Seconds without pointer input before the auto-animation takes
    /// over. Default: 1.5.
    pub idle_threshold: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 400,
            magnet_radius: 20.0,
            ring_radius: 10.0,
            wave_speed: 0.4,
            wave_amplitude: 1.0,
            particle_size: 2.0,
            lerp_speed: 0.05,
            color: "#FF9FFC".to_string(),
            auto_animate: true,
            particle_variance: 1.0,
            depth_factor: 1.0,
            pulse_speed: 3.0,
            idle_threshold: 1.5,
        }
    }
}

/// One particle's simulation state. Owned exclusively by the field.
#[derive(Clone, Debug)]
pub struct Particle {
    /// Resting position the particle returns to outside the magnet.
    pub base: Vec3,
    /// Current smoothed position.
    pub current: Vec3,
    /// Free-running phase driving waves and pulses.
    pub phase: f32,
    /// Per-particle phase speed.
    pub speed: f32,
    /// Random offset applied to the ring radius, in [-1, 1].
    pub radius_jitter: f32,
}

/// Per-particle data uploaded to the instanced-rendering buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

/// The deterministic idle target: a Lissajous sweep over the view.
///
/// Pure function of elapsed time, so the idle path is reproducible.
pub fn auto_target(elapsed: f32, view_half: Vec2) -> Vec2 {
    Vec2::new(
        (elapsed * 0.3).sin() * view_half.x * 0.6,
        (elapsed * 0.4).cos() * view_half.y * 0.4,
    )
}

/// A pointer-reactive orbiting particle field.
pub struct ParticleField {
    config: FieldConfig,
    color: Vec3,
    particles: Vec<Particle>,
    instances: Vec<ParticleInstance>,
    /// Smoothed target the particles react to.
    virtual_target: Vec2,
}

impl ParticleField {
    /// Spawn a field of `config.count` particles over a view with the
    /// given aspect ratio.
    pub fn new(config: FieldConfig, aspect: f32, rng: &mut impl Rng) -> Self {
        let color = color::hex_to_rgb(&config.color);
        let spawn_half = Vec2::new(SPAWN_EXTENT * aspect.max(0.1), SPAWN_EXTENT);

        let particles: Vec<Particle> = (0..config.count)
            .map(|_| {
                let base = Vec3::new(
                    (rng.gen::<f32>() - 0.5) * spawn_half.x * 2.0,
                    (rng.gen::<f32>() - 0.5) * spawn_half.y * 2.0,
                    (rng.gen::<f32>() - 0.5) * DEPTH_EXTENT * 2.0,
                );
                Particle {
                    base,
                    current: base,
                    phase: rng.gen::<f32>() * 100.0,
                    speed: 0.01 + rng.gen::<f32>() / 200.0,
                    radius_jitter: (rng.gen::<f32>() - 0.5) * 2.0,
                }
            })
            .collect();

        let instances = particles
            .iter()
            .map(|p| ParticleInstance {
                position: p.current.to_array(),
                scale: config.particle_size,
                color: color.to_array(),
                alpha: 0.9,
            })
            .collect();

        Self {
            config,
            color,
            particles,
            instances,
            virtual_target: Vec2::ZERO,
        }
    }

    /// Number of particles. Constant for the field's lifetime.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// The particles' current simulation state.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The instance buffer contents as written by the last update.
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Raw bytes of the instance buffer, ready for upload.
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// The current smoothed target position.
    pub fn target(&self) -> Vec2 {
        self.virtual_target
    }

    /// Advance the field by one frame and rewrite the instance buffer.
    pub fn update(&mut self, tick: FrameTick, input: &FrameInput) {
        let aspect = if input.viewport.y > 0.0 {
            input.viewport.x / input.viewport.y
        } else {
            1.0
        };
        let view_half = Vec2::new(TARGET_EXTENT * aspect, TARGET_EXTENT);

        // Live pointer target, or the idle curve once input goes quiet.
        let dest = if self.config.auto_animate
            && input
                .pointer
                .is_idle(tick.elapsed, self.config.idle_threshold)
        {
            auto_target(tick.elapsed, view_half)
        } else {
            input.pointer.ndc * view_half
        };

        let lerp = self.config.lerp_speed;
        self.virtual_target += (dest - self.virtual_target) * lerp;
        let target = self.virtual_target;

        for (particle, instance) in self.particles.iter_mut().zip(&mut self.instances) {
            particle.phase += particle.speed * 0.5;

            // Project the target to the particle's depth plane.
            let projection = 1.0 - particle.current.z / PROJECTION_DEPTH;
            let projected = target * projection;

            let goal = goal_position(particle, projected, &self.config);
            particle.current += (goal - particle.current) * lerp;

            // Scale up near the ring, pulse over time.
            let planar = Vec2::new(particle.current.x, particle.current.y);
            let ring_distance = (planar.distance(projected) - self.config.ring_radius).abs();
            let proximity = (1.0 - ring_distance / RING_FALLOFF).clamp(0.1, 1.0);
            let pulse = 0.8
                + (particle.phase * self.config.pulse_speed).sin()
                    * 0.2
                    * self.config.particle_variance;

            instance.position = particle.current.to_array();
            instance.scale = proximity * pulse * self.config.particle_size;
            instance.color = self.color.to_array();
            instance.alpha = 0.9;
        }
    }
}

/// Where a particle wants to be this frame: its base position, or a slot
/// on the orbit ring when the projected target is close enough.
fn goal_position(particle: &Particle, projected: Vec2, config: &FieldConfig) -> Vec3 {
    let offset = Vec2::new(particle.base.x, particle.base.y) - projected;
    let dist = offset.length();

    if dist >= config.magnet_radius {
        return Vec3::new(
            particle.base.x,
            particle.base.y,
            particle.base.z * config.depth_factor,
        );
    }

    let angle = offset.y.atan2(offset.x);
    let wave = (particle.phase * config.wave_speed + angle).sin() * (0.5 * config.wave_amplitude);
    let deviation = particle.radius_jitter * 0.5;
    let ring = config.ring_radius + wave + deviation;

    Vec3::new(
        projected.x + ring * angle.cos(),
        projected.y + ring * angle.sin(),
        particle.base.z * config.depth_factor + particle.phase.sin() * config.wave_amplitude,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerSnapshot;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tick(elapsed: f32) -> FrameTick {
        FrameTick {
            elapsed,
            delta: 1.0 / 60.0,
            frame: (elapsed * 60.0) as u64,
        }
    }

    fn pointer_input(ndc: Vec2, moved_at: f32) -> FrameInput {
        FrameInput {
            pointer: PointerSnapshot {
                ndc,
                position: Vec2::ZERO,
                last_move: Some(moved_at),
            },
            viewport: Vec2::new(800.0, 600.0),
        }
    }

    fn field(count: u32) -> ParticleField {
        let config = FieldConfig {
            count,
            ..FieldConfig::default()
        };
        ParticleField::new(config, 800.0 / 600.0, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_particle_count_fixed_for_lifetime() {
        for count in [0u32, 1, 400] {
            let mut f = field(count);
            assert_eq!(f.particle_count(), count as usize);
            assert_eq!(f.instances().len(), count as usize);

            for i in 0..100 {
                f.update(tick(i as f32 / 60.0), &FrameInput::idle(Vec2::new(800.0, 600.0)));
            }
            assert_eq!(f.particle_count(), count as usize);
            assert_eq!(f.instances().len(), count as usize);
        }
    }

    #[test]
    fn test_seeded_spawn_is_reproducible() {
        let a = field(50);
        let b = field(50);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.base, pb.base);
            assert_eq!(pa.phase, pb.phase);
        }
    }

    #[test]
    fn test_auto_target_is_pure() {
        let view = Vec2::new(20.0, 15.0);
        assert_eq!(auto_target(3.2, view), auto_target(3.2, view));

        let t = auto_target(3.2, view);
        assert!((t.x - (3.2f32 * 0.3).sin() * view.x * 0.6).abs() < 1e-6);
        assert!((t.y - (3.2f32 * 0.4).cos() * view.y * 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_idle_timeout_switches_to_auto_animation() {
        let config = FieldConfig {
            count: 10,
            lerp_speed: 1.0, // snap straight to the destination
            ..FieldConfig::default()
        };
        let mut f = ParticleField::new(config, 800.0 / 600.0, &mut StdRng::seed_from_u64(1));

        // Pointer moved at t=0; at t=5 it has been idle well past the
        // threshold, so the target must sit exactly on the idle curve.
        let input = pointer_input(Vec2::new(0.9, 0.9), 0.0);
        f.update(tick(5.0), &input);

        let aspect = 800.0 / 600.0;
        let view_half = Vec2::new(TARGET_EXTENT * aspect, TARGET_EXTENT);
        let expected = auto_target(5.0, view_half);
        assert!((f.target() - expected).length() < 1e-4);
    }

    #[test]
    fn test_recent_pointer_input_overrides_auto_animation() {
        let config = FieldConfig {
            count: 1,
            lerp_speed: 1.0,
            ..FieldConfig::default()
        };
        let mut f = ParticleField::new(config, 800.0 / 600.0, &mut StdRng::seed_from_u64(1));

        let input = pointer_input(Vec2::new(0.5, -0.5), 4.9);
        f.update(tick(5.0), &input);

        let aspect = 800.0 / 600.0;
        let view_half = Vec2::new(TARGET_EXTENT * aspect, TARGET_EXTENT);
        let expected = Vec2::new(0.5, -0.5) * view_half;
        assert!((f.target() - expected).length() < 1e-4);
    }

    #[test]
    fn test_ring_deflection_within_magnet_radius() {
        let config = FieldConfig::default();
        let projected = Vec2::new(1.0, -2.0);

        let particle = Particle {
            base: Vec3::new(4.0, 1.0, 0.0), // well within magnet_radius of target
            current: Vec3::new(4.0, 1.0, 0.0),
            phase: 12.3,
            speed: 0.012,
            radius_jitter: 0.7,
        };

        let goal = goal_position(&particle, projected, &config);
        let planar = Vec2::new(goal.x, goal.y);
        let radius = planar.distance(projected);

        // The goal sits on the ring, not on the raw target: radius stays
        // within ring_radius +/- (wave amplitude bound + jitter bound).
        let bound = 0.5 * config.wave_amplitude + 0.5;
        assert!(radius >= config.ring_radius - bound - 1e-4);
        assert!(radius <= config.ring_radius + bound + 1e-4);
        assert!(planar.distance(projected) > 1.0, "goal must not collapse onto the target");
    }

    #[test]
    fn test_outside_magnet_radius_returns_to_base() {
        let config = FieldConfig::default();
        let particle = Particle {
            base: Vec3::new(100.0, 100.0, 5.0),
            current: Vec3::new(100.0, 100.0, 5.0),
            phase: 0.0,
            speed: 0.01,
            radius_jitter: 0.0,
        };

        let goal = goal_position(&particle, Vec2::ZERO, &config);
        assert_eq!(goal, Vec3::new(100.0, 100.0, 5.0 * config.depth_factor));
    }

    #[test]
    fn test_instance_scale_stays_bounded() {
        let mut f = field(200);
        let input = pointer_input(Vec2::ZERO, 0.0);

        for i in 0..240 {
            f.update(tick(i as f32 / 60.0), &input);
        }

        let config = FieldConfig::default();
        let max_pulse = 0.8 + 0.2 * config.particle_variance;
        for instance in f.instances() {
            assert!(instance.scale > 0.0);
            assert!(instance.scale <= config.particle_size * max_pulse + 1e-4);
        }
    }

    #[test]
    fn test_update_moves_current_toward_goal() {
        let config = FieldConfig {
            count: 1,
            lerp_speed: 0.5,
            ..FieldConfig::default()
        };
        let mut f = ParticleField::new(config, 1.0, &mut StdRng::seed_from_u64(3));
        let start = f.particles()[0].current;

        // Pointer parked far away: the particle heads back to base, so
        // repeated updates must not diverge.
        let input = pointer_input(Vec2::new(1.0, 1.0), 0.0);
        for i in 0..60 {
            f.update(tick(i as f32 / 60.0), &input);
        }
        let end = f.particles()[0].current;
        assert!(end.is_finite(), "position diverged from {start:?} to {end:?}");
    }
}
