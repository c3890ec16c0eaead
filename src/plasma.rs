//! Full-viewport plasma shader background.
//!
//! One fixed vertex/fragment program draws a blended plasma wash behind
//! the page content. The CPU side owns the uniform state: elapsed time,
//! resolution, and pointer position are folded into a [`PlasmaUniforms`]
//! value each frame and uploaded as a single buffer write.
//!
//! Construction validates the uniform layout against the WGSL with
//! [`UniformTable::validate_wgsl`]; a build that drifts from the shader
//! fails here, once, with a readable diagnostic. A failed plasma leaves
//! the rest of the stage untouched.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::color;
use crate::error::ShaderError;
use crate::scheduler::{FrameInput, FrameTick};
use crate::uniforms::{UniformTable, UniformType};

/// WGSL source for the plasma pass: a full-viewport triangle and a
/// sin-sum plasma fragment tinted toward the configured color.
pub const PLASMA_WGSL: &str = r#"
struct PlasmaParams {
    resolution: vec2<f32>,
    pointer: vec2<f32>,
    color: vec3<f32>,
    time: f32,
    speed: f32,
    scale: f32,
    opacity: f32,
    pointer_influence: f32,
}

@group(0) @binding(0)
var<uniform> params: PlasmaParams;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    // One triangle covering the viewport: (-1,-1), (-1,3), (3,-1)
    let x = f32(i32(vertex_index) / 2) * 4.0 - 1.0;
    let y = f32(i32(vertex_index) & 1) * 4.0 - 1.0;
    return vec4<f32>(x, y, 0.0, 1.0);
}

@fragment
fn fs_main(@builtin(position) frag_coord: vec4<f32>) -> @location(0) vec4<f32> {
    var uv = frag_coord.xy / params.resolution;
    let center = vec2<f32>(0.5, 0.5);

    // Pointer pulls the pattern toward itself, fading out at the edges
    let pointer_norm = params.pointer / params.resolution;
    let pointer_offset = (pointer_norm - center) * 0.1 * params.pointer_influence;
    uv += pointer_offset * (1.0 - length(uv - center));

    // Scale out from the center
    uv = (uv - center) / params.scale + center;

    let t = params.time * params.speed;

    var v = 0.0;
    var c = uv * 8.0 - vec2<f32>(4.0, 4.0);
    v += sin(c.x + t);
    v += sin((c.y + t) / 2.0);
    v += sin((c.x + c.y + t) / 2.0);
    c += vec2<f32>(sin(t / 3.0), cos(t / 2.0)) * 2.0;
    v += sin(sqrt(c.x * c.x + c.y * c.y + 1.0) + t);
    v = v / 2.0;

    let pi = 3.14159265;
    let col = vec3<f32>(sin(v * pi), sin(v * pi + 2.094), sin(v * pi + 4.188));
    let intensity = (col.x + col.y + col.z) / 3.0;
    let tinted = mix(col * 0.3, params.color * intensity * 1.5, 0.7);

    // Fade toward the viewport edges for a soft vignette
    let edge = smoothstep(0.0, 0.3, min(min(uv.x, 1.0 - uv.x), min(uv.y, 1.0 - uv.y)));

    return vec4<f32>(tinted, intensity * params.opacity * edge);
}
"#;

/// Name of the uniform struct inside [`PLASMA_WGSL`].
pub const PLASMA_STRUCT: &str = "PlasmaParams";

/// Configuration for a [`PlasmaBackground`].
#[derive(Clone, Debug)]
pub struct PlasmaConfig {
    /// Tint color as a hex string. Invalid input falls back to the
    /// default color. Default: `"#A8F0FF"`.
    pub color: String,

    /// Animation speed multiplier. Default: 0.6.
    pub speed: f32,

    /// Pattern scale out from the viewport center. Default: 1.1.
    pub scale: f32,

    /// Overall opacity of the wash. Default: 0.8.
    pub opacity: f32,

    /// Whether the pointer distorts the pattern. Default: true.
    pub pointer_interactive: bool,
}

impl Default for PlasmaConfig {
    fn default() -> Self {
        Self {
            color: "#A8F0FF".to_string(),
            speed: 0.6,
            scale: 1.1,
            opacity: 0.8,
            pointer_interactive: true,
        }
    }
}

/// CPU mirror of the WGSL `PlasmaParams` uniform struct.
///
/// Field order and padding must track the shader; the layout is checked
/// by [`PlasmaBackground::new`] through the uniform table.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PlasmaUniforms {
    pub resolution: [f32; 2],
    pub pointer: [f32; 2],
    pub color: [f32; 3],
    pub time: f32,
    pub speed: f32,
    pub scale: f32,
    pub opacity: f32,
    pub pointer_influence: f32,
}

/// Uniform state for the plasma pass, recomputed every frame.
pub struct PlasmaBackground {
    color: Vec3,
    config: PlasmaConfig,
    uniforms: PlasmaUniforms,
}

impl PlasmaBackground {
    /// The uniform block layout this component uploads.
    pub fn uniform_table() -> UniformTable {
        UniformTable::new()
            .with("resolution", UniformType::Vec2)
            .with("pointer", UniformType::Vec2)
            .with("color", UniformType::Vec3)
            .with("time", UniformType::F32)
            .with("speed", UniformType::F32)
            .with("scale", UniformType::F32)
            .with("opacity", UniformType::F32)
            .with("pointer_influence", UniformType::F32)
    }

    /// Build the component, validating the uniform layout against the
    /// shader source. Fails fast on any mismatch.
    pub fn new(config: PlasmaConfig) -> Result<Self, ShaderError> {
        Self::uniform_table().validate_wgsl(PLASMA_WGSL, PLASMA_STRUCT)?;

        let color = color::hex_to_rgb(&config.color);
        let uniforms = PlasmaUniforms {
            resolution: [1.0, 1.0],
            pointer: [0.0, 0.0],
            color: color.to_array(),
            time: 0.0,
            // The raw speed is damped so the default reads as a slow wash
            speed: config.speed * 0.4,
            scale: config.scale,
            opacity: config.opacity,
            pointer_influence: if config.pointer_interactive { 1.0 } else { 0.0 },
        };

        Ok(Self {
            color,
            config,
            uniforms,
        })
    }

    /// Update the resolution after a surface resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.uniforms.resolution = [width as f32, height as f32];
    }

    /// Fold the frame clock and pointer snapshot into the uniform state.
    pub fn update(&mut self, tick: FrameTick, input: &FrameInput) {
        self.uniforms.time = tick.elapsed;
        if self.config.pointer_interactive {
            self.uniforms.pointer = input.pointer.position.to_array();
        }
    }

    /// The uniform values as of the last update.
    pub fn uniforms(&self) -> &PlasmaUniforms {
        &self.uniforms
    }

    /// Raw bytes of the uniform buffer, ready for upload.
    pub fn uniform_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.uniforms)
    }

    /// The resolved tint color.
    pub fn tint(&self) -> Vec3 {
        self.color
    }
}
