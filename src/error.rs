//! Error types for sitefx.
//!
//! Failures here follow one rule: a broken effect stays broken alone.
//! Initialization and shader errors are reported to the caller, logged,
//! and the affected component goes inert; nothing propagates across
//! component boundaries.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur while building a shader program.
///
/// Raised at component construction so a renamed or mistyped uniform
/// fails loudly instead of silently no-opping every frame.
#[derive(Debug)]
pub enum ShaderError {
    /// WGSL source failed to parse. Carries the naga diagnostic text.
    Parse(String),
    /// The expected uniform struct is not declared in the shader.
    MissingStruct(String),
    /// A declared uniform member is absent from the shader struct.
    MissingUniform(String),
    /// A uniform member exists but with a different type.
    UniformType {
        name: String,
        expected: &'static str,
        found: String,
    },
    /// A uniform member exists but at a different byte offset.
    UniformOffset {
        name: String,
        expected: u32,
        found: u32,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Parse(diag) => write!(f, "Shader failed to parse:\n{}", diag),
            ShaderError::MissingStruct(name) => {
                write!(f, "Shader does not declare uniform struct '{}'", name)
            }
            ShaderError::MissingUniform(name) => {
                write!(f, "Shader uniform struct is missing member '{}'", name)
            }
            ShaderError::UniformType {
                name,
                expected,
                found,
            } => write!(
                f,
                "Shader uniform '{}' has type {} but the binding table expects {}",
                name, found, expected
            ),
            ShaderError::UniformOffset {
                name,
                expected,
                found,
            } => write!(
                f,
                "Shader uniform '{}' is at offset {} but the binding table expects {}",
                name, found, expected
            ),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Errors that can occur when running a stage.
#[derive(Debug)]
pub enum StageError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            StageError::Window(e) => write!(f, "Failed to create window: {}", e),
            StageError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StageError::EventLoop(e) => Some(e),
            StageError::Window(e) => Some(e),
            StageError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for StageError {
    fn from(e: winit::error::EventLoopError) -> Self {
        StageError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for StageError {
    fn from(e: winit::error::OsError) -> Self {
        StageError::Window(e)
    }
}

impl From<GpuError> for StageError {
    fn from(e: GpuError) -> Self {
        StageError::Gpu(e)
    }
}
