//! Typed uniform bindings validated against shader source.
//!
//! Each shader-backed component declares its uniform block once as a
//! [`UniformTable`]: an ordered list of (name, type) pairs with std-layout
//! offsets computed on the Rust side. At construction the table is checked
//! against the actual WGSL via naga reflection, so a renamed, retyped, or
//! reordered struct member fails component init with a diagnostic instead
//! of silently feeding the draw call garbage every frame.
//!
//! # Example
//!
//! ```ignore
//! let table = UniformTable::new()
//!     .with("resolution", UniformType::Vec2)
//!     .with("time", UniformType::F32);
//!
//! table.validate_wgsl(SHADER_SOURCE, "Params")?;
//! ```

use naga::{ScalarKind, TypeInner, VectorSize};

use crate::error::ShaderError;

/// Supported uniform member types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformType {
    F32,
    Vec2,
    Vec3,
    Vec4,
}

impl UniformType {
    /// The WGSL type name for this member.
    pub fn wgsl_type(&self) -> &'static str {
        match self {
            UniformType::F32 => "f32",
            UniformType::Vec2 => "vec2<f32>",
            UniformType::Vec3 => "vec3<f32>",
            UniformType::Vec4 => "vec4<f32>",
        }
    }

    /// Byte size without trailing padding.
    pub fn byte_size(&self) -> u32 {
        match self {
            UniformType::F32 => 4,
            UniformType::Vec2 => 8,
            UniformType::Vec3 => 12,
            UniformType::Vec4 => 16,
        }
    }

    /// Required byte alignment in a uniform-address-space struct.
    pub fn align(&self) -> u32 {
        match self {
            UniformType::F32 => 4,
            UniformType::Vec2 => 8,
            // vec3 aligns to 16; scalars may pack into its trailing bytes
            UniformType::Vec3 => 16,
            UniformType::Vec4 => 16,
        }
    }

    fn matches(&self, inner: &TypeInner) -> bool {
        let float = |s: &naga::Scalar| s.kind == ScalarKind::Float && s.width == 4;
        match (self, inner) {
            (UniformType::F32, TypeInner::Scalar(s)) => float(s),
            (UniformType::Vec2, TypeInner::Vector { size, scalar }) => {
                *size == VectorSize::Bi && float(scalar)
            }
            (UniformType::Vec3, TypeInner::Vector { size, scalar }) => {
                *size == VectorSize::Tri && float(scalar)
            }
            (UniformType::Vec4, TypeInner::Vector { size, scalar }) => {
                *size == VectorSize::Quad && float(scalar)
            }
            _ => false,
        }
    }
}

/// One member of a uniform block.
#[derive(Clone, Debug)]
pub struct UniformBinding {
    pub name: String,
    pub ty: UniformType,
    /// Byte offset within the uniform buffer.
    pub offset: u32,
}

/// Ordered uniform block description with computed std-layout offsets.
#[derive(Clone, Debug, Default)]
pub struct UniformTable {
    bindings: Vec<UniformBinding>,
    end: u32,
}

impl UniformTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member, computing its aligned offset.
    pub fn with(mut self, name: &str, ty: UniformType) -> Self {
        let offset = align_to(self.end, ty.align());
        self.end = offset + ty.byte_size();
        self.bindings.push(UniformBinding {
            name: name.to_string(),
            ty,
            offset,
        });
        self
    }

    /// Byte offset of a member, if declared.
    pub fn offset_of(&self, name: &str) -> Option<u32> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.offset)
    }

    /// Total buffer size, rounded up to the 16-byte uniform alignment.
    pub fn byte_size(&self) -> u32 {
        align_to(self.end, 16)
    }

    /// Iterate over all declared members.
    pub fn iter(&self) -> impl Iterator<Item = &UniformBinding> {
        self.bindings.iter()
    }

    /// Check this table against the `struct_name` declaration in `source`.
    ///
    /// Every member must exist in the shader struct with the same type and
    /// byte offset. Parse failures carry the naga diagnostic text.
    pub fn validate_wgsl(&self, source: &str, struct_name: &str) -> Result<(), ShaderError> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| ShaderError::Parse(e.emit_to_string(source)))?;

        let members = module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), TypeInner::Struct { members, .. }) if name == struct_name => {
                    Some(members)
                }
                _ => None,
            })
            .ok_or_else(|| ShaderError::MissingStruct(struct_name.to_string()))?;

        for binding in &self.bindings {
            let member = members
                .iter()
                .find(|m| m.name.as_deref() == Some(binding.name.as_str()))
                .ok_or_else(|| ShaderError::MissingUniform(binding.name.clone()))?;

            let inner = &module.types[member.ty].inner;
            if !binding.ty.matches(inner) {
                return Err(ShaderError::UniformType {
                    name: binding.name.clone(),
                    expected: binding.ty.wgsl_type(),
                    found: describe_type(inner),
                });
            }

            if member.offset != binding.offset {
                return Err(ShaderError::UniformOffset {
                    name: binding.name.clone(),
                    expected: binding.offset,
                    found: member.offset,
                });
            }
        }

        Ok(())
    }
}

fn align_to(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

fn describe_type(inner: &TypeInner) -> String {
    match inner {
        TypeInner::Scalar(s) => format!("{:?}({} bytes)", s.kind, s.width),
        TypeInner::Vector { size, scalar } => {
            format!("vec{}<{:?}>", *size as u8, scalar.kind)
        }
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_WGSL: &str = r#"
struct Params {
    resolution: vec2<f32>,
    pointer: vec2<f32>,
    color: vec3<f32>,
    time: f32,
    speed: f32,
}

@group(0) @binding(0)
var<uniform> params: Params;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(params.color * params.time * params.speed, 1.0);
}
"#;

    fn sample_table() -> UniformTable {
        UniformTable::new()
            .with("resolution", UniformType::Vec2)
            .with("pointer", UniformType::Vec2)
            .with("color", UniformType::Vec3)
            .with("time", UniformType::F32)
            .with("speed", UniformType::F32)
    }

    #[test]
    fn test_std_layout_offsets() {
        let table = sample_table();
        assert_eq!(table.offset_of("resolution"), Some(0));
        assert_eq!(table.offset_of("pointer"), Some(8));
        // vec3 aligns up to 16
        assert_eq!(table.offset_of("color"), Some(16));
        // f32 packs into the vec3's trailing bytes
        assert_eq!(table.offset_of("time"), Some(28));
        assert_eq!(table.offset_of("speed"), Some(32));
        assert_eq!(table.byte_size(), 48);
    }

    #[test]
    fn test_validates_matching_shader() {
        sample_table()
            .validate_wgsl(SAMPLE_WGSL, "Params")
            .expect("table should match shader");
    }

    #[test]
    fn test_missing_member_names_the_uniform() {
        let table = sample_table().with("opacity", UniformType::F32);
        let err = table.validate_wgsl(SAMPLE_WGSL, "Params").unwrap_err();
        match err {
            ShaderError::MissingUniform(name) => assert_eq!(name, "opacity"),
            other => panic!("expected MissingUniform, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_reported() {
        let table = UniformTable::new().with("resolution", UniformType::Vec3);
        let err = table.validate_wgsl(SAMPLE_WGSL, "Params").unwrap_err();
        match err {
            ShaderError::UniformType { name, expected, .. } => {
                assert_eq!(name, "resolution");
                assert_eq!(expected, "vec3<f32>");
            }
            other => panic!("expected UniformType, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_struct() {
        let err = sample_table()
            .validate_wgsl(SAMPLE_WGSL, "Uniforms")
            .unwrap_err();
        assert!(matches!(err, ShaderError::MissingStruct(_)));
    }

    #[test]
    fn test_unparseable_shader() {
        let err = sample_table()
            .validate_wgsl("struct Params {", "Params")
            .unwrap_err();
        assert!(matches!(err, ShaderError::Parse(_)));
    }
}
