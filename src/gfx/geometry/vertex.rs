//! # Vertex Layout
//!
//! Interleaved vertices carry up to five attributes, always in the same
//! canonical order: position, normal, texture coordinate, tangent, bitangent.
//! Which of them a mesh carries is recorded in an [`AttributePresence`], from
//! which the stride and the per-attribute offsets follow.

/// A per-vertex attribute in canonical interleaving order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    TexCoord,
    Tangent,
    Bitangent,
}

impl VertexAttribute {
    /// Every attribute, in the order it is interleaved.
    pub const CANONICAL: [VertexAttribute; 5] = [
        VertexAttribute::Position,
        VertexAttribute::Normal,
        VertexAttribute::TexCoord,
        VertexAttribute::Tangent,
        VertexAttribute::Bitangent,
    ];

    /// Number of floats this attribute occupies.
    pub fn components(self) -> usize {
        match self {
            VertexAttribute::TexCoord => 2,
            _ => 3,
        }
    }

    /// Shader input location the attribute is bound to.
    pub fn shader_location(self) -> u32 {
        match self {
            VertexAttribute::Position => 0,
            VertexAttribute::Normal => 1,
            VertexAttribute::TexCoord => 2,
            VertexAttribute::Tangent => 3,
            VertexAttribute::Bitangent => 4,
        }
    }

    pub fn format(self) -> wgpu::VertexFormat {
        match self.components() {
            2 => wgpu::VertexFormat::Float32x2,
            _ => wgpu::VertexFormat::Float32x3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VertexAttribute::Position => "position",
            VertexAttribute::Normal => "normal",
            VertexAttribute::TexCoord => "texcoord",
            VertexAttribute::Tangent => "tangent",
            VertexAttribute::Bitangent => "bitangent",
        }
    }
}

/// Which attributes an interleaved vertex buffer carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AttributePresence {
    pub position: bool,
    pub normal: bool,
    pub uv: bool,
    pub tangent: bool,
    pub bitangent: bool,
}

impl AttributePresence {
    pub const POSITION_ONLY: AttributePresence = AttributePresence {
        position: true,
        normal: false,
        uv: false,
        tangent: false,
        bitangent: false,
    };

    pub fn contains(&self, attribute: VertexAttribute) -> bool {
        match attribute {
            VertexAttribute::Position => self.position,
            VertexAttribute::Normal => self.normal,
            VertexAttribute::TexCoord => self.uv,
            VertexAttribute::Tangent => self.tangent,
            VertexAttribute::Bitangent => self.bitangent,
        }
    }

    /// True when every attribute present in `required` is present here.
    pub fn satisfies(&self, required: &AttributePresence) -> bool {
        VertexAttribute::CANONICAL
            .iter()
            .all(|&attribute| !required.contains(attribute) || self.contains(attribute))
    }

    /// Present attributes in canonical order.
    pub fn attributes(&self) -> impl Iterator<Item = VertexAttribute> + '_ {
        VertexAttribute::CANONICAL
            .into_iter()
            .filter(move |&attribute| self.contains(attribute))
    }

    /// Floats per vertex.
    pub fn stride(&self) -> usize {
        self.attributes().map(VertexAttribute::components).sum()
    }

    /// Float offset of each present attribute inside one vertex.
    pub fn offsets(&self) -> Vec<(VertexAttribute, usize)> {
        let mut offset = 0;
        self.attributes()
            .map(|attribute| {
                let entry = (attribute, offset);
                offset += attribute.components();
                entry
            })
            .collect()
    }

    /// The wgpu attribute list matching [`Self::offsets`], in bytes.
    pub fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        self.offsets()
            .into_iter()
            .map(|(attribute, offset)| wgpu::VertexAttribute {
                offset: (offset * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                shader_location: attribute.shader_location(),
                format: attribute.format(),
            })
            .collect()
    }

    /// Stride in bytes.
    pub fn array_stride(&self) -> wgpu::BufferAddress {
        (self.stride() * std::mem::size_of::<f32>()) as wgpu::BufferAddress
    }

    /// Returns the vertex buffer layout for an attribute list built by
    /// [`Self::wgpu_attributes`].
    pub fn buffer_layout<'a>(
        &self,
        attributes: &'a [wgpu::VertexAttribute],
    ) -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }

    /// Compact bit mask, used as a cache key.
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        for (i, attribute) in VertexAttribute::CANONICAL.into_iter().enumerate() {
            if self.contains(attribute) {
                bits |= 1 << i;
            }
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> AttributePresence {
        AttributePresence {
            position: true,
            normal: true,
            uv: true,
            tangent: true,
            bitangent: true,
        }
    }

    #[test]
    fn test_stride_sums_present_attributes() {
        assert_eq!(full().stride(), 14);
        assert_eq!(AttributePresence::POSITION_ONLY.stride(), 3);
        assert_eq!(AttributePresence::default().stride(), 0);

        let no_normals = AttributePresence {
            position: true,
            uv: true,
            ..Default::default()
        };
        assert_eq!(no_normals.stride(), 5);
    }

    #[test]
    fn test_offsets_are_cumulative_in_canonical_order() {
        let offsets = full().offsets();
        assert_eq!(
            offsets,
            vec![
                (VertexAttribute::Position, 0),
                (VertexAttribute::Normal, 3),
                (VertexAttribute::TexCoord, 6),
                (VertexAttribute::Tangent, 8),
                (VertexAttribute::Bitangent, 11),
            ]
        );

        let skip_normal = AttributePresence {
            position: true,
            uv: true,
            tangent: true,
            ..Default::default()
        };
        assert_eq!(
            skip_normal.offsets(),
            vec![
                (VertexAttribute::Position, 0),
                (VertexAttribute::TexCoord, 3),
                (VertexAttribute::Tangent, 5),
            ]
        );
    }

    #[test]
    fn test_wgpu_attributes_use_fixed_locations() {
        let skip_normal = AttributePresence {
            position: true,
            uv: true,
            ..Default::default()
        };
        let attributes = skip_normal.wgpu_attributes();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[1].shader_location, 2);
        assert_eq!(attributes[1].offset, 12);
        assert_eq!(attributes[1].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(skip_normal.array_stride(), 20);
    }

    #[test]
    fn test_satisfies() {
        assert!(full().satisfies(&AttributePresence::POSITION_ONLY));
        assert!(!AttributePresence::POSITION_ONLY.satisfies(&full()));
    }
}
