//! Vertex format emitted by the UI library

use bytemuck::{Pod, Zeroable};

/// UI vertex: pixel position, straight RGBA colour and texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct UiVertex {
    /// Position in context pixels
    pub position: [f32; 2],
    /// Colour, normalised in the shader
    pub colour: [u8; 4],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
}

impl UiVertex {
    /// Create a vertex
    pub const fn new(position: [f32; 2], colour: [u8; 4], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            colour,
            tex_coord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::VertexDecl;

    #[test]
    fn test_layout_matches_declaration() {
        let decl = VertexDecl::ui();
        assert_eq!(std::mem::size_of::<UiVertex>(), decl.stride as usize);
        assert_eq!(std::mem::offset_of!(UiVertex, colour), decl.attributes[1].offset as usize);
        assert_eq!(std::mem::offset_of!(UiVertex, tex_coord), decl.attributes[2].offset as usize);
    }

    #[test]
    fn test_casts_to_bytes() {
        let vertices = [UiVertex::new([1.0, 2.0], [255, 0, 0, 255], [0.0, 1.0]); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 60);
        assert_eq!(&bytes[8..12], &[255, 0, 0, 255]);
    }
}
