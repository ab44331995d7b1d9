use crate::render_vec::{Attrib, GlLayout};

/// Interleaved vertex: position, color, texture coordinates.
///
/// If you're adding a field, update the [`GlLayout`] impl below!
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub pos: glm::Vec3,
    pub color: glm::Vec3,
    pub uv: glm::Vec2,
}

impl Vertex {
    pub fn new(pos: [f32; 3], color: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            pos: pos.into(),
            color: color.into(),
            uv: uv.into(),
        }
    }

    /// A vertex without texture coordinates.
    pub fn colored(pos: [f32; 3], color: [f32; 3]) -> Self {
        Self::new(pos, color, [0.0, 0.0])
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            pos: glm::Vec3::zeros(),
            color: glm::Vec3::zeros(),
            uv: glm::Vec2::zeros(),
        }
    }
}

// SAFETY:
// Vertex is repr(C) and nalgebra's vectors are plain float arrays, so the
// struct is exactly 3 + 3 + 2 tightly packed f32s.
unsafe impl GlLayout for Vertex {
    const ATTRIBS: &'static [Attrib] = &[Attrib::floats(3), Attrib::floats(3), Attrib::floats(2)];
}
