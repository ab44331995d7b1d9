//! Typed vertex storage that hands OpenGL a flat byte view.
use std::ffi::c_void;

/// One vertex attribute: `components` consecutive `f32`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attrib {
    pub components: usize,
}

impl Attrib {
    pub const fn floats(components: usize) -> Self {
        Self { components }
    }

    pub const fn byte_size(&self) -> usize {
        self.components * std::mem::size_of::<f32>()
    }
}

/// # Safety
/// `ATTRIBS` must describe the exact in-memory layout of `Self`, in order and
/// without padding: the byte size of all attributes must equal
/// `size_of::<Self>()`.
pub unsafe trait GlLayout: Copy {
    const ATTRIBS: &'static [Attrib];

    /// Bytes between two consecutive vertices.
    fn stride() -> usize {
        Self::ATTRIBS.iter().map(Attrib::byte_size).sum()
    }

    /// `(location, attrib, byte offset)` for every attribute.
    fn attrib_offsets() -> Vec<(u32, Attrib, usize)> {
        let mut offset = 0;
        Self::ATTRIBS
            .iter()
            .enumerate()
            .map(|(location, attrib)| {
                let entry = (location as u32, *attrib, offset);
                offset += attrib.byte_size();
                entry
            })
            .collect()
    }

    /// Point the currently bound VAO at the currently bound `ARRAY_BUFFER`.
    fn configure_attribs() {
        let stride = Self::stride() as gl::types::GLsizei;
        for (location, attrib, offset) in Self::attrib_offsets() {
            unsafe {
                gl::VertexAttribPointer(
                    location,
                    attrib.components as gl::types::GLint,
                    gl::FLOAT,
                    gl::FALSE,
                    stride,
                    offset as *const c_void,
                );
                gl::EnableVertexAttribArray(location);
            }
        }
    }
}

/// A fixed-length run of vertices.
///
/// The length is set at construction: only in-place mutation is exposed, so
/// the byte view is always a whole number of strides.
#[derive(Clone, Debug)]
pub struct RenderVec<LayoutT: GlLayout> {
    inner: Vec<LayoutT>,
}

impl<LayoutT: GlLayout> RenderVec<LayoutT> {
    pub fn new(values: Vec<LayoutT>) -> Self {
        debug_assert_eq!(LayoutT::stride(), std::mem::size_of::<LayoutT>());
        Self { inner: values }
    }
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn as_slice(&self) -> &[LayoutT] {
        &self.inner
    }
    pub fn as_mut_slice(&mut self) -> &mut [LayoutT] {
        &mut self.inner
    }
    pub fn stride(&self) -> usize {
        LayoutT::stride()
    }
    pub fn gl_byte_size(&self) -> isize {
        (self.inner.len() * LayoutT::stride()) as isize
    }
    pub fn gl_data(&self) -> *const c_void {
        self.inner.as_ptr().cast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;

    #[test]
    fn vertex_layout_is_eight_floats() {
        assert_eq!(Vertex::stride(), 8 * std::mem::size_of::<f32>());
        assert_eq!(Vertex::stride(), std::mem::size_of::<Vertex>());
        let offsets: Vec<_> = Vertex::attrib_offsets()
            .into_iter()
            .map(|(location, attrib, offset)| (location, attrib.components, offset))
            .collect();
        assert_eq!(offsets, vec![(0, 3, 0), (1, 3, 12), (2, 2, 24)]);
    }

    #[test]
    fn byte_size_is_whole_strides() {
        let vec = RenderVec::new(vec![Vertex::default(); 4]);
        assert_eq!(vec.len(), 4);
        assert_eq!(vec.gl_byte_size() as usize, 4 * vec.stride());
        assert_eq!(vec.gl_byte_size() as usize % vec.stride(), 0);
    }

    #[test]
    fn gl_data_matches_field_values() {
        let vertex = Vertex::new([1.0, 2.0, 3.0], [0.25, 0.5, 0.75], [0.0, 1.0]);
        let vec = RenderVec::new(vec![vertex]);
        let floats: &[f32] = unsafe { std::slice::from_raw_parts(vec.gl_data().cast(), 8) };
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.25, 0.5, 0.75, 0.0, 1.0]);
    }
}
