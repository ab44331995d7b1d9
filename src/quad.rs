//! Drawable geometry: a vertex/index buffer pair with textures and a shader.
use std::{path::Path, ptr::null, rc::Rc};

use crate::{
    error::{GeometryError, TextureError},
    gl_wrappers::{texture_uniform_name, Program, Texture, TextureImage},
    render_vec::{GlLayout, RenderVec},
    vertex::Vertex,
};

/// VAO/VBO/EBO triple, deleted on drop.
#[derive(Debug)]
struct GpuBuffers {
    vao: gl::types::GLuint,
    vbo: gl::types::GLuint,
    ebo: gl::types::GLuint,
}

impl Drop for GpuBuffers {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

/// A piece of indexed geometry drawn with one shader.
///
/// Dynamic quads re-upload their whole vertex buffer on every draw, so the
/// vertices can be mutated in place between frames.
#[derive(Debug)]
pub struct Quad {
    vertices: RenderVec<Vertex>,
    indices: Vec<u32>,
    textures: Vec<Texture>,
    shader: Rc<Program>,
    dynamic: bool,
    buffers: Option<GpuBuffers>,
}

impl Quad {
    /// Geometry that never changes after upload.
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        shader: Rc<Program>,
    ) -> Result<Self, GeometryError> {
        Self::build(vertices, indices, shader, false)
    }

    /// Geometry that is rewritten every frame.
    pub fn dynamic(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        shader: Rc<Program>,
    ) -> Result<Self, GeometryError> {
        Self::build(vertices, indices, shader, true)
    }

    fn build(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        shader: Rc<Program>,
        dynamic: bool,
    ) -> Result<Self, GeometryError> {
        validate_indices(vertices.len(), &indices)?;
        Ok(Self {
            vertices: RenderVec::new(vertices),
            indices,
            textures: vec![],
            shader,
            dynamic,
            buffers: None,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    /// In-place access; the vertex count cannot change.
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        self.vertices.as_mut_slice()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn usage(&self) -> gl::types::GLenum {
        if self.dynamic {
            gl::DYNAMIC_DRAW
        } else {
            gl::STATIC_DRAW
        }
    }

    /// Create the GPU buffers and configure position/color/uv attributes.
    ///
    /// Calling it again replaces the previous buffers.
    pub fn upload_vertices(&mut self) {
        let buffers = unsafe {
            let mut vao = 0;
            gl::GenVertexArrays(1, &mut vao);
            let mut vbo = 0;
            gl::GenBuffers(1, &mut vbo);
            let mut ebo = 0;
            gl::GenBuffers(1, &mut ebo);

            // bind the Vertex Array Object first, then bind and set vertex buffers, and then configure attributes
            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                self.vertices.gl_byte_size(),
                self.vertices.gl_data(),
                self.usage(),
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                std::mem::size_of_val(self.indices.as_slice()) as isize,
                self.indices.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            Vertex::configure_attribs();

            // the EBO binding is VAO state, so only the array buffer is reset
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            GpuBuffers { vao, vbo, ebo }
        };
        log::debug!(
            "quad uploaded: vao {} vbo {} ebo {} ({} vertices, {} indices)",
            buffers.vao,
            buffers.vbo,
            buffers.ebo,
            self.vertices.len(),
            self.indices.len()
        );
        self.buffers = Some(buffers);
    }

    /// Load a texture into the next texture unit, logging any failure.
    ///
    /// On failure the quad simply has one texture fewer.
    pub fn upload_texture(&mut self, path: impl AsRef<Path>) {
        if let Err(err) = self.try_upload_texture(path) {
            log::error!("{err}");
        }
    }

    /// Load a texture into the next texture unit and point the shader's
    /// `texture_<unit>` sampler at it. Returns the unit.
    pub fn try_upload_texture(&mut self, path: impl AsRef<Path>) -> Result<usize, TextureError> {
        let image = TextureImage::open(path)?;
        let texture = Texture::upload(&image)?;
        let unit = self.textures.len();
        self.shader.set_int(&texture_uniform_name(unit), unit as i32);
        log::debug!(
            "texture {} ({}x{} {:?}) -> unit {unit}",
            image.path.display(),
            image.width,
            image.height,
            image.format
        );
        self.textures.push(texture);
        Ok(unit)
    }

    /// Draw every index as triangles.
    pub fn draw(&self) {
        let Some(buffers) = &self.buffers else {
            log::warn!("draw called on a quad that was never uploaded");
            return;
        };
        self.shader.bind();
        unsafe {
            gl::BindVertexArray(buffers.vao);
            if self.dynamic {
                gl::BindBuffer(gl::ARRAY_BUFFER, buffers.vbo);
                gl::BufferData(
                    gl::ARRAY_BUFFER,
                    self.vertices.gl_byte_size(),
                    self.vertices.gl_data(),
                    gl::DYNAMIC_DRAW,
                );
                gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            }
        }
        for (unit, texture) in self.textures.iter().enumerate() {
            texture.bind(unit as u32);
        }
        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                self.indices.len() as gl::types::GLsizei,
                gl::UNSIGNED_INT,
                null(),
            );
            gl::BindVertexArray(0);
        }
    }
}

/// Every index must name an existing vertex.
pub fn validate_indices(vertex_count: usize, indices: &[u32]) -> Result<(), GeometryError> {
    if vertex_count == 0 {
        return Err(GeometryError::Empty);
    }
    match indices
        .iter()
        .enumerate()
        .find(|(_, index)| **index as usize >= vertex_count)
    {
        Some((position, &index)) => Err(GeometryError::IndexOutOfRange {
            position,
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_indices_are_valid() {
        assert_eq!(validate_indices(4, &[0, 1, 3, 1, 2, 3]), Ok(()));
    }

    #[test]
    fn out_of_range_index_is_reported() {
        assert_eq!(
            validate_indices(3, &[0, 1, 2, 2, 3, 0]),
            Err(GeometryError::IndexOutOfRange {
                position: 4,
                index: 3,
                vertex_count: 3,
            })
        );
    }

    #[test]
    fn empty_geometry_is_rejected() {
        assert_eq!(validate_indices(0, &[]), Err(GeometryError::Empty));
    }
}
