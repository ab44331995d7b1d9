//! Exports [`Program`].
use std::{ffi::CString, path::Path};

use super::shader::{info_log_to_string, read_source, CompiledShader, Shader};
use crate::error::ShaderError;

/// Wrapper for a linked OpenGL program.
///
/// <https://www.khronos.org/opengl/wiki/GLSL_Object#Program_objects>
#[derive(Debug)]
pub struct Program {
    id: gl::types::GLuint,
}

impl Program {
    /// Load, compile and link a vertex/fragment pair from disk.
    ///
    /// Compile and link diagnostics are logged and a program is returned
    /// anyway; a broken program just draws nothing useful. Only unreadable
    /// source files are reported as errors.
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let (vertex_path, fragment_path) = (vertex_path.as_ref(), fragment_path.as_ref());
        let vertex_source = read_source(vertex_path)?;
        let fragment_source = read_source(fragment_path)?;

        let vert_shader = compile_logged(Shader::vertex(vertex_source), vertex_path);
        let frag_shader = compile_logged(Shader::fragment(fragment_source), fragment_path);

        let program = Self::link(&vert_shader, &frag_shader);
        if let Some(log) = program.link_error() {
            log::error!(
                "PROGRAM_LINKING_ERROR ({} + {}):\n{log}",
                vertex_path.display(),
                fragment_path.display()
            );
        } else {
            log::debug!(
                "linked program {} from {} + {}",
                program.id,
                vertex_path.display(),
                fragment_path.display()
            );
        }
        Ok(program)
    }

    fn link(vert_shader: &CompiledShader, frag_shader: &CompiledShader) -> Self {
        let id = unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert_shader.id());
            gl::AttachShader(program, frag_shader.id());
            gl::LinkProgram(program);
            program
        };
        Self { id }
    }

    fn link_error(&self) -> Option<String> {
        unsafe {
            let mut success = 0;
            gl::GetProgramiv(self.id, gl::LINK_STATUS, &mut success);
            if success == gl::TRUE.into() {
                return None;
            }
            let mut length = 0;
            gl::GetProgramiv(self.id, gl::INFO_LOG_LENGTH, &mut length);
            let mut infolog: Vec<u8> = vec![0; length.max(1) as usize];
            let mut written = 0;
            gl::GetProgramInfoLog(
                self.id,
                infolog.len() as gl::types::GLsizei,
                &mut written,
                infolog.as_mut_ptr().cast(),
            );
            Some(info_log_to_string(infolog, written))
        }
    }

    /// Make this the current program.
    pub fn bind(&self) {
        unsafe { gl::UseProgram(self.id) }
    }

    /// Get the location of a uniform in this program.
    ///
    /// Returns `None` for unknown names and names with interior nuls.
    pub fn get_uniform_location(&self, name: impl AsRef<str>) -> Option<gl::types::GLint> {
        let name = CString::new(name.as_ref()).ok()?;
        let uniform_location = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };
        (uniform_location >= 0).then_some(uniform_location)
    }

    // The setters bind the program first; a missing uniform is a no-op like in GL.

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.bind();
        match self.get_uniform_location(name) {
            Some(location) => unsafe { gl::Uniform1i(location, value) },
            None => log::trace!("program {}: no uniform `{name}`", self.id),
        }
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.bind();
        match self.get_uniform_location(name) {
            Some(location) => unsafe { gl::Uniform1f(location, value) },
            None => log::trace!("program {}: no uniform `{name}`", self.id),
        }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

fn compile_logged(shader: Shader, path: &Path) -> CompiledShader {
    match shader.compile() {
        Ok(compiled) => compiled,
        Err((compiled, log)) => {
            log::error!(
                "SHADER_COMPILATION_ERROR of type {} in {}:\n{log}",
                compiled.shader_type().label(),
                path.display()
            );
            compiled
        }
    }
}
