//! Exports [`Shader`] and [`CompiledShader`].
use std::{ffi::CString, fs, path::Path, ptr::null};

use crate::error::ShaderError;

/// An uncompiled OpenGL shader.
/// Contains the source code necessary to compile it.
pub struct Shader {
    /// GL ID for this shader.
    inner: gl::types::GLuint,
    source: CString,
    shader_type: ShaderType,
    was_compiled: bool,
}

/// Represents the type of a shader object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderType {
    Fragment,
    Vertex,
}

impl ShaderType {
    fn gl_enum(self) -> gl::types::GLenum {
        match self {
            ShaderType::Fragment => gl::FRAGMENT_SHADER,
            ShaderType::Vertex => gl::VERTEX_SHADER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShaderType::Fragment => "FRAGMENT",
            ShaderType::Vertex => "VERTEX",
        }
    }
}

impl Shader {
    /// Wrap shader source code into a type-safe Rust struct.
    pub fn new(shader_type: ShaderType, source: impl Into<CString>) -> Self {
        let shader = unsafe { gl::CreateShader(shader_type.gl_enum()) };
        Self {
            inner: shader,
            source: source.into(),
            shader_type,
            was_compiled: false,
        }
    }
    /// Helper function for `Shader::new()` with vertex shaders.
    pub fn vertex(source: CString) -> Self {
        Self::new(ShaderType::Vertex, source)
    }
    /// Helper function for `Shader::new()` with fragment shaders.
    pub fn fragment(source: CString) -> Self {
        Self::new(ShaderType::Fragment, source)
    }

    /// Compile this shader.
    ///
    /// # Errors
    /// When the driver rejects the source, the shader object is handed back
    /// anyway together with the driver's info log.
    pub fn compile(mut self) -> Result<CompiledShader, (CompiledShader, String)> {
        let success = unsafe {
            gl::ShaderSource(self.inner, 1, &self.source.as_ptr(), null());
            gl::CompileShader(self.inner);

            let mut success = 0;
            gl::GetShaderiv(self.inner, gl::COMPILE_STATUS, &mut success);
            success == gl::TRUE.into()
        };
        self.was_compiled = true;
        // SAFETY: `self.inner` came from gl::CreateShader and went through gl::CompileShader.
        let compiled = unsafe { CompiledShader::new_unchecked(self.inner, self.shader_type) };
        if success {
            Ok(compiled)
        } else {
            let log = compiled.info_log();
            Err((compiled, log))
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            if !self.was_compiled {
                gl::DeleteShader(self.inner);
            }
        }
    }
}

/// A compiled shader object.
/// This can be linked and used in [`Program`](super::Program)s.
pub struct CompiledShader {
    id: gl::types::GLuint,
    shader_type: ShaderType,
}

impl CompiledShader {
    /// # Safety
    /// `shader` MUST be a shader object that went through `gl::CompileShader`.
    pub unsafe fn new_unchecked(shader: gl::types::GLuint, shader_type: ShaderType) -> Self {
        Self {
            id: shader,
            shader_type,
        }
    }
    /// Get the internal GL ID of this shader.
    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }
    pub fn shader_type(&self) -> ShaderType {
        self.shader_type
    }

    fn info_log(&self) -> String {
        unsafe {
            let mut length = 0;
            gl::GetShaderiv(self.id, gl::INFO_LOG_LENGTH, &mut length);
            let mut infolog: Vec<u8> = vec![0; length.max(1) as usize];
            let mut written = 0;
            gl::GetShaderInfoLog(
                self.id,
                infolog.len() as gl::types::GLsizei,
                &mut written,
                infolog.as_mut_ptr().cast(),
            );
            info_log_to_string(infolog, written)
        }
    }
}

impl Drop for CompiledShader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.id);
        };
    }
}

/// Turn a driver info log buffer into a trimmed string.
pub(crate) fn info_log_to_string(mut buffer: Vec<u8>, written: gl::types::GLsizei) -> String {
    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

/// Read a whole shader source file.
pub fn read_source(path: impl AsRef<Path>) -> Result<CString, ShaderError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    CString::new(bytes).map_err(|_| ShaderError::InteriorNul {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_source_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#version 410 core\nvoid main() {{}}\n").unwrap();
        let source = read_source(file.path()).unwrap();
        assert!(source.to_str().unwrap().starts_with("#version 410 core"));
    }

    #[test]
    fn missing_source_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source(dir.path().join("nope.vert")).unwrap_err();
        assert!(matches!(err, ShaderError::Read { .. }));
        assert!(err.to_string().contains("nope.vert"));
    }

    #[test]
    fn nul_byte_in_source_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"void main() {}\0garbage").unwrap();
        let err = read_source(file.path()).unwrap_err();
        assert!(matches!(err, ShaderError::InteriorNul { .. }));
    }

    #[test]
    fn info_log_is_truncated_and_trimmed() {
        let mut buffer = b"0:1(1): error: syntax error\n\0\0\0".to_vec();
        buffer.resize(64, 0);
        assert_eq!(
            info_log_to_string(buffer, 28),
            "0:1(1): error: syntax error"
        );
        assert_eq!(info_log_to_string(vec![0; 4], -1), "");
    }

    #[test]
    fn shader_type_labels() {
        assert_eq!(ShaderType::Vertex.label(), "VERTEX");
        assert_eq!(ShaderType::Fragment.label(), "FRAGMENT");
    }
}
