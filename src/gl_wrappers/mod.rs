//! Standalone functions and modules to wrap the nitty-gritty of
//! OpenGL objects with Rust structs.
pub mod program;
pub mod shader;
pub mod texture;

use std::ffi::CStr;

pub use program::*;
pub use shader::*;
pub use texture::*;

/// Safely update the OpenGL viewport.
pub fn gl_upd_viewport(width: u32, height: u32) {
    let real_width = i32::try_from(width).unwrap_or(i32::MAX);
    let real_height = i32::try_from(height).unwrap_or(i32::MAX);
    // SAFETY:
    // gl::Viewport does not fail with non-negative values.
    unsafe {
        gl::Viewport(0, 0, real_width, real_height);
    }
}

/// Clear the color, depth and stencil buffers to `color` (RGBA).
pub fn gl_clear(color: [f32; 4]) {
    let [r, g, b, a] = color;
    unsafe {
        gl::ClearColor(r, g, b, a);
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT);
    }
}

/// The `GL_VERSION` string of the current context.
pub fn gl_version() -> String {
    unsafe {
        let version = gl::GetString(gl::VERSION);
        if version.is_null() {
            return String::from("unknown");
        }
        CStr::from_ptr(version.cast()).to_string_lossy().into_owned()
    }
}

pub fn gl_max_vertex_attribs() -> i32 {
    let mut count = 0;
    unsafe { gl::GetIntegerv(gl::MAX_VERTEX_ATTRIBS, &mut count) };
    count
}
