//! Exports [`TextureImage`] and [`Texture`].
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::TextureError;

/// Name of the sampler uniform a quad's `index`-th texture is bound to.
pub fn texture_uniform_name(index: usize) -> String {
    format!("texture_{index}")
}

/// Pixel layout of a decoded image, as OpenGL sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    fn gl_format(self) -> gl::types::GLenum {
        match self {
            PixelFormat::Rgb8 => gl::RGB,
            PixelFormat::Rgba8 => gl::RGBA,
        }
    }

    fn gl_internal_format(self) -> gl::types::GLint {
        match self {
            PixelFormat::Rgb8 => gl::RGB8 as _,
            PixelFormat::Rgba8 => gl::RGBA8 as _,
        }
    }
}

/// A decoded image ready for upload, bottom row first.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Decode an image file. Only 8-bit RGB and RGBA images are accepted.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_image(path, image)
    }

    fn from_image(path: &Path, image: DynamicImage) -> Result<Self, TextureError> {
        let (width, height) = (image.width(), image.height());
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(TextureError::TooLarge {
                path: path.to_path_buf(),
                width,
                height,
            });
        }
        // GL expects the first row at the bottom.
        let (format, pixels) = match image.flipv() {
            DynamicImage::ImageRgb8(buffer) => (PixelFormat::Rgb8, buffer.into_raw()),
            DynamicImage::ImageRgba8(buffer) => (PixelFormat::Rgba8, buffer.into_raw()),
            other => {
                let color = other.color();
                let channels = color.channel_count();
                return Err(TextureError::UnsupportedChannels {
                    path: path.to_path_buf(),
                    channels,
                    bits: color.bits_per_pixel() / u16::from(channels.max(1)),
                });
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            format,
            pixels,
        })
    }
}

/// A 2D texture object, deleted on drop.
#[derive(Debug)]
pub struct Texture {
    id: gl::types::GLuint,
}

impl Texture {
    /// Upload `image` with repeat wrapping and mipmapped linear filtering.
    pub fn upload(image: &TextureImage) -> Result<Self, TextureError> {
        let id = unsafe {
            let mut tex_id: gl::types::GLuint = 0;
            gl::GenTextures(1, &mut tex_id);
            tex_id
        };
        if id == 0 {
            return Err(TextureError::CreateTexture);
        }

        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, id);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as _);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as _);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as _,
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as _);
            // RGB rows are not 4-byte aligned in general.
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                image.format.gl_internal_format(),
                image.width as _,
                image.height as _,
                0,
                image.format.gl_format(),
                gl::UNSIGNED_BYTE,
                image.pixels.as_ptr().cast(),
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        Ok(Self { id })
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    /// Bind to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.id) }
    }
}
