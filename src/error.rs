//! Error types for every fallible piece of the crate.
use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("could not read shader source `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("shader source `{}` contains a NUL byte", path.display())]
    InteriorNul { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not decode image `{}`", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image `{}` has an unsupported layout ({channels} channels of {bits} bits)", path.display())]
    UnsupportedChannels {
        path: PathBuf,
        channels: u8,
        bits: u16,
    },
    #[error("image `{}` is too large ({width}x{height})", path.display())]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    #[error("unable to create texture object")]
    CreateTexture,
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("index {index} at position {position} references a missing vertex (vertex count {vertex_count})")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("a shape needs at least one vertex")]
    Empty,
    #[error("patrol speed must be finite and positive, got {0}")]
    InvalidSpeed(f32),
}

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("game library `{}` is not readable", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not copy game library `{}` to `{}`", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to load library `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("unable to get symbol `{name}` from `{}`", path.display())]
    MissingSymbol {
        path: PathBuf,
        name: String,
        #[source]
        source: libloading::Error,
    },
    #[error("game library `{}` has API version {found} (expected {expected})", path.display())]
    IncompatibleVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}
