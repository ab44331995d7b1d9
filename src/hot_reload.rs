//! Hot reloading of the game code library.
//!
//! Every frame [`HotReload::poll`] looks at the library file. Once a newer
//! file has kept the same stamp for one whole frame, a private copy of it is
//! loaded and its entry point table validated. A library that fails to load
//! is rejected and the previously loaded code keeps running.
use std::{
    ffi::c_float,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use libloading::{Library, Symbol};

use crate::error::ReloadError;

/// ABI version the host understands. Bump together with the game crate.
pub const GAME_API_VERSION: u32 = 1;

const VERSION_SYMBOL: &str = "game_api_version";
const CLEAR_COLOR_SYMBOL: &str = "clear_color";

/// Every entry point a compatible game library must export, besides the version.
pub const ENTRY_POINTS: &[&str] = &[CLEAR_COLOR_SYMBOL];

pub type GameApiVersionFn = unsafe extern "C" fn() -> u32;
pub type ClearColorFn =
    unsafe extern "C" fn(*mut c_float, *mut c_float, *mut c_float, *mut c_float);

/// Modification time and length of a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStamp {
    pub modified: SystemTime,
    pub len: u64,
}

impl FileStamp {
    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self {
            modified: metadata.modified()?,
            len: metadata.len(),
        })
    }

    /// A later mtime, or a different length at the same mtime. The latter
    /// catches rebuilds within the mtime granularity of the filesystem.
    fn is_newer_than(&self, other: &FileStamp) -> bool {
        self.modified > other.modified
            || (self.modified == other.modified && self.len != other.len)
    }
}

/// Something that can turn a library file into callable code.
pub trait GameLoader {
    type Code;

    /// Load the library at `path`. `attempt` is different for every call
    /// made by one [`HotReload`], whether earlier calls succeeded or not.
    fn load(&mut self, path: &Path, attempt: u64) -> Result<Self::Code, ReloadError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadState {
    Loaded,
    /// A newer file was seen; it is loaded once its stamp holds still.
    Reloading { observed: FileStamp },
}

#[derive(Debug)]
pub enum ReloadOutcome {
    Unchanged,
    Settling,
    Reloaded { generation: u64 },
    Rejected(ReloadError),
}

pub struct HotReload<L: GameLoader> {
    path: PathBuf,
    loader: L,
    code: L::Code,
    loaded: FileStamp,
    state: ReloadState,
    generation: u64,
    attempts: u64,
}

impl<L: GameLoader> HotReload<L> {
    /// Load the library for the first time.
    pub fn new(path: impl Into<PathBuf>, mut loader: L) -> Result<Self, ReloadError> {
        let path = path.into();
        let loaded = FileStamp::read(&path).map_err(|source| ReloadError::Stat {
            path: path.clone(),
            source,
        })?;
        let code = loader.load(&path, 0)?;
        log::info!("loaded game code from {}", path.display());
        Ok(Self {
            path,
            loader,
            code,
            loaded,
            state: ReloadState::Loaded,
            generation: 0,
            attempts: 1,
        })
    }

    pub fn code(&self) -> &L::Code {
        &self.code
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> ReloadState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check the file on disk, reloading when it changed and settled.
    pub fn poll(&mut self) -> ReloadOutcome {
        // a missing file is most likely mid-rebuild
        self.observe(FileStamp::read(&self.path).ok())
    }

    /// [`poll`](Self::poll) with an already read stamp.
    pub fn observe(&mut self, stamp: Option<FileStamp>) -> ReloadOutcome {
        let Some(stamp) = stamp else {
            return ReloadOutcome::Unchanged;
        };
        if !stamp.is_newer_than(&self.loaded) {
            self.state = ReloadState::Loaded;
            return ReloadOutcome::Unchanged;
        }
        match self.state {
            ReloadState::Reloading { observed } if observed == stamp => self.reload(stamp),
            _ => {
                log::debug!("{} changed, waiting for it to settle", self.path.display());
                self.state = ReloadState::Reloading { observed: stamp };
                ReloadOutcome::Settling
            }
        }
    }

    fn reload(&mut self, stamp: FileStamp) -> ReloadOutcome {
        // whatever happens, this file version is done with
        self.loaded = stamp;
        self.state = ReloadState::Loaded;
        let attempt = self.attempts;
        self.attempts += 1;
        match self.loader.load(&self.path, attempt) {
            Ok(code) => {
                // the old library is closed when its code is dropped here
                self.code = code;
                self.generation += 1;
                log::info!(
                    "reloaded game code from {} (generation {})",
                    self.path.display(),
                    self.generation
                );
                ReloadOutcome::Reloaded {
                    generation: self.generation,
                }
            }
            Err(err) => {
                log::warn!("keeping previous game code: {err}");
                ReloadOutcome::Rejected(err)
            }
        }
    }
}

/// Resolved entry points of a loaded game library.
#[derive(Clone, Copy, Debug)]
pub struct GameApi {
    pub version: u32,
    pub clear_color: ClearColorFn,
}

/// A loaded copy of a library file, closed and deleted on drop.
struct ShadowLibrary {
    library: Option<Library>,
    path: PathBuf,
}

impl Drop for ShadowLibrary {
    fn drop(&mut self) {
        drop(self.library.take());
        if let Err(err) = fs::remove_file(&self.path) {
            log::debug!("could not remove {}: {err}", self.path.display());
        }
    }
}

/// Game code loaded by [`DylibLoader`].
pub struct GameCode {
    api: GameApi,
    // keeps the function pointers in `api` alive
    _library: ShadowLibrary,
}

impl GameCode {
    pub fn api(&self) -> &GameApi {
        &self.api
    }

    /// Let the game code update `color` (RGBA).
    pub fn clear_color(&self, color: &mut [f32; 4]) {
        let [r, g, b, a] = color;
        // SAFETY: the version check vouched for the signature, and the
        // library stays loaded as long as `self`.
        unsafe { (self.api.clear_color)(r, g, b, a) }
    }
}

/// Loads game libraries with `libloading`.
///
/// Each load works on a copy in `shadow_dir`, so the library file itself
/// can be rebuilt while loaded. Every attempt gets its own copy, and the
/// dynamic loader never hands back a cached handle for a path it has seen.
pub struct DylibLoader {
    shadow_dir: PathBuf,
}

impl Default for DylibLoader {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl DylibLoader {
    pub fn new(shadow_dir: impl Into<PathBuf>) -> Self {
        Self {
            shadow_dir: shadow_dir.into(),
        }
    }

    /// `libgame.so` becomes `libgame-<pid>-<attempt>.so`, `libm.so.6`
    /// becomes `libm-<pid>-<attempt>.so.6`.
    fn shadow_path(&self, path: &Path, attempt: u64) -> PathBuf {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("game"));
        let tag = format!("{}-{attempt}", std::process::id());
        let name = match file_name.split_once('.') {
            Some((stem, suffixes)) if !stem.is_empty() => format!("{stem}-{tag}.{suffixes}"),
            _ => format!("{file_name}-{tag}"),
        };
        self.shadow_dir.join(name)
    }
}

impl GameLoader for DylibLoader {
    type Code = GameCode;

    fn load(&mut self, path: &Path, attempt: u64) -> Result<GameCode, ReloadError> {
        let shadow_path = self.shadow_path(path, attempt);
        fs::copy(path, &shadow_path).map_err(|source| ReloadError::Copy {
            from: path.to_path_buf(),
            to: shadow_path.clone(),
            source,
        })?;
        // from here on the copy is removed again on every return path
        let mut shadow = ShadowLibrary {
            library: None,
            path: shadow_path,
        };

        // SAFETY: loading runs the library's initializers; the game crate has none.
        let library = unsafe { Library::new(&shadow.path) }.map_err(|source| {
            ReloadError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let api = resolve_api(&library, path)?;
        shadow.library = Some(library);
        log::debug!(
            "game library {} -> {} (API version {})",
            path.display(),
            shadow.path.display(),
            api.version
        );
        Ok(GameCode {
            api,
            _library: shadow,
        })
    }
}

fn resolve_api(library: &Library, path: &Path) -> Result<GameApi, ReloadError> {
    let missing = |name: &str, source| ReloadError::MissingSymbol {
        path: path.to_path_buf(),
        name: name.to_string(),
        source,
    };

    // SAFETY: the symbol types are the ABI of GAME_API_VERSION; the version is
    // checked before any other entry point is looked at.
    unsafe {
        let version: Symbol<GameApiVersionFn> = library
            .get(VERSION_SYMBOL.as_bytes())
            .map_err(|e| missing(VERSION_SYMBOL, e))?;
        let version = version();
        if version != GAME_API_VERSION {
            return Err(ReloadError::IncompatibleVersion {
                path: path.to_path_buf(),
                found: version,
                expected: GAME_API_VERSION,
            });
        }

        for &name in ENTRY_POINTS {
            library
                .get::<*const ()>(name.as_bytes())
                .map_err(|e| missing(name, e))?;
        }

        let clear_color: Symbol<ClearColorFn> = library
            .get(CLEAR_COLOR_SYMBOL.as_bytes())
            .map_err(|e| missing(CLEAR_COLOR_SYMBOL, e))?;

        Ok(GameApi {
            version,
            clear_color: *clear_color,
        })
    }
}
