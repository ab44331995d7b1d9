//! Hot-reloadable game code.
//!
//! Rebuild this crate while a demo is running (`cargo build -p game`) and the
//! demo picks up the new values on the next frames.

/// Must match `patrol_gl::hot_reload::GAME_API_VERSION`.
pub const GAME_API_VERSION: u32 = 1;

/// Tweak me and rebuild.
pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

#[no_mangle]
pub extern "C" fn game_api_version() -> u32 {
    GAME_API_VERSION
}

/// Write the clear color into the four channels.
///
/// # Safety
/// Every pointer must be valid for a single `f32` write. Null pointers are skipped.
#[no_mangle]
pub unsafe extern "C" fn clear_color(r: *mut f32, g: *mut f32, b: *mut f32, a: *mut f32) {
    for (channel, value) in [r, g, b, a].into_iter().zip(CLEAR_COLOR) {
        if let Some(channel) = channel.as_mut() {
            *channel = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_all_channels() {
        let (mut r, mut g, mut b, mut a) = (0.0, 0.0, 0.0, 0.0);
        unsafe { clear_color(&mut r, &mut g, &mut b, &mut a) };
        assert_eq!([r, g, b, a], CLEAR_COLOR);
    }

    #[test]
    fn skips_null_channels() {
        let mut g = -1.0;
        unsafe {
            clear_color(
                std::ptr::null_mut(),
                &mut g,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(g, CLEAR_COLOR[1]);
    }
}
