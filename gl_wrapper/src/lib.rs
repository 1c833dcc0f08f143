use std::ffi::{c_char, CStr};

pub mod geometry;
pub mod program;
pub mod renderer;

/// Version string of the current context, `None` before function pointers are loaded.
pub fn gl_version() -> Option<String> {
    if !gl::GetString::is_loaded() {
        return None;
    }

    unsafe {
        let ptr = gl::GetString(gl::VERSION);
        if ptr.is_null() {
            return None;
        }

        Some(
            CStr::from_ptr(ptr as *const c_char)
                .to_string_lossy()
                .into_owned(),
        )
    }
}
