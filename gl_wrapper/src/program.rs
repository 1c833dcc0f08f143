use gl::types::{GLenum, GLuint};
use std::ffi::{c_char, CString};
use std::path::{Path, PathBuf};
use thiserror::Error;

const INFO_LOG_LEN: usize = 1024;

#[derive(Debug, PartialEq, Eq)]
pub struct ProgramBuilder {
    vert: String,
    frag: String,
}

impl ProgramBuilder {
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            vert: vert_src.to_owned(),
            frag: frag_src.to_owned(),
        }
    }

    /// Reads both shader stages from disk.
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        vert_path: P,
        frag_path: Q,
    ) -> Result<Self, PBError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|e| PBError::Read(path.to_path_buf(), e))
        };

        let vert = read(vert_path.as_ref())?;
        let frag = read(frag_path.as_ref())?;

        log::debug!(
            "read shader sources {:?} and {:?}",
            vert_path.as_ref(),
            frag_path.as_ref()
        );

        Ok(Self::new(&vert, &frag))
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert_src = CString::new(self.vert).map_err(|_| PBError::InteriorNul("vertex"))?;
        let frag_src = CString::new(self.frag).map_err(|_| PBError::InteriorNul("fragment"))?;

        let vert = compile(gl::VERTEX_SHADER, &vert_src)?;
        let frag = match compile(gl::FRAGMENT_SHADER, &frag_src) {
            Ok(f) => f,
            Err(e) => {
                unsafe { gl::DeleteShader(vert) };
                return Err(e);
            }
        };

        let mut success: i32 = 0;

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32);

            gl::DetachShader(program, vert);
            gl::DetachShader(program, frag);
            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            if success != 1 {
                let mut buf = [0_u8; INFO_LOG_LEN];

                gl::GetProgramInfoLog(
                    program,
                    INFO_LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
                gl::DeleteProgram(program);

                return Err(PBError::Linking(info_log_to_string(&buf)));
            }

            log::debug!("linked program {program}");

            Ok(Program { id: program })
        }
    }
}

fn compile(kind: GLenum, src: &CString) -> Result<GLuint, PBError> {
    let mut success: i32 = 0;

    unsafe {
        let shader = gl::CreateShader(kind);

        gl::ShaderSource(
            shader,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );

        gl::CompileShader(shader);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut i32);
        if success != 1 {
            let mut buf = [0_u8; INFO_LOG_LEN];

            gl::GetShaderInfoLog(
                shader,
                INFO_LOG_LEN as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
            gl::DeleteShader(shader);

            return Err(PBError::Compilation(
                stage_name(kind),
                info_log_to_string(&buf),
            ));
        }

        Ok(shader)
    }
}

fn stage_name(kind: GLenum) -> &'static str {
    match kind {
        gl::VERTEX_SHADER => "vertex",
        gl::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

/// Drivers fill the log buffer with a NUL-terminated string, anything after the
/// first NUL is garbage.
fn info_log_to_string(buf: &[u8]) -> String {
    let data = match buf.iter().position(|b| *b == 0) {
        Some(end) => &buf[..end],
        None => buf,
    };

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("could not read shader {0:?}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("{0} shader source contains a NUL byte")]
    InteriorNul(&'static str),
    #[error("{0} shader compilation failed: {1}")]
    Compilation(&'static str, String),
    #[error("program linking failed: {0}")]
    Linking(String),
    #[error("no active vertex attribute named '{0}'")]
    MissingAttribute(String),
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        unsafe { gl::UseProgram(self.id) }
    }

    /// Location of a vertex shader input. Unlike the raw GL call this never
    /// hands back `-1` disguised as a location.
    pub fn attrib_location(&self, name: &str) -> Result<u32, PBError> {
        let c_name = CString::new(name).map_err(|_| PBError::MissingAttribute(name.into()))?;

        let location = unsafe { gl::GetAttribLocation(self.id, c_name.as_ptr()) };

        u32::try_from(location).map_err(|_| PBError::MissingAttribute(name.into()))
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_nul() {
        let mut buf = [0_u8; 32];
        buf[..9].copy_from_slice(b"bad token");
        buf[10] = b'x';

        assert_eq!(info_log_to_string(&buf), "bad token");
    }

    #[test]
    fn info_log_without_nul() {
        assert_eq!(info_log_to_string(b"0:1(1): error\n"), "0:1(1): error");
    }

    #[test]
    fn reads_sources_from_disk() {
        let builder = ProgramBuilder::from_paths(
            concat!(env!("CARGO_MANIFEST_DIR"), "/../shaders/vertex.shader"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/../shaders/fragment.shader"),
        )
        .unwrap();

        assert_eq!(
            builder,
            ProgramBuilder::new(
                include_str!("../../shaders/vertex.shader"),
                include_str!("../../shaders/fragment.shader"),
            )
        );
    }

    #[test]
    fn missing_shader_file() {
        let res = ProgramBuilder::from_paths("does/not/exist.vert", "does/not/exist.frag");

        match res {
            Err(PBError::Read(path, _)) => assert_eq!(path, PathBuf::from("does/not/exist.vert")),
            _ => panic!("expected read error"),
        }
    }

    #[test]
    fn stage_names() {
        assert_eq!(stage_name(gl::VERTEX_SHADER), "vertex");
        assert_eq!(stage_name(gl::FRAGMENT_SHADER), "fragment");
    }
}
