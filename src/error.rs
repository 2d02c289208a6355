use std::fmt;

use khronos_egl as egl;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EglError {
    #[error("Failed to load libEGL: {0}")]
    Load(String),
    #[error("No default EGL display")]
    NoDisplay,
    #[error("eglInitialize failed: {0}")]
    Initialize(#[source] egl::Error),
    #[error("eglChooseConfig failed: {0}")]
    ChooseConfig(#[source] egl::Error),
    #[error("No EGL config matches the requested attributes")]
    NoMatchingConfig,
    #[error("eglCreateContext failed: {0}")]
    CreateContext(#[source] egl::Error),
    #[error("eglCreateWindowSurface failed: {0}")]
    CreateSurface(#[source] egl::Error),
    #[error("eglMakeCurrent failed: {0}")]
    MakeCurrent(#[source] egl::Error),
    #[error("eglQuerySurface failed: {0}")]
    QuerySurface(#[source] egl::Error),
    #[error("eglSwapBuffers failed: {0}")]
    SwapBuffers(#[source] egl::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GlError {
    #[error("Failed to create {what}: {reason}")]
    Create { what: &'static str, reason: String },
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("GL program failed to link: {log}")]
    Link { log: String },
}

/// Anything that stops the dispatch loop.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("EGL error: {0}")]
    Egl(#[from] EglError),
    #[error("GL error: {0}")]
    Gl(#[from] GlError),
    #[error("Failed to spawn input thread: {0}")]
    Spawn(#[from] std::io::Error),
}
