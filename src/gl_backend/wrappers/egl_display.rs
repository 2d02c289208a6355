use std::ffi::c_void;
use std::marker::PhantomData;
use std::rc::Rc;

use khronos_egl as egl;
use log::{debug, info, warn};

use crate::error::EglError;
use crate::gl_backend::config::SurfaceConfig;
use crate::gl_backend::{DisplayHandle, GraphicsBackend};

pub type EglInstance = egl::DynamicInstance<egl::EGL1_4>;

/// Anything EGL can wrap a window surface around.
pub trait AsNativeWindow {
    fn as_native_window(&self) -> egl::NativeWindowType;
}

#[cfg(target_os = "android")]
impl AsNativeWindow for ndk::native_window::NativeWindow {
    fn as_native_window(&self) -> egl::NativeWindowType {
        self.ptr().as_ptr() as egl::NativeWindowType
    }
}

pub struct EglBackend<W> {
    egl: Rc<EglInstance>,
    _window: PhantomData<fn(&W)>,
}

impl<W> EglBackend<W> {
    pub fn new() -> Result<Self, EglError> {
        let egl = unsafe { EglInstance::load_required() }
            .map_err(|e| EglError::Load(format!("{e:?}")))?;
        info!("Loaded EGL library");
        Ok(Self {
            egl: Rc::new(egl),
            _window: PhantomData,
        })
    }
}

impl<W: AsNativeWindow + Clone> GraphicsBackend for EglBackend<W> {
    type Window = W;
    type Display = EglDisplay<W>;

    fn create_display(&mut self, window: &W, config: &SurfaceConfig) -> Result<EglDisplay<W>, EglError> {
        let egl = &self.egl;
        let display = unsafe { egl.get_display(egl::DEFAULT_DISPLAY) }.ok_or(EglError::NoDisplay)?;
        let (major, minor) = egl.initialize(display).map_err(EglError::Initialize)?;
        debug!("EGL initialized: {}.{}", major, minor);

        match bind_window(egl, display, window, config) {
            Ok((context, surface, width, height)) => {
                let gl = unsafe {
                    glow::Context::from_loader_function(|name| {
                        egl.get_proc_address(name).map_or(std::ptr::null(), |f| f as *const c_void)
                    })
                };
                Ok(EglDisplay {
                    egl: egl.clone(),
                    display,
                    context,
                    surface,
                    width,
                    height,
                    gl,
                    _window: window.clone(),
                })
            }
            Err(e) => {
                // releases whatever bind_window managed to create
                if let Err(terminate_err) = egl.terminate(display) {
                    warn!("eglTerminate after failed setup: {}", terminate_err);
                }
                Err(e)
            }
        }
    }
}

fn bind_window<W: AsNativeWindow>(
    egl: &EglInstance,
    display: egl::Display,
    window: &W,
    config: &SurfaceConfig,
) -> Result<(egl::Context, egl::Surface, i32, i32), EglError> {
    let egl_config = egl
        .choose_first_config(display, &config.config_attribs())
        .map_err(EglError::ChooseConfig)?
        .ok_or(EglError::NoMatchingConfig)?;

    let context = egl
        .create_context(display, egl_config, None, &config.context_attribs())
        .map_err(EglError::CreateContext)?;

    let surface = unsafe {
        egl.create_window_surface(display, egl_config, window.as_native_window(), None)
    }
    .map_err(EglError::CreateSurface)?;

    egl.make_current(display, Some(surface), Some(surface), Some(context))
        .map_err(EglError::MakeCurrent)?;

    let width = egl.query_surface(display, surface, egl::WIDTH).map_err(EglError::QuerySurface)?;
    let height = egl.query_surface(display, surface, egl::HEIGHT).map_err(EglError::QuerySurface)?;
    Ok((context, surface, width, height))
}

pub struct EglDisplay<W> {
    egl: Rc<EglInstance>,
    display: egl::Display,
    context: egl::Context,
    surface: egl::Surface,
    width: i32,
    height: i32,
    gl: glow::Context,
    // keeps the native window referenced while the surface lives
    _window: W,
}

impl<W> DisplayHandle for EglDisplay<W> {
    type Gl = glow::Context;

    fn width(&self) -> i32 {
        self.width
    }
    fn height(&self) -> i32 {
        self.height
    }
    fn gl(&self) -> &glow::Context {
        &self.gl
    }
    fn swap_buffers(&mut self) -> Result<(), EglError> {
        self.egl.swap_buffers(self.display, self.surface).map_err(EglError::SwapBuffers)
    }
}

impl<W> Drop for EglDisplay<W> {
    fn drop(&mut self) {
        debug!("Destroying EGL display");
        if let Err(e) = self.egl.make_current(self.display, None, None, None) {
            warn!("eglMakeCurrent(NONE) failed: {}", e);
        }
        if let Err(e) = self.egl.destroy_surface(self.display, self.surface) {
            warn!("eglDestroySurface failed: {}", e);
        }
        if let Err(e) = self.egl.destroy_context(self.display, self.context) {
            warn!("eglDestroyContext failed: {}", e);
        }
        if let Err(e) = self.egl.terminate(self.display) {
            warn!("eglTerminate failed: {}", e);
        }
    }
}
