use log::{info, warn};

use crate::error::{AppError, EglError};
use crate::gl_backend::config::SurfaceConfig;
use crate::gl_backend::{draw, init_gl, DisplayHandle, GlObjects, GraphicsBackend};

pub struct ActiveSurface<D: DisplayHandle> {
    pub display: D,
    pub objects: GlObjects<D::Gl>,
}

/// Owns the one live display and the GL objects created in it.
///
/// Must stay on the thread that received the window.
pub struct SurfaceManager<B: GraphicsBackend> {
    backend: B,
    config: SurfaceConfig,
    clear_color: [f32; 4],
    active: Option<ActiveSurface<B::Display>>,
}

impl<B: GraphicsBackend> SurfaceManager<B> {
    pub fn new(backend: B, config: SurfaceConfig, clear_color: [f32; 4]) -> Self {
        Self {
            backend,
            config,
            clear_color,
            active: None,
        }
    }

    /// Builds a display for `window` and initializes GL in it.
    pub fn create(&mut self, window: &B::Window) -> Result<(), AppError> {
        if self.active.is_some() {
            warn!("Window created while a display is still live, replacing it");
            self.destroy();
        }

        let display = self.backend.create_display(window, &self.config)?;
        info!("EGL display res: {}x{}", display.width(), display.height());

        let objects = init_gl(display.gl())?;
        self.active = Some(ActiveSurface { display, objects });
        Ok(())
    }

    pub fn draw(&mut self) -> Result<bool, EglError> {
        draw(self.active.as_mut().map(|s| &mut s.display), self.clear_color)
    }

    pub fn destroy(&mut self) {
        match self.active.take() {
            Some(surface) => {
                info!("Destroying {}x{} display", surface.display.width(), surface.display.height());
                drop(surface);
            }
            None => info!("Window destroyed without a live display"),
        }
    }

    pub fn active(&self) -> Option<&ActiveSurface<B::Display>> {
        self.active.as_ref()
    }
}
