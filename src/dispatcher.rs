use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::AppError;
use crate::event::{EventSource, Host, HostEvent, InputQueueEvent, NativeWindowEvent, SourceStatus};
use crate::gl_backend::config::AppConfig;
use crate::gl_backend::GraphicsBackend;
use crate::input::{InputQueue, InputWorker};
use crate::surface::SurfaceManager;

/// Single-threaded loop reacting to host events.
///
/// Must run on the thread that owns the native window: every GL and EGL call happens here.
pub struct Dispatcher<B: GraphicsBackend, H: Host, Q: InputQueue> {
    surfaces: SurfaceManager<B>,
    host: Arc<H>,
    input: InputWorker<Q>,
    focused: bool,
}

impl<B: GraphicsBackend, H: Host, Q: InputQueue> Dispatcher<B, H, Q> {
    pub fn new(backend: B, host: Arc<H>, config: &AppConfig) -> Result<Self, AppError> {
        let input_host = host.clone();
        let input = InputWorker::spawn(move || input_host.input_queue_handled())?;

        Ok(Self {
            surfaces: SurfaceManager::new(backend, config.surface.clone(), config.clear_color),
            host,
            input,
            focused: false,
        })
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn surfaces(&self) -> &SurfaceManager<B> {
        &self.surfaces
    }

    /// Whether the last input-queue event handed the worker a queue rather than a detach.
    pub fn input_attached(&self) -> bool {
        self.input.is_attached()
    }

    /// Runs until the source closes or something fatal happens.
    pub fn run<S>(&mut self, source: &mut S) -> Result<(), AppError>
    where
        S: EventSource<Window = B::Window, Queue = Q>,
    {
        self.host.init_done();
        info!("Dispatcher started");

        loop {
            let mut outcome = Ok(());
            let status = source.next_event(&mut |event| {
                if outcome.is_ok() {
                    outcome = self.dispatch(event);
                }
            });
            outcome?;

            if status == SourceStatus::Closed {
                info!("Event source closed, shutting down");
                self.surfaces.destroy();
                return Ok(());
            }
        }
    }

    pub fn dispatch(&mut self, event: HostEvent<B::Window, Q>) -> Result<(), AppError> {
        match event {
            HostEvent::Lifecycle(event) => {
                debug!("Lifecycle event: {:?}", event);
            }
            HostEvent::Focus { has_focus } => {
                if has_focus != self.focused {
                    self.focused = has_focus;
                    info!("Window focus changed: {}", has_focus);
                    self.redraw();
                }
            }
            HostEvent::InputQueue(InputQueueEvent::Created(queue)) => {
                self.input.attach(queue);
            }
            HostEvent::InputQueue(InputQueueEvent::Destroyed) => {
                self.input.detach();
            }
            HostEvent::NativeWindow(NativeWindowEvent::RedrawNeeded) => {
                self.redraw();
                self.host.native_window_redraw_done();
            }
            HostEvent::NativeWindow(NativeWindowEvent::Created(window)) => {
                self.surfaces.create(&window)?;
            }
            HostEvent::NativeWindow(NativeWindowEvent::Destroyed) => {
                self.surfaces.destroy();
            }
        }
        Ok(())
    }

    fn redraw(&mut self) {
        if let Err(e) = self.surfaces.draw() {
            warn!("Redraw failed: {}", e);
        }
    }
}
