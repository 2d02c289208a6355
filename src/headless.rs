//! Device-free stand-ins for the host, EGL and GL.
//!
//! Everything here records what it was asked to do, so the dispatcher can run on a desktop
//! (see the `native-gles` binary) and be inspected from tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use khronos_egl as egl;
use log::debug;

use crate::dispatcher::Dispatcher;
use crate::error::{AppError, EglError, GlError};
use crate::event::{
    EventSource, Host, HostEvent, InputQueueEvent, LifecycleEvent, NativeWindowEvent, SourceStatus,
};
use crate::gl_backend::config::{AppConfig, SurfaceConfig};
use crate::gl_backend::{DisplayHandle, Gl, GraphicsBackend};
use crate::input::InputQueue;

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateDisplay { width: i32, height: i32 },
    DestroyDisplay,
    SwapBuffers,
    Enable(u32),
    Disable(u32),
    BlendEquation(u32),
    BlendFunc(u32, u32),
    CreateProgram(u32),
    CreateShader(u32, u32),
    ShaderSource(u32, String),
    CompileShader(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    CreateBuffer(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    BindBuffer(u32, Option<u32>),
    BindTexture(u32, Option<u32>),
    ClearColor([f32; 4]),
    Clear(u32),
}

/// Shared, ordered record of every call made against headless displays.
#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<GlCall>>>);

impl CallLog {
    fn push(&self, call: GlCall) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.0.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub width: i32,
    pub height: i32,
}

impl HeadlessWindow {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

pub struct HeadlessBackend {
    log: CallLog,
    broken_surface: bool,
    broken_shader: Option<u32>,
    broken_link: bool,
}

impl HeadlessBackend {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            broken_surface: false,
            broken_shader: None,
            broken_link: false,
        }
    }

    /// Every display creation fails like a bad native window would.
    pub fn with_broken_surface(mut self) -> Self {
        self.broken_surface = true;
        self
    }

    /// Shaders of `kind` never compile.
    pub fn with_broken_shader(mut self, kind: u32) -> Self {
        self.broken_shader = Some(kind);
        self
    }

    pub fn with_broken_link(mut self) -> Self {
        self.broken_link = true;
        self
    }
}

impl GraphicsBackend for HeadlessBackend {
    type Window = HeadlessWindow;
    type Display = HeadlessDisplay;

    fn create_display(&mut self, window: &HeadlessWindow, _config: &SurfaceConfig) -> Result<HeadlessDisplay, EglError> {
        if self.broken_surface {
            return Err(EglError::CreateSurface(egl::Error::BadNativeWindow));
        }
        self.log.push(GlCall::CreateDisplay { width: window.width, height: window.height });
        Ok(HeadlessDisplay {
            window: *window,
            gl: HeadlessGl {
                log: self.log.clone(),
                next_id: Cell::new(1),
                shader_kinds: RefCell::new(Vec::new()),
                broken_shader: self.broken_shader,
                broken_link: self.broken_link,
            },
        })
    }
}

pub struct HeadlessDisplay {
    window: HeadlessWindow,
    gl: HeadlessGl,
}

impl DisplayHandle for HeadlessDisplay {
    type Gl = HeadlessGl;

    fn width(&self) -> i32 {
        self.window.width
    }
    fn height(&self) -> i32 {
        self.window.height
    }
    fn gl(&self) -> &HeadlessGl {
        &self.gl
    }
    fn swap_buffers(&mut self) -> Result<(), EglError> {
        self.gl.log.push(GlCall::SwapBuffers);
        Ok(())
    }
}

impl Drop for HeadlessDisplay {
    fn drop(&mut self) {
        self.gl.log.push(GlCall::DestroyDisplay);
    }
}

pub struct HeadlessGl {
    log: CallLog,
    next_id: Cell<u32>,
    shader_kinds: RefCell<Vec<(u32, u32)>>,
    broken_shader: Option<u32>,
    broken_link: bool,
}

impl HeadlessGl {
    fn id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl Gl for HeadlessGl {
    type Program = u32;
    type Shader = u32;
    type Buffer = u32;
    type VertexArray = u32;

    fn enable(&self, cap: u32) {
        self.log.push(GlCall::Enable(cap));
    }
    fn disable(&self, cap: u32) {
        self.log.push(GlCall::Disable(cap));
    }
    fn blend_equation(&self, mode: u32) {
        self.log.push(GlCall::BlendEquation(mode));
    }
    fn blend_func(&self, src: u32, dst: u32) {
        self.log.push(GlCall::BlendFunc(src, dst));
    }

    fn create_program(&self) -> Result<u32, GlError> {
        let id = self.id();
        self.log.push(GlCall::CreateProgram(id));
        Ok(id)
    }
    fn create_shader(&self, kind: u32) -> Result<u32, GlError> {
        let id = self.id();
        self.shader_kinds.borrow_mut().push((id, kind));
        self.log.push(GlCall::CreateShader(id, kind));
        Ok(id)
    }
    fn shader_source(&self, shader: u32, source: &str) {
        self.log.push(GlCall::ShaderSource(shader, source.to_string()));
    }
    fn compile_shader(&self, shader: u32) {
        self.log.push(GlCall::CompileShader(shader));
    }
    fn shader_compiled(&self, shader: u32) -> bool {
        let kind = self.shader_kinds.borrow().iter().find(|(id, _)| *id == shader).map(|(_, kind)| *kind);
        kind.is_some() && kind != self.broken_shader
    }
    fn shader_info_log(&self, shader: u32) -> String {
        format!("0:1: shader {} rejected", shader)
    }
    fn attach_shader(&self, program: u32, shader: u32) {
        self.log.push(GlCall::AttachShader(program, shader));
    }
    fn link_program(&self, program: u32) {
        self.log.push(GlCall::LinkProgram(program));
    }
    fn program_linked(&self, _program: u32) -> bool {
        !self.broken_link
    }
    fn program_info_log(&self, program: u32) -> String {
        format!("program {} has unresolved varyings", program)
    }

    fn create_buffer(&self) -> Result<u32, GlError> {
        let id = self.id();
        self.log.push(GlCall::CreateBuffer(id));
        Ok(id)
    }
    fn create_vertex_array(&self) -> Result<u32, GlError> {
        let id = self.id();
        self.log.push(GlCall::CreateVertexArray(id));
        Ok(id)
    }
    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.log.push(GlCall::BindVertexArray(vertex_array));
    }
    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.log.push(GlCall::BindBuffer(target, buffer));
    }
    fn unbind_texture(&self, target: u32) {
        self.log.push(GlCall::BindTexture(target, None));
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.log.push(GlCall::ClearColor(rgba));
    }
    fn clear(&self, mask: u32) {
        self.log.push(GlCall::Clear(mask));
    }
}

/// Counts acknowledgements instead of sending them anywhere.
#[derive(Default)]
pub struct RecordingHost {
    inits_done: AtomicUsize,
    inputs_handled: AtomicUsize,
    redraws_done: AtomicUsize,
}

impl RecordingHost {
    pub fn inits_done(&self) -> usize {
        self.inits_done.load(Ordering::SeqCst)
    }
    pub fn inputs_handled(&self) -> usize {
        self.inputs_handled.load(Ordering::SeqCst)
    }
    pub fn redraws_done(&self) -> usize {
        self.redraws_done.load(Ordering::SeqCst)
    }
}

impl Host for RecordingHost {
    fn init_done(&self) {
        self.inits_done.fetch_add(1, Ordering::SeqCst);
    }
    fn input_queue_handled(&self) {
        self.inputs_handled.fetch_add(1, Ordering::SeqCst);
    }
    fn native_window_redraw_done(&self) {
        self.redraws_done.fetch_add(1, Ordering::SeqCst);
    }
}

/// Input queue backed by a list of event descriptions.
#[derive(Clone, Default)]
pub struct VecInputQueue {
    pending: Arc<Mutex<VecDeque<String>>>,
    processed: Arc<AtomicUsize>,
}

impl VecInputQueue {
    pub fn new<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: Arc::new(Mutex::new(events.into_iter().map(Into::into).collect())),
            processed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }
}

impl InputQueue for VecInputQueue {
    fn process(&self) -> usize {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let mut read = 0;
        while let Some(event) = pending.pop_front() {
            debug!("Input event: {}", event);
            read += 1;
        }
        self.processed.fetch_add(read, Ordering::SeqCst);
        read
    }
}

/// Hands out a fixed list of events, one per call.
pub struct ScriptedEvents<W, Q> {
    events: VecDeque<HostEvent<W, Q>>,
}

impl<W, Q> ScriptedEvents<W, Q> {
    pub fn new(events: impl IntoIterator<Item = HostEvent<W, Q>>) -> Self {
        Self { events: events.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl<W, Q> EventSource for ScriptedEvents<W, Q> {
    type Window = W;
    type Queue = Q;

    fn next_event(&mut self, handler: &mut dyn FnMut(HostEvent<W, Q>)) -> SourceStatus {
        match self.events.pop_front() {
            Some(event) => {
                handler(event);
                SourceStatus::Open
            }
            None => SourceStatus::Closed,
        }
    }
}

/// The session the desktop binary replays: a 100x200 window goes through focus,
/// input and redraw before being torn down.
pub fn dry_run_script(input: VecInputQueue) -> ScriptedEvents<HeadlessWindow, VecInputQueue> {
    ScriptedEvents::new([
        HostEvent::Lifecycle(LifecycleEvent::Start),
        HostEvent::Lifecycle(LifecycleEvent::Resume),
        HostEvent::NativeWindow(NativeWindowEvent::Created(HeadlessWindow::new(100, 200))),
        HostEvent::Focus { has_focus: true },
        HostEvent::InputQueue(InputQueueEvent::Created(input)),
        HostEvent::NativeWindow(NativeWindowEvent::RedrawNeeded),
        HostEvent::Focus { has_focus: false },
        HostEvent::InputQueue(InputQueueEvent::Destroyed),
        HostEvent::NativeWindow(NativeWindowEvent::Destroyed),
        HostEvent::Lifecycle(LifecycleEvent::Pause),
        HostEvent::Lifecycle(LifecycleEvent::Destroy),
    ])
}

pub fn dry_run(config: &AppConfig) -> Result<CallLog, AppError> {
    let log = CallLog::default();
    let host = Arc::new(RecordingHost::default());
    let mut dispatcher: Dispatcher<_, _, VecInputQueue> =
        Dispatcher::new(HeadlessBackend::new(log.clone()), host.clone(), config)?;

    let input = VecInputQueue::new(["touch down (50, 60)", "touch up (50, 60)"]);
    dispatcher.run(&mut dry_run_script(input))?;
    drop(dispatcher);

    debug!(
        "Dry run acknowledgements: init {}, input {}, redraw {}",
        host.inits_done(),
        host.inputs_handled(),
        host.redraws_done()
    );
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_events_hand_out_one_at_a_time() {
        let mut events: ScriptedEvents<HeadlessWindow, VecInputQueue> = ScriptedEvents::new([
            HostEvent::Focus { has_focus: true },
            HostEvent::Focus { has_focus: false },
        ]);
        let mut seen = Vec::new();

        assert_eq!(events.next_event(&mut |e| seen.push(e)), SourceStatus::Open);
        assert_eq!(events.next_event(&mut |e| seen.push(e)), SourceStatus::Open);
        assert_eq!(events.next_event(&mut |e| seen.push(e)), SourceStatus::Closed);
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], HostEvent::Focus { has_focus: true }));
    }

    #[test]
    fn broken_shader_only_affects_its_kind() {
        let display = HeadlessBackend::new(CallLog::default())
            .with_broken_shader(glow::VERTEX_SHADER)
            .create_display(&HeadlessWindow::new(1, 1), &SurfaceConfig::default())
            .unwrap();
        let gl = display.gl();
        let vs = gl.create_shader(glow::VERTEX_SHADER).unwrap();
        let fs = gl.create_shader(glow::FRAGMENT_SHADER).unwrap();

        assert!(!gl.shader_compiled(vs));
        assert!(gl.shader_compiled(fs));
    }

    #[test]
    fn dry_run_draws_three_frames() {
        let log = dry_run(&AppConfig::default()).unwrap();

        // focus gained, redraw needed, focus lost
        assert_eq!(log.count(|c| *c == GlCall::SwapBuffers), 3);
        assert_eq!(log.count(|c| *c == GlCall::DestroyDisplay), 1);
        assert_eq!(log.calls().first(), Some(&GlCall::CreateDisplay { width: 100, height: 200 }));
    }
}
