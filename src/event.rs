//! What the host runtime tells us, and what we owe it back.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Start,
    Resume,
    Pause,
    Stop,
    SaveState,
    ConfigChanged,
    LowMemory,
    Destroy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputQueueEvent<Q> {
    Created(Q),
    Destroyed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NativeWindowEvent<W> {
    Created(W),
    RedrawNeeded,
    Destroyed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent<W, Q> {
    Lifecycle(LifecycleEvent),
    Focus { has_focus: bool },
    InputQueue(InputQueueEvent<Q>),
    NativeWindow(NativeWindowEvent<W>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Open,
    /// The host is gone, no more events will come.
    Closed,
}

pub trait EventSource {
    type Window;
    type Queue;

    /// Blocks until the host has something, then hands it to `handler` in arrival order.
    fn next_event(&mut self, handler: &mut dyn FnMut(HostEvent<Self::Window, Self::Queue>)) -> SourceStatus;
}

/// Acknowledgements the host runtime waits for.
pub trait Host: Send + Sync + 'static {
    fn init_done(&self);
    fn input_queue_handled(&self);
    fn native_window_redraw_done(&self);
}
