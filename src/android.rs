use std::sync::Arc;

use android_activity::input::InputEvent;
use android_activity::{AndroidApp, InputStatus, MainEvent, PollEvent};
use anyhow::Context;
use log::{debug, info, warn};
use ndk::native_window::NativeWindow;

use crate::dispatcher::Dispatcher;
use crate::event::{
    EventSource, Host, HostEvent, InputQueueEvent, LifecycleEvent, NativeWindowEvent, SourceStatus,
};
use crate::gl_backend::config::AppConfig;
use crate::gl_backend::wrappers::egl_display::EglBackend;
use crate::input::InputQueue;

pub fn run(app: AndroidApp, config: &AppConfig) -> anyhow::Result<()> {
    let backend = EglBackend::<NativeWindow>::new().context("EGL setup")?;
    let mut dispatcher: Dispatcher<_, _, AndroidInputQueue> =
        Dispatcher::new(backend, Arc::new(AndroidHost), config)?;

    let mut source = AndroidEventSource::new(app);
    dispatcher.run(&mut source).context("Dispatch loop")?;
    info!("android_main finished");
    Ok(())
}

/// The native-activity glue sends its acknowledgements itself once our poll callback returns.
pub struct AndroidHost;

impl Host for AndroidHost {
    fn init_done(&self) {
        debug!("init done");
    }
    fn input_queue_handled(&self) {
        debug!("input queue handled");
    }
    fn native_window_redraw_done(&self) {
        debug!("redraw done");
    }
}

/// The activity's input queue. The glue attaches and detaches it internally, so the handle is
/// the app itself.
#[derive(Clone)]
pub struct AndroidInputQueue(AndroidApp);

impl InputQueue for AndroidInputQueue {
    fn process(&self) -> usize {
        let mut read = 0;
        match self.0.input_events_iter() {
            Ok(mut iter) => {
                while iter.next(|event| {
                    log_input_event(event);
                    read += 1;
                    InputStatus::Unhandled
                }) {}
            }
            Err(e) => warn!("Input queue unavailable: {:?}", e),
        }
        read
    }
}

fn log_input_event(event: &InputEvent) {
    match event {
        InputEvent::MotionEvent(motion) => {
            debug!("Motion event: {:?}, {} pointers", motion.action(), motion.pointer_count())
        }
        InputEvent::KeyEvent(key) => debug!("Key event: {:?} {:?}", key.action(), key.key_code()),
        _ => debug!("Input event"),
    }
}

pub struct AndroidEventSource {
    app: AndroidApp,
    destroyed: bool,
}

impl AndroidEventSource {
    pub fn new(app: AndroidApp) -> Self {
        Self { app, destroyed: false }
    }
}

impl EventSource for AndroidEventSource {
    type Window = NativeWindow;
    type Queue = AndroidInputQueue;

    fn next_event(&mut self, handler: &mut dyn FnMut(HostEvent<NativeWindow, AndroidInputQueue>)) -> SourceStatus {
        let app = self.app.clone();
        let destroyed = &mut self.destroyed;

        // Handlers run inside the callback: the glue blocks the Java side until it returns,
        // which is what makes window teardown and redraw acknowledgement safe.
        self.app.poll_events(None, |event| {
            let PollEvent::Main(main_event) = event else {
                return;
            };
            match main_event {
                MainEvent::InitWindow { .. } => match app.native_window() {
                    Some(window) => handler(HostEvent::NativeWindow(NativeWindowEvent::Created(window))),
                    None => warn!("InitWindow without a native window"),
                },
                MainEvent::TerminateWindow { .. } => {
                    handler(HostEvent::NativeWindow(NativeWindowEvent::Destroyed))
                }
                MainEvent::RedrawNeeded { .. } => {
                    handler(HostEvent::NativeWindow(NativeWindowEvent::RedrawNeeded))
                }
                MainEvent::GainedFocus => handler(HostEvent::Focus { has_focus: true }),
                MainEvent::LostFocus => handler(HostEvent::Focus { has_focus: false }),
                MainEvent::InputAvailable => handler(HostEvent::InputQueue(InputQueueEvent::Created(
                    AndroidInputQueue(app.clone()),
                ))),
                MainEvent::Start => handler(HostEvent::Lifecycle(LifecycleEvent::Start)),
                MainEvent::Resume { .. } => handler(HostEvent::Lifecycle(LifecycleEvent::Resume)),
                MainEvent::Pause => handler(HostEvent::Lifecycle(LifecycleEvent::Pause)),
                MainEvent::Stop => handler(HostEvent::Lifecycle(LifecycleEvent::Stop)),
                MainEvent::SaveState { .. } => handler(HostEvent::Lifecycle(LifecycleEvent::SaveState)),
                MainEvent::ConfigChanged { .. } => {
                    handler(HostEvent::Lifecycle(LifecycleEvent::ConfigChanged))
                }
                MainEvent::LowMemory => handler(HostEvent::Lifecycle(LifecycleEvent::LowMemory)),
                MainEvent::Destroy => {
                    handler(HostEvent::InputQueue(InputQueueEvent::Destroyed));
                    handler(HostEvent::Lifecycle(LifecycleEvent::Destroy));
                    *destroyed = true;
                }
                _ => {}
            }
        });

        if self.destroyed {
            SourceStatus::Closed
        } else {
            SourceStatus::Open
        }
    }
}
