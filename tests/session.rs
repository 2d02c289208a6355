use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};

use native_gles::event::{HostEvent, InputQueueEvent, LifecycleEvent, NativeWindowEvent};
use native_gles::headless::{
    dry_run, CallLog, GlCall, HeadlessBackend, HeadlessWindow, RecordingHost, ScriptedEvents, VecInputQueue,
};
use native_gles::{AppConfig, Dispatcher};

struct CaptureLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines.lock().unwrap().push(record.args().to_string());
        }
    }
    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger { lines: Mutex::new(Vec::new()) };

fn captured() -> Vec<String> {
    // set_logger only succeeds once per test binary
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Info);
    LOGGER.lines.lock().unwrap().clone()
}

type Event = HostEvent<HeadlessWindow, VecInputQueue>;

fn window_created(width: i32, height: i32) -> Event {
    HostEvent::NativeWindow(NativeWindowEvent::Created(HeadlessWindow::new(width, height)))
}

#[test]
fn window_created_logs_resolution_then_enables_gl() {
    captured();
    let log = CallLog::default();
    let host = Arc::new(RecordingHost::default());
    let mut dispatcher: Dispatcher<_, _, VecInputQueue> =
        Dispatcher::new(HeadlessBackend::new(log.clone()), host, &AppConfig::default()).unwrap();

    dispatcher.run(&mut ScriptedEvents::new([window_created(100, 200)])).unwrap();

    let lines = captured();
    let res = lines.iter().position(|l| l == "EGL display res: 100x200").expect("resolution logged");
    let enabled = lines.iter().rposition(|l| l == "gl enabled").expect("gl enabled logged");
    assert!(res < enabled);
    assert_eq!(log.calls().first(), Some(&GlCall::CreateDisplay { width: 100, height: 200 }));
    assert_eq!(log.count(|c| matches!(c, GlCall::LinkProgram(_))), 1);
}

#[test]
fn create_then_destroy_back_to_back() {
    let log = CallLog::default();
    let host = Arc::new(RecordingHost::default());
    let mut dispatcher: Dispatcher<_, _, VecInputQueue> =
        Dispatcher::new(HeadlessBackend::new(log.clone()), host, &AppConfig::default()).unwrap();

    dispatcher
        .run(&mut ScriptedEvents::new([
            window_created(100, 200),
            HostEvent::NativeWindow(NativeWindowEvent::Destroyed),
            HostEvent::NativeWindow(NativeWindowEvent::Destroyed),
        ]))
        .unwrap();

    assert_eq!(log.count(|c| *c == GlCall::DestroyDisplay), 1);
    assert_eq!(log.count(|c| *c == GlCall::SwapBuffers), 0);
}

#[test]
fn redraw_after_destroy_is_a_noop_but_acknowledged() {
    let log = CallLog::default();
    let host = Arc::new(RecordingHost::default());
    let mut dispatcher: Dispatcher<_, _, VecInputQueue> =
        Dispatcher::new(HeadlessBackend::new(log.clone()), host.clone(), &AppConfig::default()).unwrap();

    dispatcher
        .run(&mut ScriptedEvents::new([
            window_created(4, 4),
            HostEvent::NativeWindow(NativeWindowEvent::Destroyed),
            HostEvent::NativeWindow(NativeWindowEvent::RedrawNeeded),
            HostEvent::Focus { has_focus: true },
        ]))
        .unwrap();

    assert_eq!(log.count(|c| *c == GlCall::SwapBuffers), 0);
    assert_eq!(host.redraws_done(), 1);
}

#[test]
fn input_queue_is_handed_to_worker() {
    let host = Arc::new(RecordingHost::default());
    let queue = VecInputQueue::new(["key down", "key up", "touch"]);
    let mut dispatcher: Dispatcher<_, _, VecInputQueue> =
        Dispatcher::new(HeadlessBackend::new(CallLog::default()), host.clone(), &AppConfig::default()).unwrap();

    dispatcher
        .run(&mut ScriptedEvents::new([
            HostEvent::Lifecycle(LifecycleEvent::Start),
            HostEvent::InputQueue(InputQueueEvent::Created(queue.clone())),
        ]))
        .unwrap();
    // dropping the dispatcher joins the input thread after it saw the queue
    drop(dispatcher);

    assert_eq!(queue.processed(), 3);
    assert_eq!(host.inputs_handled(), 1);
    assert_eq!(host.inits_done(), 1);
}

#[test]
fn dry_run_replays_full_session() {
    let log = dry_run(&AppConfig::default()).unwrap();
    let calls = log.calls();

    assert_eq!(calls.first(), Some(&GlCall::CreateDisplay { width: 100, height: 200 }));
    assert_eq!(calls.last(), Some(&GlCall::DestroyDisplay));
    assert_eq!(log.count(|c| *c == GlCall::ClearColor([0.2, 0.8, 1.0, 1.0])), 3);
}
