pub mod dispatcher;
pub mod error;
pub mod event;
pub mod gl_backend;
pub mod headless;
pub mod input;
pub mod surface;

#[cfg(target_os = "android")]
pub mod android;

pub use dispatcher::Dispatcher;
pub use gl_backend::config::AppConfig;

#[cfg(target_os = "android")]
#[no_mangle]
fn android_main(app: android_activity::AndroidApp) {
    let config = AppConfig::default();
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(config.max_level)
            .with_tag(config.log_tag),
    );

    // Everything GL-related stays on this thread for the lifetime of the activity.
    if let Err(e) = android::run(app, &config) {
        log::error!("Fatal: {:?}", e);
        std::process::exit(1);
    }
}
