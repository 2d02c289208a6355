pub mod egl_display;
pub mod glow_context;
