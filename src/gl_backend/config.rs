use khronos_egl as egl;
use log::LevelFilter;

/// `EGL_OPENGL_ES3_BIT`, only exported by the 1.5 bindings.
const OPENGL_ES3_BIT: egl::Int = 0x0040;

/// Attributes requested from EGL when a native window shows up.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceConfig {
    pub client_version: egl::Int,
    pub red_size: egl::Int,
    pub green_size: egl::Int,
    pub blue_size: egl::Int,
    pub alpha_size: egl::Int,
    pub depth_size: egl::Int,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            client_version: 3,
            red_size: 8,
            green_size: 8,
            blue_size: 8,
            alpha_size: 8,
            depth_size: 24,
        }
    }
}

impl SurfaceConfig {
    /// `EGL_NONE` terminated list for `eglChooseConfig`.
    pub fn config_attribs(&self) -> Vec<egl::Int> {
        let mut attribs = vec![
            egl::SURFACE_TYPE, egl::WINDOW_BIT,
            egl::RED_SIZE, self.red_size,
            egl::GREEN_SIZE, self.green_size,
            egl::BLUE_SIZE, self.blue_size,
            egl::ALPHA_SIZE, self.alpha_size,
            egl::DEPTH_SIZE, self.depth_size,
        ];
        if self.client_version >= 3 {
            attribs.extend_from_slice(&[egl::RENDERABLE_TYPE, OPENGL_ES3_BIT]);
        }
        attribs.push(egl::NONE);
        attribs
    }

    pub fn context_attribs(&self) -> [egl::Int; 3] {
        [egl::CONTEXT_CLIENT_VERSION, self.client_version, egl::NONE]
    }
}

pub struct AppConfig {
    pub log_tag: &'static str,
    pub max_level: LevelFilter,
    pub clear_color: [f32; 4],
    pub surface: SurfaceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_tag: "THDWB",
            max_level: LevelFilter::Info,
            clear_color: [0.2, 0.8, 1.0, 1.0],
            surface: SurfaceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(attribs: &[egl::Int], key: egl::Int) -> Option<egl::Int> {
        attribs.chunks(2).find(|pair| pair[0] == key).and_then(|pair| pair.get(1).copied())
    }

    #[test]
    fn default_config_requests_window_rgba8_depth24() {
        let attribs = SurfaceConfig::default().config_attribs();

        assert_eq!(lookup(&attribs, egl::SURFACE_TYPE), Some(egl::WINDOW_BIT));
        assert_eq!(lookup(&attribs, egl::RED_SIZE), Some(8));
        assert_eq!(lookup(&attribs, egl::GREEN_SIZE), Some(8));
        assert_eq!(lookup(&attribs, egl::BLUE_SIZE), Some(8));
        assert_eq!(lookup(&attribs, egl::ALPHA_SIZE), Some(8));
        assert_eq!(lookup(&attribs, egl::DEPTH_SIZE), Some(24));
        assert_eq!(lookup(&attribs, egl::RENDERABLE_TYPE), Some(OPENGL_ES3_BIT));
        assert_eq!(attribs.last(), Some(&egl::NONE));
        assert_eq!(attribs.len() % 2, 1);
    }

    #[test]
    fn context_asks_for_client_version_3() {
        let attribs = SurfaceConfig::default().context_attribs();
        assert_eq!(attribs, [egl::CONTEXT_CLIENT_VERSION, 3, egl::NONE]);
    }

    #[test]
    fn es2_config_skips_renderable_type() {
        let config = SurfaceConfig { client_version: 2, ..SurfaceConfig::default() };
        assert_eq!(lookup(&config.config_attribs(), egl::RENDERABLE_TYPE), None);
    }
}
