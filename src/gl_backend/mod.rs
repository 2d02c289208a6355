pub mod config;
pub mod shaders;
pub mod wrappers;

use std::fmt::Debug;

use log::{debug, info};

use crate::error::{EglError, GlError, ShaderStage};
use config::SurfaceConfig;
use shaders::{with_version_prefix, FRAGMENT_SHADER_SOURCE, VERTEX_SHADER_SOURCE};

/// The slice of GLES3 this crate talks to.
///
/// Implementations assume the context they wrap is current on the calling thread.
pub trait Gl {
    type Program: Copy + Debug;
    type Shader: Copy + Debug;
    type Buffer: Copy + Debug;
    type VertexArray: Copy + Debug;

    fn enable(&self, cap: u32);
    fn disable(&self, cap: u32);
    fn blend_equation(&self, mode: u32);
    fn blend_func(&self, src: u32, dst: u32);

    fn create_program(&self) -> Result<Self::Program, GlError>;
    fn create_shader(&self, kind: u32) -> Result<Self::Shader, GlError>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compiled(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_linked(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;

    fn create_buffer(&self) -> Result<Self::Buffer, GlError>;
    fn create_vertex_array(&self) -> Result<Self::VertexArray, GlError>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    fn unbind_texture(&self, target: u32);

    fn clear_color(&self, rgba: [f32; 4]);
    fn clear(&self, mask: u32);
}

/// A native window bound to a surface and a current context.
///
/// Dropping the handle tears down the surface, the context and everything created in it.
pub trait DisplayHandle {
    type Gl: Gl;

    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn gl(&self) -> &Self::Gl;
    fn swap_buffers(&mut self) -> Result<(), EglError>;
}

pub trait GraphicsBackend {
    type Window;
    type Display: DisplayHandle;

    fn create_display(&mut self, window: &Self::Window, config: &SurfaceConfig) -> Result<Self::Display, EglError>;
}

/// Objects created once per context by [`init_gl`].
pub struct GlObjects<G: Gl> {
    pub program: G::Program,
    pub vertex_shader: G::Shader,
    pub fragment_shader: G::Shader,
    pub vertex_array: G::VertexArray,
    pub vertex_buffer: G::Buffer,
}

impl<G: Gl> Debug for GlObjects<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlObjects")
            .field("program", &self.program)
            .field("vertex_shader", &self.vertex_shader)
            .field("fragment_shader", &self.fragment_shader)
            .field("vertex_array", &self.vertex_array)
            .field("vertex_buffer", &self.vertex_buffer)
            .finish()
    }
}

pub fn init_gl<G: Gl>(gl: &G) -> Result<GlObjects<G>, GlError> {
    gl.enable(glow::BLEND);
    gl.blend_equation(glow::FUNC_ADD);
    gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
    gl.disable(glow::CULL_FACE);
    gl.disable(glow::DEPTH_TEST);
    gl.enable(glow::SCISSOR_TEST);

    debug!("Vertex shader:{}", VERTEX_SHADER_SOURCE);
    debug!("Fragment shader:{}", FRAGMENT_SHADER_SOURCE);

    let program = gl.create_program()?;
    let vertex_shader = compile_shader(gl, ShaderStage::Vertex, VERTEX_SHADER_SOURCE)?;
    let fragment_shader = compile_shader(gl, ShaderStage::Fragment, FRAGMENT_SHADER_SOURCE)?;

    gl.attach_shader(program, vertex_shader);
    gl.attach_shader(program, fragment_shader);
    gl.link_program(program);
    if !gl.program_linked(program) {
        return Err(GlError::Link { log: gl.program_info_log(program) });
    }

    let vertex_buffer = gl.create_buffer()?;
    let vertex_array = gl.create_vertex_array()?;

    gl.bind_vertex_array(Some(vertex_array));
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));

    gl.unbind_texture(glow::TEXTURE_2D);
    gl.bind_buffer(glow::ARRAY_BUFFER, None);
    gl.bind_vertex_array(None);

    info!("gl enabled");
    Ok(GlObjects {
        program,
        vertex_shader,
        fragment_shader,
        vertex_array,
        vertex_buffer,
    })
}

fn compile_shader<G: Gl>(gl: &G, stage: ShaderStage, source: &str) -> Result<G::Shader, GlError> {
    let kind = match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    };
    let shader = gl.create_shader(kind)?;
    gl.shader_source(shader, &with_version_prefix(source));
    gl.compile_shader(shader);
    if !gl.shader_compiled(shader) {
        return Err(GlError::ShaderCompile { stage, log: gl.shader_info_log(shader) });
    }
    Ok(shader)
}

/// Clears to `clear_color` and presents. Returns `false` when there is nothing to draw on yet.
pub fn draw<D: DisplayHandle>(display: Option<&mut D>, clear_color: [f32; 4]) -> Result<bool, EglError> {
    let Some(display) = display else {
        debug!("draw skipped: no display");
        return Ok(false);
    };

    let gl = display.gl();
    gl.clear_color(clear_color);
    gl.clear(glow::COLOR_BUFFER_BIT);
    debug!("drawing");

    display.swap_buffers()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{CallLog, GlCall, HeadlessBackend, HeadlessDisplay, HeadlessWindow};

    fn display(log: &CallLog) -> HeadlessDisplay {
        HeadlessBackend::new(log.clone())
            .create_display(&HeadlessWindow::new(100, 200), &SurfaceConfig::default())
            .unwrap()
    }

    #[test]
    fn init_sets_state_and_unbinds() {
        let log = CallLog::default();
        let display = display(&log);
        log.clear();

        let objects = init_gl(display.gl()).unwrap();
        let calls = log.calls();

        assert_eq!(&calls[..6], &[
            GlCall::Enable(glow::BLEND),
            GlCall::BlendEquation(glow::FUNC_ADD),
            GlCall::BlendFunc(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA),
            GlCall::Disable(glow::CULL_FACE),
            GlCall::Disable(glow::DEPTH_TEST),
            GlCall::Enable(glow::SCISSOR_TEST),
        ]);
        assert_eq!(&calls[calls.len() - 3..], &[
            GlCall::BindTexture(glow::TEXTURE_2D, None),
            GlCall::BindBuffer(glow::ARRAY_BUFFER, None),
            GlCall::BindVertexArray(None),
        ]);
        assert!(calls.contains(&GlCall::BindVertexArray(Some(objects.vertex_array))));
        assert!(calls.contains(&GlCall::BindBuffer(glow::ARRAY_BUFFER, Some(objects.vertex_buffer))));
        assert!(calls.contains(&GlCall::LinkProgram(objects.program)));
        assert_eq!(log.count(|c| matches!(c, GlCall::CreateBuffer(_))), 1);
        assert_eq!(log.count(|c| matches!(c, GlCall::CreateVertexArray(_))), 1);
    }

    #[test]
    fn every_shader_source_starts_with_version() {
        let log = CallLog::default();
        let display = display(&log);
        init_gl(display.gl()).unwrap();

        let sources: Vec<String> = log.calls().into_iter().filter_map(|c| match c {
            GlCall::ShaderSource(_, source) => Some(source),
            _ => None,
        }).collect();
        assert_eq!(sources.len(), 2);
        for source in sources {
            assert!(source.starts_with("#version 300 es\n"));
        }
    }

    #[test]
    fn compile_failure_reports_stage() {
        let log = CallLog::default();
        let display = HeadlessBackend::new(log.clone())
            .with_broken_shader(glow::FRAGMENT_SHADER)
            .create_display(&HeadlessWindow::new(1, 1), &SurfaceConfig::default())
            .unwrap();

        match init_gl(display.gl()) {
            Err(GlError::ShaderCompile { stage, .. }) => assert_eq!(stage, ShaderStage::Fragment),
            other => panic!("expected compile error, got {other:?}"),
        }
        assert_eq!(log.count(|c| matches!(c, GlCall::LinkProgram(_))), 0);
    }

    #[test]
    fn link_failure_is_an_error() {
        let log = CallLog::default();
        let display = HeadlessBackend::new(log.clone())
            .with_broken_link()
            .create_display(&HeadlessWindow::new(1, 1), &SurfaceConfig::default())
            .unwrap();

        assert!(matches!(init_gl(display.gl()), Err(GlError::Link { .. })));
        assert_eq!(log.count(|c| matches!(c, GlCall::CreateBuffer(_))), 0);
    }

    #[test]
    fn draw_clears_then_swaps() {
        let log = CallLog::default();
        let mut display = display(&log);
        log.clear();

        assert!(draw(Some(&mut display), [0.2, 0.8, 1.0, 1.0]).unwrap());
        assert_eq!(log.calls(), vec![
            GlCall::ClearColor([0.2, 0.8, 1.0, 1.0]),
            GlCall::Clear(glow::COLOR_BUFFER_BIT),
            GlCall::SwapBuffers,
        ]);
    }

    #[test]
    fn draw_without_display_is_noop() {
        assert!(!draw::<HeadlessDisplay>(None, [0.0; 4]).unwrap());
    }
}
