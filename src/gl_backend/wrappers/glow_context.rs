use glow::HasContext;

use crate::error::GlError;
use crate::gl_backend::Gl;

// Every call below runs with the EglDisplay's context current on this thread,
// which is the only place a glow::Context gets built.
impl Gl for glow::Context {
    type Program = glow::Program;
    type Shader = glow::Shader;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;

    fn enable(&self, cap: u32) {
        unsafe { HasContext::enable(self, cap) }
    }
    fn disable(&self, cap: u32) {
        unsafe { HasContext::disable(self, cap) }
    }
    fn blend_equation(&self, mode: u32) {
        unsafe { HasContext::blend_equation(self, mode) }
    }
    fn blend_func(&self, src: u32, dst: u32) {
        unsafe { HasContext::blend_func(self, src, dst) }
    }

    fn create_program(&self) -> Result<Self::Program, GlError> {
        unsafe { HasContext::create_program(self) }
            .map_err(|reason| GlError::Create { what: "program", reason })
    }
    fn create_shader(&self, kind: u32) -> Result<Self::Shader, GlError> {
        unsafe { HasContext::create_shader(self, kind) }
            .map_err(|reason| GlError::Create { what: "shader", reason })
    }
    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }
    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }
    fn shader_compiled(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }
    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }
    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }
    fn program_linked(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }
    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, GlError> {
        unsafe { HasContext::create_buffer(self) }
            .map_err(|reason| GlError::Create { what: "vertex buffer", reason })
    }
    fn create_vertex_array(&self) -> Result<Self::VertexArray, GlError> {
        unsafe { HasContext::create_vertex_array(self) }
            .map_err(|reason| GlError::Create { what: "vertex array", reason })
    }
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array) }
    }
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target, buffer) }
    }
    fn unbind_texture(&self, target: u32) {
        unsafe { self.bind_texture(target, None) }
    }

    fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe { HasContext::clear_color(self, r, g, b, a) }
    }
    fn clear(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) }
    }
}
