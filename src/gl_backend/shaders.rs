/// Always the first line handed to the compiler.
pub const VERSION_PREFIX: &str = "#version 300 es\n";

pub const VERTEX_SHADER_SOURCE: &str = r#"
uniform mat4 ProjMtx;

in vec2 Position;
in vec2 TexCoord;
in vec4 Color;

out vec2 Frag_UV;
out vec4 Frag_Color;

void main() {
    Frag_UV = TexCoord;
    Frag_Color = Color;
    gl_Position = ProjMtx * vec4(Position.xy, 0, 1);
}
"#;

pub const FRAGMENT_SHADER_SOURCE: &str = r#"
precision mediump float;
uniform sampler2D Texture;

in vec2 Frag_UV;
in vec4 Frag_Color;

out vec4 Out_Color;

void main() {
    Out_Color = Frag_Color * texture(Texture, Frag_UV.st);
}
"#;

pub fn with_version_prefix(source: &str) -> String {
    let mut full = String::with_capacity(VERSION_PREFIX.len() + source.len());
    full.push_str(VERSION_PREFIX);
    full.push_str(source);
    full
}
