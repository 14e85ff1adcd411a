//! WGSL sources.

pub(super) const MESH: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

struct Material {
    model: mat4x4<f32>,
    tint: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;

@group(1) @binding(0) var<uniform> material: Material;
@group(1) @binding(1) var albedo: texture_2d<f32>;
@group(1) @binding(2) var albedo_sampler: sampler;

struct VsIn {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VsIn) -> VsOut {
    var out: VsOut;
    out.clip = camera.view_proj * material.model * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let c = textureSample(albedo, albedo_sampler, in.uv) * material.tint;
    return vec4<f32>(c.rgb * c.a, c.a);
}
"#;

/// Full-screen passes. One module, one fragment entry point per effect.
pub(super) const POST: &str = r#"
struct Post {
    resolution: vec2<f32>,
    time: f32,
    velocity: f32,
    params: vec4<f32>,
};

@group(0) @binding(0) var source: texture_2d<f32>;
@group(0) @binding(1) var source_sampler: sampler;
@group(0) @binding(2) var<uniform> post: Post;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

// One oversized triangle covering the screen.
@vertex
fn vs_fullscreen(@builtin(vertex_index) i: u32) -> VsOut {
    let p = vec2<f32>(f32((i << 1u) & 2u), f32(i & 2u));
    var out: VsOut;
    out.clip = vec4<f32>(p * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(p.x, 1.0 - p.y);
    return out;
}

@fragment
fn fs_blit(in: VsOut) -> @location(0) vec4<f32> {
    return textureSample(source, source_sampler, in.uv);
}

@fragment
fn fs_rgb_shift(in: VsOut) -> @location(0) vec4<f32> {
    let amount = post.params.x * (1.0 + abs(post.velocity) * 0.01);
    let offset = vec2<f32>(amount, 0.0);
    let base = textureSample(source, source_sampler, in.uv);
    let r = textureSample(source, source_sampler, in.uv + offset).r;
    let b = textureSample(source, source_sampler, in.uv - offset).b;
    return vec4<f32>(r, base.g, b, base.a);
}

@fragment
fn fs_vignette(in: VsOut) -> @location(0) vec4<f32> {
    let texel = textureSample(source, source_sampler, in.uv);
    let d = (in.uv - vec2<f32>(0.5)) * post.params.x;
    let rgb = mix(texel.rgb, vec3<f32>(1.0 - post.params.y), dot(d, d));
    return vec4<f32>(rgb, texel.a);
}

@fragment
fn fs_grain(in: VsOut) -> @location(0) vec4<f32> {
    let texel = textureSample(source, source_sampler, in.uv);
    let seed = dot(in.uv * post.resolution + vec2<f32>(post.time), vec2<f32>(12.9898, 78.233));
    let noise = fract(sin(seed) * 43758.5453) - 0.5;
    return vec4<f32>(texel.rgb + vec3<f32>(noise * post.params.x), texel.a);
}
"#;

pub(super) const BLIT_ENTRY: &str = "fs_blit";

/// Fragment entry point for an effect.
pub(super) fn effect_entry(effect: &crate::scene::PostEffect) -> &'static str {
    use crate::scene::PostEffect;
    match effect {
        PostEffect::RgbShift { .. } => "fs_rgb_shift",
        PostEffect::Vignette { .. } => "fs_vignette",
        PostEffect::Grain { .. } => "fs_grain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PostEffect;

    #[test]
    fn every_effect_entry_exists_in_post_module() {
        let effects = [
            PostEffect::RgbShift { amount: 0.0 },
            PostEffect::Vignette { offset: 1.0, darkness: 1.0 },
            PostEffect::Grain { intensity: 0.0 },
        ];
        for effect in &effects {
            assert!(POST.contains(&format!("fn {}(", effect_entry(effect))));
        }
        assert!(POST.contains(&format!("fn {BLIT_ENTRY}(")));
    }
}
