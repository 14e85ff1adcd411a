use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Full-screen effect applied after the scene render pass.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostEffect {
    /// Splits the red and blue channels horizontally, scaled by scroll velocity.
    RgbShift { amount: f32 },
    /// Darkens the frame edges.
    Vignette { offset: f32, darkness: f32 },
    /// Animated film grain.
    Grain { intensity: f32 },
}

impl PostEffect {
    pub fn name(&self) -> &'static str {
        match self {
            PostEffect::RgbShift { .. } => "rgb_shift",
            PostEffect::Vignette { .. } => "vignette",
            PostEffect::Grain { .. } => "grain",
        }
    }

    /// Effect parameters packed for a uniform slot.
    pub fn params(&self) -> [f32; 4] {
        match *self {
            PostEffect::RgbShift { amount } => [amount, 0.0, 0.0, 0.0],
            PostEffect::Vignette { offset, darkness } => [offset, darkness, 0.0, 0.0],
            PostEffect::Grain { intensity } => [intensity, 0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PostPass {
    /// Draws the scene into an offscreen target. Always first.
    Render,
    Effect(PostEffect),
}

/// Ordered, immutable post-processing chain.
///
/// Built once when the presenter initializes; clones share the pass list.
#[derive(Debug, Clone, PartialEq)]
pub struct PostChain {
    passes: Arc<[PostPass]>,
}

impl PostChain {
    pub fn new(effects: &[PostEffect]) -> Self {
        let passes: Vec<PostPass> = std::iter::once(PostPass::Render)
            .chain(effects.iter().copied().map(PostPass::Effect))
            .collect();
        Self { passes: passes.into() }
    }

    pub fn passes(&self) -> &[PostPass] {
        &self.passes
    }

    pub fn effects(&self) -> impl Iterator<Item = &PostEffect> {
        self.passes.iter().filter_map(|p| match p {
            PostPass::Effect(e) => Some(e),
            PostPass::Render => None,
        })
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PostChain {
    fn default() -> Self {
        Self::new(&[
            PostEffect::RgbShift { amount: 0.0015 },
            PostEffect::Vignette { offset: 1.0, darkness: 1.1 },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_pass_leads_in_given_order() {
        let chain = PostChain::new(&[
            PostEffect::Grain { intensity: 0.1 },
            PostEffect::Vignette { offset: 1.0, darkness: 1.0 },
        ]);
        let names: Vec<_> = chain.effects().map(PostEffect::name).collect();
        assert_eq!(chain.passes()[0], PostPass::Render);
        assert_eq!(names, ["grain", "vignette"]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn clones_share_passes() {
        let chain = PostChain::default();
        let copy = chain.clone();
        assert!(std::ptr::eq(chain.passes(), copy.passes()));
    }

    #[test]
    fn effects_deserialize_tagged() {
        let effect: PostEffect =
            serde_json::from_str(r#"{ "kind": "vignette", "offset": 0.8, "darkness": 1.2 }"#).unwrap();
        assert_eq!(effect, PostEffect::Vignette { offset: 0.8, darkness: 1.2 });
    }
}
