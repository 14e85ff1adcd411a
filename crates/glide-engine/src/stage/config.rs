use serde::{Deserialize, Serialize};

use crate::scene::SceneConfig;
use crate::scroll::ScrollConfig;

/// Everything a [`Stage`](super::Stage) needs to mount, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub scroll: ScrollConfig,
    pub scene: SceneConfig,
    /// Page length in viewport heights. When unset the page ends below the
    /// lowest plane.
    pub pages: Option<f32>,
    /// Play the tease nudge once the page is mounted.
    pub tease_on_mount: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: StageConfig = serde_json::from_str(
            r#"{ "pages": 3.0, "scroll": { "damping": 0.2 }, "scene": { "planes": [{ "id": 7 }] } }"#,
        )
        .unwrap();

        assert_eq!(cfg.pages, Some(3.0));
        assert_eq!(cfg.scroll.damping, 0.2);
        assert_eq!(cfg.scroll.line_height_px, ScrollConfig::default().line_height_px);
        assert_eq!(cfg.scene.planes.len(), 1);
        assert_eq!(cfg.scene.planes[0].id, 7);
        assert_eq!(cfg.scene.planes[0].width_fraction, 0.5);
        assert!(!cfg.tease_on_mount);
    }
}
