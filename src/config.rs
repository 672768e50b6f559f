use serde::{Deserialize, Serialize};

use crate::board_widget::{WidgetConfig, WidgetKind};
use crate::grid::Grid;


// Board presentation options supplied by the embedding page.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    // chessboard.js piece image template, e.g. "img/chesspieces/wikipedia/{piece}.png".
    pub piece_2d_set: String,
    pub piece_3d_set: String,
    pub font_file: Option<String>,
    pub spare_pieces: bool,
    // Start with the 3D board when the environment supports it.
    pub start_3d: bool,
    pub draggable: bool,
    pub camera_controls: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            piece_2d_set: "img/chesspieces/wikipedia/{piece}.png".to_owned(),
            piece_3d_set: "classic".to_owned(),
            font_file: None,
            spare_pieces: false,
            start_3d: true,
            draggable: true,
            camera_controls: true,
        }
    }
}

impl UiConfig {
    pub fn widget_config(&self, kind: WidgetKind, position: Grid) -> WidgetConfig {
        WidgetConfig {
            kind,
            position,
            draggable: self.draggable,
            spare_pieces: self.spare_pieces,
            camera_controls: self.camera_controls,
            piece_theme: self.piece_2d_set.clone(),
            piece_set: match kind {
                WidgetKind::TwoD => None,
                WidgetKind::ThreeD => Some(self.piece_3d_set.clone()),
            },
            font_file: self.font_file.clone(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config: UiConfig = serde_json::from_str(r#"{"start_3d": false}"#).unwrap();
        assert_eq!(config, UiConfig { start_3d: false, ..UiConfig::default() });
    }

    #[test]
    fn piece_set_only_for_3d() {
        let config = UiConfig::default();
        assert_eq!(config.widget_config(WidgetKind::TwoD, Grid::new()).piece_set, None);
        assert_eq!(
            config.widget_config(WidgetKind::ThreeD, Grid::new()).piece_set.as_deref(),
            Some("classic")
        );
    }
}
