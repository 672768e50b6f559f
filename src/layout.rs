use serde::{Deserialize, Serialize};

use crate::board_widget::WidgetKind;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: u32,
    pub height: u32,
}

// Board dimensions that fit into the available area. The 3D board keeps a 4:3 aspect ratio with
// the width a multiple of 4 and the height a multiple of 3; the 2D board is square.
pub fn fit_board(kind: WidgetKind, available_width: u32, available_height: u32) -> BoardSize {
    match kind {
        WidgetKind::ThreeD => {
            let mut width = available_width & !3;
            let height = available_height - available_height % 3;
            if width * 3 > height * 4 {
                width = height * 4 / 3;
            }
            BoardSize { width, height: width * 3 / 4 }
        }
        WidgetKind::TwoD => {
            let side = available_width.min(available_height);
            BoardSize { width: side, height: side }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_2d() {
        assert_eq!(fit_board(WidgetKind::TwoD, 800, 600), BoardSize { width: 600, height: 600 });
        assert_eq!(fit_board(WidgetKind::TwoD, 300, 500), BoardSize { width: 300, height: 300 });
    }

    #[test]
    fn width_bound_3d() {
        // 803 -> 800; 700 -> 699; 800 * 3/4 = 600 fits.
        assert_eq!(fit_board(WidgetKind::ThreeD, 803, 700), BoardSize { width: 800, height: 600 });
    }

    #[test]
    fn height_bound_3d() {
        // 1000 -> 1000; 601 -> 600; 1000 * 3/4 > 600, so width = 800.
        assert_eq!(fit_board(WidgetKind::ThreeD, 1000, 601), BoardSize { width: 800, height: 600 });
    }

    #[test]
    fn degenerate() {
        assert_eq!(fit_board(WidgetKind::ThreeD, 0, 0), BoardSize { width: 0, height: 0 });
        assert_eq!(fit_board(WidgetKind::TwoD, 0, 10), BoardSize { width: 0, height: 0 });
    }
}
