use crate::config::{ItemPosition, Standard};
use crate::hal::DisplayPort;
use crate::symbol;
use crate::telemetry::Attitude;

pub const MAX_PITCH: i16 = 200; // 20.0°
pub const MAX_ROLL: i16 = 400; // 40.0°

const ANCHOR_X: i16 = 14;
const SIDEBAR_WIDTH: i16 = 7;
const SIDEBAR_HEIGHT: i16 = 3;

fn center_row(standard: Standard) -> i16 {
    match standard {
        Standard::PAL => 7,
        Standard::NTSC => 6,
    }
}

// The ladder bar is drawn with 9 sub-row glyphs over a 9 column window
// centered on the screen. Roll tilts the bar by `roll * x / 64` sub-rows per
// column, pitch shifts it by `pitch / 8` around the window center at 41;
// columns falling outside the 0..=81 window stay blank.
pub fn draw_ladder(display: &mut impl DisplayPort, standard: Standard, attitude: Attitude) {
    let top = center_row(standard) - 4;
    let roll = (-attitude.roll).clamp(-MAX_ROLL, MAX_ROLL) as i32;
    let pitch = attitude.pitch.clamp(-MAX_PITCH, MAX_PITCH) as i32;
    let offset = pitch / 8 - 41;
    for x in -4i32..=4 {
        let y = roll * x / 64 - offset;
        if (0..=81).contains(&y) {
            let row = top + (y / 9) as i16;
            display.write_char((ANCHOR_X + x as i16) as u8, row as u8, symbol::AH_BAR9_0 + (y % 9) as u8);
        }
    }
}

pub fn draw_sidebars(display: &mut impl DisplayPort, standard: Standard) {
    let center = center_row(standard);
    for y in -SIDEBAR_HEIGHT..=SIDEBAR_HEIGHT {
        let row = (center + y) as u8;
        display.write_char((ANCHOR_X - SIDEBAR_WIDTH) as u8, row, symbol::AH_DECORATION);
        display.write_char((ANCHOR_X + SIDEBAR_WIDTH) as u8, row, symbol::AH_DECORATION);
    }
    let row = center as u8;
    display.write_char((ANCHOR_X - SIDEBAR_WIDTH + 1) as u8, row, symbol::AH_LEFT);
    display.write_char((ANCHOR_X + SIDEBAR_WIDTH - 1) as u8, row, symbol::AH_RIGHT);
}

pub fn draw_crosshairs(display: &mut impl DisplayPort, standard: Standard) {
    let bytes = [symbol::AH_CENTER_LINE, symbol::AH_CENTER, symbol::AH_CENTER_LINE_RIGHT];
    display.write((ANCHOR_X - 1) as u8, center_row(standard) as u8, &bytes);
}

// one arrow unit per 50cm/s of climb rate
pub fn vario_cells(climb_rate: i16) -> [u8; 5] {
    let v = climb_rate / 50;
    let mut cells = [b' '; 5];
    match v {
        6.. => cells[0] = symbol::VARIO_UP_2A,
        5 => cells[0] = symbol::VARIO_UP_1A,
        _ => (),
    }
    match v {
        4.. => cells[1] = symbol::VARIO_UP_2A,
        3 => cells[1] = symbol::VARIO_UP_1A,
        _ => (),
    }
    match v {
        2.. => cells[2] = symbol::VARIO_UP_2A,
        1 => cells[2] = symbol::VARIO_UP_1A,
        -1 => cells[2] = symbol::VARIO_DOWN_1A,
        ..=-2 => cells[2] = symbol::VARIO_DOWN_2A,
        _ => (),
    }
    match v {
        -3 => cells[3] = symbol::VARIO_DOWN_1A,
        ..=-4 => cells[3] = symbol::VARIO_DOWN_2A,
        _ => (),
    }
    match v {
        -5 => cells[4] = symbol::VARIO_DOWN_1A,
        ..=-6 => cells[4] = symbol::VARIO_DOWN_2A,
        _ => (),
    }
    cells
}

pub fn draw_vario(display: &mut impl DisplayPort, position: ItemPosition, climb_rate: i16) {
    for (i, &cell) in vario_cells(climb_rate).iter().enumerate() {
        display.write_char(position.x(), position.y() + i as u8, cell);
    }
}

mod test {
    #[cfg(test)]
    use super::DisplayPort;

    #[cfg(test)]
    #[derive(Default)]
    struct Recorder(std::vec::Vec<(u8, u8, u8)>);

    #[cfg(test)]
    impl DisplayPort for Recorder {
        fn clear(&mut self) {
            self.0.clear()
        }

        fn write_char(&mut self, x: u8, y: u8, chr: u8) {
            self.0.push((x, y, chr))
        }

        fn write(&mut self, x: u8, y: u8, bytes: &[u8]) {
            for (i, &byte) in bytes.iter().enumerate() {
                self.write_char(x + i as u8, y, byte)
            }
        }

        fn busy(&self) -> bool {
            false
        }

        fn draw(&mut self) {}
    }

    #[test]
    fn test_ladder_bounds() {
        use super::{draw_ladder, Attitude, Standard};

        for roll in (-450..=450).step_by(30) {
            for pitch in (-250..=250).step_by(25) {
                let mut recorder = Recorder::default();
                let attitude = Attitude { roll, pitch, yaw: 0 };
                draw_ladder(&mut recorder, Standard::NTSC, attitude);
                for &(x, y, chr) in recorder.0.iter() {
                    assert!((10..=18).contains(&x), "column {} out of window", x);
                    assert!((2..=11).contains(&y), "row {} out of window", y);
                    assert!((0x80..=0x88).contains(&chr), "glyph {:#x} not a ladder bar", chr);
                }
            }
        }
    }

    #[test]
    fn test_ladder_level() {
        use super::{draw_ladder, Attitude, Standard};

        // level flight puts the bar on the center sub-row of every column
        let mut recorder = Recorder::default();
        draw_ladder(&mut recorder, Standard::NTSC, Attitude::default());
        assert_eq!(9, recorder.0.len());
        for &(_, y, chr) in recorder.0.iter() {
            assert_eq!((6, 0x80 + 41 % 9), (y, chr));
        }
    }

    #[test]
    fn test_ladder_roll_symmetry() {
        use super::{draw_ladder, Attitude, Standard};

        for roll in (-400..=400).step_by(50) {
            for pitch in (-200..=200).step_by(50) {
                let mut left = Recorder::default();
                let mut right = Recorder::default();
                draw_ladder(&mut left, Standard::PAL, Attitude { roll, pitch, yaw: 0 });
                draw_ladder(&mut right, Standard::PAL, Attitude { roll: -roll, pitch, yaw: 0 });
                let mirrored: std::vec::Vec<_> =
                    right.0.iter().map(|&(x, y, chr)| (28 - x, y, chr)).collect();
                let mut sorted = left.0.clone();
                sorted.sort();
                let mut mirrored_sorted = mirrored.clone();
                mirrored_sorted.sort();
                assert_eq!(sorted, mirrored_sorted);
            }
        }
    }

    #[test]
    fn test_sidebars() {
        use super::{draw_sidebars, Standard};

        let mut recorder = Recorder::default();
        draw_sidebars(&mut recorder, Standard::NTSC);
        assert_eq!(16, recorder.0.len());
        assert!(recorder.0.contains(&(7, 3, 0x13)));
        assert!(recorder.0.contains(&(21, 9, 0x13)));
        assert!(recorder.0.contains(&(8, 6, 0x03)));
        assert!(recorder.0.contains(&(20, 6, 0x02)));
    }

    #[test]
    fn test_crosshairs() {
        use super::{draw_crosshairs, Standard};

        let mut recorder = Recorder::default();
        draw_crosshairs(&mut recorder, Standard::PAL);
        assert_eq!(
            std::vec![(13, 7, 0x26), (14, 7, 0x7E), (15, 7, 0x27)],
            recorder.0
        );
    }

    #[test]
    fn test_vario_cells() {
        use super::vario_cells;

        assert_eq!([b' '; 5], vario_cells(0));
        assert_eq!([0xA2, 0xA2, 0xA2, b' ', b' '], vario_cells(300));
        assert_eq!([b' ', b' ', 0xA3, b' ', b' '], vario_cells(70));
        assert_eq!([0xA3, 0xA2, 0xA2, b' ', b' '], vario_cells(250));
        assert_eq!([b' ', b' ', 0xA4, b' ', b' '], vario_cells(-60));
        assert_eq!([b' ', b' ', 0xA5, 0xA5, 0xA4], vario_cells(-250));
        assert_eq!([b' ', b' ', 0xA5, 0xA5, 0xA5], vario_cells(-300));
    }
}
