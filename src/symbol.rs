// Glyph codes of the overlay chip character font

pub const RSSI: u8 = 0x01;
pub const AH_RIGHT: u8 = 0x02;
pub const AH_LEFT: u8 = 0x03;
pub const THROTTLE: u8 = 0x04;
pub const THROTTLE_1: u8 = 0x05;
pub const MAH: u8 = 0x07;
pub const METER: u8 = 0x0C;
pub const FEET: u8 = 0x0F;
pub const AH_DECORATION: u8 = 0x13;
pub const SATELLITE_L: u8 = 0x1E;
pub const SATELLITE_R: u8 = 0x1F;
pub const AH_CENTER_LINE: u8 = 0x26;
pub const AH_CENTER_LINE_RIGHT: u8 = 0x27;
pub const ARROW_UP: u8 = 0x60; // 16 arrow glyphs, 22.5° steps clockwise
pub const AH_CENTER: u8 = 0x7E;
pub const ALTITUDE: u8 = 0x7F;
pub const AH_BAR9_0: u8 = 0x80; // 9 ladder sub-row glyphs
pub const BATTERY: u8 = 0x91;
pub const AMPERE: u8 = 0x9A;
pub const ON_MINUTE: u8 = 0x9B;
pub const FLY_MINUTE: u8 = 0x9C;
pub const VARIO: u8 = 0x9F;
pub const DISTANCE: u8 = 0xA0;
pub const KMH: u8 = 0xA1;
pub const VARIO_UP_2A: u8 = 0xA2;
pub const VARIO_UP_1A: u8 = 0xA3;
pub const VARIO_DOWN_1A: u8 = 0xA4;
pub const VARIO_DOWN_2A: u8 = 0xA5;
pub const LATITUDE: u8 = 0xA6;
pub const LONGITUDE: u8 = 0xA7;
pub const DEGREE: u8 = 0xA8;
pub const HEADING: u8 = 0xA9;
