use core::fmt::{self, Write};

use heapless::Vec;

use crate::config::{Config, UnitSystem};
use crate::symbol;
use crate::telemetry::Telemetry;

// Raw-byte render buffer. Glyph codes live above 0x7F, so this is not UTF-8
// text; numbers and labels are written through `core::fmt`, glyphs are pushed
// as plain bytes. Over-long output is truncated, never an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Text(Vec<u8, 32>);

impl Text {
    pub fn push(&mut self, byte: u8) {
        self.0.push(byte).ok();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }
}

impl Write for Text {
    fn write_str(&mut self, string: &str) -> fmt::Result {
        for &byte in string.as_bytes() {
            if self.0.push(byte).is_err() {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

pub fn convert_distance(units: UnitSystem, centimeters: i32) -> i32 {
    match units {
        UnitSystem::Imperial => centimeters * 328 / 100, // feet / 100
        UnitSystem::Metric => centimeters,
    }
}

pub fn distance(units: UnitSystem, centimeters: i32, out: &mut Text) {
    let value = convert_distance(units, centimeters);
    let abs = value.abs();
    let sign = if value < 0 { "-" } else { "" };
    match units {
        UnitSystem::Imperial => {
            write!(out, "{}{}", sign, abs / 100).ok();
            out.push(symbol::FEET);
        }
        UnitSystem::Metric => {
            write!(out, "{}{}.{}", sign, abs / 100, abs % 100 / 10).ok();
            out.push(symbol::METER);
        }
    }
}

pub fn timer(glyph: u8, seconds: u32, out: &mut Text) {
    out.push(glyph);
    write!(out, "{:02}:{:02}", seconds / 60, seconds % 60).ok();
}

fn coordinate(glyph: u8, value: i32, out: &mut Text) {
    out.push(glyph);
    if value < 0 {
        out.push(b'-');
    }
    let abs = value.unsigned_abs();
    write!(out, "{:02}.{:07}", abs / 10_000_000, abs % 10_000_000).ok();
}

pub fn rssi(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    out.push(symbol::RSSI);
    write!(out, "{}", telemetry.rssi_percentage()).ok();
}

pub fn battery_voltage(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let voltage = telemetry.battery.voltage;
    out.push(symbol::BATTERY);
    write!(out, "{}.{}V", voltage / 10, voltage % 10).ok();
}

pub fn current_draw(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let current = (telemetry.battery.current as i32).abs();
    out.push(symbol::AMPERE);
    write!(out, "{}.{:02}", current / 100, current % 100).ok();
}

pub fn capacity_drawn(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    out.push(symbol::MAH);
    write!(out, "{}", telemetry.battery.consumed).ok();
}

pub fn gps_satellites(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    if let Some(gnss) = telemetry.gnss {
        out.push(symbol::SATELLITE_L);
        out.push(symbol::SATELLITE_R);
        write!(out, "{}", gnss.satellites).ok();
    }
}

pub fn gps_speed(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    if let Some(gnss) = telemetry.gnss {
        write!(out, "{}", gnss.ground_speed as u32 * 36 / 1000).ok();
        out.push(symbol::KMH);
    }
}

pub fn gps_latitude(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    if let Some(gnss) = telemetry.gnss {
        coordinate(symbol::LATITUDE, gnss.latitude, out);
    }
}

pub fn gps_longitude(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    if let Some(gnss) = telemetry.gnss {
        coordinate(symbol::LONGITUDE, gnss.longitude, out);
    }
}

pub fn home_direction(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    if let Some(gnss) = telemetry.gnss {
        let mut heading = gnss.home_direction - telemetry.attitude.yaw / 10;
        if heading < 0 {
            heading += 360;
        }
        if heading >= 360 {
            heading -= 360;
        }
        out.push(symbol::ARROW_UP + (heading * 2 / 45) as u8);
    }
}

pub fn home_distance(telemetry: &Telemetry, config: &Config, out: &mut Text) {
    if let Some(gnss) = telemetry.gnss {
        out.push(symbol::DISTANCE);
        distance(config.units, gnss.home_distance as i32 * 100, out);
    }
}

pub fn heading(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let mut yaw = telemetry.attitude.yaw / 10;
    if yaw < 0 {
        yaw += 360;
    }
    out.push(symbol::HEADING);
    write!(out, "{}", yaw).ok();
    out.push(symbol::DEGREE);
}

pub fn altitude(telemetry: &Telemetry, config: &Config, out: &mut Text) {
    out.push(symbol::ALTITUDE);
    distance(config.units, telemetry.altitude, out);
}

pub fn flight_mode(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    write!(out, "{}", telemetry.mode.abbreviation()).ok();
}

pub fn craft_name(_: &Telemetry, config: &Config, out: &mut Text) {
    if config.craft_name.is_empty() {
        write!(out, "CRAFT_NAME").ok();
        return;
    }
    for &byte in config.craft_name.as_bytes() {
        out.push(byte.to_ascii_uppercase());
    }
}

pub fn throttle_position(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let throttle = telemetry.sticks.throttle.clamp(1000, 2000) as u32;
    out.push(symbol::THROTTLE);
    out.push(symbol::THROTTLE_1);
    write!(out, "{}", (throttle - 1000) * 100 / 1000).ok();
}

pub fn vtx_channel(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    if let Some(channel) = telemetry.vtx_channel {
        write!(out, "CH:{}", channel % 8 + 1).ok();
    }
}

pub fn vario_numeral(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let value = telemetry.vario.unwrap_or(0) / 10; // deci-meter per second
    let sign = if value < 0 { '-' } else { ' ' };
    write!(out, "{}{}.{}", sign, (value / 10).abs(), (value % 10).abs()).ok();
    out.push(symbol::VARIO);
}

pub fn roll_pids(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let pid = telemetry.pids.roll;
    write!(out, "ROL {:3} {:3} {:3}", pid.p, pid.i, pid.d).ok();
}

pub fn pitch_pids(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let pid = telemetry.pids.pitch;
    write!(out, "PIT {:3} {:3} {:3}", pid.p, pid.i, pid.d).ok();
}

pub fn yaw_pids(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let pid = telemetry.pids.yaw;
    write!(out, "YAW {:3} {:3} {:3}", pid.p, pid.i, pid.d).ok();
}

pub fn power(telemetry: &Telemetry, _: &Config, out: &mut Text) {
    let battery = telemetry.battery;
    write!(out, "{}W", battery.current as i32 * battery.voltage as i32 / 1000).ok();
}

mod test {
    #[cfg(test)]
    use super::{Config, Telemetry, Text};

    #[cfg(test)]
    fn render(formatter: fn(&Telemetry, &Config, &mut Text), telemetry: &Telemetry) -> Text {
        let mut out = Text::default();
        formatter(telemetry, &Config::default(), &mut out);
        out
    }

    #[test]
    fn test_distance() {
        use super::{distance, Text, UnitSystem};

        let mut out = Text::default();
        distance(UnitSystem::Metric, 12345, &mut out);
        assert_eq!(b"123.4\x0C", out.as_bytes());

        out.clear();
        distance(UnitSystem::Imperial, 10000, &mut out);
        assert_eq!(b"328\x0F", out.as_bytes());

        out.clear();
        distance(UnitSystem::Metric, -9876, &mut out);
        assert_eq!(b"-98.7\x0C", out.as_bytes());

        out.clear();
        distance(UnitSystem::Imperial, -10000, &mut out);
        assert_eq!(b"-328\x0F", out.as_bytes());
    }

    #[test]
    fn test_coordinate() {
        use super::{coordinate, Text};

        let mut out = Text::default();
        coordinate(0xA6, 407127837, &mut out);
        assert_eq!(b"\xA640.7127837", out.as_bytes());

        out.clear();
        coordinate(0xA7, -50000000, &mut out);
        assert_eq!(b"\xA7-05.0000000", out.as_bytes());
    }

    #[test]
    fn test_battery() {
        use super::{battery_voltage, capacity_drawn, current_draw, power, Telemetry};

        let mut telemetry = Telemetry::default();
        telemetry.battery.voltage = 168;
        telemetry.battery.current = 1234;
        telemetry.battery.consumed = 1500;
        assert_eq!(b"\x9116.8V", render(battery_voltage, &telemetry).as_bytes());
        assert_eq!(b"\x9A12.34", render(current_draw, &telemetry).as_bytes());
        assert_eq!(b"\x071500", render(capacity_drawn, &telemetry).as_bytes());
        assert_eq!(b"207W", render(power, &telemetry).as_bytes());
    }

    #[test]
    fn test_gnss() {
        use super::{gps_satellites, gps_speed, home_direction, home_distance, Telemetry};
        use crate::telemetry::Gnss;

        let mut telemetry = Telemetry::default();
        let mut gnss = Gnss::default();
        gnss.satellites = 9;
        gnss.ground_speed = 1000; // 36km/h
        gnss.home_direction = 90;
        gnss.home_distance = 102;
        telemetry.gnss = Some(gnss);
        assert_eq!(b"\x1E\x1F9", render(gps_satellites, &telemetry).as_bytes());
        assert_eq!(b"36\xA1", render(gps_speed, &telemetry).as_bytes());
        assert_eq!(&[0x60 + 4], render(home_direction, &telemetry).as_bytes());
        assert_eq!(b"\xA0102.0\x0C", render(home_distance, &telemetry).as_bytes());

        telemetry.attitude.yaw = 450; // 45°, one sector counter-clockwise
        assert_eq!(&[0x60 + 2], render(home_direction, &telemetry).as_bytes());
    }

    #[test]
    fn test_misc() {
        use super::{
            flight_mode, heading, rssi, throttle_position, timer, vario_numeral, vtx_channel,
            Telemetry, Text,
        };
        use crate::telemetry::FlightMode;

        let mut telemetry = Telemetry::default();
        telemetry.rssi = 512;
        telemetry.attitude.yaw = -900;
        telemetry.mode = FlightMode::Failsafe;
        telemetry.sticks.throttle = 1500;
        telemetry.vtx_channel = Some(11);
        telemetry.vario = Some(123);
        assert_eq!(b"\x0150", render(rssi, &telemetry).as_bytes());
        assert_eq!(b"\xA9270\xA8", render(heading, &telemetry).as_bytes());
        assert_eq!(b"!FS!", render(flight_mode, &telemetry).as_bytes());
        assert_eq!(b"\x04\x0550", render(throttle_position, &telemetry).as_bytes());
        assert_eq!(b"CH:4", render(vtx_channel, &telemetry).as_bytes());
        assert_eq!(b" 1.2\x9F", render(vario_numeral, &telemetry).as_bytes());

        telemetry.vario = Some(-57);
        assert_eq!(b"-0.5\x9F", render(vario_numeral, &telemetry).as_bytes());

        let mut out = Text::default();
        timer(0x9B, 125, &mut out);
        assert_eq!(b"\x9B02:05", out.as_bytes());
    }

    #[test]
    fn test_craft_name() {
        use super::{craft_name, Config, Telemetry, Text};

        let telemetry = Telemetry::default();
        let mut config = Config::default();
        let mut out = Text::default();
        craft_name(&telemetry, &config, &mut out);
        assert_eq!(b"CRAFT_NAME", out.as_bytes());

        config.craft_name.push_str("miniquad").unwrap();
        out.clear();
        craft_name(&telemetry, &config, &mut out);
        assert_eq!(b"MINIQUAD", out.as_bytes());
    }

    #[test]
    fn test_pids() {
        use super::{roll_pids, Telemetry};
        use crate::telemetry::Pid;

        let mut telemetry = Telemetry::default();
        telemetry.pids.roll = Pid { p: 40, i: 30, d: 23 };
        assert_eq!(b"ROL  40  30  23", render(roll_pids, &telemetry).as_bytes());
    }

    #[test]
    fn test_truncation() {
        use core::fmt::Write;

        use super::Text;

        let mut out = Text::default();
        write!(out, "{:080}", 0).ok();
        assert_eq!(32, out.as_bytes().len());
    }
}
