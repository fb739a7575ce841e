pub mod alarm;
pub mod format;
pub mod horizon;
pub mod stats;

use core::fmt::Write;
use core::time::Duration;

use enum_map::EnumMap;

use crate::config::{Config, ElementId};
use crate::hal::DisplayPort;
use crate::symbol;
use crate::telemetry::{Capability, Telemetry, TelemetrySource};
use format::Text;
use stats::Stats;

pub const REFRESH_PER_SECOND: u16 = 12;
const STARTUP_HOLD: u16 = 4 * REFRESH_PER_SECOND;
const ARMED_HOLD: u16 = REFRESH_PER_SECOND / 2;
const STATS_HOLD: u16 = 5 * REFRESH_PER_SECOND;
const REFRESH_INTERVAL: u32 = 5; // scheduler ticks per logical refresh
const STICK_HIGH: u16 = 1750; // µs

type Formatter = fn(&Telemetry, &Config, &mut Text);

#[derive(Copy, Clone)]
enum Painter {
    Text(Formatter),
    Horizon,
    Sidebars,
    Crosshairs,
    Vario,
    OnTime,
    FlyTime,
}

#[derive(Copy, Clone)]
struct Renderer {
    capability: Capability,
    painter: Painter,
}

fn text(capability: Capability, formatter: Formatter) -> Renderer {
    Renderer { capability, painter: Painter::Text(formatter) }
}

fn special(capability: Capability, painter: Painter) -> Renderer {
    Renderer { capability, painter }
}

fn renderers() -> EnumMap<ElementId, Renderer> {
    enum_map! {
        ElementId::Rssi => text(Capability::Always, format::rssi),
        ElementId::BatteryVoltage => text(Capability::Always, format::battery_voltage),
        ElementId::Crosshairs => special(Capability::Accelerometer, Painter::Crosshairs),
        ElementId::ArtificialHorizon => special(Capability::Accelerometer, Painter::Horizon),
        ElementId::HorizonSidebars => special(Capability::Accelerometer, Painter::Sidebars),
        ElementId::OnTime => special(Capability::Always, Painter::OnTime),
        ElementId::FlyTime => special(Capability::Always, Painter::FlyTime),
        ElementId::FlightMode => text(Capability::Always, format::flight_mode),
        ElementId::CraftName => text(Capability::Always, format::craft_name),
        ElementId::ThrottlePosition => text(Capability::Always, format::throttle_position),
        ElementId::VtxChannel => text(Capability::VideoTransmitter, format::vtx_channel),
        ElementId::CurrentDraw => text(Capability::CurrentMeter, format::current_draw),
        ElementId::CapacityDrawn => text(Capability::CurrentMeter, format::capacity_drawn),
        ElementId::GpsSpeed => text(Capability::Gnss, format::gps_speed),
        ElementId::GpsSatellites => text(Capability::Gnss, format::gps_satellites),
        ElementId::Altitude => text(Capability::Always, format::altitude),
        ElementId::RollPids => text(Capability::Always, format::roll_pids),
        ElementId::PitchPids => text(Capability::Always, format::pitch_pids),
        ElementId::YawPids => text(Capability::Always, format::yaw_pids),
        ElementId::Power => text(Capability::Always, format::power),
        ElementId::GpsLongitude => text(Capability::Gnss, format::gps_longitude),
        ElementId::GpsLatitude => text(Capability::Gnss, format::gps_latitude),
        ElementId::HomeDirection => text(Capability::Gnss, format::home_direction),
        ElementId::HomeDistance => text(Capability::Gnss, format::home_distance),
        ElementId::Heading => text(Capability::Gnss, format::heading),
        ElementId::Vario => special(Capability::Variometer, Painter::Vario),
        ElementId::VarioNumeral => text(Capability::Variometer, format::vario_numeral),
    }
}

pub struct OSD<D, T> {
    display: D,
    telemetry: T,
    config: Config,
    renderers: EnumMap<ElementId, Renderer>,
    stats: Stats,
    fly_time: u32, // second
    last_second: u64,
    refresh_timeout: u16,
    armed: bool,
    blink: bool,
    counter: u32,
}

impl<D: DisplayPort, T: TelemetrySource> OSD<D, T> {
    pub fn new(display: D, telemetry: T, config: Config) -> Self {
        let mut osd = Self {
            display,
            telemetry,
            config,
            renderers: renderers(),
            stats: Stats::default(),
            fly_time: 0,
            last_second: 0,
            refresh_timeout: STARTUP_HOLD,
            armed: false,
            blink: false,
            counter: 0,
        };
        osd.display.clear();
        let mut banner = Text::default();
        write!(banner, "CHAROSD {}", env!("CARGO_PKG_VERSION")).ok();
        osd.display.write(5, 6, banner.as_bytes());
        info!("OSD initialized, video standard {}", osd.config.standard);
        osd
    }

    // Invoked from the flight scheduler. Never blocks: a busy transfer skips
    // the whole tick, a logical refresh happens on every 5th tick and the
    // remaining ticks push one bounded slice of the shadow to the device.
    pub fn update(&mut self, now: Duration) {
        if self.display.busy() {
            return;
        }
        let count = self.counter;
        self.counter = self.counter.wrapping_add(1);
        match count % REFRESH_INTERVAL {
            0 => self.refresh(now),
            _ => self.display.draw(),
        }
    }

    pub fn reset_alarms(&mut self) {
        alarm::reset(&mut self.config)
    }

    pub fn is_grabbed(&self) -> bool {
        self.display.grabbed()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn refresh(&mut self, now: Duration) {
        let telemetry = self.telemetry.get_telemetry();
        if self.armed != telemetry.armed {
            match telemetry.armed {
                true => self.enter_armed(),
                false => self.show_stats(&telemetry),
            }
            self.armed = telemetry.armed;
        }
        if telemetry.armed {
            self.stats.update(&telemetry);
            let second = now.as_secs();
            if second != self.last_second {
                self.fly_time += 1;
                self.last_second = second;
            }
        }
        if self.refresh_timeout > 0 {
            let sticks = telemetry.sticks;
            if sticks.throttle > STICK_HIGH || sticks.pitch > STICK_HIGH {
                self.refresh_timeout = 1;
            }
            self.refresh_timeout -= 1;
            if self.refresh_timeout == 0 {
                self.display.clear();
            }
            return;
        }
        self.blink = now.as_millis() / 200 % 2 == 0;
        if self.display.grabbed() {
            return;
        }
        alarm::update(&mut self.config, &telemetry, self.fly_time);
        self.draw_elements(&telemetry, now);
    }

    fn enter_armed(&mut self) {
        self.display.clear();
        self.display.write(12, 7, b"ARMED");
        self.refresh_timeout = ARMED_HOLD;
        self.stats.reset();
    }

    fn show_stats(&mut self, telemetry: &Telemetry) {
        self.display.clear();
        self.display.write(2, 2, b"  --- STATS ---");
        let mut row = 3;
        let mut value = Text::default();
        if let Some(gnss) = telemetry.gnss.filter(|gnss| gnss.fixed) {
            write!(value, "{}", self.stats.max_speed).ok();
            self.stat_row(&mut row, b"MAX SPEED        :", &value);
            value.clear();
            format::distance(self.config.units, self.stats.max_distance as i32 * 100, &mut value);
            self.stat_row(&mut row, b"MAX DISTANCE     :", &value);
            value.clear();
            format::distance(self.config.units, gnss.traveled as i32, &mut value);
            self.stat_row(&mut row, b"TRAVELED DISTANCE:", &value);
            value.clear();
        }
        let voltage = self.stats.min_voltage;
        write!(value, "{}.{}V", voltage / 10, voltage % 10).ok();
        self.stat_row(&mut row, b"MIN BATTERY      :", &value);
        value.clear();
        write!(value, "{}%", self.stats.min_rssi).ok();
        self.stat_row(&mut row, b"MIN RSSI         :", &value);
        value.clear();
        if telemetry.current_meter {
            write!(value, "{}A", self.stats.max_current).ok();
            self.stat_row(&mut row, b"MAX CURRENT      :", &value);
            value.clear();
            write!(value, "{}", telemetry.battery.consumed).ok();
            value.push(symbol::MAH);
            self.stat_row(&mut row, b"USED MAH         :", &value);
            value.clear();
        }
        format::distance(self.config.units, self.stats.max_altitude, &mut value);
        self.stat_row(&mut row, b"MAX ALTITUDE     :", &value);
        self.refresh_timeout = STATS_HOLD;
    }

    fn stat_row(&mut self, row: &mut u8, label: &[u8], value: &Text) {
        self.display.write(2, *row, label);
        self.display.write(22, *row, value.as_bytes());
        *row += 1;
    }

    fn draw_elements(&mut self, telemetry: &Telemetry, now: Duration) {
        self.display.clear();
        for (id, renderer) in self.renderers.iter() {
            if !telemetry.has(renderer.capability) {
                continue;
            }
            let position = self.config.layout.position(id);
            if !position.visible() || (position.blink() && !self.blink) {
                continue;
            }
            let mut text = Text::default();
            match renderer.painter {
                Painter::Text(formatter) => formatter(telemetry, &self.config, &mut text),
                Painter::OnTime => format::timer(symbol::ON_MINUTE, now.as_secs() as u32, &mut text),
                Painter::FlyTime => format::timer(symbol::FLY_MINUTE, self.fly_time, &mut text),
                Painter::Horizon => {
                    let standard = self.config.standard;
                    horizon::draw_ladder(&mut self.display, standard, telemetry.attitude);
                    continue;
                }
                Painter::Sidebars => {
                    horizon::draw_sidebars(&mut self.display, self.config.standard);
                    continue;
                }
                Painter::Crosshairs => {
                    horizon::draw_crosshairs(&mut self.display, self.config.standard);
                    continue;
                }
                Painter::Vario => {
                    horizon::draw_vario(&mut self.display, position, telemetry.vario.unwrap_or(0));
                    continue;
                }
            }
            self.display.write(position.x(), position.y(), text.as_bytes());
        }
    }
}

mod test {
    #[cfg(test)]
    use core::time::Duration;
    #[cfg(test)]
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
        string::String,
    };

    #[cfg(test)]
    use super::{DisplayPort, Telemetry, TelemetrySource, OSD, REFRESH_INTERVAL, STARTUP_HOLD};
    #[cfg(test)]
    use crate::config::Config;

    #[cfg(test)]
    #[derive(Default)]
    struct ScreenState {
        cells: [[u8; 30]; 16],
        clears: usize,
        draws: usize,
        busy: bool,
        grabbed: bool,
    }

    #[cfg(test)]
    impl ScreenState {
        fn text(&self, x: u8, y: u8, length: usize) -> String {
            self.cells[y as usize][x as usize..x as usize + length]
                .iter()
                .map(|&byte| byte as char)
                .collect()
        }
    }

    #[cfg(test)]
    #[derive(Clone, Default)]
    struct Screen(Rc<RefCell<ScreenState>>);

    #[cfg(test)]
    impl DisplayPort for Screen {
        fn clear(&mut self) {
            let mut state = self.0.borrow_mut();
            state.cells = [[0u8; 30]; 16];
            state.clears += 1;
        }

        fn write_char(&mut self, x: u8, y: u8, chr: u8) {
            if x < 30 && y < 16 {
                self.0.borrow_mut().cells[y as usize][x as usize] = chr;
            }
        }

        fn write(&mut self, x: u8, y: u8, bytes: &[u8]) {
            for (i, &byte) in bytes.iter().enumerate() {
                self.write_char(x + i as u8, y, byte);
            }
        }

        fn busy(&self) -> bool {
            self.0.borrow().busy
        }

        fn draw(&mut self) {
            self.0.borrow_mut().draws += 1;
        }

        fn grabbed(&self) -> bool {
            self.0.borrow().grabbed
        }
    }

    #[cfg(test)]
    #[derive(Clone, Default)]
    struct Source {
        telemetry: Rc<Cell<Telemetry>>,
        samples: Rc<Cell<usize>>,
    }

    #[cfg(test)]
    impl TelemetrySource for Source {
        fn get_telemetry(&self) -> Telemetry {
            self.samples.set(self.samples.get() + 1);
            self.telemetry.get()
        }
    }

    #[cfg(test)]
    fn fixture() -> (Screen, Source, OSD<Screen, Source>) {
        let screen = Screen::default();
        let source = Source::default();
        let mut telemetry = Telemetry::default();
        telemetry.battery.voltage = 168;
        telemetry.rssi = 1023;
        source.telemetry.set(telemetry);
        let osd = OSD::new(screen.clone(), source.clone(), Config::default());
        (screen, source, osd)
    }

    #[cfg(test)]
    fn run_startup(osd: &mut OSD<Screen, Source>) {
        for tick in 0..STARTUP_HOLD as u32 * REFRESH_INTERVAL {
            osd.update(Duration::from_millis(tick as u64 * 16));
        }
    }

    // one logical refresh plus the four draw ticks that follow it
    #[cfg(test)]
    fn refresh_once(osd: &mut OSD<Screen, Source>, now: Duration) {
        for _ in 0..REFRESH_INTERVAL {
            osd.update(now);
        }
    }

    #[test]
    fn test_startup_banner() {
        let (screen, _, _osd) = fixture();
        let state = screen.0.borrow();
        assert_eq!("CHAROSD", state.text(5, 6, 7));
        assert_eq!(1, state.clears);
    }

    #[test]
    fn test_refresh_cadence() {
        let (screen, source, mut osd) = fixture();
        for tick in 0..10u64 {
            osd.update(Duration::from_millis(tick * 16));
        }
        assert_eq!(2, source.samples.get());
        assert_eq!(8, screen.0.borrow().draws);
    }

    #[test]
    fn test_busy_skips_tick() {
        let (screen, source, mut osd) = fixture();
        screen.0.borrow_mut().busy = true;
        for _ in 0..3 {
            osd.update(Duration::ZERO);
        }
        assert_eq!(0, source.samples.get());
        assert_eq!(0, screen.0.borrow().draws);

        screen.0.borrow_mut().busy = false;
        osd.update(Duration::ZERO);
        assert_eq!(1, source.samples.get());
    }

    #[test]
    fn test_startup_hold_then_elements() {
        let (screen, _, mut osd) = fixture();
        // the banner stays during the whole hold
        refresh_once(&mut osd, Duration::ZERO);
        assert_eq!("CHAROSD", screen.0.borrow().text(5, 6, 7));

        for tick in 0..(STARTUP_HOLD - 1) as u32 * REFRESH_INTERVAL {
            osd.update(Duration::from_millis(tick as u64 * 16));
        }
        assert_eq!(0, screen.0.borrow().cells[6][5]); // cleared on expiry

        refresh_once(&mut osd, Duration::ZERO);
        let state = screen.0.borrow();
        assert_eq!(0x91, state.cells[0][12]);
        assert_eq!("16.8V", state.text(13, 0, 5));
        assert_eq!(0x01, state.cells[0][23]);
        assert_eq!("99", state.text(24, 0, 2));
    }

    #[test]
    fn test_alarm_blink_phase() {
        let (screen, source, mut osd) = fixture();
        run_startup(&mut osd);
        let mut telemetry = source.telemetry.get();
        telemetry.rssi = 100; // 9%, below the 20% alarm
        source.telemetry.set(telemetry);

        refresh_once(&mut osd, Duration::from_millis(0)); // blink phase on
        assert_eq!(0x01, screen.0.borrow().cells[0][23]);
        assert!(osd.config().layout.position(crate::config::ElementId::Rssi).blink());

        refresh_once(&mut osd, Duration::from_millis(200)); // blink phase off
        assert_eq!(0, screen.0.borrow().cells[0][23]);

        refresh_once(&mut osd, Duration::from_millis(400)); // on again
        assert_eq!(0x01, screen.0.borrow().cells[0][23]);
    }

    #[test]
    fn test_reset_alarms() {
        use crate::config::ElementId;

        let (_, source, mut osd) = fixture();
        run_startup(&mut osd);
        let mut telemetry = source.telemetry.get();
        telemetry.rssi = 100;
        source.telemetry.set(telemetry);
        refresh_once(&mut osd, Duration::ZERO);
        assert!(osd.config().layout.position(ElementId::Rssi).blink());

        osd.reset_alarms();
        assert!(!osd.config().layout.position(ElementId::Rssi).blink());
    }

    #[test]
    fn test_arm_banner_and_stats_screen() {
        use crate::telemetry::Gnss;

        let (screen, source, mut osd) = fixture();
        run_startup(&mut osd);

        let mut telemetry = source.telemetry.get();
        telemetry.armed = true;
        telemetry.current_meter = true;
        telemetry.rssi = 512; // 50%
        telemetry.battery.current = 2512;
        telemetry.battery.consumed = 1500;
        telemetry.altitude = 12345;
        telemetry.gnss = Some(Gnss {
            fixed: true,
            ground_speed: 1000,
            home_distance: 102,
            traveled: 123456,
            ..Gnss::default()
        });
        source.telemetry.set(telemetry);

        refresh_once(&mut osd, Duration::ZERO);
        assert_eq!("ARMED", screen.0.borrow().text(12, 7, 5));

        for _ in 0..super::ARMED_HOLD {
            refresh_once(&mut osd, Duration::ZERO);
        }
        telemetry.armed = false;
        source.telemetry.set(telemetry);
        refresh_once(&mut osd, Duration::ZERO);

        let state = screen.0.borrow();
        assert_eq!("--- STATS ---", state.text(4, 2, 13));
        assert_eq!("36", state.text(22, 3, 2)); // max speed km/h
        assert_eq!("102.0", state.text(22, 4, 5)); // max home distance
        assert_eq!("1234.5", state.text(22, 5, 6)); // traveled
        assert_eq!("16.8V", state.text(22, 6, 5));
        assert_eq!("50%", state.text(22, 7, 3));
        assert_eq!("25A", state.text(22, 8, 3));
        assert_eq!("1500", state.text(22, 9, 4));
        assert_eq!("123.4", state.text(22, 10, 5)); // max altitude
    }

    #[test]
    fn test_stick_high_collapses_hold() {
        let (screen, source, mut osd) = fixture();
        run_startup(&mut osd);

        let mut telemetry = source.telemetry.get();
        telemetry.armed = true;
        source.telemetry.set(telemetry);
        refresh_once(&mut osd, Duration::ZERO);
        telemetry.armed = false;
        source.telemetry.set(telemetry);
        refresh_once(&mut osd, Duration::ZERO);
        assert_eq!("--- STATS ---", screen.0.borrow().text(4, 2, 13));

        telemetry.sticks.throttle = 1800;
        source.telemetry.set(telemetry);
        refresh_once(&mut osd, Duration::ZERO);
        assert_eq!(0, screen.0.borrow().cells[2][8]); // stats screen gone

        telemetry.sticks.throttle = 1000;
        source.telemetry.set(telemetry);
        refresh_once(&mut osd, Duration::ZERO);
        assert_eq!(0x91, screen.0.borrow().cells[0][12]); // back to elements
    }

    #[test]
    fn test_grab_suppresses_rendering() {
        let (screen, _, mut osd) = fixture();
        run_startup(&mut osd);
        refresh_once(&mut osd, Duration::ZERO);

        screen.0.borrow_mut().grabbed = true;
        screen.0.borrow_mut().cells[5][5] = b'M'; // menu output
        let draws = screen.0.borrow().draws;
        refresh_once(&mut osd, Duration::ZERO);
        assert_eq!(b'M', screen.0.borrow().cells[5][5]);
        assert_eq!(draws + 4, screen.0.borrow().draws);
        assert!(osd.is_grabbed());

        screen.0.borrow_mut().grabbed = false;
        refresh_once(&mut osd, Duration::ZERO);
        assert_eq!(0, screen.0.borrow().cells[5][5]); // engine took over again
    }

    #[test]
    fn test_fly_time() {
        let (screen, source, mut osd) = fixture();
        run_startup(&mut osd);

        let mut telemetry = source.telemetry.get();
        telemetry.armed = true;
        source.telemetry.set(telemetry);
        refresh_once(&mut osd, Duration::from_secs(1));
        refresh_once(&mut osd, Duration::from_secs(2));
        for _ in 0..super::ARMED_HOLD {
            refresh_once(&mut osd, Duration::from_secs(2));
        }
        refresh_once(&mut osd, Duration::from_secs(2));
        let state = screen.0.borrow();
        assert_eq!("00:02", state.text(24, 11, 5));
    }
}
