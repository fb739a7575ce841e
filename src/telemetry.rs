#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Attitude {
    pub roll: i16,  // tenth of degree
    pub pitch: i16, // tenth of degree
    pub yaw: i16,   // tenth of degree
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Battery {
    pub voltage: u16,  // deci-volt
    pub current: i16,  // centi-ampere
    pub consumed: u16, // mAh
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Gnss {
    pub fixed: bool,
    pub satellites: u8,
    pub latitude: i32,       // degree * 10^7
    pub longitude: i32,      // degree * 10^7
    pub ground_speed: u16,   // cm/s
    pub home_direction: i16, // degree
    pub home_distance: u16,  // meter
    pub traveled: u32,       // centi-meter
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sticks {
    pub throttle: u16, // µs
    pub pitch: u16,    // µs
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pid {
    pub p: u8,
    pub i: u8,
    pub d: u8,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PidBank {
    pub roll: Pid,
    pub pitch: Pid,
    pub yaw: Pid,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlightMode {
    Acro,
    Stabilized,
    Horizon,
    Headfree,
    Passthrough,
    Failsafe,
    ReturnToHome,
    PositionHold,
    AltitudeHold,
    Waypoint,
}

impl Default for FlightMode {
    fn default() -> Self {
        Self::Acro
    }
}

impl FlightMode {
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Acro => "ACRO",
            Self::Stabilized => "STAB",
            Self::Horizon => "HOR",
            Self::Headfree => "!HF!",
            Self::Passthrough => "PASS",
            Self::Failsafe => "!FS!",
            Self::ReturnToHome => "RTL ",
            Self::PositionHold => " PH ",
            Self::AltitudeHold => " AH ",
            Self::Waypoint => " WP ",
        }
    }
}

#[derive(Copy, Clone, PartialEq)]
pub enum Capability {
    Always,
    Accelerometer,
    CurrentMeter,
    Gnss,
    Variometer,
    VideoTransmitter,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Telemetry {
    pub armed: bool,
    pub accelerometer: bool,
    pub current_meter: bool,
    pub mode: FlightMode,
    pub attitude: Attitude,
    pub altitude: i32, // centi-meter
    pub vario: Option<i16>, // cm/s, upward positive
    pub rssi: u16,     // raw, 0..1023
    pub battery: Battery,
    pub gnss: Option<Gnss>,
    pub sticks: Sticks,
    pub vtx_channel: Option<u8>,
    pub pids: PidBank,
}

impl Telemetry {
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Always => true,
            Capability::Accelerometer => self.accelerometer,
            Capability::CurrentMeter => self.current_meter,
            Capability::Gnss => self.gnss.is_some(),
            Capability::Variometer => self.vario.is_some(),
            Capability::VideoTransmitter => self.vtx_channel.is_some(),
        }
    }

    pub fn rssi_percentage(&self) -> u8 {
        core::cmp::min(self.rssi as u32 * 100 / 1024, 99) as u8
    }
}

pub trait TelemetrySource {
    fn get_telemetry(&self) -> Telemetry;
}

mod test {
    #[test]
    fn test_rssi_percentage() {
        use super::Telemetry;

        let mut telemetry = Telemetry::default();
        assert_eq!(0, telemetry.rssi_percentage());
        telemetry.rssi = 512;
        assert_eq!(50, telemetry.rssi_percentage());
        telemetry.rssi = 1023;
        assert_eq!(99, telemetry.rssi_percentage());
    }

    #[test]
    fn test_capability() {
        use super::{Capability, Gnss, Telemetry};

        let mut telemetry = Telemetry::default();
        assert!(telemetry.has(Capability::Always));
        assert!(!telemetry.has(Capability::Gnss));
        telemetry.gnss = Some(Gnss::default());
        assert!(telemetry.has(Capability::Gnss));
        telemetry.vario = Some(0);
        assert!(telemetry.has(Capability::Variometer));
    }
}
