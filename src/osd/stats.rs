use crate::telemetry::Telemetry;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stats {
    pub max_speed: u16,    // km/h
    pub min_voltage: u16,  // deci-volt
    pub max_current: i16,  // ampere
    pub min_rssi: u8,      // percent
    pub max_altitude: i32, // centi-meter
    pub max_distance: u16, // meter
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            max_speed: 0,
            min_voltage: 500,
            max_current: 0,
            min_rssi: 99,
            max_altitude: 0,
            max_distance: 0,
        }
    }
}

impl Stats {
    pub fn reset(&mut self) {
        *self = Self::default()
    }

    pub fn update(&mut self, telemetry: &Telemetry) {
        if let Some(gnss) = telemetry.gnss {
            let speed = (gnss.ground_speed as u32 * 36 / 1000) as u16;
            if self.max_speed < speed {
                self.max_speed = speed;
            }
            if self.max_distance < gnss.home_distance {
                self.max_distance = gnss.home_distance;
            }
        }
        if self.min_voltage > telemetry.battery.voltage {
            self.min_voltage = telemetry.battery.voltage;
        }
        let current = (telemetry.battery.current / 100).abs();
        if self.max_current < current {
            self.max_current = current;
        }
        let rssi = telemetry.rssi_percentage();
        if self.min_rssi > rssi {
            self.min_rssi = rssi;
        }
        if self.max_altitude < telemetry.altitude {
            self.max_altitude = telemetry.altitude;
        }
    }
}

mod test {
    #[test]
    fn test_reset_idempotent() {
        use super::{Stats, Telemetry};

        let mut stats = Stats::default();
        let mut telemetry = Telemetry::default();
        telemetry.battery.voltage = 168;
        stats.update(&telemetry);
        stats.reset();
        let once = stats;
        stats.reset();
        assert_eq!(once, stats);
        assert_eq!(Stats::default(), stats);
    }

    #[test]
    fn test_single_sample_extrema() {
        use super::{Stats, Telemetry};
        use crate::telemetry::Gnss;

        let mut stats = Stats::default();
        let mut telemetry = Telemetry::default();
        telemetry.battery.voltage = 168;
        telemetry.battery.current = 2512; // 25.12A
        telemetry.rssi = 512; // 50%
        telemetry.altitude = 1234;
        let gnss = Gnss { ground_speed: 1000, home_distance: 102, ..Gnss::default() };
        telemetry.gnss = Some(gnss);
        stats.update(&telemetry);
        assert_eq!(36, stats.max_speed);
        assert_eq!(168, stats.min_voltage);
        assert_eq!(25, stats.max_current);
        assert_eq!(50, stats.min_rssi);
        assert_eq!(1234, stats.max_altitude);
        assert_eq!(102, stats.max_distance);

        // the same sample again changes nothing
        let snapshot = stats;
        stats.update(&telemetry);
        assert_eq!(snapshot, stats);
    }

    #[test]
    fn test_gnss_gated() {
        use super::{Stats, Telemetry};

        let mut stats = Stats::default();
        let mut telemetry = Telemetry::default();
        telemetry.battery.voltage = 168;
        stats.update(&telemetry);
        assert_eq!(0, stats.max_speed);
        assert_eq!(0, stats.max_distance);
    }
}
