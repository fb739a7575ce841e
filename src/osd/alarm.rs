use crate::config::{Config, ElementId};
use crate::osd::format::convert_distance;
use crate::telemetry::Telemetry;

pub const ALARM_ELEMENTS: [ElementId; 6] = [
    ElementId::Rssi,
    ElementId::BatteryVoltage,
    ElementId::GpsSatellites,
    ElementId::FlyTime,
    ElementId::CapacityDrawn,
    ElementId::Altitude,
];

// Evaluated once per logical refresh, before any element text is drawn.
// A breached threshold sets the element's blink bit, a cleared one resets it.
pub fn update(config: &mut Config, telemetry: &Telemetry, fly_time: u32) {
    let alarms = config.alarms;
    let altitude = convert_distance(config.units, telemetry.altitude) / 100;
    let fixed = matches!(telemetry.gnss, Some(gnss) if gnss.fixed);
    let layout = &mut config.layout;
    layout.set_blink(ElementId::Rssi, telemetry.rssi_percentage() < alarms.rssi);
    layout.set_blink(
        ElementId::BatteryVoltage,
        telemetry.battery.voltage <= alarms.voltage.saturating_sub(1),
    );
    layout.set_blink(ElementId::GpsSatellites, !fixed);
    layout.set_blink(
        ElementId::FlyTime,
        telemetry.armed && fly_time / 60 >= alarms.fly_minutes as u32,
    );
    layout.set_blink(ElementId::CapacityDrawn, telemetry.battery.consumed >= alarms.capacity);
    layout.set_blink(ElementId::Altitude, altitude >= alarms.altitude as i32);
}

pub fn reset(config: &mut Config) {
    for id in ALARM_ELEMENTS {
        config.layout.set_blink(id, false);
    }
}

mod test {
    #[test]
    fn test_rssi_alarm() {
        use super::{update, Config, ElementId, Telemetry};

        let mut config = Config::default();
        let mut telemetry = Telemetry::default();
        telemetry.battery.voltage = 168;
        telemetry.rssi = 1023; // 99%
        update(&mut config, &telemetry, 0);
        assert!(!config.layout.position(ElementId::Rssi).blink());

        telemetry.rssi = 100; // 9%
        update(&mut config, &telemetry, 0);
        assert!(config.layout.position(ElementId::Rssi).blink());

        telemetry.rssi = 1023;
        update(&mut config, &telemetry, 0);
        assert!(!config.layout.position(ElementId::Rssi).blink());
    }

    #[test]
    fn test_thresholds() {
        use super::{update, Config, ElementId, Telemetry};
        use crate::telemetry::Gnss;

        let mut config = Config::default();
        let mut telemetry = Telemetry::default();
        telemetry.armed = true;
        telemetry.battery.voltage = 98; // warning is 99
        telemetry.battery.consumed = 2200;
        telemetry.altitude = 100_00; // alarm is 100m
        telemetry.gnss = Some(Gnss::default()); // no fix
        update(&mut config, &telemetry, 10 * 60);
        let layout = &config.layout;
        assert!(layout.position(ElementId::BatteryVoltage).blink());
        assert!(layout.position(ElementId::GpsSatellites).blink());
        assert!(layout.position(ElementId::FlyTime).blink());
        assert!(layout.position(ElementId::CapacityDrawn).blink());
        assert!(layout.position(ElementId::Altitude).blink());

        telemetry.battery.voltage = 99;
        telemetry.battery.consumed = 2199;
        telemetry.altitude = 99_99;
        telemetry.gnss = Some(Gnss { fixed: true, ..Gnss::default() });
        update(&mut config, &telemetry, 9 * 60);
        assert!(!config.layout.position(ElementId::BatteryVoltage).blink());
        assert!(!config.layout.position(ElementId::GpsSatellites).blink());
        assert!(!config.layout.position(ElementId::FlyTime).blink());
        assert!(!config.layout.position(ElementId::CapacityDrawn).blink());
        assert!(!config.layout.position(ElementId::Altitude).blink());
    }

    #[test]
    fn test_fly_time_requires_armed() {
        use super::{update, Config, ElementId, Telemetry};

        let mut config = Config::default();
        let mut telemetry = Telemetry::default();
        telemetry.battery.voltage = 168;
        update(&mut config, &telemetry, 60 * 60);
        assert!(!config.layout.position(ElementId::FlyTime).blink());

        telemetry.armed = true;
        update(&mut config, &telemetry, 60 * 60);
        assert!(config.layout.position(ElementId::FlyTime).blink());
    }

    #[test]
    fn test_reset() {
        use super::{reset, update, Config, Telemetry, ALARM_ELEMENTS};

        let mut config = Config::default();
        let telemetry = Telemetry::default(); // everything at alarm level
        update(&mut config, &telemetry, 0);
        assert!(config.layout.position(super::ElementId::Rssi).blink());

        reset(&mut config);
        for id in ALARM_ELEMENTS {
            assert!(!config.layout.position(id).blink(), "{:?} still blinking", id);
        }
    }
}
