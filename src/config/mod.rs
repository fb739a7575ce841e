pub mod layout;

use core::fmt::{Display, Formatter};

use heapless::String;
use serde::{Deserialize, Serialize};

pub use layout::{ElementId, ItemPosition, Layout};

pub const COLUMNS: u8 = 30;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Standard {
    PAL,
    NTSC,
}

impl Default for Standard {
    fn default() -> Self {
        Self::PAL
    }
}

impl From<&str> for Standard {
    fn from(string: &str) -> Standard {
        match string {
            "NTSC" => Standard::NTSC,
            _ => Standard::PAL,
        }
    }
}

impl Display for Standard {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        let string = match self {
            Self::PAL => "PAL",
            Self::NTSC => "NTSC",
        };
        f.write_str(string)
    }
}

impl Standard {
    pub fn rows(self) -> u8 {
        match self {
            Self::PAL => 16,
            Self::NTSC => 13,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::Metric
    }
}

impl From<&str> for UnitSystem {
    fn from(string: &str) -> UnitSystem {
        match string {
            "imperial" => UnitSystem::Imperial,
            _ => UnitSystem::Metric,
        }
    }
}

impl Display for UnitSystem {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        let string = match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        };
        f.write_str(string)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub horizontal: i8,
    pub vertical: i8,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alarms {
    pub rssi: u8,      // percent
    pub voltage: u16,  // deci-volt, whole pack
    pub capacity: u16, // mAh
    pub fly_minutes: u16,
    pub altitude: u16, // meter or feet depending on unit system
}

impl Default for Alarms {
    fn default() -> Self {
        Self { rssi: 20, voltage: 99, capacity: 2200, fly_minutes: 10, altitude: 100 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub layout: Layout,
    pub alarms: Alarms,
    pub units: UnitSystem,
    pub standard: Standard,
    pub offset: Offset,
    pub craft_name: String<16>,
}

mod test {
    #[test]
    fn test_standard() {
        use super::Standard;

        assert_eq!(Standard::PAL, Standard::from("PAL"));
        assert_eq!(Standard::NTSC, Standard::from("NTSC"));
        assert_eq!(16, Standard::PAL.rows());
        assert_eq!(13, Standard::NTSC.rows());
    }

    #[test]
    fn test_default_config() {
        use super::{Config, UnitSystem};

        let config = Config::default();
        assert_eq!(UnitSystem::Metric, config.units);
        assert_eq!(20, config.alarms.rssi);
        assert_eq!("", config.craft_name.as_str());
    }
}
