use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Enum, Serialize, Deserialize)]
pub enum ElementId {
    Rssi,
    BatteryVoltage,
    Crosshairs,
    ArtificialHorizon,
    HorizonSidebars,
    OnTime,
    FlyTime,
    FlightMode,
    CraftName,
    ThrottlePosition,
    VtxChannel,
    CurrentDraw,
    CapacityDrawn,
    GpsSpeed,
    GpsSatellites,
    Altitude,
    RollPids,
    PitchPids,
    YawPids,
    Power,
    GpsLongitude,
    GpsLatitude,
    HomeDirection,
    HomeDistance,
    Heading,
    Vario,
    VarioNumeral,
}

const COORDINATE_BITS: u16 = 5;
const COORDINATE_MASK: u16 = (1 << COORDINATE_BITS) - 1;
const VISIBLE_FLAG: u16 = 1 << 10;
const BLINK_FLAG: u16 = 1 << 11;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPosition(u16);

impl ItemPosition {
    pub const fn new(x: u8, y: u8) -> Self {
        Self((x as u16 & COORDINATE_MASK) | (y as u16 & COORDINATE_MASK) << COORDINATE_BITS)
    }

    pub const fn visible_at(x: u8, y: u8) -> Self {
        Self(Self::new(x, y).0 | VISIBLE_FLAG)
    }

    pub fn x(self) -> u8 {
        (self.0 & COORDINATE_MASK) as u8
    }

    pub fn y(self) -> u8 {
        (self.0 >> COORDINATE_BITS & COORDINATE_MASK) as u8
    }

    pub fn visible(self) -> bool {
        self.0 & VISIBLE_FLAG > 0
    }

    pub fn blink(self) -> bool {
        self.0 & BLINK_FLAG > 0
    }

    pub fn set_visible(&mut self, visible: bool) {
        match visible {
            true => self.0 |= VISIBLE_FLAG,
            false => self.0 &= !VISIBLE_FLAG,
        }
    }

    pub fn set_blink(&mut self, blink: bool) {
        match blink {
            true => self.0 |= BLINK_FLAG,
            false => self.0 &= !BLINK_FLAG,
        }
    }
}

// packed coordinates must cover the whole 32x32 logical grid
const _: () = assert!(ItemPosition::new(31, 31).0 == 0x03FF);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout(EnumMap<ElementId, ItemPosition>);

impl Layout {
    pub fn position(&self, id: ElementId) -> ItemPosition {
        self.0[id]
    }

    pub fn position_mut(&mut self, id: ElementId) -> &mut ItemPosition {
        &mut self.0[id]
    }

    pub fn set_blink(&mut self, id: ElementId, blink: bool) {
        self.0[id].set_blink(blink)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self(enum_map! {
            ElementId::Altitude => ItemPosition::visible_at(1, 0),
            ElementId::BatteryVoltage => ItemPosition::visible_at(12, 0),
            ElementId::Rssi => ItemPosition::visible_at(23, 0),
            ElementId::HomeDistance => ItemPosition::new(1, 1),
            ElementId::Heading => ItemPosition::new(12, 1),
            ElementId::Power => ItemPosition::new(15, 1),
            ElementId::GpsSpeed => ItemPosition::new(23, 1),
            ElementId::ThrottlePosition => ItemPosition::visible_at(1, 2),
            ElementId::CraftName => ItemPosition::new(20, 2),
            ElementId::CurrentDraw => ItemPosition::visible_at(1, 3),
            ElementId::CapacityDrawn => ItemPosition::visible_at(1, 4),
            ElementId::Vario => ItemPosition::new(22, 5),
            ElementId::Crosshairs => ItemPosition::new(0, 0),
            ElementId::ArtificialHorizon => ItemPosition::visible_at(8, 6),
            ElementId::HorizonSidebars => ItemPosition::visible_at(8, 6),
            ElementId::VtxChannel => ItemPosition::new(8, 6),
            ElementId::VarioNumeral => ItemPosition::new(23, 7),
            ElementId::RollPids => ItemPosition::new(2, 10),
            ElementId::OnTime => ItemPosition::visible_at(23, 10),
            ElementId::HomeDirection => ItemPosition::new(14, 11),
            ElementId::PitchPids => ItemPosition::new(2, 11),
            ElementId::FlyTime => ItemPosition::visible_at(23, 11),
            ElementId::GpsSatellites => ItemPosition::visible_at(0, 11),
            ElementId::GpsLatitude => ItemPosition::new(0, 12),
            ElementId::FlightMode => ItemPosition::visible_at(12, 12),
            ElementId::GpsLongitude => ItemPosition::new(18, 12),
            ElementId::YawPids => ItemPosition::new(2, 12),
        })
    }
}

mod test {
    #[test]
    fn test_item_position() {
        use super::ItemPosition;

        let mut position = ItemPosition::new(23, 11);
        assert_eq!((23, 11), (position.x(), position.y()));
        assert_eq!((false, false), (position.visible(), position.blink()));
        position.set_visible(true);
        position.set_blink(true);
        assert_eq!((23, 11), (position.x(), position.y()));
        assert_eq!((true, true), (position.visible(), position.blink()));
        position.set_blink(false);
        assert!(position.visible());
        assert!(!position.blink());
    }

    #[test]
    fn test_default_layout() {
        use super::{ElementId, Layout};

        let layout = Layout::default();
        let altitude = layout.position(ElementId::Altitude);
        assert_eq!((1, 0, true), (altitude.x(), altitude.y(), altitude.visible()));
        let latitude = layout.position(ElementId::GpsLatitude);
        assert_eq!((0, 12, false), (latitude.x(), latitude.y(), latitude.visible()));
        let sidebars = layout.position(ElementId::HorizonSidebars);
        assert!(sidebars.visible());
    }
}
