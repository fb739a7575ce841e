#![no_std]

extern crate embedded_hal;
#[macro_use]
extern crate enum_map;
extern crate heapless;
#[macro_use]
extern crate log;
extern crate max7456;

pub mod config;
pub mod drivers;
pub mod hal;
pub mod osd;
pub mod symbol;
pub mod telemetry;

#[cfg(test)]
extern crate std;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;
