pub mod max7456;
