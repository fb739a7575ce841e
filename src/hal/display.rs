// Seam between the rendering engine and the overlay chip driver.
// Writes land in the implementor's shadow buffer; `draw` forwards a bounded
// amount of it to the device per call and must never block.

pub trait DisplayPort {
    fn clear(&mut self);
    fn write_char(&mut self, x: u8, y: u8, chr: u8);
    fn write(&mut self, x: u8, y: u8, bytes: &[u8]);
    fn busy(&self) -> bool;
    fn draw(&mut self);

    // whether a higher priority consumer owns the surface
    fn grabbed(&self) -> bool {
        false
    }
}
