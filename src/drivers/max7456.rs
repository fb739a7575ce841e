use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi::{Transfer, Write};
use max7456::character_memory::{CharData, CHAR_DATA_SIZE};
use max7456::font::{char_block_to_byte, validate_header, ByteBlock, HeaderBlock};
use max7456::not_null_writer::NotNullWriter;
use max7456::registers::Standard;
use max7456::MAX7456;

use crate::config;
use crate::hal::DisplayPort;

pub const COLUMNS: usize = config::COLUMNS as usize;
pub const ROWS: usize = 16;

const ROWS_PER_DRAW: usize = 3;

impl From<config::Standard> for Standard {
    fn from(standard: config::Standard) -> Standard {
        match standard {
            config::Standard::PAL => Standard::PAL,
            config::Standard::NTSC => Standard::NTSC,
        }
    }
}

pub fn init<BUS, E>(
    bus: BUS,
    delay: &mut dyn DelayMs<u8>,
    config: &config::Config,
) -> Result<MAX7456<BUS>, E>
where
    BUS: Write<u8, Error = E> + Transfer<u8, Error = E>,
{
    let mut max7456 = MAX7456::new(bus);
    max7456.reset(delay)?;
    max7456.set_standard(config.standard.into())?;
    if config.offset.horizontal != 0 {
        max7456.set_horizental_offset(config.offset.horizontal)?;
    }
    if config.offset.vertical != 0 {
        max7456.set_vertical_offset(config.offset.vertical)?;
    }
    max7456.enable_display(true)?;
    Ok(max7456)
}

fn read_char(data: &[u8], offset: &mut usize) -> Option<CharData> {
    let mut char_data: CharData = [0u8; CHAR_DATA_SIZE];
    for byte in char_data.iter_mut() {
        let mut byte_block: ByteBlock = Default::default();
        let end = *offset + byte_block.len();
        if data.len() < end {
            return None;
        }
        byte_block.copy_from_slice(&data[*offset..end]);
        *offset = end;
        *byte = char_block_to_byte(&byte_block)?;
    }
    Some(char_data)
}

pub fn upload_font<BUS, E>(
    max7456: &mut MAX7456<BUS>,
    delay: &mut dyn DelayMs<u8>,
    data: &[u8],
) -> Result<bool, E>
where
    BUS: Write<u8, Error = E> + Transfer<u8, Error = E>,
{
    let mut header_block: HeaderBlock = Default::default();
    if data.len() < header_block.len() {
        warn!("Font data too short");
        return Ok(false);
    }
    let header_len = header_block.len();
    header_block.copy_from_slice(&data[..header_len]);
    if !validate_header(&header_block) {
        warn!("Wrong font heading");
        return Ok(false);
    }
    max7456.enable_display(false)?;
    let mut offset = header_block.len();
    for i in 0..256 {
        if let Some(char_data) = read_char(data, &mut offset) {
            max7456.store_char(i as u8, &char_data, &mut *delay)?;
        }
    }
    info!("Font upload complete");
    max7456.enable_display(true)?;
    Ok(true)
}

pub type DmaConsumer = fn(&[u8]);

// Shadow screen in front of the chip's display memory. Element writes land
// here and `draw` hands the encoded difference to a DMA consumer, at most
// a few rows per call so a single tick never pays for the whole frame.
pub struct Max7456Display {
    screen: [[u8; COLUMNS]; ROWS],
    dirty: [bool; ROWS],
    cursor: usize,
    dma_consumer: DmaConsumer,
    dma_busy: fn() -> bool,
}

impl Max7456Display {
    pub fn new(dma_consumer: DmaConsumer, dma_busy: fn() -> bool) -> Self {
        Self {
            screen: [[0u8; COLUMNS]; ROWS],
            dirty: [false; ROWS],
            cursor: 0,
            dma_consumer,
            dma_busy,
        }
    }
}

impl DisplayPort for Max7456Display {
    fn clear(&mut self) {
        // cells that were never drawn stay null and are never transmitted,
        // stale cells become spaces overwriting their glyph on the chip
        for (row, line) in self.screen.iter_mut().enumerate() {
            for cell in line.iter_mut() {
                if *cell != 0 && *cell != b' ' {
                    *cell = b' ';
                    self.dirty[row] = true;
                }
            }
        }
    }

    fn write_char(&mut self, x: u8, y: u8, chr: u8) {
        let (x, y) = (x as usize, y as usize);
        if x >= COLUMNS || y >= ROWS {
            return;
        }
        if self.screen[y][x] != chr {
            self.screen[y][x] = chr;
            self.dirty[y] = true;
        }
    }

    fn write(&mut self, x: u8, y: u8, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.write_char(x + i as u8, y, byte);
        }
    }

    fn busy(&self) -> bool {
        (self.dma_busy)()
    }

    fn draw(&mut self) {
        let mut patch = [[0u8; COLUMNS]; ROWS];
        let mut taken = 0;
        for _ in 0..ROWS {
            let row = self.cursor;
            self.cursor = (self.cursor + 1) % ROWS;
            if !self.dirty[row] {
                continue;
            }
            patch[row] = self.screen[row];
            self.dirty[row] = false;
            taken += 1;
            if taken == ROWS_PER_DRAW {
                break;
            }
        }
        if taken == 0 {
            return;
        }
        // each char encodes to 4 register writes, 3 rows fit comfortably
        let mut dma_buffer = [0u8; 1000];
        let mut writer = NotNullWriter::new(&patch, Default::default());
        let display = writer.write(&mut dma_buffer);
        (self.dma_consumer)(&display.0);
    }
}

mod test {
    #[cfg(test)]
    use super::{DisplayPort, Max7456Display};

    #[cfg(test)]
    fn sink(_: &[u8]) {}

    #[cfg(test)]
    fn idle() -> bool {
        false
    }

    #[test]
    fn test_erase_idiom() {
        let mut display = Max7456Display::new(sink, idle);
        display.write(1, 1, b"AB");
        assert_eq!(b"AB", &display.screen[1][1..3]);

        display.clear();
        assert_eq!(b"  ", &display.screen[1][1..3]);
        assert_eq!(0, display.screen[0][0]); // untouched cells stay null
        assert!(display.dirty[1]);
    }

    #[test]
    fn test_write_clips_at_grid() {
        let mut display = Max7456Display::new(sink, idle);
        display.write(29, 0, b"XY");
        assert_eq!(b'X', display.screen[0][29]);
        assert!(display.screen.iter().flatten().all(|&cell| cell != b'Y'));
        display.write_char(0, 16, b'Z');
        assert!(display.screen.iter().flatten().all(|&cell| cell != b'Z'));
    }

    #[test]
    fn test_draw_bounded() {
        let mut display = Max7456Display::new(sink, idle);
        for row in 0..16 {
            display.write_char(0, row, b'A');
        }
        assert_eq!(16, display.dirty.iter().filter(|&&dirty| dirty).count());

        display.draw();
        assert_eq!(13, display.dirty.iter().filter(|&&dirty| dirty).count());
        for _ in 0..5 {
            display.draw();
        }
        assert_eq!(0, display.dirty.iter().filter(|&&dirty| dirty).count());
        display.draw(); // nothing left, a no-op
    }
}
