/// Abstraction over the TLCS-870 program address space.
///
/// The CPU only ever sees byte reads and writes; everything behind them
/// (internal RAM, ROM, SFR decoding, peripherals) belongs to the host.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian word read. The second access wraps from 0xFFFF to 0x0000.
    #[inline]
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian word write, low byte first.
    #[inline]
    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }

    /// Advance bus-side peripherals by a given number of CPU cycles.
    ///
    /// Default implementation does nothing; system buses can override this
    /// to drive timers, serial ports and the like.
    fn tick(&mut self, _cycles: u32) {}

    /// Hook that marks the beginning of a single CPU instruction (or
    /// interrupt acceptance) from the bus's point of view.
    fn begin_instruction(&mut self) {}

    /// Hook that finalises a single CPU instruction (or interrupt
    /// acceptance). `cycles` is the machine-cycle cost the CPU charged.
    /// The default implementation forwards to `tick(cycles)`.
    fn end_instruction(&mut self, cycles: u32) {
        self.tick(cycles);
    }
}

/// Flat 64K RAM with no decoding at all.
///
/// Good enough for running bare instruction streams and for tests; real
/// machines plug their own `Bus` in instead.
#[derive(Clone)]
pub struct FlatMemory {
    bytes: Box<[u8; 0x10000]>,
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self {
            bytes: Box::new([0; 0x10000]),
        }
    }
}

impl FlatMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `data` into memory starting at `addr`, wrapping past 0xFFFF.
    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let mut at = addr;
        for &byte in data {
            self.bytes[at as usize] = byte;
            at = at.wrapping_add(1);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Bus for FlatMemory {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_access_is_little_endian_and_wraps() {
        let mut mem = FlatMemory::new();
        mem.write16(0xFFFF, 0xBEEF);
        assert_eq!(mem.read8(0xFFFF), 0xEF);
        assert_eq!(mem.read8(0x0000), 0xBE);
        assert_eq!(mem.read16(0xFFFF), 0xBEEF);
    }

    #[test]
    fn load_wraps_at_top_of_memory() {
        let mut mem = FlatMemory::new();
        mem.load(0xFFFE, &[1, 2, 3]);
        assert_eq!(mem.as_slice()[0xFFFE], 1);
        assert_eq!(mem.as_slice()[0xFFFF], 2);
        assert_eq!(mem.as_slice()[0x0000], 3);
    }
}
