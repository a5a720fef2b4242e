use super::super::Cpu;
use super::{Interrupt, FIRST_MASKABLE, LAST_MASKABLE};

/// Bits of the request latch that IMF and the enable mask gate.
const MASKABLE_BITS: u16 = ((1u32 << (LAST_MASKABLE + 1)) - (1u32 << FIRST_MASKABLE)) as u16;

impl Cpu {
    /// The request that would be accepted before the next instruction, if any.
    ///
    /// NMI is accepted regardless of IMF. Maskable requests need IMF and
    /// their enable bit. Lower indices win.
    pub fn pending_interrupt(&self) -> Option<Interrupt> {
        let nmi = 1u16 << Interrupt::NonMaskable.index();
        if self.interrupt_latch & nmi != 0 {
            return Some(Interrupt::NonMaskable);
        }
        if !self.imf {
            return None;
        }

        let pending = self.interrupt_latch & self.interrupt_enable & MASKABLE_BITS;
        if pending == 0 {
            return None;
        }
        Some(Interrupt::Maskable(pending.trailing_zeros() as u8))
    }
}
