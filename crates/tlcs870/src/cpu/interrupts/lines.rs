use super::super::Cpu;
use super::{Interrupt, FIRST_MASKABLE, LAST_MASKABLE};

impl Cpu {
    /// Drive the NMI input. A request is latched on the rising edge only.
    pub fn set_nmi_line(&mut self, asserted: bool) {
        if asserted && !self.nmi_line {
            self.interrupt_latch |= 1 << Interrupt::NonMaskable.index();
        }
        self.nmi_line = asserted;
    }

    /// Drive a maskable request line. The latch follows the level until the
    /// request is accepted.
    pub fn set_irq_line(&mut self, index: u8, asserted: bool) {
        if !(FIRST_MASKABLE..=LAST_MASKABLE).contains(&index) {
            log::warn!("TLCS-870 ignoring request on non-maskable slot {index}");
            return;
        }
        if asserted {
            self.interrupt_latch |= 1 << index;
        } else {
            self.interrupt_latch &= !(1 << index);
        }
    }

    /// Latched requests, bit `n` for vector index `n`.
    pub fn pending_requests(&self) -> u16 {
        self.interrupt_latch
    }
}
