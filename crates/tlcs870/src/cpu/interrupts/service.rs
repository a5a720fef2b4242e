use crate::bus::Bus;
use crate::regs::Psw;

use super::super::Cpu;
use super::{Interrupt, ACCEPT_CYCLES};

impl Cpu {
    /// Accept the highest-priority pending request, if any.
    ///
    /// Returns `Some(cycles)` if an interrupt was taken.
    pub(in crate::cpu) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        let irq = self.pending_interrupt()?;
        self.interrupt_latch &= !(1 << irq.index());

        log::debug!(
            "TLCS-870 interrupt {:?} accepted at PC=0x{:04X}, vector=0x{:04X}",
            irq,
            self.regs.pc,
            irq.vector()
        );
        self.enter_vector(bus, irq);
        Some(ACCEPT_CYCLES)
    }

    /// Vectored entry shared by accepted requests, SWI and the illegal trap.
    ///
    /// Pushes PC (low byte at the lower address) then PSW, so PSW ends up at
    /// the new SP. J and IMF are cleared before loading PC from the vector.
    pub(in crate::cpu) fn enter_vector<B: Bus>(&mut self, bus: &mut B, irq: Interrupt) {
        let pc = self.regs.pc;
        self.push16(bus, pc);
        let psw = self.regs.psw();
        self.push8(bus, psw);

        self.regs.set_flag(Psw::J, false);
        self.imf = false;
        self.regs.pc = self.read16(bus, irq.vector());
    }
}
