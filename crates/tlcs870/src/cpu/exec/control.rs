use crate::bus::Bus;
use crate::cond::Condition;
use crate::regs::Psw;

use crate::cpu::Cpu;

/// Extra cycles for a taken relative jump.
const TAKEN_CYCLES: u32 = 2;

impl Cpu {
    /// `JRS T,a` / `JRS F,a`: taken when J equals `when`. Relative to the
    /// opcode address + 2.
    pub(super) fn exec_jrs(&mut self, d: i8, when: bool) -> u32 {
        if self.regs.flag(Psw::J) != when {
            return 0;
        }
        self.regs.pc = self.prev_pc.wrapping_add(2).wrapping_add(d as u16);
        TAKEN_CYCLES
    }

    /// `JR cc,a`
    pub(super) fn exec_jr_cc<B: Bus>(&mut self, bus: &mut B, cc: Condition) -> u32 {
        let d = self.fetch8(bus) as i8;
        if !cc.eval(self.flags()) {
            return 0;
        }
        self.regs.pc = self.regs.pc.wrapping_add(d as u16);
        TAKEN_CYCLES
    }

    /// `JR a`
    pub(super) fn exec_jr<B: Bus>(&mut self, bus: &mut B) {
        let d = self.fetch8(bus) as i8;
        self.regs.pc = self.regs.pc.wrapping_add(d as u16);
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop16(bus);
    }

    /// `RETI`: restore PSW and PC, re-enable maskable interrupts.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.exec_retn(bus);
        self.imf = true;
    }

    /// `RETN`: restore PSW and PC, leaving IMF alone.
    pub(super) fn exec_retn<B: Bus>(&mut self, bus: &mut B) {
        let psw = self.pop8(bus);
        self.regs.set_psw(psw);
        self.regs.pc = self.pop16(bus);
    }
}
