use crate::bus::Bus;
use crate::cpu::Cpu;

impl Cpu {
    /// PSW goes to the stack as an opaque byte, unused bits included.
    pub(super) fn exec_push_psw<B: Bus>(&mut self, bus: &mut B) {
        let psw = self.regs.psw();
        self.push8(bus, psw);
    }

    pub(super) fn exec_pop_psw<B: Bus>(&mut self, bus: &mut B) {
        let psw = self.pop8(bus);
        self.regs.set_psw(psw);
    }
}
