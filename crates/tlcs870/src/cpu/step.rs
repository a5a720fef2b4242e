use crate::bus::Bus;
use crate::regs::Reg16;

use super::Cpu;

impl Cpu {
    /// Execute a single instruction, or accept one pending interrupt, and
    /// return the number of machine cycles taken.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        bus.begin_instruction();

        let cycles = match self.handle_interrupts(bus) {
            Some(cycles) => cycles,
            None => {
                self.prev_pc = self.regs.pc;
                let opcode = self.fetch8(bus);
                if self.config.trace {
                    log::trace!(
                        "PC={:04X} OP={:02X} SP={:04X} WA={:04X} BC={:04X} DE={:04X} HL={:04X} PSW={:02X} RBS={}",
                        self.prev_pc,
                        opcode,
                        self.regs.sp,
                        self.regs.reg16(Reg16::WA),
                        self.regs.reg16(Reg16::BC),
                        self.regs.reg16(Reg16::DE),
                        self.regs.reg16(Reg16::HL),
                        self.regs.psw(),
                        self.regs.bank(),
                    );
                }
                self.exec_opcode(bus, opcode)
            }
        };

        self.total_cycles += cycles as u64;
        bus.end_instruction(cycles);
        cycles
    }

    /// Step until at least `budget` machine cycles have elapsed. The last
    /// instruction may overshoot; the cycles actually consumed are returned.
    pub fn run<B: Bus>(&mut self, bus: &mut B, budget: u64) -> u64 {
        let mut elapsed = 0u64;
        while elapsed < budget {
            elapsed += self.step(bus) as u64;
        }
        elapsed
    }
}
