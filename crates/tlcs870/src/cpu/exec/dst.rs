use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::decode::{DstOp, Primary, DST_OPS};
use crate::cpu::Cpu;

impl Cpu {
    /// `F0, F2..F4, F6, F7`: prefix, mode operand, operation byte, immediates.
    pub(in crate::cpu) fn exec_dst_prefix<B: Bus>(&mut self, bus: &mut B, prefix: u8, mode: AddrMode) -> u32 {
        let raw = self.fetch_mode_operand(bus, mode);
        let op = self.fetch8(bus);
        let Some(dst) = DST_OPS[op as usize] else {
            return match raw {
                Some(x) => self.illegal(bus, &[prefix, x, op]),
                None => self.illegal(bus, &[prefix, op]),
            };
        };

        let pc_base = self.prev_pc.wrapping_add(2);
        let address = self.resolve_address(mode, raw, pc_base);
        self.exec_dst_op(bus, dst, address);

        Primary::DstPrefix(mode).cycles() + dst.cycles() + mode.extra_cycles()
    }

    /// Stores to `address`. None of them touch Z or C.
    pub(in crate::cpu) fn exec_dst_op<B: Bus>(&mut self, bus: &mut B, op: DstOp, address: u16) {
        match op {
            DstOp::StoreRr(rr) => {
                let value = self.regs.reg16(rr);
                self.write16(bus, address, value);
            }
            DstOp::StoreImm => {
                let n = self.fetch8(bus);
                self.write8(bus, address, n);
            }
            DstOp::StoreR(r) => {
                let value = self.regs.reg8(r);
                self.write8(bus, address, value);
            }
            DstOp::StoreWordImm => {
                let mn = self.fetch16(bus);
                self.write16(bus, address, mn);
            }
            DstOp::Clear => self.write8(bus, address, 0),
        }
        self.set_jf();
    }
}
