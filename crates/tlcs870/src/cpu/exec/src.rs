use crate::addressing::AddrMode;
use crate::alu::{self, AluOp};
use crate::bus::Bus;
use crate::decode::{Primary, SrcOp, SRC_OPS};
use crate::regs::Psw;

use super::with_bit;
use crate::cpu::Cpu;

impl Cpu {
    /// `E0..E7`: prefix, mode operand, operation byte, trailing immediates.
    pub(in crate::cpu) fn exec_src_prefix<B: Bus>(&mut self, bus: &mut B, prefix: u8, mode: AddrMode) -> u32 {
        let raw = self.fetch_mode_operand(bus, mode);
        let op = self.fetch8(bus);
        let Some(src) = SRC_OPS[op as usize] else {
            return match raw {
                Some(x) => self.illegal(bus, &[prefix, x, op]),
                None => self.illegal(bus, &[prefix, op]),
            };
        };

        // (PC+A) is relative to the byte after the operation byte.
        let pc_base = self.prev_pc.wrapping_add(2);
        let address = self.resolve_address(mode, raw, pc_base);
        self.exec_src_op(bus, src, address);

        Primary::SrcPrefix(mode).cycles() + src.cycles() + mode.extra_cycles()
    }

    /// Operations that read their memory operand at `address`.
    pub(in crate::cpu) fn exec_src_op<B: Bus>(&mut self, bus: &mut B, op: SrcOp, address: u16) {
        match op {
            SrcOp::Rold | SrcOp::Rord => {
                let m = self.read8(bus, address);
                let a = self.regs.a();
                let (new_a, new_m) = if op == SrcOp::Rold {
                    alu::rold(a, m)
                } else {
                    alu::rord(a, m)
                };
                self.write8(bus, address, new_m);
                self.regs.set_a(new_a);
                self.load_flags(new_a);
            }
            SrcOp::LdRr(rr) => {
                let value = self.read16(bus, address);
                self.regs.set_reg16(rr, value);
                self.set_jf();
            }
            SrcOp::Inc => {
                let m = self.read8(bus, address);
                let out = alu::inc8(m, self.flags());
                let value = self.take(out);
                self.write8(bus, address, value);
            }
            SrcOp::Dec => {
                let m = self.read8(bus, address);
                let out = alu::dec8(m, self.flags());
                let value = self.take(out);
                self.write8(bus, address, value);
            }
            SrcOp::LdToDirect => {
                let dst = self.fetch8(bus) as u16;
                let value = self.read8(bus, address);
                self.write8(bus, dst, value);
                self.set_jf();
            }
            SrcOp::LdToHl => {
                let value = self.read8(bus, address);
                let hl = self.regs.hl();
                self.write8(bus, hl, value);
                self.set_jf();
            }
            SrcOp::Mcmp => {
                let n = self.fetch8(bus);
                let m = self.read8(bus, address);
                let out = alu::alu8(AluOp::Cmp, m, n, self.flags());
                self.take(out);
            }
            SrcOp::Bit(bit_op, bit) => {
                let m = self.read8(bus, address);
                let out = alu::bit_op(bit_op, m, bit, self.flags());
                let value = self.take(out);
                self.write8(bus, address, value);
            }
            SrcOp::LdR(r) => {
                let value = self.read8(bus, address);
                self.regs.set_reg8(r, value);
                self.load_flags(value);
            }
            SrcOp::AluSrcHl(alu_op) => {
                let m = self.read8(bus, address);
                let hl = self.regs.hl();
                let n = self.read8(bus, hl);
                let out = alu::alu8(alu_op, m, n, self.flags());
                let value = self.take(out);
                if alu_op.writes_back() {
                    self.write8(bus, address, value);
                }
            }
            SrcOp::AluImm(alu_op) => {
                let n = self.fetch8(bus);
                let m = self.read8(bus, address);
                let out = alu::alu8(alu_op, m, n, self.flags());
                let value = self.take(out);
                if alu_op.writes_back() {
                    self.write8(bus, address, value);
                }
            }
            SrcOp::AluA(alu_op) => {
                let value = self.read8(bus, address);
                self.alu_a(alu_op, value);
            }
            SrcOp::XchR(r) => {
                let m = self.read8(bus, address);
                let value = self.regs.reg8(r);
                self.write8(bus, address, value);
                self.regs.set_reg8(r, m);
                self.set_jf();
            }
            SrcOp::LdBitCf(bit) => {
                let m = self.read8(bus, address);
                let value = with_bit(m, bit, self.regs.flag(Psw::C));
                self.write8(bus, address, value);
                self.set_jf();
            }
            SrcOp::XorCfBit(bit) => {
                let m = self.read8(bus, address);
                let carry = self.regs.flag(Psw::C) ^ alu::bit_of(m, bit);
                self.set_carry(carry);
            }
            SrcOp::LdCfBit(bit) => {
                let m = self.read8(bus, address);
                self.set_carry(alu::bit_of(m, bit));
            }
            SrcOp::Call => {
                let target = self.read16(bus, address);
                self.call(bus, target);
            }
            SrcOp::Jp => {
                self.regs.pc = self.read16(bus, address);
            }
        }
    }
}
