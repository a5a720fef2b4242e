use crate::alu::{self, AluOp};
use crate::bus::Bus;
use crate::decode::{decode_reg, RegOp};
use crate::regs::{Psw, Reg16, Reg8};

use super::with_bit;
use crate::cpu::Cpu;

impl Cpu {
    /// `E8+g`: register-addressed group. `g` names an 8-bit register, or the
    /// pair `gg` for the pair forms (only decoded for `g <= 3`).
    pub(in crate::cpu) fn exec_reg_prefix<B: Bus>(&mut self, bus: &mut B, prefix: u8, g: Reg8) -> u32 {
        let op = self.fetch8(bus);
        let Some(reg_op) = decode_reg(g, op) else {
            return self.illegal(bus, &[prefix, op]);
        };
        let gg = Reg16::from_bits(g as u8);

        match reg_op {
            RegOp::Swap => self.update_reg8(g, alu::swap),
            RegOp::Mul => self.exec_mul(gg),
            RegOp::Div => self.exec_div(gg),
            RegOp::Retn => self.exec_retn(bus),
            RegOp::Pop => {
                let value = self.pop16(bus);
                self.regs.set_reg16(gg, value);
            }
            RegOp::Push => {
                let value = self.regs.reg16(gg);
                self.push16(bus, value);
            }
            RegOp::Daa => self.update_reg8(g, alu::daa),
            RegOp::Das => self.update_reg8(g, alu::das),
            RegOp::XchRr(rr) => {
                let other = self.regs.reg16(rr);
                let value = self.regs.reg16(gg);
                self.regs.set_reg16(rr, value);
                self.regs.set_reg16(gg, other);
                self.set_jf();
            }
            RegOp::LdRr(rr) => {
                let value = self.regs.reg16(gg);
                self.regs.set_reg16(rr, value);
                self.set_jf();
            }
            RegOp::Shift(shift) => self.exec_shift(shift, g),
            RegOp::AluWa(alu_op) => {
                let out = alu::alu16(alu_op, self.regs.reg16(Reg16::WA), self.regs.reg16(gg), self.flags());
                let value = self.take(out);
                if alu_op.writes_back() {
                    self.regs.set_reg16(Reg16::WA, value);
                }
            }
            RegOp::AluImm16(alu_op) => {
                let mn = self.fetch16(bus);
                let out = alu::alu16(alu_op, self.regs.reg16(gg), mn, self.flags());
                let value = self.take(out);
                if alu_op.writes_back() {
                    self.regs.set_reg16(gg, value);
                }
            }
            RegOp::Bit(bit_op, bit) => {
                let out = alu::bit_op(bit_op, self.regs.reg8(g), bit, self.flags());
                let value = self.take(out);
                self.regs.set_reg8(g, value);
            }
            RegOp::LdR(r) => {
                let value = self.regs.reg8(g);
                self.regs.set_reg8(r, value);
                self.load_flags(value);
            }
            RegOp::AluAG(alu_op) => {
                let value = self.regs.reg8(g);
                self.alu_a(alu_op, value);
            }
            RegOp::AluGA(alu_op) => {
                let a = self.regs.a();
                self.alu_g(g, alu_op, a);
            }
            RegOp::AluGImm(alu_op) => {
                let n = self.fetch8(bus);
                self.alu_g(g, alu_op, n);
            }
            RegOp::PortBit(bit_op, pp) => {
                let address = self.regs.reg16(pp);
                let bit = self.regs.reg8(g);
                let m = self.read8(bus, address);
                let out = alu::bit_op(bit_op, m, bit, self.flags());
                let value = self.take(out);
                self.write8(bus, address, value);
            }
            RegOp::LdPortBitCf(pp) => {
                let address = self.regs.reg16(pp);
                let bit = self.regs.reg8(g);
                let m = self.read8(bus, address);
                let value = with_bit(m, bit, self.regs.flag(Psw::C));
                self.write8(bus, address, value);
                self.set_jf();
            }
            RegOp::LdCfPortBit(pp) => {
                let address = self.regs.reg16(pp);
                let bit = self.regs.reg8(g);
                let m = self.read8(bus, address);
                self.set_carry(alu::bit_of(m, bit));
            }
            RegOp::XchR(r) => {
                let other = self.regs.reg8(r);
                let value = self.regs.reg8(g);
                self.regs.set_reg8(r, value);
                self.regs.set_reg8(g, other);
                self.set_jf();
            }
            RegOp::LdBitCf(bit) => {
                let value = with_bit(self.regs.reg8(g), bit, self.regs.flag(Psw::C));
                self.regs.set_reg8(g, value);
                self.set_jf();
            }
            RegOp::XorCfBit(bit) => {
                let carry = self.regs.flag(Psw::C) ^ alu::bit_of(self.regs.reg8(g), bit);
                self.set_carry(carry);
            }
            RegOp::LdCfBit(bit) => {
                let carry = alu::bit_of(self.regs.reg8(g), bit);
                self.set_carry(carry);
            }
            RegOp::LdSpGg => {
                self.regs.sp = self.regs.reg16(gg);
                self.set_jf();
            }
            RegOp::LdGgSp => {
                let sp = self.regs.sp;
                self.regs.set_reg16(gg, sp);
                self.set_jf();
            }
            RegOp::CallGg => {
                let target = self.regs.reg16(gg);
                self.call(bus, target);
            }
            RegOp::JpGg => {
                self.regs.pc = self.regs.reg16(gg);
            }
        }

        reg_op.cycles()
    }

    fn alu_g(&mut self, g: Reg8, op: AluOp, value: u8) {
        let out = alu::alu8(op, self.regs.reg8(g), value, self.flags());
        let result = self.take(out);
        if op.writes_back() {
            self.regs.set_reg8(g, result);
        }
    }
}
