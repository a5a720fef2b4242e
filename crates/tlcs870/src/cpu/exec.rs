mod control;
mod dst;
mod reg;
mod src;
mod stack;

use crate::addressing::{self, AddrMode};
use crate::alu::{self, AluOp, AluOut};
use crate::bus::Bus;
use crate::config::IllegalPolicy;
use crate::decode::{Primary, ShiftOp, ILLEGAL_CYCLES, PRIMARY};
use crate::regs::{Psw, Reg16, Reg8};

use super::{Cpu, IllegalInstruction, Interrupt};

impl Cpu {
    /// Decode and execute the instruction whose first byte is `opcode` and
    /// return the number of machine cycles it took.
    ///
    /// `prev_pc` must already point at the opcode and PC just past it.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let instr = PRIMARY[opcode as usize];
        let cycles = instr.cycles();

        match instr {
            Primary::Nop => {}

            Primary::Swap(r) => self.update_reg8(r, alu::swap),
            Primary::Mul(rr) => self.exec_mul(rr),
            Primary::Div(rr) => self.exec_div(rr),
            Primary::Daa(r) => self.update_reg8(r, alu::daa),
            Primary::Das(r) => self.update_reg8(r, alu::das),

            Primary::Reti => self.exec_reti(bus),
            Primary::Ret => self.exec_ret(bus),
            Primary::PopPsw => self.exec_pop_psw(bus),
            Primary::PushPsw => self.exec_push_psw(bus),

            // Carry flag manipulation.
            Primary::ClrCf => self.set_carry(false),
            Primary::SetCf => self.set_carry(true),
            Primary::CplCf => {
                let carry = !self.regs.flag(Psw::C);
                self.set_carry(carry);
            }

            Primary::LdRbs => {
                let bank = self.fetch8(bus);
                self.regs.set_bank(bank);
                self.set_jf();
            }

            // 16-bit register forms.
            Primary::IncRr(rr) => {
                let out = alu::inc16(self.regs.reg16(rr), self.flags());
                let value = self.take(out);
                self.regs.set_reg16(rr, value);
            }
            Primary::DecRr(rr) => {
                let out = alu::dec16(self.regs.reg16(rr), self.flags());
                let value = self.take(out);
                self.regs.set_reg16(rr, value);
            }
            Primary::LdRrImm(rr) => {
                let value = self.fetch16(bus);
                self.regs.set_reg16(rr, value);
                self.set_jf();
            }

            // 8-bit register forms.
            Primary::Shift(op, r) => self.exec_shift(op, r),
            Primary::LdRImm(r) => {
                let value = self.fetch8(bus);
                self.regs.set_reg8(r, value);
                self.load_flags(value);
            }
            Primary::LdRR { dst, src } => {
                let value = self.regs.reg8(src);
                self.regs.set_reg8(dst, value);
                self.load_flags(value);
            }
            Primary::IncR(r) => self.update_reg8(r, alu::inc8),
            Primary::DecR(r) => self.update_reg8(r, alu::dec8),
            Primary::AluAImm(op) => {
                let value = self.fetch8(bus);
                self.alu_a(op, value);
            }

            // (x) / (HL) short forms share the prefixed handlers.
            Primary::Src(op, mode) => {
                let raw = self.fetch_mode_operand(bus, mode);
                let pc = self.regs.pc;
                let address = self.resolve_address(mode, raw, pc);
                self.exec_src_op(bus, op, address);
            }
            Primary::Dst(op, mode) => {
                let raw = self.fetch_mode_operand(bus, mode);
                let pc = self.regs.pc;
                let address = self.resolve_address(mode, raw, pc);
                self.exec_dst_op(bus, op, address);
            }

            // Control transfer.
            Primary::JrsT(d) => return cycles + self.exec_jrs(d, true),
            Primary::JrsF(d) => return cycles + self.exec_jrs(d, false),
            Primary::JrCc(cc) => return cycles + self.exec_jr_cc(bus, cc),
            Primary::Jr => self.exec_jr(bus),
            Primary::Jp => {
                let target = self.fetch16(bus);
                self.regs.pc = target;
            }
            Primary::Call => {
                let target = self.fetch16(bus);
                self.call(bus, target);
            }
            Primary::Callp => {
                let page = self.fetch8(bus);
                self.call(bus, 0xFF00 | page as u16);
            }
            Primary::Callv(n) => {
                let target = self.read16(bus, 0xFFC0 + 2 * n as u16);
                self.call(bus, target);
            }
            Primary::Swi => self.enter_vector(bus, Interrupt::Software),
            Primary::LdSpImm => {
                let sp = self.fetch16(bus);
                self.regs.sp = sp;
                self.set_jf();
            }

            Primary::SrcPrefix(mode) => return self.exec_src_prefix(bus, opcode, mode),
            Primary::DstPrefix(mode) => return self.exec_dst_prefix(bus, opcode, mode),
            Primary::RegPrefix(g) => return self.exec_reg_prefix(bus, opcode, g),

            Primary::Illegal => return self.illegal(bus, &[opcode]),
        }

        cycles
    }

    /// Single handler for every byte sequence the decoder rejects.
    ///
    /// `bytes` are the bytes consumed so far; PC already points past them.
    pub(super) fn illegal<B: Bus>(&mut self, bus: &mut B, bytes: &[u8]) -> u32 {
        let mut record = IllegalInstruction {
            pc: self.prev_pc,
            bytes: [0; 4],
            len: bytes.len().min(4) as u8,
        };
        record.bytes[..record.len as usize].copy_from_slice(&bytes[..record.len as usize]);

        log::warn!(
            "TLCS-870 illegal instruction {:02X?} at PC=0x{:04X} (SP=0x{:04X} WA=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X} PSW=0x{:02X})",
            record.bytes(),
            record.pc,
            self.regs.sp,
            self.regs.reg16(Reg16::WA),
            self.regs.reg16(Reg16::BC),
            self.regs.reg16(Reg16::DE),
            self.regs.reg16(Reg16::HL),
            self.regs.psw(),
        );
        self.illegal_count += 1;
        self.last_illegal = Some(record);

        match self.config.illegal_policy {
            IllegalPolicy::Skip => ILLEGAL_CYCLES,
            IllegalPolicy::Trap => {
                self.enter_vector(bus, Interrupt::Software);
                Primary::Swi.cycles()
            }
        }
    }

    /// Fetch the displacement / direct address byte a mode needs, if any.
    #[inline]
    pub(super) fn fetch_mode_operand<B: Bus>(&mut self, bus: &mut B, mode: AddrMode) -> Option<u8> {
        if mode.operand_len() == 1 {
            Some(self.fetch8(bus))
        } else {
            None
        }
    }

    #[inline]
    pub(super) fn resolve_address(&mut self, mode: AddrMode, raw: Option<u8>, pc_base: u16) -> u16 {
        addressing::resolve(mode, raw.as_slice(), &mut self.regs, pc_base).address
    }

    /// Apply a unary ALU helper to an 8-bit register.
    #[inline]
    pub(super) fn update_reg8(&mut self, r: Reg8, f: fn(u8, Psw) -> AluOut<u8>) {
        let out = f(self.regs.reg8(r), self.flags());
        let value = self.take(out);
        self.regs.set_reg8(r, value);
    }

    /// `op A,value`, writing A back unless the operation is CMP.
    pub(super) fn alu_a(&mut self, op: AluOp, value: u8) {
        let out = alu::alu8(op, self.regs.a(), value, self.flags());
        let result = self.take(out);
        if op.writes_back() {
            self.regs.set_a(result);
        }
    }

    pub(super) fn exec_shift(&mut self, op: ShiftOp, r: Reg8) {
        let f = match op {
            ShiftOp::Shlc => alu::shlc,
            ShiftOp::Shrc => alu::shrc,
            ShiftOp::Rolc => alu::rolc,
            ShiftOp::Rorc => alu::rorc,
        };
        self.update_reg8(r, f);
    }

    /// `MUL ggH,ggL`: the pair receives the product of its two halves.
    pub(super) fn exec_mul(&mut self, rr: Reg16) {
        let hi = self.regs.reg8(rr.high());
        let lo = self.regs.reg8(rr.low());
        let out = alu::mul(hi, lo, self.flags());
        let value = self.take(out);
        self.regs.set_reg16(rr, value);
    }

    /// `DIV gg,C`
    pub(super) fn exec_div(&mut self, rr: Reg16) {
        let divisor = self.regs.reg8(Reg8::C);
        let out = alu::div(self.regs.reg16(rr), divisor, self.flags());
        let value = self.take(out);
        self.regs.set_reg16(rr, value);
    }

    #[inline]
    pub(super) fn set_carry(&mut self, carry: bool) {
        let flags = alu::with_carry(self.flags(), carry);
        self.regs.set_flags(flags);
    }
}

/// `value` with bit `bit` forced to `on`.
#[inline]
pub(super) fn with_bit(value: u8, bit: u8, on: bool) -> u8 {
    let mask = 1u8 << (bit & 0x07);
    if on {
        value | mask
    } else {
        value & !mask
    }
}
