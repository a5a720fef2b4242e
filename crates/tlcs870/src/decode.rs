//! Opcode tables.
//!
//! Decoding is kept separate from execution: each byte (or prefix + byte
//! combination) maps to a small descriptor carrying the operation, its
//! register/bit/condition fields and its base cost. The execution engine only
//! ever matches on descriptors.

use crate::addressing::AddrMode;
use crate::alu::{AluOp, BitOp};
use crate::bus::Bus;
use crate::cond::Condition;
use crate::regs::{Reg16, Reg8};

/// One-bit shifts and rotates through carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Shlc,
    Shrc,
    Rolc,
    Rorc,
}

impl ShiftOp {
    #[inline]
    pub const fn from_bits(bits: u8) -> ShiftOp {
        match bits & 0x03 {
            0 => ShiftOp::Shlc,
            1 => ShiftOp::Shrc,
            2 => ShiftOp::Rolc,
            _ => ShiftOp::Rorc,
        }
    }
}

/// Instructions selected by the first opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primary {
    Nop,
    Swap(Reg8),
    Mul(Reg16),
    Div(Reg16),
    Reti,
    Ret,
    PopPsw,
    PushPsw,
    Daa(Reg8),
    Das(Reg8),
    ClrCf,
    SetCf,
    CplCf,
    LdRbs,
    IncRr(Reg16),
    LdRrImm(Reg16),
    DecRr(Reg16),
    Shift(ShiftOp, Reg8),
    LdRImm(Reg8),
    LdRR { dst: Reg8, src: Reg8 },
    IncR(Reg8),
    DecR(Reg8),
    AluAImm(AluOp),
    /// Short `(x)` / `(HL)` encodings of source-operand instructions.
    Src(SrcOp, AddrMode),
    /// Short `(x)` / `(HL)` encodings of destination-operand instructions.
    Dst(DstOp, AddrMode),
    /// JRS T,a with its signed 5-bit displacement.
    JrsT(i8),
    JrsF(i8),
    Callv(u8),
    JrCc(Condition),
    SrcPrefix(AddrMode),
    RegPrefix(Reg8),
    DstPrefix(AddrMode),
    LdSpImm,
    Jr,
    Call,
    Callp,
    Jp,
    Swi,
    Illegal,
}

/// Operations reachable through the source-addressed prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SrcOp {
    Rold,
    Rord,
    LdRr(Reg16),
    Inc,
    Dec,
    /// LD (x),(src); the destination byte follows the operation byte.
    LdToDirect,
    /// LD (HL),(src)
    LdToHl,
    /// MCMP (src),n
    Mcmp,
    Bit(BitOp, u8),
    LdR(Reg8),
    /// `op (src),(HL)`; CMP leaves `(src)` alone.
    AluSrcHl(AluOp),
    /// `op (src),n`
    AluImm(AluOp),
    /// `op A,(src)`
    AluA(AluOp),
    XchR(Reg8),
    LdBitCf(u8),
    XorCfBit(u8),
    LdCfBit(u8),
    Call,
    Jp,
}

/// Operations reachable through the destination-addressed prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DstOp {
    StoreRr(Reg16),
    StoreImm,
    StoreR(Reg8),
    /// LDW (x),mn / LDW (HL),mn, short form only.
    StoreWordImm,
    /// CLR (x) / CLR (HL), short form only.
    Clear,
}

/// Operations reachable through the register prefix `E8+g`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegOp {
    Swap,
    Mul,
    Div,
    Retn,
    Pop,
    Push,
    Daa,
    Das,
    XchRr(Reg16),
    LdRr(Reg16),
    Shift(ShiftOp),
    /// `op WA,gg`
    AluWa(AluOp),
    /// `op gg,mn`
    AluImm16(AluOp),
    Bit(BitOp, u8),
    /// LD r,g
    LdR(Reg8),
    /// `op A,g`
    AluAG(AluOp),
    /// `op g,A`
    AluGA(AluOp),
    /// `op g,n`
    AluGImm(AluOp),
    /// SET/CLR/CPL (pp).g, bit number taken from register g.
    PortBit(BitOp, Reg16),
    /// LD (pp).g,CF
    LdPortBitCf(Reg16),
    /// LD CF,(pp).g
    LdCfPortBit(Reg16),
    XchR(Reg8),
    LdBitCf(u8),
    XorCfBit(u8),
    LdCfBit(u8),
    LdSpGg,
    LdGgSp,
    CallGg,
    JpGg,
}

pub const fn decode_primary(op: u8) -> Primary {
    use AddrMode::{Direct, Hl};

    let r = Reg8::from_bits(op);
    let rr = Reg16::from_bits(op);
    let bit = op & 0x07;
    match op {
        0x00 => Primary::Nop,
        0x01 => Primary::Swap(Reg8::A),
        0x02 => Primary::Mul(Reg16::WA),
        0x03 => Primary::Div(Reg16::WA),
        0x04 => Primary::Reti,
        0x05 => Primary::Ret,
        0x06 => Primary::PopPsw,
        0x07 => Primary::PushPsw,
        0x0A => Primary::Daa(Reg8::A),
        0x0B => Primary::Das(Reg8::A),
        0x0C => Primary::ClrCf,
        0x0D => Primary::SetCf,
        0x0E => Primary::CplCf,
        0x0F => Primary::LdRbs,
        0x10..=0x13 => Primary::IncRr(rr),
        0x14..=0x17 => Primary::LdRrImm(rr),
        0x18..=0x1B => Primary::DecRr(rr),
        0x1C..=0x1F => Primary::Shift(ShiftOp::from_bits(op), Reg8::A),
        0x20 => Primary::Src(SrcOp::Inc, Direct),
        0x21 => Primary::Src(SrcOp::Inc, Hl),
        0x22 => Primary::Src(SrcOp::LdR(Reg8::A), Direct),
        0x23 => Primary::Src(SrcOp::LdR(Reg8::A), Hl),
        0x24 => Primary::Dst(DstOp::StoreWordImm, Direct),
        0x25 => Primary::Dst(DstOp::StoreWordImm, Hl),
        0x26 => Primary::Src(SrcOp::LdToDirect, Direct),
        0x28 => Primary::Src(SrcOp::Dec, Direct),
        0x29 => Primary::Src(SrcOp::Dec, Hl),
        0x2A => Primary::Dst(DstOp::StoreR(Reg8::A), Direct),
        0x2B => Primary::Dst(DstOp::StoreR(Reg8::A), Hl),
        0x2C => Primary::Dst(DstOp::StoreImm, Direct),
        0x2D => Primary::Dst(DstOp::StoreImm, Hl),
        0x2E => Primary::Dst(DstOp::Clear, Direct),
        0x2F => Primary::Dst(DstOp::Clear, Hl),
        0x30..=0x37 => Primary::LdRImm(r),
        0x40..=0x47 => Primary::Src(SrcOp::Bit(BitOp::Set, bit), Direct),
        0x48..=0x4F => Primary::Src(SrcOp::Bit(BitOp::Clr, bit), Direct),
        0x50..=0x57 => Primary::LdRR { dst: Reg8::A, src: r },
        0x58..=0x5F => Primary::LdRR { dst: r, src: Reg8::A },
        0x60..=0x67 => Primary::IncR(r),
        0x68..=0x6F => Primary::DecR(r),
        0x70..=0x77 => Primary::AluAImm(AluOp::from_bits(op)),
        0x78..=0x7F => Primary::Src(SrcOp::AluA(AluOp::from_bits(op)), Direct),
        0x80..=0x9F => Primary::JrsT(((op << 3) as i8) >> 3),
        0xA0..=0xBF => Primary::JrsF(((op << 3) as i8) >> 3),
        0xC0..=0xCF => Primary::Callv(op & 0x0F),
        0xD0..=0xD7 => Primary::JrCc(Condition::from_bits(op)),
        0xD8..=0xDF => Primary::Src(SrcOp::LdCfBit(bit), Direct),
        0xE0..=0xE7 => Primary::SrcPrefix(AddrMode::from_bits(op)),
        0xE8..=0xEF => Primary::RegPrefix(r),
        0xF0..=0xF7 => {
            let mode = AddrMode::from_bits(op);
            if mode.valid_as_dst() {
                Primary::DstPrefix(mode)
            } else {
                Primary::Illegal
            }
        }
        0xFA => Primary::LdSpImm,
        0xFB => Primary::Jr,
        0xFC => Primary::Call,
        0xFD => Primary::Callp,
        0xFE => Primary::Jp,
        0xFF => Primary::Swi,
        _ => Primary::Illegal,
    }
}

pub const fn decode_src(op: u8) -> Option<SrcOp> {
    let r = Reg8::from_bits(op);
    let bit = op & 0x07;
    let alu = AluOp::from_bits(op);
    Some(match op {
        0x08 => SrcOp::Rold,
        0x09 => SrcOp::Rord,
        0x14..=0x17 => SrcOp::LdRr(Reg16::from_bits(op)),
        0x20 => SrcOp::Inc,
        0x26 => SrcOp::LdToDirect,
        0x27 => SrcOp::LdToHl,
        0x28 => SrcOp::Dec,
        0x2F => SrcOp::Mcmp,
        0x40..=0x47 => SrcOp::Bit(BitOp::Set, bit),
        0x48..=0x4F => SrcOp::Bit(BitOp::Clr, bit),
        0x58..=0x5F => SrcOp::LdR(r),
        0x60..=0x67 => SrcOp::AluSrcHl(alu),
        0x68..=0x6F => SrcOp::AluImm(alu),
        0x78..=0x7F => SrcOp::AluA(alu),
        0xA8..=0xAF => SrcOp::XchR(r),
        0xC0..=0xC7 => SrcOp::Bit(BitOp::Cpl, bit),
        0xC8..=0xCF => SrcOp::LdBitCf(bit),
        0xD0..=0xD7 => SrcOp::XorCfBit(bit),
        0xD8..=0xDF => SrcOp::LdCfBit(bit),
        0xFC => SrcOp::Call,
        0xFE => SrcOp::Jp,
        _ => return None,
    })
}

pub const fn decode_dst(op: u8) -> Option<DstOp> {
    Some(match op {
        0x10..=0x13 => DstOp::StoreRr(Reg16::from_bits(op)),
        0x2C => DstOp::StoreImm,
        0x50..=0x57 => DstOp::StoreR(Reg8::from_bits(op)),
        _ => return None,
    })
}

/// Decode the byte after `E8+g`. Pair forms only exist for `g <= 3`.
pub const fn decode_reg(g: Reg8, op: u8) -> Option<RegOp> {
    let r = Reg8::from_bits(op);
    let bit = op & 0x07;
    let alu = AluOp::from_bits(op);
    let pair = (g as u8) < 4;
    let pp = if op & 0x01 == 0 { Reg16::DE } else { Reg16::HL };

    Some(match op {
        0x01 => RegOp::Swap,
        0x02 if pair => RegOp::Mul,
        0x03 if pair && (g as u8) != Reg16::BC as u8 => RegOp::Div,
        0x04 if (g as u8) == 0 => RegOp::Retn,
        0x06 if pair => RegOp::Pop,
        0x07 if pair => RegOp::Push,
        0x0A => RegOp::Daa,
        0x0B => RegOp::Das,
        0x10..=0x13 if pair => RegOp::XchRr(Reg16::from_bits(op)),
        0x14..=0x17 if pair => RegOp::LdRr(Reg16::from_bits(op)),
        0x1C..=0x1F => RegOp::Shift(ShiftOp::from_bits(op)),
        0x30..=0x37 if pair => RegOp::AluWa(alu),
        0x38..=0x3F if pair => RegOp::AluImm16(alu),
        0x40..=0x47 => RegOp::Bit(BitOp::Set, bit),
        0x48..=0x4F => RegOp::Bit(BitOp::Clr, bit),
        0x58..=0x5F => RegOp::LdR(r),
        0x60..=0x67 => RegOp::AluAG(alu),
        0x68..=0x6F => RegOp::AluGA(alu),
        0x70..=0x77 => RegOp::AluGImm(alu),
        0x82 | 0x83 => RegOp::PortBit(BitOp::Set, pp),
        0x8A | 0x8B => RegOp::PortBit(BitOp::Clr, pp),
        0x92 | 0x93 => RegOp::PortBit(BitOp::Cpl, pp),
        0x9A | 0x9B => RegOp::LdPortBitCf(pp),
        0x9E | 0x9F => RegOp::LdCfPortBit(pp),
        0xA8..=0xAF => RegOp::XchR(r),
        0xC0..=0xC7 => RegOp::Bit(BitOp::Cpl, bit),
        0xC8..=0xCF => RegOp::LdBitCf(bit),
        0xD0..=0xD7 => RegOp::XorCfBit(bit),
        0xD8..=0xDF => RegOp::LdCfBit(bit),
        0xFA if pair => RegOp::LdSpGg,
        0xFB if pair => RegOp::LdGgSp,
        0xFC if pair => RegOp::CallGg,
        0xFE if pair => RegOp::JpGg,
        _ => return None,
    })
}

const fn build_primary() -> [Primary; 256] {
    let mut table = [Primary::Illegal; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_primary(i as u8);
        i += 1;
    }
    table
}

const fn build_src() -> [Option<SrcOp>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_src(i as u8);
        i += 1;
    }
    table
}

const fn build_dst() -> [Option<DstOp>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_dst(i as u8);
        i += 1;
    }
    table
}

pub static PRIMARY: [Primary; 256] = build_primary();
pub static SRC_OPS: [Option<SrcOp>; 256] = build_src();
pub static DST_OPS: [Option<DstOp>; 256] = build_dst();

impl Primary {
    /// Encoded length for everything except the three prefix groups, whose
    /// length depends on the following bytes (see [`instruction_length`]).
    pub const fn len(self) -> u8 {
        match self {
            Primary::Src(op, mode) => 1 + mode.operand_len() + op.imm_len(),
            Primary::Dst(op, mode) => 1 + mode.operand_len() + op.imm_len(),
            Primary::LdRbs
            | Primary::LdRImm(_)
            | Primary::AluAImm(_)
            | Primary::JrCc(_)
            | Primary::Jr
            | Primary::Callp => 2,
            Primary::LdRrImm(_) | Primary::LdSpImm | Primary::Call | Primary::Jp => 3,
            _ => 1,
        }
    }

    /// Base cost in machine cycles. Taken branches add to this; prefix
    /// groups are costed by their second-stage descriptors.
    pub const fn cycles(self) -> u32 {
        match self {
            Primary::Nop => 1,
            Primary::Swap(_) => 2,
            Primary::Mul(_) => 8,
            Primary::Div(_) => 13,
            Primary::Reti => 6,
            Primary::Ret => 5,
            Primary::PopPsw => 3,
            Primary::PushPsw => 2,
            Primary::Daa(_) | Primary::Das(_) => 2,
            Primary::ClrCf | Primary::SetCf | Primary::CplCf => 1,
            Primary::LdRbs => 2,
            Primary::IncRr(_) | Primary::DecRr(_) => 2,
            Primary::LdRrImm(_) => 3,
            Primary::Shift(..) => 1,
            Primary::LdRImm(_) => 2,
            Primary::LdRR { .. } | Primary::IncR(_) | Primary::DecR(_) => 1,
            Primary::AluAImm(_) => 2,
            Primary::Src(op, mode) => op.cycles() + mode.extra_cycles(),
            Primary::Dst(op, mode) => op.cycles() + mode.extra_cycles(),
            Primary::JrsT(_) | Primary::JrsF(_) => 2,
            Primary::Callv(_) => 6,
            Primary::JrCc(_) => 2,
            Primary::SrcPrefix(_) | Primary::RegPrefix(_) | Primary::DstPrefix(_) => 1,
            Primary::LdSpImm => 3,
            Primary::Jr => 4,
            Primary::Call | Primary::Callp => 6,
            Primary::Jp => 4,
            Primary::Swi => 8,
            Primary::Illegal => ILLEGAL_CYCLES,
        }
    }
}

/// Fixed cost charged for any illegal instruction.
pub const ILLEGAL_CYCLES: u32 = 2;

impl SrcOp {
    /// Immediate bytes following the operation byte.
    pub const fn imm_len(self) -> u8 {
        match self {
            SrcOp::LdToDirect | SrcOp::Mcmp | SrcOp::AluImm(_) => 1,
            _ => 0,
        }
    }

    pub const fn cycles(self) -> u32 {
        match self {
            SrcOp::Rold | SrcOp::Rord => 6,
            SrcOp::LdRr(_) => 2,
            SrcOp::Inc | SrcOp::Dec => 3,
            SrcOp::LdToDirect => 3,
            SrcOp::LdToHl => 2,
            SrcOp::Mcmp => 3,
            SrcOp::Bit(..) => 3,
            SrcOp::LdR(_) => 1,
            SrcOp::AluSrcHl(_) | SrcOp::AluImm(_) => 3,
            SrcOp::AluA(_) => 1,
            SrcOp::XchR(_) => 3,
            SrcOp::LdBitCf(_) => 3,
            SrcOp::XorCfBit(_) | SrcOp::LdCfBit(_) => 2,
            SrcOp::Call => 5,
            SrcOp::Jp => 3,
        }
    }
}

impl DstOp {
    pub const fn imm_len(self) -> u8 {
        match self {
            DstOp::StoreImm => 1,
            DstOp::StoreWordImm => 2,
            _ => 0,
        }
    }

    pub const fn cycles(self) -> u32 {
        match self {
            DstOp::StoreR(_) => 1,
            DstOp::StoreRr(_) | DstOp::StoreImm | DstOp::Clear => 2,
            DstOp::StoreWordImm => 4,
        }
    }
}

impl RegOp {
    pub const fn imm_len(self) -> u8 {
        match self {
            RegOp::AluImm16(_) => 2,
            RegOp::AluGImm(_) => 1,
            _ => 0,
        }
    }

    /// Cost including the prefix byte.
    pub const fn cycles(self) -> u32 {
        match self {
            RegOp::Swap => 3,
            RegOp::Mul => 8,
            RegOp::Div => 13,
            RegOp::Retn => 6,
            RegOp::Pop | RegOp::Push => 3,
            RegOp::Daa | RegOp::Das => 3,
            RegOp::XchRr(_) => 4,
            RegOp::LdRr(_) => 3,
            RegOp::Shift(_) => 2,
            RegOp::AluWa(_) | RegOp::AluImm16(_) => 4,
            RegOp::Bit(..) => 3,
            RegOp::LdR(_) | RegOp::AluAG(_) | RegOp::AluGA(_) => 2,
            RegOp::AluGImm(_) => 3,
            RegOp::PortBit(..) | RegOp::LdPortBitCf(_) => 5,
            RegOp::LdCfPortBit(_) => 4,
            RegOp::XchR(_) => 3,
            RegOp::LdBitCf(_) => 3,
            RegOp::XorCfBit(_) | RegOp::LdCfBit(_) => 2,
            RegOp::LdSpGg | RegOp::LdGgSp => 3,
            RegOp::CallGg => 6,
            RegOp::JpGg => 4,
        }
    }
}

/// Length in bytes of the instruction at `addr`, as the CPU would consume it.
///
/// Illegal combinations report the bytes read up to and including the one
/// that failed to decode.
pub fn instruction_length<B: Bus>(bus: &mut B, addr: u16) -> u8 {
    let opcode = bus.read8(addr);
    match PRIMARY[opcode as usize] {
        Primary::SrcPrefix(mode) => {
            let at = 1 + mode.operand_len();
            let op = bus.read8(addr.wrapping_add(at as u16));
            match SRC_OPS[op as usize] {
                Some(src) => at + 1 + src.imm_len(),
                None => at + 1,
            }
        }
        Primary::DstPrefix(mode) => {
            let at = 1 + mode.operand_len();
            let op = bus.read8(addr.wrapping_add(at as u16));
            match DST_OPS[op as usize] {
                Some(dst) => at + 1 + dst.imm_len(),
                None => at + 1,
            }
        }
        Primary::RegPrefix(g) => {
            let op = bus.read8(addr.wrapping_add(1));
            match decode_reg(g, op) {
                Some(reg) => 2 + reg.imm_len(),
                None => 2,
            }
        }
        primary => primary.len(),
    }
}
