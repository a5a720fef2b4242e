use crate::regs::{Reg8, RegisterFile};

/// Memory operand forms selected by the low three bits of the
/// `E0..E7` (source) and `F0..F7` (destination) prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddrMode {
    /// `(x)`: 8-bit direct address in page zero.
    Direct = 0,
    /// `(PC+A)`
    PcPlusA = 1,
    /// `(DE)`
    De = 2,
    /// `(HL)`
    Hl = 3,
    /// `(HL+d)`: signed 8-bit displacement.
    HlPlusD = 4,
    /// `(HL+C)`: C is treated as signed.
    HlPlusC = 5,
    /// `(HL+)`: post-increment.
    HlInc = 6,
    /// `(-HL)`: pre-decrement.
    DecHl = 7,
}

/// Result of resolving an operand: the effective address and the number of
/// raw operand bytes the mode used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub address: u16,
    pub consumed: u8,
}

impl AddrMode {
    #[inline]
    pub const fn from_bits(bits: u8) -> AddrMode {
        match bits & 0x07 {
            0 => AddrMode::Direct,
            1 => AddrMode::PcPlusA,
            2 => AddrMode::De,
            3 => AddrMode::Hl,
            4 => AddrMode::HlPlusD,
            5 => AddrMode::HlPlusC,
            6 => AddrMode::HlInc,
            _ => AddrMode::DecHl,
        }
    }

    /// Operand bytes that follow the prefix byte.
    #[inline]
    pub const fn operand_len(self) -> u8 {
        match self {
            AddrMode::Direct | AddrMode::HlPlusD => 1,
            _ => 0,
        }
    }

    /// `(PC+A)` and `(HL+C)` cannot be used as destinations.
    #[inline]
    pub const fn valid_as_dst(self) -> bool {
        !matches!(self, AddrMode::PcPlusA | AddrMode::HlPlusC)
    }

    /// Extra machine cycles the address calculation adds on top of the
    /// operation's base cost.
    #[inline]
    pub const fn extra_cycles(self) -> u32 {
        match self {
            AddrMode::De | AddrMode::Hl => 1,
            AddrMode::Direct | AddrMode::HlInc | AddrMode::DecHl => 2,
            AddrMode::PcPlusA | AddrMode::HlPlusD | AddrMode::HlPlusC => 3,
        }
    }
}

/// Compute the effective address for `mode`.
///
/// `raw` holds the operand bytes already fetched for the mode (see
/// [`AddrMode::operand_len`]); `pc_base` is the address following the prefix
/// and operation bytes, used by `(PC+A)`.
///
/// `(HL+)` and `(-HL)` update HL here, wrapping at 16 bits.
pub fn resolve(mode: AddrMode, raw: &[u8], regs: &mut RegisterFile, pc_base: u16) -> Resolved {
    let operand = raw.first().copied().unwrap_or(0);
    let address = match mode {
        AddrMode::Direct => operand as u16,
        AddrMode::PcPlusA => pc_base.wrapping_add(regs.a() as u16),
        AddrMode::De => regs.de(),
        AddrMode::Hl => regs.hl(),
        AddrMode::HlPlusD => regs.hl().wrapping_add(operand as i8 as u16),
        AddrMode::HlPlusC => regs
            .hl()
            .wrapping_add(regs.reg8(Reg8::C) as i8 as u16),
        AddrMode::HlInc => {
            let hl = regs.hl();
            regs.set_hl(hl.wrapping_add(1));
            hl
        }
        AddrMode::DecHl => {
            let hl = regs.hl().wrapping_sub(1);
            regs.set_hl(hl);
            hl
        }
    };

    Resolved {
        address,
        consumed: mode.operand_len(),
    }
}
