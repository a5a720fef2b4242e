use bitflags::bitflags;

/// Number of register banks selectable through RBS.
pub const NUM_BANKS: usize = 16;

/// Bytes of RAM taken by all register banks, bank `n` register `r` at
/// offset `n * 8 + r`.
pub const BANK_RAM_SIZE: u16 = (NUM_BANKS * 8) as u16;

/// 8-bit general purpose registers, in opcode field order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A = 0,
    W = 1,
    C = 2,
    B = 3,
    E = 4,
    D = 5,
    L = 6,
    H = 7,
}

impl Reg8 {
    pub const ALL: [Reg8; 8] = [
        Reg8::A,
        Reg8::W,
        Reg8::C,
        Reg8::B,
        Reg8::E,
        Reg8::D,
        Reg8::L,
        Reg8::H,
    ];

    /// Decode a 3-bit register field. Upper bits are ignored.
    #[inline]
    pub const fn from_bits(bits: u8) -> Reg8 {
        match bits & 0x07 {
            0 => Reg8::A,
            1 => Reg8::W,
            2 => Reg8::C,
            3 => Reg8::B,
            4 => Reg8::E,
            5 => Reg8::D,
            6 => Reg8::L,
            _ => Reg8::H,
        }
    }
}

/// Register pairs. Pair `n` is built from registers `2n` (low) and `2n+1` (high).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    WA = 0,
    BC = 1,
    DE = 2,
    HL = 3,
}

impl Reg16 {
    pub const ALL: [Reg16; 4] = [Reg16::WA, Reg16::BC, Reg16::DE, Reg16::HL];

    /// Decode a 2-bit pair field. Upper bits are ignored.
    #[inline]
    pub const fn from_bits(bits: u8) -> Reg16 {
        match bits & 0x03 {
            0 => Reg16::WA,
            1 => Reg16::BC,
            2 => Reg16::DE,
            _ => Reg16::HL,
        }
    }

    #[inline]
    pub const fn low(self) -> Reg8 {
        Reg8::from_bits((self as u8) << 1)
    }

    #[inline]
    pub const fn high(self) -> Reg8 {
        Reg8::from_bits(((self as u8) << 1) | 1)
    }
}

bitflags! {
    /// Program status word.
    ///
    /// Only the top nibble carries flags; the low nibble is kept as-is so
    /// that PSW behaves as an opaque byte across PUSH/POP.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Psw: u8 {
        /// Jump status flag, tested by JRS T / JRS F.
        const J = 0x80;
        const Z = 0x40;
        const C = 0x20;
        /// Half carry, used by DAA/DAS.
        const H = 0x10;
    }
}

/// The TLCS-870 register file.
///
/// General registers live in one of sixteen banks picked by RBS. Switching
/// banks only changes which bank the register names resolve to.
///
/// The banks are also the storage behind the on-chip RAM window the CPU
/// maps them into (see [`RegisterBanks`](crate::config::RegisterBanks));
/// [`bank_ram`](Self::bank_ram) is that byte view.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    banks: [[u8; 8]; NUM_BANKS],
    rbs: u8,
    pub pc: u16,
    pub sp: u16,
    psw: Psw,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            banks: [[0; 8]; NUM_BANKS],
            rbs: 0,
            pc: 0,
            sp: 0,
            psw: Psw::empty(),
        }
    }
}

impl RegisterFile {
    #[inline]
    pub fn reg8(&self, reg: Reg8) -> u8 {
        self.banks[self.rbs as usize][reg as usize]
    }

    #[inline]
    pub fn set_reg8(&mut self, reg: Reg8, value: u8) {
        self.banks[self.rbs as usize][reg as usize] = value;
    }

    #[inline]
    pub fn reg16(&self, pair: Reg16) -> u16 {
        u16::from_le_bytes([self.reg8(pair.low()), self.reg8(pair.high())])
    }

    #[inline]
    pub fn set_reg16(&mut self, pair: Reg16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.set_reg8(pair.low(), lo);
        self.set_reg8(pair.high(), hi);
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.reg8(Reg8::A)
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.set_reg8(Reg8::A, value);
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.reg16(Reg16::HL)
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.set_reg16(Reg16::HL, value);
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.reg16(Reg16::DE)
    }

    /// Current register bank select value (0..=15).
    #[inline]
    pub fn bank(&self) -> u8 {
        self.rbs
    }

    /// Select a register bank. Only the low four bits are used.
    #[inline]
    pub fn set_bank(&mut self, bank: u8) {
        self.rbs = bank & 0x0F;
    }

    /// Raw view of any bank, for inspectors.
    pub fn bank_regs(&self, bank: u8) -> &[u8; 8] {
        &self.banks[(bank & 0x0F) as usize]
    }

    /// Byte `offset` of the bank RAM, independent of RBS.
    #[inline]
    pub fn bank_ram(&self, offset: u8) -> u8 {
        let offset = (offset & 0x7F) as usize;
        self.banks[offset >> 3][offset & 0x07]
    }

    #[inline]
    pub fn set_bank_ram(&mut self, offset: u8, value: u8) {
        let offset = (offset & 0x7F) as usize;
        self.banks[offset >> 3][offset & 0x07] = value;
    }

    #[inline]
    pub fn psw(&self) -> u8 {
        self.psw.bits()
    }

    #[inline]
    pub fn set_psw(&mut self, value: u8) {
        self.psw = Psw::from_bits_retain(value);
    }

    #[inline]
    pub fn flags(&self) -> Psw {
        self.psw
    }

    #[inline]
    pub fn set_flags(&mut self, flags: Psw) {
        self.psw = flags;
    }

    #[inline]
    pub fn flag(&self, flag: Psw) -> bool {
        self.psw.contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Psw, value: bool) {
        self.psw.set(flag, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_roundtrip_and_split_little_endian() {
        let mut regs = RegisterFile::default();
        for (i, pair) in Reg16::ALL.into_iter().enumerate() {
            let value = 0x1234u16.wrapping_mul(i as u16 + 3) ^ 0xA55A;
            regs.set_reg16(pair, value);
            assert_eq!(regs.reg16(pair), value);
            assert_eq!(regs.reg8(pair.low()), value as u8);
            assert_eq!(regs.reg8(pair.high()), (value >> 8) as u8);
        }
        regs.set_reg16(Reg16::WA, 0xBEEF);
        assert_eq!(regs.reg8(Reg8::A), 0xEF);
        assert_eq!(regs.reg8(Reg8::W), 0xBE);
    }

    #[test]
    fn bank_switch_does_not_copy() {
        let mut regs = RegisterFile::default();
        regs.set_reg8(Reg8::B, 0x11);
        regs.set_bank(3);
        assert_eq!(regs.reg8(Reg8::B), 0x00);
        regs.set_reg8(Reg8::B, 0x33);
        regs.set_bank(0x10);
        assert_eq!(regs.bank(), 0);
        assert_eq!(regs.reg8(Reg8::B), 0x11);
        assert_eq!(regs.bank_regs(3)[Reg8::B as usize], 0x33);
    }

    #[test]
    fn bank_ram_layout_follows_bank_and_register_index() {
        let mut regs = RegisterFile::default();
        regs.set_bank(2);
        regs.set_reg16(Reg16::HL, 0x1234);
        // bank 2, L = 6, H = 7
        assert_eq!(regs.bank_ram(2 * 8 + 6), 0x34);
        assert_eq!(regs.bank_ram(2 * 8 + 7), 0x12);

        regs.set_bank_ram(5 * 8 + Reg8::A as u8, 0x99);
        regs.set_bank(5);
        assert_eq!(regs.a(), 0x99);
        assert_eq!(BANK_RAM_SIZE, 0x80);
    }

    #[test]
    fn psw_keeps_unused_bits() {
        let mut regs = RegisterFile::default();
        regs.set_psw(0xA5);
        assert_eq!(regs.psw(), 0xA5);
        assert!(regs.flag(Psw::J));
        assert!(regs.flag(Psw::C));
        assert!(!regs.flag(Psw::Z));
        regs.set_flag(Psw::Z, true);
        assert_eq!(regs.psw(), 0xE5);
    }
}
