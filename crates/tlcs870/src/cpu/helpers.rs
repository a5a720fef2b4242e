use crate::alu::AluOut;
use crate::bus::Bus;
use crate::config::RegisterBanks;
use crate::regs::{Psw, BANK_RAM_SIZE};

use super::Cpu;

impl Cpu {
    /// Offset into the register bank RAM when `addr` falls inside the
    /// window the banks are mapped at.
    #[inline]
    fn bank_ram_offset(&self, addr: u16) -> Option<u8> {
        match self.config.register_banks {
            RegisterBanks::Shared { base } => {
                let offset = addr.wrapping_sub(base);
                (offset < BANK_RAM_SIZE).then_some(offset as u8)
            }
            RegisterBanks::Private => None,
        }
    }

    /// Every CPU memory access goes through here so the register bank
    /// window is served from the register file.
    #[inline]
    pub(super) fn read8<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        match self.bank_ram_offset(addr) {
            Some(offset) => self.regs.bank_ram(offset),
            None => bus.read8(addr),
        }
    }

    #[inline]
    pub(super) fn write8<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u8) {
        match self.bank_ram_offset(addr) {
            Some(offset) => self.regs.set_bank_ram(offset, value),
            None => bus.write8(addr, value),
        }
    }

    /// Little-endian, the second byte wrapping from 0xFFFF to 0x0000.
    #[inline]
    pub(super) fn read16<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u16 {
        let lo = self.read8(bus, addr);
        let hi = self.read8(bus, addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn write16<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(bus, addr, lo);
        self.write8(bus, addr.wrapping_add(1), hi);
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let pc = self.regs.pc;
        let value = self.read8(bus, pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus) as u16;
        let hi = self.fetch8(bus) as u16;
        (hi << 8) | lo
    }

    #[inline]
    pub(super) fn push8<B: Bus>(&mut self, bus: &mut B, value: u8) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        let sp = self.regs.sp;
        self.write8(bus, sp, value);
    }

    #[inline]
    pub(super) fn pop8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let sp = self.regs.sp;
        let value = self.read8(bus, sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        value
    }

    /// Stack grows downward. We want memory[SP] = low, memory[SP+1] = high.
    #[inline]
    pub(super) fn push16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push8(bus, hi);
        self.push8(bus, lo);
    }

    #[inline]
    pub(super) fn pop16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pop8(bus);
        let hi = self.pop8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Push the return address and jump.
    #[inline]
    pub(super) fn call<B: Bus>(&mut self, bus: &mut B, target: u16) {
        let ret = self.regs.pc;
        self.push16(bus, ret);
        self.regs.pc = target;
    }

    /// Store an ALU result's flags and hand back its value.
    #[inline]
    pub(super) fn take<T>(&mut self, out: AluOut<T>) -> T {
        self.regs.set_flags(out.flags);
        out.value
    }

    /// Flags after an 8-bit load into a register: J set, Z from the value.
    #[inline]
    pub(super) fn load_flags(&mut self, value: u8) {
        self.regs.set_flag(Psw::J, true);
        self.regs.set_flag(Psw::Z, value == 0);
    }

    /// Flags after stores, pair loads and exchanges: J set.
    #[inline]
    pub(super) fn set_jf(&mut self) {
        self.regs.set_flag(Psw::J, true);
    }

    #[inline]
    pub(super) fn flags(&self) -> Psw {
        self.regs.flags()
    }
}
