mod exec;
mod helpers;
mod interrupts;
mod step;


pub use interrupts::{Interrupt, FIRST_MASKABLE, LAST_MASKABLE};

use crate::config::CpuConfig;
use crate::regs::RegisterFile;

/// An instruction the decoder rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IllegalInstruction {
    /// Address of the first byte.
    pub pc: u16,
    /// Bytes consumed, first `len` entries valid.
    pub bytes: [u8; 4],
    pub len: u8,
}

impl IllegalInstruction {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// TLCS-870 CPU core.
///
/// The core owns the register file and the CPU side of the interrupt
/// logic (master enable, per-source enables, request latches). Memory is
/// reached only through the [`Bus`](crate::bus::Bus) passed to each step,
/// except for the register bank window when banks are shared with RAM
/// (see [`RegisterBanks`](crate::config::RegisterBanks)).
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: RegisterFile,
    config: CpuConfig,
    /// Address of the instruction most recently started.
    prev_pc: u16,
    /// Interrupt master enable flag.
    imf: bool,
    /// Per-source enable bits, bit `n` for vector index `n`.
    interrupt_enable: u16,
    /// Latched requests, bit `n` for vector index `n`.
    interrupt_latch: u16,
    /// Last level seen on the NMI input, for edge detection.
    nmi_line: bool,
    total_cycles: u64,
    illegal_count: u64,
    last_illegal: Option<IllegalInstruction>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    pub fn with_config(config: CpuConfig) -> Self {
        Self {
            regs: RegisterFile::default(),
            config,
            prev_pc: 0,
            imf: false,
            interrupt_enable: 0,
            interrupt_latch: 0,
            nmi_line: false,
            total_cycles: 0,
            illegal_count: 0,
            last_illegal: None,
        }
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    pub fn prev_pc(&self) -> u16 {
        self.prev_pc
    }

    /// Machine cycles consumed since construction.
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn imf(&self) -> bool {
        self.imf
    }

    pub fn set_imf(&mut self, enabled: bool) {
        self.imf = enabled;
    }

    pub fn interrupt_enable(&self) -> u16 {
        self.interrupt_enable
    }

    /// Set the per-source enable mask. Only maskable sources are affected
    /// by it.
    pub fn set_interrupt_enable(&mut self, mask: u16) {
        self.interrupt_enable = mask;
    }

    pub fn illegal_count(&self) -> u64 {
        self.illegal_count
    }

    pub fn last_illegal(&self) -> Option<IllegalInstruction> {
        self.last_illegal
    }
}
