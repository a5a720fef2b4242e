use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tlcs870::regs::BANK_RAM_SIZE;
use tlcs870::{Bus, Cpu, CpuConfig, FlatMemory, Reg16, RegisterBanks, RegisterFile};
use typed_builder::TypedBuilder;

/// Cycle budget used when none is given.
pub const DEFAULT_CYCLES: u64 = 1_000_000;
/// Initial stack pointer used when none is given.
pub const DEFAULT_SP: u16 = 0x2000;

const RESET_VECTOR: u16 = 0xFFFE;
const ADDRESS_SPACE: usize = 0x10000;

#[derive(Clone, Debug, TypedBuilder)]
pub struct RunOptions {
    #[builder(setter(into))]
    pub image: PathBuf,
    #[builder(default = 0)]
    pub load_addr: u16,
    /// Start address. Defaults to the reset vector when the image covers
    /// it, otherwise to the load address.
    #[builder(default, setter(strip_option))]
    pub entry: Option<u16>,
    #[builder(default = DEFAULT_SP)]
    pub sp: u16,
    #[builder(default = DEFAULT_CYCLES)]
    pub cycles: u64,
    #[builder(default)]
    pub config: CpuConfig,
}

/// CPU state left after a run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub regs: RegisterFile,
    pub cycles: u64,
    pub illegal_count: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC={:04X} SP={:04X} WA={:04X} BC={:04X} DE={:04X} HL={:04X} PSW={:02X} RBS={} cycles={} illegal={}",
            self.regs.pc,
            self.regs.sp,
            self.regs.reg16(Reg16::WA),
            self.regs.reg16(Reg16::BC),
            self.regs.reg16(Reg16::DE),
            self.regs.reg16(Reg16::HL),
            self.regs.psw(),
            self.regs.bank(),
            self.cycles,
            self.illegal_count,
        )
    }
}

/// Read the image named in `opts` and run it.
pub fn run(opts: &RunOptions) -> Result<RunSummary> {
    let image = std::fs::read(&opts.image)
        .with_context(|| format!("failed to read program image {}", opts.image.display()))?;
    log::info!(
        "Loaded {} bytes from '{}' at 0x{:04X}",
        image.len(),
        opts.image.display(),
        opts.load_addr
    );
    run_image(opts, &image)
}

/// Run an in-memory image with the placement and budget from `opts`.
pub fn run_image(opts: &RunOptions, image: &[u8]) -> Result<RunSummary> {
    if image.is_empty() {
        bail!("program image is empty");
    }
    if image.len() > ADDRESS_SPACE {
        bail!(
            "program image is {} bytes, larger than the 64K address space",
            image.len()
        );
    }

    let mut mem = FlatMemory::new();
    mem.load(opts.load_addr, image);

    let mut cpu = Cpu::with_config(opts.config);
    if let RegisterBanks::Shared { base } = opts.config.register_banks {
        // The banks start out holding whatever the image placed there.
        for offset in 0..BANK_RAM_SIZE {
            cpu.regs.set_bank_ram(offset as u8, mem.read8(base.wrapping_add(offset)));
        }
    }
    cpu.regs.sp = opts.sp;
    cpu.regs.pc = match opts.entry {
        Some(entry) => entry,
        None if covers_reset_vector(opts.load_addr, image.len()) => mem.read16(RESET_VECTOR),
        None => opts.load_addr,
    };
    log::info!("Starting at PC=0x{:04X}, SP=0x{:04X}", cpu.regs.pc, cpu.regs.sp);

    let cycles = cpu.run(&mut mem, opts.cycles);
    let summary = RunSummary {
        regs: cpu.regs.clone(),
        cycles,
        illegal_count: cpu.illegal_count(),
    };
    if let Some(illegal) = cpu.last_illegal() {
        log::warn!(
            "{} illegal instruction(s), last {:02X?} at 0x{:04X}",
            summary.illegal_count,
            illegal.bytes(),
            illegal.pc
        );
    }
    log::info!("{summary}");
    Ok(summary)
}

/// Parse a command-line address: decimal, or hex with a `0x` prefix.
pub fn parse_address(text: &str) -> Result<u16> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => text.parse::<u16>(),
    };
    parsed.with_context(|| format!("invalid address '{text}'"))
}

fn covers_reset_vector(load_addr: u16, len: usize) -> bool {
    let start = load_addr as usize;
    len >= ADDRESS_SPACE || (start <= RESET_VECTOR as usize && start + len >= ADDRESS_SPACE)
}
