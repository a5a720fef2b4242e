use typed_builder::TypedBuilder;

/// Default start of the register bank window in on-chip RAM.
pub const DEFAULT_BANK_BASE: u16 = 0x0040;

/// What the core does when it decodes a byte sequence that is not an
/// instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IllegalPolicy {
    /// Log, record and skip the bytes consumed so far.
    #[default]
    Skip,
    /// Record, then take the undefined-instruction trap through the
    /// software interrupt vector.
    Trap,
}

/// Where the general register banks are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterBanks {
    /// The banks are the 128 bytes of on-chip RAM starting at `base`: bank
    /// `n`, register `r` sits at `base + n * 8 + r`. Memory operands inside
    /// that window read and write the registers and never reach the bus.
    Shared { base: u16 },
    /// The banks are only reachable by register name.
    Private,
}

impl Default for RegisterBanks {
    fn default() -> Self {
        RegisterBanks::Shared {
            base: DEFAULT_BANK_BASE,
        }
    }
}

/// Core configuration.
///
/// ```
/// use tlcs870::{CpuConfig, IllegalPolicy, RegisterBanks};
///
/// let config = CpuConfig::builder()
///     .illegal_policy(IllegalPolicy::Trap)
///     .build();
/// assert!(!config.trace);
/// assert_eq!(config.register_banks, RegisterBanks::Shared { base: 0x0040 });
/// ```
#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct CpuConfig {
    #[builder(default)]
    pub illegal_policy: IllegalPolicy,
    #[builder(default)]
    pub register_banks: RegisterBanks,
    /// Emit a `log::trace!` line for every executed instruction.
    #[builder(default = false)]
    pub trace: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
