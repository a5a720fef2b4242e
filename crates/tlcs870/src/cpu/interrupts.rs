mod lines;
mod poll;
mod service;

/// Vector index of the first maskable source.
pub const FIRST_MASKABLE: u8 = 3;
/// Vector index of the last maskable source.
pub const LAST_MASKABLE: u8 = 15;

/// Cost of accepting an interrupt, in machine cycles.
pub(super) const ACCEPT_CYCLES: u32 = 8;

/// Interrupt sources, each with a fixed vector slot.
///
/// Slot `n` holds the handler address at `0xFFFE - 2 * n`. Slot 0 is the
/// reset vector and never a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    /// SWI and the undefined-instruction trap.
    Software,
    /// Edge-triggered, ignores IMF.
    NonMaskable,
    /// Sources `FIRST_MASKABLE..=LAST_MASKABLE`, gated by IMF and their
    /// enable bit.
    Maskable(u8),
}

impl Interrupt {
    pub const fn index(self) -> u8 {
        match self {
            Interrupt::Software => 1,
            Interrupt::NonMaskable => 2,
            Interrupt::Maskable(n) => n,
        }
    }

    pub const fn vector(self) -> u16 {
        0xFFFE - 2 * self.index() as u16
    }
}
