//! Instruction-set core for the Toshiba TLCS-870 8-bit microcontroller CPU.
//!
//! The core is driven one instruction at a time through [`Cpu::step`] and
//! reaches memory only through a host-supplied [`Bus`].
//!
//! ```
//! use tlcs870::{Cpu, FlatMemory};
//!
//! let mut mem = FlatMemory::new();
//! // LD A,0x12 ; INC A
//! mem.load(0x0000, &[0x30, 0x12, 0x60]);
//!
//! let mut cpu = Cpu::new();
//! cpu.run(&mut mem, 3);
//! assert_eq!(cpu.regs.a(), 0x13);
//! ```

pub mod addressing;
pub mod alu;
pub mod bus;
pub mod cond;
pub mod config;
pub mod cpu;
pub mod decode;
pub mod regs;

pub use bus::{Bus, FlatMemory};
pub use config::{CpuConfig, IllegalPolicy, RegisterBanks};
pub use cpu::{Cpu, IllegalInstruction, Interrupt, FIRST_MASKABLE, LAST_MASKABLE};
pub use decode::instruction_length;
pub use regs::{Psw, Reg16, Reg8, RegisterFile};
