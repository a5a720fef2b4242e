//! Pure arithmetic/logic helpers.
//!
//! Every function takes the operands plus the incoming flags and returns the
//! result together with the complete outgoing flag byte. Nothing here touches
//! CPU state, so the execution engine decides what gets written back.

use crate::regs::Psw;

/// Binary ALU operations, in opcode field order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Addc = 0,
    Add = 1,
    Subb = 2,
    Sub = 3,
    And = 4,
    Xor = 5,
    Or = 6,
    Cmp = 7,
}

impl AluOp {
    #[inline]
    pub const fn from_bits(bits: u8) -> AluOp {
        match bits & 0x07 {
            0 => AluOp::Addc,
            1 => AluOp::Add,
            2 => AluOp::Subb,
            3 => AluOp::Sub,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cmp,
        }
    }

    /// CMP only sets flags; everything else writes its result back.
    #[inline]
    pub const fn writes_back(self) -> bool {
        !matches!(self, AluOp::Cmp)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluOut<T> {
    pub value: T,
    pub flags: Psw,
}

#[inline]
fn out<T>(value: T, flags: Psw) -> AluOut<T> {
    AluOut { value, flags }
}

/// Shared add/sub/logic core. `mask` is the operand width mask (0xFF or
/// 0xFFFF); the half carry always comes from bit 3.
fn alu(op: AluOp, a: u32, b: u32, mask: u32, flags: Psw) -> AluOut<u32> {
    let mut f = flags;
    let carry_in = flags.contains(Psw::C) as u32;

    match op {
        AluOp::Add | AluOp::Addc => {
            let cin = if op == AluOp::Addc { carry_in } else { 0 };
            let full = a + b + cin;
            let value = full & mask;
            let carry = full > mask;
            f.set(Psw::C, carry);
            f.set(Psw::H, (a & 0x0F) + (b & 0x0F) + cin > 0x0F);
            f.set(Psw::Z, value == 0);
            f.set(Psw::J, carry);
            out(value, f)
        }
        AluOp::Sub | AluOp::Subb => {
            let cin = if op == AluOp::Subb { carry_in } else { 0 };
            let borrow = a < b + cin;
            let value = a.wrapping_sub(b).wrapping_sub(cin) & mask;
            f.set(Psw::C, borrow);
            f.set(Psw::H, (a & 0x0F) < (b & 0x0F) + cin);
            f.set(Psw::Z, value == 0);
            f.set(Psw::J, borrow);
            out(value, f)
        }
        AluOp::And | AluOp::Xor | AluOp::Or => {
            let value = match op {
                AluOp::And => a & b,
                AluOp::Xor => a ^ b,
                _ => a | b,
            } & mask;
            f.set(Psw::Z, value == 0);
            f.set(Psw::J, value == 0);
            out(value, f)
        }
        AluOp::Cmp => {
            let equal = a == b;
            f.set(Psw::Z, equal);
            f.set(Psw::C, a < b);
            f.set(Psw::H, (a & 0x0F) < (b & 0x0F));
            f.set(Psw::J, equal);
            out(a, f)
        }
    }
}

/// 8-bit binary operation `a <op> b`.
pub fn alu8(op: AluOp, a: u8, b: u8, flags: Psw) -> AluOut<u8> {
    let r = alu(op, a as u32, b as u32, 0xFF, flags);
    out(r.value as u8, r.flags)
}

/// 16-bit binary operation `a <op> b`.
pub fn alu16(op: AluOp, a: u16, b: u16, flags: Psw) -> AluOut<u16> {
    let r = alu(op, a as u32, b as u32, 0xFFFF, flags);
    out(r.value as u16, r.flags)
}

/// INC: J reports the wrap to zero; C and H are untouched.
pub fn inc8(value: u8, flags: Psw) -> AluOut<u8> {
    let result = value.wrapping_add(1);
    let mut f = flags;
    f.set(Psw::Z, result == 0);
    f.set(Psw::J, result == 0);
    out(result, f)
}

/// DEC: J reports the borrow (0x00 -> 0xFF); C and H are untouched.
pub fn dec8(value: u8, flags: Psw) -> AluOut<u8> {
    let result = value.wrapping_sub(1);
    let mut f = flags;
    f.set(Psw::Z, result == 0);
    f.set(Psw::J, value == 0);
    out(result, f)
}

pub fn inc16(value: u16, flags: Psw) -> AluOut<u16> {
    let result = value.wrapping_add(1);
    let mut f = flags;
    f.set(Psw::Z, result == 0);
    f.set(Psw::J, result == 0);
    out(result, f)
}

pub fn dec16(value: u16, flags: Psw) -> AluOut<u16> {
    let result = value.wrapping_sub(1);
    let mut f = flags;
    f.set(Psw::Z, result == 0);
    f.set(Psw::J, value == 0);
    out(result, f)
}

/// Decimal adjust after addition.
///
/// Low correction when H is set or the low digit is above 9, high
/// correction (and C set) when C is set or the value is above 0x99.
/// H is left as it was.
pub fn daa(value: u8, flags: Psw) -> AluOut<u8> {
    let mut adjust = 0u8;
    let mut carry = false;
    if flags.contains(Psw::H) || (value & 0x0F) > 0x09 {
        adjust |= 0x06;
    }
    if flags.contains(Psw::C) || value > 0x99 {
        adjust |= 0x60;
        carry = true;
    }
    let result = value.wrapping_add(adjust);

    let mut f = flags;
    f.set(Psw::C, carry);
    f.set(Psw::Z, result == 0);
    f.set(Psw::J, carry);
    out(result, f)
}

/// Decimal adjust after subtraction. Same table as [`daa`], subtracting.
pub fn das(value: u8, flags: Psw) -> AluOut<u8> {
    let mut adjust = 0u8;
    let mut carry = false;
    if flags.contains(Psw::H) || (value & 0x0F) > 0x09 {
        adjust |= 0x06;
    }
    if flags.contains(Psw::C) || value > 0x99 {
        adjust |= 0x60;
        carry = true;
    }
    let result = value.wrapping_sub(adjust);

    let mut f = flags;
    f.set(Psw::C, carry);
    f.set(Psw::Z, result == 0);
    f.set(Psw::J, carry);
    out(result, f)
}

/// Flags shared by the one-bit shifts and rotates.
#[inline]
fn shifted(result: u8, carry: bool, flags: Psw) -> AluOut<u8> {
    let mut f = flags;
    f.set(Psw::C, carry);
    f.set(Psw::Z, result == 0);
    f.set(Psw::J, carry);
    out(result, f)
}

/// Shift left, bit 0 cleared, bit 7 into C.
pub fn shlc(value: u8, flags: Psw) -> AluOut<u8> {
    shifted(value << 1, value & 0x80 != 0, flags)
}

/// Shift right, bit 7 cleared, bit 0 into C.
pub fn shrc(value: u8, flags: Psw) -> AluOut<u8> {
    shifted(value >> 1, value & 0x01 != 0, flags)
}

/// Rotate left through carry.
pub fn rolc(value: u8, flags: Psw) -> AluOut<u8> {
    let cin = flags.contains(Psw::C) as u8;
    shifted((value << 1) | cin, value & 0x80 != 0, flags)
}

/// Rotate right through carry.
pub fn rorc(value: u8, flags: Psw) -> AluOut<u8> {
    let cin = flags.contains(Psw::C) as u8;
    shifted((value >> 1) | (cin << 7), value & 0x01 != 0, flags)
}

/// Exchange the two nibbles.
pub fn swap(value: u8, flags: Psw) -> AluOut<u8> {
    let result = value.rotate_left(4);
    let mut f = flags;
    f.set(Psw::Z, result == 0);
    f.insert(Psw::J);
    out(result, f)
}

/// 8x8 -> 16 multiply. Z reports an empty high byte.
pub fn mul(hi: u8, lo: u8, flags: Psw) -> AluOut<u16> {
    let product = hi as u16 * lo as u16;
    let small = product & 0xFF00 == 0;
    let mut f = flags;
    f.set(Psw::Z, small);
    f.set(Psw::J, small);
    out(product, f)
}

/// 16 / 8 divide: quotient in the low byte, remainder in the high byte.
///
/// Division by zero leaves the dividend in place and sets C and J. A quotient
/// that does not fit in eight bits sets C and keeps only its low byte.
pub fn div(dividend: u16, divisor: u8, flags: Psw) -> AluOut<u16> {
    let mut f = flags;
    if divisor == 0 {
        f.insert(Psw::C | Psw::J);
        return out(dividend, f);
    }

    let quotient = dividend / divisor as u16;
    let remainder = dividend % divisor as u16;
    let overflow = quotient > 0xFF;
    f.set(Psw::C, overflow);
    f.set(Psw::Z, quotient == 0);
    f.set(Psw::J, overflow);
    out((remainder << 8) | (quotient & 0xFF), f)
}

/// ROLD A,(m): returns `(new_a, new_m)`.
///
/// The memory byte shifts left by one digit taking A's low digit in, and
/// A's low digit receives the digit shifted out.
pub fn rold(a: u8, m: u8) -> (u8, u8) {
    let new_m = (m << 4) | (a & 0x0F);
    let new_a = (a & 0xF0) | (m >> 4);
    (new_a, new_m)
}

/// RORD A,(m): returns `(new_a, new_m)`.
pub fn rord(a: u8, m: u8) -> (u8, u8) {
    let new_m = (a << 4) | (m >> 4);
    let new_a = (a & 0xF0) | (m & 0x0F);
    (new_a, new_m)
}

/// Which bit manipulation to apply in [`bit_op`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOp {
    Set,
    Clr,
    Cpl,
}

/// SET/CLR/CPL of bit `bit` (0..=7). Z (and J) receive the complement of the
/// bit as it was before the operation.
pub fn bit_op(op: BitOp, value: u8, bit: u8, flags: Psw) -> AluOut<u8> {
    let mask = 1u8 << (bit & 0x07);
    let was_clear = value & mask == 0;
    let result = match op {
        BitOp::Set => value | mask,
        BitOp::Clr => value & !mask,
        BitOp::Cpl => value ^ mask,
    };
    let mut f = flags;
    f.set(Psw::Z, was_clear);
    f.set(Psw::J, was_clear);
    out(result, f)
}

/// Flags after any instruction that writes C directly (CLR/SET/CPL CF,
/// LD CF,bit, XOR CF,bit): J is the complement of the new carry.
#[inline]
pub fn with_carry(flags: Psw, carry: bool) -> Psw {
    let mut f = flags;
    f.set(Psw::C, carry);
    f.set(Psw::J, !carry);
    f
}

#[inline]
pub fn bit_of(value: u8, bit: u8) -> bool {
    value & (1 << (bit & 0x07)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_flags_match_reference_for_all_operands() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let add = alu8(AluOp::Add, a, b, Psw::empty());
                assert_eq!(add.value, a.wrapping_add(b));
                assert_eq!(add.flags.contains(Psw::Z), add.value == 0);
                assert_eq!(add.flags.contains(Psw::C), a as u16 + b as u16 > 0xFF);
                assert_eq!(add.flags.contains(Psw::H), (a & 0xF) + (b & 0xF) > 0xF);

                let sub = alu8(AluOp::Sub, a, b, Psw::empty());
                assert_eq!(sub.value, a.wrapping_sub(b));
                assert_eq!(sub.flags.contains(Psw::Z), sub.value == 0);
                assert_eq!(sub.flags.contains(Psw::C), a < b);
                assert_eq!(sub.flags.contains(Psw::H), (a & 0xF) < (b & 0xF));
            }
        }
    }

    #[test]
    fn carry_in_variants() {
        let r = alu8(AluOp::Addc, 0xFF, 0x00, Psw::C);
        assert_eq!(r.value, 0x00);
        assert!(r.flags.contains(Psw::C | Psw::Z | Psw::H | Psw::J));

        let r = alu8(AluOp::Subb, 0x00, 0x00, Psw::C);
        assert_eq!(r.value, 0xFF);
        assert!(r.flags.contains(Psw::C | Psw::H));
        assert!(!r.flags.contains(Psw::Z));
    }

    #[test]
    fn logic_ops_keep_carry_and_half() {
        let r = alu8(AluOp::And, 0xF0, 0x0F, Psw::C | Psw::H);
        assert_eq!(r.value, 0);
        assert!(r.flags.contains(Psw::Z | Psw::J | Psw::C | Psw::H));

        let r = alu8(AluOp::Or, 0x10, 0x01, Psw::empty());
        assert_eq!(r.value, 0x11);
        assert!(r.flags.is_empty());

        let r = alu8(AluOp::Xor, 0xAA, 0xAA, Psw::empty());
        assert_eq!(r.value, 0);
        assert!(r.flags.contains(Psw::Z));
    }

    #[test]
    fn compare_returns_first_operand() {
        let r = alu8(AluOp::Cmp, 0x10, 0x20, Psw::empty());
        assert_eq!(r.value, 0x10);
        assert!(r.flags.contains(Psw::C));
        assert!(!r.flags.contains(Psw::Z));

        let r = alu8(AluOp::Cmp, 0x42, 0x42, Psw::C);
        assert!(r.flags.contains(Psw::Z | Psw::J));
        assert!(!r.flags.contains(Psw::C));
    }

    #[test]
    fn sixteen_bit_ops() {
        let r = alu16(AluOp::Add, 0xFFFF, 0x0001, Psw::empty());
        assert_eq!(r.value, 0);
        assert!(r.flags.contains(Psw::C | Psw::Z | Psw::H));

        let r = alu16(AluOp::Sub, 0x1000, 0x0001, Psw::empty());
        assert_eq!(r.value, 0x0FFF);
        assert!(!r.flags.contains(Psw::C));
        assert!(r.flags.contains(Psw::H));
    }

    #[test]
    fn inc_dec_report_wrap_in_j() {
        let r = inc8(0xFF, Psw::C);
        assert_eq!(r.value, 0);
        assert!(r.flags.contains(Psw::Z | Psw::J | Psw::C));

        let r = dec8(0x00, Psw::empty());
        assert_eq!(r.value, 0xFF);
        assert!(r.flags.contains(Psw::J));
        assert!(!r.flags.contains(Psw::Z));

        let r = dec8(0x01, Psw::J);
        assert!(r.flags.contains(Psw::Z));
        assert!(!r.flags.contains(Psw::J));

        assert_eq!(inc16(0xFFFF, Psw::empty()).value, 0);
        assert!(dec16(0x0000, Psw::empty()).flags.contains(Psw::J));
    }

    #[test]
    fn daa_nine_plus_one() {
        let sum = alu8(AluOp::Add, 0x09, 0x01, Psw::empty());
        assert_eq!(sum.value, 0x0A);
        assert!(!sum.flags.contains(Psw::H));
        let r = daa(sum.value, sum.flags);
        assert_eq!(r.value, 0x10);
        assert!(!r.flags.contains(Psw::C));
    }

    #[test]
    fn daa_high_and_both_corrections() {
        let sum = alu8(AluOp::Add, 0x99, 0x01, Psw::empty());
        assert_eq!(daa(sum.value, sum.flags).value, 0x00);
        assert!(daa(sum.value, sum.flags).flags.contains(Psw::C | Psw::Z));

        // 0x99 + 0x99 = 0x132: value 0x32, C and H set.
        let sum = alu8(AluOp::Add, 0x99, 0x99, Psw::empty());
        assert!(sum.flags.contains(Psw::C | Psw::H));
        let r = daa(sum.value, sum.flags);
        assert_eq!(r.value, 0x98);
        assert!(r.flags.contains(Psw::C));
    }

    #[test]
    fn das_after_subtraction() {
        let diff = alu8(AluOp::Sub, 0x10, 0x01, Psw::empty());
        assert_eq!(diff.value, 0x0F);
        let r = das(diff.value, diff.flags);
        assert_eq!(r.value, 0x09);
        assert!(!r.flags.contains(Psw::C));

        let diff = alu8(AluOp::Sub, 0x00, 0x01, Psw::empty());
        let r = das(diff.value, diff.flags);
        assert_eq!(r.value, 0x99);
        assert!(r.flags.contains(Psw::C));
    }

    #[test]
    fn shifts_and_rotates() {
        let r = shlc(0x81, Psw::empty());
        assert_eq!(r.value, 0x02);
        assert!(r.flags.contains(Psw::C | Psw::J));

        let r = shrc(0x01, Psw::C);
        assert_eq!(r.value, 0x00);
        assert!(r.flags.contains(Psw::C | Psw::Z));

        let r = rolc(0x80, Psw::empty());
        assert_eq!(r.value, 0x00);
        assert!(r.flags.contains(Psw::C | Psw::Z));

        let r = rolc(0x00, Psw::C);
        assert_eq!(r.value, 0x01);
        assert!(!r.flags.contains(Psw::C));

        let r = rorc(0x01, Psw::C);
        assert_eq!(r.value, 0x80);
        assert!(r.flags.contains(Psw::C));
    }

    #[test]
    fn mul_and_div() {
        let r = mul(0x12, 0x10, Psw::empty());
        assert_eq!(r.value, 0x0120);
        assert!(!r.flags.contains(Psw::Z));
        assert!(mul(0x0F, 0x0F, Psw::empty()).flags.contains(Psw::Z));

        let r = div(0x0107, 0x10, Psw::C);
        assert_eq!(r.value, 0x0710);
        assert!(!r.flags.contains(Psw::C));

        let r = div(0x1234, 0x00, Psw::empty());
        assert_eq!(r.value, 0x1234);
        assert!(r.flags.contains(Psw::C | Psw::J));
        assert!(!r.flags.contains(Psw::Z));

        let r = div(0x1000, 0x02, Psw::empty());
        assert!(r.flags.contains(Psw::C));
        assert_eq!(r.value & 0xFF, 0x00);
    }

    #[test]
    fn digit_rotates() {
        assert_eq!(rold(0x12, 0x34), (0x13, 0x42));
        assert_eq!(rord(0x12, 0x34), (0x14, 0x23));
    }

    #[test]
    fn bit_ops_report_previous_bit() {
        let r = bit_op(BitOp::Set, 0x00, 3, Psw::empty());
        assert_eq!(r.value, 0x08);
        assert!(r.flags.contains(Psw::Z | Psw::J));

        let r = bit_op(BitOp::Clr, 0xFF, 7, Psw::empty());
        assert_eq!(r.value, 0x7F);
        assert!(!r.flags.contains(Psw::Z));

        let r = bit_op(BitOp::Cpl, 0x01, 0, Psw::empty());
        assert_eq!(r.value, 0x00);

        let f = with_carry(Psw::J, true);
        assert!(f.contains(Psw::C));
        assert!(!f.contains(Psw::J));
    }
}
