use crate::regs::Psw;

/// Condition codes used by `JR cc,a`, in opcode field order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// EQ / Z
    Eq = 0,
    /// NE / NZ
    Ne = 1,
    /// LT / CS
    Lt = 2,
    /// GE / CC
    Ge = 3,
    Le = 4,
    Gt = 5,
    T = 6,
    F = 7,
}

impl Condition {
    #[inline]
    pub const fn from_bits(bits: u8) -> Condition {
        match bits & 0x07 {
            0 => Condition::Eq,
            1 => Condition::Ne,
            2 => Condition::Lt,
            3 => Condition::Ge,
            4 => Condition::Le,
            5 => Condition::Gt,
            6 => Condition::T,
            _ => Condition::F,
        }
    }

    pub fn eval(self, flags: Psw) -> bool {
        let z = flags.contains(Psw::Z);
        let c = flags.contains(Psw::C);
        match self {
            Condition::Eq => z,
            Condition::Ne => !z,
            Condition::Lt => c,
            Condition::Ge => !c,
            Condition::Le => c || z,
            Condition::Gt => !c && !z,
            Condition::T => true,
            Condition::F => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_follow_carry_and_zero() {
        let none = Psw::empty();
        let z = Psw::Z;
        let c = Psw::C;
        let cz = Psw::C | Psw::Z;

        assert!(Condition::Eq.eval(z) && !Condition::Eq.eval(none));
        assert!(Condition::Ne.eval(none) && !Condition::Ne.eval(z));
        assert!(Condition::Lt.eval(c) && !Condition::Lt.eval(z));
        assert!(Condition::Ge.eval(z) && !Condition::Ge.eval(c));
        assert!(Condition::Le.eval(c) && Condition::Le.eval(z) && !Condition::Le.eval(none));
        assert!(Condition::Gt.eval(none) && !Condition::Gt.eval(cz) && !Condition::Gt.eval(z));
        assert!(Condition::T.eval(none) && Condition::T.eval(cz));
        assert!(!Condition::F.eval(none) && !Condition::F.eval(Psw::all()));
    }

    #[test]
    fn jump_flag_does_not_affect_conditions() {
        assert!(!Condition::Eq.eval(Psw::J));
        assert!(Condition::Gt.eval(Psw::J | Psw::H));
    }
}
