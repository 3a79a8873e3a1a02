use std::fmt::{Debug, Display, LowerHex, UpperHex};

use crate::Element;
use ethnum::U256;

macro_rules! fmt_impl {
    ($t:ident, $u:ident) => {
        impl $u for Element {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                <U256 as $t>::fmt(&self.0, f)
            }
        }
    };
    ($t:ident) => {
        fmt_impl!($t, $t);
    };
}

// decimal, to match the way snarkjs prints signals
fmt_impl!(Display);
fmt_impl!(UpperHex);
fmt_impl!(LowerHex);

impl Debug for Element {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
