#![cfg(feature = "zeroize")]

use super::{Int, Sign};

impl zeroize::Zeroize for Int {
    fn zeroize(&mut self) {
        self.digit.zeroize();
        self.used = 0;
        self.sign = Sign::NonNegative;
    }
}
