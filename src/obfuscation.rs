//! Address obfuscation for wake-on-radio transmissions
//!
//! A reversible scrambling of 32 bit values built as a non-linear feedback
//! shift register: 528 rounds, each shifting in one bit computed from five
//! state bits through the non-linear function `0x3A5C742E`, two more state
//! bits and one key bit.
//!
//! # Important Notes
//! - This hides addressing data from casual inspection only
//! - The key is a fixed, publicly known constant
//! - It gives no confidentiality and must not be used as encryption

/// Half key used by the module family
pub const DEFAULT_HALF_KEY: u32 = 0x0666_0708;

const NON_LINEAR_FUNCTION: u32 = 0x3A5C_742E;
const ROUNDS: u32 = 528;

/// Scrambles and unscrambles 32 bit values
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressObfuscator {
    key: u64,
}

impl Default for AddressObfuscator {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_KEY)
    }
}

#[inline]
const fn bit(value: u32, n: u32) -> u32 {
    (value >> n) & 1
}

impl AddressObfuscator {
    /// Builds an obfuscator whose 64 bit key repeats `half_key` twice.
    pub const fn new(half_key: u32) -> Self {
        Self {
            key: ((half_key as u64) << 32) | half_key as u64,
        }
    }

    #[inline]
    const fn key_bit(&self, n: u32) -> u32 {
        ((self.key >> (n & 63)) & 1) as u32
    }

    pub const fn encrypt(&self, value: u32) -> u32 {
        let mut x = value;
        let mut round = 0;
        while round < ROUNDS {
            let index = bit(x, 1) | bit(x, 9) << 1 | bit(x, 20) << 2 | bit(x, 26) << 3 | bit(x, 31) << 4;
            let feedback =
                bit(x, 0) ^ bit(x, 16) ^ self.key_bit(round) ^ bit(NON_LINEAR_FUNCTION, index);
            x = (x >> 1) | (feedback << 31);
            round += 1;
        }
        x
    }

    /// Inverse of [`AddressObfuscator::encrypt`] for every input.
    pub const fn decrypt(&self, value: u32) -> u32 {
        let mut x = value;
        let mut round: u32 = 0;
        while round < ROUNDS {
            // undoes encryption round 527 - round; 527 % 64 == 15
            let key_index = 15u32.wrapping_sub(round);
            let index = bit(x, 0) | bit(x, 8) << 1 | bit(x, 19) << 2 | bit(x, 25) << 3 | bit(x, 30) << 4;
            let feedback =
                bit(x, 31) ^ bit(x, 15) ^ self.key_bit(key_index) ^ bit(NON_LINEAR_FUNCTION, index);
            x = (x << 1) | feedback;
            round += 1;
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_inverts_encrypt() {
        let obfuscator = AddressObfuscator::default();

        let mut value: u32 = 0x1234_5678;
        for _ in 0..2_000 {
            assert_eq!(obfuscator.decrypt(obfuscator.encrypt(value)), value);
            assert_eq!(obfuscator.encrypt(obfuscator.decrypt(value)), value);
            value = value.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        }

        for value in [0, 1, u32::MAX, 0x8000_0000, 0x0000_FFFF, DEFAULT_HALF_KEY] {
            assert_eq!(obfuscator.decrypt(obfuscator.encrypt(value)), value);
        }
    }

    #[test]
    fn distinct_inputs_stay_distinct() {
        let obfuscator = AddressObfuscator::default();
        assert_ne!(obfuscator.encrypt(0), obfuscator.encrypt(1));
    }

    #[test]
    fn key_selects_mapping() {
        let a = AddressObfuscator::new(0x0666_0708);
        let b = AddressObfuscator::new(0x0666_0709);
        assert_ne!(a.encrypt(0xCAFE_0012), b.encrypt(0xCAFE_0012));
        assert_eq!(b.decrypt(b.encrypt(0xCAFE_0012)), 0xCAFE_0012);
    }
}
