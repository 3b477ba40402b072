/// Logical genotype call decoded from a 2-bit on-disk code.
///
/// Codes `0`, `1` and `2` map to the matching allele count, code `3` is the
/// missing-call sentinel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum GenotypeValue {
    #[default]
    Zero = 0,
    One = 1,
    Two = 2,
    Missing = 3,
}

const DECODE: [GenotypeValue; 4] = [
    GenotypeValue::Zero,
    GenotypeValue::One,
    GenotypeValue::Two,
    GenotypeValue::Missing,
];

impl GenotypeValue {
    /// Decodes the low two bits of `code`; higher bits are ignored.
    #[inline]
    pub fn from_code(code: u8) -> Self {
        DECODE[(code & 0x03) as usize]
    }

    /// Raw 2-bit code of this value
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Allele count, or `None` for a missing call
    pub fn dosage(self) -> Option<u8> {
        match self {
            GenotypeValue::Missing => None,
            other => Some(other as u8),
        }
    }

    /// Integer form with `-1` standing in for a missing call
    pub fn as_i8(self) -> i8 {
        match self {
            GenotypeValue::Missing => -1,
            other => other as i8,
        }
    }

    pub fn is_missing(self) -> bool {
        self == GenotypeValue::Missing
    }
}
