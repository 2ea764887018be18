//! Byte sequence exchanged by every bus transfer
//!
//! A [`Binary`] owns its bytes. It is built whole, read through
//! bounds-checked accessors and combined by concatenation into a new value;
//! there is no way to mutate part of one in place.

use alloc::vec::Vec;
use core::ops::{Add, Index};

use crate::error::OutOfRange;

/// Owned, immutable byte sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Binary {
    bytes: Vec<u8>,
}

impl Binary {
    /// Empty sequence
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Copy a borrowed view into a new owned sequence
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// `size` zero bytes, used as the write side of a full-duplex read
    pub fn zeroed(size: usize) -> Self {
        Self {
            bytes: alloc::vec![0; size],
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Checked byte access
    pub fn at(&self, index: usize) -> Result<u8, OutOfRange> {
        self.bytes.get(index).copied().ok_or(OutOfRange {
            index,
            size: self.bytes.len(),
        })
    }

    pub fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Read-only view, valid as long as the borrow of `self`
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn iter(&self) -> core::slice::Iter<'_, u8> {
        self.bytes.iter()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl Index<usize> for Binary {
    type Output = u8;

    /// Panics when `index >= size()`
    fn index(&self, index: usize) -> &u8 {
        &self.bytes[index]
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl<const N: usize> From<[u8; N]> for Binary {
    fn from(bytes: [u8; N]) -> Self {
        Self::from_slice(&bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for Binary {
    fn from(bytes: &[u8; N]) -> Self {
        Self::from_slice(bytes)
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<u8> for Binary {
    fn from(byte: u8) -> Self {
        Self {
            bytes: alloc::vec![byte],
        }
    }
}

impl From<Binary> for Vec<u8> {
    fn from(binary: Binary) -> Self {
        binary.bytes
    }
}

impl FromIterator<u8> for Binary {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self {
            bytes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Binary {
    type Item = &'a u8;
    type IntoIter = core::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.bytes.iter()
    }
}

impl IntoIterator for Binary {
    type Item = u8;
    type IntoIter = alloc::vec::IntoIter<u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.bytes.into_iter()
    }
}

impl Add for Binary {
    type Output = Binary;

    fn add(mut self, rhs: Binary) -> Binary {
        self.bytes.extend_from_slice(&rhs.bytes);
        self
    }
}

impl Add<&Binary> for &Binary {
    type Output = Binary;

    fn add(self, rhs: &Binary) -> Binary {
        let mut bytes = Vec::with_capacity(self.size() + rhs.size());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(&rhs.bytes);
        Binary { bytes }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Binary {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:x}", self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_constructors() {
        assert!(Binary::new().is_empty());
        assert_eq!(Binary::from(0xAB).as_slice(), &[0xAB]);
        assert_eq!(Binary::from([1, 2, 3]).size(), 3);
        assert_eq!(Binary::from(vec![4, 5]).as_slice(), &[4, 5]);
        assert_eq!(Binary::from(&[6u8, 7][..]).to_vec(), vec![6, 7]);
        assert_eq!(Binary::zeroed(4).as_slice(), &[0, 0, 0, 0]);
        let collected: Binary = (0..4u8).collect();
        assert_eq!(collected.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_at_bounds() {
        let b = Binary::from([10, 20]);
        assert_eq!(b.at(1), Ok(20));
        assert_eq!(b.at(2), Err(OutOfRange { index: 2, size: 2 }));
        assert_eq!(b[0], 10);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let b = Binary::from([1]);
        let _ = b[1];
    }

    #[test]
    fn test_concat() {
        let a = Binary::from([1, 2]);
        let b = Binary::from([3]);
        assert_eq!((&a + &b).as_slice(), &[1, 2, 3]);
        assert_eq!((a + b).into_vec(), vec![1, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_concat_associative(
            a in proptest::collection::vec(any::<u8>(), 0..32),
            b in proptest::collection::vec(any::<u8>(), 0..32),
            c in proptest::collection::vec(any::<u8>(), 0..32),
        ) {
            let (a, b, c) = (Binary::from(a), Binary::from(b), Binary::from(c));
            let left = &(&a + &b) + &c;
            let right = &a + &(&b + &c);
            prop_assert_eq!(left.size(), a.size() + b.size() + c.size());
            prop_assert_eq!(left, right);
        }
    }
}
