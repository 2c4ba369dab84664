//! Define [`Nibbles`] and how to convert bytes and hex prefix encodings into
//! nibbles.

use std::fmt::{self, Debug, Display};
use std::ops::Range;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

// Use a whole byte for a Nibble just for convenience
/// A Nibble has 4 bits and is stored as `u8`.
pub type Nibble = u8;

#[derive(Clone, Debug, Eq, Error, PartialEq, Hash)]
/// Errors encountered when converting hex prefix encoding to nibbles.
pub enum FromHexPrefixError {
    #[error("Tried to convert a hex prefix byte string into `Nibbles` with invalid flags at the start: {0:#04b}")]
    /// The hex prefix encoding flag is invalid.
    InvalidFlags(Nibble),

    #[error("Tried to convert an empty hex prefix byte string into `Nibbles`")]
    /// There is no flag byte.
    Empty,
}

/// A sequence of nibbles, the path to a node in a trie.
///
/// Keys of the tries in this crate are byte strings, but paths inside the trie
/// (leaf and extension suffixes) may end on an odd nibble.
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Nibbles {
    nibbles: Vec<Nibble>,
}

impl Display for Nibbles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for n in self.nibbles.iter() {
            write!(f, "{:x}", n)?;
        }

        Ok(())
    }
}

impl Debug for Nibbles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<&[u8]> for Nibbles {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes_be(bytes)
    }
}

impl Nibbles {
    /// Splits each byte of `bytes` into its high and low nibble.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let nibbles = bytes.iter().flat_map(|b| [b >> 4, b & 0x0f]).collect();
        Self { nibbles }
    }

    /// Creates `Nibbles` from individual nibbles.
    ///
    /// # Panics
    /// Panics if any element is greater than `0xf`.
    pub fn from_nibbles(nibbles: &[Nibble]) -> Self {
        assert!(
            nibbles.iter().all(|n| *n < 16),
            "Attempted to create nibbles from a value greater than 15!"
        );

        Self {
            nibbles: nibbles.to_vec(),
        }
    }

    /// The number of nibbles.
    pub fn count(&self) -> usize {
        self.nibbles.len()
    }

    /// Returns `true` if there are no nibbles.
    pub fn is_empty(&self) -> bool {
        self.nibbles.is_empty()
    }

    /// Gets the nibble at the given index.
    ///
    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn get_nibble(&self, idx: usize) -> Nibble {
        self.nibbles[idx]
    }

    /// Borrow the nibbles as a slice.
    pub fn as_slice(&self) -> &[Nibble] {
        &self.nibbles
    }

    /// Returns the nibbles in `range`.
    pub fn get_nibble_range(&self, range: Range<usize>) -> Nibbles {
        Self {
            nibbles: self.nibbles[range].to_vec(),
        }
    }

    /// Drops the first `n` nibbles.
    pub fn truncate_n_nibbles_front(&self, n: usize) -> Nibbles {
        self.get_nibble_range(n.min(self.count())..self.count())
    }

    /// Splits into the nibbles before `idx` and the nibbles from `idx` on.
    pub fn split_at_idx(&self, idx: usize) -> (Nibbles, Nibbles) {
        let (pre, post) = self.nibbles.split_at(idx);
        (Self::from_nibbles(pre), Self::from_nibbles(post))
    }

    /// Number of leading nibbles shared with `other`.
    pub fn find_nibble_idx_that_differs(&self, other: &Nibbles) -> usize {
        self.nibbles
            .iter()
            .zip(other.nibbles.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Whether `self` is a (non strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Nibbles) -> bool {
        other.nibbles.starts_with(&self.nibbles)
    }

    /// Converts to the hex prefix encoding used in leaf and extension nodes.
    ///
    /// The first nibble carries the flags (`0b10` for leaves, `0b01` for an
    /// odd length). With an even length a padding nibble follows the flags.
    pub fn to_hex_prefix_encoding(&self, is_leaf: bool) -> Bytes {
        let odd = self.count() % 2 == 1;
        let flags = ((is_leaf as u8) << 1) | odd as u8;

        let mut buf = BytesMut::with_capacity(self.count() / 2 + 1);
        let rest = match odd {
            false => {
                buf.put_u8(flags << 4);
                &self.nibbles[..]
            }
            true => {
                buf.put_u8((flags << 4) | self.nibbles[0]);
                &self.nibbles[1..]
            }
        };

        for pair in rest.chunks_exact(2) {
            buf.put_u8((pair[0] << 4) | pair[1]);
        }

        buf.freeze()
    }

    /// Parses a hex prefix encoding, returning the nibbles and whether the
    /// encoding was for a leaf.
    pub fn from_hex_prefix_encoding(bytes: &[u8]) -> Result<(Self, bool), FromHexPrefixError> {
        let (first, rest) = bytes.split_first().ok_or(FromHexPrefixError::Empty)?;

        let flags = first >> 4;
        if flags > 3 {
            return Err(FromHexPrefixError::InvalidFlags(flags));
        }

        let mut nibbles = Vec::with_capacity(rest.len() * 2 + 1);
        if flags & 1 == 1 {
            nibbles.push(first & 0x0f);
        }
        nibbles.extend(rest.iter().flat_map(|b| [b >> 4, b & 0x0f]));

        Ok((Self { nibbles }, flags & 2 == 2))
    }

    /// Packs the nibbles back into bytes. An odd trailing nibble is placed in
    /// the high half of the last byte.
    pub fn bytes_be(&self) -> Vec<u8> {
        self.nibbles
            .chunks(2)
            .map(|c| (c[0] << 4) | c.get(1).copied().unwrap_or(0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FromHexPrefixError, Nibbles};

    #[test]
    fn from_bytes_splits_high_nibble_first() {
        let n = Nibbles::from_bytes_be(&[0x12, 0xab]);

        assert_eq!(n.as_slice(), &[1, 2, 0xa, 0xb]);
        assert_eq!(format!("{}", n), "0x12ab");
        assert_eq!(n.bytes_be(), vec![0x12, 0xab]);
    }

    #[test]
    fn hex_prefix_encoding_matches_yellow_paper() {
        // Examples from appendix C of the yellow paper.
        let cases: [(&[u8], bool, &[u8]); 6] = [
            (&[1, 2, 3, 4, 5], false, &[0x11, 0x23, 0x45]),
            (&[0, 1, 2, 3, 4, 5], false, &[0x00, 0x01, 0x23, 0x45]),
            (&[0, 0xf, 1, 0xc, 0xb, 8], true, &[0x20, 0x0f, 0x1c, 0xb8]),
            (&[0xf, 1, 0xc, 0xb, 8], true, &[0x3f, 0x1c, 0xb8]),
            (&[], false, &[0x00]),
            (&[], true, &[0x20]),
        ];

        for (nibbles, is_leaf, expected) in cases {
            let n = Nibbles::from_nibbles(nibbles);
            let encoded = n.to_hex_prefix_encoding(is_leaf);
            assert_eq!(&encoded[..], expected);

            let (decoded, decoded_is_leaf) = Nibbles::from_hex_prefix_encoding(&encoded).unwrap();
            assert_eq!(decoded, n);
            assert_eq!(decoded_is_leaf, is_leaf);
        }
    }

    #[test]
    fn hex_prefix_rejects_bad_flags() {
        assert_eq!(
            Nibbles::from_hex_prefix_encoding(&[0x40]),
            Err(FromHexPrefixError::InvalidFlags(4))
        );
        assert_eq!(
            Nibbles::from_hex_prefix_encoding(&[]),
            Err(FromHexPrefixError::Empty)
        );
    }

    #[test]
    fn common_prefix_and_truncation() {
        let a = Nibbles::from_bytes_be(&[0x12, 0x34]);
        let b = Nibbles::from_bytes_be(&[0x12, 0x56]);

        assert_eq!(a.find_nibble_idx_that_differs(&b), 2);
        assert_eq!(a.truncate_n_nibbles_front(3).as_slice(), &[4]);
        assert_eq!(a.truncate_n_nibbles_front(10), Nibbles::default());

        let (pre, post) = a.split_at_idx(1);
        assert_eq!(pre.as_slice(), &[1]);
        assert_eq!(post.as_slice(), &[2, 3, 4]);

        assert!(pre.is_prefix_of(&a));
        assert!(!a.is_prefix_of(&pre));
    }

    #[test]
    #[should_panic]
    fn from_nibbles_rejects_large_values() {
        Nibbles::from_nibbles(&[16]);
    }
}
