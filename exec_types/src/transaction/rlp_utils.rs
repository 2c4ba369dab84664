//! Field level helpers shared by the variant codecs.

use ethereum_types::{H160, H256};
use rlp::{DecoderError, Rlp, RlpStream};

use crate::errors::{DecodeError, DecodeResult};

/// Wraps `bytes` as a single RLP item, rejecting truncated input and
/// trailing bytes.
pub(crate) fn checked_rlp(bytes: &[u8]) -> DecodeResult<Rlp<'_>> {
    let rlp = Rlp::new(bytes);
    let info = rlp.payload_info()?;
    let total = info.header_len + info.value_len;

    match total.cmp(&bytes.len()) {
        std::cmp::Ordering::Less => Err(DecodeError::TrailingBytes(bytes.len() - total)),
        std::cmp::Ordering::Greater => Err(DecoderError::RlpIsTooShort.into()),
        std::cmp::Ordering::Equal => Ok(rlp),
    }
}

/// Checks that `rlp` is a list of exactly `expected` items.
pub(crate) fn expect_fields(rlp: &Rlp, expected: usize) -> DecodeResult<()> {
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList.into());
    }

    match rlp.item_count()? {
        got if got == expected => Ok(()),
        got => Err(DecodeError::FieldCount { expected, got }),
    }
}

/// Decodes a byte string that must be exactly `N` bytes long.
pub(crate) fn fixed_bytes<const N: usize>(
    rlp: &Rlp,
    field: &'static str,
) -> DecodeResult<[u8; N]> {
    let data = rlp.data()?;

    data.try_into().map_err(|_| DecodeError::InvalidFieldLength {
        field,
        expected: N,
        got: data.len(),
    })
}

pub(crate) fn address_at(rlp: &Rlp, idx: usize, field: &'static str) -> DecodeResult<H160> {
    Ok(H160(fixed_bytes(&rlp.at(idx)?, field)?))
}

pub(crate) fn hash_at(rlp: &Rlp, idx: usize, field: &'static str) -> DecodeResult<H256> {
    Ok(H256(fixed_bytes(&rlp.at(idx)?, field)?))
}

/// An absent address is encoded as the empty string.
pub(crate) fn optional_address_at(
    rlp: &Rlp,
    idx: usize,
    field: &'static str,
) -> DecodeResult<Option<H160>> {
    let item = rlp.at(idx)?;
    if !item.is_data() {
        return Err(DecoderError::RlpExpectedToBeData.into());
    }

    match item.is_empty() {
        true => Ok(None),
        false => Ok(Some(H160(fixed_bytes(&item, field)?))),
    }
}

pub(crate) fn append_optional_address(s: &mut RlpStream, address: &Option<H160>) {
    match address {
        Some(a) => s.append(a),
        None => s.append_empty_data(),
    };
}

/// Decodes a list of 32 byte hashes.
pub(crate) fn hash_list_at(rlp: &Rlp, idx: usize, field: &'static str) -> DecodeResult<Vec<H256>> {
    let list = rlp.at(idx)?;
    if !list.is_list() {
        return Err(DecoderError::RlpExpectedToBeList.into());
    }

    list.iter()
        .map(|item| Ok(H256(fixed_bytes(&item, field)?)))
        .collect()
}
