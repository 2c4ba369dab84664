use bytes::Bytes;
use ethereum_types::H256;
use keccak_hash::keccak;
use rlp::RlpStream;

use crate::nibbles::Nibbles;

/// The node type used for calculating the hash of a trie.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub(crate) enum EncodedNode {
    /// Node that is RLPed but not hashed.
    Raw(Bytes),
    /// Node that is hashed.
    Hashed([u8; 32]),
}

impl From<&EncodedNode> for H256 {
    fn from(v: &EncodedNode) -> Self {
        match v {
            EncodedNode::Raw(b) => H256(hash_bytes(b)),
            EncodedNode::Hashed(h) => H256(*h),
        }
    }
}

pub(crate) fn encode_empty() -> EncodedNode {
    EncodedNode::Raw(Bytes::from_static(&rlp::NULL_RLP))
}

pub(crate) fn encode_leaf(nibbles: &Nibbles, value: &[u8]) -> EncodedNode {
    let hex_prefix_k = nibbles.to_hex_prefix_encoding(true);
    let mut stream = RlpStream::new_list(2);

    stream.append(&hex_prefix_k.as_ref());
    stream.append(&value);

    hash_bytes_if_large_enough(stream.out().into())
}

pub(crate) fn encode_extension(nibbles: &Nibbles, child: EncodedNode) -> EncodedNode {
    let mut stream = RlpStream::new_list(2);

    stream.append(&nibbles.to_hex_prefix_encoding(false).as_ref());
    append_to_stream(&mut stream, child);

    hash_bytes_if_large_enough(stream.out().into())
}

/// Children must yield exactly 16 entries.
pub(crate) fn encode_branch(
    children: impl IntoIterator<Item = EncodedNode>,
    value: &[u8],
) -> EncodedNode {
    let mut stream = RlpStream::new_list(17);

    for c in children {
        append_to_stream(&mut stream, c);
    }

    match value.is_empty() {
        false => stream.append(&value),
        true => stream.append_empty_data(),
    };

    hash_bytes_if_large_enough(stream.out().into())
}

fn hash_bytes_if_large_enough(bytes: Bytes) -> EncodedNode {
    match bytes.len() >= 32 {
        false => EncodedNode::Raw(bytes),
        true => EncodedNode::Hashed(hash_bytes(&bytes)),
    }
}

fn append_to_stream(s: &mut RlpStream, node: EncodedNode) {
    match node {
        EncodedNode::Raw(b) => s.append_raw(&b, 1),
        EncodedNode::Hashed(h) => s.append(&h.as_ref()),
    };
}

pub(crate) fn hash_bytes(bytes: &[u8]) -> [u8; 32] {
    keccak(bytes).0
}
