//! EIP-7685 execution layer requests.
//!
//! Requests are typed opaque payloads (deposits, withdrawal and consolidation
//! requests) committed to by the block header. The list commitment used here
//! is an SSZ list root over one chunk per request; the flat
//! [`requests_hash`] is the form adopted by later revisions of the EIP.

use ethereum_types::H256;
use exec_trie::{Merkleizer, TrieResult};
use sha2::{Digest, Sha256};

/// A typed request.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Request {
    /// The request type byte.
    pub request_type: u8,
    /// Opaque payload.
    pub data: Vec<u8>,
}

impl Request {
    /// `request_type ‖ data`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.push(self.request_type);
        out.extend_from_slice(&self.data);

        out
    }

    /// The SSZ chunk of the request: `sha256(request_type ‖ data)`.
    pub fn leaf(&self) -> H256 {
        H256(Sha256::digest(self.encode()).into())
    }
}

/// SSZ list root over the request leaves, without a length limit.
pub fn requests_root(merkleizer: &Merkleizer, requests: &[Request]) -> TrieResult<H256> {
    let leaves: Vec<_> = requests.iter().map(Request::leaf).collect();
    merkleizer.list_root(&leaves, None)
}

/// `sha256(sha256(r_0) ‖ sha256(r_1) ‖ ..)` over the encoded requests,
/// skipping requests with an empty payload.
pub fn requests_hash(requests: &[Request]) -> H256 {
    let mut hasher = Sha256::new();
    for request in requests.iter().filter(|r| !r.data.is_empty()) {
        hasher.update(Sha256::digest(request.encode()));
    }

    H256(hasher.finalize().into())
}
