use ethereum_types::H160;
use hex_literal::hex;
use secp256k1::SecretKey;

/// Address of [`signing_key`].
pub(crate) const SIGNER_ADDRESS: H160 = H160(hex!("a94f5374fce5edbc8e2a8697c15331677e6ebf0b"));

/// Unprotected legacy transfer of 10 wei to `0x095e..2d87`, signed with
/// [`signing_key`].
pub(crate) const HOMESTEAD_TX: [u8; 97] = hex!("f85f800a82c35094095e7baea6a6c7c4c2dfeb977efac326af552d870a801ba0f3266921c93d600c43f6fa4724b7abae079b35b9e95df592f95f9f3445e94c88a012f977552ebdb7a492cf35f3106df16ccb4576ebad4113056ee1f52cbe4978c1");

/// [`HOMESTEAD_TX`] with `s` replaced by `n - s` and the parity flipped.
pub(crate) const HIGH_S_HOMESTEAD_TX: [u8; 97] = hex!("f85f800a82c35094095e7baea6a6c7c4c2dfeb977efac326af552d870a801ca0f3266921c93d600c43f6fa4724b7abae079b35b9e95df592f95f9f3445e94c88a0ed0688aad142485b6d30ca0cef920e91ef6965fb02078d3650f0696011ecc880");

/// The same transfer signed for chain 1.
pub(crate) const EIP155_TX: [u8; 97] = hex!("f85f800a82c35094095e7baea6a6c7c4c2dfeb977efac326af552d870a8025a05b68ac50170b6df1ed29bf9655b74f66f42d1d2853203d570ebf19481adbb9b9a03c1b8834c76261456afe409de42082d6c353c0cc20c99d6b14890c28deaa62ce");

/// Type `0x01` transfer on chain 1 warming slot 1 of the recipient.
pub(crate) const ACCESS_LIST_TX: [u8; 157] = hex!("01f89a01800a82c35094095e7baea6a6c7c4c2dfeb977efac326af552d870a80f838f794095e7baea6a6c7c4c2dfeb977efac326af552d87e1a0000000000000000000000000000000000000000000000000000000000000000101a06de49d1ea201b65cbdff00dc03e7d5a8e12ae656484dfa54c533a21243e09000a068aef25f4f474c939ef4a195b34e52db5299eb1683c36163d9d9590d9274d720");

/// Type `0x02` version of [`ACCESS_LIST_TX`] with a tip of 1 and fee cap of
/// 10.
pub(crate) const DYNAMIC_FEE_TX: [u8; 158] = hex!("02f89b0180010a82c35094095e7baea6a6c7c4c2dfeb977efac326af552d870a80f838f794095e7baea6a6c7c4c2dfeb977efac326af552d87e1a0000000000000000000000000000000000000000000000000000000000000000180a03b5f287ead651a5ce4a1908a18d0d0e4ffb093631fa45a3d8e38289d4725ab60a05003b7fe368fb1b3fc78a67aa28cf1d291ac229d5aac023308881a71afcee6d5");

/// A widely used legacy signer test vector.
pub(crate) const RIGHTVRS_TX: [u8; 99] = hex!("f86103018207d094b94f5374fce5edbc8e2a8697c15331677e6ebf0b0a8255441ca098ff921201554726367d2be8c804a7ff89ccf285ebc57dff8ae4c44b9c19ac4aa08887321be575c8095f789dd4c743dfe42c1820f9231f98a962b210e3ac2452a3");

pub(crate) fn signing_key() -> SecretKey {
    SecretKey::from_slice(&hex!(
        "45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8"
    ))
    .unwrap()
}

pub(crate) fn common_setup() {
    // Try init since multiple tests calling `init` will cause an error.
    let _ = pretty_env_logger::try_init();
}
