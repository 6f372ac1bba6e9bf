/// Leading byte of every delegation digest preimage
pub const DELEGATION_MAGIC: u8 = 0x05;

/// Marks the optional commitment suffix of the digest preimage
pub const COMMITMENT_FLAG: u8 = 0x01;

/// Domain tag of the intent commitment hash
pub const INTENT_NAMESPACE: &[u8] = b"delegation-target:intent";

/// secp256k1 group order halved, big-endian. Signatures with a larger `s`
/// are malleable twins and are rejected.
pub const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

pub const ETH_ADDRESS_LEN: usize = 20;
