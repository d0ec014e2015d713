//! CPI wire-format verification tests.
//!
//! Cross-references our CPI instruction data against the CLMM position
//! manager's decoder. Tag mismatches = calling wrong instruction.

/// These tags MUST match the position manager's instruction decoder:
///   Tag 7: SetPositionAuthority  (data: tag + new_authority[32])
///   Tag 8: CollectFees           (data: tag + amount_0 u64 + amount_1 u64)
fn build_set_authority_data(new_authority: [u8; 32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(33);
    data.push(7u8);
    data.extend_from_slice(&new_authority);
    data
}

fn build_collect_fees_data(amount_0: u64, amount_1: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(17);
    data.push(8u8);
    data.extend_from_slice(&amount_0.to_le_bytes());
    data.extend_from_slice(&amount_1.to_le_bytes());
    data
}

#[test]
fn test_set_position_authority_tag_and_length() {
    let data = build_set_authority_data([7u8; 32]);
    assert_eq!(data[0], 7, "SetPositionAuthority must be tag 7");
    assert_eq!(data.len(), 33);
    assert_eq!(&data[1..33], &[7u8; 32]);
}

#[test]
fn test_collect_fees_tag_and_length() {
    let data = build_collect_fees_data(0, 0);
    assert_eq!(data[0], 8, "CollectFees must be tag 8");
    assert_eq!(data.len(), 17);
}

#[test]
fn test_collect_fees_amounts_little_endian() {
    let data = build_collect_fees_data(0x0102030405060708, 0x1112131415161718);
    assert_eq!(&data[1..9], &0x0102030405060708u64.to_le_bytes());
    assert_eq!(&data[9..17], &0x1112131415161718u64.to_le_bytes());
}

#[test]
fn test_exact_amount_request_survives_roundtrip() {
    // The manager pays exactly the requested deltas; the encoded
    // amounts must decode back bit-for-bit.
    let data = build_collect_fees_data(12_345, 67_890);
    let a0 = u64::from_le_bytes(data[1..9].try_into().unwrap());
    let a1 = u64::from_le_bytes(data[9..17].try_into().unwrap());
    assert_eq!(a0, 12_345);
    assert_eq!(a1, 67_890);
}
