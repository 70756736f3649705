// the bits mod contains the XNOR-popcount primitives every binarized stage reduces to.
// A `true` bit stands for +1 and `false` for -1.

/// Number of positions where the two bit sequences agree.
pub fn matches(a: &[bool], b: &[bool]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).filter(|(x, y)| x == y).count() as u32
}

/// Bipolar (+1/-1) dot product from a match count over `total` positions.
pub fn bipolar_sum(matches: u32, total: u32) -> i32 {
    (matches << 1) as i32 - total as i32
}

pub fn to_bipolar(bit: bool) -> i32 {
    if bit {
        1
    } else {
        -1
    }
}

/// Bitpacks `bits` into 64 bit words, bit `i` at word `i / 64`, position `i % 64`.
/// There will be unused space in the last word; it is left zero.
pub fn pack(bits: &[bool]) -> Vec<u64> {
    let mut words = vec![0u64; (bits.len() + 63) / 64];
    for (i, &bit) in bits.iter().enumerate() {
        words[i / 64] |= (bit as u64) << (i % 64);
    }
    words
}

/// Packed equivalent of `matches` for `len` bits.
pub fn packed_matches(a: &[u64], b: &[u64], len: usize) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    let full = len / 64;
    let mut count = 0u32;
    for i in 0..full {
        count += (!(a[i] ^ b[i])).count_ones();
    }
    let rem = len % 64;
    if rem > 0 {
        let mask = !(!0u64 << rem);
        count += (!(a[full] ^ b[full]) & mask).count_ones();
    }
    count
}
