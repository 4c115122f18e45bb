// Test data shared by the unit tests.

// Cycles through a short game so that the data compresses well.
pub fn pgn(len: usize) -> Vec<u8> {
    b"[Event \"Rated Blitz game\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0\n\n"
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

// xorshift64: bytes that zstd can't compress.
pub fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x9e37_79b9_7f4a_7c15_u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state.to_le_bytes()[0]
        })
        .collect()
}
