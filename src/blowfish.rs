//! The Blowfish primitive as bcrypt uses it: 64-bit ECB enciphering over a mutable
//! P-array/S-box state plus the ordinary and expensive key schedules.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of Feistel rounds.
const BLF_N: usize = 16;

/// Number of P-array entries.
pub const P_LEN: usize = BLF_N + 2;

const P_ORIG: [u32; P_LEN] = [
    0x243f6a88, 0x85a308d3, 0x13198a2e, 0x03707344, 0xa4093822, 0x299f31d0,
    0x082efa98, 0xec4e6c89, 0x452821e6, 0x38d01377, 0xbe5466cf, 0x34e90c6c,
    0xc0ac29b7, 0xc97c50dd, 0x3f84d5b5, 0xb5470917, 0x9216d5d9, 0x8979fb1b,
];

const S_ORIG: [[u32; 256]; 4] = include!("sbox-init.in");

/// "OrpheanBeholderScryDoubt" as six big-endian words.
const BCRYPT_MESSAGE: [u32; 6] = [
    u32::from_be_bytes(*b"Orph"),
    u32::from_be_bytes(*b"eanB"),
    u32::from_be_bytes(*b"ehol"),
    u32::from_be_bytes(*b"derS"),
    u32::from_be_bytes(*b"cryD"),
    u32::from_be_bytes(*b"oubt"),
];

/// Raw digest length before the trailing byte is dropped.
pub const DIGEST_LEN: usize = BCRYPT_MESSAGE.len() * 4;

/// Key schedule state: the P-array and four S-boxes.
///
/// Every derivation starts from a fresh [`Blowfish::init_state`]; the state is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Blowfish {
    p: [u32; P_LEN],
    s: [[u32; 256]; 4],
}

impl Blowfish {
    /// State initialised from the published digits of pi.
    pub fn init_state() -> Self {
        Blowfish {
            p: P_ORIG,
            s: S_ORIG,
        }
    }

    pub fn p(&self) -> &[u32; P_LEN] {
        &self.p
    }

    pub fn s(&self) -> &[[u32; 256]; 4] {
        &self.s
    }

    #[inline(always)]
    fn f(&self, x: u32) -> u32 {
        let [a, b, c, d] = x.to_be_bytes();
        let h = self.s[0][usize::from(a)].wrapping_add(self.s[1][usize::from(b)]);
        (h ^ self.s[2][usize::from(c)]).wrapping_add(self.s[3][usize::from(d)])
    }

    /// Enciphers one 64-bit block given as its (left, right) halves.
    #[inline]
    pub fn encipher(&self, mut l: u32, mut r: u32) -> (u32, u32) {
        l ^= self.p[0];
        for i in (1..=BLF_N).step_by(2) {
            r ^= self.f(l) ^ self.p[i];
            l ^= self.f(r) ^ self.p[i + 1];
        }
        (r ^ self.p[BLF_N + 1], l)
    }

    fn xor_p_with_key(&mut self, key: &[u8]) {
        let mut offset = 0;
        for i in 0..P_LEN {
            self.p[i] ^= stream_to_word(key, &mut offset);
        }
    }

    /// The ordinary key schedule: P is XORed with the cyclic key stream, then P and S are
    /// rebuilt by chaining encipherments of a block starting at zero.
    pub fn expand_key(&mut self, key: &[u8]) {
        self.xor_p_with_key(key);

        let (mut l, mut r) = (0u32, 0u32);
        for i in (0..P_LEN).step_by(2) {
            (l, r) = self.encipher(l, r);
            self.p[i] = l;
            self.p[i + 1] = r;
        }

        for i in 0..4 {
            for j in (0..256).step_by(2) {
                (l, r) = self.encipher(l, r);
                self.s[i][j] = l;
                self.s[i][j + 1] = r;
            }
        }
    }

    /// The expensive key schedule seeding step: like [`expand_key`](Self::expand_key), but the
    /// running block absorbs two words of the cyclic `salt` stream before every encipherment.
    pub fn eks_expand_key(&mut self, salt: &[u8], key: &[u8]) {
        self.xor_p_with_key(key);

        let mut offset = 0;
        let (mut l, mut r) = (0u32, 0u32);
        for i in (0..P_LEN).step_by(2) {
            l ^= stream_to_word(salt, &mut offset);
            r ^= stream_to_word(salt, &mut offset);
            (l, r) = self.encipher(l, r);
            self.p[i] = l;
            self.p[i + 1] = r;
        }

        for i in 0..4 {
            for j in (0..256).step_by(2) {
                l ^= stream_to_word(salt, &mut offset);
                r ^= stream_to_word(salt, &mut offset);
                (l, r) = self.encipher(l, r);
                self.s[i][j] = l;
                self.s[i][j + 1] = r;
            }
        }
    }

    /// Enciphers the magic message 64 times under the current state.
    pub fn digest(&self) -> [u8; DIGEST_LEN] {
        let mut cdata = BCRYPT_MESSAGE;
        for _ in 0..64 {
            for j in (0..cdata.len()).step_by(2) {
                (cdata[j], cdata[j + 1]) = self.encipher(cdata[j], cdata[j + 1]);
            }
        }

        let mut out = [0u8; DIGEST_LEN];
        for (chunk, word) in out.chunks_exact_mut(4).zip(cdata) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

/// Reads the next big-endian word from `data`, treating it as circular.
/// An empty slice yields zero words.
fn stream_to_word(data: &[u8], offset: &mut usize) -> u32 {
    if data.is_empty() {
        return 0;
    }
    let mut word = 0u32;
    for _ in 0..4 {
        word = (word << 8) | u32::from(data[*offset]);
        *offset = (*offset + 1) % data.len();
    }
    word
}
