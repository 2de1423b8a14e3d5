/// Small fixed-layout record used as the element type by the binaries and tests.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub byte0: u8,
    pub word: u32,
    pub fvalue: f32,
    pub byte1: u8,
}

impl Sample {
    /// Encoded size: fields back to back, little-endian, no padding.
    pub const SIZE: usize = 10;
    pub const MARKER0: u8 = 0xEC;
    pub const MARKER1: u8 = 0xCE;

    pub fn new(word: u32) -> Self {
        Self {
            byte0: Self::MARKER0,
            word,
            fvalue: 0.1234,
            byte1: Self::MARKER1,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0] = self.byte0;
        out[1..5].copy_from_slice(&self.word.to_le_bytes());
        out[5..9].copy_from_slice(&self.fvalue.to_le_bytes());
        out[9] = self.byte1;
        out
    }

    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        Self {
            byte0: bytes[0],
            word: u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]),
            fvalue: f32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]),
            byte1: bytes[9],
        }
    }

    /// Both marker bytes intact.
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.byte0 == Self::MARKER0 && self.byte1 == Self::MARKER1
    }
}
