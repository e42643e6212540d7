//! Bytes and Bits values. Backed by owned
//! immutable buffers; any mutation returns a fresh buffer.

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BytesValue {
    pub data: Arc<Vec<u8>>,
}

impl BytesValue {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data: Arc::new(data) }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.data.len());
        let start = start.min(end);
        Self::new(self.data[start..end].to_vec())
    }

    pub fn concat(&self, other: &Self) -> Self {
        let mut out = (*self.data).clone();
        out.extend_from_slice(&other.data);
        Self::new(out)
    }

    pub fn to_hex(&self) -> String {
        self.data.iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        if s.len() % 2 != 0 {
            return Err("odd-length hex string".to_string());
        }
        let mut out = Vec::with_capacity(s.len() / 2);
        let bytes = s.as_bytes();
        for chunk in bytes.chunks(2) {
            let hi = (chunk[0] as char).to_digit(16).ok_or("invalid hex digit")?;
            let lo = (chunk[1] as char).to_digit(16).ok_or("invalid hex digit")?;
            out.push((hi * 16 + lo) as u8);
        }
        Ok(Self::new(out))
    }

    /// Printable bytes render as `@"..."`, otherwise `@x"..."`.
    pub fn display(&self) -> String {
        if self.data.iter().all(|b| (0x20..0x7f).contains(b)) {
            let text: String = self.data.iter().map(|&b| b as char).collect();
            format!("@\"{text}\"")
        } else {
            format!("@x\"{}\"", self.to_hex())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteAlign {
    Low,
    High,
}

/// MSB-first bit sequence of arbitrary length (not necessarily a multiple
/// of 8), stored packed into a byte buffer plus an explicit bit length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitsValue {
    pub data: Arc<Vec<u8>>,
    pub bit_len: usize,
}

impl BitsValue {
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut data = vec![0u8; bits.len().div_ceil(8)];
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                data[i / 8] |= 0x80 >> (i % 8);
            }
        }
        Self {
            data: Arc::new(data),
            bit_len: bits.len(),
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        Some(self.data[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.bit_len).map(|i| self.get(i).unwrap()).collect()
    }

    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.bit_len);
        let start = start.min(end);
        let bits: Vec<bool> = (start..end).map(|i| self.get(i).unwrap()).collect();
        Self::from_bools(&bits)
    }

    pub fn concat(&self, other: &Self) -> Self {
        let mut bits = self.to_bools();
        bits.extend(other.to_bools());
        Self::from_bools(&bits)
    }

    pub fn to_binary_string(&self) -> String {
        self.to_bools().iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    pub fn from_binary_string(s: &str) -> Result<Self, String> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(format!("invalid bit character `{c}`")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_bools(&bits))
    }

    /// Convert to a byte buffer, padding to a multiple of 8 bits according
    /// to `align`.
    pub fn to_bytes(&self, align: ByteAlign) -> Vec<u8> {
        let pad = (8 - self.bit_len % 8) % 8;
        if pad == 0 {
            return (*self.data).clone();
        }
        let mut bits = self.to_bools();
        match align {
            ByteAlign::Low => bits.extend(std::iter::repeat(false).take(pad)),
            ByteAlign::High => {
                let mut padded = vec![false; pad];
                padded.extend(bits);
                bits = padded;
            }
        }
        Self::from_bools(&bits).data.as_ref().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_slice_then_concat_roundtrips() {
        let b = BytesValue::new(vec![1, 2, 3, 4, 5]);
        let left = b.slice(0, 2);
        let right = b.slice(2, 5);
        assert_eq!(left.concat(&right), b);
    }

    #[test]
    fn hex_roundtrip() {
        let b = BytesValue::new(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(BytesValue::from_hex(&b.to_hex()).unwrap(), b);
    }

    #[test]
    fn bits_binary_roundtrip() {
        let bits = BitsValue::from_bools(&[true, false, true, true, false]);
        assert_eq!(
            BitsValue::from_binary_string(&bits.to_binary_string()).unwrap(),
            bits
        );
    }
}
