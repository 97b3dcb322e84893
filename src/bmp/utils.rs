//! BMP byte cursor, colour table, and index unpacking.
//!
//! Index unpacking forked from zune-bmp 0.5.2 by Caleb Etemesi (MIT/Apache-2.0/Zlib).

use crate::error::DecodeError;

fn overflow(what: &str, pos: usize, n: usize, len: usize) -> DecodeError {
    log::warn!("BMP {what}: {n} bytes at offset {pos} exceed {len}-byte input");
    DecodeError::BmpDataOverflow(alloc::format!(
        "{what}: {n} bytes at offset {pos} exceed {len}-byte input"
    ))
}

// ── Cursor for reading from &[u8] ───────────────────────────────────

/// Little-endian reader over the input. Every read is bounds checked.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor positioned at `pos`, which may equal `data.len()`.
    pub(crate) fn at(data: &'a [u8], pos: usize) -> Result<Self, DecodeError> {
        if pos > data.len() {
            return Err(overflow("seek", pos, 0, data.len()));
        }
        Ok(Self { data, pos })
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Advance by up to `n` bytes, stopping at the end of input.
    pub(crate) fn skip_saturating(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.data.len());
    }

    /// Next byte, or `None` at end of input.
    pub(crate) fn next_u8(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    pub(crate) fn read_fixed_bytes<const N: usize>(
        &mut self,
        what: &str,
    ) -> Result<[u8; N], DecodeError> {
        let end = self
            .pos
            .checked_add(N)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| overflow(what, self.pos, N, self.data.len()))?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(buf)
    }

    pub(crate) fn get_u16_le(&mut self, what: &str) -> Result<u16, DecodeError> {
        self.read_fixed_bytes::<2>(what).map(u16::from_le_bytes)
    }

    pub(crate) fn get_u32_le(&mut self, what: &str) -> Result<u32, DecodeError> {
        self.read_fixed_bytes::<4>(what).map(u32::from_le_bytes)
    }

    pub(crate) fn get_i32_le(&mut self, what: &str) -> Result<i32, DecodeError> {
        self.read_fixed_bytes::<4>(what).map(i32::from_le_bytes)
    }
}

// ── Colour table ────────────────────────────────────────────────────

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub(crate) struct PaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl PaletteEntry {
    pub(crate) fn rgb(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Colour table as far as it is present in the input.
pub(crate) struct Palette {
    entries: [PaletteEntry; 256],
    len: usize,
}

impl Palette {
    /// Read up to `max_entries` BGR(X) entries of `entry_size` bytes starting
    /// at `offset`. Entries that would run past the input are not read.
    pub(crate) fn read(data: &[u8], offset: usize, entry_size: usize, max_entries: usize) -> Self {
        let mut entries = [PaletteEntry::default(); 256];
        let table = data.get(offset..).unwrap_or_default();
        let mut len = 0;
        for (slot, raw) in entries
            .iter_mut()
            .zip(table.chunks_exact(entry_size))
            .take(max_entries)
        {
            *slot = PaletteEntry {
                red: raw[2],
                green: raw[1],
                blue: raw[0],
            };
            len += 1;
        }
        Self { entries, len }
    }

    pub(crate) fn get(&self, index: u8) -> Result<PaletteEntry, DecodeError> {
        let idx = usize::from(index);
        if idx >= self.len {
            log::warn!("BMP palette index {idx} beyond the {} entries present", self.len);
            return Err(DecodeError::BmpDataOverflow(alloc::format!(
                "palette index {idx} out of range (colour table has {} entries)",
                self.len
            )));
        }
        Ok(self.entries[idx])
    }
}

// ── Index unpacking ─────────────────────────────────────────────────

/// Expand packed 1, 4, or 8 bit indices (MSB first) into one byte each.
///
/// `out.len()` decides how many indices are produced; `input` must hold at
/// least `ceil(out.len() * depth / 8)` bytes.
pub(crate) fn expand_indices(depth: u16, input: &[u8], out: &mut [u8]) {
    match depth {
        1 => {
            let mut in_iter = input.iter();
            let mut out_iter = out.chunks_exact_mut(8);

            (&mut out_iter)
                .zip(&mut in_iter)
                .for_each(|(out_vals, in_val)| {
                    for (bit, v) in out_vals.iter_mut().enumerate() {
                        *v = (in_val >> (7 - bit)) & 0x01;
                    }
                });

            if let Some(in_val) = in_iter.next() {
                let remainder_iter = out_iter.into_remainder().iter_mut();
                remainder_iter.enumerate().for_each(|(pos, out_val)| {
                    *out_val = (in_val >> (7 - pos)) & 0x01;
                });
            }
        }
        4 => {
            let mut in_iter = input.iter();
            let mut out_iter = out.chunks_exact_mut(2);

            (&mut out_iter)
                .zip(&mut in_iter)
                .for_each(|(out_vals, in_val)| {
                    out_vals[0] = (in_val >> 4) & 0x0f;
                    out_vals[1] = in_val & 0x0f;
                });

            if let Some(in_val) = in_iter.next() {
                if let Some(out_val) = out_iter.into_remainder().first_mut() {
                    *out_val = (in_val >> 4) & 0x0f;
                }
            }
        }
        _ => {
            let n = out.len().min(input.len());
            out[..n].copy_from_slice(&input[..n]);
        }
    }
}
