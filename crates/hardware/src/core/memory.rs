//! Physical Memory.
//!
//! This module defines the memory seam the CPU fetches and accesses data through. It provides:
//! 1. **Trait:** `PhysicalMemory`, a byte-addressed, bounds-checked backing store.
//! 2. **Typed Access:** Little-endian byte, half, and word helpers built on the raw accessors.
//! 3. **RAM:** `Ram`, the default 64 KiB implementation mapped at address zero.

use crate::common::constants::RAM_SIZE;
use crate::common::error::MemoryError;

/// Byte-addressed physical memory attached to the CPU.
///
/// Implementors only provide `size`, `read` and `write`. Every typed access is
/// little endian and fails with [`MemoryError::OutOfRange`] when any byte of it
/// falls outside `0..size()`.
pub trait PhysicalMemory: Send {
    /// Returns a short name for this memory (e.g., `"ram"`).
    fn name(&self) -> &str {
        "memory"
    }

    /// Returns the size of the memory in bytes.
    fn size(&self) -> usize;

    /// Copies `buf.len()` bytes starting at `addr` into `buf`.
    fn read(&self, addr: u32, buf: &mut [u8]) -> Result<(), MemoryError>;

    /// Copies `data` into memory starting at `addr`.
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), MemoryError>;

    /// Reads one byte.
    fn read_u8(&self, addr: u32) -> Result<u8, MemoryError> {
        let mut buf = [0u8; 1];
        self.read(addr, &mut buf)?;
        Ok(buf[0])
    }

    /// Reads two bytes (little-endian).
    fn read_u16(&self, addr: u32) -> Result<u16, MemoryError> {
        let mut buf = [0u8; 2];
        self.read(addr, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Reads four bytes (little-endian).
    fn read_u32(&self, addr: u32) -> Result<u32, MemoryError> {
        let mut buf = [0u8; 4];
        self.read(addr, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Writes one byte.
    fn write_u8(&mut self, addr: u32, val: u8) -> Result<(), MemoryError> {
        self.write(addr, &[val])
    }

    /// Writes two bytes (little-endian).
    fn write_u16(&mut self, addr: u32, val: u16) -> Result<(), MemoryError> {
        self.write(addr, &val.to_le_bytes())
    }

    /// Writes four bytes (little-endian).
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<(), MemoryError> {
        self.write(addr, &val.to_le_bytes())
    }
}

/// Flat RAM mapped at physical address zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    /// Creates a zero-filled RAM of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    /// Copies a program image into RAM at `offset`.
    ///
    /// # Arguments
    ///
    /// * `offset` - Physical address of the first byte.
    /// * `image` - Bytes to place.
    ///
    /// # Returns
    ///
    /// `MemoryError::OutOfRange` if the image does not fit; RAM is left untouched in that case.
    pub fn load(&mut self, offset: u32, image: &[u8]) -> Result<(), MemoryError> {
        self.write(offset, image)
    }

    /// Returns the whole RAM contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Zero-fills the RAM.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    fn range(&self, addr: u32, len: usize) -> Result<std::ops::Range<usize>, MemoryError> {
        let start = addr as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(start..end),
            _ => Err(MemoryError::OutOfRange {
                addr,
                size: len,
                limit: self.data.len(),
            }),
        }
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new(RAM_SIZE)
    }
}

impl PhysicalMemory for Ram {
    fn name(&self) -> &str {
        "ram"
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn read(&self, addr: u32, buf: &mut [u8]) -> Result<(), MemoryError> {
        let range = self.range(addr, buf.len())?;
        buf.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), MemoryError> {
        let range = self.range(addr, data.len())?;
        self.data[range].copy_from_slice(data);
        Ok(())
    }
}
