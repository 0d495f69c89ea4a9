/// Memory simulation.
///   - MemorySubsystem: flat, bounds-checked device memory
///   - Cache: sparse side-store, never consulted by the execution path

use std::collections::HashMap;

use crate::error::{Result, SimError};

/// Flat addressable byte array of fixed size.
pub struct MemorySubsystem {
    data: Vec<u8>,
}

impl MemorySubsystem {
    pub fn new(size_bytes: usize) -> Self {
        MemorySubsystem { data: vec![0u8; size_bytes] }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn read(&self, index: usize) -> Result<u8> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| SimError::out_of_range("memory", index, self.data.len()))
    }

    pub fn write(&mut self, index: usize, value: u8) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or_else(|| SimError::out_of_range("memory", index, len))?;
        *slot = value;
        Ok(())
    }

    pub fn read_bytes(&self, addr: usize, len: usize) -> Result<&[u8]> {
        let end = self.checked_end(addr, len)?;
        Ok(&self.data[addr..end])
    }

    pub fn write_bytes(&mut self, addr: usize, bytes: &[u8]) -> Result<()> {
        let end = self.checked_end(addr, bytes.len())?;
        self.data[addr..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Exclusive end of `[addr, addr + len)`, or the first out-of-range
    /// index if the span does not fit.
    fn checked_end(&self, addr: usize, len: usize) -> Result<usize> {
        let size = self.data.len();
        match addr.checked_add(len) {
            Some(end) if end <= size => Ok(end),
            _ => Err(SimError::out_of_range("memory", addr.max(size), size)),
        }
    }
}

/// Capacity-tagged address→value store.
/// Capacity is informational; it is not enforced on `set`.
/// Uses a sparse map so the full capacity is never allocated.
pub struct Cache {
    capacity_bytes: usize,
    data: HashMap<usize, i64>,
}

impl Cache {
    pub fn new(capacity_bytes: usize) -> Self {
        Cache { capacity_bytes, data: HashMap::new() }
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn get(&self, addr: usize) -> Option<i64> {
        self.data.get(&addr).copied()
    }

    pub fn set(&mut self, addr: usize, value: i64) {
        self.data.insert(addr, value);
    }

    pub fn contains(&self, addr: usize) -> bool {
        self.data.contains_key(&addr)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
