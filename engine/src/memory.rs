//! Bump allocator over the engine's single linear memory.

/// Contiguous byte range owned by one universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Region {
    offset: usize,
    len: usize,
}

impl Region {
    /// Byte offset of the first cell.
    pub(crate) const fn offset(&self) -> usize {
        self.offset
    }

    const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Growable linear memory with first-fit reuse of released regions.
#[derive(Debug, Default)]
pub(crate) struct LinearMemory {
    bytes: Vec<u8>,
    free: Vec<Region>,
}

impl LinearMemory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reserves `len` zeroed bytes. Returns `None` when the memory cannot grow.
    pub(crate) fn allocate(&mut self, len: usize) -> Option<Region> {
        if let Some(position) = self.free.iter().position(|region| region.len == len) {
            return Some(self.free.swap_remove(position));
        }

        let offset = self.bytes.len();
        let end = offset.checked_add(len)?;
        self.bytes.try_reserve(len).ok()?;
        self.bytes.resize(end, 0);
        Some(Region { offset, len })
    }

    /// Returns a region to the free list and zeroes its contents.
    pub(crate) fn release(&mut self, region: Region) {
        self.slice_mut(region).fill(0);
        self.free.push(region);
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn slice(&self, region: Region) -> &[u8] {
        &self.bytes[region.offset..region.end()]
    }

    pub(crate) fn slice_mut(&mut self, region: Region) -> &mut [u8] {
        &mut self.bytes[region.offset..region.end()]
    }
}
