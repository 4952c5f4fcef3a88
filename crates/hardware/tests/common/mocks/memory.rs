use mockall::mock;
use riscv_vp_core::common::MemoryError;
use riscv_vp_core::core::memory::PhysicalMemory;

mock! {
    pub Memory {}
    impl PhysicalMemory for Memory {
        fn size(&self) -> usize;
        fn read(&self, addr: u32, buf: &mut [u8]) -> Result<(), MemoryError>;
        fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), MemoryError>;
    }
}

/// A mock whose reads return `word` (little-endian, repeated) for any address.
pub fn memory_returning_word(word: u32) -> MockMemory {
    let mut mem = MockMemory::new();
    mem.expect_size().return_const(0x1_0000usize);
    mem.expect_read().returning(move |_, buf| {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = word.to_le_bytes()[i % 4];
        }
        Ok(())
    });
    mem
}

/// The error every access to a faulting mock returns.
pub fn out_of_range(addr: u32, size: usize) -> MemoryError {
    MemoryError::OutOfRange {
        addr,
        size,
        limit: 0,
    }
}
