//! Program Loader.
//!
//! This module places programs into physical memory before a run. It performs:
//! 1. **File reading:** Reads an image from disk into a byte buffer.
//! 2. **Format detection:** ELF images are recognised by their magic; anything else is raw.
//! 3. **ELF loading:** Copies every `PT_LOAD` segment of an ELF32 little-endian RISC-V
//!    executable to its physical address and zero-fills the remainder of the segment.
//! 4. **Raw loading:** Copies a flat binary to the configured load address.

use std::fs;
use std::path::{Path, PathBuf};

use object::read::elf::ElfFile32;
use object::{Architecture, LittleEndian, Object, ObjectSegment};
use thiserror::Error;
use tracing::{debug, info};

use crate::common::error::{MemoryError, SimError};
use crate::core::memory::PhysicalMemory;

/// ELF identification bytes.
const ELF_MAGIC: &[u8; 4] = b"\x7fELF";

/// Errors raised while loading a program.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("could not read '{path}': {source}")]
    Io {
        /// Path of the image.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The ELF image is malformed or not ELF32 little-endian.
    #[error("invalid ELF image: {0}")]
    Elf(#[from] object::read::Error),

    /// The ELF image targets another architecture.
    #[error("unsupported ELF architecture {0:?}; expected RISC-V 32-bit")]
    UnsupportedArch(Architecture),

    /// A segment or the raw image does not fit in memory.
    #[error("image does not fit in memory: {0}")]
    Memory(#[from] MemoryError),

    /// A segment address does not fit in the 32-bit physical address space.
    #[error("segment at {0:#x} is outside the 32-bit address space")]
    AddressOverflow(u64),

    /// The image contains nothing to load.
    #[error("image is empty")]
    Empty,
}

impl From<LoadError> for SimError {
    fn from(err: LoadError) -> Self {
        Self::General(err.to_string())
    }
}

/// How an image was interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    /// Flat binary copied to the load address.
    Raw,
    /// ELF executable loaded segment by segment.
    Elf,
}

/// One region written to memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedSegment {
    /// Physical start address.
    pub addr: u32,
    /// Bytes copied from the image.
    pub file_size: usize,
    /// Total bytes covered, including the zero-filled tail.
    pub mem_size: usize,
}

/// Result of loading an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedImage {
    /// Address execution should start at.
    pub entry: u32,
    /// Regions written, in load order.
    pub segments: Vec<LoadedSegment>,
    /// Detected format.
    pub kind: ImageKind,
}

/// Reads a program image from disk.
///
/// # Arguments
///
/// * `path` - Path to the image file.
///
/// # Returns
///
/// The raw bytes of the file.
pub fn load_binary(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns whether `data` starts with the ELF magic.
pub fn is_elf(data: &[u8]) -> bool {
    data.starts_with(ELF_MAGIC)
}

/// Loads `data` into `memory`, as ELF when it carries the ELF magic and raw otherwise.
///
/// Raw images are placed at `load_addr`, which is also their entry point.
pub fn load_image(
    memory: &mut dyn PhysicalMemory,
    data: &[u8],
    load_addr: u32,
) -> Result<LoadedImage, LoadError> {
    if is_elf(data) {
        load_elf(memory, data)
    } else {
        load_raw(memory, data, load_addr)
    }
}

/// Copies a flat binary to `load_addr`.
pub fn load_raw(
    memory: &mut dyn PhysicalMemory,
    data: &[u8],
    load_addr: u32,
) -> Result<LoadedImage, LoadError> {
    if data.is_empty() {
        return Err(LoadError::Empty);
    }
    memory.write(load_addr, data)?;
    info!(addr = format_args!("{load_addr:#010x}"), bytes = data.len(), "raw image loaded");
    Ok(LoadedImage {
        entry: load_addr,
        segments: vec![LoadedSegment {
            addr: load_addr,
            file_size: data.len(),
            mem_size: data.len(),
        }],
        kind: ImageKind::Raw,
    })
}

/// Loads every `PT_LOAD` segment of an ELF32 little-endian RISC-V executable.
///
/// Bytes between a segment's file size and memory size (`.bss`) are zeroed.
pub fn load_elf(memory: &mut dyn PhysicalMemory, data: &[u8]) -> Result<LoadedImage, LoadError> {
    let elf = ElfFile32::<LittleEndian>::parse(data)?;
    let arch = elf.architecture();
    if arch != Architecture::Riscv32 {
        return Err(LoadError::UnsupportedArch(arch));
    }

    let mut segments = Vec::new();
    for segment in elf.segments() {
        let mem_size = segment.size() as usize;
        if mem_size == 0 {
            continue;
        }
        let vaddr = segment.address();
        let addr = u32::try_from(vaddr).map_err(|_| LoadError::AddressOverflow(vaddr))?;
        let bytes = segment.data()?;

        memory.write(addr, bytes)?;
        if mem_size > bytes.len() {
            let tail = addr
                .checked_add(bytes.len() as u32)
                .ok_or(LoadError::AddressOverflow(vaddr))?;
            memory.write(tail, &vec![0u8; mem_size - bytes.len()])?;
        }
        debug!(
            addr = format_args!("{addr:#010x}"),
            file_size = bytes.len(),
            mem_size,
            "segment loaded"
        );
        segments.push(LoadedSegment {
            addr,
            file_size: bytes.len(),
            mem_size,
        });
    }

    if segments.is_empty() {
        return Err(LoadError::Empty);
    }

    let entry = elf.entry();
    let entry = u32::try_from(entry).map_err(|_| LoadError::AddressOverflow(entry))?;
    info!(entry = format_args!("{entry:#010x}"), segments = segments.len(), "ELF image loaded");
    Ok(LoadedImage {
        entry,
        segments,
        kind: ImageKind::Elf,
    })
}
