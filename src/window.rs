//! Mapped register windows and the typed accessors that operate on them.
//!
//! A [`RegisterWindow`] is a read/write view of one physical register block.
//! Registers are named by their byte offset from the block base, and packed
//! per-pin settings are expressed as [`Field`]s carrying an explicit width
//! and bit offset, so every field update is a read-modify-write of the live
//! register word and never a blind overwrite of a sibling pin's bits.
//!
//! Three backings are supported, selected the same way the rest of the crate
//! selects its environment:
//! - On Xous the block is mapped with `map_memory` at page granularity and
//!   released with `unmap_memory`.
//! - With the `baremetal` feature the physical address is dereferenced
//!   directly; there is no MMU to ask.
//! - Anywhere else (including `cargo test` on the build host) the window is
//!   backed by plain RAM so register transactions can be exercised and
//!   inspected off-target.

use core::sync::atomic::{compiler_fence, Ordering};

use crate::Error;

/// Page granularity of the mapping backends.
pub const PAGE_SIZE: usize = 4096;

/// One 32-bit register, identified by its byte offset within the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    offset: usize,
}

impl Register {
    pub const fn new(offset: usize) -> Register {
        Register { offset }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }
}

/// A bit field within a [`Register`]: an unshifted mask of `width` bits plus
/// the offset of the field's first bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    mask: u32,
    offset: usize,
    register: Register,
}

impl Field {
    pub const fn new(width: usize, offset: usize, register: Register) -> Field {
        let mask = if width < 32 { (1 << width) - 1 } else { 0xFFFF_FFFF };
        Field { mask, offset, register }
    }

    pub const fn mask(&self) -> u32 {
        self.mask
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn register(&self) -> Register {
        self.register
    }
}

/// A mapped view of one physical register block.
///
/// The physical base need not be page aligned: `open` rounds it down to the
/// page and keeps the in-page correction, so register offsets are always
/// relative to the true block base. Accessing a window after `close` is a
/// programming error and panics; closing twice is a no-op.
pub struct RegisterWindow {
    /// First register of the block: page base plus the in-page correction.
    base: *mut u32,
    /// Block length in bytes, bounding all register offsets.
    len: usize,
    open: bool,
    #[cfg(target_os = "xous")]
    range: Option<xous::MemoryRange>,
    #[cfg(all(not(target_os = "xous"), not(feature = "baremetal")))]
    backing: Option<Box<[u32]>>,
}

impl RegisterWindow {
    #[cfg(target_os = "xous")]
    pub fn open(phys_base: usize, len: usize) -> Result<RegisterWindow, Error> {
        let page_base = phys_base & !(PAGE_SIZE - 1);
        let page_offset = phys_base - page_base;
        let map_len = (page_offset + len + PAGE_SIZE - 1) & !(PAGE_SIZE - 1);
        let range = xous::syscall::map_memory(
            xous::MemoryAddress::new(page_base),
            None,
            map_len,
            xous::MemoryFlags::R | xous::MemoryFlags::W,
        )
        .map_err(|e| {
            log::error!("couldn't map register block at {:#x}: {:?}", phys_base, e);
            Error::CannotMapRegisters
        })?;
        let base = unsafe { (range.as_mut_ptr() as *mut u8).add(page_offset) as *mut u32 };
        Ok(RegisterWindow { base, len, open: true, range: Some(range) })
    }

    #[cfg(feature = "baremetal")]
    pub fn open(phys_base: usize, len: usize) -> Result<RegisterWindow, Error> {
        // No MMU in the way: physical and virtual coincide, so the page
        // rounding collapses to the identity.
        Ok(RegisterWindow { base: phys_base as *mut u32, len, open: true })
    }

    #[cfg(all(not(target_os = "xous"), not(feature = "baremetal")))]
    pub fn open(phys_base: usize, len: usize) -> Result<RegisterWindow, Error> {
        let page_offset = phys_base & (PAGE_SIZE - 1);
        let map_len = (page_offset + len + PAGE_SIZE - 1) & !(PAGE_SIZE - 1);
        let mut backing = vec![0u32; map_len / 4].into_boxed_slice();
        let base = unsafe { backing.as_mut_ptr().add(page_offset / 4) };
        Ok(RegisterWindow { base, len, open: true, backing: Some(backing) })
    }

    fn ptr(&self, reg: Register) -> *mut u32 {
        assert!(self.open, "register window accessed after close");
        debug_assert!(reg.offset() % 4 == 0, "misaligned register offset {:#x}", reg.offset());
        debug_assert!(reg.offset() < self.len, "register offset {:#x} outside block", reg.offset());
        unsafe { self.base.add(reg.offset() / 4) }
    }

    /// Read the register.
    pub fn r(&self, reg: Register) -> u32 {
        // prevent re-ordering around the volatile access
        compiler_fence(Ordering::SeqCst);
        unsafe { self.ptr(reg).read_volatile() }
    }

    /// Write the whole register without reading it first.
    pub fn wo(&mut self, reg: Register, value: u32) {
        unsafe { self.ptr(reg).write_volatile(value) };
        compiler_fence(Ordering::SeqCst);
    }

    /// Read one field out of its register.
    pub fn rf(&self, field: Field) -> u32 {
        (self.r(field.register()) >> field.offset()) & field.mask()
    }

    /// Read-modify-write one field, leaving every other bit of the word as
    /// the hardware currently holds it.
    pub fn rmwf(&mut self, field: Field, value: u32) {
        let previous = self.r(field.register()) & !(field.mask() << field.offset());
        self.wo(field.register(), previous | ((value & field.mask()) << field.offset()));
    }

    /// Release the mapping. Idempotent; any later `r`/`wo` panics.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        #[cfg(target_os = "xous")]
        if let Some(range) = self.range.take() {
            if xous::syscall::unmap_memory(range).is_err() {
                log::warn!("couldn't unmap register block");
            }
        }
        #[cfg(all(not(target_os = "xous"), not(feature = "baremetal")))]
        {
            self.backing = None;
        }
    }
}

impl Drop for RegisterWindow {
    fn drop(&mut self) {
        self.close();
    }
}
