//! The one-word storage cell and centralized unsafe operations on it.
//!
//! A [`Slot`] holds a bound callable in one of two modes, selected per
//! concrete type at compile time:
//! - **inline**: the payload's bytes live directly in the cell, or
//! - **boxed**: the cell holds the raw pointer of a heap allocation that
//!   owns the payload.
//!
//! These helpers are the single place to audit for raw slot access:
//! - inline writes (`ptr::write`), reads (`ptr::read`), and drops
//! - boxed writes (`Box::into_raw`) and drops (`Box::from_raw`)
//! - raw payload pointers for both modes
//!
//! The cell is `UnsafeCell`-backed so that the dispatch table's
//! payload-access operation can hand out write-capable pointers from a
//! shared reference; exclusivity is enforced one layer up, where the
//! wrapper only derives `&mut` payload access from `&mut self`.
//!
//! ## Core invariant
//! A slot never knows which mode it is in; the dispatch table selected for
//! the payload's type carries that knowledge. Callers must pair every slot
//! with the table that was chosen when the payload was written, and must
//! invoke inline helpers only on inline-mode slots and boxed helpers only
//! on boxed-mode slots.

use core::cell::UnsafeCell;
use core::mem::{align_of, size_of, MaybeUninit};
use core::ptr;

/// Reports whether `T` is stored directly inside the wrapper's one-word
/// storage cell.
///
/// A type qualifies when its size and alignment both fit one native
/// pointer. Rust moves are infallible bitwise relocations, so the
/// no-throw-move conditions a hand-rolled small-buffer design needs in
/// other languages hold for every Rust type and are not checked here.
///
/// The answer is a property of the type alone; it never changes over a
/// wrapper's lifetime.
#[inline]
pub const fn fits_inline<T>() -> bool {
    size_of::<T>() <= size_of::<*mut ()>() && align_of::<T>() <= align_of::<*mut ()>()
}

/// A fixed-size storage cell exactly one machine word wide.
///
/// The cell starts uninitialized and is never read before a payload is
/// written. In boxed mode only the stored pointer word is meaningful; in
/// inline mode only the payload's own bytes are.
#[repr(transparent)]
pub(crate) struct Slot(UnsafeCell<MaybeUninit<*mut ()>>);

impl Slot {
    /// Creates an empty cell. No bytes are initialized.
    #[inline]
    pub(crate) const fn uninit() -> Self {
        Self(UnsafeCell::new(MaybeUninit::uninit()))
    }

    /// Raw pointer to the cell's storage word.
    #[inline]
    fn cell(&self) -> *mut MaybeUninit<*mut ()> {
        self.0.get()
    }

    /// Writes `value` into the cell's inline bytes.
    ///
    /// # Safety
    /// - `fits_inline::<T>()` must hold.
    /// - Any payload previously held by this slot must already have been
    ///   dropped or moved out; otherwise it is leaked.
    #[inline]
    pub(crate) unsafe fn write_inline<T>(&mut self, value: T) {
        debug_assert!(fits_inline::<T>());
        // SAFETY: the cell is one word wide and word-aligned, and the
        // caller asserts `T` fits within both bounds.
        unsafe { ptr::write(self.cell().cast::<T>(), value) }
    }

    /// Moves `value` onto the heap and stores the allocation's pointer in
    /// the cell.
    ///
    /// # Safety
    /// - Any payload previously held by this slot must already have been
    ///   dropped or moved out; otherwise it is leaked.
    #[inline]
    pub(crate) unsafe fn write_boxed<T>(&mut self, value: T) {
        let raw = Box::into_raw(Box::new(value)).cast::<()>();
        // SAFETY: the cell pointer is valid and word-aligned.
        unsafe { self.cell().write(MaybeUninit::new(raw)) }
    }

    /// Returns a raw pointer to an inline-mode payload.
    ///
    /// The pointer is write-capable; callers deriving a `&mut T` from it
    /// must hold exclusive access to the slot.
    ///
    /// # Safety
    /// - The slot must hold a live `T` in inline mode.
    /// - The caller must uphold aliasing rules for any reference derived
    ///   from the returned pointer.
    #[inline]
    pub(crate) unsafe fn inline_ptr<T>(&self) -> *mut T {
        self.cell().cast::<T>()
    }

    /// Returns the raw heap pointer of a boxed-mode payload.
    ///
    /// # Safety
    /// - The slot must hold a live `T` in boxed mode.
    #[inline]
    pub(crate) unsafe fn boxed_ptr<T>(&self) -> *mut T {
        // SAFETY: the cell's word is an initialized pointer written by
        // `write_boxed`.
        unsafe { self.cell().read().assume_init() }.cast::<T>()
    }

    /// Bitwise-moves an inline-mode payload out of the cell, leaving the
    /// cell logically uninitialized.
    ///
    /// # Safety
    /// - The slot must hold a live `T` in inline mode.
    /// - The slot must not be read as a `T` again until a new payload is
    ///   written; otherwise the value is duplicated and double-dropped.
    #[inline]
    pub(crate) unsafe fn take_inline<T>(&mut self) -> T {
        // SAFETY: caller asserts a live inline `T`.
        unsafe { ptr::read(self.inline_ptr::<T>()) }
    }

    /// Copies the cell's word from `src`, relocating a boxed-mode payload
    /// by re-pointing its allocation.
    ///
    /// The source keeps a stale copy of the pointer; the caller must stop
    /// treating the source as owning the payload.
    #[inline]
    pub(crate) fn copy_word_from(&mut self, src: &Slot) {
        // SAFETY: both cell pointers are valid for one word; copying a
        // possibly-uninitialized word between `MaybeUninit` cells is
        // defined regardless of the slots' modes.
        unsafe { self.cell().write(src.cell().read()) }
    }

    /// Drops an inline-mode payload in place.
    ///
    /// # Safety
    /// - The slot must hold a live `T` in inline mode, and it must not be
    ///   read as a `T` afterwards.
    #[inline]
    pub(crate) unsafe fn drop_inline<T>(&mut self) {
        // SAFETY: caller asserts a live inline `T`.
        unsafe { ptr::drop_in_place(self.inline_ptr::<T>()) }
    }

    /// Releases a boxed-mode payload and its heap allocation.
    ///
    /// # Safety
    /// - The slot must hold a live `T` in boxed mode, and the allocation
    ///   must not have been released or re-pointed elsewhere already.
    #[inline]
    pub(crate) unsafe fn drop_boxed<T>(&mut self) {
        // SAFETY: the cell's word is a pointer produced by `Box::into_raw`
        // in `write_boxed`, still exclusively owned by this slot.
        drop(unsafe { Box::from_raw(self.boxed_ptr::<T>()) });
    }
}
