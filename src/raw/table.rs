//! Per-type dispatch tables driving the opaque storage cell.
//!
//! A [`CallTable`] is a fixed set of function pointers that knows how to
//! clone, relocate, drop, expose, and invoke one concrete payload type
//! inside a [`Slot`], without the wrapper holding that type statically.
//! One table exists per concrete callable type, built once as a promoted
//! constant and shared by every wrapper bound to that type. A single
//! additional table describes the unbound state; its operations are no-ops
//! except `invoke`, which always reports [`BadCall`].
//!
//! Tables are immutable after construction, so sharing the references
//! across instances and threads is sound.

use core::any::TypeId;
use core::fmt;

use crate::callable::Callable;
use crate::raw::slot::{fits_inline, Slot};

/// The failure reported when an unbound wrapper is invoked.
///
/// Carried in the `Err` variant of [`SmallFn::call`](crate::SmallFn::call)
/// so that "the wrapper held nothing" is distinguishable from any value the
/// held callable could return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadCall;

impl fmt::Display for BadCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invoked an unbound callable wrapper")
    }
}

impl std::error::Error for BadCall {}

/// The dispatch table for one concrete payload type.
///
/// Every operation receives the storage cell it is to act on; the table
/// itself is stateless. The `unsafe fn` contracts all reduce to the same
/// pairing rule: the slot passed in must currently hold the payload type
/// this table was built for, in the storage mode this table selected.
pub(crate) struct CallTable<Args, Ret> {
    /// Duplicates the payload from `src` into `dst`, preserving mode.
    /// Boxed payloads are deep-copied through a fresh allocation.
    pub(crate) clone: unsafe fn(src: &Slot, dst: &mut Slot),
    /// Relocates the payload from `src` into `dst`. The source cell is
    /// left logically dead; updating the source's table reference is the
    /// caller's responsibility.
    pub(crate) relocate: unsafe fn(src: &mut Slot, dst: &mut Slot),
    /// Releases the payload held by the cell.
    pub(crate) drop: unsafe fn(slot: &mut Slot),
    /// Returns a pointer to the live payload without transferring
    /// ownership. Null for the unbound table.
    pub(crate) payload: unsafe fn(slot: &Slot) -> *mut (),
    /// Calls the live payload with `args`.
    pub(crate) invoke: unsafe fn(slot: &Slot, args: Args) -> Result<Ret, BadCall>,
    /// Reports the exact payload type for downcasts and bound checks.
    pub(crate) type_of: fn() -> TypeId,
}

/// Marker reported by the unbound table's `type_of`. Never constructed,
/// never nameable outside the crate, so no payload can collide with it.
enum Unbound {}

/// The [`TypeId`] the unbound table reports.
#[inline]
pub(crate) fn unbound_type_id() -> TypeId {
    TypeId::of::<Unbound>()
}

impl<Args: 'static, Ret: 'static> CallTable<Args, Ret> {
    /// Returns the shared table for payload type `F`.
    ///
    /// The table is a promoted constant: one static instance per `F`,
    /// reused by every wrapper holding an `F`.
    pub(crate) fn of<F>() -> &'static Self
    where
        F: Callable<Args, Output = Ret> + Clone + 'static,
    {
        const {
            &CallTable {
                clone: clone_payload::<F>,
                relocate: relocate_payload::<F>,
                drop: drop_payload::<F>,
                payload: payload_ptr::<F>,
                invoke: invoke_payload::<F, Args>,
                type_of: TypeId::of::<F>,
            }
        }
    }

    /// Returns the shared table describing the unbound state.
    pub(crate) fn unbound() -> &'static Self {
        const {
            &CallTable {
                clone: clone_nothing,
                relocate: relocate_nothing,
                drop: drop_nothing,
                payload: payload_null,
                invoke: invoke_unbound::<Args, Ret>,
                type_of: unbound_type_id,
            }
        }
    }
}

/// Duplicates a live `F`, preserving the storage mode chosen for `F`.
///
/// # Safety
/// `src` must hold a live `F`; `dst` must hold nothing.
unsafe fn clone_payload<F: Clone>(src: &Slot, dst: &mut Slot) {
    if fits_inline::<F>() {
        // SAFETY: inline mode per this table's type selection.
        let payload = unsafe { &*src.inline_ptr::<F>() };
        let duplicate = payload.clone();
        // SAFETY: `dst` is empty per the caller contract.
        unsafe { dst.write_inline(duplicate) };
    } else {
        // SAFETY: boxed mode per this table's type selection.
        let payload = unsafe { &*src.boxed_ptr::<F>() };
        let duplicate = payload.clone();
        // SAFETY: `dst` is empty per the caller contract.
        unsafe { dst.write_boxed(duplicate) };
    }
}

/// Relocates a live `F` from `src` to `dst`.
///
/// Inline payloads move by a typed bitwise read; boxed payloads move by
/// re-pointing the allocation. Either way `src` is left logically dead.
///
/// # Safety
/// `src` must hold a live `F`; `dst` must hold nothing. After the call,
/// `src` must not be treated as holding a payload.
unsafe fn relocate_payload<F>(src: &mut Slot, dst: &mut Slot) {
    if fits_inline::<F>() {
        // SAFETY: inline mode; the value is read out exactly once.
        let value = unsafe { src.take_inline::<F>() };
        // SAFETY: `dst` is empty per the caller contract.
        unsafe { dst.write_inline(value) };
    } else {
        dst.copy_word_from(src);
    }
}

/// Releases a live `F`.
///
/// # Safety
/// The slot must hold a live `F`, not dropped or moved out before.
unsafe fn drop_payload<F>(slot: &mut Slot) {
    if fits_inline::<F>() {
        // SAFETY: inline mode, live payload per the caller contract.
        unsafe { slot.drop_inline::<F>() };
    } else {
        // SAFETY: boxed mode, allocation still owned by this slot.
        unsafe { slot.drop_boxed::<F>() };
    }
}

/// Returns a pointer to the live `F` without transferring ownership.
///
/// # Safety
/// The slot must hold a live `F`.
unsafe fn payload_ptr<F>(slot: &Slot) -> *mut () {
    if fits_inline::<F>() {
        // SAFETY: inline mode per this table's type selection.
        unsafe { slot.inline_ptr::<F>() }.cast::<()>()
    } else {
        // SAFETY: boxed mode per this table's type selection.
        unsafe { slot.boxed_ptr::<F>() }.cast::<()>()
    }
}

/// Invokes the live `F` with `args`.
///
/// # Safety
/// The slot must hold a live `F`.
#[allow(clippy::unnecessary_wraps)]
unsafe fn invoke_payload<F, Args>(slot: &Slot, args: Args) -> Result<F::Output, BadCall>
where
    F: Callable<Args> + 'static,
{
    // SAFETY: live `F` per the caller contract; shared access only.
    let payload = unsafe { &*payload_ptr::<F>(slot).cast::<F>() };
    Ok(payload.call(args))
}

unsafe fn clone_nothing(_src: &Slot, _dst: &mut Slot) {}

unsafe fn relocate_nothing(_src: &mut Slot, _dst: &mut Slot) {}

unsafe fn drop_nothing(_slot: &mut Slot) {}

unsafe fn payload_null(_slot: &Slot) -> *mut () {
    core::ptr::null_mut()
}

unsafe fn invoke_unbound<Args, Ret>(_slot: &Slot, _args: Args) -> Result<Ret, BadCall> {
    Err(BadCall)
}
