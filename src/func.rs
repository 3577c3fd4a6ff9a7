//! `SmallFn` - the type-erased callable wrapper.
//!
//! A `SmallFn` owns one storage cell and one dispatch-table reference. The
//! table reference always describes the cell's live content; every
//! operation here maintains that pairing, with the three-move `swap` being
//! the only place the two are transiently apart.

use core::any::TypeId;
use core::fmt;
use core::mem;

use crate::callable::Callable;
use crate::raw::slot::{fits_inline, Slot};
use crate::raw::table::{unbound_type_id, BadCall, CallTable};

/// A type-erased callable for the signature `Args -> Ret`.
///
/// Holds any [`Callable`] + `Clone` + `'static` value and invokes it
/// without static knowledge of its type. Payloads at most one word in size
/// and alignment are stored inline in the wrapper itself; larger ones live
/// in a single heap allocation. Copies are deep, moves leave the source
/// unbound, and invoking an unbound wrapper reports [`BadCall`].
///
/// ```
/// use smallfn::SmallFn;
///
/// let double: SmallFn<(i32,), i32> = SmallFn::new(|x: i32| x * 2);
/// assert!(double.is_bound());
/// assert_eq!(double.call((21,)), Ok(42));
/// ```
pub struct SmallFn<Args: 'static, Ret: 'static> {
    slot: Slot,
    table: &'static CallTable<Args, Ret>,
}

impl<Args: 'static, Ret: 'static> SmallFn<Args, Ret> {
    /// Creates a wrapper holding nothing.
    ///
    /// Calling it reports [`BadCall`] until a bound wrapper is assigned or
    /// swapped in.
    #[inline]
    pub fn unbound() -> Self {
        Self {
            slot: Slot::uninit(),
            table: CallTable::unbound(),
        }
    }

    /// Creates a wrapper bound to `f`.
    ///
    /// The storage mode and dispatch table are selected here, once, from
    /// `F` alone: if [`fits_inline::<F>()`](crate::fits_inline) holds, `f` is
    /// placed directly in the wrapper's cell, otherwise it moves into a
    /// fresh heap allocation.
    pub fn new<F>(f: F) -> Self
    where
        F: Callable<Args, Output = Ret> + Clone + 'static,
    {
        let mut slot = Slot::uninit();
        if fits_inline::<F>() {
            #[cfg(feature = "tracing")]
            tracing::trace!(payload = core::any::type_name::<F>(), "binding inline");
            // SAFETY: eligibility just checked; the slot is empty.
            unsafe { slot.write_inline(f) };
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(payload = core::any::type_name::<F>(), "binding boxed");
            // SAFETY: the slot is empty.
            unsafe { slot.write_boxed(f) };
        }
        Self {
            slot,
            table: CallTable::of::<F>(),
        }
    }

    /// Invokes the held callable with `args`.
    ///
    /// # Errors
    /// Returns [`BadCall`] when the wrapper is unbound. This is the only
    /// failure; a bound wrapper always forwards to its payload.
    #[inline]
    pub fn call(&self, args: Args) -> Result<Ret, BadCall> {
        // SAFETY: the table always describes the slot's live content.
        unsafe { (self.table.invoke)(&self.slot, args) }
    }

    /// Reports whether the wrapper currently holds a callable.
    #[inline]
    pub fn is_bound(&self) -> bool {
        (self.table.type_of)() != unbound_type_id()
    }

    /// Returns the held payload as a `&T`, if the wrapper is bound to
    /// exactly `T`.
    ///
    /// The check is exact-type matching with no substitution: a wrapper
    /// bound to any other type, or unbound, yields `None`.
    pub fn target_ref<T: 'static>(&self) -> Option<&T> {
        if (self.table.type_of)() != TypeId::of::<T>() {
            return None;
        }
        // SAFETY: the exact-type match guarantees the table is `T`'s, so
        // `payload` points at a live `T`; shared access follows `&self`.
        Some(unsafe { &*(self.table.payload)(&self.slot).cast::<T>() })
    }

    /// Returns the held payload as a `&mut T`, if the wrapper is bound to
    /// exactly `T`.
    pub fn target_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if (self.table.type_of)() != TypeId::of::<T>() {
            return None;
        }
        // SAFETY: exact-type match as in `target_ref`; exclusive access
        // follows `&mut self`.
        Some(unsafe { &mut *(self.table.payload)(&self.slot).cast::<T>() })
    }

    /// Moves the held callable into a new wrapper, leaving `self` unbound.
    ///
    /// After the call, `self.is_bound()` is `false` and invoking `self`
    /// reports [`BadCall`]; the returned wrapper owns the payload.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::unbound())
    }

    /// Exchanges the payloads and tables of two wrappers in place.
    ///
    /// No allocation is performed for any combination of storage modes.
    /// The payloads travel through a single scratch cell in three
    /// relocations, each driven by the table that currently describes its
    /// source; the table references are exchanged last, restoring the
    /// table/slot pairing before control returns.
    pub fn swap(&mut self, other: &mut Self) {
        let mut scratch = Slot::uninit();
        // SAFETY: each relocate is paired with the table describing its
        // source slot. After the three moves, `self.slot` holds other's
        // old payload and `other.slot` holds self's; the table swap below
        // makes the references agree again.
        unsafe {
            (other.table.relocate)(&mut other.slot, &mut scratch);
            (self.table.relocate)(&mut self.slot, &mut other.slot);
            (other.table.relocate)(&mut scratch, &mut self.slot);
        }
        mem::swap(&mut self.table, &mut other.table);
    }
}

impl<Args: 'static, Ret: 'static> Default for SmallFn<Args, Ret> {
    #[inline]
    fn default() -> Self {
        Self::unbound()
    }
}

impl<Args: 'static, Ret: 'static> Clone for SmallFn<Args, Ret> {
    fn clone(&self) -> Self {
        let mut slot = Slot::uninit();
        // SAFETY: the table describes `self.slot`'s live content, and the
        // fresh slot is empty. The clone preserves the storage mode, so
        // the same table describes the duplicate.
        unsafe { (self.table.clone)(&self.slot, &mut slot) };
        Self {
            slot,
            table: self.table,
        }
    }
}

impl<Args: 'static, Ret: 'static> Drop for SmallFn<Args, Ret> {
    fn drop(&mut self) {
        // SAFETY: the table describes the slot's live content; the unbound
        // table's drop is a no-op.
        unsafe { (self.table.drop)(&mut self.slot) }
    }
}

impl<Args: 'static, Ret: 'static> fmt::Debug for SmallFn<Args, Ret> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmallFn")
            .field("bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_and_call() {
        let double: SmallFn<(i32,), i32> = SmallFn::new(|x: i32| x * 2);
        assert!(double.is_bound());
        assert_eq!(double.call((4,)), Ok(8));
    }

    #[test]
    fn unbound_reports_bad_call() {
        let empty = SmallFn::<(i32,), i32>::unbound();
        assert!(!empty.is_bound());
        assert_eq!(empty.call((1,)), Err(BadCall));
        assert_eq!(SmallFn::<(), ()>::default().call(()), Err(BadCall));
    }

    #[test]
    fn exact_type_downcast() {
        #[derive(Clone, PartialEq, Debug)]
        struct Offset(i32);
        impl Callable<(i32,)> for Offset {
            type Output = i32;
            fn call(&self, (n,): (i32,)) -> i32 {
                self.0 + n
            }
        }

        let mut add: SmallFn<(i32,), i32> = SmallFn::new(Offset(40));
        assert_eq!(add.target_ref::<Offset>(), Some(&Offset(40)));
        assert_eq!(add.target_ref::<i32>(), None);

        add.target_mut::<Offset>().unwrap().0 = 10;
        assert_eq!(add.call((1,)), Ok(11));
    }

    #[test]
    fn take_leaves_source_unbound() {
        let mut source: SmallFn<(), i32> = SmallFn::new(|| 42);
        let moved = source.take();
        assert!(!source.is_bound());
        assert_eq!(source.call(()), Err(BadCall));
        assert_eq!(moved.call(()), Ok(42));
    }

    #[test]
    fn debug_output_reflects_state() {
        let bound: SmallFn<(), i32> = SmallFn::new(|| 1);
        assert_eq!(format!("{bound:?}"), "SmallFn { bound: true, .. }");
        let empty = SmallFn::<(), i32>::unbound();
        assert_eq!(format!("{empty:?}"), "SmallFn { bound: false, .. }");
    }
}
