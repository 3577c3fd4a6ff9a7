//! # `smallfn` - Type-Erased Callables with Small-Buffer Optimization
//!
//! A single value type, [`SmallFn`], that holds any callable object
//! matching a fixed call signature and invokes it uniformly, without the
//! caller knowing the concrete callable's type. Small payloads are stored
//! inline in a one-word cell; everything else falls back to a single heap
//! allocation.
//!
//! ## Storage Model
//!
//! - **One-word cell**: every wrapper carries a storage cell exactly the
//!   size and alignment of a native pointer. A payload whose size and
//!   alignment both fit one word lives directly in the cell ("inline
//!   mode"); otherwise the cell holds the pointer of a heap allocation
//!   owning the payload ("boxed mode"). The mode is a compile-time
//!   property of the payload type, never inspected from the cell's bytes
//!   at runtime. [`fits_inline`] answers the question per type.
//! - **Per-type dispatch tables**: a static table of five operations
//!   (clone, relocate, drop, payload access, invoke) is built once per
//!   concrete payload type and shared by every wrapper bound to that
//!   type. A single additional table describes the unbound state; its
//!   invoke operation reports [`BadCall`] and its other operations are
//!   no-ops, so an unbound wrapper needs no branches anywhere.
//!
//! ## Value Semantics
//!
//! - **Copies are deep**: cloning a wrapper duplicates the payload, through
//!   a fresh allocation in boxed mode. The clones are fully independent.
//! - **Moves empty the source**: [`SmallFn::take`] (or `mem::take`) hands
//!   the payload to a new wrapper and leaves the source unbound.
//! - **Swap never allocates**: payloads are exchanged through a single
//!   scratch cell by three table-driven relocations, correct for any
//!   combination of inline, boxed, and unbound operands.
//! - **Exact-type recovery**: [`SmallFn::target_ref`] and
//!   [`SmallFn::target_mut`] return the payload only when the requested
//!   type is exactly the bound type.
//!
//! ## Stratified Design
//!
//! Unsafe code is concentrated in the raw layer: the storage cell module
//! owns every raw read, write, and drop, and the table module composes
//! those into per-type dispatch tables. The public wrapper only pairs
//! cells with tables and contains no raw-pointer handling of its own.
//!
//! ## Example
//!
//! ```rust
//! use smallfn::SmallFn;
//!
//! let mut greet: SmallFn<(String,), String> =
//!     SmallFn::new(|name: String| format!("hello, {name}"));
//!
//! assert!(greet.is_bound());
//! assert_eq!(greet.call(("world".into(),)).unwrap(), "hello, world");
//!
//! // Moving out leaves the source unbound, and calling it is an
//! // explicit, detectable failure rather than a crash.
//! let taken = greet.take();
//! assert!(greet.call(("again".into(),)).is_err());
//! assert_eq!(taken.call(("again".into(),)).unwrap(), "hello, again");
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod callable;
pub mod func;
mod raw;

pub use callable::Callable;
pub use func::SmallFn;
pub use raw::slot::fits_inline;
pub use raw::table::BadCall;

// Compile-time assertions for the storage layout claims above.
const _: () = {
    use crate::raw::slot::Slot;
    use core::mem;

    // The storage cell is exactly one machine word.
    assert!(mem::size_of::<Slot>() == mem::size_of::<*mut ()>());
    assert!(mem::align_of::<Slot>() == mem::align_of::<*mut ()>());

    // A wrapper is the cell plus the table reference, nothing more.
    assert!(mem::size_of::<SmallFn<(), ()>>() == 2 * mem::size_of::<usize>());

    // Inline eligibility covers payloads up to and including one word.
    assert!(fits_inline::<()>());
    assert!(fits_inline::<u8>());
    assert!(fits_inline::<fn() -> i32>());
    assert!(!fits_inline::<[usize; 2]>());
};
