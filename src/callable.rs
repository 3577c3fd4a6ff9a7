//! The signature bridge between argument tuples and the `Fn` traits.
//!
//! A fixed call signature is spelled as an argument tuple plus an output
//! type: `SmallFn<(i32, i32), bool>` holds any callable taking two `i32`s
//! and returning `bool`. [`Callable`] is the trait that carries that
//! spelling; blanket impls cover closures and function pointers of arity
//! zero through eight, and hand-written impls let named types act as
//! callables without the unstable `Fn` traits.

/// A callable object for one fixed signature.
///
/// `Args` is the argument tuple; [`Callable::Output`] is the return type.
/// Any `Fn(A, B, ...) -> R` automatically implements
/// `Callable<(A, B, ...), Output = R>` up to eight arguments. Implement the
/// trait directly to make a named struct invokable through
/// [`SmallFn`](crate::SmallFn):
///
/// ```
/// use smallfn::{Callable, SmallFn};
///
/// #[derive(Clone)]
/// struct Adder {
///     base: i32,
/// }
///
/// impl Callable<(i32,)> for Adder {
///     type Output = i32;
///     fn call(&self, (n,): (i32,)) -> i32 {
///         self.base + n
///     }
/// }
///
/// let add: SmallFn<(i32,), i32> = SmallFn::new(Adder { base: 40 });
/// assert_eq!(add.call((2,)), Ok(42));
/// ```
pub trait Callable<Args> {
    /// The type returned by the call.
    type Output;

    /// Calls the object with the given argument tuple.
    fn call(&self, args: Args) -> Self::Output;
}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<Fun, Ret, $($arg),*> Callable<($($arg,)*)> for Fun
        where
            Fun: Fn($($arg),*) -> Ret,
        {
            type Output = Ret;

            #[allow(non_snake_case)]
            #[inline]
            fn call(&self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_callable!();
impl_callable!(A);
impl_callable!(A, B);
impl_callable!(A, B, C);
impl_callable!(A, B, C, D);
impl_callable!(A, B, C, D, E);
impl_callable!(A, B, C, D, E, F);
impl_callable!(A, B, C, D, E, F, G);
impl_callable!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_of_various_arities() {
        assert_eq!(Callable::call(&|| 1, ()), 1);
        assert_eq!(Callable::call(&|a: i32| a + 1, (1,)), 2);
        assert_eq!(Callable::call(&|a: i32, b: i32| a * b, (6, 7)), 42);
        assert_eq!(
            Callable::call(&|a: u8, b: u8, c: u8, d: u8| u32::from(a + b + c + d), (1, 2, 3, 4)),
            10
        );
    }

    #[test]
    fn function_pointers() {
        fn double(x: i32) -> i32 {
            x * 2
        }
        let f: fn(i32) -> i32 = double;
        assert_eq!(Callable::call(&f, (21,)), 42);
    }

    #[test]
    fn hand_written_impl() {
        #[derive(Clone)]
        struct Joiner(&'static str);
        impl Callable<(String, String)> for Joiner {
            type Output = String;
            fn call(&self, (a, b): (String, String)) -> String {
                format!("{a}{}{b}", self.0)
            }
        }

        let joiner = Joiner("-");
        assert_eq!(joiner.call(("a".into(), "b".into())), "a-b");
    }
}
