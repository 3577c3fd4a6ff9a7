//! Property tests: random operation sequences keep the wrapper pair
//! consistent with a trivial model.

use proptest::prelude::*;

use smallfn::{BadCall, SmallFn};

type Wrapper = SmallFn<(i64,), i64>;

/// Operations applied to a pair of wrappers.
#[derive(Debug, Clone)]
enum Op {
    BindInlineLeft(i64),
    BindBoxedLeft(i64, i64, i64),
    BindInlineRight(i64),
    BindBoxedRight(i64, i64, i64),
    CloneLeftIntoRight,
    CloneRightIntoLeft,
    TakeLeftIntoRight,
    Swap,
    UnbindLeft,
    UnbindRight,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let n = -1_000_000i64..1_000_000i64;
    prop_oneof![
        n.clone().prop_map(Op::BindInlineLeft),
        (n.clone(), n.clone(), n.clone()).prop_map(|(a, b, c)| Op::BindBoxedLeft(a, b, c)),
        n.clone().prop_map(Op::BindInlineRight),
        (n.clone(), n.clone(), n).prop_map(|(a, b, c)| Op::BindBoxedRight(a, b, c)),
        Just(Op::CloneLeftIntoRight),
        Just(Op::CloneRightIntoLeft),
        Just(Op::TakeLeftIntoRight),
        Just(Op::Swap),
        Just(Op::UnbindLeft),
        Just(Op::UnbindRight),
    ]
}

fn bind_inline(base: i64) -> Wrapper {
    SmallFn::new(move |n: i64| base + n)
}

fn bind_boxed(parts: (i64, i64, i64)) -> Wrapper {
    SmallFn::new(move |n: i64| parts.0 + parts.1 + parts.2 + n)
}

/// What a wrapper should answer for `call((arg,))`, or `None` if unbound.
fn check(w: &Wrapper, model: Option<i64>, arg: i64) {
    match model {
        Some(base) => assert_eq!(w.call((arg,)), Ok(base + arg)),
        None => assert_eq!(w.call((arg,)), Err(BadCall)),
    }
    assert_eq!(w.is_bound(), model.is_some());
}

proptest! {
    #[test]
    fn random_op_sequences_match_the_model(
        ops in proptest::collection::vec(op_strategy(), 0..64),
        probe in -1_000i64..1_000i64,
    ) {
        let mut left = Wrapper::unbound();
        let mut right = Wrapper::unbound();
        let mut left_model: Option<i64> = None;
        let mut right_model: Option<i64> = None;

        for op in ops {
            match op {
                Op::BindInlineLeft(v) => {
                    left = bind_inline(v);
                    left_model = Some(v);
                }
                Op::BindBoxedLeft(a, b, c) => {
                    left = bind_boxed((a, b, c));
                    left_model = Some(a + b + c);
                }
                Op::BindInlineRight(v) => {
                    right = bind_inline(v);
                    right_model = Some(v);
                }
                Op::BindBoxedRight(a, b, c) => {
                    right = bind_boxed((a, b, c));
                    right_model = Some(a + b + c);
                }
                Op::CloneLeftIntoRight => {
                    right = left.clone();
                    right_model = left_model;
                }
                Op::CloneRightIntoLeft => {
                    left = right.clone();
                    left_model = right_model;
                }
                Op::TakeLeftIntoRight => {
                    right = left.take();
                    right_model = left_model;
                    left_model = None;
                }
                Op::Swap => {
                    left.swap(&mut right);
                    std::mem::swap(&mut left_model, &mut right_model);
                }
                Op::UnbindLeft => {
                    left = Wrapper::unbound();
                    left_model = None;
                }
                Op::UnbindRight => {
                    right = Wrapper::unbound();
                    right_model = None;
                }
            }
            check(&left, left_model, probe);
            check(&right, right_model, probe);
        }
    }
}
