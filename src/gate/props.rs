use std::rc::Rc;
use std::sync::Arc;

/// Per-field prop comparison: by value for plain values, by reference for
/// shared handles.
///
/// Shared handles (`Arc`, `Rc`) are compared by pointer, so wrapping
/// a collection or a callback in an `Arc` makes it "the same prop" exactly
/// when the caller passes the same allocation again.
pub trait PropEq {
    fn prop_eq(&self, other: &Self) -> bool;
}

macro_rules! prop_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PropEq for $ty {
                #[inline]
                fn prop_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

prop_eq_by_value!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, str, &'static str,
);

impl<T: ?Sized> PropEq for Arc<T> {
    #[inline]
    fn prop_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> PropEq for Rc<T> {
    #[inline]
    fn prop_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: PropEq> PropEq for Option<T> {
    fn prop_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.prop_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Shallow equality over a statically declared props shape: every field is
/// compared with [`PropEq`].
///
/// Implemented for `()` and tuples; use [`shallow_eq!`](crate::shallow_eq)
/// for named structs.
pub trait ShallowEq {
    fn shallow_eq(&self, other: &Self) -> bool;
}

impl ShallowEq for () {
    fn shallow_eq(&self, _other: &Self) -> bool {
        true
    }
}

macro_rules! shallow_eq_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: PropEq),+> ShallowEq for ($($name,)+) {
            fn shallow_eq(&self, other: &Self) -> bool {
                true $(&& self.$idx.prop_eq(&other.$idx))+
            }
        }
    };
}

shallow_eq_tuple!(A: 0);
shallow_eq_tuple!(A: 0, B: 1);
shallow_eq_tuple!(A: 0, B: 1, C: 2);
shallow_eq_tuple!(A: 0, B: 1, C: 2, D: 3);
shallow_eq_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
shallow_eq_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// Implement [`ShallowEq`] for a props struct by listing the fields that
/// make up its shape.
///
/// ```
/// use std::sync::Arc;
/// use tincan_connect::{shallow_eq, ShallowEq};
///
/// struct Props {
///     title: String,
///     items: Arc<Vec<u32>>,
/// }
///
/// shallow_eq!(Props { title, items });
///
/// let items = Arc::new(vec![1, 2]);
/// let a = Props { title: "list".into(), items: Arc::clone(&items) };
/// let b = Props { title: "list".into(), items };
/// assert!(a.shallow_eq(&b));
///
/// let c = Props { title: "list".into(), items: Arc::new(vec![1, 2]) };
/// assert!(!a.shallow_eq(&c));
/// ```
#[macro_export]
macro_rules! shallow_eq {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::ShallowEq for $ty {
            fn shallow_eq(&self, other: &Self) -> bool {
                true $(&& $crate::PropEq::prop_eq(&self.$field, &other.$field))*
            }
        }
    };
}
