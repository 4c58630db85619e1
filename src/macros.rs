// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Makes an object type comparable property by property.
///
/// Properties are compared in the order listed. A base type embedded in a
/// field can stand in for inheritance: its properties come first.
///
/// ```ignore
/// struct Person { name: String, age: i32 }
/// struct Patient { person: Person, illness: Option<Illness> }
///
/// deepeq::reflect!(Person { name, age });
/// deepeq::reflect!(Patient : Person => person { illness });
/// ```
///
/// Generic or path-qualified types name their type parameters up front; each
/// parameter must itself be [`Reflect`](crate::Reflect). The base of the
/// `Derived : Base` form must be a type registered with `reflect!`.
///
/// ```ignore
/// struct Page<T> { title: String, items: Vec<T> }
///
/// deepeq::reflect!(impl<T> Page<T> { title, items });
/// deepeq::reflect!(impl<> billing::Invoice { number });
/// ```
#[macro_export]
macro_rules! reflect {
    (impl<$($param:ident),* $(,)?> $ty:ty { $($field:ident),* $(,)? }) => {
        impl<$($param: $crate::Reflect),*> $crate::Reflect for $ty {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::class::<$ty>(|| {
                    ::std::vec![
                        $(
                            $crate::Property::new::<$ty, _, _>(
                                ::core::stringify!($field),
                                |owner: &$ty| &owner.$field,
                            )
                        ),*
                    ]
                })
            }
        }
    };
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::class::<$ty>(|| {
                    ::std::vec![
                        $(
                            $crate::Property::new::<$ty, _, _>(
                                ::core::stringify!($field),
                                |owner: &$ty| &owner.$field,
                            )
                        ),*
                    ]
                })
            }
        }
    };
    ($ty:ident : $base:ident => $via:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::class::<$ty>(|| {
                    #[allow(unused_mut)]
                    let mut properties =
                        $crate::Property::inherited::<$ty, $base, _>(|owner: &$ty| &owner.$via);
                    $(
                        properties.push($crate::Property::new::<$ty, _, _>(
                            ::core::stringify!($field),
                            |owner: &$ty| &owner.$field,
                        ));
                    )*
                    properties
                })
            }
        }
    };
}

/// Registers types compared with their own `==`, typically enums.
#[macro_export]
macro_rules! directly_comparable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn type_info() -> $crate::TypeInfo {
                    $crate::TypeInfo::scalar::<$ty>()
                }
            }
        )+
    };
}

/// Registers struct-like value types, compared as a whole.
#[macro_export]
macro_rules! value_type {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn type_info() -> $crate::TypeInfo {
                    $crate::TypeInfo::value::<$ty>()
                }
            }
        )+
    };
}

/// Registers types with no dedicated strategy, compared by raw value.
#[macro_export]
macro_rules! opaque_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn type_info() -> $crate::TypeInfo {
                    $crate::TypeInfo::opaque::<$ty>()
                }
            }
        )+
    };
}
