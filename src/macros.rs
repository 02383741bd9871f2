/// Declare a slot registry.
///
/// ```
/// use slot_product::domains::SetDomain;
///
/// slot_product::slot_registry! {
///     /// Facts tracked at every program point.
///     pub enum Facts(FactsTag) {
///         /// Variables holding tainted data.
///         Taint(TaintSlot): SetDomain<u32> = SetDomain::new(),
///         /// Call sites reaching this point.
///         Callers(CallersSlot): SetDomain<&'static str> = SetDomain::new(),
///     }
/// }
/// ```
///
/// This expands to:
/// - `enum Facts` with one variant per slot, holding that slot's value;
/// - `enum FactsTag`, the slot discriminant, ordered by declaration;
/// - one zero-sized marker struct per slot (`TaintSlot`, `CallersSlot`)
///   implementing [`Slot`][crate::slot::Slot];
/// - the [`Registry`][crate::slot::Registry] impl for `Facts`.
///
/// The slot's display name is the variant name. The domain initializer must
/// be a constant expression.
#[macro_export]
macro_rules! slot_registry {
    (
        $(#[$meta:meta])*
        $vis:vis enum $registry:ident ( $tag:ident ) {
            $(
                $(#[$slot_meta:meta])*
                $variant:ident ( $slot:ident ) : $domain:ty = $init:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $registry {
            $(
                $(#[$slot_meta])*
                $variant(<$domain as $crate::domain::AbstractDomain>::Element),
            )+
        }

        #[doc = concat!("Slot discriminant of [`", stringify!($registry), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $tag {
            $( $variant, )+
        }

        $(
            #[doc = concat!("Slot marker for [`", stringify!($registry), "::", stringify!($variant), "`].")]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            $vis struct $slot;

            impl $crate::slot::Slot for $slot {
                type Registry = $registry;
                type Domain = $domain;

                const NAME: &'static str = stringify!($variant);
                const TAG: $tag = $tag::$variant;
                const DOMAIN: $domain = $init;

                fn inject(self, value: $crate::slot::SlotValue<Self>) -> $registry {
                    $registry::$variant(value)
                }

                fn project(self, element: &$registry) -> Option<&$crate::slot::SlotValue<Self>> {
                    match element {
                        $registry::$variant(value) => Some(value),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn project_owned(self, element: $registry) -> Result<$crate::slot::SlotValue<Self>, $registry> {
                    match element {
                        $registry::$variant(value) => Ok(value),
                        #[allow(unreachable_patterns)]
                        other => Err(other),
                    }
                }
            }
        )+

        impl $crate::slot::Registry for $registry {
            type Tag = $tag;

            fn tag(&self) -> $tag {
                match self {
                    $( $registry::$variant(_) => $tag::$variant, )+
                }
            }

            fn accept<V: $crate::slot::SlotVisitor<Self>>(&self, visitor: V) -> V::Output {
                match self {
                    $( $registry::$variant(value) => visitor.visit($slot, value), )+
                }
            }
        }
    };
}
