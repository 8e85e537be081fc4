/// Implement another macro for tuples of types recursively.
#[macro_export]
macro_rules! for_every_tuple {
    ($m:ident !! $head_ty:ident) => {
        $m!($head_ty);
    };
    ($m:ident !! $head_ty:ident, $($tail_ty:ident),*) => (
        $m!($head_ty, $( $tail_ty ),*);
        $crate::for_every_tuple!($m !! $( $tail_ty ),*);
    );
}

/// Apply a macro to all tuple combinations from A to Z.
#[macro_export]
macro_rules! all_tuples {
    ($m:ident) => {
        $crate::for_every_tuple!($m !! A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z);
    };
}

/// Count a list of identifiers in a const context.
#[macro_export]
macro_rules! count_idents {
    ($($name:ident),*) => {
        [$(stringify!($name)),*].len()
    };
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    struct Arity<Params>(PhantomData<Params>);

    macro_rules! test_arity_macro {
        ($($name: ident),*) => {
            #[allow(dead_code)]
            impl<$($name),*> Arity<($($name,)*)> {
                const LEN: usize = $crate::count_idents!($($name),*);
            }
        }
    }

    all_tuples!(test_arity_macro);

    #[test]
    fn tuple_arity_is_counted() {
        assert_eq!(Arity::<(u8,)>::LEN, 1);
        assert_eq!(Arity::<(u8, u16, u32)>::LEN, 3);
        assert_eq!(
            Arity::<(
                u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8,
                u8, u8, u8, u8, u8,
            )>::LEN,
            26
        );
    }
}
