//! Feature-gated parallel iteration.
//!
//! With the `parallel` feature the Rayon traits are re-exported unchanged. Without it, thin
//! shims give ordinary iterators the same `into_par_iter`/`par_iter` entry points, so the
//! bond scan and the rotation loop are written once and produce identical results in both
//! builds.

#[cfg(feature = "parallel")]
pub use rayon::prelude::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator,
};

#[cfg(not(feature = "parallel"))]
pub use self::serial::*;

#[cfg(not(feature = "parallel"))]
mod serial {
    pub use std::iter::Iterator as ParallelIterator;
    pub use std::iter::Iterator as IndexedParallelIterator;

    /// Serial stand-in for Rayon's `into_par_iter()`.
    pub trait IntoParallelIterator {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Item = I::Item;
        type Iter = I::IntoIter;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }

    /// Serial stand-in for Rayon's `par_iter()` on borrowed collections.
    pub trait IntoParallelRefIterator<'data> {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn par_iter(&'data self) -> Self::Iter;
    }

    impl<'data, I: 'data + ?Sized> IntoParallelRefIterator<'data> for I
    where
        &'data I: IntoIterator,
    {
        type Item = <&'data I as IntoIterator>::Item;
        type Iter = <&'data I as IntoIterator>::IntoIter;
        fn par_iter(&'data self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_par_iter_over_range_preserves_order_on_collect() {
        let squares: Vec<usize> = (0..8usize).into_par_iter().map(|i| i * i).collect();
        assert_eq!(squares, vec![0, 1, 4, 9, 16, 25, 36, 49]);
    }

    #[test]
    fn par_iter_over_slice_flat_maps_vectors() {
        let values = vec![1, 2, 3];
        let expanded: Vec<i32> = values
            .par_iter()
            .flat_map(|&v| vec![v; v as usize])
            .collect();
        assert_eq!(expanded, vec![1, 2, 2, 3, 3, 3]);
    }
}
