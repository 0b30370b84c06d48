use std::fmt;
use std::hash::Hash;

/// Default index width of the node arena.
pub type DefaultIx = u32;

/// Integer type used to address nodes inside a [`NodeArena`](crate::NodeArena).
///
/// The width of the index decides how many nodes a tree can hold: `max()` itself
/// is never handed out, so a `u8` tree stores at most 255 elements.
///
/// # Safety
///
/// `new(x).index()` must return `x` for every `x < max().index()`.
pub unsafe trait IndexType: Copy + Default + Hash + Ord + fmt::Debug + 'static {
    fn new(x: usize) -> Self;
    fn index(&self) -> usize;
    fn max() -> Self;
}

macro_rules! impl_index_type {
    ($($ty:ty),*) => {
        $(
            unsafe impl IndexType for $ty {
                #[inline(always)]
                #[allow(clippy::cast_possible_truncation)]
                fn new(x: usize) -> Self {
                    x as $ty
                }
                #[inline(always)]
                #[allow(clippy::cast_possible_truncation)]
                fn index(&self) -> usize {
                    *self as usize
                }
                #[inline(always)]
                fn max() -> Self {
                    <$ty>::MAX
                }
            }
        )*
    };
}

impl_index_type!(u8, u16, u32, u64, usize);

/// Node identifier.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct NodeIndex<Ix = DefaultIx>(Ix);

impl<Ix: IndexType> NodeIndex<Ix> {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }

    /// Number of distinct node indices available for this index width.
    #[inline]
    pub fn limit() -> usize {
        <Ix as IndexType>::max().index()
    }
}

impl<Ix: fmt::Debug> fmt::Debug for NodeIndex<Ix> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeIndex({:?})", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn node_index_keeps_its_value() {
        assert_eq!(NodeIndex::<u8>::new(17).index(), 17);
        assert_eq!(NodeIndex::<u32>::new(70_000).index(), 70_000);
        assert_eq!(NodeIndex::<u8>::limit(), 255);
    }

    #[test]
    fn node_index_debug_shows_raw_index() {
        assert_eq!(format!("{:?}", NodeIndex::<u16>::new(3)), "NodeIndex(3)");
    }
}
