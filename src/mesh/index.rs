//! Index types for mesh elements.
//!
//! Vertices and faces are addressed through type-safe wrappers that are generic
//! over the underlying integer type (u16 for small navigation meshes, u32 for
//! typical ones, u64 for very large terrain).

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types usable as mesh indices: `u16`, `u32` and `u64`.
pub trait MeshIndex:
    Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static
{
    /// The largest index a mesh may use.
    const MAX: Self;

    /// Narrow a `usize` index.
    ///
    /// # Panics
    /// Panics in debug builds if the value does not fit.
    fn from_usize(v: usize) -> Self;

    /// Widen to `usize`.
    fn to_usize(self) -> usize;
}

macro_rules! impl_mesh_index {
    ($($t:ty),*) => {$(
        impl MeshIndex for $t {
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(v <= <$t>::MAX as usize, "index {} overflows {}", v, stringify!($t));
                v as $t
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    )*};
}

impl_mesh_index!(u16, u32, u64);

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A type-safe face (triangle) index.
///
/// Faces are the nodes of the navigation graph, so this is the id that search
/// nodes, open/closed sets and paths carry around.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $tag:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Wrap a raw index.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// The raw index.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $tag, self.index())
            }
        }

        impl<I: MeshIndex> fmt::Display for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(FaceId, "F");
