//! Identifier widths
//!
//! A dictionary is generic over the unsigned integer used for its ids. The
//! [`Id`] trait captures everything the dictionary and the codecs need from
//! that integer: its size on the wire, the zero sentinel, overflow-checked
//! allocation and big-endian encoding.

use std::fmt;
use std::hash::Hash;

use bytes::{Buf, BufMut};

use crate::config::Width;

/// An unsigned identifier type usable as a dictionary id.
///
/// Implemented for `u8`, `u16` and `u32`.
pub trait Id:
    Copy + Default + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Width tag matching this type
    const WIDTH: Width;

    /// Bit size of the id
    const BITS: u32;

    /// Encoded size in bytes
    const SIZE: usize;

    /// The "absent" id, never allocated
    const ZERO: Self;

    /// Largest allocatable id
    const MAX: Self;

    /// `self + 1`, or `None` when the width is exhausted.
    fn checked_next(self) -> Option<Self>;

    /// Append the big-endian encoding of `self`.
    fn put<B: BufMut>(self, buf: &mut B);

    /// Read a big-endian id. The caller must ensure `SIZE` bytes remain.
    fn get<B: Buf>(buf: &mut B) -> Self;

    fn to_u64(self) -> u64;

    /// Narrow a `u64`, failing when it does not fit this width.
    fn from_u64(value: u64) -> Option<Self>;

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_id {
    ($ty:ty, $width:expr, $put:ident, $get:ident) => {
        impl Id for $ty {
            const WIDTH: Width = $width;
            const BITS: u32 = <$ty>::BITS;
            const SIZE: usize = std::mem::size_of::<$ty>();
            const ZERO: Self = 0;
            const MAX: Self = <$ty>::MAX;

            #[inline]
            fn checked_next(self) -> Option<Self> {
                self.checked_add(1)
            }

            #[inline]
            fn put<B: BufMut>(self, buf: &mut B) {
                buf.$put(self);
            }

            #[inline]
            fn get<B: Buf>(buf: &mut B) -> Self {
                buf.$get()
            }

            #[inline]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn from_u64(value: u64) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }
        }
    };
}

impl_id!(u8, Width::W8, put_u8, get_u8);
impl_id!(u16, Width::W16, put_u16, get_u16);
impl_id!(u32, Width::W32, put_u32, get_u32);
