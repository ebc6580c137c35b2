/*
 * Copyright (c) Radzivon Bartoshyk, 2/2025. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::cfa_error::{check_plane_len, MismatchedSize};
use crate::samples::SampleType;
use crate::strided::{PlaneView, PlaneViewMut};
use crate::CfaError;
use std::fmt::Debug;

#[derive(Debug)]
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn as_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

/// Plane storage with the container type resolved at runtime.
///
/// A decorrelation pipeline does not know its sample container until the
/// caller hands an image over, so the store is a closed sum over every
/// supported container rather than a generic parameter.
#[derive(Debug)]
pub enum PlaneStore<'a> {
    I8(BufferStoreMut<'a, i8>),
    U8(BufferStoreMut<'a, u8>),
    I16(BufferStoreMut<'a, i16>),
    U16(BufferStoreMut<'a, u16>),
    I32(BufferStoreMut<'a, i32>),
    U32(BufferStoreMut<'a, u32>),
    I64(BufferStoreMut<'a, i64>),
    U64(BufferStoreMut<'a, u64>),
    F32(BufferStoreMut<'a, f32>),
    F64(BufferStoreMut<'a, f64>),
}

impl PlaneStore<'_> {
    pub fn sample_type(&self) -> SampleType {
        match self {
            PlaneStore::I8(_) => SampleType::I8,
            PlaneStore::U8(_) => SampleType::U8,
            PlaneStore::I16(_) => SampleType::I16,
            PlaneStore::U16(_) => SampleType::U16,
            PlaneStore::I32(_) => SampleType::I32,
            PlaneStore::U32(_) => SampleType::U32,
            PlaneStore::I64(_) => SampleType::I64,
            PlaneStore::U64(_) => SampleType::U64,
            PlaneStore::F32(_) => SampleType::F32,
            PlaneStore::F64(_) => SampleType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PlaneStore::I8(b) => b.borrow().len(),
            PlaneStore::U8(b) => b.borrow().len(),
            PlaneStore::I16(b) => b.borrow().len(),
            PlaneStore::U16(b) => b.borrow().len(),
            PlaneStore::I32(b) => b.borrow().len(),
            PlaneStore::U32(b) => b.borrow().len(),
            PlaneStore::I64(b) => b.borrow().len(),
            PlaneStore::U64(b) => b.borrow().len(),
            PlaneStore::F32(b) => b.borrow().len(),
            PlaneStore::F64(b) => b.borrow().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sample containers that can be projected out of a [PlaneStore].
pub(crate) trait SampleStore: Copy + Debug + Sized + 'static {
    fn plane<'a>(store: &'a PlaneStore<'_>) -> Option<&'a [Self]>;
    fn plane_mut<'a>(store: &'a mut PlaneStore<'_>) -> Option<&'a mut [Self]>;
    fn owned(data: Vec<Self>) -> PlaneStore<'static>;
}

macro_rules! impl_sample_store {
    ($t:ty, $variant:ident) => {
        impl SampleStore for $t {
            fn plane<'a>(store: &'a PlaneStore<'_>) -> Option<&'a [Self]> {
                match store {
                    PlaneStore::$variant(b) => Some(b.borrow()),
                    _ => None,
                }
            }

            fn plane_mut<'a>(store: &'a mut PlaneStore<'_>) -> Option<&'a mut [Self]> {
                match store {
                    PlaneStore::$variant(b) => Some(b.as_mut()),
                    _ => None,
                }
            }

            fn owned(data: Vec<Self>) -> PlaneStore<'static> {
                PlaneStore::$variant(BufferStoreMut::Owned(data))
            }
        }
    };
}

impl_sample_store!(i8, I8);
impl_sample_store!(u8, U8);
impl_sample_store!(i16, I16);
impl_sample_store!(u16, U16);
impl_sample_store!(i32, I32);
impl_sample_store!(u32, U32);
impl_sample_store!(i64, I64);
impl_sample_store!(u64, U64);
impl_sample_store!(f32, F32);
impl_sample_store!(f64, F64);

/// One color/CFA component of an image.
#[derive(Debug)]
pub struct ImagePlane<'a> {
    pub store: PlaneStore<'a>,
    /// Sample precision in bits, sign bit included for signed planes.
    pub bit_depth: u32,
    /// Horizontal subsampling factor against the image nominal width.
    pub sub_x: u32,
    /// Vertical subsampling factor against the image nominal height.
    pub sub_y: u32,
    pub width: u32,
    pub height: u32,
    /// Stride here always means elements per sample step.
    pub pixel_stride: u32,
    /// Stride here always means elements per row.
    pub row_stride: u32,
}

impl ImagePlane<'_> {
    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.store.sample_type()
    }

    pub fn check_constraints(&self) -> Result<(), CfaError> {
        if self.bit_depth == 0 || self.bit_depth > self.sample_type().bits() {
            return Err(CfaError::UnsupportedBitDepth(self.bit_depth));
        }
        if self.sub_x == 0 || self.sub_y == 0 {
            return Err(CfaError::InconsistentComponents("subsampling"));
        }
        check_plane_len(
            self.store.len(),
            self.pixel_stride,
            self.row_stride,
            self.width,
            self.height,
        )
    }

    /// Allocates an owned packed plane filled with the container default.
    pub fn alloc(
        width: u32,
        height: u32,
        sample_type: SampleType,
        bit_depth: u32,
    ) -> ImagePlane<'static> {
        let len = width as usize * height as usize;
        let store = match sample_type {
            SampleType::I8 => i8::owned(vec![0; len]),
            SampleType::U8 => u8::owned(vec![0; len]),
            SampleType::I16 => i16::owned(vec![0; len]),
            SampleType::U16 => u16::owned(vec![0; len]),
            SampleType::I32 => i32::owned(vec![0; len]),
            SampleType::U32 => u32::owned(vec![0; len]),
            SampleType::I64 => i64::owned(vec![0; len]),
            SampleType::U64 => u64::owned(vec![0; len]),
            SampleType::F32 => f32::owned(vec![0.; len]),
            SampleType::F64 => f64::owned(vec![0.; len]),
        };
        ImagePlane {
            store,
            bit_depth,
            sub_x: 1,
            sub_y: 1,
            width,
            height,
            pixel_stride: 1,
            row_stride: width,
        }
    }

    pub(crate) fn view<T: SampleStore>(&self) -> Result<PlaneView<'_, T>, CfaError> {
        let data = T::plane(&self.store).ok_or(CfaError::UnsupportedSampleType {
            bit_depth: self.bit_depth,
            signed: self.sample_type().is_signed(),
            is_float: self.sample_type().is_float(),
        })?;
        check_plane_len(
            data.len(),
            self.pixel_stride,
            self.row_stride,
            self.width,
            self.height,
        )?;
        Ok(PlaneView::new(
            data,
            self.pixel_stride as usize,
            self.row_stride as usize,
            self.width as usize,
            self.height as usize,
        ))
    }

    pub(crate) fn view_mut<T: SampleStore>(&mut self) -> Result<PlaneViewMut<'_, T>, CfaError> {
        let pixel_stride = self.pixel_stride;
        let row_stride = self.row_stride;
        let width = self.width;
        let height = self.height;
        let bit_depth = self.bit_depth;
        let signed = self.sample_type().is_signed();
        let is_float = self.sample_type().is_float();
        let data = T::plane_mut(&mut self.store).ok_or(CfaError::UnsupportedSampleType {
            bit_depth,
            signed,
            is_float,
        })?;
        check_plane_len(data.len(), pixel_stride, row_stride, width, height)?;
        Ok(PlaneViewMut::new(
            data,
            pixel_stride as usize,
            row_stride as usize,
            width as usize,
            height as usize,
        ))
    }
}

/// Ordered set of components plus the image nominal size.
///
/// The component index carries channel semantics: 0 is R, Y or the CFA
/// mosaic, 1 and 2 the chroma pair or the two greens, 3 blue or delta-green,
/// depending on the layout in effect.
#[derive(Debug)]
pub struct PlanarImage<'a> {
    pub planes: Vec<ImagePlane<'a>>,
    pub width: u32,
    pub height: u32,
}

impl PlanarImage<'_> {
    #[inline]
    pub fn depth(&self) -> usize {
        self.planes.len()
    }

    pub fn check_constraints(&self) -> Result<(), CfaError> {
        if self.width == 0 || self.height == 0 {
            return Err(CfaError::ZeroBaseSize);
        }
        for plane in self.planes.iter() {
            plane.check_constraints()?;
        }
        Ok(())
    }

    pub(crate) fn expect_depth(&self, expected: usize) -> Result<(), CfaError> {
        if self.depth() != expected {
            return Err(CfaError::ComponentCountMismatch(MismatchedSize {
                expected,
                received: self.depth(),
            }));
        }
        Ok(())
    }
}

/// Checks that every plane of a slice agrees on container, precision and
/// plane geometry with the first one.
pub(crate) fn check_matching_planes(planes: &[ImagePlane<'_>]) -> Result<(), CfaError> {
    let Some(first) = planes.first() else {
        return Err(CfaError::ZeroBaseSize);
    };
    for plane in planes.iter().skip(1) {
        if plane.sample_type() != first.sample_type() {
            return Err(CfaError::InconsistentComponents("sample container"));
        }
        if plane.bit_depth != first.bit_depth {
            return Err(CfaError::InconsistentComponents("bit depth"));
        }
        if plane.width != first.width || plane.height != first.height {
            return Err(CfaError::InconsistentComponents("dimensions"));
        }
        if plane.sub_x != first.sub_x || plane.sub_y != first.sub_y {
            return Err(CfaError::InconsistentComponents("subsampling"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_produces_packed_plane() {
        let plane = ImagePlane::alloc(6, 4, SampleType::U16, 12);
        assert_eq!(plane.store.len(), 24);
        assert_eq!(plane.row_stride, 6);
        assert_eq!(plane.pixel_stride, 1);
        assert!(plane.check_constraints().is_ok());
    }

    #[test]
    fn view_rejects_container_mismatch() {
        let plane = ImagePlane::alloc(2, 2, SampleType::U8, 8);
        assert!(plane.view::<u16>().is_err());
        assert!(plane.view::<u8>().is_ok());
    }

    #[test]
    fn bit_depth_must_fit_container() {
        let mut plane = ImagePlane::alloc(2, 2, SampleType::U8, 8);
        plane.bit_depth = 9;
        assert_eq!(
            plane.check_constraints(),
            Err(CfaError::UnsupportedBitDepth(9))
        );
    }

    #[test]
    fn matching_planes_detects_disagreement() {
        let a = ImagePlane::alloc(4, 4, SampleType::U8, 8);
        let mut b = ImagePlane::alloc(4, 4, SampleType::U8, 8);
        b.bit_depth = 7;
        assert_eq!(
            check_matching_planes(&[a, b]),
            Err(CfaError::InconsistentComponents("bit depth"))
        );
    }
}
