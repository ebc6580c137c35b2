/*
 * Copyright (c) Radzivon Bartoshyk, 4/2025. All rights reserved.
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
use crate::images::{ImagePlane, PlanarImage, SampleStore};
use crate::internals::{
    packed_chroma_codec, packed_luma_codec, packed_plane_type, MAX_LIFT_BIT_DEPTH,
};
use crate::numerics::{clamp_sample, sample_range, ChromaCodec};
use crate::rct_lifting::packed_source_type;
use crate::samples::dispatch_lift_pair;
use crate::{CfaError, ChromaMode};
use num_traits::AsPrimitive;

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Trafo422 {
    Rct = 0,
    YCgCo = 1,
}

impl From<u8> for Trafo422 {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => Trafo422::Rct,
            1 => Trafo422::YCgCo,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

fn c422_forward_impl<T, C, const KIND: u8>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    luma: ChromaCodec,
    chroma: ChromaCodec,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    let kind: Trafo422 = KIND.into();
    let gv = src[0].view::<T>()?;
    let rv = src[1].view::<T>()?;
    let bv = src[2].view::<T>()?;
    let [y_plane, c1_plane, c2_plane] = dst else {
        return Err(CfaError::ZeroBaseSize);
    };
    let mut yv = y_plane.view_mut::<C>()?;
    let mut c1v = c1_plane.view_mut::<C>()?;
    let mut c2v = c2_plane.view_mut::<C>()?;
    let half_w = src[1].width as usize;
    let height = src[1].height as usize;
    for y in 0..height {
        for cx in 0..half_w {
            let g0: i64 = gv.get(2 * cx, y).as_();
            let g1: i64 = gv.get(2 * cx + 1, y).as_();
            let r: i64 = rv.get(cx, y).as_();
            let b: i64 = bv.get(cx, y).as_();
            // Chroma comes from the pair's first luma sample only.
            let (y0, y1, c1, c2) = match kind {
                Trafo422::Rct => {
                    let cb = b - g0;
                    let cr = r - g0;
                    let t = (cb + cr) >> 2;
                    (g0 + t, g1 + t, cb, cr)
                }
                Trafo422::YCgCo => {
                    let co = r - b;
                    let t = b + (co >> 1);
                    let cg = g0 - t;
                    let half = cg - (cg >> 1);
                    (g0 - half, g1 - half, cg, co)
                }
            };
            yv.set(2 * cx, y, luma.encode(y0).as_());
            yv.set(2 * cx + 1, y, luma.encode(y1).as_());
            c1v.set(cx, y, chroma.encode(c1).as_());
            c2v.set(cx, y, chroma.encode(c2).as_());
        }
    }
    Ok(())
}

fn c422_inverse_impl<T, C, const KIND: u8>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    luma: ChromaCodec,
    chroma: ChromaCodec,
    min: i64,
    max: i64,
) -> Result<(), CfaError>
where
    T: SampleStore,
    C: SampleStore + AsPrimitive<i64>,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    let kind: Trafo422 = KIND.into();
    let yv = src[0].view::<C>()?;
    let c1v = src[1].view::<C>()?;
    let c2v = src[2].view::<C>()?;
    let [g_plane, r_plane, b_plane] = dst else {
        return Err(CfaError::ZeroBaseSize);
    };
    let mut gv = g_plane.view_mut::<T>()?;
    let mut rv = r_plane.view_mut::<T>()?;
    let mut bv = b_plane.view_mut::<T>()?;
    let half_w = src[1].width as usize;
    let height = src[1].height as usize;
    for y in 0..height {
        for cx in 0..half_w {
            let y0 = luma.decode(yv.get(2 * cx, y).as_());
            let y1 = luma.decode(yv.get(2 * cx + 1, y).as_());
            let c1 = chroma.decode(c1v.get(cx, y).as_());
            let c2 = chroma.decode(c2v.get(cx, y).as_());
            let (g0, g1, r, b) = match kind {
                Trafo422::Rct => {
                    let t = (c1 + c2) >> 2;
                    let g0 = y0 - t;
                    let g1 = y1 - t;
                    (g0, g1, c2 + g0, c1 + g0)
                }
                Trafo422::YCgCo => {
                    let half = c1 - (c1 >> 1);
                    let g0 = y0 + half;
                    let g1 = y1 + half;
                    let t = g0 - c1;
                    let b = t - (c2 >> 1);
                    (g0, g1, b + c2, b)
                }
            };
            gv.set(2 * cx, y, clamp_sample(g0, min, max).as_());
            gv.set(2 * cx + 1, y, clamp_sample(g1, min, max).as_());
            rv.set(cx, y, clamp_sample(r, min, max).as_());
            bv.set(cx, y, clamp_sample(b, min, max).as_());
        }
    }
    Ok(())
}

fn rct422_forward_entry<T, C>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    luma: ChromaCodec,
    chroma: ChromaCodec,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    c422_forward_impl::<T, C, { Trafo422::Rct as u8 }>(src, dst, luma, chroma)
}

fn ycgco422_forward_entry<T, C>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    luma: ChromaCodec,
    chroma: ChromaCodec,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    c422_forward_impl::<T, C, { Trafo422::YCgCo as u8 }>(src, dst, luma, chroma)
}

fn rct422_inverse_entry<T, C>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    luma: ChromaCodec,
    chroma: ChromaCodec,
    min: i64,
    max: i64,
) -> Result<(), CfaError>
where
    T: SampleStore,
    C: SampleStore + AsPrimitive<i64>,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    c422_inverse_impl::<T, C, { Trafo422::Rct as u8 }>(src, dst, luma, chroma, min, max)
}

fn ycgco422_inverse_entry<T, C>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    luma: ChromaCodec,
    chroma: ChromaCodec,
    min: i64,
    max: i64,
) -> Result<(), CfaError>
where
    T: SampleStore,
    C: SampleStore + AsPrimitive<i64>,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    c422_inverse_impl::<T, C, { Trafo422::YCgCo as u8 }>(src, dst, luma, chroma, min, max)
}

fn check_c422_shape(image: &PlanarImage<'_>) -> Result<(), CfaError> {
    image.expect_depth(3)?;
    image.check_constraints()?;
    let luma = &image.planes[0];
    if luma.width != image.width || luma.height != image.height || luma.width & 1 != 0 {
        return Err(CfaError::InvalidDimensions {
            width: luma.width,
            height: luma.height,
        });
    }
    let half_w = luma.width / 2;
    for plane in image.planes.iter().skip(1) {
        if plane.sample_type() != luma.sample_type() {
            return Err(CfaError::InconsistentComponents("sample container"));
        }
        if plane.bit_depth != luma.bit_depth {
            return Err(CfaError::InconsistentComponents("bit depth"));
        }
        if plane.width != half_w || plane.height != luma.height {
            return Err(CfaError::InconsistentComponents("dimensions"));
        }
    }
    if luma.sample_type().is_float() {
        return Err(CfaError::UnsupportedSampleType {
            bit_depth: luma.bit_depth,
            signed: luma.sample_type().is_signed(),
            is_float: true,
        });
    }
    Ok(())
}

fn c422_alloc(
    template: &PlanarImage<'_>,
    sample_type: crate::SampleType,
    bit_depth: u32,
) -> Vec<ImagePlane<'static>> {
    let luma = &template.planes[0];
    let half_w = luma.width / 2;
    let mut planes = vec![ImagePlane::alloc(
        luma.width,
        luma.height,
        sample_type,
        bit_depth,
    )];
    for _ in 0..2 {
        let mut plane = ImagePlane::alloc(half_w, luma.height, sample_type, bit_depth);
        plane.sub_x = 2;
        planes.push(plane);
    }
    planes
}

fn c422_forward(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
    ycgco: bool,
) -> Result<PlanarImage<'static>, CfaError> {
    check_c422_shape(image)?;
    let luma_plane = &image.planes[0];
    if luma_plane.bit_depth > MAX_LIFT_BIT_DEPTH {
        return Err(CfaError::UnsupportedBitDepth(luma_plane.bit_depth));
    }
    let luma_ty = luma_plane.sample_type();
    let depth = luma_plane.bit_depth;
    let packed_ty = packed_plane_type(luma_ty, depth)?;
    let luma_codec = packed_luma_codec(luma_ty, depth);
    let chroma_codec = packed_chroma_codec(luma_ty, depth, mode);

    let mut dst = c422_alloc(image, packed_ty, depth + 1);

    if ycgco {
        dispatch_lift_pair!(
            luma_ty,
            packed_ty,
            ycgco422_forward_entry(&image.planes, &mut dst, luma_codec, chroma_codec)
        )?;
    } else {
        dispatch_lift_pair!(
            luma_ty,
            packed_ty,
            rct422_forward_entry(&image.planes, &mut dst, luma_codec, chroma_codec)
        )?;
    }

    Ok(PlanarImage {
        planes: dst,
        width: image.width,
        height: image.height,
    })
}

fn c422_inverse(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
    ycgco: bool,
) -> Result<PlanarImage<'static>, CfaError> {
    check_c422_shape(image)?;
    let (luma_ty, depth) = packed_source_type(&image.planes[0])?;
    let luma_codec = packed_luma_codec(luma_ty, depth);
    let chroma_codec = packed_chroma_codec(luma_ty, depth, mode);
    let (min, max) = sample_range(depth, luma_ty.is_signed());

    let mut dst = c422_alloc(image, luma_ty, depth);

    let packed_ty = image.planes[0].sample_type();
    if ycgco {
        dispatch_lift_pair!(
            luma_ty,
            packed_ty,
            ycgco422_inverse_entry(&image.planes, &mut dst, luma_codec, chroma_codec, min, max)
        )?;
    } else {
        dispatch_lift_pair!(
            luma_ty,
            packed_ty,
            rct422_inverse_entry(&image.planes, &mut dst, luma_codec, chroma_codec, min, max)
        )?;
    }

    Ok(PlanarImage {
        planes: dst,
        width: image.width,
        height: image.height,
    })
}

/// Applies the forward 4:2:2 reversible color transform.
///
/// Operates on 1x2 cells of a (G, R, B) 4:2:2 image, the shape produced by
/// [crate::cfa_to_c422]: `cb = b - g0`, `cr = r - g0` from the pair's first
/// luma sample, then each luma sample shifts by the shared `(cb + cr) >> 2`.
/// Outputs (Y, Cb, Cr) with one extra bit of precision on every component.
///
/// # Arguments
///
/// * `image` - Source 4:2:2 image with components ordered (G, R, B).
/// * `mode` - Chroma difference representation, see [ChromaMode].
///
pub fn forward_rct422(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    c422_forward(image, mode, false)
}

/// Applies the inverse 4:2:2 reversible color transform to a (Y, Cb, Cr)
/// 4:2:2 image, recovering the (G, R, B) planes bit-for-bit.
///
/// # Arguments
///
/// * `image` - Source image produced by [forward_rct422].
/// * `mode` - Chroma difference representation used by the forward pass.
///
pub fn inverse_rct422(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    c422_inverse(image, mode, false)
}

/// Applies the forward 4:2:2 YCgCo transform.
///
/// The YCgCo lifting sequence on 1x2 cells: chroma from the pair's first
/// luma sample, per-sample luma against the shared `cg`. Outputs
/// (Y, Cg, Co) with one extra bit of precision on every component.
///
/// # Arguments
///
/// * `image` - Source 4:2:2 image with components ordered (G, R, B).
/// * `mode` - Chroma difference representation, see [ChromaMode].
///
pub fn forward_ycgco422(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    c422_forward(image, mode, true)
}

/// Applies the inverse 4:2:2 YCgCo transform to a (Y, Cg, Co) 4:2:2 image.
///
/// # Arguments
///
/// * `image` - Source image produced by [forward_ycgco422].
/// * `mode` - Chroma difference representation used by the forward pass.
///
pub fn inverse_ycgco422(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    c422_inverse(image, mode, true)
}
