/*
 * Copyright (c) Radzivon Bartoshyk, 3/2025. All rights reserved.
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
use crate::internals::{check_lift_components, chroma_plane_codec, chroma_plane_type};
use crate::numerics::{clamp_sample, sample_range, ChromaCodec};
use crate::rct::check_decorrelated_planes;
use crate::samples::dispatch_lift_pair;
use crate::{CfaError, ChromaMode};
use num_traits::AsPrimitive;

fn rctd_forward_impl<T, C>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    codec: ChromaCodec,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    let rv = src[0].view::<T>()?;
    let g1v = src[1].view::<T>()?;
    let g2v = src[2].view::<T>()?;
    let bv = src[3].view::<T>()?;
    let width = src[0].width as usize;
    let height = src[0].height as usize;
    let [y_plane, cb_plane, cr_plane, dg_plane] = dst else {
        return Err(CfaError::ZeroBaseSize);
    };
    let mut yv = y_plane.view_mut::<T>()?;
    let mut cbv = cb_plane.view_mut::<C>()?;
    let mut crv = cr_plane.view_mut::<C>()?;
    let mut dgv = dg_plane.view_mut::<C>()?;
    for y in 0..height {
        for x in 0..width {
            let r: i64 = rv.get(x, y).as_();
            let g1: i64 = g1v.get(x, y).as_();
            let g2: i64 = g2v.get(x, y).as_();
            let b: i64 = bv.get(x, y).as_();
            let dg = g1 - g2;
            let ga = (g1 + g2) >> 1;
            let luma = (r + 2 * ga + b) >> 2;
            yv.set(x, y, luma.as_());
            cbv.set(x, y, codec.encode(b - ga).as_());
            crv.set(x, y, codec.encode(r - ga).as_());
            dgv.set(x, y, codec.encode(dg).as_());
        }
    }
    Ok(())
}

fn rctd_inverse_impl<T, C>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    codec: ChromaCodec,
    min: i64,
    max: i64,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore + AsPrimitive<i64>,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    let yv = src[0].view::<T>()?;
    let cbv = src[1].view::<C>()?;
    let crv = src[2].view::<C>()?;
    let dgv = src[3].view::<C>()?;
    let width = src[0].width as usize;
    let height = src[0].height as usize;
    let [r_plane, g1_plane, g2_plane, b_plane] = dst else {
        return Err(CfaError::ZeroBaseSize);
    };
    let mut rv = r_plane.view_mut::<T>()?;
    let mut g1v = g1_plane.view_mut::<T>()?;
    let mut g2v = g2_plane.view_mut::<T>()?;
    let mut bv = b_plane.view_mut::<T>()?;
    for y in 0..height {
        for x in 0..width {
            let luma: i64 = yv.get(x, y).as_();
            let cb = codec.decode(cbv.get(x, y).as_());
            let cr = codec.decode(crv.get(x, y).as_());
            let dg = codec.decode(dgv.get(x, y).as_());
            let ga = luma - ((cb + cr) >> 2);
            let r = cr + ga;
            let b = cb + ga;
            let g1 = ga + dg - (dg >> 1);
            let g2 = ga - (dg >> 1);
            rv.set(x, y, clamp_sample(r, min, max).as_());
            g1v.set(x, y, clamp_sample(g1, min, max).as_());
            g2v.set(x, y, clamp_sample(g2, min, max).as_());
            bv.set(x, y, clamp_sample(b, min, max).as_());
        }
    }
    Ok(())
}

/// Applies the forward delta-green reversible color transform to a
/// 4-component (R, G1, G2, B) planar Bayer image.
///
/// The two greens collapse into `dg = g1 - g2` and their floor average,
/// which then takes the single-green slot of the plain RCT. Output
/// components are ordered (Y, Cb, Cr, Dg); the three difference planes gain
/// one bit over the luma.
///
/// # Arguments
///
/// * `image` - Source planar image with components ordered (R, G1, G2, B).
/// * `mode` - Chroma difference representation, see [ChromaMode].
///
pub fn forward_rctd(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    check_lift_components(image, 4)?;
    let first = &image.planes[0];
    if first.width != image.width || first.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }
    let luma_ty = first.sample_type();
    let depth = first.bit_depth;
    let chroma_ty = chroma_plane_type(luma_ty, depth, mode)?;
    let codec = chroma_plane_codec(luma_ty, depth, mode);

    let mut dst = vec![ImagePlane::alloc(first.width, first.height, luma_ty, depth)];
    for _ in 0..3 {
        dst.push(ImagePlane::alloc(
            first.width,
            first.height,
            chroma_ty,
            depth + 1,
        ));
    }

    dispatch_lift_pair!(
        luma_ty,
        chroma_ty,
        rctd_forward_impl(&image.planes, &mut dst, codec)
    )?;

    Ok(PlanarImage {
        planes: dst,
        width: image.width,
        height: image.height,
    })
}

/// Applies the inverse delta-green reversible color transform to a
/// (Y, Cb, Cr, Dg) image, recovering the (R, G1, G2, B) planes.
///
/// The greens reconstruct as `g1 = ga + dg - (dg >> 1)` and
/// `g2 = ga - (dg >> 1)`, every output clamped to the luma range.
///
/// # Arguments
///
/// * `image` - Source image with components ordered (Y, Cb, Cr, Dg).
/// * `mode` - Chroma difference representation used by the forward pass.
///
pub fn inverse_rctd(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    image.expect_depth(4)?;
    check_decorrelated_planes(image, mode)?;
    let luma = &image.planes[0];
    if luma.width != image.width || luma.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }
    let luma_ty = luma.sample_type();
    let depth = luma.bit_depth;
    let codec = chroma_plane_codec(luma_ty, depth, mode);
    let (min, max) = sample_range(depth, luma_ty.is_signed());

    let mut dst: Vec<ImagePlane<'static>> = (0..4)
        .map(|_| ImagePlane::alloc(luma.width, luma.height, luma_ty, depth))
        .collect();

    let chroma_ty = image.planes[1].sample_type();
    dispatch_lift_pair!(
        luma_ty,
        chroma_ty,
        rctd_inverse_impl(&image.planes, &mut dst, codec, min, max)
    )?;

    Ok(PlanarImage {
        planes: dst,
        width: image.width,
        height: image.height,
    })
}
