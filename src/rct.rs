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
use crate::internals::{
    check_lift_components, chroma_plane_codec, chroma_plane_type, MAX_LIFT_BIT_DEPTH,
};
use crate::numerics::{clamp_sample, sample_range, ChromaCodec};
use crate::samples::dispatch_lift_pair;
use crate::{CfaError, ChromaMode};
use num_traits::AsPrimitive;

fn rct_forward_impl<T, C>(
    red: &ImagePlane<'_>,
    green: &ImagePlane<'_>,
    blue: &ImagePlane<'_>,
    y_plane: &mut ImagePlane<'static>,
    cb_plane: &mut ImagePlane<'static>,
    cr_plane: &mut ImagePlane<'static>,
    codec: ChromaCodec,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    let rv = red.view::<T>()?;
    let gv = green.view::<T>()?;
    let bv = blue.view::<T>()?;
    let mut yv = y_plane.view_mut::<T>()?;
    let mut cbv = cb_plane.view_mut::<C>()?;
    let mut crv = cr_plane.view_mut::<C>()?;
    let width = red.width as usize;
    let height = red.height as usize;
    for y in 0..height {
        for x in 0..width {
            let r: i64 = rv.get(x, y).as_();
            let g: i64 = gv.get(x, y).as_();
            let b: i64 = bv.get(x, y).as_();
            let luma = (r + 2 * g + b) >> 2;
            yv.set(x, y, luma.as_());
            cbv.set(x, y, codec.encode(b - g).as_());
            crv.set(x, y, codec.encode(r - g).as_());
        }
    }
    Ok(())
}

fn rct_inverse_impl<T, C>(
    y_plane: &ImagePlane<'_>,
    cb_plane: &ImagePlane<'_>,
    cr_plane: &ImagePlane<'_>,
    red: &mut ImagePlane<'static>,
    green: &mut ImagePlane<'static>,
    blue: &mut ImagePlane<'static>,
    codec: ChromaCodec,
    min: i64,
    max: i64,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore + AsPrimitive<i64>,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    let yv = y_plane.view::<T>()?;
    let cbv = cb_plane.view::<C>()?;
    let crv = cr_plane.view::<C>()?;
    let mut rv = red.view_mut::<T>()?;
    let mut gv = green.view_mut::<T>()?;
    let mut bv = blue.view_mut::<T>()?;
    let width = y_plane.width as usize;
    let height = y_plane.height as usize;
    for y in 0..height {
        for x in 0..width {
            let luma: i64 = yv.get(x, y).as_();
            let cb = codec.decode(cbv.get(x, y).as_());
            let cr = codec.decode(crv.get(x, y).as_());
            let g = luma - ((cb + cr) >> 2);
            let r = cr + g;
            let b = cb + g;
            rv.set(x, y, clamp_sample(r, min, max).as_());
            gv.set(x, y, clamp_sample(g, min, max).as_());
            bv.set(x, y, clamp_sample(b, min, max).as_());
        }
    }
    Ok(())
}

/// Applies the forward reversible color transform to a 3-component RGB image.
///
/// Per pixel `y = (r + 2g + b) >> 2`, `cb = b - g`, `cr = r - g`. The luma
/// plane keeps the source precision, the chroma planes gain one bit and are
/// represented according to `mode`. The transform is exactly invertible by
/// [inverse_rct] for every value of every supported integer precision.
///
/// # Arguments
///
/// * `image` - Source image with components ordered (R, G, B).
/// * `mode` - Chroma difference representation, see [ChromaMode].
///
pub fn forward_rct(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    check_lift_components(image, 3)?;
    let first = &image.planes[0];
    if first.width != image.width || first.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }
    let luma_ty = first.sample_type();
    let depth = first.bit_depth;
    let chroma_ty = chroma_plane_type(luma_ty, depth, mode)?;
    let codec = chroma_plane_codec(luma_ty, depth, mode);

    let mut y_plane = ImagePlane::alloc(first.width, first.height, luma_ty, depth);
    let mut cb_plane = ImagePlane::alloc(first.width, first.height, chroma_ty, depth + 1);
    let mut cr_plane = ImagePlane::alloc(first.width, first.height, chroma_ty, depth + 1);

    dispatch_lift_pair!(
        luma_ty,
        chroma_ty,
        rct_forward_impl(
            &image.planes[0],
            &image.planes[1],
            &image.planes[2],
            &mut y_plane,
            &mut cb_plane,
            &mut cr_plane,
            codec,
        )
    )?;

    Ok(PlanarImage {
        planes: vec![y_plane, cb_plane, cr_plane],
        width: image.width,
        height: image.height,
    })
}

/// Shared inverse-side validation of a (Y, chroma, chroma) component triple.
pub(crate) fn check_decorrelated_planes(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<(), CfaError> {
    image.check_constraints()?;
    let luma = &image.planes[0];
    let luma_ty = luma.sample_type();
    if luma_ty.is_float() {
        return Err(CfaError::UnsupportedSampleType {
            bit_depth: luma.bit_depth,
            signed: luma_ty.is_signed(),
            is_float: true,
        });
    }
    if luma.bit_depth > MAX_LIFT_BIT_DEPTH {
        return Err(CfaError::UnsupportedBitDepth(luma.bit_depth));
    }
    let chroma_ty = chroma_plane_type(luma_ty, luma.bit_depth, mode)?;
    for plane in image.planes.iter().skip(1) {
        if plane.sample_type() != chroma_ty {
            return Err(CfaError::InconsistentComponents("chroma container"));
        }
        if plane.bit_depth != luma.bit_depth + 1 {
            return Err(CfaError::InconsistentComponents("bit depth"));
        }
        if plane.width != luma.width || plane.height != luma.height {
            return Err(CfaError::InconsistentComponents("dimensions"));
        }
    }
    Ok(())
}

/// Applies the inverse reversible color transform to a (Y, Cb, Cr) image.
///
/// Recovers `g = y - ((cb + cr) >> 2)`, `r = cr + g`, `b = cb + g`, each
/// clamped to the representable range of the luma precision.
///
/// # Arguments
///
/// * `image` - Source image with components ordered (Y, Cb, Cr).
/// * `mode` - Chroma difference representation used by the forward pass.
///
pub fn inverse_rct(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    image.expect_depth(3)?;
    check_decorrelated_planes(image, mode)?;
    let luma = &image.planes[0];
    if luma.width != image.width || luma.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }
    let luma_ty = luma.sample_type();
    let depth = luma.bit_depth;
    let codec = chroma_plane_codec(luma_ty, depth, mode);
    let (min, max) = sample_range(depth, luma_ty.is_signed());

    let mut red = ImagePlane::alloc(luma.width, luma.height, luma_ty, depth);
    let mut green = ImagePlane::alloc(luma.width, luma.height, luma_ty, depth);
    let mut blue = ImagePlane::alloc(luma.width, luma.height, luma_ty, depth);

    let chroma_ty = image.planes[1].sample_type();
    dispatch_lift_pair!(
        luma_ty,
        chroma_ty,
        rct_inverse_impl(
            &image.planes[0],
            &image.planes[1],
            &image.planes[2],
            &mut red,
            &mut green,
            &mut blue,
            codec,
            min,
            max,
        )
    )?;

    Ok(PlanarImage {
        planes: vec![red, green, blue],
        width: image.width,
        height: image.height,
    })
}
