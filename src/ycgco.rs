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

/// Forward YCgCo-R lifting of one RGB triple.
#[inline(always)]
fn lift_ycgco(r: i64, g: i64, b: i64) -> (i64, i64, i64) {
    let co = r - b;
    let t = b + (co >> 1);
    let cg = g - t;
    let y = t + (cg >> 1);
    (y, cg, co)
}

/// Inverse YCgCo-R lifting back to an RGB triple.
#[inline(always)]
fn unlift_ycgco(y: i64, cg: i64, co: i64) -> (i64, i64, i64) {
    let t = y - (cg >> 1);
    let g = cg + t;
    let b = t - (co >> 1);
    let r = b + co;
    (r, g, b)
}

fn ycgco_forward_impl<T, C>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    codec: ChromaCodec,
    delta_green: bool,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    let width = src[0].width as usize;
    let height = src[0].height as usize;
    let rv = src[0].view::<T>()?;
    let g1v = src[1].view::<T>()?;
    let g2v = if delta_green {
        Some(src[2].view::<T>()?)
    } else {
        None
    };
    let bv = src[if delta_green { 3 } else { 2 }].view::<T>()?;

    let (head, tail) = dst.split_at_mut(1);
    let mut yv = head[0].view_mut::<T>()?;
    let (cg_head, tail) = tail.split_at_mut(1);
    let mut cgv = cg_head[0].view_mut::<C>()?;
    let (co_head, tail) = tail.split_at_mut(1);
    let mut cov = co_head[0].view_mut::<C>()?;
    let mut dgv = match tail.first_mut() {
        Some(plane) => Some(plane.view_mut::<C>()?),
        None => None,
    };

    for y in 0..height {
        for x in 0..width {
            let r: i64 = rv.get(x, y).as_();
            let b: i64 = bv.get(x, y).as_();
            let g = match (&g2v, &mut dgv) {
                (Some(g2v), Some(dgv)) => {
                    let g1: i64 = g1v.get(x, y).as_();
                    let g2: i64 = g2v.get(x, y).as_();
                    dgv.set(x, y, codec.encode(g1 - g2).as_());
                    (g1 + g2) >> 1
                }
                _ => g1v.get(x, y).as_(),
            };
            let (luma, cg, co) = lift_ycgco(r, g, b);
            yv.set(x, y, luma.as_());
            cgv.set(x, y, codec.encode(cg).as_());
            cov.set(x, y, codec.encode(co).as_());
        }
    }
    Ok(())
}

fn ycgco_inverse_impl<T, C>(
    src: &[ImagePlane<'_>],
    dst: &mut [ImagePlane<'static>],
    codec: ChromaCodec,
    delta_green: bool,
    min: i64,
    max: i64,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    C: SampleStore + AsPrimitive<i64>,
    i64: AsPrimitive<T> + AsPrimitive<C>,
{
    let width = src[0].width as usize;
    let height = src[0].height as usize;
    let yv = src[0].view::<T>()?;
    let cgv = src[1].view::<C>()?;
    let cov = src[2].view::<C>()?;
    let dgv = if delta_green {
        Some(src[3].view::<C>()?)
    } else {
        None
    };

    let mut rv;
    let mut g1v;
    let mut g2v;
    let mut bv;
    if delta_green {
        let [r_plane, g1_plane, g2_plane, b_plane] = dst else {
            return Err(CfaError::ZeroBaseSize);
        };
        rv = r_plane.view_mut::<T>()?;
        g1v = g1_plane.view_mut::<T>()?;
        g2v = Some(g2_plane.view_mut::<T>()?);
        bv = b_plane.view_mut::<T>()?;
    } else {
        let [r_plane, g1_plane, b_plane] = dst else {
            return Err(CfaError::ZeroBaseSize);
        };
        rv = r_plane.view_mut::<T>()?;
        g1v = g1_plane.view_mut::<T>()?;
        g2v = None;
        bv = b_plane.view_mut::<T>()?;
    }

    for y in 0..height {
        for x in 0..width {
            let luma: i64 = yv.get(x, y).as_();
            let cg = codec.decode(cgv.get(x, y).as_());
            let co = codec.decode(cov.get(x, y).as_());
            let (r, g, b) = unlift_ycgco(luma, cg, co);
            rv.set(x, y, clamp_sample(r, min, max).as_());
            bv.set(x, y, clamp_sample(b, min, max).as_());
            match (&dgv, &mut g2v) {
                (Some(dgv), Some(g2v)) => {
                    let dg = codec.decode(dgv.get(x, y).as_());
                    let g1 = g + dg - (dg >> 1);
                    let g2 = g - (dg >> 1);
                    g1v.set(x, y, clamp_sample(g1, min, max).as_());
                    g2v.set(x, y, clamp_sample(g2, min, max).as_());
                }
                _ => {
                    g1v.set(x, y, clamp_sample(g, min, max).as_());
                }
            }
        }
    }
    Ok(())
}

fn ycgco_forward(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
    delta_green: bool,
) -> Result<PlanarImage<'static>, CfaError> {
    let depth_count = if delta_green { 4 } else { 3 };
    check_lift_components(image, depth_count)?;
    let first = &image.planes[0];
    if first.width != image.width || first.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }
    let luma_ty = first.sample_type();
    let depth = first.bit_depth;
    let chroma_ty = chroma_plane_type(luma_ty, depth, mode)?;
    let codec = chroma_plane_codec(luma_ty, depth, mode);

    let mut dst = vec![ImagePlane::alloc(first.width, first.height, luma_ty, depth)];
    for _ in 1..depth_count {
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
        ycgco_forward_impl(&image.planes, &mut dst, codec, delta_green)
    )?;

    Ok(PlanarImage {
        planes: dst,
        width: image.width,
        height: image.height,
    })
}

fn ycgco_inverse(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
    delta_green: bool,
) -> Result<PlanarImage<'static>, CfaError> {
    let depth_count = if delta_green { 4 } else { 3 };
    image.expect_depth(depth_count)?;
    check_decorrelated_planes(image, mode)?;
    let luma = &image.planes[0];
    if luma.width != image.width || luma.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }
    let luma_ty = luma.sample_type();
    let depth = luma.bit_depth;
    let codec = chroma_plane_codec(luma_ty, depth, mode);
    let (min, max) = sample_range(depth, luma_ty.is_signed());

    let mut dst: Vec<ImagePlane<'static>> = (0..depth_count)
        .map(|_| ImagePlane::alloc(luma.width, luma.height, luma_ty, depth))
        .collect();

    let chroma_ty = image.planes[1].sample_type();
    dispatch_lift_pair!(
        luma_ty,
        chroma_ty,
        ycgco_inverse_impl(&image.planes, &mut dst, codec, delta_green, min, max)
    )?;

    Ok(PlanarImage {
        planes: dst,
        width: image.width,
        height: image.height,
    })
}

/// Applies the forward reversible YCgCo transform to a 3-component RGB image.
///
/// Per pixel `co = r - b`, `t = b + (co >> 1)`, `cg = g - t`,
/// `y = t + (cg >> 1)`. Output components are ordered (Y, Cg, Co); the
/// chroma planes gain one bit over the luma.
///
/// # Arguments
///
/// * `image` - Source image with components ordered (R, G, B).
/// * `mode` - Chroma difference representation, see [ChromaMode].
///
pub fn forward_ycgco(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    ycgco_forward(image, mode, false)
}

/// Applies the inverse reversible YCgCo transform to a (Y, Cg, Co) image.
///
/// # Arguments
///
/// * `image` - Source image with components ordered (Y, Cg, Co).
/// * `mode` - Chroma difference representation used by the forward pass.
///
pub fn inverse_ycgco(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    ycgco_inverse(image, mode, false)
}

/// Applies the forward delta-green YCgCo transform to a 4-component
/// (R, G1, G2, B) planar Bayer image.
///
/// The green pair collapses into its delta and floor average exactly as in
/// the delta-green RCT, then the average green runs through the YCgCo
/// lifting. Output components are ordered (Y, Cg, Co, Dg).
///
/// # Arguments
///
/// * `image` - Source planar image with components ordered (R, G1, G2, B).
/// * `mode` - Chroma difference representation, see [ChromaMode].
///
pub fn forward_ycgcod(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    ycgco_forward(image, mode, true)
}

/// Applies the inverse delta-green YCgCo transform to a (Y, Cg, Co, Dg)
/// image, recovering the (R, G1, G2, B) planes.
///
/// # Arguments
///
/// * `image` - Source image with components ordered (Y, Cg, Co, Dg).
/// * `mode` - Chroma difference representation used by the forward pass.
///
pub fn inverse_ycgcod(
    image: &PlanarImage<'_>,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    ycgco_inverse(image, mode, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::{BufferStoreMut, PlaneStore};
    use crate::samples::SampleType;
    use rand::Rng;

    fn planar_u8(width: u32, height: u32, planes: Vec<Vec<u8>>) -> PlanarImage<'static> {
        let planes = planes
            .into_iter()
            .map(|data| {
                let mut plane = ImagePlane::alloc(width, height, SampleType::U8, 8);
                plane.store = PlaneStore::U8(BufferStoreMut::Owned(data));
                plane
            })
            .collect();
        PlanarImage {
            planes,
            width,
            height,
        }
    }

    #[test]
    fn lifting_matches_reference_sequence() {
        // r=64, g=128, b=32: co=32, t=48, cg=80, y=88.
        assert_eq!(lift_ycgco(64, 128, 32), (88, 80, 32));
        assert_eq!(unlift_ycgco(88, 80, 32), (64, 128, 32));
    }

    #[test]
    fn round_trip_ycgco_u8() {
        let mut rng = rand::rng();
        let width = 12u32;
        let height = 10u32;
        let mut planes = vec![];
        for _ in 0..3 {
            let mut data: Vec<u8> = (0..width * height)
                .map(|_| rng.random_range(0..=255))
                .collect();
            data[0] = 0;
            data[1] = 255;
            planes.push(data);
        }
        for mode in [ChromaMode::UnsignedOffset, ChromaMode::Signed] {
            let image = planar_u8(width, height, planes.clone());
            let transformed = forward_ycgco(&image, mode).unwrap();
            assert_eq!(transformed.planes[1].bit_depth, 9);
            let back = inverse_ycgco(&transformed, mode).unwrap();
            for (restored, original) in back.planes.iter().zip(planes.iter()) {
                match &restored.store {
                    PlaneStore::U8(b) => assert_eq!(b.borrow(), &original[..]),
                    _ => panic!("container changed"),
                }
            }
        }
    }

    #[test]
    fn round_trip_ycgcod_u8() {
        let mut rng = rand::rng();
        let width = 8u32;
        let height = 6u32;
        let mut planes = vec![];
        for _ in 0..4 {
            let mut data: Vec<u8> = (0..width * height)
                .map(|_| rng.random_range(0..=255))
                .collect();
            data[0] = 255;
            data[1] = 0;
            planes.push(data);
        }
        let image = planar_u8(width, height, planes.clone());
        let transformed = forward_ycgcod(&image, ChromaMode::UnsignedOffset).unwrap();
        assert_eq!(transformed.depth(), 4);
        let back = inverse_ycgcod(&transformed, ChromaMode::UnsignedOffset).unwrap();
        for (restored, original) in back.planes.iter().zip(planes.iter()) {
            match &restored.store {
                PlaneStore::U8(b) => assert_eq!(b.borrow(), &original[..]),
                _ => panic!("container changed"),
            }
        }
    }

    #[test]
    fn round_trip_signed_12_bit() {
        let mut rng = rand::rng();
        let width = 6u32;
        let height = 6u32;
        let mut planes: Vec<ImagePlane<'static>> = vec![];
        let mut originals: Vec<Vec<i16>> = vec![];
        for _ in 0..3 {
            let data: Vec<i16> = (0..width * height)
                .map(|_| rng.random_range(-2048..=2047))
                .collect();
            let mut plane = ImagePlane::alloc(width, height, SampleType::I16, 12);
            plane.store = PlaneStore::I16(BufferStoreMut::Owned(data.clone()));
            originals.push(data);
            planes.push(plane);
        }
        let image = PlanarImage {
            planes,
            width,
            height,
        };
        let transformed = forward_ycgco(&image, ChromaMode::Signed).unwrap();
        let back = inverse_ycgco(&transformed, ChromaMode::Signed).unwrap();
        for (restored, original) in back.planes.iter().zip(originals.iter()) {
            match &restored.store {
                PlaneStore::I16(b) => assert_eq!(b.borrow(), &original[..]),
                _ => panic!("container changed"),
            }
        }
    }
}
