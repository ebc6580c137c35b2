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
use crate::cfa_error::check_even_dimensions;
use crate::images::{ImagePlane, PlanarImage, SampleStore};
use crate::internals::{
    packed_chroma_codec, packed_luma_codec, packed_plane_type, scratch_at, MAX_LIFT_BIT_DEPTH,
};
use crate::numerics::{clamp_sample, sample_range, ChromaCodec};
use crate::samples::{dispatch_lift_pair, SampleType};
use crate::{BayerPattern, CfaError, ChromaMode};
use num_traits::AsPrimitive;

fn rctx_forward_impl<T, P>(
    src: &ImagePlane<'_>,
    dst: &mut ImagePlane<'static>,
    pattern: BayerPattern,
    luma: ChromaCodec,
    chroma: ChromaCodec,
) -> Result<(), CfaError>
where
    T: SampleStore + AsPrimitive<i64>,
    P: SampleStore,
    i64: AsPrimitive<T> + AsPrimitive<P>,
{
    let sv = src.view::<T>()?;
    let mut dv = dst.view_mut::<P>()?;
    let width = src.width as usize;
    let height = src.height as usize;
    let wi = width as i64;
    let hi = height as i64;
    let [(rx, ry), (g1x, g1y), (g2x, g2y), (bx, by)] = pattern.positions();
    let mut scratch = vec![0i64; width * height];

    // Lifting step 1: residual of the predict green against its four
    // diagonal neighbors, which all sit on the other green phase.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let gx = 2 * cx + g2x as usize;
            let gy = 2 * cy + g2y as usize;
            let xi = gx as i64;
            let yi = gy as i64;
            let tl: i64 = sv.mirrored(xi - 1, yi - 1).as_();
            let tr: i64 = sv.mirrored(xi + 1, yi - 1).as_();
            let bl: i64 = sv.mirrored(xi - 1, yi + 1).as_();
            let br: i64 = sv.mirrored(xi + 1, yi + 1).as_();
            let pred = (tl + tr + bl + br + 2) >> 2;
            let g2: i64 = sv.get(gx, gy).as_();
            scratch[gy * width + gx] = g2 - pred;
        }
    }

    // Lifting step 2: update green recovered as a four-neighbor average
    // from the residual channel.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let gx = 2 * cx + g1x as usize;
            let gy = 2 * cy + g1y as usize;
            let xi = gx as i64;
            let yi = gy as i64;
            let sum = scratch_at(&scratch, wi, hi, xi - 1, yi - 1)
                + scratch_at(&scratch, wi, hi, xi + 1, yi - 1)
                + scratch_at(&scratch, wi, hi, xi - 1, yi + 1)
                + scratch_at(&scratch, wi, hi, xi + 1, yi + 1);
            let upd = (sum + 4) >> 3;
            let g1: i64 = sv.get(gx, gy).as_();
            scratch[gy * width + gx] = g1 + upd;
        }
    }

    // Lifting steps 3 and 4: luma/chroma against the averaged green, packed
    // into the fixed cell sites.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let fx = 2 * cx;
            let fy = 2 * cy;
            let r: i64 = sv.get(fx + rx as usize, fy + ry as usize).as_();
            let b: i64 = sv.get(fx + bx as usize, fy + by as usize).as_();
            let ga = scratch[(fy + g1y as usize) * width + fx + g1x as usize];
            let d = scratch[(fy + g2y as usize) * width + fx + g2x as usize];
            let y = (r + b + 2 * ga) >> 2;
            let cb = b - ga;
            let cr = r - ga;
            dv.set(fx, fy, luma.encode(y).as_());
            dv.set(fx + 1, fy, chroma.encode(cb).as_());
            dv.set(fx, fy + 1, chroma.encode(cr).as_());
            dv.set(fx + 1, fy + 1, chroma.encode(d).as_());
        }
    }
    Ok(())
}

fn rctx_inverse_impl<T, P>(
    src: &ImagePlane<'_>,
    dst: &mut ImagePlane<'static>,
    pattern: BayerPattern,
    luma: ChromaCodec,
    chroma: ChromaCodec,
    min: i64,
    max: i64,
) -> Result<(), CfaError>
where
    T: SampleStore,
    P: SampleStore + AsPrimitive<i64>,
    i64: AsPrimitive<T> + AsPrimitive<P>,
{
    let sv = src.view::<P>()?;
    let mut dv = dst.view_mut::<T>()?;
    let width = src.width as usize;
    let height = src.height as usize;
    let wi = width as i64;
    let hi = height as i64;
    let [(rx, ry), (g1x, g1y), (g2x, g2y), (bx, by)] = pattern.positions();
    let mut scratch = vec![0i64; width * height];

    // Unpack and undo the luma/chroma step; residual and averaged green go
    // back to their CFA sites.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let fx = 2 * cx;
            let fy = 2 * cy;
            let y = luma.decode(sv.get(fx, fy).as_());
            let cb = chroma.decode(sv.get(fx + 1, fy).as_());
            let cr = chroma.decode(sv.get(fx, fy + 1).as_());
            let d = chroma.decode(sv.get(fx + 1, fy + 1).as_());
            let ga = y - ((cb + cr) >> 2);
            let r = cr + ga;
            let b = cb + ga;
            scratch[(fy + g1y as usize) * width + fx + g1x as usize] = ga;
            scratch[(fy + g2y as usize) * width + fx + g2x as usize] = d;
            dv.set(
                fx + rx as usize,
                fy + ry as usize,
                clamp_sample(r, min, max).as_(),
            );
            dv.set(
                fx + bx as usize,
                fy + by as usize,
                clamp_sample(b, min, max).as_(),
            );
        }
    }

    // Undo the update lift, restoring the update-site green.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let gx = 2 * cx + g1x as usize;
            let gy = 2 * cy + g1y as usize;
            let xi = gx as i64;
            let yi = gy as i64;
            let sum = scratch_at(&scratch, wi, hi, xi - 1, yi - 1)
                + scratch_at(&scratch, wi, hi, xi + 1, yi - 1)
                + scratch_at(&scratch, wi, hi, xi - 1, yi + 1)
                + scratch_at(&scratch, wi, hi, xi + 1, yi + 1);
            let upd = (sum + 4) >> 3;
            let g1 = scratch[gy * width + gx] - upd;
            scratch[gy * width + gx] = g1;
            dv.set(gx, gy, clamp_sample(g1, min, max).as_());
        }
    }

    // Undo the predict lift with the reconstructed greens.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let gx = 2 * cx + g2x as usize;
            let gy = 2 * cy + g2y as usize;
            let xi = gx as i64;
            let yi = gy as i64;
            let tl = scratch_at(&scratch, wi, hi, xi - 1, yi - 1);
            let tr = scratch_at(&scratch, wi, hi, xi + 1, yi - 1);
            let bl = scratch_at(&scratch, wi, hi, xi - 1, yi + 1);
            let br = scratch_at(&scratch, wi, hi, xi + 1, yi + 1);
            let pred = (tl + tr + bl + br + 2) >> 2;
            let g2 = scratch[gy * width + gx] + pred;
            dv.set(gx, gy, clamp_sample(g2, min, max).as_());
        }
    }
    Ok(())
}

pub(crate) fn check_cfa_lift_input(image: &PlanarImage<'_>) -> Result<(), CfaError> {
    image.expect_depth(1)?;
    check_even_dimensions(image.width, image.height)?;
    image.check_constraints()?;
    let plane = &image.planes[0];
    if plane.width != image.width || plane.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }
    if plane.sample_type().is_float() {
        return Err(CfaError::UnsupportedSampleType {
            bit_depth: plane.bit_depth,
            signed: plane.sample_type().is_signed(),
            is_float: true,
        });
    }
    Ok(())
}

/// Recovers the source precision and container behind a packed lifted plane.
pub(crate) fn packed_source_type(plane: &ImagePlane<'_>) -> Result<(SampleType, u32), CfaError> {
    if plane.bit_depth < 2 {
        return Err(CfaError::UnsupportedBitDepth(plane.bit_depth));
    }
    let depth = plane.bit_depth - 1;
    if depth > MAX_LIFT_BIT_DEPTH {
        return Err(CfaError::UnsupportedBitDepth(plane.bit_depth));
    }
    let luma_ty = SampleType::smallest_integer(depth, plane.sample_type().is_signed())?;
    let required = packed_plane_type(luma_ty, depth)?;
    if plane.sample_type().bits() < required.bits() {
        return Err(CfaError::InconsistentComponents("packed container"));
    }
    Ok((luma_ty, depth))
}

/// Applies the forward RCTX lifting transform to a 1-component CFA image.
///
/// A four-step lifting scheme over each 2x2 cell: the predict-site green is
/// replaced by its residual against the four diagonal neighbors, the
/// update-site green becomes a four-neighbor average, then luma and chroma
/// form against the averaged green. The (Y, Cb, Cr, Dg) quadruple packs into
/// the cell at `(0,0)`, `(1,0)`, `(0,1)`, `(1,1)`. The rounding biases
/// `(sum + 2) >> 2` and `(sum + 4) >> 3` are part of the wire contract, the
/// inverse reproduces them exactly.
///
/// # Arguments
///
/// * `image` - Source CFA image, must have exactly one component and even dimensions.
/// * `pattern` - The Bayer arrangement of the mosaic.
/// * `mode` - Chroma difference representation, see [ChromaMode].
///
pub fn forward_rctx(
    image: &PlanarImage<'_>,
    pattern: BayerPattern,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    check_cfa_lift_input(image)?;
    let plane = &image.planes[0];
    if plane.bit_depth > MAX_LIFT_BIT_DEPTH {
        return Err(CfaError::UnsupportedBitDepth(plane.bit_depth));
    }
    let luma_ty = plane.sample_type();
    let depth = plane.bit_depth;
    let packed_ty = packed_plane_type(luma_ty, depth)?;
    let luma_codec = packed_luma_codec(luma_ty, depth);
    let chroma_codec = packed_chroma_codec(luma_ty, depth, mode);

    let mut dst = ImagePlane::alloc(plane.width, plane.height, packed_ty, depth + 1);

    dispatch_lift_pair!(
        luma_ty,
        packed_ty,
        rctx_forward_impl(plane, &mut dst, pattern, luma_codec, chroma_codec)
    )?;

    Ok(PlanarImage {
        planes: vec![dst],
        width: image.width,
        height: image.height,
    })
}

/// Applies the inverse RCTX lifting transform to a packed 1-component image.
///
/// Undoes [forward_rctx] step by step in reverse order with the identical
/// rounding biases; the result is bit-for-bit the original mosaic.
///
/// # Arguments
///
/// * `image` - Packed lifted image produced by the forward transform.
/// * `pattern` - The Bayer arrangement of the original mosaic.
/// * `mode` - Chroma difference representation used by the forward pass.
///
pub fn inverse_rctx(
    image: &PlanarImage<'_>,
    pattern: BayerPattern,
    mode: ChromaMode,
) -> Result<PlanarImage<'static>, CfaError> {
    check_cfa_lift_input(image)?;
    let plane = &image.planes[0];
    let (luma_ty, depth) = packed_source_type(plane)?;
    let luma_codec = packed_luma_codec(luma_ty, depth);
    let chroma_codec = packed_chroma_codec(luma_ty, depth, mode);
    let (min, max) = sample_range(depth, luma_ty.is_signed());

    let mut dst = ImagePlane::alloc(plane.width, plane.height, luma_ty, depth);

    let packed_ty = plane.sample_type();
    dispatch_lift_pair!(
        luma_ty,
        packed_ty,
        rctx_inverse_impl(
            plane,
            &mut dst,
            pattern,
            luma_codec,
            chroma_codec,
            min,
            max
        )
    )?;

    Ok(PlanarImage {
        planes: vec![dst],
        width: image.width,
        height: image.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::{BufferStoreMut, PlaneStore};
    use rand::Rng;

    const PATTERNS: [BayerPattern; 4] = [
        BayerPattern::Grbg,
        BayerPattern::Rggb,
        BayerPattern::Gbrg,
        BayerPattern::Bggr,
    ];

    fn cfa_u8(width: u32, height: u32, data: Vec<u8>) -> PlanarImage<'static> {
        let mut plane = ImagePlane::alloc(width, height, SampleType::U8, 8);
        plane.store = PlaneStore::U8(BufferStoreMut::Owned(data));
        PlanarImage {
            planes: vec![plane],
            width,
            height,
        }
    }

    fn constant_rggb(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0u8; (width * height) as usize];
        for y in 0..height as usize {
            for x in 0..width as usize {
                data[y * width as usize + x] = match (x & 1, y & 1) {
                    (0, 0) => 100,
                    (1, 0) => 110,
                    (0, 1) => 120,
                    _ => 130,
                };
            }
        }
        data
    }

    #[test]
    fn constant_mosaic_reference_cell() {
        // With constant phases every diagonal neighbor agrees, so the cell
        // values are exact: d = 10, ga = 115, y = 115, cb = 143, cr = 113,
        // dg = 138 under the 8-bit offset of 128.
        let data = constant_rggb(4, 4);
        let image = cfa_u8(4, 4, data);
        let packed = forward_rctx(&image, BayerPattern::Rggb, ChromaMode::UnsignedOffset).unwrap();
        assert_eq!(packed.planes[0].bit_depth, 9);
        assert_eq!(packed.planes[0].sample_type(), SampleType::U16);
        let pv = packed.planes[0].view::<u16>().unwrap();
        for cy in 0..2 {
            for cx in 0..2 {
                assert_eq!(pv.get(2 * cx, 2 * cy), 115);
                assert_eq!(pv.get(2 * cx + 1, 2 * cy), 143);
                assert_eq!(pv.get(2 * cx, 2 * cy + 1), 113);
                assert_eq!(pv.get(2 * cx + 1, 2 * cy + 1), 138);
            }
        }
    }

    #[test]
    fn round_trip_u8_all_patterns() {
        let mut rng = rand::rng();
        let width = 16u32;
        let height = 12u32;
        let mut data: Vec<u8> = (0..width * height).map(|_| rng.random_range(0..=255)).collect();
        data[0] = 255;
        data[1] = 0;
        data[2] = 255;
        for pattern in PATTERNS {
            for mode in [ChromaMode::UnsignedOffset, ChromaMode::Signed] {
                let image = cfa_u8(width, height, data.clone());
                let packed = forward_rctx(&image, pattern, mode).unwrap();
                let back = inverse_rctx(&packed, pattern, mode).unwrap();
                match &back.planes[0].store {
                    PlaneStore::U8(b) => assert_eq!(b.borrow(), &data[..]),
                    _ => panic!("container changed"),
                }
            }
        }
    }

    #[test]
    fn round_trip_10_bit_u16() {
        let mut rng = rand::rng();
        let width = 8u32;
        let height = 8u32;
        let data: Vec<u16> = (0..width * height)
            .map(|_| rng.random_range(0..=1023))
            .collect();
        let mut plane = ImagePlane::alloc(width, height, SampleType::U16, 10);
        plane.store = PlaneStore::U16(BufferStoreMut::Owned(data.clone()));
        let image = PlanarImage {
            planes: vec![plane],
            width,
            height,
        };
        let packed = forward_rctx(&image, BayerPattern::Gbrg, ChromaMode::UnsignedOffset).unwrap();
        // 10-bit sources pack into the same u16 container at 11 bits.
        assert_eq!(packed.planes[0].sample_type(), SampleType::U16);
        assert_eq!(packed.planes[0].bit_depth, 11);
        let back = inverse_rctx(&packed, BayerPattern::Gbrg, ChromaMode::UnsignedOffset).unwrap();
        match &back.planes[0].store {
            PlaneStore::U16(b) => assert_eq!(b.borrow(), &data[..]),
            _ => panic!("container changed"),
        }
    }

    #[test]
    fn round_trip_signed_source() {
        let mut rng = rand::rng();
        let width = 8u32;
        let height = 6u32;
        let data: Vec<i8> = (0..width * height)
            .map(|_| rng.random_range(-128..=127))
            .collect();
        let mut plane = ImagePlane::alloc(width, height, SampleType::I8, 8);
        plane.store = PlaneStore::I8(BufferStoreMut::Owned(data.clone()));
        let image = PlanarImage {
            planes: vec![plane],
            width,
            height,
        };
        let packed = forward_rctx(&image, BayerPattern::Bggr, ChromaMode::Signed).unwrap();
        assert_eq!(packed.planes[0].sample_type(), SampleType::I16);
        let back = inverse_rctx(&packed, BayerPattern::Bggr, ChromaMode::Signed).unwrap();
        match &back.planes[0].store {
            PlaneStore::I8(b) => assert_eq!(b.borrow(), &data[..]),
            _ => panic!("container changed"),
        }
    }

    #[test]
    fn odd_dimensions_are_rejected() {
        let image = cfa_u8(6, 5, vec![0; 30]);
        assert!(matches!(
            forward_rctx(&image, BayerPattern::Rggb, ChromaMode::UnsignedOffset),
            Err(CfaError::InvalidDimensions { .. })
        ));
    }
}
