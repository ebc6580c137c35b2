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
    packed_chroma_codec, packed_luma_codec, packed_plane_type, scratch_at, MAX_LIFT_BIT_DEPTH,
};
use crate::numerics::{clamp_sample, sample_range, ChromaCodec};
use crate::rct_lifting::{check_cfa_lift_input, packed_source_type};
use crate::samples::dispatch_lift_pair;
use crate::{BayerPattern, CfaError, ChromaMode};
use num_traits::AsPrimitive;

/// Cell geometry of the transform: greens ordered by raster position, plus
/// the axis along which the average-site green neighbors blue.
struct CellRoles {
    red: (usize, usize),
    blue: (usize, usize),
    avg_green: (usize, usize),
    delta_green: (usize, usize),
    vertical: bool,
}

impl CellRoles {
    fn new(pattern: BayerPattern) -> Self {
        let [(rx, ry), (g1x, g1y), (g2x, g2y), (bx, by)] = pattern.positions();
        let (avg_green, delta_green) = if g1y <= g2y {
            ((g1x as usize, g1y as usize), (g2x as usize, g2y as usize))
        } else {
            ((g2x as usize, g2y as usize), (g1x as usize, g1y as usize))
        };
        CellRoles {
            red: (rx as usize, ry as usize),
            blue: (bx as usize, by as usize),
            avg_green,
            delta_green,
            vertical: avg_green.0 == bx as usize,
        }
    }

    /// The two blue-site neighbors flanking the average-site green.
    #[inline]
    fn blue_neighbors(&self, gx: i64, gy: i64) -> [(i64, i64); 2] {
        if self.vertical {
            [(gx, gy - 1), (gx, gy + 1)]
        } else {
            [(gx - 1, gy), (gx + 1, gy)]
        }
    }
}

fn ydgcocgx_forward_impl<T, P>(
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
    let roles = CellRoles::new(pattern);
    let mut scratch = vec![0i64; width * height];

    // Steps 1-4: green delta-lift, green average-lift, red-vs-blue predict
    // and the blue update, every lifted channel parked at its CFA site.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let fx = 2 * cx;
            let fy = 2 * cy;
            let ga_site = (fx + roles.avg_green.0, fy + roles.avg_green.1);
            let dg_site = (fx + roles.delta_green.0, fy + roles.delta_green.1);
            let r_site = (fx + roles.red.0, fy + roles.red.1);
            let b_site = (fx + roles.blue.0, fy + roles.blue.1);
            let g_first: i64 = sv.get(ga_site.0, ga_site.1).as_();
            let g_second: i64 = sv.get(dg_site.0, dg_site.1).as_();
            let r: i64 = sv.get(r_site.0, r_site.1).as_();
            let b: i64 = sv.get(b_site.0, b_site.1).as_();
            let dg = g_second - g_first;
            let ga = g_first + (dg >> 1);
            let co = r - b;
            let bu = b + (co >> 1);
            scratch[ga_site.1 * width + ga_site.0] = ga;
            scratch[dg_site.1 * width + dg_site.0] = dg;
            scratch[r_site.1 * width + r_site.0] = co;
            scratch[b_site.1 * width + b_site.0] = bu;
        }
    }

    // Steps 5-6: direction-dependent green-vs-blue predict and the luma
    // update, packed into the fixed cell sites.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let fx = 2 * cx;
            let fy = 2 * cy;
            let gx = (fx + roles.avg_green.0) as i64;
            let gy = (fy + roles.avg_green.1) as i64;
            let [(ax, ay), (nx, ny)] = roles.blue_neighbors(gx, gy);
            let pred = (scratch_at(&scratch, wi, hi, ax, ay)
                + scratch_at(&scratch, wi, hi, nx, ny)
                + 1)
                >> 1;
            let ga = scratch[gy as usize * width + gx as usize];
            let bu = scratch[(fy + roles.blue.1) * width + fx + roles.blue.0];
            let co = scratch[(fy + roles.red.1) * width + fx + roles.red.0];
            let dg = scratch[(fy + roles.delta_green.1) * width + fx + roles.delta_green.0];
            let cg = ga - pred;
            let y = bu + (cg >> 1);
            dv.set(fx, fy, luma.encode(y).as_());
            dv.set(fx + 1, fy, chroma.encode(cg).as_());
            dv.set(fx, fy + 1, chroma.encode(co).as_());
            dv.set(fx + 1, fy + 1, chroma.encode(dg).as_());
        }
    }
    Ok(())
}

fn ydgcocgx_inverse_impl<T, P>(
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
    let roles = CellRoles::new(pattern);
    let mut scratch = vec![0i64; width * height];

    // Undo the luma update; the lifted channels return to their CFA sites so
    // the direction-dependent predict can read its neighbors.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let fx = 2 * cx;
            let fy = 2 * cy;
            let y = luma.decode(sv.get(fx, fy).as_());
            let cg = chroma.decode(sv.get(fx + 1, fy).as_());
            let co = chroma.decode(sv.get(fx, fy + 1).as_());
            let dg = chroma.decode(sv.get(fx + 1, fy + 1).as_());
            let bu = y - (cg >> 1);
            scratch[(fy + roles.blue.1) * width + fx + roles.blue.0] = bu;
            scratch[(fy + roles.red.1) * width + fx + roles.red.0] = co;
            scratch[(fy + roles.avg_green.1) * width + fx + roles.avg_green.0] = cg;
            scratch[(fy + roles.delta_green.1) * width + fx + roles.delta_green.0] = dg;
        }
    }

    // Undo the remaining lifts with the recovered blue updates.
    for cy in 0..height / 2 {
        for cx in 0..width / 2 {
            let fx = 2 * cx;
            let fy = 2 * cy;
            let gx = (fx + roles.avg_green.0) as i64;
            let gy = (fy + roles.avg_green.1) as i64;
            let [(ax, ay), (nx, ny)] = roles.blue_neighbors(gx, gy);
            let pred = (scratch_at(&scratch, wi, hi, ax, ay)
                + scratch_at(&scratch, wi, hi, nx, ny)
                + 1)
                >> 1;
            let cg = scratch[gy as usize * width + gx as usize];
            let bu = scratch[(fy + roles.blue.1) * width + fx + roles.blue.0];
            let co = scratch[(fy + roles.red.1) * width + fx + roles.red.0];
            let dg = scratch[(fy + roles.delta_green.1) * width + fx + roles.delta_green.0];
            let ga = cg + pred;
            let g_first = ga - (dg >> 1);
            let g_second = dg + g_first;
            let b = bu - (co >> 1);
            let r = co + b;
            dv.set(
                fx + roles.red.0,
                fy + roles.red.1,
                clamp_sample(r, min, max).as_(),
            );
            dv.set(
                fx + roles.blue.0,
                fy + roles.blue.1,
                clamp_sample(b, min, max).as_(),
            );
            dv.set(
                fx + roles.avg_green.0,
                fy + roles.avg_green.1,
                clamp_sample(g_first, min, max).as_(),
            );
            dv.set(
                fx + roles.delta_green.0,
                fy + roles.delta_green.1,
                clamp_sample(g_second, min, max).as_(),
            );
        }
    }
    Ok(())
}

/// Applies the forward YDgCoCgX lifting transform to a 1-component CFA image.
///
/// Six lifting steps per 2x2 cell: green delta-lift, green average-lift,
/// red-vs-blue predict, blue update from the red average, a
/// direction-dependent green-vs-blue predict using the horizontal or
/// vertical blue pair depending on whether the average-site green shares a
/// column with blue, and a final luma update. The (Y, Cg, Co, Dg) quadruple
/// packs into the cell at `(0,0)`, `(1,0)`, `(0,1)`, `(1,1)`.
///
/// # Arguments
///
/// * `image` - Source CFA image, must have exactly one component and even dimensions.
/// * `pattern` - The Bayer arrangement of the mosaic.
/// * `mode` - Chroma difference representation, see [ChromaMode].
///
pub fn forward_ydgcocgx(
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
        ydgcocgx_forward_impl(plane, &mut dst, pattern, luma_codec, chroma_codec)
    )?;

    Ok(PlanarImage {
        planes: vec![dst],
        width: image.width,
        height: image.height,
    })
}

/// Applies the inverse YDgCoCgX lifting transform to a packed 1-component
/// image, recovering the original mosaic bit-for-bit.
///
/// The direction test of the green-vs-blue predict is re-derived from the
/// arrangement, so forward and inverse always walk the same neighbor pair.
///
/// # Arguments
///
/// * `image` - Packed lifted image produced by the forward transform.
/// * `pattern` - The Bayer arrangement of the original mosaic.
/// * `mode` - Chroma difference representation used by the forward pass.
///
pub fn inverse_ydgcocgx(
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
        ydgcocgx_inverse_impl(
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
    use crate::samples::SampleType;
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

    #[test]
    fn direction_test_follows_arrangement() {
        // RGGB and GRBG place the raster-first green over blue, the other
        // two arrangements beside it.
        assert!(CellRoles::new(BayerPattern::Rggb).vertical);
        assert!(CellRoles::new(BayerPattern::Grbg).vertical);
        assert!(!CellRoles::new(BayerPattern::Gbrg).vertical);
        assert!(!CellRoles::new(BayerPattern::Bggr).vertical);
    }

    #[test]
    fn constant_mosaic_reference_cell() {
        // RGGB constant phases r=100, g1=110, g2=120, b=130: dg=10, ga=115,
        // co=-30, bu=115, the predict cancels so cg=0, y=115. With the
        // 8-bit offset the packed cell reads (115, 128, 98, 138).
        let mut data = vec![0u8; 36];
        for y in 0..6usize {
            for x in 0..6usize {
                data[y * 6 + x] = match (x & 1, y & 1) {
                    (0, 0) => 100,
                    (1, 0) => 110,
                    (0, 1) => 120,
                    _ => 130,
                };
            }
        }
        let image = cfa_u8(6, 6, data);
        let packed =
            forward_ydgcocgx(&image, BayerPattern::Rggb, ChromaMode::UnsignedOffset).unwrap();
        let pv = packed.planes[0].view::<u16>().unwrap();
        for cy in 0..3 {
            for cx in 0..3 {
                assert_eq!(pv.get(2 * cx, 2 * cy), 115);
                assert_eq!(pv.get(2 * cx + 1, 2 * cy), 128);
                assert_eq!(pv.get(2 * cx, 2 * cy + 1), 98);
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
        data[0] = 0;
        data[1] = 255;
        data[17] = 255;
        for pattern in PATTERNS {
            for mode in [ChromaMode::UnsignedOffset, ChromaMode::Signed] {
                let image = cfa_u8(width, height, data.clone());
                let packed = forward_ydgcocgx(&image, pattern, mode).unwrap();
                assert_eq!(packed.planes[0].bit_depth, 9);
                let back = inverse_ydgcocgx(&packed, pattern, mode).unwrap();
                match &back.planes[0].store {
                    PlaneStore::U8(b) => assert_eq!(b.borrow(), &data[..]),
                    _ => panic!("container changed"),
                }
            }
        }
    }

    #[test]
    fn round_trip_12_bit_u16() {
        let mut rng = rand::rng();
        let width = 10u32;
        let height = 8u32;
        let data: Vec<u16> = (0..width * height)
            .map(|_| rng.random_range(0..=4095))
            .collect();
        let mut plane = ImagePlane::alloc(width, height, SampleType::U16, 12);
        plane.store = PlaneStore::U16(BufferStoreMut::Owned(data.clone()));
        let image = PlanarImage {
            planes: vec![plane],
            width,
            height,
        };
        let packed =
            forward_ydgcocgx(&image, BayerPattern::Grbg, ChromaMode::UnsignedOffset).unwrap();
        assert_eq!(packed.planes[0].bit_depth, 13);
        let back = inverse_ydgcocgx(&packed, BayerPattern::Grbg, ChromaMode::UnsignedOffset).unwrap();
        match &back.planes[0].store {
            PlaneStore::U16(b) => assert_eq!(b.borrow(), &data[..]),
            _ => panic!("container changed"),
        }
    }
}
