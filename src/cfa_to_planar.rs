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
use crate::cfa_error::check_even_dimensions;
use crate::images::{check_matching_planes, ImagePlane, PlanarImage, SampleStore};
use crate::samples::dispatch_any_sample;
use crate::{BayerPattern, CfaError};
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::ParallelSliceMut;

/// Phase offsets for the four planar components.
///
/// Raster order walks the 2x2 cell left to right, top to bottom; the
/// reshuffled order is the arrangement's canonical (R, G1, G2, B).
#[inline]
fn phase_offsets(pattern: BayerPattern, reshuffle: bool) -> [(u32, u32); 4] {
    if reshuffle {
        pattern.positions()
    } else {
        [(0, 0), (1, 0), (0, 1), (1, 1)]
    }
}

fn split_cfa_phases<T: SampleStore + Send + Sync>(
    src: &ImagePlane<'_>,
    planes: &mut [ImagePlane<'static>],
    offsets: [(u32, u32); 4],
) -> Result<(), CfaError> {
    let sv = src.view::<T>()?;
    for (plane, (px, py)) in planes.iter_mut().zip(offsets) {
        let dw = plane.width as usize;
        let sx = px as usize;
        let sy = py as usize;
        let data = T::plane_mut(&mut plane.store).ok_or(CfaError::InconsistentComponents(
            "sample container",
        ))?;

        let iter;
        #[cfg(feature = "rayon")]
        {
            iter = data.par_chunks_exact_mut(dw);
        }
        #[cfg(not(feature = "rayon"))]
        {
            iter = data.chunks_exact_mut(dw);
        }
        iter.enumerate().for_each(|(y, row)| {
            for (x, dst) in row.iter_mut().enumerate() {
                *dst = sv.get(2 * x + sx, 2 * y + sy);
            }
        });
    }
    Ok(())
}

fn merge_cfa_phases<T: SampleStore + Send + Sync>(
    planes: &[ImagePlane<'_>],
    dst: &mut ImagePlane<'static>,
    offsets: [(u32, u32); 4],
) -> Result<(), CfaError> {
    let views = [
        planes[0].view::<T>()?,
        planes[1].view::<T>()?,
        planes[2].view::<T>()?,
        planes[3].view::<T>()?,
    ];
    let dw = dst.width as usize;
    let data = T::plane_mut(&mut dst.store).ok_or(CfaError::InconsistentComponents(
        "sample container",
    ))?;

    let iter;
    #[cfg(feature = "rayon")]
    {
        iter = data.par_chunks_exact_mut(dw);
    }
    #[cfg(not(feature = "rayon"))]
    {
        iter = data.chunks_exact_mut(dw);
    }
    iter.enumerate().for_each(|(y, row)| {
        let cy = y >> 1;
        for (view, (px, py)) in views.iter().zip(offsets) {
            if py as usize != (y & 1) {
                continue;
            }
            let px = px as usize;
            for cx in 0..dw / 2 {
                row[2 * cx + px] = view.get(cx, cy);
            }
        }
    });
    Ok(())
}

/// Converts a 1-component interleaved CFA image into a 4-component planar one.
///
/// Each of the four 2x2 sub-pixel phases becomes its own plane at half the
/// CFA width and height. With `reshuffle` the planes are ordered
/// (R, G1, G2, B) according to the arrangement, otherwise they follow the
/// raster order of the cell. Works for every supported sample container,
/// floats included.
///
/// # Arguments
///
/// * `image` - Source CFA image, must have exactly one component and even dimensions.
/// * `pattern` - The Bayer arrangement of the mosaic.
/// * `reshuffle` - Orders the planes canonically (R, G1, G2, B) instead of by raster phase.
///
pub fn cfa_to_planar4(
    image: &PlanarImage<'_>,
    pattern: BayerPattern,
    reshuffle: bool,
) -> Result<PlanarImage<'static>, CfaError> {
    image.expect_depth(1)?;
    check_even_dimensions(image.width, image.height)?;
    let src = &image.planes[0];
    src.check_constraints()?;
    if src.width != image.width || src.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }

    let half_w = image.width / 2;
    let half_h = image.height / 2;
    let mut planes: Vec<ImagePlane<'static>> = (0..4)
        .map(|_| ImagePlane::alloc(half_w, half_h, src.sample_type(), src.bit_depth))
        .collect();

    let offsets = phase_offsets(pattern, reshuffle);
    dispatch_any_sample!(
        src.sample_type(),
        split_cfa_phases(src, &mut planes, offsets)
    )?;

    Ok(PlanarImage {
        planes,
        width: half_w,
        height: half_h,
    })
}

/// Reassembles a 4-component planar image into a 1-component interleaved CFA.
///
/// The exact inverse of [cfa_to_planar4]: the four planes must agree on
/// size, container, bit depth and subsampling, and are written back into
/// their 2x2 phases at double width and height.
///
/// # Arguments
///
/// * `image` - Source planar image with exactly four matching components.
/// * `pattern` - The Bayer arrangement of the target mosaic.
/// * `reshuffle` - Set when the planes are ordered (R, G1, G2, B) rather than by raster phase.
///
pub fn planar4_to_cfa(
    image: &PlanarImage<'_>,
    pattern: BayerPattern,
    reshuffle: bool,
) -> Result<PlanarImage<'static>, CfaError> {
    image.expect_depth(4)?;
    check_matching_planes(&image.planes)?;
    for plane in image.planes.iter() {
        plane.check_constraints()?;
        if plane.sub_x != 1 || plane.sub_y != 1 {
            return Err(CfaError::InconsistentComponents("subsampling"));
        }
    }
    let first = &image.planes[0];
    if first.width != image.width || first.height != image.height {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }

    let cfa_w = image.width * 2;
    let cfa_h = image.height * 2;
    let mut dst = ImagePlane::alloc(cfa_w, cfa_h, first.sample_type(), first.bit_depth);

    let offsets = phase_offsets(pattern, reshuffle);
    dispatch_any_sample!(
        first.sample_type(),
        merge_cfa_phases(&image.planes, &mut dst, offsets)
    )?;

    Ok(PlanarImage {
        planes: vec![dst],
        width: cfa_w,
        height: cfa_h,
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
    fn split_follows_arrangement() {
        // 2x2 mosaic in RGGB order: r=9, g1=20, g2=31, b=42.
        let image = cfa_u8(2, 2, vec![9, 20, 31, 42]);
        let planar = cfa_to_planar4(&image, BayerPattern::Rggb, true).unwrap();
        let values: Vec<u8> = planar
            .planes
            .iter()
            .map(|p| p.view::<u8>().unwrap().get(0, 0))
            .collect();
        assert_eq!(values, vec![9, 20, 31, 42]);

        // Same mosaic read as BGGR swaps red/blue and the greens.
        let planar = cfa_to_planar4(&image, BayerPattern::Bggr, true).unwrap();
        let values: Vec<u8> = planar
            .planes
            .iter()
            .map(|p| p.view::<u8>().unwrap().get(0, 0))
            .collect();
        assert_eq!(values, vec![42, 31, 20, 9]);
    }

    #[test]
    fn raster_order_ignores_arrangement() {
        let image = cfa_u8(2, 2, vec![1, 2, 3, 4]);
        for pattern in PATTERNS {
            let planar = cfa_to_planar4(&image, pattern, false).unwrap();
            let values: Vec<u8> = planar
                .planes
                .iter()
                .map(|p| p.view::<u8>().unwrap().get(0, 0))
                .collect();
            assert_eq!(values, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn round_trip_all_patterns() {
        let mut rng = rand::rng();
        let width = 16u32;
        let height = 12u32;
        let data: Vec<u8> = (0..width * height).map(|_| rng.random_range(0..=255)).collect();
        for pattern in PATTERNS {
            for reshuffle in [false, true] {
                let image = cfa_u8(width, height, data.clone());
                let planar = cfa_to_planar4(&image, pattern, reshuffle).unwrap();
                assert_eq!(planar.depth(), 4);
                assert_eq!(planar.width, width / 2);
                let back = planar4_to_cfa(&planar, pattern, reshuffle).unwrap();
                match &back.planes[0].store {
                    PlaneStore::U8(b) => assert_eq!(b.borrow(), &data[..]),
                    _ => panic!("container changed"),
                }
            }
        }
    }

    #[test]
    fn round_trip_f32_plane() {
        let width = 6u32;
        let height = 4u32;
        let data: Vec<f32> = (0..width * height).map(|v| v as f32 * 0.25).collect();
        let mut plane = ImagePlane::alloc(width, height, SampleType::F32, 32);
        plane.store = PlaneStore::F32(BufferStoreMut::Owned(data.clone()));
        let image = PlanarImage {
            planes: vec![plane],
            width,
            height,
        };
        let planar = cfa_to_planar4(&image, BayerPattern::Grbg, true).unwrap();
        let back = planar4_to_cfa(&planar, BayerPattern::Grbg, true).unwrap();
        match &back.planes[0].store {
            PlaneStore::F32(b) => assert_eq!(b.borrow(), &data[..]),
            _ => panic!("container changed"),
        }
    }

    #[test]
    fn odd_dimensions_are_rejected() {
        let image = cfa_u8(3, 2, vec![0; 6]);
        assert_eq!(
            cfa_to_planar4(&image, BayerPattern::Rggb, true).unwrap_err(),
            CfaError::InvalidDimensions {
                width: 3,
                height: 2
            }
        );
    }

    #[test]
    fn wrong_depth_is_rejected() {
        let planar = PlanarImage {
            planes: vec![
                ImagePlane::alloc(2, 2, SampleType::U8, 8),
                ImagePlane::alloc(2, 2, SampleType::U8, 8),
            ],
            width: 2,
            height: 2,
        };
        assert!(matches!(
            cfa_to_planar4(&planar, BayerPattern::Rggb, true),
            Err(CfaError::ComponentCountMismatch(_))
        ));
        assert!(matches!(
            planar4_to_cfa(&planar, BayerPattern::Rggb, true),
            Err(CfaError::ComponentCountMismatch(_))
        ));
    }

    #[test]
    fn mismatched_planes_are_rejected() {
        let planes = vec![
            ImagePlane::alloc(2, 2, SampleType::U8, 8),
            ImagePlane::alloc(2, 2, SampleType::U8, 8),
            ImagePlane::alloc(2, 2, SampleType::U16, 8),
            ImagePlane::alloc(2, 2, SampleType::U8, 8),
        ];
        let planar = PlanarImage {
            planes,
            width: 2,
            height: 2,
        };
        assert_eq!(
            planar4_to_cfa(&planar, BayerPattern::Rggb, true).unwrap_err(),
            CfaError::InconsistentComponents("sample container")
        );
    }
}
