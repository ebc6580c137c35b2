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
use crate::images::{ImagePlane, PlanarImage, SampleStore};
use crate::samples::dispatch_any_sample;
use crate::{BayerPattern, CfaError};

fn split_c422<T: SampleStore>(
    src: &ImagePlane<'_>,
    luma: &mut ImagePlane<'static>,
    red: &mut ImagePlane<'static>,
    blue: &mut ImagePlane<'static>,
    pattern: BayerPattern,
) -> Result<(), CfaError> {
    let sv = src.view::<T>()?;
    let half_w = red.width as usize;
    let half_h = red.height as usize;
    let mut lv = luma.view_mut::<T>()?;
    let mut rv = red.view_mut::<T>()?;
    let mut bv = blue.view_mut::<T>()?;
    let [(rx, ry), (g1x, g1y), (g2x, g2y), (bx, by)] = pattern.positions();
    for cy in 0..half_h {
        for cx in 0..half_w {
            let fx = 2 * cx;
            let fy = 2 * cy;
            // Greens interleave horizontally into the luma plane.
            lv.set(fx, cy, sv.get(fx + g1x as usize, fy + g1y as usize));
            lv.set(fx + 1, cy, sv.get(fx + g2x as usize, fy + g2y as usize));
            rv.set(cx, cy, sv.get(fx + rx as usize, fy + ry as usize));
            bv.set(cx, cy, sv.get(fx + bx as usize, fy + by as usize));
        }
    }
    Ok(())
}

fn merge_c422<T: SampleStore>(
    luma: &ImagePlane<'_>,
    red: &ImagePlane<'_>,
    blue: &ImagePlane<'_>,
    dst: &mut ImagePlane<'static>,
    pattern: BayerPattern,
) -> Result<(), CfaError> {
    let lv = luma.view::<T>()?;
    let rv = red.view::<T>()?;
    let bv = blue.view::<T>()?;
    let mut dv = dst.view_mut::<T>()?;
    let [(rx, ry), (g1x, g1y), (g2x, g2y), (bx, by)] = pattern.positions();
    let half_w = red.width as usize;
    let half_h = red.height as usize;
    for cy in 0..half_h {
        for cx in 0..half_w {
            let fx = 2 * cx;
            let fy = 2 * cy;
            dv.set(fx + g1x as usize, fy + g1y as usize, lv.get(fx, cy));
            dv.set(fx + g2x as usize, fy + g2y as usize, lv.get(fx + 1, cy));
            dv.set(fx + rx as usize, fy + ry as usize, rv.get(cx, cy));
            dv.set(fx + bx as usize, fy + by as usize, bv.get(cx, cy));
        }
    }
    Ok(())
}

/// Converts a 1-component CFA image into a 3-component 4:2:2 image with
/// green as luma.
///
/// The two green phases of every cell are interleaved horizontally into
/// component 0 at full width; red and blue occupy components 1 and 2 at
/// half width. The produced image is half the CFA height.
///
/// # Arguments
///
/// * `image` - Source CFA image, must have exactly one component and even dimensions.
/// * `pattern` - The Bayer arrangement of the mosaic.
///
pub fn cfa_to_c422(
    image: &PlanarImage<'_>,
    pattern: BayerPattern,
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
    let mut luma = ImagePlane::alloc(image.width, half_h, src.sample_type(), src.bit_depth);
    let mut red = ImagePlane::alloc(half_w, half_h, src.sample_type(), src.bit_depth);
    let mut blue = ImagePlane::alloc(half_w, half_h, src.sample_type(), src.bit_depth);
    red.sub_x = 2;
    blue.sub_x = 2;

    dispatch_any_sample!(
        src.sample_type(),
        split_c422(src, &mut luma, &mut red, &mut blue, pattern)
    )?;

    Ok(PlanarImage {
        planes: vec![luma, red, blue],
        width: image.width,
        height: half_h,
    })
}

/// Reassembles a 3-component 4:2:2 image into a 1-component interleaved CFA.
///
/// The exact inverse of [cfa_to_c422]; the luma plane must be of even full
/// width and the chroma planes of half width, all sharing one container and
/// bit depth.
///
/// # Arguments
///
/// * `image` - Source 4:2:2 image with exactly three components.
/// * `pattern` - The Bayer arrangement of the target mosaic.
///
pub fn c422_to_cfa(
    image: &PlanarImage<'_>,
    pattern: BayerPattern,
) -> Result<PlanarImage<'static>, CfaError> {
    image.expect_depth(3)?;
    let luma = &image.planes[0];
    let red = &image.planes[1];
    let blue = &image.planes[2];
    for plane in image.planes.iter() {
        plane.check_constraints()?;
    }
    if luma.width != image.width || luma.height != image.height || luma.width & 1 != 0 {
        return Err(CfaError::InvalidDimensions {
            width: luma.width,
            height: luma.height,
        });
    }
    if red.sample_type() != luma.sample_type()
        || blue.sample_type() != luma.sample_type()
    {
        return Err(CfaError::InconsistentComponents("sample container"));
    }
    if red.bit_depth != luma.bit_depth || blue.bit_depth != luma.bit_depth {
        return Err(CfaError::InconsistentComponents("bit depth"));
    }
    let half_w = luma.width / 2;
    if red.width != half_w
        || blue.width != half_w
        || red.height != luma.height
        || blue.height != luma.height
    {
        return Err(CfaError::InconsistentComponents("dimensions"));
    }

    let cfa_h = luma.height * 2;
    let mut dst = ImagePlane::alloc(luma.width, cfa_h, luma.sample_type(), luma.bit_depth);

    dispatch_any_sample!(
        luma.sample_type(),
        merge_c422(luma, red, blue, &mut dst, pattern)
    )?;

    Ok(PlanarImage {
        planes: vec![dst],
        width: luma.width,
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

    fn cfa_u16(width: u32, height: u32, data: Vec<u16>, bit_depth: u32) -> PlanarImage<'static> {
        let mut plane = ImagePlane::alloc(width, height, SampleType::U16, bit_depth);
        plane.store = PlaneStore::U16(BufferStoreMut::Owned(data));
        PlanarImage {
            planes: vec![plane],
            width,
            height,
        }
    }

    #[test]
    fn greens_interleave_into_luma() {
        // RGGB cell: r=1, g1=2, g2=3, b=4.
        let image = cfa_u16(2, 2, vec![1, 2, 3, 4], 8);
        let c422 = cfa_to_c422(&image, BayerPattern::Rggb).unwrap();
        assert_eq!(c422.depth(), 3);
        assert_eq!(c422.width, 2);
        assert_eq!(c422.height, 1);
        let lv = c422.planes[0].view::<u16>().unwrap();
        assert_eq!(lv.get(0, 0), 2);
        assert_eq!(lv.get(1, 0), 3);
        assert_eq!(c422.planes[1].view::<u16>().unwrap().get(0, 0), 1);
        assert_eq!(c422.planes[2].view::<u16>().unwrap().get(0, 0), 4);
        assert_eq!(c422.planes[1].sub_x, 2);
    }

    #[test]
    fn round_trip_all_patterns() {
        let mut rng = rand::rng();
        let width = 12u32;
        let height = 8u32;
        let data: Vec<u16> = (0..width * height)
            .map(|_| rng.random_range(0..=1023))
            .collect();
        for pattern in PATTERNS {
            let image = cfa_u16(width, height, data.clone(), 10);
            let c422 = cfa_to_c422(&image, pattern).unwrap();
            let back = c422_to_cfa(&c422, pattern).unwrap();
            assert_eq!(back.width, width);
            assert_eq!(back.height, height);
            match &back.planes[0].store {
                PlaneStore::U16(b) => assert_eq!(b.borrow(), &data[..]),
                _ => panic!("container changed"),
            }
        }
    }

    #[test]
    fn odd_dimensions_are_rejected() {
        let image = cfa_u16(4, 3, vec![0; 12], 8);
        assert!(matches!(
            cfa_to_c422(&image, BayerPattern::Grbg),
            Err(CfaError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn component_count_is_checked() {
        let image = cfa_u16(4, 4, vec![0; 16], 8);
        assert!(matches!(
            c422_to_cfa(&image, BayerPattern::Grbg),
            Err(CfaError::ComponentCountMismatch(_))
        ));
    }

    #[test]
    fn chroma_shape_is_checked() {
        let image = cfa_u16(4, 4, vec![0; 16], 8);
        let mut c422 = cfa_to_c422(&image, BayerPattern::Rggb).unwrap();
        c422.planes[2] = ImagePlane::alloc(3, 2, SampleType::U16, 8);
        assert_eq!(
            c422_to_cfa(&c422, BayerPattern::Rggb).unwrap_err(),
            CfaError::InconsistentComponents("dimensions")
        );
    }
}
