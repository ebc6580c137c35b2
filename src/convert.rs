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
use crate::cfa_to_422::{c422_to_cfa, cfa_to_c422};
use crate::cfa_to_planar::{cfa_to_planar4, planar4_to_cfa};
use crate::images::PlanarImage;
use crate::rct::{forward_rct, inverse_rct};
use crate::rct422::{forward_rct422, forward_ycgco422, inverse_rct422, inverse_ycgco422};
use crate::rct_delta::{forward_rctd, inverse_rctd};
use crate::rct_lifting::{forward_rctx, inverse_rctx};
use crate::ycgco::{forward_ycgco, forward_ycgcod, inverse_ycgco, inverse_ycgcod};
use crate::ydgcocgx::{forward_ydgcocgx, inverse_ydgcocgx};
use crate::{BayerPattern, CfaError, ChromaMode};

/// Names every layout conversion and decorrelation the engine performs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Conversion {
    CfaToPlanar4 { reshuffle: bool },
    Planar4ToCfa { reshuffle: bool },
    CfaToC422,
    C422ToCfa,
    ForwardRct,
    InverseRct,
    ForwardRctd,
    InverseRctd,
    ForwardRctx,
    InverseRctx,
    ForwardYCgCo,
    InverseYCgCo,
    ForwardYCgCoD,
    InverseYCgCoD,
    ForwardYDgCoCgX,
    InverseYDgCoCgX,
    ForwardRct422,
    InverseRct422,
    ForwardYCgCo422,
    InverseYCgCo422,
}

/// One configured conversion step, the engine's whole external surface.
///
/// A converter validates, allocates and computes into fresh planes, then
/// swaps them into the caller's image. On any error the input image is left
/// exactly as it was; no partially converted state is ever observable.
#[derive(Debug, Copy, Clone)]
pub struct CfaConverter {
    pub conversion: Conversion,
    pub pattern: BayerPattern,
    pub chroma_mode: ChromaMode,
}

impl CfaConverter {
    pub fn new(conversion: Conversion, pattern: BayerPattern, chroma_mode: ChromaMode) -> Self {
        CfaConverter {
            conversion,
            pattern,
            chroma_mode,
        }
    }

    /// Runs the configured conversion, replacing the image's component
    /// buffers on success.
    ///
    /// A planar-family forward transform handed a 1-component CFA image is
    /// routed through the layout converter first, so a mosaic can be
    /// decorrelated in one step.
    pub fn convert(&self, image: &mut PlanarImage<'_>) -> Result<(), CfaError> {
        let converted = self.run(image)?;
        *image = converted;
        Ok(())
    }

    /// Runs the configured conversion into a freshly allocated image,
    /// leaving the source untouched.
    pub fn converted(&self, image: &PlanarImage<'_>) -> Result<PlanarImage<'static>, CfaError> {
        self.run(image)
    }

    fn run(&self, image: &PlanarImage<'_>) -> Result<PlanarImage<'static>, CfaError> {
        let pattern = self.pattern;
        let mode = self.chroma_mode;
        match self.conversion {
            Conversion::CfaToPlanar4 { reshuffle } => cfa_to_planar4(image, pattern, reshuffle),
            Conversion::Planar4ToCfa { reshuffle } => planar4_to_cfa(image, pattern, reshuffle),
            Conversion::CfaToC422 => cfa_to_c422(image, pattern),
            Conversion::C422ToCfa => c422_to_cfa(image, pattern),
            Conversion::ForwardRct => forward_rct(image, mode),
            Conversion::InverseRct => inverse_rct(image, mode),
            Conversion::ForwardRctd => {
                let staged;
                let planar = if image.depth() == 1 {
                    staged = cfa_to_planar4(image, pattern, true)?;
                    &staged
                } else {
                    image
                };
                forward_rctd(planar, mode)
            }
            Conversion::InverseRctd => inverse_rctd(image, mode),
            Conversion::ForwardRctx => forward_rctx(image, pattern, mode),
            Conversion::InverseRctx => inverse_rctx(image, pattern, mode),
            Conversion::ForwardYCgCo => forward_ycgco(image, mode),
            Conversion::InverseYCgCo => inverse_ycgco(image, mode),
            Conversion::ForwardYCgCoD => {
                let staged;
                let planar = if image.depth() == 1 {
                    staged = cfa_to_planar4(image, pattern, true)?;
                    &staged
                } else {
                    image
                };
                forward_ycgcod(planar, mode)
            }
            Conversion::InverseYCgCoD => inverse_ycgcod(image, mode),
            Conversion::ForwardYDgCoCgX => forward_ydgcocgx(image, pattern, mode),
            Conversion::InverseYDgCoCgX => inverse_ydgcocgx(image, pattern, mode),
            Conversion::ForwardRct422 => {
                let staged;
                let c422 = if image.depth() == 1 {
                    staged = cfa_to_c422(image, pattern)?;
                    &staged
                } else {
                    image
                };
                forward_rct422(c422, mode)
            }
            Conversion::InverseRct422 => inverse_rct422(image, mode),
            Conversion::ForwardYCgCo422 => {
                let staged;
                let c422 = if image.depth() == 1 {
                    staged = cfa_to_c422(image, pattern)?;
                    &staged
                } else {
                    image
                };
                forward_ycgco422(c422, mode)
            }
            Conversion::InverseYCgCo422 => inverse_ycgco422(image, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::{BufferStoreMut, ImagePlane, PlaneStore};
    use crate::SampleType;
    use rand::Rng;

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
    fn converts_in_place_and_back() {
        let mut rng = rand::rng();
        let width = 8u32;
        let height = 8u32;
        let data: Vec<u8> = (0..width * height).map(|_| rng.random_range(0..=255)).collect();
        let mut image = cfa_u8(width, height, data.clone());

        let forward = CfaConverter::new(
            Conversion::ForwardRctx,
            BayerPattern::Grbg,
            ChromaMode::UnsignedOffset,
        );
        forward.convert(&mut image).unwrap();
        assert_eq!(image.depth(), 1);
        assert_eq!(image.planes[0].bit_depth, 9);

        let inverse = CfaConverter::new(
            Conversion::InverseRctx,
            BayerPattern::Grbg,
            ChromaMode::UnsignedOffset,
        );
        inverse.convert(&mut image).unwrap();
        match &image.planes[0].store {
            PlaneStore::U8(b) => assert_eq!(b.borrow(), &data[..]),
            _ => panic!("container changed"),
        }
    }

    #[test]
    fn cfa_input_routes_through_layout_for_planar_transforms() {
        let mut rng = rand::rng();
        let width = 8u32;
        let height = 6u32;
        let data: Vec<u8> = (0..width * height).map(|_| rng.random_range(0..=255)).collect();
        let mut image = cfa_u8(width, height, data.clone());

        CfaConverter::new(
            Conversion::ForwardRctd,
            BayerPattern::Bggr,
            ChromaMode::UnsignedOffset,
        )
        .convert(&mut image)
        .unwrap();
        assert_eq!(image.depth(), 4);
        assert_eq!(image.width, width / 2);

        CfaConverter::new(
            Conversion::InverseRctd,
            BayerPattern::Bggr,
            ChromaMode::UnsignedOffset,
        )
        .convert(&mut image)
        .unwrap();
        CfaConverter::new(
            Conversion::Planar4ToCfa { reshuffle: true },
            BayerPattern::Bggr,
            ChromaMode::UnsignedOffset,
        )
        .convert(&mut image)
        .unwrap();
        match &image.planes[0].store {
            PlaneStore::U8(b) => assert_eq!(b.borrow(), &data[..]),
            _ => panic!("container changed"),
        }
    }

    #[test]
    fn failed_conversion_leaves_image_untouched() {
        // Odd dimensions fail validation before anything is allocated.
        let data: Vec<u8> = (0..15).collect();
        let mut image = cfa_u8(5, 3, data.clone());
        let converter = CfaConverter::new(
            Conversion::ForwardYDgCoCgX,
            BayerPattern::Rggb,
            ChromaMode::UnsignedOffset,
        );
        assert!(converter.convert(&mut image).is_err());
        assert_eq!(image.depth(), 1);
        assert_eq!(image.width, 5);
        match &image.planes[0].store {
            PlaneStore::U8(b) => assert_eq!(b.borrow(), &data[..]),
            _ => panic!("buffer replaced on error"),
        }
    }

    #[test]
    fn full_422_pipeline_round_trip() {
        let mut rng = rand::rng();
        let width = 12u32;
        let height = 8u32;
        let data: Vec<u8> = (0..width * height).map(|_| rng.random_range(0..=255)).collect();
        let mut image = cfa_u8(width, height, data.clone());

        CfaConverter::new(
            Conversion::ForwardYCgCo422,
            BayerPattern::Rggb,
            ChromaMode::Signed,
        )
        .convert(&mut image)
        .unwrap();
        assert_eq!(image.depth(), 3);

        CfaConverter::new(
            Conversion::InverseYCgCo422,
            BayerPattern::Rggb,
            ChromaMode::Signed,
        )
        .convert(&mut image)
        .unwrap();
        CfaConverter::new(
            Conversion::C422ToCfa,
            BayerPattern::Rggb,
            ChromaMode::Signed,
        )
        .convert(&mut image)
        .unwrap();
        match &image.planes[0].store {
            PlaneStore::U8(b) => assert_eq!(b.borrow(), &data[..]),
            _ => panic!("container changed"),
        }
    }
}
