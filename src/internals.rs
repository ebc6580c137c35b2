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
use crate::images::{check_matching_planes, PlanarImage};
use crate::numerics::ChromaCodec;
use crate::samples::SampleType;
use crate::{CfaError, ChromaMode};

/// Widest luma precision the lifting engine accepts; one-bit chroma
/// expansion plus headroom must still fit a 64-bit container.
pub(crate) const MAX_LIFT_BIT_DEPTH: u32 = 32;

/// Signed sources leave no unsigned container to bias into, so they always
/// take the signed chroma representation.
#[inline]
pub(crate) fn effective_mode(luma: SampleType, mode: ChromaMode) -> ChromaMode {
    if luma.is_signed() {
        ChromaMode::Signed
    } else {
        mode
    }
}

/// Picks an integer container of at least `bits` precision that is also no
/// narrower than the luma container, so a widened plane never downgrades a
/// caller's non-minimal storage choice.
fn widened_container(luma: SampleType, bits: u32, signed: bool) -> Result<SampleType, CfaError> {
    let base = SampleType::smallest_integer(bits, signed)?;
    if base.bits() < luma.bits() {
        SampleType::smallest_integer(luma.bits(), signed)
    } else {
        Ok(base)
    }
}

/// Container of a planar chroma component for `bit_depth`-bit luma.
pub(crate) fn chroma_plane_type(
    luma: SampleType,
    bit_depth: u32,
    mode: ChromaMode,
) -> Result<SampleType, CfaError> {
    match effective_mode(luma, mode) {
        ChromaMode::UnsignedOffset => widened_container(luma, bit_depth + 1, false),
        ChromaMode::Signed => widened_container(luma, bit_depth + 1, true),
    }
}

/// Codec of a planar chroma component for `bit_depth`-bit luma.
pub(crate) fn chroma_plane_codec(luma: SampleType, bit_depth: u32, mode: ChromaMode) -> ChromaCodec {
    let mode = effective_mode(luma, mode);
    ChromaCodec::new(
        mode,
        bit_depth,
        bit_depth + 1,
        mode == ChromaMode::UnsignedOffset,
    )
}

/// Container of a packed lifted plane, X-transforms and the 4:2:2 family.
///
/// Lifted intermediates can transiently exceed the luma range, so the
/// container keeps two extra bits of headroom and matches the source
/// signedness, which the inverse direction recovers the luma container from.
pub(crate) fn packed_plane_type(luma: SampleType, bit_depth: u32) -> Result<SampleType, CfaError> {
    widened_container(luma, bit_depth + 2, luma.is_signed())
}

/// Codec of a difference channel inside a packed lifted plane.
pub(crate) fn packed_chroma_codec(luma: SampleType, bit_depth: u32, mode: ChromaMode) -> ChromaCodec {
    let mode = effective_mode(luma, mode);
    ChromaCodec::new(mode, bit_depth, bit_depth + 2, !luma.is_signed())
}

/// Codec of the luma channel inside a packed lifted plane.
pub(crate) fn packed_luma_codec(luma: SampleType, bit_depth: u32) -> ChromaCodec {
    ChromaCodec::unbiased(bit_depth + 2, !luma.is_signed())
}

/// Edge-mirrored read from a full-resolution lifting scratch plane.
///
/// The scratch grid carries lifted channels at their disjoint CFA sites, so
/// a mirrored diagonal read always lands on the intended channel.
#[inline(always)]
pub(crate) fn scratch_at(scratch: &[i64], width: i64, height: i64, x: i64, y: i64) -> i64 {
    let mx = crate::strided::reflect(x, width);
    let my = crate::strided::reflect(y, height);
    scratch[(my * width + mx) as usize]
}

/// Shared front gate of every lifting transform: component count, plane
/// agreement, integer container, supported precision. Runs before any
/// allocation so a failed call leaves no partial state behind.
pub(crate) fn check_lift_components(
    image: &PlanarImage<'_>,
    expected_depth: usize,
) -> Result<(), CfaError> {
    image.expect_depth(expected_depth)?;
    image.check_constraints()?;
    check_matching_planes(&image.planes)?;
    let first = &image.planes[0];
    let sample_type = first.sample_type();
    if sample_type.is_float() {
        return Err(CfaError::UnsupportedSampleType {
            bit_depth: first.bit_depth,
            signed: sample_type.is_signed(),
            is_float: true,
        });
    }
    if first.bit_depth > MAX_LIFT_BIT_DEPTH {
        return Err(CfaError::UnsupportedBitDepth(first.bit_depth));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chroma_container_widens_by_one_bit() {
        assert_eq!(
            chroma_plane_type(SampleType::U8, 8, ChromaMode::UnsignedOffset),
            Ok(SampleType::U16)
        );
        assert_eq!(
            chroma_plane_type(SampleType::U8, 6, ChromaMode::UnsignedOffset),
            Ok(SampleType::U8)
        );
        assert_eq!(
            chroma_plane_type(SampleType::U8, 8, ChromaMode::Signed),
            Ok(SampleType::I16)
        );
        assert_eq!(
            chroma_plane_type(SampleType::I16, 16, ChromaMode::UnsignedOffset),
            Ok(SampleType::I32)
        );
        assert_eq!(
            chroma_plane_type(SampleType::U32, 32, ChromaMode::UnsignedOffset),
            Ok(SampleType::U64)
        );
    }

    #[test]
    fn packed_container_keeps_headroom() {
        assert_eq!(packed_plane_type(SampleType::U8, 8), Ok(SampleType::U16));
        assert_eq!(packed_plane_type(SampleType::U16, 14), Ok(SampleType::U16));
        assert_eq!(packed_plane_type(SampleType::I16, 16), Ok(SampleType::I32));
        assert_eq!(packed_plane_type(SampleType::U32, 32), Ok(SampleType::U64));
    }
}
