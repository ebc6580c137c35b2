/*
 * Copyright (c) Radzivon Bartoshyk, 2/2025. All rights reserved.
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
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfaError {
    ZeroBaseSize,
    PointerOverflow,
    PlaneSizeMismatch(MismatchedSize),
    MinimumPlaneSizeMismatch(MismatchedSize),
    /// CFA conversions require even dimensions, partial cells are rejected outright.
    InvalidDimensions {
        width: u32,
        height: u32,
    },
    /// Components expected to agree on a property do not.
    InconsistentComponents(&'static str),
    ComponentCountMismatch(MismatchedSize),
    UnsupportedSampleType {
        bit_depth: u32,
        signed: bool,
        is_float: bool,
    },
    UnsupportedBitDepth(u32),
    UnknownPattern(String),
}

impl Display for CfaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CfaError::ZeroBaseSize => f.write_str("Zero sized images is not supported"),
            CfaError::PointerOverflow => f.write_str("Image size overflow pointer capabilities"),
            CfaError::PlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Plane have invalid size, it must be {}, but it was {}",
                size.expected, size.received
            )),
            CfaError::MinimumPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Plane have invalid size, it must be at least {}, but it was {}",
                size.expected, size.received
            )),
            CfaError::InvalidDimensions { width, height } => f.write_fmt(format_args!(
                "CFA conversion requires even dimensions, but image is {}x{}",
                width, height
            )),
            CfaError::InconsistentComponents(what) => f.write_fmt(format_args!(
                "Components disagree on {}, all components must match",
                what
            )),
            CfaError::ComponentCountMismatch(size) => f.write_fmt(format_args!(
                "Image must have {} components, but it has {}",
                size.expected, size.received
            )),
            CfaError::UnsupportedSampleType {
                bit_depth,
                signed,
                is_float,
            } => f.write_fmt(format_args!(
                "No sample container for bit depth {} (signed={}, float={})",
                bit_depth, signed, is_float
            )),
            CfaError::UnsupportedBitDepth(depth) => f.write_fmt(format_args!(
                "Bit depth {} is not supported by the decorrelation engine",
                depth
            )),
            CfaError::UnknownPattern(code) => f.write_fmt(format_args!(
                "Unknown Bayer arrangement '{}', expected one of grbg, rggb, gbrg, bggr",
                code
            )),
        }
    }
}

impl Error for CfaError {}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<(), CfaError> {
    let (_, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(CfaError::PointerOverflow);
    }
    Ok(())
}

#[inline]
pub(crate) fn check_even_dimensions(width: u32, height: u32) -> Result<(), CfaError> {
    if width == 0 || height == 0 {
        return Err(CfaError::ZeroBaseSize);
    }
    if width & 1 != 0 || height & 1 != 0 {
        return Err(CfaError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Verifies a strided plane of `len` elements reaches all of its samples.
#[inline]
pub(crate) fn check_plane_len(
    len: usize,
    pixel_stride: u32,
    row_stride: u32,
    width: u32,
    height: u32,
) -> Result<(), CfaError> {
    if width == 0 || height == 0 {
        return Err(CfaError::ZeroBaseSize);
    }
    check_overflow_v2(row_stride as usize, height as usize)?;
    check_overflow_v2(pixel_stride as usize, width as usize)?;
    let last_sample =
        (height as usize - 1) * row_stride as usize + (width as usize - 1) * pixel_stride as usize;
    if last_sample >= len {
        return Err(CfaError::MinimumPlaneSizeMismatch(MismatchedSize {
            expected: last_sample + 1,
            received: len,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_check_accepts_packed_plane() {
        assert!(check_plane_len(12, 1, 4, 4, 3).is_ok());
    }

    #[test]
    fn plane_check_rejects_short_buffer() {
        assert_eq!(
            check_plane_len(11, 1, 4, 4, 3),
            Err(CfaError::MinimumPlaneSizeMismatch(MismatchedSize {
                expected: 12,
                received: 11,
            }))
        );
    }

    #[test]
    fn plane_check_handles_pixel_stride() {
        // 2x2 samples interleaved with a stride of 2 elements.
        assert!(check_plane_len(8, 2, 4, 2, 2).is_ok());
        assert!(check_plane_len(8, 2, 4, 3, 2).is_err());
    }

    #[test]
    fn even_dimension_check() {
        assert!(check_even_dimensions(4, 4).is_ok());
        assert_eq!(
            check_even_dimensions(5, 4),
            Err(CfaError::InvalidDimensions {
                width: 5,
                height: 4
            })
        );
        assert_eq!(check_even_dimensions(0, 4), Err(CfaError::ZeroBaseSize));
    }
}
