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
use crate::CfaError;

/// Concrete sample container of an image plane.
///
/// The container is always at least as wide as the plane's declared bit
/// depth; a 10-bit unsigned plane lives in [SampleType::U16] and so on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SampleType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl SampleType {
    /// Container width in bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            SampleType::I8 | SampleType::U8 => 8,
            SampleType::I16 | SampleType::U16 => 16,
            SampleType::I32 | SampleType::U32 | SampleType::F32 => 32,
            SampleType::I64 | SampleType::U64 | SampleType::F64 => 64,
        }
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        match self {
            SampleType::I8
            | SampleType::I16
            | SampleType::I32
            | SampleType::I64
            | SampleType::F32
            | SampleType::F64 => true,
            SampleType::U8 | SampleType::U16 | SampleType::U32 | SampleType::U64 => false,
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    /// Resolves the container for a `(signed, float, bit depth)` triple.
    ///
    /// This is the single dispatch point between externally described sample
    /// formats and concrete containers. Every combination without a container
    /// is a typed error, nothing is ever narrowed silently.
    pub fn from_parts(bit_depth: u32, signed: bool, is_float: bool) -> Result<SampleType, CfaError> {
        if bit_depth == 0 {
            return Err(CfaError::UnsupportedSampleType {
                bit_depth,
                signed,
                is_float,
            });
        }
        if is_float {
            // IEEE floats are inherently signed, the flag is not consulted.
            return match bit_depth {
                32 => Ok(SampleType::F32),
                64 => Ok(SampleType::F64),
                _ => Err(CfaError::UnsupportedSampleType {
                    bit_depth,
                    signed,
                    is_float,
                }),
            };
        }
        let ty = match (signed, bit_depth) {
            (false, 1..=8) => SampleType::U8,
            (false, 9..=16) => SampleType::U16,
            (false, 17..=32) => SampleType::U32,
            (false, 33..=64) => SampleType::U64,
            (true, 1..=8) => SampleType::I8,
            (true, 9..=16) => SampleType::I16,
            (true, 17..=32) => SampleType::I32,
            (true, 33..=64) => SampleType::I64,
            _ => {
                return Err(CfaError::UnsupportedSampleType {
                    bit_depth,
                    signed,
                    is_float,
                })
            }
        };
        Ok(ty)
    }

    /// Smallest integer container for `bit_depth` bits of the given signedness.
    pub(crate) fn smallest_integer(bit_depth: u32, signed: bool) -> Result<SampleType, CfaError> {
        SampleType::from_parts(bit_depth, signed, false)
    }
}

/// Dispatches a generic kernel over the `(luma container, wide container)`
/// pair of a decorrelation call. The first type parameter is always the
/// narrow sample container, the second the widened chroma/packed container,
/// for forward and inverse direction alike.
macro_rules! dispatch_lift_pair {
    ($narrow:expr, $wide:expr, $f:ident($($arg:expr),* $(,)?)) => {{
        use $crate::samples::SampleType as S;
        match ($narrow, $wide) {
            (S::U8, S::U8) => $f::<u8, u8>($($arg),*),
            (S::U8, S::U16) => $f::<u8, u16>($($arg),*),
            (S::U8, S::U32) => $f::<u8, u32>($($arg),*),
            (S::U8, S::U64) => $f::<u8, u64>($($arg),*),
            (S::U8, S::I8) => $f::<u8, i8>($($arg),*),
            (S::U8, S::I16) => $f::<u8, i16>($($arg),*),
            (S::U8, S::I32) => $f::<u8, i32>($($arg),*),
            (S::U8, S::I64) => $f::<u8, i64>($($arg),*),
            (S::U16, S::U16) => $f::<u16, u16>($($arg),*),
            (S::U16, S::U32) => $f::<u16, u32>($($arg),*),
            (S::U16, S::U64) => $f::<u16, u64>($($arg),*),
            (S::U16, S::I16) => $f::<u16, i16>($($arg),*),
            (S::U16, S::I32) => $f::<u16, i32>($($arg),*),
            (S::U16, S::I64) => $f::<u16, i64>($($arg),*),
            (S::U32, S::U32) => $f::<u32, u32>($($arg),*),
            (S::U32, S::U64) => $f::<u32, u64>($($arg),*),
            (S::U32, S::I32) => $f::<u32, i32>($($arg),*),
            (S::U32, S::I64) => $f::<u32, i64>($($arg),*),
            (S::I8, S::I8) => $f::<i8, i8>($($arg),*),
            (S::I8, S::I16) => $f::<i8, i16>($($arg),*),
            (S::I8, S::I32) => $f::<i8, i32>($($arg),*),
            (S::I8, S::I64) => $f::<i8, i64>($($arg),*),
            (S::I16, S::I16) => $f::<i16, i16>($($arg),*),
            (S::I16, S::I32) => $f::<i16, i32>($($arg),*),
            (S::I16, S::I64) => $f::<i16, i64>($($arg),*),
            (S::I32, S::I32) => $f::<i32, i32>($($arg),*),
            (S::I32, S::I64) => $f::<i32, i64>($($arg),*),
            (narrow, _) => Err($crate::CfaError::UnsupportedSampleType {
                bit_depth: narrow.bits(),
                signed: narrow.is_signed(),
                is_float: narrow.is_float(),
            }),
        }
    }};
}

/// Dispatches a generic kernel over a single sample container. Layout
/// conversion moves samples without arithmetic, so floats are included.
macro_rules! dispatch_any_sample {
    ($ty:expr, $f:ident($($arg:expr),* $(,)?)) => {{
        use $crate::samples::SampleType as S;
        match $ty {
            S::I8 => $f::<i8>($($arg),*),
            S::U8 => $f::<u8>($($arg),*),
            S::I16 => $f::<i16>($($arg),*),
            S::U16 => $f::<u16>($($arg),*),
            S::I32 => $f::<i32>($($arg),*),
            S::U32 => $f::<u32>($($arg),*),
            S::I64 => $f::<i64>($($arg),*),
            S::U64 => $f::<u64>($($arg),*),
            S::F32 => $f::<f32>($($arg),*),
            S::F64 => $f::<f64>($($arg),*),
        }
    }};
}

pub(crate) use dispatch_any_sample;
pub(crate) use dispatch_lift_pair;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_dispatch_is_exhaustive() {
        for depth in 1..=64u32 {
            for signed in [false, true] {
                let ty = SampleType::from_parts(depth, signed, false).unwrap();
                assert!(ty.bits() >= depth);
                assert_eq!(ty.is_signed(), signed);
                assert!(!ty.is_float());
            }
        }
    }

    #[test]
    fn container_boundaries() {
        assert_eq!(SampleType::from_parts(8, false, false), Ok(SampleType::U8));
        assert_eq!(SampleType::from_parts(9, false, false), Ok(SampleType::U16));
        assert_eq!(SampleType::from_parts(16, true, false), Ok(SampleType::I16));
        assert_eq!(SampleType::from_parts(17, true, false), Ok(SampleType::I32));
        assert_eq!(SampleType::from_parts(33, false, false), Ok(SampleType::U64));
    }

    #[test]
    fn float_dispatch() {
        assert_eq!(SampleType::from_parts(32, true, true), Ok(SampleType::F32));
        assert_eq!(SampleType::from_parts(64, false, true), Ok(SampleType::F64));
        assert!(SampleType::from_parts(16, true, true).is_err());
    }

    #[test]
    fn rejected_combinations() {
        assert!(SampleType::from_parts(0, false, false).is_err());
        assert!(SampleType::from_parts(65, false, false).is_err());
        assert!(SampleType::from_parts(65, true, false).is_err());
    }
}
