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
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// 2x2 tiling order of the R/G/G/B sub-pixels inside a CFA superpixel.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BayerPattern {
    Grbg = 0,
    Rggb = 1,
    Gbrg = 2,
    Bggr = 3,
}

impl From<u8> for BayerPattern {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => BayerPattern::Grbg,
            1 => BayerPattern::Rggb,
            2 => BayerPattern::Gbrg,
            3 => BayerPattern::Bggr,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl BayerPattern {
    /// `(x, y)` offsets of the R, G1, G2 and B sub-pixels inside a 2x2 cell.
    ///
    /// The four positions are always a permutation of
    /// `(0,0), (1,0), (0,1), (1,1)`. G1 is the green sharing a row with red,
    /// G2 the green sharing a row with blue.
    #[inline]
    pub const fn positions(self) -> [(u32, u32); 4] {
        match self {
            BayerPattern::Grbg => [(1, 0), (0, 0), (1, 1), (0, 1)],
            BayerPattern::Rggb => [(0, 0), (1, 0), (0, 1), (1, 1)],
            BayerPattern::Gbrg => [(0, 1), (1, 1), (0, 0), (1, 0)],
            BayerPattern::Bggr => [(1, 1), (0, 1), (1, 0), (0, 0)],
        }
    }

    #[inline]
    pub const fn red_position(self) -> (u32, u32) {
        self.positions()[0]
    }

    #[inline]
    pub const fn green1_position(self) -> (u32, u32) {
        self.positions()[1]
    }

    #[inline]
    pub const fn green2_position(self) -> (u32, u32) {
        self.positions()[2]
    }

    #[inline]
    pub const fn blue_position(self) -> (u32, u32) {
        self.positions()[3]
    }
}

impl FromStr for BayerPattern {
    type Err = CfaError;

    /// Parses the canonical lowercase arrangement codes, exactly
    /// `grbg`, `rggb`, `gbrg` or `bggr`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grbg" => Ok(BayerPattern::Grbg),
            "rggb" => Ok(BayerPattern::Rggb),
            "gbrg" => Ok(BayerPattern::Gbrg),
            "bggr" => Ok(BayerPattern::Bggr),
            _ => Err(CfaError::UnknownPattern(s.to_owned())),
        }
    }
}

impl Display for BayerPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BayerPattern::Grbg => f.write_str("grbg"),
            BayerPattern::Rggb => f.write_str("rggb"),
            BayerPattern::Gbrg => f.write_str("gbrg"),
            BayerPattern::Bggr => f.write_str("bggr"),
        }
    }
}

/// Declares how chroma differences are represented on output.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChromaMode {
    /// Differences are biased by `1 << (bit_depth - 1)` and stored in an
    /// unsigned container one bit wider, folded modulo the widened range so
    /// extremes stay exactly invertible.
    UnsignedOffset = 0,
    /// Raw differences in a signed container one bit wider.
    Signed = 1,
}

impl From<u8> for ChromaMode {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => ChromaMode::UnsignedOffset,
            1 => ChromaMode::Signed,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_form_a_permutation() {
        for pattern in [
            BayerPattern::Grbg,
            BayerPattern::Rggb,
            BayerPattern::Gbrg,
            BayerPattern::Bggr,
        ] {
            let mut seen = [[false; 2]; 2];
            for (x, y) in pattern.positions() {
                assert!(x < 2 && y < 2);
                assert!(!seen[y as usize][x as usize], "{} repeats a site", pattern);
                seen[y as usize][x as usize] = true;
            }
        }
    }

    #[test]
    fn greens_are_diagonal() {
        for pattern in [
            BayerPattern::Grbg,
            BayerPattern::Rggb,
            BayerPattern::Gbrg,
            BayerPattern::Bggr,
        ] {
            let (g1x, g1y) = pattern.green1_position();
            let (g2x, g2y) = pattern.green2_position();
            assert_ne!(g1x, g2x);
            assert_ne!(g1y, g2y);
        }
    }

    #[test]
    fn green1_shares_row_with_red() {
        for pattern in [
            BayerPattern::Grbg,
            BayerPattern::Rggb,
            BayerPattern::Gbrg,
            BayerPattern::Bggr,
        ] {
            assert_eq!(pattern.green1_position().1, pattern.red_position().1);
            assert_eq!(pattern.green2_position().1, pattern.blue_position().1);
        }
    }

    #[test]
    fn parse_is_case_sensitive_and_closed() {
        assert_eq!("rggb".parse::<BayerPattern>(), Ok(BayerPattern::Rggb));
        assert_eq!("bggr".parse::<BayerPattern>(), Ok(BayerPattern::Bggr));
        assert!(matches!(
            "RGGB".parse::<BayerPattern>(),
            Err(CfaError::UnknownPattern(_))
        ));
        assert!(matches!(
            "rgbg".parse::<BayerPattern>(),
            Err(CfaError::UnknownPattern(_))
        ));
    }

    #[test]
    fn display_round_trips() {
        for pattern in [
            BayerPattern::Grbg,
            BayerPattern::Rggb,
            BayerPattern::Gbrg,
            BayerPattern::Bggr,
        ] {
            assert_eq!(pattern.to_string().parse::<BayerPattern>(), Ok(pattern));
        }
    }
}
