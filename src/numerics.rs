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
use crate::ChromaMode;

/// Encodes lifted differences into their storage representation and back.
///
/// In [ChromaMode::UnsignedOffset] a difference `v` is stored as
/// `(v + offset) mod 2^window_bits`; the decode folds the stored value back
/// into the signed window `[-2^(window_bits-1), 2^(window_bits-1))`. The
/// window always covers the reachable range, so encode/decode is a bijection
/// and extremes survive the round trip. In [ChromaMode::Signed] values are
/// stored raw in a signed container.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ChromaCodec {
    offset: i64,
    modulus: i64,
}

impl ChromaCodec {
    /// Codec for a difference channel of `bit_depth`-bit sources stored in a
    /// `window_bits`-wide plane.
    pub(crate) fn new(mode: ChromaMode, bit_depth: u32, window_bits: u32, fold: bool) -> Self {
        let offset = match mode {
            ChromaMode::UnsignedOffset => 1i64 << (bit_depth - 1),
            ChromaMode::Signed => 0,
        };
        ChromaCodec {
            offset,
            modulus: if fold { 1i64 << window_bits } else { 0 },
        }
    }

    /// Codec for a channel stored without bias, e.g. packed luma.
    pub(crate) fn unbiased(window_bits: u32, fold: bool) -> Self {
        ChromaCodec {
            offset: 0,
            modulus: if fold { 1i64 << window_bits } else { 0 },
        }
    }

    #[inline(always)]
    pub(crate) fn encode(&self, v: i64) -> i64 {
        if self.modulus != 0 {
            (v + self.offset).rem_euclid(self.modulus)
        } else {
            v + self.offset
        }
    }

    #[inline(always)]
    pub(crate) fn decode(&self, v: i64) -> i64 {
        if self.modulus != 0 {
            let t = (v - self.offset).rem_euclid(self.modulus);
            if t >= self.modulus >> 1 {
                t - self.modulus
            } else {
                t
            }
        } else {
            v - self.offset
        }
    }
}

/// Representable range of a `bit_depth`-bit sample, sign bit included.
#[inline]
pub(crate) const fn sample_range(bit_depth: u32, signed: bool) -> (i64, i64) {
    if signed {
        (-(1i64 << (bit_depth - 1)), (1i64 << (bit_depth - 1)) - 1)
    } else {
        (0, (1i64 << bit_depth) - 1)
    }
}

#[inline(always)]
pub(crate) fn clamp_sample(v: i64, min: i64, max: i64) -> i64 {
    v.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_codec_round_trips_all_diffs() {
        // 8-bit sources, differences in [-255, 255], 9-bit window.
        let codec = ChromaCodec::new(ChromaMode::UnsignedOffset, 8, 9, true);
        for v in -255i64..=255 {
            let stored = codec.encode(v);
            assert!((0..512).contains(&stored), "{} escaped the window", stored);
            assert_eq!(codec.decode(stored), v);
        }
    }

    #[test]
    fn offset_codec_matches_reference_bias() {
        let codec = ChromaCodec::new(ChromaMode::UnsignedOffset, 8, 9, true);
        assert_eq!(codec.encode(-10), 118);
        assert_eq!(codec.encode(15), 143);
        assert_eq!(codec.encode(-15), 113);
    }

    #[test]
    fn signed_codec_is_identity() {
        let codec = ChromaCodec::new(ChromaMode::Signed, 12, 13, false);
        for v in [-4095i64, -1, 0, 1, 4095] {
            assert_eq!(codec.encode(v), v);
            assert_eq!(codec.decode(v), v);
        }
    }

    #[test]
    fn wide_window_round_trips_packed_range() {
        // Packed planes fold across a two-bit-wider window.
        let codec = ChromaCodec::new(ChromaMode::UnsignedOffset, 8, 10, true);
        for v in -511i64..=511 {
            assert_eq!(codec.decode(codec.encode(v)), v);
        }
    }

    #[test]
    fn sample_ranges() {
        assert_eq!(sample_range(8, false), (0, 255));
        assert_eq!(sample_range(8, true), (-128, 127));
        assert_eq!(sample_range(12, false), (0, 4095));
    }
}
