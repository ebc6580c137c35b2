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

/// Reflects an out-of-range coordinate back into `[0, size)`.
///
/// `-1` maps to `1`, `size` maps to `size - 2`. On an even-sized axis the
/// reflection lands on the same CFA phase as the requested coordinate.
#[inline(always)]
pub(crate) fn reflect(coord: i64, size: i64) -> i64 {
    if coord < 0 {
        -coord
    } else if coord >= size {
        2 * (size - 1) - coord
    } else {
        coord
    }
}

/// Read-only strided view over one plane.
///
/// Sample `(x, y)` lives at `y * row_stride + x * pixel_stride`; all lifting
/// code addresses planes through this view instead of raw offset arithmetic.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaneView<'a, T> {
    data: &'a [T],
    pixel_stride: usize,
    row_stride: usize,
    width: usize,
    height: usize,
}

impl<'a, T: Copy> PlaneView<'a, T> {
    pub(crate) fn new(
        data: &'a [T],
        pixel_stride: usize,
        row_stride: usize,
        width: usize,
        height: usize,
    ) -> Self {
        PlaneView {
            data,
            pixel_stride,
            row_stride,
            width,
            height,
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.row_stride + x * self.pixel_stride]
    }

    /// Neighbor lookup with edge reflection.
    ///
    /// `x < 0` reflects to `-x`, `x >= width` to `2*(width-1) - x`, and the
    /// same for `y`. Reflection across an even-sized axis preserves the CFA
    /// phase of the coordinate, which is what keeps lifting steps invertible
    /// at the borders.
    #[inline(always)]
    pub(crate) fn mirrored(&self, x: i64, y: i64) -> T {
        let mx = reflect(x, self.width as i64);
        let my = reflect(y, self.height as i64);
        debug_assert!(mx >= 0 && mx < self.width as i64);
        debug_assert!(my >= 0 && my < self.height as i64);
        self.get(mx as usize, my as usize)
    }
}

/// Mutable strided view over one plane.
#[derive(Debug)]
pub(crate) struct PlaneViewMut<'a, T> {
    data: &'a mut [T],
    pixel_stride: usize,
    row_stride: usize,
    width: usize,
    height: usize,
}

impl<'a, T: Copy> PlaneViewMut<'a, T> {
    pub(crate) fn new(
        data: &'a mut [T],
        pixel_stride: usize,
        row_stride: usize,
        width: usize,
        height: usize,
    ) -> Self {
        PlaneViewMut {
            data,
            pixel_stride,
            row_stride,
            width,
            height,
        }
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.row_stride + x * self.pixel_stride] = value;
    }
}
