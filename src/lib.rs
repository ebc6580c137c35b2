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
#![forbid(unsafe_code)]
//! Reversible integer color decorrelation for Bayer CFA sensor images.
//!
//! The crate converts a raw mosaic between its interleaved, planar and 4:2:2
//! layouts and decorrelates it with the RCT, RCTD, RCTX, YCgCo, YCgCoD and
//! YDgCoCgX integer lifting transforms. Every forward/inverse pair is
//! bit-exact for all supported sample containers, which is the property the
//! whole engine is built around.

mod cfa_error;
mod cfa_support;
mod cfa_to_422;
mod cfa_to_planar;
mod convert;
mod images;
mod internals;
mod numerics;
mod rct;
mod rct422;
mod rct_delta;
mod rct_lifting;
mod samples;
mod strided;
mod ycgco;
mod ydgcocgx;

pub use cfa_error::{CfaError, MismatchedSize};
pub use cfa_support::{BayerPattern, ChromaMode};
pub use cfa_to_422::{c422_to_cfa, cfa_to_c422};
pub use cfa_to_planar::{cfa_to_planar4, planar4_to_cfa};
pub use convert::{CfaConverter, Conversion};
pub use images::{BufferStoreMut, ImagePlane, PlanarImage, PlaneStore};
pub use rct::{forward_rct, inverse_rct};
pub use rct422::{forward_rct422, forward_ycgco422, inverse_rct422, inverse_ycgco422};
pub use rct_delta::{forward_rctd, inverse_rctd};
pub use rct_lifting::{forward_rctx, inverse_rctx};
pub use samples::SampleType;
pub use ycgco::{forward_ycgco, forward_ycgcod, inverse_ycgco, inverse_ycgcod};
pub use ydgcocgx::{forward_ydgcocgx, inverse_ydgcocgx};
