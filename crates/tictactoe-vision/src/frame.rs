//! Frame plumbing: channel order normalisation and rectangle crops.

use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};
use tictactoe_core::CellRect;

/// Channel order delivered by a frame source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Return `frame` in RGB order, swapping red and blue for BGR sources.
pub fn normalize_channels(mut frame: RgbImage, order: ChannelOrder) -> RgbImage {
    if order == ChannelOrder::Bgr {
        for px in frame.pixels_mut() {
            px.0.swap(0, 2);
        }
    }
    frame
}

/// Copy of the part of `frame` covered by `rect`.
///
/// The rectangle is clamped to the frame bounds; `None` when nothing of it
/// remains.
pub fn crop(frame: &RgbImage, rect: CellRect) -> Option<RgbImage> {
    let r = rect.clamped(frame.width(), frame.height())?;
    Some(
        imageops::crop_imm(
            frame,
            r.left as u32,
            r.top as u32,
            r.width() as u32,
            r.height() as u32,
        )
        .to_image(),
    )
}
