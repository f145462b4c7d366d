//! Camera-backed board perception for the game loop.

use image::RgbImage;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;
use tictactoe_core::BoardSnapshot;
use tictactoe_game::SnapshotSource;
use tictactoe_vision::{
    normalize_channels, BoardReader, BoardReading, BoardValidityClassifier, CellClassifier,
    ChannelOrder, PerceptionError,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Delivers camera frames.
pub trait FrameSource {
    /// Next frame, or `None` when none arrived within `timeout`.
    fn next_frame(&mut self, timeout: Duration) -> Option<RgbImage>;
}

impl<T: FrameSource + ?Sized> FrameSource for &mut T {
    fn next_frame(&mut self, timeout: Duration) -> Option<RgbImage> {
        (**self).next_frame(timeout)
    }
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self, timeout: Duration) -> Option<RgbImage> {
        (**self).next_frame(timeout)
    }
}

/// Frames already in memory, handed out in order.
impl FrameSource for VecDeque<RgbImage> {
    fn next_frame(&mut self, _timeout: Duration) -> Option<RgbImage> {
        self.pop_front()
    }
}

/// Replays image files as camera frames. Unreadable files are skipped.
#[derive(Clone, Debug, Default)]
pub struct ImageSequence {
    paths: VecDeque<PathBuf>,
}

impl ImageSequence {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self, _timeout: Duration) -> Option<RgbImage> {
        while let Some(path) = self.paths.pop_front() {
            match image::open(&path) {
                Ok(img) => return Some(img.to_rgb8()),
                Err(e) => log::warn!("skipping frame {}: {e}", path.display()),
            }
        }
        None
    }
}

/// [`SnapshotSource`] reading the board from camera frames.
///
/// Every failure (missing frame, rejected board, classifier error) becomes a
/// `None` reading; the game machine treats it as a skipped cycle.
pub struct CameraPerception<F, C, V> {
    frames: F,
    reader: BoardReader<C, V>,
    channel_order: ChannelOrder,
    timeout: Duration,
    last_reading: Option<BoardReading>,
}

impl<F, C, V> CameraPerception<F, C, V>
where
    F: FrameSource,
    C: CellClassifier,
    V: BoardValidityClassifier,
{
    pub fn new(
        frames: F,
        reader: BoardReader<C, V>,
        channel_order: ChannelOrder,
        timeout: Duration,
    ) -> Self {
        Self {
            frames,
            reader,
            channel_order,
            timeout,
            last_reading: None,
        }
    }

    #[inline]
    pub fn reader(&self) -> &BoardReader<C, V> {
        &self.reader
    }

    /// Details of the last successful reading.
    pub fn last_reading(&self) -> Option<&BoardReading> {
        self.last_reading.as_ref()
    }

    /// Grab a frame and read it.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn read_frame(&mut self) -> Result<BoardReading, PerceptionError> {
        let frame = self
            .frames
            .next_frame(self.timeout)
            .ok_or(PerceptionError::NoFrame)?;
        let frame = normalize_channels(frame, self.channel_order);
        self.reader.read(&frame)
    }
}

impl<F, C, V> SnapshotSource for CameraPerception<F, C, V>
where
    F: FrameSource,
    C: CellClassifier,
    V: BoardValidityClassifier,
{
    fn analyze_board(&mut self) -> Option<BoardSnapshot> {
        match self.read_frame() {
            Ok(reading) => {
                let snapshot = reading.snapshot;
                self.last_reading = Some(reading);
                Some(snapshot)
            }
            Err(PerceptionError::NoFrame) => {
                log::warn!("no frame within {:?}", self.timeout);
                None
            }
            Err(e) => {
                log::warn!("board reading failed: {e}");
                None
            }
        }
    }
}
