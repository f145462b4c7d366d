//! Core types shared by the tic-tac-toe robot crates.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image type, classifier, or actuator.
//!
//! - [`BoardSnapshot`], [`CellValue`], [`Player`]: the classified board state.
//! - [`LineSegment`], [`OrientedLine`], [`Corner`], [`CellRect`]: the lattice
//!   geometry recovered from a camera image.

mod board;
mod geometry;
mod logger;

pub use board::{BoardSnapshot, CellValue, ParseBoardError, Player, CELL_COUNT};
pub use geometry::{CellRect, Corner, LineAxis, LineSegment, OrientedLine};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, init_with_spec, short_target, LogSpec, ParseLogSpecError};
