//! Source position tracking.
//!
//! Unlike the teacher's `(usize, usize)` line/column pair, nodes here carry
//! only a line number — source location tracking beyond that is out of
//! scope.
pub type Position = usize;
