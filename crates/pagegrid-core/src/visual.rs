//! Host seams used by the gesture engines.
//!
//! During a gesture only the on-screen element moves; the store is written
//! once when the gesture ends. [`VisualTarget`] is that element, and
//! [`FrameScheduler`] coalesces resize updates to one per display frame.

use kurbo::{Point, Rect, Vec2};

/// The on-screen element of the item being manipulated.
pub trait VisualTarget {
    /// Offset the element from its committed position (a CSS transform).
    fn set_offset(&mut self, offset: Vec2);
    /// Size and place the element in container-relative pixels.
    fn set_frame(&mut self, frame: Rect);
    /// Drop any transient offset or frame and render from the store again.
    fn reset(&mut self);
}

/// Opaque handle of a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Schedules work for the next display frame.
///
/// The host calls back into the resize engine (`run_frame`) when the frame
/// fires. Cancelling a handle that already fired must be harmless.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Which part of an item a pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The drag handle. Starts a drag.
    DragHandle,
    /// One of the eight resize handles. Starts a resize.
    ResizeHandle(crate::resize::ResizeHandle),
    /// The item body. Selects only.
    Body,
}

/// What the engines did to a visual, recorded for tests and headless hosts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualOp {
    Offset(Vec2),
    Frame(Rect),
    Reset,
}

/// A [`VisualTarget`] that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingVisual {
    pub ops: Vec<VisualOp>,
}

impl RecordingVisual {
    pub fn new() -> Self {
        Self::default()
    }

    fn ops_since_reset(&self) -> impl Iterator<Item = &VisualOp> {
        self.ops.iter().rev().take_while(|op| **op != VisualOp::Reset)
    }

    /// Last offset applied since the last reset.
    pub fn current_offset(&self) -> Option<Vec2> {
        self.ops_since_reset().find_map(|op| match op {
            VisualOp::Offset(offset) => Some(*offset),
            _ => None,
        })
    }

    /// Last frame applied since the last reset.
    pub fn current_frame(&self) -> Option<Rect> {
        self.ops_since_reset().find_map(|op| match op {
            VisualOp::Frame(frame) => Some(*frame),
            _ => None,
        })
    }

    /// Top-left of the element after applying the current offset to `base`.
    pub fn displayed_origin(&self, base: Point) -> Point {
        base + self.current_offset().unwrap_or(Vec2::ZERO)
    }
}

impl VisualTarget for RecordingVisual {
    fn set_offset(&mut self, offset: Vec2) {
        self.ops.push(VisualOp::Offset(offset));
    }

    fn set_frame(&mut self, frame: Rect) {
        self.ops.push(VisualOp::Frame(frame));
    }

    fn reset(&mut self) {
        self.ops.push(VisualOp::Reset);
    }
}

/// A [`FrameScheduler`] that only tracks requests; frames run when the
/// caller says so.
#[derive(Debug, Clone, Default)]
pub struct ManualFrames {
    next: u64,
    pending: Option<FrameHandle>,
    pub requested: usize,
    pub cancelled: usize,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame currently waiting to run.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Mark the pending frame as fired, returning it.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.requested += 1;
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_visual_tracks_latest_since_reset() {
        let mut visual = RecordingVisual::new();
        visual.set_offset(Vec2::new(1.0, 2.0));
        visual.set_offset(Vec2::new(5.0, 6.0));
        assert_eq!(visual.current_offset(), Some(Vec2::new(5.0, 6.0)));
        assert_eq!(visual.displayed_origin(Point::new(10.0, 10.0)), Point::new(15.0, 16.0));

        visual.reset();
        assert_eq!(visual.current_offset(), None);
        assert_eq!(visual.current_frame(), None);
    }

    #[test]
    fn test_manual_frames_single_pending() {
        let mut frames = ManualFrames::new();
        let first = frames.request_frame();
        frames.cancel_frame(first);
        let second = frames.request_frame();
        assert_eq!(frames.pending(), Some(second));
        assert_eq!(frames.fire(), Some(second));
        frames.cancel_frame(second);
        assert_eq!(frames.cancelled, 1);
        assert_eq!(frames.requested, 2);
    }
}
