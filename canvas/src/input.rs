//! Input model: pointer sources, pointer events, and the drawing state machine.
//!
//! `PointerSource` normalizes mouse and touch events to a single client-space
//! point. `DrawState` is the two-state machine tracked between pointer-down
//! and pointer-up; [`DrawState::step`] applies one `PointerEvent` and reports
//! the resulting `Transition` so the engine can extend strokes and render
//! segments without consulting any rendering surface.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::viewport::Point;

/// Where a pointer event came from.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSource {
    /// Mouse event at the given client position.
    Mouse { client: Point },
    /// Touch event carrying the client positions of all active touches.
    Touch { touches: Vec<Point> },
}

impl PointerSource {
    /// The client point to draw with. Touch uses the first active touch; an
    /// empty touch list yields `None`.
    #[must_use]
    pub fn client_point(&self) -> Option<Point> {
        match self {
            Self::Mouse { client } => Some(*client),
            Self::Touch { touches } => touches.first().copied(),
        }
    }
}

/// A surface-local pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse button pressed or touch started.
    Down(Point),
    /// Pointer moved.
    Move(Point),
    /// Mouse released anywhere in the window, or touch ended.
    Up,
    /// Touch cancelled by the browser.
    Cancel,
}

/// Result of applying one [`PointerEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// `Idle → Drawing` (or a restart while drawing): a new stroke begins at `at`.
    ///
    /// `interrupted` is set when a stroke was still open, which happens when
    /// the release event was lost.
    Begin { at: Point, interrupted: bool },
    /// `Drawing → Drawing`: the stroke extends from `from` to `to`.
    Extend { from: Point, to: Point },
    /// `Drawing → Idle`.
    End,
    /// Event has no effect in the current state.
    Ignored,
}

/// Drawing session state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawState {
    /// No stroke in progress.
    #[default]
    Idle,
    /// A stroke is in progress; `last` is the most recent point on it.
    Drawing { last: Point },
}

impl DrawState {
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Apply `event` and return the transition taken.
    pub fn step(&mut self, event: PointerEvent) -> Transition {
        match (*self, event) {
            (state, PointerEvent::Down(at)) => {
                *self = Self::Drawing { last: at };
                Transition::Begin { at, interrupted: state.is_drawing() }
            }
            (Self::Drawing { last }, PointerEvent::Move(to)) => {
                *self = Self::Drawing { last: to };
                Transition::Extend { from: last, to }
            }
            (Self::Drawing { .. }, PointerEvent::Up | PointerEvent::Cancel) => {
                *self = Self::Idle;
                Transition::End
            }
            (Self::Idle, PointerEvent::Move(_) | PointerEvent::Up | PointerEvent::Cancel) => Transition::Ignored,
        }
    }
}
