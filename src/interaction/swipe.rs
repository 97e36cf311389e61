use serde::{Deserialize, Serialize};

use super::PointerEvent;

pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 50.0;

/// What a container gesture resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeOutcome {
    /// Gesture still in progress, or the event was not part of a gesture.
    Pending,
    /// Released past the threshold towards the left.
    Next,
    /// Released past the threshold towards the right.
    Previous,
    /// Released short of the threshold or cancelled; content snaps back.
    SnapBack,
}

/// Horizontal swipe recognizer for the chart container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecognizer {
    threshold_px: f64,
    start_x: Option<f64>,
    translation_px: f64,
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD_PX)
    }
}

impl SwipeRecognizer {
    #[must_use]
    pub fn new(threshold_px: f64) -> Self {
        let threshold_px = if threshold_px.is_finite() && threshold_px > 0.0 {
            threshold_px
        } else {
            DEFAULT_SWIPE_THRESHOLD_PX
        };
        Self {
            threshold_px,
            start_x: None,
            translation_px: 0.0,
        }
    }

    #[must_use]
    pub fn threshold_px(self) -> f64 {
        self.threshold_px
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self.start_x.is_some()
    }

    /// Horizontal displacement to apply to the content while swiping.
    #[must_use]
    pub fn translation_px(self) -> f64 {
        self.translation_px
    }

    pub fn handle(&mut self, event: PointerEvent) -> SwipeOutcome {
        match event {
            PointerEvent::Down { x, .. } if x.is_finite() => {
                self.start_x = Some(x);
                self.translation_px = 0.0;
                SwipeOutcome::Pending
            }
            PointerEvent::Move { x, .. } => {
                if let (Some(start), true) = (self.start_x, x.is_finite()) {
                    self.translation_px = x - start;
                }
                SwipeOutcome::Pending
            }
            PointerEvent::Up { x, .. } => {
                let Some(start) = self.start_x.take() else {
                    return SwipeOutcome::Pending;
                };
                let displacement = if x.is_finite() {
                    x - start
                } else {
                    self.translation_px
                };
                self.translation_px = 0.0;
                if displacement <= -self.threshold_px {
                    SwipeOutcome::Next
                } else if displacement >= self.threshold_px {
                    SwipeOutcome::Previous
                } else {
                    SwipeOutcome::SnapBack
                }
            }
            PointerEvent::Cancel | PointerEvent::Leave => {
                if self.start_x.take().is_some() {
                    self.translation_px = 0.0;
                    SwipeOutcome::SnapBack
                } else {
                    SwipeOutcome::Pending
                }
            }
            PointerEvent::Down { .. } | PointerEvent::Wheel { .. } => SwipeOutcome::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SwipeOutcome, SwipeRecognizer};
    use crate::interaction::PointerEvent;

    fn swipe(recognizer: &mut SwipeRecognizer, from: f64, to: f64) -> SwipeOutcome {
        recognizer.handle(PointerEvent::Down { x: from, y: 10.0 });
        recognizer.handle(PointerEvent::Move {
            x: (from + to) / 2.0,
            y: 10.0,
        });
        recognizer.handle(PointerEvent::Up { x: to, y: 10.0 })
    }

    #[test]
    fn left_swipe_past_threshold_goes_next() {
        let mut recognizer = SwipeRecognizer::default();
        assert_eq!(swipe(&mut recognizer, 200.0, 120.0), SwipeOutcome::Next);
        assert!(!recognizer.is_active());
    }

    #[test]
    fn right_swipe_past_threshold_goes_previous() {
        let mut recognizer = SwipeRecognizer::default();
        assert_eq!(swipe(&mut recognizer, 100.0, 160.0), SwipeOutcome::Previous);
    }

    #[test]
    fn short_swipe_snaps_back() {
        let mut recognizer = SwipeRecognizer::default();
        assert_eq!(swipe(&mut recognizer, 100.0, 130.0), SwipeOutcome::SnapBack);
        assert_eq!(recognizer.translation_px(), 0.0);
    }

    #[test]
    fn move_tracks_translation_during_gesture() {
        let mut recognizer = SwipeRecognizer::default();
        recognizer.handle(PointerEvent::Down { x: 100.0, y: 0.0 });
        recognizer.handle(PointerEvent::Move { x: 70.0, y: 0.0 });
        assert_eq!(recognizer.translation_px(), -30.0);
        assert_eq!(recognizer.handle(PointerEvent::Cancel), SwipeOutcome::SnapBack);
    }
}
