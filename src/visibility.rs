//! Two-state visibility machine driven by intersection reports.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// What a single intersection report did to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Hidden to visible: restart the clock and request a frame.
    Entered,
    /// Visible to hidden: cancel the pending frame.
    Exited,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct VisibilityScheduler {
    state: Visibility,
    threshold: f64,
}

impl VisibilityScheduler {
    /// Starts hidden. `threshold` is the intersection ratio the container
    /// must reach to count as visible.
    pub fn new(threshold: f64) -> Self {
        Self {
            state: Visibility::Hidden,
            threshold,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == Visibility::Visible
    }

    pub fn observe(&mut self, intersection_ratio: f64, is_intersecting: bool) -> Transition {
        let visible = is_intersecting && intersection_ratio >= self.threshold;
        match (self.state, visible) {
            (Visibility::Hidden, true) => {
                self.state = Visibility::Visible;
                Transition::Entered
            }
            (Visibility::Visible, false) => {
                self.state = Visibility::Hidden;
                Transition::Exited
            }
            _ => Transition::Unchanged,
        }
    }
}
