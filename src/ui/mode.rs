//! Time/Date view toggle

/// Which slot group is on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewMode {
    #[default]
    Time,
    Date,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Time => ViewMode::Date,
            ViewMode::Date => ViewMode::Time,
        }
    }
}

/// Flips the view on a gesture and falls back to [`ViewMode::Time`] once the
/// revert delay has passed.
///
/// Times are milliseconds of uptime. There is only ever one revert deadline:
/// a gesture while one is pending replaces it.
pub struct ModeToggle {
    mode: ViewMode,
    revert_delay_ms: u32,
    deadline: Option<u64>,
}

impl ModeToggle {
    pub fn new(revert_delay_ms: u32) -> Self {
        Self {
            mode: ViewMode::Time,
            revert_delay_ms,
            deadline: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Pending revert deadline, if any
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Invert the view and (re-)arm the revert deadline.
    pub fn on_gesture(&mut self, now_ms: u64) -> ViewMode {
        self.mode = self.mode.toggled();
        self.deadline = Some(now_ms + self.revert_delay_ms as u64);
        self.mode
    }

    /// Fire the revert when its deadline has been reached. Returns whether it
    /// fired.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                self.mode = ViewMode::Time;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_time_view() {
        let toggle = ModeToggle::new(3_000);
        assert_eq!(toggle.mode(), ViewMode::Time);
        assert_eq!(toggle.deadline(), None);
    }

    #[test]
    fn gesture_shows_date_then_reverts() {
        let mut toggle = ModeToggle::new(3_000);
        assert_eq!(toggle.on_gesture(10_000), ViewMode::Date);
        assert!(!toggle.poll(12_999));
        assert_eq!(toggle.mode(), ViewMode::Date);
        assert!(toggle.poll(13_000));
        assert_eq!(toggle.mode(), ViewMode::Time);
        assert_eq!(toggle.deadline(), None);
        assert!(!toggle.poll(20_000));
    }

    #[test]
    fn second_gesture_rearms_instead_of_stacking() {
        let mut toggle = ModeToggle::new(3_000);
        toggle.on_gesture(0);
        toggle.on_gesture(1_000);
        assert_eq!(toggle.deadline(), Some(4_000));

        // the first gesture's deadline has been replaced
        assert!(!toggle.poll(3_000));
        assert!(!toggle.poll(3_999));
        assert!(toggle.poll(4_000));
        assert_eq!(toggle.mode(), ViewMode::Time);
    }

    #[test]
    fn revert_forces_time_whatever_the_view() {
        let mut toggle = ModeToggle::new(500);
        toggle.on_gesture(0);
        assert_eq!(toggle.on_gesture(100), ViewMode::Time);
        assert!(toggle.poll(600));
        assert_eq!(toggle.mode(), ViewMode::Time);
    }
}
