// Attack button intent: tap for light, hold and release for medium

use super::style::AttackKind;

/// Tracks one attack button's hold time
#[derive(Debug, Clone, Default)]
pub struct AttackIntent {
    holding: bool,
    held_for: f32,
    medium_hold_time: f32,
}

impl AttackIntent {
    pub fn new(medium_hold_time: f32) -> Self {
        Self {
            holding: false,
            held_for: 0.0,
            medium_hold_time,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn held_for(&self) -> f32 {
        self.held_for
    }

    pub fn press(&mut self) {
        self.holding = true;
        self.held_for = 0.0;
    }

    /// Advance the hold timer (called every tick)
    pub fn update(&mut self, dt: f32) {
        if self.holding {
            self.held_for += dt;
        }
    }

    /// Release the button; yields the attack to request, if a press was tracked
    pub fn release(&mut self) -> Option<AttackKind> {
        if !self.holding {
            return None;
        }
        self.holding = false;

        if self.held_for >= self.medium_hold_time {
            Some(AttackKind::Medium)
        } else {
            Some(AttackKind::Light)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_is_light() {
        let mut intent = AttackIntent::new(1.0);
        intent.press();
        intent.update(0.2);
        assert_eq!(intent.release(), Some(AttackKind::Light));
    }

    #[test]
    fn test_hold_is_medium() {
        let mut intent = AttackIntent::new(1.0);
        intent.press();
        for _ in 0..70 {
            intent.update(1.0 / 60.0);
        }
        assert_eq!(intent.release(), Some(AttackKind::Medium));
    }

    #[test]
    fn test_release_without_press() {
        let mut intent = AttackIntent::new(1.0);
        assert_eq!(intent.release(), None);
        intent.press();
        intent.release();
        assert_eq!(intent.release(), None);
    }

    #[test]
    fn test_timer_only_runs_while_held() {
        let mut intent = AttackIntent::new(1.0);
        intent.update(5.0);
        intent.press();
        assert_eq!(intent.held_for(), 0.0);
    }
}
