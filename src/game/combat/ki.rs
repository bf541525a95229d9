// Ki - the spendable resource gauge and its context-sensitive action

use super::tuning::CombatTuning;

/// Non-negative integer gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceMeter {
    units: u32,
    max: u32,
}

impl ResourceMeter {
    pub fn new(units: u32, max: u32) -> Self {
        Self {
            units: units.min(max),
            max,
        }
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn can_spend(&self, cost: u32) -> bool {
        self.units >= cost
    }

    /// Remove `cost` units; nothing changes if the balance is short
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_spend(cost) {
            return false;
        }
        self.units -= cost;
        true
    }

    /// Add units up to capacity
    pub fn gain(&mut self, units: u32) {
        self.units = self.units.saturating_add(units).min(self.max);
    }
}

/// Result of one ki spend request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KiOutcome {
    /// Less than one unit available; nothing changed
    Insufficient,
    /// Parry attempted while blocking. Costs a unit either way.
    Parry { success: bool },
    /// Neutral power-up started
    PowerUp,
    /// Mid-attack spend, not bound to an action yet
    Reserved,
}

/// Ki gauge plus the blocking and buff state its dispatch reads
#[derive(Debug, Clone)]
pub struct KiActions {
    meter: ResourceMeter,
    parry_window: f32,
    power_up_duration: f32,
    blocking: bool,
    block_started_at: f32,
    power_up_until: Option<f32>,
}

impl KiActions {
    pub fn new(tuning: &CombatTuning) -> Self {
        Self {
            meter: ResourceMeter::new(tuning.starting_ki, tuning.max_ki),
            parry_window: tuning.parry_window,
            power_up_duration: tuning.power_up_duration,
            blocking: false,
            block_started_at: 0.0,
            power_up_until: None,
        }
    }

    pub fn meter(&self) -> &ResourceMeter {
        &self.meter
    }

    pub fn meter_mut(&mut self) -> &mut ResourceMeter {
        &mut self.meter
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Raise or lower the block. Only the rising edge restarts the parry timer.
    pub fn set_blocking(&mut self, blocking: bool, now: f32) {
        if blocking && !self.blocking {
            self.block_started_at = now;
        }
        self.blocking = blocking;
    }

    pub fn is_powered_up(&self, now: f32) -> bool {
        self.power_up_until.is_some_and(|until| now < until)
    }

    /// Spend one unit on whatever the current context calls for
    pub fn spend(&mut self, now: f32, attacking: bool) -> KiOutcome {
        if !self.meter.can_spend(1) {
            return KiOutcome::Insufficient;
        }

        if self.blocking {
            let success = now - self.block_started_at <= self.parry_window;
            self.meter.spend(1);
            if success {
                log::info!("Ki parry ({} left)", self.meter.units());
            } else {
                log::info!("Ki parry failed: blocked too early ({} left)", self.meter.units());
            }
            KiOutcome::Parry { success }
        } else if !attacking {
            self.meter.spend(1);
            self.power_up_until = Some(now + self.power_up_duration);
            log::info!("Ki power-up ({} left)", self.meter.units());
            KiOutcome::PowerUp
        } else {
            KiOutcome::Reserved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions() -> KiActions {
        KiActions::new(&CombatTuning::default())
    }

    #[test]
    fn test_meter_bounds() {
        let mut meter = ResourceMeter::new(5, 3);
        assert_eq!(meter.units(), 3);
        assert!(meter.spend(3));
        assert!(!meter.spend(1));
        assert_eq!(meter.units(), 0);
        meter.gain(10);
        assert_eq!(meter.units(), 3);
    }

    #[test]
    fn test_parry_success_and_failure_cost_one() {
        let mut ki = actions();
        ki.set_blocking(true, 10.0);

        assert_eq!(ki.spend(10.1, false), KiOutcome::Parry { success: true });
        assert_eq!(ki.meter().units(), 2);

        assert_eq!(ki.spend(10.5, false), KiOutcome::Parry { success: false });
        assert_eq!(ki.meter().units(), 1);
    }

    #[test]
    fn test_parry_window_is_inclusive() {
        let mut ki = actions();
        ki.set_blocking(true, 0.0);
        assert_eq!(ki.spend(0.2, false), KiOutcome::Parry { success: true });
    }

    #[test]
    fn test_holding_block_does_not_restart_timer() {
        let mut ki = actions();
        ki.set_blocking(true, 1.0);
        ki.set_blocking(true, 2.0);
        assert_eq!(ki.spend(2.05, false), KiOutcome::Parry { success: false });
    }

    #[test]
    fn test_power_up_when_neutral() {
        let mut ki = actions();
        assert_eq!(ki.spend(4.0, false), KiOutcome::PowerUp);
        assert_eq!(ki.meter().units(), 2);
        assert!(ki.is_powered_up(5.0));
        assert!(!ki.is_powered_up(5.5));
    }

    #[test]
    fn test_reserved_mid_attack_is_free() {
        let mut ki = actions();
        assert_eq!(ki.spend(0.0, true), KiOutcome::Reserved);
        assert_eq!(ki.meter().units(), 3);
    }

    #[test]
    fn test_empty_meter_changes_nothing() {
        let mut ki = actions();
        ki.meter_mut().spend(3);
        ki.set_blocking(true, 0.0);

        assert_eq!(ki.spend(0.1, false), KiOutcome::Insufficient);
        assert_eq!(ki.meter().units(), 0);
        assert!(ki.is_blocking());
        assert!(!ki.is_powered_up(0.1));
    }
}
