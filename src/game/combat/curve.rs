// Keyframed curves: clip channels and baked motion curves

use serde::Deserialize;

use crate::core::math::{inverse_lerp, lerp};

/// A single curve key
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

impl From<(f32, f32)> for Keyframe {
    fn from((time, value): (f32, f32)) -> Self {
        Self::new(time, value)
    }
}

/// Piecewise-linear curve over strictly increasing key times.
///
/// Evaluation clamps outside the key range, so the first and last values
/// extend to infinity. An empty curve evaluates to 0 everywhere.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<Keyframe>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl From<Vec<Keyframe>> for Curve {
    fn from(keys: Vec<Keyframe>) -> Self {
        let mut curve = Self::new();
        for key in keys {
            curve.add_key(key.time, key.value);
        }
        curve
    }
}

impl Curve {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Build a curve from `(time, value)` pairs
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Self {
        pairs
            .iter()
            .copied()
            .map(Keyframe::from)
            .collect::<Vec<_>>()
            .into()
    }

    /// Insert a key, keeping keys sorted. A key at an existing time replaces its value.
    pub fn add_key(&mut self, time: f32, value: f32) {
        let index = self.keys.partition_point(|k| k.time < time);
        match self.keys.get_mut(index) {
            Some(existing) if existing.time == time => existing.value = value,
            _ => self.keys.insert(index, Keyframe::new(time, value)),
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Time of the last key, or 0 for an empty curve
    pub fn end_time(&self) -> f32 {
        self.keys.last().map_or(0.0, |k| k.time)
    }

    /// Sample the curve at `time`
    pub fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; guaranteed 1..len by the bounds above
        let upper = self.keys.partition_point(|k| k.time <= time);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        lerp(a.value, b.value, inverse_lerp(a.time, b.time, time))
    }

    /// Whether values never decrease with increasing time
    pub fn is_nondecreasing(&self) -> bool {
        self.keys.windows(2).all(|pair| pair[1].value >= pair[0].value)
    }

    /// Raise every key to the running maximum of the keys before it.
    /// Returns whether any value changed.
    pub fn clamp_to_running_max(&mut self) -> bool {
        let mut changed = false;
        let mut peak = f32::NEG_INFINITY;
        for key in &mut self.keys {
            if key.value < peak {
                key.value = peak;
                changed = true;
            } else {
                peak = key.value;
            }
        }
        changed
    }
}

/// Cumulative planar distance against absolute clip seconds.
///
/// The X axis is seconds in the animation engine's own convention, never a
/// progress fraction; use [`MotionCurve::delta`] to go from progress to distance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MotionCurve(Curve);

impl MotionCurve {
    pub fn new(curve: Curve) -> Self {
        Self(curve)
    }

    pub fn empty() -> Self {
        Self(Curve::new())
    }

    pub fn curve(&self) -> &Curve {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distance covered at `seconds` into the clip
    pub fn distance_at(&self, seconds: f32) -> f32 {
        self.0.evaluate(seconds)
    }

    /// Distance covered between two progress fractions of a clip lasting `duration` seconds.
    /// Negative progress (the session seed) samples the clip start.
    pub fn delta(&self, from_progress: f32, to_progress: f32, duration: f32) -> f32 {
        let from = from_progress.max(0.0) * duration;
        let to = to_progress.max(0.0) * duration;
        self.distance_at(to) - self.distance_at(from)
    }

    /// Flatten any backward stretch so distance never decreases
    pub fn make_nondecreasing(&mut self) -> bool {
        self.0.clamp_to_running_max()
    }

    /// Total distance over the whole clip
    pub fn total(&self, duration: f32) -> f32 {
        self.distance_at(duration) - self.distance_at(0.0)
    }
}

impl From<Curve> for MotionCurve {
    fn from(curve: Curve) -> Self {
        Self(curve)
    }
}
