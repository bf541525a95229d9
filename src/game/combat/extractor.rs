// Root-motion curve extraction (authoring time)
//
// Bakes a clip's horizontal root translation into cumulative planar distance
// against absolute clip seconds, so the runtime can rebuild displacement
// without the animation engine applying root motion itself.

use glam::Vec2;
use serde::Deserialize;

use super::curve::{Curve, MotionCurve};

/// Fixed sampling step used by [`SampleMode::FixedStep`] presets
pub const DEFAULT_SAMPLE_STEP: f32 = 0.01;

/// Minimum sample count used by [`SampleMode::FrameRate`]
pub const MIN_FRAME_SAMPLES: usize = 30;

/// Animated property a channel curve is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ChannelBinding {
    /// Humanoid root translation, lateral axis
    RootX,
    /// Humanoid root translation, forward axis
    RootZ,
    /// Generic rig local position, lateral axis
    LocalPositionX,
    /// Generic rig local position, forward axis
    LocalPositionZ,
}

/// One animated channel of a clip
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelData {
    pub binding: ChannelBinding,
    pub curve: Curve,
}

/// Channel data exported from an animation clip
#[derive(Debug, Clone, Deserialize)]
pub struct ClipChannels {
    pub name: String,
    /// Length in seconds
    pub length: f32,
    #[serde(default = "ClipChannels::default_frame_rate")]
    pub frame_rate: f32,
    #[serde(default)]
    pub channels: Vec<ChannelData>,
}

impl ClipChannels {
    pub fn new(name: &str, length: f32, frame_rate: f32) -> Self {
        Self {
            name: name.to_string(),
            length,
            frame_rate,
            channels: Vec::new(),
        }
    }

    pub fn with_channel(mut self, binding: ChannelBinding, curve: Curve) -> Self {
        self.channels.push(ChannelData { binding, curve });
        self
    }

    pub fn channel(&self, binding: ChannelBinding) -> Option<&Curve> {
        self.channels
            .iter()
            .find(|c| c.binding == binding)
            .map(|c| &c.curve)
    }

    /// First bound channel among `bindings`, in preference order
    fn resolve(&self, bindings: &[ChannelBinding]) -> Option<&Curve> {
        bindings.iter().find_map(|b| self.channel(*b))
    }

    fn default_frame_rate() -> f32 {
        30.0
    }
}

/// How densely to sample a clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleMode {
    /// One sample every `step` seconds
    FixedStep(f32),
    /// `max(30, length * frame_rate)` evenly spaced samples
    FrameRate,
}

impl Default for SampleMode {
    fn default() -> Self {
        Self::FixedStep(DEFAULT_SAMPLE_STEP)
    }
}

impl SampleMode {
    /// Sample times across `[0, length]`, always ending exactly at `length`
    fn sample_times(self, length: f32, frame_rate: f32) -> Vec<f32> {
        let mut times = match self {
            SampleMode::FixedStep(step) if step > 0.0 => {
                // Integer stepping avoids accumulating float error
                let steps = (length / step).floor() as usize;
                (0..=steps).map(|i| i as f32 * step).collect::<Vec<_>>()
            }
            SampleMode::FixedStep(_) => vec![0.0],
            SampleMode::FrameRate => {
                let count = MIN_FRAME_SAMPLES.max((length * frame_rate) as usize);
                (0..=count)
                    .map(|i| i as f32 / count as f32 * length)
                    .collect()
            }
        };

        times.retain(|t| *t < length);
        times.push(length);
        times
    }
}

/// Extract cumulative forward distance for a clip.
///
/// Forward uses the root channel and falls back to the generic local position;
/// lateral does the same. A missing axis reads as 0. If neither axis resolves,
/// or the clip has no length, the result is an empty curve (zero motion).
pub fn extract_forward_motion(clip: &ClipChannels, mode: SampleMode) -> MotionCurve {
    let forward = clip.resolve(&[ChannelBinding::RootZ, ChannelBinding::LocalPositionZ]);
    let lateral = clip.resolve(&[ChannelBinding::RootX, ChannelBinding::LocalPositionX]);

    if forward.is_none() && lateral.is_none() {
        log::warn!("Clip '{}' has no horizontal root channel", clip.name);
        return MotionCurve::empty();
    }
    if clip.length <= 0.0 {
        return MotionCurve::empty();
    }

    let position = |t: f32| {
        Vec2::new(
            lateral.map_or(0.0, |c| c.evaluate(t)),
            forward.map_or(0.0, |c| c.evaluate(t)),
        )
    };

    let mut curve = Curve::new();
    let mut total = 0.0;
    let mut last = position(0.0);

    for time in mode.sample_times(clip.length, clip.frame_rate) {
        let current = position(time);
        total += current.distance(last);
        curve.add_key(time, total);
        last = current;
    }

    log::debug!(
        "Extracted {} motion keys from '{}' ({:.3} units)",
        curve.len(),
        clip.name,
        total
    );
    MotionCurve::new(curve)
}
