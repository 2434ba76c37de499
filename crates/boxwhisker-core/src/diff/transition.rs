//! Timed attribute transitions
//!
//! A transition is a scheduled record: start time, duration, easing and the
//! two attribute sets. It holds no timer; callers sample it with their own
//! clock, so interrupting one is just replacing it.

use serde::{Deserialize, Serialize};

use super::element::Attributes;

/// Interpolation curve of a transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    QuadInOut,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` onto the curve
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t / 2.0
                } else {
                    let t = t - 1.0;
                    (t * (2.0 - t) + 1.0) / 2.0
                }
            }
            Easing::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// What happens to the element when the transition completes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionEnd {
    /// Settle on the target attributes
    Keep,
    /// Remove the element
    Remove,
}

/// An in-flight attribute animation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Attributes,
    pub to: Attributes,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
    pub end: TransitionEnd,
}

impl Transition {
    pub fn new(
        from: Attributes,
        to: Attributes,
        start_ms: f64,
        duration_ms: f64,
        easing: Easing,
        end: TransitionEnd,
    ) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
            end,
        }
    }

    /// Linear progress at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Whether the transition has reached its end at `now_ms`
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Attributes at `now_ms`
    pub fn sample(&self, now_ms: f64) -> Attributes {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to.clone();
        }
        self.from.interpolate(&self.to, self.easing.apply(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::element::Attr;

    fn transition(duration: f64, easing: Easing) -> Transition {
        Transition::new(
            Attributes::new().with(Attr::Y, 0.0),
            Attributes::new().with(Attr::Y, 100.0),
            1000.0,
            duration,
            easing,
            TransitionEnd::Keep,
        )
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::QuadInOut, Easing::CubicInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cubic_is_slow_at_start() {
        assert!(Easing::CubicInOut.apply(0.1) < 0.1);
        assert!(Easing::CubicInOut.apply(0.9) > 0.9);
    }

    #[test]
    fn test_sample_linear() {
        let t = transition(200.0, Easing::Linear);
        assert_eq!(t.sample(1000.0).get(Attr::Y), Some(0.0));
        assert_eq!(t.sample(1100.0).get(Attr::Y), Some(50.0));
        assert_eq!(t.sample(1200.0).get(Attr::Y), Some(100.0));
        assert!(t.is_finished(1200.0));
        assert!(!t.is_finished(1199.0));
    }

    #[test]
    fn test_before_start_holds_origin() {
        let t = transition(200.0, Easing::Linear);
        assert_eq!(t.sample(500.0).get(Attr::Y), Some(0.0));
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let t = transition(0.0, Easing::CubicInOut);
        assert!(t.is_finished(1000.0));
        assert_eq!(t.sample(1000.0).get(Attr::Y), Some(100.0));
    }
}
