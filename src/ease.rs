use std::f32::consts::PI;

/// Easing curves used by the storyboard timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    OutQuad,
    OutCubic,
    OutExpo,
    OutElastic,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Self::OutElastic => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    // Period 0.5, amplitude 1
                    let c = (2.0 * PI) / 0.5;
                    2.0_f32.powf(-10.0 * t) * ((t - 0.125) * c).sin() + 1.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 5] = [
        Ease::Linear,
        Ease::OutQuad,
        Ease::OutCubic,
        Ease::OutExpo,
        Ease::OutElastic,
    ];

    #[test]
    fn endpoints_are_stable() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn input_is_clamped() {
        for ease in ALL {
            assert_eq!(ease.apply(-0.5), 0.0);
            assert_eq!(ease.apply(1.5), 1.0);
        }
    }

    #[test]
    fn monotonic_spot_check_for_non_elastic() {
        for ease in [Ease::Linear, Ease::OutQuad, Ease::OutCubic, Ease::OutExpo] {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b);
            assert!(b < c);
        }
    }

    #[test]
    fn elastic_overshoots_then_settles() {
        // Past the first crest the curve exceeds 1.0 before ringing down.
        let peak = (0..100)
            .map(|i| Ease::OutElastic.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert!((Ease::OutElastic.apply(0.999) - 1.0).abs() < 0.05);
    }
}
