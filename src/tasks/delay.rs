use std::{fmt, str::FromStr, time::Duration};

use rand::Rng;

/// Inclusive window, in seconds, that the pause between two queries is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayWindow {
    min: f64,
    max: f64,
}

impl DelayWindow {
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn sample(&self) -> Duration {
        if self.max <= 0.0 {
            return Duration::ZERO;
        }
        let secs = rand::thread_rng().gen_range(self.min..=self.max);
        Duration::from_secs_f64(secs)
    }
}

impl fmt::Display for DelayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}s", self.min, self.max)
    }
}

impl FromStr for DelayWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (min, max) = value
            .split_once('-')
            .ok_or_else(|| format!("expected MIN-MAX, got {value:?}"))?;
        let min: f64 = min
            .trim()
            .parse()
            .map_err(|_| format!("invalid minimum delay {:?}", min.trim()))?;
        let max: f64 = max
            .trim()
            .parse()
            .map_err(|_| format!("invalid maximum delay {:?}", max.trim()))?;
        Self::new(min, max)
            .ok_or_else(|| format!("delay window {min}-{max} must satisfy 0 <= MIN <= MAX"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spaced_window() {
        let window: DelayWindow = " 1.5 - 4 ".parse().unwrap();
        assert_eq!(window, DelayWindow::new(1.5, 4.0).unwrap());
    }

    #[test]
    fn rejects_negative_and_inverted_bounds() {
        assert!("-1-3".parse::<DelayWindow>().is_err());
        assert!("5-2".parse::<DelayWindow>().is_err());
        assert!("fast".parse::<DelayWindow>().is_err());
    }

    #[test]
    fn samples_stay_inside_window() {
        let window = DelayWindow::new(0.2, 0.4).unwrap();
        for _ in 0..100 {
            let delay = window.sample().as_secs_f64();
            assert!((0.2..=0.4).contains(&delay), "{delay} outside window");
        }
    }

    #[test]
    fn zero_window_never_sleeps() {
        assert_eq!(DelayWindow::new(0.0, 0.0).unwrap().sample(), Duration::ZERO);
        assert_eq!("0-0".parse::<DelayWindow>().unwrap().sample(), Duration::ZERO);
    }
}
