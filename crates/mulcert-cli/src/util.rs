use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// spell-checker:ignore subsec

/// Print all [`HDuration`]s as (fractional) seconds
pub static DURATIONS_AS_SECS: AtomicBool = AtomicBool::new(false);

/// Human-readable durations
pub struct HDuration(pub Duration);

impl fmt::Display for HDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        if DURATIONS_AS_SECS.load(Ordering::Relaxed) {
            return write!(f, "{:.3} s", d.as_secs_f64());
        }
        let s = d.as_secs();
        if s >= 60 {
            let (m, s) = (s / 60, s % 60);
            let (h, m) = (m / 60, m % 60);
            if h == 0 {
                return write!(f, "{m} m {s} s");
            }
            let (d, h) = (h / 24, h % 24);
            if d == 0 {
                return write!(f, "{h} h {m} m {s} s");
            }
            return write!(f, "{d} d {h} h {m} m {s} s");
        }
        if s != 0 {
            return write!(f, "{:.3} s", d.as_secs_f32());
        }
        let ms = d.subsec_millis();
        if ms != 0 {
            return write!(f, "{ms} ms");
        }
        let us = d.subsec_micros();
        if us != 0 {
            return write!(f, "{us} us");
        }
        write!(f, "{} ns", d.subsec_nanos())
    }
}

/// Human-readable byte counts
pub struct HBytes(pub u64);

impl fmt::Display for HBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
        let mut value = self.0 as f64;
        if value < 1024.0 {
            return write!(f, "{} B", self.0);
        }
        let mut unit = UNITS[0];
        for u in UNITS {
            value /= 1024.0;
            unit = u;
            if value < 1024.0 {
                break;
            }
        }
        write!(f, "{value:.1} {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_readable() {
        assert_eq!(HDuration(Duration::from_millis(1500)).to_string(), "1.500 s");
        assert_eq!(HDuration(Duration::from_secs(3725)).to_string(), "1 h 2 m 5 s");
        assert_eq!(HDuration(Duration::from_micros(42)).to_string(), "42 us");
        assert_eq!(HBytes(512).to_string(), "512 B");
        assert_eq!(HBytes(3 << 20).to_string(), "3.0 MiB");
    }
}
