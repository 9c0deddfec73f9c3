//! Time-of-day cycle driving the sky colors.

use tracing::debug;

use crate::color::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Sky gradient endpoints and the sun/moon color of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyPalette {
    pub top: Rgb,
    pub bottom: Rgb,
    pub sun: Rgb,
}

impl SkyPalette {
    pub fn lerp(&self, other: &SkyPalette, t: f64) -> SkyPalette {
        SkyPalette {
            top: self.top.lerp(other.top, t),
            bottom: self.bottom.lerp(other.bottom, t),
            sun: self.sun.lerp(other.sun, t),
        }
    }
}

impl Phase {
    pub fn next(self) -> Phase {
        match self {
            Phase::Morning => Phase::Afternoon,
            Phase::Afternoon => Phase::Evening,
            Phase::Evening => Phase::Night,
            Phase::Night => Phase::Morning,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Morning => "morning",
            Phase::Afternoon => "afternoon",
            Phase::Evening => "evening",
            Phase::Night => "night",
        }
    }

    pub fn palette(self) -> SkyPalette {
        match self {
            Phase::Morning => SkyPalette {
                top: Rgb(0xFF, 0xB3, 0x47),
                bottom: Rgb(0x87, 0xCE, 0xEB),
                sun: Rgb(0xFD, 0xB8, 0x13),
            },
            Phase::Afternoon => SkyPalette {
                top: Rgb(0x87, 0xCE, 0xEB),
                bottom: Rgb(0xB0, 0xE0, 0xE6),
                sun: Rgb(0xFF, 0xD7, 0x00),
            },
            Phase::Evening => SkyPalette {
                top: Rgb(0xFF, 0x6B, 0x6B),
                bottom: Rgb(0xFF, 0x8E, 0x53),
                sun: Rgb(0xFF, 0x45, 0x00),
            },
            Phase::Night => SkyPalette {
                top: Rgb(0x0C, 0x14, 0x45),
                bottom: Rgb(0x1A, 0x2A, 0x6C),
                sun: Rgb(0xF0, 0xE6, 0x8C),
            },
        }
    }
}

/// Blends from `current` toward `next`; after `ticks_per_phase` advances the
/// blend completes and the cycle moves on by one phase.
///
/// Progress is `ticks * speed` rather than a running float sum, so the
/// phase change lands on exactly `ceil(1 / speed)` ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCycle {
    current: Phase,
    next: Phase,
    ticks: u32,
    speed: f64,
    ticks_per_phase: u32,
}

impl DayCycle {
    pub fn new(speed: f64) -> Self {
        // Shave float noise so an exact reciprocal such as 1/0.002 cannot ceil to 501.
        let ticks_per_phase = ((1.0 / speed) - 1e-9).ceil().max(1.0) as u32;
        Self {
            current: Phase::Morning,
            next: Phase::Morning.next(),
            ticks: 0,
            speed,
            ticks_per_phase,
        }
    }

    pub fn reset(&mut self) {
        *self = DayCycle::new(self.speed);
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn next(&self) -> Phase {
        self.next
    }

    pub fn ticks_per_phase(&self) -> u32 {
        self.ticks_per_phase
    }

    /// Always in `[0, 1)`.
    pub fn progress(&self) -> f64 {
        (self.ticks as f64 * self.speed).min(1.0 - f64::EPSILON)
    }

    /// Returns `true` when this tick committed a phase change.
    pub fn advance(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks < self.ticks_per_phase {
            return false;
        }
        self.ticks = 0;
        self.current = self.next;
        self.next = self.current.next();
        debug!(phase = self.current.name(), next = self.next.name(), "Time of day advanced");
        true
    }

    pub fn palette(&self) -> SkyPalette {
        self.current
            .palette()
            .lerp(&self.next.palette(), self.progress())
    }
}
