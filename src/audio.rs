//! Synthesized sound effects.
//!
//! Sounds are rendered to plain sample buffers up front, then handed to
//! rodio's mixer thread. Without an output device the game runs silent.

use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};
use tracing::warn;

pub const SAMPLE_RATE: u32 = 44_100;

const FLAP_SECS: f32 = 0.12;
const DEATH_SECS: f32 = 0.5;

fn synth(mut sound: impl AudioUnit, secs: f32) -> Vec<f32> {
    sound.set_sample_rate(SAMPLE_RATE as f64);
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    (0..n).map(|_| sound.get_mono()).collect()
}

/// Short rising chirp, 300 Hz to 700 Hz.
pub fn flap_samples() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(300.0, 700.0, (t / FLAP_SECS).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.12, 0.0, (t / FLAP_SECS).min(1.0)));
    synth((freq >> sine::<f32>()) * gain, FLAP_SECS)
}

/// Falling sawtooth, 400 Hz down to 80 Hz over 0.4 s, fading out by 0.5 s.
pub fn death_samples() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.15, 0.0, (t / DEATH_SECS).min(1.0)));
    synth((freq >> saw()) * gain, DEATH_SECS)
}

pub struct Audio {
    stream: Option<OutputStream>,
    flap: Vec<f32>,
    death: Vec<f32>,
}

impl Audio {
    /// Opens the default output device unless `muted`.
    pub fn new(muted: bool) -> Self {
        let stream = if muted {
            None
        } else {
            match OutputStreamBuilder::open_default_stream() {
                Ok(mut stream) => {
                    stream.log_on_drop(false);
                    Some(stream)
                }
                Err(err) => {
                    warn!(error = %err, "No audio output, running silent");
                    None
                }
            }
        };
        Self {
            stream,
            flap: flap_samples(),
            death: death_samples(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.stream.is_some()
    }

    pub fn play_flap(&self) {
        self.play(&self.flap);
    }

    pub fn play_death(&self) {
        self.play(&self.death);
    }

    fn play(&self, samples: &[f32]) {
        let Some(stream) = &self.stream else { return };
        let sink = Sink::connect_new(stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
        sink.detach();
    }
}
