//! Synthesized sound effects and the background loop.

use anyhow::{Context, Result};
use fundsp::prelude64::*;
use rodio::buffer::SamplesBuffer;
use rodio::source::Buffered;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use crate::game::Cue;

pub const SAMPLE_RATE: u32 = 44_100;

const MUSIC_SECONDS: f32 = 4.0;
const MUSIC_VOLUME: f32 = 0.6;
// One bass note per second: A1 A1 C2 G1.
const BASS_LINE: [f64; 4] = [55.0, 55.0, 65.41, 49.0];

fn render(mut unit: impl AudioUnit, seconds: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

/// Short rising chirp.
pub fn jump_samples() -> Vec<f32> {
    let freq = lfo(|t: f64| 300.0 + 900.0 * (t / 0.12).min(1.0));
    let gain = lfo(|t: f64| 0.2 * (1.0 - t / 0.15).max(0.0));
    render((freq >> sine()) * gain, 0.15)
}

/// Falling saw sweep, 400Hz down to 80Hz.
pub fn crash_samples() -> Vec<f32> {
    let freq = lfo(|t: f64| 400.0 + (80.0 - 400.0) * (t / 0.4).min(1.0));
    let gain = lfo(|t: f64| 0.15 * (1.0 - t / 0.5).max(0.0));
    render((freq >> saw()) * gain, 0.5)
}

/// Pulsing bass drone, seamless when repeated.
pub fn music_samples() -> Vec<f32> {
    let freq = lfo(|t: f64| BASS_LINE[(t as usize) % BASS_LINE.len()]);
    // Two pulses per note, each decaying before the next.
    let pulse = lfo(|t: f64| {
        let phase = (t * 2.0).fract();
        0.08 * (1.0 - phase).powi(2)
    });
    render((freq >> saw()) * pulse, MUSIC_SECONDS)
}

/// A decoded sound. Clones share one sample buffer.
pub type SoundClip = Buffered<SamplesBuffer<f32>>;

pub fn load_clip(samples: Vec<f32>) -> SoundClip {
    SamplesBuffer::new(1, SAMPLE_RATE, samples).buffered()
}

pub struct Audio {
    // Dropping the stream stops all playback.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    jump: SoundClip,
    crash: SoundClip,
    music: Option<Sink>,
}

impl Audio {
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("failed to open default audio output")?;
        Ok(Self {
            _stream: stream,
            handle,
            jump: load_clip(jump_samples()),
            crash: load_clip(crash_samples()),
            music: None,
        })
    }

    /// Fire-and-forget playback for a simulation cue.
    pub fn play(&self, cue: Cue) {
        let clip = match cue {
            Cue::Jump => &self.jump,
            Cue::Crash => &self.crash,
        };
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(clip.clone());
                sink.detach(); // Play in background
            }
            Err(err) => tracing::warn!(?cue, "failed to play sound: {err}"),
        }
    }

    /// Starts the background loop. Calling it again while it plays does nothing.
    pub fn start_music(&mut self) {
        if self.music.is_some() {
            return;
        }
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                let source = SamplesBuffer::new(1, SAMPLE_RATE, music_samples()).repeat_infinite();
                sink.set_volume(MUSIC_VOLUME);
                sink.append(source);
                self.music = Some(sink);
            }
            Err(err) => tracing::warn!("failed to start background music: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_jump_is_short_and_audible() {
        let samples = jump_samples();
        assert_eq!(samples.len(), (SAMPLE_RATE as f32 * 0.15) as usize);
        assert!(peak(&samples) > 0.01);
        assert!(peak(&samples) <= 0.21);
    }

    #[test]
    fn test_crash_fades_out() {
        let samples = crash_samples();
        let tail = &samples[samples.len() - 200..];
        assert!(peak(&samples) > 0.05);
        assert!(peak(tail) < 0.01);
    }

    #[test]
    fn test_clip_replays_from_the_start() {
        let samples = jump_samples();
        let shared = load_clip(samples.clone());
        let first: Vec<f32> = shared.clone().collect();
        let second: Vec<f32> = shared.clone().collect();
        assert_eq!(first, samples);
        assert_eq!(second, samples);
        assert_eq!(shared.channels(), 1);
        assert_eq!(shared.sample_rate(), SAMPLE_RATE);
    }

    #[test]
    fn test_music_loop_length_and_level() {
        let samples = music_samples();
        assert_eq!(samples.len(), (SAMPLE_RATE as f32 * MUSIC_SECONDS) as usize);
        assert!(samples.iter().all(|s| s.is_finite()));
        assert!(peak(&samples) <= 0.09);
    }
}
