use derivative::Derivative;
use enum_derive_2018::EnumDisplay;
use macro_attr_2018::macro_attr;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use web_audio_api::{
    AudioBuffer,
    context::{AudioContext, BaseAudioContext},
};

pub const SAMPLE_RATE: f32 = 44100.0;

macro_attr! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Derivative, EnumDisplay!)]
    #[derivative(Default)]
    pub enum BuzzerSound {
        #[derivative(Default)]
        Buzz,
        Tweedle,
    }
}

/// A hard-edged square wave, the classic gym horn.
fn square_wave(freq: f32, len_secs: f32) -> Vec<f32> {
    let samples = (len_secs * SAMPLE_RATE) as usize;
    (0..samples)
        .map(|i| {
            let phase = (i as f32 * freq / SAMPLE_RATE).fract();
            if phase < 0.5 { 0.5 } else { -0.5 }
        })
        .collect()
}

/// Two sine tones alternating every 150 ms.
fn tweedle_wave(len_secs: f32) -> Vec<f32> {
    const LOW: f32 = 523.25;
    const HIGH: f32 = 659.25;
    let samples = (len_secs * SAMPLE_RATE) as usize;
    let switch = (0.15 * SAMPLE_RATE) as usize;
    (0..samples)
        .map(|i| {
            let freq = if (i / switch) % 2 == 0 { LOW } else { HIGH };
            let t = i as f32 / SAMPLE_RATE;
            0.5 * (core::f32::consts::TAU * freq * t).sin()
        })
        .collect()
}

/// The synthesized buzzer waveforms, loaded into audio buffers once at
/// startup.
pub(super) struct SoundLibrary {
    buzz: AudioBuffer,
    tweedle: AudioBuffer,
}

impl SoundLibrary {
    pub(super) fn new(context: &AudioContext) -> Self {
        let buzz_samples = square_wave(330.0, 1.0);
        let mut buzz = context.create_buffer(1, buzz_samples.len(), SAMPLE_RATE);
        buzz.copy_to_channel(&buzz_samples, 0);

        let tweedle_samples = tweedle_wave(1.2);
        let mut tweedle = context.create_buffer(1, tweedle_samples.len(), SAMPLE_RATE);
        tweedle.copy_to_channel(&tweedle_samples, 0);

        Self { buzz, tweedle }
    }
}

impl Index<BuzzerSound> for SoundLibrary {
    type Output = AudioBuffer;

    fn index(&self, sound: BuzzerSound) -> &Self::Output {
        match sound {
            BuzzerSound::Buzz => &self.buzz,
            BuzzerSound::Tweedle => &self.tweedle,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_square_wave_is_full_period() {
        let wave = square_wave(330.0, 1.0);
        assert_eq!(wave.len(), 44100);
        assert_eq!(wave[0], 0.5);
        assert!(wave.iter().any(|&s| s == -0.5));
    }

    #[test]
    fn test_tweedle_alternates() {
        let wave = tweedle_wave(1.2);
        assert_eq!(wave.len(), (1.2f32 * SAMPLE_RATE) as usize);
        // Samples stay within the synthesis amplitude
        assert!(wave.iter().all(|s| s.abs() <= 0.5));
    }
}
