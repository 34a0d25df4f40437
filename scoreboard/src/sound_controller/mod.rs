use derivative::Derivative;
use enum_derive_2018::EnumDisplay;
use log::*;
use macro_attr_2018::macro_attr;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use web_audio_api::{
    AudioBuffer,
    context::{AudioContext, AudioContextOptions, BaseAudioContext},
    media_devices,
    node::{AudioBufferSourceNode, AudioNode, AudioScheduledSourceNode, GainNode},
};

const FADE_LEN: f64 = 0.05;

mod sounds;
pub use sounds::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct SoundSettings {
    #[derivative(Default(value = "true"))]
    pub sound_enabled: bool,
    pub buzzer_sound: BuzzerSound,
    pub buzzer_vol: Volume,
}

macro_attr! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Derivative, EnumDisplay!)]
    #[derivative(Default)]
    pub enum Volume {
        Off,
        Low,
        Medium,
        High,
        #[derivative(Default)]
        Max,
    }
}

impl Volume {
    fn as_f32(&self) -> f32 {
        match self {
            Self::Off => 0.0,
            Self::Low => 10f32.powf(-1.2),    // 12dB lower than max
            Self::Medium => 10f32.powf(-0.8), // 8dB lower than max
            Self::High => 10f32.powf(-0.4),   // 4dB lower than max
            Self::Max => 1.0,
        }
    }
}

/// Owns the audio context and the looping buzzer sound. The frame loop
/// feeds it the buzzer condition every frame; starts and stops are
/// idempotent so re-asserting the same state is free.
pub struct SoundController {
    context: Arc<AudioContext>,
    library: SoundLibrary,
    settings: SoundSettings,
    playing: Option<Sound>,
}

impl SoundController {
    pub fn new(settings: SoundSettings) -> Self {
        let available_devices = media_devices::enumerate_devices_sync();
        debug!("Available audio devices:\n{available_devices:#?}");

        let opts = AudioContextOptions {
            sample_rate: Some(SAMPLE_RATE),
            ..AudioContextOptions::default()
        };

        let context = AudioContext::new(opts);
        debug!("Audio context created with sink {:?}", context.sink_id());
        let context = Arc::new(context);

        let library = SoundLibrary::new(&context);

        Self {
            context,
            library,
            settings,
            playing: None,
        }
    }

    pub fn update_settings(&mut self, settings: SoundSettings) {
        self.settings = settings;
        if !self.settings.sound_enabled {
            self.set_buzzer(false);
        }
    }

    pub fn set_buzzer(&mut self, on: bool) {
        if on && self.playing.is_none() && self.settings.sound_enabled {
            let buffer = self.library[self.settings.buzzer_sound].clone();
            self.playing = Some(Sound::new(
                &self.context,
                self.settings.buzzer_vol.as_f32(),
                buffer,
            ));
        } else if !on {
            if let Some(sound) = self.playing.take() {
                sound.stop(&self.context);
            }
        }
    }
}

struct Sound {
    gain: GainNode,
    gain_value: f32,
    source: AudioBufferSourceNode,
}

impl Sound {
    fn new(context: &AudioContext, volume: f32, buffer: AudioBuffer) -> Self {
        let gain = context.create_gain();
        gain.connect(&context.destination());

        let mut source = context.create_buffer_source();
        source.set_buffer(buffer);
        source.connect(&gain);
        source.set_loop(true);

        // Set the gains so that the start of the fade is now
        let fade_end = context.current_time() + FADE_LEN;
        gain.gain().set_value(0.0);
        gain.gain().linear_ramp_to_value_at_time(volume, fade_end);

        source.start();

        Self {
            gain,
            gain_value: volume,
            source,
        }
    }

    fn stop(mut self, context: &AudioContext) {
        let fade_end = context.current_time() + FADE_LEN;

        // Set the gains so that the start of the fade is now, not when the
        // sound started
        self.gain.gain().set_value(self.gain_value);
        self.gain.gain().linear_ramp_to_value_at_time(0.0, fade_end);

        self.source.stop_at(fade_end);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ser_sound_settings() {
        let settings: SoundSettings = Default::default();
        let serialized = toml::to_string(&settings).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(settings));
    }

    #[test]
    fn test_volume_steps_increase() {
        let mut last = -1.0f32;
        for vol in [
            Volume::Off,
            Volume::Low,
            Volume::Medium,
            Volume::High,
            Volume::Max,
        ] {
            assert!(vol.as_f32() > last);
            last = vol.as_f32();
        }
    }
}
