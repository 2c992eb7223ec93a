/*
 * @file audio.rs
 * @brief Microphone capture, speaker playback and WAV conversion
 * @author Kevin Thomas
 * @date 2025
 *
 * MIT License
 *
 * Copyright (c) 2025 Kevin Thomas
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Audio recording, WAV encoding and playback.
//!
//! This module handles microphone capture and speaker output using CPAL and
//! in-memory WAV conversion using hound.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig, StreamError};
use hound::{WavReader, WavSpec, WavWriter};
use tracing::warn;

/// Sample rate for audio recording (16kHz).
///
/// Value is expressed in Hertz and matches the recognizer's short-audio format.
pub const SAMPLE_RATE: u32 = 16000;

/// Number of audio channels (mono).
const CHANNELS: u16 = 1;

/// Bits per sample for WAV encoding.
const BITS_PER_SAMPLE: u16 = 16;

/// Amount of time to capture audio for each utterance.
const RECORD_DURATION: Duration = Duration::from_secs(5);

/// Extra time kept open after playback so the device drains its buffer.
const PLAYBACK_TAIL: Duration = Duration::from_millis(250);

/// Minimum RMS amplitude considered speech.
///
/// Values much above ~300 miss normal speaking levels on some microphones.
const SILENCE_RMS_THRESHOLD: f32 = 150.0;

/// Decoded PCM audio with its sample rate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pcm {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Records audio from the default input device for a fixed duration.
///
/// # Returns
/// A vector of 16-bit PCM audio samples.
///
/// # Errors
/// Returns an error if:
/// - No input device is available
/// - The audio stream cannot be created
/// - Recording fails
pub fn record_audio() -> Result<Vec<i16>> {
    let device = default_input_device()?;
    let config = stream_config(SAMPLE_RATE, CHANNELS);
    let samples = shared_samples();
    let stream = build_input_stream(&device, &config, samples.clone())?;
    stream.play()?;
    std::thread::sleep(RECORD_DURATION);
    drop(stream);
    let captured = samples
        .lock()
        .map_err(|_| anyhow!("Audio buffer poisoned"))?
        .clone();
    Ok(captured)
}

/// Plays PCM audio on the default output device, blocking until done.
///
/// # Errors
/// Returns an error if no output device exists or the stream cannot start.
pub fn play_audio(pcm: &Pcm) -> Result<()> {
    if pcm.samples.is_empty() {
        return Ok(());
    }
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| anyhow!("No output device"))?;
    let config = stream_config(pcm.sample_rate, pcm.channels);
    let queue: Arc<Mutex<VecDeque<f32>>> = Arc::new(Mutex::new(
        pcm.samples.iter().map(|&s| s as f32 / i16::MAX as f32).collect(),
    ));
    let stream = build_output_stream(&device, &config, queue)?;
    stream.play()?;
    std::thread::sleep(playback_duration(pcm) + PLAYBACK_TAIL);
    drop(stream);
    Ok(())
}

/// Encodes mono 16 kHz samples as an in-memory WAV file.
///
/// # Errors
/// Returns an error if the WAV writer fails.
pub fn encode_wav(samples: &[i16]) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Decodes a 16-bit PCM WAV payload.
///
/// # Errors
/// Returns an error if the bytes are not a 16-bit integer WAV file.
pub fn decode_wav(bytes: &[u8]) -> Result<Pcm> {
    let reader = WavReader::new(Cursor::new(bytes)).context("Failed to open WAV data")?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != BITS_PER_SAMPLE {
        anyhow::bail!(
            "Unsupported WAV format: {:?} {} bits",
            spec.sample_format,
            spec.bits_per_sample
        );
    }
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read WAV samples")?;
    Ok(Pcm {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Detects whether audio samples contain meaningful speech content.
///
/// # Details
/// Compares the root mean square energy of the signal against a threshold
/// so silent recordings never reach the recognizer.
pub fn contains_speech(samples: &[i16]) -> bool {
    if samples.is_empty() {
        return false;
    }
    let energy = samples
        .iter()
        .map(|sample| (*sample as f32).powi(2))
        .sum::<f32>()
        / samples.len() as f32;
    energy.sqrt() >= SILENCE_RMS_THRESHOLD
}

/// Computes how long `pcm` takes to play at its sample rate.
fn playback_duration(pcm: &Pcm) -> Duration {
    let frames = pcm.samples.len() as u64 / u64::from(pcm.channels.max(1));
    Duration::from_millis(frames * 1000 / u64::from(pcm.sample_rate.max(1)))
}

/// Returns the host's default microphone.
///
/// # Errors
/// Returns an error when no input device exists.
fn default_input_device() -> Result<Device> {
    cpal::default_host()
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device"))
}

/// Builds a stream configuration with the default buffer size.
fn stream_config(sample_rate: u32, channels: u16) -> StreamConfig {
    StreamConfig {
        channels,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    }
}

/// Creates an empty sample buffer shared with the capture callback.
fn shared_samples() -> Arc<Mutex<Vec<i16>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Creates an input stream that appends captured frames to `samples`.
///
/// # Arguments
/// * `device` - Input device to capture from.
/// * `config` - Stream configuration.
/// * `samples` - Shared buffer receiving converted samples.
fn build_input_stream(
    device: &Device,
    config: &StreamConfig,
    samples: Arc<Mutex<Vec<i16>>>,
) -> Result<Stream> {
    device
        .build_input_stream(
            config,
            move |data: &[f32], _: &_| push_samples(&samples, data),
            log_stream_error,
            None,
        )
        .map_err(|err| anyhow!(err))
}

/// Creates an output stream that drains `queue` into the device.
fn build_output_stream(
    device: &Device,
    config: &StreamConfig,
    queue: Arc<Mutex<VecDeque<f32>>>,
) -> Result<Stream> {
    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &_| pull_samples(&queue, data),
            log_stream_error,
            None,
        )
        .map_err(|err| anyhow!(err))
}

/// Converts floating-point frames into 16-bit PCM and appends them to the buffer.
fn push_samples(buffer: &Arc<Mutex<Vec<i16>>>, data: &[f32]) {
    if let Ok(mut guard) = buffer.lock() {
        guard.extend(data.iter().map(|&sample| (sample * i16::MAX as f32) as i16));
    }
}

/// Fills the output buffer from the queue, padding with silence.
fn pull_samples(queue: &Arc<Mutex<VecDeque<f32>>>, data: &mut [f32]) {
    let mut guard = match queue.lock() {
        Ok(guard) => guard,
        Err(_) => {
            data.fill(0.0);
            return;
        }
    };
    for frame in data.iter_mut() {
        *frame = guard.pop_front().unwrap_or(0.0);
    }
}

/// Logs asynchronous stream faults reported by CPAL.
fn log_stream_error(error: StreamError) {
    warn!(%error, "audio stream error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_config_matches_request() {
        let config = stream_config(SAMPLE_RATE, CHANNELS);
        assert_eq!(config.channels, CHANNELS);
        assert_eq!(config.sample_rate.0, SAMPLE_RATE);
    }

    #[test]
    fn push_samples_converts_floats() {
        let samples = shared_samples();
        push_samples(&samples, &[0.0, 0.5, -1.0]);
        let guard = samples.lock().unwrap();
        assert_eq!(guard.len(), 3);
        assert_eq!(guard[0], 0);
        assert!(guard[1] > 0);
        assert!(guard[2] < 0);
    }

    #[test]
    fn pull_samples_pads_with_silence() {
        let queue = Arc::new(Mutex::new(VecDeque::from(vec![0.25, -0.25])));
        let mut out = [1.0_f32; 4];
        pull_samples(&queue, &mut out);
        assert_eq!(out, [0.25, -0.25, 0.0, 0.0]);
        assert!(queue.lock().unwrap().is_empty());
    }

    #[test]
    fn wav_encoding_decodes_back() {
        let samples = vec![0_i16, i16::MAX / 2, -i16::MAX / 2, 42];
        let bytes = encode_wav(&samples).expect("encode");
        assert_eq!(&bytes[..4], b"RIFF");
        let pcm = decode_wav(&bytes).expect("decode");
        assert_eq!(pcm.samples, samples);
        assert_eq!(pcm.sample_rate, SAMPLE_RATE);
        assert_eq!(pcm.channels, CHANNELS);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_wav(b"definitely not audio").is_err());
    }

    #[test]
    fn contains_speech_requires_energy() {
        assert!(!contains_speech(&[]));
        assert!(!contains_speech(&[0_i16; 1600]));
        assert!(contains_speech(&vec![i16::MAX / 2; 1600]));
    }

    #[test]
    fn playback_duration_follows_rate() {
        let pcm = Pcm {
            samples: vec![0; 8000],
            sample_rate: 16000,
            channels: 1,
        };
        assert_eq!(playback_duration(&pcm), Duration::from_millis(500));
    }
}
