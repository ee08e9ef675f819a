// File: audiofile.rs
// This file contains functionality for reading audio files into waveforms.

use std::path::Path;
use log::debug;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::conv::IntoSample;
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use thiserror::Error;
use crate::segment::Waveform;

/// Represents all errors that can happen while reading audio
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("could not open audio file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode audio: {0}")]
    Decode(#[from] Error),
    #[error("no supported audio tracks found in the file")]
    NoTrack,
    #[error("unsupported sample format")]
    UnsupportedFormat,
}

/// Represents an audio format (fixed or float)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    F32,
    F64,
    S8,
    S16,
    S24,
    S32
}

/// Represents an audio file. Samples are always stored in f64 format,
/// regardless of their original format.
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub audio_format: AudioFormat,
    pub duration: f64,
    pub num_channels: usize,
    pub num_frames: usize,
    pub sample_rate: u32,
    pub samples: Vec<Vec<f64>>,
}

/// Appends every plane of a decoded buffer to the matching channel, converted to f64
fn append_planes<S: Sample + IntoSample<f64>>(buf: &AudioBuffer<S>, samples: &mut Vec<Vec<f64>>) {
    let planes = buf.planes();
    for (channel_idx, plane) in planes.planes().iter().enumerate() {
        if channel_idx >= samples.len() {
            samples.push(Vec::new());
        }
        samples[channel_idx].extend(plane.iter().map(|&sample| sample.into_sample()));
    }
}

/// Reads an audio file. It can take WAV or AIFF files, as well as other formats.
/// Courtesy of the documentation for symphonia.
pub fn read<P: AsRef<Path>>(path: P) -> Result<AudioFile, AudioError> {
    let path = path.as_ref();
    let src = std::fs::File::open(path)?;

    let mut audio = AudioFile {
        audio_format: AudioFormat::F32,
        duration: 0.0,
        num_channels: 0,
        num_frames: 0,
        sample_rate: 0,
        samples: Vec::<Vec<f64>>::new()
    };

    // We need to make a media source stream before opening the file. Symphonia will automatically detect
    // the file format and codec used.
    let mss = MediaSourceStream::new(Box::new(src), Default::default());
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }
    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();
    let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format = probed.format;

    // We'll retrieve the first track in the file.
    let track = format.tracks().iter().find(|t| t.codec_params.codec != CODEC_TYPE_NULL).ok_or(AudioError::NoTrack)?;
    let decoder_options: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs().make(&track.codec_params, &decoder_options)?;
    let track_id = track.id;

    // Get metadata information (number of channels and sample rate)
    if let Some(channels) = track.codec_params.channels {
        audio.num_channels = channels.count();
        audio.samples.resize_with(audio.num_channels, Default::default);
    }
    if let Some(sample_rate) = track.codec_params.sample_rate {
        audio.sample_rate = sample_rate;
    }

    // Next we'll start a decode loop for the track
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // quit at the end of the file, or when the stream changes under us
            Err(_) => {
                break;
            }
        };

        while !format.metadata().is_latest() {
            format.metadata().pop();
        }

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                // handle samples of different formats
                match decoded {
                    AudioBufferRef::F32(buf) => {
                        audio.audio_format = AudioFormat::F32;
                        append_planes(&*buf, &mut audio.samples);
                    }
                    AudioBufferRef::F64(buf) => {
                        audio.audio_format = AudioFormat::F64;
                        append_planes(&*buf, &mut audio.samples);
                    }
                    AudioBufferRef::S8(buf) => {
                        audio.audio_format = AudioFormat::S8;
                        append_planes(&*buf, &mut audio.samples);
                    }
                    AudioBufferRef::S16(buf) => {
                        audio.audio_format = AudioFormat::S16;
                        append_planes(&*buf, &mut audio.samples);
                    }
                    AudioBufferRef::S24(buf) => {
                        audio.audio_format = AudioFormat::S24;
                        append_planes(&*buf, &mut audio.samples);
                    }
                    AudioBufferRef::S32(buf) => {
                        audio.audio_format = AudioFormat::S32;
                        append_planes(&*buf, &mut audio.samples);
                    }
                    // We don't support other formats, such as unsigned.
                    _ => {
                        return Err(AudioError::UnsupportedFormat);
                    }
                }
            }
            Err(Error::IoError(_)) => {
                continue;
            }
            Err(Error::DecodeError(_)) => {
                continue;
            }
            Err(err) => {
                return Err(AudioError::Decode(err));
            }
        }
    }

    audio.num_channels = audio.samples.len();
    audio.num_frames = audio.samples.first().map_or(0, |channel| channel.len());
    if audio.sample_rate > 0 {
        audio.duration = audio.num_frames as f64 / audio.sample_rate as f64;
    }
    debug!("read {}: {} channels, {} frames at {} Hz ({:?})", path.display(), audio.num_channels, audio.num_frames, audio.sample_rate, audio.audio_format);
    Ok(audio)
}

/// Mixes an audio file down to mono
///
/// This will average all channels into the first one, and delete
/// the remaining channels. It is performed in-place, so you will
/// lose data!
pub fn mixdown(audiofile: &mut AudioFile) {
    if audiofile.samples.len() > 1 {
        let num_channels = audiofile.samples.len();
        for frame_idx in 0..audiofile.samples[0].len() {
            let mut sum = 0.0;
            for channel_idx in 0..num_channels {
                sum += audiofile.samples[channel_idx].get(frame_idx).copied().unwrap_or(0.0);
            }
            audiofile.samples[0][frame_idx] = sum / num_channels as f64;
        }
        audiofile.samples.truncate(1);
        audiofile.num_channels = 1;
    }
}

impl From<AudioFile> for Waveform {
    /// Mixes the file down to mono and keeps its sample rate.
    fn from(mut audiofile: AudioFile) -> Waveform {
        mixdown(&mut audiofile);
        let samples = audiofile.samples.into_iter().next().unwrap_or_default();
        Waveform::new(samples, audiofile.sample_rate)
    }
}
