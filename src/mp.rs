/// File: mp.rs
/// This file contains functionality for multithreaded analysis.
///
/// Segments are independent, so the per-segment analyzers can run on a thread
/// pool. The result is identical to the sequential `pipeline::analyze`.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use log::info;
use threadpool::ThreadPool;
use crate::config::AnalysisConfig;
use crate::dsp::DspBackend;
use crate::error::AnalysisError;
use crate::pipeline::{aggregate, AnalysisResult};
use crate::prosody::{pace, pause, tonality, voice};
use crate::segment::{score_segment, Segmentation, Waveform};

/// Scores of one segment, tagged with its index
type SegmentScores = (usize, Result<(f64, f64, f64), AnalysisError>);

/// Picks a thread count from the available parallelism when none is given
fn thread_count(num_threads: Option<usize>) -> usize {
    match num_threads {
        Some(x) if x > 0 => x,
        _ => match thread::available_parallelism() {
            Ok(x) => x.get(),
            Err(_) => 1
        }
    }
}

/// A multithreaded version of `pipeline::analyze`.
///
/// Tonality, pace and pause scores of each segment are computed as one job on a
/// thread pool; the voice character is computed on the calling thread meanwhile.
/// The first error in segment order is returned.
pub fn analyze_parallel<B>(waveform: Arc<Waveform>, segments: usize, config: &AnalysisConfig, backend: Arc<B>, num_threads: Option<usize>) -> Result<AnalysisResult, AnalysisError>
where
    B: DspBackend + Send + Sync + 'static,
{
    config.validate()?;
    let segmentation = Segmentation::new(&waveform, segments)?;
    let time = segmentation.time_axis();
    let num_threads = usize::min(thread_count(num_threads), segments);
    info!("analyzing {:.2} s of audio in {} segments on {} threads", waveform.duration(), segments, num_threads);

    // Set up the multithreading
    let pool = ThreadPool::new(num_threads);
    let (tx, rx) = mpsc::channel::<SegmentScores>();  // the message passing channel

    for segment_idx in 0..segments {
        let tx_clone = tx.clone();
        let local_waveform = Arc::clone(&waveform);
        let local_backend = Arc::clone(&backend);
        let local_config = config.clone();

        pool.execute(move || {
            let result = score_one(&local_waveform, segments, segment_idx, &local_config, local_backend.as_ref());
            let _ = tx_clone.send((segment_idx, result));
        });
    }

    // Drop the original sender. Once all senders are dropped, receiving will end automatically.
    drop(tx);

    let vocal_characters = voice::analyze(&waveform, segments, &config.voice, backend.as_ref());

    // Collect the scores and sort them by segment index
    let mut results: Vec<SegmentScores> = rx.iter().collect();
    results.sort_by_key(|(index, _)| *index);
    if results.len() != segments {
        return Err(AnalysisError::ShapeMismatch { series: "segment jobs", expected: segments, actual: results.len() });
    }

    let mut tonality_scores: Vec<f64> = Vec::with_capacity(segments);
    let mut pace_scores: Vec<f64> = Vec::with_capacity(segments);
    let mut pause_scores: Vec<f64> = Vec::with_capacity(segments);
    for (_, result) in results {
        let (t, p, s) = result?;
        tonality_scores.push(t);
        pace_scores.push(p);
        pause_scores.push(s);
    }

    aggregate(time, tonality_scores, pace_scores, pause_scores, vocal_characters?)
}

/// Computes the three per-segment scores of one segment.
fn score_one<B: DspBackend + ?Sized>(waveform: &Waveform, segments: usize, segment_idx: usize, config: &AnalysisConfig, backend: &B) -> Result<(f64, f64, f64), AnalysisError> {
    let segmentation = Segmentation::new(waveform, segments)?;
    let segment = match segmentation.get(segment_idx) {
        Some(x) => x,
        None => return Err(AnalysisError::InvalidSegmentCount(segments))
    };
    let tonality_score = score_segment(&segment, |seg| tonality::score_segment(seg, &config.tonality, backend))?;
    let pace_score = score_segment(&segment, |seg| pace::score_segment(seg, backend))?;
    let pause_score = score_segment(&segment, |seg| pause::score_segment(seg, &config.pause, backend))?;
    Ok((tonality_score, pace_score, pause_score))
}
