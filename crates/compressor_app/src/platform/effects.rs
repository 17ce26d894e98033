use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use compressor_core::{Effect, JobFailure, Msg, OutcomeKind, OutcomeRecord};
use compressor_engine::{
    CompressRequest, CompressedFile, DownloadRequest, EngineEvent, EngineEvents, EngineHandle,
    FailureKind, ReplyStatus, ServiceError,
};
use engine_logging::{engine_debug, engine_info, engine_warn};

use super::ticker::ProgressTicker;

const EVENT_POLL: Duration = Duration::from_millis(100);

/// Executes the effects returned by `update`.
///
/// Owns the only engine handle, so dropping the runner stops the engine and
/// then the event forwarding thread.
pub struct EffectRunner {
    engine: EngineHandle,
    ticker: ProgressTicker,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        spawn_event_loop(engine.events(), msg_tx.clone());
        Self {
            engine,
            ticker: ProgressTicker::new(msg_tx),
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartTicker => self.ticker.start(),
                Effect::StopTicker => {
                    if self.ticker.is_running() {
                        engine_debug!("Stopping progress ticker");
                    }
                    self.ticker.stop();
                }
                Effect::StartCompression {
                    job_id,
                    source,
                    file_name,
                    target_mb,
                } => {
                    engine_info!(
                        "StartCompression job_id={} file={} target={}MB",
                        job_id,
                        file_name,
                        target_mb
                    );
                    self.engine.compress(CompressRequest {
                        job_id,
                        source,
                        file_name,
                        target_mb,
                    });
                }
                Effect::CancelCompression { job_id } => {
                    engine_info!("CancelCompression job_id={}", job_id);
                    self.engine.cancel(job_id);
                }
                Effect::Download { reference } => {
                    self.engine.download(DownloadRequest {
                        relative_url: reference.relative_url(),
                        filename: reference.filename,
                    });
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || loop {
        match events.recv_timeout(EVENT_POLL) {
            Ok(event) => {
                if let Some(msg) = map_event(event) {
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    });
}

/// Translate an engine event into a controller message.
///
/// Cancelled jobs produce nothing: the controller already moved on.
pub(crate) fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::CompressionCompleted { job_id, result } => {
            let result = match result {
                Ok(file) => Ok(map_reply(file)),
                Err(err) => match map_failure(&err) {
                    Some(failure) => {
                        engine_warn!("Job {} failed: {}", job_id, err);
                        Err(failure)
                    }
                    None => {
                        engine_debug!("Dropping result of cancelled job {}", job_id);
                        return None;
                    }
                },
            };
            Some(Msg::CompressionFinished { job_id, result })
        }
        EngineEvent::DownloadCompleted { result, .. } => Some(Msg::DownloadFinished {
            result: result.map_err(|err| err.message),
        }),
    }
}

fn map_reply(file: CompressedFile) -> OutcomeRecord {
    OutcomeRecord {
        filename: file.filename,
        original_mb: file.original_mb,
        compressed_mb: file.compressed_mb,
        ratio_percent: file.ratio,
        download_id: file.download_id,
        target_mb: file.target_mb,
        kind: match file.status {
            ReplyStatus::Success => OutcomeKind::Success,
            ReplyStatus::PartialSuccess => OutcomeKind::PartialSuccess,
            ReplyStatus::AlreadyUnderTarget => OutcomeKind::AlreadyUnderTarget,
        },
    }
}

fn map_failure(err: &ServiceError) -> Option<JobFailure> {
    match err.kind {
        FailureKind::Cancelled => None,
        FailureKind::Timeout { after } => Some(JobFailure::Timeout { after }),
        FailureKind::Network | FailureKind::InvalidUrl => Some(JobFailure::Connectivity),
        FailureKind::Service | FailureKind::HttpStatus(_) | FailureKind::InvalidResponse => {
            Some(JobFailure::Service(err.message.clone()))
        }
        FailureKind::Io => Some(JobFailure::Service(format!(
            "Could not read the selected file: {}",
            err.message
        ))),
    }
}
