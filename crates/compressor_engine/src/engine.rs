use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::client::{CompressionService, ReqwestCompressionService, ServiceSettings};
use crate::{CompressRequest, DownloadRequest, EngineEvent, JobId, ServiceError};

enum EngineCommand {
    Compress(CompressRequest),
    Cancel { job_id: JobId },
    Download(DownloadRequest),
}

type InFlight = Arc<Mutex<HashMap<JobId, CancellationToken>>>;

/// Runs service calls on a background tokio runtime.
///
/// Commands go in through the handle, results come back as `EngineEvent`s.
/// Dropping the handle stops the engine thread and aborts unfinished work.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    events: EngineEvents,
}

/// Receiving end of the engine's events.
///
/// Holding one does not keep the engine alive; once the handle is gone it
/// reports `Disconnected`.
#[derive(Clone)]
pub struct EngineEvents {
    rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        match self.rx.lock() {
            Ok(rx) => rx.recv_timeout(timeout),
            Err(_) => Err(mpsc::RecvTimeoutError::Disconnected),
        }
    }
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings, download_dir: PathBuf) -> Result<Self, ServiceError> {
        let service = ReqwestCompressionService::new(settings)?;
        Ok(Self::with_service(Arc::new(service), download_dir))
    }

    pub fn with_service(service: Arc<dyn CompressionService>, download_dir: PathBuf) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let in_flight: InFlight = Arc::default();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Compress(request) => {
                        let token = CancellationToken::new();
                        if let Ok(mut guard) = in_flight.lock() {
                            guard.insert(request.job_id, token.clone());
                        }
                        runtime.spawn(run_compression(
                            service.clone(),
                            request,
                            token,
                            in_flight.clone(),
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::Cancel { job_id } => {
                        let token = in_flight.lock().ok().and_then(|mut g| g.remove(&job_id));
                        match token {
                            Some(token) => {
                                engine_info!("Cancelling job {}", job_id);
                                token.cancel();
                            }
                            None => engine_warn!("Cancel for unknown job {}", job_id),
                        }
                    }
                    EngineCommand::Download(request) => {
                        runtime.spawn(run_download(
                            service.clone(),
                            request,
                            download_dir.clone(),
                            event_tx.clone(),
                        ));
                    }
                }
            }
            engine_info!("Engine handle dropped, stopping");
            runtime.shutdown_background();
        });

        Self {
            cmd_tx,
            events: EngineEvents {
                rx: Arc::new(Mutex::new(event_rx)),
            },
        }
    }

    pub fn events(&self) -> EngineEvents {
        self.events.clone()
    }

    pub fn compress(&self, request: CompressRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Compress(request));
    }

    pub fn cancel(&self, job_id: JobId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { job_id });
    }

    pub fn download(&self, request: DownloadRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Download(request));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.events.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.events.recv_timeout(timeout)
    }
}

async fn run_compression(
    service: Arc<dyn CompressionService>,
    request: CompressRequest,
    cancel: CancellationToken,
    in_flight: InFlight,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let job_id = request.job_id;
    let result = service.compress(&request, &cancel).await;
    if let Ok(mut guard) = in_flight.lock() {
        guard.remove(&job_id);
    }
    match &result {
        Ok(file) => engine_info!(
            "Job {} finished: {:?} {}MB -> {}MB",
            job_id,
            file.status,
            file.original_mb,
            file.compressed_mb
        ),
        Err(err) => engine_warn!("Job {} failed: {}", job_id, err),
    }
    let _ = event_tx.send(EngineEvent::CompressionCompleted { job_id, result });
}

async fn run_download(
    service: Arc<dyn CompressionService>,
    request: DownloadRequest,
    download_dir: PathBuf,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = service.download(&request, &download_dir).await;
    match &result {
        Ok(path) => engine_info!("Saved {} to {:?}", request.filename, path),
        Err(err) => engine_warn!("Download of {} failed: {}", request.filename, err),
    }
    let _ = event_tx.send(EngineEvent::DownloadCompleted {
        filename: request.filename,
        result,
    });
}
