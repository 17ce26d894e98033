use std::path::PathBuf;

use crate::view_model::{AppViewModel, FileSummary, ProgressView};
use crate::{
    format_file_size, present_success, CandidateFile, DownloadRef, Effect, IntakeError,
    JobFailure, OutcomeKind, OutcomeRecord, ProgressEstimator, ResultView, Target,
};

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    AwaitingUpload,
    InProgress,
    Succeeded,
    PartiallySucceeded,
    AlreadyUnderTarget,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Succeeded
                | JobState::PartiallySucceeded
                | JobState::AlreadyUnderTarget
                | JobState::Failed
        )
    }

    /// A compressed file is available for download.
    pub fn has_output(self) -> bool {
        self.is_terminal() && self != JobState::Failed
    }

    pub fn surface(self) -> Surface {
        match self {
            JobState::Idle | JobState::AwaitingUpload => Surface::Upload,
            JobState::InProgress => Surface::Progress,
            JobState::Succeeded | JobState::PartiallySucceeded | JobState::AlreadyUnderTarget => {
                Surface::Result
            }
            JobState::Failed => Surface::Error,
        }
    }
}

/// Mutually exclusive top-level panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Upload,
    Progress,
    Result,
    Error,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    job_state: JobState,
    candidate: Option<CandidateFile>,
    target: Target,
    estimator: ProgressEstimator,
    /// Set while a request is in flight; guards against re-entrant starts.
    active_job: Option<JobId>,
    last_job_id: JobId,
    result: Option<ResultView>,
    error_message: Option<String>,
    intake_notice: Option<String>,
    download: Option<DownloadRef>,
    download_in_flight: bool,
    download_status: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            job_state: self.job_state,
            surface: self.job_state.surface(),
            file: self.candidate.as_ref().map(|file| FileSummary {
                name: file.name.clone(),
                size_label: format_file_size(file.size_bytes),
            }),
            controls_visible: self.job_state == JobState::AwaitingUpload,
            target: self.target,
            target_hint: self.target.hint(),
            intake_notice: self.intake_notice.clone(),
            progress: ProgressView {
                percent: self.estimator.percent(),
                label: self.estimator.label(),
            },
            result: self.result.clone(),
            error: self.error_message.clone(),
            download_status: self.download_status.clone(),
            dirty: self.dirty,
        }
    }

    pub fn job_state(&self) -> JobState {
        self.job_state
    }

    pub fn candidate(&self) -> Option<&CandidateFile> {
        self.candidate.as_ref()
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.active_job
    }

    pub fn progress_percent(&self) -> f64 {
        self.estimator.percent()
    }

    pub fn download_in_flight(&self) -> bool {
        self.download_in_flight
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn accepts_intake(&self) -> bool {
        matches!(self.job_state, JobState::Idle | JobState::AwaitingUpload)
    }

    pub(crate) fn accept_candidate(&mut self, candidate: CandidateFile) {
        self.candidate = Some(candidate);
        self.target = Target::default();
        self.intake_notice = None;
        self.job_state = JobState::AwaitingUpload;
        self.mark_dirty();
    }

    pub(crate) fn reject_intake(&mut self, err: IntakeError) {
        self.intake_notice = Some(err.to_string());
        self.mark_dirty();
    }

    pub(crate) fn clear_candidate(&mut self) {
        if self.candidate.is_none() && self.job_state == JobState::Idle {
            return;
        }
        self.candidate = None;
        self.job_state = JobState::Idle;
        self.mark_dirty();
    }

    pub(crate) fn select_target(&mut self, target: Target) {
        if self.target != target {
            self.target = target;
            self.mark_dirty();
        }
    }

    /// Move to `InProgress` and describe the request to dispatch.
    ///
    /// Returns `None` when there is no candidate or a job is already running.
    pub(crate) fn begin_job(&mut self) -> Option<Effect> {
        if self.active_job.is_some() || self.job_state != JobState::AwaitingUpload {
            return None;
        }
        let candidate = self.candidate.as_ref()?;
        self.last_job_id += 1;
        let job_id = self.last_job_id;
        let effect = Effect::StartCompression {
            job_id,
            source: candidate.source.clone(),
            file_name: candidate.name.clone(),
            target_mb: self.target.megabytes(),
        };

        self.active_job = Some(job_id);
        self.job_state = JobState::InProgress;
        self.result = None;
        self.error_message = None;
        self.intake_notice = None;
        self.estimator.start();
        self.mark_dirty();
        Some(effect)
    }

    pub(crate) fn advance_progress(&mut self, roll: f64) {
        if self.job_state != JobState::InProgress {
            return;
        }
        let before = self.estimator.percent();
        let phase_changed = self.estimator.advance(roll).is_some();
        if phase_changed || self.estimator.percent() != before {
            self.mark_dirty();
        }
    }

    /// Terminal transition for the active job. The estimate reaches 100 first.
    pub(crate) fn finish_job(&mut self, result: Result<OutcomeRecord, JobFailure>) {
        self.estimator.complete();
        self.active_job = None;
        match result {
            Ok(record) => {
                self.job_state = match record.kind {
                    OutcomeKind::Success => JobState::Succeeded,
                    OutcomeKind::PartialSuccess => JobState::PartiallySucceeded,
                    OutcomeKind::AlreadyUnderTarget => JobState::AlreadyUnderTarget,
                };
                let view = present_success(&record, self.target);
                self.download = Some(view.download.clone());
                self.result = Some(view);
            }
            Err(failure) => {
                self.job_state = JobState::Failed;
                self.error_message = Some(failure.message());
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn begin_download(&mut self) -> Option<DownloadRef> {
        if !self.job_state.has_output() || self.download_in_flight {
            return None;
        }
        let reference = self.download.clone()?;
        self.download_in_flight = true;
        self.download_status = Some(format!("Downloading {}...", reference.filename));
        self.mark_dirty();
        Some(reference)
    }

    pub(crate) fn finish_download(&mut self, result: Result<PathBuf, String>) {
        if !self.download_in_flight {
            return;
        }
        self.download_in_flight = false;
        self.download_status = Some(match result {
            Ok(path) => format!("Saved to {}", path.display()),
            Err(message) => format!("Download failed: {message}"),
        });
        self.mark_dirty();
    }

    /// Back to the initial state. Job ids keep counting so stale replies stay stale.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            last_job_id: self.last_job_id,
            dirty: true,
            ..Self::default()
        };
    }
}
