//! Compressor core: pure job state machine and view-model helpers.
mod effect;
mod estimator;
mod intake;
mod msg;
mod outcome;
mod state;
mod target;
mod update;
mod view_model;

pub use effect::Effect;
pub use estimator::{ProgressEstimator, PHASE_LABELS, RUNNING_CEILING, TICK_INTERVAL};
pub use intake::{format_file_size, submit_file, CandidateFile, IntakeError, MAX_UPLOAD_BYTES};
pub use msg::Msg;
pub use outcome::{
    format_number, present_success, DownloadRef, JobFailure, OutcomeKind, OutcomeRecord,
    ResultView, CONNECTIVITY_MESSAGE,
};
pub use state::{AppState, JobId, JobState, Surface};
pub use target::Target;
pub use update::update;
pub use view_model::{AppViewModel, FileSummary, ProgressView};
