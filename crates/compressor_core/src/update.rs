use crate::{submit_file, AppState, Effect, IntakeError, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// This is the only writer of the job state. Engine results are matched
/// against the active job id, so a reply that arrives after a reset or a
/// cancellation is dropped here.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileChosen {
            name,
            size_bytes,
            source,
        } => {
            if state.accepts_intake() {
                match submit_file(name, size_bytes, source) {
                    Ok(candidate) => state.accept_candidate(candidate),
                    Err(err) => state.reject_intake(err),
                }
            }
            Vec::new()
        }
        Msg::FileUnreadable { path, reason } => {
            if state.accepts_intake() {
                state.reject_intake(IntakeError::Unreadable {
                    path: path.display().to_string(),
                    reason,
                });
            }
            Vec::new()
        }
        Msg::FileCleared => {
            if state.accepts_intake() {
                state.clear_candidate();
            }
            Vec::new()
        }
        Msg::TargetSelected(target) => {
            if state.accepts_intake() {
                state.select_target(target);
            }
            Vec::new()
        }
        Msg::CompressClicked => match state.begin_job() {
            Some(start) => vec![Effect::StartTicker, start],
            None => Vec::new(),
        },
        Msg::Tick { roll } => {
            state.advance_progress(roll);
            Vec::new()
        }
        Msg::CompressionFinished { job_id, result } => {
            if state.active_job() != Some(job_id) {
                return (state, Vec::new());
            }
            state.finish_job(result);
            vec![Effect::StopTicker]
        }
        Msg::DownloadClicked => match state.begin_download() {
            Some(reference) => vec![Effect::Download { reference }],
            None => Vec::new(),
        },
        Msg::DownloadFinished { result } => {
            state.finish_download(result);
            Vec::new()
        }
        Msg::ResetClicked => {
            // Cancel before reset so the in-flight reply cannot revive the job.
            let effects = match state.active_job() {
                Some(job_id) => vec![Effect::CancelCompression { job_id }, Effect::StopTicker],
                None => Vec::new(),
            };
            state.reset();
            effects
        }
    };

    (state, effects)
}
