use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use compressor_core::{
    update, AppState, Effect, JobFailure, JobId, JobState, Msg, OutcomeKind, OutcomeRecord,
    Surface, Target, RUNNING_CEILING,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn timed_out() -> JobFailure {
    JobFailure::Timeout {
        after: Duration::from_secs(600),
    }
}

fn started_job(target: Target) -> (AppState, JobId) {
    let (state, _) = update(
        AppState::new(),
        Msg::FileChosen {
            name: "a.pdf".to_string(),
            size_bytes: 3 * 1024 * 1024,
            source: PathBuf::from("/tmp/a.pdf"),
        },
    );
    let (state, _) = update(state, Msg::TargetSelected(target));
    let (state, effects) = update(state, Msg::CompressClicked);
    let job_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartCompression { job_id, .. } => Some(*job_id),
            _ => None,
        })
        .expect("start effect");
    (state, job_id)
}

fn record(kind: OutcomeKind) -> OutcomeRecord {
    OutcomeRecord {
        filename: "a.pdf".to_string(),
        original_mb: 3.0,
        compressed_mb: 1.2,
        ratio_percent: 60.0,
        download_id: "x1".to_string(),
        target_mb: Some(5),
        kind,
    }
}

fn finish(
    state: AppState,
    job_id: JobId,
    result: Result<OutcomeRecord, JobFailure>,
) -> (AppState, Vec<Effect>) {
    update(state, Msg::CompressionFinished { job_id, result })
}

#[test]
fn compress_starts_ticker_and_request() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FileChosen {
            name: "a.pdf".to_string(),
            size_bytes: 42,
            source: PathBuf::from("/tmp/a.pdf"),
        },
    );
    let (state, _) = update(state, Msg::TargetSelected(Target::TenMb));
    let (state, effects) = update(state, Msg::CompressClicked);

    assert_eq!(
        effects,
        vec![
            Effect::StartTicker,
            Effect::StartCompression {
                job_id: 1,
                source: PathBuf::from("/tmp/a.pdf"),
                file_name: "a.pdf".to_string(),
                target_mb: 10,
            },
        ]
    );
    let view = state.view();
    assert_eq!(view.job_state, JobState::InProgress);
    assert_eq!(view.surface, Surface::Progress);
    assert_eq!(view.progress.percent, 0.0);
    assert!(view.result.is_none());
    assert!(view.error.is_none());
}

#[test]
fn second_compress_click_is_a_noop() {
    init_logging();
    let (state, _) = started_job(Target::FiveMb);
    let before = state.clone();
    let (state, effects) = update(state, Msg::CompressClicked);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn progress_is_monotonic_and_capped_until_completion() {
    init_logging();
    let (mut state, job_id) = started_job(Target::FiveMb);
    let mut previous = 0.0;
    for tick in 0..2_000 {
        let roll = ((tick * 31) % 100) as f64 / 100.0;
        state = update(state, Msg::Tick { roll }).0;
        let percent = state.progress_percent();
        assert!(percent >= previous);
        assert!(percent <= RUNNING_CEILING);
        previous = percent;
    }

    let (state, effects) = finish(state, job_id, Ok(record(OutcomeKind::Success)));
    assert_eq!(effects, vec![Effect::StopTicker]);
    assert_eq!(state.view().progress.percent, 100.0);
}

#[test]
fn ticks_outside_a_job_change_nothing() {
    init_logging();
    let (state, job_id) = started_job(Target::FiveMb);
    let (mut state, _) = finish(state, job_id, Ok(record(OutcomeKind::Success)));
    assert!(state.consume_dirty());

    let (mut next, effects) = update(state.clone(), Msg::Tick { roll: 0.9 });
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(next, state);
}

#[test]
fn scenario_success_shows_complete_title() {
    init_logging();
    let (state, job_id) = started_job(Target::FiveMb);
    let (state, _) = finish(state, job_id, Ok(record(OutcomeKind::Success)));
    let view = state.view();

    assert_eq!(view.job_state, JobState::Succeeded);
    assert_eq!(view.surface, Surface::Result);
    let result = view.result.expect("result view");
    assert_eq!(result.title, "Compression Complete!");
    assert_eq!(result.ratio, "60%");
    assert_eq!(result.original_size, "3 MB");
    assert_eq!(result.compressed_size, "1.2 MB");
    assert_eq!(result.banner, None);
    assert_eq!(result.download.relative_url(), "download/x1?filename=a.pdf");
}

#[test]
fn scenario_already_under_target_forces_zero_ratio() {
    init_logging();
    let (state, job_id) = started_job(Target::TenMb);
    let mut under = record(OutcomeKind::AlreadyUnderTarget);
    under.ratio_percent = 12.0;
    under.target_mb = None;
    let (state, _) = finish(state, job_id, Ok(under));
    let view = state.view();

    assert_eq!(view.job_state, JobState::AlreadyUnderTarget);
    let result = view.result.expect("result view");
    assert_eq!(result.title, "Already Under Target!");
    assert_eq!(result.ratio, "0%");
    assert_eq!(result.banner, None);
}

#[test]
fn scenario_partial_success_banner() {
    init_logging();
    let (state, job_id) = started_job(Target::FiveMb);
    let partial = OutcomeRecord {
        compressed_mb: 6.4,
        ratio_percent: 30.0,
        ..record(OutcomeKind::PartialSuccess)
    };
    let (state, _) = finish(state, job_id, Ok(partial));
    let view = state.view();

    assert_eq!(view.job_state, JobState::PartiallySucceeded);
    let result = view.result.expect("result view");
    assert_eq!(result.title, "Best Compression Achieved");
    let banner = result.banner.expect("banner");
    assert!(banner.contains("5MB target"));
    assert!(banner.contains("6.4MB"));
    assert!(banner.contains("30% reduction"));
}

#[test]
fn scenario_timeout_suggests_larger_target() {
    init_logging();
    let (state, job_id) = started_job(Target::FiveMb);
    let (state, effects) = finish(state, job_id, Err(timed_out()));
    let view = state.view();

    assert_eq!(effects, vec![Effect::StopTicker]);
    assert_eq!(view.job_state, JobState::Failed);
    assert_eq!(view.surface, Surface::Error);
    assert!(view.result.is_none());
    let message = view.error.expect("error message");
    assert!(message.contains("timed out after 10 minutes"));
    assert!(message.contains("10MB"));
    assert_eq!(view.progress.percent, 100.0);
}

#[test]
fn service_error_is_shown_verbatim() {
    init_logging();
    let (state, job_id) = started_job(Target::FiveMb);
    let (state, _) = finish(
        state,
        job_id,
        Err(JobFailure::Service("Compression failed: bad xref".to_string())),
    );
    assert_eq!(
        state.view().error.as_deref(),
        Some("Compression failed: bad xref")
    );
}

#[test]
fn only_the_first_terminal_event_counts() {
    init_logging();
    let (state, job_id) = started_job(Target::FiveMb);
    let (state, _) = finish(state, job_id, Err(timed_out()));
    let before = state.clone();

    let (state, effects) = finish(state, job_id, Ok(record(OutcomeKind::Success)));
    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.job_state(), JobState::Failed);
}

#[test]
fn download_is_offered_only_after_success() {
    init_logging();
    let (state, job_id) = started_job(Target::FiveMb);
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert!(effects.is_empty());

    let (state, _) = finish(state, job_id, Ok(record(OutcomeKind::Success)));
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(effects.len(), 1);
    assert!(state.download_in_flight());

    // A second click while the first download runs is ignored.
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::DownloadFinished {
            result: Ok(PathBuf::from("out/a.pdf")),
        },
    );
    assert!(!state.download_in_flight());
    assert_eq!(state.job_state(), JobState::Succeeded);
    let status = state.view().download_status.expect("status");
    assert!(status.starts_with("Saved to"));
}

#[test]
fn failed_job_has_nothing_to_download() {
    init_logging();
    let (state, job_id) = started_job(Target::FiveMb);
    let (state, _) = finish(state, job_id, Err(JobFailure::Connectivity));
    let (_, effects) = update(state, Msg::DownloadClicked);
    assert!(effects.is_empty());
}
