use compressor_core::{AppViewModel, OutcomeKind, Target};

use super::constants::*;
use super::surface::SurfaceCommand;

/// Turn the view model into surface commands.
///
/// Card visibility goes last: the progress text reaches its final value
/// before the progress card is hidden, and every other card is hidden before
/// the active one is shown.
pub fn render(view: &AppViewModel) -> Vec<SurfaceCommand> {
    let mut cmds = Vec::new();

    // Intake.
    let (file_name, file_size) = match &view.file {
        Some(file) => (file.name.clone(), file.size_label.clone()),
        None => (String::new(), String::new()),
    };
    cmds.push(set_visible(ElementId::FileInfo, view.file.is_some()));
    cmds.push(set_text(ElementId::FileName, file_name));
    cmds.push(set_text(ElementId::FileSize, file_size));
    cmds.push(set_visible(
        ElementId::IntakeNotice,
        view.intake_notice.is_some(),
    ));
    cmds.push(set_text(
        ElementId::IntakeNotice,
        view.intake_notice.clone().unwrap_or_default(),
    ));
    cmds.push(set_visible(ElementId::TargetOptions, view.controls_visible));
    cmds.push(set_visible(ElementId::CompressButton, view.controls_visible));
    cmds.push(set_class(
        ElementId::TargetFive,
        selected_class(view.target == Target::FiveMb),
    ));
    cmds.push(set_class(
        ElementId::TargetTen,
        selected_class(view.target == Target::TenMb),
    ));
    cmds.push(set_text(ElementId::TargetHint, view.target_hint.to_string()));

    // Progress.
    cmds.push(set_text(
        ElementId::ProgressBar,
        format!("{}%", view.progress.percent.floor() as u32),
    ));
    cmds.push(set_text(
        ElementId::ProgressStatus,
        view.progress.label.to_string(),
    ));

    // Result.
    match &view.result {
        Some(result) => {
            let class = match result.kind {
                OutcomeKind::Success => CLASS_SUCCESS,
                OutcomeKind::PartialSuccess => CLASS_PARTIAL,
                OutcomeKind::AlreadyUnderTarget => CLASS_UNDER_TARGET,
            };
            cmds.push(set_text(ElementId::ResultTitle, result.title.clone()));
            cmds.push(set_class(ElementId::ResultTitle, class));
            cmds.push(set_text(ElementId::ResultFilename, result.filename.clone()));
            cmds.push(set_text(
                ElementId::OriginalSize,
                result.original_size.clone(),
            ));
            cmds.push(set_text(
                ElementId::CompressedSize,
                result.compressed_size.clone(),
            ));
            cmds.push(set_text(ElementId::Ratio, result.ratio.clone()));
            cmds.push(set_visible(ElementId::PartialBanner, result.banner.is_some()));
            cmds.push(set_text(
                ElementId::PartialBanner,
                result.banner.clone().unwrap_or_default(),
            ));
            cmds.push(set_visible(ElementId::DownloadButton, true));
        }
        None => {
            cmds.push(set_visible(ElementId::PartialBanner, false));
            cmds.push(set_visible(ElementId::DownloadButton, false));
        }
    }
    cmds.push(set_visible(
        ElementId::DownloadStatus,
        view.download_status.is_some(),
    ));
    cmds.push(set_text(
        ElementId::DownloadStatus,
        view.download_status.clone().unwrap_or_default(),
    ));

    // Error.
    cmds.push(set_text(
        ElementId::ErrorMessage,
        view.error.clone().unwrap_or_default(),
    ));

    let active = card_for(view.surface);
    for card in CARDS.into_iter().filter(|card| *card != active) {
        cmds.push(set_visible(card, false));
    }
    cmds.push(set_visible(active, true));

    cmds
}

fn set_visible(element: ElementId, visible: bool) -> SurfaceCommand {
    SurfaceCommand::SetVisible { element, visible }
}

fn set_text(element: ElementId, text: String) -> SurfaceCommand {
    SurfaceCommand::SetText { element, text }
}

fn set_class(element: ElementId, class: &'static str) -> SurfaceCommand {
    SurfaceCommand::SetClass { element, class }
}

fn selected_class(selected: bool) -> &'static str {
    if selected {
        CLASS_SELECTED
    } else {
        CLASS_NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compressor_core::{update, AppState, JobFailure, Msg, OutcomeRecord};
    use std::path::PathBuf;

    fn visible_cards(cmds: &[SurfaceCommand]) -> Vec<ElementId> {
        cmds.iter()
            .filter_map(|cmd| match cmd {
                SurfaceCommand::SetVisible {
                    element,
                    visible: true,
                } if CARDS.contains(element) => Some(*element),
                _ => None,
            })
            .collect()
    }

    fn position(cmds: &[SurfaceCommand], wanted: &SurfaceCommand) -> usize {
        cmds.iter()
            .position(|cmd| cmd == wanted)
            .unwrap_or_else(|| panic!("missing {wanted:?}"))
    }

    fn running() -> (AppState, u64) {
        let (state, _) = update(
            AppState::new(),
            Msg::FileChosen {
                name: "a.pdf".to_string(),
                size_bytes: 2048,
                source: PathBuf::from("a.pdf"),
            },
        );
        let (state, _) = update(state, Msg::CompressClicked);
        let job_id = state.active_job().unwrap();
        (state, job_id)
    }

    #[test]
    fn idle_view_shows_only_upload_card() {
        let cmds = render(&AppState::new().view());
        assert_eq!(visible_cards(&cmds), vec![ElementId::UploadCard]);
        assert_eq!(cmds.last(), Some(&set_visible(ElementId::UploadCard, true)));
        assert!(cmds.contains(&set_visible(ElementId::TargetOptions, false)));
    }

    #[test]
    fn intake_shows_file_and_selected_target() {
        let (state, _) = update(
            AppState::new(),
            Msg::FileChosen {
                name: "a.pdf".to_string(),
                size_bytes: 2048,
                source: PathBuf::from("a.pdf"),
            },
        );
        let cmds = render(&state.view());
        assert!(cmds.contains(&set_text(ElementId::FileName, "a.pdf".to_string())));
        assert!(cmds.contains(&set_text(ElementId::FileSize, "2.0 KB".to_string())));
        assert!(cmds.contains(&set_visible(ElementId::CompressButton, true)));
        assert!(cmds.contains(&set_class(ElementId::TargetFive, CLASS_SELECTED)));
        assert!(cmds.contains(&set_class(ElementId::TargetTen, CLASS_NONE)));
    }

    #[test]
    fn running_view_shows_progress_only() {
        let (state, _) = running();
        let cmds = render(&state.view());
        assert_eq!(visible_cards(&cmds), vec![ElementId::ProgressCard]);
        assert!(cmds.contains(&set_text(ElementId::ProgressBar, "0%".to_string())));
    }

    #[test]
    fn finished_job_reaches_full_progress_before_result_appears() {
        let (state, job_id) = running();
        let (state, _) = update(
            state,
            Msg::CompressionFinished {
                job_id,
                result: Ok(OutcomeRecord {
                    filename: "a.pdf".to_string(),
                    original_mb: 3.0,
                    compressed_mb: 1.2,
                    ratio_percent: 60.0,
                    download_id: "x1".to_string(),
                    target_mb: Some(5),
                    kind: OutcomeKind::Success,
                }),
            },
        );
        let cmds = render(&state.view());

        let full = position(&cmds, &set_text(ElementId::ProgressBar, "100%".to_string()));
        let hide_progress = position(&cmds, &set_visible(ElementId::ProgressCard, false));
        let show_result = position(&cmds, &set_visible(ElementId::ResultCard, true));
        assert!(full < hide_progress);
        assert!(hide_progress < show_result);
        assert_eq!(visible_cards(&cmds), vec![ElementId::ResultCard]);
        assert!(cmds.contains(&set_text(ElementId::Ratio, "60%".to_string())));
        assert!(cmds.contains(&set_visible(ElementId::PartialBanner, false)));
    }

    #[test]
    fn failed_job_shows_error_only() {
        let (state, job_id) = running();
        let (state, _) = update(
            state,
            Msg::CompressionFinished {
                job_id,
                result: Err(JobFailure::Connectivity),
            },
        );
        let cmds = render(&state.view());
        assert_eq!(visible_cards(&cmds), vec![ElementId::ErrorCard]);
        assert!(cmds.contains(&set_visible(ElementId::ResultCard, false)));
        assert!(cmds.contains(&set_visible(ElementId::ProgressCard, false)));
    }
}
