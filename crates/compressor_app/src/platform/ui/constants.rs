use compressor_core::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    UploadCard,
    FileInfo,
    FileName,
    FileSize,
    IntakeNotice,
    TargetOptions,
    TargetFive,
    TargetTen,
    TargetHint,
    CompressButton,
    ProgressCard,
    ProgressBar,
    ProgressStatus,
    ResultCard,
    ResultTitle,
    ResultFilename,
    OriginalSize,
    CompressedSize,
    Ratio,
    PartialBanner,
    DownloadButton,
    DownloadStatus,
    ErrorCard,
    ErrorMessage,
}

pub const CARDS: [ElementId; 4] = [
    ElementId::UploadCard,
    ElementId::ProgressCard,
    ElementId::ResultCard,
    ElementId::ErrorCard,
];

pub const CLASS_SELECTED: &str = "selected";
pub const CLASS_NONE: &str = "";
pub const CLASS_SUCCESS: &str = "success";
pub const CLASS_PARTIAL: &str = "partial";
pub const CLASS_UNDER_TARGET: &str = "under-target";

pub fn card_for(surface: Surface) -> ElementId {
    match surface {
        Surface::Upload => ElementId::UploadCard,
        Surface::Progress => ElementId::ProgressCard,
        Surface::Result => ElementId::ResultCard,
        Surface::Error => ElementId::ErrorCard,
    }
}
