use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use engine_logging::engine_debug;
use indicatif::{ProgressBar, ProgressStyle};

use super::constants::{ElementId, CLASS_SELECTED};
use super::surface::{PresentationSurface, SelectedFile, SelectionError};

const BAR_TEMPLATE: &str = "{bar:40.cyan/blue} {pos:>3}% {msg}";

#[derive(Debug, Clone)]
struct ElementState {
    visible: bool,
    text: String,
    class: String,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            visible: true,
            text: String::new(),
            class: String::new(),
        }
    }
}

/// Presentation surface on stdout.
///
/// The progress card is drawn as a progress bar; every other card prints a
/// block of lines whenever its contents change.
pub struct TerminalSurface {
    elements: HashMap<ElementId, ElementState>,
    selected: PathBuf,
    bar: Option<ProgressBar>,
    last_block: String,
}

impl TerminalSurface {
    pub fn new(selected: PathBuf) -> Self {
        Self {
            elements: HashMap::new(),
            selected,
            bar: None,
            last_block: String::new(),
        }
    }

    fn element(&self, element: ElementId) -> Option<&ElementState> {
        self.elements.get(&element)
    }

    fn is_visible(&self, element: ElementId) -> bool {
        self.element(element).map_or(true, |state| state.visible)
    }

    fn text(&self, element: ElementId) -> &str {
        self.element(element).map_or("", |state| state.text.as_str())
    }

    fn class(&self, element: ElementId) -> &str {
        self.element(element).map_or("", |state| state.class.as_str())
    }

    fn progress_position(&self) -> u64 {
        self.text(ElementId::ProgressBar)
            .trim_end_matches('%')
            .parse()
            .unwrap_or(0)
    }

    fn sync_progress_bar(&mut self) {
        let position = self.progress_position();
        let status = self.text(ElementId::ProgressStatus).to_string();
        let showing = self.is_visible(ElementId::ProgressCard);

        if showing && self.bar.is_none() {
            let bar = ProgressBar::new(100);
            let style = ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            self.bar = Some(bar);
        }
        if let Some(bar) = &self.bar {
            bar.set_position(position);
            bar.set_message(status);
        }
        if !showing {
            if let Some(bar) = self.bar.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn visible_block(&self) -> Option<String> {
        let mut lines = Vec::new();
        if self.is_visible(ElementId::UploadCard) {
            if self.is_visible(ElementId::FileInfo) && !self.text(ElementId::FileName).is_empty() {
                lines.push(format!(
                    "File: {} ({})",
                    self.text(ElementId::FileName),
                    self.text(ElementId::FileSize)
                ));
            }
            if self.is_visible(ElementId::IntakeNotice) {
                lines.push(self.text(ElementId::IntakeNotice).to_string());
            }
            if self.is_visible(ElementId::TargetOptions) {
                let target = if self.class(ElementId::TargetTen) == CLASS_SELECTED {
                    "10 MB"
                } else {
                    "5 MB"
                };
                lines.push(format!(
                    "Target: {} ({})",
                    target,
                    self.text(ElementId::TargetHint)
                ));
            }
        } else if self.is_visible(ElementId::ResultCard) {
            lines.push(self.text(ElementId::ResultTitle).to_string());
            lines.push(format!("  File:       {}", self.text(ElementId::ResultFilename)));
            lines.push(format!("  Original:   {}", self.text(ElementId::OriginalSize)));
            lines.push(format!("  Compressed: {}", self.text(ElementId::CompressedSize)));
            lines.push(format!("  Reduction:  {}", self.text(ElementId::Ratio)));
            if self.is_visible(ElementId::PartialBanner) {
                lines.push(self.text(ElementId::PartialBanner).to_string());
            }
            if self.is_visible(ElementId::DownloadStatus) {
                lines.push(self.text(ElementId::DownloadStatus).to_string());
            }
        } else if self.is_visible(ElementId::ErrorCard) {
            lines.push(format!("Error: {}", self.text(ElementId::ErrorMessage)));
        } else {
            return None;
        }
        Some(lines.join("\n"))
    }
}

impl PresentationSurface for TerminalSurface {
    fn set_visible(&mut self, element: ElementId, visible: bool) {
        self.elements.entry(element).or_default().visible = visible;
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.elements.entry(element).or_default().text = text.to_string();
    }

    fn set_class(&mut self, element: ElementId, class: &str) {
        self.elements.entry(element).or_default().class = class.to_string();
    }

    fn read_selected_file(&self) -> Result<SelectedFile, SelectionError> {
        let path = &self.selected;
        let failed = |source| SelectionError {
            path: path.clone(),
            source,
        };
        let metadata = fs::metadata(path).map_err(failed)?;
        if !metadata.is_file() {
            return Err(failed(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(SelectedFile {
            name,
            size_bytes: metadata.len(),
            path: path.clone(),
        })
    }

    fn flush(&mut self) {
        self.sync_progress_bar();
        if let Some(block) = self.visible_block() {
            if block != self.last_block && !block.is_empty() {
                engine_debug!("Surface update:\n{}", block);
                println!("{block}");
                self.last_block = block;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_selected_file_metadata() {
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .unwrap();
        file.write_all(&[0u8; 1234]).unwrap();
        let surface = TerminalSurface::new(file.path().to_path_buf());

        let selected = surface.read_selected_file().unwrap();
        assert_eq!(selected.size_bytes, 1234);
        assert!(selected.name.ends_with(".pdf"));
        assert_eq!(selected.path, file.path());
    }

    #[test]
    fn missing_file_explains_why() {
        let surface = TerminalSurface::new(PathBuf::from("/nonexistent/none.pdf"));
        let err = surface.read_selected_file().unwrap_err();
        assert_eq!(err.path, PathBuf::from("/nonexistent/none.pdf"));
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().starts_with("Cannot read /nonexistent/none.pdf: "));
    }

    #[test]
    fn directory_is_not_a_selectable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = TerminalSurface::new(dir.path().to_path_buf())
            .read_selected_file()
            .unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn hidden_cards_are_not_printed() {
        let mut surface = TerminalSurface::new(PathBuf::from("a.pdf"));
        surface.set_visible(ElementId::UploadCard, false);
        surface.set_visible(ElementId::ProgressCard, false);
        surface.set_visible(ElementId::ResultCard, false);
        surface.set_visible(ElementId::ErrorCard, true);
        surface.set_text(ElementId::ErrorMessage, "boom");
        assert_eq!(surface.visible_block(), Some("Error: boom".to_string()));
    }

    #[test]
    fn progress_text_drives_bar_position() {
        let mut surface = TerminalSurface::new(PathBuf::from("a.pdf"));
        surface.set_text(ElementId::ProgressBar, "42%");
        assert_eq!(surface.progress_position(), 42);
        surface.set_text(ElementId::ProgressBar, "");
        assert_eq!(surface.progress_position(), 0);
    }
}
