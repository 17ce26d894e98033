use std::io;
use std::path::PathBuf;

use super::constants::ElementId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    SetVisible { element: ElementId, visible: bool },
    SetText { element: ElementId, text: String },
    SetClass { element: ElementId, class: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// The selected path exists in name only: it could not be inspected.
#[derive(Debug, thiserror::Error)]
#[error("Cannot read {}: {source}", .path.display())]
pub struct SelectionError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// What the controller needs from whatever displays it.
pub trait PresentationSurface {
    fn set_visible(&mut self, element: ElementId, visible: bool);
    fn set_text(&mut self, element: ElementId, text: &str);
    fn set_class(&mut self, element: ElementId, class: &str);
    fn read_selected_file(&self) -> Result<SelectedFile, SelectionError>;

    /// Called after each batch of commands.
    fn flush(&mut self) {}

    fn apply(&mut self, commands: Vec<SurfaceCommand>) {
        for command in commands {
            match command {
                SurfaceCommand::SetVisible { element, visible } => {
                    self.set_visible(element, visible)
                }
                SurfaceCommand::SetText { element, text } => self.set_text(element, &text),
                SurfaceCommand::SetClass { element, class } => self.set_class(element, class),
            }
        }
        self.flush();
    }
}
