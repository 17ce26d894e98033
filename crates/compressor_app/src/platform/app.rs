use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::Context;
use compressor_core::{update, AppState, JobState, Msg, Target};
use compressor_engine::EngineHandle;
use engine_logging::{clear_job_context, engine_debug, engine_error, engine_warn, set_job_context};

use super::cli::Cli;
use super::config::ClientConfig;
use super::effects::EffectRunner;
use super::ui::render::render;
use super::ui::surface::PresentationSurface;
use super::ui::terminal::TerminalSurface;

/// Owns the state and is the only caller of `update`.
struct Controller<S> {
    state: AppState,
    runner: EffectRunner,
    surface: S,
}

impl<S: PresentationSurface> Controller<S> {
    fn new(runner: EffectRunner, surface: S) -> Self {
        let mut controller = Self {
            state: AppState::new(),
            runner,
            surface,
        };
        controller.surface.apply(render(&controller.state.view()));
        controller
    }

    fn dispatch(&mut self, msg: Msg) {
        if !matches!(msg, Msg::Tick { .. }) {
            engine_debug!("dispatch {:?}", msg);
        }
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        match state.active_job() {
            Some(job_id) => set_job_context(job_id),
            None => clear_job_context(),
        }
        let dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        self.runner.run(effects);
        if dirty {
            self.surface.apply(render(&view));
        }
    }

    /// Feed the command-line selection through the same messages a user
    /// would trigger. Returns false when no job could be started; the reason
    /// is on the surface by then.
    fn submit(&mut self, target: Option<Target>) -> bool {
        let file = match self.surface.read_selected_file() {
            Ok(file) => file,
            Err(err) => {
                engine_warn!("{}", err);
                self.dispatch(Msg::FileUnreadable {
                    path: err.path,
                    reason: err.source.to_string(),
                });
                return false;
            }
        };
        self.dispatch(Msg::FileChosen {
            name: file.name,
            size_bytes: file.size_bytes,
            source: file.path,
        });
        if let Some(target) = target {
            self.dispatch(Msg::TargetSelected(target));
        }
        self.dispatch(Msg::CompressClicked);
        self.state.job_state() == JobState::InProgress
    }

    /// Pump messages until the job and any requested download are done.
    fn drive(&mut self, msg_rx: &mpsc::Receiver<Msg>, download: bool) -> ExitCode {
        let mut download_requested = false;
        loop {
            let Ok(msg) = msg_rx.recv() else {
                engine_error!("Message channel closed before the job finished");
                return ExitCode::FAILURE;
            };
            self.dispatch(msg);

            let job_state = self.state.job_state();
            if !job_state.is_terminal() {
                continue;
            }
            if download && job_state.has_output() && !download_requested {
                download_requested = true;
                self.dispatch(Msg::DownloadClicked);
            }
            if !self.state.download_in_flight() {
                break;
            }
        }

        if self.state.job_state().has_output() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub fn run_app(cli: &Cli, config: &ClientConfig) -> anyhow::Result<ExitCode> {
    let settings = config.service_settings()?;
    let engine = EngineHandle::new(settings, config.download_dir.clone())
        .context("failed to set up the HTTP client")?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(engine, msg_tx);
    let surface = TerminalSurface::new(cli.file.clone());
    let mut controller = Controller::new(runner, surface);

    if !controller.submit(cli.target.map(Into::into)) {
        engine_error!("No job started for {}", cli.file.display());
        return Ok(ExitCode::FAILURE);
    }
    Ok(controller.drive(&msg_rx, cli.download))
}
