use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use compressor_core::{Msg, TICK_INTERVAL};
use rand::Rng;

/// Background timer feeding `Msg::Tick` to the controller while a job runs.
pub struct ProgressTicker {
    msg_tx: mpsc::Sender<Msg>,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl ProgressTicker {
    pub fn new(msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            msg_tx,
            stop_flag: None,
        }
    }

    pub fn start(&mut self) {
        self.stop();
        let flag = Arc::new(AtomicBool::new(false));
        self.stop_flag = Some(flag.clone());
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            let mut rng = rand::thread_rng();
            loop {
                thread::sleep(TICK_INTERVAL);
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                let roll: f64 = rng.gen();
                if msg_tx.send(Msg::Tick { roll }).is_err() {
                    break;
                }
            }
        });
    }

    /// Idempotent. A tick already in the channel may still arrive; the state
    /// machine ignores ticks outside a running job.
    pub fn stop(&mut self) {
        if let Some(flag) = self.stop_flag.take() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_flag.is_some()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
