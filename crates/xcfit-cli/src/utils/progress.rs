use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;
use xcfit::engine::progress::{Progress, ProgressCallback};

const SPINNER_TICK_MS: u64 = 80;

/// Renders core [`Progress`] events as an `indicatif` spinner per phase and a bar over reactions.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(Self::spinner_style());
        pb.finish_and_clear();
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(name);
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    pb.finish_with_message("✓ Done");
                }
                Progress::EvaluationStart { total_reactions } => {
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(total_reactions);
                    pb.set_position(0);
                    pb.set_style(Self::bar_style());
                    pb.set_message("Reactions");
                }
                Progress::BatchFinish { reactions } => pb.inc(reactions),
                Progress::EvaluationFinish => {
                    let total = pb.length().unwrap_or(0);
                    if pb.position() < total {
                        pb.set_position(total);
                    }
                    pb.finish();
                }
                Progress::Message(msg) => {
                    if pb.is_finished() {
                        pb.set_message(msg);
                    } else {
                        pb.println(format!("  {msg}"));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            })
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = hidden_handler();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn batches_advance_the_bar_by_their_reaction_count() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Evaluation" });
        assert_eq!(handler.pb.lock().unwrap().message(), "Evaluation");

        callback(Progress::EvaluationStart { total_reactions: 10 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(10));
            assert_eq!(pb.position(), 0);
        }

        callback(Progress::BatchFinish { reactions: 4 });
        callback(Progress::BatchFinish { reactions: 4 });
        assert_eq!(handler.pb.lock().unwrap().position(), 8);

        callback(Progress::BatchFinish { reactions: 1 });
        callback(Progress::EvaluationFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.position(), 10);
        }

        callback(Progress::PhaseFinish);
        assert_eq!(handler.pb.lock().unwrap().message(), "✓ Done");
    }

    #[test]
    fn messages_replace_the_text_of_a_finished_bar() {
        let handler = hidden_handler();
        let callback = handler.get_callback();
        callback(Progress::Message("No labelled reactions: MAE is not available.".to_string()));
        assert_eq!(
            handler.pb.lock().unwrap().message(),
            "No labelled reactions: MAE is not available."
        );
    }

    #[test]
    fn callback_is_usable_from_another_thread() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Preparation" });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Done");
    }
}
