use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

const BAR_LENGTH: usize = 20;

/// Progress reporter for the creator commands
pub struct ProgressReporter {
    is_interactive: bool,
    /// Print text bars to stdout when no terminal bar is drawn
    print_lines: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        ProgressReporter {
            is_interactive: atty::is(atty::Stream::Stdout),
            print_lines: true,
        }
    }

    /// A reporter that never draws bars, only logs
    pub fn hidden() -> Self {
        ProgressReporter {
            is_interactive: false,
            print_lines: false,
        }
    }

    /// Check if we're in an interactive terminal
    pub fn is_interactive(&self) -> bool {
        self.is_interactive
    }

    /// Start tracking a batch of `total` creations
    pub fn start(&self, label: &str, total: usize) -> TaskProgress {
        let bar = if self.is_interactive {
            let pb =
                ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stdout());
            let template = ProgressStyle::default_bar().template("{msg}: [{bar:20}] {percent}%");
            if let Ok(style) = template {
                pb.set_style(style.progress_chars("-> "));
            }
            pb.set_message(label.to_string());
            Some(pb)
        } else {
            None
        };

        let progress = TaskProgress {
            label: label.to_string(),
            done: 0,
            total,
            bar,
            print_lines: self.print_lines,
        };
        progress.report();
        progress
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress of one batch
pub struct TaskProgress {
    label: String,
    done: usize,
    total: usize,
    bar: Option<ProgressBar>,
    print_lines: bool,
}

impl TaskProgress {
    pub fn inc(&mut self) {
        self.done += 1;
        match &self.bar {
            Some(pb) => pb.inc(1),
            None => self.report(),
        }
    }

    pub fn finish(self) {
        if let Some(pb) = self.bar {
            pb.finish();
        }
    }

    pub fn done(&self) -> usize {
        self.done
    }

    /// Current progress as a text bar
    pub fn status_line(&self) -> String {
        render_progress(&self.label, self.done, self.total, BAR_LENGTH)
    }

    fn report(&self) {
        if self.bar.is_some() {
            return;
        }
        if self.print_lines {
            println!("{}", self.status_line());
        } else {
            info!("{}", self.status_line());
        }
    }
}

/// Text progress bar such as `Progress: [---->     ] 50%`
pub fn render_progress(text: &str, value: usize, end: usize, bar_length: usize) -> String {
    let percent = if end == 0 { 100 } else { (value * 100 + end / 2) / end };
    let filled = if end == 0 {
        bar_length
    } else {
        ((value * bar_length + end / 2) / end).min(bar_length)
    };

    let arrow = if filled == 0 {
        String::new()
    } else {
        format!("{}>", "-".repeat(filled - 1))
    };

    format!(
        "{}: [{}{}] {}%",
        text,
        arrow,
        " ".repeat(bar_length - filled),
        percent
    )
}
