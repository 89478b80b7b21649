// src/progress.rs
/// Lightweight progress reporting for the scrape run.
/// Frontends implement this to surface status to users; diagnostics go to `tracing`.
pub trait Progress {
    /// Called at the start with the number of listing entries to visit.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one listing entry is done (parsed, skipped or failed).
    fn item_done(&mut self, _url: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// `[12/980] https://…` lines on stderr.
#[derive(Default)]
pub struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, url: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {url}", self.done, self.total);
    }
}
