// src/progress.rs
/// Lightweight progress reporting for a run.
/// Frontends implement this to surface status to users; the library only calls it.
pub trait Progress {
    /// Called once the candidate list is known.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one candidate has been handled; `matched` is true when it produced a record.
    fn item_done(&mut self, _designation: &str, _matched: bool) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
