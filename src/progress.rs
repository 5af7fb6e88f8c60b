// src/progress.rs
/// Progress reporting for the row loop.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called once the listing rows are known.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A listing row was extracted and flushed.
    fn item_done(&mut self, _index: usize, _vote_number: &str) {}

    /// A listing row was skipped.
    fn item_failed(&mut self, _index: usize, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
