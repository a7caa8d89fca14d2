//! Reply progress notification port
//!
//! Lets the presentation layer show a typing indicator while a reply is
//! being generated.

/// Callback for progress updates while waiting on the model
pub trait ReplyProgressNotifier: Send + Sync {
    /// Called after the user message and placeholder are stored, before the
    /// provider is contacted.
    fn on_reply_start(&self, session_title: &str);

    /// Called once the reply (or fallback text) is available.
    fn on_reply_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ReplyProgressNotifier for NoProgress {
    fn on_reply_start(&self, _session_title: &str) {}
    fn on_reply_complete(&self) {}
}
