//! User-facing outcome messages. The editor sends exactly one per submission on an
//! unbounded channel the container drains.

use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

pub type NoticeSender = mpsc::UnboundedSender<Notice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}

/// Sends `notice`, logging instead of failing when nobody is listening.
pub(crate) fn publish(sender: &NoticeSender, notice: Notice) {
    if let Err(e) = sender.send(notice) {
        warn!(notice = ?e.0, "Notice receiver dropped");
    }
}
