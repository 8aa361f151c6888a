//! One-shot copy of a string to the system clipboard.
//!
//! The clipboard may be missing entirely (SSH sessions, headless CI), so
//! failures surface as [`DistkitError::Clipboard`] rather than panics.

use crate::error::{DistkitError, Result};

pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The OS clipboard, via `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| DistkitError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text)
            .map_err(|e| DistkitError::Clipboard(e.to_string()))
    }
}

/// Copy `value`, then hand it to `callback`. The callback is skipped if the
/// copy fails.
pub fn copy<S, F>(sink: &mut S, value: &str, callback: Option<F>) -> Result<()>
where
    S: ClipboardSink + ?Sized,
    F: FnOnce(&str),
{
    sink.set_text(value)?;
    if let Some(cb) = callback {
        cb(value);
    }
    Ok(())
}
