//! The "send to agent" command box and its transient "copied" state.

use std::time::Duration;

use anyhow::Result;
use tokio::time::Instant;

/// How long the box shows `COPIED!` after a click.
pub const COPY_CONFIRMATION: Duration = Duration::from_secs(2);

pub trait Clipboard: Send + Sync {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Keeps the last copied text. The HTTP surface returns it so the browser
/// side can put it on the user's clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

pub fn onboarding_command(origin: &str) -> String {
    format!("curl -s {}/skill.md", origin.trim_end_matches('/'))
}

pub struct CopyControl<K> {
    clipboard: K,
    command: String,
    confirmed_until: Option<Instant>,
}

impl<K: Clipboard> CopyControl<K> {
    pub fn new(origin: &str, clipboard: K) -> Self {
        Self {
            clipboard,
            command: onboarding_command(origin),
            confirmed_until: None,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn clipboard(&self) -> &K {
        &self.clipboard
    }

    /// Copies the command and (re)starts the confirmation window.
    pub fn trigger(&mut self) -> Result<()> {
        self.clipboard.write_text(&self.command)?;
        self.confirmed_until = Some(Instant::now() + COPY_CONFIRMATION);
        Ok(())
    }

    pub fn is_copied(&self) -> bool {
        self.confirmed_until
            .is_some_and(|deadline| Instant::now() < deadline)
    }

    pub fn hint(&self) -> &'static str {
        if self.is_copied() {
            "COPIED!"
        } else {
            "CLICK_TO_COPY"
        }
    }
}
