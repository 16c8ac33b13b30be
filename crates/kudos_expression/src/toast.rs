//! Toast surface contract
//!
//! Toasts are the short text notifications shown next to (not instead of)
//! visual effects. The host supplies the surface; the engine only decides
//! when to call it.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Info,
            duration: Duration::from_millis(4000),
        }
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

#[derive(Debug, Error)]
pub enum ToastError {
    #[error("toast surface is not available")]
    Unavailable,

    #[error("toast rejected: {0}")]
    Rejected(String),
}

pub trait ToastSurface: Send + Sync {
    fn show(&self, toast: &Toast) -> Result<(), ToastError>;
}

/// Writes toasts to the log. Used by headless hosts and the demo CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogToastSurface;

impl ToastSurface for LogToastSurface {
    fn show(&self, toast: &Toast) -> Result<(), ToastError> {
        tracing::info!(
            variant = ?toast.variant,
            "[toast] {}: {}",
            toast.title,
            toast.description
        );
        Ok(())
    }
}
