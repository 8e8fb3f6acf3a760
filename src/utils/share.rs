use async_trait::async_trait;
use log::{info, warn};
use url::Url;

pub const APP_URL: &str = "https://cgpacalculator.himavarshithreddy.in";
pub const SHARE_TITLE: &str = "SRM CGPA Calculator";
pub const SHARE_TEXT: &str = "Calculate your CGPA using SRM CGPA Calculator";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Url,
}

impl SharePayload {
    pub fn new(url: Url) -> Self {
        SharePayload {
            title: SHARE_TITLE.to_string(),
            text: SHARE_TEXT.to_string(),
            url,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("share cancelled by the user")]
    Cancelled,
    #[error("share failed: {0}")]
    Failed(String),
}

/// A platform capability able to hand the payload to the user's contacts.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// Cancelled or failed; nothing to tell the user.
    Dismissed,
    Copied,
    ShowLink(Url),
}

impl ShareOutcome {
    /// Short notice to show next to the share control, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            ShareOutcome::Shared | ShareOutcome::Dismissed => None,
            ShareOutcome::Copied => Some("Link copied!".to_string()),
            ShareOutcome::ShowLink(url) => Some(format!("Copy this link: {}", url)),
        }
    }
}

/// Tries the share target first, then the clipboard, and finally just hands the link back.
/// Failures along the way are logged and never reach the user.
///
/// The terminal front end wires no clipboard backend, so without a share
/// target it always ends at [`ShareOutcome::ShowLink`]. Front ends that can
/// write to a clipboard pass one in through [`Clipboard`].
pub async fn share(
    target: Option<&dyn ShareTarget>,
    clipboard: Option<&dyn Clipboard>,
    payload: &SharePayload,
) -> ShareOutcome {
    if let Some(target) = target {
        return match target.share(payload).await {
            Ok(()) => {
                info!("Shared {}", payload.url);
                ShareOutcome::Shared
            }
            Err(ShareError::Cancelled) => ShareOutcome::Dismissed,
            Err(e) => {
                warn!("{}", e);
                ShareOutcome::Dismissed
            }
        };
    }

    if let Some(clipboard) = clipboard {
        return match clipboard.write_text(payload.url.as_str()).await {
            Ok(()) => ShareOutcome::Copied,
            Err(e) => {
                warn!("Clipboard write failed: {:#}", e);
                ShareOutcome::Dismissed
            }
        };
    }

    ShareOutcome::ShowLink(payload.url.clone())
}
