use async_trait::async_trait;
use std::io::Write;
use tracing::{info, instrument};

use crate::models::{OrderSubmission, ServiceError, ServiceResult};

/// External channel that finalizes an order. Delivery itself is not observed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Hand the submission off; `Ok` means the hand-off happened
    async fn submit(&self, submission: &OrderSubmission) -> ServiceResult<()>;
}

/// How a mailto URL is handed to the user's mail client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailtoLauncher {
    /// Run a command with the URL as its only argument, e.g. `xdg-open`
    Command(String),
    /// Write the URL to stdout
    Stdout,
    /// Write the URL to stderr, leaving stdout to machine-readable output
    Stderr,
}

/// Opens a pre-filled mail composer for the order
pub struct MailtoSink {
    launcher: MailtoLauncher,
}

impl MailtoSink {
    pub fn new(launcher: MailtoLauncher) -> Self {
        Self { launcher }
    }

    /// Launch with `opener` when configured, otherwise print the URL.
    ///
    /// With `stdout_reserved` the URL goes to stderr instead.
    pub fn from_opener(opener: Option<&str>, stdout_reserved: bool) -> Self {
        match opener.map(str::trim).filter(|command| !command.is_empty()) {
            Some(command) => Self::new(MailtoLauncher::Command(command.to_string())),
            None if stdout_reserved => Self::new(MailtoLauncher::Stderr),
            None => Self::new(MailtoLauncher::Stdout),
        }
    }

    pub fn launcher(&self) -> &MailtoLauncher {
        &self.launcher
    }

    fn failure(message: impl Into<String>) -> ServiceError {
        ServiceError::Submission {
            sink: "mailto".to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl SubmissionSink for MailtoSink {
    #[instrument(skip(self, submission), fields(to = %submission.to, subject = %submission.subject))]
    async fn submit(&self, submission: &OrderSubmission) -> ServiceResult<()> {
        let url = submission.mailto_url();

        match &self.launcher {
            MailtoLauncher::Command(command) => {
                let status = tokio::process::Command::new(command)
                    .arg(&url)
                    .status()
                    .await
                    .map_err(|e| Self::failure(format!("Failed to run {}: {}", command, e)))?;

                if !status.success() {
                    return Err(Self::failure(format!("{} exited with {}", command, status)));
                }
                info!(command = %command, "Mail composer opened");
            }
            MailtoLauncher::Stdout => {
                writeln!(std::io::stdout(), "{}", url)
                    .map_err(|e| Self::failure(format!("Failed to write URL: {}", e)))?;
                info!("Mailto URL written to stdout");
            }
            MailtoLauncher::Stderr => {
                writeln!(std::io::stderr(), "{}", url)
                    .map_err(|e| Self::failure(format!("Failed to write URL: {}", e)))?;
                info!("Mailto URL written to stderr");
            }
        }

        Ok(())
    }
}
