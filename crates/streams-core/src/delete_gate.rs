use streams_models::{Instance, InstanceStatus};

use crate::error::{ConsoleError, Result};

/// Confirmation state for one open delete dialog.
///
/// Ready instances can only be deleted after the user types the instance
/// name back (case-insensitively). Any other status is confirmable at once.
#[derive(Debug, Clone)]
pub struct DeleteGate {
    name: String,
    status: InstanceStatus,
    pending: String,
    open: bool,
}

impl DeleteGate {
    pub fn open(instance: &Instance) -> Self {
        Self {
            name: instance.name.clone(),
            status: instance.status,
            pending: String::new(),
            open: true,
        }
    }

    pub fn instance_name(&self) -> &str {
        &self.name
    }

    pub fn requires_name(&self) -> bool {
        self.status == InstanceStatus::COMPLETED
    }

    pub fn input(&mut self, text: &str) {
        self.pending = text.to_string();
    }

    pub fn pending_text(&self) -> &str {
        &self.pending
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_confirmable(&self) -> bool {
        if !self.open {
            return false;
        }
        !self.requires_name() || self.pending.to_lowercase() == self.name.to_lowercase()
    }

    /// Close the gate with a confirmation. The caller performs the delete.
    pub fn confirm(&mut self) -> Result<()> {
        if !self.open {
            return Err(ConsoleError::GateClosed(self.name.clone()));
        }
        if !self.is_confirmable() {
            return Err(ConsoleError::ConfirmationRequired(self.name.clone()));
        }

        self.open = false;
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.pending.clear();
        self.open = false;
    }
}
