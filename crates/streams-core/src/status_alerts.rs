use std::collections::HashMap;
use streams_models::{Instance, InstanceStatus};

use crate::host::{Alert, AlertSeverity};

/// Raises alerts when the user's own instances finish provisioning or fail.
#[derive(Debug, Default)]
pub struct StatusAlerts {
    last_seen: HashMap<String, InstanceStatus>,
}

impl StatusAlerts {
    /// Compare the latest page with the previous one. Instances seen for the
    /// first time never alert.
    pub fn observe<'a>(
        &mut self,
        owner: Option<&str>,
        instances: impl IntoIterator<Item = &'a Instance>,
    ) -> Vec<Alert> {
        let Some(owner) = owner else {
            return Vec::new();
        };

        let mut alerts = Vec::new();
        let mut seen = HashMap::new();

        for instance in instances.into_iter().filter(|i| i.owner == owner) {
            let Some(id) = instance.id.as_ref() else {
                continue;
            };

            if let Some(previous) = self.last_seen.get(id) {
                if *previous != instance.status {
                    alerts.extend(Self::alert_for(instance));
                }
            }
            seen.insert(id.clone(), instance.status);
        }

        self.last_seen = seen;
        alerts
    }

    fn alert_for(instance: &Instance) -> Option<Alert> {
        match instance.status {
            InstanceStatus::Ready => Some(
                Alert::new(
                    format!("Instance '{}' is ready", instance.name),
                    AlertSeverity::Success,
                )
                .with_description(Some("The instance can now accept connections.".to_string())),
            ),
            InstanceStatus::Failed => Some(
                Alert::new(
                    format!("Instance '{}' failed to create", instance.name),
                    AlertSeverity::Danger,
                )
                .with_description(Some(
                    "Delete the instance and try creating it again.".to_string(),
                )),
            ),
            _ => None,
        }
    }
}
