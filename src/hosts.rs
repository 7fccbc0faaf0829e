//! Terminal implementations of the controller's collaborator traits.

use async_trait::async_trait;
use streams_client::Client;
use streams_core::delete_gate::DeleteGate;
use streams_core::host::{
    Alert, AlertHost, AlertSeverity, AuthProvider, DialogHost, DialogOutcome, DrawerHost,
    DrawerTab,
};
use streams_models::{CreateInstanceRequest, Instance};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::format;

/// Answers dialogs from command-line arguments, prompting on stdin only for
/// delete confirmation.
pub struct TerminalDialogs {
    client: Client,
    create: Option<CreateInstanceRequest>,
    new_owner: Option<String>,
    assume_yes: bool,
}

impl TerminalDialogs {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            create: None,
            new_owner: None,
            assume_yes: false,
        }
    }

    pub fn with_create(mut self, request: CreateInstanceRequest) -> Self {
        self.create = Some(request);
        self
    }

    pub fn with_new_owner(mut self, owner: String) -> Self {
        self.new_owner = Some(owner);
        self
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}

async fn prompt(message: &str) -> Option<String> {
    println!("{}", message);
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    match stdin.read_line(&mut line).await {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

#[async_trait]
impl DialogHost for TerminalDialogs {
    async fn create_instance(&self) -> DialogOutcome {
        let Some(request) = &self.create else {
            return DialogOutcome::Dismissed;
        };

        match self.client.create_instance(request).await {
            Ok(instance) => {
                println!(
                    "✓ Instance '{}' is being created ({})",
                    instance.name,
                    instance.id.as_deref().unwrap_or("pending id")
                );
                DialogOutcome::Completed
            }
            Err(e) => {
                tracing::error!("Failed to create instance '{}': {}", request.name, e);
                eprintln!("✗ Could not create instance '{}': {}", request.name, e);
                DialogOutcome::Dismissed
            }
        }
    }

    async fn confirm_delete(&self, instance: &Instance) -> DialogOutcome {
        let mut gate = DeleteGate::open(instance);

        if self.assume_yes {
            gate.input(instance.name.as_str());
        } else if gate.requires_name() {
            let message = format!(
                "Instance '{}' will be deleted permanently. Type its name to confirm:",
                gate.instance_name()
            );
            match prompt(&message).await {
                Some(typed) => gate.input(&typed),
                None => gate.cancel(),
            }
        } else {
            let message = format!("Delete instance '{}'? [y/N]", gate.instance_name());
            let answer = prompt(&message).await.unwrap_or_default();
            if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
                gate.cancel();
            }
        }

        match gate.confirm() {
            Ok(()) => DialogOutcome::Completed,
            Err(e) => {
                tracing::debug!("Delete not confirmed: {}", e);
                if gate.is_open() {
                    eprintln!("✗ {}", e);
                }
                DialogOutcome::Dismissed
            }
        }
    }

    fn close_delete(&self) {
        tracing::debug!("Delete dialog closed");
    }

    async fn transfer_ownership(&self, instance: &Instance) -> DialogOutcome {
        let (Some(owner), Some(id)) = (&self.new_owner, instance.id.as_deref()) else {
            return DialogOutcome::Dismissed;
        };

        match self.client.change_owner(id, owner).await {
            Ok(_) => {
                println!("✓ Ownership of '{}' transferred to {}", instance.name, owner);
                DialogOutcome::Completed
            }
            Err(e) => {
                tracing::error!("Failed to change owner of '{}': {}", instance.name, e);
                eprintln!("✗ Could not transfer '{}': {}", instance.name, e);
                DialogOutcome::Dismissed
            }
        }
    }
}

pub struct ConsoleAlerts;

impl AlertHost for ConsoleAlerts {
    fn add_alert(&self, alert: Alert) {
        if alert.severity == AlertSeverity::Danger {
            tracing::debug!("Alert raised: {}", alert.title);
        }
        format::print_alert(&alert);
    }
}

/// Prints the details or connection panel when an instance is selected.
pub struct ConsoleDrawer;

impl DrawerHost for ConsoleDrawer {
    fn open(&self, instance: &Instance, tab: DrawerTab) {
        match tab {
            DrawerTab::Details => format::print_instance_details(instance),
            DrawerTab::Connection => format::print_connection(instance),
        }
    }

    fn close(&self) {
        println!("(selected instance is no longer listed)");
    }
}

/// User identity taken from flags and the config file.
pub struct ConfigAuth {
    pub username: Option<String>,
    pub org_admin: bool,
}

#[async_trait]
impl AuthProvider for ConfigAuth {
    async fn username(&self) -> Option<String> {
        self.username.clone()
    }

    async fn is_org_admin(&self) -> bool {
        self.org_admin
    }
}
