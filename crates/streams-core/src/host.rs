//! Seams between the controller and the outside world.
//!
//! The controller never talks to HTTP, prompts or the terminal directly. It
//! receives a [`Capabilities`] bundle at construction time and calls these
//! traits, which keeps it testable with in-memory fakes.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use streams_models::{Instance, InstanceList, InstanceSize, InstanceType};

use crate::error::ServiceError;

/// How a list request may use previously cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    /// Always go to the network.
    Bypass,
    /// Accept a cached response younger than the given age.
    MaxAge(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub page: u32,
    pub per_page: u32,
    pub order_by: String,
    pub search: String,
    pub cache: CacheDirective,
}

#[async_trait]
pub trait InstanceApi: Send + Sync {
    async fn list_instances(&self, request: &ListRequest) -> Result<InstanceList, ServiceError>;

    async fn delete_instance(&self, id: &str, async_delete: bool) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait SizeLookup: Send + Sync {
    /// Sizes offered for an instance type in a provider region. Callers use the first entry.
    async fn get_sizes(
        &self,
        instance_type: InstanceType,
        provider: &str,
        region: &str,
    ) -> Result<Vec<InstanceSize>, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Completed,
    Dismissed,
}

#[async_trait]
pub trait DialogHost: Send + Sync {
    async fn create_instance(&self) -> DialogOutcome;

    /// Ask the user to confirm deleting `instance`.
    async fn confirm_delete(&self, instance: &Instance) -> DialogOutcome;

    fn close_delete(&self);

    async fn transfer_ownership(&self, instance: &Instance) -> DialogOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub severity: AlertSeverity,
    pub description: Option<String>,
}

impl Alert {
    pub fn new(title: impl Into<String>, severity: AlertSeverity) -> Self {
        Self {
            title: title.into(),
            severity,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

pub trait AlertHost: Send + Sync {
    fn add_alert(&self, alert: Alert);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerTab {
    Details,
    Connection,
}

pub trait DrawerHost: Send + Sync {
    fn open(&self, instance: &Instance, tab: DrawerTab);

    fn close(&self);
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn username(&self) -> Option<String>;

    async fn is_org_admin(&self) -> bool;
}

/// Who is looking at the list, resolved once at mount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    pub username: Option<String>,
    pub is_org_admin: bool,
}

impl UserContext {
    /// Owners and org admins may change the owner of or delete an instance.
    pub fn can_manage(&self, instance: &Instance) -> bool {
        self.is_org_admin || self.username.as_deref() == Some(instance.owner.as_str())
    }
}

/// Everything the controller needs from its environment.
#[derive(Clone)]
pub struct Capabilities {
    pub api: Arc<dyn InstanceApi>,
    pub sizes: Arc<dyn SizeLookup>,
    pub dialogs: Arc<dyn DialogHost>,
    pub alerts: Arc<dyn AlertHost>,
    pub drawer: Arc<dyn DrawerHost>,
    pub auth: Arc<dyn AuthProvider>,
}
