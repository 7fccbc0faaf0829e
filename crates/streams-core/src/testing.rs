//! In-memory fakes for the collaborator traits.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use streams_models::{Instance, InstanceList, InstanceSize, InstanceStatus, InstanceType};

use crate::error::{ServiceError, UNAUTHORIZED_USER_CODE};
use crate::host::{
    Alert, AlertHost, AuthProvider, Capabilities, DialogHost, DialogOutcome, DrawerHost,
    DrawerTab, InstanceApi, ListRequest, SizeLookup,
};

pub fn instance(id: &str, name: &str, status: InstanceStatus, owner: &str) -> Instance {
    let created = Utc.with_ymd_and_hms(2022, 1, 31, 10, 0, 0).unwrap();
    Instance {
        id: Some(id.to_string()),
        name: name.to_string(),
        status,
        owner: owner.to_string(),
        cloud_provider: Some("aws".to_string()),
        region: Some("us-east-1".to_string()),
        instance_type: Some(InstanceType::Standard),
        bootstrap_server_host: None,
        created_at: created,
        updated_at: created,
    }
}

pub fn developer(id: &str, provider: &str, region: &str) -> Instance {
    Instance {
        instance_type: Some(InstanceType::Developer),
        cloud_provider: Some(provider.to_string()),
        region: Some(region.to_string()),
        ..instance(id, id, InstanceStatus::Ready, "alice")
    }
}

pub fn unauthorized() -> ServiceError {
    ServiceError::Server {
        status: 403,
        code: Some(UNAUTHORIZED_USER_CODE.to_string()),
        reason: Some("User is not authorized to access the service".to_string()),
    }
}

pub fn server_error(reason: &str) -> ServiceError {
    ServiceError::Server {
        status: 500,
        code: Some("KAFKAS-MGMT-9".to_string()),
        reason: Some(reason.to_string()),
    }
}

/// Serves a fixed data set, paged by the request, and records every call.
#[derive(Default)]
pub struct FakeApi {
    pub items: Mutex<Vec<Instance>>,
    pub list_error: Mutex<Option<ServiceError>>,
    pub delete_error: Mutex<Option<ServiceError>>,
    pub requests: Mutex<Vec<ListRequest>>,
    pub deletes: Mutex<Vec<(String, bool)>>,
    pub delay: Option<Duration>,
}

impl FakeApi {
    pub fn with_items(items: Vec<Instance>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn set_items(&self, items: Vec<Instance>) {
        *self.items.lock().unwrap() = items;
    }

    pub fn fail_list(&self, error: Option<ServiceError>) {
        *self.list_error.lock().unwrap() = error;
    }

    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<(String, bool)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl InstanceApi for FakeApi {
    async fn list_instances(&self, request: &ListRequest) -> Result<InstanceList, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        // snapshot before sleeping so overlapping calls see the data at call time
        let items = self.items.lock().unwrap().clone();
        let error = self.list_error.lock().unwrap().clone();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = error {
            return Err(error);
        }

        let start = ((request.page - 1) * request.per_page) as usize;
        let page: Vec<Instance> = items
            .iter()
            .skip(start)
            .take(request.per_page as usize)
            .cloned()
            .collect();

        Ok(InstanceList {
            page: request.page,
            size: page.len() as u32,
            total: items.len() as u32,
            items: page,
        })
    }

    async fn delete_instance(&self, id: &str, async_delete: bool) -> Result<(), ServiceError> {
        self.deletes
            .lock()
            .unwrap()
            .push((id.to_string(), async_delete));
        match self.delete_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

type SizeKey = (String, String);

#[derive(Default)]
pub struct FakeSizes {
    pub sizes: Mutex<HashMap<SizeKey, Result<Vec<InstanceSize>, ServiceError>>>,
    pub calls: Mutex<Vec<(InstanceType, String, String)>>,
}

impl FakeSizes {
    pub fn with(
        provider: &str,
        region: &str,
        result: Result<Vec<InstanceSize>, ServiceError>,
    ) -> Self {
        let fake = Self::default();
        fake.set(provider, region, result);
        fake
    }

    pub fn set(
        &self,
        provider: &str,
        region: &str,
        result: Result<Vec<InstanceSize>, ServiceError>,
    ) {
        self.sizes
            .lock()
            .unwrap()
            .insert((provider.to_string(), region.to_string()), result);
    }

    pub fn calls(&self) -> Vec<(InstanceType, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SizeLookup for FakeSizes {
    async fn get_sizes(
        &self,
        instance_type: InstanceType,
        provider: &str,
        region: &str,
    ) -> Result<Vec<InstanceSize>, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push((instance_type, provider.to_string(), region.to_string()));
        self.sizes
            .lock()
            .unwrap()
            .get(&(provider.to_string(), region.to_string()))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub struct RecordingDialogs {
    pub create: DialogOutcome,
    pub delete: DialogOutcome,
    pub transfer: DialogOutcome,
    pub events: Mutex<Vec<String>>,
}

impl Default for RecordingDialogs {
    fn default() -> Self {
        Self {
            create: DialogOutcome::Completed,
            delete: DialogOutcome::Completed,
            transfer: DialogOutcome::Completed,
            events: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingDialogs {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl DialogHost for RecordingDialogs {
    async fn create_instance(&self) -> DialogOutcome {
        self.record("create".to_string());
        self.create
    }

    async fn confirm_delete(&self, instance: &Instance) -> DialogOutcome {
        self.record(format!("confirm_delete:{}", instance.name));
        self.delete
    }

    fn close_delete(&self) {
        self.record("close_delete".to_string());
    }

    async fn transfer_ownership(&self, instance: &Instance) -> DialogOutcome {
        self.record(format!("transfer:{}", instance.name));
        self.transfer
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    pub alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlerts {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

impl AlertHost for RecordingAlerts {
    fn add_alert(&self, alert: Alert) {
        self.alerts.lock().unwrap().push(alert);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerEvent {
    Open(String, DrawerTab),
    Close,
}

#[derive(Default)]
pub struct RecordingDrawer {
    pub events: Mutex<Vec<DrawerEvent>>,
}

impl RecordingDrawer {
    pub fn events(&self) -> Vec<DrawerEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DrawerHost for RecordingDrawer {
    fn open(&self, instance: &Instance, tab: DrawerTab) {
        self.events
            .lock()
            .unwrap()
            .push(DrawerEvent::Open(instance.name.clone(), tab));
    }

    fn close(&self) {
        self.events.lock().unwrap().push(DrawerEvent::Close);
    }
}

pub struct StaticAuth {
    pub username: Option<String>,
    pub org_admin: bool,
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn username(&self) -> Option<String> {
        self.username.clone()
    }

    async fn is_org_admin(&self) -> bool {
        self.org_admin
    }
}

/// Fakes wired into a capability bundle, with handles kept for assertions.
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub sizes: Arc<FakeSizes>,
    pub dialogs: Arc<RecordingDialogs>,
    pub alerts: Arc<RecordingAlerts>,
    pub drawer: Arc<RecordingDrawer>,
}

impl Harness {
    pub fn new(api: FakeApi) -> Self {
        Self::with_dialogs(api, RecordingDialogs::default())
    }

    pub fn with_dialogs(api: FakeApi, dialogs: RecordingDialogs) -> Self {
        Self {
            api: Arc::new(api),
            sizes: Arc::new(FakeSizes::default()),
            dialogs: Arc::new(dialogs),
            alerts: Arc::new(RecordingAlerts::default()),
            drawer: Arc::new(RecordingDrawer::default()),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            api: self.api.clone(),
            sizes: self.sizes.clone(),
            dialogs: self.dialogs.clone(),
            alerts: self.alerts.clone(),
            drawer: self.drawer.clone(),
            auth: Arc::new(StaticAuth {
                username: Some("alice".to_string()),
                org_admin: false,
            }),
        }
    }
}
