// List synchronization and action dispatch
mod fetch;
mod poller;
mod state;

pub use fetch::{FetchOutcome, FetchRequest, FetchedPage, Fetcher};
pub use poller::Poller;
pub use state::{ControllerConfig, FetchMode, ListParams, ViewState};

use chrono::{DateTime, Utc};
use streams_models::{Instance, InstanceStatus, SizedInstance};

use crate::enrich::SizeEnricher;
use crate::error::{ConsoleError, Result, ServiceError};
use crate::host::{
    Alert, AlertSeverity, CacheDirective, Capabilities, DialogOutcome, DrawerTab, ListRequest,
    UserContext,
};
use crate::query::{build_filter_query, FilterCriterion};
use crate::sort::{OrderBy, SortDirection};
use crate::status_alerts::StatusAlerts;
use crate::table::TableContext;

/// Skeleton rows shown before the first count is known.
const INITIAL_EXPECTED_TOTAL: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitReport {
    Applied,
    /// The result was built from outdated parameters or is older than the
    /// committed one, and was dropped.
    Stale,
    Unauthorized,
    Failed(ServiceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DrawerSelection {
    instance_id: String,
    tab: DrawerTab,
}

/// Owns the authoritative instance page and drives fetch, poll and actions.
pub struct Controller {
    caps: Capabilities,
    config: ControllerConfig,
    fetcher: Fetcher,
    params: ListParams,
    view: ViewState,
    page: Option<FetchedPage>,
    expected_total: u32,
    waiting_for_delete: bool,
    refresh_requested: bool,
    failing: bool,
    issued: u64,
    committed: u64,
    valid_from: u64,
    params_changed: bool,
    user: UserContext,
    selected: Option<DrawerSelection>,
    status_alerts: StatusAlerts,
}

impl Controller {
    pub fn new(caps: Capabilities, config: ControllerConfig) -> Self {
        let enricher = SizeEnricher::new(caps.sizes.clone(), config.size_lookup_concurrency);
        let fetcher = Fetcher::new(caps.api.clone(), enricher);
        let params = ListParams {
            per_page: config.per_page.max(1),
            ..ListParams::default()
        };

        Self {
            caps,
            config,
            fetcher,
            params,
            view: ViewState::Idle,
            page: None,
            expected_total: INITIAL_EXPECTED_TOTAL,
            waiting_for_delete: false,
            refresh_requested: false,
            failing: false,
            issued: 0,
            committed: 0,
            valid_from: 0,
            params_changed: false,
            user: UserContext::default(),
            selected: None,
            status_alerts: StatusAlerts::default(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn items(&self) -> &[SizedInstance] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    /// Total reported by the last committed fetch.
    pub fn total(&self) -> u32 {
        self.page.as_ref().map(|p| p.total).unwrap_or(0)
    }

    pub fn expected_total(&self) -> u32 {
        self.expected_total
    }

    pub fn is_waiting_for_delete(&self) -> bool {
        self.waiting_for_delete
    }

    pub fn selected_instance_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.instance_id.as_str())
    }

    pub fn selected_tab(&self) -> Option<DrawerTab> {
        self.selected.as_ref().map(|s| s.tab)
    }

    /// A page has been committed and no explicit load is running.
    pub fn data_loaded(&self) -> bool {
        self.view != ViewState::Loading && self.page.is_some()
    }

    pub fn find(&self, id: &str) -> Option<&SizedInstance> {
        self.items()
            .iter()
            .find(|sized| sized.instance.id.as_deref() == Some(id))
    }

    /// Resolve the user once and load the first page.
    pub async fn mount(&mut self) -> CommitReport {
        let auth = self.caps.auth.clone();
        let (username, is_org_admin) = futures::join!(auth.username(), auth.is_org_admin());
        self.user = UserContext {
            username,
            is_org_admin,
        };
        tracing::debug!("Mounted for user {:?} (org admin: {})", self.user.username, is_org_admin);

        self.refresh().await
    }

    // ------------------------------------------------------------------------
    // Fetch cycle
    // ------------------------------------------------------------------------

    /// Snapshot the current parameters into a request and issue a new generation.
    pub fn begin_fetch(&mut self, mode: FetchMode) -> FetchRequest {
        self.issued += 1;
        self.refresh_requested = false;
        if std::mem::take(&mut self.params_changed) {
            self.valid_from = self.issued;
        }

        let cache = match mode {
            FetchMode::Explicit => {
                self.view = ViewState::Loading;
                CacheDirective::Bypass
            }
            FetchMode::Poll => {
                if !matches!(self.view, ViewState::Loading | ViewState::Unauthorized) {
                    self.view = ViewState::Polling;
                }
                CacheDirective::MaxAge(self.config.poll_interval)
            }
        };

        FetchRequest {
            generation: self.issued,
            mode,
            list: ListRequest {
                page: self.params.page,
                per_page: self.params.per_page,
                order_by: self.params.order_by.to_string(),
                search: build_filter_query(&self.params.filters),
                cache,
            },
        }
    }

    pub fn fetcher(&self) -> Fetcher {
        self.fetcher.clone()
    }

    /// Apply a finished fetch.
    ///
    /// Results from requests issued before the last parameter change, or older
    /// than the last committed result, are discarded.
    pub fn commit(&mut self, outcome: FetchOutcome) -> CommitReport {
        if outcome.generation < self.valid_from || outcome.generation <= self.committed {
            tracing::debug!(
                "Discarding stale fetch result (generation {}, committed {}, valid from {})",
                outcome.generation,
                self.committed,
                self.valid_from
            );
            return CommitReport::Stale;
        }
        self.committed = outcome.generation;

        match outcome.result {
            Ok(page) => {
                self.apply(page);
                CommitReport::Applied
            }
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("User is not authorized to list instances: {}", e);
                self.view = ViewState::Unauthorized;
                self.page = None;
                if self.selected.take().is_some() {
                    self.caps.drawer.close();
                }
                CommitReport::Unauthorized
            }
            Err(e) => {
                tracing::error!("Failed to fetch instances: {}", e);
                // a failing poll loop alerts once, explicit loads always do
                if outcome.mode == FetchMode::Explicit || !self.failing {
                    self.alert_failure(&e);
                }
                self.failing = true;
                self.view = ViewState::Error(e.to_string());
                CommitReport::Failed(e)
            }
        }
    }

    fn apply(&mut self, page: FetchedPage) {
        if page.total > self.expected_total {
            self.expected_total = page.total;
        }

        if self.waiting_for_delete && !self.params.is_filtered() && page.items.is_empty() {
            self.waiting_for_delete = false;
        }

        if let Some(selection) = &self.selected {
            let visible = page
                .items
                .iter()
                .any(|sized| sized.instance.id.as_deref() == Some(selection.instance_id.as_str()));
            if !visible {
                tracing::debug!("Closing details for {}", selection.instance_id);
                self.selected = None;
                self.caps.drawer.close();
            }
        }

        let alerts = self.status_alerts.observe(
            self.user.username.as_deref(),
            page.items.iter().map(|sized| &sized.instance),
        );
        for alert in alerts {
            self.caps.alerts.add_alert(alert);
        }

        let underflow = self.params.page > 1 && page.items.is_empty();
        self.page = Some(page);
        self.failing = false;
        self.view = ViewState::Idle;

        if underflow {
            tracing::info!(
                "Page {} is empty, moving back to page {}",
                self.params.page,
                self.params.page - 1
            );
            self.params.page -= 1;
            self.params_changed();
        }
    }

    fn alert_failure(&self, error: &ServiceError) {
        self.caps.alerts.add_alert(
            Alert::new("Something went wrong", AlertSeverity::Danger)
                .with_description(Some(
                    error
                        .reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| error.to_string()),
                )),
        );
    }

    pub async fn fetch(&mut self, mode: FetchMode) -> CommitReport {
        let request = self.begin_fetch(mode);
        let outcome = self.fetcher().execute(request).await;
        self.commit(outcome)
    }

    pub async fn poll(&mut self) -> CommitReport {
        self.fetch(FetchMode::Poll).await
    }

    /// Explicit fetch that follows page-underflow corrections until the page settles.
    pub async fn refresh(&mut self) -> CommitReport {
        let mut report = self.fetch(FetchMode::Explicit).await;
        while self.refresh_requested {
            report = self.fetch(FetchMode::Explicit).await;
        }
        report
    }

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    // ------------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------------

    fn params_changed(&mut self) {
        self.params_changed = true;
        self.refresh_requested = true;
    }

    /// Replace the filters and go back to the first page.
    pub fn search(&mut self, filters: Vec<FilterCriterion>) {
        self.params.filters = filters;
        self.params.page = 1;
        self.params_changed();
    }

    pub fn set_page(&mut self, page: u32) {
        self.params.page = page.max(1);
        self.params_changed();
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.params.per_page = per_page.max(1);
        self.params_changed();
    }

    pub fn set_order_by(&mut self, order_by: OrderBy) {
        self.params.order_by = order_by;
        self.params_changed();
    }

    /// Header click on column `index`. Unknown columns are ignored.
    pub fn sort_by_index(&mut self, index: usize, requested: SortDirection) {
        if let Some(order_by) = OrderBy::on_sort(Some(self.params.order_by), index, requested) {
            self.set_order_by(order_by);
        }
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    pub async fn create_instance(&mut self) -> DialogOutcome {
        let previous = self.expected_total;
        self.expected_total = self.total() + 1;

        let outcome = self.caps.dialogs.create_instance().await;
        match outcome {
            DialogOutcome::Completed => {
                tracing::info!("Instance created, refreshing list");
                self.refresh().await;
            }
            DialogOutcome::Dismissed => self.expected_total = previous,
        }

        outcome
    }

    /// Delete `instance`, asking for confirmation unless it already failed.
    pub async fn delete_instance(&mut self, instance: &Instance) -> Result<DeleteOutcome> {
        if instance.status != InstanceStatus::Failed
            && self.caps.dialogs.confirm_delete(instance).await == DialogOutcome::Dismissed
        {
            tracing::debug!("Delete of '{}' cancelled", instance.name);
            return Ok(DeleteOutcome::Cancelled);
        }

        self.perform_delete(instance).await
    }

    async fn perform_delete(&mut self, instance: &Instance) -> Result<DeleteOutcome> {
        let id = instance
            .id
            .as_deref()
            .ok_or_else(|| ConsoleError::MissingInstanceId(instance.name.clone()))?;

        let previous = self.expected_total;
        self.expected_total = self.total().saturating_sub(1);
        self.caps.dialogs.close_delete();

        tracing::info!("Deleting instance: {} ({})", instance.name, id);

        match self.caps.api.delete_instance(id, true).await {
            Ok(()) => {
                self.waiting_for_delete = true;
                self.refresh().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                tracing::error!("Failed to delete instance '{}': {}", instance.name, e);
                self.expected_total = previous;
                self.alert_failure(&e);
                Ok(DeleteOutcome::Failed)
            }
        }
    }

    pub async fn change_owner(&mut self, instance: &Instance) -> DialogOutcome {
        let outcome = self.caps.dialogs.transfer_ownership(instance).await;
        if outcome == DialogOutcome::Completed {
            tracing::info!("Owner of '{}' changed, refreshing list", instance.name);
            self.refresh().await;
        }
        outcome
    }

    pub fn view_instance(&mut self, instance: &Instance) {
        self.select(instance, DrawerTab::Details);
    }

    pub fn view_connection(&mut self, instance: &Instance) {
        self.select(instance, DrawerTab::Connection);
    }

    pub fn close_drawer(&mut self) {
        if self.selected.take().is_some() {
            self.caps.drawer.close();
        }
    }

    fn select(&mut self, instance: &Instance, tab: DrawerTab) {
        let Some(id) = instance.id.clone() else {
            tracing::warn!("Cannot show details for '{}' without an id", instance.name);
            return;
        };

        self.selected = Some(DrawerSelection {
            instance_id: id,
            tab,
        });
        self.caps.drawer.open(instance, tab);
    }

    /// Immutable snapshot for the presentation table.
    pub fn table_context(&self, now: DateTime<Utc>) -> TableContext<'_> {
        TableContext {
            items: self.items(),
            data_loaded: self.data_loaded(),
            unauthorized: self.view == ViewState::Unauthorized,
            page: self.params.page,
            per_page: self.params.per_page,
            total: self.total(),
            expected_total: self.expected_total,
            filtered: self.params.is_filtered(),
            user: &self.user,
            order_by: self.params.order_by,
            selected_id: self.selected_instance_id(),
            now,
        }
    }
}
