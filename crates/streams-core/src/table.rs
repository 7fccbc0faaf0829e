//! Presentation descriptors for the instance table.
//!
//! Everything here is a pure function of a [`TableContext`] snapshot. The
//! terminal renderer in the binary turns the resulting [`ListView`] into text.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use streams_models::{InstanceStatus, SizedInstance};

use crate::host::UserContext;
use crate::sort::{OrderBy, SortDirection};

pub const COLUMNS: [&str; 6] = [
    "Name",
    "Cloud provider",
    "Region",
    "Owner",
    "Status",
    "Time created",
];

/// Snapshot of controller state needed to render the list.
#[derive(Debug, Clone)]
pub struct TableContext<'a> {
    pub items: &'a [SizedInstance],
    pub data_loaded: bool,
    pub unauthorized: bool,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub expected_total: u32,
    pub filtered: bool,
    pub user: &'a UserContext,
    pub order_by: OrderBy,
    pub selected_id: Option<&'a str>,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ListView {
    Unauthorized,
    /// No instances exist yet.
    Empty,
    Table(TableView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub sort_index: usize,
    pub sort_direction: SortDirection,
    pub rows: Vec<RowView>,
    /// Filters matched nothing.
    pub no_results: bool,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowView {
    Skeleton,
    Instance(InstanceRow),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceRow {
    pub id: Option<String>,
    pub name: String,
    /// Only ready instances link to their dashboard.
    pub linkable: bool,
    pub cloud_provider: String,
    pub region: String,
    pub owner: String,
    pub status: String,
    pub created: String,
    pub expires: Option<ExpiryCell>,
    pub actions: Vec<RowAction>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryCell {
    ExpiresIn(String),
    /// The trial period is over.
    Expired,
    /// Trial length not known yet.
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ViewDetails,
    ViewConnection,
    ChangeOwner,
    Delete,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::ViewDetails => "View details",
            ActionKind::ViewConnection => "View connection information",
            ActionKind::ChangeOwner => "Change owner",
            ActionKind::Delete => "Delete instance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowAction {
    pub kind: ActionKind,
    pub enabled: bool,
    pub tooltip: Option<&'static str>,
}

// ============================================================================
// View selection
// ============================================================================

pub fn present(ctx: &TableContext<'_>) -> ListView {
    if ctx.unauthorized {
        return ListView::Unauthorized;
    }
    if ctx.data_loaded && !ctx.filtered && ctx.total == 0 && ctx.items.is_empty() {
        return ListView::Empty;
    }

    let rows = if ctx.data_loaded {
        ctx.items.iter().map(|sized| RowView::Instance(row(ctx, sized))).collect()
    } else {
        let count = loading_rows_count(ctx.page, ctx.per_page, ctx.expected_total);
        vec![RowView::Skeleton; count as usize]
    };

    ListView::Table(TableView {
        columns: COLUMNS.to_vec(),
        sort_index: ctx.order_by.column.index(),
        sort_direction: ctx.order_by.direction,
        no_results: ctx.data_loaded && ctx.items.is_empty(),
        rows,
        page: ctx.page,
        per_page: ctx.per_page,
        total: ctx.total,
    })
}

/// Number of skeleton rows to show while a page loads.
///
/// A full page, except on the last expected page where only the remainder is
/// shown.
pub fn loading_rows_count(page: u32, per_page: u32, expected_total: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let last_page = expected_total.div_ceil(per_page).max(1);
    let remainder = expected_total % per_page;
    if page == last_page && remainder != 0 {
        remainder
    } else {
        per_page
    }
}

// ============================================================================
// Rows
// ============================================================================

fn row(ctx: &TableContext<'_>, sized: &SizedInstance) -> InstanceRow {
    let instance = &sized.instance;

    let expires = instance
        .instance_type
        .filter(|t| t.is_trial())
        .map(|_| match &sized.size {
            Some(size) if size.trial_duration_hours > 0 => {
                let expiry =
                    instance.created_at + Duration::hours(i64::from(size.trial_duration_hours));
                if expiry <= ctx.now {
                    ExpiryCell::Expired
                } else {
                    ExpiryCell::ExpiresIn(format_duration(expiry - ctx.now))
                }
            }
            _ => ExpiryCell::Pending,
        });

    InstanceRow {
        id: instance.id.clone(),
        name: instance.name.clone(),
        linkable: instance.status == InstanceStatus::Ready,
        cloud_provider: instance
            .cloud_provider
            .as_deref()
            .map(provider_display_name)
            .unwrap_or_default(),
        region: instance
            .region
            .as_deref()
            .map(region_display_name)
            .unwrap_or_default(),
        owner: instance.owner.clone(),
        status: status_label(instance.status).to_string(),
        created: format!("{} ago", format_duration(ctx.now - instance.created_at)),
        expires,
        actions: actions(ctx, sized),
        selected: instance.id.is_some() && instance.id.as_deref() == ctx.selected_id,
    }
}

fn actions(ctx: &TableContext<'_>, sized: &SizedInstance) -> Vec<RowAction> {
    let instance = &sized.instance;
    if !ctx.data_loaded || instance.status.is_deleting() {
        return Vec::new();
    }

    let can_manage = ctx.user.can_manage(instance);
    let guarded = |kind, tooltip| RowAction {
        kind,
        enabled: can_manage,
        tooltip: (!can_manage).then_some(tooltip),
    };

    vec![
        RowAction {
            kind: ActionKind::ViewDetails,
            enabled: true,
            tooltip: None,
        },
        RowAction {
            kind: ActionKind::ViewConnection,
            enabled: true,
            tooltip: None,
        },
        guarded(
            ActionKind::ChangeOwner,
            "You do not have permission to change the owner of this instance",
        ),
        guarded(
            ActionKind::Delete,
            "You do not have permission to delete this instance",
        ),
    ]
}

/// Umbrella label shown in the status column.
pub fn status_label(status: InstanceStatus) -> &'static str {
    match status {
        InstanceStatus::Accepted | InstanceStatus::Preparing | InstanceStatus::Provisioning => {
            "Creating"
        }
        InstanceStatus::Deprovision | InstanceStatus::Deleted => "Deleting",
        InstanceStatus::Ready => "Ready",
        InstanceStatus::Failed => "Failed",
        InstanceStatus::Unknown => "Unknown",
    }
}

pub fn provider_display_name(provider: &str) -> String {
    match provider {
        "aws" => "Amazon Web Services".to_string(),
        "gcp" => "Google Cloud Platform".to_string(),
        "azure" => "Microsoft Azure".to_string(),
        "redhat" => "Red Hat".to_string(),
        other => other.to_string(),
    }
}

pub fn region_display_name(region: &str) -> String {
    let name = match region {
        "us-east-1" => "US East, N. Virginia",
        "us-east-2" => "US East, Ohio",
        "us-west-2" => "US West, Oregon",
        "eu-west-1" => "EU, Ireland",
        "eu-central-1" => "EU, Frankfurt",
        "ap-south-1" => "Asia Pacific, Mumbai",
        "us-central1" => "US Central, Iowa",
        "europe-west1" => "EU, Belgium",
        other => return other.to_string(),
    };
    name.to_string()
}

/// Coarse human duration: the largest whole unit, minutes at minimum.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let (value, unit) = if minutes >= 60 * 24 * 30 {
        (minutes / (60 * 24 * 30), "month")
    } else if minutes >= 60 * 24 {
        (minutes / (60 * 24), "day")
    } else if minutes >= 60 {
        (minutes / 60, "hour")
    } else {
        (minutes.max(1), "minute")
    };

    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}
