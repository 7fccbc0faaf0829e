pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod transfer_owner;
pub mod watch;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use std::sync::Arc;
use streams_client::{Client, ClientConfig};
use streams_core::query::parse_filters;
use streams_core::sort::{OrderBy, SortColumn, SortDirection};
use streams_core::table::present;
use streams_core::{Capabilities, Controller};
use streams_models::Instance;

use crate::config::{CliConfig, OutputFormat};
use crate::format;
use crate::hosts::{ConfigAuth, ConsoleAlerts, ConsoleDrawer, TerminalDialogs};

/// Everything a command needs to talk to the service.
pub struct Session {
    pub client: Client,
    pub config: CliConfig,
    pub format: OutputFormat,
}

impl Session {
    pub fn new(config: CliConfig, token: Option<String>) -> Result<Self> {
        let client = Client::new(
            ClientConfig::new(config.api_url.clone())
                .with_token(token)
                .with_timeout(std::time::Duration::from_secs(config.timeout)),
        )
        .context(format!("Failed to create client for {}", config.api_url))?;

        Ok(Self {
            client,
            format: config.format,
            config,
        })
    }

    pub fn dialogs(&self) -> TerminalDialogs {
        TerminalDialogs::new(self.client.clone())
    }

    pub fn controller(&self, dialogs: TerminalDialogs) -> Controller {
        let caps = Capabilities {
            api: Arc::new(self.client.clone()),
            sizes: Arc::new(self.client.clone()),
            dialogs: Arc::new(dialogs),
            alerts: Arc::new(ConsoleAlerts),
            drawer: Arc::new(ConsoleDrawer),
            auth: Arc::new(ConfigAuth {
                username: self.config.username.clone(),
                org_admin: self.config.org_admin,
            }),
        };
        Controller::new(caps, self.config.controller_config())
    }

    /// Instance with `id`, from the loaded page when possible.
    pub async fn resolve(&self, controller: &Controller, id: &str) -> Result<Instance> {
        if let Some(sized) = controller.find(id) {
            return Ok(sized.instance.clone());
        }
        self.client
            .get_instance(id)
            .await
            .context(format!("Failed to fetch instance {}", id))
    }

    pub fn render(&self, controller: &Controller) -> Result<()> {
        match self.format {
            OutputFormat::Json => format::print_json(&serde_json::json!({
                "page": controller.params().page,
                "per_page": controller.params().per_page,
                "total": controller.total(),
                "items": controller.items(),
            })),
            OutputFormat::Table => {
                format::print_list_view(&present(&controller.table_context(Utc::now())));
                Ok(())
            }
        }
    }
}

/// Paging, sorting and filtering flags shared by `list` and `watch`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Page to show
    #[arg(long)]
    pub page: Option<u32>,

    /// Instances per page
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Sort column, optionally with a direction (e.g. name:asc)
    #[arg(long)]
    pub sort: Option<String>,

    /// Filter as key=value (contains) or key==value (exact); repeatable
    #[arg(long = "filter")]
    pub filters: Vec<String>,
}

impl ListArgs {
    pub fn apply(&self, controller: &mut Controller) -> Result<()> {
        if let Some(per_page) = self.per_page {
            controller.set_per_page(per_page);
        }
        if let Some(sort) = &self.sort {
            controller.set_order_by(parse_sort(sort)?);
        }
        if !self.filters.is_empty() {
            let filters =
                parse_filters(self.filters.iter().map(String::as_str)).map_err(|e| anyhow!(e))?;
            controller.search(filters);
        }
        if let Some(page) = self.page {
            controller.set_page(page);
        }
        Ok(())
    }
}

/// Parse `FIELD[:asc|desc]`. Without a direction the column's first-click
/// order applies.
pub fn parse_sort(spec: &str) -> Result<OrderBy> {
    match spec.split_once(':') {
        Some((field, direction)) => Ok(format!("{} {}", field, direction).parse::<OrderBy>()?),
        None => {
            let column = SortColumn::from_field(spec)
                .ok_or_else(|| anyhow!("'{}' is not a sortable column", spec))?;
            OrderBy::on_sort(None, column.index(), SortDirection::Asc)
                .ok_or_else(|| anyhow!("'{}' is not a sortable column", spec))
        }
    }
}
