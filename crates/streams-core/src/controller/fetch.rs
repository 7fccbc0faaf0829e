use std::sync::Arc;
use streams_models::SizedInstance;

use crate::controller::FetchMode;
use crate::enrich::SizeEnricher;
use crate::error::ServiceError;
use crate::host::{InstanceApi, ListRequest};

/// A fetch snapshot taken by [`Controller::begin_fetch`](super::Controller::begin_fetch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub mode: FetchMode,
    pub list: ListRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub page: u32,
    pub total: u32,
    pub items: Vec<SizedInstance>,
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub generation: u64,
    pub mode: FetchMode,
    pub result: Result<FetchedPage, ServiceError>,
}

/// Runs fetch requests without borrowing the controller, so several can be
/// in flight at once.
#[derive(Clone)]
pub struct Fetcher {
    api: Arc<dyn InstanceApi>,
    enricher: SizeEnricher,
}

impl Fetcher {
    pub fn new(api: Arc<dyn InstanceApi>, enricher: SizeEnricher) -> Self {
        Self { api, enricher }
    }

    pub async fn execute(self, request: FetchRequest) -> FetchOutcome {
        tracing::debug!(
            "Fetching page {} (generation {}, {:?})",
            request.list.page,
            request.generation,
            request.mode
        );

        let result = match self.api.list_instances(&request.list).await {
            Ok(list) => {
                let items = self.enricher.enrich(list.items).await;
                Ok(FetchedPage {
                    page: list.page,
                    total: list.total,
                    items,
                })
            }
            Err(e) => Err(e),
        };

        FetchOutcome {
            generation: request.generation,
            mode: request.mode,
            result,
        }
    }
}
