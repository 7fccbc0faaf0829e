use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use streams_models::{Instance, InstanceSize, InstanceType, SizedInstance};

use crate::host::SizeLookup;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SizeKey {
    instance_type: InstanceType,
    provider: String,
    region: String,
}

impl SizeKey {
    /// Only developer instances with a known placement carry a trial size.
    fn for_instance(instance: &Instance) -> Option<Self> {
        match (
            instance.instance_type,
            instance.cloud_provider.as_deref(),
            instance.region.as_deref(),
        ) {
            (Some(InstanceType::Developer), Some(provider), Some(region))
                if !provider.is_empty() && !region.is_empty() =>
            {
                Some(Self {
                    instance_type: InstanceType::Developer,
                    provider: provider.to_string(),
                    region: region.to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Attaches trial sizes to fetched instances.
///
/// Each distinct (type, provider, region) is looked up once, with at most
/// `concurrency` lookups in flight. A failed lookup only leaves the affected
/// instances without a size.
#[derive(Clone)]
pub struct SizeEnricher {
    lookup: Arc<dyn SizeLookup>,
    concurrency: usize,
}

impl SizeEnricher {
    pub fn new(lookup: Arc<dyn SizeLookup>, concurrency: usize) -> Self {
        Self {
            lookup,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn enrich(&self, instances: Vec<Instance>) -> Vec<SizedInstance> {
        let keys: HashSet<SizeKey> = instances.iter().filter_map(SizeKey::for_instance).collect();

        let sizes: HashMap<SizeKey, InstanceSize> = stream::iter(keys)
            .map(|key| {
                let lookup = Arc::clone(&self.lookup);
                async move {
                    let result = lookup
                        .get_sizes(key.instance_type, &key.provider, &key.region)
                        .await;
                    (key, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|(key, result)| async move {
                match result {
                    Ok(sizes) => {
                        let first = sizes.first().copied();
                        if first.is_none() {
                            tracing::warn!(
                                "No {} sizes offered in {}/{}",
                                key.instance_type,
                                key.provider,
                                key.region
                            );
                        }
                        first.map(|size| (key, size))
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Size lookup failed for {}/{}: {}",
                            key.provider,
                            key.region,
                            e
                        );
                        None
                    }
                }
            })
            .collect()
            .await;

        instances
            .into_iter()
            .map(|instance| {
                let size =
                    SizeKey::for_instance(&instance).and_then(|key| sizes.get(&key).copied());
                SizedInstance { instance, size }
            })
            .collect()
    }
}
