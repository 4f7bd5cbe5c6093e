//! Section refresh dispatcher: fetch, cache, filter and render one section

use crate::filters::{FilterState, filter_connections, filter_logs, sort_tools};
use crate::models::{ResourceData, Section};
use crate::render::{RenderSink, SectionView};
use crate::source::{DataOrigin, DataSource, Sourced};
use crate::state::StateStore;

use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Result of one dispatch cycle
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub cycle_id: String,
    pub section: Section,
    /// `None` when the section has nothing to fetch
    pub source: Option<DataOrigin>,
    pub rendered: bool,
}

pub struct SectionDispatcher {
    source: Arc<DataSource>,
    store: StateStore,
    sink: Arc<dyn RenderSink>,
}

impl SectionDispatcher {
    pub fn new(source: Arc<DataSource>, store: StateStore, sink: Arc<dyn RenderSink>) -> Self {
        Self { source, store, sink }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Refresh whichever section is active right now
    pub async fn refresh_active(&self) -> DispatchOutcome {
        let section = self.store.active_section().await;
        self.refresh(section).await
    }

    /// Run one cycle for `section`. Never fails: render errors and panics
    /// are logged here so the caller's refresh cadence keeps going.
    #[instrument(skip(self))]
    pub async fn refresh(&self, section: Section) -> DispatchOutcome {
        let cycle_id = Uuid::new_v4().to_string();

        let Some(produced) = self.produce(section).await else {
            debug!(cycle_id = %cycle_id, "Nothing to refresh for {}", section);
            return DispatchOutcome {
                cycle_id,
                section,
                source: None,
                rendered: false,
            };
        };

        let rendered = self.render(&produced.value, produced.source).await;
        if rendered {
            self.store.mark_updated(Utc::now()).await;
        }

        debug!(
            cycle_id = %cycle_id,
            source = %produced.source,
            rendered,
            "Dispatch cycle complete"
        );

        DispatchOutcome {
            cycle_id,
            section,
            source: Some(produced.source),
            rendered,
        }
    }

    /// Data half of a cycle: fetch, overwrite the cache, apply filters.
    pub async fn produce(&self, section: Section) -> Option<Sourced<SectionView>> {
        let kind = section.resource()?;
        let config = self.store.config().await;

        let fetched = self.source.fetch_resource(kind, &config).await;
        self.store.store(fetched.value.clone()).await;

        // Filters are read after the fetch so fast filter edits are honoured
        let filters = self.store.filters().await;
        let view = build_view(section, fetched.value, &filters)?;

        Some(Sourced {
            source: fetched.source,
            value: view,
        })
    }

    async fn render(&self, view: &SectionView, origin: DataOrigin) -> bool {
        match AssertUnwindSafe(self.sink.render(view, origin))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!(section = %view.section(), error = %e, "Render sink failed");
                false
            }
            Err(_) => {
                error!(section = %view.section(), "Render sink panicked");
                false
            }
        }
    }
}

/// Pair a section with its payload, applying the section's filter or sort
pub fn build_view(
    section: Section,
    data: ResourceData,
    filters: &FilterState,
) -> Option<SectionView> {
    match (section, data) {
        (Section::Dashboard, ResourceData::Metrics(m)) => Some(SectionView::Dashboard(m)),
        (Section::Health, ResourceData::Metrics(m)) => Some(SectionView::Health(m)),
        (Section::Connections, ResourceData::Connections(conns)) => Some(SectionView::Connections(
            filter_connections(&conns, filters.connections),
        )),
        (Section::Tools, ResourceData::Tools(tools)) => {
            Some(SectionView::Tools(sort_tools(&tools, filters.tools)))
        }
        (Section::Logs, ResourceData::Logs(logs)) => {
            Some(SectionView::Logs(filter_logs(&logs, &filters.logs)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::errors::{DashboardError, Result};
    use crate::filters::{ConnectionFilter, ToolSort};
    use crate::mock;
    use crate::models::{ConnectionStatus, LogLevel};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        views: Mutex<Vec<(SectionView, DataOrigin)>>,
    }

    #[async_trait]
    impl RenderSink for RecordingSink {
        async fn render(&self, view: &SectionView, origin: DataOrigin) -> Result<()> {
            self.views.lock().unwrap().push((view.clone(), origin));
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl RenderSink for FailingSink {
        async fn render(&self, _view: &SectionView, _origin: DataOrigin) -> Result<()> {
            Err(DashboardError::Render("canvas unavailable".to_string()))
        }
    }

    struct PanickingSink;

    #[async_trait]
    impl RenderSink for PanickingSink {
        async fn render(&self, _view: &SectionView, _origin: DataOrigin) -> Result<()> {
            panic!("chart library exploded");
        }
    }

    fn demo_store() -> StateStore {
        let config = DashboardConfig {
            demo_mode: true,
            ..DashboardConfig::default()
        };
        StateStore::new(config)
    }

    fn dispatcher(store: StateStore, sink: Arc<dyn RenderSink>) -> SectionDispatcher {
        let source = Arc::new(DataSource::new(Duration::from_secs(1)).unwrap());
        SectionDispatcher::new(source, store, sink)
    }

    #[tokio::test]
    async fn test_connections_cycle_filters_view_but_caches_raw() {
        let store = demo_store();
        store
            .set_connection_filter(ConnectionFilter::Status(ConnectionStatus::Connected))
            .await;
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = dispatcher(store.clone(), sink.clone());

        let outcome = dispatcher.refresh(Section::Connections).await;
        assert_eq!(outcome.source, Some(DataOrigin::Mock));
        assert!(outcome.rendered);

        let views = sink.views.lock().unwrap().clone();
        assert_eq!(views.len(), 1);
        match &views[0].0 {
            SectionView::Connections(conns) => {
                let ids: Vec<_> = conns.iter().map(|c| c.id.as_str()).collect();
                assert_eq!(ids, vec!["conn_001", "conn_003"]);
            }
            other => panic!("unexpected view: {:?}", other),
        }

        let cache = store.cache().await;
        assert_eq!(cache.connections, mock::connections());
        assert!(cache.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_refresh_active_follows_navigation() {
        let store = demo_store();
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = dispatcher(store.clone(), sink.clone());

        dispatcher.refresh_active().await;
        store.navigate(Section::Logs).await;
        store.set_log_level(Some(LogLevel::Warning)).await;
        store.set_log_search("response".to_string()).await;
        dispatcher.refresh_active().await;

        let views = sink.views.lock().unwrap().clone();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].0, SectionView::Dashboard(mock::metrics()));
        match &views[1].0 {
            SectionView::Logs(logs) => {
                assert_eq!(logs.len(), 1);
                assert_eq!(logs[0].message, "High response time detected: 1200ms");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_settings_section_does_not_fetch_or_render() {
        let store = demo_store();
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = dispatcher(store.clone(), sink.clone());

        let outcome = dispatcher.refresh(Section::Settings).await;
        assert_eq!(outcome.source, None);
        assert!(!outcome.rendered);
        assert!(sink.views.lock().unwrap().is_empty());
        assert_eq!(store.cache().await, Default::default());
    }

    #[tokio::test]
    async fn test_render_error_is_contained() {
        let store = demo_store();
        let dispatcher = dispatcher(store.clone(), Arc::new(FailingSink));

        let outcome = dispatcher.refresh(Section::Tools).await;
        assert!(!outcome.rendered);

        let cache = store.cache().await;
        assert_eq!(cache.tools, mock::tools());
        assert!(cache.last_updated.is_none());

        // Later cycles still run
        let again = dispatcher.refresh(Section::Health).await;
        assert_eq!(again.source, Some(DataOrigin::Mock));
        assert!(store.cache().await.metrics.is_some());
    }

    #[tokio::test]
    async fn test_render_panic_is_contained() {
        let store = demo_store();
        let dispatcher = dispatcher(store, Arc::new(PanickingSink));

        let outcome = dispatcher.refresh(Section::Dashboard).await;
        assert!(!outcome.rendered);
        assert_eq!(outcome.source, Some(DataOrigin::Mock));
    }

    #[test]
    fn test_build_view_sorts_tools() {
        let filters = FilterState {
            tools: ToolSort::Name,
            ..FilterState::default()
        };
        let data = ResourceData::Tools(mock::tools());
        let view = build_view(Section::Tools, data, &filters).unwrap();
        match view {
            SectionView::Tools(tools) => assert_eq!(tools[0].name, "tavily_crawl"),
            other => panic!("unexpected view: {:?}", other),
        }

        assert!(build_view(Section::Logs, ResourceData::Tools(vec![]), &filters).is_none());
    }
}
