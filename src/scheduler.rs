//! Auto-refresh scheduler driving the dispatcher on a timer

use crate::config::DashboardConfig;
use crate::dispatcher::SectionDispatcher;

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running(Duration),
}

struct RunningTimer {
    period: Duration,
    handle: JoinHandle<()>,
}

/// Owns the single periodic refresh task.
///
/// `start` always cancels the previous timer before arming a new one, so
/// at most one timer is live no matter how often it is called.
pub struct AutoRefreshScheduler {
    dispatcher: Arc<SectionDispatcher>,
    timer: Option<RunningTimer>,
}

impl AutoRefreshScheduler {
    pub fn new(dispatcher: Arc<SectionDispatcher>) -> Self {
        Self {
            dispatcher,
            timer: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        match &self.timer {
            Some(timer) => SchedulerState::Running(timer.period),
            None => SchedulerState::Stopped,
        }
    }

    /// (Re)arm the timer from `config`. Stays stopped when auto refresh is off.
    pub fn start(&mut self, config: &DashboardConfig) {
        self.stop();

        if !config.auto_refresh {
            debug!("Auto refresh disabled, scheduler stays stopped");
            return;
        }

        let period = config.refresh_rate;
        if period.is_zero() {
            warn!("Refusing to schedule auto refresh with a zero interval");
            return;
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                // Cycles run detached: stopping the timer never cancels a
                // fetch already in flight. Section is read per tick.
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    dispatcher.refresh_active().await;
                });
            }
        });

        info!("Auto refresh started every {}ms", period.as_millis());
        self.timer = Some(RunningTimer { period, handle });
    }

    /// Cancel the timer if one is running. Cycles it already fired finish.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.handle.abort();
            info!("Auto refresh stopped");
        }
    }

    /// Apply a changed interval or enable flag
    pub fn reconfigure(&mut self, config: &DashboardConfig) {
        self.start(config);
    }
}

impl Drop for AutoRefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DashboardError, Result};
    use crate::models::Section;
    use crate::render::{RenderSink, SectionView};
    use crate::source::{DataOrigin, DataSource};
    use crate::state::StateStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::sleep;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct CountingSink {
        sections: Mutex<Vec<Section>>,
        fail: bool,
    }

    impl CountingSink {
        fn count(&self) -> usize {
            self.sections.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RenderSink for CountingSink {
        async fn render(&self, view: &SectionView, _origin: DataOrigin) -> Result<()> {
            self.sections.lock().unwrap().push(view.section());
            if self.fail {
                return Err(DashboardError::Render("table detached".to_string()));
            }
            Ok(())
        }
    }

    fn config(rate_ms: u64) -> DashboardConfig {
        DashboardConfig {
            demo_mode: true,
            refresh_rate: Duration::from_millis(rate_ms),
            ..DashboardConfig::default()
        }
    }

    fn setup(
        sink: Arc<CountingSink>,
        config: &DashboardConfig,
    ) -> (StateStore, AutoRefreshScheduler) {
        let store = StateStore::new(config.clone());
        let source = Arc::new(DataSource::new(Duration::from_secs(1)).unwrap());
        let dispatcher = Arc::new(SectionDispatcher::new(source, store.clone(), sink));
        (store, AutoRefreshScheduler::new(dispatcher))
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_keeps_single_timer() {
        let sink = Arc::new(CountingSink::default());
        let config = config(1000);
        let (_store, mut scheduler) = setup(sink.clone(), &config);

        scheduler.start(&config);
        scheduler.start(&config);
        assert_eq!(scheduler.state(), SchedulerState::Running(Duration::from_millis(1000)));

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_resumes_same_cadence() {
        let sink = Arc::new(CountingSink::default());
        let mut config = config(1000);
        let (_store, mut scheduler) = setup(sink.clone(), &config);

        scheduler.start(&config);
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(sink.count(), 2);

        config.auto_refresh = false;
        scheduler.reconfigure(&config);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(sink.count(), 2);

        config.auto_refresh = true;
        scheduler.reconfigure(&config);
        sleep(Duration::from_millis(3500)).await;
        assert_eq!(sink.count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_change_replaces_timer() {
        let sink = Arc::new(CountingSink::default());
        let mut config = config(1000);
        let (_store, mut scheduler) = setup(sink.clone(), &config);

        scheduler.start(&config);
        config.refresh_rate = Duration::from_millis(400);
        scheduler.reconfigure(&config);
        assert_eq!(scheduler.state(), SchedulerState::Running(Duration::from_millis(400)));

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(sink.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_use_current_section() {
        let sink = Arc::new(CountingSink::default());
        let config = config(1000);
        let (store, mut scheduler) = setup(sink.clone(), &config);

        scheduler.start(&config);
        sleep(Duration::from_millis(1500)).await;
        store.navigate(Section::Tools).await;
        sleep(Duration::from_millis(1000)).await;

        let sections = sink.sections.lock().unwrap().clone();
        assert_eq!(sections, vec![Section::Dashboard, Section::Tools]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_failures_do_not_stop_ticking() {
        let sink = Arc::new(CountingSink {
            fail: true,
            ..CountingSink::default()
        });
        let config = config(500);
        let (_store, mut scheduler) = setup(sink.clone(), &config);

        scheduler.start(&config);
        sleep(Duration::from_millis(1750)).await;
        assert_eq!(sink.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_and_stop() {
        let sink = Arc::new(CountingSink::default());
        let mut config = config(1000);
        config.auto_refresh = false;
        let (_store, mut scheduler) = setup(sink.clone(), &config);

        scheduler.start(&config);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        // Stopping an idle scheduler is a no-op
        scheduler.stop();
        scheduler.stop();

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test]
    async fn test_stop_lets_in_flight_cycle_finish() {
        let mock_server = MockServer::start().await;
        let body = serde_json::to_value(crate::mock::metrics()).unwrap();

        Mock::given(method("GET"))
            .and(path("/api/metrics"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let sink = Arc::new(CountingSink::default());
        let mut config = DashboardConfig {
            endpoint: mock_server.uri(),
            refresh_rate: Duration::from_millis(200),
            ..DashboardConfig::default()
        };
        let store = StateStore::new(config.clone());
        let source = Arc::new(DataSource::new(Duration::from_secs(2)).unwrap());
        let dispatcher = Arc::new(SectionDispatcher::new(
            Arc::clone(&source),
            store.clone(),
            sink.clone(),
        ));
        let mut scheduler = AutoRefreshScheduler::new(dispatcher);

        scheduler.start(&config);
        // First tick fires at 200ms; its fetch is still waiting on the server
        sleep(Duration::from_millis(350)).await;
        config.auto_refresh = false;
        scheduler.reconfigure(&config);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(sink.count(), 1);
        assert_eq!(source.stats().await.live, 1);
        assert!(store.cache().await.metrics.is_some());
    }
}
