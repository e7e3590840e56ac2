//! Core HealthMonitor implementation

use crate::config::MonitorConfig;
use crate::utils::error::{MonitorError, Result};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{debug, info};

use super::alerts::{
    MemoryReclaimer, NotificationChannel, RecoveryActions, RecoveryCoordinator, WebhookChannel,
};
use super::collaborators::{
    DatabaseHandle, DependentService, ErrorStatsSource, HttpService, NoErrorStats,
};
use super::events::EventBus;
use super::health::{HealthChecker, HealthProbe, ProbeContext, builtin_probes};
use super::metrics::{MetricsCollector, ResourceSampler, default_sampler};
use super::types::{AlertEvent, AlertLevel, HealthCheck, HealthState, ProbeName, SystemMetrics};

/// Snapshots returned by `get_metrics` when no limit is given
pub const DEFAULT_METRICS_LIMIT: usize = 10;

static GLOBAL: OnceCell<HealthMonitor> = OnceCell::new();

/// Periodic in-process health supervisor
///
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct HealthMonitor {
    /// Monitor configuration
    pub(super) config: Arc<MonitorConfig>,
    /// Probe list and registry
    pub(super) health: Arc<HealthChecker>,
    /// Snapshot buffer
    pub(super) metrics: Arc<MetricsCollector>,
    /// Cooldown map
    pub(super) recovery: Arc<RecoveryCoordinator>,
    pub(super) recovery_actions: Arc<RecoveryActions>,
    pub(super) events: EventBus,
    pub(super) notifier: Option<Arc<dyn NotificationChannel>>,
    pub(super) running: Arc<AtomicBool>,
    /// Dropped by `stop` to end the tasks armed by the matching `start`;
    /// `running` only changes while this lock is held
    pub(super) shutdown: Arc<Mutex<Option<watch::Sender<()>>>>,
    pub(super) start_time: Instant,
}

impl HealthMonitor {
    /// Monitor with default collaborators and the services listed in `config`
    pub fn new(config: MonitorConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: MonitorConfig) -> HealthMonitorBuilder {
        HealthMonitorBuilder::new(config)
    }

    /// Process-wide instance, created on first call
    ///
    /// The first caller's configuration wins; later ones are ignored.
    pub fn global(config: Option<MonitorConfig>) -> Result<&'static HealthMonitor> {
        if let Some(monitor) = GLOBAL.get() {
            if config.as_ref().is_some_and(|c| c != monitor.config()) {
                debug!("Global health monitor already initialized, ignoring new configuration");
            }
            return Ok(monitor);
        }

        GLOBAL.get_or_try_init(|| Self::new(config.unwrap_or_default()))
    }

    /// Start the monitor
    ///
    /// Runs one health-check cycle and one metrics collection before
    /// returning, then arms both periodic tasks. No-op while running.
    pub async fn start(&self) {
        // Flag and sender change under one lock
        let shutdown_rx = {
            let mut shutdown = self.shutdown.lock();
            if self.running.swap(true, Ordering::AcqRel) {
                debug!("Health monitor already running");
                return;
            }
            let (shutdown_tx, shutdown_rx) = watch::channel(());
            *shutdown = Some(shutdown_tx);
            shutdown_rx
        };

        info!(
            health_check_interval_ms = self.config.health_check_interval_ms,
            metrics_interval_ms = self.config.metrics_interval_ms,
            "Starting health monitor"
        );

        // Subscribed before the first pass so its alerts are delivered too
        self.spawn_notifier(shutdown_rx.clone());

        self.run_health_cycle().await;
        self.collect_metrics();

        self.start_background_tasks(shutdown_rx);

        info!("Health monitor started");
    }

    /// Stop the monitor
    ///
    /// Prevents further ticks; a tick already in progress runs to completion.
    pub fn stop(&self) {
        {
            let mut shutdown = self.shutdown.lock();
            if !self.running.swap(false, Ordering::AcqRel) {
                debug!("Health monitor not running");
                return;
            }
            shutdown.take();
        }
        info!("Health monitor stopped");
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Copy of the latest result per probe
    pub fn get_health_status(&self) -> BTreeMap<ProbeName, HealthCheck> {
        self.health.snapshot()
    }

    /// Most recent snapshots, oldest to newest
    pub fn get_metrics(&self, limit: Option<usize>) -> Vec<SystemMetrics> {
        self.metrics.recent(limit.unwrap_or(DEFAULT_METRICS_LIMIT))
    }

    /// Highest severity across the registry
    pub fn get_overall_health(&self) -> HealthState {
        self.health.registry().read().overall(self.config.stale_after())
    }

    pub fn is_healthy(&self) -> bool {
        self.get_overall_health() == HealthState::Healthy
    }

    /// Probes whose latest result is older than the staleness window
    ///
    /// Always empty unless `stale_after_cycles` is configured.
    pub fn stale_checks(&self) -> Vec<ProbeName> {
        match self.config.stale_after() {
            Some(max_age) => self.health.registry().read().stale(max_age),
            None => Vec::new(),
        }
    }

    /// Consecutive failures of probes that are currently failing
    pub fn probe_failures(&self) -> HashMap<ProbeName, u32> {
        self.health.failures()
    }

    /// Last recovery attempt per probe
    pub fn recovery_attempts(&self) -> HashMap<ProbeName, Instant> {
        self.recovery.attempts()
    }

    /// Record a request served by the host, for the performance figures
    pub fn record_request(&self, duration: Duration, success: bool) {
        self.metrics.record_request(duration, success);
    }

    pub fn subscribe_health_checks(&self) -> broadcast::Receiver<HealthCheck> {
        self.events.subscribe_health_checks()
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<AlertEvent> {
        self.events.subscribe_alerts()
    }

    pub fn subscribe_metrics(&self) -> broadcast::Receiver<SystemMetrics> {
        self.events.subscribe_metrics()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Time since the monitor was created
    ///
    /// Probes and snapshots report this as uptime. For the bundled binary
    /// the monitor is built at process start, so the two coincide.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Builder wiring collaborators into a `HealthMonitor`
pub struct HealthMonitorBuilder {
    config: MonitorConfig,
    sampler: Option<Arc<dyn ResourceSampler>>,
    database: Option<Arc<dyn DatabaseHandle>>,
    services: Vec<Arc<dyn DependentService>>,
    error_stats: Option<Arc<dyn ErrorStatsSource>>,
    reclaimer: Option<MemoryReclaimer>,
    probes: Option<Vec<Box<dyn HealthProbe>>>,
    notifier: Option<Arc<dyn NotificationChannel>>,
}

impl HealthMonitorBuilder {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            sampler: None,
            database: None,
            services: Vec::new(),
            error_stats: None,
            reclaimer: None,
            probes: None,
            notifier: None,
        }
    }

    pub fn sampler(mut self, sampler: Arc<dyn ResourceSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn database(mut self, database: Arc<dyn DatabaseHandle>) -> Self {
        self.database = Some(database);
        self
    }

    /// Add a dependent service next to those declared in the configuration
    pub fn service(mut self, service: Arc<dyn DependentService>) -> Self {
        self.services.push(service);
        self
    }

    pub fn error_stats(mut self, source: Arc<dyn ErrorStatsSource>) -> Self {
        self.error_stats = Some(source);
        self
    }

    pub fn memory_reclaimer(mut self, reclaimer: MemoryReclaimer) -> Self {
        self.reclaimer = Some(reclaimer);
        self
    }

    /// Replace the built-in probe list; probes run in the given order
    pub fn probes(mut self, probes: Vec<Box<dyn HealthProbe>>) -> Self {
        self.probes = Some(probes);
        self
    }

    /// Deliver alerts through this channel instead of the configured webhook
    pub fn notifier(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.notifier = Some(channel);
        self
    }

    pub fn build(self) -> Result<HealthMonitor> {
        info!("Initializing health monitor");

        let config = self.config.validated()?;

        let probe_timeout = config.probe_timeout();
        let mut services: Vec<Arc<dyn DependentService>> = config
            .services
            .iter()
            .map(|endpoint| {
                Arc::new(HttpService::from_endpoint(endpoint, probe_timeout))
                    as Arc<dyn DependentService>
            })
            .collect();
        services.extend(self.services);

        let mut names = HashSet::new();
        if let Some(duplicate) = services.iter().find(|s| !names.insert(s.name().to_string())) {
            return Err(MonitorError::config(format!(
                "Duplicate service name '{}'",
                duplicate.name()
            )));
        }

        let sampler = self.sampler.unwrap_or_else(default_sampler);
        let error_stats = self
            .error_stats
            .unwrap_or_else(|| Arc::new(NoErrorStats) as Arc<dyn ErrorStatsSource>);
        let start_time = Instant::now();

        let context = ProbeContext {
            thresholds: config.alert_thresholds.clone(),
            started_at: start_time,
            sampler: sampler.clone(),
            database: self.database.clone(),
            services: services.clone(),
            error_stats: error_stats.clone(),
        };

        let notifier = match self.notifier {
            Some(channel) => Some(channel),
            None if config.enable_notifications => config.notification_endpoint.as_ref().map(
                |url| {
                    Arc::new(WebhookChannel::new(url.clone(), AlertLevel::Warning))
                        as Arc<dyn NotificationChannel>
                },
            ),
            None => None,
        };

        let monitor = HealthMonitor {
            health: Arc::new(HealthChecker::new(
                self.probes.unwrap_or_else(builtin_probes),
                context,
                probe_timeout,
            )),
            metrics: Arc::new(MetricsCollector::new(sampler, error_stats)),
            recovery: Arc::new(RecoveryCoordinator::new(config.recovery_timeout())),
            recovery_actions: Arc::new(RecoveryActions {
                database: self.database,
                services,
                reclaimer: self.reclaimer,
            }),
            events: EventBus::default(),
            notifier,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Mutex::new(None)),
            start_time,
            config: Arc::new(config),
        };

        info!("Health monitor initialized successfully");
        Ok(monitor)
    }
}
