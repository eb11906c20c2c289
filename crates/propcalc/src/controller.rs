//! Comparison controller.
//!
//! Owns the scenario store, reads the form through a [`FormBridge`], keeps a
//! debounced live preview of the form's metrics, and turns user-triggered
//! failures into [`Notification`]s. Hosts create it with [`new`] and release
//! it with [`teardown`].
//!
//! [`new`]: ComparisonController::new
//! [`teardown`]: ComparisonController::teardown

use std::time::Duration;

use jiff::Timestamp;
use propcalc_core::debounce::Debouncer;
use propcalc_core::export::{ComparisonExport, export_file_name, to_csv};
use propcalc_core::{
    Comparison, Persistence, ScenarioId, ScenarioResults, ScenarioStore, StoreError, formulas,
    validation,
};
use web_time::Instant;

use crate::bridge::{ComparisonView, FormBridge};
use crate::config::AppConfig;
use crate::notification::{Notification, NotificationLevel};

/// Metrics of the form as currently typed
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Nothing entered yet
    Empty,
    Ready(ScenarioResults),
    /// The form does not produce metrics; the message says why
    Invalid(String),
}

/// A rendered export ready to be written or downloaded
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

pub struct ComparisonController<P: Persistence, F: FormBridge> {
    store: ScenarioStore<P>,
    form: F,
    debouncer: Debouncer,
    notification_ttl: Duration,
    notification: Option<Notification>,
    preview: Preview,
    comparison: Option<Comparison>,
    clear_pending: bool,
    persistence_warned: bool,
}

impl<P: Persistence, F: FormBridge> ComparisonController<P, F> {
    pub fn new(persistence: P, form: F, config: &AppConfig) -> Self {
        let store = ScenarioStore::open(persistence, config.store_config());
        let mut controller = Self {
            store,
            form,
            debouncer: Debouncer::new(config.debounce()),
            notification_ttl: config.notification_ttl(),
            notification: None,
            preview: Preview::Empty,
            comparison: None,
            clear_pending: false,
            persistence_warned: false,
        };

        if controller.store.persistence_degraded() {
            controller.persistence_warned = true;
            controller.notify(
                NotificationLevel::Warning,
                "Saved scenarios could not be loaded; starting with an empty list",
            );
        }
        controller.refresh_comparison();
        controller.refresh_preview();
        tracing::info!(scenarios = controller.store.len(), "Comparison controller ready");
        controller
    }

    /// Flush pending writes and release the store
    pub fn teardown(mut self) {
        if let Err(e) = self.store.flush() {
            tracing::warn!(error = %e, "Failed to flush scenarios on shutdown");
        }
        tracing::debug!("Comparison controller torn down");
    }

    pub fn store(&self) -> &ScenarioStore<P> {
        &self.store
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Mutable form access. Call [`field_edited`](Self::field_edited) after
    /// changing it so the preview follows.
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    // ========================================================================
    // Scenario list
    // ========================================================================

    /// Capture the form as a new scenario. A blank `name` is auto-generated.
    pub fn add_current(&mut self, name: &str) -> Option<ScenarioId> {
        let calculator = self.form.calculator_type();
        let stored = self.store.list().first().map(|s| s.calculator_type);
        if let Some(stored) = stored.filter(|stored| *stored != calculator) {
            self.notify(
                NotificationLevel::Error,
                format!(
                    "The list holds {} scenarios; clear it before comparing {}",
                    stored.label(),
                    calculator.label()
                ),
            );
            return None;
        }

        let params = self.form.capture_current_params();
        let added = self
            .store
            .add(name, params, calculator)
            .map(|s| (s.id, s.name.clone()));

        match added {
            Ok((id, name)) => {
                self.notify(NotificationLevel::Success, format!("Added \"{name}\""));
                self.after_mutation();
                Some(id)
            }
            Err(e) => {
                let message = match &e {
                    StoreError::CapacityExceeded { .. } => {
                        format!("{e}; remove one to add another")
                    }
                    _ => e.to_string(),
                };
                tracing::debug!(error = %e, "Scenario rejected");
                self.notify(NotificationLevel::Error, message);
                None
            }
        }
    }

    pub fn remove(&mut self, id: ScenarioId) -> bool {
        match self.store.remove(id) {
            Some(removed) => {
                self.notify(
                    NotificationLevel::Info,
                    format!("Removed \"{}\"", removed.name),
                );
                self.after_mutation();
                true
            }
            None => false,
        }
    }

    /// Ask for confirmation before clearing. Returns whether a confirmation
    /// is now pending.
    pub fn request_clear(&mut self) -> bool {
        if self.store.is_empty() {
            self.notify(NotificationLevel::Info, "No scenarios to clear");
            return false;
        }
        self.clear_pending = true;
        true
    }

    pub fn clear_pending(&self) -> bool {
        self.clear_pending
    }

    pub fn confirm_clear(&mut self) {
        if !std::mem::take(&mut self.clear_pending) {
            return;
        }
        self.store.clear();
        self.notify(NotificationLevel::Info, "All scenarios removed");
        self.after_mutation();
    }

    pub fn cancel_clear(&mut self) {
        self.clear_pending = false;
    }

    fn after_mutation(&mut self) {
        if self.store.persistence_degraded() && !self.persistence_warned {
            self.persistence_warned = true;
            self.notify(
                NotificationLevel::Warning,
                "Scenarios could not be saved; changes last until you quit",
            );
        } else if !self.store.persistence_degraded() {
            self.persistence_warned = false;
        }
        self.refresh_comparison();
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    fn refresh_comparison(&mut self) {
        self.comparison = if self.store.can_compare() {
            match self.store.compare() {
                Ok(comparison) => Some(comparison),
                Err(e) => {
                    tracing::warn!(error = %e, "Comparison unavailable");
                    None
                }
            }
        } else {
            None
        };
    }

    /// Current comparison; `None` with fewer than two scenarios
    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    /// Push the current comparison to a view
    pub fn present<V: ComparisonView>(&self, mut view: V) {
        match &self.comparison {
            Some(comparison) => view.render_comparison(comparison),
            None => view.clear_comparison(),
        }
    }

    // ========================================================================
    // Live preview
    // ========================================================================

    /// Note a form edit; the preview recomputes once edits pause
    pub fn field_edited(&mut self, now: Instant) {
        self.debouncer.schedule(now);
    }

    /// Time until the next scheduled recompute, for event-loop timeouts
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    /// Advance timers. Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.debouncer.poll(now) {
            self.refresh_preview();
            changed = true;
        }
        if self
            .notification
            .as_ref()
            .is_some_and(|n| !n.is_active(now))
        {
            self.notification = None;
            changed = true;
        }
        changed
    }

    /// Recompute the preview immediately
    pub fn refresh_preview(&mut self) {
        self.debouncer.cancel();
        let calculator = self.form.calculator_type();
        let params = self.form.capture_current_params();

        self.preview = if params.is_empty() {
            Preview::Empty
        } else {
            let computed = validation::validate(calculator, &params)
                .map_err(StoreError::from)
                .and_then(|()| formulas::compute(calculator, &params).map_err(StoreError::from));
            match computed {
                Ok(results) => Preview::Ready(results),
                Err(e) => Preview::Invalid(e.to_string()),
            }
        };
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notification = Some(Notification::new(
            level,
            message,
            Instant::now(),
            self.notification_ttl,
        ));
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) -> bool {
        match self.notification.take() {
            Some(mut notification) => {
                notification.dismiss();
                true
            }
            None => false,
        }
    }

    /// Report the outcome of writing an export produced by this controller
    pub fn export_written(&mut self, location: &str) {
        self.notify(NotificationLevel::Success, format!("Exported to {location}"));
    }

    pub fn export_failed(&mut self, error: &dyn std::error::Error) {
        tracing::error!(error = %error, "Failed to write export");
        self.notify(NotificationLevel::Error, format!("Export failed: {error}"));
    }

    // ========================================================================
    // Exports
    // ========================================================================

    /// Every stored scenario plus a summary, as pretty JSON
    pub fn export_json(&mut self, at: Timestamp) -> Option<ExportFile> {
        if self.store.is_empty() {
            self.notify(NotificationLevel::Info, "Nothing to export yet");
            return None;
        }

        let export = ComparisonExport::new(self.store.list(), at);
        match export.to_json_pretty() {
            Ok(contents) => Some(ExportFile {
                file_name: export.file_name(),
                contents,
            }),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize export");
                self.notify(NotificationLevel::Error, "Export failed");
                None
            }
        }
    }

    /// The comparison table as CSV
    pub fn export_csv(&mut self, at: Timestamp) -> Option<ExportFile> {
        let Some(comparison) = &self.comparison else {
            self.notify(
                NotificationLevel::Info,
                "Add at least two scenarios to export a comparison",
            );
            return None;
        };

        Some(ExportFile {
            file_name: export_file_name(at, "csv"),
            contents: to_csv(comparison),
        })
    }
}

#[cfg(test)]
mod tests {
    use propcalc_core::{CalculatorType, MemoryPersistence};

    use super::*;
    use crate::form::FormState;

    #[derive(Default)]
    struct RecordingView {
        rendered: Option<Comparison>,
        cleared: usize,
    }

    impl ComparisonView for RecordingView {
        fn render_comparison(&mut self, comparison: &Comparison) {
            self.rendered = Some(comparison.clone());
        }

        fn clear_comparison(&mut self) {
            self.rendered = None;
            self.cleared += 1;
        }
    }

    type TestController<'a> = ComparisonController<&'a MemoryPersistence, FormState>;

    fn controller(backend: &MemoryPersistence) -> TestController<'_> {
        ComparisonController::new(backend, FormState::default(), &AppConfig::default())
    }

    fn fill_mortgage(controller: &mut TestController<'_>, rate: &str) {
        let form = controller.form_mut();
        form.set("loanAmount", "4 000 000");
        form.set("interestRate", rate);
        form.set("loanTerm", "20");
    }

    fn level(controller: &TestController<'_>) -> Option<NotificationLevel> {
        controller.notification().map(|n| n.level)
    }

    #[test]
    fn test_add_two_and_compare() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        let mut view = RecordingView::default();

        fill_mortgage(&mut controller, "13,5");
        controller.add_current("Market").unwrap();
        controller.present(&mut view);
        assert!(view.rendered.is_none());
        assert_eq!(view.cleared, 1);

        fill_mortgage(&mut controller, "6");
        controller.add_current("Family").unwrap();
        controller.present(&mut view);

        let comparison = view.rendered.unwrap();
        assert_eq!(
            comparison.table.row("monthlyPayment").unwrap().winner.name,
            "Family"
        );
        assert_eq!(level(&controller), Some(NotificationLevel::Success));
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn test_capacity_error_becomes_notification() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        fill_mortgage(&mut controller, "6");

        for _ in 0..3 {
            assert!(controller.add_current("").is_some());
        }
        assert_eq!(controller.add_current(""), None);
        assert_eq!(controller.store().len(), 3);

        let note = controller.notification().unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert!(note.message.contains("at most 3"));

        assert!(controller.dismiss_notification());
        assert!(controller.notification().is_none());
    }

    #[test]
    fn test_invalid_form_is_rejected_without_mutation() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        controller.form_mut().set("loanAmount", "1000");

        assert_eq!(controller.add_current("Broken"), None);
        assert!(controller.store().is_empty());
        assert!(
            controller
                .notification()
                .unwrap()
                .message
                .contains("'interestRate' is required")
        );
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_mixed_calculators_are_refused() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        fill_mortgage(&mut controller, "6");
        controller.add_current("Loan").unwrap();

        controller.form_mut().cycle_calculator();
        let form = controller.form_mut();
        form.set("propertyPrice", "10 000 000");
        form.set("monthlyRent", "50 000");

        assert_eq!(controller.add_current("Flat"), None);
        assert_eq!(controller.store().len(), 1);
        assert_eq!(level(&controller), Some(NotificationLevel::Error));
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);

        assert!(!controller.request_clear());
        fill_mortgage(&mut controller, "6");
        controller.add_current("").unwrap();
        controller.add_current("").unwrap();

        assert!(controller.request_clear());
        controller.cancel_clear();
        controller.confirm_clear();
        assert_eq!(controller.store().len(), 2);

        assert!(controller.request_clear());
        controller.confirm_clear();
        assert!(controller.store().is_empty());
        assert!(controller.comparison().is_none());
        assert!(!controller.clear_pending());
    }

    #[test]
    fn test_remove_drops_comparison_below_two() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        fill_mortgage(&mut controller, "6");
        let first = controller.add_current("").unwrap();
        controller.add_current("").unwrap();
        assert!(controller.comparison().is_some());

        assert!(controller.remove(first));
        assert!(!controller.remove(first));
        assert!(controller.comparison().is_none());
    }

    #[test]
    fn test_preview_is_debounced() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        let start = Instant::now();

        fill_mortgage(&mut controller, "6");
        controller.field_edited(start);
        assert_eq!(controller.preview(), &Preview::Empty);
        assert!(!controller.tick(start + Duration::from_millis(100)));

        controller.form_mut().set("interestRate", "13.5");
        controller.field_edited(start + Duration::from_millis(200));
        assert!(!controller.tick(start + Duration::from_millis(300)));
        assert!(controller.tick(start + Duration::from_millis(450)));

        let Preview::Ready(results) = controller.preview() else {
            panic!("expected metrics, got {:?}", controller.preview());
        };
        assert_eq!(results.calculator_type(), CalculatorType::Mortgage);
    }

    #[test]
    fn test_preview_reports_invalid_form() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        controller.form_mut().set("loanAmount", "-5");
        controller.refresh_preview();
        assert!(matches!(controller.preview(), Preview::Invalid(_)));
    }

    #[test]
    fn test_notifications_expire_on_tick() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        controller.request_clear();
        assert!(controller.notification().is_some());

        let later = Instant::now() + Duration::from_secs(60);
        assert!(controller.tick(later));
        assert!(controller.notification().is_none());
    }

    #[test]
    fn test_failed_writes_warn_once() {
        let backend = MemoryPersistence::new();
        backend.set_fail_writes(true);
        let mut controller = controller(&backend);
        fill_mortgage(&mut controller, "6");

        controller.add_current("").unwrap();
        assert_eq!(level(&controller), Some(NotificationLevel::Warning));
        controller.add_current("").unwrap();
        assert_eq!(level(&controller), Some(NotificationLevel::Success));
        assert_eq!(controller.store().len(), 2);
    }

    #[test]
    fn test_corrupt_storage_starts_empty_with_warning() {
        let backend = MemoryPersistence::with_contents("{not json");
        let controller = controller(&backend);
        assert!(controller.store().is_empty());
        assert_eq!(level(&controller), Some(NotificationLevel::Warning));
    }

    #[test]
    fn test_exports() {
        let backend = MemoryPersistence::new();
        let mut controller = controller(&backend);
        let at = Timestamp::from_second(1_735_689_600).unwrap();

        assert_eq!(controller.export_json(at), None);
        fill_mortgage(&mut controller, "6");
        controller.add_current("Only").unwrap();
        assert_eq!(controller.export_csv(at), None);

        let json = controller.export_json(at).unwrap();
        assert_eq!(json.file_name, "comparison-20250101T000000Z.json");
        assert!(json.contents.contains("\"scenarioCount\": 1"));

        controller.add_current("Second").unwrap();
        let csv = controller.export_csv(at).unwrap();
        assert_eq!(csv.file_name, "comparison-20250101T000000Z.csv");
        assert!(csv.contents.starts_with("Metric,Only,Second,"));
    }

    #[test]
    fn test_reload_restores_scenarios() {
        let backend = MemoryPersistence::new();
        {
            let mut controller = controller(&backend);
            fill_mortgage(&mut controller, "6");
            controller.add_current("Kept").unwrap();
            controller.teardown();
        }

        let controller = controller(&backend);
        assert_eq!(controller.store().list()[0].name, "Kept");
        assert!(controller.notification().is_none());
    }
}
