use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long a success modal stays up before dismissing itself. Error and
/// info modals wait for the operator.
pub const SUCCESS_DISMISS: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalKind {
    Success,
    Error,
    Info,
}

/// A user-facing notification. Every workflow outcome the operator must see
/// goes through one of these.
#[derive(Clone, Debug)]
pub struct Modal {
    pub kind: ModalKind,
    pub message: String,
    pub auto_dismiss: Option<Duration>,
}

impl Modal {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Success,
            message: message.into(),
            auto_dismiss: Some(SUCCESS_DISMISS),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Error,
            message: message.into(),
            auto_dismiss: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Info,
            message: message.into(),
            auto_dismiss: None,
        }
    }
}

/// Presentation seam between the workflow and whatever front end hosts it.
/// The console implements this in the binary; tests use a recording impl.
pub trait Shell: Send + Sync {
    fn present(&self, modal: Modal);

    /// Ask the operator to confirm an irreversible action.
    fn confirm(&self, prompt: &str) -> bool;

    /// Called on busy-indicator transitions: `true` when the first request
    /// starts, `false` when the last one finishes.
    fn busy_changed(&self, busy: bool);
}

/// Explicit UI-state store. The busy indicator is shared by every in-flight
/// request; `begin_request` hands out a guard whose drop is the release, so
/// the indicator cannot leak on any exit path.
pub struct UiState {
    shell: Arc<dyn Shell>,
    in_flight: AtomicUsize,
}

impl UiState {
    pub fn new(shell: Arc<dyn Shell>) -> Arc<Self> {
        Arc::new(Self {
            shell,
            in_flight: AtomicUsize::new(0),
        })
    }

    pub fn begin_request(&self) -> BusyGuard<'_> {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.shell.busy_changed(true);
        }
        BusyGuard { ui: self }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn success(&self, message: impl Into<String>) {
        self.shell.present(Modal::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.shell.present(Modal::error(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.shell.present(Modal::info(message));
    }

    pub fn confirm(&self, prompt: &str) -> bool {
        self.shell.confirm(prompt)
    }
}

/// Scoped hold on the busy indicator. Overlapping requests nest; the
/// indicator clears when the last guard drops.
pub struct BusyGuard<'a> {
    ui: &'a UiState,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.ui.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.ui.shell.busy_changed(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingShell {
        transitions: Mutex<Vec<bool>>,
    }

    impl Shell for RecordingShell {
        fn present(&self, _modal: Modal) {}

        fn confirm(&self, _prompt: &str) -> bool {
            true
        }

        fn busy_changed(&self, busy: bool) {
            self.transitions.lock().push(busy);
        }
    }

    #[test]
    fn success_modal_auto_dismisses() {
        let modal = Modal::success("done");
        assert_eq!(modal.kind, ModalKind::Success);
        assert_eq!(modal.auto_dismiss, Some(SUCCESS_DISMISS));
    }

    #[test]
    fn error_and_info_modals_wait() {
        assert_eq!(Modal::error("bad").auto_dismiss, None);
        assert_eq!(Modal::info("fyi").auto_dismiss, None);
    }

    #[test]
    fn guard_release_clears_busy() {
        let shell = Arc::new(RecordingShell::default());
        let ui = UiState::new(shell.clone());

        {
            let _guard = ui.begin_request();
            assert!(ui.is_busy());
        }
        assert!(!ui.is_busy());
        assert_eq!(*shell.transitions.lock(), vec![true, false]);
    }

    #[test]
    fn overlapping_requests_share_the_indicator() {
        let shell = Arc::new(RecordingShell::default());
        let ui = UiState::new(shell.clone());

        let first = ui.begin_request();
        let second = ui.begin_request();
        drop(first);
        // Still busy: the second request is in flight.
        assert!(ui.is_busy());
        drop(second);
        assert!(!ui.is_busy());
        assert_eq!(*shell.transitions.lock(), vec![true, false]);
    }
}
