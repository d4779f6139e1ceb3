use crate::core::contact::{validate_contact, ContactInfo};
use crate::core::defaults::{self, ServiceDraft};
use crate::core::mutation::{self, SelectionAction};
use crate::core::summary::{self, ServiceSummary};
use crate::domain::catalog::CatalogIndex;
use crate::domain::model::{DeliveryReceipt, OutboundMessage};
use crate::domain::ports::DeliveryAdapter;
use crate::domain::selection::SelectionModel;
use crate::utils::error::{IntakeError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Default)]
struct SessionState {
    current: Arc<SelectionModel>,
    history: Vec<Arc<SelectionModel>>,
}

/// Single owner of the selection for one browsing session.
///
/// Every change goes through the pure mutation functions; the session only
/// swaps in the returned model. Snapshots are `Arc`s, so callers can tell
/// whether anything changed with [`Arc::ptr_eq`].
pub struct SelectionSession {
    index: Arc<CatalogIndex>,
    state: Mutex<SessionState>,
    history_limit: usize,
    busy: AtomicBool,
}

impl SelectionSession {
    pub fn new(index: Arc<CatalogIndex>) -> Self {
        Self {
            index,
            state: Mutex::new(SessionState::default()),
            history_limit: DEFAULT_HISTORY_LIMIT,
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn snapshot(&self) -> Arc<SelectionModel> {
        Arc::clone(&self.lock().current)
    }

    pub fn dispatch(&self, action: &SelectionAction) -> Arc<SelectionModel> {
        tracing::debug!(?action, "dispatch");
        self.commit(|model| mutation::apply(model, action))
    }

    /// Selects a service with its default features. Unknown ids are still
    /// selected, without defaults.
    pub fn quick_add(&self, service_id: &str) -> Arc<SelectionModel> {
        let index = Arc::clone(&self.index);
        self.commit(|model| match index.service(service_id) {
            Some(service) => defaults::quick_add(model, service),
            None if model.is_service_selected(service_id) => model.clone(),
            None => {
                tracing::warn!(
                    service = service_id,
                    "quick add for a service missing from the catalog"
                );
                mutation::toggle_service(model, service_id)
            }
        })
    }

    /// Applies a draft for a catalog service; unknown services are ignored.
    pub fn apply_draft(&self, service_id: &str, draft: &ServiceDraft) -> Arc<SelectionModel> {
        let index = Arc::clone(&self.index);
        self.commit(|model| match index.service(service_id) {
            Some(service) => defaults::reconcile(model, service, draft),
            None => model.clone(),
        })
    }

    pub fn draft_for(&self, service_id: &str) -> Option<ServiceDraft> {
        let service = self.index.service(service_id)?;
        Some(ServiceDraft::from_selection(&self.snapshot(), service))
    }

    /// Restores the model in place before the last effective change.
    pub fn undo(&self) -> bool {
        let mut state = self.lock();
        match state.history.pop() {
            Some(previous) => {
                state.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.lock().history.is_empty()
    }

    pub fn reset(&self) {
        let mut state = self.lock();
        state.current = Arc::new(SelectionModel::new());
        state.history.clear();
    }

    pub fn summaries(&self) -> Vec<ServiceSummary> {
        summary::serialize(&self.snapshot(), &self.index)
    }

    pub fn render_text(&self, contact: &ContactInfo) -> String {
        summary::render_text(&self.snapshot(), &self.index, contact)
    }

    pub fn is_submitting(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Validates, renders and hands the request to `adapter`.
    ///
    /// Nothing is rendered when the contact details are invalid. After a
    /// confirmed delivery the sent part of the selection is discarded; a link
    /// hand-off keeps it because there is no way to know whether the message
    /// was sent.
    pub async fn submit(
        &self,
        adapter: &dyn DeliveryAdapter,
        contact: &ContactInfo,
    ) -> Result<DeliveryReceipt> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("submit ignored, another submission is pending");
            return Err(IntakeError::SubmissionInProgress);
        }
        let _busy = BusyGuard(&self.busy);

        let report = validate_contact(contact);
        if !report.valid {
            tracing::info!("contact validation failed: {}", report.summary());
            return Err(IntakeError::ValidationFailed(report));
        }

        let model = self.snapshot();
        let summaries = summary::serialize(&model, &self.index);
        if summaries.is_empty() {
            return Err(IntakeError::NoServicesSelected);
        }

        let message = OutboundMessage {
            requester: contact.name.clone(),
            text: summary::render_message(&summaries, contact),
            service_count: summaries.len(),
        };
        tracing::info!(
            requester = %message.requester,
            services = message.service_count,
            "submitting service request"
        );

        let receipt = adapter.deliver(&message).await?;

        if receipt.is_confirmed() {
            self.settle_after_delivery(&model);
        }
        Ok(receipt)
    }

    /// Drops what was delivered. Services edited or added while the request
    /// was pending stay selected.
    fn settle_after_delivery(&self, sent: &Arc<SelectionModel>) {
        let mut state = self.lock();
        if Arc::ptr_eq(sent, &state.current) {
            tracing::info!("submission confirmed, clearing selection");
            state.current = Arc::new(SelectionModel::new());
            state.history.clear();
            return;
        }

        let mut remaining = state.current.as_ref().clone();
        remaining
            .selected_services
            .retain(|s| sent.service(&s.id) != Some(s));
        tracing::info!(
            kept = remaining.len(),
            "submission confirmed, keeping services changed while it was pending"
        );
        state.current = Arc::new(remaining);
        state.history.clear();
    }

    fn commit(
        &self,
        change: impl FnOnce(&SelectionModel) -> SelectionModel,
    ) -> Arc<SelectionModel> {
        let mut state = self.lock();
        let next = change(state.current.as_ref());

        if next == *state.current {
            return Arc::clone(&state.current);
        }

        let previous = std::mem::replace(&mut state.current, Arc::new(next));
        state.history.push(previous);
        if state.history.len() > self.history_limit {
            let overflow = state.history.len() - self.history_limit;
            state.history.drain(..overflow);
        }
        Arc::clone(&state.current)
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
