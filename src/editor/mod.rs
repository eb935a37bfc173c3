//! # Product Editor
//!
//! Creates or edits one product and, on create, records its initial price.
//!
//! ## Submission flow
//!
//! 1. Validate the draft. A blank required field stops here with no remote call.
//! 2. `insert(product, ..)` in create mode, `update_by_key(product, code, ..)` in edit mode.
//! 3. Create mode only: `insert(pricehist, { prodcode, effdate: today, unitprice })`, sent
//!    only after step 2 succeeded.
//! 4. One [`Notice`] goes out. On success `on_saved` runs, then `on_close`.
//!
//! A failure in step 3 leaves the product committed. Set
//! [`EditorConfig::compensate_failed_create`] to delete it again in that case.
//!
//! ## Concurrency
//!
//! [`ProductEditor::submit`] takes `&self` and refuses to run twice at once: a second call
//! while one is validating or saving returns [`EditorError::Busy`]. The state lock is never
//! held across an `.await`.

pub mod error;
pub mod form;
pub mod notice;
pub mod state;
pub mod validation;

pub use crate::config::EditorConfig;
pub use error::{EditorError, ValidationError};
pub use form::{FieldView, FormView};
pub use notice::{notice_channel, Notice, NoticeKind, NoticeReceiver, NoticeSender};
pub use state::{EditorMode, EditorState, SaveStage};
pub use validation::{validate, ValidatedDraft};

use crate::model::{Field, FormDraft, PriceHistoryEntry, Product, ProductCode};
use crate::service::{Collection, DataService, ServiceError};
use chrono::{NaiveDate, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

pub type Callback = Box<dyn Fn() + Send + Sync>;
pub type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// What the container hands to the editor.
pub struct EditorProps {
    pub is_open: bool,
    pub existing: Option<Product>,
    pub on_close: Callback,
    pub on_saved: Callback,
}

impl EditorProps {
    /// An open editor with no-op callbacks. `None` means create mode.
    pub fn new(existing: Option<Product>) -> Self {
        Self {
            is_open: true,
            existing,
            on_close: Box::new(|| {}),
            on_saved: Box::new(|| {}),
        }
    }

    pub fn open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    pub fn on_close(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Box::new(callback);
        self
    }

    pub fn on_saved(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_saved = Box::new(callback);
        self
    }
}

struct EditorInner {
    open: bool,
    draft: FormDraft,
    state: EditorState,
}

pub struct ProductEditor {
    service: Arc<dyn DataService>,
    notices: NoticeSender,
    config: EditorConfig,
    clock: Clock,
    mode: EditorMode,
    on_close: Callback,
    on_saved: Callback,
    inner: Mutex<EditorInner>,
}

impl ProductEditor {
    pub fn new(props: EditorProps, service: Arc<dyn DataService>, notices: NoticeSender) -> Self {
        let mode = EditorMode::from_existing(props.existing);
        let inner = EditorInner {
            open: props.is_open,
            draft: seed_draft(&mode),
            state: EditorState::Idle,
        };

        Self {
            service,
            notices,
            config: EditorConfig::default(),
            clock: Box::new(|| Utc::now().date_naive()),
            mode,
            on_close: props.on_close,
            on_saved: props.on_saved,
            inner: Mutex::new(inner),
        }
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the source of the price-history `effdate`. Defaults to today in UTC.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn state(&self) -> EditorState {
        self.lock().state
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn draft(&self) -> FormDraft {
        self.lock().draft.clone()
    }

    pub fn form(&self) -> FormView {
        let inner = self.lock();
        FormView::build(&self.mode, &inner.draft, inner.state)
    }

    /// Updates one draft field.
    ///
    /// In edit mode the code is read-only and the price input does not exist.
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> Result<(), EditorError> {
        if !self.mode.is_create() {
            match field {
                Field::Code => return Err(EditorError::FieldLocked(field)),
                Field::UnitPrice => return Err(EditorError::FieldHidden(field)),
                Field::Description | Field::Unit => {}
            }
        }

        let mut inner = self.lock();
        if !inner.open {
            return Err(EditorError::Closed);
        }
        inner.draft.set(field, value);
        Ok(())
    }

    /// Container-driven open flag. Opening starts over from a fresh draft.
    pub fn set_open(&self, open: bool) {
        let mut inner = self.lock();
        if open && !inner.open {
            inner.draft = seed_draft(&self.mode);
            // An in-flight save keeps its state until it finishes.
            if !inner.state.is_busy() {
                inner.state = EditorState::Idle;
            }
        }
        inner.open = open;
        debug!(open, "Editor visibility changed");
    }

    /// Discards the draft and asks the container to close. Sends nothing.
    ///
    /// A save already in flight still runs to completion.
    pub fn cancel(&self) {
        self.close();
        info!("Editor cancelled");
        (self.on_close)();
    }

    /// Validates the draft and writes it through the data service.
    ///
    /// Sends exactly one notice for every call that gets past the open/busy checks.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub async fn submit(&self) -> Result<(), EditorError> {
        let draft = {
            let mut inner = self.lock();
            if !inner.open {
                return Err(EditorError::Closed);
            }
            if inner.state.is_busy() {
                warn!(state = ?inner.state, "Submission already in progress");
                return Err(EditorError::Busy);
            }
            inner.state = EditorState::Validating;
            inner.draft.clone()
        };
        let _guard = SubmitGuard { inner: &self.inner };

        let validated = match validate(&draft, &self.mode) {
            Ok(validated) => validated,
            Err(e) => {
                debug!(error = %e, "Draft rejected");
                self.set_state(EditorState::Idle);
                notice::publish(&self.notices, Notice::error(e.to_string()));
                return Err(e.into());
            }
        };

        match self.save(validated).await {
            Ok(()) => {
                self.set_state(EditorState::Succeeded);
                notice::publish(&self.notices, Notice::success(self.success_message()));
                self.close();
                (self.on_saved)();
                (self.on_close)();
                Ok(())
            }
            Err(e) => {
                if let EditorError::SaveFailed { stage, .. } = &e {
                    self.set_state(EditorState::Failed(*stage));
                }
                notice::publish(&self.notices, Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    async fn save(&self, draft: ValidatedDraft) -> Result<(), EditorError> {
        let code = draft.product.code.clone();

        self.set_state(EditorState::Saving(SaveStage::ProductWrite));
        let record = serde_json::to_value(&draft.product)
            .map_err(|e| save_failed(SaveStage::ProductWrite, e.into()))?;
        let written = match &self.mode {
            EditorMode::Create => self.service.insert(Collection::Product, record).await,
            EditorMode::Edit(existing) => {
                self.service
                    .update_by_key(Collection::Product, existing.code.as_str(), record)
                    .await
            }
        };
        if let Err(source) = written {
            warn!(%code, error = %source, "Product write failed");
            return Err(save_failed(SaveStage::ProductWrite, source));
        }
        info!(%code, "Product saved");

        // Edits never touch price.
        let Some(unit_price) = draft.unit_price else {
            return Ok(());
        };

        self.set_state(EditorState::Saving(SaveStage::PriceHistoryWrite));
        let entry = PriceHistoryEntry::new(code.clone(), (self.clock)(), unit_price);
        let record = serde_json::to_value(&entry)
            .map_err(|e| save_failed(SaveStage::PriceHistoryWrite, e.into()))?;
        if let Err(source) = self.service.insert(Collection::PriceHistory, record).await {
            warn!(%code, error = %source, "Price history write failed, product stays committed");
            let rolled_back = self.compensate(&code).await;
            return Err(EditorError::SaveFailed {
                stage: SaveStage::PriceHistoryWrite,
                source,
                rolled_back,
            });
        }
        info!(%code, effdate = %entry.effective_date, "Initial price recorded");
        Ok(())
    }

    /// Deletes the product a failed create left behind, when configured to.
    async fn compensate(&self, code: &ProductCode) -> bool {
        if !self.config.compensate_failed_create {
            return false;
        }
        match self
            .service
            .delete_by_key(Collection::Product, code.as_str())
            .await
        {
            Ok(()) => {
                info!(%code, "Rolled back product insert");
                true
            }
            Err(e) => {
                warn!(%code, error = %e, "Rollback of product insert failed");
                false
            }
        }
    }

    fn success_message(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Product added successfully",
            EditorMode::Edit(_) => "Product updated successfully",
        }
    }

    fn close(&self) {
        let mut inner = self.lock();
        inner.open = false;
        inner.draft = seed_draft(&self.mode);
    }

    fn set_state(&self, state: EditorState) {
        self.lock().state = state;
    }

    fn lock(&self) -> MutexGuard<'_, EditorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn seed_draft(mode: &EditorMode) -> FormDraft {
    match mode.existing() {
        Some(product) => FormDraft::from_product(product),
        None => FormDraft::default(),
    }
}

fn save_failed(stage: SaveStage, source: ServiceError) -> EditorError {
    EditorError::SaveFailed {
        stage,
        source,
        rolled_back: false,
    }
}

/// Returns the editor to `Idle` if a submission is dropped mid-flight.
struct SubmitGuard<'a> {
    inner: &'a Mutex<EditorInner>,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.state.is_busy() {
            inner.state = EditorState::Idle;
        }
    }
}
