use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use estoque_client::StoreClient;
use estoque_core::errors::ValidationError;
use estoque_core::forms::{CountForm, ProductForm};
use estoque_core::lookup::LookupContext;
use estoque_core::types::{Count, CountPatch, CountReceipt, CountRow, Product, Summary};

use crate::error::WorkflowError;
use crate::ui::{Shell, UiState};
use crate::views::Versioned;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Xlsx => "Excel",
        }
    }
}

/// The count-taking workflow: product registry, lookup context, count
/// recorder, and summary view, all speaking to the store through the
/// injected client. Sequencing rules live here; presentation goes through
/// the shell; the store owns persistence and aggregation.
pub struct Workflow {
    store: Arc<dyn StoreClient>,
    ui: Arc<UiState>,
    output_dir: PathBuf,
    lookup: Mutex<LookupContext>,
    count_form: Mutex<CountForm>,
    products: Versioned<Vec<Product>>,
    counts: Versioned<Vec<Count>>,
    summary: Versioned<Option<Summary>>,
}

impl Workflow {
    pub fn new(
        store: Arc<dyn StoreClient>,
        shell: Arc<dyn Shell>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            ui: UiState::new(shell),
            output_dir: output_dir.into(),
            lookup: Mutex::new(LookupContext::default()),
            count_form: Mutex::new(CountForm::default()),
            products: Versioned::default(),
            counts: Versioned::default(),
            summary: Versioned::new(None),
        }
    }

    /// Initial load of every listing, as on page entry.
    pub async fn start(&self) {
        self.reload_products().await;
        self.reload_counts().await;
        self.reload_summary().await;
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.get()
    }

    pub fn counts(&self) -> Vec<Count> {
        self.counts.get()
    }

    pub fn summary(&self) -> Option<Summary> {
        self.summary.get()
    }

    pub fn resolved_product(&self) -> Option<Product> {
        self.lookup.lock().product().cloned()
    }

    pub fn count_form(&self) -> CountForm {
        self.count_form.lock().clone()
    }

    // ---- product registry ----

    /// Register a product and refresh the listing. The form is cleared only
    /// on success.
    pub async fn register_product(&self, form: &mut ProductForm) -> bool {
        match self.try_register(form).await {
            Ok(_) => {
                self.ui.success("product registered");
                form.clear();
                self.reload_products().await;
                true
            }
            Err(e) => {
                self.ui.error(format!("failed to register product: {e}"));
                false
            }
        }
    }

    async fn try_register(&self, form: &ProductForm) -> Result<Product, WorkflowError> {
        let new = form.validate()?;
        let _busy = self.ui.begin_request();
        Ok(self.store.create_product(&new).await?)
    }

    pub async fn update_product(&self, id: i64, form: &ProductForm) -> bool {
        let update = match form.validate() {
            Ok(update) => update,
            Err(e) => {
                self.ui.error(e.to_string());
                return false;
            }
        };
        let result = {
            let _busy = self.ui.begin_request();
            self.store.update_product(id, &update).await
        };
        match result {
            Ok(_) => {
                self.ui.success("product updated");
                // codigo and nome are embedded in the other views too.
                self.reload_products().await;
                self.reload_counts().await;
                self.reload_summary().await;
                true
            }
            Err(e) => {
                self.ui.error(format!("failed to update product: {e}"));
                false
            }
        }
    }

    /// Delete a product after interactive confirmation. Cascades on the
    /// store side, so counts and summary must be refreshed along with the
    /// product listing.
    pub async fn delete_product(&self, id: i64) {
        if !self
            .ui
            .confirm("Delete this product? All of its counts will be deleted as well.")
        {
            return;
        }
        let result = {
            let _busy = self.ui.begin_request();
            self.store.delete_product(id).await
        };
        match result {
            Ok(_) => {
                self.ui.success("product deleted");
                self.reload_products().await;
                self.reload_counts().await;
                self.reload_summary().await;
            }
            Err(e) => self.ui.error(format!("failed to delete product: {e}")),
        }
    }

    // ---- lookup ----

    /// Resolve a product by code. Success replaces the lookup context and
    /// resets any in-progress count entry; a failed lookup empties the
    /// context. An empty input is a validation error and leaves the context
    /// as it was.
    pub async fn resolve_product(&self, codigo: &str) {
        let codigo = codigo.trim();
        if codigo.is_empty() {
            self.ui.error(ValidationError::MissingLookupCode.to_string());
            return;
        }
        let result = {
            let _busy = self.ui.begin_request();
            self.store.product_by_code(codigo).await
        };
        match result {
            Ok(product) => {
                self.count_form.lock().clear();
                self.lookup.lock().resolve_succeeded(product);
            }
            Err(e) => {
                self.lookup.lock().resolve_failed();
                self.ui.error(format!("product not found: {e}"));
            }
        }
    }

    // ---- count recorder ----

    /// Stage the count entry fields. Raw input; parsing happens on submit.
    pub fn stage_count(&self, lote: &str, validade_mes: &str, validade_ano: &str, quantidade: &str) {
        let mut form = self.count_form.lock();
        form.lote = lote.to_owned();
        form.validade_mes = validade_mes.to_owned();
        form.validade_ano = validade_ano.to_owned();
        form.quantidade = quantidade.to_owned();
    }

    /// Submit the staged count against the resolved product. The store's
    /// confirmation message is surfaced verbatim; on failure both the form
    /// and the lookup context are left untouched.
    pub async fn submit_count(&self) -> bool {
        match self.try_submit_count().await {
            Ok(receipt) => {
                self.ui.success(receipt.mensagem);
                self.count_form.lock().clear();
                self.reload_counts().await;
                self.reload_summary().await;
                true
            }
            Err(e) => {
                self.ui.error(format!("failed to record count: {e}"));
                false
            }
        }
    }

    async fn try_submit_count(&self) -> Result<CountReceipt, WorkflowError> {
        let produto = self
            .lookup
            .lock()
            .product()
            .cloned()
            .ok_or(WorkflowError::NoProductResolved)?;
        let new = self.count_form.lock().validate(&produto.codigo)?;
        let _busy = self.ui.begin_request();
        Ok(self.store.create_count(&new).await?)
    }

    pub async fn update_count(&self, id: i64, patch: &CountPatch) -> bool {
        let result = {
            let _busy = self.ui.begin_request();
            self.store.update_count(id, patch).await
        };
        match result {
            Ok(_) => {
                self.ui.success("count updated");
                self.reload_counts().await;
                self.reload_summary().await;
                true
            }
            Err(e) => {
                self.ui.error(format!("failed to update count: {e}"));
                false
            }
        }
    }

    /// Delete a count after confirmation. Never touches the product
    /// listing: removing a count cannot invalidate a product.
    pub async fn delete_count(&self, id: i64) {
        if !self.ui.confirm("Delete this count?") {
            return;
        }
        let result = {
            let _busy = self.ui.begin_request();
            self.store.delete_count(id).await
        };
        match result {
            Ok(_) => {
                self.ui.success("count deleted");
                self.reload_counts().await;
                self.reload_summary().await;
            }
            Err(e) => self.ui.error(format!("failed to delete count: {e}")),
        }
    }

    /// One-off query listing the counts of a single product.
    pub async fn counts_for_product(&self, codigo: &str) -> Option<Vec<CountRow>> {
        let codigo = codigo.trim();
        if codigo.is_empty() {
            self.ui.error(ValidationError::MissingLookupCode.to_string());
            return None;
        }
        let result = {
            let _busy = self.ui.begin_request();
            self.store.counts_for_product(codigo).await
        };
        match result {
            Ok(rows) => Some(rows),
            Err(e) => {
                self.ui.error(format!("failed to load counts for {codigo}: {e}"));
                None
            }
        }
    }

    // ---- listings ----

    pub async fn reload_products(&self) {
        let stamp = self.products.begin();
        let _busy = self.ui.begin_request();
        match self.store.list_products().await {
            Ok(list) => {
                if !self.products.publish(stamp, list) {
                    tracing::debug!("stale product listing discarded");
                }
            }
            // Listing failures are logged only; the previous rendering
            // stands and the operator is not interrupted.
            Err(e) => tracing::warn!(error = %e, kind = e.error_kind(), "failed to load products"),
        }
    }

    pub async fn reload_counts(&self) {
        let stamp = self.counts.begin();
        let _busy = self.ui.begin_request();
        match self.store.list_counts().await {
            Ok(list) => {
                if !self.counts.publish(stamp, list) {
                    tracing::debug!("stale count listing discarded");
                }
            }
            Err(e) => tracing::warn!(error = %e, kind = e.error_kind(), "failed to load counts"),
        }
    }

    // ---- summary view ----

    pub async fn reload_summary(&self) {
        let stamp = self.summary.begin();
        let _busy = self.ui.begin_request();
        match self.store.summary().await {
            Ok(summary) => {
                if !self.summary.publish(stamp, Some(summary)) {
                    tracing::debug!("stale summary discarded");
                }
            }
            Err(e) => tracing::warn!(error = %e, kind = e.error_kind(), "failed to load summary"),
        }
    }

    pub async fn export_pdf(&self) -> Option<PathBuf> {
        self.export_report(ReportFormat::Pdf).await
    }

    pub async fn export_xlsx(&self) -> Option<PathBuf> {
        self.export_report(ReportFormat::Xlsx).await
    }

    /// Fetch a rendered report and write it next to the operator. The file
    /// name carries the completion date, not any date embedded in the data.
    pub async fn export_report(&self, format: ReportFormat) -> Option<PathBuf> {
        let fetched = {
            let _busy = self.ui.begin_request();
            match format {
                ReportFormat::Pdf => self.store.report_pdf().await,
                ReportFormat::Xlsx => self.store.report_xlsx().await,
            }
        };
        let payload = match fetched {
            Ok(payload) => payload,
            Err(e) => {
                self.ui
                    .error(format!("failed to generate {} report: {e}", format.label()));
                return None;
            }
        };

        let name = format!(
            "relatorio_estoque_{}.{}",
            Local::now().format("%Y-%m-%d"),
            format.extension()
        );
        let path = self.output_dir.join(name);
        match tokio::fs::write(&path, &payload).await {
            Ok(()) => {
                self.ui.success(format!(
                    "{} report saved to {}",
                    format.label(),
                    path.display()
                ));
                Some(path)
            }
            Err(e) => {
                self.ui
                    .error(format!("failed to save {} report: {e}", format.label()));
                None
            }
        }
    }

    // ---- import (placeholder) ----

    pub fn download_template(&self) {
        self.ui.info("feature not implemented yet");
    }

    pub fn import_products(&self) {
        self.ui.info("feature not implemented yet");
    }
}
