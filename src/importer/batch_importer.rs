// ==========================================
// Appliance Registry - Batch importer
// ==========================================
// Responsibility: run several entity imports against one workbook
// Flow: open workbook → per request: resolve kind → resolve sheet
//       → read rows → reconcile
// Rule: a failing entity becomes a zero-count result carrying the
// error; the remaining requests still run. Only a workbook that
// cannot be opened fails the whole batch.
// ==========================================

use crate::config::ImportSettings;
use crate::domain::import::{EntityRequest, ImportSummary};
use crate::importer::entity_registry::EntityKind;
use crate::importer::error::ImportResult;
use crate::importer::reconciler::ImportReconciler;
use crate::importer::sheet_reader::Workbook;
use crate::importer::staged_upload::StagedUpload;
use crate::repository::DocumentStore;
use std::path::Path;
use tracing::{error, info, instrument, warn};

// ==========================================
// BatchImporter
// ==========================================
pub struct BatchImporter<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    settings: ImportSettings,
}

impl<'a, S: DocumentStore + ?Sized> BatchImporter<'a, S> {
    pub fn new(store: &'a S, settings: ImportSettings) -> Self {
        Self { store, settings }
    }

    /// Imports `requests` from the workbook at `file_path`
    ///
    /// # Returns
    /// - Ok(Vec<ImportSummary>): one summary per request, in request order
    /// - Err: the workbook could not be opened
    #[instrument(skip(self, file_path, requests), fields(file = %file_path.as_ref().display(), entities = requests.len()))]
    pub async fn import_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        requests: &[EntityRequest],
    ) -> ImportResult<Vec<ImportSummary>> {
        let mut workbook = Workbook::open(file_path.as_ref()).map_err(|e| {
            error!(error = %e, "workbook could not be opened");
            e
        })?;
        Ok(self.import_workbook(&mut workbook, requests).await)
    }

    /// Runs the batch against a staged upload, then removes the staged file
    #[instrument(skip(self, upload, requests), fields(upload = %upload.original_name(), size = upload.size()))]
    pub async fn import_staged(
        &self,
        upload: StagedUpload,
        requests: &[EntityRequest],
    ) -> ImportResult<Vec<ImportSummary>> {
        let result = self.import_file(upload.path(), requests).await;

        if self.settings.keep_staged_files {
            match upload.keep() {
                Ok(path) => info!(file = %path.display(), "staged upload kept"),
                Err(e) => warn!(error = %e, "staged upload could not be kept"),
            }
        } else if let Err(e) = upload.close() {
            warn!(error = %e, "staged upload not removed");
        }

        result
    }

    /// Imports `requests` from an already-open workbook
    pub async fn import_workbook(
        &self,
        workbook: &mut Workbook,
        requests: &[EntityRequest],
    ) -> Vec<ImportSummary> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let summary = match self.import_entity(workbook, request).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(entity = %request.entity_type, error = %e, "entity import failed");
                    let label = EntityKind::parse(&request.entity_type)
                        .map_or(request.entity_type.as_str(), |kind| kind.collection_name());
                    ImportSummary::failed(label, e.to_string())
                }
            };
            results.push(summary);
        }

        info!(
            entities = results.len(),
            inserted = results.iter().map(|r| r.inserted).sum::<usize>(),
            updated = results.iter().map(|r| r.updated).sum::<usize>(),
            skipped = results.iter().map(|r| r.skipped).sum::<usize>(),
            "batch import finished"
        );
        results
    }

    async fn import_entity(
        &self,
        workbook: &mut Workbook,
        request: &EntityRequest,
    ) -> ImportResult<ImportSummary> {
        let kind: EntityKind = request.entity_type.parse()?;
        let sheet_name = self.resolve_sheet(workbook, kind, request);
        info!(entity = %kind, sheet = sheet_name.as_deref().unwrap_or("<first>"), "importing entity");

        let rows = workbook.read_rows(sheet_name.as_deref())?;
        Ok(ImportReconciler::new(self.store)
            .verbose(self.settings.verbose)
            .reconcile(kind, &rows)
            .await)
    }

    /// Request sheet → configured override → registry default
    ///
    /// A single-sheet workbook (e.g. a CSV file) without the default
    /// sheet name is read as its only sheet when nothing was named
    /// explicitly.
    fn resolve_sheet(&self, workbook: &Workbook, kind: EntityKind, request: &EntityRequest) -> Option<String> {
        if let Some(name) = request.sheet_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return Some(name.to_string());
        }
        if let Some(name) = self.settings.sheet_override(kind) {
            return Some(name.to_string());
        }

        let default = kind.default_sheet_name();
        if !workbook.has_sheet(default) && workbook.sheet_names().len() == 1 {
            return None;
        }
        Some(default.to_string())
    }
}

/// Imports with default settings
pub async fn import_batch<S, P>(
    store: &S,
    file_path: P,
    requests: &[EntityRequest],
) -> ImportResult<Vec<ImportSummary>>
where
    S: DocumentStore + ?Sized,
    P: AsRef<Path>,
{
    BatchImporter::new(store, ImportSettings::default())
        .import_file(file_path, requests)
        .await
}

/// Parses `entity[:sheet]` request arguments
pub fn parse_requests<I, T>(args: I) -> Vec<EntityRequest>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    args.into_iter()
        .map(|arg| match arg.as_ref().split_once(':') {
            Some((entity, sheet)) => EntityRequest::with_sheet(entity.trim(), sheet.trim()),
            None => EntityRequest::new(arg.as_ref().trim()),
        })
        .collect()
}
