// ==========================================
// Appliance Registry - Import reconciler
// ==========================================
// Flow per row: transform → identity → lookup → update | insert
// Rule: a failing row (transform, identity or store) is recorded
// and skipped; the remaining rows still run
// Rule: updates never carry createdAt
// ==========================================

use crate::domain::document::{fields, str_field, Document, Filter};
use crate::domain::import::{ImportSummary, SheetRow};
use crate::importer::entity_registry::{EntityKind, KeySpec};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::DocumentStore;
use tracing::{debug, info, warn};

/// Outcome of a single upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Identity filter of a transformed document
///
/// Composite links use userId plus applianceId when present,
/// otherwise userId plus fuelId.
pub fn identity_filter(key_spec: KeySpec, doc: &Document) -> ImportResult<Filter> {
    match key_spec {
        KeySpec::Single(field) => {
            let key = str_field(doc, field).ok_or_else(|| ImportError::missing(field))?;
            Ok(Filter::new().eq(field, key))
        }
        KeySpec::Composite => {
            let user_id =
                str_field(doc, fields::USER_ID).ok_or_else(|| ImportError::missing(fields::USER_ID))?;
            let partner = [fields::APPLIANCE_ID, fields::FUEL_ID]
                .into_iter()
                .find_map(|field| str_field(doc, field).map(|value| (field, value)));
            match partner {
                Some((field, value)) => Ok(Filter::new().eq(fields::USER_ID, user_id).eq(field, value)),
                None => Err(ImportError::missing("applianceId/fuelId")),
            }
        }
    }
}

// ==========================================
// ImportReconciler
// ==========================================
pub struct ImportReconciler<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    verbose: bool,
}

impl<'a, S: DocumentStore + ?Sized> ImportReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            verbose: false,
        }
    }

    /// Log each written row at info instead of debug
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reconciles `rows` into the collection of `kind`, in order
    pub async fn reconcile(&self, kind: EntityKind, rows: &[SheetRow]) -> ImportSummary {
        let collection = kind.collection_name();
        let mut summary = ImportSummary::empty(collection);

        for row in rows {
            match self.reconcile_row(kind, row).await {
                Ok((outcome, filter)) => {
                    match outcome {
                        UpsertOutcome::Inserted => summary.inserted += 1,
                        UpsertOutcome::Updated => summary.updated += 1,
                    }
                    if self.verbose {
                        info!(collection, row = row.row_number, key = %filter, ?outcome, "row written");
                    } else {
                        debug!(collection, row = row.row_number, key = %filter, ?outcome, "row written");
                    }
                }
                Err(e) => {
                    warn!(collection, row = row.row_number, error = %e, "row skipped");
                    summary.skip(row.row_number, e.to_string());
                }
            }
        }

        info!(
            collection,
            inserted = summary.inserted,
            updated = summary.updated,
            skipped = summary.skipped,
            "collection reconciled"
        );
        summary
    }

    async fn reconcile_row(&self, kind: EntityKind, row: &SheetRow) -> ImportResult<(UpsertOutcome, Filter)> {
        let document = kind.transform(&row.values)?;
        let filter = identity_filter(kind.key_spec(), &document)?;
        let outcome = self.upsert(kind.collection_name(), &filter, document).await?;
        Ok((outcome, filter))
    }

    /// Updates the record matching `filter` (createdAt kept) or inserts it
    pub async fn upsert(
        &self,
        collection: &str,
        filter: &Filter,
        mut document: Document,
    ) -> ImportResult<UpsertOutcome> {
        match self.store.find_one(collection, filter).await? {
            Some(_) => {
                document.remove(fields::CREATED_AT);
                document.remove(fields::ID);
                self.store.update_fields(collection, filter, document).await?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                self.store.insert(collection, document).await?;
                Ok(UpsertOutcome::Inserted)
            }
        }
    }
}
