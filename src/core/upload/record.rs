//! Per-record upload state machine
//!
//! ```text
//! unset -> processing -> failed                       (user step failed)
//!                     -> success | partial | failed    (after sub-entities)
//! ```
//!
//! The user step short-circuits: addresses and custom fields are never sent
//! for a record without a remote customer id. Sub-entity failures stay local
//! to the sub-entity and the loop moves on to the next one.

use crate::core::transport::{CustomerApi, NewAddress, NewCustomField, NewCustomer};
use crate::core::types::{LocationType, Record, RemoteId, UploadStatus};
use std::fmt;
use tracing::{debug, error, info, warn};

pub(crate) const PARTIAL_MESSAGE: &str =
    "User created, but one or more addresses/custom fields failed";
pub(crate) const ALL_SUB_ENTITIES_FAILED_MESSAGE: &str =
    "User created, but every address/custom field failed";

/// Accumulated outcome of one sub-entity step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Entities skipped because they already carry a remote id
    pub skipped: usize,
}

impl StepOutcome {
    /// True when no attempt failed; vacuously true for an empty step
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} created, {} failed, {} already created",
            self.succeeded, self.attempted, self.failed, self.skipped
        )
    }
}

/// Drives one record through user, address and custom field creation
pub struct RecordUploader<'a, A: CustomerApi + ?Sized> {
    api: &'a A,
    upload_custom_fields: bool,
}

impl<'a, A: CustomerApi + ?Sized> RecordUploader<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            upload_custom_fields: false,
        }
    }

    /// Post custom fields instead of leaving them untouched
    pub fn with_custom_fields(mut self, enabled: bool) -> Self {
        self.upload_custom_fields = enabled;
        self
    }

    /// Runs the full sequence and returns the record's final status.
    ///
    /// A record that already carries a customer id is left untouched.
    pub async fn upload(&self, record: &mut Record) -> UploadStatus {
        if record.is_created() {
            debug!(record = %record, "Record already processed, skipping");
            return record.upload_status;
        }

        info!(record = %record, "Processing record");
        record.begin();

        let customer_id = match self.create_user(record).await {
            Ok(id) => id,
            Err(message) => {
                error!(record = %record, "User creation failed; skipping addresses and custom fields");
                record.finish(UploadStatus::Failed, Some(message));
                return record.upload_status;
            }
        };
        record.customer_id = Some(customer_id);

        let addresses = self.create_addresses(record, customer_id).await;
        let fields = self.create_custom_fields(record, customer_id).await;

        finalize(record, addresses, fields)
    }

    /// Step 1: creates the customer and returns its id, or the message to
    /// store on the record
    async fn create_user(&self, record: &Record) -> Result<RemoteId, String> {
        let payload = NewCustomer {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone_no: record.phone_no.clone(),
            password: record.password.clone(),
        };

        match self.api.create_customer(&payload).await {
            Ok(id) => {
                info!(record = %record, customer_id = id, "Customer created");
                Ok(id)
            }
            Err(e) => {
                error!(record = %record, kind = e.kind(), "Failed to create customer: {}", e);
                Err(format!("User creation failed: {}", e))
            }
        }
    }

    /// Step 2: creates every address that has no remote id yet
    async fn create_addresses(&self, record: &mut Record, customer_id: RemoteId) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if record.addresses.is_empty() {
            debug!(record = %record, "No addresses to upload");
            return outcome;
        }

        let label = record.to_string();
        let name = record.full_name();
        let email = record.email.clone();
        let phone_no = record.phone_no.clone();
        let total = record.addresses.len();
        info!(record = %label, count = total, "Uploading addresses");

        for (index, address) in record.addresses.iter_mut().enumerate() {
            if address.is_created() {
                debug!(record = %label, "Address {}/{} already created", index + 1, total);
                outcome.skipped += 1;
                continue;
            }

            address.upload_status = UploadStatus::Processing;
            address.loc_type = LocationType::from_position(index);

            let payload = NewAddress {
                customer_id,
                name: name.clone(),
                email: email.clone(),
                phone_no: phone_no.clone(),
                address: address.address.clone(),
                house_no: address.house_no.clone(),
                latitude: address.latitude,
                longitude: address.longitude,
                loc_type: address.loc_type,
            };

            match self.api.create_address(&payload).await {
                Ok(id) => {
                    address.id = Some(id);
                    address.upload_status = UploadStatus::Success;
                    address.error_message = None;
                    outcome.record_success();
                    debug!(record = %label, address_id = id, "Address {}/{} created", index + 1, total);
                }
                Err(e) => {
                    address.upload_status = UploadStatus::Failed;
                    address.error_message = Some(e.to_string());
                    outcome.record_failure();
                    error!(
                        record = %label,
                        customer_id,
                        kind = e.kind(),
                        "Failed to create address {}/{}: {}",
                        index + 1,
                        total,
                        e
                    );
                }
            }
        }

        if outcome.all_succeeded() {
            info!(
                record = %label,
                created = outcome.succeeded,
                already_created = outcome.skipped,
                "All addresses processed successfully"
            );
        } else {
            warn!(record = %label, failed = outcome.failed, "One or more addresses failed to upload");
        }
        outcome
    }

    /// Step 3: creates custom fields when enabled; otherwise reports success
    /// and leaves the fields as they are
    async fn create_custom_fields(&self, record: &mut Record, customer_id: RemoteId) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if !self.upload_custom_fields {
            debug!(record = %record, "Custom field upload disabled");
            return outcome;
        }

        let label = record.to_string();
        let Some(fields) = record.custom_fields.as_mut().filter(|f| !f.is_empty()) else {
            debug!(record = %label, "No custom fields to upload");
            return outcome;
        };

        for field in fields.iter_mut() {
            if field.is_created() {
                outcome.skipped += 1;
                continue;
            }

            field.upload_status = UploadStatus::Processing;
            let payload = NewCustomField {
                customer_id,
                label: field.label.clone(),
                display_name: field.display_name.clone(),
                data_type: field.data_type.clone(),
                value: field.value.clone(),
                data: field.data.clone(),
                input: field.input.clone(),
                app_side: field.app_side,
                required: field.required,
                template_id: field.template_id.clone(),
                is_new: field.is_new,
            };

            match self.api.create_custom_field(&payload).await {
                Ok(id) => {
                    field.id = Some(id);
                    field.upload_status = UploadStatus::Success;
                    field.error_message = None;
                    outcome.record_success();
                    debug!(record = %label, field = %field.label, "Custom field created");
                }
                Err(e) => {
                    field.upload_status = UploadStatus::Failed;
                    field.error_message = Some(e.to_string());
                    outcome.record_failure();
                    error!(
                        record = %label,
                        field = %field.label,
                        kind = e.kind(),
                        "Failed to create custom field: {}",
                        e
                    );
                }
            }
        }

        if !outcome.all_succeeded() {
            warn!(record = %label, failed = outcome.failed, "One or more custom fields failed to upload");
        }
        outcome
    }
}

/// Step 4: derives the record status from the sub-entity outcomes
fn finalize(record: &mut Record, addresses: StepOutcome, fields: StepOutcome) -> UploadStatus {
    debug!(
        record = %record,
        addresses = %addresses,
        custom_fields = %fields,
        "Sub-entity steps finished"
    );
    let (status, message) = if addresses.all_succeeded() && fields.all_succeeded() {
        (UploadStatus::Success, None)
    } else if record.any_sub_entity_created() {
        (UploadStatus::Partial, Some(PARTIAL_MESSAGE.to_string()))
    } else {
        (
            UploadStatus::Failed,
            Some(ALL_SUB_ENTITIES_FAILED_MESSAGE.to_string()),
        )
    };

    if !record.finish(status, message) {
        warn!(
            record = %record,
            current = %record.upload_status,
            attempted = %status,
            "Refusing to regress terminal status"
        );
    }

    match record.upload_status {
        UploadStatus::Success => info!(record = %record, "Record processed successfully"),
        UploadStatus::Partial => warn!(record = %record, "Record partially processed; see sub-entity statuses"),
        _ => error!(record = %record, "Record failed after user creation"),
    }
    record.upload_status
}
