//! Customer records as produced by the cleaning pipeline
//!
//! A [`Record`] owns its addresses and custom fields outright. During a batch
//! run each record is handed to exactly one worker, which mutates the statuses,
//! remote identifiers and error messages of the record subtree in place.

use super::status::UploadStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote identifier assigned by the customer-management API
pub type RemoteId = i64;

/// Category code the remote API expects for an address.
///
/// The code is derived from the address position inside its record: the
/// first three addresses map to home, work and other, every later address is
/// filed under other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LocationType {
    #[default]
    Home,
    Work,
    Other,
}

impl LocationType {
    /// Location type for the address at `position` (zero based)
    pub fn from_position(position: usize) -> Self {
        match position {
            0 => Self::Home,
            1 => Self::Work,
            _ => Self::Other,
        }
    }

    /// Numeric code sent on the wire
    pub fn code(&self) -> u8 {
        match self {
            Self::Home => 0,
            Self::Work => 1,
            Self::Other => 2,
        }
    }
}

impl TryFrom<u8> for LocationType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Home),
            1 => Ok(Self::Work),
            2 => Ok(Self::Other),
            other => Err(format!("invalid location type code {}", other)),
        }
    }
}

impl From<LocationType> for u8 {
    fn from(value: LocationType) -> Self {
        value.code()
    }
}

/// One address of a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Free-text address line
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// House or unit number
    pub house_no: String,
    /// Category code, rewritten from the address position on upload
    #[serde(default)]
    pub loc_type: LocationType,
    /// Remote identifier, `None` until created
    #[serde(default)]
    pub id: Option<RemoteId>,
    #[serde(default)]
    pub upload_status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Address {
    pub fn new(
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
        house_no: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            latitude,
            longitude,
            house_no: house_no.into(),
            loc_type: LocationType::default(),
            id: None,
            upload_status: UploadStatus::Unset,
            error_message: None,
        }
    }

    /// Whether the remote API already holds this address
    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }
}

/// Extra customer attribute attached through a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub app_side: i64,
    pub data: String,
    pub input: String,
    pub data_type: String,
    pub display_name: String,
    pub label: String,
    pub required: i64,
    pub value: String,
    pub template_id: String,
    pub is_new: bool,
    #[serde(default)]
    pub id: Option<RemoteId>,
    #[serde(default)]
    pub upload_status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CustomField {
    /// Text field with the given label and value
    pub fn text(label: impl Into<String>, value: impl Into<String>, template_id: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            app_side: 0,
            data: String::new(),
            input: "text".to_string(),
            data_type: "Text".to_string(),
            display_name: label.clone(),
            label,
            required: 0,
            value: value.into(),
            template_id: template_id.into(),
            is_new: true,
            id: None,
            upload_status: UploadStatus::Unset,
            error_message: None,
        }
    }

    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }
}

/// A customer awaiting creation in the remote system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Document id, sent as the initial password and used as correlation key
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_no: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub custom_fields: Option<Vec<CustomField>>,
    #[serde(default)]
    pub upload_status: UploadStatus,
    /// Remote customer identifier, `None` until the user is created
    #[serde(default)]
    pub customer_id: Option<RemoteId>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Record {
    pub fn new(
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone_no: None,
            addresses: Vec::new(),
            custom_fields: None,
            upload_status: UploadStatus::Unset,
            customer_id: None,
            error_message: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone_no: impl Into<String>) -> Self {
        self.phone_no = Some(phone_no.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.addresses.push(address);
        self
    }

    pub fn with_custom_field(mut self, field: CustomField) -> Self {
        self.custom_fields.get_or_insert_with(Vec::new).push(field);
        self
    }

    /// Name as the remote API expects it on addresses
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the remote API already holds this customer
    pub fn is_created(&self) -> bool {
        self.customer_id.is_some()
    }

    /// Custom fields, empty when the record carries none
    pub fn custom_fields(&self) -> &[CustomField] {
        self.custom_fields.as_deref().unwrap_or_default()
    }

    /// Whether at least one address or custom field is held remotely
    pub fn any_sub_entity_created(&self) -> bool {
        self.addresses
            .iter()
            .any(|a| a.upload_status == UploadStatus::Success)
            || self
                .custom_fields()
                .iter()
                .any(|f| f.upload_status == UploadStatus::Success)
    }

    /// Starts a new pass over this record
    pub fn begin(&mut self) {
        self.upload_status = UploadStatus::Processing;
        self.error_message = None;
    }

    /// Moves the record to a terminal status, keeping the pass monotonic.
    ///
    /// Returns `false` and leaves the record unchanged when the record already
    /// reached a different terminal status in this pass.
    pub fn finish(&mut self, status: UploadStatus, error_message: Option<String>) -> bool {
        if !self.upload_status.can_transition_to(status) {
            return false;
        }
        self.upload_status = status;
        if error_message.is_some() {
            self.error_message = error_message;
        }
        true
    }
}

/// Log label for a record; never includes the document id
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.email, &self.phone_no) {
            (Some(email), _) => write!(f, "{}", email),
            (None, Some(phone)) => write!(f, "{} ({})", self.full_name(), phone),
            (None, None) => write!(f, "{}", self.full_name()),
        }
    }
}
