use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use validator::Validate;

/// Lifecycle status of an import application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "DRAFT",
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    /// Approval decisions an administrator may record.
    pub fn is_decision(&self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(ApplicationStatus::Draft),
            "SUBMITTED" => Ok(ApplicationStatus::Submitted),
            "APPROVED" => Ok(ApplicationStatus::Approved),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            _ => Err(format!("Unknown application status: {}", s)),
        }
    }
}

/// An application to import a drone into the country.
///
/// Every applicant-supplied field is optional so that incomplete drafts can
/// be saved; the validation rules only apply once `submitted` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportDroneApplication {
    pub id: Option<String>,
    pub applicant_id: Option<i64>,
    pub status: Option<ApplicationStatus>,
    /// Input-only flag: the applicant wants this save to be a submission.
    #[serde(skip_serializing)]
    pub submitted: bool,

    // Applicant
    #[validate(required, length(min = 1))]
    pub applicant_name: Option<String>,
    #[validate(required, email)]
    pub applicant_email: Option<String>,
    #[validate(required, length(min = 6, max = 20))]
    pub applicant_phone: Option<String>,
    #[validate(required, length(min = 1))]
    pub applicant_nationality: Option<String>,
    pub applicant_address: Option<String>,

    // Drone
    #[validate(required, length(min = 1))]
    pub manufacturer: Option<String>,
    pub manufacturer_address: Option<String>,
    pub manufacturer_nationality: Option<String>,
    #[validate(required, length(min = 1))]
    pub model_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub serial_number: Option<String>,
    #[validate(required, range(min = 1900, max = 2100))]
    pub year_of_manufacture: Option<i32>,
    pub wing_type: Option<String>,
    #[validate(required, range(exclusive_min = 0.0))]
    pub max_take_off_weight: Option<f64>,
    pub max_height_attainable: Option<f64>,
    pub compatible_payload: Option<String>,
    pub drone_category_type: Option<String>,
    pub purpose_of_operation: Option<String>,
    pub engine_type: Option<String>,
    pub engine_power: Option<f64>,
    pub engine_count: Option<u32>,
    pub fuel_capacity: Option<f64>,
    pub propeller_details: Option<String>,
    pub max_endurance: Option<f64>,
    pub max_range: Option<f64>,
    pub max_speed: Option<f64>,
    pub max_height_of_operation: Option<f64>,
    pub length: Option<f64>,
    pub breadth: Option<f64>,
    pub height: Option<f64>,
    pub has_gnss: Option<bool>,
    pub has_flight_controller: Option<bool>,

    // Import
    pub seller_name: Option<String>,
    pub seller_address: Option<String>,
    pub seller_nationality: Option<String>,
    pub port_of_embarkation: Option<String>,
    pub port_of_disembarkation: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: Option<u32>,

    pub security_clearance_doc_name: Option<String>,

    // Bookkeeping
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub submitted_date: Option<DateTime<Utc>>,

    // Approval
    pub approver: Option<String>,
    pub approver_id: Option<i64>,
    pub approver_comments: Option<String>,
    pub approved_date: Option<DateTime<Utc>>,
}

impl ImportDroneApplication {
    /// Only drafts (including legacy records without a status) can be edited.
    pub fn can_be_modified(&self) -> bool {
        matches!(self.status, None | Some(ApplicationStatus::Draft))
    }

    /// Drafts are never shown to administrators.
    pub fn is_draft(&self) -> bool {
        matches!(self.status, None | Some(ApplicationStatus::Draft))
    }

    /// Copy the applicant-editable fields from `other`, leaving identity,
    /// bookkeeping, status, and approval data untouched.
    pub fn merge_editable_fields(&mut self, other: ImportDroneApplication) {
        self.applicant_name = other.applicant_name;
        self.applicant_email = other.applicant_email;
        self.applicant_phone = other.applicant_phone;
        self.applicant_nationality = other.applicant_nationality;
        self.applicant_address = other.applicant_address;
        self.manufacturer = other.manufacturer;
        self.manufacturer_address = other.manufacturer_address;
        self.manufacturer_nationality = other.manufacturer_nationality;
        self.model_name = other.model_name;
        self.serial_number = other.serial_number;
        self.year_of_manufacture = other.year_of_manufacture;
        self.wing_type = other.wing_type;
        self.max_take_off_weight = other.max_take_off_weight;
        self.max_height_attainable = other.max_height_attainable;
        self.compatible_payload = other.compatible_payload;
        self.drone_category_type = other.drone_category_type;
        self.purpose_of_operation = other.purpose_of_operation;
        self.engine_type = other.engine_type;
        self.engine_power = other.engine_power;
        self.engine_count = other.engine_count;
        self.fuel_capacity = other.fuel_capacity;
        self.propeller_details = other.propeller_details;
        self.max_endurance = other.max_endurance;
        self.max_range = other.max_range;
        self.max_speed = other.max_speed;
        self.max_height_of_operation = other.max_height_of_operation;
        self.length = other.length;
        self.breadth = other.breadth;
        self.height = other.height;
        self.has_gnss = other.has_gnss;
        self.has_flight_controller = other.has_flight_controller;
        self.seller_name = other.seller_name;
        self.seller_address = other.seller_address;
        self.seller_nationality = other.seller_nationality;
        self.port_of_embarkation = other.port_of_embarkation;
        self.port_of_disembarkation = other.port_of_disembarkation;
        self.quantity = other.quantity;
    }
}

/// An administrator's decision on a submitted application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    /// Target application; the path id is used when absent.
    #[serde(default)]
    pub application_form_id: Option<String>,
    pub status: ApplicationStatus,
    #[validate(length(min = 1, max = 2000))]
    pub approver_comments: String,
}

/// A file attached to an update request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A stored document returned for download.
#[derive(Debug, Clone, PartialEq)]
pub struct FileResource {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Metadata recorded after a document is written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub file_name: String,
    pub size: u64,
    /// SHA-256 of the document bytes
    pub checksum: String,
}

/// Compute a SHA-256 hash of a byte slice, returned as 64-char hex.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
