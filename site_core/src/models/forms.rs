//! Lead form models

use crate::validation::{
    validate_email_shape, validate_phone_shape, validate_required, Validatable, ValidationResult,
};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const SERVICE_TYPES: [&str; 5] = [
    "cloud-solutions",
    "ai-implementation",
    "software-development",
    "systems-integration",
    "strategy-consulting",
];

pub const CONSULTATION_TYPES: [&str; 3] = ["video-call", "phone-call", "in-person"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contact,
    Booking,
}

impl FormKind {
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            FormKind::Contact => "/BpsdynamicForm",
            FormKind::Booking => "/BookingForm",
        }
    }

    /// Tag the backend uses to attribute a lead to its form.
    pub fn source_tag(&self) -> &'static str {
        match self {
            FormKind::Contact => "website_contact_form",
            FormKind::Booking => "website_booking_form",
        }
    }

    pub fn default_success_message(&self) -> &'static str {
        match self {
            FormKind::Contact => {
                "Thank you for your message. We'll get back to you within 24 hours."
            }
            FormKind::Booking => {
                "Thank you for booking a consultation with us. We'll confirm your appointment shortly."
            }
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            FormKind::Contact => "Failed to submit form",
            FormKind::Booking => "Failed to submit booking",
        }
    }

    pub fn success_toast(&self) -> &'static str {
        match self {
            FormKind::Contact => "Message Sent!",
            FormKind::Booking => "Booking submitted successfully!",
        }
    }

    pub fn failure_toast(&self) -> &'static str {
        match self {
            FormKind::Contact => "Message could not be sent",
            FormKind::Booking => "Booking submission failed",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Contact => "contact",
            FormKind::Booking => "booking",
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_service_type(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || SERVICE_TYPES.contains(&value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("service"))
    }
}

fn validate_consultation_type(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || CONSULTATION_TYPES.contains(&value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("consultation_type"))
    }
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("date"))
    }
}

fn validate_time(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || NaiveTime::parse_from_str(value.trim(), "%H:%M").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("time"))
    }
}

/// Blank optional inputs are treated as absent.
fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn trimmed_optional(value: &Option<String>) -> Option<String> {
    value.clone().and_then(optional)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactSubmission {
    #[validate(custom(function = "validate_required", message = "Full name is required"))]
    pub full_name: String,

    #[validate(custom(function = "validate_required", message = "Email is required"))]
    #[validate(custom(function = "validate_email_shape", message = "Please enter a valid email address"))]
    pub email: String,

    #[serde(alias = "phoneNumber", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_phone_shape", message = "Please enter a valid phone number"))]
    pub phone: Option<String>,

    #[validate(custom(function = "validate_required", message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingSubmission {
    #[validate(custom(function = "validate_required", message = "Full name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_required", message = "Email is required"))]
    #[validate(custom(function = "validate_email_shape", message = "Please enter a valid email address"))]
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_phone_shape", message = "Please enter a valid phone number"))]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_service_type", message = "Please select a service from the list"))]
    pub service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_consultation_type", message = "Please select a consultation type from the list"))]
    pub consultation_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_date", message = "Preferred date must be in YYYY-MM-DD format"))]
    pub date_preference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_time", message = "Preferred time must be in HH:MM format"))]
    pub time_preference: Option<String>,

    #[validate(custom(function = "validate_required", message = "Message is required"))]
    pub message: String,
}

impl ContactSubmission {
    pub fn normalized(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: trimmed_optional(&self.phone),
            message: self.message.trim().to_string(),
        }
    }
}

impl BookingSubmission {
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: trimmed_optional(&self.phone),
            company: trimmed_optional(&self.company),
            service: trimmed_optional(&self.service),
            consultation_type: trimmed_optional(&self.consultation_type),
            date_preference: trimmed_optional(&self.date_preference),
            time_preference: trimmed_optional(&self.time_preference),
            message: self.message.trim().to_string(),
        }
    }
}

/// A submission of either lead form, as handed to the submission client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormSubmission {
    Contact(ContactSubmission),
    Booking(BookingSubmission),
}

impl FormSubmission {
    pub fn kind(&self) -> FormKind {
        match self {
            FormSubmission::Contact(_) => FormKind::Contact,
            FormSubmission::Booking(_) => FormKind::Booking,
        }
    }

    pub fn validate_fields(&self) -> ValidationResult {
        match self {
            FormSubmission::Contact(contact) => contact.validate_fields(),
            FormSubmission::Booking(booking) => booking.validate_fields(),
        }
    }

    /// JSON body for the backend: trimmed fields plus source tag and timestamp.
    pub fn to_payload(&self, submitted_at: DateTime<Utc>) -> serde_json::Result<serde_json::Value> {
        let mut payload = match self {
            FormSubmission::Contact(contact) => serde_json::to_value(contact.normalized())?,
            FormSubmission::Booking(booking) => serde_json::to_value(booking.normalized())?,
        };

        if let Some(object) = payload.as_object_mut() {
            object.insert(
                "source".to_string(),
                serde_json::Value::String(self.kind().source_tag().to_string()),
            );
            object.insert(
                "timestamp".to_string(),
                serde_json::Value::String(
                    submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                ),
            );
        }

        Ok(payload)
    }
}

impl From<ContactSubmission> for FormSubmission {
    fn from(contact: ContactSubmission) -> Self {
        FormSubmission::Contact(contact)
    }
}

impl From<BookingSubmission> for FormSubmission {
    fn from(booking: BookingSubmission) -> Self {
        FormSubmission::Booking(booking)
    }
}

/// Field state of one form instance, edited field by field.
pub trait FormFields: Default + Clone + Validatable + Send + Sync + 'static {
    const KIND: FormKind;

    /// Sets the field with the given wire name or alias and returns the
    /// field's canonical wire name, or `None` for unknown fields.
    fn set_field(&mut self, field: &str, value: String) -> Option<&'static str>;

    fn to_submission(&self) -> FormSubmission;
}

impl FormFields for ContactSubmission {
    const KIND: FormKind = FormKind::Contact;

    fn set_field(&mut self, field: &str, value: String) -> Option<&'static str> {
        let canonical = match field {
            "fullName" => {
                self.full_name = value;
                "fullName"
            }
            "email" => {
                self.email = value;
                "email"
            }
            "phone" | "phoneNumber" => {
                self.phone = optional(value);
                "phone"
            }
            "message" => {
                self.message = value;
                "message"
            }
            _ => return None,
        };
        Some(canonical)
    }

    fn to_submission(&self) -> FormSubmission {
        FormSubmission::Contact(self.clone())
    }
}

impl FormFields for BookingSubmission {
    const KIND: FormKind = FormKind::Booking;

    fn set_field(&mut self, field: &str, value: String) -> Option<&'static str> {
        let canonical = match field {
            "name" => {
                self.name = value;
                "name"
            }
            "email" => {
                self.email = value;
                "email"
            }
            "phone" => {
                self.phone = optional(value);
                "phone"
            }
            "company" => {
                self.company = optional(value);
                "company"
            }
            "service" => {
                self.service = optional(value);
                "service"
            }
            "consultationType" => {
                self.consultation_type = optional(value);
                "consultationType"
            }
            "datePreference" => {
                self.date_preference = optional(value);
                "datePreference"
            }
            "timePreference" => {
                self.time_preference = optional(value);
                "timePreference"
            }
            "message" => {
                self.message = value;
                "message"
            }
            _ => return None,
        };
        Some(canonical)
    }

    fn to_submission(&self) -> FormSubmission {
        FormSubmission::Booking(self.clone())
    }
}
