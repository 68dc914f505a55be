pub mod forms;
pub mod request;
pub mod submission;

pub use forms::{BookingSubmission, ContactSubmission, FormFields, FormKind, FormSubmission};
pub use request::ApiResponse;
pub use submission::{BackendResponse, SubmissionResult};
