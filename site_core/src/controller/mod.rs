//! Maps submission outcomes onto the state a form shows its user

pub mod feedback;
pub mod form;

pub use feedback::{Banner, Toast, Tone};
pub use form::{FormController, FormPhase, FormView, SubmitOutcome};
