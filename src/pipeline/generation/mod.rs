//! Transcript → text generation: patient visit summaries and SOAP notes.

pub mod prompt;
pub mod retry;
pub mod soap;
pub mod visit_summary;

pub use retry::RetryPolicy;
pub use soap::{generate_soap_note, parse_soap_text, SoapNote};
pub use visit_summary::generate_visit_summary;
