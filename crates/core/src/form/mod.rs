//! Form registry.
//!
//! A form is a named submission target owned by one user. Its key is the
//! public capability token that routes anonymous submissions to it.

mod error;
mod key;
mod service;
mod types;

pub use error::FormError;
pub use key::{FORM_KEY_LEN, generate_form_key, is_valid_form_key};
pub(crate) use service::find_owned;
pub use service::{FormRepository, FormService, is_valid_redirect_url};
pub use types::{CreateFormInput, Form, FormSummary, NewForm};
