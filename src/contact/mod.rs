//! Contact form handling.

mod form;
mod mailer;

pub use form::{ContactError, ContactForm, Enquiry};
pub use mailer::{EmailMessage, Mailer, ResendMailer};
