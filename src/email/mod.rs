mod service;

pub use service::{EmailSender, SmtpMailer};
