pub mod mailer;

pub use mailer::{Email, LogMailer, MailError, Mailer, MemoryMailer};
