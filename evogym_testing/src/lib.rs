//! Stand-ins for the external services used by evogym, for local development
//! and tests.

pub mod emailjs;
