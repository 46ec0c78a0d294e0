//! Checkout domain: submissions, 3DS results, payment results, and the port
//! to the card processor.

pub mod payment;
pub mod ports;
pub mod submission;
pub mod threeds;
