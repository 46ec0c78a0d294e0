//! Application layer orchestrating the checkout protocol.
//!
//! `CheckoutService` sequences the processor calls (token, 3DS lookup,
//! payment) and applies the liability rules between lookup and payment. It
//! returns domain outcomes; turning them into HTTP responses is left to
//! `interfaces::http`.

pub mod checkout;
