use crate::application::checkout::CheckoutSession;
use crate::error::Result;
use tera::{Context, Tera};

const CARD_PAYMENT: &str = "card-payment.html";
const ERROR: &str = "error.html";

/// Server-rendered pages, compiled once at startup.
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Compiles the bundled templates.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (CARD_PAYMENT, include_str!("../../../templates/card-payment.html")),
            (ERROR, include_str!("../../../templates/error.html")),
        ])?;
        Ok(Self { tera })
    }

    /// The payment form for a freshly started checkout.
    pub fn card_payment(&self, session: &CheckoutSession, country: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("error", &Option::<String>::None);
        context.insert("country", country);
        context.insert("checkout_id", &session.checkout_id);
        context.insert("public_key", &session.public_key);
        context.insert("threeds_jwt", &session.token);
        context.insert("scripts", &session.scripts);
        self.tera.render(CARD_PAYMENT, &context)
    }

    pub fn error(&self, code: &str, message: &str, pathname: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("code", code);
        context.insert("message", message);
        context.insert("pathname", pathname);
        self.tera.render(ERROR, &context)
    }
}
