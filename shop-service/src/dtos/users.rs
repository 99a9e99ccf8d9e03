use mongodb::bson::{self, doc, Document};
use serde::Serialize;
use serde_json::Value;
use service_core::error::AppError;

/// Role view over a stored user document. A non-string `role` counts as no
/// role.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserRole {
    pub role: Option<String>,
}

impl UserRole {
    pub fn from_document(document: &Document) -> Self {
        Self {
            role: document.get_str("role").ok().map(str::to_string),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

/// Response of `GET /users/:email`. Advisory only, nothing is gated on it.
#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

/// `{ email: <body.email> }`. A body without an email filters on `null`.
pub fn email_filter(body: &Value) -> Result<Document, AppError> {
    let email = body.get("email").cloned().unwrap_or(Value::Null);
    Ok(doc! { "email": bson::to_bson(&email)? })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;
    use serde_json::json;

    #[test]
    fn only_the_exact_admin_role_is_admin() {
        assert!(UserRole::from_document(&doc! { "role": "admin" }).is_admin());
        assert!(!UserRole::from_document(&doc! { "role": "Admin" }).is_admin());
        assert!(!UserRole::from_document(&doc! { "role": "customer" }).is_admin());
        assert!(!UserRole::from_document(&doc! { "role": 1 }).is_admin());
        assert!(!UserRole::from_document(&doc! { "email": "a@x.com" }).is_admin());
    }

    #[test]
    fn email_filter_falls_back_to_null() {
        assert_eq!(
            email_filter(&json!({ "email": "a@x.com", "name": "A" })).unwrap(),
            doc! { "email": "a@x.com" }
        );
        assert_eq!(
            email_filter(&json!({ "name": "A" })).unwrap(),
            doc! { "email": Bson::Null }
        );
    }
}
