use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, AtlasResult};
use crate::models::lenient;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub number: Option<String>,
}

/// Body of `POST /companies`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCompany {
    pub name: String,
    pub province: String,
    pub city: String,
    pub email: String,
    pub number: String,
}

impl NewCompany {
    pub fn parse(name: &str, province: &str, city: &str, email: &str, number: &str) -> AtlasResult<Self> {
        let name = name.trim();
        let city = city.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AtlasError::Validation("Company name is required".into()));
        }
        if province.is_empty() {
            return Err(AtlasError::Validation("Province is required".into()));
        }
        if city.is_empty() {
            return Err(AtlasError::Validation("City is required".into()));
        }
        if !email.is_empty() && !email.contains('@') {
            return Err(AtlasError::Validation(format!("\"{email}\" is not an email address")));
        }

        Ok(Self {
            name: name.to_string(),
            province: province.to_string(),
            city: city.to_string(),
            email: email.to_string(),
            number: number.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_contact_fields_may_be_blank() {
        let company = NewCompany::parse("EllisDon", "Ontario", "Mississauga", "", "").unwrap();
        assert_eq!(company.email, "");

        let body = serde_json::to_value(&company).unwrap();
        assert_eq!(body["city"], "Mississauga");
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = NewCompany::parse("EllisDon", "Ontario", "Mississauga", "ellisdon.com", "").unwrap_err();
        assert!(err.to_string().contains("not an email address"));
    }

    #[test]
    fn decodes_company_with_numeric_phone() {
        let company: Company = serde_json::from_str(
            r#"{"id":4,"name":"PCL","province":"Alberta","city":"Edmonton","email":null,"number":7805550199}"#,
        )
        .unwrap();
        assert_eq!(company.email, None);
        assert_eq!(company.number.as_deref(), Some("7805550199"));
    }
}
