use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// A company assigned to a project. The API joins in the display fields of
/// both sides so the console never has to look them up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub project_id: i64,
    pub company_id: i64,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub project_city: String,
    #[serde(default)]
    pub project_province: String,
    #[serde(default)]
    pub project_status: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub created_at: Option<String>,
}

impl Assignment {
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(lenient::date_prefix)
    }
}

/// Body of `POST /assignments`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NewAssignment {
    pub project_id: i64,
    pub company_id: i64,
}
