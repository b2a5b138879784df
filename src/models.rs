use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============ Request Models ============

/// Raw simulation form as posted by the website.
///
/// Every field is optional and unchecked; only `cpf` is validated. Absent
/// fields flow through as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationForm {
    /// Full name.
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    /// CPF, with or without punctuation.
    #[serde(default)]
    pub cpf: Option<String>,
    /// Birth date as typed by the user.
    #[serde(rename = "data_nascimento", default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Mobile phone number.
    #[serde(rename = "celular", default)]
    pub phone: Option<String>,
    /// Requested service (loan type, card, ...).
    #[serde(rename = "tipo_servico", default)]
    pub service_type: Option<String>,
}

impl SimulationForm {
    pub fn cpf_or_empty(&self) -> &str {
        self.cpf.as_deref().unwrap_or("")
    }
}

// ============ Database Models ============

/// A lead ready to be inserted. `created_at` is stamped by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    /// Normalized 11-digit CPF.
    pub cpf: String,
    pub birth_date: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    /// `DD/MM/YYYY HH:MM`, server local time.
    pub created_at: String,
}

/// A persisted lead row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lead {
    /// Auto-increment identity assigned by the store.
    pub id: i64,
    pub name: String,
    pub cpf: String,
    pub birth_date: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub created_at: String,
}

// ============ Response Models ============

/// What the caller needs to open a conversation with the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    /// Business messaging number (country code + area code + number).
    pub contact_number: String,
    /// Pre-formatted outreach message.
    pub message: String,
    /// Deep link opening a chat with `message` pre-filled.
    pub contact_url: String,
}

/// Success body of `POST /simulacao`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub success: bool,
    pub contact_number: String,
    pub message: String,
    pub contact_url: String,
}

impl From<ContactPayload> for SimulationResponse {
    fn from(payload: ContactPayload) -> Self {
        Self {
            success: true,
            contact_number: payload.contact_number,
            message: payload.message,
            contact_url: payload.contact_url,
        }
    }
}

/// Failure body shared by every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}
