//! Simulation submission workflow
//!
//! 1. Validate the CPF (the only field that is checked)
//! 2. Stamp the lead with the server time
//! 3. Persist it
//! 4. Build the outreach message and deep link for the business contact
use crate::config::Config;
use crate::db_storage::LeadStore;
use crate::errors::SubmissionError;
use crate::models::{ContactPayload, NewLead, SimulationForm};
use crate::validation::{is_valid_cpf, strip_non_digits};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use url::{form_urlencoded, Url};

/// Timestamp layout stored with each lead.
pub const CREATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Handles simulation form submissions.
///
/// Stateless between calls; clones share the underlying pool and may run
/// on any number of tasks concurrently.
#[derive(Clone)]
pub struct SubmissionService {
    store: LeadStore,
    contact_number: String,
    business_name: String,
}

impl SubmissionService {
    pub fn new(config: &Config, store: LeadStore) -> Self {
        Self {
            store,
            contact_number: config.contact_number.clone(),
            business_name: config.business_name.clone(),
        }
    }

    pub fn store(&self) -> &LeadStore {
        &self.store
    }

    /// Validate, persist and answer with the contact payload.
    pub async fn handle_submission(
        &self,
        form: SimulationForm,
    ) -> Result<ContactPayload, SubmissionError> {
        self.handle_submission_at(form, Local::now()).await
    }

    /// Same as [`handle_submission`](Self::handle_submission) with an explicit clock.
    pub async fn handle_submission_at<Tz>(
        &self,
        form: SimulationForm,
        now: DateTime<Tz>,
    ) -> Result<ContactPayload, SubmissionError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if !is_valid_cpf(form.cpf_or_empty()) {
            return Err(SubmissionError::InvalidIdentifier);
        }

        let lead = new_lead(&form, &now);
        let lead_id = self.store.insert(&lead).await?;

        tracing::info!(
            "✓ Lead {} stored (service: {}, at {})",
            lead_id,
            lead.service_type,
            lead.created_at
        );

        let message = build_contact_message(&self.business_name, &form);
        let contact_url = build_contact_url(&self.contact_number, &message)?;

        Ok(ContactPayload {
            contact_number: self.contact_number.clone(),
            message,
            contact_url,
        })
    }
}

/// Format a timestamp as `DD/MM/YYYY HH:MM`.
pub fn format_created_at<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(CREATED_AT_FORMAT).to_string()
}

fn new_lead<Tz>(form: &SimulationForm, now: &DateTime<Tz>) -> NewLead
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    NewLead {
        name: field(&form.name).to_string(),
        cpf: strip_non_digits(form.cpf_or_empty()),
        birth_date: field(&form.birth_date).to_string(),
        email: field(&form.email).to_string(),
        phone: field(&form.phone).to_string(),
        service_type: field(&form.service_type).to_string(),
        created_at: format_created_at(now),
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Outreach message sent to the business, with every field as submitted.
pub fn build_contact_message(business_name: &str, form: &SimulationForm) -> String {
    format!(
        "*Olá! Vim do site {} e gostaria de fazer uma simulação:*\n\n\
         *Nome:* {}\n\
         *CPF:* {}\n\
         *Data de Nascimento:* {}\n\
         *E-mail:* {}\n\
         *Celular:* {}\n\
         *Serviço:* {}\n\n\
         *Aguardo retorno!*",
        business_name,
        field(&form.name),
        field(&form.cpf),
        field(&form.birth_date),
        field(&form.email),
        field(&form.phone),
        field(&form.service_type),
    )
}

/// `https://wa.me/<number>?text=<message>` deep link.
///
/// The message is percent-encoded (`%20` for spaces), not form-encoded.
pub fn build_contact_url(contact_number: &str, message: &str) -> Result<String, SubmissionError> {
    // byte_serialize escapes a literal '+' as %2B, so every remaining '+' is a space
    let text = form_urlencoded::byte_serialize(message.as_bytes())
        .collect::<String>()
        .replace('+', "%20");

    let url = Url::parse(&format!("https://wa.me/{}?text={}", contact_number, text)).map_err(
        |e| SubmissionError::UnexpectedFailure(format!("building contact url: {}", e)),
    )?;
    Ok(url.to_string())
}
