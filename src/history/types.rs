use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One classifier run made by a logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Option<i64>,
    pub user_email: String,
    pub prediction: String,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(user_email: String, prediction: String, confidence: f64) -> Self {
        Self {
            id: None,
            user_email,
            prediction,
            confidence,
            created_at: Utc::now(),
        }
    }
}

/// Consultation request submitted from the booking form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub symptoms: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAppointment {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub doctor_id: Option<String>,
    pub doctor_name: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub symptoms: Option<String>,
    pub image_url: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl NewAppointment {
    pub fn is_complete(&self) -> bool {
        present(&self.full_name)
            && present(&self.email)
            && present(&self.preferred_date)
            && present(&self.preferred_time)
    }

    pub fn into_appointment(self) -> Appointment {
        Appointment {
            id: Uuid::new_v4().to_string(),
            full_name: self.full_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
            doctor_id: self.doctor_id.unwrap_or_default(),
            doctor_name: self.doctor_name.unwrap_or_default(),
            preferred_date: self.preferred_date.unwrap_or_default(),
            preferred_time: self.preferred_time.unwrap_or_default(),
            symptoms: self.symptoms.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}
