use super::{AnalysisRecord, Appointment};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Row};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Analysis history and appointment requests.
///
/// Backed by libSQL when the database opens; otherwise, and whenever a write
/// fails, records go to an in-memory fallback that lives as long as the process.
pub struct HistoryStorage {
    conn: Option<Connection>,
    fallback: Arc<Mutex<Fallback>>,
}

#[derive(Default)]
struct Fallback {
    analyses: Vec<AnalysisRecord>,
    appointments: Vec<Appointment>,
}

impl HistoryStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = match Self::init_database(db_path).await {
            Ok(conn) => {
                info!("Database initialized successfully: {}", db_path);
                Some(conn)
            }
            Err(e) => {
                warn!(
                    "Database initialization failed, using in-memory fallback: {}",
                    e
                );
                None
            }
        };

        Ok(Self {
            conn,
            fallback: Arc::new(Mutex::new(Fallback::default())),
        })
    }

    async fn init_database(db_path: &str) -> Result<Connection> {
        let db = Builder::new_local(db_path).build().await?;
        // One connection for the life of the store; `:memory:` databases are
        // per-connection.
        let conn = db.connect()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS analyses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL,
                prediction TEXT NOT NULL,
                confidence REAL NOT NULL,
                created_at DATETIME NOT NULL
            )
            "#,
            (),
        )
        .await?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS appointments (
                id TEXT PRIMARY KEY,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                doctor_id TEXT NOT NULL,
                doctor_name TEXT NOT NULL,
                preferred_date TEXT NOT NULL,
                preferred_time TEXT NOT NULL,
                symptoms TEXT NOT NULL,
                image_url TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            "#,
            (),
        )
        .await?;

        Ok(conn)
    }

    pub fn is_persistent(&self) -> bool {
        self.conn.is_some()
    }

    fn fallback(&self) -> Result<std::sync::MutexGuard<'_, Fallback>> {
        self.fallback
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))
    }

    pub async fn save_analysis(&self, record: AnalysisRecord) -> Result<()> {
        if let Some(ref conn) = self.conn {
            match conn
                .execute(
                    "INSERT INTO analyses (user_email, prediction, confidence, created_at) VALUES (?, ?, ?, ?)",
                    (
                        record.user_email.as_str(),
                        record.prediction.as_str(),
                        record.confidence,
                        record.created_at.to_rfc3339(),
                    ),
                )
                .await
            {
                Ok(_) => {
                    debug!("Analysis saved to database for: {}", record.user_email);
                    return Ok(());
                }
                Err(e) => warn!("Failed to save analysis to database, using fallback: {}", e),
            }
        }

        self.fallback()?.analyses.push(record);
        Ok(())
    }

    /// Newest first.
    pub async fn list_analyses(&self, user_email: &str) -> Result<Vec<AnalysisRecord>> {
        if let Some(ref conn) = self.conn {
            match Self::list_analyses_from_db(conn, user_email).await {
                Ok(mut records) => {
                    // Writes that fell back while the database misbehaved.
                    records.extend(self.list_analyses_from_fallback(user_email)?);
                    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                    return Ok(records);
                }
                Err(e) => warn!("Failed to read analyses from database, using fallback: {}", e),
            }
        }

        self.list_analyses_from_fallback(user_email)
    }

    async fn list_analyses_from_db(
        conn: &Connection,
        user_email: &str,
    ) -> Result<Vec<AnalysisRecord>> {
        let mut rows = conn
            .query(
                "SELECT id, user_email, prediction, confidence, created_at FROM analyses WHERE user_email = ? ORDER BY id DESC",
                [user_email],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(AnalysisRecord {
                id: Some(row.get(0)?),
                user_email: row.get(1)?,
                prediction: row.get(2)?,
                confidence: row.get(3)?,
                created_at: parse_timestamp(&row, 4)?,
            });
        }

        debug!(
            "Retrieved {} analyses from database for: {}",
            records.len(),
            user_email
        );
        Ok(records)
    }

    fn list_analyses_from_fallback(&self, user_email: &str) -> Result<Vec<AnalysisRecord>> {
        let records: Vec<AnalysisRecord> = self
            .fallback()?
            .analyses
            .iter()
            .rev()
            .filter(|record| record.user_email == user_email)
            .cloned()
            .collect();
        Ok(records)
    }

    pub async fn save_appointment(&self, appointment: Appointment) -> Result<()> {
        if let Some(ref conn) = self.conn {
            match conn
                .execute(
                    "INSERT INTO appointments (id, full_name, email, phone_number, doctor_id, doctor_name, preferred_date, preferred_time, symptoms, image_url, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    libsql::params![
                        appointment.id.as_str(),
                        appointment.full_name.as_str(),
                        appointment.email.as_str(),
                        appointment.phone_number.as_str(),
                        appointment.doctor_id.as_str(),
                        appointment.doctor_name.as_str(),
                        appointment.preferred_date.as_str(),
                        appointment.preferred_time.as_str(),
                        appointment.symptoms.as_str(),
                        appointment.image_url.as_str(),
                        appointment.created_at.to_rfc3339(),
                    ],
                )
                .await
            {
                Ok(_) => {
                    debug!("Appointment {} saved to database", appointment.id);
                    return Ok(());
                }
                Err(e) => warn!(
                    "Failed to save appointment to database, using fallback: {}",
                    e
                ),
            }
        }

        self.fallback()?.appointments.push(appointment);
        Ok(())
    }

    /// Oldest first.
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        if let Some(ref conn) = self.conn {
            match Self::list_appointments_from_db(conn).await {
                Ok(mut appointments) => {
                    appointments.extend(self.fallback()?.appointments.iter().cloned());
                    appointments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                    return Ok(appointments);
                }
                Err(e) => warn!(
                    "Failed to read appointments from database, using fallback: {}",
                    e
                ),
            }
        }

        Ok(self.fallback()?.appointments.clone())
    }

    async fn list_appointments_from_db(conn: &Connection) -> Result<Vec<Appointment>> {
        let mut rows = conn
            .query(
                "SELECT id, full_name, email, phone_number, doctor_id, doctor_name, preferred_date, preferred_time, symptoms, image_url, created_at FROM appointments ORDER BY created_at ASC",
                (),
            )
            .await?;

        let mut appointments = Vec::new();
        while let Some(row) = rows.next().await? {
            appointments.push(Appointment {
                id: row.get(0)?,
                full_name: row.get(1)?,
                email: row.get(2)?,
                phone_number: row.get(3)?,
                doctor_id: row.get(4)?,
                doctor_name: row.get(5)?,
                preferred_date: row.get(6)?,
                preferred_time: row.get(7)?,
                symptoms: row.get(8)?,
                image_url: row.get(9)?,
                created_at: parse_timestamp(&row, 10)?,
            });
        }
        Ok(appointments)
    }
}

fn parse_timestamp(row: &Row, idx: i32) -> Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    Ok(DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| Error::internal(format!("Failed to parse timestamp: {e}")))?
        .with_timezone(&Utc))
}
