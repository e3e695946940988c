mod storage;
mod types;

pub use storage::HistoryStorage;
pub use types::{AnalysisRecord, Appointment, NewAppointment};
