mod analyzer;
mod diseases;
mod model;
mod preprocess;

pub use analyzer::{Analysis, SkinAnalyzer};
pub use diseases::{DISEASES, DiseaseInfo, disease_info};
#[cfg(test)]
pub use model::MockClassifier;
pub use model::{CandleClassifier, Classifier};
pub use preprocess::{PreparedImage, preprocess};
