use super::{Classifier, DiseaseInfo, disease_info, preprocess};
use crate::{Error, Result};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub prediction: String,
    pub confidence: f32,
    #[serde(serialize_with = "info_or_empty")]
    pub disease_data: Option<&'static DiseaseInfo>,
}

fn info_or_empty<S: Serializer>(
    info: &Option<&'static DiseaseInfo>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match info {
        Some(info) => info.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Wraps the classifier with pre-processing and label lookup.
pub struct SkinAnalyzer {
    classifier: Arc<dyn Classifier>,
    class_names: Vec<String>,
}

impl SkinAnalyzer {
    pub fn new(classifier: Arc<dyn Classifier>, class_names: Vec<String>) -> Self {
        Self {
            classifier,
            class_names,
        }
    }

    pub fn analyze(&self, bytes: &[u8]) -> Result<Analysis> {
        let image = preprocess(bytes, self.classifier.input_size())?;
        let probabilities = self.classifier.predict(&image)?;

        if probabilities.len() != self.class_names.len() {
            return Err(Error::classifier(format!(
                "Model produced {} scores for {} classes",
                probabilities.len(),
                self.class_names.len()
            )));
        }

        let (index, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| Error::classifier("Model produced no scores"))?;

        let prediction = self.class_names[index].clone();
        debug!("Predicted {} with confidence {:.3}", prediction, confidence);

        Ok(Analysis {
            disease_data: disease_info(&prediction),
            prediction,
            confidence,
        })
    }

    /// Runs [`Self::analyze`] on the blocking pool; inference is CPU bound.
    pub async fn analyze_blocking(self: Arc<Self>, bytes: Vec<u8>) -> Result<Analysis> {
        tokio::task::spawn_blocking(move || self.analyze(&bytes))
            .await
            .map_err(|e| Error::internal(format!("Inference task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockClassifier;
    use crate::config::default_class_names;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Cursor;

    fn png() -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(12, 12))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn analyzer_returning(scores: Vec<f32>, class_names: Vec<String>) -> SkinAnalyzer {
        let mut classifier = MockClassifier::new();
        classifier.expect_input_size().return_const(10u32);
        classifier
            .expect_predict()
            .withf(|image| image.size == 10 && image.pixels.len() == 300)
            .times(1)
            .returning(move |_| Ok(scores.clone()));
        SkinAnalyzer::new(Arc::new(classifier), class_names)
    }

    #[test]
    fn test_top_class_and_info_are_reported() {
        let analyzer = analyzer_returning(
            vec![0.05, 0.05, 0.1, 0.05, 0.6, 0.05, 0.05, 0.05],
            default_class_names(),
        );

        let analysis = analyzer.analyze(&png()).unwrap();

        assert_eq!(analysis.prediction, "Ringworm");
        assert!((analysis.confidence - 0.6).abs() < 1e-6);
        assert_eq!(analysis.disease_data, disease_info("Ringworm"));
    }

    #[test]
    fn test_unknown_label_serializes_empty_disease_data() {
        let analyzer = analyzer_returning(vec![0.9, 0.1], vec!["Eczema".into(), "Other".into()]);

        let analysis = analyzer.analyze(&png()).unwrap();
        let value = serde_json::to_value(&analysis).unwrap();

        assert_eq!(value["prediction"], "Eczema");
        assert_eq!(value["disease_data"], json!({}));
    }

    #[test]
    fn test_known_label_serializes_all_fields() {
        let analyzer = analyzer_returning(vec![1.0, 0.0], vec!["Shingles".into(), "Other".into()]);

        let value = serde_json::to_value(analyzer.analyze(&png()).unwrap()).unwrap();

        let data = &value["disease_data"];
        assert!(data["description"].as_str().unwrap().starts_with("Shingles"));
        assert_eq!(data["prevention"].as_array().unwrap().len(), 4);
        assert!(data["causes"].is_string());
        assert!(data["treatment"].is_string());
    }

    #[test]
    fn test_score_count_mismatch_is_an_error() {
        let analyzer = analyzer_returning(vec![0.5, 0.5], default_class_names());

        let err = analyzer.analyze(&png()).unwrap_err();
        assert!(err.to_string().contains("2 scores for 8 classes"));
    }

    #[test]
    fn test_undecodable_upload_never_reaches_the_model() {
        let mut classifier = MockClassifier::new();
        classifier.expect_input_size().return_const(10u32);
        classifier.expect_predict().never();
        let analyzer = SkinAnalyzer::new(Arc::new(classifier), default_class_names());

        assert!(analyzer.analyze(b"not an image").is_err());
    }

    #[tokio::test]
    async fn test_analyze_blocking_runs_off_the_runtime() {
        let analyzer = Arc::new(analyzer_returning(
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            default_class_names(),
        ));

        let analysis = analyzer.analyze_blocking(png()).await.unwrap();
        assert_eq!(analysis.prediction, "Shingles");
    }
}
