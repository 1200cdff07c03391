use crate::classifier::{
    ChangeClassifier, ClassificationRequest, PrDraft, ReleaseAnalysis, ReleasePlan, VersionType,
};
use crate::error::{AutoFlowError, Result};
use std::sync::Mutex;

/// Canned classifier for testing without an external service.
///
/// Replays a fixed [ReleaseAnalysis] (or a fixed error) and records every
/// request it receives.
pub struct StaticClassifier {
    response: std::result::Result<ReleaseAnalysis, String>,
    requests: Mutex<Vec<ClassificationRequest>>,
}

impl StaticClassifier {
    /// Always answer with the given analysis
    pub fn new(analysis: ReleaseAnalysis) -> Self {
        StaticClassifier {
            response: Ok(analysis),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with a classifier error
    pub fn failing(message: impl Into<String>) -> Self {
        StaticClassifier {
            response: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ClassificationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Convenience analysis used across pipeline tests
    pub fn sample_analysis(version_type: VersionType, breaking: bool) -> ReleaseAnalysis {
        ReleaseAnalysis {
            pr: PrDraft {
                title: "Release: sync engine improvements".to_string(),
                body: "## Release Notes\n- improved sync".to_string(),
                labels: vec!["release".to_string()],
            },
            release: ReleasePlan {
                version: "0.0.0".to_string(),
                version_type,
                breaking_changes: breaking,
                major_changes: if breaking {
                    vec!["reworked public API".to_string()]
                } else {
                    vec![]
                },
                minor_changes: vec!["faster branch sync".to_string()],
                patch_changes: vec!["fixed stash label".to_string()],
            },
        }
    }
}

impl ChangeClassifier for StaticClassifier {
    fn analyze_for_release(&self, request: &ClassificationRequest) -> Result<ReleaseAnalysis> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.response {
            Ok(analysis) => Ok(analysis.clone()),
            Err(message) => Err(AutoFlowError::classifier(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_classifier_replays_analysis() {
        let classifier =
            StaticClassifier::new(StaticClassifier::sample_analysis(VersionType::Minor, false));
        let request = ClassificationRequest::new("d", vec![], vec![], "v1.0.0");

        let analysis = classifier.analyze_for_release(&request).unwrap();
        assert_eq!(analysis.release.version_type, VersionType::Minor);
        assert_eq!(classifier.requests().len(), 1);
        assert_eq!(classifier.requests()[0].latest_tag, "v1.0.0");
    }

    #[test]
    fn test_static_classifier_failing() {
        let classifier = StaticClassifier::failing("backend unreachable");
        let request = ClassificationRequest::new("d", vec![], vec![], "v1.0.0");

        let err = classifier.analyze_for_release(&request).unwrap_err();
        assert!(err.to_string().contains("backend unreachable"));
    }
}
