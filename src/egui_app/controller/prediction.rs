use super::jobs::{JobKind, JobOutcome, RequestToken};
use super::*;
use crate::record_service::ServiceError;

const PREDICTION_FAILED: &str = "Failed to fetch prediction.";

impl EguiController {
    /// Reveal the visualization panel and request a fresh prediction.
    pub fn request_prediction(&mut self) -> RequestToken {
        self.ui.view.show_visualization();
        self.set_status("Requesting prediction", StatusTone::Busy);
        self.spawn_job(JobKind::Prediction, |service| {
            JobOutcome::Predicted(service.fetch_prediction())
        })
    }

    pub(super) fn apply_prediction(
        &mut self,
        token: RequestToken,
        latest: bool,
        result: Result<PredictionResult, ServiceError>,
    ) {
        if !latest {
            tracing::debug!("Discarding superseded prediction #{}", token.seq);
            return;
        }
        match result {
            Ok(prediction) => {
                tracing::info!(
                    "Prediction: p={:.4}, unicorn={}",
                    prediction.predicted_probability,
                    prediction.is_unicorn
                );
                self.ui.prediction = Some(prediction);
                self.set_status("Prediction updated", StatusTone::Info);
            }
            Err(err) => {
                // The previous result stays on screen.
                tracing::warn!("Prediction failed: {err}");
                let message = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| PREDICTION_FAILED.to_string());
                self.report_error(JobKind::Prediction, EngineError::Fetch(message));
            }
        }
    }
}
