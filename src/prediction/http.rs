//! HTTP prediction backend

use ndarray::IxDyn;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::{OutputBundle, OutputType, PredictionClient, PredictionOutput, PredictionRequest};
use crate::credentials::ApiKey;
use crate::effect::PredictionArray;
use crate::error::PredictError;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-api-key";

/// Array as sent over the wire: a shape and row-major values
#[derive(Debug, Deserialize)]
struct WireArray {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl WireArray {
    fn into_array(self, output: OutputType) -> Result<PredictionArray, PredictError> {
        PredictionArray::from_shape_vec(IxDyn(&self.shape), self.values).map_err(|e| {
            PredictError::service(format!("malformed {} array: {}", output, e))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WireResponse {
    Interval {
        outputs: BTreeMap<OutputType, WireArray>,
    },
    Variant {
        reference: BTreeMap<OutputType, WireArray>,
        alternate: BTreeMap<OutputType, WireArray>,
    },
}

fn into_bundle(wire: BTreeMap<OutputType, WireArray>) -> Result<OutputBundle, PredictError> {
    wire.into_iter()
        .map(|(output, array)| Ok((output, array.into_array(output)?)))
        .collect()
}

impl TryFrom<WireResponse> for PredictionOutput {
    type Error = PredictError;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        match wire {
            WireResponse::Interval { outputs } => Ok(PredictionOutput::Interval(into_bundle(outputs)?)),
            WireResponse::Variant {
                reference,
                alternate,
            } => Ok(PredictionOutput::Variant {
                reference: into_bundle(reference)?,
                alternate: into_bundle(alternate)?,
            }),
        }
    }
}

/// Prediction client that POSTs requests to a remote service
pub struct HttpPredictionClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl HttpPredictionClient {
    /// Create a client for the service at `api_url`
    pub fn new(api_url: &str, api_key: ApiKey) -> Result<Self, PredictError> {
        let client = Client::builder()
            .build()
            .map_err(|e| PredictError::service(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/predict", self.base_url)
    }
}

impl std::fmt::Debug for HttpPredictionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPredictionClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish()
    }
}

#[async_trait::async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionOutput, PredictError> {
        let url = self.endpoint();
        tracing::debug!(url = %url, interval = %request.interval, "Sending prediction request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| PredictError::service(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = body.trim();
            return Err(PredictError::service(if detail.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, detail)
            }));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| PredictError::service(format!("invalid response body: {}", e)))?;
        PredictionOutput::try_from(wire)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_interval_response() {
        let json = r#"{
            "kind": "interval",
            "outputs": {"RNA_SEQ": {"shape": [2, 2], "values": [1.0, 2.0, 3.0, 4.0]}}
        }"#;
        let wire: WireResponse = serde_json::from_str(json).unwrap();
        let output = PredictionOutput::try_from(wire).unwrap();
        let bundle = output.into_interval().unwrap();
        let array = &bundle[&OutputType::RnaSeq];
        assert_eq!(array.shape(), &[2, 2]);
        assert_eq!(array[[1, 0]], 3.0);
    }

    #[test]
    fn test_decode_variant_response() {
        let json = r#"{
            "kind": "variant",
            "reference": {"ATAC": {"shape": [3], "values": [0.1, 0.2, 0.3]}},
            "alternate": {"ATAC": {"shape": [3], "values": [0.1, 0.2, 0.4]}}
        }"#;
        let wire: WireResponse = serde_json::from_str(json).unwrap();
        let (reference, alternate) = PredictionOutput::try_from(wire)
            .unwrap()
            .into_variant()
            .unwrap();
        assert_eq!(reference[&OutputType::Atac].len(), 3);
        assert_eq!(alternate[&OutputType::Atac][[2]], 0.4);
    }

    #[test]
    fn test_decode_bad_shape() {
        let json = r#"{
            "kind": "interval",
            "outputs": {"CAGE": {"shape": [2, 2], "values": [1.0]}}
        }"#;
        let wire: WireResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            PredictionOutput::try_from(wire),
            Err(PredictError::PredictionService { .. })
        ));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let client =
            HttpPredictionClient::new("https://predict.example.org/", ApiKey::new("k")).unwrap();
        assert_eq!(client.endpoint(), "https://predict.example.org/v1/predict");
    }
}
