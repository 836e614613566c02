//! Tibber Data API client, the REST counterpart of the GraphQL API which exposes the devices.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::serde_as;

use crate::{api::client, core::interval::RangeExclusive, prelude::*};

const BASE_URL: &str = "https://data-api.tibber.com/v1";

pub struct Api(Client);

impl Api {
    pub fn try_new(token: &str) -> Result<Self> {
        Ok(Self(client::try_new(token)?))
    }

    pub async fn get_homes(&self) -> Result<Value> {
        self.get("/homes", &[]).await
    }

    pub async fn get_devices(&self, home_id: &str) -> Result<Value> {
        self.get(&format!("/homes/{home_id}/devices"), &[]).await
    }

    pub async fn get_history(
        &self,
        home_id: &str,
        device_id: &str,
        period: RangeExclusive<DateTime<Utc>>,
        resolution: &str,
    ) -> Result<Value> {
        let since = period.start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let until = period.end.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.get(
            &format!("/homes/{home_id}/devices/{device_id}/history"),
            &[("since", since.as_str()), ("until", until.as_str()), ("resolution", resolution)],
        )
        .await
    }

    #[instrument(skip_all, fields(path = path))]
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{BASE_URL}{path}");
        let response = self
            .0
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("failed to call `{url}`"))?;
        info!(status = %response.status(), "GET {url}");
        let body = client::read_body(response).await?;
        serde_json::from_str(&body).with_context(|| format!("the response from `{url}` is not JSON"))
    }
}

/// Pick the first home from the `/homes` response.
pub fn first_home_id(response: &Value) -> Result<String> {
    HomesResponse::deserialize(response)
        .map_err(|error| Failure::shape(error.to_string(), response))?
        .homes
        .into_iter()
        .next()
        .map(|home| home.id)
        .ok_or_else(|| Failure::shape("no homes in the account", response).into())
}

/// Collect the devices which advertise at least one history resolution.
pub fn history_candidates(devices: &Value) -> Result<Vec<HistoryCandidate>> {
    let response = DevicesResponse::deserialize(devices)
        .map_err(|error| Failure::shape(error.to_string(), devices))?;
    if response.devices.is_empty() {
        bail!(Failure::no_devices(devices));
    }
    Ok(response
        .devices
        .into_iter()
        .filter(|device| !device.supported_history.resolutions.is_empty())
        .map(|device| HistoryCandidate {
            id: device.id,
            external_id: device.external_id,
            name: device.info.name,
            resolutions: device.supported_history.resolutions,
        })
        .collect())
}

/// Pick the device to fetch the history for.
pub fn first_candidate<'a>(
    candidates: &'a [HistoryCandidate],
    devices: &Value,
) -> Result<&'a HistoryCandidate> {
    candidates.first().ok_or_else(|| Failure::no_history(devices).into())
}

#[must_use]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryCandidate {
    pub id: Option<String>,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub resolutions: Vec<Value>,
}

#[derive(Deserialize)]
struct HomesResponse {
    homes: Vec<HomeReference>,
}

#[derive(Deserialize)]
struct HomeReference {
    id: String,
}

#[serde_as]
#[derive(Deserialize)]
struct DevicesResponse {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    devices: Vec<Device>,
}

#[serde_as]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Device {
    id: Option<String>,

    external_id: Option<String>,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    info: DeviceInfo,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    supported_history: SupportedHistory,
}

#[derive(Default, Deserialize)]
struct DeviceInfo {
    name: Option<String>,
}

#[serde_as]
#[derive(Default, Deserialize)]
struct SupportedHistory {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    resolutions: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::failure::exit_code;

    #[test]
    fn test_first_home_id_ok() -> Result {
        let homes = json!({"homes": [{"id": "first", "info": {}}, {"id": "second"}]});
        assert_eq!(first_home_id(&homes)?, "first");
        Ok(())
    }

    #[test]
    fn test_first_home_id_empty() {
        let error = first_home_id(&json!({"homes": []})).unwrap_err();
        assert_eq!(exit_code(&error), 3);
    }

    #[test]
    fn test_history_candidates_ok() -> Result {
        // language=json
        let devices: Value = serde_json::from_str(
            r#"{
                "devices": [
                    {
                        "id": "6a4e2ed3-pulse",
                        "externalId": "pulse-1",
                        "info": {"name": "Pulse", "brand": "Tibber"},
                        "supportedHistory": {"resolutions": ["hour", "day"]}
                    },
                    {
                        "id": "charger",
                        "info": {"name": "Charger"},
                        "supportedHistory": null
                    },
                    {
                        "id": "thermostat"
                    }
                ]
            }"#,
        )?;
        let candidates = history_candidates(&devices)?;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id.as_deref(), Some("6a4e2ed3-pulse"));
        assert_eq!(candidates[0].name.as_deref(), Some("Pulse"));
        assert_eq!(
            serde_json::to_value(&candidates[0])?,
            json!({
                "id": "6a4e2ed3-pulse",
                "externalId": "pulse-1",
                "name": "Pulse",
                "resolutions": ["hour", "day"]
            })
        );
        Ok(())
    }

    #[test]
    fn test_history_candidates_no_devices() {
        let error = history_candidates(&json!({"devices": null})).unwrap_err();
        assert_eq!(exit_code(&error), 4);
        let error = history_candidates(&json!({"devices": []})).unwrap_err();
        assert_eq!(exit_code(&error), 4);
    }

    #[test]
    fn test_first_candidate_without_history() -> Result {
        let devices = json!({"devices": [{"id": "thermostat", "supportedHistory": {"resolutions": []}}]});
        let candidates = history_candidates(&devices)?;
        assert!(candidates.is_empty());
        let error = first_candidate(&candidates, &devices).unwrap_err();
        assert_eq!(exit_code(&error), 5);
        Ok(())
    }

    #[test]
    fn test_first_candidate_ok() -> Result {
        let devices = json!({"devices": [
            {"id": "first", "supportedHistory": {"resolutions": ["hour"]}},
            {"id": "second", "supportedHistory": {"resolutions": ["day"]}}
        ]});
        let candidates = history_candidates(&devices)?;
        assert_eq!(first_candidate(&candidates, &devices)?.id.as_deref(), Some("first"));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_get_homes_ok() -> Result {
        let token = std::env::var("TIBBER_DATA_TOKEN").or_else(|_| std::env::var("TIBBER_TOKEN"))?;
        let homes = Api::try_new(&token)?.get_homes().await?;
        let _ = first_home_id(&homes)?;
        Ok(())
    }
}
