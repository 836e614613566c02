//! [Tibber GraphQL API](https://developer.tibber.com/docs/overview) client.

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use serde_with::serde_as;

use crate::{
    api::client,
    core::{consumption::ConsumptionSample, price::PriceSample},
    prelude::*,
};

const URL: &str = "https://api.tibber.com/v1-beta/gql";

const HOMES_QUERY: &str = "query Homes { viewer { homes { id appNickname address { address1 city } } } }";

const PRICES_AND_CONSUMPTION_QUERY: &str = "query PricesAndConsumption {
  viewer {
    homes {
      id
      currentSubscription {
        priceInfo {
          today { startsAt total currency }
          tomorrow { startsAt total currency }
        }
      }
      consumptionLastDay: consumption(resolution: HOURLY, last: 24) {
        nodes { from to consumption cost currency }
      }
      consumptionLastWeek: consumption(resolution: DAILY, last: 7) {
        nodes { from to consumption cost currency }
      }
    }
  }
}";

const CONSUMPTION_HISTORY_QUERY: &str = "query ConsumptionHistory($homeId: ID!) {
  viewer {
    home(id: $homeId) {
      timeZone
      consumptionHourly: consumption(resolution: HOURLY, last: 48) {
        nodes { from to consumption cost currency }
      }
      consumptionDaily: consumption(resolution: DAILY, last: 31) {
        nodes { from to consumption cost currency }
      }
    }
  }
}";

pub struct Api(Client);

impl Api {
    pub fn try_new(token: &str) -> Result<Self> {
        Ok(Self(client::try_new(token)?))
    }

    /// Fetch today's and tomorrow's prices, and the latest consumption of the first home.
    #[instrument(skip_all)]
    pub async fn get_prices_and_consumption(&self) -> Result<PricesAndConsumption> {
        info!("fetching the prices and consumption…");
        let response = self.query(PRICES_AND_CONSUMPTION_QUERY, json!({})).await?;
        extract::<Viewer<Homes<PricesAndConsumption>>>(&response)?
            .viewer
            .homes
            .into_iter()
            .next()
            .ok_or_else(|| Failure::shape("no homes returned", &response).into())
    }

    #[instrument(skip_all)]
    pub async fn get_first_home(&self) -> Result<Home> {
        info!("fetching the homes…");
        let response = self.query(HOMES_QUERY, json!({})).await?;
        extract::<Viewer<Homes<Home>>>(&response)?
            .viewer
            .homes
            .into_iter()
            .next()
            .ok_or_else(|| Failure::shape("no homes in the account", &response).into())
    }

    /// Fetch the last 48 hourly and the last 31 daily consumption samples.
    #[instrument(skip_all, fields(home_id = home_id))]
    pub async fn get_consumption_history(&self, home_id: &str) -> Result<ConsumptionHistory> {
        info!("fetching the consumption history…");
        let response =
            self.query(CONSUMPTION_HISTORY_QUERY, json!({ "homeId": home_id })).await?;
        extract::<Viewer<HomeById>>(&response)?
            .viewer
            .home
            .ok_or_else(|| Failure::shape(format!("home `{home_id}` not found"), &response).into())
    }

    /// Send the query and return the whole response.
    async fn query(&self, query: &'static str, variables: Value) -> Result<Value> {
        let response = self
            .0
            .post(URL)
            .json(&Request { query, variables })
            .send()
            .await
            .context("failed to call the GraphQL API")?;
        let body = client::read_body(response).await?;
        let response: Value =
            serde_json::from_str(&body).context("the GraphQL response is not JSON")?;
        check_errors(&response)?;
        Ok(response)
    }
}

fn check_errors(response: &Value) -> Result {
    match response.get("errors").and_then(Value::as_array) {
        Some(errors) if !errors.is_empty() => {
            Err(Failure::Api { errors: serde_json::to_string_pretty(errors)? }.into())
        }
        _ => Ok(()),
    }
}

/// Deserialize the `data` part of the response.
fn extract<D: DeserializeOwned>(response: &Value) -> Result<D> {
    let data = response
        .get("data")
        .filter(|data| !data.is_null())
        .ok_or_else(|| Failure::shape("no data in the response", response))?;
    D::deserialize(data).map_err(|error| Failure::shape(error.to_string(), response).into())
}

#[derive(Serialize)]
struct Request {
    query: &'static str,
    variables: Value,
}

#[derive(Deserialize)]
struct Viewer<T> {
    viewer: T,
}

#[derive(Deserialize)]
struct Homes<H> {
    homes: Vec<H>,
}

#[derive(Deserialize)]
struct HomeById {
    home: Option<ConsumptionHistory>,
}

#[must_use]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Home {
    pub id: String,
    pub app_nickname: Option<String>,
    pub address: Option<Address>,
}

#[derive(Default, Deserialize)]
pub struct Address {
    pub address1: Option<String>,
    pub city: Option<String>,
}

#[must_use]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricesAndConsumption {
    pub id: String,

    /// Missing when the home has no active subscription.
    current_subscription: Option<Subscription>,

    pub consumption_last_day: Consumption,
    pub consumption_last_week: Consumption,
}

impl PricesAndConsumption {
    /// Today's and tomorrow's prices, empty without a subscription.
    #[must_use]
    pub fn into_prices(self) -> (Vec<PriceSample>, Vec<PriceSample>) {
        self.current_subscription
            .and_then(|subscription| subscription.price_info)
            .map(|price_info| (price_info.today, price_info.tomorrow))
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Subscription {
    price_info: Option<PriceInfo>,
}

#[serde_as]
#[derive(Deserialize)]
struct PriceInfo {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    today: Vec<PriceSample>,

    /// Empty until the day-ahead prices get published in the afternoon.
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    tomorrow: Vec<PriceSample>,
}

#[serde_as]
#[derive(Default, Deserialize)]
pub struct Consumption {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub nodes: Vec<ConsumptionSample>,
}

#[serde_as]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionHistory {
    pub time_zone: Option<String>,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub consumption_hourly: Consumption,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub consumption_daily: Consumption,
}
