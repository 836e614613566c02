use clap::Parser;

use crate::prelude::*;

/// Personal access token for the GraphQL API.
#[derive(Parser)]
pub struct TokenArgs {
    #[clap(long = "token", env = "TIBBER_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl TokenArgs {
    pub fn resolve(&self) -> Result<String> {
        non_blank(self.token.as_deref())
            .ok_or_else(|| Failure::MissingToken { variables: "TIBBER_TOKEN" }.into())
    }
}

/// Token for the Data API, falls back to the GraphQL one.
#[derive(Parser)]
pub struct DataTokenArgs {
    #[clap(long = "data-token", env = "TIBBER_DATA_TOKEN", hide_env_values = true)]
    data_token: Option<String>,

    #[clap(flatten)]
    fallback: TokenArgs,
}

impl DataTokenArgs {
    pub fn resolve(&self) -> Result<String> {
        non_blank(self.data_token.as_deref())
            .or_else(|| non_blank(self.fallback.token.as_deref()))
            .ok_or_else(|| {
                Failure::MissingToken { variables: "TIBBER_DATA_TOKEN or TIBBER_TOKEN" }.into()
            })
    }
}

fn non_blank(token: Option<&str>) -> Option<String> {
    token.map(str::trim).filter(|token| !token.is_empty()).map(ToOwned::to_owned)
}
