use reqwest::StatusCode;

/// Fatal run outcome with its own process exit code.
///
/// Anything else bubbling up to `main` is treated as a transport error.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum Failure {
    /// Credential is missing from the environment and the command line.
    #[display("missing API token, set {variables}")]
    MissingToken { variables: &'static str },

    /// Non-success HTTP status, the body is echoed verbatim.
    #[display("API responded with {status}:\n{body}")]
    Status { status: StatusCode, body: String },

    /// The API answered successfully, but reported errors in the payload.
    #[display("API reported errors:\n{errors}")]
    Api { errors: String },

    /// The response is missing something we cannot do without.
    #[display("{reason}, the response was:\n{response}")]
    Shape { reason: String, response: String },

    #[display("no devices in the home, the response was:\n{response}")]
    NoDevices { response: String },

    #[display("no device supports history, the response was:\n{response}")]
    NoHistory { response: String },
}

impl Failure {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingToken { .. } => 2,
            Self::Status { .. } | Self::Api { .. } => 1,
            Self::Shape { .. } => 3,
            Self::NoDevices { .. } => 4,
            Self::NoHistory { .. } => 5,
        }
    }

    /// Build a shape failure, dumping the full response for diagnosis.
    pub fn shape(reason: impl Into<String>, response: &serde_json::Value) -> Self {
        Self::Shape { reason: reason.into(), response: dump(response) }
    }

    pub fn no_devices(response: &serde_json::Value) -> Self {
        Self::NoDevices { response: dump(response) }
    }

    pub fn no_history(response: &serde_json::Value) -> Self {
        Self::NoHistory { response: dump(response) }
    }
}

fn dump(response: &serde_json::Value) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
}

/// Find the exit code for the error, defaulting to the transport one.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<Failure>())
        .map_or(1, Failure::exit_code)
}
