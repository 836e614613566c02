#![allow(unused_imports)]

pub use anyhow::{Context, Error, anyhow, bail, ensure};
pub use tracing::{debug, error, info, instrument, warn};

pub use crate::failure::Failure;

pub type Result<T = (), E = Error> = anyhow::Result<T, E>;
