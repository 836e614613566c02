mod client;
pub mod data;
pub mod graphql;
