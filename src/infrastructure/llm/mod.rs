//! Vertex AI provider implementation

mod adc;
mod credentials;
mod factory;
mod http_client;
mod vertex;

pub use adc::{AdcTokenSource, ServiceAccountKey, CREDENTIALS_FILE_VAR, METADATA_TOKEN_URL};
pub use credentials::{
    AccessTokenSource, EnvAccessTokenSource, StaticAccessTokenSource, ACCESS_TOKEN_VAR,
};
pub use factory::VertexAiClientFactory;
pub use http_client::{HttpClient, HttpClientTrait};
pub use vertex::VertexAiClient;
