// # SSM Parameter Store Backend
//
// This crate provides a ParameterStore backed by AWS Systems Manager
// Parameter Store.
//
// ## Behavior
//
// - `get`: GetParameter without decryption. `ParameterNotFound` is the only
//   error mapped to `ParameterLookup::NotFound`; everything else is fatal.
// - `put`: PutParameter as a plain `String` with overwrite, so it both
//   creates and updates.
// - No retries beyond the SDK's built-in retry policy.
//
// ## Client Lifetime
//
// The SDK client is built from the default credential/region chain on first
// use and reused for the life of the process. A missing configuration error
// therefore never reaches AWS.
//
// ## Required IAM Permissions
//
// - `ssm:GetParameter` and `ssm:PutParameter` on the parameter ARN

use async_trait::async_trait;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::types::{Parameter, ParameterType};
use ddns_core::traits::{ParameterLookup, ParameterStore};
use ddns_core::{Error, Result};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

/// Backend name used in errors and logs
const BACKEND: &str = "ssm";

/// Parameter store over AWS Systems Manager
#[derive(Debug, Default)]
pub struct SsmParameterStore {
    client: OnceCell<Client>,
}

impl SsmParameterStore {
    /// Create a store that loads AWS configuration on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already-configured client
    pub fn with_client(client: Client) -> Self {
        Self {
            client: OnceCell::new_with(Some(client)),
        }
    }

    /// Whether the SDK client has been built yet
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Get the shared client, building it on first use
    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                Client::new(&config)
            })
            .await
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get(&self, name: &str) -> Result<ParameterLookup> {
        let response = self
            .client()
            .await
            .get_parameter()
            .name(name)
            .with_decryption(false)
            .send()
            .await;

        match response {
            Ok(output) => lookup_from_parameter(name, output.parameter()),
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_parameter_not_found())
                {
                    warn!(parameter = name, "SSM parameter not found");
                    return Ok(ParameterLookup::NotFound);
                }

                let detail = DisplayErrorContext(&err).to_string();
                error!(parameter = name, error = %detail, "Error getting SSM parameter");
                Err(Error::backend(BACKEND, detail))
            }
        }
    }

    async fn put(&self, name: &str, value: &str) -> Result<()> {
        let response = self
            .client()
            .await
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(ParameterType::String)
            .overwrite(true)
            .send()
            .await;

        match response {
            Ok(output) => {
                info!(
                    parameter = name,
                    value,
                    version = output.version(),
                    "Successfully updated SSM parameter"
                );
                Ok(())
            }
            Err(err) => {
                let detail = DisplayErrorContext(&err).to_string();
                error!(
                    parameter = name,
                    value,
                    error = %detail,
                    "Error putting SSM parameter"
                );
                Err(Error::backend(BACKEND, detail))
            }
        }
    }

    fn store_name(&self) -> &'static str {
        BACKEND
    }
}

/// Extract the value from a GetParameter response
///
/// A successful response without a value means the service answered with
/// something we can't compare against; that is a store error, not "not found".
fn lookup_from_parameter(name: &str, parameter: Option<&Parameter>) -> Result<ParameterLookup> {
    match parameter.and_then(|p| p.value()) {
        Some(value) => Ok(ParameterLookup::Found(value.to_string())),
        None => {
            error!(parameter = name, "SSM parameter response has no value");
            Err(Error::backend(
                BACKEND,
                format!("parameter '{name}' returned no value"),
            ))
        }
    }
}
