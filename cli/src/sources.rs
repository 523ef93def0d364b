use std::sync::Arc;

use socker_core::ProxySource;
use socker_sources::{OculusConfig, OculusSource, ProxyMeshConfig, ProxyMeshSource};

use crate::config::SourceConfig;
use crate::error::{CliError, Result};

/// Builds the ordered `ProxySource` list from configuration, in the
/// order the operator configured them — order is semantic fallback
/// order.
pub fn build_sources(configs: &[SourceConfig]) -> Result<Vec<Arc<dyn ProxySource>>> {
    if configs.is_empty() {
        return Err(CliError::Config(
            "at least one [[sources]] entry is required".to_string(),
        ));
    }

    Ok(configs
        .iter()
        .map(|config| match config {
            SourceConfig::Oculus {
                tag,
                endpoint,
                auth_header_value,
                order_token,
                plan_type,
                country,
                enable_socks5,
                white_list_ip,
                classification,
            } => Arc::new(OculusSource::new(OculusConfig {
                tag: tag.clone(),
                endpoint: endpoint.clone(),
                auth_header_value: auth_header_value.clone(),
                order_token: order_token.clone(),
                plan_type: plan_type.clone(),
                country: country.clone(),
                enable_socks5: *enable_socks5,
                white_list_ip: white_list_ip.clone(),
                classification: *classification,
            })) as Arc<dyn ProxySource>,
            SourceConfig::ProxyMesh {
                tag,
                host,
                port,
                username,
                password,
            } => Arc::new(ProxyMeshSource::new(ProxyMeshConfig {
                tag: tag.clone(),
                host: host.clone(),
                port: *port,
                scheme: socker_core::Scheme::Http,
                username: username.clone(),
                password: password.clone(),
            })) as Arc<dyn ProxySource>,
        })
        .collect())
}
