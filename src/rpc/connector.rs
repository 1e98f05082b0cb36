//! Endpoint selection

use crate::{
    error::{AgentError, Result},
    rpc::{ChainNode, Connector},
};
use tracing::{error, info, warn};
use url::Url;

/// Return a handle to the first endpoint that answers a block-height query.
///
/// Endpoints are probed strictly in order and the whole list is exhausted
/// before giving up with [`AgentError::NoEndpointAvailable`]. Callers run this
/// at the start of every cycle, so a node that comes back is picked up on the
/// next one.
pub async fn connect_first<C: Connector>(connector: &C, endpoints: &[Url]) -> Result<C::Node> {
    for endpoint in endpoints {
        let probe = async {
            let node = connector.open(endpoint).await?;
            let height = node.block_number().await?;
            Ok::<_, AgentError>((node, height))
        };

        match probe.await {
            Ok((node, height)) => {
                info!("✅ Connected to RPC: {} (block {})", endpoint, height);
                return Ok(node);
            }
            Err(e) => warn!("❌ Failed to connect to RPC: {}: {}", endpoint, e),
        }
    }

    error!("🛑 No valid RPC URLs available");
    Err(AgentError::NoEndpointAvailable {
        tried: endpoints.len(),
    })
}
