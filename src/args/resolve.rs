use std::collections::BTreeSet;
use std::net::IpAddr;

use tracing::{debug, warn};

use super::types::Target;

/// Replaces a single host with every IPv4 address it resolves to.
///
/// Lists with more than one entry are returned unchanged, as is a single host
/// whose lookup fails or yields only one address.
pub async fn expand_dns_round_robin(targets: Vec<Target>) -> Vec<Target> {
    let (host, port) = match targets.as_slice() {
        [target] => (target.host().to_owned(), target.port()),
        _ => return targets,
    };
    if host.parse::<IpAddr>().is_ok() {
        return targets;
    }

    let resolved = match tokio::net::lookup_host((host.as_str(), port)).await {
        Ok(addrs) => addrs,
        Err(err) => {
            warn!("DNS lookup for {} failed: {}", host, err);
            return targets;
        }
    };

    let addresses: BTreeSet<IpAddr> = resolved
        .map(|addr| addr.ip())
        .filter(IpAddr::is_ipv4)
        .collect();
    if addresses.len() < 2 {
        debug!(
            "DNS round robin for {} found {} IPv4 address(es), keeping host",
            host,
            addresses.len()
        );
        return targets;
    }

    debug!(
        "DNS round robin expanded {} into {} addresses",
        host,
        addresses.len()
    );
    addresses
        .into_iter()
        .map(|ip| Target::new(ip.to_string(), port))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use std::future::Future;

    fn run_async_test<F>(future: F) -> AppResult<()>
    where
        F: Future<Output = AppResult<()>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
        runtime.block_on(future)
    }

    #[test]
    fn multiple_targets_are_kept() -> AppResult<()> {
        run_async_test(async {
            let targets = vec![Target::new("a.example", 21), Target::new("b.example", 21)];
            let expanded = expand_dns_round_robin(targets.clone()).await;
            if expanded != targets {
                return Err(AppError::validation("Expected targets to be unchanged"));
            }
            Ok(())
        })
    }

    #[test]
    fn ip_literal_is_kept() -> AppResult<()> {
        run_async_test(async {
            let targets = vec![Target::new("127.0.0.1", 2121)];
            let expanded = expand_dns_round_robin(targets.clone()).await;
            if expanded != targets {
                return Err(AppError::validation("Expected IP literal to be unchanged"));
            }
            Ok(())
        })
    }

    #[test]
    fn localhost_keeps_single_address() -> AppResult<()> {
        run_async_test(async {
            let targets = vec![Target::new("localhost", 21)];
            let expanded = expand_dns_round_robin(targets.clone()).await;
            if expanded.is_empty() {
                return Err(AppError::validation("Expected at least one target"));
            }
            if expanded.iter().any(|target| target.port() != 21) {
                return Err(AppError::validation("Expected port to be preserved"));
            }
            Ok(())
        })
    }
}
