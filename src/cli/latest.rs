use crate::config::Config;
use crate::error::{PaddockError, Result};
use crate::release::fetcher;
use crate::release::github::GithubClient;
use crate::release::query;

/// Execute the `latest` command: one-shot fetch, print the latest version
/// per platform.
pub async fn execute() -> Result<()> {
    let config = Config::load()?;
    let client = GithubClient::new(&config)?;

    let history = fetcher::fetch_all(&client).await.ok_or(PaddockError::NoData)?;
    let latest = query::latest(&history);
    if latest.assets.is_empty() {
        println!(
            "No classifiable release assets in {}/{}",
            config.account, config.repository
        );
        return Ok(());
    }

    for (id, asset) in &latest.assets {
        println!(
            "{:<16} {:<10} {:>8.1} MB  {}",
            id.as_str(),
            asset.version,
            asset.size,
            asset.url
        );
    }
    Ok(())
}
