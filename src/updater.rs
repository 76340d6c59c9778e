use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, PartialEq, Eq)]
pub struct UpdateHint {
    pub current_version: String,
    pub latest_version: String,
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

pub fn current_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn parse_version(tag: &str) -> Result<semver::Version, Box<dyn std::error::Error>> {
    let version_str = tag.strip_prefix('v').unwrap_or(tag);
    Ok(semver::Version::parse(version_str)?)
}

fn compare(current: &str, tag: &str) -> Result<Option<UpdateHint>, Box<dyn std::error::Error>> {
    let current_parsed = parse_version(current)?;
    let latest = parse_version(tag)?;

    if latest <= current_parsed {
        return Ok(None);
    }

    Ok(Some(UpdateHint {
        current_version: current.to_string(),
        latest_version: tag.to_string(),
    }))
}

/// Asks `feed` for the latest release and returns a hint when it is newer.
pub fn check(feed: &str) -> Result<Option<UpdateHint>, Box<dyn std::error::Error>> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(5)))
        .build()
        .into();

    let response: Release = agent
        .get(feed)
        .header("Accept", "application/json")
        .header("User-Agent", "js-packager")
        .call()
        .map_err(|e| format!("failed to fetch latest release: {e}"))?
        .body_mut()
        .read_json()?;

    compare(current_version(), &response.tag_name)
}
