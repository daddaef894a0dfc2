//! # Cache Warmer
//!
//! Fills the cache regions ahead of traffic, using the same config,
//! store and upstream client as the server.
//!
//! - Without `--force` a region with a live key is left alone
//! - With `--force` the live key is dropped and refetched
//!
//! Exits non-zero when any region comes back empty.
use std::time::Duration;

use anyhow::{Result, bail};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use server::state::{RefreshReport, RegionName, State};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Catalog,
    Tracks,
    All,
}

impl Target {
    pub fn regions(self) -> &'static [RegionName] {
        match self {
            Target::Catalog => &[RegionName::Catalog],
            Target::Tracks => &[RegionName::Tracks],
            Target::All => &RegionName::ALL,
        }
    }
}

pub async fn warm(target: Target, force: bool) -> Result<()> {
    let state = State::new().await?;
    let regions = target.regions();

    let pb = ProgressBar::new(regions.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut reports = Vec::with_capacity(regions.len());

    for &name in regions {
        pb.set_message(format!("Warming {}", name.as_str()));

        let report = if force {
            state.refresh(name).await?
        } else {
            state.warm(name).await
        };

        pb.println(summary(&report));
        reports.push(report);
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    let empty: Vec<&str> = reports
        .iter()
        .filter(|report| report.degraded.is_some())
        .map(|report| report.region)
        .collect();

    if !empty.is_empty() {
        warn!(?empty, "Some regions could not be filled");
        bail!("Regions left empty: {}", empty.join(", "));
    }

    Ok(())
}

fn summary(report: &RefreshReport) -> String {
    match report.degraded {
        Some(reason) => format!("{} ({}): empty, {:?}", report.region, report.key, reason),
        None => format!(
            "{} ({}): {} records from {}",
            report.region, report.key, report.records, report.source
        ),
    }
}
