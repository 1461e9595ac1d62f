use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use redat::{
    api::ApiClient,
    config::Config,
    contribute::{Contribution, ImageFile},
};

#[derive(Args)]
pub struct ContributeArgs {
    /// Start station name
    #[arg(long)]
    pub start: String,
    /// End station name
    #[arg(long)]
    pub end: String,
    /// Route price in Birr
    #[arg(long)]
    pub price: f64,
    /// Intermediate station names, in route order
    #[arg(long = "via")]
    pub via: Vec<String>,
    /// Image of the start station
    #[arg(long)]
    pub start_image: Option<PathBuf>,
    /// Image of the end station
    #[arg(long)]
    pub end_image: Option<PathBuf>,
    /// Additional notes about the route
    #[arg(long, default_value = "")]
    pub notes: String,
}

pub async fn contribute(config: &Config, args: ContributeArgs) -> anyhow::Result<()> {
    let mut contribution = Contribution::new();
    contribution.start_station = args.start;
    contribution.end_station = args.end;
    contribution.price = args.price;
    contribution.notes = args.notes;

    if let Some(path) = &args.start_image {
        let image = ImageFile::load(path).with_context(|| format!("reading {}", path.display()))?;
        contribution.start_image = Some(image);
    }
    if let Some(path) = &args.end_image {
        let image = ImageFile::load(path).with_context(|| format!("reading {}", path.display()))?;
        contribution.end_image = Some(image);
    }

    if !args.via.is_empty() {
        contribution.set_has_intermediates(true);
        // The first slot already exists on a fresh form.
        for (index, name) in args.via.into_iter().enumerate() {
            if index > 0 {
                contribution.add_intermediate();
            }
            contribution.set_intermediate(index, name);
        }
    }

    contribution.validate()?;

    let client = ApiClient::from_config(config)?;
    client.contribute(&contribution).await?;
    println!("Thank you for your contribution!");
    Ok(())
}
