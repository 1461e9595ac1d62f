use redat::{api::ApiClient, config::Config};

pub async fn stations(config: &Config) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;
    let stations = client.stations().await?;

    println!("{} stations", stations.len());
    for station in stations {
        println!("{}  ({})", station.name, station.coordinate);
    }
    Ok(())
}
