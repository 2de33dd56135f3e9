//! Download frames for every configured view.

use std::time::Duration;

use arkstorm_model::config::PipelineConfig;
use arkstorm_weatherbell::{ReqwestTransport, SessionSource, Weatherbell};

pub async fn run(config: &PipelineConfig) -> anyhow::Result<()> {
    let provider = &config.providers.weatherbell;
    println!(
        "Downloading {} view(s) into {}",
        provider.views.len(),
        config.assets_dir.display()
    );

    let transport = ReqwestTransport::new(Duration::from_secs(provider.timeout_secs))?;
    let session = SessionSource::resolve(provider.session_id.as_deref());

    let views = Weatherbell::new(provider)
        .download(&transport, &session, &config.assets_dir)
        .await?;

    for (name, dir) in &views {
        println!("  {name}: {}", dir.display());
    }
    Ok(())
}
