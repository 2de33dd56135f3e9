//! ArkStorm WeatherBell Provider
//!
//! Downloads forecast frame sequences for configured views:
//!
//! ```text
//! credentials ── login ── session token
//!                              │
//! view ── cycle list ── select latest cycle (allowed UTC hours)
//!                              │
//!          frame names ── time window (cycle + timespan)
//!                              │
//!          fetch ── label (local time) ── assets/<view>/NNN.png
//! ```

pub mod api;
pub mod cycle;
pub mod frames;
pub mod label;
pub mod render;
pub mod session;
pub mod transport;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use arkstorm_model::config::WeatherbellConfig;
use arkstorm_model::view::View;

pub use cycle::select_latest_cycle;
pub use frames::select_frame_window;
pub use render::FrameRenderer;
pub use session::{authenticate, Credentials, SessionSource, SessionToken};
pub use transport::{HttpResponse, ProviderTransport, ReqwestTransport};

pub const LOGIN_URL: &str = "https://www.weatherbell.com/login-captcha";
pub const API_IMAGE_URL: &str = "https://maps.api.weatherbell.com/image/";
pub const IMAGE_STORAGE_URL: &str = "https://images.weatherbell.com";

/// Provider endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login_url: String,
    pub api_url: String,
    pub image_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login_url: LOGIN_URL.to_string(),
            api_url: API_IMAGE_URL.to_string(),
            image_base: IMAGE_STORAGE_URL.to_string(),
        }
    }
}

/// Downloads every configured view.
pub struct Weatherbell<'a> {
    config: &'a WeatherbellConfig,
    endpoints: Endpoints,
}

impl<'a> Weatherbell<'a> {
    pub fn new(config: &'a WeatherbellConfig) -> Self {
        Self::with_endpoints(config, Endpoints::default())
    }

    pub fn with_endpoints(config: &'a WeatherbellConfig, endpoints: Endpoints) -> Self {
        Self { config, endpoints }
    }

    /// Download all views into `target_dir/<view name>`.
    ///
    /// With no views configured this returns an empty map without touching
    /// the network. Otherwise the session is obtained once and views run in
    /// name order; the first failing view aborts the download.
    pub async fn download<T: ProviderTransport + ?Sized>(
        &self,
        transport: &T,
        session: &SessionSource,
        target_dir: &Path,
    ) -> ArkstormResult<BTreeMap<String, PathBuf>> {
        let mut views = BTreeMap::new();
        if self.config.views.is_empty() {
            tracing::info!("No WeatherBell views configured; skipping download");
            return Ok(views);
        }

        let token = session.obtain(transport, &self.endpoints).await?;

        for (name, view) in &self.config.views {
            let view_dir = target_dir.join(name);
            self.download_view(transport, &token, view, &view_dir)
                .await
                .map_err(|e| e.in_view(name))?;
            views.insert(name.clone(), view_dir);
        }

        Ok(views)
    }

    /// Select the latest cycle of one view and render its frame window.
    pub async fn download_view<T: ProviderTransport + ?Sized>(
        &self,
        transport: &T,
        token: &SessionToken,
        view: &View,
        view_dir: &Path,
    ) -> ArkstormResult<usize> {
        let label = view.time_label().map_err(ArkstormError::config)?;

        let cycles = cycle::fetch_cycle_list(transport, &self.endpoints, token, view).await?;
        let cycle = select_latest_cycle(&cycles, &view.cyclehours)?;
        tracing::info!(
            cycle = %cycle,
            product = %view.product,
            region = %view.region,
            parameter = %view.parameter,
            "Selected cycle"
        );

        let frames =
            frames::fetch_frame_window(transport, &self.endpoints, token, view, cycle).await?;

        FrameRenderer::new(transport, label)
            .render_frames(&frames, view_dir)
            .await
    }
}
