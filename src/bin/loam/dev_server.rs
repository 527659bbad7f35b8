//! Local preview server for generated HTML output
//!
//! Serves the static output directory so the generated site can be browsed
//! before deployment. The build is a one-shot batch, so there is no file
//! watching or live reload here: rebuild and refresh.

use axum::Router;
use std::{net::SocketAddr, path::PathBuf};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Preview server over a generated output directory
pub struct DevServer {
    /// Directory containing generated HTML files
    html_root: PathBuf,
    /// Port the server binds to
    port: u16,
}

impl DevServer {
    pub fn new(html_root: PathBuf, port: u16) -> Self {
        Self { html_root, port }
    }

    /// Start the server (blocking until the shutdown signal resolves)
    pub async fn serve(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));

        let app = Router::new()
            .nest_service("/", ServeDir::new(&self.html_root))
            .layer(TraceLayer::new_for_http());

        tracing::info!("Preview server starting on http://{}", addr);
        println!("\n🌐 Serving at http://{}", addr);
        println!("📁 Serving: {}", self.html_root.display());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        tracing::info!("Preview server shut down");
        Ok(())
    }
}
