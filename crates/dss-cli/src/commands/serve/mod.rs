//! Serve command implementation - HTTP access to the comparison

#[cfg(feature = "serve")]
mod server;

use anyhow::Result;

use crate::cli::{GlobalArgs, ServeArgs};

/// Execute the serve command
pub async fn execute(args: &ServeArgs, global: &GlobalArgs) -> Result<()> {
    #[cfg(feature = "serve")]
    {
        server::execute(args, global).await
    }
    #[cfg(not(feature = "serve"))]
    {
        let _ = (args, global);
        anyhow::bail!(
            "The `serve` command requires the `serve` feature.\n\
             Rebuild with: cargo build -p dss-cli --features serve"
        );
    }
}
