use crate::admin;
use crate::admin::state::AdminConfig;
use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server { port, public_url } => {
            let config = AdminConfig::new(globals.api_url.clone(), public_url);
            admin::new(port, config, globals.api_token.clone()).await?;
        }
    }

    Ok(())
}
