use anyhow::Result;

use super::Session;
use crate::config::OutputFormat;

pub async fn execute(session: &Session, id: &str, connection: bool) -> Result<()> {
    let mut controller = session.controller(session.dialogs());
    controller.mount().await;

    let instance = session.resolve(&controller, id).await?;

    match session.format {
        OutputFormat::Json => crate::format::print_json(&instance)?,
        OutputFormat::Table if connection => controller.view_connection(&instance),
        OutputFormat::Table => controller.view_instance(&instance),
    }

    Ok(())
}
