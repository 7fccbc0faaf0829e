use anyhow::{bail, Result};
use streams_core::controller::DeleteOutcome;

use super::Session;

pub async fn execute(session: &Session, id: &str, yes: bool) -> Result<()> {
    let mut controller = session.controller(session.dialogs().assume_yes(yes));
    controller.mount().await;

    let instance = session.resolve(&controller, id).await?;
    if !controller.user().can_manage(&instance) {
        bail!("You do not have permission to delete instance '{}'", instance.name);
    }
    if instance.status.is_deleting() {
        println!("Instance '{}' is already being deleted.", instance.name);
        return Ok(());
    }

    match controller.delete_instance(&instance).await? {
        DeleteOutcome::Deleted => {
            println!("✓ Instance '{}' is being deleted", instance.name);
            session.render(&controller)
        }
        DeleteOutcome::Cancelled => {
            println!("Delete cancelled.");
            Ok(())
        }
        DeleteOutcome::Failed => bail!("Failed to delete instance '{}'", instance.name),
    }
}
