use anyhow::{bail, Result};
use streams_core::host::DialogOutcome;

use super::Session;

pub async fn execute(session: &Session, id: &str, new_owner: String) -> Result<()> {
    let mut controller = session.controller(session.dialogs().with_new_owner(new_owner));
    controller.mount().await;

    let instance = session.resolve(&controller, id).await?;
    if !controller.user().can_manage(&instance) {
        bail!(
            "You do not have permission to change the owner of instance '{}'",
            instance.name
        );
    }

    if controller.change_owner(&instance).await == DialogOutcome::Dismissed {
        bail!("Owner of '{}' was not changed", instance.name);
    }

    session.render(&controller)
}
