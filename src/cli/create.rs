use anyhow::{bail, Result};
use streams_core::host::DialogOutcome;
use streams_models::CreateInstanceRequest;

use super::Session;

pub async fn execute(session: &Session, request: CreateInstanceRequest) -> Result<()> {
    let name = request.name.clone();
    let mut controller = session.controller(session.dialogs().with_create(request));
    controller.mount().await;

    if controller.create_instance().await == DialogOutcome::Dismissed {
        bail!("Instance '{}' was not created", name);
    }

    session.render(&controller)
}
