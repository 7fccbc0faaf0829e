use anyhow::{bail, Result};
use streams_core::controller::CommitReport;

use super::{ListArgs, Session};

pub async fn execute(session: &Session, args: &ListArgs) -> Result<()> {
    let mut controller = session.controller(session.dialogs());
    args.apply(&mut controller)?;

    if let CommitReport::Failed(e) = controller.mount().await {
        bail!("Failed to list instances: {}", e);
    }

    session.render(&controller)
}
