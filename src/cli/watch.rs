use anyhow::Result;
use streams_core::controller::CommitReport;
use streams_core::{Poller, ViewState};

use super::{ListArgs, Session};
use crate::config::OutputFormat;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

pub async fn execute(session: &Session, args: &ListArgs) -> Result<()> {
    let mut controller = session.controller(session.dialogs());
    args.apply(&mut controller)?;
    controller.mount().await;
    redraw(session, &controller);

    if *controller.view() == ViewState::Unauthorized {
        return Ok(());
    }

    tracing::info!(
        "Watching instances every {:?}, press Ctrl-C to stop",
        controller.config().poll_interval
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    Poller::for_controller(&controller)
        .run(&mut controller, shutdown, |controller, report| {
            if matches!(report, CommitReport::Applied | CommitReport::Unauthorized) {
                redraw(session, controller);
            }
        })
        .await;

    Ok(())
}

fn redraw(session: &Session, controller: &streams_core::Controller) {
    if session.format == OutputFormat::Table {
        print!("{}", CLEAR_SCREEN);
    }
    if let Err(e) = session.render(controller) {
        tracing::error!("Failed to render instances: {}", e);
    }
}
