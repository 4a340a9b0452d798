use radioinfo_core::{UpdateConfig, UpdateController};
use radioinfo_daemon::{LogPresenter, UpdateTimer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| ["radioinfo_core=info", "radioinfo_daemon=info"].join(",").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = UpdateConfig::from_env()?;
    let interval = config.update_interval();
    info!(url = %config.base_url, interval_secs = interval.as_secs(), "starting radioinfo");

    let (controller, events) = UpdateController::new(config)?;

    let timer = tokio::spawn(UpdateTimer::new(controller.clone(), interval).run());
    let presenter = {
        let controller = controller.clone();
        tokio::spawn(async move {
            let mut presenter = LogPresenter::default();
            events.run(&controller, &mut presenter).await;
        })
    };

    tokio::signal::ctrl_c().await?;
    controller.shutdown();
    timer.await?;
    presenter.await?;
    info!("radioinfo stopped");
    Ok(())
}
