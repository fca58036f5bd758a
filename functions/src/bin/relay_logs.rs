use aws_config::BehaviorVersion;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::LevelFilter;
use log_relay::{CloudWatchSink, LogRelay, RelayConfig, Response, S3Store};
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> Result<(), Error> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()?;

    let config = RelayConfig::from_env();
    log::info!("config: {:?}", config);

    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let relay = LogRelay::new(
        S3Store::new(aws_sdk_s3::Client::new(&sdk_config)),
        CloudWatchSink::new(aws_sdk_cloudwatchlogs::Client::new(&sdk_config)),
        config.target(),
    );
    let relay = &relay;

    let func = service_fn(move |event: LambdaEvent<S3Event>| async move {
        log::info!("event: {:?}", event.payload);
        Ok::<Response, Error>(log_relay::handle(relay, event.payload).await)
    });
    lambda_runtime::run(func).await?;

    Ok(())
}
