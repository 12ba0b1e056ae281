#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = taskr_server::config::Config::from_env()?;
    taskr_server::web::start_web_server(config).await
}
