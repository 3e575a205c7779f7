use std::future::Future;
use std::io::{self, Write};
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use interview_cli::app::App;
use interview_cli::backends::backend_for_kind;
use interview_gateway::{init_tracing, CancelSignal, EnvConfig, InterviewGateway};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> io::Result<()> {
    let env_config = EnvConfig::from_env();
    init_tracing(env_config.log_filter.as_deref());

    let kind = env_config.backend_kind().map_err(io::Error::other)?;
    let config = env_config.gateway_config();
    let backend = backend_for_kind(kind, &config).map_err(io::Error::other)?;
    let gateway = InterviewGateway::new(backend).with_defaults(config.defaults);

    let activation_code = std::env::args().nth(1).filter(|code| !code.trim().is_empty());
    let cancel: CancelSignal = Arc::new(AtomicBool::new(false));
    let mut app = App::new(gateway, activation_code);
    let mut stdout = io::stdout();

    with_ctrl_c(&cancel, app.start(&cancel, &mut stdout)).await?;
    stdout.flush()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while !app.should_exit {
        print!("> ");
        stdout.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        with_ctrl_c(&cancel, app.on_line(&line, &cancel, &mut stdout)).await?;
        stdout.flush()?;
    }

    Ok(())
}

/// Drives `call` to completion, raising `cancel` if Ctrl-C arrives first.
async fn with_ctrl_c<F: Future>(cancel: &CancelSignal, call: F) -> F::Output {
    let mut call = pin!(call);
    tokio::select! {
        output = &mut call => output,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("cancelling outstanding backend call");
            cancel.store(true, Ordering::Release);
            call.await
        }
    }
}
