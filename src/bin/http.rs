#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use shift_board::{Board, BoardConfig, http_api};

    let config = BoardConfig::load()?;
    init_tracing(&config.log_level)?;

    let addr: SocketAddr = config.http_addr.parse()?;
    let board = if config.seed_sample_data {
        Board::with_sample_data(config.missing_policy)
    } else {
        Board::new(config.missing_policy)
    };
    let board = Arc::new(board);

    if let Some(path) = &config.sqlite_path {
        persist_to_sqlite(&board, path)?;
    }

    http_api::serve(addr, board).await?;
    Ok(())
}

#[cfg(feature = "http_api")]
fn init_tracing(default_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SHIFT_BOARD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| format!("failed to initialize tracing subscriber: {err}"))?;
    Ok(())
}

/// Load any stored board, then write the board back after every change to
/// either store.
#[cfg(all(feature = "http_api", feature = "sqlite"))]
fn persist_to_sqlite(
    board: &std::sync::Arc<shift_board::Board>,
    path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use shift_board::{BoardRepository, SqliteBoardRepository};
    use std::sync::Arc;

    let repository = Arc::new(SqliteBoardRepository::new(path)?);
    if let Some(snapshot) = repository.load_board()? {
        tracing::info!(path = %path.display(), "restoring board from sqlite");
        board.restore(snapshot);
    }

    let save = {
        let board = Arc::downgrade(board);
        let repository = Arc::clone(&repository);
        move || {
            let Some(board) = board.upgrade() else {
                return;
            };
            if let Err(err) = repository.save_board(&board) {
                tracing::error!(error = %err, "failed to persist board");
            }
        }
    };
    let on_schedule_change = save.clone();
    board.tasks.subscribe(save);
    board.schedules.subscribe(on_schedule_change);
    Ok(())
}

#[cfg(all(feature = "http_api", not(feature = "sqlite")))]
fn persist_to_sqlite(
    _board: &std::sync::Arc<shift_board::Board>,
    path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::warn!(
        path = %path.display(),
        "sqlite_path is set but the `sqlite` feature is disabled; running in memory"
    );
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
