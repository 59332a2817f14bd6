use crate::events::{AppEvent, Input};
use async_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Roughly one display refresh.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Emits `Input::Frame` while the shell reports running animations.
pub async fn run_ticker(tx: Sender<AppEvent>, animating: Arc<AtomicBool>) {
    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        if animating.load(Ordering::Acquire) && tx.send(AppEvent::Input(Input::Frame)).await.is_err()
        {
            break;
        }
    }
}

pub fn start_background_services(tx: Sender<AppEvent>, animating: Arc<AtomicBool>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    run_ticker(tx, animating).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
