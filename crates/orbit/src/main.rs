use orbit::clock::SystemClock;
use orbit::config;
use orbit::gui::shell::{Shell, ShellEffect};
use orbit::sys::runtime;
use orbitctl::store::{FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn open_store(config: &config::Config) -> Box<dyn KeyValueStore> {
    let store = match &config.store_dir {
        Some(dir) => Some(FileStore::new(dir)),
        None => FileStore::default_location(),
    };
    match store {
        Some(store) => {
            log::info!("Keeping preferences in {}", store.dir().display());
            Box::new(store)
        }
        None => {
            log::warn!("No data directory available, preferences will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    if let Err(e) = config::write_default_config() {
        log::warn!("Could not write default config: {}", e);
    }
    let config = config::load_or_default();
    let mut shell = Shell::new(&config, open_store(&config), Box::new(SystemClock));

    let (tx, rx) = async_channel::bounded(32);
    let animating = Arc::new(AtomicBool::new(false));

    // Start Background Services
    runtime::start_background_services(tx, animating.clone());

    while let Ok(event) = rx.recv_blocking() {
        for effect in shell.apply(event) {
            match effect {
                ShellEffect::Redraw => {}
                ShellEffect::LauncherClosed => {
                    shell.finish_launcher_close();
                    log::debug!("{:?}", effect);
                }
                effect => log::debug!("{:?}", effect),
            }
        }
        animating.store(shell.is_animating(), Ordering::Release);
    }

    Ok(())
}
