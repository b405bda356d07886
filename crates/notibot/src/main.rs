use std::sync::Arc;

use notibot_core::{
    bounded::BoundedStore,
    clock::{Clock, SystemClock},
    codes::CodeStore,
    config::Config,
    dispatch::CommandDispatcher,
    linking::AccountLinker,
    status::StatusResolver,
    Error,
};
use notibot_supabase::{SupabaseConfig, SupabaseStore};

mod health;

#[tokio::main]
async fn main() -> Result<(), Error> {
    notibot_core::logging::init("notibot")?;

    let cfg = Arc::new(Config::load()?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store = Arc::new(BoundedStore::new(
        Arc::new(SupabaseStore::new(SupabaseConfig::from(cfg.as_ref()))?),
        cfg.store_timeout,
    ));
    let codes = CodeStore::new(store.clone(), clock.clone());
    let linker = Arc::new(AccountLinker::new(
        codes,
        store.clone(),
        cfg.fallback_user_name.clone(),
    ));
    let resolver = Arc::new(StatusResolver::new(store, cfg.fallback_user_name.clone()));
    let commands = Arc::new(CommandDispatcher::new(
        linker,
        resolver,
        cfg.command_timeout,
    ));

    let port = cfg.port;
    tokio::select! {
        res = notibot_telegram::router::run_polling(cfg, commands) => {
            res.map_err(|e| Error::External(format!("telegram bot failed: {e}")))?;
        }
        res = health::serve(port, clock) => {
            res?;
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
