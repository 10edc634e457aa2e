mod books;
mod migration;
mod orders;
mod people;
mod resolution;
#[cfg(not(feature = "disable-transactions"))]
mod unique;

use books::books;
use log::LevelFilter;
use migration::migration;
use orders::orders;
use people::people;
use resolution::resolution;
use std::env;
use tether::Connection;
#[cfg(not(feature = "disable-transactions"))]
use unique::unique;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs every scenario against a connection to an empty database.
pub async fn execute_tests<C: Connection>(mut connection: C) {
    people(&mut connection).await;
    books(&mut connection).await;
    resolution(&mut connection).await;
    orders(&mut connection).await;
    #[cfg(not(feature = "disable-transactions"))]
    unique(&mut connection).await;
    migration(&mut connection).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
