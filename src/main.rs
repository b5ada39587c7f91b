use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use phpipam_legacy_migrator::config::Config;
use phpipam_legacy_migrator::output::{print_plan, print_report};
use phpipam_legacy_migrator::{load_records, migrate_to_phpipam, plan_migration};
use std::error::Error;
use std::path::Path;

const LOG_CONFIG_FILE: &str = "log4rs.yml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::parse();
    init_logging(config.debug)?;
    log::info!("#Start main()");

    if let Err(e) = run(&config).await {
        log::error!("Migration aborted: {e}");
        return Err(e.into());
    }
    Ok(())
}

async fn run(config: &Config) -> phpipam_legacy_migrator::error::Result<()> {
    config.validate()?;
    let records = load_records(config)?;

    if config.dry_run {
        log::info!("Dry run, nothing is written to phpIPAM");
        print_plan(&plan_migration(&records, config.order));
        return Ok(());
    }

    let report = migrate_to_phpipam(config, records).await?;
    print_report(&report);
    Ok(())
}

/// `log4rs.yml` when present, else a stderr console logger. `--debug`
/// always gets the console logger at debug level.
fn init_logging(debug: bool) -> Result<(), Box<dyn Error>> {
    if !debug && Path::new(LOG_CONFIG_FILE).exists() {
        log4rs::init_file(LOG_CONFIG_FILE, Default::default())?;
        return Ok(());
    }

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(log_config)?;
    Ok(())
}
