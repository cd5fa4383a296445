extern crate libpulse_binding as pulse;

use clap::Parser;
use log::info;

use std::error::Error;
use std::sync::mpsc;

mod cli;
mod config;
mod connect;
mod cycle;
mod error;
mod logging;
mod pacmd;
mod profile;
mod scheduler;
mod watcher;

use config::Backend;
use cycle::{Cycle, ProfileSwitcher};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    let settings = cli::Settings::load(cli)?;

    let pacmd = pacmd::Pacmd::default();
    let switcher: &dyn ProfileSwitcher = match settings.backend {
        Backend::Pacmd => &pacmd,
        Backend::Native => &connect::Native,
    };

    let cycle = Cycle::new(&settings.device, &pacmd, switcher);

    if settings.once {
        cycle.check()?;
        return Ok(());
    }

    let (queue, triggers) = mpsc::channel();
    if settings.watch {
        let path = watcher::device_path(&settings.adapter, &settings.device)?;
        watcher::start(path, queue);
    }

    info!(
        "start watching for profile changes at bluetooth device {} every {}s",
        settings.device,
        settings.interval.as_secs()
    );

    scheduler::run(&cycle, settings.interval, triggers);

    Ok(())
}
