//! Print temperature and humidity once a second until interrupted.
//!
//! Usage: `hts221 /dev/i2c-1`

extern crate env_logger;
extern crate hts221_linux;
#[macro_use]
extern crate log;

use std::env;
use std::io::{self, Write};
use std::process;
use std::thread;
use std::time::Duration;

use hts221_linux::{Hts221, Hts221Result};

fn run(device: &str) -> Hts221Result<()> {
    let mut sensor = Hts221::open(device)?;
    sensor.begin()?;
    sensor.enable()?;
    info!("HTS221 on {} running at {}", device, sensor.output_data_rate()?);

    let stdout = io::stdout();
    loop {
        thread::sleep(Duration::from_secs(1));
        let measurement = sensor.measure()?;
        let mut out = stdout.lock();
        write!(
            out,
            " Temp: {:.2}°C Hum: {}        \r",
            measurement.temperature.as_celsius(),
            measurement.humidity
        )?;
        out.flush()?;
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <i2c device, e.g. /dev/i2c-1>", args[0]);
        process::exit(1);
    }

    if let Err(err) = run(&args[1]) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
