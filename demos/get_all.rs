extern crate hts221_linux;

use std::env;
use std::thread;
use std::time::Duration;

use hts221_linux::{AvgH, AvgT, Hts221};

fn main() {
    let device = env::args().nth(1).unwrap_or_else(|| "/dev/i2c-1".to_string());
    let mut sensor = Hts221::open(&device).expect("Couldn't open HTS221");
    println!("WHO_AM_I: 0x{:02x}", sensor.read_id().expect("Couldn't read id"));

    sensor.begin().expect("Couldn't initialise HTS221");
    sensor
        .set_averaging(AvgH::Avg32, AvgT::Avg16)
        .expect("Couldn't set averaging");
    sensor.set_odr(7.0).expect("Couldn't set data rate");
    sensor.enable().expect("Couldn't power up");

    let (avg_h, avg_t) = sensor.averaging().expect("Couldn't get averaging");
    println!(
        "Averaging {} humidity / {} temperature samples at {}",
        avg_h.samples(),
        avg_t.samples(),
        sensor.output_data_rate().expect("Couldn't get data rate")
    );
    println!(
        "Calibration: {:?}",
        sensor.calibration().expect("Couldn't get calibration")
    );

    loop {
        let status = sensor.status().expect("Couldn't get status");
        if status.humidity_available() && status.temperature_available() {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }

    let measurement = sensor.measure().expect("Couldn't get measurement");
    println!("It's {} on the humidity sensor", measurement.temperature);
    println!("It's {} relative humidity", measurement.humidity);

    sensor.end().expect("Couldn't power down");
}
