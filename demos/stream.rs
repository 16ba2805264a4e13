//! Feeds a recorded receiver log through the stream parser in serial-sized
//! chunks and prints the snapshot after each one.
//!
//! Run with `RUST_LOG=trace` to see every merged sentence.

use nmea0183_nav::{NavInfo, NmeaParser, SentenceMask, generate};

const LOG: &[u8] = b"\x00\x00$GPGSV,2,1,08,01,40,083,46,02,17,3\
$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n\
$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39\r\n\
$GPGSV,2,1,08,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75\r\n\
$GPGSV,2,2,08,15,33,198,40,18,61,065,44,22,08,120,,25,40,280,39*74\r\n\
$GPZDA,201530.00,04,07,2002,00,00*60\r\n\
$GPRMC,225446,A,4916.45,N,12311.12,W,000.5,054.7,191194,020.3,E*68\r\n\
$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*00\r\n\
$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut parser = NmeaParser::new();
    let mut info = NavInfo::default();

    for chunk in LOG.chunks(32) {
        let outcome = parser.parse(chunk, &mut info);
        if outcome.merged > 0 || outcome.dropped > 0 {
            println!(
                "merged {} dropped {}: {:?}",
                outcome.merged,
                outcome.dropped,
                info.present()
            );
        }
    }

    println!("{info:#?}");
    print!("{}", generate(&info, SentenceMask::all()));
}
