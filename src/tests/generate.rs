use time::{Date, Month, Time};

use crate::{
    MAX_SATELLITES, NavInfo, NmeaParser, Present, SentenceMask, generate,
    sentences::{FixMode, Quality, Satellite},
};

fn snapshot() -> NavInfo {
    let mut in_use = heapless::Vec::new();
    in_use.extend_from_slice(&[4, 5, 9, 12, 24]).unwrap();

    let mut in_view = heapless::Vec::<Option<Satellite>, MAX_SATELLITES>::new();
    for (index, prn) in [1, 2, 12, 14, 15].into_iter().enumerate() {
        in_view
            .push(Some(Satellite {
                prn,
                elevation: Some(10 + index as u8),
                azimuth: Some(80 * index as u16),
                snr: (index % 2 == 0).then_some(40),
            }))
            .unwrap();
    }

    NavInfo {
        utc_date: Date::from_calendar_date(2024, Month::February, 29).ok(),
        utc_time: Time::from_hms_milli(12, 35, 19, 430).ok(),
        sig: Some(Quality::GPSFix),
        fix: Some(FixMode::Fix3D),
        pdop: Some(2.5),
        hdop: Some(1.3),
        vdop: Some(2.1),
        latitude: Some(48.1173),
        longitude: Some(-11.5),
        elevation: Some(545.4),
        speed: Some(18.52),
        track: Some(54.7),
        mtrack: Some(34.4),
        magvar: Some(-3.1),
        satellites_in_use_count: Some(5),
        satellites_in_use: Some(in_use),
        satellites_in_view_count: Some(5),
        satellites_in_view: Some(in_view),
        ..NavInfo::default()
    }
}

fn assert_close(actual: Option<f64>, expected: Option<f64>, tolerance: f64) {
    match (actual, expected) {
        (Some(actual), Some(expected)) => {
            assert!((actual - expected).abs() < tolerance, "{actual} != {expected}")
        }
        (actual, expected) => assert_eq!(actual, expected),
    }
}

#[test]
fn test_generate_order() {
    let text = generate(&snapshot(), SentenceMask::all());
    let kinds: Vec<_> = text.lines().map(|line| &line[1..6]).collect();

    assert_eq!(kinds, ["GPGGA", "GPGSA", "GPGSV", "GPGSV", "GPRMC", "GPVTG"]);
    assert!(text.ends_with("\r\n"));
    assert_eq!(text.matches("\r\n").count(), 6);
}

#[test]
fn test_generate_empty_mask() {
    assert_eq!(generate(&snapshot(), SentenceMask::empty()), "");
}

#[test]
fn test_generate_then_parse() {
    let source = snapshot();
    let text = generate(&source, SentenceMask::all());

    let mut info = NavInfo::default();
    let outcome = NmeaParser::new().parse(text.as_bytes(), &mut info);
    assert_eq!(outcome.merged, 6);
    assert_eq!(outcome.dropped, 0);

    assert_eq!(info.smask, SentenceMask::all());
    assert_eq!(info.utc_date, source.utc_date);
    assert_eq!(info.utc_time, source.utc_time);
    assert_eq!(info.sig, source.sig);
    assert_eq!(info.fix, source.fix);
    assert_eq!(info.satellites_in_use, source.satellites_in_use);
    assert_eq!(info.satellites_in_use_count, Some(5));
    assert_eq!(info.satellites_in_view_count, Some(5));

    let prns: Vec<_> = info
        .satellites_in_view
        .iter()
        .flatten()
        .flatten()
        .map(|satellite| satellite.prn)
        .collect();
    assert_eq!(prns, [1, 2, 12, 14, 15]);

    assert_close(info.latitude, source.latitude, 1e-6);
    assert_close(info.longitude, source.longitude, 1e-6);
    assert_close(info.speed, source.speed, 0.1);
    for (actual, expected) in [
        (info.pdop, source.pdop),
        (info.hdop, source.hdop),
        (info.vdop, source.vdop),
        (info.elevation, source.elevation),
        (info.track, source.track),
        (info.mtrack, source.mtrack),
        (info.magvar, source.magvar),
    ] {
        assert_close(actual, expected, 1e-9);
    }
}

#[test]
fn test_generate_sanitises() {
    let info = NavInfo {
        latitude: Some(91.0),
        longitude: Some(10.0),
        track: Some(-10.0),
        ..NavInfo::default()
    };
    let text = generate(&info, SentenceMask::GPGGA | SentenceMask::GPVTG);

    let mut parsed = NavInfo::default();
    NmeaParser::new().parse(text.as_bytes(), &mut parsed);

    assert_close(parsed.latitude, Some(89.0), 1e-6);
    assert_close(parsed.longitude, Some(-170.0), 1e-6);
    assert_eq!(parsed.track, Some(350.0));
    assert!(parsed.present().contains(Present::SMASK));
}

#[test]
fn test_generate_empty_snapshot() {
    let text = generate(&NavInfo::default(), SentenceMask::GPGGA | SentenceMask::GPGSV);
    assert_eq!(text, "$GPGGA,,,,,,,,,,,,,,*56\r\n$GPGSV,1,1,*79\r\n");
}

#[test]
fn test_generate_many_satellites_parses_back() {
    let mut info = NavInfo::default();
    let outcome = NmeaParser::new().parse(
        b"$GPGGA,123519,4807.038,N,01131.000,E,1,70,0.9,545.4,M,46.9,M,,*48\r\n",
        &mut info,
    );
    assert_eq!(outcome.merged, 1);
    assert_eq!(info.satellites_in_view_count, Some(70));

    let text = generate(&info, SentenceMask::GPGSV);
    assert_eq!(text.lines().count(), 16);
    assert!(text.starts_with("$GPGSV,16,1,64*"));

    let mut parsed = NavInfo::default();
    let outcome = NmeaParser::new().parse(text.as_bytes(), &mut parsed);
    assert_eq!(outcome.merged, 16);
    assert_eq!(outcome.dropped, 0);
    assert_eq!(parsed.satellites_in_view_count, Some(64));
}

#[test]
fn test_generate_after_group_shrinks() {
    let mut info = NavInfo::default();
    let stream = [
        "GPGSV,2,1,08,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45",
        "GPGSV,2,2,08,15,33,198,40,18,61,065,44,22,08,120,,25,40,280,39",
        "GPGSV,1,1,02,01,40,083,46,02,17,308,41",
    ]
    .map(crate::frame)
    .concat();
    assert_eq!(NmeaParser::new().parse(stream.as_bytes(), &mut info).merged, 3);

    let text = generate(&info, SentenceMask::GPGSV);
    assert_eq!(text, crate::frame("GPGSV,1,1,02,01,40,083,46,02,17,308,41"));
}
