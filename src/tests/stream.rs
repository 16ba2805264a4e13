use time::{Date, Month, Time};

use crate::{
    ChecksumMode, DiagnosticSink, NavInfo, NmeaError, NmeaParser, NmeaParserBuilder, ParseOutcome,
    Present, SentenceKind, SentenceMask, checksum,
    sentences::{FixMode, Quality},
};

const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
const VTG: &[u8] = b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n";
const RMC: &[u8] = b"$GPRMC,225446,A,4916.45,N,12311.12,W,000.5,054.7,191194,020.3,E*68\r\n";
const GSA: &[u8] = b"$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39\r\n";
const GSV_1: &[u8] = b"$GPGSV,2,1,08,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75\r\n";
const GSV_2: &[u8] = b"$GPGSV,2,2,08,15,33,198,40,18,61,065,44,22,08,120,,25,40,280,39*74\r\n";
const ZDA: &[u8] = b"$GPZDA,201530.00,04,07,2002,00,00*60\r\n";

#[derive(Debug, Default)]
struct Spy {
    traces: Vec<String>,
    errors: Vec<String>,
}

impl DiagnosticSink for Spy {
    fn trace(&mut self, text: &str) {
        self.traces.push(text.to_owned());
    }

    fn error(&mut self, text: &str) {
        self.errors.push(text.to_owned());
    }
}

fn framed(payload: &[u8]) -> Vec<u8> {
    let (_, cc) = checksum(payload);
    let mut frame = vec![b'$'];
    frame.extend_from_slice(payload);
    frame.extend_from_slice(format!("*{cc:02X}\r\n").as_bytes());
    frame
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.unwrap_or(f64::NAN);
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}

#[test]
fn test_gga_frame() {
    let mut spy = Spy::default();
    let mut parser = NmeaParserBuilder::new().build_with_sink(&mut spy);
    let mut info = NavInfo::default();

    let outcome = parser.parse(GGA, &mut info);
    assert_eq!(
        outcome,
        ParseOutcome {
            consumed: GGA.len(),
            merged: 1,
            dropped: 0
        }
    );

    assert_eq!(
        info.present(),
        Present::SMASK
            | Present::UTCTIME
            | Present::LAT
            | Present::LON
            | Present::SIG
            | Present::SATINVIEWCOUNT
            | Present::HDOP
            | Present::ELV
    );
    assert_eq!(info.smask, SentenceMask::GPGGA);
    assert_eq!(info.utc_time, Time::from_hms(12, 35, 19).ok());
    assert_close(info.latitude, 48.0 + 7.038 / 60.0);
    assert_close(info.longitude, 11.0 + 1.0 / 60.0);
    assert_eq!(info.sig, Some(Quality::GPSFix));
    assert_eq!(info.satellites_in_view_count, Some(8));
    assert_eq!(info.hdop, Some(0.9));
    assert_eq!(info.elevation, Some(545.4));

    drop(parser);
    assert_eq!(spy.traces, [std::str::from_utf8(&GGA[1..GGA.len() - 5]).unwrap()]);
    assert!(spy.errors.is_empty());
}

#[test]
fn test_checksum_mismatch_is_dropped() {
    let corrupted = String::from_utf8(GGA.to_vec()).unwrap().replace("*47", "*00");
    let mut parser = NmeaParserBuilder::new().build_with_sink(Spy::default());
    let mut info = NavInfo::default();

    let outcome = parser.parse(corrupted.as_bytes(), &mut info);
    assert_eq!(outcome.merged, 0);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(info, NavInfo::default());
    assert_eq!(parser.sink().errors, ["checksum mismatch: calculated 47, found 00"]);
}

#[test]
fn test_feed_reports_each_frame() {
    let mut parser = NmeaParserBuilder::new().build_with_sink(());
    let mut info = NavInfo::default();

    let corrupted = String::from_utf8(VTG.to_vec()).unwrap().replace("*48", "*49");
    let results: Vec<_> = corrupted
        .bytes()
        .chain(VTG.iter().copied())
        .chain(*b"$")
        .filter_map(|b| parser.feed(b, &mut info))
        .collect();

    assert_eq!(
        results,
        [
            Err(NmeaError::ChecksumMismatch {
                expected: 0x48,
                found: 0x49
            }),
            Ok(SentenceKind::GPVTG),
        ]
    );
}

#[test]
fn test_resynchronises_on_dollar() {
    let mut parser = NmeaParserBuilder::new().build_with_sink(Spy::default());
    let mut info = NavInfo::default();

    let mut stream = b"\x00\xffnoise$GPGGA,1235".to_vec();
    stream.extend_from_slice(GGA);

    let outcome = parser.parse(&stream, &mut info);
    assert_eq!(outcome.merged, 1);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(info.hdop, Some(0.9));
    assert_eq!(parser.sink().traces[0], "unexpected '$', resynchronising");
}

#[test]
fn test_fragmented_input() {
    let mut stream = Vec::new();
    for frame in [GGA, GSA, GSV_1, GSV_2, RMC, VTG] {
        stream.extend_from_slice(frame);
    }

    let mut whole = NavInfo::default();
    let outcome = NmeaParser::new().parse(&stream, &mut whole);
    assert_eq!(outcome.merged, 6);

    let mut parser = NmeaParser::new();
    let mut fragmented = NavInfo::default();
    let merged: usize = stream
        .iter()
        .map(|&b| parser.parse(&[b], &mut fragmented).merged)
        .sum();

    assert_eq!(merged, 6);
    assert_eq!(fragmented, whole);
}

#[test]
fn test_single_line_ending() {
    let mut parser = NmeaParser::new();
    let mut info = NavInfo::default();

    let frame = &VTG[..VTG.len() - 1];
    assert_eq!(parser.parse(frame, &mut info).merged, 0);
    assert_eq!(info.speed, None);

    // the next frame's '$' completes the pending one
    let outcome = parser.parse(GGA, &mut info);
    assert_eq!(outcome.merged, 2);
    assert_eq!(info.smask, SentenceMask::GPGGA | SentenceMask::GPVTG);
}

#[test]
fn test_presence_discipline() {
    let mut parser = NmeaParser::new();
    let mut info = NavInfo::default();

    parser.parse(GGA, &mut info);
    parser.parse(VTG, &mut info);
    let before = info.clone();

    // a void RMC degrades the fix but keeps the last known position
    let void = framed(b"GPRMC,225446,V,,,,,,,191194,,");
    assert_eq!(parser.parse(&void, &mut info).merged, 1);

    assert_eq!(info.latitude, before.latitude);
    assert_eq!(info.longitude, before.longitude);
    assert_eq!(info.speed, before.speed);
    assert_eq!(info.sig, Some(Quality::NoFix));
    assert_eq!(info.fix, Some(FixMode::NoFix));
    assert_eq!(info.utc_time, Time::from_hms(22, 54, 46).ok());
    assert_eq!(info.utc_date, Date::from_calendar_date(1994, Month::November, 19).ok());

    // empty GGA fields leave the snapshot untouched
    let empty = framed(b"GPGGA,,,,,,,,,,,,,,");
    assert_eq!(parser.parse(&empty, &mut info).merged, 1);
    assert_eq!(info.hdop, before.hdop);
    assert_eq!(info.elevation, before.elevation);
}

#[test]
fn test_full_epoch() {
    let mut parser = NmeaParser::new();
    let mut info = NavInfo::default();

    for frame in [GSA, GSV_1, GSV_2, RMC] {
        assert_eq!(parser.parse(frame, &mut info).merged, 1);
    }

    assert_eq!(
        info.smask,
        SentenceMask::GPGSA | SentenceMask::GPGSV | SentenceMask::GPRMC
    );
    assert_eq!(info.fix, Some(FixMode::Fix3D));
    assert_eq!(info.satellites_in_use_count, Some(5));
    assert_eq!(info.satellites_in_use.as_deref(), Some(&[4, 5, 9, 12, 24][..]));
    assert_eq!((info.pdop, info.hdop, info.vdop), (Some(2.5), Some(1.3), Some(2.1)));

    assert_eq!(info.satellites_in_view_count, Some(8));
    let in_view = info.satellites_in_view.as_ref().map(|slots| {
        slots
            .iter()
            .flatten()
            .map(|satellite| satellite.prn)
            .collect::<Vec<_>>()
    });
    assert_eq!(in_view, Some(vec![1, 2, 12, 14, 15, 18, 22, 25]));

    assert_eq!(info.sig, Some(Quality::GPSFix));
    assert_close(info.latitude, 49.0 + 16.45 / 60.0);
    assert_close(info.longitude, -(123.0 + 11.12 / 60.0));
    assert_close(info.speed, 0.5 * 1.852);
    assert_eq!(info.track, Some(54.7));
    assert_eq!(info.magvar, Some(20.3));
}

#[test]
fn test_unsupported_sentence_is_traced() {
    let mut parser = NmeaParserBuilder::new().build_with_sink(Spy::default());
    let mut info = NavInfo::default();

    let outcome = parser.parse(ZDA, &mut info);
    assert_eq!(outcome.merged, 0);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(info, NavInfo::default());

    let spy = parser.into_sink();
    assert_eq!(spy.traces, ["unsupported sentence type: \"GPZDA\""]);
    assert!(spy.errors.is_empty());
}

#[test]
fn test_proprietary_sentences_are_traced() {
    let mut parser = NmeaParserBuilder::new().build_with_sink(Spy::default());
    let mut info = NavInfo::default();

    let mut stream = framed(b"PMTK001,604,3");
    stream.extend(framed(b"PUBX,00,081350.00,4717.113210,N,00833.915187,E"));
    stream.extend_from_slice(VTG);

    let outcome = parser.parse(&stream, &mut info);
    assert_eq!(outcome.merged, 1);
    assert_eq!(outcome.dropped, 2);
    assert_eq!(info.smask, SentenceMask::GPVTG);

    let spy = parser.into_sink();
    assert_eq!(
        spy.traces,
        [
            "unsupported sentence type: \"PMTK001\"",
            "unsupported sentence type: \"PUBX\"",
            "GPVTG,054.7,T,034.4,M,005.5,N,010.2,K",
        ]
    );
    assert!(spy.errors.is_empty());
}

#[test]
fn test_invalid_field_is_dropped() {
    let mut parser = NmeaParserBuilder::new().build_with_sink(Spy::default());
    let mut info = NavInfo::default();

    let frame = framed(b"GPGGA,123519,4x07.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,");
    let outcome = parser.parse(&frame, &mut info);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(info, NavInfo::default());
    assert_eq!(parser.sink().errors, ["invalid field format: \"4x07.038\""]);
}

#[test]
fn test_optional_checksum() {
    let stream = b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K\r\n";

    let mut info = NavInfo::default();
    let mut lenient = NmeaParserBuilder::new()
        .checksum_mode(ChecksumMode::Optional)
        .build_with_sink(());
    assert_eq!(lenient.parse(stream, &mut info).merged, 1);
    assert_eq!(info.mtrack, Some(34.4));

    // a present checksum is still checked
    let corrupted = String::from_utf8(VTG.to_vec()).unwrap().replace("*48", "*00");
    assert_eq!(lenient.parse(corrupted.as_bytes(), &mut info).dropped, 1);

    let mut info = NavInfo::default();
    let mut strict = NmeaParserBuilder::new().build_with_sink(Spy::default());
    let outcome = strict.parse(stream, &mut info);
    assert_eq!(outcome.merged, 0);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(strict.sink().errors, ["malformed frame: missing checksum"]);
}

#[test]
fn test_malformed_frames() {
    let mut parser = NmeaParserBuilder::new().build_with_sink(());
    let mut info = NavInfo::default();

    let results: Vec<_> = b"$GPVTG,054.7*G8\r\n"
        .iter()
        .filter_map(|&b| parser.feed(b, &mut info))
        .collect();
    assert!(matches!(results.as_slice(), [Err(NmeaError::MalformedFrame(_))]));

    let frame = framed(b"GPVTG,054.7,T,\xb0,M,005.5,N,010.2,K");
    let outcome = parser.parse(&frame, &mut info);
    assert_eq!(outcome.dropped, 1);

    let frame = framed(b"GPVTG,054.7,T,034.4,M,005.5,N,010.2,K,A,extra");
    let outcome = parser.parse(&frame, &mut info);
    assert_eq!(outcome.dropped, 1);

    assert_eq!(info, NavInfo::default());
}

#[test]
fn test_overlong_sentence() {
    let mut parser = NmeaParserBuilder::new().build_with_sink(());
    let mut info = NavInfo::default();

    let mut stream = b"$GPGSV,".to_vec();
    stream.resize(200, b'9');
    stream.extend_from_slice(VTG);

    let outcome = parser.parse(&stream, &mut info);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(outcome.merged, 1);
    assert_eq!(info.speed, Some(10.2));
}
