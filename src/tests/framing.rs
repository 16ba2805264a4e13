use std::fmt::Debug;

use nom::{Parser, error::ErrorKind};

use crate::{
    ChecksumMode, Error, IResult, LineEndingMode, Nmea0183ParserBuilder, NmeaError, NmeaSentence,
    Parsable, checksum, checksum_crlf, frame, validate_checksum,
};

const GGA_FRAME: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

fn error_kind<O: Debug>(result: IResult<&str, O>) -> ErrorKind {
    match result {
        Err(nom::Err::Error(Error::ParsingError(e))) => e.code,
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_checksum_crlf_ok() {
    let res: IResult<_, _> =
        checksum_crlf(ChecksumMode::Required, LineEndingMode::Forbidden).parse("*1F");
    assert_eq!(res, Ok(("", Some(0x1F))));

    let res: IResult<_, _> =
        checksum_crlf(ChecksumMode::Required, LineEndingMode::Required).parse("*1f\r\n");
    assert_eq!(res, Ok(("", Some(0x1F))));

    let res: IResult<_, _> =
        checksum_crlf(ChecksumMode::Optional, LineEndingMode::Required).parse("\r\n");
    assert_eq!(res, Ok(("", None)));
}

#[test]
fn test_checksum_crlf_errors() {
    let cases = [
        (ChecksumMode::Required, LineEndingMode::Forbidden, "*1F43", ErrorKind::Count),
        (ChecksumMode::Required, LineEndingMode::Forbidden, "*1", ErrorKind::Count),
        (ChecksumMode::Required, LineEndingMode::Forbidden, "*1z", ErrorKind::HexDigit),
        (ChecksumMode::Required, LineEndingMode::Forbidden, "", ErrorKind::Char),
        (ChecksumMode::Required, LineEndingMode::Forbidden, "*1F\r\n", ErrorKind::CrLf),
        (ChecksumMode::Required, LineEndingMode::Required, "*1F", ErrorKind::CrLf),
        (ChecksumMode::Required, LineEndingMode::Required, "\r\n", ErrorKind::Char),
        (ChecksumMode::Optional, LineEndingMode::Forbidden, "x", ErrorKind::Char),
    ];

    for (cc, le, input, kind) in cases {
        let res: IResult<_, _> = checksum_crlf(cc, le).parse(input);
        assert_eq!(error_kind(res), kind, "{cc:?} {le:?} {input:?}");
    }
}

#[test]
fn test_checksum_engine() {
    let payload = &GGA_FRAME[1..GGA_FRAME.len() - 5];
    assert_eq!(checksum(payload).1, 0x47);
    assert_eq!(validate_checksum(payload.as_bytes(), *b"47"), Ok(true));
    assert_eq!(validate_checksum(payload.as_bytes(), *b"00"), Ok(false));
    assert!(matches!(
        validate_checksum(payload.as_bytes(), *b"G7"),
        Err(NmeaError::MalformedFrame(_))
    ));
    assert_eq!(frame(payload), GGA_FRAME);
}

#[test]
fn test_frame_parser_modes() {
    let mut strict = Nmea0183ParserBuilder::new().build(NmeaSentence::parser);
    assert!(strict(GGA_FRAME).is_ok());
    assert!(strict(GGA_FRAME.trim_end()).is_err());

    let no_checksum = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,\r\n";
    assert!(strict(no_checksum).is_err());

    let mut lenient = Nmea0183ParserBuilder::new()
        .checksum_mode(ChecksumMode::Optional)
        .build(NmeaSentence::parser);
    assert!(lenient(no_checksum).is_ok());
    assert!(lenient(GGA_FRAME).is_ok());
}

#[test]
fn test_frame_parser_errors() {
    let corrupted = GGA_FRAME.replace("*47", "*00");
    let mut parser = Nmea0183ParserBuilder::new().build(NmeaSentence::parser);

    assert_eq!(
        parser(&corrupted),
        Err(nom::Err::Error(Error::ChecksumMismatch {
            expected: 0x47,
            found: 0x00
        }))
    );

    assert_eq!(parser("$GPGGA,1°*47\r\n"), Err(nom::Err::Error(Error::NonAscii)));
    assert_eq!(error_kind(parser("GPGGA,123519*47\r\n")), ErrorKind::Char);
}

#[test]
fn test_parse_frame_error_kinds() {
    assert_eq!(
        NmeaSentence::parse_frame(&frame("GPZDA,201530.00,04,07,2002,00,00")),
        Err(NmeaError::UnsupportedSentenceType("GPZDA".into()))
    );
    assert_eq!(
        NmeaSentence::parse_frame(&frame("GPVTG,054.7,T,034.4,M,x,N,010.2,K")),
        Err(NmeaError::InvalidFieldFormat("x".into()))
    );
    assert!(matches!(
        NmeaSentence::parse_frame(&frame("GPVTG,054.7,T,034.4,M")),
        Err(NmeaError::MalformedFrame(_))
    ));
    assert_eq!(
        NmeaSentence::parse_frame(&GGA_FRAME.replace("*47", "*00")),
        Err(NmeaError::ChecksumMismatch {
            expected: 0x47,
            found: 0x00
        })
    );
}
