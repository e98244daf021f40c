use crate::nmea0183::{Frame, frame};

#[test]
fn test_frame_with_checksum() {
    let res = frame("$GNTXT,01,01,02,ANTENNA OK*28");
    assert_eq!(
        res,
        Ok((
            "",
            Frame {
                payload: "GNTXT,01,01,02,ANTENNA OK",
                suffix: Some("28"),
            }
        ))
    );
}

#[test]
fn test_frame_splits_at_first_asterisk() {
    let (_, f) = frame("$GNTXT,01,01,02,A*B*28").unwrap();
    assert_eq!(f.payload, "GNTXT,01,01,02,A");
    assert_eq!(f.suffix, Some("B*28"));
}

#[test]
fn test_frame_without_checksum() {
    let (_, f) = frame("$GNTXT,01,01,02,ANTENNA OK").unwrap();
    assert_eq!(f.payload, "GNTXT,01,01,02,ANTENNA OK");
    assert_eq!(f.suffix, None);
}

#[test]
fn test_frame_empty_payload() {
    assert_eq!(
        frame("$*00"),
        Ok((
            "",
            Frame {
                payload: "",
                suffix: Some("00")
            }
        ))
    );
    assert_eq!(
        frame("$"),
        Ok((
            "",
            Frame {
                payload: "",
                suffix: None
            }
        ))
    );
}

#[test]
fn test_frame_requires_dollar() {
    assert!(frame("GNTXT,01,01,02,ANTENNA OK*28").is_err());
    assert!(frame("").is_err());
}
