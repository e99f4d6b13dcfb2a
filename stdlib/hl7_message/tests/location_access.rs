use hl7_message::{AddressError, Location, Message};
use pretty_assertions::assert_eq;

const RAW: &str = "MSH|^~\\&|LAB|HOSP|EMR|HOSP|202501010101||ORU^R01|MSG0001|P|2.5\r\
PID|1||P12345^^^HOSP^MR||Doe^Jane||19851224|F\r\
OBX|1|NM|8867-4^Heart rate^LN||72|/min\r\
OBX|2|NM|8480-6^Systolic BP^LN||120|mm[Hg]";

fn parse(loc: &str) -> Location {
    loc.parse().unwrap()
}

#[test]
fn reads_through_locations() {
    let msg = Message::parse(RAW).unwrap();
    assert_eq!(msg.get(&parse("MSH-1")), Some("|"));
    assert_eq!(msg.get(&parse("MSH-9.1")), Some("R01"));
    assert_eq!(msg.get(&parse("PID-3.0")), Some("P12345"));
    assert_eq!(msg.get(&parse("OBX[2]-3.1")), Some("Systolic BP"));
    assert_eq!(msg.get(&parse("OBX[2]-6")), Some("mm[Hg]"));
    assert_eq!(msg.get(&parse("OBX[3]-5")), None);
    assert_eq!(msg.get(&parse("OBX")), msg.segment("OBX", 1));
}

#[test]
fn writes_through_locations() {
    let mut msg = Message::parse(RAW).unwrap();
    assert!(msg.set(&parse("OBX[2]-5"), "118"));
    assert!(msg.set(&parse("PID-5.1"), "Janet"));
    assert_eq!(msg.field("OBX", 2, 5), Some("118"));
    assert_eq!(msg.field("OBX", 1, 5), Some("72"));
    assert_eq!(msg.field("PID", 1, 5), Some("Doe^Janet"));
}

#[test]
fn location_round_trips_through_display() {
    for text in ["PID", "OBX[2]", "PID-5", "OBX[2]-3.1", "MSH-9.0"] {
        assert_eq!(parse(text).to_string(), text);
    }
}

#[test]
fn invalid_locations_are_reported() {
    assert_eq!("".parse::<Location>(), Err(AddressError::Empty));
    assert_eq!("OBX[0]-1".parse::<Location>(), Err(AddressError::ZeroOccurrence));
    assert!(matches!(
        "P1-3".parse::<Location>(),
        Err(AddressError::InvalidSegment(_))
    ));
}
