use sqlt::types::{error::DatabaseError, row::Row, value::Value};

fn sample_row() -> Row {
    Row::new(vec![
        Value::Integer(1),
        Value::Text("Alice".to_string()),
        Value::Null,
    ])
}

#[test]
fn test_row_round_trip() {
    let row = sample_row();
    let bytes = row.to_bytes().unwrap();
    let (decoded, consumed) = Row::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, row);
    assert_eq!(consumed, bytes.len());
}

#[test]
fn test_row_layout() {
    let row = sample_row();
    let bytes = row.to_bytes().unwrap();

    // u16 count, then the tagged values in order
    assert_eq!(&bytes[0..2], &3u16.to_le_bytes());
    assert_eq!(bytes[2], 0x01); // integer tag
    assert_eq!(bytes[7], 0x02); // text tag
    assert_eq!(*bytes.last().unwrap(), 0x00); // trailing null tag
    assert_eq!(bytes.len(), row.serialized_size());
}

#[test]
fn test_empty_row() {
    let row = Row::new(vec![]);
    let bytes = row.to_bytes().unwrap();
    assert_eq!(bytes, vec![0x00, 0x00]);
    let (decoded, consumed) = Row::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.values.len(), 0);
    assert_eq!(consumed, 2);
}

#[test]
fn test_nulls_constructor() {
    let row = Row::nulls(4);
    assert_eq!(row.values.len(), 4);
    assert!(row.values.iter().all(|v| v.is_null()));
}

#[test]
fn test_get_value() {
    let row = sample_row();
    assert_eq!(row.get_value(0), Some(&Value::Integer(1)));
    assert_eq!(row.get_value(2), Some(&Value::Null));
    assert_eq!(row.get_value(3), None);
}

#[test]
fn test_row_decode_consumes_exactly_its_bytes() {
    let row = sample_row();
    let mut bytes = row.to_bytes().unwrap();
    let own_length = bytes.len();
    // trailing garbage from a following cell must not be consumed
    bytes.extend_from_slice(&[0xAB, 0xCD, 0xEF]);

    let (decoded, consumed) = Row::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, row);
    assert_eq!(consumed, own_length);
}

#[test]
fn test_truncated_row_rejected() {
    let row = sample_row();
    let bytes = row.to_bytes().unwrap();
    let result = Row::from_bytes(&bytes[..bytes.len() - 2]);
    assert!(matches!(
        result,
        Err(DatabaseError::SerializationError { .. })
    ));
}
