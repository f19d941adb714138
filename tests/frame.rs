use ivplot::data::frame::{decode, parse_number, RawRow};

#[test]
fn decode_keeps_order_and_drops_single_cell_rows() {
    let frame = decode("1,2\n\n3,4,5\n");
    assert_eq!(
        frame.rows,
        vec![
            RawRow::from_fields(["1", "2"]),
            RawRow::from_fields(["3", "4", "5"]),
        ]
    );
}

#[test]
fn empty_cells_become_none() {
    let frame = decode("1,,3");
    assert_eq!(frame.len(), 1);
    assert_eq!(
        frame.rows[0].0,
        vec![Some("1".to_string()), None, Some("3".to_string())]
    );
}

#[test]
fn lone_values_are_noise() {
    let frame = decode("header\n7\n8,9\n");
    assert_eq!(frame.len(), 1);
    assert_eq!(frame.rows[0].cell(0), Some("8"));
}

#[test]
fn empty_input_decodes_to_empty_frame() {
    assert!(decode("").is_empty());
    assert!(decode("\n\n").is_empty());
}

#[test]
fn trailing_carriage_return_still_parses() {
    let frame = decode("1,2.5\r\n");
    assert_eq!(frame.rows[0].number(1), Some(2.5));
}

#[test]
fn parse_number_rejects_text_and_non_finite() {
    assert_eq!(parse_number(" 42 "), Some(42.0));
    assert_eq!(parse_number("abc"), None);
    assert_eq!(parse_number("NaN"), None);
    assert_eq!(parse_number("inf"), None);
}
