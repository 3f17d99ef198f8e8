use spottedcat_cast::{ImageElement, ObjectReader, ObjectWriter, Pt, StreamError};

fn element(x: f32, payload: &[u8]) -> ImageElement {
    ImageElement::new(Pt::from(x), Pt::from(2.0f32), Pt::from(30u32), Pt::from(40u32))
        .with_payload(payload.to_vec())
}

#[test]
fn test_several_elements_in_one_stream() {
    let a = element(1.0, b"first");
    let b = element(-7.25, b"");
    let mut out = ObjectWriter::new();
    a.serialize(&mut out);
    b.serialize(&mut out);
    let bytes = out.into_bytes();

    let mut input = ObjectReader::new(&bytes);
    let mut loaded = ImageElement::default();
    loaded.read_serialized(&mut input).unwrap();
    assert_eq!(loaded, a);
    loaded.read_serialized(&mut input).unwrap();
    assert_eq!(loaded, b);
    assert!(input.is_empty());
}

#[test]
fn test_corrupt_payload_length_is_an_error_not_a_panic() {
    let mut out = ObjectWriter::new();
    element(0.0, b"xyz").serialize(&mut out);
    let mut bytes = out.into_bytes();

    // The payload length prefix sits right after the name and the header.
    let offset = 1 + 8 + ImageElement::OBJECT_NAME.len() + 5 * 4;
    bytes[offset..offset + 8].copy_from_slice(&i64::MIN.to_le_bytes());

    let mut loaded = ImageElement::default();
    let err = loaded
        .read_serialized(&mut ObjectReader::new(&bytes))
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<StreamError>(),
        Some(&StreamError::InvalidLength(i64::MIN))
    );
}

#[test]
fn test_pixel_bounds_after_scaling() {
    let mut img = element(10.0, b"");
    img.scale(Pt::from(0u32), Pt::from(0u32), 0.5, 0.5).unwrap();
    let rect = img.pixel_bounds().unwrap();
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (5, 1, 15, 20));
}
