use qr_encoder::{DataMode, ErrorCorrection, MaskPattern, QrCode, QrError, Segment, Version};

#[test]
fn hello_fits_in_version_one() {
    let qr = QrCode::encode_text("HELLO", ErrorCorrection::L).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    assert_eq!(qr.size(), 21);
    assert!(qr.mask_pattern().value() <= 7);
    // Finder and timing corners
    assert!(qr.get_module(0, 0));
    assert!(qr.get_module(6, 0));
    assert!(qr.get_module(0, 6));
    assert!(qr.get_module(6, 6));
}

#[test]
fn hello_world_quartile_matches_the_golden_bitmap() {
    // Fixed reference symbol: version 1, Quartile (High would need 72 bits
    // but the data takes 74, so no boost), mask 0 wins the penalty trial.
    const EXPECTED: [&str; 21] = [
        "#######.##....#######",
        "#.....#.#..#..#.....#",
        "#.###.#.#..##.#.###.#",
        "#.###.#.#.....#.###.#",
        "#.###.#.#.#...#.###.#",
        "#.....#...#...#.....#",
        "#######.#.#.#.#######",
        "........#............",
        ".##.#.##....#.#.#####",
        ".#......####....#...#",
        "..##.###.##...#.##...",
        ".##.##.#..##.#.#.###.",
        "#...#.#.#.###.###.#.#",
        "........##.#..#...#.#",
        "#######.#.#....#.##..",
        "#.....#..#.##.##.#...",
        "#.###.#.#.#...#######",
        "#.###.#..#.#.#.#...#.",
        "#.###.#.#..#.###.#..#",
        "#.....#.#.####...#.##",
        "#######....#.###....#",
    ];

    let qr = QrCode::encode_text("HELLO WORLD", ErrorCorrection::Q).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    assert_eq!(qr.size(), 21);
    assert_eq!(qr.error_correction(), ErrorCorrection::Q);
    assert_eq!(qr.mask_pattern(), MaskPattern::Pattern0);
    assert_eq!(
        qr.data_codewords(),
        &[0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC]
    );
    for (y, row) in EXPECTED.iter().enumerate() {
        for (x, cell) in row.bytes().enumerate() {
            assert_eq!(
                qr.get_module(x as i32, y as i32),
                cell == b'#',
                "module ({}, {}) disagrees with the fixture",
                x,
                y
            );
        }
    }
}

#[test]
fn digits_choose_numeric_mode() {
    let segments = Segment::make_segments("12345").unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].mode(), DataMode::Numeric);
    assert_eq!(segments[0].mode().mode_bits(), 0b0001);

    let qr = QrCode::encode_text("12345", ErrorCorrection::L).unwrap();
    assert_eq!(qr.version(), Version::MIN);
}

#[test]
fn empty_input_encodes_to_pure_padding() {
    let qr = QrCode::encode_text("", ErrorCorrection::L).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    // Nothing to protect, so the level boosts all the way to High: nine
    // data codewords holding the terminator byte and the alternating pad
    assert_eq!(qr.error_correction(), ErrorCorrection::H);
    assert_eq!(
        qr.data_codewords(),
        &[0x00, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11]
    );
}

#[test]
fn lowercase_falls_back_to_byte_mode() {
    let segments = Segment::make_segments("abc").unwrap();
    assert_eq!(segments[0].mode(), DataMode::Byte);
    assert_eq!(segments[0].num_chars(), 3);
    let qr = QrCode::encode_text("abc", ErrorCorrection::L).unwrap();
    assert_eq!(qr.version(), Version::MIN);
}

#[test]
fn non_ascii_text_counts_utf8_bytes() {
    let segments = Segment::make_segments("aé").unwrap();
    assert_eq!(segments[0].mode(), DataMode::Byte);
    assert_eq!(segments[0].num_chars(), 3); // 'é' is two bytes in UTF-8
}

#[test]
fn oversized_data_is_rejected() {
    let bytes: Vec<u8> = (0..=255u8).cycle().take(64).collect();
    let segment = Segment::make_bytes(&bytes);
    let result = QrCode::encode_segments(
        &[segment],
        ErrorCorrection::L,
        Version::MIN,
        Version::MIN,
        None,
        true,
    );
    assert!(matches!(result, Err(QrError::DataTooLong(_))));
}

#[test]
fn invalid_version_range_is_rejected() {
    let result = QrCode::encode_segments(
        &[],
        ErrorCorrection::L,
        Version::new(5).unwrap(),
        Version::new(4).unwrap(),
        None,
        true,
    );
    assert!(matches!(result, Err(QrError::InvalidArgument(_))));
}

#[test]
fn out_of_bounds_modules_are_light() {
    let qr = QrCode::encode_text("HELLO", ErrorCorrection::L).unwrap();
    assert!(!qr.get_module(-1, 0));
    assert!(!qr.get_module(0, -1));
    assert!(!qr.get_module(21, 0));
    assert!(!qr.get_module(0, 21));
    assert!(!qr.get_module(i32::MIN, i32::MAX));
}

#[test]
fn mask_selection_is_deterministic() {
    let first = QrCode::encode_text("DETERMINISM", ErrorCorrection::Q).unwrap();
    let second = QrCode::encode_text("DETERMINISM", ErrorCorrection::Q).unwrap();
    assert_eq!(first.mask_pattern(), second.mask_pattern());
    for y in 0..first.size() as i32 {
        for x in 0..first.size() as i32 {
            assert_eq!(first.get_module(x, y), second.get_module(x, y));
        }
    }
}

#[test]
fn requested_mask_is_honored() {
    for pattern in MaskPattern::ALL {
        let qr = QrCode::encode_segments(
            &Segment::make_segments("HELLO WORLD").unwrap(),
            ErrorCorrection::Q,
            Version::MIN,
            Version::MAX,
            Some(pattern),
            true,
        )
        .unwrap();
        assert_eq!(qr.mask_pattern(), pattern);
    }
}

#[test]
fn boost_stops_where_data_no_longer_fits() {
    // 74 bits fit Quartile (104) but not High (72) at version 1
    let qr = QrCode::encode_text("HELLO WORLD", ErrorCorrection::L).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    assert_eq!(qr.error_correction(), ErrorCorrection::Q);

    let unboosted = QrCode::encode_segments(
        &Segment::make_segments("HELLO WORLD").unwrap(),
        ErrorCorrection::L,
        Version::MIN,
        Version::MAX,
        None,
        false,
    )
    .unwrap();
    assert_eq!(unboosted.error_correction(), ErrorCorrection::L);
}

#[test]
fn every_version_has_its_size_and_dark_module() {
    for v in 1..=40u8 {
        let version = Version::new(v).unwrap();
        let qr = QrCode::encode_segments(
            &[],
            ErrorCorrection::L,
            version,
            version,
            Some(MaskPattern::Pattern0),
            false,
        )
        .unwrap();
        let size = qr.size() as i32;
        assert_eq!(qr.size(), usize::from(v) * 4 + 17);
        assert_eq!(qr.version(), version);
        // The module above the bottom-left finder is always dark
        assert!(qr.get_module(8, size - 8));
    }
}

#[test]
fn min_version_floor_is_respected() {
    let qr = QrCode::encode_segments(
        &Segment::make_segments("HELLO").unwrap(),
        ErrorCorrection::L,
        Version::new(4).unwrap(),
        Version::MAX,
        None,
        true,
    )
    .unwrap();
    assert_eq!(qr.version(), Version::new(4).unwrap());
}

#[test]
fn larger_payloads_move_to_larger_versions() {
    // 120 bytes need 976 bits plus headers: too much for v1-L (152) but
    // fine at v6-L (1088)
    let text: String = "x".repeat(120);
    let qr = QrCode::encode_text(&text, ErrorCorrection::L).unwrap();
    assert!(qr.version() > Version::MIN);
    assert!(qr.version() <= Version::new(6).unwrap());
    assert_eq!(qr.size(), qr.version().size());
}

#[test]
fn eci_segment_prefixes_byte_data() {
    let eci = Segment::make_eci(26).unwrap();
    let bytes = Segment::make_bytes("abc".as_bytes());
    let qr = QrCode::encode_segments(
        &[eci, bytes],
        ErrorCorrection::L,
        Version::MIN,
        Version::MAX,
        None,
        true,
    )
    .unwrap();
    assert_eq!(qr.version(), Version::MIN);
    // ECI header 0111 followed by the assignment value 26 in 8 bits
    assert_eq!(qr.data_codewords()[0], 0b0111_0001);
    assert_eq!(qr.data_codewords()[1] >> 4, 0b1010);
}

#[test]
fn symbols_with_different_masks_differ() {
    let segments = Segment::make_segments("HELLO WORLD").unwrap();
    let a = QrCode::encode_segments(
        &segments,
        ErrorCorrection::Q,
        Version::MIN,
        Version::MAX,
        Some(MaskPattern::Pattern0),
        true,
    )
    .unwrap();
    let b = QrCode::encode_segments(
        &segments,
        ErrorCorrection::Q,
        Version::MIN,
        Version::MAX,
        Some(MaskPattern::Pattern1),
        true,
    )
    .unwrap();
    let differs = (0..21).any(|y| (0..21).any(|x| a.get_module(x, y) != b.get_module(x, y)));
    assert!(differs);
    assert_eq!(a.data_codewords(), b.data_codewords());
}
