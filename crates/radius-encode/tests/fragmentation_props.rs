//! Property tests for fragmented and concatenated attributes
//!
//! For any value length, the fragments must be well formed, carry the
//! "more" flag on all but the last, and reassemble to the original value.

mod common;

use common::*;
use proptest::prelude::*;
use radius_encode::Value;

/// Split `bytes` into attributes, checking every length octet
fn split_attributes(bytes: &[u8]) -> Vec<&[u8]> {
    let mut attrs = Vec::new();
    let mut rest = bytes;
    while !rest.is_empty() {
        let len = rest[1] as usize;
        assert!(len >= 2 && len <= rest.len());
        attrs.push(&rest[..len]);
        rest = &rest[len..];
    }
    attrs
}

proptest! {
    #[test]
    fn prop_long_extended_reassembles(data in proptest::collection::vec(any::<u8>(), 1..2000)) {
        let f = Fixture::new();
        let pairs = vec![f.pair("Long-Data", Value::Octets(data.clone()))];

        let (result, bytes, pos) = encode(&f, &pairs, 4096);
        let fragments = data.len().div_ceil(251);
        prop_assert_eq!(result, Ok(data.len() + 4 * fragments));
        prop_assert_eq!(pos, 1);

        let attrs = split_attributes(&bytes);
        prop_assert_eq!(attrs.len(), fragments);

        let mut joined = Vec::new();
        for (i, attr) in attrs.iter().enumerate() {
            prop_assert_eq!(attr[0], 245);
            prop_assert_eq!(attr[2], 1);
            let more = i + 1 < attrs.len();
            prop_assert_eq!(attr[3] & 0x80 != 0, more);
            joined.extend_from_slice(&attr[4..]);
        }
        prop_assert_eq!(joined, data);
    }

    #[test]
    fn prop_wimax_reassembles(data in proptest::collection::vec(any::<u8>(), 1..2000)) {
        let f = Fixture::new();
        let pairs = vec![f.pair("WiMAX-Blob", Value::Octets(data.clone()))];

        let (result, bytes, _) = encode(&f, &pairs, 4096);
        let fragments = data.len().div_ceil(246);
        prop_assert_eq!(result, Ok(data.len() + 9 * fragments));

        let attrs = split_attributes(&bytes);
        prop_assert_eq!(attrs.len(), fragments);

        let mut joined = Vec::new();
        for (i, attr) in attrs.iter().enumerate() {
            prop_assert_eq!(&attr[..6], &[26u8, attr[1], 0, 0, 0x60, 0xb5][..]);
            prop_assert_eq!(attr[6], 9);
            prop_assert_eq!(attr[7] as usize, attr.len() - 6);
            let more = i + 1 < attrs.len();
            prop_assert_eq!(attr[8] & 0x80 != 0, more);
            joined.extend_from_slice(&attr[9..]);
        }
        prop_assert_eq!(joined, data);
    }

    #[test]
    fn prop_concat_reassembles(data in proptest::collection::vec(any::<u8>(), 1..3000)) {
        let f = Fixture::new();
        let pairs = vec![f.pair("EAP-Message", Value::Octets(data.clone()))];

        let (result, bytes, _) = encode(&f, &pairs, 4096);
        prop_assert_eq!(result, Ok(data.len() + 2 * data.len().div_ceil(253)));

        let mut joined = Vec::new();
        for attr in split_attributes(&bytes) {
            prop_assert_eq!(attr[0], 79);
            joined.extend_from_slice(&attr[2..]);
        }
        prop_assert_eq!(joined, data);
    }

    #[test]
    fn prop_small_buffers_never_overrun(capacity in 0usize..64, len in 1usize..600) {
        let f = Fixture::new();
        let pairs = vec![
            f.pair("Long-Data", Value::Octets(octets(len))),
        ];

        let (result, bytes, pos) = encode(&f, &pairs, capacity);
        let written = result.unwrap();
        prop_assert!(written <= capacity);
        prop_assert_eq!(bytes.len(), written);
        if written == 0 {
            prop_assert_eq!(pos, 0);
        }
    }
}
