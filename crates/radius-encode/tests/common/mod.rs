//! Shared dictionary and helpers for the encoder integration tests

#![allow(dead_code)]

use radius_encode::{
    AttrFlags, AttrId, AttrType, Code, Dictionary, EncodeContext, EncodeError, Encoder, Encrypt,
    PairCursor, SaltCounter, Value, ValueKind, ValuePair, VendorFormat, WIMAX_VENDOR_ID,
};

pub const SECRET: &[u8] = b"testing123";
pub const VECTOR: [u8; 16] = [
    0x0f, 0x40, 0x3f, 0x94, 0x73, 0x97, 0x80, 0x57, 0xbd, 0x83, 0xd5, 0xcb, 0x98, 0xf4, 0x22, 0x7a,
];

pub const CISCO: u32 = 9;
pub const USR: u32 = 429;
pub const LUCENT: u32 = 4846;
pub const STARENT: u32 = 8164;
pub const BROKEN_VENDOR: u32 = 65000;

pub struct Fixture {
    pub dict: Dictionary,
}

fn leaf(kind: ValueKind) -> AttrType {
    AttrType::Value(kind)
}

impl Fixture {
    pub fn new() -> Self {
        let mut dict = Dictionary::new();
        let none = AttrFlags::default;

        let top = |dict: &mut Dictionary, name: &str, attr: u32, kind: AttrType, flags: AttrFlags| {
            dict.add_attribute(None, name, attr, kind, flags).unwrap()
        };

        top(&mut dict, "User-Name", 1, leaf(ValueKind::String), none());
        top(
            &mut dict,
            "User-Password",
            2,
            leaf(ValueKind::String),
            AttrFlags::encrypted(Encrypt::UserPassword),
        );
        top(&mut dict, "CHAP-Challenge", 60, leaf(ValueKind::Octets), none());
        top(&mut dict, "NAS-Port", 5, leaf(ValueKind::Integer), none());
        top(&mut dict, "Framed-IP-Address", 8, leaf(ValueKind::Ipv4Addr), none());
        top(&mut dict, "Reply-Message", 18, leaf(ValueKind::String), none());
        top(&mut dict, "Class", 25, leaf(ValueKind::Octets), none());
        top(&mut dict, "Tunnel-Type", 64, leaf(ValueKind::Integer), AttrFlags::tagged());
        top(
            &mut dict,
            "Tunnel-Password",
            69,
            leaf(ValueKind::String),
            AttrFlags {
                has_tag: true,
                encrypt: Encrypt::TunnelPassword,
                ..Default::default()
            },
        );
        top(
            &mut dict,
            "EAP-Message",
            79,
            leaf(ValueKind::Octets),
            AttrFlags {
                concat: true,
                ..Default::default()
            },
        );
        top(&mut dict, "Message-Authenticator", 80, leaf(ValueKind::Octets), none());
        top(&mut dict, "Tunnel-Private-Group-Id", 81, leaf(ValueKind::String), AttrFlags::tagged());
        top(&mut dict, "Chargeable-User-Identity", 89, leaf(ValueKind::Octets), none());
        top(
            &mut dict,
            "Ascend-Send-Secret",
            214,
            leaf(ValueKind::Octets),
            AttrFlags::encrypted(Encrypt::AscendSecret),
        );
        top(&mut dict, "Internal-Counter", 1000, leaf(ValueKind::Integer), none());

        let digest = top(&mut dict, "Digest-Attributes", 207, AttrType::Tlv, none());
        dict.add_attribute(Some(digest), "Digest-Realm", 1, leaf(ValueKind::String), none())
            .unwrap();
        dict.add_attribute(Some(digest), "Digest-Nonce", 2, leaf(ValueKind::String), none())
            .unwrap();
        let nested = dict
            .add_attribute(Some(digest), "Digest-Nested", 3, AttrType::Tlv, none())
            .unwrap();
        dict.add_attribute(Some(nested), "Digest-Nested-Leaf", 1, leaf(ValueKind::Integer), none())
            .unwrap();

        let vsa = top(&mut dict, "Vendor-Specific", 26, AttrType::Vsa, none());
        let vendor = |dict: &mut Dictionary, name: &str, id: u32, flags: AttrFlags| {
            dict.add_attribute(Some(vsa), name, id, AttrType::Vendor, flags).unwrap()
        };

        let cisco = vendor(&mut dict, "Cisco", CISCO, none());
        dict.add_attribute(Some(cisco), "Cisco-AVPair", 1, leaf(ValueKind::String), none())
            .unwrap();

        let usr = vendor(&mut dict, "USR", USR, none());
        dict.add_vendor_format(USR, VendorFormat::new(4, 0));
        dict.add_attribute(Some(usr), "USR-Last-Number-Dialed-Out", 102, leaf(ValueKind::String), none())
            .unwrap();

        let lucent = vendor(&mut dict, "Lucent", LUCENT, none());
        dict.add_vendor_format(LUCENT, VendorFormat::new(2, 1));
        dict.add_attribute(Some(lucent), "Lucent-Max-Shared-Users", 2, leaf(ValueKind::Integer), none())
            .unwrap();
        dict.add_attribute(Some(lucent), "Lucent-Out-Of-Range", 70000, leaf(ValueKind::Integer), none())
            .unwrap();

        let starent = vendor(&mut dict, "Starent", STARENT, none());
        dict.add_vendor_format(STARENT, VendorFormat::new(2, 2));
        dict.add_attribute(Some(starent), "Starent-Session-Id", 1, leaf(ValueKind::Integer), none())
            .unwrap();

        let broken = vendor(&mut dict, "Broken", BROKEN_VENDOR, none());
        dict.add_vendor_format(BROKEN_VENDOR, VendorFormat::new(3, 1));
        dict.add_attribute(Some(broken), "Broken-Attr", 1, leaf(ValueKind::Integer), none())
            .unwrap();

        let wimax = vendor(
            &mut dict,
            "WiMAX",
            WIMAX_VENDOR_ID,
            AttrFlags {
                wimax: true,
                ..Default::default()
            },
        );
        let capability = dict
            .add_attribute(Some(wimax), "WiMAX-Capability", 1, AttrType::Tlv, none())
            .unwrap();
        dict.add_attribute(Some(capability), "WiMAX-Release", 1, leaf(ValueKind::String), none())
            .unwrap();
        dict.add_attribute(Some(wimax), "WiMAX-Blob", 9, leaf(ValueKind::Octets), none())
            .unwrap();

        let ext = top(&mut dict, "Extended-Attribute-1", 241, AttrType::Extended { long: false }, none());
        dict.add_attribute(Some(ext), "Frag-Status", 1, leaf(ValueKind::Integer), none())
            .unwrap();
        let ext_tlv = dict
            .add_attribute(Some(ext), "Ext-TLV", 2, AttrType::Tlv, none())
            .unwrap();
        dict.add_attribute(Some(ext_tlv), "Ext-TLV-Leaf", 1, leaf(ValueKind::Integer), none())
            .unwrap();
        dict.add_attribute(Some(ext), "Ext-Data", 3, leaf(ValueKind::Octets), none())
            .unwrap();
        let evs = dict
            .add_attribute(Some(ext), "Extended-Vendor-Specific-1", 26, AttrType::Evs, none())
            .unwrap();
        let evs_cisco = dict
            .add_attribute(Some(evs), "Cisco-EVS", CISCO, AttrType::Vendor, none())
            .unwrap();
        dict.add_attribute(Some(evs_cisco), "Cisco-Ext", 1, leaf(ValueKind::String), none())
            .unwrap();

        let long = top(&mut dict, "Extended-Attribute-5", 245, AttrType::Extended { long: true }, none());
        dict.add_attribute(Some(long), "Long-Data", 1, leaf(ValueKind::Octets), none())
            .unwrap();
        let long_evs = dict
            .add_attribute(Some(long), "Extended-Vendor-Specific-5", 26, AttrType::Evs, none())
            .unwrap();
        let long_cisco = dict
            .add_attribute(Some(long_evs), "Cisco-Long-EVS", CISCO, AttrType::Vendor, none())
            .unwrap();
        dict.add_attribute(Some(long_cisco), "Cisco-Long", 2, leaf(ValueKind::Octets), none())
            .unwrap();

        Fixture { dict }
    }

    pub fn id(&self, name: &str) -> AttrId {
        self.dict
            .by_name(name)
            .unwrap_or_else(|| panic!("{} not in test dictionary", name))
    }

    pub fn pair(&self, name: &str, value: Value) -> ValuePair {
        ValuePair::new(&self.dict, self.id(name), value).unwrap()
    }

    pub fn tagged(&self, name: &str, tag: u8, value: Value) -> ValuePair {
        self.pair(name, value).with_tag(tag)
    }

    /// A pair built against another dictionary whose id happens to name
    /// `name` in this one.
    pub fn foreign_pair(&self, name: &str) -> ValuePair {
        let target = self.id(name);
        let mut other = Dictionary::new();
        for attr in 1.. {
            let id = other
                .add_attribute(None, format!("Other-{}", attr), attr, leaf(ValueKind::Integer), AttrFlags::default())
                .unwrap();
            if id == target {
                return ValuePair::new(&other, id, Value::Integer(1)).unwrap();
            }
        }
        unreachable!()
    }

    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.dict)
    }
}

pub fn request_context(salt: &SaltCounter) -> EncodeContext<'_> {
    EncodeContext::new(Code::AccessRequest, SECRET, VECTOR, salt)
}

/// Encode the first pair into a buffer of `capacity` bytes.
///
/// Returns the encoder result, the written bytes and the final cursor
/// position.
pub fn encode_with(
    encoder: &Encoder<'_>,
    ctx: &EncodeContext<'_>,
    pairs: &[ValuePair],
    capacity: usize,
) -> (Result<usize, EncodeError>, Vec<u8>, usize) {
    let mut buf = vec![0u8; capacity];
    let mut cursor = PairCursor::new(pairs);
    let result = encoder.encode_pair(&mut buf, ctx, &mut cursor);
    let len = *result.as_ref().unwrap_or(&0);
    buf.truncate(len);
    (result, buf, cursor.position())
}

pub fn encode(fixture: &Fixture, pairs: &[ValuePair], capacity: usize) -> (Result<usize, EncodeError>, Vec<u8>, usize) {
    let salt = SaltCounter::new();
    let ctx = request_context(&salt);
    encode_with(&fixture.encoder(), &ctx, pairs, capacity)
}

pub fn octets(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
