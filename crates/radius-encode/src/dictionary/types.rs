use std::fmt;

/// Data types a leaf attribute can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Byte,
    Short,
    Integer,
    Integer64,
    Date,
    Signed,
    Ipv4Addr,
    Ipv4Prefix,
    Ipv6Addr,
    Ipv6Prefix,
    Ifid,
    Ethernet,
    Abinary,
    String,
    Octets,
}

impl ValueKind {
    /// Wire length of fixed-width kinds, `None` for variable-length ones.
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            ValueKind::Boolean | ValueKind::Byte => Some(1),
            ValueKind::Short => Some(2),
            ValueKind::Integer | ValueKind::Date | ValueKind::Signed | ValueKind::Ipv4Addr => Some(4),
            ValueKind::Integer64 | ValueKind::Ifid => Some(8),
            ValueKind::Ipv4Prefix | ValueKind::Ethernet => Some(6),
            ValueKind::Ipv6Addr => Some(16),
            ValueKind::Ipv6Prefix => Some(18),
            ValueKind::Abinary | ValueKind::String | ValueKind::Octets => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Byte => "byte",
            ValueKind::Short => "short",
            ValueKind::Integer => "integer",
            ValueKind::Integer64 => "integer64",
            ValueKind::Date => "date",
            ValueKind::Signed => "signed",
            ValueKind::Ipv4Addr => "ipaddr",
            ValueKind::Ipv4Prefix => "ipv4prefix",
            ValueKind::Ipv6Addr => "ipv6addr",
            ValueKind::Ipv6Prefix => "ipv6prefix",
            ValueKind::Ifid => "ifid",
            ValueKind::Ethernet => "ether",
            ValueKind::Abinary => "abinary",
            ValueKind::String => "string",
            ValueKind::Octets => "octets",
        }
    }
}

/// Attribute type tag.
///
/// Structural variants only ever appear as ancestors in an attribute stack;
/// only `Value` definitions carry an encodable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    Value(ValueKind),
    Tlv,
    /// Vendor-Specific (26) wrapper
    Vsa,
    /// Vendor node below a Vendor-Specific or EVS; its number is the vendor ID
    Vendor,
    /// Extended (RFC 6929 241-244) or Long-Extended (245-246)
    Extended { long: bool },
    /// Extended-Vendor-Specific, always nested inside an extended attribute
    Evs,
}

impl AttrType {
    pub fn is_structural(self) -> bool {
        !matches!(self, AttrType::Value(_))
    }

    pub fn value_kind(self) -> Option<ValueKind> {
        match self {
            AttrType::Value(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AttrType::Value(kind) => kind.name(),
            AttrType::Tlv => "tlv",
            AttrType::Vsa => "vsa",
            AttrType::Vendor => "vendor",
            AttrType::Extended { long: false } => "extended",
            AttrType::Extended { long: true } => "long-extended",
            AttrType::Evs => "evs",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value obfuscation applied when the attribute is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encrypt {
    #[default]
    None,
    /// RFC 2865 Section 5.2
    UserPassword,
    /// RFC 2868 Section 3.5
    TunnelPassword,
    /// Ascend-Send-Secret / Ascend-Receive-Secret
    AscendSecret,
}

/// Per-attribute encoding flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttrFlags {
    /// Long values are split over several attributes with the same number
    pub concat: bool,
    /// Attribute may carry an RFC 2868 tag
    pub has_tag: bool,
    /// Lives below a Long-Extended attribute (inherited)
    pub long_extended: bool,
    /// Uses the WiMAX continuation VSA format (inherited)
    pub wimax: bool,
    /// Lives below an Extended-Vendor-Specific attribute (inherited)
    pub evs: bool,
    pub encrypt: Encrypt,
}

impl AttrFlags {
    pub fn tagged() -> Self {
        AttrFlags {
            has_tag: true,
            ..Default::default()
        }
    }

    pub fn encrypted(encrypt: Encrypt) -> Self {
        AttrFlags {
            encrypt,
            ..Default::default()
        }
    }
}

/// Width of the type and length fields of a vendor's sub-attribute header.
///
/// Legal widths are 1, 2 or 4 octets for the type field and 0, 1 or 2
/// octets for the length field; anything else is rejected when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorFormat {
    pub type_width: u8,
    pub length_width: u8,
}

impl VendorFormat {
    /// RFC 2865 suggested format: 1 octet type, 1 octet length
    pub const RFC: VendorFormat = VendorFormat {
        type_width: 1,
        length_width: 1,
    };

    pub const fn new(type_width: u8, length_width: u8) -> Self {
        VendorFormat {
            type_width,
            length_width,
        }
    }

    pub fn is_rfc(&self) -> bool {
        *self == Self::RFC
    }

    pub fn header_len(&self) -> usize {
        self.type_width as usize + self.length_width as usize
    }
}

impl Default for VendorFormat {
    fn default() -> Self {
        Self::RFC
    }
}
