/// IANA private enterprise number of the WiMAX Forum
pub const WIMAX_VENDOR_ID: u32 = 24757;

/// RADIUS attribute numbers the encoder treats specially, plus the
/// common ones used when building dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AttributeType {
    /// User-Name (1) - RFC 2865
    UserName = 1,
    /// User-Password (2) - RFC 2865
    UserPassword = 2,
    /// CHAP-Password (3) - RFC 2865
    ChapPassword = 3,
    /// NAS-IP-Address (4) - RFC 2865
    NasIpAddress = 4,
    /// NAS-Port (5) - RFC 2865
    NasPort = 5,
    /// Service-Type (6) - RFC 2865
    ServiceType = 6,
    /// Reply-Message (18) - RFC 2865
    ReplyMessage = 18,
    /// State (24) - RFC 2865
    State = 24,
    /// Class (25) - RFC 2865
    Class = 25,
    /// Vendor-Specific (26) - RFC 2865
    VendorSpecific = 26,
    /// Session-Timeout (27) - RFC 2865
    SessionTimeout = 27,
    /// CHAP-Challenge (60) - RFC 2865
    ChapChallenge = 60,
    /// Tunnel-Type (64) - RFC 2868
    TunnelType = 64,
    /// Tunnel-Medium-Type (65) - RFC 2868
    TunnelMediumType = 65,
    /// Tunnel-Password (69) - RFC 2868
    TunnelPassword = 69,
    /// EAP-Message (79) - RFC 3579
    /// Split over consecutive attributes when longer than 253 octets
    EapMessage = 79,
    /// Message-Authenticator (80) - RFC 2869
    MessageAuthenticator = 80,
    /// Chargeable-User-Identity (89) - RFC 4372
    /// The only attribute allowed to be sent with an empty value
    ChargeableUserIdentity = 89,
    /// Extended-Attribute-1 (241) - RFC 6929
    ExtendedAttribute1 = 241,
    /// Extended-Attribute-2 (242) - RFC 6929
    ExtendedAttribute2 = 242,
    /// Extended-Attribute-3 (243) - RFC 6929
    ExtendedAttribute3 = 243,
    /// Extended-Attribute-4 (244) - RFC 6929
    ExtendedAttribute4 = 244,
    /// Extended-Attribute-5 (245) - RFC 6929, long extended format
    ExtendedAttribute5 = 245,
    /// Extended-Attribute-6 (246) - RFC 6929, long extended format
    ExtendedAttribute6 = 246,
}

impl AttributeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AttributeType::UserName),
            2 => Some(AttributeType::UserPassword),
            3 => Some(AttributeType::ChapPassword),
            4 => Some(AttributeType::NasIpAddress),
            5 => Some(AttributeType::NasPort),
            6 => Some(AttributeType::ServiceType),
            18 => Some(AttributeType::ReplyMessage),
            24 => Some(AttributeType::State),
            25 => Some(AttributeType::Class),
            26 => Some(AttributeType::VendorSpecific),
            27 => Some(AttributeType::SessionTimeout),
            60 => Some(AttributeType::ChapChallenge),
            64 => Some(AttributeType::TunnelType),
            65 => Some(AttributeType::TunnelMediumType),
            69 => Some(AttributeType::TunnelPassword),
            79 => Some(AttributeType::EapMessage),
            80 => Some(AttributeType::MessageAuthenticator),
            89 => Some(AttributeType::ChargeableUserIdentity),
            241 => Some(AttributeType::ExtendedAttribute1),
            242 => Some(AttributeType::ExtendedAttribute2),
            243 => Some(AttributeType::ExtendedAttribute3),
            244 => Some(AttributeType::ExtendedAttribute4),
            245 => Some(AttributeType::ExtendedAttribute5),
            246 => Some(AttributeType::ExtendedAttribute6),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}
