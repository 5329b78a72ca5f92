//! Resolved attribute definitions
//!
//! The dictionary is an arena of [`AttributeDef`] nodes linked to their
//! parents by [`AttrId`]. It is built once and then shared read-only by every
//! encode call. Parsing dictionary files is left to the caller; this module
//! only models the tree the encoder walks.

mod types;
mod well_known;

pub use types::{AttrFlags, AttrType, Encrypt, ValueKind, VendorFormat};
pub use well_known::{AttributeType, WIMAX_VENDOR_ID};

use std::collections::HashMap;
use thiserror::Error;

/// Deepest definition the tree accepts (the depth field is one octet)
pub const MAX_DEFINITION_DEPTH: usize = 255;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("Unknown parent attribute id {0}")]
    UnknownParent(AttrId),
    #[error("Parent {parent} of type {kind} cannot have children")]
    NotStructural { parent: String, kind: AttrType },
    #[error("{child} of type {kind} cannot be placed below {parent}")]
    InvalidPlacement {
        child: String,
        kind: AttrType,
        parent: String,
    },
    #[error("Duplicate attribute {attr} below {parent}")]
    Duplicate { attr: u32, parent: String },
    #[error("Attribute {0} exceeds maximum definition depth")]
    TooDeep(String),
}

/// Index of a definition inside its [`Dictionary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId(u32);

impl AttrId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AttrId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of the definition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    id: AttrId,
    name: String,
    attr: u32,
    parent: Option<AttrId>,
    kind: AttrType,
    depth: u8,
    vendor: u32,
    flags: AttrFlags,
}

impl AttributeDef {
    pub fn id(&self) -> AttrId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute number within its parent (the vendor ID for `Vendor` nodes)
    pub fn attr(&self) -> u32 {
        self.attr
    }

    pub fn parent(&self) -> Option<AttrId> {
        self.parent
    }

    pub fn kind(&self) -> AttrType {
        self.kind
    }

    /// 1 for top-level attributes, incremented per nesting level
    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    /// Vendor the attribute belongs to, 0 for IETF attributes
    pub fn vendor(&self) -> u32 {
        self.vendor
    }

    pub fn flags(&self) -> &AttrFlags {
        &self.flags
    }
}

/// Arena of attribute definitions plus per-vendor header formats.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    attrs: Vec<AttributeDef>,
    vendors: HashMap<u32, VendorFormat>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition below `parent` (`None` for a top-level attribute).
    ///
    /// The vendor ID and the `long_extended`, `evs` and `wimax` flags are
    /// inherited from the ancestors.
    pub fn add_attribute(
        &mut self,
        parent: Option<AttrId>,
        name: impl Into<String>,
        attr: u32,
        kind: AttrType,
        mut flags: AttrFlags,
    ) -> Result<AttrId, DictionaryError> {
        let name = name.into();
        let (depth, vendor) = match parent {
            None => {
                if matches!(kind, AttrType::Vendor | AttrType::Evs) {
                    return Err(DictionaryError::InvalidPlacement {
                        child: name,
                        kind,
                        parent: "dictionary root".to_string(),
                    });
                }
                (1usize, 0u32)
            }
            Some(parent_id) => {
                let parent = self
                    .get(parent_id)
                    .ok_or(DictionaryError::UnknownParent(parent_id))?;

                if !parent.kind.is_structural() {
                    return Err(DictionaryError::NotStructural {
                        parent: parent.name.clone(),
                        kind: parent.kind,
                    });
                }

                let allowed = match kind {
                    AttrType::Vendor => matches!(parent.kind, AttrType::Vsa | AttrType::Evs),
                    AttrType::Evs => matches!(parent.kind, AttrType::Extended { .. }),
                    AttrType::Vsa | AttrType::Extended { .. } => false,
                    _ => !matches!(parent.kind, AttrType::Vsa | AttrType::Evs),
                };
                if !allowed {
                    return Err(DictionaryError::InvalidPlacement {
                        child: name,
                        kind,
                        parent: parent.name.clone(),
                    });
                }

                if self.find_child(Some(parent_id), attr).is_some() {
                    return Err(DictionaryError::Duplicate {
                        attr,
                        parent: parent.name.clone(),
                    });
                }

                flags.long_extended |= parent.flags.long_extended
                    || matches!(parent.kind, AttrType::Extended { long: true });
                flags.evs |= parent.flags.evs || parent.kind == AttrType::Evs;
                flags.wimax |= parent.flags.wimax;

                let vendor = if parent.kind == AttrType::Vendor {
                    parent.attr
                } else {
                    parent.vendor
                };
                (parent.depth() + 1, vendor)
            }
        };

        if depth > MAX_DEFINITION_DEPTH {
            return Err(DictionaryError::TooDeep(name));
        }

        if parent.is_none() && self.find_child(None, attr).is_some() {
            return Err(DictionaryError::Duplicate {
                attr,
                parent: "dictionary root".to_string(),
            });
        }

        let id = AttrId(self.attrs.len() as u32);
        self.attrs.push(AttributeDef {
            id,
            name,
            attr,
            parent,
            kind,
            depth: depth as u8,
            vendor: if kind == AttrType::Vendor { attr } else { vendor },
            flags,
        });
        Ok(id)
    }

    /// Register the sub-attribute header format of a vendor.
    ///
    /// Vendors without an entry are encoded in the RFC 2865 format.
    pub fn add_vendor_format(&mut self, vendor: u32, format: VendorFormat) {
        self.vendors.insert(vendor, format);
    }

    pub fn vendor_format(&self, vendor: u32) -> Option<VendorFormat> {
        self.vendors.get(&vendor).copied()
    }

    pub fn get(&self, id: AttrId) -> Option<&AttributeDef> {
        self.attrs.get(id.index())
    }

    pub fn parent_of(&self, def: &AttributeDef) -> Option<&AttributeDef> {
        def.parent.and_then(|id| self.get(id))
    }

    /// Find the child of `parent` numbered `attr`
    pub fn find_child(&self, parent: Option<AttrId>, attr: u32) -> Option<AttrId> {
        self.attrs
            .iter()
            .find(|def| def.parent == parent && def.attr == attr)
            .map(|def| def.id)
    }

    pub fn by_name(&self, name: &str) -> Option<AttrId> {
        self.attrs.iter().find(|def| def.name == name).map(|def| def.id)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}
