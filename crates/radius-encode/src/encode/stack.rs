use super::EncodeError;
use crate::dictionary::{AttrId, AttributeDef, Dictionary};
use std::fmt;
use tracing::trace;

/// Ancestry of the definition being encoded, outermost first.
///
/// `stack[0]` is the top-level attribute and the last entry is the pair's
/// own definition. Header encoders receive the stack by shared reference;
/// a new stack is built whenever the cursor moves to another pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrStack<'d> {
    defs: Vec<&'d AttributeDef>,
}

impl<'d> AttrStack<'d> {
    /// Walk the parent chain of `leaf` into a root-to-leaf stack.
    ///
    /// Fails if the chain is longer than `max_depth`.
    pub fn build(dict: &'d Dictionary, leaf: AttrId, max_depth: usize) -> Result<Self, EncodeError> {
        let def = dict.get(leaf).ok_or(EncodeError::UnknownAttribute(leaf))?;
        if def.depth() > max_depth {
            return Err(EncodeError::NestingTooDeep {
                depth: def.depth(),
                max: max_depth,
            });
        }

        let mut defs = Vec::with_capacity(def.depth());
        let mut current = Some(def);
        while let Some(def) = current {
            if defs.len() >= max_depth {
                return Err(EncodeError::NestingTooDeep {
                    depth: defs.len() + 1,
                    max: max_depth,
                });
            }
            defs.push(def);
            current = match def.parent() {
                Some(parent) => Some(dict.get(parent).ok_or(EncodeError::UnknownAttribute(parent))?),
                None => None,
            };
        }
        defs.reverse();

        Ok(AttrStack { defs })
    }

    pub fn get(&self, depth: usize) -> Option<&'d AttributeDef> {
        self.defs.get(depth).copied()
    }

    /// Entry at `depth`, or a stack error naming the caller
    pub fn at(&self, depth: usize, context: &'static str) -> Result<&'d AttributeDef, EncodeError> {
        self.get(depth).ok_or(EncodeError::StackMismatch(context))
    }

    pub fn leaf(&self) -> Option<&'d AttributeDef> {
        self.defs.last().copied()
    }

    /// Whether `depth` is the pair's own definition
    pub fn is_leaf(&self, depth: usize) -> bool {
        depth + 1 == self.defs.len()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub(crate) fn trace(&self, depth: usize, encoder: &str) {
        trace!(depth, "{}: {}", encoder, self);
    }
}

impl fmt::Display for AttrStack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, def) in self.defs.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}({}, {})", def.name(), def.attr(), def.kind())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{AttrFlags, AttrType, ValueKind};

    fn nested(levels: usize) -> (Dictionary, AttrId) {
        let mut dict = Dictionary::new();
        let mut parent = None;
        for i in 0..levels - 1 {
            parent = Some(
                dict.add_attribute(parent, format!("TLV-{}", i), 1, AttrType::Tlv, AttrFlags::default())
                    .unwrap(),
            );
        }
        let leaf = dict
            .add_attribute(
                parent,
                "Leaf",
                1,
                AttrType::Value(ValueKind::Integer),
                AttrFlags::default(),
            )
            .unwrap();
        (dict, leaf)
    }

    #[test]
    fn test_root_to_leaf_order() {
        let (dict, leaf) = nested(3);
        let stack = AttrStack::build(&dict, leaf, 32).unwrap();
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.get(0).unwrap().name(), "TLV-0");
        assert_eq!(stack.get(1).unwrap().name(), "TLV-1");
        assert_eq!(stack.leaf().unwrap().id(), leaf);
        assert!(stack.is_leaf(2));
        assert!(stack.get(3).is_none());
    }

    #[test]
    fn test_depth_limit() {
        let (dict, leaf) = nested(5);
        assert_eq!(
            AttrStack::build(&dict, leaf, 4),
            Err(EncodeError::NestingTooDeep { depth: 5, max: 4 })
        );
        assert!(AttrStack::build(&dict, leaf, 5).is_ok());
    }

    #[test]
    fn test_missing_entry_is_stack_error() {
        let (dict, leaf) = nested(1);
        let stack = AttrStack::build(&dict, leaf, 32).unwrap();
        assert_eq!(
            stack.at(1, "test"),
            Err(EncodeError::StackMismatch("test"))
        );
    }

    #[test]
    fn test_display() {
        let (dict, leaf) = nested(2);
        let stack = AttrStack::build(&dict, leaf, 32).unwrap();
        assert_eq!(stack.to_string(), "TLV-0(1, tlv) -> Leaf(1, integer)");
    }
}
