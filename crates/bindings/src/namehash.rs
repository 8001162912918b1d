use alloy::primitives::{keccak256, B256};

/// Compute the ENS namehash of a dot-separated name.
///
/// The empty name hashes to the zero node. Labels are hashed from the
/// right-most one inwards, so `namehash("a.eth")` is
/// `keccak256(namehash("eth") ++ keccak256("a"))`.
pub fn namehash(name: &str) -> B256 {
    if name.is_empty() {
        return B256::ZERO;
    }
    name.rsplit('.').fold(B256::ZERO, |node, label| subnode(node, labelhash(label)))
}

/// Hash a single label.
pub fn labelhash(label: &str) -> B256 {
    keccak256(label.as_bytes())
}

/// Derive the child node of `node` for an already-hashed label.
pub fn subnode(node: B256, label: B256) -> B256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(node.as_slice());
    buf[32..].copy_from_slice(label.as_slice());
    keccak256(buf)
}
