use crate::constants::{CHUNK_HEADER_LEN, CHUNK_MAGIC, FLOW_ID_LEN};

/// Opaque flow identifier carried by chunked datagrams.
pub type FlowId = [u8; FLOW_ID_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketClass {
    /// Starts with the chunk magic. `None` when the datagram is too short to
    /// carry a flow identifier.
    Chunked(Option<FlowId>),
    Normal,
}

impl PacketClass {
    pub fn is_chunked(&self) -> bool {
        matches!(self, PacketClass::Chunked(_))
    }

    pub fn flow_id(&self) -> Option<FlowId> {
        match self {
            PacketClass::Chunked(id) => *id,
            PacketClass::Normal => None,
        }
    }
}

/// Classifies a received datagram by its first bytes.
pub fn classify(buffer: &[u8]) -> PacketClass {
    if buffer.len() < CHUNK_MAGIC.len() || buffer[..CHUNK_MAGIC.len()] != CHUNK_MAGIC {
        return PacketClass::Normal;
    }
    PacketClass::Chunked(flow_id(buffer))
}

/// Extracts bytes 2..10 of a chunked datagram. Never reads past `buffer.len()`.
pub fn flow_id(buffer: &[u8]) -> Option<FlowId> {
    if buffer.len() < CHUNK_HEADER_LEN {
        return None;
    }
    let mut id = [0u8; FLOW_ID_LEN];
    id.copy_from_slice(&buffer[CHUNK_MAGIC.len()..CHUNK_HEADER_LEN]);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_chunked(id: [u8; 8], payload: &[u8]) -> Vec<u8> {
        let mut pkt = CHUNK_MAGIC.to_vec();
        pkt.extend_from_slice(&id);
        pkt.extend_from_slice(payload);
        pkt
    }

    #[test]
    fn test_classify_chunked_with_flow_id() {
        let pkt = build_chunked([1, 2, 3, 4, 5, 6, 7, 8], b"payload");
        assert_eq!(classify(&pkt), PacketClass::Chunked(Some([1, 2, 3, 4, 5, 6, 7, 8])));
    }

    #[test]
    fn test_classify_exact_header_len() {
        let pkt = build_chunked([0, 0, 0, 0, 0, 0, 0, 9], &[]);
        assert_eq!(pkt.len(), 10);
        assert_eq!(classify(&pkt).flow_id(), Some([0, 0, 0, 0, 0, 0, 0, 9]));
    }

    #[test]
    fn test_classify_short_chunked_has_no_flow_id() {
        // Magic present but only 7 of the 8 id bytes.
        let pkt = [0x1e, 0x0f, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(classify(&pkt), PacketClass::Chunked(None));
        assert_eq!(classify(&CHUNK_MAGIC), PacketClass::Chunked(None));
    }

    #[test]
    fn test_classify_normal() {
        assert_eq!(classify(b"hello world"), PacketClass::Normal);
        assert_eq!(classify(&[0x0f, 0x1e, 0, 0, 0, 0, 0, 0, 0, 0]), PacketClass::Normal);
        assert!(!classify(&[0x1e]).is_chunked());
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify(&[]), PacketClass::Normal);
    }

    #[test]
    fn test_flow_id_ignores_trailing_payload() {
        let a = build_chunked([9; 8], b"first");
        let b = build_chunked([9; 8], b"a much longer second payload");
        assert_eq!(flow_id(&a), flow_id(&b));
    }

    #[test]
    fn test_normal_has_no_flow_id() {
        assert_eq!(PacketClass::Normal.flow_id(), None);
    }
}
