//! Property tests for the data-channel codec.

use std::sync::Arc;
use std::thread;

use datachan_common::{KeyId, PacketId, PeerId};
use datachan_core::crypto::{CipherSuite, DirectionKeys, SessionKeys};
use datachan_core::protocol::DataChannelCodec;
use datachan_core::CoreError;
use proptest::prelude::*;

fn arb_suite() -> impl Strategy<Value = CipherSuite> {
    prop_oneof![
        Just(CipherSuite::AES_128_GCM),
        Just(CipherSuite::AES_192_GCM),
        Just(CipherSuite::AES_256_GCM),
    ]
}

fn arb_keys() -> impl Strategy<Value = SessionKeys> {
    (
        any::<[u8; 32]>(),
        any::<[u8; 8]>(),
        any::<[u8; 32]>(),
        any::<[u8; 8]>(),
    )
        .prop_map(|(ek, es, dk, ds)| {
            SessionKeys::new(DirectionKeys::new(&ek, &es), DirectionKeys::new(&dk, &ds))
        })
}

/// `None` = V1 headers, `Some` = V2 with that peer id.
fn arb_peer() -> impl Strategy<Value = Option<PeerId>> {
    prop_oneof![
        Just(None::<PeerId>),
        (0u32..PeerId::MAX).prop_map(|id| PeerId::new(id).ok()),
    ]
}

fn codec_pair(
    suite: CipherSuite,
    keys: &SessionKeys,
    peer: Option<PeerId>,
) -> (DataChannelCodec, DataChannelCodec) {
    let mut local = DataChannelCodec::with_keys(suite, keys).unwrap();
    let mut remote = DataChannelCodec::with_keys(suite, &keys.mirrored()).unwrap();
    local.set_peer_id(peer);
    remote.set_peer_id(peer);
    (local, remote)
}

proptest! {
    #[test]
    fn roundtrip_any_payload(
        suite in arb_suite(),
        keys in arb_keys(),
        peer in arb_peer(),
        key_id in 0u8..=KeyId::MAX,
        packet_id in any::<u32>(),
        payload in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let (local, remote) = codec_pair(suite, &keys, peer);
        let key_id = KeyId::new(key_id).unwrap();

        let frame = local.encode(key_id, PacketId::new(packet_id), &payload).unwrap();
        prop_assert_eq!(frame.len(), local.overhead() + payload.len());

        let decoded = remote.decode_packet(&frame).unwrap();
        prop_assert_eq!(decoded.packet_id, PacketId::new(packet_id));
        prop_assert_eq!(decoded.key_id, key_id);
        prop_assert_eq!(decoded.payload, payload);
    }

    #[test]
    fn single_bit_flip_never_yields_altered_payload(
        keys in arb_keys(),
        peer in arb_peer(),
        payload in prop::collection::vec(any::<u8>(), 0..64),
        bit in any::<usize>(),
    ) {
        let (local, remote) = codec_pair(CipherSuite::AES_256_GCM, &keys, peer);
        let mut frame = local.encode(KeyId::default(), PacketId::new(7), &payload).unwrap();

        let bit = bit % (frame.len() * 8);
        frame[bit / 8] ^= 1 << (bit % 8);

        match remote.decode(&frame) {
            Ok((_, decoded)) => {
                // Only the unauthenticated V1 key id bits may change without
                // detection, and the payload must still be the original.
                prop_assert!(peer.is_none() && bit / 8 == 0);
                prop_assert_eq!(decoded, payload);
            }
            Err(err) => prop_assert!(
                matches!(
                    err,
                    CoreError::AuthenticationFailure
                        | CoreError::PeerIdMismatch { .. }
                        | CoreError::MalformedPacket { .. }
                        | CoreError::PacketTooShort { .. }
                ),
                "unexpected error {err:?}"
            ),
        }
    }

    #[test]
    fn truncated_frames_are_malformed(
        keys in arb_keys(),
        peer in arb_peer(),
        cut in 0usize..24,
    ) {
        let (local, remote) = codec_pair(CipherSuite::AES_128_GCM, &keys, peer);
        let frame = local.encode(KeyId::default(), PacketId::new(1), b"").unwrap();
        let cut = cut.min(frame.len() - 1);

        let err = remote.decode(&frame[..cut]).unwrap_err();
        prop_assert!(err.is_malformed());
    }

    #[test]
    fn distinct_packet_ids_give_distinct_tags(
        keys in arb_keys(),
        a in any::<u32>(),
        b in any::<u32>(),
    ) {
        prop_assume!(a != b);
        let (local, _) = codec_pair(CipherSuite::AES_256_GCM, &keys, None);
        let fa = local.encode(KeyId::default(), PacketId::new(a), b"same").unwrap();
        let fb = local.encode(KeyId::default(), PacketId::new(b), b"same").unwrap();
        prop_assert_ne!(&fa[5..21], &fb[5..21]);
    }

    #[test]
    fn garbage_input_never_panics(
        peer in arb_peer(),
        frame in prop::collection::vec(any::<u8>(), 0..96),
    ) {
        let keys = SessionKeys::new(
            DirectionKeys::new(&[1; 32], &[2; 8]),
            DirectionKeys::new(&[3; 32], &[4; 8]),
        );
        let (_, remote) = codec_pair(CipherSuite::AES_256_GCM, &keys, peer);
        let err = remote.decode(&frame).unwrap_err();
        prop_assert!(err.is_drop_worthy());
    }
}

#[test]
fn shared_codec_across_egress_and_ingress_threads() {
    let keys = SessionKeys::new(
        DirectionKeys::new(&[0xA1; 32], &[0xB2; 32]),
        DirectionKeys::new(&[0xC3; 32], &[0xD4; 32]),
    );
    let local = Arc::new(DataChannelCodec::with_keys(CipherSuite::AES_256_GCM, &keys).unwrap());
    let remote = DataChannelCodec::with_keys(CipherSuite::AES_256_GCM, &keys.mirrored()).unwrap();

    // Frames the remote side sends us, sealed up front.
    let inbound: Vec<Vec<u8>> = (1..=200u32)
        .map(|i| remote.encode(KeyId::default(), PacketId::new(i), &i.to_be_bytes()).unwrap())
        .collect();

    let egress = {
        let codec = Arc::clone(&local);
        thread::spawn(move || {
            (1..=200u32)
                .map(|i| codec.encode(KeyId::default(), PacketId::new(i), b"out").unwrap())
                .collect::<Vec<_>>()
        })
    };
    let ingress = {
        let codec = Arc::clone(&local);
        thread::spawn(move || {
            for (i, frame) in (1..=200u32).zip(&inbound) {
                let (packet_id, payload) = codec.decode(frame).unwrap();
                assert_eq!(packet_id, PacketId::new(i));
                assert_eq!(payload, i.to_be_bytes());
            }
        })
    };

    let outbound = egress.join().unwrap();
    ingress.join().unwrap();

    for (i, frame) in (1..=200u32).zip(&outbound) {
        assert_eq!(remote.decode(frame).unwrap(), (PacketId::new(i), b"out".to_vec()));
    }

    let stats = local.stats();
    assert_eq!(stats.packets_encoded, 200);
    assert_eq!(stats.packets_decoded, 200);
}
