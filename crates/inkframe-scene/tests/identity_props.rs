use inkframe_scene::identity::{IdentityCodec, IdentityTable, MAX_IDENTITIES};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn codec_is_a_bijection(step in any::<u32>(), slot in 0u32..(MAX_IDENTITIES as u32)) {
        let codec = IdentityCodec::new(step);
        let value = codec.encode(slot);
        prop_assert_ne!(value, 0);
        prop_assert!(value <= 0x00ff_ffff);
        prop_assert_eq!(codec.decode(value), Some(slot));
    }

    #[test]
    fn live_identities_never_collide(ops in prop::collection::vec(any::<bool>(), 1..200)) {
        let mut table = IdentityTable::new(IdentityCodec::debug());
        let mut live = Vec::new();
        for (n, allocate) in ops.into_iter().enumerate() {
            if allocate || live.is_empty() {
                live.push((n, table.allocate(n).unwrap()));
            } else {
                let (_, identity) = live.remove(n % live.len());
                table.release(identity);
                prop_assert_eq!(table.lookup(identity.value()), None);
            }
            let values: HashSet<u32> = live.iter().map(|(_, id)| id.value()).collect();
            prop_assert_eq!(values.len(), live.len());
            prop_assert_eq!(table.live_count(), live.len());
            for (owner, identity) in &live {
                prop_assert_eq!(table.lookup(identity.value()), Some(*owner));
            }
        }
    }
}
