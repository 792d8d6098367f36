use proptest::prelude::*;

use namelink_hello::Name;

/// Strategy for names with 0..6 non-empty opaque-byte components.
///
/// Empty components are excluded: the URI form cannot represent them, so
/// they are outside the display/parse roundtrip contract.
fn arb_name() -> impl Strategy<Value = Name> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 1..24), 0..6).prop_map(|components| {
        components
            .into_iter()
            .fold(Name::new(), |name, c| name.append(c))
    })
}

proptest! {
    /// Any name survives a MessagePack roundtrip.
    #[test]
    fn roundtrip_wire(name in arb_name()) {
        let bytes = name.to_wire().expect("serialize");
        let decoded = Name::from_wire(&bytes).expect("deserialize");
        prop_assert_eq!(&name, &decoded);
    }

    /// Any name survives a display/parse roundtrip, escapes included.
    #[test]
    fn roundtrip_uri(name in arb_name()) {
        let uri = name.to_string();
        let parsed: Name = uri.parse().expect("parse");
        prop_assert_eq!(&name, &parsed);
    }

    /// A name nested as a component of another decodes back intact.
    #[test]
    fn roundtrip_nested_component(identity in arb_name(), outer in arb_name()) {
        let wire = identity.to_wire().expect("serialize");
        let combined = outer.append(wire);
        let recovered = Name::from_wire(combined.get(-1).expect("component"))
            .expect("deserialize");
        prop_assert_eq!(&identity, &recovered);
    }

    /// Appending then stripping one component is the identity.
    #[test]
    fn append_then_strip(name in arb_name(), component in prop::collection::vec(any::<u8>(), 1..24)) {
        let extended = name.clone().append(component);
        prop_assert_eq!(extended.prefix(-1), name);
    }

    /// Every prefix of a name is a prefix in the `starts_with` sense.
    #[test]
    fn prefixes_start_the_name(name in arb_name(), keep in 0..6isize) {
        let prefix = name.prefix(keep);
        prop_assert!(name.starts_with(&prefix));
        prop_assert!(prefix.len() <= name.len());
    }
}
