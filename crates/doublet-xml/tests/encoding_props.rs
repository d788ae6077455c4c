// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
use doublet_xml::{LinkStore, MemoryLinks, XmlStorage};
use proptest::prelude::*;

fn storage() -> XmlStorage<MemoryLinks> {
    XmlStorage::new(MemoryLinks::new()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn strings_round_trip(text in "\\PC{0,40}") {
        let mut storage = storage();
        let string = storage.create_string(&text).unwrap();
        prop_assert_eq!(storage.get_string(string).unwrap(), text);
    }

    #[test]
    fn strings_are_deduplicated(text in "\\PC{0,24}") {
        let mut storage = storage();
        let first = storage.create_string(&text).unwrap();
        let len = storage.store().len();
        let second = storage.create_string(&text).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(storage.store().len(), len);
        prop_assert_eq!(storage.get_string_or_default(&text), Some(first));
    }

    #[test]
    fn distinct_strings_get_distinct_addresses(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
        let mut storage = storage();
        let left = storage.create_string(&a).unwrap();
        let right = storage.create_string(&b).unwrap();
        prop_assert_eq!(left == right, a == b);
    }

    #[test]
    fn elements_are_deduplicated_by_name(name in "[a-zA-Z_][a-zA-Z0-9_.-]{0,12}") {
        let mut storage = storage();
        let first = storage.create_element(&name).unwrap();
        let second = storage.create_element(&name).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(storage.element_name(first).unwrap(), name);
    }

    #[test]
    fn children_order_is_preserved(texts in prop::collection::vec("[a-z]{1,4}", 1..24)) {
        let mut storage = storage();
        let nodes: Vec<_> = texts
            .iter()
            .map(|text| storage.create_text_node(text).unwrap())
            .collect();
        let sequence = storage.create_children_sequence(&nodes).unwrap();
        let element = storage.create_element_with_children("list", sequence).unwrap();
        prop_assert_eq!(storage.element_children_nodes(element).unwrap(), nodes);
    }

    #[test]
    fn attributes_round_trip(name in "[a-z]{0,6}", value in "\\PC{0,12}") {
        let mut storage = storage();
        let attribute = storage.create_attribute_node(&name, &value).unwrap();
        let decoded = storage.get_attribute(attribute).unwrap();
        prop_assert_eq!(decoded.name, name);
        prop_assert_eq!(decoded.value, value);
    }
}
