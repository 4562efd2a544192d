extern crate oscore;

use oscore::address::AddressTree;
use oscore::{OscError, OscMessage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn hits() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[test]
fn choice_and_character_class_and_wildcard_compose() {
    let mut tree = AddressTree::new();
    let seen = hits();
    let counted = seen.clone();
    tree.add_callback("/oscillator/1/frequency", move |_: &OscMessage| {
        counted.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    assert_eq!(
        tree.matching_callbacks("/oscillator/1/frequency")
            .unwrap()
            .len(),
        1
    );
    assert!(tree
        .matching_callbacks("/oscillator/1/phase")
        .unwrap()
        .is_empty());
    assert!(tree
        .matching_callbacks("/prefix/oscillator/1/frequency")
        .unwrap()
        .is_empty());

    assert_eq!(
        tree.matching_callbacks("/oscillator/[0-9]/{frequency,phase}")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn invalid_address_parts_are_rejected_on_lookup_too() {
    let tree = AddressTree::new();
    assert!(matches!(
        tree.matching_callbacks("/has a space"),
        Err(OscError::InvalidAddressPart(_))
    ));
    assert!(matches!(
        tree.matching_callbacks("no/leading/slash"),
        Err(OscError::InvalidAddressPart(_))
    ));
}

#[test]
fn remove_all_then_get_reports_no_such_path() {
    let mut tree = AddressTree::new();
    let seen = hits();
    tree.add_callback("/x/y", {
        let seen = seen.clone();
        move |_: &OscMessage| {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    })
    .unwrap();

    assert_eq!(tree.remove_all_callbacks("/x/y").unwrap(), 1);
    assert_eq!(tree.get_callbacks("/x/y"), Err(OscError::NoSuchPath));
    assert_eq!(tree.get_callbacks("/x"), Err(OscError::NoSuchPath));
}
