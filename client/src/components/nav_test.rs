use super::*;
use shell::Location;

#[test]
fn every_link_resolves_to_a_page() {
    let table = shell::site::routes().unwrap();
    for (path, _) in LINKS {
        let matched = table.resolve(Location::from_path(path).path());
        assert!(!matched.is_fallback(), "{path} fell through to the catch-all");
    }
}

#[test]
fn links_are_hash_fragments() {
    for (path, _) in LINKS {
        assert!(href(path).starts_with("#/"), "{path}");
    }
}
