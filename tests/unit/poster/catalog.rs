use super::*;

fn small() -> Catalog {
    Catalog::new(["Reliquia", "Berghain", "La Perla", "Jeanne"]).unwrap()
}

#[test]
fn default_catalog_has_the_album_tracks() {
    let c = Catalog::default();
    assert_eq!(c.len(), 18);
    assert_eq!(c.get(0), Some("Sexo, Violencia y Llantas"));
    assert_eq!(c.get(17), Some("Magnolias"));
    assert_eq!(c.position("Memória"), Some(16));
}

#[test]
fn catalog_rejects_empty_and_repeated_titles() {
    assert!(Catalog::new(["A", "  "]).is_err());
    assert!(Catalog::new(["A", "B", "A"]).is_err());
    assert!(Catalog::new(["La Perla", "LA  PERLA"]).is_err());
    assert!(Catalog::new(Vec::<String>::new()).is_err());
    let c = Catalog::new(["  La   Perla "]).unwrap();
    assert_eq!(c.titles(), ["La Perla".to_string()]);
}

#[test]
fn catalog_json_is_a_plain_list() {
    let c: Catalog = serde_json::from_str(r#"["One","Two"]"#).unwrap();
    assert_eq!(c.len(), 2);
    assert_eq!(serde_json::to_string(&c).unwrap(), r#"["One","Two"]"#);
    assert!(serde_json::from_str::<Catalog>(r#"["One","One"]"#).is_err());
}

#[test]
fn add_appends_in_order() {
    let mut s = Selection::new(small(), 8).unwrap();
    assert_eq!(s.add("La Perla"), AddOutcome::Added(0));
    assert_eq!(s.add("Reliquia"), AddOutcome::Added(1));
    assert_eq!(s.titles(), vec!["La Perla", "Reliquia"]);
    assert_eq!(s.remaining(), vec!["Berghain", "Jeanne"]);
}

#[test]
fn add_beyond_limit_is_a_noop() {
    let mut s = Selection::new(small(), 2).unwrap();
    s.add("Reliquia");
    s.add("Berghain");
    assert!(s.is_full());
    assert_eq!(s.add("Jeanne"), AddOutcome::LimitReached);
    assert_eq!(s.len(), 2);
    assert_eq!(s.titles(), vec!["Reliquia", "Berghain"]);
}

#[test]
fn duplicates_and_unknown_titles_are_ignored() {
    let mut s = Selection::new(small(), 8).unwrap();
    s.add("Jeanne");
    assert_eq!(s.add("Jeanne"), AddOutcome::Duplicate);
    assert_eq!(s.add("Not A Track"), AddOutcome::NotInCatalog);
    assert_eq!(s.titles(), vec!["Jeanne"]);
}

#[test]
fn undo_pops_last_and_is_a_noop_when_empty() {
    let mut s = Selection::new(small(), 8).unwrap();
    assert_eq!(s.undo(), None);
    s.add("Reliquia");
    s.add("Jeanne");
    assert_eq!(s.undo().as_deref(), Some("Jeanne"));
    assert_eq!(s.titles(), vec!["Reliquia"]);
    assert_eq!(s.undo().as_deref(), Some("Reliquia"));
    assert_eq!(s.undo(), None);
    assert!(s.is_empty());
}

#[test]
fn remove_closes_the_gap() {
    let mut s = Selection::new(small(), 8).unwrap();
    for t in ["Reliquia", "Berghain", "La Perla"] {
        s.add(t);
    }
    assert!(s.remove("Berghain"));
    assert!(!s.remove("Berghain"));
    assert!(!s.remove("Nope"));
    assert_eq!(s.titles(), vec!["Reliquia", "La Perla"]);
    assert_eq!(s.add("Berghain"), AddOutcome::Added(2));
}

#[test]
fn zero_limit_is_invalid() {
    assert!(Selection::new(small(), 0).is_err());
}
