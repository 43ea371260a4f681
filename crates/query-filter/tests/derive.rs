//! Filtering derived structs through attribute paths.

use std::rc::Rc;
use std::time::Duration;

use query_filter::{attrs_all, filter_all, query, Criterion, Expander, Queryable, Shape, Value};
use serde_bytes::ByteBuf;

#[derive(Debug, Clone, PartialEq, Queryable)]
struct Person {
    name: String,
    mother: Option<Rc<Person>>,
    father: Option<Rc<Person>>,
}

impl Person {
    fn new(name: &str) -> Rc<Person> {
        Rc::new(Person {
            name: name.to_string(),
            mother: None,
            father: None,
        })
    }

    fn with_parents(name: &str, mother: &Rc<Person>, father: &Rc<Person>) -> Rc<Person> {
        Rc::new(Person {
            name: name.to_string(),
            mother: Some(Rc::clone(mother)),
            father: Some(Rc::clone(father)),
        })
    }
}

struct Family {
    root: Rc<Person>,
    mother: Rc<Person>,
    all: Vec<Rc<Person>>,
}

fn family() -> Family {
    let p_grandfather = Person::new("Wilbur Meadows");
    let p_grandmother = Person::new("Halle Meadows (nee Perkins)");
    let m_grandfather = Person::new("Jimmy Walsh");
    let m_m_ggrandfather = Person::new("Alan Eastwood");
    let m_m_ggrandmother = Person::new("Opal Eastwood (nee Plant)");
    let m_grandmother =
        Person::with_parents("Laura Walsh (nee Stanton)", &m_m_ggrandmother, &m_m_ggrandfather);
    let father = Person::with_parents("Isaac Meadows", &p_grandmother, &p_grandfather);
    let mother = Person::with_parents("Isobel Meadows (nee Walsh)", &m_grandmother, &m_grandfather);
    let root = Person::with_parents("Sally Meadows", &mother, &father);

    let all = vec![
        Rc::clone(&root),
        Rc::clone(&mother),
        father,
        m_grandmother,
        m_grandfather,
        m_m_ggrandmother,
        m_m_ggrandfather,
        p_grandmother,
        p_grandfather,
    ];
    Family { root, mother, all }
}

fn names(results: impl Iterator<Item = query_filter::Result<Rc<Person>>>) -> Vec<String> {
    results.map(|r| r.unwrap().name.clone()).collect()
}

#[test]
fn filter_by_furthest_ancestor() {
    let family = family();
    let opal = query()
        .attr("mother")
        .attr("mother")
        .attr("mother")
        .attr("name")
        .contains("Opal Eastwood");

    assert_eq!(names(filter_all(&family.all, [opal])), vec![family.root.name.clone()]);
}

#[test]
fn filter_by_ancestor_equality() {
    let family = family();
    let laura = query()
        .attr(Person::MOTHER)
        .attr(Person::MOTHER)
        .attr(Person::NAME)
        .eq("Laura Walsh (nee Stanton)");

    assert_eq!(names(filter_all(&family.all, [laura])), vec!["Sally Meadows"]);
}

#[test]
fn born_walsh_with_known_father() {
    let family = family();
    // "Walsh" not followed by " (nee".
    let born_walsh = query()
        .attr("name")
        .matches_regex(r"Walsh($|[^ ]| [^(])")
        .unwrap();
    let has_father = query().attr("father").is_not_none();

    assert_eq!(
        names(filter_all(&family.all, [born_walsh, has_father])),
        vec![family.mother.name.clone()]
    );
}

#[test]
fn missing_parents_are_null_not_absent() {
    let family = family();
    let orphans = filter_all(&family.all, [query().attr("mother").is_none()]).count();
    assert_eq!(orphans, 5);

    // Walking past a null parent is absence: only people with a mother take part.
    let grand = query().attr("mother").attr("name");
    assert_eq!(filter_all(&family.all, [grand.eq("x")]).count(), 0);
    assert_eq!(filter_all(&family.all, [grand.ne("x")]).count(), 4);
}

#[test]
fn attribute_keywords() {
    let family = family();
    let by_mother = attrs_all([("mother__name__contains", "Walsh")]).unwrap();
    assert_eq!(
        names(filter_all(&family.all, [by_mother])),
        vec!["Sally Meadows", "Isobel Meadows (nee Walsh)"]
    );

    let items = Expander::items().predicate("name", "Sally Meadows").unwrap();
    assert_eq!(filter_all(&family.all, [items]).count(), 0);
}

#[derive(Clone, Queryable)]
struct Account {
    #[query(rename = "login")]
    user_name: String,
    #[query(skip)]
    #[allow(dead_code)]
    password: String,
    tags: Vec<String>,
    r#type: u8,
}

#[test]
fn rename_and_skip() {
    let account = Account {
        user_name: "mia".into(),
        password: "hunter2".into(),
        tags: vec!["admin".into()],
        r#type: 2,
    };

    assert_eq!(Account::LOGIN, "login");
    assert_eq!(Account::TAGS, "tags");
    assert_eq!(Account::TYPE, "type");

    assert_eq!(account.attr("login"), Some(Value::String("mia")));
    assert!(account.attr("user_name").is_none());
    assert!(account.attr("password").is_none());
    assert!(account.attr("type").is_some());
    assert_eq!(account.shape(), Shape::Object);

    assert!(query().attr("tags").contains("admin").eval(&account).unwrap());
    assert!(!query().attr("password").is_not_none().eval(&account).unwrap());
    // Objects have no members, so membership is an error.
    assert!(query().contains("mia").eval(&account).is_err());
}

#[derive(Debug, Clone, Queryable)]
struct Tagged<T, M> {
    label: String,
    value: T,
    #[query(skip)]
    #[allow(dead_code)]
    meta: M,
}

#[test]
fn generic_structs() {
    // Duration is not queryable, which is fine for a skipped field.
    let tagged: Vec<Tagged<Vec<i64>, Duration>> = vec![
        Tagged {
            label: "primes".into(),
            value: vec![2, 3, 5],
            meta: Duration::from_secs(1),
        },
        Tagged {
            label: "squares".into(),
            value: vec![1, 4, 9],
            meta: Duration::from_secs(2),
        },
    ];

    let has_four = query().attr("value").contains(4);
    let found: Vec<_> = filter_all(&tagged, [has_four])
        .collect::<query_filter::Result<_>>()
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].label, "squares");

    let first_two = query().attr(Tagged::<i64, ()>::VALUE).item(0).eq(2);
    assert_eq!(filter_all(&tagged, [first_two]).count(), 1);
    assert!(tagged[0].attr("meta").is_none());
}

#[derive(Clone, Queryable)]
struct Blob {
    name: String,
    data: ByteBuf,
}

fn blobs() -> Vec<Blob> {
    let sources: [(&str, &[u8]); 3] = [
        ("header", b"id: 42"),
        ("body", b"no digits"),
        ("raw", b"\xff\x00 7"),
    ];
    sources
        .into_iter()
        .map(|(name, data)| Blob {
            name: name.to_string(),
            data: ByteBuf::from(data.to_vec()),
        })
        .collect()
}

fn blob_names(results: impl Iterator<Item = query_filter::Result<Blob>>) -> Vec<String> {
    results.map(|r| r.unwrap().name).collect()
}

#[test]
fn byte_string_fields() {
    let blobs = blobs();

    let digits = query().attr("data").matches_regex(r"\d+").unwrap();
    assert_eq!(blob_names(filter_all(&blobs, [digits])), vec!["header", "raw"]);

    // Bytes that are not valid UTF-8 are searched too.
    let seven = query().attr("data").matches_regex("7$").unwrap();
    assert_eq!(blob_names(filter_all(&blobs, [seven])), vec!["raw"]);

    let id = query().attr("data").contains(Criterion::bytes(&b"id"[..]));
    assert_eq!(blob_names(filter_all(&blobs, [id])), vec!["header"]);

    let exact = query().attr("data").eq(Criterion::bytes(&b"no digits"[..]));
    assert_eq!(blob_names(filter_all(&blobs, [exact])), vec!["body"]);

    let after_i = query().attr("data").gt(Criterion::bytes(&b"i"[..]));
    assert_eq!(blob_names(filter_all(&blobs, [after_i])), vec!["header", "body", "raw"]);

    let first_byte = query().attr("data").item(0).eq(b'n');
    assert_eq!(blob_names(filter_all(&blobs, [first_byte])), vec!["body"]);

    // A string operand is not a byte string.
    let mixed = query().attr("data").contains("id");
    assert!(filter_all(&blobs, [mixed]).next().unwrap().is_err());
}
