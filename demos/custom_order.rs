use std::cmp::Ordering;

use rb_ordered_tree::{Compare, RbTree};

/// Orders names without regard to ASCII case.
#[derive(Default)]
struct CaseInsensitive;

impl Compare<String> for CaseInsensitive {
    fn compare(&self, lhs: &String, rhs: &String) -> Ordering {
        lhs.to_ascii_lowercase().cmp(&rhs.to_ascii_lowercase())
    }
}

fn main() {
    let mut names = RbTree::with_comparator(CaseInsensitive);
    for name in ["delta", "Alpha", "charlie", "Bravo", "ALPHA", "echo"] {
        let (_, inserted) = names.insert(name.to_string());
        println!("insert {name}: {inserted}");
    }
    assert_eq!(names.len(), 5);
    assert_eq!(names.first().map(String::as_str), Some("Alpha"));

    let mut cursor = names.cursor(names.find(&"CHARLIE".to_string()));
    cursor.move_prev();
    assert_eq!(cursor.get().map(String::as_str), Some("Bravo"));

    let first = names.lower_bound(&"b".to_string());
    let last = names.find(&"echo".to_string());
    let removed = names.erase_range(first, last);
    assert_eq!(removed, 3);
    println!("{names:?}");
}
