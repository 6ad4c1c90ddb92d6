//! End-to-end behavior of the shared cart store.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use aqpvet_cache::{CacheError, FileStore, KvStore, MemoryStore};
use aqpvet_commerce::prelude::*;

fn pen(cents: i64) -> Money {
    Money::new(cents, Currency::PEN)
}

fn product(id: i64, cents: i64) -> ProductSnapshot {
    ProductSnapshot::new(id, format!("Product {id}"), pen(cents))
}

fn open(store: &MemoryStore) -> CartStore<MemoryStore> {
    CartStore::open(store.clone(), CartConfig::default())
}

fn quantities(cart: &CartStore<MemoryStore>) -> Vec<(String, u32)> {
    cart.items()
        .iter()
        .map(|i| (i.product_id.to_string(), i.quantity))
        .collect()
}

/// Storage backend whose writes always fail.
struct BrokenStore;

impl KvStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &[u8]) -> Result<(), CacheError> {
        Err(CacheError::StoreError(format!("quota exceeded writing {key}")))
    }

    fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(Vec::new())
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "aqpvet-commerce-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn adding_same_product_twice_merges() {
    let mut cart = open(&MemoryStore::new());
    cart.add_one(&product(1, 1000));
    cart.add_one(&product(1, 1000));

    assert_eq!(quantities(&cart), vec![("1".to_string(), 2)]);
    assert_eq!(cart.total_items(), 2);
    assert_eq!(cart.total_price().display(), "S/ 20.00");
}

#[test]
fn decreasing_to_zero_removes_line_item() {
    let mut cart = open(&MemoryStore::new());
    cart.add_one(&product(1, 1000));
    cart.add_one(&product(2, 500));
    cart.decrease_item(&ProductId::new("1"));

    assert_eq!(quantities(&cart), vec![("2".to_string(), 1)]);
    assert_eq!(cart.total_items(), 1);
    assert_eq!(cart.total_price().display(), "S/ 5.00");
}

#[test]
fn discount_price_is_charged() {
    let mut cart = open(&MemoryStore::new());
    let on_sale = product(1, 2000).with_discount_price(pen(1500));
    cart.add_item(&on_sale, 3);

    assert_eq!(cart.total_price().display(), "S/ 45.00");
    let item = cart.get(&ProductId::new("1")).unwrap();
    assert!(item.is_discounted());
    assert_eq!(item.list_price, pen(2000));
}

#[test]
fn clear_zeroes_totals() {
    let mut cart = open(&MemoryStore::new());
    cart.add_one(&product(1, 1000));
    cart.add_one(&product(2, 500));
    cart.add_one(&product(3, 250));

    assert!(cart.clear());
    assert!(cart.items().is_empty());
    assert_eq!(cart.total_items(), 0);
    assert_eq!(cart.total_price().display(), "S/ 0.00");
}

#[test]
fn decreasing_absent_product_is_noop() {
    let storage = MemoryStore::new();
    let mut cart = open(&storage);
    cart.add_item(&product(1, 1000), 2);
    let before = cart.state().clone();

    assert!(!cart.decrease_item(&ProductId::new("99")));
    assert_eq!(cart.state(), &before);
}

#[test]
fn reload_restores_identical_items() {
    let storage = MemoryStore::new();
    let mut cart = open(&storage);
    cart.add_one(&product(1, 1000));
    cart.add_one(&product(2, 500).with_description("Arena para gatos"));
    let before = cart.state().clone();
    drop(cart);

    let reloaded = open(&storage);
    assert_eq!(reloaded.state(), &before);
    assert!(reloaded.last_saved().is_some());
}

#[test]
fn reload_from_files() {
    let dir = temp_dir("reload");
    {
        let mut cart = CartStore::open(FileStore::open(&dir).unwrap(), CartConfig::default());
        cart.add_item(&product(4, 1250), 3);
        cart.increase_item(&ProductId::new("4"));
    }

    let cart = CartStore::open(FileStore::open(&dir).unwrap(), CartConfig::default());
    assert_eq!(cart.total_items(), 4);
    assert_eq!(cart.total_price().display(), "S/ 50.00");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn removing_twice_equals_removing_once() {
    let mut once = open(&MemoryStore::new());
    let mut twice = open(&MemoryStore::new());
    for cart in [&mut once, &mut twice] {
        cart.add_item(&product(1, 1000), 2);
        cart.add_one(&product(2, 500));
    }

    once.remove_item(&ProductId::new("1"));
    twice.remove_item(&ProductId::new("1"));
    assert!(!twice.remove_item(&ProductId::new("1")));

    assert_eq!(once.state(), twice.state());
}

#[test]
fn numeric_and_string_ids_are_the_same_product() {
    let mut cart = open(&MemoryStore::new());
    let currency = cart.currency();
    let from_number =
        ProductSnapshot::from_json(&serde_json::json!({"id": 5, "name": "Pipeta", "price": "35.00"}), currency)
            .unwrap();
    let from_text =
        ProductSnapshot::from_json(&serde_json::json!({"id": "5", "name": "Pipeta", "price": "35.00"}), currency)
            .unwrap();

    cart.add_one(&from_number);
    cart.add_one(&from_text);
    assert_eq!(quantities(&cart), vec![("5".to_string(), 2)]);
}

#[test]
fn persistence_failure_keeps_cart_working() {
    let mut cart = CartStore::open(BrokenStore, CartConfig::default());
    let notified = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&notified);
    cart.subscribe(move |_: &CartEvent, _: &CartState| *counter.borrow_mut() += 1);

    assert!(cart.add_item(&product(1, 1000), 2));
    assert!(cart.decrease_item(&ProductId::new("1")));

    assert_eq!(cart.total_items(), 1);
    assert_eq!(*notified.borrow(), 2);
    assert!(cart.last_saved().is_none());
    assert!(matches!(cart.flush(), Err(CommerceError::Cache(_))));
}

#[derive(Debug, Clone, Copy)]
enum Op {
    AddA,
    AddBTwice,
    AddZero,
    IncreaseA,
    IncreaseMissing,
    DecreaseA,
    DecreaseB,
    RemoveA,
    Clear,
}

const OPS: [Op; 9] = [
    Op::AddA,
    Op::AddBTwice,
    Op::AddZero,
    Op::IncreaseA,
    Op::IncreaseMissing,
    Op::DecreaseA,
    Op::DecreaseB,
    Op::RemoveA,
    Op::Clear,
];

fn apply(cart: &mut CartStore<MemoryStore>, op: Op) -> bool {
    let a = product(1, 1000);
    let b = product(2, 750).with_discount_price(pen(500));
    match op {
        Op::AddA => cart.add_one(&a),
        Op::AddBTwice => cart.add_item(&b, 2),
        Op::AddZero => cart.add_item(&a, 0),
        Op::IncreaseA => cart.increase_item(&a.id),
        Op::IncreaseMissing => cart.increase_item(&ProductId::new("404")),
        Op::DecreaseA => cart.decrease_item(&a.id),
        Op::DecreaseB => cart.decrease_item(&b.id),
        Op::RemoveA => cart.remove_item(&a.id),
        Op::Clear => cart.clear(),
    }
}

fn sequences(max_len: usize) -> Vec<Vec<Op>> {
    let mut all = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for seq in &frontier {
            for op in OPS {
                let mut longer: Vec<Op> = seq.clone();
                longer.push(op);
                next.push(longer);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

#[test]
fn invariants_hold_for_every_operation_sequence() {
    for seq in sequences(4) {
        let storage = MemoryStore::new();
        let mut cart = open(&storage);
        let events = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&events);
        cart.subscribe(move |_: &CartEvent, _: &CartState| *seen.borrow_mut() += 1);

        let mut changes = 0;
        for op in &seq {
            let before = cart.state().clone();
            let changed = apply(&mut cart, *op);
            if changed {
                changes += 1;
            } else {
                assert_eq!(cart.state(), &before, "{:?} changed state in {:?}", op, seq);
            }

            let items = cart.items();
            let mut ids: Vec<&ProductId> = items.iter().map(|i| &i.product_id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), items.len(), "duplicate ids after {:?}", seq);
            assert!(items.iter().all(|i| i.quantity >= 1), "zero quantity after {:?}", seq);

            let count: u64 = items.iter().map(|i| u64::from(i.quantity)).sum();
            let price: i64 = items
                .iter()
                .map(|i| i.unit_price.amount_cents * i64::from(i.quantity))
                .sum();
            assert_eq!(cart.total_items(), count);
            assert_eq!(cart.total_price().amount_cents, price);
        }

        assert_eq!(*events.borrow(), changes, "observer count for {:?}", seq);
        if changes > 0 {
            assert_eq!(open(&storage).state(), cart.state(), "reload after {:?}", seq);
        } else {
            assert!(storage.is_empty());
        }
    }
}
