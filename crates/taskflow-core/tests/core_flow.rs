use chrono::Utc;
use taskflow_core::store::Store;
use taskflow_core::task::Priority;
use taskflow_core::tasks::{StatusFilter, TaskList};
use tempfile::tempdir;

#[test]
fn store_roundtrip_and_filtering() {
    let temp = tempdir().expect("tempdir");
    let store = Store::open(temp.path()).expect("open store");

    let now = Utc::now();
    let mut list = TaskList::new(store.load());
    assert!(list.is_empty());

    list.add("Write report", "quarterly numbers", Priority::High, now)
        .expect("add task");
    let milk = list.add("Buy milk", "", Priority::Medium, now).expect("add task");
    store.save(list.tasks());

    // a fresh session sees the same collection, newest first
    let mut reloaded = TaskList::new(store.load());
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.tasks()[0].title, "Buy milk");
    assert_eq!(reloaded.stats().high_priority, 1);

    assert!(reloaded.toggle(milk, now));
    store.save(reloaded.tasks());

    let final_list = TaskList::new(store.load());
    let done = final_list.get(milk).expect("task present");
    assert!(done.completed);
    assert_eq!(done.completed_at, Some(now));

    let mut view = TaskList::new(store.load());
    view.set_filter(StatusFilter::Active);
    view.set_search("report");
    let matching = view.filtered();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].title, "Write report");

    let stats = view.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.completed, 1);
}

#[test]
fn corrupt_store_starts_empty_without_failing() {
    let temp = tempdir().expect("tempdir");
    let store = Store::open(temp.path()).expect("open store");

    std::fs::write(&store.tasks_path, "not json at all").expect("write corrupt store");

    let list = TaskList::new(store.load());
    assert!(list.is_empty());

    // the session keeps working and can persist over the corrupt file
    let mut list = list;
    list.add("Recovered", "", Priority::Low, Utc::now()).expect("add task");
    store.save(list.tasks());
    assert_eq!(TaskList::new(store.load()).len(), 1);
}
