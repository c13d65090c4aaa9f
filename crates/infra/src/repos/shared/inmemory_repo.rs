use church_events_domain::{Entity, ID};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Useful functions for creating inmemory repositories

fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    // A panic while holding the lock can not leave a `Vec` half written
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = lock(collection);
    collection.push(val.clone());
}

pub fn insert_many<T: Clone>(vals: &[T], collection: &Mutex<Vec<T>>) {
    let mut collection = lock(collection);
    collection.extend_from_slice(vals);
}

/// Replaces the stored value with the same id, or appends it
pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = lock(collection);
    match collection.iter().position(|item| item.id() == val.id()) {
        Some(i) => collection[i] = val.clone(),
        None => collection.push(val.clone()),
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = lock(collection);
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    let collection = lock(collection);
    collection.iter().filter(|item| compare(*item)).cloned().collect()
}

pub fn any<T, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F) -> bool {
    let collection = lock(collection);
    collection.iter().any(compare)
}

/// Removes every value matching `compare` and returns how many were removed
pub fn delete_by<T, F: Fn(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F) -> usize {
    let mut collection = lock(collection);
    let before = collection.len();
    collection.retain(|item| !compare(item));
    before - collection.len()
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = lock(collection);
    let i = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(i))
}
