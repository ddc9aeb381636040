use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert_many<T: Clone>(vals: &[T], collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.extend_from_slice(vals);
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|item| compare(item)).cloned().collect()
}

/// Removes every matching item and returns them in insertion order
pub fn find_and_delete_by<T, F: Fn(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F) -> Vec<T> {
    let mut collection = collection.lock().unwrap();
    let mut deleted_items = Vec::new();
    let mut index = 0;
    while index < collection.len() {
        if compare(&collection[index]) {
            deleted_items.push(collection.remove(index));
        } else {
            index += 1;
        }
    }

    deleted_items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_matching_items_in_order() {
        let collection = Mutex::new(vec![1, 5, 2, 6, 3]);
        let deleted = find_and_delete_by(&collection, |n| *n <= 3);
        assert_eq!(deleted, vec![1, 2, 3]);
        assert_eq!(*collection.lock().unwrap(), vec![5, 6]);
        assert_eq!(find_by(&collection, |n| *n > 5), vec![6]);
    }
}
