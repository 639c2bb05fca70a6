use std::collections::HashMap;

use crate::merge::VerseMap;

/// Tally verses per book.
///
/// The book is the first whitespace-delimited token of the `v`
/// reference ("Genesis 1:1" -> "Genesis"); records without a usable `v`
/// are skipped.
pub fn book_counts(verses: &VerseMap) -> HashMap<String, u64> {
    let mut books: HashMap<String, u64> = HashMap::new();
    for record in verses.values() {
        let Some(book) = record.v.as_deref().and_then(|v| v.split_whitespace().next()) else {
            continue;
        };
        *books.entry(book.to_owned()).or_insert(0) += 1;
    }
    books
}

/// Top `n` books by verse count, count descending then name ascending.
pub fn top_books(books: &HashMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = books.iter().map(|(b, &c)| (b.clone(), c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Print the book statistics block for a merged mapping.
pub fn report(verses: &VerseMap) {
    if verses.is_empty() {
        println!("\nNo data to analyze.");
        return;
    }

    let books = book_counts(verses);
    println!("\n================== BOOK STATISTICS ==================");
    println!("Total books: {}", books.len());
    println!("\nTop 10 books by verse count:");
    for (book, count) in top_books(&books, 10) {
        println!("  {book}: {count} verses");
    }
}
