//! Inspect command implementation.

use bookcase_core::{Book, Catalog, CatalogStats, Category, Controller, Entity, Identified, User};
use bookcase_storage::DirectoryStore;
use serde::Serialize;
use std::path::Path;

/// Catalog inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Data directory path.
    pub path: String,
    /// Size of each collection resource.
    pub resources: Vec<ResourceInfo>,
    /// Entity counts and sequencer positions.
    pub stats: CatalogStats,
    /// Per-book summary (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookSummary>>,
}

/// One collection resource on disk.
#[derive(Debug, Serialize)]
pub struct ResourceInfo {
    /// Resource name.
    pub name: &'static str,
    /// File size in bytes, or `None` if it was never written.
    pub size: Option<u64>,
}

/// Summary of a single book.
#[derive(Debug, Serialize)]
pub struct BookSummary {
    /// Book ID.
    pub id: u32,
    /// Title.
    pub name: String,
    /// Number of reviews.
    pub reviews: usize,
    /// Score as displayed to readers.
    pub score: String,
}

/// Runs the inspect command.
pub fn run(path: &Path, show_books: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = super::open_existing(path)?;
    let store = DirectoryStore::open(path)?;

    let mut resources = Vec::new();
    for name in [User::RESOURCE, Book::RESOURCE, Category::RESOURCE] {
        let file = store.resource_path(name)?;
        let size = std::fs::metadata(&file).ok().map(|m| m.len());
        resources.push(ResourceInfo { name, size });
    }

    let result = InspectResult {
        path: path.display().to_string(),
        resources,
        stats: catalog.stats(),
        books: show_books.then(|| summarize_books(&catalog)),
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn summarize_books(catalog: &Catalog) -> Vec<BookSummary> {
    catalog
        .books()
        .list_all()
        .iter()
        .map(|book| {
            let book = book.read();
            BookSummary {
                id: book.id().as_u32(),
                name: book.name().to_string(),
                reviews: book.reviews().len(),
                score: book.score_display(),
            }
        })
        .collect()
}

fn print_text_output(result: &InspectResult) {
    let stats = &result.stats;
    println!("Bookcase Catalog Inspection");
    println!("===========================");
    println!();
    println!("Path: {}", result.path);
    println!();
    println!("Resources:");
    for resource in &result.resources {
        match resource.size {
            Some(size) => println!("  {:<16} {}", resource.name, format_size(size)),
            None => println!("  {:<16} (absent)", resource.name),
        }
    }
    println!();
    println!("Entities:");
    println!("  Users:      {:>6}  (next id {})", stats.users, stats.next_user_id);
    println!("  Shelves:    {:>6}", stats.shelves);
    println!("  Books:      {:>6}  (next id {})", stats.books, stats.next_book_id);
    println!("  Reviews:    {:>6}  (next id {})", stats.reviews, stats.next_review_id);
    println!(
        "  Categories: {:>6}  (next id {})",
        stats.categories, stats.next_category_id
    );
    println!();
    match stats.average_score {
        Some(score) => println!("Average score: {score:.2}"),
        None => println!("Average score: (no reviews)"),
    }

    if let Some(books) = &result.books {
        println!();
        println!("Books:");
        for book in books {
            println!(
                "  [{}] {} - {} reviews, score {}",
                book.id, book.name, book.reviews, book.score
            );
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
